//! Query builder for stored readings.
//!
//! This module provides a fluent query builder for filtering and paginating
//! stored weather readings. [`ReadingQuery`] follows the builder pattern for
//! ergonomic query construction.
//!
//! # Example
//!
//! ```
//! use stratus_store::{Store, ReadingQuery};
//! use time::{Duration, OffsetDateTime};
//!
//! let store = Store::open_in_memory()?;
//! let yesterday = OffsetDateTime::now_utc() - Duration::hours(24);
//!
//! // Query recent readings with pagination
//! let query = ReadingQuery::new()
//!     .location(1)
//!     .since(yesterday)
//!     .limit(50)
//!     .offset(0);
//!
//! let readings = store.query_readings(&query)?;
//! # Ok::<(), stratus_store::Error>(())
//! ```

use time::OffsetDateTime;

/// Fluent query builder for stored readings.
///
/// Use this to construct queries for [`Store::query_readings`](crate::Store::query_readings).
/// All filter methods are optional and can be chained in any order.
///
/// By default, queries return results ordered by `recorded_at` ascending
/// (oldest first), so a result set reads as a chronological series.
///
/// # Example
///
/// ```
/// use stratus_store::ReadingQuery;
/// use time::{Duration, OffsetDateTime};
///
/// let now = OffsetDateTime::now_utc();
///
/// // Query last hour's readings for a location
/// let query = ReadingQuery::new()
///     .location(1)
///     .since(now - Duration::hours(1))
///     .limit(100);
///
/// // Query with pagination
/// let page_2 = ReadingQuery::new()
///     .location(1)
///     .limit(50)
///     .offset(50);
///
/// // Query newest first (most recent readings at the top)
/// let recent = ReadingQuery::new()
///     .location(1)
///     .newest_first();
/// ```
#[derive(Debug, Default, Clone)]
pub struct ReadingQuery {
    /// Filter by location ID.
    pub location_id: Option<i64>,
    /// Include only readings recorded at or after this time.
    pub since: Option<OffsetDateTime>,
    /// Include only readings recorded at or before this time.
    pub until: Option<OffsetDateTime>,
    /// Include only readings recorded strictly before this time.
    pub before: Option<OffsetDateTime>,
    /// Maximum number of results.
    pub limit: Option<u32>,
    /// Offset for pagination.
    pub offset: Option<u32>,
    /// Order by recorded_at descending instead of ascending.
    pub newest_first: bool,
}

impl ReadingQuery {
    /// Create a new query with default settings.
    ///
    /// Default behavior:
    /// - No location filter (all locations)
    /// - No time range filter
    /// - No limit (all matching records)
    /// - Ordered chronologically (oldest first)
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter by location ID.
    ///
    /// Only include readings recorded for the specified location.
    pub fn location(mut self, location_id: i64) -> Self {
        self.location_id = Some(location_id);
        self
    }

    /// Filter to readings recorded at or after this time.
    ///
    /// Useful for querying "last N hours" or "since last sync".
    pub fn since(mut self, time: OffsetDateTime) -> Self {
        self.since = Some(time);
        self
    }

    /// Filter to readings recorded at or before this time.
    ///
    /// Use with `since()` to query an inclusive time span.
    pub fn until(mut self, time: OffsetDateTime) -> Self {
        self.until = Some(time);
        self
    }

    /// Filter to readings recorded strictly before this time.
    ///
    /// Unlike `until()`, the bound itself is excluded. Use with `since()`
    /// to query a half-open window such as a calendar month or year.
    pub fn before(mut self, time: OffsetDateTime) -> Self {
        self.before = Some(time);
        self
    }

    /// Limit the maximum number of results returned.
    ///
    /// Use with `offset()` for pagination.
    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Skip the first N results.
    ///
    /// Use with `limit()` for pagination. For example, to get page 2
    /// with 50 items per page: `.limit(50).offset(50)`.
    pub fn offset(mut self, offset: u32) -> Self {
        self.offset = Some(offset);
        self
    }

    /// Order results by newest first (descending by `recorded_at`).
    ///
    /// By default, queries return a chronological series. Use this when
    /// showing the most recent readings, for example in a dashboard feed.
    pub fn newest_first(mut self) -> Self {
        self.newest_first = true;
        self
    }

    /// Build the SQL WHERE clause and parameters.
    pub(crate) fn build_where(&self) -> (String, Vec<Box<dyn rusqlite::ToSql>>) {
        let mut conditions = Vec::new();
        let mut params: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(location_id) = self.location_id {
            conditions.push("location_id = ?");
            params.push(Box::new(location_id));
        }

        if let Some(since) = self.since {
            conditions.push("recorded_at >= ?");
            params.push(Box::new(since.unix_timestamp()));
        }

        if let Some(until) = self.until {
            conditions.push("recorded_at <= ?");
            params.push(Box::new(until.unix_timestamp()));
        }

        if let Some(before) = self.before {
            conditions.push("recorded_at < ?");
            params.push(Box::new(before.unix_timestamp()));
        }

        let where_clause = if conditions.is_empty() {
            String::new()
        } else {
            format!("WHERE {}", conditions.join(" AND "))
        };

        (where_clause, params)
    }

    /// Build the full SQL query.
    pub(crate) fn build_sql(&self) -> String {
        let (where_clause, _) = self.build_where();
        let order = if self.newest_first { "DESC" } else { "ASC" };

        let mut sql = format!(
            "SELECT id, location_id, recorded_at, summary, description, \
             temperature, pressure, humidity, wind_speed, wind_direction \
             FROM readings {} ORDER BY recorded_at {}",
            where_clause, order
        );

        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        if let Some(offset) = self.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }

        sql
    }
}
