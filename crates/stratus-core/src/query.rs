//! Temporal window queries over stored readings.
//!
//! Windows are computed in UTC and answered straight from the store;
//! nothing here talks to the provider. Absence is expressed as emptiness:
//! an unknown location name, an out-of-range selector, or an inverted span
//! all yield an empty series rather than an error, so callers can render
//! "no data" without branching on failures.

use time::{Date, Duration, Month, OffsetDateTime};

use crate::error::Result;
use stratus_store::{ReadingQuery, Store, StoredReading};

/// Read-only calendar-window queries over a [`Store`].
///
/// All results are ascending by `recorded_at`.
pub struct WindowQueries<'a> {
    store: &'a Store,
}

impl<'a> WindowQueries<'a> {
    /// Create a query engine over a store handle.
    pub fn new(store: &'a Store) -> Self {
        Self { store }
    }

    /// Readings for `name` within calendar year `year`.
    ///
    /// The window is `[Jan 1 year, Jan 1 year+1)`, so readings from later
    /// years never leak in.
    pub fn by_year(&self, name: &str, year: i32) -> Result<Vec<StoredReading>> {
        let location = match self.store.location_by_name(name)? {
            Some(location) => location,
            None => return Ok(Vec::new()),
        };
        let (start, end) = match year_window(year) {
            Some(window) => window,
            None => return Ok(Vec::new()),
        };

        let query = ReadingQuery::new()
            .location(location.id)
            .since(start)
            .before(end);
        Ok(self.store.query_readings(&query)?)
    }

    /// Readings across all locations within calendar year `year`.
    ///
    /// Years outside `1..=current` yield an empty series.
    pub fn by_year_all(&self, year: i32) -> Result<Vec<StoredReading>> {
        let current = OffsetDateTime::now_utc().year();
        if !(1..=current).contains(&year) {
            return Ok(Vec::new());
        }
        let (start, end) = match year_window(year) {
            Some(window) => window,
            None => return Ok(Vec::new()),
        };

        let query = ReadingQuery::new().since(start).before(end);
        Ok(self.store.query_readings(&query)?)
    }

    /// Readings for `name` within `month` of the current year.
    ///
    /// The window covers the whole month including its last day. Months
    /// outside `1..=12` yield an empty series.
    pub fn by_month(&self, name: &str, month: u8) -> Result<Vec<StoredReading>> {
        let location = match self.store.location_by_name(name)? {
            Some(location) => location,
            None => return Ok(Vec::new()),
        };
        let month = match Month::try_from(month) {
            Ok(month) => month,
            Err(_) => return Ok(Vec::new()),
        };

        let year = OffsetDateTime::now_utc().year();
        let start = month_start(year, month);
        let end = if month == Month::December {
            year_start(year + 1)
        } else {
            month_start(year, month.next())
        };
        let (start, end) = match (start, end) {
            (Some(start), Some(end)) => (start, end),
            _ => return Ok(Vec::new()),
        };

        let query = ReadingQuery::new()
            .location(location.id)
            .since(start)
            .before(end);
        Ok(self.store.query_readings(&query)?)
    }

    /// Readings for `name` within week `week` of the current year.
    ///
    /// Week `w` is the 7-day window starting `Jan 1 + (w-1)*7` days at
    /// midnight and running through the seventh day at 23:59:59. Weeks
    /// outside `1..=53` yield an empty series.
    pub fn by_week(&self, name: &str, week: u8) -> Result<Vec<StoredReading>> {
        let location = match self.store.location_by_name(name)? {
            Some(location) => location,
            None => return Ok(Vec::new()),
        };
        if !(1..=53).contains(&week) {
            return Ok(Vec::new());
        }
        let jan_first = match year_start(OffsetDateTime::now_utc().year()) {
            Some(jan_first) => jan_first,
            None => return Ok(Vec::new()),
        };

        let start = jan_first + Duration::days(i64::from(week - 1) * 7);
        let until = start + Duration::days(7) - Duration::seconds(1);

        let query = ReadingQuery::new()
            .location(location.id)
            .since(start)
            .until(until);
        Ok(self.store.query_readings(&query)?)
    }

    /// Readings across all locations from the last `days` days.
    ///
    /// Values outside `1..=365` yield an empty series.
    pub fn by_day_difference(&self, days: u16) -> Result<Vec<StoredReading>> {
        if !(1..=365).contains(&days) {
            return Ok(Vec::new());
        }

        let since = OffsetDateTime::now_utc() - Duration::days(i64::from(days));
        let query = ReadingQuery::new().since(since);
        Ok(self.store.query_readings(&query)?)
    }

    /// Readings for `name` between `from` and `to`, both ends inclusive.
    ///
    /// An inverted span (`from > to`) yields an empty series.
    pub fn by_time_span(
        &self,
        name: &str,
        from: OffsetDateTime,
        to: OffsetDateTime,
    ) -> Result<Vec<StoredReading>> {
        if from > to {
            return Ok(Vec::new());
        }
        let location = match self.store.location_by_name(name)? {
            Some(location) => location,
            None => return Ok(Vec::new()),
        };

        let query = ReadingQuery::new()
            .location(location.id)
            .since(from)
            .until(to);
        Ok(self.store.query_readings(&query)?)
    }
}

fn year_start(year: i32) -> Option<OffsetDateTime> {
    let date = Date::from_calendar_date(year, Month::January, 1).ok()?;
    Some(date.midnight().assume_utc())
}

fn year_window(year: i32) -> Option<(OffsetDateTime, OffsetDateTime)> {
    Some((year_start(year)?, year_start(year.checked_add(1)?)?))
}

fn month_start(year: i32, month: Month) -> Option<OffsetDateTime> {
    let date = Date::from_calendar_date(year, month, 1).ok()?;
    Some(date.midnight().assume_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use stratus_types::{LocationInfo, Reading};
    use time::macros::datetime;

    fn at(year: i32, month: u8, day: u8, hour: u8, minute: u8, second: u8) -> OffsetDateTime {
        Date::from_calendar_date(year, Month::try_from(month).unwrap(), day)
            .unwrap()
            .with_hms(hour, minute, second)
            .unwrap()
            .assume_utc()
    }

    fn this_year() -> i32 {
        OffsetDateTime::now_utc().year()
    }

    fn reading_at(recorded_at: OffsetDateTime) -> Reading {
        Reading::builder()
            .recorded_at(recorded_at)
            .summary("Clear")
            .description("clear sky")
            .temperature(4.0)
            .pressure(1017.0)
            .humidity(61.0)
            .wind_speed(2.1)
            .wind_direction(180.0)
            .build()
    }

    fn store_with_davos() -> (Store, i64) {
        let store = Store::open_in_memory().unwrap();
        let location = store
            .register_location(&LocationInfo::new("Davos", 7260, "CH"))
            .unwrap();
        (store, location.id)
    }

    #[test]
    fn test_by_year_window_is_bounded() {
        let (store, id) = store_with_davos();
        for ts in [
            datetime!(2023-12-31 23:59:59 UTC),
            datetime!(2024-01-01 00:00:00 UTC),
            datetime!(2024-06-15 12:00:00 UTC),
            datetime!(2025-01-01 00:00:00 UTC),
        ] {
            store.insert_reading(id, &reading_at(ts)).unwrap();
        }

        let queries = WindowQueries::new(&store);
        let readings = queries.by_year("Davos", 2024).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].recorded_at, datetime!(2024-01-01 00:00:00 UTC));
        assert_eq!(readings[1].recorded_at, datetime!(2024-06-15 12:00:00 UTC));
    }

    #[test]
    fn test_by_year_unknown_location_is_empty() {
        let (store, _) = store_with_davos();
        let queries = WindowQueries::new(&store);
        assert!(queries.by_year("Atlantis", 2024).unwrap().is_empty());
    }

    #[test]
    fn test_by_year_all_spans_locations() {
        let (store, davos) = store_with_davos();
        let sion = store
            .register_location(&LocationInfo::new("Sion", 1950, "CH"))
            .unwrap();

        let year = this_year();
        store
            .insert_reading(davos, &reading_at(at(year, 2, 1, 12, 0, 0)))
            .unwrap();
        store
            .insert_reading(sion.id, &reading_at(at(year, 2, 1, 6, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        let readings = queries.by_year_all(year).unwrap();

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].location_id, sion.id);
        assert_eq!(readings[1].location_id, davos);
    }

    #[test]
    fn test_by_year_all_rejects_out_of_range_years() {
        let (store, id) = store_with_davos();
        store
            .insert_reading(id, &reading_at(at(this_year(), 2, 1, 12, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert!(queries.by_year_all(0).unwrap().is_empty());
        assert!(queries.by_year_all(this_year() + 1).unwrap().is_empty());
    }

    #[test]
    fn test_by_month_includes_the_last_day() {
        let (store, id) = store_with_davos();
        let year = this_year();
        store
            .insert_reading(id, &reading_at(at(year, 3, 1, 0, 0, 0)))
            .unwrap();
        store
            .insert_reading(id, &reading_at(at(year, 3, 31, 23, 0, 0)))
            .unwrap();
        store
            .insert_reading(id, &reading_at(at(year, 4, 1, 0, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        let march = queries.by_month("Davos", 3).unwrap();

        assert_eq!(march.len(), 2);
        assert_eq!(march[1].recorded_at, at(year, 3, 31, 23, 0, 0));
    }

    #[test]
    fn test_by_month_december_rolls_into_next_year() {
        let (store, id) = store_with_davos();
        let year = this_year();
        store
            .insert_reading(id, &reading_at(at(year, 12, 31, 23, 59, 59)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert_eq!(queries.by_month("Davos", 12).unwrap().len(), 1);
    }

    #[test]
    fn test_by_month_invalid_month_is_empty() {
        let (store, id) = store_with_davos();
        store
            .insert_reading(id, &reading_at(at(this_year(), 3, 1, 0, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert!(queries.by_month("Davos", 0).unwrap().is_empty());
        assert!(queries.by_month("Davos", 13).unwrap().is_empty());
    }

    #[test]
    fn test_by_week_windows() {
        let (store, id) = store_with_davos();
        let year = this_year();
        store
            .insert_reading(id, &reading_at(at(year, 1, 1, 12, 0, 0)))
            .unwrap();
        store
            .insert_reading(id, &reading_at(at(year, 1, 7, 23, 59, 59)))
            .unwrap();
        store
            .insert_reading(id, &reading_at(at(year, 1, 8, 0, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert_eq!(queries.by_week("Davos", 1).unwrap().len(), 2);
        assert_eq!(queries.by_week("Davos", 2).unwrap().len(), 1);
    }

    #[test]
    fn test_by_week_invalid_week_is_empty() {
        let (store, id) = store_with_davos();
        store
            .insert_reading(id, &reading_at(at(this_year(), 1, 1, 12, 0, 0)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert!(queries.by_week("Davos", 0).unwrap().is_empty());
        assert!(queries.by_week("Davos", 54).unwrap().is_empty());
    }

    #[test]
    fn test_by_day_difference_boundaries() {
        let (store, id) = store_with_davos();
        let now = OffsetDateTime::now_utc();
        store
            .insert_reading(id, &reading_at(now - Duration::hours(2)))
            .unwrap();
        store
            .insert_reading(id, &reading_at(now - Duration::days(3)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert_eq!(queries.by_day_difference(1).unwrap().len(), 1);
        assert_eq!(queries.by_day_difference(5).unwrap().len(), 2);
        assert_eq!(queries.by_day_difference(365).unwrap().len(), 2);
    }

    #[test]
    fn test_by_day_difference_rejects_out_of_range() {
        let (store, id) = store_with_davos();
        store
            .insert_reading(id, &reading_at(OffsetDateTime::now_utc()))
            .unwrap();

        let queries = WindowQueries::new(&store);
        assert!(queries.by_day_difference(0).unwrap().is_empty());
        assert!(queries.by_day_difference(400).unwrap().is_empty());
    }

    #[test]
    fn test_by_time_span_is_inclusive() {
        let (store, id) = store_with_davos();
        for ts in [
            datetime!(2024-05-01 10:00:00 UTC),
            datetime!(2024-05-01 11:00:00 UTC),
            datetime!(2024-05-01 12:00:00 UTC),
        ] {
            store.insert_reading(id, &reading_at(ts)).unwrap();
        }

        let queries = WindowQueries::new(&store);
        let readings = queries
            .by_time_span(
                "Davos",
                datetime!(2024-05-01 10:00:00 UTC),
                datetime!(2024-05-01 11:00:00 UTC),
            )
            .unwrap();

        assert_eq!(readings.len(), 2);
    }

    #[test]
    fn test_by_time_span_inverted_is_empty() {
        let (store, id) = store_with_davos();
        store
            .insert_reading(id, &reading_at(datetime!(2024-05-01 10:00:00 UTC)))
            .unwrap();

        let queries = WindowQueries::new(&store);
        let readings = queries
            .by_time_span(
                "Davos",
                datetime!(2024-05-01 12:00:00 UTC),
                datetime!(2024-05-01 10:00:00 UTC),
            )
            .unwrap();

        assert!(readings.is_empty());
    }

    #[test]
    fn test_by_time_span_unknown_location_is_empty() {
        let (store, _) = store_with_davos();
        let queries = WindowQueries::new(&store);
        let readings = queries
            .by_time_span(
                "Atlantis",
                datetime!(2024-05-01 10:00:00 UTC),
                datetime!(2024-05-01 12:00:00 UTC),
            )
            .unwrap();

        assert!(readings.is_empty());
    }
}
