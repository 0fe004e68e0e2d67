//! Main store implementation.

use std::collections::{HashMap, HashSet};
use std::path::Path;

use rusqlite::{Connection, OptionalExtension};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::{debug, info};

use stratus_types::{LocationInfo, Reading};

use crate::error::{Error, Result};
use crate::models::{StoredLocation, StoredReading};
use crate::queries::ReadingQuery;
use crate::schema;

/// SQLite-based store for weather observations.
pub struct Store {
    conn: Connection,
}

impl Store {
    /// Open or create a database at the given path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        // Create parent directories if needed
        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| Error::CreateDirectory {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        info!("Opening database at {}", path.display());
        let conn = Connection::open(path)?;

        // Enable foreign keys and WAL mode for better performance
        conn.execute_batch(
            "PRAGMA foreign_keys = ON;
             PRAGMA journal_mode = WAL;
             PRAGMA synchronous = NORMAL;",
        )?;

        // Initialize schema
        schema::initialize(&conn)?;

        Ok(Self { conn })
    }

    /// Open the default database location.
    pub fn open_default() -> Result<Self> {
        Self::open(crate::default_db_path())
    }

    /// Open an in-memory database (for testing).
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        schema::initialize(&conn)?;
        Ok(Self { conn })
    }

    // === Location operations ===

    /// Register a location, or return the existing entry with the same name.
    ///
    /// Location rows are immutable after insert. Registering a name that
    /// already exists leaves the stored row untouched and returns it.
    pub fn register_location(&self, info: &LocationInfo) -> Result<StoredLocation> {
        let now = OffsetDateTime::now_utc().unix_timestamp();

        self.conn.execute(
            "INSERT OR IGNORE INTO locations (name, site_code, country, registered_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![info.name, info.site_code, info.country, now],
        )?;

        self.location_by_name(&info.name)?
            .ok_or_else(|| Error::LocationNotFound(info.name.clone()))
    }

    /// Register a batch of locations, skipping names that already exist.
    ///
    /// Returns the number of locations actually inserted.
    pub fn register_locations(&self, infos: &[LocationInfo]) -> Result<usize> {
        let now = OffsetDateTime::now_utc().unix_timestamp();
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO locations (name, site_code, country, registered_at)
                 VALUES (?1, ?2, ?3, ?4)",
            )?;

            for info in infos {
                inserted +=
                    stmt.execute(rusqlite::params![info.name, info.site_code, info.country, now])?;
            }
        }

        tx.commit()?;

        info!("Registered {} new locations", inserted);
        Ok(inserted)
    }

    /// Get a location by name.
    pub fn location_by_name(&self, name: &str) -> Result<Option<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, site_code, country, registered_at
             FROM locations WHERE name = ?",
        )?;

        let location = stmt.query_row([name], map_location_row).optional()?;

        Ok(location)
    }

    /// List all locations, ordered by name.
    pub fn all_locations(&self) -> Result<Vec<StoredLocation>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, name, site_code, country, registered_at
             FROM locations ORDER BY name",
        )?;

        let locations = stmt
            .query_map([], map_location_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(locations)
    }

    /// Count registered locations.
    pub fn count_locations(&self) -> Result<u64> {
        let count: i64 = self
            .conn
            .query_row("SELECT COUNT(*) FROM locations", [], |row| row.get(0))?;

        Ok(count as u64)
    }
}

fn map_location_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredLocation> {
    Ok(StoredLocation {
        id: row.get(0)?,
        name: row.get(1)?,
        site_code: row.get::<_, i64>(2)? as u32,
        country: row.get(3)?,
        registered_at: OffsetDateTime::from_unix_timestamp(row.get(4)?).unwrap(),
    })
}

fn map_reading_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<StoredReading> {
    Ok(StoredReading {
        id: row.get(0)?,
        location_id: row.get(1)?,
        recorded_at: OffsetDateTime::from_unix_timestamp(row.get(2)?).unwrap(),
        summary: row.get(3)?,
        description: row.get(4)?,
        temperature: row.get(5)?,
        pressure: row.get(6)?,
        humidity: row.get(7)?,
        wind_speed: row.get(8)?,
        wind_direction: row.get(9)?,
    })
}

// Reading operations
impl Store {
    /// Insert a reading, or return the stored one at the same timestamp.
    ///
    /// The `(location_id, recorded_at)` pair is unique. Inserting a reading
    /// whose timestamp is already stored is a no-op that returns the row
    /// already present, so repeated inserts never duplicate a series.
    pub fn insert_reading(&self, location_id: i64, reading: &Reading) -> Result<StoredReading> {
        self.conn.execute(
            "INSERT OR IGNORE INTO readings (location_id, recorded_at, summary, description,
             temperature, pressure, humidity, wind_speed, wind_direction)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            rusqlite::params![
                location_id,
                reading.recorded_at.unix_timestamp(),
                reading.summary,
                reading.description,
                reading.temperature,
                reading.pressure,
                reading.humidity,
                reading.wind_speed,
                reading.wind_direction,
            ],
        )?;

        self.reading_at(location_id, reading.recorded_at)?
            .ok_or(Error::Database(rusqlite::Error::QueryReturnedNoRows))
    }

    /// Insert a batch of readings in one transaction, skipping duplicates.
    ///
    /// Returns the number of readings actually inserted. Rows whose
    /// timestamp is already stored for the location are left untouched.
    /// Either the whole batch commits or none of it does.
    pub fn insert_readings(&self, location_id: i64, readings: &[Reading]) -> Result<usize> {
        let tx = self.conn.unchecked_transaction()?;
        let mut inserted = 0;

        {
            let mut stmt = tx.prepare(
                "INSERT OR IGNORE INTO readings (location_id, recorded_at, summary, description,
                 temperature, pressure, humidity, wind_speed, wind_direction)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
            )?;

            for reading in readings {
                inserted += stmt.execute(rusqlite::params![
                    location_id,
                    reading.recorded_at.unix_timestamp(),
                    reading.summary,
                    reading.description,
                    reading.temperature,
                    reading.pressure,
                    reading.humidity,
                    reading.wind_speed,
                    reading.wind_direction,
                ])?;
            }
        }

        tx.commit()?;

        info!(
            "Inserted {} of {} readings for location {}",
            inserted,
            readings.len(),
            location_id
        );
        Ok(inserted)
    }

    /// Query readings with filters.
    pub fn query_readings(&self, query: &ReadingQuery) -> Result<Vec<StoredReading>> {
        let sql = query.build_sql();
        let (_, params) = query.build_where();

        debug!("Executing query: {}", sql);

        let params_ref: Vec<&dyn rusqlite::ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = self.conn.prepare(&sql)?;
        let readings = stmt
            .query_map(params_ref.as_slice(), map_reading_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(readings)
    }

    /// Get the most recent reading for a location.
    pub fn latest_reading(&self, location_id: i64) -> Result<Option<StoredReading>> {
        let query = ReadingQuery::new()
            .location(location_id)
            .newest_first()
            .limit(1);
        let mut readings = self.query_readings(&query)?;
        Ok(readings.pop())
    }

    /// Get the earliest reading for a location.
    pub fn oldest_reading(&self, location_id: i64) -> Result<Option<StoredReading>> {
        let query = ReadingQuery::new().location(location_id).limit(1);
        let mut readings = self.query_readings(&query)?;
        Ok(readings.pop())
    }

    /// Get the reading recorded at an exact timestamp, if one is stored.
    pub fn reading_at(
        &self,
        location_id: i64,
        recorded_at: OffsetDateTime,
    ) -> Result<Option<StoredReading>> {
        let mut stmt = self.conn.prepare(
            "SELECT id, location_id, recorded_at, summary, description,
             temperature, pressure, humidity, wind_speed, wind_direction
             FROM readings WHERE location_id = ? AND recorded_at = ?",
        )?;

        let reading = stmt
            .query_row(
                rusqlite::params![location_id, recorded_at.unix_timestamp()],
                map_reading_row,
            )
            .optional()?;

        Ok(reading)
    }

    /// Collect the timestamps already stored for a location within a span.
    ///
    /// Both bounds are inclusive. This is the cheap side of series merging:
    /// an incoming series is diffed against this set so only unseen
    /// timestamps are inserted.
    pub fn recorded_at_in_span(
        &self,
        location_id: i64,
        start: OffsetDateTime,
        end: OffsetDateTime,
    ) -> Result<HashSet<OffsetDateTime>> {
        let mut stmt = self.conn.prepare(
            "SELECT recorded_at FROM readings
             WHERE location_id = ? AND recorded_at >= ? AND recorded_at <= ?",
        )?;

        let timestamps = stmt
            .query_map(
                rusqlite::params![location_id, start.unix_timestamp(), end.unix_timestamp()],
                |row| Ok(OffsetDateTime::from_unix_timestamp(row.get(0)?).unwrap()),
            )?
            .collect::<std::result::Result<HashSet<_>, _>>()?;

        Ok(timestamps)
    }

    /// Count readings, optionally for a single location.
    pub fn count_readings(&self, location_id: Option<i64>) -> Result<u64> {
        let count: i64 = match location_id {
            Some(id) => self.conn.query_row(
                "SELECT COUNT(*) FROM readings WHERE location_id = ?",
                [id],
                |row| row.get(0),
            )?,
            None => self
                .conn
                .query_row("SELECT COUNT(*) FROM readings", [], |row| row.get(0))?,
        };

        Ok(count as u64)
    }
}

/// Summary of a location's stored series.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct SeriesStats {
    /// Location the series belongs to.
    pub location_id: i64,
    /// Number of stored readings.
    pub count: u64,
    /// Timestamp of the earliest reading, if any are stored.
    #[serde(with = "time::serde::rfc3339::option")]
    pub first_recorded_at: Option<OffsetDateTime>,
    /// Timestamp of the most recent reading, if any are stored.
    #[serde(with = "time::serde::rfc3339::option")]
    pub last_recorded_at: Option<OffsetDateTime>,
}

// Maintenance operations
impl Store {
    /// Summarize the stored series for a location.
    pub fn series_stats(&self, location_id: i64) -> Result<SeriesStats> {
        let (count, first, last): (i64, Option<i64>, Option<i64>) = self.conn.query_row(
            "SELECT COUNT(*), MIN(recorded_at), MAX(recorded_at)
             FROM readings WHERE location_id = ?",
            [location_id],
            |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)),
        )?;

        Ok(SeriesStats {
            location_id,
            count: count as u64,
            first_recorded_at: first.map(|ts| OffsetDateTime::from_unix_timestamp(ts).unwrap()),
            last_recorded_at: last.map(|ts| OffsetDateTime::from_unix_timestamp(ts).unwrap()),
        })
    }

    /// Delete all stored readings and locations.
    pub fn clear_all(&self) -> Result<()> {
        self.conn.execute("DELETE FROM readings", [])?;
        self.conn.execute("DELETE FROM locations", [])?;
        info!("Cleared all stored data");
        Ok(())
    }
}

// Export operations
impl Store {
    /// Export readings matching a query as CSV.
    ///
    /// Location names are resolved into their own column so the export is
    /// readable without joining against the locations table.
    pub fn export_readings_csv(&self, query: &ReadingQuery) -> Result<String> {
        let readings = self.query_readings(query)?;
        let names: HashMap<i64, String> = self
            .all_locations()?
            .into_iter()
            .map(|l| (l.id, l.name))
            .collect();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record([
            "location",
            "recorded_at",
            "summary",
            "description",
            "temperature",
            "pressure",
            "humidity",
            "wind_speed",
            "wind_direction",
        ])?;

        for reading in &readings {
            let record = [
                names
                    .get(&reading.location_id)
                    .cloned()
                    .unwrap_or_default(),
                reading.recorded_at.format(&Rfc3339)?,
                reading.summary.clone(),
                reading.description.clone(),
                reading.temperature.to_string(),
                reading.pressure.to_string(),
                reading.humidity.to_string(),
                reading.wind_speed.to_string(),
                reading.wind_direction.to_string(),
            ];
            writer.write_record(&record)?;
        }

        let bytes = writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        Ok(String::from_utf8(bytes)?)
    }

    /// Export readings matching a query as pretty-printed JSON.
    pub fn export_readings_json(&self, query: &ReadingQuery) -> Result<String> {
        let readings = self.query_readings(query)?;
        Ok(serde_json::to_string_pretty(&readings)?)
    }
}
