//! Freshness reconciliation between the provider and the local store.
//!
//! The reconciler owns no state of its own: it borrows a [`Store`] and a
//! [`WeatherProvider`] and closes the gap between them on demand. The
//! central operation is [`Reconciler::ensure_current`], a single linear
//! read-compare-act pass:
//!
//! 1. resolve the location, registering it on first reference,
//! 2. fetch the provider's current reading,
//! 3. compare against the stored latest and either append the one reading
//!    or reconcile the whole year series.
//!
//! Which branch runs depends on the timestamp gap and the configured
//! [`StalenessPolicy`]: a small gap means the store lags by at most one
//! observation, while a gap at or beyond the threshold means intermediate
//! readings were missed and only a series merge can recover them. The
//! backfill branch never fetches the current reading a second time; it
//! re-reads the store after the merge.
//!
//! Nothing here schedules itself. Callers (a service poller, the CLI)
//! decide when reconciliation runs.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::error::{Error, Result};
use crate::policy::StalenessPolicy;
use stratus_provider::WeatherProvider;
use stratus_store::{Store, StoredLocation, StoredReading};
use stratus_types::Reading;

/// Outcome of [`Reconciler::ensure_current`].
#[derive(Debug, Clone, PartialEq)]
pub enum Refresh {
    /// Neither the store nor the provider knows the location; nothing was
    /// written.
    UnknownLocation,
    /// The store had no reading for the location; the fetched one is the
    /// first.
    First(StoredReading),
    /// The stored latest already matches the provider (or the provider
    /// returned an older observation); nothing was written.
    Current(StoredReading),
    /// The fetched reading landed on top of an otherwise fresh store.
    Appended(StoredReading),
    /// The store had fallen behind; the year series was merged back in.
    Backfilled {
        /// Readings inserted by the series merge.
        merged: usize,
        /// The store's latest reading after the merge.
        reading: StoredReading,
    },
}

impl Refresh {
    /// The reading the store now holds as latest, if the location exists.
    pub fn reading(&self) -> Option<&StoredReading> {
        match self {
            Refresh::UnknownLocation => None,
            Refresh::First(reading)
            | Refresh::Current(reading)
            | Refresh::Appended(reading)
            | Refresh::Backfilled { reading, .. } => Some(reading),
        }
    }
}

/// Counts from a series merge.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeReport {
    /// Readings in the fetched series.
    pub fetched: usize,
    /// Readings actually inserted; the rest were already stored.
    pub inserted: usize,
}

/// Counts from a [`Reconciler::register_locations`] pass.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RegisterReport {
    /// Location names the provider listed.
    pub discovered: usize,
    /// Locations newly registered.
    pub registered: usize,
}

/// Counts from a [`Reconciler::bootstrap`] run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct BootstrapReport {
    /// Outcome of the location registration pass.
    pub locations: RegisterReport,
    /// Readings inserted across all locations by the year merges.
    pub readings_inserted: usize,
}

/// Reconciles provider weather data into the local store.
///
/// Holds borrowed handles only; construct one wherever a store and a
/// provider are in scope. The provider parameter may be a concrete client
/// or `dyn WeatherProvider`.
pub struct Reconciler<'a, P: WeatherProvider + ?Sized> {
    store: &'a Store,
    provider: &'a P,
    policy: StalenessPolicy,
}

impl<'a, P: WeatherProvider + ?Sized> Reconciler<'a, P> {
    /// Create a reconciler over explicit store and provider handles.
    pub fn new(store: &'a Store, provider: &'a P, policy: StalenessPolicy) -> Self {
        Self {
            store,
            provider,
            policy,
        }
    }

    /// Bring the stored latest reading for `name` in line with the provider
    /// and report what happened.
    ///
    /// The pass is strictly linear: one location resolution, one current
    /// fetch, one decision. A stale store triggers a year-series merge
    /// followed by a store re-read, never a second provider fetch.
    ///
    /// Returns [`Refresh::UnknownLocation`] when neither side knows the
    /// location. Provider failures surface as errors with the store
    /// untouched.
    pub async fn ensure_current(&self, name: &str) -> Result<Refresh> {
        let location = match self.resolve_location(name).await? {
            Some(location) => location,
            None => return Ok(Refresh::UnknownLocation),
        };

        let fetched = self.provider.current_reading(name).await?;

        let stored = match self.store.latest_reading(location.id)? {
            Some(stored) => stored,
            None => {
                let reading = self.store.insert_reading(location.id, &fetched)?;
                info!("First reading for {} at {}", name, reading.recorded_at);
                return Ok(Refresh::First(reading));
            }
        };

        let gap = fetched.recorded_at - stored.recorded_at;
        if gap.is_zero() {
            debug!("{} is current at {}", name, stored.recorded_at);
            return Ok(Refresh::Current(stored));
        }
        if gap.is_negative() {
            // Provider clock skew: the fetched observation predates what we
            // already hold. Keep the stored one.
            debug!(
                "{}: provider returned {}, behind stored {}",
                name, fetched.recorded_at, stored.recorded_at
            );
            return Ok(Refresh::Current(stored));
        }
        if !self.policy.is_stale(gap) {
            let reading = self.store.insert_reading(location.id, &fetched)?;
            debug!("Appended reading for {} at {}", name, reading.recorded_at);
            return Ok(Refresh::Appended(reading));
        }

        info!("{} is stale by {}, merging year series", name, gap);
        let report = self
            .ensure_year_coverage(name, fetched.recorded_at.year())
            .await?;

        // The merge only adds rows, so a latest reading still exists.
        let reading = self.store.latest_reading(location.id)?.unwrap_or(stored);
        Ok(Refresh::Backfilled {
            merged: report.inserted,
            reading,
        })
    }

    /// Fetch the provider's series for `year` and merge it into the store.
    ///
    /// The location must already be registered; [`Self::ensure_current`]
    /// and [`Self::register_locations`] introduce new names.
    pub async fn ensure_year_coverage(&self, name: &str, year: i32) -> Result<MergeReport> {
        let location = self
            .store
            .location_by_name(name)?
            .ok_or_else(|| Error::UnknownLocation(name.to_string()))?;

        let series = self.provider.year_series(name, year).await?;
        self.merge_series(location.id, &series)
    }

    /// Merge a fetched series into the store, inserting only readings whose
    /// timestamps are not already present.
    ///
    /// One range read covers the whole span of the series, so the cost is a
    /// single scan plus one transactional batch insert. Merging the same
    /// series twice inserts nothing the second time; the store's uniqueness
    /// constraint backs the same guarantee against concurrent writers. An
    /// empty series never touches the store.
    pub fn merge_series(&self, location_id: i64, series: &[Reading]) -> Result<MergeReport> {
        if series.is_empty() {
            return Ok(MergeReport::default());
        }

        // The series carries no ordering guarantee; scan for the span.
        let mut span_start = series[0].recorded_at;
        let mut span_end = series[0].recorded_at;
        for reading in series {
            span_start = span_start.min(reading.recorded_at);
            span_end = span_end.max(reading.recorded_at);
        }

        let present = self
            .store
            .recorded_at_in_span(location_id, span_start, span_end)?;
        let absent: Vec<Reading> = series
            .iter()
            .filter(|reading| !present.contains(&reading.recorded_at))
            .cloned()
            .collect();

        let inserted = if absent.is_empty() {
            debug!(
                "Series of {} readings already covered for location {}",
                series.len(),
                location_id
            );
            0
        } else {
            self.store.insert_readings(location_id, &absent)?
        };

        Ok(MergeReport {
            fetched: series.len(),
            inserted,
        })
    }

    /// Register every location the provider lists that the store does not
    /// already hold.
    ///
    /// Detail fetches are limited to the missing names, so re-running the
    /// pass against a fully registered store costs a single listing call.
    pub async fn register_locations(&self) -> Result<RegisterReport> {
        let names = self.provider.location_names().await?;
        let known: HashSet<String> = self
            .store
            .all_locations()?
            .into_iter()
            .map(|location| location.name)
            .collect();

        let mut missing = Vec::new();
        for name in &names {
            if known.contains(name) {
                continue;
            }
            match self.provider.location_detail(name).await? {
                Some(info) => missing.push(info),
                None => debug!("Provider listed {} but returned no detail", name),
            }
        }

        let registered = self.store.register_locations(&missing)?;
        info!(
            "Registered {} of {} provider locations",
            registered,
            names.len()
        );

        Ok(RegisterReport {
            discovered: names.len(),
            registered,
        })
    }

    /// One-shot setup: register all provider locations, then make sure each
    /// one has the given year's series.
    ///
    /// Safe to re-run; a second pass registers nothing and merges nothing.
    pub async fn bootstrap(&self, year: i32) -> Result<BootstrapReport> {
        let locations = self.register_locations().await?;

        let mut readings_inserted = 0;
        for location in self.store.all_locations()? {
            let report = self.ensure_year_coverage(&location.name, year).await?;
            readings_inserted += report.inserted;
        }

        info!(
            "Bootstrap done: {} locations registered, {} readings inserted",
            locations.registered, readings_inserted
        );

        Ok(BootstrapReport {
            locations,
            readings_inserted,
        })
    }

    async fn resolve_location(&self, name: &str) -> Result<Option<StoredLocation>> {
        if let Some(location) = self.store.location_by_name(name)? {
            return Ok(Some(location));
        }

        // First reference to a name the provider recognizes registers it.
        match self.provider.location_detail(name).await? {
            Some(info) => {
                info!("Registering {} on first reference", info.name);
                Ok(Some(self.store.register_location(&info)?))
            }
            None => Ok(None),
        }
    }
}
