//! Integration tests for stratus-core.
//!
//! End-to-end reconciliation scenarios against an in-memory store and a
//! mock provider; no network or on-disk state required.

use stratus_core::{Reconciler, Refresh, StalenessPolicy};
use stratus_provider::MockProvider;
use stratus_store::Store;
use stratus_types::{LocationInfo, Reading};
use time::macros::datetime;
use time::{Duration, OffsetDateTime};

fn reading_at(recorded_at: OffsetDateTime) -> Reading {
    reading_with_temp(recorded_at, -3.2)
}

fn reading_with_temp(recorded_at: OffsetDateTime, temperature: f64) -> Reading {
    Reading::builder()
        .recorded_at(recorded_at)
        .summary("Snow")
        .description("light snow")
        .temperature(temperature)
        .pressure(1021.0)
        .humidity(82.0)
        .wind_speed(1.4)
        .wind_direction(270.0)
        .build()
}

fn davos() -> LocationInfo {
    LocationInfo::new("Davos", 7260, "CH")
}

async fn fixture() -> (Store, MockProvider) {
    let store = Store::open_in_memory().unwrap();
    store.register_location(&davos()).unwrap();

    let provider = MockProvider::new();
    provider.add_location(davos()).await;
    (store, provider)
}

/// An empty store takes the fetched current reading as its first entry.
#[tokio::test]
async fn test_first_fetch_inserts_single_reading() {
    let (store, provider) = fixture().await;
    let now = datetime!(2024-01-15 09:00:00 UTC);
    provider.set_current("Davos", reading_at(now)).await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::First(reading) => assert_eq!(reading.recorded_at, now),
        other => panic!("expected First, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 1);
}

/// Equal timestamps mean no write; the stored row is returned untouched.
#[tokio::test]
async fn test_equal_timestamps_is_noop() {
    let (store, provider) = fixture().await;
    let ts = datetime!(2024-01-15 09:00:00 UTC);

    let location = store.location_by_name("Davos").unwrap().unwrap();
    store
        .insert_reading(location.id, &reading_with_temp(ts, -3.2))
        .unwrap();
    // Same timestamp, different payload: the stored value wins.
    provider
        .set_current("Davos", reading_with_temp(ts, 20.0))
        .await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::Current(reading) => {
            assert_eq!(reading.recorded_at, ts);
            assert_eq!(reading.temperature, -3.2);
        }
        other => panic!("expected Current, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 1);
}

/// A gap just under the threshold appends exactly one reading.
#[tokio::test]
async fn test_39_minute_gap_appends() {
    let (store, provider) = fixture().await;
    let stored_at = datetime!(2024-01-15 09:00:00 UTC);
    let fetched_at = stored_at + Duration::minutes(39);

    let location = store.location_by_name("Davos").unwrap().unwrap();
    store
        .insert_reading(location.id, &reading_at(stored_at))
        .unwrap();
    provider.set_current("Davos", reading_at(fetched_at)).await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::Appended(reading) => assert_eq!(reading.recorded_at, fetched_at),
        other => panic!("expected Appended, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 2);
    // The append path never asks the provider for a series.
    assert_eq!(provider.series_fetch_count(), 0);
}

/// A gap at the threshold switches from append to year backfill.
#[tokio::test]
async fn test_40_minute_gap_backfills() {
    let (store, provider) = fixture().await;
    let stored_at = datetime!(2024-01-15 09:00:00 UTC);
    let fetched_at = stored_at + Duration::minutes(40);

    let location = store.location_by_name("Davos").unwrap().unwrap();
    store
        .insert_reading(location.id, &reading_at(stored_at))
        .unwrap();
    provider.set_current("Davos", reading_at(fetched_at)).await;
    provider
        .set_year_series(
            "Davos",
            2024,
            vec![
                reading_at(stored_at),
                reading_at(stored_at + Duration::minutes(20)),
                reading_at(fetched_at),
            ],
        )
        .await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::Backfilled { merged, reading } => {
            assert_eq!(merged, 2);
            assert_eq!(reading.recorded_at, fetched_at);
        }
        other => panic!("expected Backfilled, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 3);

    // One current fetch, one series fetch: the backfill re-reads the store
    // instead of asking the provider again.
    assert_eq!(provider.current_fetch_count(), 1);
    assert_eq!(provider.series_fetch_count(), 1);
}

/// A provider observation older than the stored latest is ignored.
#[tokio::test]
async fn test_clock_skew_keeps_stored() {
    let (store, provider) = fixture().await;
    let stored_at = datetime!(2024-01-15 09:00:00 UTC);

    let location = store.location_by_name("Davos").unwrap().unwrap();
    store
        .insert_reading(location.id, &reading_at(stored_at))
        .unwrap();
    provider
        .set_current("Davos", reading_at(stored_at - Duration::minutes(10)))
        .await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::Current(reading) => assert_eq!(reading.recorded_at, stored_at),
        other => panic!("expected Current, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 1);
}

/// Provider failure surfaces as a retryable error and writes nothing.
#[tokio::test]
async fn test_provider_failure_leaves_store_unchanged() {
    let (store, provider) = fixture().await;
    let location = store.location_by_name("Davos").unwrap().unwrap();
    store
        .insert_reading(location.id, &reading_at(datetime!(2024-01-15 09:00:00 UTC)))
        .unwrap();

    provider.set_offline(true);

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let err = reconciler.ensure_current("Davos").await.unwrap_err();

    assert!(err.is_retryable());
    assert_eq!(store.count_readings(None).unwrap(), 1);
}

/// A name the provider recognizes registers itself on first reference.
#[tokio::test]
async fn test_unknown_location_auto_registers() {
    let store = Store::open_in_memory().unwrap();
    let provider = MockProvider::new();
    provider
        .add_location(LocationInfo::new("Zermatt", 3920, "CH"))
        .await;
    provider
        .set_current("Zermatt", reading_at(datetime!(2024-02-01 08:00:00 UTC)))
        .await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Zermatt").await.unwrap();

    assert!(matches!(outcome, Refresh::First(_)));
    let location = store.location_by_name("Zermatt").unwrap();
    assert!(location.is_some());
    assert_eq!(location.unwrap().site_code, 3920);
}

/// A name nobody knows is an outcome, not an error.
#[tokio::test]
async fn test_unknown_everywhere_is_an_outcome() {
    let (store, provider) = fixture().await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Atlantis").await.unwrap();

    assert_eq!(outcome, Refresh::UnknownLocation);
    assert!(outcome.reading().is_none());
    assert_eq!(store.count_locations().unwrap(), 1);
}

/// Stale store: the merge inserts exactly the series entries the store
/// was missing.
#[tokio::test]
async fn test_stale_store_merges_missing_series_entries() {
    let (store, provider) = fixture().await;
    let location = store.location_by_name("Davos").unwrap().unwrap();

    let base = datetime!(2024-03-01 00:00:00 UTC);
    let mut series = Vec::new();
    for i in 0..7 {
        series.push(reading_at(base + Duration::minutes(30 * i)));
    }
    // The store holds the first three entries; four are missing.
    for reading in &series[..3] {
        store.insert_reading(location.id, reading).unwrap();
    }

    let fetched_at = base + Duration::minutes(30 * 6);
    provider.set_current("Davos", reading_at(fetched_at)).await;
    provider.set_year_series("Davos", 2024, series).await;

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());
    let outcome = reconciler.ensure_current("Davos").await.unwrap();

    match outcome {
        Refresh::Backfilled { merged, reading } => {
            assert_eq!(merged, 4);
            assert_eq!(reading.recorded_at, fetched_at);
        }
        other => panic!("expected Backfilled, got {:?}", other),
    }
    assert_eq!(store.count_readings(None).unwrap(), 7);
}

/// Bootstrap registers everything once; a second run is a no-op.
#[tokio::test]
async fn test_bootstrap_is_idempotent() {
    let store = Store::open_in_memory().unwrap();
    let provider = MockProvider::new();
    provider.add_location(davos()).await;
    provider
        .add_location(LocationInfo::new("Sion", 1950, "CH"))
        .await;

    let base = datetime!(2024-01-01 00:00:00 UTC);
    for name in ["Davos", "Sion"] {
        provider
            .set_year_series(
                name,
                2024,
                vec![reading_at(base), reading_at(base + Duration::minutes(30))],
            )
            .await;
    }

    let reconciler = Reconciler::new(&store, &provider, StalenessPolicy::default());

    let first = reconciler.bootstrap(2024).await.unwrap();
    assert_eq!(first.locations.discovered, 2);
    assert_eq!(first.locations.registered, 2);
    assert_eq!(first.readings_inserted, 4);

    let second = reconciler.bootstrap(2024).await.unwrap();
    assert_eq!(second.locations.registered, 0);
    assert_eq!(second.readings_inserted, 0);

    assert_eq!(store.count_locations().unwrap(), 2);
    assert_eq!(store.count_readings(None).unwrap(), 4);
}

/// The reconciler accepts a trait object, so callers can hold providers
/// behind `Arc<dyn WeatherProvider>`.
#[tokio::test]
async fn test_reconciler_over_trait_object() {
    let (store, provider) = fixture().await;
    provider
        .set_current("Davos", reading_at(datetime!(2024-01-15 09:00:00 UTC)))
        .await;

    let dyn_provider: &dyn stratus_core::WeatherProvider = &provider;
    let reconciler = Reconciler::new(&store, dyn_provider, StalenessPolicy::default());

    let outcome = reconciler.ensure_current("Davos").await.unwrap();
    assert!(matches!(outcome, Refresh::First(_)));
}
