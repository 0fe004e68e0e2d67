//! Background freshness poller.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::time::interval;
use tracing::{debug, error, info, warn};

use stratus_core::{Reconciler, Refresh};

use crate::state::AppState;

/// Background poller that reconciles every stored location on an interval.
pub struct Poller {
    state: Arc<AppState>,
}

impl Poller {
    /// Create a new poller.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Start polling in the background.
    ///
    /// Returns immediately; reconciliation happens in a spawned task. A poll
    /// interval of 0 disables the poller.
    pub async fn start(&self) {
        let interval_secs = self.state.config.read().await.sync.poll_interval_secs;
        if interval_secs == 0 {
            info!("Poller disabled (poll_interval_secs = 0)");
            return;
        }

        info!("Starting poller with {}s interval", interval_secs);
        self.state.poller.set_running(true);

        let state = Arc::clone(&self.state);
        tokio::spawn(async move {
            poll_loop(state, Duration::from_secs(interval_secs)).await;
        });
    }
}

/// Reconcile all stored locations on each tick until the stop signal fires.
async fn poll_loop(state: Arc<AppState>, poll_interval: Duration) {
    let mut interval_timer = interval(poll_interval);
    let mut stop_rx = state.poller.subscribe_stop();
    let mut consecutive_failures: HashMap<String, u32> = HashMap::new();

    loop {
        tokio::select! {
            _ = interval_timer.tick() => {
                poll_all(&state, &mut consecutive_failures).await;
            }
            result = stop_rx.changed() => {
                if result.is_err() || *stop_rx.borrow() {
                    break;
                }
            }
        }
    }

    state.poller.set_running(false);
    info!("Poller stopped");
}

/// Run one reconciliation pass over every stored location.
async fn poll_all(state: &AppState, consecutive_failures: &mut HashMap<String, u32>) {
    let store = state.store.lock().await;
    let locations = match store.all_locations() {
        Ok(locations) => locations,
        Err(e) => {
            error!("Poller could not list locations: {}", e);
            return;
        }
    };

    let reconciler = Reconciler::new(&store, state.provider.as_ref(), state.policy);
    for location in locations {
        match reconciler.ensure_current(&location.name).await {
            Ok(refresh) => {
                consecutive_failures.remove(&location.name);
                match refresh {
                    Refresh::First(_) | Refresh::Appended(_) => {
                        debug!("Stored a new reading for {}", location.name);
                    }
                    Refresh::Current(_) => {
                        debug!("{} is already current", location.name);
                    }
                    Refresh::Backfilled { merged, .. } => {
                        info!("Backfilled {} series entries for {}", merged, location.name);
                    }
                    // Locations listed from the store always resolve
                    Refresh::UnknownLocation => {}
                }
            }
            Err(e) => {
                let failures = consecutive_failures
                    .entry(location.name.clone())
                    .or_insert(0);
                *failures += 1;
                if *failures <= 3 {
                    warn!(
                        "Failed to refresh {}: {} (attempt {})",
                        location.name, e, failures
                    );
                } else if *failures == 4 {
                    error!(
                        "Failed to refresh {} after {} attempts, will continue trying silently",
                        location.name, failures
                    );
                }
                // Keep trying; the provider may come back
            }
        }
    }
}
