//! Application state shared across handlers.
//!
//! The store sits behind a `Mutex` so that API handlers and the background
//! poller serialize their reconciliation passes; the provider handle is an
//! `Arc<dyn WeatherProvider>` shared by both. The staleness policy is fixed
//! at startup from `sync.staleness_minutes`.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use stratus_core::StalenessPolicy;
use stratus_provider::WeatherProvider;
use stratus_store::Store;
use time::OffsetDateTime;
use tokio::sync::{Mutex, RwLock, watch};

use crate::config::Config;

/// Shared application state.
pub struct AppState {
    /// The data store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
    /// Upstream provider handle.
    pub provider: Arc<dyn WeatherProvider>,
    /// Staleness policy applied on every reconciliation.
    pub policy: StalenessPolicy,
    /// Configuration (RwLock for runtime updates).
    pub config: RwLock<Config>,
    /// Poller control state.
    pub poller: PollerState,
}

impl AppState {
    /// Create new application state.
    pub fn new(store: Store, provider: Arc<dyn WeatherProvider>, config: Config) -> Arc<Self> {
        let policy = StalenessPolicy::from_minutes(config.sync.staleness_minutes);
        Arc::new(Self {
            store: Mutex::new(store),
            provider,
            policy,
            config: RwLock::new(config),
            poller: PollerState::new(),
        })
    }
}

/// State for tracking and controlling the background poller.
pub struct PollerState {
    /// Whether the poller is currently running.
    running: AtomicBool,
    /// When the poller was started (Unix timestamp).
    started_at: AtomicU64,
    /// Channel to signal the poller task to stop.
    stop_tx: watch::Sender<bool>,
    /// Receiver for the stop signal (cloned by the poller task).
    stop_rx: watch::Receiver<bool>,
}

impl PollerState {
    /// Create a new poller state.
    pub fn new() -> Self {
        let (stop_tx, stop_rx) = watch::channel(false);
        Self {
            running: AtomicBool::new(false),
            started_at: AtomicU64::new(0),
            stop_tx,
            stop_rx,
        }
    }

    /// Check if the poller is running.
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Mark the poller as started or stopped.
    pub fn set_running(&self, running: bool) {
        self.running.store(running, Ordering::SeqCst);
        if running {
            let now = OffsetDateTime::now_utc().unix_timestamp() as u64;
            self.started_at.store(now, Ordering::SeqCst);
        }
    }

    /// Get the poller start time.
    pub fn started_at(&self) -> Option<OffsetDateTime> {
        let ts = self.started_at.load(Ordering::SeqCst);
        if ts == 0 {
            None
        } else {
            OffsetDateTime::from_unix_timestamp(ts as i64).ok()
        }
    }

    /// Get a receiver for the stop signal.
    pub fn subscribe_stop(&self) -> watch::Receiver<bool> {
        self.stop_rx.clone()
    }

    /// Signal the poller task to stop.
    pub fn signal_stop(&self) {
        let _ = self.stop_tx.send(true);
        self.running.store(false, Ordering::SeqCst);
    }
}

impl Default for PollerState {
    fn default() -> Self {
        Self::new()
    }
}
