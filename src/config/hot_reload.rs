//! Cached routing snapshot with hot reload.
//!
//! The interceptor reads one immutable snapshot per request. This module
//! owns that snapshot: it is parsed once at startup, swapped atomically by a
//! background file watcher when the configuration file changes, and can be
//! refreshed on demand through the reload endpoint.

use crate::config::settings::load_routing_config_from;
use crate::models::error::RoutingError;
use crate::models::routing::RoutingConfig;
use log::{error, info, warn};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;

/// One published snapshot with its provenance.
#[derive(Debug, Clone)]
pub struct RoutingUpdate {
    pub config: Arc<RoutingConfig>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub version: u64,
}

/// Holds the current routing snapshot and replaces it on reload.
pub struct ConfigManager {
    current: Arc<RwLock<RoutingUpdate>>,
    config_path: String,
    version_counter: AtomicU64,
}

impl ConfigManager {
    pub fn new(initial: RoutingConfig, config_path: String) -> Self {
        let update = RoutingUpdate {
            config: Arc::new(initial),
            timestamp: chrono::Utc::now(),
            version: 1,
        };
        Self {
            current: Arc::new(RwLock::new(update)),
            config_path,
            version_counter: AtomicU64::new(1),
        }
    }

    /// The current snapshot. Cheap; taken once per intercepted request.
    pub async fn current(&self) -> Arc<RoutingConfig> {
        self.current.read().await.config.clone()
    }

    /// The current snapshot together with version and timestamp.
    pub async fn status(&self) -> RoutingUpdate {
        self.current.read().await.clone()
    }

    /// Re-reads the configuration file and publishes a new snapshot.
    ///
    /// A snapshot whose routing grammar is defective is still published:
    /// it carries `is_valid = false` and fails requests safe to the legacy
    /// handler. Only file-level problems (missing file, bad JSON) leave the
    /// previous snapshot in place.
    pub async fn reload_now(&self) -> Result<RoutingUpdate, RoutingError> {
        let config = load_routing_config_from(&self.config_path)?;
        if !config.is_valid {
            warn!("Reloaded routing configuration is invalid; requests will fall back to the legacy handler");
        }

        let version = self.version_counter.fetch_add(1, Ordering::Relaxed) + 1;
        let update = RoutingUpdate {
            config: Arc::new(config),
            timestamp: chrono::Utc::now(),
            version,
        };
        *self.current.write().await = update.clone();
        info!("Routing configuration reloaded (version {})", version);
        Ok(update)
    }

    /// Spawns the background watcher that reloads when the configuration
    /// file's modification time changes. Polls every 5 seconds.
    pub fn start_watching(self: Arc<Self>) {
        let manager = self;
        tokio::spawn(async move {
            let mut tick = interval(Duration::from_secs(5));
            let mut last_modified = file_modified_time(&manager.config_path).await;

            loop {
                tick.tick().await;
                match file_modified_time(&manager.config_path).await {
                    Some(modified) => {
                        if Some(modified) != last_modified {
                            info!("Routing configuration file changed, reloading...");
                            match manager.reload_now().await {
                                Ok(_) => last_modified = Some(modified),
                                // Keep last_modified stale so the next tick retries.
                                Err(e) => error!("Failed to reload routing configuration: {}", e),
                            }
                        }
                    }
                    None => warn!(
                        "Could not stat routing configuration file: {}",
                        manager.config_path
                    ),
                }
            }
        });
    }
}

async fn file_modified_time(path: &str) -> Option<std::time::SystemTime> {
    tokio::fs::metadata(path).await.ok()?.modified().ok()
}
