//! Periodically refreshed snapshot of Multiplayer-tagged games.
//!
//! One snapshot is current at a time. A refresh builds a whole new map and
//! swaps the published `Arc`, so readers mid-flight keep whatever they
//! already hold; a failed refresh leaves the previous snapshot in place.
//! Until the very first build lands, readers await it instead of failing.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::error::AppError;
use crate::steamspy::{GameInfo, SteamSpyClient, MULTIPLAYER_TAG};

pub const REFRESH_INTERVAL: Duration = Duration::from_secs(5 * 60);

pub type Snapshot = Arc<HashMap<u64, GameInfo>>;

pub struct MultiplayerCache {
    published: watch::Sender<Option<Snapshot>>,
}

impl MultiplayerCache {
    pub fn new() -> Self {
        let (published, _) = watch::channel(None);
        Self { published }
    }

    /// The current snapshot, pending while the first build is in flight.
    pub async fn snapshot(&self) -> Result<Snapshot, AppError> {
        let mut rx = self.published.subscribe();
        let value = rx
            .wait_for(|snapshot| snapshot.is_some())
            .await
            .map_err(|_| AppError::Internal)?;
        (*value).clone().ok_or(AppError::Internal)
    }

    /// Replace the published snapshot. Readers holding the old `Arc` keep it.
    fn publish(&self, games: HashMap<u64, GameInfo>) {
        self.published.send_replace(Some(Arc::new(games)));
    }

    /// Run one refresh cycle against the SteamSpy tag query.
    pub async fn refresh(&self, spy: &SteamSpyClient) {
        match spy.games_by_tag(MULTIPLAYER_TAG).await {
            Ok(games) => {
                info!("Multiplayer cache refreshed: {} games", games.len());
                self.publish(games);
            }
            Err(e) => {
                // Keep serving the previous snapshot.
                error!("Multiplayer cache refresh failed: {}", e);
            }
        }
    }
}

impl Default for MultiplayerCache {
    fn default() -> Self {
        Self::new()
    }
}

/// Kick off the refresh timer. The first cycle runs immediately so readers
/// always have an in-flight build to await. Abort the returned handle at
/// shutdown; no further refresh runs after that.
pub fn spawn_refresh(cache: Arc<MultiplayerCache>, spy: Arc<SteamSpyClient>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut timer = tokio::time::interval(REFRESH_INTERVAL);
        loop {
            timer.tick().await;
            cache.refresh(&spy).await;
        }
    })
}
