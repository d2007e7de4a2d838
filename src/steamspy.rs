//! SteamSpy API integration: per-app details and bulk tag queries.
//!
//! SteamSpy API: https://steamspy.com/api.php?request=appdetails&appid={appid}
//! Rate limit: 4 requests per second; every call funnels through the shared
//! limiter, cache refreshes included.

use std::collections::HashMap;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error};

use crate::error::AppError;
use crate::rate_limit::RateLimiter;
use crate::remote::{self, RemoteError};

const STEAMSPY_API_URL: &str = "https://steamspy.com/api.php";
const STEAMSPY_REQUEST_LIMIT: usize = 4;
const STEAMSPY_WINDOW: Duration = Duration::from_millis(1000);

/// The tag the whole service filters on.
pub const MULTIPLAYER_TAG: &str = "Multiplayer";

/// Name and tags for a single app. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GameInfo {
    pub id: u64,
    pub name: String,
    pub tags: Vec<String>,
}

impl GameInfo {
    pub fn is_multiplayer(&self) -> bool {
        self.tags.iter().any(|tag| tag == MULTIPLAYER_TAG)
    }
}

pub struct SteamSpyClient {
    client: reqwest::Client,
    limiter: RateLimiter,
}

impl SteamSpyClient {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            client,
            limiter: RateLimiter::new(STEAMSPY_REQUEST_LIMIT, STEAMSPY_WINDOW),
        }
    }

    /// Fetch name and tags for one app.
    pub async fn app_details(&self, appid: u64) -> Result<GameInfo, AppError> {
        debug!("Input appid: {}", appid);

        match self.try_app_details(appid).await {
            Ok(info) => Ok(info),
            Err(e) => {
                error!("SteamSpy appdetails failed for appid {}: {}", appid, e);
                Err(AppError::Enrichment { appid })
            }
        }
    }

    async fn try_app_details(&self, appid: u64) -> Result<GameInfo, RemoteError> {
        let body = remote::get_json(
            &self.client,
            Some(&self.limiter),
            STEAMSPY_API_URL,
            &[
                ("request", "appdetails".to_string()),
                ("appid", appid.to_string()),
            ],
        )
        .await?;

        let name = body["name"]
            .as_str()
            .ok_or_else(|| RemoteError::Shape(format!("no name for appid {appid}")))?
            .to_string();

        Ok(GameInfo {
            id: appid,
            name,
            tags: tag_names(&body["tags"]),
        })
    }

    /// Fetch every app carrying `tag`, keyed by appid.
    ///
    /// Bulk entries come back name-only. The query itself guarantees the tag,
    /// so the tag list stays empty.
    pub async fn games_by_tag(&self, tag: &str) -> Result<HashMap<u64, GameInfo>, AppError> {
        debug!("Input tag: {}", tag);

        match self.try_games_by_tag(tag).await {
            Ok(games) => {
                debug!("Games tagged {}: {}", tag, games.len());
                Ok(games)
            }
            Err(e) => {
                error!("SteamSpy tag query failed for {}: {}", tag, e);
                Err(AppError::TagLookup {
                    tag: tag.to_string(),
                })
            }
        }
    }

    async fn try_games_by_tag(&self, tag: &str) -> Result<HashMap<u64, GameInfo>, RemoteError> {
        let body = remote::get_json(
            &self.client,
            Some(&self.limiter),
            STEAMSPY_API_URL,
            &[("request", "tag".to_string()), ("tag", tag.to_string())],
        )
        .await?;

        parse_tag_response(&body)
    }
}

/// Tag keys of an appdetails response. SteamSpy serves an object of
/// tag name -> vote count, or an empty array for untagged apps.
fn tag_names(tags: &Value) -> Vec<String> {
    match tags.as_object() {
        Some(map) => map.keys().cloned().collect(),
        None => Vec::new(),
    }
}

/// A tag response maps appid strings to entries carrying at least a name.
fn parse_tag_response(body: &Value) -> Result<HashMap<u64, GameInfo>, RemoteError> {
    let entries = body
        .as_object()
        .ok_or_else(|| RemoteError::Shape("tag response is not an object".to_string()))?;

    let mut games = HashMap::with_capacity(entries.len());
    for (key, entry) in entries {
        let id = entry["appid"]
            .as_u64()
            .or_else(|| key.parse().ok())
            .ok_or_else(|| RemoteError::Shape(format!("bad appid key: {key}")))?;
        let name = entry["name"]
            .as_str()
            .ok_or_else(|| RemoteError::Shape(format!("no name for appid {id}")))?
            .to_string();

        games.insert(
            id,
            GameInfo {
                id,
                name,
                tags: Vec::new(),
            },
        );
    }

    Ok(games)
}
