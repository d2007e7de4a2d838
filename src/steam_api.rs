//! Steam Web API integration: profile-link resolution and owned games.

use tracing::{debug, error};

use crate::error::AppError;
use crate::remote::{self, RemoteError};

const API_RESOLVE_VANITY: &str =
    "https://api.steampowered.com/ISteamUser/ResolveVanityURL/v0001/";
const API_OWNED_GAMES: &str =
    "https://api.steampowered.com/IPlayerService/GetOwnedGames/v0001/";

pub struct SteamClient {
    client: reqwest::Client,
    api_key: Option<String>,
}

impl SteamClient {
    pub fn new(client: reqwest::Client, api_key: Option<String>) -> Self {
        Self { client, api_key }
    }

    // A missing key is sent as an empty parameter so the call fails upstream
    // instead of at construction time.
    fn api_key(&self) -> String {
        self.api_key.clone().unwrap_or_default()
    }

    /// Resolve a profile link to a numeric account id.
    ///
    /// A numeric vanity token already is the id; anything else costs one
    /// ResolveVanityURL call.
    pub async fn resolve_account_id(&self, link: &str) -> Result<u64, AppError> {
        debug!("Input link: {}", link);

        match self.try_resolve(link).await {
            Ok(steamid) => {
                debug!("Resolved {} -> {}", link, steamid);
                Ok(steamid)
            }
            Err(e) => {
                error!("Failed to resolve link {}: {}", link, e);
                Err(AppError::Resolution {
                    link: link.to_string(),
                })
            }
        }
    }

    async fn try_resolve(&self, link: &str) -> Result<u64, RemoteError> {
        let token = vanity_token(link)
            .ok_or_else(|| RemoteError::Shape(format!("no vanity token in link: {link}")))?;

        if let Some(steamid) = numeric_account_id(token) {
            return Ok(steamid);
        }

        let body = remote::get_json(
            &self.client,
            None,
            API_RESOLVE_VANITY,
            &[
                ("key", self.api_key()),
                ("vanityurl", token.to_string()),
                ("format", "json".to_string()),
            ],
        )
        .await?;

        let response = &body["response"];
        if response["success"].as_i64() != Some(1) {
            return Err(RemoteError::Shape(format!("vanity url not resolved: {token}")));
        }
        response["steamid"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .ok_or_else(|| RemoteError::Shape("missing steamid in vanity response".to_string()))
    }

    /// List the appids owned by the account behind `link`.
    pub async fn owned_app_ids(&self, link: &str) -> Result<Vec<u64>, AppError> {
        let steamid = self.resolve_account_id(link).await?;
        debug!("Input steamid: {}", steamid);

        match self.try_owned_app_ids(steamid).await {
            Ok(appids) => {
                debug!("Games count: {}", appids.len());
                Ok(appids)
            }
            Err(e) => {
                error!(
                    "Failed to fetch owned games for steamid {} (link {}): {}",
                    steamid, link, e
                );
                Err(AppError::Fetch {
                    steamid: steamid.to_string(),
                })
            }
        }
    }

    async fn try_owned_app_ids(&self, steamid: u64) -> Result<Vec<u64>, RemoteError> {
        let body = remote::get_json(
            &self.client,
            None,
            API_OWNED_GAMES,
            &[
                ("key", self.api_key()),
                ("steamid", steamid.to_string()),
                ("include_played_free_games", "0".to_string()),
                ("format", "json".to_string()),
            ],
        )
        .await?;

        // Private profiles come back as an empty response object.
        let games = body["response"]["games"].as_array().ok_or_else(|| {
            RemoteError::Shape(format!("no games list for steamid {steamid}"))
        })?;

        Ok(games.iter().filter_map(|g| g["appid"].as_u64()).collect())
    }
}

/// Trailing path segment of a profile link, ignoring a trailing slash.
pub fn vanity_token(link: &str) -> Option<&str> {
    link.trim_end_matches('/')
        .rsplit('/')
        .next()
        .filter(|token| !token.is_empty())
}

/// A purely numeric vanity token is already an account id.
fn numeric_account_id(token: &str) -> Option<u64> {
    if token.chars().all(|c| c.is_ascii_digit()) {
        token.parse().ok()
    } else {
        None
    }
}
