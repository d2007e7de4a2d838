//! REST API routes

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::error::AppError;
use crate::steamspy::GameInfo;
use crate::validate::validate_links;
use crate::AppState;

#[derive(Debug, serde::Deserialize)]
pub struct UsersLinks {
    pub links: Vec<String>,
}

/// Compute the multiplayer games common to every linked profile.
/// POST /api/steam/common-multiplayer-games
pub async fn common_multiplayer_games(
    State(state): State<Arc<AppState>>,
    Json(body): Json<UsersLinks>,
) -> Result<Json<Vec<GameInfo>>, AppError> {
    validate_links(&body.links)?;
    let games = state.service.common_multiplayer_games(&body.links).await?;
    Ok(Json(games))
}
