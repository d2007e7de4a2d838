//! Common multiplayer games backend.
//!
//! Given a list of Steam community profile links, works out which
//! Multiplayer-tagged games every linked account owns: profile links resolve
//! to steamids, owned-game lists are fetched and intersected, and the result
//! is filtered against a periodically refreshed snapshot of SteamSpy's
//! Multiplayer tag query.

pub mod cache;
pub mod error;
pub mod intersect;
pub mod rate_limit;
pub mod remote;
pub mod routes;
pub mod service;
pub mod steam_api;
pub mod steamspy;
pub mod validate;
pub mod ws_handler;

use service::SteamService;

pub struct AppState {
    pub service: SteamService,
}
