//! Request orchestration: profile links in, sorted multiplayer games out.

use std::sync::Arc;

use futures_util::future::try_join_all;
use tracing::debug;

use crate::cache::{MultiplayerCache, Snapshot};
use crate::error::AppError;
use crate::intersect::intersect_all;
use crate::steam_api::SteamClient;
use crate::steamspy::GameInfo;

pub struct SteamService {
    steam: Arc<SteamClient>,
    cache: Arc<MultiplayerCache>,
}

impl SteamService {
    pub fn new(steam: Arc<SteamClient>, cache: Arc<MultiplayerCache>) -> Self {
        Self { steam, cache }
    }

    /// The games tagged Multiplayer that every linked account owns, sorted by
    /// name. The first failing link aborts the whole request with that
    /// link's error.
    pub async fn common_multiplayer_games(
        &self,
        links: &[String],
    ) -> Result<Vec<GameInfo>, AppError> {
        debug!("Input users links: {:?}", links);

        let libraries =
            try_join_all(links.iter().map(|link| self.steam.owned_app_ids(link))).await?;

        let common = intersect_all(&libraries);
        debug!("Common apps count: {}", common.len());

        let snapshot = self.cache.snapshot().await?;
        let games = collect_multiplayer(&common, &snapshot);
        debug!("Common multiplayer apps count: {}", games.len());

        Ok(games)
    }
}

/// Keep the common appids the snapshot knows about. Absence from the
/// snapshot means "not tagged Multiplayer", not an error. Sorted by name,
/// case-insensitively; equal names keep their encounter order.
fn collect_multiplayer(common: &[u64], snapshot: &Snapshot) -> Vec<GameInfo> {
    let mut games: Vec<GameInfo> = common
        .iter()
        .filter_map(|appid| snapshot.get(appid).cloned())
        .collect();

    games.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    games
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn game(id: u64, name: &str) -> GameInfo {
        GameInfo {
            id,
            name: name.to_string(),
            tags: Vec::new(),
        }
    }

    fn snapshot(games: &[(u64, &str)]) -> Snapshot {
        Arc::new(
            games
                .iter()
                .map(|(id, name)| (*id, game(*id, name)))
                .collect::<HashMap<_, _>>(),
        )
    }

    #[test]
    fn keeps_only_snapshot_members() {
        // alice owns {10,20,30}, bob owns {20,30,40}; only 20 is cached as
        // multiplayer, so 30 is silently discarded.
        let common = intersect_all(&[vec![10, 20, 30], vec![20, 30, 40]]);
        let snapshot = snapshot(&[(20, "Factorio"), (50, "Rust")]);

        let games = collect_multiplayer(&common, &snapshot);
        assert_eq!(games.len(), 1);
        assert_eq!(games[0].id, 20);
    }

    #[test]
    fn sorts_by_name_case_insensitively() {
        let snapshot = snapshot(&[(1, "valheim"), (2, "Apex Legends"), (3, "Dota 2")]);
        let games = collect_multiplayer(&[1, 2, 3], &snapshot);

        let names: Vec<&str> = games.iter().map(|g| g.name.as_str()).collect();
        assert_eq!(names, vec!["Apex Legends", "Dota 2", "valheim"]);
    }

    #[test]
    fn equal_names_keep_encounter_order() {
        let snapshot = snapshot(&[(1, "Same Name"), (2, "Same Name")]);

        let games = collect_multiplayer(&[2, 1], &snapshot);
        let ids: Vec<u64> = games.iter().map(|g| g.id).collect();
        assert_eq!(ids, vec![2, 1]);
    }

    #[test]
    fn empty_intersection_yields_no_games() {
        let snapshot = snapshot(&[(20, "Factorio")]);
        assert!(collect_multiplayer(&[], &snapshot).is_empty());
    }
}
