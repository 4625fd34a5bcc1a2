use std::sync::Arc;

use tracing::debug;

use warlog_domain::ports::PlayerRepository;
use warlog_domain::services::NameDecoder;
use warlog_domain::{Player, PlayerId, StoreError, StoreResult};

const MAX_ATTEMPTS: usize = 3;

/// Resolves a player id to its stored row, creating or renaming as needed.
pub struct PlayerDirectory {
    repo: Arc<dyn PlayerRepository>,
    decoder: NameDecoder,
}

impl PlayerDirectory {
    pub fn new(repo: Arc<dyn PlayerRepository>, decoder: NameDecoder) -> Self {
        Self { repo, decoder }
    }

    pub async fn resolve(&self, id: PlayerId, raw_name: &[u8]) -> StoreResult<Player> {
        let name = self.decoder.decode(raw_name);
        let mut last_conflict = None;
        for _ in 0..MAX_ATTEMPTS {
            match self.repo.find_player(id).await? {
                Some(existing) if existing.display_name == name => return Ok(existing),
                Some(existing) => {
                    debug!(
                        player_id = %id,
                        from = %existing.display_name,
                        to = %name,
                        "player renamed"
                    );
                    self.repo.rename_player(id, &name).await?;
                    return Ok(Player::new(id, name));
                }
                None => {
                    let player = Player::new(id, name.clone());
                    match self.repo.insert_player(&player).await {
                        Ok(()) => return Ok(player),
                        Err(StoreError::Conflict(reason)) => last_conflict = Some(reason),
                        Err(err) => return Err(err),
                    }
                }
            }
        }
        Err(StoreError::Conflict(last_conflict.unwrap_or_else(|| {
            format!("player {} could not be resolved", id)
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MemoryRepository;

    #[tokio::test]
    async fn creates_then_returns_unchanged() {
        let repo = Arc::new(MemoryRepository::default());
        let directory = PlayerDirectory::new(repo.clone(), NameDecoder::default());

        let first = directory.resolve(PlayerId(42), b"Ivan").await.expect("create");
        let second = directory.resolve(PlayerId(42), b"Ivan").await.expect("resolve");
        assert_eq!(first, second);
        assert_eq!(repo.player_count(), 1);
        assert_eq!(repo.rename_count(), 0);
    }

    #[tokio::test]
    async fn latest_name_wins() {
        let repo = Arc::new(MemoryRepository::default());
        let directory = PlayerDirectory::new(repo.clone(), NameDecoder::default());

        directory.resolve(PlayerId(42), b"Ivan").await.expect("create");
        let renamed = directory.resolve(PlayerId(42), b"Ivan2").await.expect("rename");
        assert_eq!(renamed.display_name, "Ivan2");
        assert_eq!(repo.player_count(), 1);
        let stored = repo
            .find_player(PlayerId(42))
            .await
            .expect("find")
            .expect("stored");
        assert_eq!(stored.display_name, "Ivan2");
    }

    #[tokio::test]
    async fn decodes_legacy_names_before_storing() {
        let repo = Arc::new(MemoryRepository::default());
        let directory = PlayerDirectory::new(repo, NameDecoder::default());
        let player = directory
            .resolve(PlayerId(7), &[0xC8, 0xE2, 0xE0, 0xED])
            .await
            .expect("create");
        assert_eq!(player.display_name, "Иван");
    }

    #[tokio::test]
    async fn insert_conflict_falls_back_to_stored_row() {
        let repo = Arc::new(MemoryRepository::default());
        repo.fail_next_player_insert_with_race(Player::new(PlayerId(5), "Other"));
        let directory = PlayerDirectory::new(repo.clone(), NameDecoder::default());

        let player = directory.resolve(PlayerId(5), b"Mine").await.expect("resolve");
        assert_eq!(player.display_name, "Mine");
        assert_eq!(repo.player_count(), 1);
        assert_eq!(repo.rename_count(), 1);
    }
}
