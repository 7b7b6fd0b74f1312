use anyhow::Result;
use game_types::GameStatistics;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::{load_json_or_default, save_json, KeyValueStore};

pub const STATISTICS_KEY: &str = "stats.game_statistics";

#[derive(Debug, Default)]
struct StatisticsState {
    stats: GameStatistics,
    dirty: bool,
}

pub struct StatisticsStore {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<StatisticsState>,
}

impl StatisticsStore {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let stats: GameStatistics = load_json_or_default(store.as_ref(), STATISTICS_KEY).await;
        tracing::info!(
            "Loaded statistics: {} played, {} won",
            stats.games_played,
            stats.games_won
        );

        Self {
            store,
            state: Mutex::new(StatisticsState {
                stats,
                dirty: false,
            }),
        }
    }

    /// Fold one finished round into the totals and write them through.
    pub async fn record_outcome(&self, won: bool, guess_count: u32) -> GameStatistics {
        let mut state = self.state.lock().await;
        state.stats.record_outcome(won, guess_count);

        match save_json(self.store.as_ref(), STATISTICS_KEY, &state.stats).await {
            Ok(()) => state.dirty = false,
            Err(e) => {
                tracing::warn!("Statistics not saved, will retry on flush: {}", e);
                state.dirty = true;
            }
        }
        state.stats.clone()
    }

    pub async fn statistics(&self) -> GameStatistics {
        self.state.lock().await.stats.clone()
    }

    pub async fn win_percentage(&self) -> f64 {
        self.state.lock().await.stats.win_percentage()
    }

    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.dirty
    }

    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.dirty {
            save_json(self.store.as_ref(), STATISTICS_KEY, &state.stats).await?;
            state.dirty = false;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::connection::connect_to_memory_database;
    use crate::store::test_support::FailingStore;
    use crate::{MemoryStore, SqlKeyValueStore};
    use migration::{Migrator, MigratorTrait};

    #[tokio::test]
    async fn test_win_then_loss() {
        let stats = StatisticsStore::load(Arc::new(MemoryStore::new())).await;

        stats.record_outcome(true, 3).await;
        let snapshot = stats.record_outcome(false, 0).await;

        assert_eq!(snapshot.games_played, 2);
        assert_eq!(snapshot.games_won, 1);
        assert_eq!(snapshot.current_streak, 0);
        assert_eq!(snapshot.max_streak, 1);
        assert_eq!(snapshot.wins_with(3), 1);
        assert_eq!(stats.win_percentage().await, 50.0);
    }

    #[tokio::test]
    async fn test_empty_store_starts_at_zero() {
        let stats = StatisticsStore::load(Arc::new(MemoryStore::new())).await;
        assert_eq!(stats.statistics().await, GameStatistics::default());
        assert_eq!(stats.win_percentage().await, 0.0);
    }

    #[tokio::test]
    async fn test_statistics_survive_reload_from_sqlite() {
        let db = connect_to_memory_database().await.unwrap();
        Migrator::up(&db, None).await.unwrap();
        let store = Arc::new(SqlKeyValueStore::new(db));

        let stats = StatisticsStore::load(store.clone()).await;
        stats.record_outcome(true, 4).await;
        stats.record_outcome(true, 2).await;

        let reloaded = StatisticsStore::load(store).await;
        let snapshot = reloaded.statistics().await;
        assert_eq!(snapshot.current_streak, 2);
        assert_eq!(snapshot.max_streak, 2);
        assert_eq!(snapshot.wins_with(4), 1);
        assert_eq!(snapshot.wins_with(2), 1);
    }

    #[tokio::test]
    async fn test_failed_save_marks_dirty() {
        let store = Arc::new(FailingStore::new());
        let stats = StatisticsStore::load(store.clone()).await;

        stats.record_outcome(true, 1).await;
        assert!(stats.is_dirty().await);
        assert_eq!(stats.statistics().await.games_won, 1);

        store.recover();
        stats.flush().await.unwrap();
        assert!(!stats.is_dirty().await);
        assert!(store.stored(STATISTICS_KEY).await.is_some());
    }
}
