use anyhow::Result;
use game_types::{GameError, JokerCounts, JokerKind};
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::store::{load_json_or_default, save_json, KeyValueStore};

pub const INVENTORY_KEY: &str = "jokers.inventory";

#[derive(Debug, Default)]
struct InventoryState {
    counts: JokerCounts,
    dirty: bool,
}

/// Persistent joker counts. Every mutation is written through while the
/// lock is held, so concurrent consume/grant calls never interleave.
pub struct JokerInventory {
    store: Arc<dyn KeyValueStore>,
    state: Mutex<InventoryState>,
}

impl JokerInventory {
    pub async fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let counts: JokerCounts = load_json_or_default(store.as_ref(), INVENTORY_KEY).await;
        tracing::info!("Loaded joker inventory ({} total)", counts.total());

        Self {
            store,
            state: Mutex::new(InventoryState {
                counts,
                dirty: false,
            }),
        }
    }

    pub async fn count(&self, kind: JokerKind) -> u32 {
        self.state.lock().await.counts.count(kind)
    }

    pub async fn counts(&self) -> JokerCounts {
        self.state.lock().await.counts.clone()
    }

    /// Take one joker of `kind`. Returns false, leaving the count at zero,
    /// when none are left.
    pub async fn consume(&self, kind: JokerKind) -> bool {
        let mut state = self.state.lock().await;
        if !state.counts.consume(kind) {
            tracing::debug!("No {} jokers left", kind);
            return false;
        }
        self.persist(&mut state).await;
        true
    }

    /// Add `amount` jokers of `kind`, returning the new count.
    pub async fn grant(&self, kind: JokerKind, amount: u32) -> Result<u32, GameError> {
        if amount == 0 {
            return Err(GameError::InvalidGrant);
        }

        let mut state = self.state.lock().await;
        let count = state.counts.grant(kind, amount);
        self.persist(&mut state).await;

        tracing::info!("Granted {} {} jokers, now {}", amount, kind, count);
        Ok(count)
    }

    /// Add `amount` of every kind in a single write.
    pub async fn grant_each(&self, amount: u32) -> Result<JokerCounts, GameError> {
        if amount == 0 {
            return Err(GameError::InvalidGrant);
        }

        let mut state = self.state.lock().await;
        for kind in JokerKind::ALL {
            state.counts.grant(kind, amount);
        }
        self.persist(&mut state).await;
        Ok(state.counts.clone())
    }

    /// True when the last write failed and the stored copy is behind.
    pub async fn is_dirty(&self) -> bool {
        self.state.lock().await.dirty
    }

    /// Retry a write that previously failed.
    pub async fn flush(&self) -> Result<()> {
        let mut state = self.state.lock().await;
        if state.dirty {
            save_json(self.store.as_ref(), INVENTORY_KEY, &state.counts).await?;
            state.dirty = false;
        }
        Ok(())
    }

    async fn persist(&self, state: &mut InventoryState) {
        match save_json(self.store.as_ref(), INVENTORY_KEY, &state.counts).await {
            Ok(()) => state.dirty = false,
            Err(e) => {
                tracing::warn!("Joker inventory not saved, will retry on flush: {}", e);
                state.dirty = true;
            }
        }
    }
}
