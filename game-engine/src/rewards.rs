use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use game_persistence::store::{KeyValueStore, load_json_or_default, save_json};
use game_persistence::JokerInventory;
use game_types::{AdRewardStatus, GameError, JokerCounts, JokerKind};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

pub const DAILY_BONUS_KEY: &str = "rewards.daily_bonus";

/// How many jokers each kind of reward hands out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RewardSchedule {
    /// Jokers of the requested kind per watched ad.
    pub ad_reward: u32,
    /// Jokers of every kind per calendar day.
    pub daily_bonus: u32,
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            ad_reward: 3,
            daily_bonus: 1,
        }
    }
}

#[async_trait]
pub trait AdRewardProvider: Send + Sync {
    async fn request_reward(&self) -> AdRewardStatus;
}

/// Stand-in ad network that always answers the same way.
#[derive(Debug, Clone, Copy)]
pub struct SimulatedAdProvider {
    status: AdRewardStatus,
}

impl SimulatedAdProvider {
    pub fn new(status: AdRewardStatus) -> Self {
        Self { status }
    }
}

impl Default for SimulatedAdProvider {
    fn default() -> Self {
        Self::new(AdRewardStatus::Granted)
    }
}

#[async_trait]
impl AdRewardProvider for SimulatedAdProvider {
    async fn request_reward(&self) -> AdRewardStatus {
        self.status
    }
}

/// Ask the provider for an ad and, if the player earned it, grant
/// `amount` jokers of `kind`.
pub async fn claim_ad_reward(
    provider: &dyn AdRewardProvider,
    inventory: &JokerInventory,
    kind: JokerKind,
    amount: u32,
) -> Result<AdRewardStatus, GameError> {
    let status = provider.request_reward().await;
    match status {
        AdRewardStatus::Granted => {
            inventory.grant(kind, amount).await?;
        }
        AdRewardStatus::Declined | AdRewardStatus::Unavailable => {
            tracing::info!("Ad reward for {} {}", kind, status);
        }
    }
    Ok(status)
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct DailyBonusRecord {
    last_claimed: Option<NaiveDate>,
}

/// Once-per-day grant of every joker kind.
pub struct DailyBonus {
    store: Arc<dyn KeyValueStore>,
    inventory: Arc<JokerInventory>,
    amount: u32,
    record: Mutex<DailyBonusRecord>,
}

impl DailyBonus {
    pub async fn load(
        store: Arc<dyn KeyValueStore>,
        inventory: Arc<JokerInventory>,
        amount: u32,
    ) -> Self {
        let record = load_json_or_default(store.as_ref(), DAILY_BONUS_KEY).await;
        Self {
            store,
            inventory,
            amount,
            record: Mutex::new(record),
        }
    }

    pub async fn last_claimed(&self) -> Option<NaiveDate> {
        self.record.lock().await.last_claimed
    }

    /// Grant the bonus if it has not been claimed on `today` yet. Returns
    /// the new inventory when something was granted.
    pub async fn claim(&self, today: NaiveDate) -> Result<Option<JokerCounts>, GameError> {
        let mut record = self.record.lock().await;
        if record.last_claimed.is_some_and(|claimed| claimed >= today) {
            return Ok(None);
        }

        let counts = self.inventory.grant_each(self.amount).await?;
        record.last_claimed = Some(today);
        if let Err(e) = save_json(self.store.as_ref(), DAILY_BONUS_KEY, &*record).await {
            tracing::warn!("Daily bonus date not saved: {}", e);
        }

        tracing::info!("Daily bonus for {} granted", today);
        Ok(Some(counts))
    }
}
