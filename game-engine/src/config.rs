use std::env;
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use game_core::Alphabet;
use game_persistence::connection::DEFAULT_DATABASE_URL;
use game_types::DifficultyLevel;

use crate::rewards::RewardSchedule;
use crate::session::SessionSettings;

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub difficulty: DifficultyLevel,
    pub words_file: Option<PathBuf>,
    pub word_source_url: Option<String>,
    pub word_alphabet: String,
    pub word_fetch_timeout: Duration,
    pub tick_interval: Duration,
    pub ad_reward_amount: u32,
    pub daily_bonus_amount: u32,
    pub simulate_ads: bool,
}

impl Config {
    pub fn new() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a config from any key lookup. Unparseable values are logged
    /// and replaced with their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let word_alphabet = match lookup("WORD_ALPHABET") {
            Some(code) if Alphabet::from_code(&code).is_some() => code.trim().to_lowercase(),
            Some(code) => {
                tracing::warn!("Unknown WORD_ALPHABET '{}', using tr", code);
                "tr".to_string()
            }
            None => "tr".to_string(),
        };

        Self {
            database_url: lookup("DATABASE_URL")
                .unwrap_or_else(|| DEFAULT_DATABASE_URL.to_string()),
            difficulty: parse_or(&lookup, "DIFFICULTY", DifficultyLevel::Medium),
            words_file: lookup("WORDS_FILE").map(PathBuf::from),
            word_source_url: lookup("WORD_SOURCE_URL").filter(|url| !url.trim().is_empty()),
            word_alphabet,
            word_fetch_timeout: Duration::from_millis(parse_or(
                &lookup,
                "WORD_FETCH_TIMEOUT_MS",
                3000,
            )),
            tick_interval: Duration::from_millis(parse_or(&lookup, "TICK_INTERVAL_MS", 1000)),
            ad_reward_amount: parse_grant_or(&lookup, "AD_REWARD_AMOUNT", 3),
            daily_bonus_amount: parse_grant_or(&lookup, "DAILY_BONUS_AMOUNT", 1),
            simulate_ads: parse_or(&lookup, "SIMULATE_ADS", true),
        }
    }

    pub fn alphabet(&self) -> Alphabet {
        Alphabet::from_code(&self.word_alphabet).unwrap_or_default()
    }

    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            tick_interval: (!self.tick_interval.is_zero()).then_some(self.tick_interval),
            word_timeout: self.word_fetch_timeout,
        }
    }

    pub fn reward_schedule(&self) -> RewardSchedule {
        RewardSchedule {
            ad_reward: self.ad_reward_amount,
            daily_bonus: self.daily_bonus_amount,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|e| {
            tracing::warn!("Invalid {} '{}' ({}), using default", key, raw, e);
            default
        }),
        None => default,
    }
}

/// Joker grants must be positive; the inventory rejects a zero grant.
fn parse_grant_or(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: u32) -> u32 {
    match parse_or(lookup, key, default) {
        0 => {
            tracing::warn!("{} must be at least 1, using {}", key, default);
            default
        }
        amount => amount,
    }
}
