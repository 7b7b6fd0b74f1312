use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::GameError;

/// Word lengths a round can be played with.
pub const SUPPORTED_WORD_LENGTHS: std::ops::RangeInclusive<usize> = 4..=6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum DifficultyLevel {
    Easy,   // 4 letters
    Medium, // 5 letters
    Hard,   // 6 letters
}

impl DifficultyLevel {
    pub const ALL: [DifficultyLevel; 3] = [Self::Easy, Self::Medium, Self::Hard];

    pub fn profile(self) -> DifficultyProfile {
        match self {
            Self::Easy => DifficultyProfile {
                level: self,
                word_length: 4,
                max_guesses: 6,
                duration_secs: 120,
                visible_rows: 6,
            },
            Self::Medium => DifficultyProfile {
                level: self,
                word_length: 5,
                max_guesses: 6,
                duration_secs: 180,
                visible_rows: 6,
            },
            Self::Hard => DifficultyProfile {
                level: self,
                word_length: 6,
                max_guesses: 7,
                duration_secs: 240,
                visible_rows: 5,
            },
        }
    }
}

impl fmt::Display for DifficultyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        };
        f.write_str(name)
    }
}

impl FromStr for DifficultyLevel {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "easy" | "4" => Ok(Self::Easy),
            "medium" | "5" => Ok(Self::Medium),
            "hard" | "6" => Ok(Self::Hard),
            other => Err(GameError::InvalidDifficulty {
                reason: format!("unknown difficulty level '{}'", other),
            }),
        }
    }
}

/// Immutable configuration a round is started with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DifficultyProfile {
    pub level: DifficultyLevel,
    pub word_length: usize,
    pub max_guesses: u32,
    pub duration_secs: u32,
    pub visible_rows: u32,
}

impl DifficultyProfile {
    /// Build a custom profile, checking the round invariants.
    pub fn new(
        level: DifficultyLevel,
        word_length: usize,
        max_guesses: u32,
        duration_secs: u32,
        visible_rows: u32,
    ) -> Result<Self, GameError> {
        let profile = Self {
            level,
            word_length,
            max_guesses,
            duration_secs,
            visible_rows,
        };
        profile.validate()?;
        Ok(profile)
    }

    pub fn validate(&self) -> Result<(), GameError> {
        if !SUPPORTED_WORD_LENGTHS.contains(&self.word_length) {
            return Err(GameError::InvalidDifficulty {
                reason: format!("word length {} is not supported", self.word_length),
            });
        }
        if self.max_guesses == 0 {
            return Err(GameError::InvalidDifficulty {
                reason: "max guesses must be positive".to_string(),
            });
        }
        if self.duration_secs == 0 {
            return Err(GameError::InvalidDifficulty {
                reason: "round duration must be positive".to_string(),
            });
        }
        Ok(())
    }
}

impl Default for DifficultyProfile {
    fn default() -> Self {
        DifficultyLevel::Medium.profile()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_profiles_are_valid() {
        for level in DifficultyLevel::ALL {
            let profile = level.profile();
            assert!(profile.validate().is_ok(), "{} profile invalid", level);
            assert_eq!(profile.level, level);
        }

        assert_eq!(DifficultyLevel::Easy.profile().word_length, 4);
        assert_eq!(DifficultyLevel::Medium.profile().word_length, 5);
        assert_eq!(DifficultyLevel::Hard.profile().word_length, 6);
    }

    #[test]
    fn test_custom_profile_validation() {
        assert!(DifficultyProfile::new(DifficultyLevel::Medium, 5, 6, 60, 6).is_ok());

        let too_long = DifficultyProfile::new(DifficultyLevel::Hard, 7, 6, 60, 6);
        assert!(matches!(too_long, Err(GameError::InvalidDifficulty { .. })));

        let too_short = DifficultyProfile::new(DifficultyLevel::Easy, 3, 6, 60, 6);
        assert!(too_short.is_err());

        let no_guesses = DifficultyProfile::new(DifficultyLevel::Medium, 5, 0, 60, 6);
        assert!(no_guesses.is_err());

        let no_time = DifficultyProfile::new(DifficultyLevel::Medium, 5, 6, 0, 6);
        assert!(no_time.unwrap_err().to_string().contains("duration"));
    }

    #[test]
    fn test_level_parsing() {
        assert_eq!("easy".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Easy);
        assert_eq!(" Medium ".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Medium);
        assert_eq!("HARD".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Hard);
        assert_eq!("6".parse::<DifficultyLevel>().unwrap(), DifficultyLevel::Hard);
        assert!("extreme".parse::<DifficultyLevel>().is_err());
    }
}
