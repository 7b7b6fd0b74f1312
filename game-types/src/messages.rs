use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::{DifficultyLevel, JokerKind};

/// Everything a player can ask the session to do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum PlayerCommand {
    TypeLetter { letter: char },
    DeleteLetter,
    SubmitGuess,
    UseJoker { kind: JokerKind },
    StartRound { level: Option<DifficultyLevel> },
    WatchAd { kind: JokerKind },
    ShowStatistics,
    Quit,
}
