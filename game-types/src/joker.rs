use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::{Hint, RevealedLetter};

/// Seconds granted by an `ExtraTime` joker.
pub const EXTRA_TIME_SECS: u32 = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum JokerKind {
    RevealLetter,
    EliminateLetters,
    ShowHint,
    ExtraTime,
}

impl JokerKind {
    pub const ALL: [JokerKind; 4] = [
        Self::RevealLetter,
        Self::EliminateLetters,
        Self::ShowHint,
        Self::ExtraTime,
    ];
}

impl fmt::Display for JokerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RevealLetter => "reveal-letter",
            Self::EliminateLetters => "eliminate-letters",
            Self::ShowHint => "show-hint",
            Self::ExtraTime => "extra-time",
        };
        f.write_str(name)
    }
}

impl FromStr for JokerKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "reveal" | "reveal-letter" => Ok(Self::RevealLetter),
            "eliminate" | "eliminate-letters" => Ok(Self::EliminateLetters),
            "hint" | "show-hint" => Ok(Self::ShowHint),
            "time" | "extra-time" => Ok(Self::ExtraTime),
            other => Err(format!("unknown joker '{}'", other)),
        }
    }
}

/// Answer from an ad network when the player asks to watch an ad.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum AdRewardStatus {
    Granted,
    Declined,
    Unavailable,
}

impl fmt::Display for AdRewardStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Granted => "granted",
            Self::Declined => "declined",
            Self::Unavailable => "unavailable",
        };
        f.write_str(name)
    }
}

/// What applying a joker did to the round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum JokerEffect {
    LetterRevealed(RevealedLetter),
    NothingToReveal,
    LettersEliminated { letters: Vec<char> },
    HintShown(Hint),
    TimeAdded { seconds: u32, remaining_secs: u32 },
}

/// Per-player joker counts, persisted across rounds.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JokerCounts {
    #[serde(default)]
    pub reveal_letter: u32,
    #[serde(default)]
    pub eliminate_letters: u32,
    #[serde(default)]
    pub show_hint: u32,
    #[serde(default)]
    pub extra_time: u32,
}

impl JokerCounts {
    pub fn count(&self, kind: JokerKind) -> u32 {
        match kind {
            JokerKind::RevealLetter => self.reveal_letter,
            JokerKind::EliminateLetters => self.eliminate_letters,
            JokerKind::ShowHint => self.show_hint,
            JokerKind::ExtraTime => self.extra_time,
        }
    }

    fn slot_mut(&mut self, kind: JokerKind) -> &mut u32 {
        match kind {
            JokerKind::RevealLetter => &mut self.reveal_letter,
            JokerKind::EliminateLetters => &mut self.eliminate_letters,
            JokerKind::ShowHint => &mut self.show_hint,
            JokerKind::ExtraTime => &mut self.extra_time,
        }
    }

    /// Take one joker. Returns false and leaves the counts alone when none are left.
    pub fn consume(&mut self, kind: JokerKind) -> bool {
        let slot = self.slot_mut(kind);
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    /// Returns the new count. Saturates rather than wrapping.
    pub fn grant(&mut self, kind: JokerKind, amount: u32) -> u32 {
        let slot = self.slot_mut(kind);
        *slot = slot.saturating_add(amount);
        *slot
    }

    pub fn total(&self) -> u32 {
        JokerKind::ALL.iter().map(|kind| self.count(*kind)).sum()
    }
}
