use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fmt;
use ts_rs::TS;
use uuid::Uuid;

use crate::{DifficultyProfile, JokerKind};

pub type RoundId = Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LetterStatus {
    Correct,       // letter in the right position
    WrongPosition, // letter in the word, elsewhere
    Absent,        // letter not (or no longer) available in the word
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LetterResult {
    pub letter: char,
    pub status: LetterStatus,
    pub position: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GuessResult {
    pub word: String,
    pub letters: Vec<LetterResult>,
    pub submitted_at: String, // ISO 8601 string
}

impl GuessResult {
    pub fn is_solved(&self) -> bool {
        !self.letters.is_empty()
            && self
                .letters
                .iter()
                .all(|l| l.status == LetterStatus::Correct)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum RoundOutcome {
    InProgress,
    Won,
    Lost,
}

impl RoundOutcome {
    pub fn is_terminal(self) -> bool {
        !matches!(self, RoundOutcome::InProgress)
    }
}

impl fmt::Display for RoundOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RoundOutcome::InProgress => f.write_str("in progress"),
            RoundOutcome::Won => f.write_str("won"),
            RoundOutcome::Lost => f.write_str("lost"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum LossReason {
    GuessesExhausted,
    TimeExpired,
}

/// A letter disclosed by a joker rather than by guessing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RevealedLetter {
    pub position: u32,
    pub letter: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum Hint {
    Definition(String),
    Unavailable,
}

impl fmt::Display for Hint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Hint::Definition(text) => f.write_str(text),
            Hint::Unavailable => f.write_str("No hint is available for this word."),
        }
    }
}

/// Emitted once, at the moment a round leaves `InProgress`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundSummary {
    pub round_id: RoundId,
    pub outcome: RoundOutcome,
    pub loss_reason: Option<LossReason>,
    pub guess_count: u32,
    pub target_word: String,
}

impl RoundSummary {
    pub fn won(&self) -> bool {
        self.outcome == RoundOutcome::Won
    }
}

/// Read-only view of a round handed to the presentation layer.
/// The target word is withheld until the round is over.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RoundSnapshot {
    pub round_id: RoundId,
    pub difficulty: DifficultyProfile,
    pub outcome: RoundOutcome,
    pub loss_reason: Option<LossReason>,
    pub remaining_secs: u32,
    pub current_input: Vec<char>,
    pub submitted_guesses: Vec<GuessResult>,
    pub revealed: Vec<RevealedLetter>,
    pub eliminated_letters: BTreeSet<char>,
    pub jokers_used: Vec<JokerKind>,
    pub hint: Option<Hint>,
    pub invalid_word_alert: bool,
    pub target_word: Option<String>,
}

impl RoundSnapshot {
    pub fn guesses_left(&self) -> u32 {
        self.difficulty
            .max_guesses
            .saturating_sub(self.submitted_guesses.len() as u32)
    }

    /// Letters of the row being typed, with revealed letters at their fixed
    /// indices and `None` for empty slots.
    pub fn input_row(&self) -> Vec<Option<char>> {
        let mut row = vec![None; self.difficulty.word_length];
        for revealed in &self.revealed {
            if let Some(slot) = row.get_mut(revealed.position as usize) {
                *slot = Some(revealed.letter);
            }
        }
        let mut typed = self.current_input.iter();
        for slot in row.iter_mut().filter(|slot| slot.is_none()) {
            match typed.next() {
                Some(letter) => *slot = Some(*letter),
                None => break,
            }
        }
        row
    }
}
