use serde::{Deserialize, Serialize};
use thiserror::Error;
use ts_rs::TS;

use crate::JokerKind;

#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum GameError {
    #[error("invalid difficulty: {reason}")]
    InvalidDifficulty { reason: String },
    #[error("no word of length {length} available: {reason}")]
    WordUnavailable { length: usize, reason: String },
    #[error("not a known word: {word}")]
    UnknownWord { word: String },
    #[error("could not check the word: {reason}")]
    WordCheckFailed { reason: String },
    #[error("no round has been started")]
    NoActiveRound,
    #[error("round is already over")]
    RoundNotInProgress,
    #[error("guess needs {expected} letters, got {actual}")]
    IncompleteGuess { expected: usize, actual: usize },
    #[error("guess has {guess} letters but target has {target}")]
    LengthMismatch { guess: usize, target: usize },
    #[error("no {kind} jokers left")]
    JokerUnavailable { kind: JokerKind },
    #[error("joker grants must be positive")]
    InvalidGrant,
    #[error("round changed while waiting for the word source")]
    StaleSubmission,
}

/// Why a typed letter was ignored. These are expected, UI-driven no-ops.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum InputRejection {
    #[error("round is not in progress")]
    RoundOver,
    #[error("input row is full")]
    InputFull,
    #[error("letter was eliminated")]
    LetterEliminated,
    #[error("letter is not part of the alphabet")]
    NotInAlphabet,
}
