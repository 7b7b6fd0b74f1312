use game_types::{
    DifficultyProfile, GameError, GuessResult, Hint, InputRejection, JokerKind, LossReason,
    RevealedLetter, RoundId, RoundOutcome, RoundSnapshot, RoundSummary,
};
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::collections::BTreeSet;
use uuid::Uuid;

use crate::{Alphabet, GuessEvaluator};

/// One playthrough, from the target word being drawn to Won or Lost.
///
/// `Round` is a plain state machine: it never blocks and never talks to a
/// word source or a store. Validation of a candidate word happens outside,
/// between [`Round::candidate_word`] and [`Round::submit`].
#[derive(Debug)]
pub struct Round {
    pub(crate) id: RoundId,
    pub(crate) difficulty: DifficultyProfile,
    pub(crate) alphabet: Alphabet,
    pub(crate) target: Vec<char>, // Hidden from snapshots until the round ends
    pub(crate) current_input: Vec<char>,
    pub(crate) guesses: Vec<GuessResult>,
    pub(crate) outcome: RoundOutcome,
    pub(crate) loss_reason: Option<LossReason>,
    pub(crate) remaining_secs: u32,
    pub(crate) revealed: BTreeSet<usize>,
    pub(crate) eliminated: BTreeSet<char>,
    pub(crate) jokers_used: Vec<JokerKind>,
    pub(crate) hint: Option<Hint>,
    pub(crate) invalid_word_alert: bool,
    pub(crate) rng: StdRng,
}

impl Round {
    pub fn new(
        difficulty: DifficultyProfile,
        alphabet: Alphabet,
        target_word: &str,
    ) -> Result<Self, GameError> {
        difficulty.validate()?;

        let target = alphabet
            .normalize_word(target_word)
            .filter(|letters| letters.len() == difficulty.word_length)
            .ok_or_else(|| GameError::WordUnavailable {
                length: difficulty.word_length,
                reason: format!("'{}' does not fit the round", target_word),
            })?;

        Ok(Self {
            id: Uuid::new_v4(),
            remaining_secs: difficulty.duration_secs,
            difficulty,
            alphabet,
            target,
            current_input: Vec::new(),
            guesses: Vec::new(),
            outcome: RoundOutcome::InProgress,
            loss_reason: None,
            revealed: BTreeSet::new(),
            eliminated: BTreeSet::new(),
            jokers_used: Vec::new(),
            hint: None,
            invalid_word_alert: false,
            rng: StdRng::from_os_rng(),
        })
    }

    /// Make joker randomness reproducible.
    pub fn with_rng_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    pub fn id(&self) -> RoundId {
        self.id
    }

    pub fn difficulty(&self) -> &DifficultyProfile {
        &self.difficulty
    }

    pub fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    pub fn outcome(&self) -> RoundOutcome {
        self.outcome
    }

    pub fn is_in_progress(&self) -> bool {
        self.outcome == RoundOutcome::InProgress
    }

    pub fn remaining_secs(&self) -> u32 {
        self.remaining_secs
    }

    pub fn current_input(&self) -> &[char] {
        &self.current_input
    }

    pub fn guesses(&self) -> &[GuessResult] {
        &self.guesses
    }

    pub fn revealed_positions(&self) -> &BTreeSet<usize> {
        &self.revealed
    }

    pub fn eliminated_letters(&self) -> &BTreeSet<char> {
        &self.eliminated
    }

    pub fn jokers_used(&self) -> &[JokerKind] {
        &self.jokers_used
    }

    pub fn target_word(&self) -> String {
        self.target.iter().collect()
    }

    /// How many letters the player still types; revealed slots are pre-filled.
    pub fn input_capacity(&self) -> usize {
        self.difficulty.word_length - self.revealed.len()
    }

    pub fn append_letter(&mut self, letter: char) -> Result<char, InputRejection> {
        if !self.is_in_progress() {
            return Err(InputRejection::RoundOver);
        }
        let letter = self
            .alphabet
            .normalize(letter)
            .ok_or(InputRejection::NotInAlphabet)?;
        if self.eliminated.contains(&letter) {
            return Err(InputRejection::LetterEliminated);
        }
        if self.current_input.len() >= self.input_capacity() {
            return Err(InputRejection::InputFull);
        }

        self.current_input.push(letter);
        self.invalid_word_alert = false;
        Ok(letter)
    }

    /// Only typed letters can be removed; revealed letters stay put.
    pub fn remove_last_letter(&mut self) -> Option<char> {
        if !self.is_in_progress() {
            return None;
        }
        let removed = self.current_input.pop();
        if removed.is_some() {
            self.invalid_word_alert = false;
        }
        removed
    }

    /// The full word the player would submit: typed letters fill the slots
    /// that were not revealed, in order.
    pub fn candidate_word(&self) -> Result<String, GameError> {
        if !self.is_in_progress() {
            return Err(GameError::RoundNotInProgress);
        }
        if self.current_input.len() != self.input_capacity() {
            return Err(GameError::IncompleteGuess {
                expected: self.input_capacity(),
                actual: self.current_input.len(),
            });
        }

        let mut typed = self.current_input.iter();
        let word: String = (0..self.difficulty.word_length)
            .filter_map(|position| {
                if self.revealed.contains(&position) {
                    Some(self.target[position])
                } else {
                    typed.next().copied()
                }
            })
            .collect();
        Ok(word)
    }

    /// Raise the "not a word" alert. Input is kept so the player can fix it.
    pub fn reject_word(&mut self) {
        self.invalid_word_alert = true;
    }

    /// Record an already validated guess. Returns the summary when this guess
    /// ended the round.
    pub fn submit(&mut self, word: &str) -> Result<(GuessResult, Option<RoundSummary>), GameError> {
        if !self.is_in_progress() {
            return Err(GameError::RoundNotInProgress);
        }

        let letters = self
            .alphabet
            .normalize_word(word)
            .ok_or_else(|| GameError::UnknownWord {
                word: word.to_string(),
            })?;
        let feedback = GuessEvaluator::evaluate(&letters, &self.target)?;

        let result = GuessResult {
            word: letters.iter().collect(),
            letters: feedback,
            submitted_at: chrono::Utc::now().to_rfc3339(),
        };
        self.guesses.push(result.clone());
        self.current_input.clear();
        self.invalid_word_alert = false;

        // A correct last guess is a win, so check that first
        let summary = if letters == self.target {
            Some(self.finish(RoundOutcome::Won, None))
        } else if self.guesses.len() as u32 >= self.difficulty.max_guesses {
            Some(self.finish(RoundOutcome::Lost, Some(LossReason::GuessesExhausted)))
        } else {
            None
        };

        Ok((result, summary))
    }

    /// Advance the clock by one second.
    pub fn tick(&mut self) -> Option<RoundSummary> {
        if !self.is_in_progress() {
            return None;
        }

        self.remaining_secs = self.remaining_secs.saturating_sub(1);
        if self.remaining_secs == 0 {
            return Some(self.finish(RoundOutcome::Lost, Some(LossReason::TimeExpired)));
        }
        None
    }

    fn finish(&mut self, outcome: RoundOutcome, loss_reason: Option<LossReason>) -> RoundSummary {
        self.outcome = outcome;
        self.loss_reason = loss_reason;

        tracing::info!(
            "Round {} {} after {} guesses ({}s left)",
            self.id,
            outcome,
            self.guesses.len(),
            self.remaining_secs
        );

        RoundSummary {
            round_id: self.id,
            outcome,
            loss_reason,
            guess_count: self.guesses.len() as u32,
            target_word: self.target_word(),
        }
    }

    pub fn snapshot(&self) -> RoundSnapshot {
        RoundSnapshot {
            round_id: self.id,
            difficulty: self.difficulty.clone(),
            outcome: self.outcome,
            loss_reason: self.loss_reason,
            remaining_secs: self.remaining_secs,
            current_input: self.current_input.clone(),
            submitted_guesses: self.guesses.clone(),
            revealed: self
                .revealed
                .iter()
                .map(|&position| RevealedLetter {
                    position: position as u32,
                    letter: self.target[position],
                })
                .collect(),
            eliminated_letters: self.eliminated.clone(),
            jokers_used: self.jokers_used.clone(),
            hint: self.hint.clone(),
            invalid_word_alert: self.invalid_word_alert,
            target_word: self.outcome.is_terminal().then(|| self.target_word()),
        }
    }
}
