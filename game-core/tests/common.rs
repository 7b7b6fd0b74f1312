#![allow(dead_code)]

use game_core::{Alphabet, Round, RoundEvent, RoundEventHandler, WordList};
use game_types::{DifficultyLevel, DifficultyProfile, GameError, RoundOutcome, RoundSummary};
use std::sync::{Arc, Mutex};

/// Creates a test word list with a known set of Turkish words
pub fn create_test_word_list() -> WordList {
    let word_list = "elma: fruit\nkedi\nmasa\nelmas: A precious stone\nkargo\nrakam\nsalem\nkalem\nmakas\nyağmur\nbardak";
    WordList::from_word_list(word_list, Alphabet::turkish())
}

/// Creates a round with a specific target word
pub fn create_round_with_word(level: DifficultyLevel, word: &str) -> Round {
    Round::new(level.profile(), Alphabet::turkish(), word)
        .unwrap()
        .with_rng_seed(42)
}

/// Creates a standard five-letter round for "ELMAS"
pub fn create_standard_round() -> Round {
    create_round_with_word(DifficultyLevel::Medium, "ELMAS")
}

/// Creates a round with a custom clock
pub fn create_timed_round(word: &str, duration_secs: u32) -> Round {
    let length = word.chars().count();
    let profile =
        DifficultyProfile::new(DifficultyLevel::Medium, length, 6, duration_secs, 6).unwrap();
    Round::new(profile, Alphabet::turkish(), word).unwrap()
}

/// Types every letter of `word`, ignoring rejections
pub fn type_word(round: &mut Round, word: &str) {
    for letter in word.chars() {
        round.append_letter(letter).ok();
    }
}

/// Types and submits a guess, checking it against the word list first
pub fn play_guess(
    round: &mut Round,
    list: &WordList,
    word: &str,
) -> Result<Option<RoundSummary>, GameError> {
    type_word(round, word);
    let candidate = round.candidate_word()?;
    if !list.contains_word(&candidate) {
        round.reject_word();
        return Err(GameError::UnknownWord { word: candidate });
    }
    round.submit(&candidate).map(|(_, summary)| summary)
}

/// Asserts that a round is in a specific state
pub fn assert_round_state(round: &Round, expected_outcome: RoundOutcome, expected_guesses: usize) {
    assert_eq!(
        round.outcome(),
        expected_outcome,
        "Expected outcome {:?}, got {:?}",
        expected_outcome,
        round.outcome()
    );
    assert_eq!(
        round.guesses().len(),
        expected_guesses,
        "Expected {} guesses, got {}",
        expected_guesses,
        round.guesses().len()
    );
}

/// Event collector for testing event emissions
#[derive(Clone)]
pub struct EventCollector {
    events: Arc<Mutex<Vec<RoundEvent>>>,
}

impl EventCollector {
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn get_events(&self) -> Vec<RoundEvent> {
        self.events.lock().unwrap().clone()
    }

    pub fn event_count(&self) -> usize {
        self.events.lock().unwrap().len()
    }

    pub fn has_event_type(&self, check_fn: impl Fn(&RoundEvent) -> bool) -> bool {
        self.events.lock().unwrap().iter().any(check_fn)
    }
}

impl RoundEventHandler for EventCollector {
    fn handle_event(&mut self, event: RoundEvent) {
        self.events.lock().unwrap().push(event);
    }
}
