use game_types::{EXTRA_TIME_SECS, GameError, Hint, JokerEffect, JokerKind, RevealedLetter};
use rand::Rng;

use crate::Round;

impl Round {
    /// Apply a joker the caller has already taken out of the inventory.
    ///
    /// `definition` is the word source's hint for the target, only read by
    /// `ShowHint`.
    pub fn apply_joker(
        &mut self,
        kind: JokerKind,
        definition: Option<&str>,
    ) -> Result<JokerEffect, GameError> {
        if !self.is_in_progress() {
            return Err(GameError::RoundNotInProgress);
        }

        let effect = match kind {
            JokerKind::RevealLetter => self.reveal_letter(),
            JokerKind::EliminateLetters => self.eliminate_letters(),
            JokerKind::ShowHint => self.show_hint(definition),
            JokerKind::ExtraTime => self.add_time(EXTRA_TIME_SECS),
        };
        self.jokers_used.push(kind);

        tracing::debug!("Round {} applied {}: {:?}", self.id, kind, effect);
        Ok(effect)
    }

    fn reveal_letter(&mut self) -> JokerEffect {
        let hidden: Vec<usize> = (0..self.difficulty.word_length)
            .filter(|position| !self.revealed.contains(position))
            .collect();

        if hidden.is_empty() {
            tracing::warn!("Round {}: every letter is already revealed", self.id);
            return JokerEffect::NothingToReveal;
        }

        let position = hidden[self.rng.random_range(0..hidden.len())];
        self.revealed.insert(position);

        // One slot fewer to type into; drop overflow from the end
        let capacity = self.input_capacity();
        self.current_input.truncate(capacity);
        self.invalid_word_alert = false;

        JokerEffect::LetterRevealed(RevealedLetter {
            position: position as u32,
            letter: self.target[position],
        })
    }

    fn eliminate_letters(&mut self) -> JokerEffect {
        let newly_eliminated: Vec<char> = self
            .alphabet
            .letters()
            .iter()
            .copied()
            .filter(|letter| !self.target.contains(letter))
            .filter(|letter| self.eliminated.insert(*letter))
            .collect();

        JokerEffect::LettersEliminated {
            letters: newly_eliminated,
        }
    }

    fn show_hint(&mut self, definition: Option<&str>) -> JokerEffect {
        let hint = match definition.map(str::trim).filter(|d| !d.is_empty()) {
            Some(text) => Hint::Definition(text.to_string()),
            None => Hint::Unavailable,
        };
        self.hint = Some(hint.clone());
        JokerEffect::HintShown(hint)
    }

    fn add_time(&mut self, seconds: u32) -> JokerEffect {
        self.remaining_secs = self.remaining_secs.saturating_add(seconds);
        JokerEffect::TimeAdded {
            seconds,
            remaining_secs: self.remaining_secs,
        }
    }
}
