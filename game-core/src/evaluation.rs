use game_types::{GameError, LetterResult, LetterStatus};
use std::collections::HashMap;

pub struct GuessEvaluator;

impl GuessEvaluator {
    /// Classify every letter of `guess` against `target`.
    ///
    /// Exact matches are settled first and their letters removed from the
    /// pool, so a repeated letter is only marked `WrongPosition` as many
    /// times as the target still has copies of it.
    pub fn evaluate(guess: &[char], target: &[char]) -> Result<Vec<LetterResult>, GameError> {
        if guess.len() != target.len() {
            return Err(GameError::LengthMismatch {
                guess: guess.len(),
                target: target.len(),
            });
        }

        // Count frequency of each letter in target for handling duplicates
        let mut remaining: HashMap<char, u32> = HashMap::new();
        for &ch in target {
            *remaining.entry(ch).or_insert(0) += 1;
        }

        // First pass: mark correct positions
        let mut statuses: Vec<Option<LetterStatus>> = vec![None; guess.len()];
        for (i, (&g, &t)) in guess.iter().zip(target).enumerate() {
            if g == t {
                statuses[i] = Some(LetterStatus::Correct);
                if let Some(count) = remaining.get_mut(&g) {
                    *count -= 1;
                }
            }
        }

        // Second pass: resolve the rest against what is left
        for (i, &g) in guess.iter().enumerate() {
            if statuses[i].is_some() {
                continue;
            }

            let status = match remaining.get_mut(&g) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    LetterStatus::WrongPosition
                }
                _ => LetterStatus::Absent,
            };
            statuses[i] = Some(status);
        }

        Ok(guess
            .iter()
            .zip(statuses)
            .enumerate()
            .map(|(i, (&letter, status))| LetterResult {
                letter,
                status: status.unwrap_or(LetterStatus::Absent),
                position: i as u32,
            })
            .collect())
    }

    /// Convenience wrapper for already-normalized uppercase strings.
    pub fn evaluate_words(guess: &str, target: &str) -> Result<Vec<LetterResult>, GameError> {
        let guess: Vec<char> = guess.chars().collect();
        let target: Vec<char> = target.chars().collect();
        Self::evaluate(&guess, &target)
    }
}
