use anyhow::{Context, Result};
use async_trait::async_trait;
use game_types::{GameError, SUPPORTED_WORD_LENGTHS};
use rand::Rng;
use std::collections::{HashMap, HashSet};
use std::path::Path;

use crate::Alphabet;

const EMBEDDED_TURKISH_WORDS: &str = include_str!("../words/tr.txt");

/// Supplies target words and answers "is this a word?".
///
/// Implementations may be backed by a static list or a network lookup;
/// either way callers should treat both calls as potentially slow.
#[async_trait]
pub trait WordSource: Send + Sync {
    /// Letters the words are written in.
    fn alphabet(&self) -> &Alphabet;

    async fn random_word(&self, length: usize) -> Result<String, GameError>;

    /// `Err` means the source could not answer, not that the word is unknown.
    async fn is_valid_word(&self, word: &str, length: usize) -> Result<bool, GameError>;

    /// Definition of `word`, if the source knows one.
    async fn hint(&self, _word: &str) -> Option<String> {
        None
    }
}

/// In-memory word list, optionally carrying a definition per word.
#[derive(Debug, Clone)]
pub struct WordList {
    alphabet: Alphabet,
    words_by_length: HashMap<usize, Vec<String>>,
    known_words: HashSet<String>,
    definitions: HashMap<String, String>,
}

impl WordList {
    /// Parse a word list: one word per line, `#` starts a comment line,
    /// and `WORD: definition` attaches a hint to the word.
    pub fn from_word_list(word_list: &str, alphabet: Alphabet) -> Self {
        let mut words_by_length: HashMap<usize, Vec<String>> = HashMap::new();
        let mut known_words = HashSet::new();
        let mut definitions = HashMap::new();
        let mut skipped = 0usize;

        for line in word_list.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }

            let (raw_word, definition) = match line.split_once(':') {
                Some((word, definition)) => (word.trim(), Some(definition.trim())),
                None => (line, None),
            };

            let letters = match alphabet.normalize_word(raw_word) {
                Some(letters) if SUPPORTED_WORD_LENGTHS.contains(&letters.len()) => letters,
                _ => {
                    skipped += 1;
                    continue;
                }
            };

            let word: String = letters.iter().collect();
            if let Some(definition) = definition.filter(|d| !d.is_empty()) {
                definitions.insert(word.clone(), definition.to_string());
            }
            if known_words.insert(word.clone()) {
                words_by_length.entry(letters.len()).or_default().push(word);
            }
        }

        if skipped > 0 {
            tracing::debug!("Skipped {} unusable entries while loading word list", skipped);
        }

        Self {
            alphabet,
            words_by_length,
            known_words,
            definitions,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P, alphabet: Alphabet) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read word list {}", path.display()))?;

        let list = Self::from_word_list(&contents, alphabet);
        tracing::info!("Loaded {} words from {}", list.len(), path.display());
        Ok(list)
    }

    /// The Turkish list that ships with the game.
    pub fn embedded() -> Self {
        Self::from_word_list(EMBEDDED_TURKISH_WORDS, Alphabet::turkish())
    }

    pub fn len(&self) -> usize {
        self.known_words.len()
    }

    pub fn is_empty(&self) -> bool {
        self.known_words.is_empty()
    }

    /// Check if a word is in the list (case-insensitive, using the alphabet's casing)
    pub fn contains_word(&self, word: &str) -> bool {
        match self.alphabet.normalize_word(word) {
            Some(letters) => self.known_words.contains(&letters.iter().collect::<String>()),
            None => false,
        }
    }

    /// Get a random word of the specified length
    pub fn get_random_word(&self, length: usize) -> Result<String, GameError> {
        let words = self
            .words_by_length
            .get(&length)
            .filter(|words| !words.is_empty())
            .ok_or_else(|| GameError::WordUnavailable {
                length,
                reason: "word list has no words of that length".to_string(),
            })?;

        let index = rand::rng().random_range(0..words.len());
        Ok(words[index].clone())
    }

    pub fn word_count_by_length(&self, length: usize) -> usize {
        self.words_by_length.get(&length).map_or(0, Vec::len)
    }

    pub fn definition(&self, word: &str) -> Option<&str> {
        let letters = self.alphabet.normalize_word(word)?;
        self.definitions
            .get(&letters.iter().collect::<String>())
            .map(String::as_str)
    }
}

#[async_trait]
impl WordSource for WordList {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    async fn random_word(&self, length: usize) -> Result<String, GameError> {
        self.get_random_word(length)
    }

    async fn is_valid_word(&self, word: &str, length: usize) -> Result<bool, GameError> {
        Ok(word.chars().count() == length && self.contains_word(word))
    }

    async fn hint(&self, word: &str) -> Option<String> {
        self.definition(word).map(str::to_string)
    }
}
