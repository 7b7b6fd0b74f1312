use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use game_core::{Alphabet, WordSource};
use game_types::GameError;
use rand::Rng;
use reqwest::Client;
use serde_json::Value;
use tokio::sync::RwLock;

const DEFAULT_RETRIES: u32 = 2;
const RETRY_BACKOFF: Duration = Duration::from_millis(250);

#[derive(Debug, Default)]
struct WordBucket {
    words: Vec<String>,
    known: HashSet<String>,
}

/// Word source backed by a static HTTP endpoint serving
/// `{base_url}/{length}.json`. Each length is fetched once and cached.
pub struct RemoteWordSource {
    client: Client,
    base_url: String,
    alphabet: Alphabet,
    retries: u32,
    cache: RwLock<HashMap<usize, Arc<WordBucket>>>,
}

impl RemoteWordSource {
    pub fn new(base_url: &str, alphabet: Alphabet, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("building HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            alphabet,
            retries: DEFAULT_RETRIES,
            cache: RwLock::new(HashMap::new()),
        })
    }

    pub fn with_retries(mut self, retries: u32) -> Self {
        self.retries = retries;
        self
    }

    async fn bucket(&self, length: usize) -> Result<Arc<WordBucket>, GameError> {
        if let Some(bucket) = self.cache.read().await.get(&length) {
            return Ok(bucket.clone());
        }

        let bucket = Arc::new(self.fetch_with_retries(length).await?);
        self.cache.write().await.insert(length, bucket.clone());
        Ok(bucket)
    }

    async fn fetch_with_retries(&self, length: usize) -> Result<WordBucket, GameError> {
        let mut attempt = 0;
        loop {
            match self.fetch(length).await {
                Ok(bucket) => return Ok(bucket),
                Err(e) if attempt < self.retries => {
                    attempt += 1;
                    tracing::warn!("Fetching {}-letter words failed (attempt {}): {:#}", length, attempt, e);
                    tokio::time::sleep(RETRY_BACKOFF * attempt).await;
                }
                Err(e) => {
                    tracing::warn!("Giving up on {}-letter words: {:#}", length, e);
                    return Err(GameError::WordUnavailable {
                        length,
                        reason: e.to_string(),
                    });
                }
            }
        }
    }

    async fn fetch(&self, length: usize) -> Result<WordBucket> {
        let url = format!("{}/{}.json", self.base_url, length);
        tracing::debug!("Fetching words from {}", url);

        let body: Value = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .with_context(|| format!("decoding {}", url))?;

        let words = parse_word_payload(&body, &self.alphabet, length);
        if words.is_empty() {
            anyhow::bail!("{} has no usable words", url);
        }

        Ok(WordBucket {
            known: words.iter().cloned().collect(),
            words,
        })
    }
}

/// Pull words of `length` out of a JSON array of strings, or an object
/// whose values are strings. Everything else is skipped.
pub fn parse_word_payload(body: &Value, alphabet: &Alphabet, length: usize) -> Vec<String> {
    let candidates: Vec<&Value> = match body {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => map.values().collect(),
        _ => Vec::new(),
    };

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter_map(Value::as_str)
        .filter_map(|word| alphabet.normalize_word(word))
        .filter(|letters| letters.len() == length)
        .map(|letters| letters.into_iter().collect::<String>())
        .filter(|word| seen.insert(word.clone()))
        .collect()
}

#[async_trait]
impl WordSource for RemoteWordSource {
    fn alphabet(&self) -> &Alphabet {
        &self.alphabet
    }

    async fn random_word(&self, length: usize) -> Result<String, GameError> {
        let bucket = self.bucket(length).await?;
        let index = rand::rng().random_range(0..bucket.words.len());
        Ok(bucket.words[index].clone())
    }

    async fn is_valid_word(&self, word: &str, length: usize) -> Result<bool, GameError> {
        let Some(letters) = self.alphabet.normalize_word(word) else {
            return Ok(false);
        };
        if letters.len() != length {
            return Ok(false);
        }

        let bucket = self.bucket(length).await.map_err(|e| {
            tracing::warn!("Cannot check {}: {}", word, e);
            GameError::WordCheckFailed {
                reason: e.to_string(),
            }
        })?;
        Ok(bucket.known.contains(&letters.into_iter().collect::<String>()))
    }
}
