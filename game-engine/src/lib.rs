pub mod config;
pub mod remote_words;
pub mod rewards;
pub mod session;
pub mod terminal;
pub mod timer;

use std::sync::Arc;

use anyhow::Context;
use game_core::{WordList, WordSource};

use crate::config::Config;
use crate::remote_words::RemoteWordSource;

/// Pick the word source the configuration asks for: remote, then file,
/// then the embedded Turkish list.
pub fn build_word_source(config: &Config) -> anyhow::Result<Arc<dyn WordSource>> {
    let alphabet = config.alphabet();

    if let Some(url) = &config.word_source_url {
        tracing::info!("Using remote word source at {}", url);
        let source = RemoteWordSource::new(url, alphabet, config.word_fetch_timeout)?;
        return Ok(Arc::new(source));
    }

    if let Some(path) = &config.words_file {
        let list = WordList::from_file(path, alphabet)
            .with_context(|| format!("loading words from {}", path.display()))?;
        return Ok(Arc::new(list));
    }

    if alphabet.name() != "tr" {
        tracing::warn!(
            "Embedded word list is Turkish; ignoring WORD_ALPHABET={}",
            alphabet.name()
        );
    }
    let list = WordList::embedded();
    tracing::info!("Loaded {} embedded words", list.len());
    Ok(Arc::new(list))
}
