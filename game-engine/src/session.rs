use std::sync::Arc;
use std::time::Duration;

use game_core::{Round, RoundEvent, RoundEventBus, RoundEventHandler, WordSource};
use game_persistence::{JokerInventory, StatisticsStore};
use game_types::{
    DifficultyProfile, GameError, GuessResult, InputRejection, JokerEffect, JokerKind, RoundId,
    RoundSnapshot, RoundSummary,
};
use tokio::sync::Mutex;
use tokio::time::timeout;

use crate::timer::RoundTimer;

#[derive(Debug, Clone)]
pub struct SessionSettings {
    /// Clock period. `None` leaves the clock to explicit `tick()` calls.
    pub tick_interval: Option<Duration>,
    /// Upper bound on every word source call.
    pub word_timeout: Duration,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            tick_interval: Some(Duration::from_secs(1)),
            word_timeout: Duration::from_secs(3),
        }
    }
}

#[derive(Debug, Default)]
struct SessionState {
    round: Option<Round>,
    events: RoundEventBus,
    timer: Option<RoundTimer>,
}

struct SessionInner {
    state: Mutex<SessionState>,
    words: Arc<dyn WordSource>,
    inventory: Arc<JokerInventory>,
    statistics: Arc<StatisticsStore>,
    settings: SessionSettings,
}

impl SessionInner {
    /// Timer callback. Returns whether the timer should keep running.
    async fn tick_round(&self, round_id: RoundId) -> bool {
        let mut guard = self.state.lock().await;
        let state = &mut *guard;

        if state.round.as_ref().map(Round::id) != Some(round_id) {
            tracing::warn!("Ignoring tick for stale round {}", round_id);
            return false;
        }
        matches!(self.advance_clock(state).await, Ok(None))
    }

    async fn advance_clock(
        &self,
        state: &mut SessionState,
    ) -> Result<Option<RoundSummary>, GameError> {
        let round = state.round.as_mut().ok_or(GameError::NoActiveRound)?;
        if !round.is_in_progress() {
            return Err(GameError::RoundNotInProgress);
        }

        let summary = round.tick();
        state.events.publish(RoundEvent::TimeTick {
            round_id: round.id(),
            remaining_secs: round.remaining_secs(),
        });

        if let Some(summary) = &summary {
            self.finish_round(state, summary.clone()).await;
        }
        Ok(summary)
    }

    /// Runs once per round, under the state lock, right after the round
    /// reported its terminal transition.
    async fn finish_round(&self, state: &mut SessionState, summary: RoundSummary) {
        let stats = self
            .statistics
            .record_outcome(summary.won(), summary.guess_count)
            .await;
        tracing::info!(
            "Round {} recorded: {} played, streak {}",
            summary.round_id,
            stats.games_played,
            stats.current_streak
        );
        state.events.publish(RoundEvent::RoundFinished { summary });
    }
}

/// One player's game: the current round, its clock, and the stores the
/// round reports into.
#[derive(Clone)]
pub struct GameSession {
    inner: Arc<SessionInner>,
}

impl GameSession {
    pub fn new(
        words: Arc<dyn WordSource>,
        inventory: Arc<JokerInventory>,
        statistics: Arc<StatisticsStore>,
        settings: SessionSettings,
    ) -> Self {
        Self {
            inner: Arc::new(SessionInner {
                state: Mutex::new(SessionState::default()),
                words,
                inventory,
                statistics,
                settings,
            }),
        }
    }

    pub fn inventory(&self) -> &Arc<JokerInventory> {
        &self.inner.inventory
    }

    pub fn statistics(&self) -> &Arc<StatisticsStore> {
        &self.inner.statistics
    }

    pub async fn add_handler(&self, handler: Box<dyn RoundEventHandler>) {
        self.inner.state.lock().await.events.add_handler(handler);
    }

    /// Draw a new target and replace whatever round was running.
    pub async fn start_new_round(
        &self,
        difficulty: DifficultyProfile,
    ) -> Result<RoundSnapshot, GameError> {
        difficulty.validate()?;
        let length = difficulty.word_length;

        let word = timeout(
            self.inner.settings.word_timeout,
            self.inner.words.random_word(length),
        )
        .await
        .map_err(|_| GameError::WordUnavailable {
            length,
            reason: "word source timed out".to_string(),
        })??;

        let round = Round::new(difficulty, self.inner.words.alphabet().clone(), &word)?;
        let round_id = round.id();
        let level = round.difficulty().level;
        let duration_secs = round.difficulty().duration_secs;
        let snapshot = round.snapshot();

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        // Old clock goes first so none of its ticks can reach the new round
        state.timer = None;
        if let Some(previous) = state.round.as_ref().filter(|r| r.is_in_progress()) {
            tracing::info!("Abandoning round {} unfinished", previous.id());
        }

        state.round = Some(round);
        state.events.publish(RoundEvent::RoundStarted {
            round_id,
            level,
            word_length: length,
            duration_secs,
        });

        if let Some(period) = self.inner.settings.tick_interval {
            let session = Arc::downgrade(&self.inner);
            state.timer = Some(RoundTimer::start(round_id, period, move |id| {
                let session = session.clone();
                async move {
                    match session.upgrade() {
                        Some(inner) => inner.tick_round(id).await,
                        None => false,
                    }
                }
            }));
        }

        tracing::info!("Started {} round {} ({} letters)", level, round_id, length);
        Ok(snapshot)
    }

    pub async fn append_letter(&self, letter: char) -> Result<char, InputRejection> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let round = state.round.as_mut().ok_or(InputRejection::RoundOver)?;

        let accepted = round
            .append_letter(letter)
            .inspect_err(|reason| tracing::debug!("Ignored '{}': {}", letter, reason))?;
        state.events.publish(RoundEvent::InputChanged {
            round_id: round.id(),
            input: round.current_input().to_vec(),
        });
        Ok(accepted)
    }

    pub async fn remove_last_letter(&self) -> Option<char> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let round = state.round.as_mut()?;

        let removed = round.remove_last_letter()?;
        state.events.publish(RoundEvent::InputChanged {
            round_id: round.id(),
            input: round.current_input().to_vec(),
        });
        Some(removed)
    }

    /// Check the typed guess with the word source and, if it is a word,
    /// score it. The lock is released while the word source is consulted.
    pub async fn submit_guess(&self) -> Result<GuessResult, GameError> {
        let (round_id, candidate, length) = {
            let guard = self.inner.state.lock().await;
            let round = guard.round.as_ref().ok_or(GameError::NoActiveRound)?;
            (
                round.id(),
                round.candidate_word()?,
                round.difficulty().word_length,
            )
        };

        let known = timeout(
            self.inner.settings.word_timeout,
            self.inner.words.is_valid_word(&candidate, length),
        )
        .await
        .map_err(|_| {
            tracing::warn!("Word check for {} timed out", candidate);
            GameError::WordCheckFailed {
                reason: "word source timed out".to_string(),
            }
        })??;

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let round = state
            .round
            .as_mut()
            .filter(|r| r.id() == round_id)
            .ok_or(GameError::StaleSubmission)?;
        // The clock may have ended the round, or the input moved on
        if round.candidate_word()? != candidate {
            return Err(GameError::StaleSubmission);
        }

        if !known {
            tracing::debug!("Round {}: {} is not a word", round_id, candidate);
            round.reject_word();
            state.events.publish(RoundEvent::InvalidWord {
                round_id,
                word: candidate.clone(),
            });
            return Err(GameError::UnknownWord { word: candidate });
        }

        let (result, summary) = round.submit(&candidate)?;
        state.events.publish(RoundEvent::GuessEvaluated {
            round_id,
            result: result.clone(),
        });

        if let Some(summary) = summary {
            state.timer = None;
            self.inner.finish_round(state, summary).await;
        }
        Ok(result)
    }

    /// Advance the clock by one step by hand.
    pub async fn tick(&self) -> Result<Option<RoundSummary>, GameError> {
        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;

        let summary = self.inner.advance_clock(state).await?;
        if summary.is_some() {
            state.timer = None;
        }
        Ok(summary)
    }

    /// Spend one joker of `kind` on the current round.
    pub async fn use_joker(&self, kind: JokerKind) -> Result<JokerEffect, GameError> {
        let hint_lookup = match kind {
            JokerKind::ShowHint => Some(self.lookup_hint().await?),
            _ => None,
        };

        let mut guard = self.inner.state.lock().await;
        let state = &mut *guard;
        let round = state.round.as_mut().ok_or(GameError::NoActiveRound)?;
        let round_id = round.id();

        if let Some((lookup_round, _)) = &hint_lookup {
            if *lookup_round != round_id {
                return Err(GameError::StaleSubmission);
            }
        }
        if !round.is_in_progress() {
            return Err(GameError::RoundNotInProgress);
        }
        if !self.inner.inventory.consume(kind).await {
            return Err(GameError::JokerUnavailable { kind });
        }

        let definition = hint_lookup.and_then(|(_, definition)| definition);
        let effect = round.apply_joker(kind, definition.as_deref())?;
        state.events.publish(RoundEvent::JokerUsed {
            round_id,
            kind,
            effect: effect.clone(),
        });
        Ok(effect)
    }

    async fn lookup_hint(&self) -> Result<(RoundId, Option<String>), GameError> {
        let (round_id, target) = {
            let guard = self.inner.state.lock().await;
            let round = guard.round.as_ref().ok_or(GameError::NoActiveRound)?;
            if !round.is_in_progress() {
                return Err(GameError::RoundNotInProgress);
            }
            (round.id(), round.target_word())
        };

        let kind = JokerKind::ShowHint;
        if self.inner.inventory.count(kind).await == 0 {
            return Err(GameError::JokerUnavailable { kind });
        }

        let definition = timeout(self.inner.settings.word_timeout, self.inner.words.hint(&target))
            .await
            .unwrap_or_else(|_| {
                tracing::warn!("Hint lookup for round {} timed out", round_id);
                None
            });
        Ok((round_id, definition))
    }

    pub async fn snapshot(&self) -> Option<RoundSnapshot> {
        self.inner
            .state
            .lock()
            .await
            .round
            .as_ref()
            .map(Round::snapshot)
    }

    /// Retry any store writes that failed earlier.
    pub async fn flush(&self) -> anyhow::Result<()> {
        self.inner.inventory.flush().await?;
        self.inner.statistics.flush().await?;
        Ok(())
    }
}
