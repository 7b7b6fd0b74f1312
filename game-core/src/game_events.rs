use game_types::{DifficultyLevel, GuessResult, JokerEffect, JokerKind, RoundId, RoundSummary};

#[derive(Debug, Clone, PartialEq)]
pub enum RoundEvent {
    RoundStarted {
        round_id: RoundId,
        level: DifficultyLevel,
        word_length: usize,
        duration_secs: u32,
    },
    InputChanged {
        round_id: RoundId,
        input: Vec<char>,
    },
    InvalidWord {
        round_id: RoundId,
        word: String,
    },
    GuessEvaluated {
        round_id: RoundId,
        result: GuessResult,
    },
    JokerUsed {
        round_id: RoundId,
        kind: JokerKind,
        effect: JokerEffect,
    },
    TimeTick {
        round_id: RoundId,
        remaining_secs: u32,
    },
    RoundFinished {
        summary: RoundSummary,
    },
}

impl RoundEvent {
    pub fn round_id(&self) -> RoundId {
        match self {
            RoundEvent::RoundStarted { round_id, .. } => *round_id,
            RoundEvent::InputChanged { round_id, .. } => *round_id,
            RoundEvent::InvalidWord { round_id, .. } => *round_id,
            RoundEvent::GuessEvaluated { round_id, .. } => *round_id,
            RoundEvent::JokerUsed { round_id, .. } => *round_id,
            RoundEvent::TimeTick { round_id, .. } => *round_id,
            RoundEvent::RoundFinished { summary } => summary.round_id,
        }
    }
}

/// Event handler trait for reacting to round changes
pub trait RoundEventHandler: Send {
    fn handle_event(&mut self, event: RoundEvent);
}

/// Simple event bus for distributing round events
pub struct RoundEventBus {
    handlers: Vec<Box<dyn RoundEventHandler>>,
}

impl RoundEventBus {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler(&mut self, handler: Box<dyn RoundEventHandler>) {
        self.handlers.push(handler);
    }

    pub fn handler_count(&self) -> usize {
        self.handlers.len()
    }

    pub fn publish(&mut self, event: RoundEvent) {
        for handler in &mut self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

impl Default for RoundEventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for RoundEventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RoundEventBus")
            .field("handlers", &self.handlers.len())
            .finish()
    }
}
