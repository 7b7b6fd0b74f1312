pub mod alphabet;
pub mod evaluation;
pub mod game_events;
pub mod jokers;
pub mod round;
pub mod word_source;

// Re-export main components
pub use alphabet::*;
pub use evaluation::*;
pub use game_events::*;
pub use round::*;
pub use word_source::*;
