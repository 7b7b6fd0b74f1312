pub mod difficulty;
pub mod errors;
pub mod game;
pub mod joker;
pub mod messages;
pub mod stats;

// Re-export all types
pub use difficulty::*;
pub use errors::*;
pub use game::*;
pub use joker::*;
pub use messages::*;
pub use stats::*;
