pub mod connection;
pub mod entities;
pub mod repositories;
pub mod store;

pub use repositories::{JokerInventory, SqlKeyValueStore, StatisticsStore};
pub use store::{KeyValueStore, MemoryStore};
