pub mod joker_inventory;
pub mod kv_store;
pub mod statistics_store;

pub use joker_inventory::JokerInventory;
pub use kv_store::SqlKeyValueStore;
pub use statistics_store::StatisticsStore;
