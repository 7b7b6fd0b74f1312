pub mod kv_entries;
pub mod prelude;
