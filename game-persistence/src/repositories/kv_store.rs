use anyhow::{Context, Result};
use async_trait::async_trait;
use sea_orm::{sea_query::OnConflict, ActiveValue::Set, DatabaseConnection, EntityTrait};

use crate::entities::{kv_entries, prelude::*};
use crate::store::KeyValueStore;

/// `KeyValueStore` backed by the `kv_entries` table.
#[derive(Clone)]
pub struct SqlKeyValueStore {
    db: DatabaseConnection,
}

impl SqlKeyValueStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl KeyValueStore for SqlKeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        let entry = KvEntries::find_by_id(key.to_string())
            .one(&self.db)
            .await
            .with_context(|| format!("reading {}", key))?;

        Ok(entry.map(|model| model.value))
    }

    async fn set(&self, key: &str, value: Vec<u8>) -> Result<()> {
        let entry = kv_entries::ActiveModel {
            key: Set(key.to_string()),
            value: Set(value),
            updated_at: Set(chrono::Utc::now().into()),
        };

        KvEntries::insert(entry)
            .on_conflict(
                OnConflict::column(kv_entries::Column::Key)
                    .update_columns([kv_entries::Column::Value, kv_entries::Column::UpdatedAt])
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .with_context(|| format!("writing {}", key))?;

        Ok(())
    }
}
