//! Session persistence: the whole history is stored as one JSON text column
//! and overwritten on every save (last-writer-wins).

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, EntityTrait, QueryFilter, Set};
use staffbot_core::{ChatMessage, SessionStore, StoredSession};
use staffbot_entities::sessions;
use tracing::info;

use crate::StorageEngine;

#[async_trait]
impl SessionStore for StorageEngine {
    async fn get(&self, id: &str) -> anyhow::Result<Option<StoredSession>> {
        let Some(model) = sessions::Entity::find_by_id(id).one(&self.db).await? else {
            return Ok(None);
        };

        let messages: Vec<ChatMessage> = serde_json::from_str(&model.messages)?;
        Ok(Some(StoredSession {
            id: model.id,
            messages,
            created_at: model.created_at.and_utc(),
            updated_at: model.updated_at.and_utc(),
        }))
    }

    async fn save(&self, session: &StoredSession) -> anyhow::Result<()> {
        let messages_json = serde_json::to_string(&session.messages)?;
        let now = Utc::now().naive_utc();

        if let Some(model) = sessions::Entity::find_by_id(session.id.as_str())
            .one(&self.db)
            .await?
        {
            sessions::ActiveModel {
                id: Set(model.id),
                messages: Set(messages_json),
                created_at: Set(model.created_at),
                updated_at: Set(now),
            }
            .update(&self.db)
            .await?;
        } else {
            sessions::ActiveModel {
                id: Set(session.id.clone()),
                messages: Set(messages_json),
                created_at: Set(now),
                updated_at: Set(now),
            }
            .insert(&self.db)
            .await?;
        }

        Ok(())
    }

    async fn delete(&self, id: &str) -> anyhow::Result<()> {
        sessions::Entity::delete_by_id(id).exec(&self.db).await?;
        info!("Cleared session: {id}");
        Ok(())
    }

    async fn delete_older_than(&self, max_age: chrono::Duration) -> anyhow::Result<u64> {
        let cutoff = (Utc::now() - max_age).naive_utc();
        let result = sessions::Entity::delete_many()
            .filter(sessions::Column::UpdatedAt.lt(cutoff))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected)
    }
}
