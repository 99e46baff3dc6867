#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Persistence engine: employee records and Telegram sessions over sea-orm.

mod employees;
mod sessions;

use sea_orm::{ConnectionTrait, Database, DatabaseConnection, Schema};
use tracing::info;

/// Storage engine holding the database connection. Implements both
/// [`staffbot_core::RecordStore`] and [`staffbot_core::SessionStore`].
pub struct StorageEngine {
    db: DatabaseConnection,
}

impl StorageEngine {
    /// Connect and make sure the tables exist.
    pub async fn new(database_url: &str) -> anyhow::Result<Self> {
        info!("Connecting to database for StorageEngine");
        let db = Database::connect(database_url).await?;

        let engine = Self { db };
        engine.ensure_schema().await?;
        info!("StorageEngine initialized");
        Ok(engine)
    }

    /// Get a reference to the database connection.
    #[must_use]
    pub const fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    async fn ensure_schema(&self) -> anyhow::Result<()> {
        let backend = self.db.get_database_backend();
        let schema = Schema::new(backend);

        let mut employees_table =
            schema.create_table_from_entity(staffbot_entities::employees::Entity);
        self.db
            .execute(employees_table.if_not_exists())
            .await?;

        let mut sessions_table =
            schema.create_table_from_entity(staffbot_entities::sessions::Entity);
        self.db
            .execute(sessions_table.if_not_exists())
            .await?;

        Ok(())
    }
}
