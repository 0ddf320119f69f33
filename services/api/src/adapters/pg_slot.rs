//! services/api/src/adapters/pg_slot.rs
//!
//! A `ProjectRepository` backed by a single row of the `storage_slots` table
//! in PostgreSQL, using `sqlx`.

use async_trait::async_trait;
use sqlx::{PgPool, Row};
use thought_partner_core::domain::Project;
use thought_partner_core::ports::{PortError, PortResult, ProjectRepository};

use crate::adapters::records::{decode_project, encode_project};

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// Keeps the project blob in the row whose key is `key`.
#[derive(Clone)]
pub struct PgSlotAdapter {
    pool: PgPool,
    key: String,
}

impl PgSlotAdapter {
    /// Creates a new `PgSlotAdapter`.
    pub fn new(pool: PgPool, key: impl Into<String>) -> Self {
        Self {
            pool,
            key: key.into(),
        }
    }

    /// A helper function to run database migrations at startup.
    pub async fn run_migrations(&self) -> Result<(), sqlx::migrate::MigrateError> {
        sqlx::migrate!("./migrations").run(&self.pool).await
    }
}

//=========================================================================================
// `ProjectRepository` Trait Implementation
//=========================================================================================

#[async_trait]
impl ProjectRepository for PgSlotAdapter {
    async fn load(&self) -> PortResult<Option<Project>> {
        let row = sqlx::query("SELECT value FROM storage_slots WHERE key = $1")
            .bind(&self.key)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        match row {
            Some(row) => {
                let blob: String = row
                    .try_get("value")
                    .map_err(|e| PortError::Unexpected(e.to_string()))?;
                decode_project(&blob).map(Some)
            }
            None => Ok(None),
        }
    }

    async fn save(&self, project: &Project) -> PortResult<()> {
        let blob = encode_project(project)?;
        sqlx::query(
            "INSERT INTO storage_slots (key, value, updated_at) VALUES ($1, $2, NOW()) \
             ON CONFLICT (key) DO UPDATE SET value = EXCLUDED.value, updated_at = NOW()",
        )
        .bind(&self.key)
        .bind(blob)
        .execute(&self.pool)
        .await
        .map_err(|e| PortError::Unexpected(e.to_string()))?;
        Ok(())
    }
}
