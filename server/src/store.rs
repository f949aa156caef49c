//! Persistence gateway for proposal records.
//!
//! The gateway is the only owner of stored state. Two implementations:
//! [`PgStore`] for production and [`MemoryStore`] for dev mode and tests.
//! Both honor the same contract: insert rejects duplicate ids, lookups
//! return `None` for unknown ids, and acceptance is a single atomic
//! update that never overwrites an existing acceptance timestamp.

use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use deadpool_postgres::{Manager, ManagerConfig, Pool, RecyclingMethod};
use thiserror::Error;
use tokio::sync::RwLock;
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

use valentine_common::proposal::Proposal;

/// Failures from the storage layer. `Backend` detail is logged
/// server-side and never forwarded to clients.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("id already exists")]
    Conflict,
    #[error("storage backend failure: {0}")]
    Backend(String),
}

#[async_trait]
pub trait ProposalStore: Send + Sync {
    /// Store a new record keyed by its id. Fails with
    /// [`StoreError::Conflict`] if the id is already taken; an existing
    /// proposal is never overwritten.
    async fn insert(&self, proposal: &Proposal) -> Result<Proposal, StoreError>;

    /// Look up a record. `None` for an unknown id is a normal outcome,
    /// not an error.
    async fn find_by_id(&self, id: &str) -> Result<Option<Proposal>, StoreError>;

    /// Atomically set `accepted = true`, keeping the first acceptance
    /// timestamp if one is already present. Returns the updated record,
    /// or `None` for an unknown id.
    async fn update_acceptance(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Proposal>, StoreError>;
}

// ─── In-memory store ─────────────────────────────────────────────────────────

/// HashMap-backed store for `--in-memory` mode and tests. The RwLock
/// serializes writers, so acceptance stays a single atomic update.
#[derive(Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<String, Proposal>>,
}

#[async_trait]
impl ProposalStore for MemoryStore {
    async fn insert(&self, proposal: &Proposal) -> Result<Proposal, StoreError> {
        let mut records = self.records.write().await;
        if records.contains_key(&proposal.id) {
            return Err(StoreError::Conflict);
        }
        records.insert(proposal.id.clone(), proposal.clone());
        Ok(proposal.clone())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Proposal>, StoreError> {
        Ok(self.records.read().await.get(id).cloned())
    }

    async fn update_acceptance(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Proposal>, StoreError> {
        let mut records = self.records.write().await;
        Ok(records.get_mut(id).map(|proposal| {
            proposal.mark_accepted(now);
            proposal.clone()
        }))
    }
}

// ─── Postgres store ──────────────────────────────────────────────────────────

const SCHEMA: &str = "CREATE TABLE IF NOT EXISTS proposals (
    id TEXT PRIMARY KEY,
    your_name TEXT NOT NULL,
    partner_name TEXT NOT NULL,
    phone_number TEXT NOT NULL,
    custom_message TEXT NOT NULL,
    accepted BOOLEAN NOT NULL DEFAULT FALSE,
    accepted_at TIMESTAMPTZ,
    created_at TIMESTAMPTZ NOT NULL
)";

const COLUMNS: &str =
    "id, your_name, partner_name, phone_number, custom_message, accepted, accepted_at, created_at";

/// Proposal store backed by a deadpool-managed Postgres pool.
pub struct PgStore {
    pool: Pool,
}

impl PgStore {
    /// Connect to `database_url` and make sure the `proposals` table
    /// exists.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let config: tokio_postgres::Config = database_url
            .parse()
            .map_err(|e: tokio_postgres::Error| StoreError::Backend(e.to_string()))?;
        let manager = Manager::from_config(
            config,
            NoTls,
            ManagerConfig {
                recycling_method: RecyclingMethod::Fast,
            },
        );
        let pool = Pool::builder(manager)
            .max_size(16)
            .build()
            .map_err(|e| StoreError::Backend(e.to_string()))?;

        let store = PgStore { pool };
        let client = store.client().await?;
        client.execute(SCHEMA, &[]).await?;
        Ok(store)
    }

    async fn client(&self) -> Result<deadpool_postgres::Object, StoreError> {
        self.pool
            .get()
            .await
            .map_err(|e| StoreError::Backend(e.to_string()))
    }
}

#[async_trait]
impl ProposalStore for PgStore {
    async fn insert(&self, proposal: &Proposal) -> Result<Proposal, StoreError> {
        let client = self.client().await?;
        let statement = format!(
            "INSERT INTO proposals ({COLUMNS}) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8) RETURNING {COLUMNS}"
        );
        let row = client
            .query_one(
                statement.as_str(),
                &[
                    &proposal.id,
                    &proposal.your_name,
                    &proposal.partner_name,
                    &proposal.phone_number,
                    &proposal.custom_message,
                    &proposal.accepted,
                    &proposal.accepted_at,
                    &proposal.created_at,
                ],
            )
            .await?;
        row_to_proposal(&row)
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Proposal>, StoreError> {
        let client = self.client().await?;
        let statement = format!("SELECT {COLUMNS} FROM proposals WHERE id = $1");
        let row = client.query_opt(statement.as_str(), &[&id]).await?;
        row.as_ref().map(row_to_proposal).transpose()
    }

    async fn update_acceptance(
        &self,
        id: &str,
        now: DateTime<Utc>,
    ) -> Result<Option<Proposal>, StoreError> {
        let client = self.client().await?;
        // COALESCE keeps the first acceptance timestamp on re-accept;
        // the single statement keeps accepted/accepted_at consistent for
        // concurrent readers.
        let statement = format!(
            "UPDATE proposals \
             SET accepted = TRUE, accepted_at = COALESCE(accepted_at, $2) \
             WHERE id = $1 RETURNING {COLUMNS}"
        );
        let row = client.query_opt(statement.as_str(), &[&id, &now]).await?;
        row.as_ref().map(row_to_proposal).transpose()
    }
}

impl From<tokio_postgres::Error> for StoreError {
    fn from(err: tokio_postgres::Error) -> Self {
        if err.code() == Some(&SqlState::UNIQUE_VIOLATION) {
            StoreError::Conflict
        } else {
            StoreError::Backend(err.to_string())
        }
    }
}

fn row_to_proposal(row: &Row) -> Result<Proposal, StoreError> {
    let read = |e: tokio_postgres::Error| StoreError::Backend(e.to_string());
    Ok(Proposal {
        id: row.try_get("id").map_err(read)?,
        your_name: row.try_get("your_name").map_err(read)?,
        partner_name: row.try_get("partner_name").map_err(read)?,
        phone_number: row.try_get("phone_number").map_err(read)?,
        custom_message: row.try_get("custom_message").map_err(read)?,
        accepted: row.try_get("accepted").map_err(read)?,
        accepted_at: row.try_get("accepted_at").map_err(read)?,
        created_at: row.try_get("created_at").map_err(read)?,
    })
}
