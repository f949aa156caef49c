//! Proposal lifecycle orchestration: validate, create, fetch, accept.
//!
//! The service holds no state of its own beyond the injected store, so
//! every operation is one read or one write against the gateway and
//! operations on different ids never interact.

use std::sync::Arc;

use chrono::Utc;
use thiserror::Error;

use valentine_common::api::Accepted;
use valentine_common::proposal::{NewProposal, Proposal, ValidationError};
use valentine_common::shortid;

use crate::store::{ProposalStore, StoreError};

/// How many fresh ids `create` will try when the store reports a
/// collision. With a 64^8 id space this loop practically never repeats.
const MAX_ID_ATTEMPTS: u32 = 3;

#[derive(Debug, Error)]
pub enum ServiceError {
    /// Rejected input; carries the wire-ready message + field.
    #[error(transparent)]
    Validation(#[from] ValidationError),
    /// Storage fault, surfaced to clients only as a generic error.
    #[error(transparent)]
    Storage(#[from] StoreError),
}

pub struct ProposalService {
    store: Arc<dyn ProposalStore>,
}

impl ProposalService {
    pub fn new(store: Arc<dyn ProposalStore>) -> Self {
        ProposalService { store }
    }

    /// Validate the input and persist a new pending proposal. Validation
    /// runs before any storage access, so a rejected create writes
    /// nothing.
    pub async fn create(&self, input: NewProposal) -> Result<Proposal, ServiceError> {
        input.validate()?;

        let created_at = Utc::now();
        for _ in 0..MAX_ID_ATTEMPTS {
            let id = shortid::generate();
            let proposal = Proposal::new(id, &input, created_at);
            match self.store.insert(&proposal).await {
                Ok(stored) => {
                    tracing::info!(id = %stored.id, "proposal created");
                    return Ok(stored);
                }
                Err(StoreError::Conflict) => {
                    tracing::warn!(id = %proposal.id, "id collision, regenerating");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Err(StoreError::Conflict.into())
    }

    /// Fetch one proposal. A missing id is a normal outcome (stale or
    /// mistyped link), not a fault.
    pub async fn get(&self, id: &str) -> Result<Option<Proposal>, ServiceError> {
        Ok(self.store.find_by_id(id).await?)
    }

    /// Transition a proposal to accepted and return the projection a
    /// downstream notifier needs. Idempotent: re-accepting succeeds and
    /// keeps the original acceptance timestamp.
    pub async fn accept(&self, id: &str) -> Result<Option<Accepted>, ServiceError> {
        let updated = self.store.update_acceptance(id, Utc::now()).await?;
        Ok(updated.map(|proposal| {
            tracing::info!(id = %proposal.id, "proposal accepted");
            Accepted {
                success: true,
                phone_number: proposal.phone_number,
                partner_name: proposal.partner_name,
            }
        }))
    }
}
