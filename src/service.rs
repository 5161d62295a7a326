//! Contract orchestration: validation, persistence, notification.
//!
//! Validation is deliberately asymmetric, matching the behavior this
//! service replaces: the list path is lenient (partner ids that no
//! longer resolve are dropped from the name column without error),
//! while create/update are strict (every id must resolve, or the whole
//! request is rejected). See DESIGN.md.

use std::sync::Arc;

use thiserror::Error;

use crate::codec;
use crate::mail::{ContractEvent, Notifier};
use crate::store::{ContractStore, NewContract, PartnerStore, StoreError};
use crate::types::{Contract, ContractPayload, ContractView, Partner};

/// Service-level error taxonomy. The HTTP layer maps `Validation` to
/// 400, `NotFound` to 404, and `Store` to 500; transport failures
/// never appear here at all.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Validation(String),

    #[error("Contract not found")]
    NotFound,

    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Per-request orchestrator over the partner and contract stores and
/// the notification dispatcher. Holds no state of its own.
pub struct ContractService {
    partners: Arc<dyn PartnerStore>,
    contracts: Arc<dyn ContractStore>,
    notifier: Notifier,
}

impl ContractService {
    pub fn new(
        partners: Arc<dyn PartnerStore>,
        contracts: Arc<dyn ContractStore>,
        notifier: Notifier,
    ) -> Self {
        Self {
            partners,
            contracts,
            notifier,
        }
    }

    /// All contracts with partner names resolved for display.
    ///
    /// Stale partner ids still appear in the re-encoded `PartnerIds`
    /// column; they just contribute no name.
    pub async fn list(&self) -> Result<Vec<ContractView>, ServiceError> {
        let all_partners = self.partners.fetch_all().await?;
        let contracts = self.contracts.fetch_all().await?;

        let views = contracts
            .into_iter()
            .map(|contract| {
                let ids = codec::decode(&contract.partner_ids);
                let names: Vec<&str> = all_partners
                    .iter()
                    .filter(|p| ids.contains(&p.id))
                    .map(|p| p.name.as_str())
                    .collect();
                ContractView {
                    id: contract.id,
                    title: contract.title,
                    is_active: contract.is_active,
                    partner_ids: codec::encode_display(&ids),
                    partner_names: names.join(", "),
                }
            })
            .collect();
        Ok(views)
    }

    /// Number of contracts with the active flag set.
    pub async fn count_active(&self) -> Result<i64, ServiceError> {
        Ok(self.contracts.count_active().await?)
    }

    /// Read-only view of the partner set.
    pub async fn list_partners(&self) -> Result<Vec<Partner>, ServiceError> {
        Ok(self.partners.fetch_all().await?)
    }

    /// Create a contract and notify its partners.
    pub async fn create(&self, payload: ContractPayload) -> Result<ContractView, ServiceError> {
        if payload.title.trim().is_empty() {
            return Err(ServiceError::Validation("Invalid contract data".to_string()));
        }
        let partners = self
            .resolve_partners(&payload.partner_ids, "One or more selected partners do not exist.")
            .await?;

        let storage_ids = partner_id_string(&partners);
        let created = self
            .contracts
            .insert(NewContract {
                title: payload.title,
                is_active: payload.is_active,
                partner_ids: storage_ids,
            })
            .await?;

        self.notifier
            .notify_partners(ContractEvent::Created, &created.title, &partners)
            .await;

        Ok(view_of(created, &partners))
    }

    /// Full replace of an existing contract, then "updated" notifications.
    pub async fn update(
        &self,
        id: i64,
        payload: ContractPayload,
    ) -> Result<ContractView, ServiceError> {
        let existing = self
            .contracts
            .fetch_by_id(id)
            .await?
            .ok_or(ServiceError::NotFound)?;

        if payload.title.trim().is_empty() {
            return Err(ServiceError::Validation("Invalid contract data".to_string()));
        }
        let partners = self
            .resolve_partners(&payload.partner_ids, "Some provided partner IDs are invalid.")
            .await?;

        let updated = Contract {
            id: existing.id,
            title: payload.title,
            is_active: payload.is_active,
            partner_ids: partner_id_string(&partners),
        };
        self.contracts.update(&updated).await?;

        self.notifier
            .notify_partners(ContractEvent::Updated, &updated.title, &partners)
            .await;

        Ok(view_of(updated, &partners))
    }

    /// Remove a contract. No notification is sent.
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        if self.contracts.delete(id).await? {
            Ok(())
        } else {
            Err(ServiceError::NotFound)
        }
    }

    /// Strict resolution for the write path: every decoded token must
    /// match a live partner. Resolution returns distinct rows, so
    /// duplicate ids in the input fail the count check too.
    async fn resolve_partners(
        &self,
        raw_ids: &str,
        unresolved_message: &str,
    ) -> Result<Vec<Partner>, ServiceError> {
        let ids = codec::decode(raw_ids);
        if ids.is_empty() {
            return Err(ServiceError::Validation(
                "No valid partner IDs provided.".to_string(),
            ));
        }

        let partners = self.partners.fetch_by_ids(&ids).await?;
        if partners.len() != ids.len() {
            return Err(ServiceError::Validation(unresolved_message.to_string()));
        }
        Ok(partners)
    }
}

fn partner_id_string(partners: &[Partner]) -> String {
    let ids: Vec<i64> = partners.iter().map(|p| p.id).collect();
    codec::encode_storage(&ids)
}

fn view_of(contract: Contract, partners: &[Partner]) -> ContractView {
    let names: Vec<&str> = partners.iter().map(|p| p.name.as_str()).collect();
    ContractView {
        id: contract.id,
        title: contract.title,
        is_active: contract.is_active,
        partner_ids: contract.partner_ids,
        partner_names: names.join(", "),
    }
}
