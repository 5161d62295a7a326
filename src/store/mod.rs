//! Persistence seams for partners and contracts.
//!
//! The service orchestrates against the [`PartnerStore`] and
//! [`ContractStore`] traits; [`SqliteStore`] implements both over a
//! SQLite file.

pub mod sqlite;

pub use sqlite::SqliteStore;

use async_trait::async_trait;
use thiserror::Error;

use crate::types::{Contract, Partner};

/// Errors from the storage layer.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Failed to open the backing database.
    #[error("Store connection error: {message}")]
    Connection { message: String },

    /// A statement failed to prepare or execute.
    #[error("Store query error: {message}")]
    Query { message: String },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        StoreError::Query {
            message: err.to_string(),
        }
    }
}

/// Read access to the partner set. Partners are provisioned outside
/// this service; there is no mutation surface here.
#[async_trait]
pub trait PartnerStore: Send + Sync {
    /// All partners, in store order.
    async fn fetch_all(&self) -> Result<Vec<Partner>, StoreError>;

    /// Partners whose id appears in `ids`, ascending by id. Unknown ids
    /// are simply absent from the result; duplicates in `ids` collapse
    /// to one row.
    async fn fetch_by_ids(&self, ids: &[i64]) -> Result<Vec<Partner>, StoreError>;
}

/// A contract about to be inserted (no id yet).
#[derive(Debug, Clone)]
pub struct NewContract {
    pub title: String,
    pub is_active: bool,
    /// Storage-form partner id string.
    pub partner_ids: String,
}

/// Full CRUD over contract rows.
#[async_trait]
pub trait ContractStore: Send + Sync {
    async fn fetch_all(&self) -> Result<Vec<Contract>, StoreError>;

    async fn fetch_by_id(&self, id: i64) -> Result<Option<Contract>, StoreError>;

    /// Number of contracts with the active flag set.
    async fn count_active(&self) -> Result<i64, StoreError>;

    /// Insert and return the stored row with its assigned id.
    async fn insert(&self, contract: NewContract) -> Result<Contract, StoreError>;

    /// Full replace of title / active flag / partner ids.
    async fn update(&self, contract: &Contract) -> Result<(), StoreError>;

    /// Returns `false` when no row with that id existed.
    async fn delete(&self, id: i64) -> Result<bool, StoreError>;
}
