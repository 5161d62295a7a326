//! # Contracts API
//!
//! A contract management service: CRUD over contracts that reference
//! partner records, with transactional email notifications on create
//! and update.
//!
//! The HTTP layer lives in [`server`], orchestration in [`service`],
//! persistence behind the trait seams in [`store`], and outbound mail
//! behind [`mail::MailTransport`].

pub mod codec;
pub mod config;
pub mod mail;
pub mod server;
pub mod service;
pub mod store;
pub mod types;

pub use service::{ContractService, ServiceError};
pub use types::{Contract, ContractPayload, ContractView, Partner};

/// Library version reported by the `/health` endpoint.
pub const VERSION: &str = "0.3.1";
