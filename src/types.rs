//! Core records and wire types for the contracts API.
//!
//! Wire field names are PascalCase (`Id`, `Title`, `PartnerIds`, ...) to
//! stay compatible with the dashboard clients of the original API.

use serde::{Deserialize, Serialize};

/// A partner that can be associated with contracts.
///
/// Read-only from this service's perspective: rows are provisioned
/// out-of-band and only ever looked up here.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Partner {
    /// Store-assigned identifier, immutable once created.
    pub id: i64,
    pub name: String,
    /// Optional; partners without an email address are skipped by the
    /// notification dispatcher.
    pub email: Option<String>,
}

/// A contract row as persisted.
///
/// `partner_ids` is the comma-joined storage form of the referenced
/// partner ids (see [`crate::codec::encode_storage`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Contract {
    pub id: i64,
    pub title: String,
    pub is_active: bool,
    pub partner_ids: String,
}

/// Request body for create and update.
///
/// Update requests may carry the full contract shape (including `Id`);
/// only these three fields are read.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractPayload {
    /// Empty when absent or null, so a missing title fails the
    /// blank-title validation with a 400 instead of being rejected at
    /// body deserialization.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub title: String,
    #[serde(default)]
    pub is_active: bool,
    /// Comma-separated partner ids, e.g. `"1,2,3"`.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub partner_ids: String,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// A contract as returned by the API, with partner names resolved for
/// display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ContractView {
    pub id: i64,
    pub title: String,
    pub is_active: bool,
    pub partner_ids: String,
    /// Names of the referenced partners, joined with `", "`. Stale ids
    /// resolve to no name and are simply absent from this list.
    pub partner_names: String,
}
