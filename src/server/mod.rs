//! HTTP server for the contracts API.
//!
//! # Endpoints
//!
//! - `GET    /health`                 — Liveness probe
//! - `GET    /partners`               — List partners (read-only)
//! - `GET    /contracts`              — List contracts with partner names
//! - `GET    /contracts/count`        — Count active contracts
//! - `POST   /contracts/add`          — Create a contract
//! - `PUT    /contracts/edit/:id`     — Update a contract
//! - `DELETE /contracts/delete/:id`   — Delete a contract

pub mod routes;

pub use routes::{app_router, AppState};
