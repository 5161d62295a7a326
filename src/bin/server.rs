//! Contracts API server binary.
//!
//! Starts an axum HTTP server exposing the contract CRUD endpoints and
//! the email notification side-effects.
//!
//! # Environment Variables
//!
//! - `PORT`           — HTTP port (default: 8080)
//! - `CONTRACTS_DB`   — SQLite database path (default: "contracts.db")
//! - `MAIL_RELAY_URL` — HTTP mail relay endpoint (mail is dropped when unset)
//! - `SEED_PARTNERS`  — Optional `Name:email;Name2;...` list inserted into an
//!   empty partner table at startup
//! - `RUST_LOG`       — Tracing filter (default: "info")
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin server
//! ```

use std::sync::Arc;

use contracts_api::config::Settings;
use contracts_api::mail::{HttpRelayTransport, MailTransport, Notifier, NullTransport};
use contracts_api::server::{app_router, AppState};
use contracts_api::service::ContractService;
use contracts_api::store::{PartnerStore, SqliteStore};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,contracts_api=debug".into()),
        )
        .init();

    let settings = Settings::from_env();
    let store = SqliteStore::new(settings.db_path.clone())?;
    seed_partners_from_env(&store).await?;

    let transport: Arc<dyn MailTransport> = match &settings.mail.relay_url {
        Some(url) => Arc::new(HttpRelayTransport::new(
            url.clone(),
            settings.mail.from_email.clone(),
            settings.mail.from_name.clone(),
            settings.mail.api_token.clone(),
        )),
        None => {
            tracing::warn!("MAIL_RELAY_URL not set; notifications will be dropped");
            Arc::new(NullTransport)
        }
    };

    let notifier = Notifier::new(transport, settings.mail.cc_email.clone());
    let service = ContractService::new(
        Arc::new(store.clone()),
        Arc::new(store),
        notifier,
    );
    let app = app_router(AppState::new(service));

    let bind_addr = settings.bind_addr();
    tracing::info!("contracts-api server starting on {}", bind_addr);
    tracing::info!("Endpoints:");
    tracing::info!("  GET    /health                 — liveness probe");
    tracing::info!("  GET    /partners               — list partners");
    tracing::info!("  GET    /contracts              — list contracts");
    tracing::info!("  GET    /contracts/count        — count active contracts");
    tracing::info!("  POST   /contracts/add          — create contract");
    tracing::info!("  PUT    /contracts/edit/:id     — update contract");
    tracing::info!("  DELETE /contracts/delete/:id   — delete contract");

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Insert partners from `SEED_PARTNERS` when the partner table is
/// empty. Entries are semicolon-separated `Name:email` pairs; the
/// email part is optional.
async fn seed_partners_from_env(store: &SqliteStore) -> anyhow::Result<()> {
    let Ok(raw) = std::env::var("SEED_PARTNERS") else {
        return Ok(());
    };
    if !store.fetch_all().await?.is_empty() {
        tracing::debug!("partner table not empty; skipping seed");
        return Ok(());
    }

    for entry in raw.split(';').filter(|e| !e.trim().is_empty()) {
        let (name, email) = match entry.split_once(':') {
            Some((name, email)) => (name.trim(), Some(email.trim()).filter(|e| !e.is_empty())),
            None => (entry.trim(), None),
        };
        let partner = store.insert_partner(name, email)?;
        tracing::info!(id = partner.id, name = %partner.name, "seeded partner");
    }
    Ok(())
}
