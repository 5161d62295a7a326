//! Axum route handlers for the contracts API.
//!
//! # Routes
//!
//! - `GET    /health`               — Returns `{"status": "ok", "version": ...}`
//! - `GET    /partners`             — Partner list, read-only
//! - `GET    /contracts`            — Contract list with resolved partner names
//! - `GET    /contracts/count`      — Bare integer count of active contracts
//! - `POST   /contracts/add`        — Create; 400 on validation failure
//! - `PUT    /contracts/edit/:id`   — Update; 404 missing, 400 invalid
//! - `DELETE /contracts/delete/:id` — Delete; 404 missing

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{delete, get, post, put},
    Json, Router,
};
use serde_json::Value;
use tower_http::cors::CorsLayer;

use crate::service::{ContractService, ServiceError};
use crate::types::ContractPayload;

/// Shared application state for the HTTP server.
#[derive(Clone)]
pub struct AppState {
    /// Contract orchestration service.
    pub service: Arc<ContractService>,
}

impl AppState {
    pub fn new(service: ContractService) -> Self {
        Self {
            service: Arc::new(service),
        }
    }
}

/// Build the axum router with all routes.
pub fn app_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/partners", get(list_partners_handler))
        .route("/contracts", get(list_contracts_handler))
        .route("/contracts/count", get(count_handler))
        .route("/contracts/add", post(add_contract_handler))
        .route("/contracts/edit/:id", put(edit_contract_handler))
        .route("/contracts/delete/:id", delete(delete_contract_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Map a service error onto the HTTP surface: 400 for validation, 404
/// for unknown contracts, 500 for store trouble. Error bodies are
/// always `{"error": <message>}`.
fn error_response(err: ServiceError) -> (StatusCode, Json<Value>) {
    let status = match &err {
        ServiceError::Validation(_) => StatusCode::BAD_REQUEST,
        ServiceError::NotFound => StatusCode::NOT_FOUND,
        ServiceError::Store(store_err) => {
            tracing::error!(error = %store_err, "store failure while handling request");
            StatusCode::INTERNAL_SERVER_ERROR
        }
    };
    (status, Json(serde_json::json!({ "error": err.to_string() })))
}

/// GET /health — liveness probe.
async fn health_handler() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": crate::VERSION,
        "service": "contracts-api",
    }))
}

/// GET /partners — the partner set, read-only.
async fn list_partners_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let partners = state.service.list_partners().await.map_err(error_response)?;
    Ok(Json(partners))
}

/// GET /contracts — all contracts with partner names resolved.
async fn list_contracts_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let views = state.service.list().await.map_err(error_response)?;
    Ok(Json(views))
}

/// GET /contracts/count — number of active contracts, as a bare integer.
async fn count_handler(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let count = state.service.count_active().await.map_err(error_response)?;
    Ok(Json(count))
}

/// POST /contracts/add — create a contract and notify its partners.
async fn add_contract_handler(
    State(state): State<AppState>,
    Json(payload): Json<ContractPayload>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let view = state.service.create(payload).await.map_err(error_response)?;
    Ok(Json(view))
}

/// PUT /contracts/edit/:id — full replace of an existing contract.
async fn edit_contract_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(payload): Json<ContractPayload>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    let view = state
        .service
        .update(id, payload)
        .await
        .map_err(error_response)?;
    Ok(Json(view))
}

/// DELETE /contracts/delete/:id — remove a contract. 200 with empty body.
async fn delete_contract_handler(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> Result<impl IntoResponse, (StatusCode, Json<Value>)> {
    state.service.delete(id).await.map_err(error_response)?;
    Ok(StatusCode::OK)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::body::Body;
    use axum::http::Request;
    use tower::ServiceExt;

    use super::*;
    use crate::mail::testing::RecordingTransport;
    use crate::mail::Notifier;
    use crate::store::SqliteStore;

    struct TestApp {
        _dir: tempfile::TempDir,
        store: SqliteStore,
        transport: Arc<RecordingTransport>,
        state: AppState,
    }

    fn test_app() -> TestApp {
        let dir = tempfile::tempdir().unwrap();
        let store = SqliteStore::new(dir.path().join("test.db")).unwrap();
        let transport = Arc::new(RecordingTransport::default());
        let notifier = Notifier::new(transport.clone(), None);
        let service = ContractService::new(
            Arc::new(store.clone()),
            Arc::new(store.clone()),
            notifier,
        );
        TestApp {
            _dir: dir,
            store,
            transport,
            state: AppState::new(service),
        }
    }

    fn json_request(method: &str, uri: &str, body: serde_json::Value) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header("Content-Type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap()
    }

    fn get_request(uri: &str) -> Request<Body> {
        Request::builder().uri(uri).body(Body::empty()).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_endpoint() {
        let app = test_app();
        let response = app_router(app.state)
            .oneshot(get_request("/health"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["status"], "ok");
        assert_eq!(json["version"], crate::VERSION);
        assert_eq!(json["service"], "contracts-api");
    }

    #[tokio::test]
    async fn test_partners_listed_pascal_case() {
        let app = test_app();
        app.store.insert_partner("Acme", Some("info@acme.test")).unwrap();

        let response = app_router(app.state)
            .oneshot(get_request("/partners"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json[0]["Name"], "Acme");
        assert_eq!(json[0]["Email"], "info@acme.test");
    }

    #[tokio::test]
    async fn test_add_contract_happy_path() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", Some("info@acme.test")).unwrap();
        let globex = app
            .store
            .insert_partner("Globex", Some("ops@globex.test"))
            .unwrap();
        let router = app_router(app.state);

        let response = router
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({
                    "Title": "Maintenance Q1",
                    "IsActive": true,
                    "PartnerIds": format!("{},{}", acme.id, globex.id),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["Title"], "Maintenance Q1");
        assert_eq!(json["IsActive"], true);
        assert_eq!(json["PartnerIds"], format!("{},{}", acme.id, globex.id));
        assert_eq!(json["PartnerNames"], "Acme, Globex");

        // One email per partner, each naming the other.
        let sent = app.transport.sent.lock().unwrap();
        assert_eq!(sent.len(), 2);
        assert!(sent[0].html_body.contains("Globex"));
        assert!(sent[1].html_body.contains("Acme"));
    }

    #[tokio::test]
    async fn test_add_contract_blank_title_is_400() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();

        let response = app_router(app.state)
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({"Title": "  ", "IsActive": true, "PartnerIds": acme.id.to_string()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid contract data");
    }

    #[tokio::test]
    async fn test_add_contract_missing_title_is_400() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();

        let response = app_router(app.state)
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({"IsActive": true, "PartnerIds": acme.id.to_string()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid contract data");
    }

    #[tokio::test]
    async fn test_add_contract_null_title_is_400() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();

        let response = app_router(app.state)
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({"Title": null, "IsActive": true, "PartnerIds": acme.id.to_string()}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "Invalid contract data");
    }

    #[tokio::test]
    async fn test_add_contract_unknown_partner_is_400() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();
        let globex = app.store.insert_partner("Globex", None).unwrap();

        let response = app_router(app.state)
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({
                    "Title": "Audit",
                    "IsActive": true,
                    "PartnerIds": format!("{},{},99", acme.id, globex.id),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let json = body_json(response).await;
        assert_eq!(json["error"], "One or more selected partners do not exist.");
    }

    #[tokio::test]
    async fn test_edit_missing_contract_is_404() {
        let app = test_app();
        app.store.insert_partner("Acme", None).unwrap();

        let response = app_router(app.state)
            .oneshot(json_request(
                "PUT",
                "/contracts/edit/9999",
                serde_json::json!({"Title": "X", "IsActive": false, "PartnerIds": "1"}),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_edit_replaces_and_returns_view() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();
        let globex = app.store.insert_partner("Globex", None).unwrap();
        let router = app_router(app.state);

        let created = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({"Title": "Before", "IsActive": true, "PartnerIds": acme.id.to_string()}),
            ))
            .await
            .unwrap();
        let created = body_json(created).await;
        let id = created["Id"].as_i64().unwrap();

        let response = router
            .oneshot(json_request(
                "PUT",
                &format!("/contracts/edit/{id}"),
                serde_json::json!({
                    "Title": "After",
                    "IsActive": false,
                    "PartnerIds": format!("{},{}", acme.id, globex.id),
                }),
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json["Id"], id);
        assert_eq!(json["Title"], "After");
        assert_eq!(json["IsActive"], false);
        assert_eq!(json["PartnerNames"], "Acme, Globex");
    }

    #[tokio::test]
    async fn test_delete_then_delete_again() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();
        let router = app_router(app.state);

        let created = router
            .clone()
            .oneshot(json_request(
                "POST",
                "/contracts/add",
                serde_json::json!({"Title": "Doomed", "IsActive": true, "PartnerIds": acme.id.to_string()}),
            ))
            .await
            .unwrap();
        let id = body_json(created).await["Id"].as_i64().unwrap();

        let first = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/contracts/delete/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(first.status(), StatusCode::OK);

        let second = router
            .oneshot(
                Request::builder()
                    .method("DELETE")
                    .uri(format!("/contracts/delete/{id}"))
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(second.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_count_returns_bare_integer() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();
        let router = app_router(app.state);

        for (title, active) in [("A", true), ("B", false)] {
            let response = router
                .clone()
                .oneshot(json_request(
                    "POST",
                    "/contracts/add",
                    serde_json::json!({"Title": title, "IsActive": active, "PartnerIds": acme.id.to_string()}),
                ))
                .await
                .unwrap();
            assert_eq!(response.status(), StatusCode::OK);
        }

        let response = router
            .oneshot(get_request("/contracts/count"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await, serde_json::json!(1));
    }

    #[tokio::test]
    async fn test_list_tolerates_stale_partner_reference() {
        let app = test_app();
        let acme = app.store.insert_partner("Acme", None).unwrap();

        // Row referencing a partner id that no longer exists.
        use crate::store::ContractStore;
        app.store
            .insert(crate::store::NewContract {
                title: "Legacy".to_string(),
                is_active: true,
                partner_ids: format!("{},424242", acme.id),
            })
            .await
            .unwrap();

        let response = app_router(app.state)
            .oneshot(get_request("/contracts"))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let json = body_json(response).await;
        assert_eq!(json[0]["PartnerNames"], "Acme");
        assert_eq!(json[0]["PartnerIds"], format!("{}, 424242", acme.id));
    }
}
