pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use anyhow::Context;
use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use state::AppState;

/// Build the application router
///
/// Split from `run_server` so tests can drive it without a socket.
pub fn build_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health_check))
        .route(
            "/api/accounts",
            get(handlers::list_accounts).post(handlers::create_account),
        )
        .route(
            "/api/accounts/{id}",
            get(handlers::get_account).delete(handlers::delete_account),
        )
        .route(
            "/api/accounts/{id}/transfers",
            get(handlers::list_account_transfers),
        )
        .route("/api/accounts/{id}/deposit", post(handlers::deposit))
        .route("/api/accounts/{id}/withdraw", post(handlers::withdraw))
        .route("/api/transfers", post(handlers::create_transfer))
        .with_state(state)
        // Stateless, added after with_state
        .merge(SwaggerUi::new("/swagger").url("/openapi", openapi::ApiDoc::openapi()))
}

/// Start HTTP gateway server; returns after ctrl-c
pub async fn run_server(host: &str, port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = build_router(state);

    let addr = format!("{}:{}", host, port);
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {} (port already in use?)", addr))?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/swagger", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("Gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("failed to install ctrl-c handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
pub(crate) mod test_support {
    use std::sync::Arc;
    use std::time::Duration;

    use super::state::AppState;
    use crate::account::{AccountLocks, AccountService};
    use crate::store::MemoryStore;
    use crate::transfer::TransferEngine;

    pub fn state() -> Arc<AppState> {
        let accounts = Arc::new(AccountService::new(
            Arc::new(MemoryStore::new()),
            Arc::new(AccountLocks::new(Duration::from_millis(500))),
        ));
        Arc::new(AppState::new(Arc::new(TransferEngine::new(accounts))))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gateway::types::error_codes;
    use axum::body::Body;
    use axum::http::{Request, StatusCode, header};
    use serde_json::Value;
    use tower::ServiceExt;

    fn json_request(method: &str, uri: &str, body: &'static str) -> Request<Body> {
        Request::builder()
            .method(method)
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap()
    }

    async fn send(router: Router, req: Request<Body>) -> (StatusCode, Value) {
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, body)
    }

    #[tokio::test]
    async fn test_router_builds() {
        // Panics on overlapping or malformed routes
        let _ = build_router(test_support::state());
    }

    #[tokio::test]
    async fn test_create_account_with_empty_object() {
        let router = build_router(test_support::state());
        let (status, body) = send(router, json_request("POST", "/api/accounts", "{}")).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["code"], error_codes::SUCCESS);
        assert_eq!(body["data"]["balance"], "0.00");
    }

    #[tokio::test]
    async fn test_malformed_bodies_are_client_errors() {
        let state = test_support::state();
        for (uri, body) in [
            ("/api/accounts", "{\"balance\": "),
            ("/api/accounts", "[1, 2]"),
            ("/api/transfers", "not json"),
            ("/api/transfers", "{\"from\": 1}"),
        ] {
            let router = build_router(state.clone());
            let (status, _) = send(router, json_request("POST", uri, body)).await;
            assert!(status.is_client_error(), "{uri} {body:?} -> {status}");
        }
        // Nothing was created by the rejected requests
        assert!(state.accounts.find_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_transfer_round_trip_over_http() {
        let state = test_support::state();
        let (_, a) = send(
            build_router(state.clone()),
            json_request("POST", "/api/accounts", "{\"balance\": \"100\"}"),
        )
        .await;
        let (_, b) = send(
            build_router(state.clone()),
            json_request("POST", "/api/accounts", "{}"),
        )
        .await;
        let body = format!(
            "{{\"from\": {}, \"to\": {}, \"amount\": \"30\"}}",
            a["data"]["id"], b["data"]["id"]
        );
        let req = Request::builder()
            .method("POST")
            .uri("/api/transfers")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap();
        let (status, transfer) = send(build_router(state.clone()), req).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(transfer["data"]["amount"], "30.00");

        let uri = format!("/api/accounts/{}", a["data"]["id"]);
        let req = Request::get(uri).body(Body::empty()).unwrap();
        let (status, account) = send(build_router(state), req).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(account["data"]["balance"], "70.00");
    }

    #[tokio::test]
    async fn test_unknown_account_is_404_envelope() {
        let router = build_router(test_support::state());
        let req = Request::get("/api/accounts/9999").body(Body::empty()).unwrap();
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["code"], error_codes::ACCOUNT_NOT_FOUND);
    }

    #[tokio::test]
    async fn test_openapi_served() {
        let router = build_router(test_support::state());
        let req = Request::get("/openapi").body(Body::empty()).unwrap();
        let (status, body) = send(router, req).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body["paths"]["/api/transfers"].is_object());
    }
}
