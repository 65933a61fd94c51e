//! The axum router, grounded on `canceler/src/server.rs`'s health/metrics
//! router generalized to the full CRUD surface of this service.

use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::Router;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::GovernorLayer;

use crate::handlers::{fx_quote, legal_entity, tenant, transfer, wallet};
use crate::metrics;
use crate::state::AppState;

async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

async fn metrics_handler() -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4")],
        metrics::render(),
    )
}

/// The tenant/wallet/transfer surface is rate-limited per peer; health and
/// metrics endpoints are exempt since orchestrators and scrapers poll them
/// on their own schedule.
pub fn build(state: AppState) -> Router {
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .per_second(2)
            .burst_size(20)
            .finish()
            .expect("rate limiter config with fixed, non-zero parameters is always valid"),
    );

    let api_routes = Router::new()
        .route("/api/v1/tenants", post(tenant::create))
        .route("/api/v1/tenants/:id", get(tenant::get))
        .route(
            "/api/v1/tenants/:id/legal-entities",
            post(legal_entity::create),
        )
        .route(
            "/api/v1/tenants/:id/wallets",
            post(wallet::create).get(wallet::list_for_tenant),
        )
        .route(
            "/api/v1/tenants/:id/transfers",
            get(transfer::list_for_tenant),
        )
        .route("/api/v1/transfers", post(transfer::create))
        .route("/api/v1/transfers/:id", get(transfer::get))
        .route("/api/v1/fx/quotes", post(fx_quote::create))
        .layer(GovernorLayer {
            config: governor_config,
        });

    Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics_handler))
        .merge(api_routes)
        .with_state(state)
}
