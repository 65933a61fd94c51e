//! Tenant endpoints. Adapted from
//! `examples/original_source/internal/handler/tenant.go`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, ComplianceRegion, KycLevel, NewTenant, TenantKind};
use crate::handlers::response::{bad_request, internal_error, not_found, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTenantRequest {
    pub legal_name: String,
    pub kind: TenantKind,
    #[serde(default)]
    pub kyc_level: KycLevel,
    /// Registered country, used to derive `compliance_region`.
    pub country_code: String,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTenantRequest>,
) -> Response {
    if req.legal_name.trim().is_empty() {
        return bad_request("legal_name is required");
    }
    if req.country_code.len() != 2 {
        return bad_request("country_code must be a 2-letter ISO code");
    }

    let compliance_region = ComplianceRegion::derive_from_country(&req.country_code);
    let new_tenant = NewTenant {
        legal_name: req.legal_name,
        kind: req.kind,
        kyc_level: req.kyc_level,
        compliance_region,
    };

    match db::insert_tenant(&state.db, &new_tenant).await {
        Ok(tenant) => ok(StatusCode::CREATED, tenant),
        Err(e) => internal_error(format!("failed to create tenant: {e}")),
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match db::get_tenant(&state.db, id).await {
        Ok(Some(tenant)) => ok(StatusCode::OK, tenant),
        Ok(None) => not_found("tenant not found"),
        Err(e) => internal_error(format!("failed to fetch tenant: {e}")),
    }
}
