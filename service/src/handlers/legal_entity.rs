//! Legal-entity endpoints. Adapted from
//! `examples/original_source/internal/handler/legal_entity.go`.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::db::{self, LicenseType, NewLegalEntity};
use crate::handlers::response::{bad_request, internal_error, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateLegalEntityRequest {
    pub country_code: String,
    pub license_type: LicenseType,
}

pub async fn create(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateLegalEntityRequest>,
) -> Response {
    if req.country_code.len() != 2 {
        return bad_request("country_code must be a 2-letter ISO code");
    }

    let new_entity = NewLegalEntity {
        tenant_id,
        country_code: req.country_code,
        license_type: req.license_type,
    };

    match db::insert_legal_entity(&state.db, &new_entity).await {
        Ok(entity) => ok(StatusCode::CREATED, entity),
        Err(e) => internal_error(format!("failed to create legal entity: {e}")),
    }
}
