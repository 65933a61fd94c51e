//! The JSON envelope every handler responds with.
//!
//! Mirrors the original service's `Response`/`ErrorInfo` shape so existing
//! API consumers see the same `{ "success", "data", "error" }` contract.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Json, Response};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<ErrorInfo>,
}

#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    code: String,
    message: String,
}

pub fn ok<T: Serialize>(status: StatusCode, data: T) -> Response {
    (
        status,
        Json(Envelope {
            success: true,
            data: Some(data),
            error: None,
        }),
    )
        .into_response()
}

pub fn error(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (
        status,
        Json(Envelope::<()> {
            success: false,
            data: None,
            error: Some(ErrorInfo {
                code: code.to_string(),
                message: message.into(),
            }),
        }),
    )
        .into_response()
}

pub fn bad_request(message: impl Into<String>) -> Response {
    error(StatusCode::BAD_REQUEST, "BAD_REQUEST", message)
}

pub fn not_found(message: impl Into<String>) -> Response {
    error(StatusCode::NOT_FOUND, "NOT_FOUND", message)
}

pub fn internal_error(message: impl Into<String>) -> Response {
    error(StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR", message)
}

pub fn conflict(message: impl Into<String>) -> Response {
    error(StatusCode::CONFLICT, "CONFLICT", message)
}

/// Translate a [`ledger_core::LedgerError`] into the matching HTTP envelope.
/// Kept next to the envelope helpers since every handler that touches the
/// engine needs this mapping.
pub fn from_ledger_error(err: &ledger_core::LedgerError) -> Response {
    use ledger_core::LedgerError::*;
    match err {
        InvalidAccounts { .. }
        | CurrencyMismatch { .. }
        | ZeroAmount
        | ReservedBitsNonZero { .. }
        | InvalidDecimalId { .. }
        | UnknownCurrency { .. }
        | UnknownAccountClass { .. }
        | ConflictingPendingFlags => bad_request(err.to_string()),
        EngineRejected { .. } => conflict(err.to_string()),
        EngineUnavailable { .. } | Indeterminate { .. } | IdGeneration { .. } => {
            internal_error(err.to_string())
        }
    }
}
