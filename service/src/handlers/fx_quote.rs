//! FX quote lock endpoint. This service never computes an FX rate itself
//! (`spec.md`'s non-goals hold) — a caller supplies the rate as a pair of
//! minor-unit amounts, and this endpoint freezes that pair under a quote id
//! for a short TTL so the transfer built from it can't be submitted against
//! a rate that moved in the meantime.

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_core::currency::Currency;

use crate::cache::LockedQuote;
use crate::handlers::response::{bad_request, ok};
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateQuoteRequest {
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: u64,
    pub to_amount: u64,
}

#[derive(Debug, Serialize)]
pub struct QuoteView {
    pub quote_id: Uuid,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: u64,
    pub to_amount: u64,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateQuoteRequest>,
) -> Response {
    if Currency::from_alpha_code(&req.from_currency).is_err() {
        return bad_request("unsupported from_currency");
    }
    if Currency::from_alpha_code(&req.to_currency).is_err() {
        return bad_request("unsupported to_currency");
    }
    if req.from_currency == req.to_currency {
        return bad_request("a quote is only meaningful across two different currencies");
    }
    if req.from_amount == 0 || req.to_amount == 0 {
        return bad_request("amounts must be positive");
    }

    let quote_id = Uuid::now_v7();
    {
        let mut cache = state.cache.lock().await;
        cache.quotes.insert(
            quote_id,
            LockedQuote {
                from_amount: req.from_amount,
                to_amount: req.to_amount,
            },
        );
    }

    ok(
        StatusCode::CREATED,
        QuoteView {
            quote_id,
            from_currency: req.from_currency,
            to_currency: req.to_currency,
            from_amount: req.from_amount,
            to_amount: req.to_amount,
        },
    )
}
