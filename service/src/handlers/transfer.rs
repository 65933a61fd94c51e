//! Transfer endpoints: composes and submits a same-currency or FX payout.
//! Adapted from `examples/original_source/internal/handler/transfer.go`,
//! with idempotency checked against the in-process cache before Postgres.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_core::account_id::AccountId;
use ledger_core::chain::{compose_fx_pair, compose_same_currency, Chain};
use ledger_core::currency::Currency;
use ledger_core::engine::ChainOutcome;

use crate::db::{self, NewTransfer, Transfer, TransferStatus};
use crate::handlers::response::{bad_request, from_ledger_error, internal_error, not_found, ok};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateTransferRequest {
    pub tenant_id: Uuid,
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    pub source_legal_entity_id: Option<Uuid>,
    pub dest_legal_entity_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    /// Minor-unit integer amounts, never floating point. For a same-currency
    /// transfer these are used directly; for a cross-currency transfer they
    /// are only a presence check — the amounts actually posted come from the
    /// locked quote named by `quote_id`.
    pub from_amount: u64,
    pub to_amount: u64,
    #[serde(default)]
    pub fee: u64,
    /// Id of a quote locked via `POST /api/v1/fx/quotes`. Required for
    /// cross-currency transfers so the submitted rate can't drift from the
    /// one the caller was quoted; ignored for same-currency transfers.
    pub quote_id: Option<Uuid>,
}

#[derive(Debug, Deserialize)]
pub struct ListTransfersQuery {
    pub status: Option<TransferStatus>,
    pub currency: Option<String>,
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<CreateTransferRequest>,
) -> Response {
    if req.from_currency.is_empty() || req.to_currency.is_empty() {
        return bad_request("from_currency and to_currency are required");
    }
    if req.from_amount == 0 || req.to_amount == 0 {
        return bad_request("amounts must be positive");
    }

    if let Some(key) = &req.idempotency_key {
        {
            let mut cache = state.cache.lock().await;
            if let Some(&existing_id) = cache.idempotency.get(&format!("{}:{}", req.tenant_id, key))
            {
                metrics::record_idempotency_hit();
                drop(cache);
                return match db::get_transfer(&state.db, existing_id).await {
                    Ok(Some(t)) => ok(StatusCode::OK, t),
                    Ok(None) => internal_error("idempotency cache pointed at a missing transfer"),
                    Err(e) => internal_error(format!("failed to fetch transfer: {e}")),
                };
            }
        }
        match db::get_transfer_by_idempotency_key(&state.db, req.tenant_id, key).await {
            Ok(Some(existing)) => {
                let mut cache = state.cache.lock().await;
                cache.idempotency.insert(format!("{}:{}", req.tenant_id, key), existing.id);
                return ok(StatusCode::OK, existing);
            }
            Ok(None) => {}
            Err(e) => return internal_error(format!("failed to check idempotency: {e}")),
        }
    }

    let from_currency = match Currency::from_alpha_code(&req.from_currency) {
        Ok(c) => c,
        Err(_) => return bad_request("unsupported from_currency"),
    };
    let to_currency = match Currency::from_alpha_code(&req.to_currency) {
        Ok(c) => c,
        Err(_) => return bad_request("unsupported to_currency"),
    };

    // A cross-currency transfer must be built from a rate the caller locked
    // in via `POST /api/v1/fx/quotes`, not from raw amounts in this request
    // body — otherwise the rate could drift between quote and submission.
    // The quote is consumed here so it can't be replayed into a second
    // transfer.
    let (from_amount, to_amount) = if from_currency == to_currency {
        (req.from_amount, req.to_amount)
    } else {
        let quote_id = match req.quote_id {
            Some(id) => id,
            None => return bad_request("quote_id is required for a cross-currency transfer"),
        };
        let locked = {
            let mut cache = state.cache.lock().await;
            cache.quotes.remove(&quote_id)
        };
        match locked {
            Some(q) => (q.from_amount, q.to_amount),
            None => return bad_request("quote not found or expired; request a new one"),
        }
    };

    let source_wallet = match db::get_wallet(&state.db, req.source_wallet_id).await {
        Ok(Some(w)) => w,
        Ok(None) => return not_found("source wallet not found"),
        Err(e) => return internal_error(format!("failed to fetch source wallet: {e}")),
    };
    let destination_wallet = match db::get_wallet(&state.db, req.destination_wallet_id).await {
        Ok(Some(w)) => w,
        Ok(None) => return not_found("destination wallet not found"),
        Err(e) => return internal_error(format!("failed to fetch destination wallet: {e}")),
    };
    if !source_wallet.is_active() || !destination_wallet.is_active() {
        return bad_request("both wallets must be active");
    }

    let source_account = match AccountId::from_decimal_string(&source_wallet.tb_account_id) {
        Ok(id) => id,
        Err(e) => return internal_error(format!("corrupt stored account id: {e}")),
    };
    let destination_account = match AccountId::from_decimal_string(&destination_wallet.tb_account_id)
    {
        Ok(id) => id,
        Err(e) => return internal_error(format!("corrupt stored account id: {e}")),
    };

    let new_transfer = NewTransfer {
        tenant_id: req.tenant_id,
        source_wallet_id: req.source_wallet_id,
        destination_wallet_id: req.destination_wallet_id,
        source_legal_entity_id: req.source_legal_entity_id,
        dest_legal_entity_id: req.dest_legal_entity_id,
        idempotency_key: req.idempotency_key.clone(),
        from_currency: req.from_currency.clone(),
        to_currency: req.to_currency.clone(),
        from_amount: from_amount.to_string(),
        to_amount: to_amount.to_string(),
        fee: req.fee.to_string(),
    };
    let transfer = match db::insert_transfer(&state.db, &new_transfer).await {
        Ok(t) => t,
        Err(e) => return internal_error(format!("failed to create transfer: {e}")),
    };

    if let Some(key) = &req.idempotency_key {
        let mut cache = state.cache.lock().await;
        cache.idempotency.insert(format!("{}:{}", req.tenant_id, key), transfer.id);
    }

    // `destination_account` is the receiving wallet's own record, kept for
    // audit purposes; the actual ledger postings move funds to the system
    // settlement accounts a payout always targets (spec.md §4.4.2/§4.4.3),
    // not directly into another tenant's wallet.
    let _ = destination_account;
    let tenant = source_account.tenant_id();

    let transfer = match mark(&state, &transfer, TransferStatus::Validating, None, None).await {
        Ok(t) => t,
        Err(resp) => return resp,
    };

    let result = if from_currency == to_currency {
        submit_same_currency(&state, &transfer, tenant, from_currency, from_amount, req.fee).await
    } else {
        submit_fx(
            &state,
            &transfer,
            tenant,
            from_currency,
            to_currency,
            from_amount,
            to_amount,
            req.fee,
        )
        .await
    };

    match result {
        Ok(updated) => ok(StatusCode::CREATED, updated),
        Err(resp) => resp,
    }
}

async fn mark(
    state: &AppState,
    transfer: &Transfer,
    status: TransferStatus,
    correlation_token: Option<&str>,
    failure_reason: Option<&str>,
) -> Result<Transfer, Response> {
    db::set_transfer_status(&state.db, transfer.id, status, correlation_token, failure_reason)
        .await
        .map_err(|e| internal_error(format!("failed to update transfer status: {e}")))?;
    db::get_transfer(&state.db, transfer.id)
        .await
        .map_err(|e| internal_error(format!("failed to reload transfer: {e}")))?
        .ok_or_else(|| internal_error("transfer vanished after status update"))
}

async fn submit_same_currency(
    state: &AppState,
    transfer: &Transfer,
    tenant: u64,
    currency: Currency,
    amount: u64,
    fee: u64,
) -> Result<Transfer, Response> {
    let chain =
        compose_same_currency(tenant, currency, amount, fee, 0).map_err(|e| from_ledger_error(&e))?;

    submit_and_record(state, transfer, &chain).await
}

async fn submit_fx(
    state: &AppState,
    transfer: &Transfer,
    tenant: u64,
    from_currency: Currency,
    to_currency: Currency,
    from_amount: u64,
    to_amount: u64,
    fee: u64,
) -> Result<Transfer, Response> {
    let pair = compose_fx_pair(tenant, from_currency, to_currency, from_amount, to_amount, fee, 0)
        .map_err(|e| from_ledger_error(&e))?;

    let transfer = mark(state, transfer, TransferStatus::Processing, None, None).await?;
    let transfer = &transfer;

    let source_outcome = state
        .engine
        .submit_chain(&pair.source_chain)
        .await
        .map_err(|e| from_ledger_error(&e))?;

    metrics::record_transfer_submitted("fx_source", matches!(source_outcome, ChainOutcome::Committed));

    if let ChainOutcome::Rejected { code, .. } = source_outcome {
        return mark(
            state,
            transfer,
            TransferStatus::Rejected,
            Some(pair.correlation_token.to_string().as_str()),
            Some(code.as_str()),
        )
        .await;
    }

    let destination_outcome = state.engine.submit_chain(&pair.destination_chain).await;
    metrics::record_transfer_submitted(
        "fx_destination",
        matches!(destination_outcome, Ok(ChainOutcome::Committed)),
    );

    match destination_outcome {
        Ok(ChainOutcome::Committed) => {
            mark(
                state,
                transfer,
                TransferStatus::Completed,
                Some(pair.correlation_token.to_string().as_str()),
                None,
            )
            .await
        }
        other => {
            let failure = match other {
                Ok(ChainOutcome::Rejected { code, .. }) => code,
                Err(e) => e.to_string(),
                Ok(ChainOutcome::Committed) => unreachable!(),
            };
            let reversal = pair.compensate_source().map_err(|e| from_ledger_error(&e))?;
            if let Err(e) = state.engine.submit_chain(&reversal).await {
                return mark(
                    state,
                    transfer,
                    TransferStatus::RolledBack,
                    Some(pair.correlation_token.to_string().as_str()),
                    Some(&format!(
                        "destination chain failed ({failure}); compensation ALSO failed ({e}) — manual intervention required"
                    )),
                )
                .await;
            }
            mark(
                state,
                transfer,
                TransferStatus::RolledBack,
                Some(pair.correlation_token.to_string().as_str()),
                Some(failure.as_str()),
            )
            .await
        }
    }
}

async fn submit_and_record(
    state: &AppState,
    transfer: &Transfer,
    chain: &Chain,
) -> Result<Transfer, Response> {
    let transfer = mark(state, transfer, TransferStatus::Processing, None, None).await?;

    let outcome = state
        .engine
        .submit_chain(chain)
        .await
        .map_err(|e| from_ledger_error(&e))?;

    metrics::record_transfer_submitted("same_currency", matches!(outcome, ChainOutcome::Committed));

    match outcome {
        ChainOutcome::Committed => mark(state, &transfer, TransferStatus::Completed, None, None).await,
        ChainOutcome::Rejected { code, .. } => {
            mark(state, &transfer, TransferStatus::Rejected, None, Some(code.as_str())).await
        }
    }
}

pub async fn get(State(state): State<AppState>, Path(id): Path<Uuid>) -> Response {
    match db::get_transfer(&state.db, id).await {
        Ok(Some(t)) => ok(StatusCode::OK, t),
        Ok(None) => not_found("transfer not found"),
        Err(e) => internal_error(format!("failed to fetch transfer: {e}")),
    }
}

#[derive(Debug, Serialize)]
struct TransferList {
    transfers: Vec<Transfer>,
}

pub async fn list_for_tenant(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Query(query): Query<ListTransfersQuery>,
) -> Response {
    let transfers = match db::list_transfers_for_tenant(&state.db, tenant_id, query.status).await {
        Ok(t) => t,
        Err(e) => return internal_error(format!("failed to list transfers: {e}")),
    };
    let transfers = match &query.currency {
        Some(c) => transfers
            .into_iter()
            .filter(|t| &t.from_currency == c || &t.to_currency == c)
            .collect(),
        None => transfers,
    };
    ok(StatusCode::OK, TransferList { transfers })
}
