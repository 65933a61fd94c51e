//! Wallet endpoints. Adapted from
//! `examples/original_source/internal/handler/wallet.go`; wallet creation
//! provisions the TigerBeetle account before the Postgres row is written so
//! a crash between the two never leaves a wallet row pointing at an account
//! that doesn't exist.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Response;
use axum::Json;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ledger_core::account_class::AccountClass;
use ledger_core::account_id::AccountId;
use ledger_core::currency::Currency;

use crate::db::{self, NewWallet};
use crate::handlers::response::{bad_request, conflict, internal_error, not_found, ok};
use crate::metrics;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreateWalletRequest {
    pub currency: String,
}

#[derive(Debug, Serialize)]
pub struct WalletView {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub currency: String,
    pub status: String,
    pub available: i128,
    pub pending: i128,
    pub total: i128,
}

pub async fn create(
    State(state): State<AppState>,
    Path(tenant_id): Path<Uuid>,
    Json(req): Json<CreateWalletRequest>,
) -> Response {
    let currency = match Currency::from_alpha_code(&req.currency) {
        Ok(c) => c,
        Err(_) => return bad_request("unsupported currency"),
    };

    match db::list_wallets_for_tenant(&state.db, tenant_id).await {
        Ok(existing) if existing.iter().any(|w| w.currency == currency.alpha_code()) => {
            return conflict("wallet already exists for this tenant and currency");
        }
        Err(e) => return internal_error(format!("failed to check existing wallets: {e}")),
        _ => {}
    }

    let account_id = AccountId::compose_from_uuid(tenant_id, AccountClass::TenantWallet, currency);
    if let Err(e) = state
        .engine
        .create_account(account_id, AccountClass::TenantWallet, currency)
        .await
    {
        return internal_error(format!("failed to provision ledger account: {e}"));
    }
    metrics::record_wallet_provisioned(currency.alpha_code());

    let new_wallet = NewWallet {
        tenant_id,
        currency: currency.alpha_code().to_string(),
        tb_account_id: account_id.to_decimal_string(),
    };

    match db::insert_wallet(&state.db, &new_wallet).await {
        Ok(wallet) => ok(StatusCode::CREATED, wallet),
        Err(e) => internal_error(format!("failed to record wallet: {e}")),
    }
}

pub async fn list_for_tenant(State(state): State<AppState>, Path(tenant_id): Path<Uuid>) -> Response {
    let wallets = match db::list_wallets_for_tenant(&state.db, tenant_id).await {
        Ok(w) => w,
        Err(e) => return internal_error(format!("failed to list wallets: {e}")),
    };

    let mut views = Vec::with_capacity(wallets.len());
    for wallet in wallets {
        let account_id = match AccountId::from_decimal_string(&wallet.tb_account_id) {
            Ok(id) => id,
            Err(e) => return internal_error(format!("corrupt stored account id: {e}")),
        };
        let snapshot = match state.engine.lookup_account(account_id).await {
            Ok(Some(s)) => s,
            Ok(None) => return not_found("ledger account not found for wallet"),
            Err(e) => return internal_error(format!("failed to read ledger balance: {e}")),
        };

        let available = snapshot.available();
        let total = snapshot.total();
        let pending = snapshot.debits_pending as i128;
        if let Err(e) = db::refresh_wallet_balance_cache(
            &state.db,
            wallet.id,
            &total.to_string(),
            &pending.to_string(),
        )
        .await
        {
            tracing::warn!(wallet_id = %wallet.id, error = %e, "failed to refresh cached wallet balance");
        }

        views.push(WalletView {
            id: wallet.id,
            tenant_id: wallet.tenant_id,
            currency: wallet.currency,
            status: format!("{:?}", wallet.status),
            available,
            pending,
            total,
        });
    }

    ok(StatusCode::OK, views)
}
