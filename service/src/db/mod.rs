#![allow(dead_code)]

use eyre::{Result, WrapErr};
use sqlx::postgres::{PgPool, PgPoolOptions};
use tracing::error;
use uuid::Uuid;

pub mod models;

pub use models::*;

/// Create a database connection pool.
pub async fn create_pool(database_url: &str, max_connections: u32) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
        .wrap_err("Failed to connect to database")
}

/// Run pending migrations (uses the migration files in migrations/).
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    sqlx::migrate!("./migrations")
        .run(pool)
        .await
        .wrap_err("Failed to run database migrations")?;
    Ok(())
}

// --- tenants -----------------------------------------------------------

pub async fn insert_tenant(pool: &PgPool, tenant: &NewTenant) -> Result<Tenant> {
    sqlx::query_as::<_, Tenant>(
        r#"
        INSERT INTO tenants (legal_name, kind, status, kyc_level, compliance_region)
        VALUES ($1, $2, 'pending', $3, $4)
        RETURNING id, legal_name, kind, status, kyc_level, compliance_region, created_at, updated_at
        "#,
    )
    .bind(&tenant.legal_name)
    .bind(tenant.kind)
    .bind(tenant.kyc_level)
    .bind(tenant.compliance_region)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        error!("SQL error inserting tenant: {:?}", e);
        e
    })
    .wrap_err("Failed to insert tenant")
}

pub async fn get_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Option<Tenant>> {
    sqlx::query_as::<_, Tenant>(
        r#"SELECT id, legal_name, kind, status, kyc_level, compliance_region, created_at, updated_at
           FROM tenants WHERE id = $1"#,
    )
    .bind(tenant_id)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to fetch tenant")
}

// --- legal entities ------------------------------------------------------

pub async fn insert_legal_entity(pool: &PgPool, entity: &NewLegalEntity) -> Result<LegalEntity> {
    sqlx::query_as::<_, LegalEntity>(
        r#"
        INSERT INTO legal_entities (tenant_id, country_code, license_type)
        VALUES ($1, $2, $3)
        RETURNING id, tenant_id, country_code, license_type, created_at, updated_at
        "#,
    )
    .bind(entity.tenant_id)
    .bind(&entity.country_code)
    .bind(entity.license_type)
    .fetch_one(pool)
    .await
    .wrap_err("Failed to insert legal entity")
}

// --- wallets -------------------------------------------------------------

pub async fn insert_wallet(pool: &PgPool, wallet: &NewWallet) -> Result<Wallet> {
    sqlx::query_as::<_, Wallet>(
        r#"
        INSERT INTO wallets (tenant_id, currency, tb_account_id, cached_balance, cached_pending, status)
        VALUES ($1, $2, $3::NUMERIC, 0, 0, 'active')
        RETURNING id, tenant_id, currency, tb_account_id::TEXT as tb_account_id,
                  cached_balance::TEXT as cached_balance, cached_pending::TEXT as cached_pending,
                  cached_at, status, created_at, updated_at
        "#,
    )
    .bind(wallet.tenant_id)
    .bind(&wallet.currency)
    .bind(&wallet.tb_account_id)
    .fetch_one(pool)
    .await
    .wrap_err("Failed to insert wallet")
}

pub async fn get_wallet(pool: &PgPool, wallet_id: Uuid) -> Result<Option<Wallet>> {
    sqlx::query_as::<_, Wallet>(
        r#"SELECT id, tenant_id, currency, tb_account_id::TEXT as tb_account_id,
                  cached_balance::TEXT as cached_balance, cached_pending::TEXT as cached_pending,
                  cached_at, status, created_at, updated_at
           FROM wallets WHERE id = $1"#,
    )
    .bind(wallet_id)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to fetch wallet")
}

pub async fn list_wallets_for_tenant(pool: &PgPool, tenant_id: Uuid) -> Result<Vec<Wallet>> {
    sqlx::query_as::<_, Wallet>(
        r#"SELECT id, tenant_id, currency, tb_account_id::TEXT as tb_account_id,
                  cached_balance::TEXT as cached_balance, cached_pending::TEXT as cached_pending,
                  cached_at, status, created_at, updated_at
           FROM wallets WHERE tenant_id = $1 ORDER BY currency"#,
    )
    .bind(tenant_id)
    .fetch_all(pool)
    .await
    .wrap_err("Failed to list wallets for tenant")
}

pub async fn refresh_wallet_balance_cache(
    pool: &PgPool,
    wallet_id: Uuid,
    cached_balance: &str,
    cached_pending: &str,
) -> Result<()> {
    sqlx::query(
        r#"UPDATE wallets SET cached_balance = $2::NUMERIC, cached_pending = $3::NUMERIC,
                  cached_at = now(), updated_at = now()
           WHERE id = $1"#,
    )
    .bind(wallet_id)
    .bind(cached_balance)
    .bind(cached_pending)
    .execute(pool)
    .await
    .wrap_err("Failed to refresh wallet balance cache")?;
    Ok(())
}

// --- transfers -------------------------------------------------------------

pub async fn insert_transfer(pool: &PgPool, transfer: &NewTransfer) -> Result<Transfer> {
    sqlx::query_as::<_, Transfer>(
        r#"
        INSERT INTO transfers (tenant_id, source_wallet_id, destination_wallet_id,
            source_legal_entity_id, dest_legal_entity_id, idempotency_key,
            from_currency, to_currency, from_amount, to_amount, fee, status)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9::NUMERIC, $10::NUMERIC, $11::NUMERIC, 'created')
        RETURNING id, tenant_id, source_wallet_id, destination_wallet_id,
                  source_legal_entity_id, dest_legal_entity_id, idempotency_key,
                  from_currency, to_currency, from_amount::TEXT as from_amount,
                  to_amount::TEXT as to_amount, fee::TEXT as fee, status,
                  correlation_token::TEXT as correlation_token, failure_reason,
                  created_at, updated_at, completed_at
        "#,
    )
    .bind(transfer.tenant_id)
    .bind(transfer.source_wallet_id)
    .bind(transfer.destination_wallet_id)
    .bind(transfer.source_legal_entity_id)
    .bind(transfer.dest_legal_entity_id)
    .bind(&transfer.idempotency_key)
    .bind(&transfer.from_currency)
    .bind(&transfer.to_currency)
    .bind(&transfer.from_amount)
    .bind(&transfer.to_amount)
    .bind(&transfer.fee)
    .fetch_one(pool)
    .await
    .wrap_err("Failed to insert transfer")
}

pub async fn get_transfer(pool: &PgPool, transfer_id: Uuid) -> Result<Option<Transfer>> {
    sqlx::query_as::<_, Transfer>(
        r#"SELECT id, tenant_id, source_wallet_id, destination_wallet_id,
                  source_legal_entity_id, dest_legal_entity_id, idempotency_key,
                  from_currency, to_currency, from_amount::TEXT as from_amount,
                  to_amount::TEXT as to_amount, fee::TEXT as fee, status,
                  correlation_token::TEXT as correlation_token, failure_reason,
                  created_at, updated_at, completed_at
           FROM transfers WHERE id = $1"#,
    )
    .bind(transfer_id)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to fetch transfer")
}

/// Look up a transfer by its tenant-scoped idempotency key. Checked before
/// composing a new chain so duplicate POSTs replay the existing result
/// instead of submitting a second chain.
pub async fn get_transfer_by_idempotency_key(
    pool: &PgPool,
    tenant_id: Uuid,
    idempotency_key: &str,
) -> Result<Option<Transfer>> {
    sqlx::query_as::<_, Transfer>(
        r#"SELECT id, tenant_id, source_wallet_id, destination_wallet_id,
                  source_legal_entity_id, dest_legal_entity_id, idempotency_key,
                  from_currency, to_currency, from_amount::TEXT as from_amount,
                  to_amount::TEXT as to_amount, fee::TEXT as fee, status,
                  correlation_token::TEXT as correlation_token, failure_reason,
                  created_at, updated_at, completed_at
           FROM transfers WHERE tenant_id = $1 AND idempotency_key = $2"#,
    )
    .bind(tenant_id)
    .bind(idempotency_key)
    .fetch_optional(pool)
    .await
    .wrap_err("Failed to look up transfer by idempotency key")
}

pub async fn list_transfers_for_tenant(
    pool: &PgPool,
    tenant_id: Uuid,
    status: Option<TransferStatus>,
) -> Result<Vec<Transfer>> {
    let rows = match status {
        Some(status) => {
            sqlx::query_as::<_, Transfer>(
                r#"SELECT id, tenant_id, source_wallet_id, destination_wallet_id,
                          source_legal_entity_id, dest_legal_entity_id, idempotency_key,
                          from_currency, to_currency, from_amount::TEXT as from_amount,
                          to_amount::TEXT as to_amount, fee::TEXT as fee, status,
                          correlation_token::TEXT as correlation_token, failure_reason,
                          created_at, updated_at, completed_at
                   FROM transfers WHERE tenant_id = $1 AND status = $2
                   ORDER BY created_at DESC"#,
            )
            .bind(tenant_id)
            .bind(status)
            .fetch_all(pool)
            .await
        }
        None => {
            sqlx::query_as::<_, Transfer>(
                r#"SELECT id, tenant_id, source_wallet_id, destination_wallet_id,
                          source_legal_entity_id, dest_legal_entity_id, idempotency_key,
                          from_currency, to_currency, from_amount::TEXT as from_amount,
                          to_amount::TEXT as to_amount, fee::TEXT as fee, status,
                          correlation_token::TEXT as correlation_token, failure_reason,
                          created_at, updated_at, completed_at
                   FROM transfers WHERE tenant_id = $1
                   ORDER BY created_at DESC"#,
            )
            .bind(tenant_id)
            .fetch_all(pool)
            .await
        }
    };
    rows.wrap_err("Failed to list transfers for tenant")
}

pub async fn set_transfer_status(
    pool: &PgPool,
    transfer_id: Uuid,
    status: TransferStatus,
    correlation_token: Option<&str>,
    failure_reason: Option<&str>,
) -> Result<()> {
    sqlx::query(
        r#"UPDATE transfers
           SET status = $2, correlation_token = COALESCE($3::NUMERIC, correlation_token),
               failure_reason = $4, updated_at = now(),
               completed_at = CASE WHEN $2 = 'completed' THEN now() ELSE completed_at END
           WHERE id = $1"#,
    )
    .bind(transfer_id)
    .bind(status)
    .bind(correlation_token)
    .bind(failure_reason)
    .execute(pool)
    .await
    .wrap_err("Failed to update transfer status")?;
    Ok(())
}
