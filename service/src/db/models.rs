#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// Amounts and account identifiers are stored as NUMERIC minor-unit integers
// serialized through `String` and parsed back into u64/u128 at the edge, in
// `ledger_core::account_id::AccountId::from_decimal_string` and plain
// integer parsing respectively. Never store a money value as a float.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum TenantKind {
    Platform,
    Enterprise,
    Individual,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum TenantStatus {
    Pending,
    Active,
    Suspended,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum KycLevel {
    #[default]
    None,
    Basic,
    Enhanced,
    Institutional,
}

/// Coarse regulatory grouping derived from a legal entity's registered
/// country, never enforced by this crate — descriptive metadata only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum ComplianceRegion {
    Eea,
    UnitedKingdom,
    Apac,
    Americas,
    Other,
}

impl ComplianceRegion {
    /// Coarse country-to-region mapping. Not a compliance determination —
    /// just enough to group transfers for reporting.
    pub fn derive_from_country(country_code: &str) -> Self {
        const EEA: &[&str] = &[
            "AT", "BE", "BG", "HR", "CY", "CZ", "DK", "EE", "FI", "FR", "DE", "GR", "HU", "IE",
            "IT", "LV", "LT", "LU", "MT", "NL", "PL", "PT", "RO", "SK", "SI", "ES", "SE",
        ];
        const APAC: &[&str] = &["ID", "SG", "JP", "AU", "NZ", "HK", "MY", "TH", "PH", "VN"];
        const AMERICAS: &[&str] = &["US", "CA", "MX", "BR", "AR", "CL"];

        match country_code {
            "GB" => ComplianceRegion::UnitedKingdom,
            c if EEA.contains(&c) => ComplianceRegion::Eea,
            c if APAC.contains(&c) => ComplianceRegion::Apac,
            c if AMERICAS.contains(&c) => ComplianceRegion::Americas,
            _ => ComplianceRegion::Other,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum LicenseType {
    EMoneyInstitution,
    PaymentInstitution,
    Bank,
    Unlicensed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum WalletStatus {
    Active,
    Frozen,
    Closed,
}

/// Statuses a business-level transfer moves through. `RolledBack` is
/// reached only via the FX compensation path; `Rejected` covers both
/// pre-submission validation failures and an engine-side decline of a
/// submitted chain (`ChainOutcome::Rejected`) — either way the transfer's
/// postings never took effect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "snake_case")]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
pub enum TransferStatus {
    Created,
    Validating,
    Processing,
    Completed,
    Rejected,
    RolledBack,
}

impl TransferStatus {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            TransferStatus::Completed | TransferStatus::Rejected | TransferStatus::RolledBack
        )
    }
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Tenant {
    pub id: Uuid,
    pub legal_name: String,
    pub kind: TenantKind,
    pub status: TenantStatus,
    pub kyc_level: KycLevel,
    pub compliance_region: ComplianceRegion,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewTenant {
    pub legal_name: String,
    pub kind: TenantKind,
    pub kyc_level: KycLevel,
    pub compliance_region: ComplianceRegion,
}

#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct LegalEntity {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub country_code: String,
    pub license_type: LicenseType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewLegalEntity {
    pub tenant_id: Uuid,
    pub country_code: String,
    pub license_type: LicenseType,
}

/// A tenant's wallet in one currency, with a cached view of the engine-side
/// balance. `cached_balance`/`cached_pending` are advisory — the engine is
/// the source of truth and handlers refresh this cache on read.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Wallet {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub currency: String,
    /// Decimal-serialized 128-bit `AccountId` (`NUMERIC(39,0)`).
    pub tb_account_id: String,
    pub cached_balance: String,
    pub cached_pending: String,
    pub cached_at: Option<DateTime<Utc>>,
    pub status: WalletStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Wallet {
    pub fn is_active(&self) -> bool {
        matches!(self.status, WalletStatus::Active)
    }
}

#[derive(Debug, Clone)]
pub struct NewWallet {
    pub tenant_id: Uuid,
    pub currency: String,
    pub tb_account_id: String,
}

/// Business-level metadata for a transfer; the actual fund movement is
/// represented by a `ledger_core::Chain` (same-currency) or `FxPair`
/// (cross-currency), never persisted here — only their outcome is.
#[derive(Debug, Clone, FromRow, Serialize, Deserialize)]
pub struct Transfer {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    pub source_legal_entity_id: Option<Uuid>,
    pub dest_legal_entity_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: String,
    pub to_amount: String,
    pub fee: String,
    pub status: TransferStatus,
    /// Present only for FX transfers, where it joins the two chains.
    pub correlation_token: Option<String>,
    pub failure_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

impl Transfer {
    pub fn is_fx_transfer(&self) -> bool {
        self.from_currency != self.to_currency
    }
}

#[derive(Debug, Clone)]
pub struct NewTransfer {
    pub tenant_id: Uuid,
    pub source_wallet_id: Uuid,
    pub destination_wallet_id: Uuid,
    pub source_legal_entity_id: Option<Uuid>,
    pub dest_legal_entity_id: Option<Uuid>,
    pub idempotency_key: Option<String>,
    pub from_currency: String,
    pub to_currency: String,
    pub from_amount: String,
    pub to_amount: String,
    pub fee: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn region_derivation_matches_known_countries() {
        assert_eq!(
            ComplianceRegion::derive_from_country("DE"),
            ComplianceRegion::Eea
        );
        assert_eq!(
            ComplianceRegion::derive_from_country("GB"),
            ComplianceRegion::UnitedKingdom
        );
        assert_eq!(
            ComplianceRegion::derive_from_country("ID"),
            ComplianceRegion::Apac
        );
        assert_eq!(
            ComplianceRegion::derive_from_country("ZZ"),
            ComplianceRegion::Other
        );
    }

    #[test]
    fn terminal_statuses() {
        assert!(TransferStatus::Completed.is_terminal());
        assert!(TransferStatus::Rejected.is_terminal());
        assert!(TransferStatus::RolledBack.is_terminal());
        assert!(!TransferStatus::Processing.is_terminal());
    }
}
