//! The closed error taxonomy produced by this crate.

use thiserror::Error;

/// Every way a posting, chain or engine call can fail.
///
/// This is a closed sum type: callers match exhaustively rather than
/// treating ledger failures as an opaque boxed error, since the caller's
/// own compensation and retry logic depends on telling these apart.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    #[error("invalid accounts: debit and credit account must differ (got {account:?} on both sides)")]
    InvalidAccounts { account: String },

    #[error("currency mismatch: debit account is {debit_currency}, credit account is {credit_currency}, but no FX flag was set")]
    CurrencyMismatch {
        debit_currency: String,
        credit_currency: String,
    },

    #[error("zero amount: a posting must move a positive amount")]
    ZeroAmount,

    #[error("reserved bits non-zero: bytes 12-15 of the account identifier must be zero, got {value:#010x}")]
    ReservedBitsNonZero { value: u32 },

    #[error("unknown currency numeric code {code}")]
    UnknownCurrency { code: u32 },

    #[error("unknown account class wire code {code:#04x}")]
    UnknownAccountClass { code: u8 },

    #[error("id generation failed: {reason}")]
    IdGeneration { reason: String },

    #[error("invalid decimal id: '{value}' is not a valid u128 decimal string")]
    InvalidDecimalId { value: String },

    #[error("post-pending and void-pending flags are mutually exclusive")]
    ConflictingPendingFlags,

    #[error("engine rejected posting at chain index {index}: {code}")]
    EngineRejected { index: usize, code: String },

    #[error("accounting engine unavailable: {reason}")]
    EngineUnavailable { reason: String },

    #[error("indeterminate outcome: the engine call may or may not have applied (id {posting_id})")]
    Indeterminate { posting_id: String },
}
