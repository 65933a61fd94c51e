//! The accounting engine boundary (C5): a trait for the black-box engine
//! that actually moves money, plus the types needed to talk to it.
//!
//! Nothing in this crate implements `Engine` — that lives in `service`,
//! against a real TigerBeetle cluster. Keeping the trait here means
//! `chain.rs`'s composer and the error taxonomy stay usable without ever
//! linking a concrete engine client.

use async_trait::async_trait;

use crate::account_class::AccountClass;
use crate::account_id::AccountId;
use crate::chain::Chain;
use crate::currency::Currency;
use crate::error::LedgerError;

/// A point-in-time balance snapshot for one account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub account_id: AccountId,
    pub debits_posted: u64,
    pub credits_posted: u64,
    pub debits_pending: u64,
    pub credits_pending: u64,
}

impl AccountSnapshot {
    /// Funds posted and not reserved by a pending debit.
    pub fn available(&self) -> i128 {
        self.credits_posted as i128 - self.debits_posted as i128 - self.debits_pending as i128
    }

    /// Funds posted, ignoring any still-pending reservation.
    pub fn total(&self) -> i128 {
        self.credits_posted as i128 - self.debits_posted as i128
    }
}

/// The outcome of submitting one chain to the engine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChainOutcome {
    /// Every posting in the chain applied.
    Committed,
    /// The engine rejected the posting at this index within the chain;
    /// per linked-chain semantics, nothing in the chain applied.
    Rejected { index: usize, code: String },
}

/// The accounting engine boundary. Each method maps to one engine-side
/// operation; a chain is always submitted whole, never posting-by-posting,
/// so the engine's own linked-chain atomicity is what the `Committed`
/// outcome relies on.
#[async_trait]
pub trait Engine: Send + Sync {
    /// Provision a new account at the given id. Idempotent: provisioning
    /// an id that already exists with the same class/currency succeeds.
    async fn create_account(
        &self,
        account_id: AccountId,
        class: AccountClass,
        currency: Currency,
    ) -> Result<(), LedgerError>;

    async fn lookup_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountSnapshot>, LedgerError>;

    /// Submit a chain as one atomic unit. Never retried internally —
    /// idempotency is the caller's responsibility via each posting's id.
    async fn submit_chain(&self, chain: &Chain) -> Result<ChainOutcome, LedgerError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_class::AccountClass;
    use crate::currency::Currency;

    fn account() -> AccountId {
        AccountId::compose(1, AccountClass::TenantWallet, Currency::Eur)
    }

    #[test]
    fn available_subtracts_pending_debits() {
        let snap = AccountSnapshot {
            account_id: account(),
            debits_posted: 100,
            credits_posted: 500,
            debits_pending: 50,
            credits_pending: 0,
        };
        assert_eq!(snap.available(), 350);
        assert_eq!(snap.total(), 400);
    }
}
