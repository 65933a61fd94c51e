//! The immutable posting type (C3) and its builder.

use crate::account_id::AccountId;
use crate::currency::Currency;
use crate::error::LedgerError;
use crate::flags::PostingFlags;
use crate::id;

/// A single balanced movement of funds between two accounts.
///
/// Built via [`Posting::new`] and the `with_*`/flag-setting methods, which
/// consume and return `self` so a posting reads as one expression. The
/// result is immutable: there is no setter that mutates a `Posting` in
/// place, since a posting that changed after being handed to a chain would
/// undermine the chain's own immutability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    id: u128,
    debit_account: AccountId,
    credit_account: AccountId,
    amount: u64,
    /// ISO 4217 numeric code of the single book both accounts live in.
    book: u32,
    /// Caller-chosen business reason code, opaque to this crate.
    code: u16,
    flags: PostingFlags,
    user_data_128: u128,
    user_data_64: u64,
    user_data_32: u32,
}

impl Posting {
    /// Start a posting, validating it before handing it back. The id is
    /// generated immediately (time-ordered, see [`crate::id`]) so `with_id`
    /// is only needed when a caller must pin a specific id ahead of time
    /// (e.g. retrying an earlier attempt).
    ///
    /// Fails with `InvalidAccounts` if `debit_account == credit_account`,
    /// `CurrencyMismatch` if the two accounts or `book` disagree on
    /// currency, or `ZeroAmount` if `amount == 0` — matching spec §4.3's
    /// construction invariants. A posting handed back by `new` is therefore
    /// always individually valid; `validate()` remains available for
    /// re-checking a posting after its flags have been changed.
    pub fn new(
        debit_account: AccountId,
        credit_account: AccountId,
        amount: u64,
        book: u32,
        code: u16,
    ) -> Result<Self, LedgerError> {
        let id = id::generate()?;
        let posting = Self {
            id,
            debit_account,
            credit_account,
            amount,
            book,
            code,
            flags: PostingFlags::empty(),
            user_data_128: 0,
            user_data_64: 0,
            user_data_32: 0,
        };
        posting.validate()?;
        Ok(posting)
    }

    pub fn with_id(mut self, id: u128) -> Self {
        self.id = id;
        self
    }

    pub fn with_flags(mut self, flags: PostingFlags) -> Self {
        self.flags = flags;
        self
    }

    pub fn with_user_data(mut self, data_128: u128, data_64: u64, data_32: u32) -> Self {
        self.user_data_128 = data_128;
        self.user_data_64 = data_64;
        self.user_data_32 = data_32;
        self
    }

    pub fn linked(mut self) -> Self {
        self.flags |= PostingFlags::LINKED;
        self
    }

    pub fn pending(mut self) -> Self {
        self.flags |= PostingFlags::PENDING;
        self
    }

    pub fn post_pending(mut self) -> Self {
        self.flags |= PostingFlags::POST_PENDING;
        self
    }

    pub fn void_pending(mut self) -> Self {
        self.flags |= PostingFlags::VOID_PENDING;
        self
    }

    pub fn id(&self) -> u128 {
        self.id
    }

    pub fn debit_account(&self) -> AccountId {
        self.debit_account
    }

    pub fn credit_account(&self) -> AccountId {
        self.credit_account
    }

    pub fn amount(&self) -> u64 {
        self.amount
    }

    pub fn book(&self) -> u32 {
        self.book
    }

    pub fn code(&self) -> u16 {
        self.code
    }

    pub fn flags(&self) -> PostingFlags {
        self.flags
    }

    pub fn user_data_128(&self) -> u128 {
        self.user_data_128
    }

    pub fn user_data_64(&self) -> u64 {
        self.user_data_64
    }

    pub fn user_data_32(&self) -> u32 {
        self.user_data_32
    }

    /// Check every invariant this posting must satisfy in isolation
    /// (cross-posting invariants, like a chain's currency-conservation
    /// property, are checked by the composer instead).
    pub fn validate(&self) -> Result<(), LedgerError> {
        if self.debit_account == self.credit_account {
            return Err(LedgerError::InvalidAccounts {
                account: self.debit_account.to_debug_string(),
            });
        }
        if self.amount == 0 {
            return Err(LedgerError::ZeroAmount);
        }
        if self.debit_account.currency() != self.credit_account.currency() {
            return Err(LedgerError::CurrencyMismatch {
                debit_currency: self.debit_account.currency().to_string(),
                credit_currency: self.credit_account.currency().to_string(),
            });
        }
        let book_currency = Currency::from_numeric_code(self.book).map_err(|_| {
            LedgerError::CurrencyMismatch {
                debit_currency: self.debit_account.currency().to_string(),
                credit_currency: format!("book={}", self.book),
            }
        })?;
        if book_currency != self.debit_account.currency() {
            return Err(LedgerError::CurrencyMismatch {
                debit_currency: self.debit_account.currency().to_string(),
                credit_currency: book_currency.to_string(),
            });
        }
        if self.flags.contains(PostingFlags::POST_PENDING)
            && self.flags.contains(PostingFlags::VOID_PENDING)
        {
            return Err(LedgerError::ConflictingPendingFlags);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account_class::AccountClass;
    use crate::currency::Currency;

    fn wallet(tenant: u64, currency: Currency) -> AccountId {
        AccountId::compose(tenant, AccountClass::TenantWallet, currency)
    }

    #[test]
    fn valid_posting_passes() {
        let p = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Eur),
            500,
            Currency::Eur.numeric_code(),
            1,
        )
        .unwrap();
        assert!(p.validate().is_ok());
    }

    #[test]
    fn same_account_rejected() {
        let a = wallet(1, Currency::Eur);
        let result = Posting::new(a, a, 500, Currency::Eur.numeric_code(), 1);
        assert!(matches!(result, Err(LedgerError::InvalidAccounts { .. })));
    }

    #[test]
    fn zero_amount_rejected() {
        let result = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Eur),
            0,
            Currency::Eur.numeric_code(),
            1,
        );
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn cross_currency_without_fx_rejected() {
        let result = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Usd),
            500,
            Currency::Eur.numeric_code(),
            1,
        );
        assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));
    }

    #[test]
    fn book_not_matching_account_currency_rejected() {
        let result = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Eur),
            500,
            Currency::Usd.numeric_code(),
            1,
        );
        assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));
    }

    #[test]
    fn post_pending_and_void_pending_conflict() {
        let p = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Eur),
            500,
            Currency::Eur.numeric_code(),
            1,
        )
        .unwrap()
        .post_pending()
        .void_pending();
        assert!(matches!(p.validate(), Err(LedgerError::ConflictingPendingFlags)));
    }

    #[test]
    fn builder_sets_requested_flags() {
        let p = Posting::new(
            wallet(1, Currency::Eur),
            wallet(2, Currency::Eur),
            1,
            Currency::Eur.numeric_code(),
            1,
        )
        .unwrap()
        .linked()
        .pending();
        assert!(p.flags().contains(PostingFlags::LINKED));
        assert!(p.flags().contains(PostingFlags::PENDING));
    }
}
