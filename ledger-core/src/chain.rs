//! The chain composer (C4): lowers a business payout into atomic linked
//! posting chains.
//!
//! A `Chain` is a non-empty, ordered sequence of postings submitted to the
//! accounting engine as one linked run — the engine applies all of them or
//! none. `ChainBuilder::build_linked` sets the `Linked` flag on every
//! posting but the last, matching how `TransferBuilder.BuildLinked` works in
//! the original implementation.
//!
//! [`compose_same_currency`] lowers a same-currency payout into the
//! reserve → fee → settle shape: the payer's wallet is debited into a
//! `PendingOutbound` hold account, which in turn pays the platform's fee
//! revenue account and the regional (Nostro) settlement account.
//! `PendingOutbound` is a pass-through — it nets to zero across the chain —
//! so the hold exists only to let the engine express "funds are reserved
//! but not yet disbursed" as two atomic postings rather than one.
//!
//! FX transfers are NOT a single chain across two ledgers — the original
//! `FXTransferChain` did that and real TigerBeetle rejects a linked chain
//! whose postings span more than one book. Instead [`compose_fx_pair`]
//! returns two independent chains, one per ledger, joined only by a shared
//! correlation token carried in `user_data_128`. The caller submits them in
//! order (source first) and is responsible for compensating if the second
//! chain fails after the first committed; [`compensating_chain`] (or
//! [`FxPair::compensate_source`]) builds that reversal.

use crate::account_class::AccountClass;
use crate::account_id::AccountId;
use crate::currency::Currency;
use crate::error::LedgerError;
use crate::id;
use crate::posting::Posting;

/// An ordered, non-empty run of postings meant to be submitted as one
/// atomic unit.
#[derive(Debug, Clone)]
pub struct Chain {
    postings: Vec<Posting>,
}

impl Chain {
    pub fn postings(&self) -> &[Posting] {
        &self.postings
    }

    pub fn len(&self) -> usize {
        self.postings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

/// Accumulates postings in sequence before sealing them into a [`Chain`].
#[derive(Debug, Default)]
pub struct ChainBuilder {
    postings: Vec<Posting>,
}

impl ChainBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn append(mut self, posting: Posting) -> Self {
        self.postings.push(posting);
        self
    }

    /// Seal the chain without touching any posting's `Linked` flag —
    /// callers who already set flags themselves use this.
    pub fn build(self) -> Result<Chain, LedgerError> {
        self.seal(false)
    }

    /// Seal the chain, setting the `Linked` flag on every posting but the
    /// last so the engine treats the whole run as one atomic unit. Sealing
    /// an empty builder yields the empty chain — building nothing is not an
    /// error, just a no-op.
    pub fn build_linked(self) -> Result<Chain, LedgerError> {
        self.seal(true)
    }

    fn seal(self, link_all_but_last: bool) -> Result<Chain, LedgerError> {
        let mut postings = self.postings;
        if link_all_but_last && !postings.is_empty() {
            let last = postings.len() - 1;
            for (i, p) in postings.iter_mut().enumerate() {
                if i != last {
                    *p = p.clone().linked();
                }
            }
        }
        for p in &postings {
            p.validate()?;
        }
        Ok(Chain { postings })
    }
}

/// Reserve → fee → settle: the same-currency payout chain shape (spec §4.4.2).
///
/// `tenant` and `currency` identify the payer's wallet; the `PendingOutbound`,
/// `FeeRevenue` and `RegionalSettlement` accounts are always the system
/// accounts (tenant `0`) for that currency.
///
/// - `fee == 0` elides the fee-collection posting (reserve → settle only).
/// - `fee == amount` elides the settlement posting (reserve → fee only).
/// - `fee > amount` is rejected — the precondition `fee <= amount` must hold.
///
/// The chain is returned linked (every posting but the last carries the
/// `Linked` flag) so the engine applies it atomically.
pub fn compose_same_currency(
    tenant: u64,
    currency: Currency,
    amount: u64,
    fee: u64,
    code: u16,
) -> Result<Chain, LedgerError> {
    if amount == 0 || fee > amount {
        return Err(LedgerError::ZeroAmount);
    }

    let wallet = AccountId::compose(tenant, AccountClass::TenantWallet, currency);
    let pending_outbound = AccountId::compose(0, AccountClass::PendingOutbound, currency);
    let fee_revenue = AccountId::compose(0, AccountClass::FeeRevenue, currency);
    let regional_settlement = AccountId::compose(0, AccountClass::RegionalSettlement, currency);
    let book = currency.numeric_code();

    let mut builder =
        ChainBuilder::new().append(Posting::new(wallet, pending_outbound, amount, book, code)?);

    if fee > 0 {
        builder = builder.append(Posting::new(pending_outbound, fee_revenue, fee, book, code)?);
    }
    if fee < amount {
        builder = builder.append(Posting::new(
            pending_outbound,
            regional_settlement,
            amount - fee,
            book,
            code,
        )?);
    }

    builder.build_linked()
}

/// Two independent linked chains for a cross-currency transfer, one per
/// ledger, joined by a shared correlation token.
pub struct FxPair {
    pub correlation_token: u128,
    pub source_chain: Chain,
    pub destination_chain: Chain,
    tenant: u64,
    src_currency: Currency,
    src_amount: u64,
    code: u16,
}

impl FxPair {
    /// Build the source-book reversal for this pair (spec §7's FX
    /// compensation helper). Call this when `destination_chain` fails to
    /// apply after `source_chain` has already committed.
    pub fn compensate_source(&self) -> Result<Chain, LedgerError> {
        compensating_chain(
            self.tenant,
            self.src_currency,
            self.src_amount,
            self.correlation_token,
            self.code,
        )
    }
}

/// Compose the source-ledger chain (reserve payer funds, acquire source
/// currency into FX settlement) and the destination-ledger chain (pay fee
/// and settle into the regional account), linked by a fresh correlation
/// token written into every posting's `user_data_128` (spec §4.4.3).
///
/// This is two ledgers, hence two chains — never one; the engine has no
/// primitive for a linked chain spanning two books. Submit `source_chain`
/// first: only once it has committed is the platform obligated to pay out
/// in the destination currency. If `destination_chain` then fails, use
/// [`FxPair::compensate_source`] to reverse `source_chain`.
pub fn compose_fx_pair(
    tenant: u64,
    src_currency: Currency,
    dst_currency: Currency,
    src_amount: u64,
    dst_amount: u64,
    fee_in_dst: u64,
    code: u16,
) -> Result<FxPair, LedgerError> {
    if src_currency == dst_currency {
        return Err(LedgerError::CurrencyMismatch {
            debit_currency: src_currency.to_string(),
            credit_currency: dst_currency.to_string(),
        });
    }
    if src_amount == 0 || dst_amount == 0 || fee_in_dst > dst_amount {
        return Err(LedgerError::ZeroAmount);
    }

    let correlation_token = id::generate()?;

    let src_wallet = AccountId::compose(tenant, AccountClass::TenantWallet, src_currency);
    let src_pending_outbound = AccountId::compose(0, AccountClass::PendingOutbound, src_currency);
    let src_fx_settlement = AccountId::compose(0, AccountClass::FxSettlement, src_currency);
    let src_book = src_currency.numeric_code();

    let dst_fx_settlement = AccountId::compose(0, AccountClass::FxSettlement, dst_currency);
    let dst_fee_revenue = AccountId::compose(0, AccountClass::FeeRevenue, dst_currency);
    let dst_regional_settlement =
        AccountId::compose(0, AccountClass::RegionalSettlement, dst_currency);
    let dst_book = dst_currency.numeric_code();

    let source_chain = ChainBuilder::new()
        .append(
            Posting::new(src_wallet, src_pending_outbound, src_amount, src_book, code)?
                .with_user_data(correlation_token, 0, 0),
        )
        .append(
            Posting::new(
                src_pending_outbound,
                src_fx_settlement,
                src_amount,
                src_book,
                code,
            )?
            .with_user_data(correlation_token, 0, 0),
        )
        .build_linked()?;

    let mut dst_builder = ChainBuilder::new();
    if fee_in_dst > 0 {
        dst_builder = dst_builder.append(
            Posting::new(dst_fx_settlement, dst_fee_revenue, fee_in_dst, dst_book, code)?
                .with_user_data(correlation_token, 0, 0),
        );
    }
    if fee_in_dst < dst_amount {
        dst_builder = dst_builder.append(
            Posting::new(
                dst_fx_settlement,
                dst_regional_settlement,
                dst_amount - fee_in_dst,
                dst_book,
                code,
            )?
            .with_user_data(correlation_token, 0, 0),
        );
    }
    let destination_chain = dst_builder.build_linked()?;

    Ok(FxPair {
        correlation_token,
        source_chain,
        destination_chain,
        tenant,
        src_currency,
        src_amount,
        code,
    })
}

/// Build the two-posting reversal of a committed FX source chain (spec §7):
/// `FXSettlement(src) → PendingOutbound(src) → TenantWallet(tenant, src)`,
/// carrying the original correlation token and fresh posting ids. Exposed
/// as a free function — not just [`FxPair::compensate_source`] — for
/// callers reconciling from persisted transfer state rather than a live
/// `FxPair` value (e.g. after a process restart).
pub fn compensating_chain(
    tenant: u64,
    src_currency: Currency,
    src_amount: u64,
    correlation_token: u128,
    code: u16,
) -> Result<Chain, LedgerError> {
    let wallet = AccountId::compose(tenant, AccountClass::TenantWallet, src_currency);
    let pending_outbound = AccountId::compose(0, AccountClass::PendingOutbound, src_currency);
    let fx_settlement = AccountId::compose(0, AccountClass::FxSettlement, src_currency);
    let book = src_currency.numeric_code();

    ChainBuilder::new()
        .append(
            Posting::new(fx_settlement, pending_outbound, src_amount, book, code)?
                .with_user_data(correlation_token, 0, 0),
        )
        .append(
            Posting::new(pending_outbound, wallet, src_amount, book, code)?
                .with_user_data(correlation_token, 0, 0),
        )
        .build_linked()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::flags::PostingFlags;

    #[test]
    fn same_currency_no_fee_elides_fee_posting() {
        let chain = compose_same_currency(1, Currency::Eur, 100_000, 0, 0).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(chain.postings()[0].amount(), 100_000);
        assert_eq!(chain.postings()[0].credit_account().account_class(), AccountClass::PendingOutbound);
        assert_eq!(chain.postings()[1].amount(), 100_000);
        assert_eq!(
            chain.postings()[1].credit_account().account_class(),
            AccountClass::RegionalSettlement
        );
        assert!(chain.postings()[0].flags().contains(PostingFlags::LINKED));
        assert!(!chain.postings()[1].flags().contains(PostingFlags::LINKED));
    }

    #[test]
    fn same_currency_with_fee_is_three_postings_conserving_amount() {
        let chain = compose_same_currency(0xAA, Currency::Gbp, 1_000_000, 5_000, 0).unwrap();
        assert_eq!(chain.len(), 3);
        assert_eq!(chain.postings()[0].amount(), 1_000_000);
        assert_eq!(chain.postings()[1].amount(), 5_000);
        assert_eq!(
            chain.postings()[1].credit_account().account_class(),
            AccountClass::FeeRevenue
        );
        assert_eq!(chain.postings()[2].amount(), 995_000);
        assert_eq!(
            chain.postings()[2].credit_account().account_class(),
            AccountClass::RegionalSettlement
        );
        let reserved = chain.postings()[0].amount();
        let fee_and_settle: u64 = chain.postings()[1..].iter().map(|p| p.amount()).sum();
        assert_eq!(reserved, fee_and_settle);
    }

    #[test]
    fn fee_equal_to_amount_elides_settlement_posting() {
        let chain = compose_same_currency(1, Currency::Eur, 100, 100, 0).unwrap();
        assert_eq!(chain.len(), 2);
        assert_eq!(
            chain.postings()[1].credit_account().account_class(),
            AccountClass::FeeRevenue
        );
    }

    #[test]
    fn fee_greater_than_amount_rejected() {
        let result = compose_same_currency(1, Currency::Eur, 100, 101, 0);
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn zero_amount_rejected_without_emitting_postings() {
        let result = compose_same_currency(1, Currency::Eur, 0, 0, 0);
        assert!(matches!(result, Err(LedgerError::ZeroAmount)));
    }

    #[test]
    fn pending_outbound_nets_to_zero() {
        let chain = compose_same_currency(1, Currency::Sek, 1_000, 30, 0).unwrap();
        let into_pending: i128 = chain
            .postings()
            .iter()
            .filter(|p| p.credit_account().account_class() == AccountClass::PendingOutbound)
            .map(|p| p.amount() as i128)
            .sum();
        let out_of_pending: i128 = chain
            .postings()
            .iter()
            .filter(|p| p.debit_account().account_class() == AccountClass::PendingOutbound)
            .map(|p| p.amount() as i128)
            .sum();
        assert_eq!(into_pending, out_of_pending);
    }

    #[test]
    fn fx_pair_shares_correlation_token_across_both_chains() {
        let pair = compose_fx_pair(1, Currency::Eur, Currency::Idr, 10_000, 174_982_500, 17_500, 42)
            .unwrap();
        for p in pair.source_chain.postings() {
            assert_eq!(p.user_data_128(), pair.correlation_token);
        }
        for p in pair.destination_chain.postings() {
            assert_eq!(p.user_data_128(), pair.correlation_token);
        }
    }

    #[test]
    fn fx_pair_never_crosses_currencies_within_one_chain() {
        let pair = compose_fx_pair(1, Currency::Eur, Currency::Usd, 1000, 1080, 10, 0).unwrap();
        for p in pair.source_chain.postings() {
            assert_eq!(p.debit_account().currency(), p.credit_account().currency());
            assert_eq!(p.debit_account().currency(), Currency::Eur);
        }
        for p in pair.destination_chain.postings() {
            assert_eq!(p.debit_account().currency(), p.credit_account().currency());
            assert_eq!(p.debit_account().currency(), Currency::Usd);
        }
    }

    #[test]
    fn fx_pair_equal_currencies_rejected() {
        let result = compose_fx_pair(1, Currency::Eur, Currency::Eur, 1000, 1000, 0, 0);
        assert!(matches!(result, Err(LedgerError::CurrencyMismatch { .. })));
    }

    #[test]
    fn fx_pair_conservation_matches_scenario_s3() {
        // spec.md S3: EUR -> IDR, src_amount=10_000, dst_amount=174_982_500+17_500.
        let pair =
            compose_fx_pair(1, Currency::Eur, Currency::Idr, 10_000, 174_982_500 + 17_500, 17_500, 42)
                .unwrap();
        assert_eq!(pair.source_chain.len(), 2);
        assert_eq!(pair.source_chain.postings()[0].amount(), 10_000);
        assert_eq!(pair.source_chain.postings()[1].amount(), 10_000);
        assert_eq!(pair.destination_chain.len(), 2);
        assert_eq!(pair.destination_chain.postings()[0].amount(), 17_500);
        assert_eq!(
            pair.destination_chain.postings()[0].credit_account().account_class(),
            AccountClass::FeeRevenue
        );
        assert_eq!(pair.destination_chain.postings()[1].amount(), 174_982_500);
        assert_eq!(
            pair.destination_chain.postings()[1].credit_account().account_class(),
            AccountClass::RegionalSettlement
        );
    }

    #[test]
    fn compensation_reverses_the_source_chain_in_order() {
        // spec.md S5: source Applied, destination rejected.
        let pair = compose_fx_pair(1, Currency::Eur, Currency::Idr, 10_000, 174_982_500, 0, 0).unwrap();
        let reversal = pair.compensate_source().unwrap();
        assert_eq!(reversal.len(), 2);
        assert_eq!(
            reversal.postings()[0].debit_account().account_class(),
            AccountClass::FxSettlement
        );
        assert_eq!(
            reversal.postings()[0].credit_account().account_class(),
            AccountClass::PendingOutbound
        );
        assert_eq!(
            reversal.postings()[1].debit_account().account_class(),
            AccountClass::PendingOutbound
        );
        assert_eq!(
            reversal.postings()[1].credit_account().account_class(),
            AccountClass::TenantWallet
        );
        assert_eq!(reversal.postings()[0].amount(), 10_000);
        assert_eq!(reversal.postings()[1].amount(), 10_000);
        for p in reversal.postings() {
            assert_eq!(p.user_data_128(), pair.correlation_token);
        }
    }

    #[test]
    fn compensating_chain_free_function_matches_fx_pair_method() {
        let pair = compose_fx_pair(7, Currency::Gbp, Currency::Sek, 500, 5_000, 0, 9).unwrap();
        let via_method = pair.compensate_source().unwrap();
        let via_function =
            compensating_chain(7, Currency::Gbp, 500, pair.correlation_token, 9).unwrap();
        assert_eq!(via_method.len(), via_function.len());
        for (a, b) in via_method.postings().iter().zip(via_function.postings()) {
            assert_eq!(a.debit_account(), b.debit_account());
            assert_eq!(a.credit_account(), b.credit_account());
            assert_eq!(a.amount(), b.amount());
        }
    }

    #[test]
    fn empty_chain_builds_to_empty_linked_chain() {
        let chain = ChainBuilder::new().build_linked().unwrap();
        assert!(chain.is_empty());
    }
}
