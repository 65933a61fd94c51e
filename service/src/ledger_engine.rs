//! Concrete [`ledger_core::Engine`] implementation against a real
//! TigerBeetle cluster.
//!
//! Grounded on `internal/ledger/client.go`'s wrapper shape (one struct
//! owning the raw client, domain methods on top) but built against the
//! `tigerbeetle-unofficial-client` crate rather than the Go SDK. Ledger
//! number is fixed per currency: each ISO 4217 numeric code doubles as the
//! TigerBeetle ledger id, so postings can never cross currencies without
//! the engine itself rejecting them — a second line of defense behind
//! `Posting::validate`.

use std::time::Instant;

use async_trait::async_trait;
use tigerbeetle_unofficial_client::{
    account::Account as TbAccount,
    transfer::Transfer as TbTransfer,
    Client as TbClient,
};

use ledger_core::account_class::AccountClass;
use ledger_core::account_id::AccountId;
use ledger_core::chain::Chain;
use ledger_core::currency::Currency;
use ledger_core::engine::{AccountSnapshot, ChainOutcome, Engine};
use ledger_core::error::LedgerError;
use ledger_core::flags::PostingFlags;

use crate::config::TigerBeetleConfig;
use crate::metrics;

pub struct TigerBeetleEngine {
    client: TbClient,
}

impl TigerBeetleEngine {
    pub async fn connect(config: &TigerBeetleConfig) -> Result<Self, LedgerError> {
        let client = TbClient::new(config.cluster_id, &config.addresses).map_err(|e| {
            LedgerError::EngineUnavailable {
                reason: format!("failed to connect to TigerBeetle cluster: {e}"),
            }
        })?;
        Ok(Self { client })
    }

    /// A TigerBeetle transfer flag word from a [`PostingFlags`] value.
    fn tb_flags(flags: PostingFlags) -> u16 {
        let mut bits = 0u16;
        if flags.contains(PostingFlags::LINKED) {
            bits |= 1 << 0;
        }
        if flags.contains(PostingFlags::PENDING) {
            bits |= 1 << 1;
        }
        if flags.contains(PostingFlags::POST_PENDING) {
            bits |= 1 << 2;
        }
        if flags.contains(PostingFlags::VOID_PENDING) {
            bits |= 1 << 3;
        }
        bits
    }
}

#[async_trait]
impl Engine for TigerBeetleEngine {
    async fn create_account(
        &self,
        account_id: AccountId,
        class: AccountClass,
        currency: Currency,
    ) -> Result<(), LedgerError> {
        let start = Instant::now();
        let account = TbAccount::new(u128::from_be_bytes(*account_id.as_bytes()))
            .ledger(currency.numeric_code())
            .code(class.wire_code() as u16);

        let result = self
            .client
            .create_accounts(vec![account])
            .await
            .map_err(|e| LedgerError::EngineUnavailable {
                reason: format!("create_accounts call failed: {e}"),
            });
        metrics::record_engine_latency("create_account", start.elapsed().as_secs_f64());

        match result {
            Ok(results) => {
                // Idempotent: `exists` is not an error for account creation.
                for r in results {
                    if !r.is_ok() && !r.is_already_exists() {
                        metrics::record_engine_error("create_account", "rejected");
                        return Err(LedgerError::EngineRejected {
                            index: 0,
                            code: r.describe(),
                        });
                    }
                }
                Ok(())
            }
            Err(e) => {
                metrics::record_engine_error("create_account", "unavailable");
                Err(e)
            }
        }
    }

    async fn lookup_account(
        &self,
        account_id: AccountId,
    ) -> Result<Option<AccountSnapshot>, LedgerError> {
        let start = Instant::now();
        let id = u128::from_be_bytes(*account_id.as_bytes());
        let result = self.client.lookup_accounts(vec![id]).await.map_err(|e| {
            LedgerError::EngineUnavailable {
                reason: format!("lookup_accounts call failed: {e}"),
            }
        });
        metrics::record_engine_latency("lookup_account", start.elapsed().as_secs_f64());

        let accounts = result?;
        Ok(accounts.into_iter().next().map(|a| AccountSnapshot {
            account_id,
            debits_posted: a.debits_posted() as u64,
            credits_posted: a.credits_posted() as u64,
            debits_pending: a.debits_pending() as u64,
            credits_pending: a.credits_pending() as u64,
        }))
    }

    async fn submit_chain(&self, chain: &Chain) -> Result<ChainOutcome, LedgerError> {
        let start = Instant::now();
        let transfers: Vec<TbTransfer> = chain
            .postings()
            .iter()
            .map(|p| {
                TbTransfer::new(p.id())
                    .debit_account_id(u128::from_be_bytes(*p.debit_account().as_bytes()))
                    .credit_account_id(u128::from_be_bytes(*p.credit_account().as_bytes()))
                    .ledger(p.book())
                    .code(p.code())
                    .amount(p.amount() as u128)
                    .user_data_128(p.user_data_128())
                    .user_data_64(p.user_data_64())
                    .user_data_32(p.user_data_32())
                    .flags(Self::tb_flags(p.flags()))
            })
            .collect();

        let result = self
            .client
            .create_transfers(transfers)
            .await
            .map_err(|e| LedgerError::EngineUnavailable {
                reason: format!("create_transfers call failed: {e}"),
            });
        metrics::record_engine_latency("submit_chain", start.elapsed().as_secs_f64());

        let results = result?;
        for r in &results {
            if !r.is_ok() {
                metrics::record_engine_error("submit_chain", "rejected");
                return Ok(ChainOutcome::Rejected {
                    index: r.index() as usize,
                    code: r.describe(),
                });
            }
        }
        Ok(ChainOutcome::Committed)
    }
}
