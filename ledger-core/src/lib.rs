//! Ledger core: the account identifier codec, posting model and chain
//! composer that sit between the Kovra service and its accounting engine.
//!
//! - **`account_id`** — the 128-bit account identifier codec (C2).
//! - **`account_class`** / **`currency`** / **`flags`** — the closed type
//!   dictionary the codec and posting model are built on (C1).
//! - **`posting`** — the immutable posting builder and its invariants (C3).
//! - **`chain`** — groups postings into atomic linked chains, including the
//!   two-chain FX composer (C4).
//! - **`engine`** — the trait the accounting engine is consumed through,
//!   implemented outside this crate (C5).
//! - **`error`** — the closed error taxonomy every fallible operation here
//!   returns.
//!
//! This crate does no I/O. The only boundary to the outside world is the
//! `Engine` trait, implemented by `service` against a real cluster.

pub mod account_class;
pub mod account_id;
pub mod chain;
pub mod currency;
pub mod engine;
pub mod error;
pub mod flags;
pub mod id;
pub mod posting;

pub use account_class::AccountClass;
pub use account_id::AccountId;
pub use chain::{
    compensating_chain, compose_fx_pair, compose_same_currency, Chain, ChainBuilder, FxPair,
};
pub use currency::Currency;
pub use engine::{AccountSnapshot, ChainOutcome, Engine};
pub use error::LedgerError;
pub use flags::PostingFlags;
pub use posting::Posting;
