//! Library surface of the Kovra ledger service, split out from `main.rs` so
//! the binary entrypoint and integration tests share one crate instead of
//! the binary re-declaring every module privately.

pub mod cache;
pub mod config;
pub mod db;
pub mod handlers;
pub mod ledger_engine;
pub mod metrics;
pub mod routes;
pub mod state;
