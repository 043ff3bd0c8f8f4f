//! Quote-synchronization session engine for AMM token swaps.
//!
//! The crate keeps a two-sided swap form consistent with on-chain pool
//! state: it resolves the pool for the selected token pair, tracks its
//! reserves, debounces per-side quote requests, gates submission on router
//! allowance and balances, and discards every asynchronous result that a
//! later selection or keystroke has superseded.

pub mod allowance_guard;
pub mod chain;
pub mod config;
pub mod pair_resolver;
pub mod quote_engine;
pub mod reserve_tracker;
pub mod session;
pub mod swap_executor;
pub mod sync_controller;
pub mod token_list;
pub mod types;

#[cfg(test)]
mod tests;

/// Install a global tracing subscriber honoring `RUST_LOG`.
pub fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}
