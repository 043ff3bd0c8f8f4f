//! External chain interfaces consumed by the session engine.
//!
//! The engine treats the chain as an oracle behind these traits: read-only
//! queries, signed mutations, and a push stream of pool reserve changes.
//! Implementations (JSON-RPC, websocket providers) live outside this crate;
//! tests use an in-memory mock.

use alloy_primitives::{Address, B256, U256};
use async_trait::async_trait;
use futures::stream::BoxStream;
use thiserror::Error;

/// Transport- and contract-level failures. The user-rejection and
/// insufficient-funds conditions stay distinguishable so the orchestrator
/// can map them to their own notification kinds.
#[derive(Debug, Error)]
pub enum ChainError {
    #[error("signing request rejected by the user")]
    Rejected,
    #[error("insufficient funds for transaction")]
    InsufficientFunds,
    #[error("chain call failed: {0}")]
    Call(String),
}

/// Handle for a submitted transaction. Resolution of the submitting call
/// already indicates acceptance; no further polling is required here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TxHandle {
    pub hash: B256,
}

/// Raw paired reserves exactly as the pool reports them: unscaled integers
/// in address-sorted slot order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawReserves {
    pub reserve0: u128,
    pub reserve1: u128,
}

/// Read-only chain queries. Assumed idempotent and side-effect free.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Factory lookup for the unordered token pair. Returns `Address::ZERO`
    /// when no pool exists; that is a valid result, not an error.
    async fn pair_for(&self, token_a: Address, token_b: Address) -> Result<Address, ChainError>;

    async fn reserves(&self, pair: Address) -> Result<RawReserves, ChainError>;

    /// Router `getAmountsOut` over a two-token path, in raw base units.
    async fn amounts_out(
        &self,
        amount_in: u128,
        path: [Address; 2],
    ) -> Result<[u128; 2], ChainError>;

    /// Router `getAmountsIn` over a two-token path, in raw base units.
    async fn amounts_in(
        &self,
        amount_out: u128,
        path: [Address; 2],
    ) -> Result<[u128; 2], ChainError>;

    async fn native_balance(&self, account: Address) -> Result<u128, ChainError>;

    async fn token_balance(&self, token: Address, account: Address)
        -> Result<u128, ChainError>;

    async fn allowance(
        &self,
        token: Address,
        owner: Address,
        spender: Address,
    ) -> Result<U256, ChainError>;
}

/// Signed chain mutations issued through the connected wallet.
#[async_trait]
pub trait ChainSigner: Send + Sync {
    async fn accounts(&self) -> Result<Vec<Address>, ChainError>;

    async fn approve(
        &self,
        token: Address,
        spender: Address,
        amount: U256,
    ) -> Result<TxHandle, ChainError>;

    /// Native-in, token-out variant; `amount_in` rides as transaction value.
    async fn swap_exact_native_for_tokens(
        &self,
        amount_in: u128,
        amount_out_min: u128,
        path: [Address; 2],
        to: Address,
        deadline: u64,
    ) -> Result<TxHandle, ChainError>;

    async fn swap_exact_tokens_for_native(
        &self,
        amount_in: u128,
        amount_out_min: u128,
        path: [Address; 2],
        to: Address,
        deadline: u64,
    ) -> Result<TxHandle, ChainError>;

    async fn swap_exact_tokens_for_tokens(
        &self,
        amount_in: u128,
        amount_out_min: u128,
        path: [Address; 2],
        to: Address,
        deadline: u64,
    ) -> Result<TxHandle, ChainError>;
}

pub type ReserveStream = BoxStream<'static, RawReserves>;

/// Push notifications of pool reserve changes, keyed by pair address.
#[async_trait]
pub trait ReserveEvents: Send + Sync {
    async fn subscribe(&self, pair: Address) -> Result<ReserveStream, ChainError>;
}

/// External collaborator receiving user-facing messages. Out of scope beyond
/// this narrow surface.
pub trait NotificationSink: Send + Sync {
    fn error(&self, message: &str);
    fn info(&self, message: &str);
}
