//! Swap call construction and submission.

use chrono::Utc;
use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::info;

use crate::chain::{ChainError, ChainReader, ChainSigner, TxHandle};
use crate::quote_engine::QuoteEngine;
use crate::types::{to_base_units, PairPath, SwapError};

pub struct SwapExecutor {
    quotes: QuoteEngine,
    native_symbol: String,
    deadline_offset_secs: i64,
}

impl SwapExecutor {
    pub fn new(
        reader: Arc<dyn ChainReader>,
        native_symbol: String,
        deadline_offset_secs: i64,
    ) -> Self {
        Self {
            quotes: QuoteEngine::new(reader),
            native_symbol,
            deadline_offset_secs,
        }
    }

    /// Build and submit the swap call variant matching the token roles.
    ///
    /// The output amount is re-quoted immediately before submission and used
    /// as the exact minimum acceptable output; no extra slippage tolerance
    /// is layered on. Reserve movement between the re-quote and confirmation
    /// can therefore still revert the transaction.
    pub async fn execute(
        &self,
        amount_in: Decimal,
        path: &PairPath,
        signer: &dyn ChainSigner,
    ) -> Result<TxHandle, SwapError> {
        let accounts = signer.accounts().await.map_err(map_chain_error)?;
        let to = *accounts.first().ok_or(SwapError::SwapFailed)?;

        let raw_in =
            to_base_units(amount_in, path.from.decimals).ok_or(SwapError::SwapFailed)?;
        let min_out = self
            .quotes
            .quote_out_raw(raw_in, path)
            .await
            .map_err(map_chain_error)?;

        let deadline = (Utc::now().timestamp() + self.deadline_offset_secs) as u64;
        let addresses = path.addresses();

        info!(
            from = %path.from.symbol,
            to_token = %path.to.symbol,
            raw_in,
            min_out,
            "submitting swap"
        );

        let result = if path.from.symbol == self.native_symbol {
            signer
                .swap_exact_native_for_tokens(raw_in, min_out, addresses, to, deadline)
                .await
        } else if path.to.symbol == self.native_symbol {
            signer
                .swap_exact_tokens_for_native(raw_in, min_out, addresses, to, deadline)
                .await
        } else {
            signer
                .swap_exact_tokens_for_tokens(raw_in, min_out, addresses, to, deadline)
                .await
        };

        result.map_err(map_chain_error)
    }
}

/// The orchestrator must be able to tell these three buckets apart.
fn map_chain_error(err: ChainError) -> SwapError {
    match err {
        ChainError::InsufficientFunds => SwapError::InsufficientFunds,
        ChainError::Rejected => SwapError::UserCancelled,
        ChainError::Call(_) => SwapError::SwapFailed,
    }
}
