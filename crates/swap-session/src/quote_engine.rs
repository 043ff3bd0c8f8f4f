//! Decimal-aware quoting through the router's deterministic pricing
//! function, plus the per-side debounce bookkeeping the controller uses to
//! collapse keystroke bursts.

use rust_decimal::Decimal;
use std::sync::Arc;

use crate::chain::{ChainError, ChainReader};
use crate::types::{from_base_units, to_base_units, PairPath};

pub struct QuoteEngine {
    reader: Arc<dyn ChainReader>,
}

impl QuoteEngine {
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self { reader }
    }

    /// Raw-unit `getAmountsOut` over a two-token path. Used by the executor
    /// for the pre-submission re-quote, where no display rounding may occur.
    pub async fn quote_out_raw(
        &self,
        amount_in: u128,
        path: &PairPath,
    ) -> Result<u128, ChainError> {
        let amounts = self.reader.amounts_out(amount_in, path.addresses()).await?;
        Ok(amounts[1])
    }

    /// Amount received on the to side for a typed from amount. Input and
    /// output are each scaled by their own token's decimals.
    pub async fn quote_out(
        &self,
        amount_in: Decimal,
        path: &PairPath,
    ) -> Result<Decimal, ChainError> {
        let raw_in = to_base_units(amount_in, path.from.decimals)
            .ok_or_else(|| ChainError::Call("input amount out of range".to_string()))?;
        let raw_out = self.quote_out_raw(raw_in, path).await?;
        Ok(from_base_units(raw_out, path.to.decimals))
    }

    /// Amount required on the from side for a typed to amount.
    pub async fn quote_in(
        &self,
        amount_out: Decimal,
        path: &PairPath,
    ) -> Result<Decimal, ChainError> {
        let raw_out = to_base_units(amount_out, path.to.decimals)
            .ok_or_else(|| ChainError::Call("output amount out of range".to_string()))?;
        let amounts = self.reader.amounts_in(raw_out, path.addresses()).await?;
        Ok(from_base_units(amounts[0], path.from.decimals))
    }
}

/// Cancellable debounce state for one input side.
///
/// Re-arming replaces the pending timer logically: the generation advances
/// and any timer still in flight for an older generation is ignored when it
/// fires, so only the last keystroke in a burst issues a request.
#[derive(Debug, Default)]
pub struct DebouncedSide {
    generation: u64,
}

impl DebouncedSide {
    /// Schedule a new debounced request, superseding any pending one.
    /// Returns the generation the new timer must present when it fires.
    pub fn arm(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Cancel whatever is pending without scheduling a replacement.
    pub fn disarm(&mut self) {
        self.generation += 1;
    }

    pub fn is_current(&self, generation: u64) -> bool {
        self.generation == generation
    }
}
