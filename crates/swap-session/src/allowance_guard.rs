//! Router allowance checks and approval requests.

use alloy_primitives::{Address, U256};
use std::sync::Arc;

use crate::chain::{ChainError, ChainReader, ChainSigner, TxHandle};
use crate::token_list::Token;
use crate::types::SwapError;

pub struct AllowanceGuard {
    reader: Arc<dyn ChainReader>,
    router: Address,
}

impl AllowanceGuard {
    pub fn new(reader: Arc<dyn ChainReader>, router: Address) -> Self {
        Self { reader, router }
    }

    /// Remaining router allowance for the connected account's tokens.
    /// `None` (not an error) when no wallet or no account is connected.
    pub async fn remaining_allowance(
        &self,
        token: &Token,
        signer: Option<&dyn ChainSigner>,
    ) -> Result<Option<U256>, ChainError> {
        let Some(signer) = signer else {
            return Ok(None);
        };
        let accounts = signer.accounts().await?;
        let Some(owner) = accounts.first().copied() else {
            return Ok(None);
        };
        let remaining = self.reader.allowance(token.address, owner, self.router).await?;
        Ok(Some(remaining))
    }

    /// Request an effectively unlimited allowance for the router. The caller
    /// must not proceed to a swap while this is pending; its resolution is
    /// the only confirmation.
    pub async fn approve(
        &self,
        token: &Token,
        signer: &dyn ChainSigner,
    ) -> Result<TxHandle, SwapError> {
        match signer.approve(token.address, self.router, U256::MAX).await {
            Ok(tx) => Ok(tx),
            Err(ChainError::Rejected) => Err(SwapError::UserCancelled),
            Err(_) => Err(SwapError::ApprovalFailed),
        }
    }
}
