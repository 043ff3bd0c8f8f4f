//! Liquidity-pair address resolution through the exchange factory.

use alloy_primitives::Address;
use lru::LruCache;
use std::num::NonZeroUsize;
use std::sync::{Arc, Mutex};
use tracing::debug;

use crate::chain::{ChainError, ChainReader};

/// Unordered cache key; the factory lookup is symmetric.
fn pair_key(a: Address, b: Address) -> (Address, Address) {
    if a < b {
        (a, b)
    } else {
        (b, a)
    }
}

pub struct PairResolver {
    reader: Arc<dyn ChainReader>,
    cache: Mutex<LruCache<(Address, Address), Address>>,
}

impl PairResolver {
    pub fn new(reader: Arc<dyn ChainReader>) -> Self {
        Self {
            reader,
            cache: Mutex::new(LruCache::new(NonZeroUsize::new(256).unwrap())),
        }
    }

    /// Deterministic pair address for the unordered token pair.
    ///
    /// `Address::ZERO` means no pool exists; callers treat it as "no
    /// liquidity available", not a fault. The sentinel is never cached since
    /// a pool may be created later.
    pub async fn resolve(&self, token_a: Address, token_b: Address) -> Result<Address, ChainError> {
        let key = pair_key(token_a, token_b);
        if let Some(&pair) = self.cache.lock().unwrap().get(&key) {
            return Ok(pair);
        }
        let pair = self.reader.pair_for(token_a, token_b).await?;
        if pair != Address::ZERO {
            self.cache.lock().unwrap().put(key, pair);
        } else {
            debug!(%token_a, %token_b, "factory returned the zero-address sentinel");
        }
        Ok(pair)
    }
}
