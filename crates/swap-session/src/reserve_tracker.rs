//! Reserve snapshots, the one-pair push subscription, and orientation.

use alloy_primitives::Address;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::chain::{ChainError, ChainReader, RawReserves, ReserveEvents};
use crate::sync_controller::SessionEvent;
use crate::types::{from_base_units, PairPath, PairReserves};

/// Map raw slot-ordered reserves onto from/to roles, scaling each raw
/// integer by its own token's decimal precision.
///
/// Pools store reserves by raw address magnitude, smallest first. When the
/// pair is flipped (from token's address is the greater one) the from token
/// occupies slot 1.
pub fn orient(raw: RawReserves, path: &PairPath) -> PairReserves {
    if path.flipped() {
        PairReserves {
            reserve_from: from_base_units(raw.reserve1, path.from.decimals),
            reserve_to: from_base_units(raw.reserve0, path.to.decimals),
        }
    } else {
        PairReserves {
            reserve_from: from_base_units(raw.reserve0, path.from.decimals),
            reserve_to: from_base_units(raw.reserve1, path.to.decimals),
        }
    }
}

/// A live reserve subscription for exactly one pair. Dropping (or calling
/// `cancel`) aborts the drain task so a superseded pair can never write over
/// current state.
pub struct SubscriptionHandle {
    task: JoinHandle<()>,
}

impl SubscriptionHandle {
    pub fn cancel(self) {
        self.task.abort();
    }
}

impl Drop for SubscriptionHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

pub struct ReserveTracker {
    reader: Arc<dyn ChainReader>,
    events: Arc<dyn ReserveEvents>,
}

impl ReserveTracker {
    pub fn new(reader: Arc<dyn ChainReader>, events: Arc<dyn ReserveEvents>) -> Self {
        Self { reader, events }
    }

    /// One-shot oriented snapshot of the pair's current reserves.
    pub async fn snapshot(
        &self,
        pair: Address,
        path: &PairPath,
    ) -> Result<PairReserves, ChainError> {
        let raw = self.reader.reserves(pair).await?;
        Ok(orient(raw, path))
    }

    /// Open a standing subscription for the pair, delivering oriented
    /// reserve updates tagged with the pair epoch they were issued under.
    /// The caller must dispose any previous handle first.
    pub async fn subscribe(
        &self,
        pair: Address,
        path: PairPath,
        epoch: u64,
        tx: UnboundedSender<SessionEvent>,
    ) -> Result<SubscriptionHandle, ChainError> {
        let mut stream = self.events.subscribe(pair).await?;
        let task = tokio::spawn(async move {
            while let Some(raw) = stream.next().await {
                let reserves = orient(raw, &path);
                debug!(%pair, ?reserves, "reserve update received");
                if tx.send(SessionEvent::ReserveUpdate { epoch, reserves }).is_err() {
                    break;
                }
            }
        });
        Ok(SubscriptionHandle { task })
    }
}
