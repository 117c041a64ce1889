//! engine events and sinks

use std::sync::{Arc, Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::commitment::Commitment;
use crate::swap::{SwapDirection, SwapHash};
use crate::types::{Identity, PoolId, Timestamp, TokenId};

/// emitted after a state change has been persisted
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapEvent {
    PoolCreated {
        pool_id: PoolId,
        token_a: TokenId,
        token_b: TokenId,
    },
    LiquidityAdded {
        pool_id: PoolId,
        provider: Identity,
        commitment_a: Commitment,
        commitment_b: Commitment,
    },
    LiquidityRemoved {
        pool_id: PoolId,
        provider: Identity,
        commitment_a: Commitment,
        commitment_b: Commitment,
    },
    SwapCommitted {
        pool_id: PoolId,
        committer: Identity,
        commitment_hash: SwapHash,
    },
    SwapExecuted {
        pool_id: PoolId,
        committer: Identity,
        direction: SwapDirection,
        amount_in: u64,
        amount_out: u64,
        /// taken from `amount_in`, credited to the pool's fee balance
        fee: u64,
    },
    /// an execute attempt found the commitment past its window and cleared it
    SwapExpired {
        pool_id: PoolId,
        committer: Identity,
        expired_at: Timestamp,
    },
    FeesCollected {
        pool_id: PoolId,
        collector: Identity,
        fees_a: Commitment,
        fees_b: Commitment,
    },
    FeeCollectorChanged {
        previous: Identity,
        current: Identity,
    },
    PauseChanged {
        paused: bool,
    },
    OwnershipTransferStarted {
        owner: Identity,
        pending: Identity,
    },
    OwnershipTransferred {
        previous: Identity,
        owner: Identity,
    },
}

/// append-only event consumer
pub trait EventSink {
    fn emit(&self, event: SwapEvent);
}

impl<T: EventSink + ?Sized> EventSink for Box<T> {
    fn emit(&self, event: SwapEvent) {
        (**self).emit(event)
    }
}

impl<T: EventSink + ?Sized> EventSink for Arc<T> {
    fn emit(&self, event: SwapEvent) {
        (**self).emit(event)
    }
}

/// in-memory log, clones share the same buffer
#[derive(Clone, Debug, Default)]
pub struct EventLog {
    events: Arc<Mutex<Vec<SwapEvent>>>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<SwapEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn last(&self) -> Option<SwapEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .last()
            .cloned()
    }

    pub fn len(&self) -> usize {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl EventSink for EventLog {
    fn emit(&self, event: SwapEvent) {
        // the buffer stays consistent even if a holder panicked
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event);
    }
}

/// writes events to the tracing log
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl EventSink for TracingSink {
    fn emit(&self, event: SwapEvent) {
        match event {
            SwapEvent::PoolCreated { pool_id, token_a, token_b } => {
                info!(pool = %pool_id, %token_a, %token_b, "pool created");
            }
            SwapEvent::LiquidityAdded { pool_id, provider, commitment_a, commitment_b } => {
                info!(pool = %pool_id, %provider, %commitment_a, %commitment_b, "liquidity added");
            }
            SwapEvent::LiquidityRemoved { pool_id, provider, commitment_a, commitment_b } => {
                info!(pool = %pool_id, %provider, %commitment_a, %commitment_b, "liquidity removed");
            }
            SwapEvent::SwapCommitted { pool_id, committer, commitment_hash } => {
                info!(pool = %pool_id, %committer, hash = %commitment_hash, "swap committed");
            }
            SwapEvent::SwapExecuted { pool_id, committer, direction, amount_in, amount_out, fee } => {
                info!(pool = %pool_id, %committer, ?direction, amount_in, amount_out, fee, "swap executed");
            }
            SwapEvent::SwapExpired { pool_id, committer, expired_at } => {
                info!(pool = %pool_id, %committer, expired_at, "expired swap commitment cleared");
            }
            SwapEvent::FeesCollected { pool_id, collector, fees_a, fees_b } => {
                info!(pool = %pool_id, %collector, %fees_a, %fees_b, "fees collected");
            }
            SwapEvent::FeeCollectorChanged { previous, current } => {
                info!(%previous, %current, "fee collector changed");
            }
            SwapEvent::PauseChanged { paused } => {
                info!(paused, "pause state changed");
            }
            SwapEvent::OwnershipTransferStarted { owner, pending } => {
                info!(%owner, %pending, "ownership transfer started");
            }
            SwapEvent::OwnershipTransferred { previous, owner } => {
                info!(%previous, %owner, "ownership transferred");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_clones_share_buffer() {
        let log = EventLog::new();
        let sink: Box<dyn EventSink> = Box::new(log.clone());

        sink.emit(SwapEvent::PauseChanged { paused: true });
        sink.emit(SwapEvent::PauseChanged { paused: false });

        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(SwapEvent::PauseChanged { paused: false }));
    }

    #[test]
    fn test_log_survives_poisoned_lock() {
        let log = EventLog::new();
        log.emit(SwapEvent::PauseChanged { paused: true });

        let held = log.clone();
        let crashed = std::thread::spawn(move || {
            let _guard = held.events.lock().unwrap();
            panic!("consumer crashed while holding the log");
        })
        .join();
        assert!(crashed.is_err());
        assert!(log.events.is_poisoned());

        // still recorded and still readable
        log.emit(SwapEvent::PauseChanged { paused: false });
        assert_eq!(log.len(), 2);
        assert_eq!(log.last(), Some(SwapEvent::PauseChanged { paused: false }));
        assert_eq!(log.events().len(), 2);
        assert!(!log.is_empty());
    }
}
