//! swap coordinator, commit then execute

use tracing::{info, warn};

use super::ConfidentialSwap;
use crate::clock::Clock;
use crate::commitment::Commitment;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pool::Side;
use crate::pricing::Pricing;
use crate::range_proof::{ProofContext, ProofLabel, RangeProof};
use crate::store::{Store, WriteBatch};
use crate::swap::{SwapCommitment, SwapDirection, SwapHash, SwapOrder, SwapState};
use crate::types::{Identity, PoolId};

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    /// bind a swap order by its hash, see [`SwapOrder::commitment_hash`]
    ///
    /// an expired commitment by the same caller is replaced.
    pub fn commit_swap(
        &mut self,
        caller: &Identity,
        pool_id: &PoolId,
        commitment_hash: SwapHash,
    ) -> Result<()> {
        self.ensure_active("commit_swap")?;
        self.load_pool(pool_id)?;

        if commitment_hash.is_empty() {
            return Err(Error::InvalidCommitmentHash);
        }

        let now = self.clock.now();
        if let Some(existing) = self.store.swap(pool_id, caller)? {
            match self.state_of(&existing, now) {
                SwapState::Expired { expired_at } => {
                    info!(pool = %pool_id, %caller, expired_at, "replacing expired swap commitment");
                }
                _ => {
                    warn!(pool = %pool_id, %caller, "rejected commit: commitment pending");
                    return Err(Error::CommitmentPending);
                }
            }
        }

        let mut batch = WriteBatch::new();
        batch.put_swap(SwapCommitment {
            pool_id: *pool_id,
            committer: *caller,
            commitment_hash,
            committed_at: now,
        });
        self.commit(
            batch,
            vec![SwapEvent::SwapCommitted {
                pool_id: *pool_id,
                committer: *caller,
                commitment_hash,
            }],
        )?;

        info!(
            pool = %pool_id,
            %caller,
            ready_at = now.saturating_add(self.config.reveal_delay),
            "swap committed"
        );
        Ok(())
    }

    /// reveal and settle a committed order
    ///
    /// the pricing rule sees the revealed order and returns the fee, which
    /// stays in the pool's fee balance for the input side. `proof` is a range
    /// proof, under the pool's `SwapReserve` context, for the output-side
    /// reserve after `amount_out` has left it.
    ///
    /// an expired commitment is cleared before `SwapExpired` is returned.
    pub fn execute_swap(
        &mut self,
        caller: &Identity,
        pool_id: &PoolId,
        order: &SwapOrder,
        proof: &[u8],
    ) -> Result<()> {
        self.ensure_active("execute_swap")?;
        let mut pool = self.load_pool(pool_id)?;

        let pending = self
            .store
            .swap(pool_id, caller)?
            .ok_or(Error::NoActiveCommitment)?;

        let now = self.clock.now();
        match self.state_of(&pending, now) {
            SwapState::Committed { ready_at } => {
                warn!(pool = %pool_id, %caller, ready_at, now, "rejected execute: still in reveal period");
                return Err(Error::StillInRevealPeriod { ready_at, now });
            }
            SwapState::Expired { expired_at } => {
                warn!(pool = %pool_id, %caller, expired_at, now, "rejected execute: commitment expired");
                let mut batch = WriteBatch::new();
                batch.delete_swap(*pool_id, *caller);
                self.commit(
                    batch,
                    vec![SwapEvent::SwapExpired {
                        pool_id: *pool_id,
                        committer: *caller,
                        expired_at,
                    }],
                )?;
                return Err(Error::SwapExpired { expired_at });
            }
            SwapState::Executable { .. } | SwapState::Idle => {}
        }

        if order.commitment_hash(pool_id, caller) != pending.commitment_hash {
            warn!(pool = %pool_id, %caller, "rejected execute: reveal does not match commitment");
            return Err(Error::RevealMismatch);
        }

        let fee = self
            .pricing
            .quote(pool_id, order, self.config.swap_fee_bps)
            .inspect_err(|e| warn!(pool = %pool_id, %caller, error = %e, "rejected execute: pricing"))?;
        if fee > order.amount_in {
            return Err(Error::FeeExceedsInput {
                fee,
                amount_in: order.amount_in,
            });
        }

        let proof = RangeProof::from_bytes(proof)?;

        let (input, output) = match order.direction {
            SwapDirection::AToB => (Side::A, Side::B),
            SwapDirection::BToA => (Side::B, Side::A),
        };
        let new_in = *pool.reserve(input) + Commitment::public(order.amount_in - fee);
        let new_out = *pool.reserve(output) - Commitment::public(order.amount_out);

        self.check_range(
            &new_out,
            &proof,
            ProofContext::new(ProofLabel::SwapReserve, *pool_id),
        )?;

        *pool.reserve_mut(input) = new_in;
        *pool.reserve_mut(output) = new_out;
        *pool.fees_mut(input) = *pool.fees(input) + Commitment::public(fee);

        let mut batch = WriteBatch::new();
        batch.put_pool(pool).delete_swap(*pool_id, *caller);
        self.commit(
            batch,
            vec![SwapEvent::SwapExecuted {
                pool_id: *pool_id,
                committer: *caller,
                direction: order.direction,
                amount_in: order.amount_in,
                amount_out: order.amount_out,
                fee,
            }],
        )?;

        info!(
            pool = %pool_id,
            %caller,
            direction = ?order.direction,
            amount_in = order.amount_in,
            amount_out = order.amount_out,
            fee,
            "swap executed"
        );
        Ok(())
    }

    /// where (pool, committer) sits in the commit-reveal cycle right now
    pub fn swap_state(&self, pool_id: &PoolId, committer: &Identity) -> Result<SwapState> {
        self.load_pool(pool_id)?;
        Ok(match self.store.swap(pool_id, committer)? {
            Some(pending) => self.state_of(&pending, self.clock.now()),
            None => SwapState::Idle,
        })
    }

    pub fn pending_swap(
        &self,
        pool_id: &PoolId,
        committer: &Identity,
    ) -> Result<Option<SwapCommitment>> {
        self.load_pool(pool_id)?;
        self.store.swap(pool_id, committer)
    }

    fn state_of(&self, pending: &SwapCommitment, now: u64) -> SwapState {
        pending.state_at(now, self.config.reveal_delay, self.config.reveal_window)
    }
}
