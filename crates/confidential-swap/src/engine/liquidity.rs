//! liquidity ledger
//!
//! reserves only ever change by adding or subtracting commitments. deposits
//! carry one range proof per side and are credited to the depositor's
//! position as well as to the pool. withdrawals carry three per side: one
//! for the withdrawn amount, one for what is left in the pool and one for
//! what is left in the caller's position. neither a reserve nor a position
//! can be driven below zero.

use tracing::{debug, info, warn};

use super::ConfidentialSwap;
use crate::clock::Clock;
use crate::commitment::Commitment;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pool::Side;
use crate::position::LiquidityPosition;
use crate::pricing::Pricing;
use crate::range_proof::{ProofContext, RangeProof, WithdrawalProof};
use crate::store::{Store, WriteBatch};
use crate::types::{Identity, PoolId};

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    /// deposit hidden amounts into both reserves
    ///
    /// `proof_a` / `proof_b` are range proofs for the deposited commitments,
    /// issued under the pool's `LiquidityA` / `LiquidityB` contexts.
    pub fn add_liquidity(
        &mut self,
        caller: &Identity,
        pool_id: &PoolId,
        commitment_a: Commitment,
        commitment_b: Commitment,
        proof_a: &[u8],
        proof_b: &[u8],
    ) -> Result<()> {
        self.ensure_active("add_liquidity")?;
        let mut pool = self.load_pool(pool_id)?;

        let proof_a = RangeProof::from_bytes(proof_a)?;
        let proof_b = RangeProof::from_bytes(proof_b)?;

        self.check_range(
            &commitment_a,
            &proof_a,
            ProofContext::new(Side::A.liquidity_label(), *pool_id),
        )?;
        self.check_range(
            &commitment_b,
            &proof_b,
            ProofContext::new(Side::B.liquidity_label(), *pool_id),
        )?;

        let mut position = self.load_position(pool_id, caller)?;
        position.commitment_a = position.commitment_a + commitment_a;
        position.commitment_b = position.commitment_b + commitment_b;

        pool.commitment_a = pool.commitment_a + commitment_a;
        pool.commitment_b = pool.commitment_b + commitment_b;

        let mut batch = WriteBatch::new();
        batch.put_pool(pool).put_position(position);
        self.commit(
            batch,
            vec![SwapEvent::LiquidityAdded {
                pool_id: *pool_id,
                provider: *caller,
                commitment_a,
                commitment_b,
            }],
        )?;

        info!(pool = %pool_id, %caller, "liquidity added");
        Ok(())
    }

    /// withdraw hidden amounts from both reserves and from the caller's
    /// position
    ///
    /// each proof is a [`WithdrawalProof`] in wire form: the amount proof,
    /// the proof for the reserve left after subtraction, then the proof for
    /// the caller's position left after subtraction.
    pub fn remove_liquidity(
        &mut self,
        caller: &Identity,
        pool_id: &PoolId,
        commitment_a: Commitment,
        commitment_b: Commitment,
        proof_a: &[u8],
        proof_b: &[u8],
    ) -> Result<()> {
        self.ensure_active("remove_liquidity")?;
        let mut pool = self.load_pool(pool_id)?;

        let proof_a = WithdrawalProof::from_bytes(proof_a)?;
        let proof_b = WithdrawalProof::from_bytes(proof_b)?;

        let mut position = self.load_position(pool_id, caller)?;

        let remaining_a = pool.commitment_a - commitment_a;
        let remaining_b = pool.commitment_b - commitment_b;
        let left_a = position.commitment_a - commitment_a;
        let left_b = position.commitment_b - commitment_b;

        self.check_withdrawal(
            pool_id,
            caller,
            Side::A,
            &commitment_a,
            (&remaining_a, &left_a),
            &proof_a,
        )?;
        self.check_withdrawal(
            pool_id,
            caller,
            Side::B,
            &commitment_b,
            (&remaining_b, &left_b),
            &proof_b,
        )?;

        pool.commitment_a = remaining_a;
        pool.commitment_b = remaining_b;
        position.commitment_a = left_a;
        position.commitment_b = left_b;

        let mut batch = WriteBatch::new();
        batch.put_pool(pool).put_position(position);
        self.commit(
            batch,
            vec![SwapEvent::LiquidityRemoved {
                pool_id: *pool_id,
                provider: *caller,
                commitment_a,
                commitment_b,
            }],
        )?;

        info!(pool = %pool_id, %caller, "liquidity removed");
        Ok(())
    }

    /// a provider's share of a pool, empty if they never deposited
    pub fn position(&self, pool_id: &PoolId, provider: &Identity) -> Result<LiquidityPosition> {
        self.load_pool(pool_id)?;
        self.load_position(pool_id, provider)
    }

    fn load_position(&self, pool_id: &PoolId, provider: &Identity) -> Result<LiquidityPosition> {
        Ok(self
            .store
            .position(pool_id, provider)?
            .unwrap_or_else(|| LiquidityPosition::empty(*pool_id, *provider)))
    }

    fn check_withdrawal(
        &self,
        pool_id: &PoolId,
        caller: &Identity,
        side: Side,
        amount: &Commitment,
        (remaining, left): (&Commitment, &Commitment),
        proof: &WithdrawalProof,
    ) -> Result<()> {
        debug!(pool = %pool_id, ?side, "checking withdrawal proofs");
        self.check_range(
            amount,
            &proof.amount,
            ProofContext::new(side.withdraw_label(), *pool_id),
        )?;
        self.check_range(
            remaining,
            &proof.remaining,
            ProofContext::new(side.remaining_label(), *pool_id),
        )?;
        self.check_range(
            left,
            &proof.position,
            ProofContext::new(side.position_label(), *pool_id),
        )
        .map_err(|_| {
            warn!(pool = %pool_id, %caller, ?side, "rejected withdrawal: exceeds position");
            Error::InsufficientLiquidity
        })
    }
}
