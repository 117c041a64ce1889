//! per-provider share of a pool
//!
//! every deposit is added to the depositor's position as well as to the
//! pool. a withdrawal must prove the position stays non-negative, so one
//! provider cannot pull out liquidity another provider put in.

use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::pool::Side;
use crate::types::{Identity, PoolId};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LiquidityPosition {
    pub pool_id: PoolId,
    pub provider: Identity,
    pub commitment_a: Commitment,
    pub commitment_b: Commitment,
}

impl LiquidityPosition {
    /// nothing deposited yet
    pub fn empty(pool_id: PoolId, provider: Identity) -> Self {
        Self {
            pool_id,
            provider,
            commitment_a: Commitment::zero(),
            commitment_b: Commitment::zero(),
        }
    }

    pub fn share(&self, side: Side) -> &Commitment {
        match side {
            Side::A => &self.commitment_a,
            Side::B => &self.commitment_b,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.commitment_a.is_zero() && self.commitment_b.is_zero()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::scalar::Scalar;

    #[test]
    fn test_empty_position() {
        let pos = LiquidityPosition::empty(PoolId([1u8; 32]), Identity([2u8; 32]));
        assert!(pos.is_empty());
        assert!(pos.share(Side::B).is_zero());
    }

    #[test]
    fn test_bincode_roundtrip() {
        let mut pos = LiquidityPosition::empty(PoolId([1u8; 32]), Identity([2u8; 32]));
        pos.commitment_b = Commitment::commit(8, &Scalar::from(3u64));

        let bytes = bincode::serialize(&pos).unwrap();
        assert_eq!(bincode::deserialize::<LiquidityPosition>(&bytes).unwrap(), pos);
        assert!(!pos.is_empty());
    }
}
