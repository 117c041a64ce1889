//! liquidity pool record

use serde::{Deserialize, Serialize};

use crate::commitment::Commitment;
use crate::range_proof::ProofLabel;
use crate::types::{PoolId, TokenId};

/// one side of a pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Side {
    A,
    B,
}

impl Side {
    pub fn liquidity_label(self) -> ProofLabel {
        match self {
            Side::A => ProofLabel::LiquidityA,
            Side::B => ProofLabel::LiquidityB,
        }
    }

    pub fn withdraw_label(self) -> ProofLabel {
        match self {
            Side::A => ProofLabel::WithdrawA,
            Side::B => ProofLabel::WithdrawB,
        }
    }

    pub fn remaining_label(self) -> ProofLabel {
        match self {
            Side::A => ProofLabel::RemainingA,
            Side::B => ProofLabel::RemainingB,
        }
    }

    pub fn position_label(self) -> ProofLabel {
        match self {
            Side::A => ProofLabel::PositionA,
            Side::B => ProofLabel::PositionB,
        }
    }
}

/// a token pair with hidden aggregate reserves
///
/// swap fees are kept apart from the reserves in `fees_a` / `fees_b` until
/// the fee collector sweeps them.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pool {
    pub id: PoolId,
    pub token_a: TokenId,
    pub token_b: TokenId,
    pub commitment_a: Commitment,
    pub commitment_b: Commitment,
    pub fees_a: Commitment,
    pub fees_b: Commitment,
}

impl Pool {
    /// empty pool, both reserves at the zero commitment
    pub fn new(token_a: TokenId, token_b: TokenId) -> Self {
        Self {
            id: PoolId::derive(&token_a, &token_b),
            token_a,
            token_b,
            commitment_a: Commitment::zero(),
            commitment_b: Commitment::zero(),
            fees_a: Commitment::zero(),
            fees_b: Commitment::zero(),
        }
    }

    pub fn reserve(&self, side: Side) -> &Commitment {
        match side {
            Side::A => &self.commitment_a,
            Side::B => &self.commitment_b,
        }
    }

    pub fn reserve_mut(&mut self, side: Side) -> &mut Commitment {
        match side {
            Side::A => &mut self.commitment_a,
            Side::B => &mut self.commitment_b,
        }
    }

    /// accrued, uncollected swap fees
    pub fn fees(&self, side: Side) -> &Commitment {
        match side {
            Side::A => &self.fees_a,
            Side::B => &self.fees_b,
        }
    }

    pub fn fees_mut(&mut self, side: Side) -> &mut Commitment {
        match side {
            Side::A => &mut self.fees_a,
            Side::B => &mut self.fees_b,
        }
    }

    pub fn token(&self, side: Side) -> &TokenId {
        match side {
            Side::A => &self.token_a,
            Side::B => &self.token_b,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use curve25519_dalek::scalar::Scalar;

    #[test]
    fn test_new_pool_is_empty() {
        let pool = Pool::new(TokenId([1u8; 32]), TokenId([2u8; 32]));
        assert_eq!(pool.id, PoolId::derive(&pool.token_a, &pool.token_b));
        assert!(pool.commitment_a.is_zero());
        assert!(pool.commitment_b.is_zero());
        assert!(pool.fees_a.is_zero() && pool.fees_b.is_zero());
    }

    #[test]
    fn test_side_accessors() {
        let mut pool = Pool::new(TokenId([1u8; 32]), TokenId([2u8; 32]));
        let c = Commitment::commit(9, &Scalar::from(1u64));

        *pool.reserve_mut(Side::B) = c;
        assert_eq!(pool.reserve(Side::B), &c);
        assert!(pool.reserve(Side::A).is_zero());
        assert_eq!(pool.token(Side::A), &TokenId([1u8; 32]));

        *pool.fees_mut(Side::A) = Commitment::public(3);
        assert_eq!(pool.fees(Side::A), &Commitment::public(3));
        assert!(pool.reserve(Side::A).is_zero());
    }

    #[test]
    fn test_bincode_roundtrip() {
        let mut pool = Pool::new(TokenId([1u8; 32]), TokenId([2u8; 32]));
        pool.commitment_a = Commitment::commit(3, &Scalar::from(5u64));

        let bytes = bincode::serialize(&pool).unwrap();
        assert_eq!(bincode::deserialize::<Pool>(&bytes).unwrap(), pool);
    }
}
