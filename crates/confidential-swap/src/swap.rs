//! commit-reveal swap records
//!
//! a trader first publishes `H(order)`, then reveals the order once the
//! reveal delay has passed. the hash covers the pool and committer, so a
//! commitment cannot be lifted into another pool or by another account.
//!
//! ```text
//!   commit ──► Committed ──(delay)──► Executable ──(window)──► Expired
//!                                         │
//!                                  execute│
//!                                         ▼
//!                                       Idle
//! ```

use core::fmt;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use sha2::{Digest, Sha256};

use crate::types::{bytes32, Identity, PoolId, Timestamp};
use crate::SWAP_ORDER_DOMAIN;

/// which way value flows through the pool
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SwapDirection {
    /// pay token A, receive token B
    AToB,
    /// pay token B, receive token A
    BToA,
}

impl SwapDirection {
    fn tag(self) -> u8 {
        match self {
            SwapDirection::AToB => 0,
            SwapDirection::BToA => 1,
        }
    }
}

/// 32-byte commitment to a swap order
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SwapHash(pub [u8; 32]);

impl SwapHash {
    pub fn is_empty(&self) -> bool {
        self.0 == [0u8; 32]
    }

    pub fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }
}

impl fmt::Debug for SwapHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SwapHash({}..)", &hex::encode(self.0)[..8])
    }
}

impl fmt::Display for SwapHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode(self.0))
    }
}

impl Serialize for SwapHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        bytes32::serialize(&self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for SwapHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        bytes32::deserialize(deserializer).map(Self)
    }
}

/// the order revealed at execution
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapOrder {
    pub direction: SwapDirection,
    pub amount_in: u64,
    pub amount_out: u64,
    /// keeps small orders from being brute forced out of the hash
    pub salt: [u8; 32],
}

impl SwapOrder {
    /// sha256(domain || pool || committer || direction || in || out || salt)
    pub fn commitment_hash(&self, pool: &PoolId, committer: &Identity) -> SwapHash {
        let mut hasher = Sha256::new();
        hasher.update(SWAP_ORDER_DOMAIN);
        hasher.update(pool.as_bytes());
        hasher.update(committer.as_bytes());
        hasher.update([self.direction.tag()]);
        hasher.update(self.amount_in.to_le_bytes());
        hasher.update(self.amount_out.to_le_bytes());
        hasher.update(self.salt);
        SwapHash(hasher.finalize().into())
    }
}

/// pending commitment for one (pool, committer)
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapCommitment {
    pub pool_id: PoolId,
    pub committer: Identity,
    pub commitment_hash: SwapHash,
    pub committed_at: Timestamp,
}

impl SwapCommitment {
    /// earliest execution time
    pub fn ready_at(&self, reveal_delay: u64) -> Timestamp {
        self.committed_at.saturating_add(reveal_delay)
    }

    /// first instant at which execution is no longer allowed
    pub fn expires_at(&self, reveal_delay: u64, reveal_window: u64) -> Timestamp {
        self.ready_at(reveal_delay).saturating_add(reveal_window)
    }

    pub fn state_at(&self, now: Timestamp, reveal_delay: u64, reveal_window: u64) -> SwapState {
        let ready_at = self.ready_at(reveal_delay);
        let expires_at = self.expires_at(reveal_delay, reveal_window);
        if now < ready_at {
            SwapState::Committed { ready_at }
        } else if now < expires_at {
            SwapState::Executable { expires_at }
        } else {
            SwapState::Expired { expired_at: expires_at }
        }
    }
}

/// coordinator state for one (pool, committer)
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SwapState {
    Idle,
    Committed { ready_at: Timestamp },
    Executable { expires_at: Timestamp },
    Expired { expired_at: Timestamp },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order() -> SwapOrder {
        SwapOrder {
            direction: SwapDirection::AToB,
            amount_in: 100,
            amount_out: 90,
            salt: [7u8; 32],
        }
    }

    #[test]
    fn test_hash_binds_every_field() {
        let pool = PoolId([1u8; 32]);
        let alice = Identity([2u8; 32]);
        let h = order().commitment_hash(&pool, &alice);

        assert_eq!(h, order().commitment_hash(&pool, &alice));
        assert_ne!(h, order().commitment_hash(&PoolId([3u8; 32]), &alice));
        assert_ne!(h, order().commitment_hash(&pool, &Identity([3u8; 32])));

        let mut o = order();
        o.direction = SwapDirection::BToA;
        assert_ne!(h, o.commitment_hash(&pool, &alice));

        let mut o = order();
        o.amount_out = 91;
        assert_ne!(h, o.commitment_hash(&pool, &alice));

        let mut o = order();
        o.salt[0] = 0;
        assert_ne!(h, o.commitment_hash(&pool, &alice));
        assert!(!h.is_empty());
    }

    #[test]
    fn test_state_boundaries() {
        let c = SwapCommitment {
            pool_id: PoolId([1u8; 32]),
            committer: Identity([2u8; 32]),
            commitment_hash: SwapHash([9u8; 32]),
            committed_at: 1_000,
        };

        assert_eq!(c.state_at(1_000, 300, 600), SwapState::Committed { ready_at: 1_300 });
        assert_eq!(c.state_at(1_299, 300, 600), SwapState::Committed { ready_at: 1_300 });
        assert_eq!(c.state_at(1_300, 300, 600), SwapState::Executable { expires_at: 1_900 });
        assert_eq!(c.state_at(1_899, 300, 600), SwapState::Executable { expires_at: 1_900 });
        assert_eq!(c.state_at(1_900, 300, 600), SwapState::Expired { expired_at: 1_900 });

        // clock went backwards
        assert_eq!(c.state_at(10, 300, 600), SwapState::Committed { ready_at: 1_300 });
    }
}
