//! persistence backends
//!
//! reads go straight to the backend. writes are collected into a
//! [`WriteBatch`] and applied in one step once every check has passed, so a
//! rejected call never leaves partial state behind.

mod memory;
mod sled_store;

pub use self::memory::MemoryStore;
pub use self::sled_store::SledStore;

use crate::access::AccessState;
use crate::error::Result;
use crate::pool::Pool;
use crate::position::LiquidityPosition;
use crate::swap::SwapCommitment;
use crate::types::{Identity, PoolId};

/// key-value storage for engine state
pub trait Store {
    fn pool(&self, id: &PoolId) -> Result<Option<Pool>>;

    /// all pools, ordered by id
    fn pools(&self) -> Result<Vec<Pool>>;

    fn swap(&self, pool: &PoolId, committer: &Identity) -> Result<Option<SwapCommitment>>;

    fn position(&self, pool: &PoolId, provider: &Identity) -> Result<Option<LiquidityPosition>>;

    fn access(&self) -> Result<Option<AccessState>>;

    /// apply every write or none
    fn apply(&mut self, batch: WriteBatch) -> Result<()>;
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriteOp {
    PutPool(Pool),
    PutSwap(SwapCommitment),
    DeleteSwap { pool: PoolId, committer: Identity },
    PutPosition(LiquidityPosition),
    PutAccess(AccessState),
}

/// ordered set of writes applied atomically
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteBatch {
    ops: Vec<WriteOp>,
}

impl WriteBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_pool(&mut self, pool: Pool) -> &mut Self {
        self.ops.push(WriteOp::PutPool(pool));
        self
    }

    pub fn put_swap(&mut self, swap: SwapCommitment) -> &mut Self {
        self.ops.push(WriteOp::PutSwap(swap));
        self
    }

    pub fn delete_swap(&mut self, pool: PoolId, committer: Identity) -> &mut Self {
        self.ops.push(WriteOp::DeleteSwap { pool, committer });
        self
    }

    pub fn put_position(&mut self, position: LiquidityPosition) -> &mut Self {
        self.ops.push(WriteOp::PutPosition(position));
        self
    }

    pub fn put_access(&mut self, access: AccessState) -> &mut Self {
        self.ops.push(WriteOp::PutAccess(access));
        self
    }

    pub fn ops(&self) -> &[WriteOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<WriteOp> {
        self.ops
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ops.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commitment::Commitment;
    use crate::swap::SwapHash;
    use crate::types::TokenId;

    /// runs against any backend
    pub(crate) fn exercise_store<S: Store>(store: &mut S) {
        assert!(store.access().unwrap().is_none());
        assert!(store.pools().unwrap().is_empty());

        let owner = Identity([1u8; 32]);
        let pool = Pool::new(TokenId([1u8; 32]), TokenId([2u8; 32]));
        let swap = SwapCommitment {
            pool_id: pool.id,
            committer: owner,
            commitment_hash: SwapHash([5u8; 32]),
            committed_at: 42,
        };

        let mut batch = WriteBatch::new();
        batch
            .put_access(AccessState::new(owner, owner).unwrap())
            .put_pool(pool.clone())
            .put_swap(swap.clone());
        store.apply(batch).unwrap();

        assert_eq!(store.access().unwrap().map(|a| a.owner), Some(owner));
        assert_eq!(store.pool(&pool.id).unwrap(), Some(pool.clone()));
        assert_eq!(store.pools().unwrap(), vec![pool.clone()]);
        assert_eq!(store.swap(&pool.id, &owner).unwrap(), Some(swap));
        assert_eq!(store.swap(&pool.id, &Identity([9u8; 32])).unwrap(), None);

        let mut batch = WriteBatch::new();
        batch.delete_swap(pool.id, owner);
        store.apply(batch).unwrap();
        assert_eq!(store.swap(&pool.id, &owner).unwrap(), None);

        // positions are keyed by (pool, provider) and overwritten in place
        let mut position = LiquidityPosition::empty(pool.id, owner);
        assert_eq!(store.position(&pool.id, &owner).unwrap(), None);
        let mut batch = WriteBatch::new();
        batch.put_position(position.clone());
        store.apply(batch).unwrap();
        position.commitment_a = Commitment::public(5);
        let mut batch = WriteBatch::new();
        batch.put_position(position.clone());
        store.apply(batch).unwrap();
        assert_eq!(store.position(&pool.id, &owner).unwrap(), Some(position));
        assert_eq!(store.position(&pool.id, &Identity([9u8; 32])).unwrap(), None);

        // listing is ordered by id, not insertion
        let other = Pool::new(TokenId([3u8; 32]), TokenId([4u8; 32]));
        let mut batch = WriteBatch::new();
        batch.put_pool(other.clone());
        store.apply(batch).unwrap();

        let ids: Vec<PoolId> = store.pools().unwrap().into_iter().map(|p| p.id).collect();
        let mut expected = vec![pool.id, other.id];
        expected.sort();
        assert_eq!(ids, expected);
    }

    #[test]
    fn test_batch_builder() {
        let mut batch = WriteBatch::new();
        assert!(batch.is_empty());
        batch.delete_swap(PoolId([1u8; 32]), Identity([2u8; 32]));
        assert_eq!(batch.len(), 1);
    }
}
