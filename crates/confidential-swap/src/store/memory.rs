//! in-memory backend

use std::collections::BTreeMap;

use super::{Store, WriteBatch, WriteOp};
use crate::access::AccessState;
use crate::error::Result;
use crate::pool::Pool;
use crate::position::LiquidityPosition;
use crate::swap::SwapCommitment;
use crate::types::{Identity, PoolId};

#[derive(Clone, Debug, Default)]
pub struct MemoryStore {
    pools: BTreeMap<PoolId, Pool>,
    swaps: BTreeMap<(PoolId, Identity), SwapCommitment>,
    positions: BTreeMap<(PoolId, Identity), LiquidityPosition>,
    access: Option<AccessState>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Store for MemoryStore {
    fn pool(&self, id: &PoolId) -> Result<Option<Pool>> {
        Ok(self.pools.get(id).cloned())
    }

    fn pools(&self) -> Result<Vec<Pool>> {
        Ok(self.pools.values().cloned().collect())
    }

    fn swap(&self, pool: &PoolId, committer: &Identity) -> Result<Option<SwapCommitment>> {
        Ok(self.swaps.get(&(*pool, *committer)).cloned())
    }

    fn position(&self, pool: &PoolId, provider: &Identity) -> Result<Option<LiquidityPosition>> {
        Ok(self.positions.get(&(*pool, *provider)).cloned())
    }

    fn access(&self) -> Result<Option<AccessState>> {
        Ok(self.access.clone())
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        for op in batch.into_ops() {
            match op {
                WriteOp::PutPool(pool) => {
                    self.pools.insert(pool.id, pool);
                }
                WriteOp::PutSwap(swap) => {
                    self.swaps.insert((swap.pool_id, swap.committer), swap);
                }
                WriteOp::DeleteSwap { pool, committer } => {
                    self.swaps.remove(&(pool, committer));
                }
                WriteOp::PutPosition(position) => {
                    self.positions
                        .insert((position.pool_id, position.provider), position);
                }
                WriteOp::PutAccess(access) => {
                    self.access = Some(access);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_store() {
        super::super::tests::exercise_store(&mut MemoryStore::new());
    }
}
