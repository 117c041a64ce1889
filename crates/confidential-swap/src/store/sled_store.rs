//! sled backend, bincode values
//!
//! keys:
//!   pool/<pool id>                 -> Pool
//!   swap/<pool id><committer>      -> SwapCommitment
//!   position/<pool id><provider>   -> LiquidityPosition
//!   access                         -> AccessState

use std::path::Path;

use serde::de::DeserializeOwned;
use tracing::{debug, info};

use super::{Store, WriteBatch, WriteOp};
use crate::access::AccessState;
use crate::error::Result;
use crate::pool::Pool;
use crate::position::LiquidityPosition;
use crate::swap::SwapCommitment;
use crate::types::{Identity, PoolId};

const POOL_PREFIX: &[u8] = b"pool/";
const SWAP_PREFIX: &[u8] = b"swap/";
const POSITION_PREFIX: &[u8] = b"position/";
const ACCESS_KEY: &[u8] = b"access";

pub struct SledStore {
    db: sled::Db,
}

impl SledStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("opening swap store at {}", path.display());
        let db = sled::open(path)?;
        Ok(Self { db })
    }

    /// throwaway database, removed on drop
    pub fn temporary() -> Result<Self> {
        let db = sled::Config::new().temporary(true).open()?;
        Ok(Self { db })
    }

    fn get<T: DeserializeOwned>(&self, key: &[u8]) -> Result<Option<T>> {
        match self.db.get(key)? {
            Some(raw) => Ok(Some(bincode::deserialize(&raw)?)),
            None => Ok(None),
        }
    }
}

fn pool_key(id: &PoolId) -> Vec<u8> {
    let mut key = Vec::with_capacity(POOL_PREFIX.len() + 32);
    key.extend_from_slice(POOL_PREFIX);
    key.extend_from_slice(id.as_bytes());
    key
}

fn pair_key(prefix: &[u8], pool: &PoolId, who: &Identity) -> Vec<u8> {
    let mut key = Vec::with_capacity(prefix.len() + 64);
    key.extend_from_slice(prefix);
    key.extend_from_slice(pool.as_bytes());
    key.extend_from_slice(who.as_bytes());
    key
}

fn swap_key(pool: &PoolId, committer: &Identity) -> Vec<u8> {
    pair_key(SWAP_PREFIX, pool, committer)
}

fn position_key(pool: &PoolId, provider: &Identity) -> Vec<u8> {
    pair_key(POSITION_PREFIX, pool, provider)
}

impl Store for SledStore {
    fn pool(&self, id: &PoolId) -> Result<Option<Pool>> {
        self.get(&pool_key(id))
    }

    fn pools(&self) -> Result<Vec<Pool>> {
        let mut pools = Vec::new();
        for item in self.db.scan_prefix(POOL_PREFIX) {
            let (_, raw) = item?;
            pools.push(bincode::deserialize(&raw)?);
        }
        Ok(pools)
    }

    fn swap(&self, pool: &PoolId, committer: &Identity) -> Result<Option<SwapCommitment>> {
        self.get(&swap_key(pool, committer))
    }

    fn position(&self, pool: &PoolId, provider: &Identity) -> Result<Option<LiquidityPosition>> {
        self.get(&position_key(pool, provider))
    }

    fn access(&self) -> Result<Option<AccessState>> {
        self.get(ACCESS_KEY)
    }

    fn apply(&mut self, batch: WriteBatch) -> Result<()> {
        let mut tx = sled::Batch::default();
        let count = batch.len();

        for op in batch.into_ops() {
            match op {
                WriteOp::PutPool(pool) => {
                    tx.insert(pool_key(&pool.id), bincode::serialize(&pool)?);
                }
                WriteOp::PutSwap(swap) => {
                    tx.insert(
                        swap_key(&swap.pool_id, &swap.committer),
                        bincode::serialize(&swap)?,
                    );
                }
                WriteOp::DeleteSwap { pool, committer } => {
                    tx.remove(swap_key(&pool, &committer));
                }
                WriteOp::PutPosition(position) => {
                    tx.insert(
                        position_key(&position.pool_id, &position.provider),
                        bincode::serialize(&position)?,
                    );
                }
                WriteOp::PutAccess(access) => {
                    tx.insert(ACCESS_KEY, bincode::serialize(&access)?);
                }
            }
        }

        self.db.apply_batch(tx)?;
        self.db.flush()?;
        debug!(ops = count, "applied write batch");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenId;

    #[test]
    fn test_sled_store() {
        let mut store = SledStore::temporary().unwrap();
        super::super::tests::exercise_store(&mut store);
    }

    #[test]
    fn test_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let pool = Pool::new(TokenId([1u8; 32]), TokenId([2u8; 32]));

        {
            let mut store = SledStore::open(dir.path()).unwrap();
            let mut batch = WriteBatch::new();
            batch.put_pool(pool.clone());
            store.apply(batch).unwrap();
        }

        let store = SledStore::open(dir.path()).unwrap();
        assert_eq!(store.pool(&pool.id).unwrap(), Some(pool));
    }
}
