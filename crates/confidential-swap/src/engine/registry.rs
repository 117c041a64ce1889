//! pool registry

use tracing::{info, warn};

use super::ConfidentialSwap;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pricing::Pricing;
use crate::pool::Pool;
use crate::store::{Store, WriteBatch};
use crate::types::{Identity, PoolId, TokenId};

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    /// register the ordered pair (token_a, token_b)
    pub fn create_pool(
        &mut self,
        caller: &Identity,
        token_a: TokenId,
        token_b: TokenId,
    ) -> Result<PoolId> {
        self.ensure_active("create_pool")?;

        if token_a.is_null() || token_b.is_null() || token_a == token_b {
            warn!(%caller, %token_a, %token_b, "rejected pool: invalid token pair");
            return Err(Error::InvalidToken);
        }

        let pool = Pool::new(token_a, token_b);
        let pool_id = pool.id;
        if self.store.pool(&pool_id)?.is_some() {
            warn!(pool = %pool_id, "rejected pool: already exists");
            return Err(Error::PoolAlreadyExists(pool_id));
        }

        let mut batch = WriteBatch::new();
        batch.put_pool(pool);
        self.commit(
            batch,
            vec![SwapEvent::PoolCreated {
                pool_id,
                token_a,
                token_b,
            }],
        )?;

        info!(pool = %pool_id, %caller, "created pool");
        Ok(pool_id)
    }

    pub fn get_pool(&self, pool_id: &PoolId) -> Result<Pool> {
        self.load_pool(pool_id)
    }

    pub fn pools(&self) -> Result<Vec<Pool>> {
        self.store.pools()
    }
}
