//! swap fee balances

use tracing::{info, warn};

use super::ConfidentialSwap;
use crate::clock::Clock;
use crate::commitment::Commitment;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pricing::Pricing;
use crate::store::{Store, WriteBatch};
use crate::types::{Identity, PoolId};

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    /// sweep a pool's accrued fees to the fee collector
    ///
    /// returns the (A, B) fee commitments that were cleared. fees enter with
    /// zero blinding, so the collector opens them from the `fee` fields of the
    /// `SwapExecuted` events.
    pub fn collect_fees(
        &mut self,
        caller: &Identity,
        pool_id: &PoolId,
    ) -> Result<(Commitment, Commitment)> {
        self.ensure_active("collect_fees")?;
        if *caller != self.access.fee_collector {
            warn!(pool = %pool_id, %caller, "rejected fee collection: not the fee collector");
            return Err(Error::Unauthorized);
        }
        let mut pool = self.load_pool(pool_id)?;

        let fees_a = std::mem::take(&mut pool.fees_a);
        let fees_b = std::mem::take(&mut pool.fees_b);

        let mut batch = WriteBatch::new();
        batch.put_pool(pool);
        self.commit(
            batch,
            vec![SwapEvent::FeesCollected {
                pool_id: *pool_id,
                collector: *caller,
                fees_a,
                fees_b,
            }],
        )?;

        info!(pool = %pool_id, collector = %caller, %fees_a, %fees_b, "fees collected");
        Ok((fees_a, fees_b))
    }
}
