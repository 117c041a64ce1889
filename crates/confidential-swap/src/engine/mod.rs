//! the swap engine
//!
//! one explicitly constructed instance owns the store, clock, event sink and
//! pricing rule. every entry point takes the caller identity, reads the clock
//! fresh, runs all checks, then writes a single batch and emits its events.
//!
//! ```text
//! guard (paused/owner) -> load -> proof length -> proof validity -> batch -> events
//! ```
//!
//! the one exception is an execute against an expired commitment: the stale
//! entry is cleared and the call still fails with `SwapExpired`.

mod admin;
mod coordinator;
mod fees;
mod liquidity;
mod registry;

use tracing::{info, warn};

use crate::access::AccessState;
use crate::clock::Clock;
use crate::commitment::Commitment;
use crate::config::EngineConfig;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pool::Pool;
use crate::pricing::{FlatFee, Pricing};
use crate::range_proof::{ProofContext, RangeProof, RangeVerifier};
use crate::store::{Store, WriteBatch};
use crate::types::{Identity, PoolId};

pub struct ConfidentialSwap<S: Store, C: Clock, E: EventSink, P: Pricing = FlatFee> {
    store: S,
    clock: C,
    events: E,
    pricing: P,
    config: EngineConfig,
    verifier: RangeVerifier,
    /// mirror of the persisted access record, the engine is its only writer
    access: AccessState,
}

impl<S: Store, C: Clock, E: EventSink> ConfidentialSwap<S, C, E> {
    /// first start: write the access record into an empty store
    pub fn initialize(
        mut store: S,
        clock: C,
        events: E,
        config: EngineConfig,
        owner: Identity,
        fee_collector: Identity,
    ) -> Result<Self> {
        config.validate()?;
        if store.access()?.is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let access = AccessState::new(owner, fee_collector)?;
        let mut batch = WriteBatch::new();
        batch.put_access(access.clone());
        store.apply(batch)?;

        info!(%owner, %fee_collector, "initialized confidential swap");

        Ok(Self {
            store,
            clock,
            events,
            pricing: FlatFee,
            config,
            verifier: RangeVerifier::new(),
            access,
        })
    }

    /// resume from a store written by `initialize`
    pub fn open(store: S, clock: C, events: E, config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let access = store.access()?.ok_or(Error::NotInitialized)?;

        info!(
            owner = %access.owner,
            paused = access.paused,
            "opened confidential swap"
        );

        Ok(Self {
            store,
            clock,
            events,
            pricing: FlatFee,
            config,
            verifier: RangeVerifier::new(),
            access,
        })
    }

    /// swap in a different pricing rule
    pub fn with_pricing<Q: Pricing>(self, pricing: Q) -> ConfidentialSwap<S, C, E, Q> {
        ConfidentialSwap {
            store: self.store,
            clock: self.clock,
            events: self.events,
            pricing,
            config: self.config,
            verifier: self.verifier,
            access: self.access,
        }
    }
}

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// owner, pending owner, pause flag, fee collector
    pub fn access(&self) -> &AccessState {
        &self.access
    }

    pub fn is_paused(&self) -> bool {
        self.access.paused
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn events(&self) -> &E {
        &self.events
    }

    pub fn pricing(&self) -> &P {
        &self.pricing
    }

    pub fn into_store(self) -> S {
        self.store
    }

    fn ensure_active(&self, op: &'static str) -> Result<()> {
        self.access.ensure_active().inspect_err(|_| {
            warn!(op, "rejected: operations paused");
        })
    }

    fn ensure_owner(&self, caller: &Identity, op: &'static str) -> Result<()> {
        self.access.ensure_owner(caller).inspect_err(|_| {
            warn!(op, %caller, "rejected: caller is not the owner");
        })
    }

    fn load_pool(&self, id: &PoolId) -> Result<Pool> {
        self.store.pool(id)?.ok_or(Error::NotFound(*id))
    }

    fn check_range(
        &self,
        commitment: &Commitment,
        proof: &RangeProof,
        context: ProofContext,
    ) -> Result<()> {
        if self
            .verifier
            .verify_range(commitment, proof, &context.to_bytes())
        {
            Ok(())
        } else {
            warn!(pool = %context.pool, label = ?context.label, "range proof rejected");
            Err(Error::InvalidRangeProof)
        }
    }

    /// persist, then publish
    fn commit(&mut self, batch: WriteBatch, events: Vec<SwapEvent>) -> Result<()> {
        self.store.apply(batch)?;
        for event in events {
            self.events.emit(event);
        }
        Ok(())
    }

    fn commit_access(&mut self, access: AccessState, event: SwapEvent) -> Result<()> {
        let mut batch = WriteBatch::new();
        batch.put_access(access.clone());
        self.commit(batch, vec![event])?;
        self.access = access;
        Ok(())
    }
}
