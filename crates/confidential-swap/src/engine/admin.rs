//! owner-only controls
//!
//! these stay callable while paused, otherwise the owner could never unpause.

use tracing::{info, warn};

use super::ConfidentialSwap;
use crate::clock::Clock;
use crate::error::{Error, Result};
use crate::events::{EventSink, SwapEvent};
use crate::pricing::Pricing;
use crate::store::Store;
use crate::types::Identity;

impl<S: Store, C: Clock, E: EventSink, P: Pricing> ConfidentialSwap<S, C, E, P> {
    pub fn pause(&mut self, caller: &Identity) -> Result<()> {
        self.set_paused(caller, true, "pause")
    }

    pub fn unpause(&mut self, caller: &Identity) -> Result<()> {
        self.set_paused(caller, false, "unpause")
    }

    fn set_paused(&mut self, caller: &Identity, paused: bool, op: &'static str) -> Result<()> {
        self.ensure_owner(caller, op)?;

        let mut access = self.access.clone();
        access.paused = paused;
        self.commit_access(access, SwapEvent::PauseChanged { paused })?;

        info!(paused, "pause state set");
        Ok(())
    }

    pub fn set_fee_collector(&mut self, caller: &Identity, fee_collector: Identity) -> Result<()> {
        self.ensure_owner(caller, "set_fee_collector")?;
        if fee_collector.is_null() {
            return Err(Error::InvalidAddress);
        }

        let previous = self.access.fee_collector;
        let mut access = self.access.clone();
        access.fee_collector = fee_collector;
        self.commit_access(
            access,
            SwapEvent::FeeCollectorChanged {
                previous,
                current: fee_collector,
            },
        )?;

        info!(%previous, current = %fee_collector, "fee collector updated");
        Ok(())
    }

    /// nominate a new owner, who must call [`Self::accept_ownership`]
    ///
    /// a second nomination replaces the first.
    pub fn transfer_ownership(&mut self, caller: &Identity, new_owner: Identity) -> Result<()> {
        self.ensure_owner(caller, "transfer_ownership")?;
        if new_owner.is_null() {
            return Err(Error::InvalidAddress);
        }

        let owner = self.access.owner;
        let mut access = self.access.clone();
        access.pending_owner = Some(new_owner);
        self.commit_access(
            access,
            SwapEvent::OwnershipTransferStarted {
                owner,
                pending: new_owner,
            },
        )?;

        info!(%owner, pending = %new_owner, "ownership transfer started");
        Ok(())
    }

    pub fn accept_ownership(&mut self, caller: &Identity) -> Result<()> {
        let pending = self.access.pending_owner.ok_or(Error::NoPendingOwner)?;
        if *caller != pending {
            warn!(%caller, "rejected accept_ownership: not the pending owner");
            return Err(Error::Unauthorized);
        }

        let previous = self.access.owner;
        let mut access = self.access.clone();
        access.owner = pending;
        access.pending_owner = None;
        self.commit_access(
            access,
            SwapEvent::OwnershipTransferred {
                previous,
                owner: pending,
            },
        )?;

        info!(%previous, owner = %pending, "ownership transferred");
        Ok(())
    }
}
