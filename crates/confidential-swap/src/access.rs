//! owner, pause flag and fee collector

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::Identity;

/// administrative state guarding every mutating entry point
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessState {
    pub owner: Identity,
    /// nominated by the owner, becomes owner on accept
    pub pending_owner: Option<Identity>,
    pub paused: bool,
    pub fee_collector: Identity,
}

impl AccessState {
    pub fn new(owner: Identity, fee_collector: Identity) -> Result<Self> {
        if owner.is_null() || fee_collector.is_null() {
            return Err(Error::InvalidAddress);
        }
        Ok(Self {
            owner,
            pending_owner: None,
            paused: false,
            fee_collector,
        })
    }

    pub fn ensure_owner(&self, caller: &Identity) -> Result<()> {
        if *caller != self.owner {
            return Err(Error::Unauthorized);
        }
        Ok(())
    }

    pub fn ensure_active(&self) -> Result<()> {
        if self.paused {
            return Err(Error::OperationsPaused);
        }
        Ok(())
    }
}
