//! engine configuration

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::range_proof::RANGE_BITS;
use crate::pricing::FEE_DENOMINATOR;
use crate::{REVEAL_DELAY, REVEAL_WINDOW, SWAP_FEE_BPS};

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// seconds between commit and the earliest execute
    pub reveal_delay: u64,
    /// seconds an order stays executable once the delay has passed
    pub reveal_window: u64,
    /// fee on the swap input, basis points
    pub swap_fee_bps: u16,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            reveal_delay: REVEAL_DELAY,
            reveal_window: REVEAL_WINDOW,
            swap_fee_bps: SWAP_FEE_BPS,
        }
    }
}

impl EngineConfig {
    /// range proof width, fixed
    pub fn range_bits(&self) -> usize {
        RANGE_BITS
    }

    pub fn validate(&self) -> Result<()> {
        if self.reveal_delay == 0 {
            return Err(Error::InvalidConfig("reveal_delay must be positive".into()));
        }
        if self.reveal_window == 0 {
            return Err(Error::InvalidConfig("reveal_window must be positive".into()));
        }
        if u64::from(self.swap_fee_bps) > FEE_DENOMINATOR {
            return Err(Error::InvalidConfig(format!(
                "swap_fee_bps {} above {}",
                self.swap_fee_bps, FEE_DENOMINATOR
            )));
        }
        Ok(())
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| Error::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)
            .map_err(|e| Error::InvalidConfig(format!("{}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.reveal_delay, 300);
        assert_eq!(config.reveal_window, 600);
        assert_eq!(config.swap_fee_bps, 30);
        assert_eq!(config.range_bits(), 64);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = EngineConfig::from_json(r#"{ "reveal_delay": 60 }"#).unwrap();
        assert_eq!(config.reveal_delay, 60);
        assert_eq!(config.reveal_window, 600);
    }

    #[test]
    fn test_zero_delay_rejected() {
        assert!(matches!(
            EngineConfig::from_json(r#"{ "reveal_delay": 0 }"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_fee_above_whole_rejected() {
        assert!(EngineConfig::from_json(r#"{ "swap_fee_bps": 10000 }"#).is_ok());
        assert!(matches!(
            EngineConfig::from_json(r#"{ "swap_fee_bps": 10001 }"#),
            Err(Error::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("engine.json");
        std::fs::write(&path, r#"{ "reveal_window": 120 }"#).unwrap();

        let config = EngineConfig::from_json_file(&path).unwrap();
        assert_eq!(config.reveal_window, 120);

        assert!(EngineConfig::from_json_file(dir.path().join("missing.json")).is_err());
    }
}
