//! # VM Configuration
//!
//! One value, deserialized once and threaded through constructors. Every
//! node on a network must agree on `builder.target_blocks_per_second`:
//! block windows are only comparable under a shared target.

use crate::error::{Result, VmError};
use serde::{Deserialize, Serialize};
use shared_types::Timestamp;
use vmsdk_builder::BuilderConfig;
use vmsdk_chain::ChainConfig;

/// Complete VM configuration
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(default)]
pub struct VmConfig {
    /// Build scheduling
    pub builder: BuilderConfig,

    /// Block store sizing and verification tolerance
    pub chain: ChainConfig,

    /// Timestamp of the genesis block created on first start
    pub genesis_timestamp: Timestamp,
}

impl VmConfig {
    /// Parse a JSON document; missing fields take their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self =
            serde_json::from_str(json).map_err(|e| VmError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject zero capacities, a zero target and a zero check interval
    pub fn validate(&self) -> Result<()> {
        self.builder
            .validate()
            .map_err(|e| VmError::InvalidConfig(e.to_string()))?;
        self.chain
            .validate()
            .map_err(|e| VmError::InvalidConfig(e.to_string()))?;
        if self.genesis_timestamp < 0 {
            return Err(VmError::InvalidConfig(
                "genesis_timestamp must be >= 0".into(),
            ));
        }
        Ok(())
    }
}
