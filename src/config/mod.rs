use serde::{Deserialize, Serialize};

use crate::art::Params;
use crate::artmap::MapParams;
use crate::error::{Error, Result};
use crate::memory::{MaskingParams, WorkingMemoryParams};
use crate::shunting::ShuntingParams;
use crate::transmitter::TransmitterParams;

/// Every engine variant's tuning, aggregated into one round-trippable
/// record. `base` applies to any ART/ARTMAP engine; the rest are
/// present only for deployments that also run the temporal modules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub base: Params,
    pub artmap: Option<MapParams>,
    pub shunting: Option<ShuntingParams>,
    pub transmitter: Option<TransmitterParams>,
    pub working_memory: Option<WorkingMemoryParams>,
    pub masking: Option<MaskingParams>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            base: Params::default(),
            artmap: None,
            shunting: None,
            transmitter: None,
            working_memory: None,
            masking: None,
        }
    }
}

impl EngineConfig {
    /// Validates every present sub-record, reporting the first failure.
    pub fn validate(&self) -> Result<()> {
        self.base.validate()?;
        if let Some(p) = &self.artmap {
            p.validate()?;
        }
        if let Some(p) = &self.shunting {
            p.validate()?;
        }
        if let Some(p) = &self.transmitter {
            p.validate()?;
        }
        if let Some(p) = &self.working_memory {
            p.validate()?;
        }
        if let Some(p) = &self.masking {
            p.validate()?;
        }
        Ok(())
    }
}

#[cfg(feature = "config")]
impl EngineConfig {
    pub fn from_toml_str(s: &str) -> Result<Self> {
        let config: Self =
            toml::from_str(s).map_err(|e| Error::InvalidParameters(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_toml_file(path: &std::path::Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::Internal(Box::new(e)))?;
        Self::from_toml_str(&content)
    }
}
