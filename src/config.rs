//! Configuration for brevity

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::codebook::{Preset, MAX_COUNT, MIN_MATCH_LEN};
use crate::error::CodecError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CodecConfig {
    /// Inputs longer than this are rejected before encoding.
    pub max_input_len: usize,
    /// Ceiling on decoded output.
    pub max_output_len: usize,
    /// Enables back-references to earlier substrings.
    pub match_repeats: bool,
    /// How far back (in bytes) the back-reference search looks.
    pub search_window: usize,
    /// Selector codes and frequent sequences. Both sides must agree on it.
    pub preset: Preset,
}

impl Default for CodecConfig {
    fn default() -> Self {
        Self {
            max_input_len: 64 * 1024,
            max_output_len: 1024 * 1024, // 1 MiB
            match_repeats: true,
            search_window: 4096,
            preset: Preset::Default,
        }
    }
}

impl CodecConfig {
    pub fn from_json(json: &str) -> Result<Self, CodecError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| CodecError::SerializationError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CodecError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }

    pub fn validate(&self) -> Result<(), CodecError> {
        if self.max_input_len == 0 {
            return Err(CodecError::Config("max_input_len must be non-zero".into()));
        }
        if self.max_output_len == 0 {
            return Err(CodecError::Config("max_output_len must be non-zero".into()));
        }
        // distances are coded as counts offset by the minimum match length
        if self.search_window > MAX_COUNT + MIN_MATCH_LEN {
            return Err(CodecError::Config(format!(
                "search_window {} exceeds the codable distance {}",
                self.search_window,
                MAX_COUNT + MIN_MATCH_LEN
            )));
        }
        Ok(())
    }
}
