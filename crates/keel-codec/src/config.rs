use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Limits and checks applied while decoding.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecoderConfig {
    /// Maximum nesting of types and values before decoding gives up.
    pub max_depth: usize,
    /// Upper bound on capacity reserved up front from an encoded count.
    /// Counts come from untrusted input; vectors still grow past this.
    pub max_prealloc: usize,
    /// Check leaf-count and key ordering of every decoded meta sequence.
    pub verify_meta_sequences: bool,
    /// Re-hash chunks fetched during traversal and compare with the ref.
    pub verify_chunk_digests: bool,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            max_depth: 512,
            max_prealloc: 4096,
            verify_meta_sequences: false,
            verify_chunk_digests: true,
        }
    }
}

impl DecoderConfig {
    /// Every optional check enabled.
    pub fn strict() -> Self {
        Self {
            verify_meta_sequences: true,
            verify_chunk_digests: true,
            ..Default::default()
        }
    }

    /// Parse from TOML. Missing keys take their default.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        if config.max_depth == 0 {
            return Err(ConfigError::Invalid("max_depth must be at least 1".into()));
        }
        Ok(config)
    }

    pub(crate) fn capacity(&self, count: u32) -> usize {
        (count as usize).min(self.max_prealloc)
    }
}
