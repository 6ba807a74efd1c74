//! Configuration of the reference accelerator, loadable from TOML.
//!
//! ```toml
//! row_alignment = 8
//! min_log2 = 1
//! max_log2 = 22
//! memory_budget_bytes = 268435456
//! max_channels = 4
//! ```

use std::path::Path;

use crate::AcceleratorError;

/// Reference accelerator settings.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CpuRefConfig {
    /// Rows start on multiples of this many samples. Rows shorter than the
    /// alignment are padded, so `step > len` for small transforms.
    #[serde(default = "default_row_alignment")]
    pub row_alignment: usize,
    /// Smallest supported exponent.
    #[serde(default = "default_min_log2")]
    pub min_log2: u32,
    /// Largest supported exponent.
    #[serde(default = "default_max_log2")]
    pub max_log2: u32,
    /// Bytes available to live engines and transposes.
    #[serde(default = "default_memory_budget_bytes")]
    pub memory_budget_bytes: usize,
    /// Channels that may be open at the same time.
    #[serde(default = "default_max_channels")]
    pub max_channels: usize,
}

fn default_row_alignment() -> usize {
    8
}

fn default_min_log2() -> u32 {
    1
}

fn default_max_log2() -> u32 {
    22
}

fn default_memory_budget_bytes() -> usize {
    256 << 20
}

fn default_max_channels() -> usize {
    64
}

impl Default for CpuRefConfig {
    fn default() -> Self {
        Self {
            row_alignment: default_row_alignment(),
            min_log2: default_min_log2(),
            max_log2: default_max_log2(),
            memory_budget_bytes: default_memory_budget_bytes(),
            max_channels: default_max_channels(),
        }
    }
}

/// Errors raised while loading a [CpuRefConfig].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("TOML serialise error: {0}")]
    Serialise(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl CpuRefConfig {
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content: String = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.row_alignment == 0 {
            return Err(ConfigError::Invalid("row_alignment must be non-zero".into()));
        }
        if self.min_log2 > self.max_log2 {
            return Err(ConfigError::Invalid(format!(
                "min_log2={} > max_log2={}",
                self.min_log2, self.max_log2
            )));
        }
        if self.max_log2 >= usize::BITS - 4 {
            return Err(ConfigError::Invalid(format!("max_log2={} too large", self.max_log2)));
        }
        Ok(())
    }

    /// Row stride for transforms of length `len`.
    pub fn step_for(&self, len: usize) -> usize {
        len.next_multiple_of(self.row_alignment)
    }

    pub(crate) fn check_log2(&self, log2_len: u32) -> Result<(), AcceleratorError> {
        if log2_len < self.min_log2 || log2_len > self.max_log2 {
            return Err(AcceleratorError::UnsupportedShape {
                log2_len,
                min: self.min_log2,
                max: self.max_log2,
            });
        }
        Ok(())
    }
}
