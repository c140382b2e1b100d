//! VestClaw configuration system.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{Result, VestClawError};

/// Root configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VestClawConfig {
    #[serde(default)]
    pub ledger: LedgerConfig,
    #[serde(default)]
    pub batch: BatchConfig,
}

impl Default for VestClawConfig {
    fn default() -> Self {
        Self {
            ledger: LedgerConfig::default(),
            batch: BatchConfig::default(),
        }
    }
}

/// Ledger deployment settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Deployment epoch (Unix seconds) — the floor for early-unlock checks.
    #[serde(default)]
    pub genesis: u64,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self { genesis: 0 }
    }
}

/// Batch-producer ETL settings (tool knobs, not ledger semantics).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Lock requests per output batch file.
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,
    /// Drop exact-duplicate rows (first occurrence wins).
    #[serde(default = "default_dedupe")]
    pub dedupe: bool,
    /// Base timestamp each row's second-offset is added to.
    #[serde(default = "default_base_timestamp")]
    pub base_timestamp: u64,
    /// Directory batch files are written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: String,
}

fn default_chunk_size() -> usize {
    500
}
fn default_dedupe() -> bool {
    true
}
fn default_base_timestamp() -> u64 {
    0
}
fn default_output_dir() -> String {
    "./output".into()
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            chunk_size: default_chunk_size(),
            dedupe: default_dedupe(),
            base_timestamp: default_base_timestamp(),
            output_dir: default_output_dir(),
        }
    }
}

impl VestClawConfig {
    /// Load config from the default path (~/.vestclaw/config.toml).
    pub fn load() -> Result<Self> {
        let path = Self::default_path();
        if path.exists() {
            Self::load_from(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load config from a specific path.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| VestClawError::Config(format!("Failed to read config: {e}")))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| VestClawError::Config(format!("Failed to parse config: {e}")))?;
        tracing::debug!("Config loaded from {}", path.display());
        Ok(config)
    }

    /// Default config file path.
    pub fn default_path() -> PathBuf {
        Self::home_dir().join("config.toml")
    }

    /// VestClaw home directory (~/.vestclaw).
    pub fn home_dir() -> PathBuf {
        let home = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        home.join(".vestclaw")
    }
}
