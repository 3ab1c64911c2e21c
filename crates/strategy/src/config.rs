use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use common::{Result, UserCondition};

use crate::composite::ScoringConfig;

/// Engine config file (TOML).
///
/// Example `config/engine.toml`:
/// ```toml
/// [scoring]
/// min_score = 8
/// min_margin = 4
///
/// [[condition]]
/// field = "rsi"
/// operator = "<"
/// value = 30
/// signal = "RSI Oversold"
/// ```
///
/// `[[condition]]` entries are applied to scan requests that carry no
/// conditions of their own.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct EngineFileConfig {
    #[serde(default)]
    pub scoring: ScoringConfig,
    #[serde(rename = "condition", default)]
    pub conditions: Vec<UserCondition>,
}

impl EngineFileConfig {
    pub fn parse(content: &str) -> Result<Self> {
        Ok(toml::from_str(content)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    /// Like [`load`](Self::load), but a missing file means built-in defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "Engine config not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }
}
