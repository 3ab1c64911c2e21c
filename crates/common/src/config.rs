use crate::{Error, Result};

/// Minimum number of price bars the indicator collaborator needs before a
/// snapshot is meaningful. Below this the engine returns an empty result.
pub const DEFAULT_MIN_HISTORY_BARS: usize = 50;

/// Worker count for batch scans.
pub const DEFAULT_SCAN_WORKERS: usize = 8;

/// Process configuration loaded from environment variables at startup.
/// Every variable is optional; malformed values are reported, not ignored.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Path to the TOML engine config (scoring thresholds, default conditions).
    pub engine_config_path: String,
    pub min_history_bars: usize,
    pub scan_workers: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            engine_config_path: "config/engine.toml".to_string(),
            min_history_bars: DEFAULT_MIN_HISTORY_BARS,
            scan_workers: DEFAULT_SCAN_WORKERS,
        }
    }
}

impl Config {
    /// Load configuration from the environment. Loads `.env` if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv(); // ignore error if .env not present
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let scan_workers = parse_env(&lookup, "SCAN_WORKERS")?.unwrap_or(defaults.scan_workers);
        if scan_workers == 0 {
            return Err(Error::Config("SCAN_WORKERS must be at least 1".into()));
        }

        Ok(Config {
            engine_config_path: lookup("ENGINE_CONFIG_PATH")
                .unwrap_or(defaults.engine_config_path),
            min_history_bars: parse_env(&lookup, "MIN_HISTORY_BARS")?
                .unwrap_or(defaults.min_history_bars),
            scan_workers,
        })
    }
}

fn parse_env<F>(lookup: &F, key: &str) -> Result<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw.trim().parse::<usize>().map(Some).map_err(|_| {
            Error::Config(format!("{key} must be a non-negative integer, got: '{raw}'"))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn empty_environment_yields_defaults() {
        let cfg = Config::from_lookup(lookup_from(&[])).unwrap();
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.min_history_bars, 50);
        assert_eq!(cfg.scan_workers, 8);
    }

    #[test]
    fn overrides_are_applied() {
        let cfg = Config::from_lookup(lookup_from(&[
            ("ENGINE_CONFIG_PATH", "/etc/signalscan.toml"),
            ("MIN_HISTORY_BARS", " 30 "),
            ("SCAN_WORKERS", "2"),
        ]))
        .unwrap();
        assert_eq!(cfg.engine_config_path, "/etc/signalscan.toml");
        assert_eq!(cfg.min_history_bars, 30);
        assert_eq!(cfg.scan_workers, 2);
    }

    #[test]
    fn malformed_number_is_a_config_error() {
        let err = Config::from_lookup(lookup_from(&[("MIN_HISTORY_BARS", "fifty")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("MIN_HISTORY_BARS")));
    }

    #[test]
    fn zero_workers_rejected() {
        let err = Config::from_lookup(lookup_from(&[("SCAN_WORKERS", "0")])).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
