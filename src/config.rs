//! `propscan.json` loading and merging with command-line overrides.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tsz_props::{ExtractOptions, FallbackPolicy, KnownSymbol, KnownSymbols};

pub const CONFIG_FILE_NAME: &str = "propscan.json";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error("{}: `markers` must name at least one base component", path.display())]
    NoMarkers { path: PathBuf },
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct PropscanConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fallback: Option<FallbackPolicy>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub markers: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub known_symbols: BTreeMap<String, KnownSymbol>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pretty: Option<bool>,
}

/// Values given on the command line. Anything set here wins over the file.
#[derive(Debug, Clone, Default)]
pub struct CliOverrides {
    pub fallback: Option<FallbackPolicy>,
    /// Replaces the configured markers when non-empty.
    pub markers: Vec<String>,
    pub pretty: bool,
}

impl PropscanConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let source = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: PropscanConfig =
            serde_json::from_str(&source).map_err(|source| ConfigError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        if config.markers.as_ref().is_some_and(Vec::is_empty) {
            return Err(ConfigError::NoMarkers {
                path: path.to_path_buf(),
            });
        }
        Ok(config)
    }

    /// An explicit path must exist. Otherwise `propscan.json` in `cwd` is
    /// used when present, and defaults when not.
    pub fn discover(explicit: Option<&Path>, cwd: &Path) -> Result<Self, ConfigError> {
        if let Some(path) = explicit {
            return Self::load(path);
        }
        let candidate = cwd.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            tracing::debug!(path = %candidate.display(), "using discovered config");
            Self::load(&candidate)
        } else {
            Ok(Self::default())
        }
    }

    pub fn apply(mut self, overrides: &CliOverrides) -> Self {
        if let Some(fallback) = overrides.fallback {
            self.fallback = Some(fallback);
        }
        if !overrides.markers.is_empty() {
            self.markers = Some(overrides.markers.clone());
        }
        if overrides.pretty {
            self.pretty = Some(true);
        }
        self
    }

    pub fn pretty(&self) -> bool {
        self.pretty.unwrap_or(false)
    }

    pub fn resolve(&self) -> ExtractOptions {
        let mut options = ExtractOptions::default()
            .with_fallback(self.fallback.unwrap_or_default())
            .with_known_symbols(KnownSymbols::with_extra(
                self.known_symbols
                    .iter()
                    .map(|(name, symbol)| (name.clone(), *symbol)),
            ));
        if let Some(markers) = &self.markers {
            options = options.with_markers(markers.iter().cloned());
        }
        options
    }
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
