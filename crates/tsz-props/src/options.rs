//! Per-finder extraction settings.

use crate::known_symbols::KnownSymbols;
use serde::{Deserialize, Serialize};

/// What to do with a type no classification rule matches.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackPolicy {
    /// Fail the pass with `ExtractError::Unclassifiable`.
    Strict,
    /// Report the type as `any`.
    #[default]
    Lenient,
}

/// Base component markers recognized when no others are configured.
pub const DEFAULT_MARKERS: &[&str] = &["React.Component", "React.PureComponent"];

#[derive(Clone, Debug)]
pub struct ExtractOptions {
    pub fallback: FallbackPolicy,
    /// Fully-qualified names of the base component types.
    pub markers: Vec<String>,
    pub known_symbols: KnownSymbols,
}

impl Default for ExtractOptions {
    fn default() -> Self {
        ExtractOptions {
            fallback: FallbackPolicy::default(),
            markers: DEFAULT_MARKERS.iter().map(|m| (*m).to_string()).collect(),
            known_symbols: KnownSymbols::default(),
        }
    }
}

impl ExtractOptions {
    pub fn strict() -> Self {
        ExtractOptions {
            fallback: FallbackPolicy::Strict,
            ..Self::default()
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    /// Replace the marker list.
    pub fn with_markers<I, S>(mut self, markers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.markers = markers.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_known_symbols(mut self, known_symbols: KnownSymbols) -> Self {
        self.known_symbols = known_symbols;
        self
    }

    pub fn is_marker(&self, qualified_name: &str) -> bool {
        self.markers.iter().any(|m| m == qualified_name)
    }
}
