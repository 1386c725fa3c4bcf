//! Framework types recognized by fully-qualified name.
//!
//! These are structurally plain records (a synthetic event has dozens of
//! members) but are reported as opaque schema variants.

use once_cell::sync::Lazy;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tsz_props_schema::PropType;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum KnownSymbol {
    Event,
    ReactElement,
    ReactNode,
}

impl KnownSymbol {
    pub fn prop_type(self) -> PropType {
        match self {
            KnownSymbol::Event => PropType::Event,
            KnownSymbol::ReactElement => PropType::ReactElement,
            KnownSymbol::ReactNode => PropType::ReactNode,
        }
    }
}

const EVENT_TYPES: &[&str] = &[
    "React.SyntheticEvent",
    "React.BaseSyntheticEvent",
    "React.MouseEvent",
    "React.KeyboardEvent",
    "React.ChangeEvent",
    "React.FocusEvent",
    "React.FormEvent",
    "React.PointerEvent",
    "React.TouchEvent",
    "React.WheelEvent",
    "React.DragEvent",
    "React.ClipboardEvent",
    "React.CompositionEvent",
    "React.AnimationEvent",
    "React.TransitionEvent",
    "React.UIEvent",
    "React.InvalidEvent",
];

const ELEMENT_TYPES: &[&str] = &["React.ReactElement", "JSX.Element", "global.JSX.Element"];

const NODE_TYPES: &[&str] = &["React.ReactNode"];

static DEFAULT_KNOWN_SYMBOLS: Lazy<FxHashMap<&'static str, KnownSymbol>> = Lazy::new(|| {
    let mut map = FxHashMap::default();
    for &name in EVENT_TYPES {
        map.insert(name, KnownSymbol::Event);
    }
    for &name in ELEMENT_TYPES {
        map.insert(name, KnownSymbol::ReactElement);
    }
    for &name in NODE_TYPES {
        map.insert(name, KnownSymbol::ReactNode);
    }
    map
});

/// Known-symbol registry: the built-in table plus configured extras.
///
/// Extras shadow built-in entries of the same name. The value is immutable
/// once built and can be shared between passes.
#[derive(Clone, Debug, Default)]
pub struct KnownSymbols {
    extra: FxHashMap<String, KnownSymbol>,
}

impl KnownSymbols {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_extra<I, S>(entries: I) -> Self
    where
        I: IntoIterator<Item = (S, KnownSymbol)>,
        S: Into<String>,
    {
        KnownSymbols {
            extra: entries
                .into_iter()
                .map(|(name, symbol)| (name.into(), symbol))
                .collect(),
        }
    }

    pub fn get(&self, qualified_name: &str) -> Option<KnownSymbol> {
        self.extra
            .get(qualified_name)
            .copied()
            .or_else(|| DEFAULT_KNOWN_SYMBOLS.get(qualified_name).copied())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_entries() {
        let known = KnownSymbols::new();
        assert_eq!(known.get("React.MouseEvent"), Some(KnownSymbol::Event));
        assert_eq!(known.get("JSX.Element"), Some(KnownSymbol::ReactElement));
        assert_eq!(known.get("React.ReactNode"), Some(KnownSymbol::ReactNode));
        assert_eq!(known.get("MouseEvent"), None);
    }

    #[test]
    fn test_extras_shadow_builtins() {
        let known = KnownSymbols::with_extra([
            ("React.ReactNode", KnownSymbol::ReactElement),
            ("Preact.JSX.Element", KnownSymbol::ReactElement),
        ]);
        assert_eq!(known.get("React.ReactNode"), Some(KnownSymbol::ReactElement));
        assert_eq!(known.get("Preact.JSX.Element"), Some(KnownSymbol::ReactElement));
        assert_eq!(known.get("React.FormEvent"), Some(KnownSymbol::Event));
    }

    #[test]
    fn test_wire_names() {
        let parsed: KnownSymbol = serde_json::from_str("\"reactElement\"").unwrap();
        assert_eq!(parsed, KnownSymbol::ReactElement);
        assert_eq!(parsed.prop_type().kind(), "reactElement");
    }
}
