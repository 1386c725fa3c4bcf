//! React component props schema extraction.
//!
//! The workspace crates are re-exported here so embedders depend on one
//! package:
//!
//! - [`common`]: string interning and source locations
//! - [`typegraph`]: the interned type graph and its JSON snapshot loader
//! - [`schema`]: the serializable `FinderResult` wire model
//! - [`props`]: component location, classification and the reference table
//!
//! ```no_run
//! use tsz_propscan::props::PropsFinder;
//! use tsz_propscan::typegraph::{GraphSnapshot, TypeInterner};
//!
//! # fn main() -> anyhow::Result<()> {
//! let snapshot = GraphSnapshot::from_json(&std::fs::read_to_string("graph.json")?)?;
//! let graph = TypeInterner::from_snapshot(&snapshot)?;
//! let result = PropsFinder::new(&graph).find_in_files(&graph.files())?;
//! println!("{}", serde_json::to_string(&result)?);
//! # Ok(())
//! # }
//! ```

pub use tsz_common as common;
pub use tsz_props as props;
pub use tsz_props_schema as schema;
pub use tsz_typegraph as typegraph;

// propscan.json discovery and CLI overrides
pub mod config;
pub use config::{CONFIG_FILE_NAME, CliOverrides, ConfigError, PropscanConfig};

// Snapshot discovery and per-file / batch runs
pub mod scan;
pub use scan::{ScanMode, collect_inputs, load_graph, scan_graph, scan_paths};

pub mod tracing_config;
