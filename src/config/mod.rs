//! Project configuration from ir2graph.toml.

mod manifest;

pub use manifest::{Manifest, OutputFormat, Overrides, Settings, MANIFEST_FILE};
