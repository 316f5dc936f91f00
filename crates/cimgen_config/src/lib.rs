//! Parsing and validation of `cim.toml` layout configuration files.
//!
//! This crate reads the layout descriptor table (one `[[region]]` per
//! convolutional-layer block plus the reserved `[fc]` region), the array grid,
//! path settings, and device parameters, producing a strongly-typed
//! [`CimConfig`].

#![warn(missing_docs)]

pub mod error;
pub mod loader;
pub mod resolve;
pub mod types;

pub use error::ConfigError;
pub use loader::{load_config, load_config_file, load_config_from_str, CONFIG_FILE_NAME};
pub use resolve::{resolve_paths, ResolvedPaths};
pub use types::*;
