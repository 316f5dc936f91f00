//! Path resolution: anchoring configured paths to the project directory.

use crate::types::CimConfig;
use std::path::{Path, PathBuf};

/// Absolute (or project-anchored) locations of every input and output.
///
/// Relative paths in `[paths]` are interpreted against the directory that
/// holds `cim.toml`; absolute paths are kept as written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedPaths {
    /// Directory holding the weight files.
    pub weights_dir: PathBuf,
    /// Root directory of all generated artifacts.
    pub output_dir: PathBuf,
    /// Front netlist fragment, if configured.
    pub front: Option<PathBuf>,
    /// Back netlist fragment, if configured.
    pub back: Option<PathBuf>,
}

impl ResolvedPaths {
    /// Returns the weight file for a region or FC source stem.
    pub fn weight_file(&self, source: &str) -> PathBuf {
        self.weights_dir.join(format!("{source}.json"))
    }
}

/// Resolves `[paths]` against `project_dir`, optionally overriding the output directory.
pub fn resolve_paths(
    config: &CimConfig,
    project_dir: &Path,
    output_override: Option<&Path>,
) -> ResolvedPaths {
    let anchor = |p: &str| {
        let path = Path::new(p);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    };
    ResolvedPaths {
        weights_dir: anchor(&config.paths.weights_dir),
        output_dir: output_override
            .map(Path::to_path_buf)
            .unwrap_or_else(|| anchor(&config.paths.output_dir)),
        front: config.paths.front.as_deref().map(anchor),
        back: config.paths.back.as_deref().map(anchor),
    }
}
