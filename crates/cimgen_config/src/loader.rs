//! Configuration file loading and validation.

use crate::error::ConfigError;
use crate::types::{CimConfig, LayoutRegion};
use cimgen_common::{LINES, MAX_ARRAYS};
use std::path::Path;

/// Name of the layout configuration file looked up in a project directory.
pub const CONFIG_FILE_NAME: &str = "cim.toml";

/// Loads and validates a `cim.toml` configuration from a project directory.
///
/// Reads `<project_dir>/cim.toml`, parses it, and validates the layout table.
pub fn load_config(project_dir: &Path) -> Result<CimConfig, ConfigError> {
    load_config_file(&project_dir.join(CONFIG_FILE_NAME))
}

/// Loads and validates a configuration file of any name.
pub fn load_config_file(config_path: &Path) -> Result<CimConfig, ConfigError> {
    let content = std::fs::read_to_string(config_path)?;
    load_config_from_str(&content)
}

/// Parses and validates a `cim.toml` configuration from a string.
///
/// Useful for testing without filesystem dependencies.
pub fn load_config_from_str(content: &str) -> Result<CimConfig, ConfigError> {
    let config: CimConfig =
        toml::from_str(content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
    validate_config(&config)?;
    Ok(config)
}

/// Validates the grid and every region descriptor against the floorplan.
///
/// Overlap between regions is checked by the remapper, which knows the
/// ownership of every physical line.
fn validate_config(config: &CimConfig) -> Result<(), ConfigError> {
    let grid = &config.geometry;
    if grid.array_rows == 0 || grid.array_cols == 0 {
        return Err(ConfigError::ValidationError(format!(
            "array grid {}x{} is empty",
            grid.array_rows, grid.array_cols
        )));
    }
    if grid.checked_array_count().is_none() {
        return Err(ConfigError::ValidationError(format!(
            "array grid {}x{} exceeds the limit of {MAX_ARRAYS} arrays",
            grid.array_rows, grid.array_cols
        )));
    }
    for (index, region) in config.regions.iter().enumerate() {
        validate_region(index, region, config)?;
    }
    if let Some(fc) = &config.fc {
        if fc.source.is_empty() {
            return Err(ConfigError::MissingField("fc.source".to_string()));
        }
        let end = fc.base_line.saturating_add(fc.line_count);
        if end > LINES {
            return Err(ConfigError::ValidationError(format!(
                "fc lines {}..{end} exceed the {LINES} lines of an array",
                fc.base_line
            )));
        }
    }
    Ok(())
}

fn validate_region(
    index: usize,
    region: &LayoutRegion,
    config: &CimConfig,
) -> Result<(), ConfigError> {
    let invalid = |reason: String| ConfigError::InvalidRegion { index, reason };
    if region.source.is_empty() {
        return Err(ConfigError::MissingField(format!("region[{index}].source")));
    }
    if region.row_end < region.row_begin {
        return Err(invalid(format!(
            "row_end {} < row_begin {}",
            region.row_end, region.row_begin
        )));
    }
    if region.col_end < region.col_begin {
        return Err(invalid(format!(
            "col_end {} < col_begin {}",
            region.col_end, region.col_begin
        )));
    }
    if region.row_end >= config.geometry.array_rows {
        return Err(invalid(format!(
            "row_end {} is outside the {}-row array grid",
            region.row_end, config.geometry.array_rows
        )));
    }
    if region.col_end >= config.geometry.array_cols {
        return Err(invalid(format!(
            "col_end {} is outside the {}-column array grid",
            region.col_end, config.geometry.array_cols
        )));
    }
    let end = region.base_line.saturating_add(region.line_count);
    if end > LINES {
        return Err(invalid(format!(
            "lines {}..{end} exceed the {LINES} lines of an array",
            region.base_line
        )));
    }
    Ok(())
}
