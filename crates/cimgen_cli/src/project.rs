//! Shared helpers for CLI commands: project root resolution and run options.

use std::path::{Path, PathBuf};

use cimgen_config::CONFIG_FILE_NAME;
use cimgen_pipeline::{Project, RunOptions};

use crate::GlobalArgs;

/// Walks up from `start` looking for the nearest directory containing `cim.toml`.
pub fn find_project_root(start: &Path) -> Result<PathBuf, Box<dyn std::error::Error>> {
    let mut current = start.to_path_buf();
    loop {
        if current.join(CONFIG_FILE_NAME).exists() {
            return Ok(current);
        }
        if !current.pop() {
            return Err(format!(
                "could not find {CONFIG_FILE_NAME} in {} or any parent directory",
                start.display()
            )
            .into());
        }
    }
}

/// Resolves the project root directory from global CLI args.
///
/// If `--config` names a directory, uses it; a `--config` file is loaded
/// directly by [`open_project`] and never reaches here. Otherwise walks up
/// from the current directory looking for `cim.toml`.
pub fn resolve_project_root(global: &GlobalArgs) -> Result<PathBuf, Box<dyn std::error::Error>> {
    if let Some(ref config_path) = global.config {
        let p = PathBuf::from(config_path);
        if p.is_dir() {
            return Ok(p);
        }
        return Err(format!("config path {} does not exist", p.display()).into());
    }
    find_project_root(&std::env::current_dir()?)
}

/// Loads the project selected by the global args, with an optional output
/// directory override.
///
/// A `--config` file is loaded as given, whatever its name, with relative
/// paths anchored at its directory.
pub fn open_project(
    global: &GlobalArgs,
    output: Option<&str>,
) -> Result<Project, Box<dyn std::error::Error>> {
    let output = output.map(PathBuf::from);
    if let Some(config_file) = global.config.as_deref().map(Path::new).filter(|p| p.is_file()) {
        let project = Project::open_file(config_file, output.as_deref())?;
        tracing::debug!(config = %config_file.display(), "loaded project");
        return Ok(project);
    }
    let root = resolve_project_root(global)?;
    let project = Project::open(&root, output.as_deref())?;
    tracing::debug!(root = %root.display(), "loaded project");
    Ok(project)
}

/// Pipeline options derived from the global args.
pub fn run_options(global: &GlobalArgs) -> RunOptions {
    RunOptions { jobs: global.jobs }
}

/// Prints the grid summary line shared by every command.
pub fn print_grid(project: &Project, global: &GlobalArgs) {
    if !global.quiet {
        let geometry = project.config.geometry;
        eprintln!(
            "      Grid {} × {} ({} arrays)",
            geometry.array_rows,
            geometry.array_cols,
            geometry.array_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn global(config: Option<String>) -> GlobalArgs {
        GlobalArgs {
            quiet: true,
            verbose: false,
            config,
            jobs: None,
        }
    }

    #[test]
    fn find_root_walks_up() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let nested = dir.path().join("weights/conv");
        fs::create_dir_all(&nested).unwrap();
        assert_eq!(find_project_root(&nested).unwrap(), dir.path());
    }

    #[test]
    fn find_root_fails_without_config() {
        let dir = tempfile::tempdir().unwrap();
        let err = find_project_root(dir.path()).unwrap_err();
        assert!(err.to_string().contains("could not find cim.toml"));
    }

    #[test]
    fn custom_config_file_is_loaded_as_given() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "").unwrap();
        let file = dir.path().join("my_layout.toml");
        fs::write(
            &file,
            "[geometry]\narray_rows = 1\narray_cols = 3\n[paths]\noutput_dir = \"out\"\n",
        )
        .unwrap();
        let project = open_project(&global(Some(file.display().to_string())), None).unwrap();
        assert_eq!(project.config.geometry.array_count(), 3);
        assert_eq!(project.paths.output_dir, dir.path().join("out"));
        assert_eq!(project.paths.weights_dir, dir.path().join("weights"));
    }

    #[test]
    fn missing_config_path_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.toml");
        let err = resolve_project_root(&global(Some(missing.display().to_string()))).unwrap_err();
        assert!(err.to_string().contains("does not exist"));
    }

    #[test]
    fn config_dir_resolves_to_itself() {
        let dir = tempfile::tempdir().unwrap();
        let root = resolve_project_root(&global(Some(dir.path().display().to_string()))).unwrap();
        assert_eq!(root, dir.path());
    }

    #[test]
    fn open_project_applies_output_override() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join(CONFIG_FILE_NAME), "[geometry]\narray_rows = 1\narray_cols = 1\n")
            .unwrap();
        let out = dir.path().join("elsewhere");
        let project = open_project(
            &global(Some(dir.path().display().to_string())),
            Some(out.to_str().unwrap()),
        )
        .unwrap();
        assert_eq!(project.paths.output_dir, out);
        assert_eq!(project.config.geometry.array_count(), 1);
    }

    #[test]
    fn run_options_carry_jobs() {
        let mut g = global(None);
        g.jobs = Some(3);
        assert_eq!(run_options(&g).jobs, Some(3));
    }
}
