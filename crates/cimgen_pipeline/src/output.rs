//! Output directory layout and atomic file writes.
//!
//! Every artifact is written to `<path>.tmp` first and renamed into place,
//! so a failed run never leaves a truncated file behind.

use crate::error::PipelineError;
use cimgen_common::ArrayId;
use std::ffi::OsString;
use std::fs;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Locations of every generated artifact under the output directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputLayout {
    root: PathBuf,
}

impl OutputLayout {
    /// Creates a layout rooted at `root`.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// The output directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// `netlists/Array{a}.sp`
    pub fn array_netlist(&self, array: ArrayId) -> PathBuf {
        self.root.join("netlists").join(format!("Array{array}.sp"))
    }

    /// `netlists/Array_all.sp`
    pub fn all_netlist(&self) -> PathBuf {
        self.root.join("netlists").join("Array_all.sp")
    }

    /// `rom/weight_rom.txt`
    pub fn rom_dump(&self) -> PathBuf {
        self.root.join("rom").join("weight_rom.txt")
    }

    /// `rom/output_{a}.txt`
    pub fn rom_array(&self, array: ArrayId) -> PathBuf {
        self.root.join("rom").join(dump_file_name(array))
    }

    /// `schematic/weight_rom_sch.txt`
    pub fn schematic_dump(&self) -> PathBuf {
        self.root.join("schematic").join("weight_rom_sch.txt")
    }

    /// `schematic/output_{a}.txt`
    pub fn schematic_array(&self, array: ArrayId) -> PathBuf {
        self.root.join("schematic").join(dump_file_name(array))
    }
}

/// File name of a per-array dump, `output_{a}.txt`.
pub fn dump_file_name(array: ArrayId) -> String {
    format!("output_{array}.txt")
}

fn temp_path(path: &Path) -> PathBuf {
    let mut tmp: OsString = path.as_os_str().to_owned();
    tmp.push(".tmp");
    PathBuf::from(tmp)
}

fn create_parent(path: &Path) -> Result<(), PipelineError> {
    match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => {
            fs::create_dir_all(dir).map_err(|e| PipelineError::io(dir, e))
        }
        _ => Ok(()),
    }
}

fn commit(tmp: &Path, path: &Path) -> Result<(), PipelineError> {
    fs::rename(tmp, path).map_err(|e| {
        let _ = fs::remove_file(tmp);
        PipelineError::io(path, e)
    })
}

/// Writes `contents` to `path` through a temporary file and a rename.
pub fn write_atomic(path: &Path, contents: &str) -> Result<(), PipelineError> {
    create_parent(path)?;
    let tmp = temp_path(path);
    if let Err(e) = fs::write(&tmp, contents) {
        let _ = fs::remove_file(&tmp);
        return Err(PipelineError::io(&tmp, e));
    }
    commit(&tmp, path)
}

/// Concatenates per-array files into `dest`, in the order given.
///
/// Fails with [`PipelineError::MissingArray`] before writing anything if any
/// input does not exist.
pub fn concat_atomic(inputs: &[(ArrayId, PathBuf)], dest: &Path) -> Result<(), PipelineError> {
    if let Some((array, path)) = inputs.iter().find(|(_, path)| !path.is_file()) {
        return Err(PipelineError::MissingArray {
            array: *array,
            path: path.clone(),
        });
    }
    create_parent(dest)?;
    let tmp = temp_path(dest);
    let result = (|| {
        let file = fs::File::create(&tmp).map_err(|e| PipelineError::io(&tmp, e))?;
        let mut out = BufWriter::new(file);
        for (_, path) in inputs {
            let mut input = fs::File::open(path).map_err(|e| PipelineError::io(path, e))?;
            std::io::copy(&mut input, &mut out).map_err(|e| PipelineError::io(&tmp, e))?;
        }
        out.flush().map_err(|e| PipelineError::io(&tmp, e))
    })();
    if let Err(e) = result {
        let _ = fs::remove_file(&tmp);
        return Err(e);
    }
    commit(&tmp, dest)
}

/// Reads a UTF-8 text input.
pub fn read_text(path: &Path) -> Result<String, PipelineError> {
    fs::read_to_string(path).map_err(|e| PipelineError::io(path, e))
}
