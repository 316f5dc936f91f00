//! Netlist aggregation: fragments around each array, and the all-array file.

use crate::error::PipelineError;
use crate::output::{concat_atomic, read_text, write_atomic, OutputLayout};
use cimgen_common::Geometry;
use cimgen_config::ResolvedPaths;
use cimgen_netlist::SEPARATOR;
use cimgen_rom::combined_dump;
use std::path::PathBuf;

/// The static text bounding every per-array netlist.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Fragments {
    /// Written before the generated body.
    pub front: String,
    /// Written after the generated body.
    pub back: String,
}

impl Fragments {
    /// Reads the configured fragment files; unconfigured fragments are empty.
    pub fn load(paths: &ResolvedPaths) -> Result<Self, PipelineError> {
        let read = |path: &Option<PathBuf>| match path {
            Some(path) => read_text(path),
            None => Ok(String::new()),
        };
        Ok(Self {
            front: read(&paths.front)?,
            back: read(&paths.back)?,
        })
    }

    /// Wraps a generated body: front, two separators, body, two separators, back.
    pub fn wrap(&self, body: &str) -> String {
        let mut out = String::with_capacity(
            self.front.len() + body.len() + self.back.len() + 4 * (SEPARATOR.len() + 1),
        );
        out.push_str(&self.front);
        for _ in 0..2 {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out.push_str(body);
        for _ in 0..2 {
            out.push_str(SEPARATOR);
            out.push('\n');
        }
        out.push_str(&self.back);
        out
    }
}

/// Concatenates every per-array netlist file into `Array_all.sp`, in
/// ascending array order.
pub fn assemble_all_netlist(
    layout: &OutputLayout,
    geometry: Geometry,
) -> Result<PathBuf, PipelineError> {
    let inputs: Vec<_> = geometry
        .arrays()
        .map(|(array, _)| (array, layout.array_netlist(array)))
        .collect();
    let dest = layout.all_netlist();
    concat_atomic(&inputs, &dest)?;
    tracing::info!(arrays = inputs.len(), path = %dest.display(), "assembled all-array netlist");
    Ok(dest)
}

/// Per-array dump texts in one of the two dump orders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DumpKind {
    /// Space-separated, plane-major ROM order.
    Rom,
    /// Unseparated, line-major schematic order.
    Schematic,
}

/// Writes per-array dump files and the combined dump with markers.
///
/// `texts` must hold one text per array, in ascending array order.
pub fn write_dumps(
    layout: &OutputLayout,
    geometry: Geometry,
    kind: DumpKind,
    texts: &[String],
) -> Result<PathBuf, PipelineError> {
    for ((array, _), text) in geometry.arrays().zip(texts) {
        let path = match kind {
            DumpKind::Rom => layout.rom_array(array),
            DumpKind::Schematic => layout.schematic_array(array),
        };
        write_atomic(&path, text)?;
    }
    let dest = match kind {
        DumpKind::Rom => layout.rom_dump(),
        DumpKind::Schematic => layout.schematic_dump(),
    };
    write_atomic(&dest, &combined_dump(geometry, texts))?;
    tracing::debug!(?kind, path = %dest.display(), "wrote combined dump");
    Ok(dest)
}
