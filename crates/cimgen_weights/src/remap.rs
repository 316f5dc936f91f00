//! Logical-to-physical weight address remapping.
//!
//! Two insertion policies scatter tensors into the same cube:
//!
//! - [`BlockPolicy`] for convolutional regions, reading a rank-4
//!   `[oc][line][1][ic]` tensor relative to the region's block origin:
//!   `cube[m][n][i][j][k] = src[k + (n-col_begin)*16][i-base_line][0][j + (m-row_begin)*16]`
//! - [`FlatPolicy`] for the fully connected layer, reading a rank-2 tensor
//!   with absolute grid offsets and one grid-wide row of output channels per
//!   reserved line:
//!   `cube[m][n][i][j][k] = src[(k + n*16) + (i-base_line)*(16*cols)][j + m*16]`
//!
//! The order of the offset terms is part of the electrical contract.

use crate::cube::{CubeBuilder, PhysicalWeightCube, RegionTag};
use crate::error::WeightError;
use crate::resolve::ResolvedLayout;
use crate::tensor::SourceWeightTensor;
use cimgen_common::{ArrayCoord, Geometry, INPUT_CHANNELS, OUTPUT_CHANNELS};
use cimgen_config::{CimConfig, FcRegion, LayoutRegion};

/// A rule mapping physical weight positions back to source tensor indices.
pub trait InsertionPolicy {
    /// The tag recorded as owner of every line this policy writes.
    fn tag(&self) -> RegionTag;

    /// Every `(array, line)` pair the policy writes, in write order.
    fn targets(&self, geometry: Geometry) -> Vec<(ArrayCoord, usize)>;

    /// Computes the source index feeding `(coord, line, ic, oc)` into `index`.
    fn source_index(
        &self,
        geometry: Geometry,
        coord: ArrayCoord,
        line: usize,
        ic: usize,
        oc: usize,
        index: &mut Vec<usize>,
    );
}

/// Block-relative insertion for one convolutional region.
pub struct BlockPolicy<'a> {
    /// Position of the region in the layout table.
    pub index: usize,
    /// The region descriptor.
    pub region: &'a LayoutRegion,
}

impl InsertionPolicy for BlockPolicy<'_> {
    fn tag(&self) -> RegionTag {
        RegionTag::Conv(self.index)
    }

    fn targets(&self, _geometry: Geometry) -> Vec<(ArrayCoord, usize)> {
        let mut targets = Vec::new();
        for row in self.region.rows() {
            for col in self.region.cols() {
                for line in self.region.lines() {
                    targets.push((ArrayCoord { row, col }, line));
                }
            }
        }
        targets
    }

    fn source_index(
        &self,
        _geometry: Geometry,
        coord: ArrayCoord,
        line: usize,
        ic: usize,
        oc: usize,
        index: &mut Vec<usize>,
    ) {
        let r = self.region;
        index.clear();
        index.extend_from_slice(&[
            oc + (coord.col - r.col_begin) * OUTPUT_CHANNELS,
            line - r.base_line,
            0,
            ic + (coord.row - r.row_begin) * INPUT_CHANNELS,
        ]);
    }
}

/// Flat, grid-absolute insertion for the fully connected region.
pub struct FlatPolicy<'a> {
    /// The reserved region descriptor.
    pub fc: &'a FcRegion,
}

impl InsertionPolicy for FlatPolicy<'_> {
    fn tag(&self) -> RegionTag {
        RegionTag::Fc
    }

    fn targets(&self, geometry: Geometry) -> Vec<(ArrayCoord, usize)> {
        geometry
            .arrays()
            .flat_map(|(_, coord)| self.fc.lines().map(move |line| (coord, line)))
            .collect()
    }

    fn source_index(
        &self,
        geometry: Geometry,
        coord: ArrayCoord,
        line: usize,
        ic: usize,
        oc: usize,
        index: &mut Vec<usize>,
    ) {
        index.clear();
        index.extend_from_slice(&[
            (oc + coord.col * OUTPUT_CHANNELS)
                + (line - self.fc.base_line) * geometry.grid_output_channels(),
            ic + coord.row * INPUT_CHANNELS,
        ]);
    }
}

/// Scatters `tensor` into `builder` according to `policy`.
///
/// Claims every target line first, so an overlap is reported before any of
/// the line's weights are touched.
pub fn insert(
    builder: &mut CubeBuilder,
    policy: &dyn InsertionPolicy,
    tensor: &SourceWeightTensor,
) -> Result<(), WeightError> {
    let geometry = builder.geometry();
    let mut index = Vec::with_capacity(4);
    for (coord, line) in policy.targets(geometry) {
        builder.claim(policy.tag(), coord, line)?;
        for ic in 0..INPUT_CHANNELS {
            for oc in 0..OUTPUT_CHANNELS {
                policy.source_index(geometry, coord, line, ic, oc, &mut index);
                let code = tensor
                    .element(&index)
                    .ok_or_else(|| WeightError::ShapeMismatch {
                        region: policy.tag(),
                        index: index.clone(),
                        shape: tensor.shape().to_vec(),
                    })?;
                builder.write(coord, line, ic, oc, code);
            }
        }
    }
    Ok(())
}

/// Builds the physical weight cube from a resolved layout.
///
/// Convolutional regions are inserted in table order, then the FC region.
pub fn remap(config: &CimConfig, layout: &ResolvedLayout) -> Result<PhysicalWeightCube, WeightError> {
    let mut builder = CubeBuilder::new(config.geometry);
    for (index, (region, tensor)) in layout.conv.iter().enumerate() {
        tracing::debug!(index, source = %region.source, "inserting region");
        insert(&mut builder, &BlockPolicy { index, region }, tensor)?;
    }
    if let Some((fc, tensor)) = &layout.fc {
        tracing::debug!(source = %fc.source, "inserting fc region");
        insert(&mut builder, &FlatPolicy { fc }, tensor)?;
    }
    let cube = builder.finish(config.remap.require_full_coverage)?;
    tracing::info!(
        arrays = config.geometry.array_count(),
        regions = layout.conv.len() + usize::from(layout.fc.is_some()),
        "weight cube built"
    );
    Ok(cube)
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimgen_common::{WeightCode, LINES};
    use cimgen_config::load_config_from_str;

    fn region(
        base_line: usize,
        rows: (usize, usize),
        cols: (usize, usize),
        line_count: usize,
    ) -> LayoutRegion {
        LayoutRegion {
            base_line,
            row_begin: rows.0,
            row_end: rows.1,
            col_begin: cols.0,
            col_end: cols.1,
            line_count,
            source: "test".to_string(),
        }
    }

    /// A rank-4 tensor whose element at flat position `p` holds `p mod 128`
    /// in its magnitude bits and `(p / 128) mod 2` in its sign bit.
    fn indexed_tensor(shape: Vec<usize>) -> SourceWeightTensor {
        let elements: usize = shape.iter().product();
        let values: Vec<i32> = (0..elements)
            .map(|p| {
                let magnitude = (p % 128) as i32;
                if (p / 128) % 2 == 1 {
                    -magnitude
                } else {
                    magnitude
                }
            })
            .collect();
        SourceWeightTensor::from_values(shape, &values).unwrap()
    }

    fn relaxed_config(rows: usize, cols: usize) -> CimConfig {
        load_config_from_str(&format!(
            "[geometry]\narray_rows = {rows}\narray_cols = {cols}\n[remap]\nrequire_full_coverage = false\n"
        ))
        .unwrap()
    }

    #[test]
    fn block_remap_matches_formula_exhaustively() {
        let r = region(4, (0, 1), (0, 1), 5);
        let tensor = indexed_tensor(vec![32, 5, 1, 32]);
        let layout = ResolvedLayout {
            conv: vec![(r.clone(), tensor.clone())],
            fc: None,
        };
        let cube = remap(&relaxed_config(2, 2), &layout).unwrap();
        for m in 0..2 {
            for n in 0..2 {
                let coord = ArrayCoord { row: m, col: n };
                for i in r.lines() {
                    for j in 0..16 {
                        for k in 0..16 {
                            let expected = tensor
                                .element(&[k + n * 16, i - r.base_line, 0, j + m * 16])
                                .unwrap();
                            assert_eq!(cube.weight(coord, i, j, k), expected);
                        }
                    }
                }
                assert_eq!(cube.owner(coord, 3), None);
                assert_eq!(cube.owner(coord, 4), Some(RegionTag::Conv(0)));
                assert_eq!(cube.owner(coord, 9), None);
            }
        }
    }

    #[test]
    fn block_offsets_are_relative_to_region_origin() {
        let r = region(0, (1, 1), (2, 3), 2);
        let tensor = indexed_tensor(vec![32, 2, 1, 16]);
        let layout = ResolvedLayout {
            conv: vec![(r, tensor.clone())],
            fc: None,
        };
        let cube = remap(&relaxed_config(4, 4), &layout).unwrap();
        let coord = ArrayCoord { row: 1, col: 3 };
        assert_eq!(
            cube.weight(coord, 1, 5, 7),
            tensor.element(&[7 + 16, 1, 0, 5]).unwrap()
        );
    }

    #[test]
    fn flat_remap_uses_grid_absolute_offsets() {
        let fc = FcRegion {
            source: "fc".to_string(),
            base_line: 82,
            line_count: 2,
        };
        let tensor = indexed_tensor(vec![128, 64]);
        let layout = ResolvedLayout {
            conv: vec![],
            fc: Some((fc, tensor.clone())),
        };
        let cube = remap(&relaxed_config(4, 4), &layout).unwrap();
        for (_, coord) in Geometry::default().arrays() {
            for i in 82..84 {
                for j in [0, 9, 15] {
                    for k in [0, 3, 15] {
                        let expected = tensor
                            .element(&[(k + coord.col * 16) + (i - 82) * 64, j + coord.row * 16])
                            .unwrap();
                        assert_eq!(cube.weight(coord, i, j, k), expected);
                    }
                }
                assert_eq!(cube.owner(coord, i), Some(RegionTag::Fc));
            }
        }
    }

    #[test]
    fn short_tensor_is_shape_mismatch() {
        let r = region(0, (0, 0), (0, 0), 4);
        let tensor = indexed_tensor(vec![16, 3, 1, 16]);
        let layout = ResolvedLayout {
            conv: vec![(r, tensor)],
            fc: None,
        };
        let err = remap(&relaxed_config(1, 1), &layout).unwrap_err();
        match err {
            WeightError::ShapeMismatch {
                region,
                index,
                shape,
            } => {
                assert_eq!(region, RegionTag::Conv(0));
                assert_eq!(index, vec![0, 3, 0, 0]);
                assert_eq!(shape, vec![16, 3, 1, 16]);
            }
            other => panic!("expected shape mismatch, got {other:?}"),
        }
    }

    #[test]
    fn overlapping_regions_rejected() {
        let a = region(0, (0, 1), (0, 0), 10);
        let b = region(9, (1, 1), (0, 0), 3);
        let layout = ResolvedLayout {
            conv: vec![
                (a, indexed_tensor(vec![16, 10, 1, 32])),
                (b, indexed_tensor(vec![16, 3, 1, 16])),
            ],
            fc: None,
        };
        let err = remap(&relaxed_config(2, 1), &layout).unwrap_err();
        assert!(matches!(
            err,
            WeightError::RegionOverlap {
                line: 9,
                array_row: 1,
                ..
            }
        ));
    }

    #[test]
    fn fc_overlapping_conv_rejected() {
        let conv = region(80, (0, 0), (0, 0), 4);
        let fc = FcRegion {
            source: "fc".to_string(),
            base_line: 82,
            line_count: 2,
        };
        let layout = ResolvedLayout {
            conv: vec![(conv, indexed_tensor(vec![16, 4, 1, 16]))],
            fc: Some((fc, indexed_tensor(vec![32, 16]))),
        };
        let err = remap(&relaxed_config(1, 1), &layout).unwrap_err();
        assert!(matches!(
            err,
            WeightError::RegionOverlap {
                region: RegionTag::Fc,
                other: RegionTag::Conv(0),
                ..
            }
        ));
    }

    #[test]
    fn full_coverage_every_line_has_exactly_one_owner() {
        // Two conv regions split lines 0..82 of a 2x2 grid, FC takes 82..84,
        // a third region fills the tail.
        let regions = vec![
            region(0, (0, 1), (0, 1), 50),
            region(50, (0, 1), (0, 1), 32),
            region(84, (0, 1), (0, 1), 12),
        ];
        let conv = regions
            .into_iter()
            .map(|r| {
                let shape = vec![32, r.line_count, 1, 32];
                (r, SourceWeightTensor::filled(shape, WeightCode::default()))
            })
            .collect();
        let fc = FcRegion {
            source: "fc".to_string(),
            base_line: 82,
            line_count: 2,
        };
        let layout = ResolvedLayout {
            conv,
            fc: Some((fc, SourceWeightTensor::filled(vec![64, 32], WeightCode::default()))),
        };
        let config = load_config_from_str("[geometry]\narray_rows = 2\narray_cols = 2\n").unwrap();
        let cube = remap(&config, &layout).unwrap();
        assert_eq!(cube.uncovered_lines(), 0);
        for (_, coord) in config.geometry.arrays() {
            for line in 0..LINES {
                let expected = match line {
                    0..=49 => RegionTag::Conv(0),
                    50..=81 => RegionTag::Conv(1),
                    82..=83 => RegionTag::Fc,
                    _ => RegionTag::Conv(2),
                };
                assert_eq!(cube.owner(coord, line), Some(expected));
            }
        }
    }

    #[test]
    fn strict_coverage_rejects_gaps() {
        let layout = ResolvedLayout {
            conv: vec![(
                region(0, (0, 0), (0, 0), 95),
                SourceWeightTensor::filled(vec![16, 95, 1, 16], WeightCode::default()),
            )],
            fc: None,
        };
        let config = load_config_from_str("[geometry]\narray_rows = 1\narray_cols = 1\n").unwrap();
        let err = remap(&config, &layout).unwrap_err();
        assert!(matches!(
            err,
            WeightError::IncompleteCoverage {
                count: 1,
                line: 95,
                ..
            }
        ));
    }
}
