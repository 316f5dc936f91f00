//! Textual weight dumps.
//!
//! Two orders are produced per array:
//!
//! - **ROM order**: for each input channel, 16 text lines. Line `r` holds,
//!   for every plane in order, row `r` of the plane's 16 × 6 select matrix;
//!   all 768 values are space-separated. Each input channel is a
//!   self-contained 16-line block: the row accumulator starts empty for every
//!   channel and every array, so a channel's lines never carry the values of
//!   earlier channels or arrays. This differs from the legacy
//!   `weight_rom_final.txt`, whose lines kept growing across channels.
//! - **Schematic order**: for each input channel, for each physical line, the
//!   128 bits `oc * 8 + bit` as one unseparated string.
//!
//! Combined dumps concatenate the per-array texts in array order, each
//! followed by [`ARRAY_MARKER`] and a blank line, with [`ROW_MARKER`] and a
//! blank line after each row of the grid.

use crate::column::{ColumnSource, PhysicalBitColumn};
use crate::encode::ArrayBitPlanes;
use crate::error::RomError;
use cimgen_common::{
    ArrayId, Geometry, INPUT_CHANNELS, LINES, OUTPUT_CHANNELS, PLANES, SELECT_GROUPS,
    SELECT_ROWS, WEIGHT_BITS,
};

/// Marker line written after every array of a combined dump.
pub const ARRAY_MARKER: &str = "one array finished";

/// Marker line written after every row of arrays in a combined dump.
pub const ROW_MARKER: &str = "new array row";

fn digit(bit: bool) -> char {
    if bit {
        '1'
    } else {
        '0'
    }
}

/// Renders the ROM-order text of one array.
pub fn rom_text(planes: &ArrayBitPlanes) -> String {
    let mut out = String::with_capacity(INPUT_CHANNELS * SELECT_ROWS * PLANES * SELECT_GROUPS * 2);
    for ic in 0..INPUT_CHANNELS {
        let matrices: Vec<_> = planes.planes(ic).iter().map(PhysicalBitColumn::matrix).collect();
        for r in 0..SELECT_ROWS {
            let mut first = true;
            for matrix in &matrices {
                for &bit in &matrix[r] {
                    if !first {
                        out.push(' ');
                    }
                    out.push(digit(bit));
                    first = false;
                }
            }
            out.push('\n');
        }
    }
    out
}

/// Renders the schematic-order text of one array.
pub fn schematic_text(planes: &ArrayBitPlanes) -> String {
    let width = OUTPUT_CHANNELS * WEIGHT_BITS;
    let mut out = String::with_capacity(INPUT_CHANNELS * LINES * (width + 1));
    for ic in 0..INPUT_CHANNELS {
        let ic_planes = planes.planes(ic);
        for line in 0..LINES {
            for oc in 0..OUTPUT_CHANNELS {
                for bit in 0..WEIGHT_BITS {
                    out.push(digit(ic_planes[crate::encode::plane_index(oc, bit)].get(line)));
                }
            }
            out.push('\n');
        }
    }
    out
}

/// Concatenates per-array texts into one dump with array and row markers.
///
/// `texts` must be in ascending array order.
pub fn combined_dump<S: AsRef<str>>(geometry: Geometry, texts: &[S]) -> String {
    let mut out = String::new();
    for (index, text) in texts.iter().enumerate() {
        out.push_str(text.as_ref());
        out.push_str(ARRAY_MARKER);
        out.push_str("\n\n");
        if (index + 1) % geometry.array_cols == 0 {
            out.push_str(ROW_MARKER);
            out.push_str("\n\n");
        }
    }
    out
}

/// Splits a combined dump back into per-array texts.
///
/// Row markers and surrounding blank lines are dropped; every returned text
/// ends with a single newline.
pub fn split_dump(content: &str) -> Vec<String> {
    content
        .split(ARRAY_MARKER)
        .filter_map(|part| {
            let body: Vec<&str> = part
                .lines()
                .filter(|line| line.trim() != ROW_MARKER)
                .collect();
            let body = body.join("\n");
            let body = body.trim();
            (!body.is_empty()).then(|| format!("{body}\n"))
        })
        .collect()
}

/// One array's bits read back from a schematic-order dump.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchematicArray {
    array: ArrayId,
    rows: Vec<Vec<bool>>,
}

impl SchematicArray {
    /// Parses the schematic-order text of `array`.
    ///
    /// Blank lines are skipped. Exactly 16 × 96 rows of 128 characters are
    /// required, and every character must be `0` or `1`; any other digit is
    /// reported as [`RomError::InvalidBit`] with its coordinates, so a parsed
    /// array never fails later during synthesis.
    pub fn parse(array: ArrayId, text: &str) -> Result<Self, RomError> {
        let width = OUTPUT_CHANNELS * WEIGHT_BITS;
        let mut rows = Vec::with_capacity(INPUT_CHANNELS * LINES);
        for (index, line) in text.lines().enumerate() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let malformed = |reason: String| RomError::MalformedDump {
                array,
                line: index + 1,
                reason,
            };
            if rows.len() == INPUT_CHANNELS * LINES {
                return Err(malformed(format!(
                    "more than {} rows",
                    INPUT_CHANNELS * LINES
                )));
            }
            let digits = line
                .chars()
                .map(|c| c.to_digit(10).map(|d| d as u8))
                .collect::<Option<Vec<u8>>>()
                .ok_or_else(|| malformed("non-digit character".to_string()))?;
            if digits.len() != width {
                return Err(malformed(format!(
                    "expected {width} bits, got {}",
                    digits.len()
                )));
            }
            let (ic, physical_line) = (rows.len() / LINES, rows.len() % LINES);
            let row = digits
                .iter()
                .enumerate()
                .map(|(position, &value)| match value {
                    0 => Ok(false),
                    1 => Ok(true),
                    value => Err(RomError::InvalidBit {
                        array,
                        ic,
                        oc: position / WEIGHT_BITS,
                        bit: position % WEIGHT_BITS,
                        line: physical_line,
                        value,
                    }),
                })
                .collect::<Result<Vec<bool>, _>>()?;
            rows.push(row);
        }
        if rows.len() != INPUT_CHANNELS * LINES {
            return Err(RomError::MalformedDump {
                array,
                line: text.lines().count(),
                reason: format!("expected {} rows, got {}", INPUT_CHANNELS * LINES, rows.len()),
            });
        }
        Ok(Self { array, rows })
    }
}

impl ColumnSource for SchematicArray {
    fn array(&self) -> ArrayId {
        self.array
    }

    fn column(&self, ic: usize, oc: usize, bit: usize) -> Result<PhysicalBitColumn, RomError> {
        Ok(PhysicalBitColumn::from_fn(|line| {
            self.rows[ic * LINES + line][oc * WEIGHT_BITS + bit]
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::encode_array;
    use cimgen_common::ArrayCoord;
    use cimgen_weights::CubeBuilder;

    fn sample_planes() -> ArrayBitPlanes {
        let mut builder = CubeBuilder::new(Geometry::new(1, 1));
        let at = ArrayCoord { row: 0, col: 0 };
        // Sign bit of (ic 1, oc 0) on line 17, LSB of (ic 0, oc 15) on line 0.
        builder.write(at, 17, 1, 0, &[1, 0, 0, 0, 0, 0, 0, 0]);
        builder.write(at, 0, 0, 15, &[0, 0, 0, 0, 0, 0, 0, 1]);
        let cube = builder.finish(false).unwrap();
        encode_array(&cube, ArrayId::from_raw(1)).unwrap()
    }

    fn values(line: &str) -> Vec<&str> {
        line.split(' ').collect()
    }

    #[test]
    fn rom_text_shape() {
        let text = rom_text(&sample_planes());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), INPUT_CHANNELS * SELECT_ROWS);
        assert!(lines.iter().all(|l| values(l).len() == PLANES * SELECT_GROUPS));
    }

    #[test]
    fn rom_text_positions() {
        let text = rom_text(&sample_planes());
        let lines: Vec<&str> = text.lines().collect();
        // ic 1, plane 0 (bit 0, oc 0), line 17 -> row 1, group 1.
        let row = values(lines[16 + 1]);
        assert_eq!(row[1], "1");
        assert_eq!(row.iter().filter(|v| **v == "1").count(), 1);
        // ic 0, plane 7*16+15 = 127, line 0 -> row 0, group 0.
        let row = values(lines[0]);
        assert_eq!(row[127 * 6], "1");
        assert_eq!(row.iter().filter(|v| **v == "1").count(), 1);
        let ones: usize = lines
            .iter()
            .map(|l| values(l).iter().filter(|v| **v == "1").count())
            .sum();
        assert_eq!(ones, 2);
    }

    #[test]
    fn rom_blocks_do_not_accumulate_across_channels() {
        let text = rom_text(&sample_planes());
        let lines: Vec<&str> = text.lines().collect();
        let ones_in = |ic: usize| -> usize {
            lines[ic * SELECT_ROWS..(ic + 1) * SELECT_ROWS]
                .iter()
                .map(|l| l.matches('1').count())
                .sum()
        };
        // ic 0 holds one set bit, ic 1 holds one set bit, later blocks stay empty.
        assert_eq!(ones_in(0), 1);
        assert_eq!(ones_in(1), 1);
        assert!((2..INPUT_CHANNELS).all(|ic| ones_in(ic) == 0));
        assert_eq!(values(lines[SELECT_ROWS]).len(), values(lines[0]).len());
    }

    #[test]
    fn schematic_text_positions() {
        let text = schematic_text(&sample_planes());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), INPUT_CHANNELS * LINES);
        assert!(lines.iter().all(|l| l.len() == 128));
        assert_eq!(lines[0].find('1'), Some(15 * 8 + 7));
        assert_eq!(lines[96 + 17].find('1'), Some(0));
        assert_eq!(text.matches('1').count(), 2);
    }

    #[test]
    fn schematic_parse_agrees_with_encoder() {
        let planes = sample_planes();
        let parsed = SchematicArray::parse(planes.array(), &schematic_text(&planes)).unwrap();
        for ic in 0..INPUT_CHANNELS {
            for oc in 0..OUTPUT_CHANNELS {
                for bit in 0..WEIGHT_BITS {
                    assert_eq!(
                        parsed.column(ic, oc, bit).unwrap(),
                        planes.column(ic, oc, bit).unwrap()
                    );
                }
            }
        }
    }

    #[test]
    fn schematic_parse_rejects_short_rows() {
        let text = "0".repeat(127);
        let err = SchematicArray::parse(ArrayId::from_raw(2), &text).unwrap_err();
        assert!(matches!(err, RomError::MalformedDump { line: 1, .. }));
    }

    #[test]
    fn schematic_parse_rejects_missing_rows() {
        let text = format!("{}\n", "0".repeat(128)).repeat(10);
        let err = SchematicArray::parse(ArrayId::from_raw(2), &text).unwrap_err();
        assert!(err.to_string().contains("expected 1536 rows, got 10"));
    }

    #[test]
    fn schematic_parse_rejects_non_binary_digit() {
        let mut text = format!("{}\n", "0".repeat(128)).repeat(INPUT_CHANNELS * LINES);
        // Row 97 is ic 1, line 1; character 9 is oc 1, bit 1.
        let start = 97 * 129 + 9;
        text.replace_range(start..start + 1, "3");
        let err = SchematicArray::parse(ArrayId::from_raw(4), &text).unwrap_err();
        assert!(matches!(
            err,
            RomError::InvalidBit {
                ic: 1,
                oc: 1,
                bit: 1,
                line: 1,
                value: 3,
                ..
            }
        ));
        assert!(err.to_string().starts_with("array 4: "));
    }

    #[test]
    fn combined_dump_markers() {
        let dump = combined_dump(Geometry::new(2, 2), &["a\n", "b\n", "c\n", "d\n"]);
        assert_eq!(
            dump,
            "a\none array finished\n\nb\none array finished\n\nnew array row\n\n\
             c\none array finished\n\nd\none array finished\n\nnew array row\n\n"
        );
    }

    #[test]
    fn split_drops_markers() {
        let texts = vec!["0 1\n1 0\n".to_string(), "1 1\n".to_string(), "0 0\n".to_string()];
        let dump = combined_dump(Geometry::new(3, 1), &texts);
        assert_eq!(split_dump(&dump), texts);
    }
}
