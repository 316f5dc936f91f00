//! Hierarchical synthesis: Cell → Column → output-channel group → Array.
//!
//! Column labels run opposite to bit positions: bit 0 (the sign) is
//! column 7 and drives the sign-aware adder tree; bit 7 (the LSB) is
//! column 0.

use crate::error::NetlistError;
use crate::node::{Pin, Statement, Subckt, SubcktKind};
use crate::writer::NetlistWriter;
use cimgen_common::{
    ArrayId, SelectAddress, INPUT_BUS_WIDTH, INPUT_CHANNELS, LINES, OUTPUT_CHANNELS,
    SELECT_GROUPS, SELECT_ROWS, SUM_WIDTH, WEIGHT_BITS,
};
use cimgen_config::DeviceConfig;
use cimgen_rom::{ColumnSource, PhysicalBitColumn};

/// Column label of the sign bit.
pub const SIGN_COLUMN: usize = WEIGHT_BITS - 1;

/// Pins per `*.PININFO` line of a cell.
const CELL_PININFO_LINES: [usize; 6] = [6, 4, 5, 5, 5, 2];

/// Column label of bit position `bit`.
pub fn column_label(bit: usize) -> usize {
    WEIGHT_BITS - 1 - bit
}

/// `Cell_arr{a}_ic{i}_col{c}_oc{w}`
pub fn cell_name(array: ArrayId, ic: usize, col: usize, oc: usize) -> String {
    format!("Cell_arr{array}_ic{ic}_col{col}_oc{oc}")
}

/// `Col{c}_arr{a}_oc{w}`
pub fn column_name(array: ArrayId, col: usize, oc: usize) -> String {
    format!("Col{col}_arr{array}_oc{oc}")
}

/// `8Cols_arr{a}_oc{w}`
pub fn oc_group_name(array: ArrayId, oc: usize) -> String {
    format!("8Cols_arr{array}_oc{oc}")
}

/// `Arr{a}`
pub fn array_name(array: ArrayId) -> String {
    format!("Arr{array}")
}

fn bus(name: &str, lo: usize, hi: usize) -> String {
    format!("{name}<{lo}:{hi}>")
}

fn nets<const N: usize>(names: [&str; N]) -> Vec<String> {
    names.iter().map(|n| n.to_string()).collect()
}

/// Width of the adder-tree output of column `col`.
fn column_out_width(col: usize) -> usize {
    if col == SIGN_COLUMN {
        6
    } else {
        5
    }
}

fn nmos(name: String, nets: Vec<String>, devices: &DeviceConfig) -> Statement {
    Statement::Device {
        name,
        nets,
        model: devices.nmos_model.clone(),
        params: devices.params(),
    }
}

/// Builds one storage cell.
///
/// Line `k` is a pass transistor gated by `row_en<k % 16>`; a stored 1 ties
/// its drain to the group node `mid_out{k / 16}`, a stored 0 leaves it on
/// the private net `net{k}`. Six group transistors gated by `row_2level<g>`
/// connect the group nodes to the precharged `Cell_out`.
pub fn build_cell(
    array: ArrayId,
    ic: usize,
    oc: usize,
    bit: usize,
    column: &PhysicalBitColumn,
    devices: &DeviceConfig,
) -> Subckt {
    let mut pins = vec![
        Pin::input(bus("IN", 0, SELECT_ROWS - 1)),
        Pin::input("RSTN"),
        Pin::input("VDD"),
        Pin::input("VSS"),
    ];
    pins.extend((0..SELECT_GROUPS).map(|g| Pin::input(format!("row_2level<{g}>"))));
    pins.extend((0..SELECT_ROWS).map(|r| Pin::input(format!("row_en<{r}>"))));
    pins.push(Pin::output("Cell_out"));
    let mut pins = pins.into_iter();
    let pininfo = CELL_PININFO_LINES
        .iter()
        .map(|&n| pins.by_ref().take(n).collect())
        .collect();

    let mut statements = Vec::with_capacity(LINES + 1 + SELECT_GROUPS);
    for addr in (0..LINES).filter_map(SelectAddress::from_line) {
        let k = addr.line();
        let drain = if column.get(k) {
            format!("mid_out{}", addr.group)
        } else {
            format!("net{k}")
        };
        statements.push(nmos(
            format!("MNM{k}"),
            vec![
                drain,
                format!("row_en<{}>", addr.local_row),
                format!("IN<{}>", addr.local_row),
                "VSS".to_string(),
            ],
            devices,
        ));
    }
    statements.push(Statement::Device {
        name: "MPM1".to_string(),
        nets: nets(["Cell_out", "RSTN", "VDD", "VDD"]),
        model: devices.pmos_model.clone(),
        params: devices.params(),
    });
    for g in 0..SELECT_GROUPS {
        statements.push(nmos(
            format!("MNM{}", LINES + g),
            vec![
                "Cell_out".to_string(),
                format!("row_2level<{g}>"),
                format!("mid_out{g}"),
                "VSS".to_string(),
            ],
            devices,
        ));
    }

    Subckt {
        kind: SubcktKind::Cell,
        name: cell_name(array, ic, column_label(bit), oc),
        ports: vec![
            vec!["Cell_out".to_string(), bus("IN", 0, SELECT_ROWS - 1)],
            nets(["RSTN", "VDD", "VSS"]),
            vec![bus("row_2level", 0, SELECT_GROUPS - 1)],
            vec![bus("row_en", 0, SELECT_ROWS - 1)],
        ],
        pininfo,
        statements,
    }
}

/// Builds the column of bit position `bit` of output channel `oc`: sixteen
/// cells, one per input channel, summed by an adder tree.
pub fn build_column(array: ArrayId, oc: usize, bit: usize, devices: &DeviceConfig) -> Subckt {
    let col = column_label(bit);
    let out = bus("OUT", 0, column_out_width(col) - 1);
    let inputs = bus("IN", 0, INPUT_BUS_WIDTH - 1);
    let row_2level = bus("row_2level", 0, SELECT_GROUPS - 1);
    let row_en = bus("row_en", 0, SELECT_ROWS - 1);
    let sign_inv = bus("sign_inv", 0, INPUT_CHANNELS - 1);

    let mut statements: Vec<Statement> = (0..INPUT_CHANNELS)
        .map(|ic| Statement::Instance {
            name: format!("XI{ic}"),
            nets: vec![
                format!("Cell_out<{ic}>"),
                bus("IN", ic * SELECT_ROWS, ic * SELECT_ROWS + SELECT_ROWS - 1),
                "RSTN".to_string(),
                "VDD".to_string(),
                "VSS".to_string(),
                row_2level.clone(),
                row_en.clone(),
            ],
            subckt: cell_name(array, ic, col, oc),
        })
        .collect();
    let tree = if col == SIGN_COLUMN {
        &devices.adder_tree_signed
    } else {
        &devices.adder_tree
    };
    statements.push(Statement::Instance {
        name: format!("XI{INPUT_CHANNELS}"),
        nets: vec![
            out.clone(),
            bus("Cell_out", 0, INPUT_CHANNELS - 1),
            "VDD".to_string(),
            "VSS".to_string(),
            sign_inv.clone(),
        ],
        subckt: tree.clone(),
    });

    Subckt {
        kind: SubcktKind::Column,
        name: column_name(array, col, oc),
        ports: vec![
            vec![out.clone(), inputs.clone()],
            vec![
                "RSTN".to_string(),
                "VDD".to_string(),
                "VSS".to_string(),
                row_2level.clone(),
                row_en.clone(),
                sign_inv.clone(),
            ],
        ],
        pininfo: vec![
            vec![
                Pin::input(inputs),
                Pin::input("RSTN"),
                Pin::input("VDD"),
                Pin::input("VSS"),
                Pin::input(row_2level),
                Pin::input(row_en),
                Pin::input(sign_inv),
            ],
            vec![Pin::output(out)],
        ],
        statements,
    }
}

/// Net driven by column `col` inside an output-channel group.
///
/// Column 0 drives `SUM<0>` directly with its LSB; its upper bits and every
/// other column feed the bit shifter.
fn column_sum_net(col: usize) -> String {
    match col {
        0 => "SUM<0>,b0<1:4>".to_string(),
        SIGN_COLUMN => bus(&format!("b{col}"), 0, 5),
        _ => bus(&format!("b{col}"), 0, 4),
    }
}

/// Builds the eight columns of output channel `oc` and their bit shifter.
pub fn build_oc_group(array: ArrayId, oc: usize, devices: &DeviceConfig) -> Subckt {
    let sum = bus("SUM", 0, SUM_WIDTH - 1);
    let inputs = bus("IN", 0, INPUT_BUS_WIDTH - 1);
    let row_en1 = bus("row_en1", 0, SELECT_ROWS - 1);
    let row_en2 = bus("row_en2", 0, SELECT_GROUPS - 1);
    let sign_inv = bus("sign_inv", 0, INPUT_CHANNELS - 1);

    let mut statements: Vec<Statement> = (0..WEIGHT_BITS)
        .map(|col| Statement::Instance {
            name: format!("XI{col}"),
            nets: vec![
                column_sum_net(col),
                inputs.clone(),
                "RSTN".to_string(),
                "VDD".to_string(),
                "VSS".to_string(),
                row_en2.clone(),
                row_en1.clone(),
                sign_inv.clone(),
            ],
            subckt: column_name(array, col, oc),
        })
        .collect();

    let mut shifter = vec![bus("SUM", 1, SUM_WIDTH - 1), "b0<1:4>".to_string()];
    shifter.extend((1..WEIGHT_BITS).map(column_sum_net));
    shifter.extend(nets(["VDD", "VSS"]));
    statements.push(Statement::Instance {
        name: format!("XI{WEIGHT_BITS}"),
        nets: shifter,
        subckt: devices.bit_shifter.clone(),
    });

    Subckt {
        kind: SubcktKind::OcGroup,
        name: oc_group_name(array, oc),
        ports: vec![vec![
            sum.clone(),
            inputs.clone(),
            "RSTN".to_string(),
            row_en1.clone(),
            row_en2.clone(),
            sign_inv.clone(),
            "VDD".to_string(),
            "VSS".to_string(),
        ]],
        pininfo: vec![vec![
            Pin::input(inputs),
            Pin::input("RSTN"),
            Pin::input("VDD"),
            Pin::input("VSS"),
            Pin::input(row_en2),
            Pin::input(row_en1),
            Pin::input(sign_inv),
            Pin::output(sum),
        ]],
        statements,
    }
}

/// Builds the top-level array: sixteen output-channel groups sharing the
/// buffered input bus.
pub fn build_array(array: ArrayId) -> Subckt {
    let sum = bus("SUM", 0, OUTPUT_CHANNELS * SUM_WIDTH - 1);
    let inputs = bus("IN", 0, INPUT_CHANNELS - 1);
    let row_en1 = bus("row_en1", 0, SELECT_ROWS - 1);
    let row_en2 = bus("row_en2", 0, SELECT_GROUPS - 1);

    let statements = (0..OUTPUT_CHANNELS)
        .map(|oc| Statement::Instance {
            name: format!("XI{oc}"),
            nets: vec![
                bus("SUM", oc * SUM_WIDTH, oc * SUM_WIDTH + SUM_WIDTH - 1),
                bus("IN_N_BUF", 0, INPUT_BUS_WIDTH - 1),
                "RSTN".to_string(),
                row_en1.clone(),
                row_en2.clone(),
                bus("sign_inv", 0, INPUT_CHANNELS - 1),
                "VDD".to_string(),
                "VSS".to_string(),
            ],
            subckt: oc_group_name(array, oc),
        })
        .collect();

    Subckt {
        kind: SubcktKind::Array,
        name: array_name(array),
        ports: vec![vec![
            sum.clone(),
            inputs.clone(),
            "RSTN".to_string(),
            row_en1.clone(),
            row_en2.clone(),
            "cnt_b7".to_string(),
            "VDD".to_string(),
            "VSS".to_string(),
        ]],
        pininfo: vec![vec![
            Pin::input(inputs),
            Pin::input("RSTN"),
            Pin::input("VDD"),
            Pin::input("VSS"),
            Pin::input(row_en2),
            Pin::input(row_en1),
            Pin::input("cnt_b7"),
            Pin::output(sum),
        ]],
        statements,
    }
}

/// The generated netlist body of one array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArrayNetlist {
    /// The array.
    pub array: ArrayId,
    /// Rendered subcircuits, callee first, ending with `Arr{a}`.
    pub body: String,
    /// Number of subcircuits in the body.
    pub subckt_count: usize,
    /// Number of transistors in the body.
    pub device_count: usize,
}

/// Synthesizes the full hierarchy of one array.
///
/// For every output channel, for every bit position (sign first), the 16
/// cells are emitted followed by their column; the output-channel group
/// follows its eight columns, and the array closes the body.
pub fn synthesize_array(
    source: &dyn ColumnSource,
    devices: &DeviceConfig,
) -> Result<ArrayNetlist, NetlistError> {
    let array = source.array();
    let mut writer = NetlistWriter::new();
    for oc in 0..OUTPUT_CHANNELS {
        for bit in 0..WEIGHT_BITS {
            for ic in 0..INPUT_CHANNELS {
                let column = source.column(ic, oc, bit)?;
                writer.emit(&build_cell(array, ic, oc, bit, &column, devices))?;
            }
            writer.emit(&build_column(array, oc, bit, devices))?;
        }
        writer.emit(&build_oc_group(array, oc, devices))?;
    }
    writer.emit(&build_array(array))?;

    let (subckt_count, device_count) = (writer.subckt_count(), writer.device_count());
    tracing::debug!(%array, subckt_count, device_count, "synthesized array netlist");
    Ok(ArrayNetlist {
        array,
        body: writer.finish(),
        subckt_count,
        device_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use cimgen_rom::RomError;

    /// A source whose bit is 1 exactly where `pattern` says so.
    struct PatternSource {
        array: ArrayId,
        pattern: fn(usize, usize, usize, usize) -> bool,
    }

    impl ColumnSource for PatternSource {
        fn array(&self) -> ArrayId {
            self.array
        }

        fn column(&self, ic: usize, oc: usize, bit: usize) -> Result<PhysicalBitColumn, RomError> {
            Ok(PhysicalBitColumn::from_fn(|k| (self.pattern)(ic, oc, bit, k)))
        }
    }

    struct FailingSource;

    impl ColumnSource for FailingSource {
        fn array(&self) -> ArrayId {
            ArrayId::from_raw(1)
        }

        fn column(&self, ic: usize, oc: usize, bit: usize) -> Result<PhysicalBitColumn, RomError> {
            Err(RomError::InvalidBit {
                array: ArrayId::from_raw(1),
                ic,
                oc,
                bit,
                line: 0,
                value: 7,
            })
        }
    }

    fn a(raw: u32) -> ArrayId {
        ArrayId::from_raw(raw)
    }

    #[test]
    fn names() {
        assert_eq!(cell_name(a(3), 4, 7, 15), "Cell_arr3_ic4_col7_oc15");
        assert_eq!(column_name(a(3), 0, 2), "Col0_arr3_oc2");
        assert_eq!(oc_group_name(a(16), 9), "8Cols_arr16_oc9");
        assert_eq!(array_name(a(1)), "Arr1");
        assert_eq!(column_label(0), 7);
        assert_eq!(column_label(7), 0);
    }

    #[test]
    fn cell_text_matches_format() {
        let column = PhysicalBitColumn::from_fn(|k| k == 17);
        let cell = build_cell(a(1), 2, 3, 0, &column, &DeviceConfig::default());
        let text = cell.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "****Sub-Circuit for Cell_arr1_ic2_col7_oc3*****");
        assert_eq!(lines[1], ".SUBCKT Cell_arr1_ic2_col7_oc3 Cell_out IN<0:15>");
        assert_eq!(lines[2], "+ RSTN VDD VSS");
        assert_eq!(lines[3], "+ row_2level<0:5>");
        assert_eq!(lines[4], "+ row_en<0:15>");
        assert_eq!(
            lines[5],
            "*.PININFO IN<0:15>:I RSTN:I VDD:I VSS:I row_2level<0>:I row_2level<1>:I"
        );
        assert_eq!(
            lines[6],
            "*.PININFO row_2level<2>:I row_2level<3>:I row_2level<4>:I row_2level<5>:I"
        );
        assert_eq!(
            lines[7],
            "*.PININFO row_en<0>:I row_en<1>:I row_en<2>:I row_en<3>:I row_en<4>:I"
        );
        assert_eq!(lines[10], "*.PININFO row_en<15>:I Cell_out:O");
        assert_eq!(
            lines[11],
            "MNM0 net0 row_en<0> IN<0> VSS nhvt09_ckt m=1 l=40n w=100n"
        );
        assert_eq!(
            lines[11 + 17],
            "MNM17 mid_out1 row_en<1> IN<1> VSS nhvt09_ckt m=1 l=40n w=100n"
        );
        assert_eq!(
            lines[11 + 96],
            "MPM1 Cell_out RSTN VDD VDD plvt09_ckt m=1 l=40n w=100n"
        );
        assert_eq!(
            lines[11 + 97],
            "MNM96 Cell_out row_2level<0> mid_out0 VSS nhvt09_ckt m=1 l=40n w=100n"
        );
        assert_eq!(
            lines[11 + 102],
            "MNM101 Cell_out row_2level<5> mid_out5 VSS nhvt09_ckt m=1 l=40n w=100n"
        );
        assert_eq!(lines[11 + 103], ".ENDS");
        assert_eq!(lines.len(), 11 + 104);
        assert_eq!(cell.device_count(), 103);
    }

    #[test]
    fn device_config_flows_into_cells() {
        let devices = DeviceConfig {
            nmos_model: "nch".to_string(),
            pmos_model: "pch".to_string(),
            multiplier: 2,
            length: "28n".to_string(),
            ..DeviceConfig::default()
        };
        let column = PhysicalBitColumn::default();
        let text = build_cell(a(1), 0, 0, 7, &column, &devices).to_string();
        assert!(text.contains("MNM5 net5 row_en<5> IN<5> VSS nch m=2 l=28n w=100n\n"));
        assert!(text.contains("MPM1 Cell_out RSTN VDD VDD pch m=2 l=28n w=100n\n"));
    }

    #[test]
    fn sign_column_uses_signed_tree() {
        let devices = DeviceConfig::default();
        let text = build_column(a(2), 5, 0, &devices).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0].len(), 72);
        assert_eq!(lines[1], ".SUBCKT Col7_arr2_oc5 OUT<0:5> IN<0:255>");
        assert_eq!(
            lines[2],
            "+ RSTN VDD VSS row_2level<0:5> row_en<0:15> sign_inv<0:15>"
        );
        assert_eq!(
            lines[3],
            "*.PININFO IN<0:255>:I RSTN:I VDD:I VSS:I row_2level<0:5>:I row_en<0:15>:I sign_inv<0:15>:I"
        );
        assert_eq!(lines[4], "*.PININFO OUT<0:5>:O");
        assert_eq!(
            lines[5],
            "XI0 Cell_out<0> IN<0:15> RSTN VDD VSS row_2level<0:5> row_en<0:15> / Cell_arr2_ic0_col7_oc5"
        );
        assert_eq!(
            lines[20],
            "XI15 Cell_out<15> IN<240:255> RSTN VDD VSS row_2level<0:5> row_en<0:15> / Cell_arr2_ic15_col7_oc5"
        );
        assert_eq!(
            lines[21],
            "XI16 OUT<0:5> Cell_out<0:15> VDD VSS sign_inv<0:15> / AdderTree_sign_domino"
        );
        assert_eq!(lines[22], ".ENDS");
    }

    #[test]
    fn magnitude_column_uses_plain_tree() {
        let text = build_column(a(1), 0, 3, &DeviceConfig::default()).to_string();
        assert!(text.contains(".SUBCKT Col4_arr1_oc0 OUT<0:4> IN<0:255>\n"));
        assert!(text.contains("XI16 OUT<0:4> Cell_out<0:15> VDD VSS sign_inv<0:15> / AdderTree_domino\n"));
    }

    #[test]
    fn oc_group_wiring() {
        let text = build_oc_group(a(1), 4, &DeviceConfig::default()).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[1],
            ".SUBCKT 8Cols_arr1_oc4 SUM<0:12> IN<0:255> RSTN row_en1<0:15> row_en2<0:5> sign_inv<0:15> VDD VSS"
        );
        assert_eq!(
            lines[2],
            "*.PININFO IN<0:255>:I RSTN:I VDD:I VSS:I row_en2<0:5>:I row_en1<0:15>:I sign_inv<0:15>:I SUM<0:12>:O"
        );
        assert_eq!(
            lines[3],
            "XI0 SUM<0>,b0<1:4> IN<0:255> RSTN VDD VSS row_en2<0:5> row_en1<0:15> sign_inv<0:15> / Col0_arr1_oc4"
        );
        assert_eq!(
            lines[4],
            "XI1 b1<0:4> IN<0:255> RSTN VDD VSS row_en2<0:5> row_en1<0:15> sign_inv<0:15> / Col1_arr1_oc4"
        );
        assert_eq!(
            lines[10],
            "XI7 b7<0:5> IN<0:255> RSTN VDD VSS row_en2<0:5> row_en1<0:15> sign_inv<0:15> / Col7_arr1_oc4"
        );
        assert_eq!(
            lines[11],
            "XI8 SUM<1:12> b0<1:4> b1<0:4> b2<0:4> b3<0:4> b4<0:4> b5<0:4> b6<0:4> b7<0:5> VDD VSS / Bit_shifter_full"
        );
        assert_eq!(lines[12], ".ENDS");
    }

    #[test]
    fn array_wiring() {
        let text = build_array(a(7)).to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(
            lines[1],
            ".SUBCKT Arr7 SUM<0:207> IN<0:15> RSTN row_en1<0:15> row_en2<0:5> cnt_b7 VDD VSS"
        );
        assert_eq!(
            lines[2],
            "*.PININFO IN<0:15>:I RSTN:I VDD:I VSS:I row_en2<0:5>:I row_en1<0:15>:I cnt_b7:I SUM<0:207>:O"
        );
        assert_eq!(
            lines[3],
            "XI0 SUM<0:12> IN_N_BUF<0:255> RSTN row_en1<0:15> row_en2<0:5> sign_inv<0:15> VDD VSS / 8Cols_arr7_oc0"
        );
        assert_eq!(
            lines[18],
            "XI15 SUM<195:207> IN_N_BUF<0:255> RSTN row_en1<0:15> row_en2<0:5> sign_inv<0:15> VDD VSS / 8Cols_arr7_oc15"
        );
        assert_eq!(lines[19], ".ENDS");
    }

    #[test]
    fn full_array_structure() {
        let source = PatternSource {
            array: a(5),
            pattern: |ic, oc, bit, k| (ic + oc + bit + k) % 3 == 0,
        };
        let netlist = synthesize_array(&source, &DeviceConfig::default()).unwrap();
        let body = &netlist.body;

        assert_eq!(netlist.subckt_count, 2048 + 128 + 16 + 1);
        assert_eq!(netlist.device_count, 2048 * 103);
        assert_eq!(body.matches(".SUBCKT Cell_arr5_").count(), 2048);
        assert_eq!(body.matches(".SUBCKT Col").count(), 128);
        assert_eq!(body.matches(".SUBCKT 8Cols_arr5_").count(), 16);
        assert_eq!(body.matches(".SUBCKT Arr5 ").count(), 1);
        assert_eq!(body.matches(".ENDS\n").count(), 2193);
        assert!(body.trim_end().ends_with(".ENDS"));

        // Ordering: cells of a column precede it, columns precede the group.
        let first_cell = body.find(".SUBCKT Cell_arr5_ic15_col7_oc0 ").unwrap();
        let first_col = body.find(".SUBCKT Col7_arr5_oc0 ").unwrap();
        let first_group = body.find(".SUBCKT 8Cols_arr5_oc0 ").unwrap();
        let next_cell = body.find(".SUBCKT Cell_arr5_ic0_col7_oc1 ").unwrap();
        let top = body.find(".SUBCKT Arr5 ").unwrap();
        assert!(first_cell < first_col && first_col < first_group);
        assert!(body.find(".SUBCKT Col0_arr5_oc0 ").unwrap() < first_group);
        assert!(first_group < next_cell && next_cell < top);

        // Every pass transistor agrees with the pattern.
        let mut ones = 0;
        for oc in 0..OUTPUT_CHANNELS {
            for bit in 0..WEIGHT_BITS {
                for ic in 0..INPUT_CHANNELS {
                    for k in 0..LINES {
                        if (source.pattern)(ic, oc, bit, k) {
                            ones += 1;
                        }
                    }
                }
            }
        }
        assert_eq!(body.matches(" mid_out").count() - 2048 * 6, ones);
        assert_eq!(body.matches("MNM").count(), 2048 * 102);
    }

    #[test]
    fn source_errors_propagate() {
        let err = synthesize_array(&FailingSource, &DeviceConfig::default()).unwrap_err();
        assert!(matches!(
            err,
            NetlistError::Source(RomError::InvalidBit { value: 7, .. })
        ));
    }
}
