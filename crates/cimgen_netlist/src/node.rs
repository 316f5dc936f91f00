//! Netlist node model and its SPICE text form.
//!
//! A [`Subckt`] is built once, bottom-up, and rendered immediately through
//! its `Display` implementation:
//!
//! ```text
//! .SUBCKT Col3_arr1_oc0 OUT<0:4> IN<0:255>
//! + RSTN VDD VSS row_2level<0:5> row_en<0:15> sign_inv<0:15>
//! *.PININFO IN<0:255>:I RSTN:I VDD:I VSS:I row_2level<0:5>:I row_en<0:15>:I sign_inv<0:15>:I
//! *.PININFO OUT<0:4>:O
//! XI0 Cell_out<0> IN<0:15> RSTN VDD VSS row_2level<0:5> row_en<0:15> / Cell_arr1_ic0_col3_oc0
//! .ENDS
//! ```

use std::fmt;

/// Comment line separating subcircuits in the emitted netlist.
pub const SEPARATOR: &str =
    "************************************************************************";

/// The level of the hierarchy a subcircuit belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubcktKind {
    /// One 96-transistor storage cell.
    Cell,
    /// Sixteen cells of one bit position plus their adder tree.
    Column,
    /// Eight columns of one output channel plus the bit shifter.
    OcGroup,
    /// Sixteen output-channel groups.
    Array,
}

/// Direction annotation of a `*.PININFO` entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PinDirection {
    /// `:I`
    Input,
    /// `:O`
    Output,
}

/// One `*.PININFO` entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pin {
    /// Net or bus name.
    pub name: String,
    /// Direction annotation.
    pub direction: PinDirection,
}

impl Pin {
    /// An input pin.
    pub fn input(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PinDirection::Input,
        }
    }

    /// An output pin.
    pub fn output(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            direction: PinDirection::Output,
        }
    }
}

impl fmt::Display for Pin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let dir = match self.direction {
            PinDirection::Input => "I",
            PinDirection::Output => "O",
        };
        write!(f, "{}:{dir}", self.name)
    }
}

/// A statement in a subcircuit body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    /// A MOSFET: `name drain gate source bulk model k=v ...`.
    Device {
        /// Device name (`MNM0`, `MPM1`, ...).
        name: String,
        /// Drain, gate, source and bulk nets.
        nets: Vec<String>,
        /// Transistor model.
        model: String,
        /// Sizing parameters in emission order.
        params: Vec<(String, String)>,
    },
    /// A subcircuit call: `name nets... / subckt`.
    Instance {
        /// Instance name (`XI0`, ...).
        name: String,
        /// Connected nets, in the callee's port order.
        nets: Vec<String>,
        /// Called subcircuit or primitive.
        subckt: String,
    },
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Statement::Device {
                name,
                nets,
                model,
                params,
            } => {
                write!(f, "{name} {} {model}", nets.join(" "))?;
                for (key, value) in params {
                    write!(f, " {key}={value}")?;
                }
                Ok(())
            }
            Statement::Instance { name, nets, subckt } => {
                write!(f, "{name} {} / {subckt}", nets.join(" "))
            }
        }
    }
}

/// A subcircuit definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Subckt {
    /// Hierarchy level.
    pub kind: SubcktKind,
    /// Subcircuit name.
    pub name: String,
    /// Ports, one group per header line; later groups use `+` continuations.
    pub ports: Vec<Vec<String>>,
    /// Pin annotations, one group per `*.PININFO` line.
    pub pininfo: Vec<Vec<Pin>>,
    /// Body statements in emission order.
    pub statements: Vec<Statement>,
}

impl Subckt {
    /// Total number of wires across all declared ports.
    pub fn port_width(&self) -> usize {
        self.ports.iter().flatten().map(|p| bus_width(p)).sum()
    }

    /// Number of transistor statements.
    pub fn device_count(&self) -> usize {
        self.statements
            .iter()
            .filter(|s| matches!(s, Statement::Device { .. }))
            .count()
    }

    /// Iterates over `(instance name, nets, callee)` of every instance.
    pub fn instances(&self) -> impl Iterator<Item = (&str, &[String], &str)> {
        self.statements.iter().filter_map(|s| match s {
            Statement::Instance { name, nets, subckt } => {
                Some((name.as_str(), nets.as_slice(), subckt.as_str()))
            }
            Statement::Device { .. } => None,
        })
    }
}

impl fmt::Display for Subckt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            SubcktKind::Cell => writeln!(f, "****Sub-Circuit for {}*****", self.name)?,
            _ => writeln!(f, "{SEPARATOR}")?,
        }
        write!(f, ".SUBCKT {}", self.name)?;
        for (index, group) in self.ports.iter().enumerate() {
            if index == 0 {
                write!(f, " {}", group.join(" "))?;
            } else {
                write!(f, "\n+ {}", group.join(" "))?;
            }
        }
        writeln!(f)?;
        for line in &self.pininfo {
            write!(f, "*.PININFO")?;
            for pin in line {
                write!(f, " {pin}")?;
            }
            writeln!(f)?;
        }
        for statement in &self.statements {
            writeln!(f, "{statement}")?;
        }
        writeln!(f, ".ENDS")
    }
}

/// Number of wires named by a net expression.
///
/// Handles scalars (`RSTN`), single bits (`IN<3>`), ranges in either
/// direction (`IN<16:31>`, `b<4:0>`) and comma-joined lists
/// (`SUM<0>,b0<1:4>`). Anything unparsable counts as one wire.
pub fn bus_width(net: &str) -> usize {
    net.split(',').map(single_width).sum()
}

fn single_width(net: &str) -> usize {
    let range = net
        .find('<')
        .filter(|_| net.ends_with('>'))
        .map(|open| &net[open + 1..net.len() - 1]);
    match range.and_then(|r| r.split_once(':')) {
        Some((a, b)) => match (a.parse::<usize>(), b.parse::<usize>()) {
            (Ok(a), Ok(b)) => a.abs_diff(b) + 1,
            _ => 1,
        },
        None => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_widths() {
        assert_eq!(bus_width("RSTN"), 1);
        assert_eq!(bus_width("IN<3>"), 1);
        assert_eq!(bus_width("IN<16:31>"), 16);
        assert_eq!(bus_width("b7<5:0>"), 6);
        assert_eq!(bus_width("SUM<0>,b0<1:4>"), 5);
        assert_eq!(bus_width("weird<a:b>"), 1);
    }

    #[test]
    fn device_and_instance_lines() {
        let device = Statement::Device {
            name: "MNM3".to_string(),
            nets: vec!["net3", "row_en<3>", "IN<3>", "VSS"]
                .into_iter()
                .map(String::from)
                .collect(),
            model: "nhvt09_ckt".to_string(),
            params: vec![
                ("m".to_string(), "1".to_string()),
                ("l".to_string(), "40n".to_string()),
            ],
        };
        assert_eq!(
            device.to_string(),
            "MNM3 net3 row_en<3> IN<3> VSS nhvt09_ckt m=1 l=40n"
        );

        let instance = Statement::Instance {
            name: "XI8".to_string(),
            nets: vec!["SUM<1:12>".to_string(), "VDD".to_string()],
            subckt: "Bit_shifter_full".to_string(),
        };
        assert_eq!(instance.to_string(), "XI8 SUM<1:12> VDD / Bit_shifter_full");
    }

    #[test]
    fn subckt_rendering() {
        let subckt = Subckt {
            kind: SubcktKind::Column,
            name: "Top".to_string(),
            ports: vec![
                vec!["A".to_string(), "B<0:1>".to_string()],
                vec!["VDD".to_string()],
            ],
            pininfo: vec![vec![Pin::input("B<0:1>"), Pin::output("A")]],
            statements: vec![Statement::Instance {
                name: "XI0".to_string(),
                nets: vec!["A".to_string()],
                subckt: "Leaf".to_string(),
            }],
        };
        let expected = format!(
            "{SEPARATOR}\n.SUBCKT Top A B<0:1>\n+ VDD\n*.PININFO B<0:1>:I A:O\nXI0 A / Leaf\n.ENDS\n"
        );
        assert_eq!(subckt.to_string(), expected);
        assert_eq!(subckt.port_width(), 4);
        assert_eq!(subckt.device_count(), 0);
        assert_eq!(subckt.instances().count(), 1);
    }

    #[test]
    fn cell_banner() {
        let subckt = Subckt {
            kind: SubcktKind::Cell,
            name: "Cell_arr1_ic0_col7_oc0".to_string(),
            ports: vec![vec!["Cell_out".to_string()]],
            pininfo: vec![],
            statements: vec![],
        };
        assert!(subckt
            .to_string()
            .starts_with("****Sub-Circuit for Cell_arr1_ic0_col7_oc0*****\n.SUBCKT"));
    }

    #[test]
    fn separator_is_72_stars() {
        assert_eq!(SEPARATOR.len(), 72);
        assert!(SEPARATOR.chars().all(|c| c == '*'));
    }
}
