//! Streaming emission of subcircuits into netlist text.

use crate::error::NetlistError;
use crate::node::Subckt;
use std::collections::HashMap;

/// Accumulates rendered subcircuits in emission order.
///
/// Subcircuits must be emitted callee first. Every instance of an already
/// emitted subcircuit is checked against the callee's port width; calls to
/// external primitives are passed through unchecked.
#[derive(Debug, Default)]
pub struct NetlistWriter {
    out: String,
    widths: HashMap<String, usize>,
    devices: usize,
}

impl NetlistWriter {
    /// Creates an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks and renders one subcircuit.
    pub fn emit(&mut self, subckt: &Subckt) -> Result<(), NetlistError> {
        if self.widths.contains_key(&subckt.name) {
            return Err(NetlistError::DuplicateSubckt(subckt.name.clone()));
        }
        for (instance, nets, callee) in subckt.instances() {
            if let Some(&expected) = self.widths.get(callee) {
                let got: usize = nets.iter().map(|n| crate::node::bus_width(n)).sum();
                if got != expected {
                    return Err(NetlistError::WidthMismatch {
                        parent: subckt.name.clone(),
                        instance: instance.to_string(),
                        subckt: callee.to_string(),
                        expected,
                        got,
                    });
                }
            }
        }
        self.out.push_str(&subckt.to_string());
        self.widths.insert(subckt.name.clone(), subckt.port_width());
        self.devices += subckt.device_count();
        Ok(())
    }

    /// Number of subcircuits emitted so far.
    pub fn subckt_count(&self) -> usize {
        self.widths.len()
    }

    /// Number of transistors emitted so far.
    pub fn device_count(&self) -> usize {
        self.devices
    }

    /// Returns the rendered text.
    pub fn finish(self) -> String {
        self.out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{Statement, SubcktKind};

    fn leaf(name: &str, ports: &[&str]) -> Subckt {
        Subckt {
            kind: SubcktKind::Cell,
            name: name.to_string(),
            ports: vec![ports.iter().map(|p| p.to_string()).collect()],
            pininfo: vec![],
            statements: vec![],
        }
    }

    fn caller(callee: &str, nets: &[&str]) -> Subckt {
        Subckt {
            kind: SubcktKind::Column,
            name: "Top".to_string(),
            ports: vec![vec!["A".to_string()]],
            pininfo: vec![],
            statements: vec![Statement::Instance {
                name: "XI0".to_string(),
                nets: nets.iter().map(|n| n.to_string()).collect(),
                subckt: callee.to_string(),
            }],
        }
    }

    #[test]
    fn matching_widths_pass() {
        let mut writer = NetlistWriter::new();
        writer.emit(&leaf("Leaf", &["OUT", "IN<0:15>"])).unwrap();
        writer.emit(&caller("Leaf", &["X<3>", "BUS<16:31>"])).unwrap();
        assert_eq!(writer.subckt_count(), 2);
        let text = writer.finish();
        assert!(text.find(".SUBCKT Leaf").unwrap() < text.find(".SUBCKT Top").unwrap());
    }

    #[test]
    fn width_mismatch_rejected() {
        let mut writer = NetlistWriter::new();
        writer.emit(&leaf("Leaf", &["OUT", "IN<0:15>"])).unwrap();
        let err = writer.emit(&caller("Leaf", &["X", "BUS<0:14>"])).unwrap_err();
        assert!(matches!(
            err,
            NetlistError::WidthMismatch {
                expected: 17,
                got: 16,
                ..
            }
        ));
    }

    #[test]
    fn primitives_are_not_checked() {
        let mut writer = NetlistWriter::new();
        writer.emit(&caller("AdderTree_domino", &["A"])).unwrap();
    }

    #[test]
    fn duplicate_rejected() {
        let mut writer = NetlistWriter::new();
        writer.emit(&leaf("Leaf", &["A"])).unwrap();
        let err = writer.emit(&leaf("Leaf", &["A"])).unwrap_err();
        assert!(matches!(err, NetlistError::DuplicateSubckt(ref n) if n == "Leaf"));
    }
}
