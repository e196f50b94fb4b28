//! QASM3 emitter for reversible circuits.

use alsvid_ir::{Circuit, Gate, GateId, GateKind};

use crate::error::QasmResult;

/// Emit a circuit as QASM3 source code.
pub fn emit(circuit: &Circuit) -> QasmResult<String> {
    let mut emitter = Emitter::new();
    emitter.emit_circuit(circuit)
}

/// QASM3 emitter.
struct Emitter {
    output: String,
}

impl Emitter {
    fn new() -> Self {
        Self {
            output: String::new(),
        }
    }

    fn writeln(&mut self, line: &str) {
        self.output.push_str(line);
        self.output.push('\n');
    }

    fn emit_circuit(&mut self, circuit: &Circuit) -> QasmResult<String> {
        self.writeln("OPENQASM 3.0;");
        self.writeln("");

        let lines = circuit.lines();
        if lines > 0 {
            self.writeln(&format!("qubit[{lines}] q;"));
        }

        // line metadata as comments: constants are ancillas, garbage
        // outputs are discarded
        for line in 0..lines {
            let index = line as usize;
            let mut notes = Vec::new();
            if let Some(value) = circuit.constants()[index] {
                notes.push(format!("ancilla={}", u8::from(value)));
            }
            if circuit.garbage()[index] {
                notes.push("garbage".into());
            }
            if !notes.is_empty() {
                self.writeln(&format!(
                    "// q[{line}] {} ({} -> {})",
                    notes.join(" "),
                    circuit.inputs()[index],
                    circuit.outputs()[index],
                ));
            }
        }

        if lines > 0 {
            self.writeln("");
        }

        for (index, gate) in circuit.gates().enumerate() {
            let line = self.format_gate(gate);
            match circuit.annotations(GateId(index)) {
                Some(annotations) => {
                    let notes: Vec<String> = annotations
                        .iter()
                        .map(|(key, value)| format!("{key}={value}"))
                        .collect();
                    self.writeln(&format!("{line} // {}", notes.join(" ")));
                }
                None => self.writeln(&line),
            }
        }

        Ok(std::mem::take(&mut self.output))
    }

    fn format_gate(&self, gate: &Gate) -> String {
        let controls: Vec<String> = gate.controls().map(|l| format!("q[{l}]")).collect();
        let targets: Vec<String> = gate.targets().map(|l| format!("q[{l}]")).collect();
        let operands = controls
            .iter()
            .chain(targets.iter())
            .cloned()
            .collect::<Vec<_>>()
            .join(", ");

        match (gate.kind(), controls.len()) {
            (GateKind::Toffoli, 0) => format!("x {operands};"),
            (GateKind::Toffoli, 1) => format!("cx {operands};"),
            (GateKind::Toffoli, 2) => format!("ccx {operands};"),
            (GateKind::Toffoli, k) => format!("ctrl({k}) @ x {operands};"),
            (GateKind::Fredkin, 0) => format!("swap {operands};"),
            (GateKind::Fredkin, 1) => format!("cswap {operands};"),
            (GateKind::Fredkin, k) => format!("ctrl({k}) @ swap {operands};"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_emit_gate_lines() {
        let mut circuit = Circuit::new();
        circuit.set_lines(4);
        circuit.append_not(0).unwrap();
        circuit.append_cnot(1, 0).unwrap();
        circuit.append_toffoli(1, 2, 0).unwrap();
        circuit
            .append_multi_control_toffoli(&[1, 2, 3].into_iter().collect(), 0)
            .unwrap();
        circuit.append_fredkin(0, 1).unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.starts_with("OPENQASM 3.0;"));
        assert!(qasm.contains("qubit[4] q;"));
        assert!(qasm.contains("x q[0];"));
        assert!(qasm.contains("cx q[1], q[0];"));
        assert!(qasm.contains("ccx q[1], q[2], q[0];"));
        assert!(qasm.contains("ctrl(3) @ x q[1], q[2], q[3], q[0];"));
        assert!(qasm.contains("swap q[0], q[1];"));
    }

    #[test]
    fn test_controlled_swap() {
        let mut circuit = Circuit::new();
        circuit.set_lines(3);
        circuit.activate_scope();
        circuit.register_control(2);
        circuit.append_fredkin(0, 1).unwrap();
        circuit.deactivate_scope();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("cswap q[2], q[0], q[1];"));
    }

    #[test]
    fn test_metadata_and_annotations() {
        let mut circuit = Circuit::new();
        circuit.set_lines(1);
        circuit.add_line("const_0", "garbage", Some(false), true);

        circuit.set_or_update_global_annotation("module", "main");
        circuit.append_not(1).unwrap();

        let qasm = emit(&circuit).unwrap();
        assert!(qasm.contains("// q[1] ancilla=0 garbage (const_0 -> garbage)"));
        assert!(qasm.contains("x q[1]; // module=main"));
    }
}
