//! Naive bit-flipping circuit evaluation.
//!
//! Applies each gate of a circuit to a classical bit pattern in emission
//! order. This is the reference semantics used by the test suites and by
//! the CLI `simulate` command; it performs no optimisation.

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};

/// Apply a single gate to a bit pattern in place.
pub fn apply_gate(gate: &Gate, bits: &mut [bool]) {
    let fires = gate.controls().all(|c| bits[c as usize]);
    if !fires {
        return;
    }

    match gate.kind() {
        GateKind::Toffoli => {
            let target = gate.targets().next().expect("toffoli has one target");
            bits[target as usize] = !bits[target as usize];
        }
        GateKind::Fredkin => {
            let mut targets = gate.targets();
            let t1 = targets.next().expect("fredkin has two targets") as usize;
            let t2 = targets.next().expect("fredkin has two targets") as usize;
            bits.swap(t1, t2);
        }
    }
}

/// Run `circuit` on `input`, returning the output pattern.
///
/// `input[i]` is the initial value of line `i`; constant-line initial values
/// are the caller's responsibility (synthesized circuits expect their
/// declared constants).
pub fn simulate(circuit: &Circuit, input: &[bool]) -> IrResult<Vec<bool>> {
    if input.len() != circuit.lines() as usize {
        return Err(IrError::WidthMismatch {
            expected: circuit.lines() as usize,
            got: input.len(),
        });
    }

    let mut bits = input.to_vec();
    for gate in circuit.gates() {
        apply_gate(gate, &mut bits);
    }
    Ok(bits)
}
