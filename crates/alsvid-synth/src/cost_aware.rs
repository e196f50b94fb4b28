//! Cost-aware synthesis backend.
//!
//! Always materialises expression results into fresh zero-initialised
//! ancillas; no operand reuse, no subexpression cancellation. The gate
//! stream stays close to the textbook templates at the price of extra
//! lines.

use alsvid_ir::{Circuit, Line};
use alsvid_syrec::Program;

use crate::ops;
use crate::settings::SynthesisSettings;
use crate::synthesizer::{SynthesisBackend, Synthesizer};

/// The cost-aware backend.
pub struct CostAwareSynthesis;

impl CostAwareSynthesis {
    /// Synthesize `program` into `circ`.
    pub fn synthesize(circ: &mut Circuit, program: &Program, settings: &SynthesisSettings) -> bool {
        Synthesizer::synthesize::<Self>(circ, program, settings)
    }
}

impl SynthesisBackend for CostAwareSynthesis {
    fn assign_add(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        ops::increase(circ, dest, src)
    }

    fn assign_subtract(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        ops::decrease(circ, dest, src)
    }

    fn assign_exor(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        ops::bitwise_cnot(circ, dest, src)
    }

    fn exp_add(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        synth.get_constant_lines(circ, bitwidth, 0, out);
        ops::bitwise_cnot(circ, out, lhs) && ops::increase(circ, out, rhs)
    }

    fn exp_subtract(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        synth.get_constant_lines(circ, bitwidth, 0, out);
        ops::bitwise_cnot(circ, out, lhs) && ops::decrease(circ, out, rhs)
    }

    fn exp_exor(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        synth.get_constant_lines(circ, bitwidth, 0, out);
        ops::bitwise_cnot(circ, out, lhs) && ops::bitwise_cnot(circ, out, rhs)
    }
}
