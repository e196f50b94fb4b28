//! Line-aware synthesis backend.
//!
//! Assignments whose right-hand side is built purely from `+`, `-`, `^`
//! over signals are materialised directly into the assignment target:
//! the expression is linearised into a signed term record in one walk and
//! the record is emitted in a second pass, with `t - t` and `t ^ t`
//! subtrees cancelled outright. Anything the record cannot express falls
//! back to the shared driver, where deferred subexpression stacks still
//! recycle operand registers for the topmost matching operation.

use alsvid_ir::{Circuit, Line};
use alsvid_syrec::{AssignOp, BinaryOp, Expression, Program, Statement};

use crate::ops;
use crate::settings::SynthesisSettings;
use crate::synthesizer::{SynthesisBackend, Synthesizer};

/// The line-aware backend.
pub struct LineAwareSynthesis;

impl LineAwareSynthesis {
    /// Synthesize `program` into `circ`.
    pub fn synthesize(circ: &mut Circuit, program: &Program, settings: &SynthesisSettings) -> bool {
        Synthesizer::synthesize::<Self>(circ, program, settings)
    }
}

/// One emitted term of a linearised right-hand side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TermOp {
    Add,
    Subtract,
    Exor,
}

impl TermOp {
    fn negated(self) -> Self {
        match self {
            TermOp::Add => TermOp::Subtract,
            TermOp::Subtract => TermOp::Add,
            TermOp::Exor => TermOp::Exor,
        }
    }
}

impl SynthesisBackend for LineAwareSynthesis {
    fn process_statement(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        stmt: &Statement,
    ) -> bool {
        let Statement::Assign(lhs, op, rhs) = stmt else {
            return synth.on_statement::<Self>(circ, stmt);
        };

        // an assignment of the constant 0 is an algebraic no-op
        if let Expression::Numeric(number, _) = rhs {
            if number.evaluate(&synth.loop_map) == 0 {
                return true;
            }
        }

        let mut dest = Vec::new();
        if !synth.get_variables(lhs, &mut dest) {
            return false;
        }

        // the linear record either covers the whole expression, with every
        // term matching the destination width, or the statement takes the
        // shared route before any gate is emitted
        let mut terms = Vec::new();
        if !linearize(synth, rhs, initial_term_op(*op), &mut terms)
            || terms.iter().any(|(_, lines)| lines.len() != dest.len())
        {
            return synth.on_statement::<Self>(circ, stmt);
        }

        let mut ok = true;
        for (term_op, lines) in &terms {
            ok = ok
                && match term_op {
                    TermOp::Add => ops::increase(circ, &dest, lines),
                    TermOp::Subtract => ops::decrease(circ, &dest, lines),
                    TermOp::Exor => ops::bitwise_cnot(circ, &dest, lines),
                };
        }
        ok
    }

    fn assign_add(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        let mut ok = if synth.deferred {
            synth.deferred = false;
            let lhs = synth.exp_lhss.last().cloned().unwrap_or_default();
            let rhs = synth.exp_rhss.last().cloned().unwrap_or_default();
            let ok = ops::increase(circ, dest, &lhs) && ops::increase(circ, dest, &rhs);
            pop_deferred(synth);
            ok
        } else {
            ops::increase(circ, dest, src)
        };

        while !synth.exp_ops.is_empty() && ok {
            ok = undo_deferred(synth, circ);
        }
        ok
    }

    fn assign_subtract(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        let mut ok = if synth.deferred {
            synth.deferred = false;
            let lhs = synth.exp_lhss.last().cloned().unwrap_or_default();
            let rhs = synth.exp_rhss.last().cloned().unwrap_or_default();
            let ok = ops::decrease(circ, dest, &lhs) && ops::increase(circ, dest, &rhs);
            pop_deferred(synth);
            ok
        } else {
            ops::decrease(circ, dest, src)
        };

        while !synth.exp_ops.is_empty() && ok {
            ok = undo_deferred(synth, circ);
        }
        ok
    }

    fn assign_exor(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool {
        let mut ok = if synth.deferred {
            synth.deferred = false;
            let lhs = synth.exp_lhss.last().cloned().unwrap_or_default();
            let rhs = synth.exp_rhss.last().cloned().unwrap_or_default();
            let ok = ops::bitwise_cnot(circ, dest, &lhs) && ops::bitwise_cnot(circ, dest, &rhs);
            pop_deferred(synth);
            ok
        } else {
            ops::bitwise_cnot(circ, dest, src)
        };

        while !synth.exp_ops.is_empty() && ok {
            ok = undo_deferred(synth, circ);
        }
        ok
    }

    fn exp_add(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        _bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        // fold into the right operand's registers, no ancillas
        let ok = ops::increase(circ, rhs, lhs);
        out.clear();
        out.extend_from_slice(rhs);
        ok
    }

    fn exp_subtract(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        _bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        let ok = decrease_new_assign(circ, rhs, lhs);
        out.clear();
        out.extend_from_slice(rhs);
        ok
    }

    fn exp_exor(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        _bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        let ok = ops::bitwise_cnot(circ, rhs, lhs);
        out.clear();
        out.extend_from_slice(rhs);
        ok
    }

    fn op_rhs_lhs_expression(
        synth: &mut Synthesizer,
        expr: &Expression,
        v: &mut Vec<Line>,
    ) -> bool {
        match expr {
            Expression::Variable(access) => synth.get_variables(access, v),
            Expression::Binary(lhs, op, rhs) => {
                let mut lhs_lines = Vec::new();
                let mut rhs_lines = Vec::new();
                if !Self::op_rhs_lhs_expression(synth, lhs, &mut lhs_lines)
                    || !Self::op_rhs_lhs_expression(synth, rhs, &mut rhs_lines)
                {
                    return false;
                }
                *v = rhs_lines;
                synth.op_vec.push(*op);
                true
            }
            _ => false,
        }
    }

    fn expression_op_inverse(
        _synth: &mut Synthesizer,
        circ: &mut Circuit,
        op: BinaryOp,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool {
        match op {
            BinaryOp::Add => ops::decrease(circ, rhs, lhs),
            BinaryOp::Subtract => decrease_new_assign(circ, rhs, lhs),
            BinaryOp::Exor => ops::bitwise_cnot(circ, rhs, lhs),
            _ => true,
        }
    }
}

fn initial_term_op(op: AssignOp) -> TermOp {
    match op {
        AssignOp::Add => TermOp::Add,
        AssignOp::Subtract => TermOp::Subtract,
        AssignOp::Exor => TermOp::Exor,
    }
}

/// Record the terms of a `+`/`-`/`^` tree over signals.
///
/// Subtrees of the form `t - t` or `t ^ t` over the same lines contribute
/// nothing and are dropped. Returns `false` when the expression cannot be
/// expressed as such a record.
fn linearize(
    synth: &Synthesizer,
    expr: &Expression,
    mode: TermOp,
    out: &mut Vec<(TermOp, Vec<Line>)>,
) -> bool {
    match expr {
        Expression::Variable(access) => {
            let mut lines = Vec::new();
            if !synth.get_variables(access, &mut lines) {
                return false;
            }
            out.push((mode, lines));
            true
        }

        Expression::Numeric(number, _) => {
            // only the vanishing constant stays ancilla-free
            number.evaluate(&synth.loop_map) == 0
        }

        Expression::Binary(lhs, op, rhs) => {
            if cancels(synth, *op, lhs, rhs) {
                return true;
            }
            match (mode, op) {
                (TermOp::Add | TermOp::Subtract, BinaryOp::Add) => {
                    linearize(synth, lhs, mode, out) && linearize(synth, rhs, mode, out)
                }
                (TermOp::Add | TermOp::Subtract, BinaryOp::Subtract) => {
                    linearize(synth, lhs, mode, out) && linearize(synth, rhs, mode.negated(), out)
                }
                (TermOp::Exor, BinaryOp::Exor) => {
                    linearize(synth, lhs, mode, out) && linearize(synth, rhs, mode, out)
                }
                _ => false,
            }
        }

        Expression::Shift(..) => false,
    }
}

/// Whether `lhs op rhs` vanishes: both sides resolve to the same lines
/// under a self-cancelling operator.
fn cancels(synth: &Synthesizer, op: BinaryOp, lhs: &Expression, rhs: &Expression) -> bool {
    if !matches!(op, BinaryOp::Subtract | BinaryOp::Exor) {
        return false;
    }
    let (Expression::Variable(a), Expression::Variable(b)) = (lhs, rhs) else {
        return false;
    };
    let mut lhs_lines = Vec::new();
    let mut rhs_lines = Vec::new();
    synth.get_variables(a, &mut lhs_lines)
        && synth.get_variables(b, &mut rhs_lines)
        && lhs_lines == rhs_lines
}

/// `dest = src - dest`: subtraction leaving the negated difference
/// reordered onto `dest` for a pending reassignment.
fn decrease_new_assign(circ: &mut Circuit, dest: &[Line], src: &[Line]) -> bool {
    if src.len() != dest.len() {
        return false;
    }

    for &line in src {
        circ.append_not(line);
    }
    if !ops::increase(circ, dest, src) {
        return false;
    }
    for &line in src {
        circ.append_not(line);
    }
    for &line in dest {
        circ.append_not(line);
    }
    true
}

fn pop_deferred(synth: &mut Synthesizer) {
    synth.exp_ops.pop();
    synth.exp_lhss.pop();
    synth.exp_rhss.pop();
}

/// Undo the topmost deferred subexpression, restoring its operand
/// registers.
fn undo_deferred(synth: &mut Synthesizer, circ: &mut Circuit) -> bool {
    let Some(op) = synth.exp_ops.last().copied() else {
        return true;
    };
    let lhs = synth.exp_lhss.last().cloned().unwrap_or_default();
    let rhs = synth.exp_rhss.last().cloned().unwrap_or_default();
    let ok = LineAwareSynthesis::expression_op_inverse(synth, circ, op, &lhs, &rhs);
    pop_deferred(synth);
    ok
}
