//! Shared synthesis driver.
//!
//! Walks the SyReC tree and emits gates through the circuit builder. The
//! parts where the two backends differ (assignments and the `+`, `-`, `^`
//! expression operators) are routed through [`SynthesisBackend`]; control
//! flow, variable allocation, and the remaining operators live here.

use std::rc::Rc;

use rustc_hash::FxHashMap;
use tracing::debug;

use alsvid_ir::{Circuit, Line};
use alsvid_syrec::{
    AssignOp, BinaryOp, Expression, LoopMap, Program, ShiftOp, Statement, UnaryOp, Variable,
    VariableAccess, VariableKind,
};

use crate::ops;
use crate::settings::SynthesisSettings;

/// Where a variable's lines live.
#[derive(Debug, Clone)]
struct VarBinding {
    var: Rc<Variable>,
    offset: Line,
}

/// Backend seam: the operations that differ between the line-aware and the
/// cost-aware synthesis.
pub trait SynthesisBackend: Sized {
    /// Process one statement. The default routes through the shared
    /// driver; backends may intercept specific statement shapes first.
    fn process_statement(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        stmt: &Statement,
    ) -> bool {
        synth.on_statement::<Self>(circ, stmt)
    }

    /// `dest += src` at the statement level.
    fn assign_add(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool;

    /// `dest -= src` at the statement level.
    fn assign_subtract(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool;

    /// `dest ^= src` at the statement level.
    fn assign_exor(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        dest: &[Line],
        src: &[Line],
    ) -> bool;

    /// Materialise `lhs + rhs`, leaving the result lines in `out`.
    fn exp_add(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool;

    /// Materialise `lhs - rhs`, leaving the result lines in `out`.
    fn exp_subtract(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool;

    /// Materialise `lhs ^ rhs`, leaving the result lines in `out`.
    fn exp_exor(
        synth: &mut Synthesizer,
        circ: &mut Circuit,
        bitwidth: u32,
        out: &mut Vec<Line>,
        lhs: &[Line],
        rhs: &[Line],
    ) -> bool;

    /// Record the operator spine of an assignment's right-hand side.
    fn op_rhs_lhs_expression(
        _synth: &mut Synthesizer,
        _expr: &Expression,
        _v: &mut Vec<Line>,
    ) -> bool {
        true
    }

    /// Undo a deferred subexpression.
    fn expression_op_inverse(
        _synth: &mut Synthesizer,
        _circ: &mut Circuit,
        _op: BinaryOp,
        _lhs: &[Line],
        _rhs: &[Line],
    ) -> bool {
        true
    }
}

/// Synthesis state shared by both backends.
pub struct Synthesizer {
    program: Program,
    settings: SynthesisSettings,
    /// Binding environments, one frame per active module invocation.
    env: Vec<FxHashMap<String, VarBinding>>,
    /// Lines of `state` variables, shared across invocations of a module.
    state_lines: FxHashMap<(String, String), Line>,
    /// Name of the module owning the current frame.
    module_names: Vec<String>,
    /// Freed constant lines, by current value.
    free_const_lines: [Vec<Line>; 2],
    /// Active loop-variable bindings.
    pub(crate) loop_map: LoopMap,
    /// Deferred subexpression stacks (consumed by the line-aware backend).
    pub(crate) exp_ops: Vec<BinaryOp>,
    pub(crate) exp_lhss: Vec<Vec<Line>>,
    pub(crate) exp_rhss: Vec<Vec<Line>>,
    /// Operator spine of the current assignment's right-hand side.
    pub(crate) op_vec: Vec<BinaryOp>,
    /// Whether the topmost stack entry was left unsynthesized for the
    /// backend's assignment step.
    pub(crate) deferred: bool,
}

impl Synthesizer {
    fn new(program: Program, settings: SynthesisSettings) -> Self {
        Self {
            program,
            settings,
            env: Vec::new(),
            state_lines: FxHashMap::default(),
            module_names: Vec::new(),
            free_const_lines: [Vec::new(), Vec::new()],
            loop_map: LoopMap::default(),
            exp_ops: Vec::new(),
            exp_lhss: Vec::new(),
            exp_rhss: Vec::new(),
            op_vec: Vec::new(),
            deferred: false,
        }
    }

    /// Synthesize `program` into `circ` with backend `B`.
    ///
    /// Returns `false` on any contract violation; the circuit is then in a
    /// well-defined but partial state.
    pub fn synthesize<B: SynthesisBackend>(
        circ: &mut Circuit,
        program: &Program,
        settings: &SynthesisSettings,
    ) -> bool {
        let main = match &settings.main_module {
            Some(name) => program.find_module(name),
            None => program.find_module("main").or_else(|| program.modules.first()),
        };
        let Some(main) = main.cloned() else {
            return false;
        };

        debug!(module = %main.name, "synthesizing module");

        let mut synth = Self::new(program.clone(), settings.clone());
        synth.enter_module(circ, &main.name);
        synth.add_variables(circ, &main.parameters);
        synth.add_variables(circ, &main.variables);

        let mut ok = true;
        for stmt in &main.statements {
            if !B::process_statement(&mut synth, circ, stmt) {
                ok = false;
                break;
            }
        }
        synth.leave_module(circ);
        ok
    }

    fn enter_module(&mut self, circ: &mut Circuit, name: &str) {
        self.env.push(FxHashMap::default());
        self.module_names.push(name.to_string());
        circ.set_or_update_global_annotation("module", name);
    }

    fn leave_module(&mut self, circ: &mut Circuit) {
        self.env.pop();
        self.module_names.pop();
        match self.module_names.last() {
            Some(outer) => {
                circ.set_or_update_global_annotation("module", outer.clone());
            }
            None => {
                circ.remove_global_annotation("module");
            }
        }
    }

    // =========================================================================
    // Statements
    // =========================================================================

    /// Shared statement dispatch.
    pub fn on_statement<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        stmt: &Statement,
    ) -> bool {
        match stmt {
            Statement::Skip => true,

            Statement::Swap(lhs, rhs) => {
                let mut lhs_lines = Vec::new();
                let mut rhs_lines = Vec::new();
                if !self.get_variables(lhs, &mut lhs_lines)
                    || !self.get_variables(rhs, &mut rhs_lines)
                    || lhs_lines.len() != rhs_lines.len()
                {
                    return false;
                }
                ops::swap(circ, &lhs_lines, &rhs_lines)
            }

            Statement::Unary(op, var) => {
                let mut lines = Vec::new();
                if !self.get_variables(var, &mut lines) {
                    return false;
                }
                match op {
                    UnaryOp::Invert => ops::bitwise_negation(circ, &lines),
                    UnaryOp::Increment => ops::increment(circ, &lines),
                    UnaryOp::Decrement => ops::decrement(circ, &lines),
                }
            }

            Statement::Assign(lhs, op, rhs) => self.on_assign::<B>(circ, lhs, *op, rhs),

            Statement::If {
                condition,
                then_statements,
                else_statements,
                ..
            } => self.on_if::<B>(circ, condition, then_statements, else_statements),

            Statement::For {
                loop_variable,
                range,
                step,
                statements,
                ..
            } => self.on_for::<B>(circ, loop_variable, range, step, statements),

            Statement::Call { module, arguments } => {
                self.on_call::<B>(circ, module, arguments, false)
            }
            Statement::Uncall { module, arguments } => {
                self.on_call::<B>(circ, module, arguments, true)
            }
        }
    }

    fn on_assign<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        lhs: &VariableAccess,
        op: AssignOp,
        rhs: &Expression,
    ) -> bool {
        let mut lhs_lines = Vec::new();
        if !self.get_variables(lhs, &mut lhs_lines) {
            return false;
        }

        // the spine feeds the deferred-evaluation check; a right-hand side
        // it cannot record simply synthesizes eagerly
        let mut spine = Vec::new();
        let _ = B::op_rhs_lhs_expression(self, rhs, &mut spine);
        self.deferred = false;

        let mut rhs_lines = Vec::new();
        let ok = self.on_expression::<B>(
            circ,
            rhs,
            &mut rhs_lines,
            &lhs_lines,
            Some(assign_as_binary(op)),
        );
        self.op_vec.clear();
        if !ok {
            self.clear_expression_stacks();
            return false;
        }

        let ok = match op {
            AssignOp::Add => B::assign_add(self, circ, &lhs_lines, &rhs_lines),
            AssignOp::Subtract => B::assign_subtract(self, circ, &lhs_lines, &rhs_lines),
            AssignOp::Exor => B::assign_exor(self, circ, &lhs_lines, &rhs_lines),
        };
        self.clear_expression_stacks();
        ok
    }

    fn on_if<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        condition: &Expression,
        then_statements: &[Statement],
        else_statements: &[Statement],
    ) -> bool {
        let mut cond_lines = Vec::new();
        let ok = self.on_expression::<B>(circ, condition, &mut cond_lines, &[], None);
        // condition subexpressions are not statement operands
        self.clear_expression_stacks();
        if !ok {
            return false;
        }

        // multi-bit conditions collapse onto a fresh helper that holds
        // `condition != 0`
        let helper = if cond_lines.len() == 1 {
            cond_lines[0]
        } else {
            let helper = self.get_constant_line(circ, false);
            for &line in &cond_lines {
                circ.append_not(line);
            }
            let controls = cond_lines.iter().copied().collect();
            circ.append_multi_control_toffoli(&controls, helper);
            for &line in &cond_lines {
                circ.append_not(line);
            }
            circ.append_not(helper);
            helper
        };

        circ.activate_scope();
        circ.register_control(helper);

        for stmt in then_statements {
            if !B::process_statement(self, circ, stmt) {
                circ.deactivate_scope();
                return false;
            }
        }

        // toggle the condition line outside its own control scope
        circ.deregister_control(helper);
        circ.append_not(helper);
        circ.register_control(helper);

        for stmt in else_statements {
            if !B::process_statement(self, circ, stmt) {
                circ.deactivate_scope();
                return false;
            }
        }

        // restore the condition line
        circ.deregister_control(helper);
        circ.append_not(helper);
        circ.deactivate_scope();
        true
    }

    fn on_for<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        loop_variable: &str,
        range: &(alsvid_syrec::Number, alsvid_syrec::Number),
        step: &alsvid_syrec::Number,
        statements: &[Statement],
    ) -> bool {
        let from = range.0.evaluate(&self.loop_map);
        let to = range.1.evaluate(&self.loop_map);
        let step = step.evaluate(&self.loop_map).max(1);

        let mut ok = true;
        let mut body = |synth: &mut Self, i: u32| -> bool {
            if !loop_variable.is_empty() {
                synth.loop_map.insert(loop_variable.to_string(), i);
            }
            statements
                .iter()
                .all(|stmt| B::process_statement(synth, circ, stmt))
        };

        if from <= to {
            let mut i = from;
            while i <= to && ok {
                ok = body(self, i);
                match i.checked_add(step) {
                    Some(next) => i = next,
                    None => break,
                }
            }
        } else {
            let mut i = from;
            loop {
                ok = body(self, i);
                if !ok || i <= to || i - to < step {
                    break;
                }
                i -= step;
            }
        }

        if !loop_variable.is_empty() {
            self.loop_map.remove(loop_variable);
        }
        ok
    }

    fn on_call<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        module: &str,
        arguments: &[String],
        uncall: bool,
    ) -> bool {
        let Some(target) = self.program.find_module(module).cloned() else {
            return false;
        };
        if target.parameters.len() != arguments.len() {
            return false;
        }

        // bind caller arguments into the callee's parameter slots without
        // touching the tree
        let mut frame = FxHashMap::default();
        for (param, arg) in target.parameters.iter().zip(arguments) {
            let Some(binding) = self.env.last().and_then(|f| f.get(arg)).cloned() else {
                return false;
            };
            frame.insert(param.name.clone(), binding);
        }

        self.env.push(frame);
        self.module_names.push(module.to_string());
        circ.set_or_update_global_annotation("module", module);
        self.add_variables(circ, &target.variables);

        let mut ok = true;
        if uncall {
            for stmt in target.statements.iter().rev() {
                let reversed = stmt.reverse();
                if !B::process_statement(self, circ, &reversed) {
                    ok = false;
                    break;
                }
            }
        } else {
            for stmt in &target.statements {
                if !B::process_statement(self, circ, stmt) {
                    ok = false;
                    break;
                }
            }
        }

        self.leave_module(circ);
        ok
    }

    // =========================================================================
    // Expressions
    // =========================================================================

    /// Compute an expression into a line list.
    ///
    /// `lhs_stat` carries the assignment target's lines, `assign_op` the
    /// pending assignment operator; a right-hand side whose top operator
    /// matches the pending assignment stays on the deferred stacks for the
    /// backend to consume.
    pub fn on_expression<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        expr: &Expression,
        lines: &mut Vec<Line>,
        lhs_stat: &[Line],
        assign_op: Option<BinaryOp>,
    ) -> bool {
        match expr {
            Expression::Numeric(number, width) => {
                let value = number.evaluate(&self.loop_map);
                self.get_constant_lines(circ, *width, value, lines);
                true
            }

            Expression::Variable(access) => self.get_variables(access, lines),

            Expression::Shift(lhs, op, amount) => {
                let mut lhs_lines = Vec::new();
                if !self.on_expression::<B>(circ, lhs, &mut lhs_lines, lhs_stat, assign_op) {
                    return false;
                }
                let amount = amount.evaluate(&self.loop_map);
                let width = self.expression_width(expr);
                self.get_constant_lines(circ, width, 0, lines);
                match op {
                    ShiftOp::Left => ops::left_shift(circ, lines, &lhs_lines, amount),
                    ShiftOp::Right => ops::right_shift(circ, lines, &lhs_lines, amount),
                }
            }

            Expression::Binary(lhs, op, rhs) => {
                self.on_binary_expression::<B>(circ, lhs, *op, rhs, lines, lhs_stat, assign_op)
            }
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn on_binary_expression<B: SynthesisBackend>(
        &mut self,
        circ: &mut Circuit,
        lhs: &Expression,
        op: BinaryOp,
        rhs: &Expression,
        lines: &mut Vec<Line>,
        lhs_stat: &[Line],
        assign_op: Option<BinaryOp>,
    ) -> bool {
        let mut lhs_lines = Vec::new();
        let mut rhs_lines = Vec::new();
        if !self.on_expression::<B>(circ, lhs, &mut lhs_lines, lhs_stat, assign_op)
            || !self.on_expression::<B>(circ, rhs, &mut rhs_lines, lhs_stat, assign_op)
        {
            return false;
        }

        self.exp_lhss.push(lhs_lines.clone());
        self.exp_rhss.push(rhs_lines.clone());
        self.exp_ops.push(op);

        // leave the topmost matching operation for the backend's
        // assignment step
        if self.exp_ops.len() == self.op_vec.len() && assign_op == Some(op) {
            self.deferred = true;
            return true;
        }

        let width = match op {
            BinaryOp::LogicalAnd
            | BinaryOp::LogicalOr
            | BinaryOp::LessThan
            | BinaryOp::GreaterThan
            | BinaryOp::LessEquals
            | BinaryOp::GreaterEquals
            | BinaryOp::Equals
            | BinaryOp::NotEquals => 1,
            _ => lhs_lines.len() as u32,
        };

        match op {
            BinaryOp::Add => B::exp_add(self, circ, width, lines, &lhs_lines, &rhs_lines),
            BinaryOp::Subtract => B::exp_subtract(self, circ, width, lines, &lhs_lines, &rhs_lines),
            BinaryOp::Exor => B::exp_exor(self, circ, width, lines, &lhs_lines, &rhs_lines),

            BinaryOp::Multiply => {
                self.get_constant_lines(circ, width, 0, lines);
                ops::multiplication(circ, lines, &lhs_lines, &rhs_lines)
            }
            BinaryOp::Divide => {
                self.get_constant_lines(circ, width, 0, lines);
                ops::division(circ, lines, &lhs_lines, &rhs_lines)
            }
            BinaryOp::Modulo => {
                self.get_constant_lines(circ, width, 0, lines);
                let mut quotient = Vec::new();
                self.get_constant_lines(circ, width, 0, &mut quotient);
                ops::bitwise_cnot(circ, lines, &lhs_lines)
                    && ops::modulo(circ, &quotient, lines, &rhs_lines)
            }

            BinaryOp::BitwiseAnd => {
                self.get_constant_lines(circ, width, 0, lines);
                ops::bitwise_and(circ, lines, &lhs_lines, &rhs_lines)
            }
            BinaryOp::BitwiseOr => {
                self.get_constant_lines(circ, width, 0, lines);
                ops::bitwise_or(circ, lines, &lhs_lines, &rhs_lines)
            }

            BinaryOp::LogicalAnd => {
                lines.push(self.get_constant_line(circ, false));
                ops::conjunction(circ, lines[0], lhs_lines[0], rhs_lines[0])
            }
            BinaryOp::LogicalOr => {
                lines.push(self.get_constant_line(circ, false));
                ops::disjunction(circ, lines[0], lhs_lines[0], rhs_lines[0])
            }

            BinaryOp::LessThan => {
                lines.push(self.get_constant_line(circ, false));
                ops::less_than(circ, lines[0], &lhs_lines, &rhs_lines)
            }
            BinaryOp::GreaterThan => {
                lines.push(self.get_constant_line(circ, false));
                ops::greater_than(circ, lines[0], &lhs_lines, &rhs_lines)
            }
            BinaryOp::LessEquals => {
                lines.push(self.get_constant_line(circ, false));
                ops::less_equals(circ, lines[0], &lhs_lines, &rhs_lines)
            }
            BinaryOp::GreaterEquals => {
                lines.push(self.get_constant_line(circ, false));
                ops::greater_equals(circ, lines[0], &lhs_lines, &rhs_lines)
            }
            BinaryOp::Equals => {
                lines.push(self.get_constant_line(circ, false));
                ops::equals(circ, lines[0], &lhs_lines, &rhs_lines)
            }
            BinaryOp::NotEquals => {
                lines.push(self.get_constant_line(circ, false));
                ops::not_equals(circ, lines[0], &lhs_lines, &rhs_lines)
            }

            // no reversible template is defined for the remaining operators
            BinaryOp::FracDivide => false,
        }
    }

    pub(crate) fn clear_expression_stacks(&mut self) {
        self.exp_ops.clear();
        self.exp_lhss.clear();
        self.exp_rhss.clear();
        self.deferred = false;
    }

    // =========================================================================
    // Variables and lines
    // =========================================================================

    /// Resolve an access to its lines through the current binding frame.
    pub fn get_variables(&self, access: &VariableAccess, lines: &mut Vec<Line>) -> bool {
        let Some(binding) = self.env.last().and_then(|f| f.get(&access.name)) else {
            return false;
        };
        let var = &binding.var;
        let mut offset = binding.offset;

        if !access.indexes.is_empty() {
            if access.indexes.len() != var.dimensions.len() {
                return false;
            }
            for (i, index) in access.indexes.iter().enumerate() {
                let Expression::Numeric(number, _) = index else {
                    // dynamic array indexes have no line mapping
                    return false;
                };
                let value = number.evaluate(&self.loop_map);
                if value >= var.dimensions[i] {
                    return false;
                }
                let stride: u32 = var.dimensions[i + 1..].iter().product::<u32>() * var.bitwidth;
                offset += value * stride;
            }
        }

        match &access.range {
            Some((first, second)) => {
                let first = first.evaluate(&self.loop_map);
                let second = second.evaluate(&self.loop_map);
                if first.max(second) >= var.bitwidth {
                    return false;
                }
                if first <= second {
                    for i in first..=second {
                        lines.push(offset + i);
                    }
                } else {
                    for i in (second..=first).rev() {
                        lines.push(offset + i);
                    }
                }
            }
            None => {
                for i in 0..var.bitwidth {
                    lines.push(offset + i);
                }
            }
        }
        true
    }

    /// Width of an expression's value in the current environment.
    pub fn expression_width(&self, expr: &Expression) -> u32 {
        match expr {
            Expression::Numeric(_, width) => *width,
            Expression::Variable(access) => {
                let mut lines = Vec::new();
                if self.get_variables(access, &mut lines) {
                    lines.len() as u32
                } else {
                    0
                }
            }
            Expression::Binary(lhs, op, _) => match op {
                BinaryOp::LogicalAnd
                | BinaryOp::LogicalOr
                | BinaryOp::LessThan
                | BinaryOp::GreaterThan
                | BinaryOp::LessEquals
                | BinaryOp::GreaterEquals
                | BinaryOp::Equals
                | BinaryOp::NotEquals => 1,
                _ => self.expression_width(lhs),
            },
            Expression::Shift(lhs, _, _) => self.expression_width(lhs),
        }
    }

    /// Fetch a line holding `value`, reusing freed constant lines where
    /// possible.
    pub fn get_constant_line(&mut self, circ: &mut Circuit, value: bool) -> Line {
        if let Some(line) = self.free_const_lines[usize::from(value)].pop() {
            return line;
        }
        if let Some(line) = self.free_const_lines[usize::from(!value)].pop() {
            circ.append_not(line);
            return line;
        }
        circ.add_line(
            format!("const_{}", u8::from(value)),
            "garbage",
            Some(value),
            true,
        )
    }

    /// Fetch `width` lines carrying `value`, least significant bit first.
    pub fn get_constant_lines(
        &mut self,
        circ: &mut Circuit,
        width: u32,
        value: u32,
        lines: &mut Vec<Line>,
    ) {
        for i in 0..width {
            lines.push(self.get_constant_line(circ, (value >> i) & 1 == 1));
        }
    }

    /// Return a constant line to the reuse pool.
    pub fn release_constant_line(&mut self, line: Line, value: bool) {
        self.free_const_lines[usize::from(value)].push(line);
    }

    /// Allocate circuit lines for a list of declared variables.
    fn add_variables(&mut self, circ: &mut Circuit, variables: &[Rc<Variable>]) {
        let module = self.module_names.last().cloned().unwrap_or_default();
        for var in variables {
            let state_key = (module.clone(), var.name.clone());
            let offset = if var.kind == VariableKind::State {
                if let Some(&offset) = self.state_lines.get(&state_key) {
                    self.bind(var, offset);
                    continue;
                }
                let offset = circ.lines();
                self.state_lines.insert(state_key, offset);
                offset
            } else {
                circ.lines()
            };

            let constant = matches!(var.kind, VariableKind::Out | VariableKind::Wire)
                .then_some(false);
            let garbage = matches!(var.kind, VariableKind::In | VariableKind::Wire);
            self.add_variable_lines(circ, var, &var.dimensions, constant, garbage, String::new());
            self.bind(var, offset);
        }
    }

    fn bind(&mut self, var: &Rc<Variable>, offset: Line) {
        if let Some(frame) = self.env.last_mut() {
            frame.insert(
                var.name.clone(),
                VarBinding {
                    var: var.clone(),
                    offset,
                },
            );
        }
    }

    fn add_variable_lines(
        &mut self,
        circ: &mut Circuit,
        var: &Variable,
        dimensions: &[u32],
        constant: Option<bool>,
        garbage: bool,
        array: String,
    ) {
        if let Some((&len, rest)) = dimensions.split_first() {
            for i in 0..len {
                self.add_variable_lines(circ, var, rest, constant, garbage, format!("{array}[{i}]"));
            }
            return;
        }
        for i in 0..var.bitwidth {
            let name = self.settings.line_name(&var.name, &array, i);
            circ.add_line(name.clone(), name, constant, garbage);
        }
    }
}

fn assign_as_binary(op: AssignOp) -> BinaryOp {
    match op {
        AssignOp::Add => BinaryOp::Add,
        AssignOp::Subtract => BinaryOp::Subtract,
        AssignOp::Exor => BinaryOp::Exor,
    }
}
