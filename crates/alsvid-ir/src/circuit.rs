//! Gate container with control-line propagation scopes.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use crate::gate::{Gate, GateKind, Line, LineSet};

/// Identity of a gate inside one circuit, stable for the circuit's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GateId(pub usize);

/// One frame of the control-line propagation stack.
///
/// A line registered in a frame is attached to every gate emitted while the
/// frame (or a deeper one) is active. A line deregistered in a frame masks
/// registrations of all outer frames until the frame is popped.
#[derive(Debug, Default, Clone)]
struct ScopeFrame {
    registered: LineSet,
    deregistered: LineSet,
}

/// A reversible circuit: an ordered gate list plus per-line metadata.
///
/// All `append_*` constructors validate the emission contract and return
/// `None` without touching the circuit when it is violated. Validation
/// failures are deliberately silent at this layer; callers propagate their
/// own error flags.
#[derive(Debug, Default)]
pub struct Circuit {
    lines: u32,
    gates: Vec<Gate>,
    inputs: Vec<String>,
    outputs: Vec<String>,
    constants: Vec<Option<bool>>,
    garbage: Vec<bool>,
    annotations: FxHashMap<GateId, BTreeMap<String, String>>,
    global_annotations: BTreeMap<String, String>,
    scopes: Vec<ScopeFrame>,
}

impl Circuit {
    /// Create an empty circuit with no lines.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the number of lines, resizing all per-line metadata.
    pub fn set_lines(&mut self, lines: u32) {
        self.lines = lines;
        self.inputs.resize(lines as usize, "i".into());
        self.outputs.resize(lines as usize, "o".into());
        self.constants.resize(lines as usize, None);
        self.garbage.resize(lines as usize, false);
    }

    /// Get the number of lines.
    #[inline]
    pub fn lines(&self) -> u32 {
        self.lines
    }

    /// Add a line with its metadata, returning the new line index.
    pub fn add_line(
        &mut self,
        input: impl Into<String>,
        output: impl Into<String>,
        constant: Option<bool>,
        garbage: bool,
    ) -> Line {
        self.lines += 1;
        self.inputs.push(input.into());
        self.outputs.push(output.into());
        self.constants.push(constant);
        self.garbage.push(garbage);
        self.lines - 1
    }

    /// Get the number of gates.
    #[inline]
    pub fn num_gates(&self) -> usize {
        self.gates.len()
    }

    /// Iterate the gates in emission order.
    pub fn gates(&self) -> impl Iterator<Item = &Gate> {
        self.gates.iter()
    }

    /// Look up a gate by id.
    pub fn gate(&self, id: GateId) -> Option<&Gate> {
        self.gates.get(id.0)
    }

    // =========================================================================
    // Per-line metadata
    // =========================================================================

    /// Input names of all lines.
    pub fn inputs(&self) -> &[String] {
        &self.inputs
    }

    /// Output names of all lines.
    pub fn outputs(&self) -> &[String] {
        &self.outputs
    }

    /// Constant (ancilla) values of all lines; `None` means not constant.
    pub fn constants(&self) -> &[Option<bool>] {
        &self.constants
    }

    /// Garbage flags of all lines.
    pub fn garbage(&self) -> &[bool] {
        &self.garbage
    }

    /// Replace the input names; truncated or padded to the line count.
    pub fn set_inputs(&mut self, inputs: Vec<String>) {
        self.inputs = inputs;
        self.inputs.resize(self.lines as usize, "i".into());
    }

    /// Replace the output names; truncated or padded to the line count.
    pub fn set_outputs(&mut self, outputs: Vec<String>) {
        self.outputs = outputs;
        self.outputs.resize(self.lines as usize, "o".into());
    }

    /// Replace the constant-line specification.
    pub fn set_constants(&mut self, constants: Vec<Option<bool>>) {
        self.constants = constants;
        self.constants.resize(self.lines as usize, None);
    }

    /// Replace the garbage-line specification.
    pub fn set_garbage(&mut self, garbage: Vec<bool>) {
        self.garbage = garbage;
        self.garbage.resize(self.lines as usize, false);
    }

    // =========================================================================
    // Control-line propagation scopes
    // =========================================================================

    /// Push a new propagation scope frame.
    pub fn activate_scope(&mut self) {
        self.scopes.push(ScopeFrame::default());
    }

    /// Pop the innermost propagation scope frame, restoring any outer
    /// registrations it masked. No-op without an active scope.
    pub fn deactivate_scope(&mut self) {
        self.scopes.pop();
    }

    /// Register `line` for propagation in the current and nested scopes.
    ///
    /// No-op if the line is out of range or no scope is active. Registering
    /// an already-registered line is a no-op.
    pub fn register_control(&mut self, line: Line) {
        if line >= self.lines {
            return;
        }
        if let Some(top) = self.scopes.last_mut() {
            top.registered.insert(line);
            top.deregistered.remove(&line);
        }
    }

    /// Stop propagating `line` for the lifetime of the current scope.
    ///
    /// Only lines registered in the current scope can be deregistered; the
    /// deregistration then also masks registrations of outer frames.
    /// Deregistering a line not registered in the current scope is a no-op.
    pub fn deregister_control(&mut self, line: Line) {
        if let Some(top) = self.scopes.last_mut() {
            if top.registered.remove(&line) {
                top.deregistered.insert(line);
            }
        }
    }

    /// The set of controls implicitly attached to the next emitted gate.
    ///
    /// A line propagates iff some frame registers it and no deeper frame
    /// deregisters it.
    pub fn propagated_controls(&self) -> LineSet {
        let mut result = LineSet::new();
        for (depth, frame) in self.scopes.iter().enumerate() {
            for &line in &frame.registered {
                let masked = self.scopes[depth + 1..]
                    .iter()
                    .any(|deeper| deeper.deregistered.contains(&line));
                if !masked {
                    result.insert(line);
                }
            }
        }
        result
    }

    // =========================================================================
    // Gate emission
    // =========================================================================

    /// Append a Toffoli gate with two controls.
    ///
    /// Duplicate controls collapse: `append_toffoli(c, c, t)` yields a gate
    /// with a single control.
    pub fn append_toffoli(&mut self, c1: Line, c2: Line, target: Line) -> Option<GateId> {
        self.emit(GateKind::Toffoli, [c1, c2].into_iter().collect(), &[target])
    }

    /// Append a CNOT gate.
    pub fn append_cnot(&mut self, control: Line, target: Line) -> Option<GateId> {
        self.emit(GateKind::Toffoli, [control].into_iter().collect(), &[target])
    }

    /// Append a NOT gate.
    pub fn append_not(&mut self, target: Line) -> Option<GateId> {
        self.emit(GateKind::Toffoli, LineSet::new(), &[target])
    }

    /// Append a multi-control Toffoli gate.
    pub fn append_multi_control_toffoli(
        &mut self,
        controls: &LineSet,
        target: Line,
    ) -> Option<GateId> {
        self.emit(GateKind::Toffoli, controls.clone(), &[target])
    }

    /// Append a Fredkin gate on two distinct target lines.
    pub fn append_fredkin(&mut self, t1: Line, t2: Line) -> Option<GateId> {
        if t1 == t2 {
            return None;
        }
        self.emit(GateKind::Fredkin, LineSet::new(), &[t1, t2])
    }

    fn emit(&mut self, kind: GateKind, controls: LineSet, targets: &[Line]) -> Option<GateId> {
        if targets.iter().any(|&t| t >= self.lines) || controls.iter().any(|&c| c >= self.lines) {
            return None;
        }

        let mut effective = self.propagated_controls();
        effective.extend(controls);

        // A target crossing an active control would make the gate
        // self-referential; a control deregistered in the innermost scope
        // does not block.
        if targets.iter().any(|t| effective.contains(t)) {
            return None;
        }

        let gate = match kind {
            GateKind::Toffoli => Gate::toffoli(effective, targets[0]),
            GateKind::Fredkin => Gate::fredkin(effective, targets[0], targets[1]),
        };

        let id = GateId(self.gates.len());
        self.gates.push(gate);
        if !self.global_annotations.is_empty() {
            self.annotations.insert(id, self.global_annotations.clone());
        }
        Some(id)
    }

    // =========================================================================
    // Annotations
    // =========================================================================

    /// Annotate a gate with a key/value pair, overwriting an existing value.
    /// No-op for an unknown gate or an empty key.
    pub fn annotate(&mut self, gate: GateId, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        if key.is_empty() || gate.0 >= self.gates.len() {
            return;
        }
        self.annotations.entry(gate).or_default().insert(key, value.into());
    }

    /// All annotations of a gate, if any.
    pub fn annotations(&self, gate: GateId) -> Option<&BTreeMap<String, String>> {
        self.annotations.get(&gate)
    }

    /// Set a global annotation attached to every subsequently added gate.
    ///
    /// Returns whether an annotation with this key already existed. Gates
    /// already in the circuit are not retroactively annotated. Empty keys
    /// are rejected.
    pub fn set_or_update_global_annotation(
        &mut self,
        key: impl Into<String>,
        value: impl Into<String>,
    ) -> bool {
        let key = key.into();
        if key.is_empty() {
            return false;
        }
        self.global_annotations.insert(key, value.into()).is_some()
    }

    /// Remove a global annotation; copies already attached to gates remain.
    /// Returns whether the annotation existed.
    pub fn remove_global_annotation(&mut self, key: &str) -> bool {
        self.global_annotations.remove(key).is_some()
    }

    // =========================================================================
    // Cost model
    // =========================================================================

    /// Total quantum cost of the circuit.
    pub fn quantum_cost(&self) -> u64 {
        self.gates.iter().map(|g| g.quantum_cost(self.lines)).sum()
    }

    /// Total transistor cost of the circuit.
    pub fn transistor_cost(&self) -> u64 {
        self.gates.iter().map(|g| 8 * g.controls.len() as u64).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn circuit(lines: u32) -> Circuit {
        let mut c = Circuit::new();
        c.set_lines(lines);
        c
    }

    #[test]
    fn test_add_toffoli_gate() {
        let mut circ = circuit(3);
        let id = circ.append_toffoli(0, 1, 2).unwrap();

        let gate = circ.gate(id).unwrap();
        assert_eq!(gate.kind(), GateKind::Toffoli);
        assert_eq!(gate.controls().collect::<Vec<_>>(), vec![0, 1]);
        assert_eq!(gate.targets().collect::<Vec<_>>(), vec![2]);
        assert_eq!(circ.num_gates(), 1);
    }

    #[test]
    fn test_reject_out_of_range_lines() {
        let mut circ = circuit(2);
        assert!(circ.append_toffoli(0, 3, 1).is_none());
        assert!(circ.append_cnot(0, 2).is_none());
        assert!(circ.append_not(2).is_none());
        assert!(circ.append_fredkin(0, 2).is_none());
        assert_eq!(circ.num_gates(), 0);
    }

    #[test]
    fn test_duplicate_control_collapses() {
        let mut circ = circuit(2);
        let id = circ.append_toffoli(0, 0, 1).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().count(), 1);
    }

    #[test]
    fn test_reject_target_equal_to_control() {
        let mut circ = circuit(3);
        assert!(circ.append_toffoli(0, 1, 1).is_none());
        assert!(circ.append_cnot(0, 0).is_none());
        assert_eq!(circ.num_gates(), 0);
    }

    #[test]
    fn test_reject_fredkin_with_equal_targets() {
        let mut circ = circuit(1);
        assert!(circ.append_fredkin(0, 0).is_none());
    }

    #[test]
    fn test_scope_controls_propagate_to_emitted_gates() {
        let mut circ = circuit(4);
        circ.activate_scope();
        circ.register_control(0);

        circ.activate_scope();
        circ.register_control(1);

        let id = circ.append_cnot(2, 3).unwrap();
        let gate = circ.gate(id).unwrap();
        assert_eq!(gate.controls().collect::<Vec<_>>(), vec![0, 1, 2]);
    }

    #[test]
    fn test_reject_target_matching_active_outer_scope_control() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        assert!(circ.append_cnot(1, 0).is_none());
        assert!(circ.append_not(0).is_none());
        assert_eq!(circ.num_gates(), 0);
    }

    #[test]
    fn test_deregistration_masks_outer_scope() {
        let mut circ = circuit(4);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);

        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);
        circ.deregister_control(0);
        circ.deregister_control(1);

        // both scope controls masked; caller-supplied controls still attach
        let id = circ.append_toffoli(0, 1, 3).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 1]);

        let id = circ.append_toffoli(0, 2, 3).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_mask_persists_below_additional_scopes() {
        let mut circ = circuit(5);
        circ.activate_scope();
        for line in 0..4 {
            circ.register_control(line);
        }

        circ.activate_scope();
        circ.register_control(2);
        circ.deregister_control(2);

        circ.activate_scope();

        let id = circ.append_toffoli(0, 1, 4).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 1, 3]);

        // registering in a yet deeper scope re-enables the line
        circ.register_control(2);
        let id = circ.append_toffoli(0, 1, 4).unwrap();
        assert_eq!(
            circ.gate(id).unwrap().controls().collect::<Vec<_>>(),
            vec![0, 1, 2, 3]
        );
    }

    #[test]
    fn test_deeper_scope_reactivates_deregistered_line() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);
        circ.deregister_control(1);

        circ.activate_scope();
        circ.register_control(1);

        let id = circ.append_not(2).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_scope_deactivation_restores_outer_registrations() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);

        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);
        circ.deregister_control(0);
        circ.deregister_control(1);
        circ.deactivate_scope();

        let id = circ.append_not(2).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_target_may_cross_deregistered_control() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);

        circ.activate_scope();
        circ.register_control(0);
        circ.deregister_control(0);

        let id = circ.append_toffoli(1, 2, 0).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![1, 2]);
    }

    #[test]
    fn test_fredkin_target_may_cross_deregistered_control() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);

        circ.activate_scope();
        circ.register_control(0);
        circ.deregister_control(0);

        let id = circ.append_fredkin(2, 0).unwrap();
        let gate = circ.gate(id).unwrap();
        assert_eq!(gate.controls().collect::<Vec<_>>(), vec![1]);
        assert_eq!(gate.targets().collect::<Vec<_>>(), vec![0, 2]);
    }

    #[test]
    fn test_fredkin_target_rejected_on_active_control() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);

        circ.activate_scope();
        circ.register_control(0);
        circ.deregister_control(0);

        // line 1 is still active further out
        assert!(circ.append_fredkin(2, 1).is_none());
        assert!(circ.append_fredkin(1, 2).is_none());
        assert_eq!(circ.num_gates(), 0);
    }

    #[test]
    fn test_deregister_of_unregistered_line_is_noop() {
        let mut circ = circuit(3);
        circ.activate_scope();
        circ.register_control(0);
        circ.register_control(1);

        // line 1 is not registered in the inner scope; deregistration there
        // must not mask the outer registration
        circ.activate_scope();
        circ.deregister_control(1);

        let id = circ.append_multi_control_toffoli(&[0].into_iter().collect(), 2).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![0, 1]);
    }

    #[test]
    fn test_register_out_of_range_line_is_noop() {
        let mut circ = circuit(2);
        circ.activate_scope();
        circ.register_control(2);

        let id = circ.append_cnot(1, 0).unwrap();
        assert_eq!(circ.gate(id).unwrap().controls().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn test_scope_changes_leave_existing_gates_untouched() {
        let mut circ = circuit(2);
        let id = circ.append_not(1).unwrap();

        circ.activate_scope();
        circ.register_control(0);
        assert_eq!(circ.gate(id).unwrap().controls().count(), 0);

        circ.deactivate_scope();
        assert_eq!(circ.gate(id).unwrap().controls().count(), 0);
    }

    #[test]
    fn test_global_annotations_snapshot_at_emission() {
        let mut circ = circuit(2);
        let before = circ.append_not(0).unwrap();

        assert!(!circ.set_or_update_global_annotation("stmt", "x += y"));
        let during = circ.append_not(1).unwrap();

        assert!(circ.remove_global_annotation("stmt"));
        let after = circ.append_not(0).unwrap();

        assert!(circ.annotations(before).is_none());
        assert_eq!(
            circ.annotations(during).unwrap().get("stmt").map(String::as_str),
            Some("x += y")
        );
        assert!(circ.annotations(after).is_none());
    }

    #[test]
    fn test_global_annotation_update_reports_existence() {
        let mut circ = circuit(1);
        assert!(!circ.set_or_update_global_annotation("k", "1"));
        assert!(circ.set_or_update_global_annotation("k", "2"));
        assert!(!circ.set_or_update_global_annotation("", "x"));
        assert!(!circ.remove_global_annotation("missing"));
    }

    #[test]
    fn test_local_annotation_overrides_global_copy() {
        let mut circ = circuit(1);
        circ.set_or_update_global_annotation("k", "global");
        let id = circ.append_not(0).unwrap();

        circ.annotate(id, "k", "local");
        assert_eq!(
            circ.annotations(id).unwrap().get("k").map(String::as_str),
            Some("local")
        );
    }

    #[test]
    fn test_add_line_extends_metadata() {
        let mut circ = circuit(1);
        let line = circ.add_line("const_0", "garbage", Some(false), true);
        assert_eq!(line, 1);
        assert_eq!(circ.lines(), 2);
        assert_eq!(circ.constants()[1], Some(false));
        assert!(circ.garbage()[1]);
        assert_eq!(circ.inputs()[1], "const_0");
    }
}
