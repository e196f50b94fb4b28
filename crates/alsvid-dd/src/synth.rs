//! Identity-reshaping synthesis over matrix DDs.
//!
//! Given the DD of a reversible function, the synthesizer reshapes it
//! level by level into the identity, emitting one multi-control NOT per
//! reshaping step; applying the emitted gates therefore realises the
//! original function. Negative controls are realised in the emitted
//! circuit by conjugating the control line with NOT gates.
//!
//! The coding-techniques entry points wrap the reshaping with Huffman
//! output encoding, constant augmentation, and a decoder stage that
//! recovers the primary outputs from the codewords.

use std::collections::{BTreeMap, VecDeque};

use rustc_hash::FxHashSet;
use tracing::{debug, info};

use alsvid_ir::{Circuit, Line, LineSet};
use alsvid_tt::{
    augment_with_constants, encode_with_additional_line, encode_without_additional_line, minimize,
    Cube, CubeSet, TruthTable,
};

use crate::build::build_dd;
use crate::package::{Edge, NodeId, Package, Var};

/// Control set with polarity (`true` fires on 1).
type Controls = BTreeMap<Line, bool>;

/// Synthesizer driving the reshaping loop and collecting the circuit.
///
/// One instance per synthesis run; the instance is not reentrant.
#[derive(Default)]
pub struct DdSynthesizer {
    circuit: Circuit,
    num_gates: usize,
    /// Primary inputs of the specification.
    n: usize,
    /// Primary outputs of the specification.
    m: usize,
    /// Total lines of the synthesized circuit.
    total_bits: usize,
    /// Lines needed to decode the output patterns.
    r: usize,
    /// Stop reshaping once only garbage levels remain.
    garbage_flag: bool,
}

impl DdSynthesizer {
    /// Create a fresh synthesizer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reset all state for a new run.
    pub fn reset(&mut self) {
        *self = Self::default();
    }

    /// Number of logical multi-control operations emitted.
    pub fn num_gates(&self) -> usize {
        self.num_gates
    }

    /// The circuit assembled so far.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Consume the synthesizer, releasing the finished circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Synthesize a truth table with Huffman output encoding and a decoder
    /// stage (coding-techniques flow).
    pub fn synthesize_coding_techniques(tt: &TruthTable, with_additional_line: bool) -> Circuit {
        let mut synth = Self::new();
        synth.coding_techniques(tt.clone(), with_additional_line);
        synth.into_circuit()
    }

    /// Synthesize a truth table in one pass, leaving garbage levels
    /// unresolved.
    pub fn synthesize_one_pass(tt: &TruthTable) -> Circuit {
        let mut synth = Self::new();
        synth.one_pass(tt.clone());
        synth.into_circuit()
    }

    // =========================================================================
    // Entry points
    // =========================================================================

    fn initialize(&mut self, tt: &TruthTable) -> Package {
        self.n = tt.n_inputs();
        self.m = tt.n_outputs();
        let k1 = tt.minimum_additional_lines();
        self.total_bits = self.n.max(self.m + k1);
        self.r = (self.m + k1) - self.n.max(self.m);
        self.circuit.set_lines(self.total_bits as u32);
        Package::new(self.total_bits)
    }

    /// Coding-techniques synthesis: encode, augment, reshape, decode.
    pub fn coding_techniques(&mut self, mut tt: TruthTable, with_additional_line: bool) {
        self.reset();
        let mut pkg = self.initialize(&tt);

        let single_codes;
        let multi_codes;
        if with_additional_line {
            single_codes = encode_with_additional_line(&mut tt);
            multi_codes = alsvid_tt::CodewordMultiMap::new();
        } else {
            multi_codes = encode_without_additional_line(&mut tt);
            single_codes = alsvid_tt::CodewordMap::new();
        }

        self.r = self.total_bits - tt.n_outputs();
        augment_with_constants(&mut tt, self.total_bits, false);

        self.mark_ancillas_high(self.total_bits - self.n);
        self.mark_garbage_low(self.total_bits - self.m);

        info!(
            inputs = self.n,
            outputs = self.m,
            lines = self.total_bits,
            "coding-techniques synthesis"
        );

        let src = build_dd(&tt, &mut pkg);
        self.synthesize(src, &mut pkg);

        let pairs: Vec<(&Cube, &Cube)> = if with_additional_line {
            single_codes.iter().collect()
        } else {
            multi_codes
                .iter()
                .flat_map(|(pattern, codes)| codes.iter().map(move |code| (pattern, code)))
                .collect()
        };
        self.decoder(&mut pkg, &pairs);
    }

    /// One-pass synthesis: symmetric augmentation, reshaping halts at the
    /// first garbage level.
    pub fn one_pass(&mut self, mut tt: TruthTable) {
        self.reset();
        let mut pkg = self.initialize(&tt);

        if self.m > self.n {
            self.mark_ancillas_high(self.m - self.n);
            augment_with_constants(&mut tt, self.m, false);
        }

        let old_inputs = tt.n_inputs();
        let old_outputs = tt.n_outputs();
        augment_with_constants(&mut tt, self.total_bits, true);

        let n_ancilla = tt.n_inputs() - old_inputs;
        let n_garbage = tt.n_outputs() - old_outputs;
        self.mark_ancillas_low(n_ancilla);
        self.mark_garbage_low(n_garbage);

        info!(
            inputs = self.n,
            outputs = self.m,
            lines = self.total_bits,
            "one-pass synthesis"
        );

        self.garbage_flag = true;
        let src = build_dd(&tt, &mut pkg);
        self.synthesize(src, &mut pkg);
    }

    fn mark_ancillas_high(&mut self, count: usize) {
        let mut constants = self.circuit.constants().to_vec();
        for i in 0..count {
            constants[self.total_bits - 1 - i] = Some(false);
        }
        self.circuit.set_constants(constants);
    }

    fn mark_ancillas_low(&mut self, count: usize) {
        let mut constants = self.circuit.constants().to_vec();
        for slot in constants.iter_mut().take(count) {
            *slot = Some(false);
        }
        self.circuit.set_constants(constants);
    }

    fn mark_garbage_low(&mut self, count: usize) {
        let mut garbage = self.circuit.garbage().to_vec();
        for flag in garbage.iter_mut().take(count) {
            *flag = true;
        }
        self.circuit.set_garbage(garbage);
    }

    // =========================================================================
    // Algorithm Q
    // =========================================================================

    /// Reshape `src` into the identity, appending gates to the circuit.
    pub fn synthesize(&mut self, mut src: Edge, pkg: &mut Package) {
        if src.is_terminal() {
            return;
        }
        if self.total_bits == 0 {
            self.total_bits = pkg.var(src) as usize + 1;
        }
        if self.circuit.lines() == 0 {
            self.circuit.set_lines(self.total_bits as u32);
        }

        let garbage_threshold = self.total_bits as isize - self.m as isize;

        // the source DD must survive the intermediate releases inside each
        // reshaping step
        while pkg.refs(src) < 2 {
            pkg.inc_ref(src);
        }

        let mut queue: VecDeque<Edge> = VecDeque::new();
        queue.push_back(src);
        let mut visited: FxHashSet<Edge> = FxHashSet::default();

        while let Some(&current) = queue.front() {
            if self.garbage_flag && (pkg.var(current) as isize) <= garbage_threshold - 1 {
                break;
            }
            queue.pop_front();

            pkg.inc_ref(src);
            let top = pkg.var(src);
            let shifted = self.shifting_paths(pkg, src, current);
            pkg.dec_ref(src);
            pkg.garbage_collect();

            if shifted != src {
                if shifted.is_terminal() || pkg.var(shifted) < top || pkg.is_identity(shifted) {
                    break;
                }
                // restart the walk from the reshaped source
                src = shifted;
                visited.clear();
                queue.clear();
                queue.push_back(src);
                continue;
            }

            // a collapsed child sits below a run of skipped levels and is
            // enqueued at its own level; the signature walks pad the
            // missing levels
            for child in pkg.children(current) {
                if !child.is_terminal() && !visited.contains(&child) {
                    queue.push_back(child);
                    visited.insert(child);
                }
            }
        }

        debug!(gates = self.num_gates, "reshaping finished");
    }

    /// Try the four reshaping tactics on `current`, in order.
    fn shifting_paths(&mut self, pkg: &mut Package, src: Edge, current: Edge) -> Edge {
        let v = pkg.var(current) as usize;
        let children = pkg.children(current);
        let p1 = path_signature(pkg, children[0], v);
        let p2 = path_signature(pkg, children[1], v);
        let p3 = path_signature(pkg, children[2], v);
        let p4 = path_signature(pkg, children[3], v);

        let swapped = self.swap_paths(pkg, src, current, &p1, &p2, &p3, &p4);
        if swapped != src {
            return swapped;
        }

        let mut change_paths = false;
        let unique = self.shift_unique_paths(pkg, src, current, &p1, &p2, &p3, &p4, &mut change_paths);
        if unique != src {
            return unique;
        }

        if terminate(&children, &p1, &p2, &p3, &p4) {
            return src;
        }

        if change_paths {
            self.unify_path(pkg, src, current, &p4, &p3, true)
        } else {
            self.unify_path(pkg, src, current, &p1, &p2, false)
        }
    }

    /// P1: swap the paths of the off-diagonal edge onto the diagonal when
    /// the off-diagonal side is heavier.
    #[allow(clippy::too_many_arguments)]
    fn swap_paths(
        &mut self,
        pkg: &mut Package,
        mut src: Edge,
        current: Edge,
        p1: &CubeSet,
        p2: &CubeSet,
        p3: &CubeSet,
        p4: &CubeSet,
    ) -> Edge {
        if p2.len() > p1.len() || (p2.is_empty() && p1.is_empty()) {
            let children = pkg.children(current);
            if p2.is_empty() {
                if p3.is_empty()
                    && p4.is_empty()
                    && ((!children[0].is_zero() && children[1].is_zero())
                        || (!children[3].is_zero() && children[2].is_zero()))
                {
                    return src;
                }
                if !p3.is_empty() || !p4.is_empty() {
                    return src;
                }
            }

            if !p2.is_empty() && p1 == p3 && p2 == p4 {
                return src;
            }

            let root_sig = final_src_path_signature(pkg, src, current, p1, p2, false);
            let root_solution = minimize(&root_sig);
            let v = pkg.var(current);

            for root_cube in &root_solution {
                let mut ctrl = Controls::new();
                control_root(v, &mut ctrl, root_cube);
                self.apply_operation(pkg, v, &mut src, &ctrl);
            }
        }
        src
    }

    /// P2: move the paths unique to the off-diagonal edge onto the
    /// diagonal (or the symmetric pair when `change_paths` flips).
    #[allow(clippy::too_many_arguments)]
    fn shift_unique_paths(
        &mut self,
        pkg: &mut Package,
        mut src: Edge,
        current: Edge,
        p1: &CubeSet,
        p2: &CubeSet,
        p3: &CubeSet,
        p4: &CubeSet,
        change_paths: &mut bool,
    ) -> Edge {
        if p2.is_empty() {
            if p3.is_empty() || (p1 == p3 && p2 == p4) {
                return src;
            }
            *change_paths = true;
        }

        if p1 == p3 && p2 == p4 {
            return src;
        }

        let unique: CubeSet = if *change_paths {
            p3.difference(p4).cloned().collect()
        } else {
            p2.difference(p1).cloned().collect()
        };
        if unique.is_empty() {
            return src;
        }

        let root_sig = if *change_paths {
            final_src_path_signature(pkg, src, current, p4, p3, true)
        } else {
            final_src_path_signature(pkg, src, current, p1, p2, false)
        };

        let root_solution = minimize(&root_sig);
        let unique_solution = minimize(&unique);
        let v = pkg.var(current);

        for unique_cube in &unique_solution {
            let mut non_root = Controls::new();
            control_non_root(v, &mut non_root, unique_cube);

            for root_cube in &root_solution {
                let mut ctrl = non_root.clone();
                control_root(v, &mut ctrl, root_cube);
                self.apply_operation(pkg, v, &mut src, &ctrl);
            }
        }
        src
    }

    /// P4: turn a path shared by both edges into the missing one,
    /// flipping the differing bits below the node.
    fn unify_path(
        &mut self,
        pkg: &mut Package,
        mut src: Edge,
        current: Edge,
        p1: &CubeSet,
        p2: &CubeSet,
        change_paths: bool,
    ) -> Edge {
        let mut repeated = Cube::new();
        for cube in p2 {
            if p1.contains(cube) {
                repeated = cube.clone();
            }
        }

        let missing = Cube::find_missing_cube(p1);
        let len = repeated.len();
        let mut ctrl_cube = Cube(vec![None; len]);
        let mut target_cube = Cube(vec![None; len]);
        for i in 0..len {
            if repeated.0[i] == missing.0[i] {
                ctrl_cube.0[i] = missing.0[i];
            } else {
                target_cube.0[i] = Some(true);
            }
        }

        let v = pkg.var(current);
        let mut non_root = Controls::new();
        control_non_root(v, &mut non_root, &ctrl_cube);

        let root_sig = final_src_path_signature(pkg, src, current, p1, p2, change_paths);
        let root_solution = minimize(&root_sig);

        for root_cube in &root_solution {
            let mut ctrl = Controls::new();
            control_root(v, &mut ctrl, root_cube);
            ctrl.entry(v).or_insert(!change_paths);
            for (&line, &polarity) in &non_root {
                ctrl.entry(line).or_insert(polarity);
            }

            for i in 0..len {
                if target_cube.0[i] == Some(true) {
                    self.apply_operation(pkg, v - (i as u32 + 1), &mut src, &ctrl);
                }
            }
        }
        src
    }

    /// Emit one multi-control NOT and fold its inverse into the DD.
    fn apply_operation(
        &mut self,
        pkg: &mut Package,
        target: Line,
        to: &mut Edge,
        ctrl: &Controls,
    ) {
        self.emit_mcx(ctrl, target);

        let op = pkg.controlled_not(ctrl, target, self.total_bits);
        let reduced = pkg.multiply(*to, op);
        pkg.inc_ref(reduced);
        pkg.dec_ref(*to);
        *to = reduced;
        pkg.garbage_collect();
    }

    /// Append a multi-control NOT to the circuit, NOT-wrapping negative
    /// controls.
    fn emit_mcx(&mut self, ctrl: &Controls, target: Line) {
        let positives: LineSet = ctrl.keys().copied().collect();
        for (&line, &polarity) in ctrl {
            if !polarity {
                let _ = self.circuit.append_not(line);
            }
        }
        let _ = self.circuit.append_multi_control_toffoli(&positives, target);
        for (&line, &polarity) in ctrl {
            if !polarity {
                let _ = self.circuit.append_not(line);
            }
        }
        self.num_gates += 1;
    }

    // =========================================================================
    // Decoder
    // =========================================================================

    /// Emit the stage that recovers the primary outputs from the
    /// codewords.
    fn decoder(&mut self, pkg: &mut Package, codewords: &[(&Cube, &Cube)]) {
        let Some((_, first_code)) = codewords.first() else {
            return;
        };
        let code_len = first_code.len();

        // decode the r most significant output bits directly
        if self.r != 0 {
            for (pattern, code) in codewords {
                let mut ctrl = Controls::new();
                for (i, value) in code.0.iter().enumerate() {
                    if let Some(bit) = value {
                        ctrl.insert((code_len - 1 - i) as Line, *bit);
                    }
                }

                for (i, value) in pattern.0[..self.r].iter().enumerate() {
                    if *value == Some(true) {
                        let target = (self.total_bits - 1 - i) as Line;
                        self.emit_mcx(&ctrl, target);
                    }
                }
            }
        }

        // correct the remaining primary outputs through a second reshaping
        if self.m <= self.r {
            return;
        }

        let mut correction = TruthTable::new();
        for (pattern, code) in codewords {
            let mut out_cube = (*pattern).clone();
            out_cube.resize(self.total_bits);

            let mut in_cube = Cube(pattern.0[..self.r].to_vec());
            in_cube.0.extend(code.0.iter().copied());

            for concrete in in_cube.complete_cubes() {
                correction.insert(concrete, out_cube.clone());
            }
        }

        let dd = build_dd(&correction, pkg);
        self.garbage_flag = true;
        self.synthesize(dd, pkg);
    }
}

// =============================================================================
// Path signatures
// =============================================================================

/// All root-to-one paths of `e`, padded to `path_len` input bits.
fn path_signature(pkg: &Package, e: Edge, path_len: usize) -> CubeSet {
    let mut sig = CubeSet::new();
    if e.is_zero() || path_len == 0 {
        return sig;
    }
    let mut cube = Cube::new();
    path_signature_rec(pkg, e, path_len, &mut sig, &mut cube);
    sig
}

fn path_signature_rec(pkg: &Package, e: Edge, path_len: usize, sig: &mut CubeSet, cube: &mut Cube) {
    debug_assert!(!e.is_zero() && path_len != 0);

    if path_len == 1 {
        if e.is_one() {
            // collapsed block: both input values reach the terminal
            for bit in [false, true] {
                cube.0.push(Some(bit));
                sig.insert(cube.clone());
                cube.0.pop();
            }
            return;
        }
        for (i, child) in pkg.children(e).into_iter().enumerate() {
            if child.is_one() {
                cube.0.push(Some(i == 1 || i == 3));
                sig.insert(cube.clone());
                cube.0.pop();
            }
        }
        return;
    }

    // collapsed and skipped blocks replicate over the input bit
    if e.is_one() || (pkg.var(e) as usize) < path_len - 1 {
        for bit in [false, true] {
            cube.0.push(Some(bit));
            path_signature_rec(pkg, e, path_len - 1, sig, cube);
            cube.0.pop();
        }
        return;
    }

    for (i, child) in pkg.children(e).into_iter().enumerate() {
        if child.is_zero() {
            continue;
        }
        cube.0.push(Some(i == 1 || i == 3));
        path_signature_rec(pkg, child, path_len - 1, sig, cube);
        cube.0.pop();
    }
}

/// All diagonal paths from `src` down to the node `dst`.
fn path_from_src_dst(pkg: &Package, src: Edge, dst: NodeId, sig: &mut CubeSet) {
    debug_assert!(!src.is_terminal());
    let src_v = pkg.var(src);
    let dst_v = pkg.var_of(dst);
    if src_v <= dst_v {
        if src.node_id() == Some(dst) {
            sig.insert(Cube::new());
        }
        return;
    }
    let mut cube = Cube::new();
    path_from_src_dst_rec(pkg, src, src_v as usize, dst, sig, &mut cube);
}

fn path_from_src_dst_rec(
    pkg: &Package,
    e: Edge,
    level: usize,
    dst: NodeId,
    sig: &mut CubeSet,
    cube: &mut Cube,
) {
    if e.is_terminal() {
        return;
    }
    let v = pkg.var(e) as usize;

    if v < level {
        for bit in [false, true] {
            cube.0.push(Some(bit));
            path_from_src_dst_rec(pkg, e, level - 1, dst, sig, cube);
            cube.0.pop();
        }
        return;
    }

    if level <= pkg.var_of(dst) as usize {
        if e.node_id() == Some(dst) {
            sig.insert(cube.clone());
        }
        return;
    }

    let children = pkg.children(e);
    for (i, bit) in [(0usize, false), (3usize, true)] {
        let succ = children[i];
        if !succ.is_terminal() {
            cube.0.push(Some(bit));
            path_from_src_dst_rec(pkg, succ, level - 1, dst, sig, cube);
            cube.0.pop();
        }
    }
}

/// Root path cover of `current`, merged with the root paths of every other
/// live node at the same level that shares the same edge signatures.
fn final_src_path_signature(
    pkg: &Package,
    src: Edge,
    current: Edge,
    p1: &CubeSet,
    p2: &CubeSet,
    change_paths: bool,
) -> CubeSet {
    let current_node = current.node_id().expect("current is not terminal");
    let mut root_sig = CubeSet::new();
    path_from_src_dst(pkg, src, current_node, &mut root_sig);

    let v = pkg.var(current);
    if v == pkg.var(src) || v == 0 {
        return root_sig;
    }

    for id in pkg.level_nodes(v) {
        if id == current_node {
            continue;
        }
        let children = pkg.children_of(id);
        let (a, b) = if change_paths {
            (children[3], children[2])
        } else {
            (children[0], children[1])
        };
        let sig_a = path_signature(pkg, a, v as usize);
        let sig_b = path_signature(pkg, b, v as usize);
        if &sig_a == p1 && &sig_b == p2 {
            path_from_src_dst(pkg, src, id, &mut root_sig);
        }
    }
    root_sig
}

// =============================================================================
// Control conventions
// =============================================================================

/// Controls below `v`: cube position `i` addresses line `v - i - 1`.
fn control_non_root(v: Var, ctrl: &mut Controls, cube: &Cube) {
    for (i, value) in cube.0.iter().enumerate() {
        if let Some(bit) = value {
            ctrl.entry(v - i as u32 - 1).or_insert(*bit);
        }
    }
}

/// Controls above `v`: cube position `i` addresses line
/// `(len - i) + v`.
fn control_root(v: Var, ctrl: &mut Controls, cube: &Cube) {
    let len = cube.0.len();
    for (i, value) in cube.0.iter().enumerate() {
        if let Some(bit) = value {
            ctrl.entry((len - i) as u32 + v).or_insert(*bit);
        }
    }
}

/// P3: nothing to do at this node.
fn terminate(children: &[Edge; 4], p1: &CubeSet, p2: &CubeSet, p3: &CubeSet, p4: &CubeSet) -> bool {
    (p1 == p3 && p2 == p4) || (children[1].is_zero() && children[2].is_zero())
}
