//! Reversible gate types.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

/// Index of a circuit line (wire). A line carries one bit.
pub type Line = u32;

/// Ordered set of lines, used for control and target collections.
pub type LineSet = BTreeSet<Line>;

/// The two gate primitives of the target library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GateKind {
    /// Multi-control NOT: flips its single target iff all controls are 1.
    Toffoli,
    /// Controlled swap: exchanges its two targets iff all controls are 1.
    Fredkin,
}

impl GateKind {
    /// Get the conventional lowercase name of this gate kind.
    #[inline]
    pub fn name(&self) -> &'static str {
        match self {
            GateKind::Toffoli => "toffoli",
            GateKind::Fredkin => "fredkin",
        }
    }
}

/// A gate in a reversible circuit.
///
/// The gate itself carries no enablement state; whether control lines from
/// an active propagation scope are attached is decided by
/// [`Circuit`](crate::Circuit) at emission time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gate {
    /// The kind of gate.
    pub kind: GateKind,
    /// Control lines; the gate fires iff every control holds 1.
    pub controls: LineSet,
    /// Target lines. One for Toffoli, exactly two for Fredkin.
    pub targets: LineSet,
}

impl Gate {
    /// Create a Toffoli-family gate (NOT, CNOT, multi-control NOT).
    pub fn toffoli(controls: LineSet, target: Line) -> Self {
        let mut targets = LineSet::new();
        targets.insert(target);
        Self {
            kind: GateKind::Toffoli,
            controls,
            targets,
        }
    }

    /// Create a Fredkin gate with the given controls and two targets.
    pub fn fredkin(controls: LineSet, t1: Line, t2: Line) -> Self {
        let mut targets = LineSet::new();
        targets.insert(t1);
        targets.insert(t2);
        Self {
            kind: GateKind::Fredkin,
            controls,
            targets,
        }
    }

    /// Iterate the control lines in ascending order.
    pub fn controls(&self) -> impl Iterator<Item = Line> + '_ {
        self.controls.iter().copied()
    }

    /// Iterate the target lines in ascending order.
    pub fn targets(&self) -> impl Iterator<Item = Line> + '_ {
        self.targets.iter().copied()
    }

    /// Get the kind of this gate.
    #[inline]
    pub fn kind(&self) -> GateKind {
        self.kind
    }

    /// Quantum cost of this gate in a circuit with `lines` lines.
    ///
    /// Standard table for multi-control Toffoli decompositions; the cost
    /// depends on the number of controls and on how many free lines are
    /// available for the decomposition. A Fredkin counts one additional
    /// control.
    pub fn quantum_cost(&self, lines: u32) -> u64 {
        let mut c = self.controls.len() as u32;
        if self.kind == GateKind::Fredkin {
            c += 1;
        }
        c = c.min(lines.saturating_sub(1));
        let e = lines - c - 1; // free lines

        match c {
            0 | 1 => 1,
            2 => 5,
            3 => 13,
            4 => {
                if e >= 2 {
                    26
                } else {
                    29
                }
            }
            5 => match e {
                0 => 61,
                1 | 2 => 52,
                _ => 38,
            },
            6 => match e {
                0 => 125,
                1..=3 => 80,
                _ => 50,
            },
            7 => match e {
                0 => 253,
                1..=4 => 100,
                _ => 62,
            },
            8 => match e {
                0 => 509,
                1..=5 => 128,
                _ => 74,
            },
            9 => match e {
                0 => 1021,
                1..=6 => 152,
                _ => 86,
            },
            _ => {
                let c = u64::from(c);
                if e >= c as u32 - 2 {
                    12 * c - 33
                } else if e >= 1 {
                    24 * c - 87
                } else {
                    (1 << (c + 1)) - 3
                }
            }
        }
    }
}
