//! Alsvid Reversible Circuit Intermediate Representation
//!
//! This crate provides the core data structures for representing reversible
//! circuits over Toffoli and Fredkin gates. It is the foundation shared by
//! both synthesis paths (SyReC programs and truth tables).
//!
//! # Core Components
//!
//! - **Lines**: [`Line`] indices address the circuit's wires; each line
//!   carries one bit and may be flagged as a constant input (ancilla) or a
//!   garbage output
//! - **Gates**: [`Gate`] with a [`GateKind`] and ordered control/target sets
//! - **Circuit**: [`Circuit`], an ordered gate container with per-line
//!   metadata, gate annotations, and the control-line propagation scope
//!   stack used by the synthesizers to distribute controls across compound
//!   statements
//! - **Simulation**: [`simulate`], the naive bit-flip evaluator
//!
//! # Example
//!
//! ```rust
//! use alsvid_ir::{Circuit, simulate};
//!
//! let mut circuit = Circuit::new();
//! circuit.set_lines(3);
//!
//! // A Toffoli gate, then a controlled block: every gate emitted while the
//! // scope is active picks up line 0 as an extra control.
//! circuit.append_toffoli(0, 1, 2).unwrap();
//! circuit.activate_scope();
//! circuit.register_control(0);
//! circuit.append_cnot(1, 2).unwrap();
//! circuit.deactivate_scope();
//!
//! let output = simulate(&circuit, &[true, true, false]).unwrap();
//! assert_eq!(output, vec![true, true, false]);
//! ```

pub mod circuit;
pub mod error;
pub mod gate;
pub mod simulation;

pub use circuit::{Circuit, GateId};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, Line, LineSet};
pub use simulation::{apply_gate, simulate};
