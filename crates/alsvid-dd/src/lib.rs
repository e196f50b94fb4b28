//! Decision-diagram based synthesis of reversible circuits.
//!
//! A completely specified truth table is turned into a shared, canonical
//! matrix decision diagram ([`build_dd`]) which the [`DdSynthesizer`]
//! reshapes level by level into the identity, emitting one multi-control
//! NOT per step. Huffman-encoded flows for non-reversible tables and the
//! garbage-aware one-pass flow are layered on top.
//!
//! # Example
//!
//! ```rust
//! use alsvid_dd::{build_dd, DdSynthesizer, Package};
//! use alsvid_tt::read_pla;
//!
//! let mut tt = read_pla(".i 2\n.o 2\n10 11\n01 01\n.e\n").unwrap();
//! tt.extend();
//!
//! let mut pkg = Package::new(2);
//! let src = build_dd(&tt, &mut pkg);
//!
//! let mut synth = DdSynthesizer::new();
//! synth.synthesize(src, &mut pkg);
//!
//! // a controlled NOT needs exactly one gate
//! assert_eq!(synth.num_gates(), 1);
//! ```

pub mod build;
pub mod package;
pub mod synth;

pub use build::build_dd;
pub use package::{Edge, NodeId, Package, Var};
pub use synth::DdSynthesizer;
