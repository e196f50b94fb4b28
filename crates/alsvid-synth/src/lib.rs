//! SyReC program synthesis.
//!
//! Lowers a parsed SyReC program to a reversible circuit over Toffoli and
//! Fredkin gates. Two backends share one driver:
//!
//! - [`LineAwareSynthesis`] folds `+`/`-`/`^` expressions into existing
//!   registers, cancelling self-annihilating subexpressions, and only
//!   allocates ancillas where an operator demands them;
//! - [`CostAwareSynthesis`] always materialises subexpression results into
//!   fresh constant lines, trading lines for a flatter gate stream.
//!
//! # Example
//!
//! ```rust
//! use alsvid_ir::Circuit;
//! use alsvid_syrec::parse_program;
//! use alsvid_synth::{CostAwareSynthesis, SynthesisSettings};
//!
//! let program = parse_program("module main(inout a(2), inout b(2)) a += b").unwrap();
//!
//! let mut circuit = Circuit::new();
//! let ok = CostAwareSynthesis::synthesize(
//!     &mut circuit,
//!     &program,
//!     &SynthesisSettings::default(),
//! );
//!
//! assert!(ok);
//! assert_eq!(circuit.lines(), 4);
//! assert_eq!(circuit.num_gates(), 6);
//! ```

pub mod cost_aware;
pub mod line_aware;
pub mod ops;
pub mod settings;
pub mod synthesizer;

pub use cost_aware::CostAwareSynthesis;
pub use line_aware::LineAwareSynthesis;
pub use settings::SynthesisSettings;
pub use synthesizer::{SynthesisBackend, Synthesizer};
