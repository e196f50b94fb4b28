//! SyReC language front end.
//!
//! SyReC is a small imperative language for reversible computation:
//! parameterised modules over fixed-width signals, in-place assignments
//! (`+=`, `-=`, `^=`), unary updates (`++=`, `--=`, `~=`), swaps (`<=>`),
//! structured control flow (`if`/`fi`, `for`) and invertible subroutine
//! calls (`call`/`uncall`).
//!
//! This crate lexes and parses programs into an immutable [`Program`]
//! tree; the synthesizers in `alsvid-synth` walk that tree read-only.
//!
//! # Example
//!
//! ```rust
//! use alsvid_syrec::parse_program;
//!
//! let program = parse_program(
//!     "module main(inout a(2), inout b(2)) a += b",
//! ).unwrap();
//!
//! assert_eq!(program.modules[0].name, "main");
//! ```

pub mod ast;
pub mod error;
pub mod lexer;
pub mod parser;

pub use ast::{
    AssignOp, BinaryOp, Expression, LoopMap, Module, Number, NumericOp, Program, ShiftOp,
    Statement, UnaryOp, Variable, VariableAccess, VariableKind,
};
pub use error::{ParseError, ParseResult};
pub use parser::{parse_program, parse_program_with_settings, ReadProgramSettings};
