//! Truth tables for reversible function specification.
//!
//! This crate holds the function-table side of the synthesis flow: ternary
//! [`Cube`]s, partially specified [`TruthTable`]s with the PLA reader that
//! produces them, the Quine–McCluskey ESOP minimiser used to compress
//! control cubes, and the Huffman output encoder that embeds
//! non-reversible tables into reversible ones.
//!
//! # Example
//!
//! ```rust
//! use alsvid_tt::{read_pla, Cube};
//!
//! let mut tt = read_pla(".i 2\n.o 2\n1- 11\n.e\n").unwrap();
//! tt.extend();
//!
//! assert_eq!(tt.size(), 4);
//! assert!(tt.find(0b10, 2).unwrap().1.matches_integer(0b11, 2));
//! assert!(tt.find(0b00, 2).unwrap().1.matches_integer(0b00, 2));
//! ```

pub mod cube;
pub mod encoding;
pub mod esop;
pub mod pla;
pub mod table;

pub use cube::{Cube, CubeSet, Value};
pub use encoding::{
    augment_with_constants, encode_with_additional_line, encode_without_additional_line,
    CodewordMap, CodewordMultiMap,
};
pub use esop::minimize;
pub use pla::{read_pla, read_pla_file, PlaError, PlaResult};
pub use table::TruthTable;
