//! Reader for the Berkeley PLA subset.

use thiserror::Error;

use crate::cube::{Cube, Value};
use crate::table::TruthTable;

/// Errors raised while reading a PLA description.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PlaError {
    /// The `.i` directive is missing or appears after the first row.
    #[error("Missing .i directive before the first cube row")]
    MissingInputCount,

    /// The `.o` directive is missing or appears after the first row.
    #[error("Missing .o directive before the first cube row")]
    MissingOutputCount,

    /// Functions wider than 63 inputs are not supported.
    #[error("{0} inputs exceed the supported maximum of 63")]
    TooManyInputs(usize),

    /// A directive argument failed to parse.
    #[error("Line {line}: invalid argument for {directive}")]
    BadDirective {
        /// 1-based source line.
        line: usize,
        /// The offending directive.
        directive: String,
    },

    /// A cube row has the wrong width.
    #[error("Line {line}: cube row has {got} positions, expected {expected}")]
    WidthMismatch {
        /// 1-based source line.
        line: usize,
        /// Expected width.
        expected: usize,
        /// Actual width.
        got: usize,
    },

    /// A cube row contains an unsupported character.
    #[error("Line {line}: invalid cube character '{ch}'")]
    BadCharacter {
        /// 1-based source line.
        line: usize,
        /// The offending character.
        ch: char,
    },

    /// Underlying I/O failure when reading from a file.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for PLA reading.
pub type PlaResult<T> = Result<T, PlaError>;

fn parse_value(ch: char, line: usize) -> PlaResult<Value> {
    match ch {
        '0' => Ok(Some(false)),
        '1' => Ok(Some(true)),
        '-' | '~' => Ok(None),
        _ => Err(PlaError::BadCharacter { line, ch }),
    }
}

/// Parse a PLA description into a (possibly partially specified) truth
/// table.
///
/// Supported directives: `.i`, `.o`, `.p`, `.ilb`, `.ob`, `.type fr`,
/// `.type fd`, `.e`. Comment lines start with `#`; `~` is accepted as a
/// synonym for the don't-care `-`.
pub fn read_pla(source: &str) -> PlaResult<TruthTable> {
    let mut n_inputs: Option<usize> = None;
    let mut n_outputs: Option<usize> = None;
    let mut table = TruthTable::new();

    for (idx, raw) in source.lines().enumerate() {
        let line_no = idx + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(rest) = line.strip_prefix('.') {
            let mut parts = rest.split_whitespace();
            let directive = parts.next().unwrap_or_default();
            match directive {
                "i" => {
                    let n = parts
                        .next()
                        .and_then(|v| v.parse::<usize>().ok())
                        .ok_or_else(|| PlaError::BadDirective {
                            line: line_no,
                            directive: ".i".into(),
                        })?;
                    if n > 63 {
                        return Err(PlaError::TooManyInputs(n));
                    }
                    n_inputs = Some(n);
                }
                "o" => {
                    let n = parts
                        .next()
                        .and_then(|v| v.parse::<usize>().ok())
                        .ok_or_else(|| PlaError::BadDirective {
                            line: line_no,
                            directive: ".o".into(),
                        })?;
                    n_outputs = Some(n);
                }
                // row count, labels and cover type carry no semantics here
                "p" | "ilb" | "ob" | "type" => {}
                "e" => break,
                _ => {}
            }
            continue;
        }

        let n_in = n_inputs.ok_or(PlaError::MissingInputCount)?;
        let n_out = n_outputs.ok_or(PlaError::MissingOutputCount)?;

        let mut fields = line.split_whitespace();
        let in_str = fields.next().unwrap_or_default();
        let out_str = fields.next().unwrap_or_default();

        if in_str.chars().count() != n_in {
            return Err(PlaError::WidthMismatch {
                line: line_no,
                expected: n_in,
                got: in_str.chars().count(),
            });
        }
        if out_str.chars().count() != n_out {
            return Err(PlaError::WidthMismatch {
                line: line_no,
                expected: n_out,
                got: out_str.chars().count(),
            });
        }

        let input: Cube = in_str
            .chars()
            .map(|c| parse_value(c, line_no))
            .collect::<PlaResult<_>>()?;
        let output: Cube = out_str
            .chars()
            .map(|c| parse_value(c, line_no))
            .collect::<PlaResult<_>>()?;

        table.insert(input, output);
    }

    Ok(table)
}

/// Read a PLA file from disk.
pub fn read_pla_file(path: impl AsRef<std::path::Path>) -> PlaResult<TruthTable> {
    let source = std::fs::read_to_string(path)?;
    read_pla(&source)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_simple_pla() {
        let tt = read_pla(
            ".i 2\n\
             .o 2\n\
             10 11\n\
             01 01\n\
             .e\n",
        )
        .unwrap();

        assert_eq!(tt.size(), 2);
        assert_eq!(tt.n_inputs(), 2);
        assert!(tt.find(0b10, 2).unwrap().1.matches_integer(0b11, 2));
        assert!(tt.find(0b01, 2).unwrap().1.matches_integer(0b01, 2));
    }

    #[test]
    fn test_comments_labels_and_tilde() {
        let tt = read_pla(
            "# a function with a don't care\n\
             .i 3\n\
             .o 1\n\
             .ilb a b c\n\
             .ob f\n\
             .type fr\n\
             1~0 1\n\
             .e\n",
        )
        .unwrap();

        assert_eq!(tt.size(), 1);
        let (input, _) = tt.iter().next().unwrap();
        assert!(input.matches("1-0"));
    }

    #[test]
    fn test_missing_directives() {
        assert!(matches!(
            read_pla("10 1\n"),
            Err(PlaError::MissingInputCount)
        ));
        assert!(matches!(
            read_pla(".i 2\n10 1\n"),
            Err(PlaError::MissingOutputCount)
        ));
    }

    #[test]
    fn test_width_mismatch() {
        assert!(matches!(
            read_pla(".i 2\n.o 1\n101 1\n"),
            Err(PlaError::WidthMismatch { .. })
        ));
    }

    #[test]
    fn test_too_many_inputs() {
        assert!(matches!(
            read_pla(".i 64\n.o 1\n"),
            Err(PlaError::TooManyInputs(64))
        ));
    }
}
