//! Error types for the SyReC front end.

use thiserror::Error;

/// Errors that can occur while parsing a SyReC program.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// Lexer error (invalid token).
    #[error("Lexer error at byte {position}: {message}")]
    LexerError {
        /// Byte offset in the source.
        position: usize,
        /// Description of the failure.
        message: String,
    },

    /// Unexpected token.
    #[error("Unexpected token at byte {position}: expected {expected}, found {found}")]
    UnexpectedToken {
        /// Byte offset in the source.
        position: usize,
        /// What the parser expected.
        expected: String,
        /// The token actually found.
        found: String,
    },

    /// Unexpected end of input.
    #[error("Unexpected end of input: {0}")]
    UnexpectedEof(String),

    /// Reference to an undeclared variable.
    #[error("Undeclared variable: {0}")]
    UndeclaredVariable(String),

    /// Duplicate declaration inside one module.
    #[error("Duplicate declaration: {0}")]
    DuplicateDeclaration(String),

    /// Reference to an unbound loop variable.
    #[error("Unbound loop variable: ${0}")]
    UnboundLoopVariable(String),

    /// Call of an unknown module.
    #[error("Unknown module: {0}")]
    UnknownModule(String),

    /// Call with the wrong number of arguments.
    #[error("Module '{module}' expects {expected} arguments, got {got}")]
    WrongArgumentCount {
        /// Callee name.
        module: String,
        /// Declared parameter count.
        expected: usize,
        /// Arguments supplied.
        got: usize,
    },

    /// Access with the wrong number of array indexes.
    #[error("Variable '{variable}' has {expected} dimensions, got {got} indexes")]
    WrongIndexCount {
        /// Accessed variable.
        variable: String,
        /// Declared dimension count.
        expected: usize,
        /// Indexes supplied.
        got: usize,
    },

    /// A program without modules.
    #[error("Program contains no modules")]
    EmptyProgram,
}

/// Result type for parsing.
pub type ParseResult<T> = Result<T, ParseError>;
