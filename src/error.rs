//! Structured error types for every stage of the pipeline.
//!
//! The compiler aborts on the first error it hits: there is no recovery and no
//! error collection. Every variant carries enough context (and, where one was
//! available, a source position) for the driver to print a usable diagnostic.

use std::fmt;
use thiserror::Error;

/// A 1-indexed source position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// Every way the front end can fail to produce a typed AST.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    // --- lexical ---
    #[error("{pos}: unknown character {ch:?}")]
    UnknownChar { ch: char, pos: Position },
    #[error("{pos}: invalid number literal: {reason}")]
    InvalidNumber { reason: String, pos: Position },
    #[error("{pos}: invalid escape sequence '\\{ch}'")]
    InvalidEscape { ch: char, pos: Position },
    #[error("{pos}: unterminated string literal")]
    UnterminatedString { pos: Position },
    #[error("{pos}: unterminated character literal")]
    UnterminatedChar { pos: Position },
    #[error("unterminated block comment")]
    UnterminatedComment,

    // --- syntactic ---
    #[error("{pos}: expected {expected}, got {got}")]
    UnexpectedToken {
        expected: String,
        got: String,
        pos: Position,
    },
    #[error("unexpected end of file, expected {expected}")]
    UnexpectedEndOfFile { expected: String },

    // --- semantic: types ---
    #[error("{pos}: unknown type '{name}'")]
    UnknownType { name: String, pos: Position },
    #[error("{pos}: type '{name}' is incomplete")]
    IncompleteType { name: String, pos: Position },
    #[error("{pos}: 'void' is not allowed here")]
    VoidTypeNotAllowed { pos: Position },
    #[error("{pos}: invalid vector initializer for '{type_name}': {reason}")]
    InvalidVectorInit {
        type_name: String,
        reason: String,
        pos: Position,
    },
    #[error("{pos}: invalid matrix initializer for '{type_name}': {reason}")]
    InvalidMatrixInit {
        type_name: String,
        reason: String,
        pos: Position,
    },
    #[error("{pos}: invalid swizzle '.{swizzle}'")]
    InvalidSwizzle { swizzle: String, pos: Position },

    // --- semantic: declarations ---
    #[error("{pos}: redefinition of '{name}'")]
    Redefinition { name: String, pos: Position },
    #[error("{pos}: conflicting redeclaration of '{name}'")]
    Redeclaration { name: String, pos: Position },
    #[error("{pos}: unsupported feature: {what}")]
    UnsupportedFeature { what: String, pos: Position },

    // --- semantic: expressions ---
    #[error("{pos}: use of undeclared identifier '{name}'")]
    UnknownIdentifier { name: String, pos: Position },
    #[error("{pos}: expression is not assignable")]
    NotAssignable { pos: Position },
    #[error("{pos}: cannot assign to const value")]
    AssignToConst { pos: Position },
    #[error("{pos}: expected a boolean expression")]
    NotABoolean { pos: Position },
    #[error("{pos}: expected an integer expression")]
    NotAnInteger { pos: Position },
    #[error("{pos}: invalid subscript: {reason}")]
    InvalidSubscript { reason: String, pos: Position },
    #[error("{pos}: no member named '{name}' on type '{type_name}'")]
    InvalidMember {
        name: String,
        type_name: String,
        pos: Position,
    },
    #[error("{pos}: no matching function for call to '{name}'")]
    NoMatchingFunction { name: String, pos: Position },
    #[error("{pos}: no matching constructor for '{type_name}'")]
    NoMatchingConstructor { type_name: String, pos: Position },
    #[error("{pos}: call to '{name}' is ambiguous")]
    AmbiguousCall { name: String, pos: Position },

    // --- attribute constraints ---
    #[error("{pos}: duplicate program-stage attribute")]
    DuplicateProgramAttribute { pos: Position },
    #[error("{pos}: duplicate semantic attribute")]
    DuplicateSemantic { pos: Position },
    #[error("{pos}: invalid attribute '{name}'")]
    InvalidAttribute { name: String, pos: Position },
}

pub type ParseResult<T> = Result<T, ParseError>;
