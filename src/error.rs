//! Error types for rule parsing and turtle interpretation.

use crate::Symbol;
use thiserror::Error;

/// A malformed rule string. Raised while building a [`RuleSet`](crate::RuleSet),
/// so expansion never starts from a partially parsed grammar.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GrammarError {
    #[error("empty rule")]
    Empty,

    #[error("missing `->` separator in rule `{0}`")]
    MissingSeparator(String),

    #[error("missing source symbol in rule `{0}`")]
    MissingSymbol(String),

    #[error("invalid source symbol `{token}` in rule `{rule}`")]
    InvalidSymbol { rule: String, token: String },

    #[error("invalid weight `{token}` in rule `{rule}`: weights must be positive and finite")]
    InvalidWeight { rule: String, token: String },

    #[error("unexpected token `{token}` before `->` in rule `{rule}`")]
    UnexpectedToken { rule: String, token: String },

    #[error("rule for `{0}` has no alternatives")]
    NoAlternatives(Symbol),

    #[error("whitespace inside replacement of rule `{0}`")]
    InvalidReplacement(String),

    #[error("line {line}: {source}")]
    AtLine {
        line: usize,
        #[source]
        source: Box<GrammarError>,
    },
}

/// A failure while walking a symbol sequence with the turtle.
/// Interpretation halts at the offending symbol.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InterpretError {
    #[error("stack underflow: `{symbol}` at index {index} pops an empty stack")]
    StackUnderflow { index: usize, symbol: Symbol },

    #[error("stack overflow: `{symbol}` at index {index} exceeds the maximum depth of {depth}")]
    StackOverflow {
        index: usize,
        symbol: Symbol,
        depth: usize,
    },

    #[error("unknown custom action `{name}` at index {index}")]
    UnknownAction { index: usize, name: String },
}

/// Any failure of the parse-expand-interpret pipeline.
///
/// Lets a caller that builds a [`RuleSet`](crate::RuleSet) and then interprets
/// its expansion propagate both kinds of error with `?`.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("grammar error: {0}")]
    Grammar(#[from] GrammarError),

    #[error("interpretation error: {0}")]
    Interpret(#[from] InterpretError),
}

/// Result alias over the crate-level [`Error`].
pub type Result<T> = std::result::Result<T, Error>;
