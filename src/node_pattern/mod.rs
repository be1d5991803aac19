//! Structural node patterns: definitions, capture sets, and the interpreter
//! that evaluates them against ESTree nodes.

pub mod captures;
pub mod interpreter;
pub mod pattern;

pub use captures::Captures;
pub use interpreter::{is_match, match_pattern, MatchResult, PatternError};
pub use pattern::{
    any, capture, capture_as, lit, node, of_type, pred, seq, typed, Pattern, PredicateFn,
};
