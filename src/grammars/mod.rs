//! Grammars Module - sample lexerless grammars
//!
//! Small grammars showing how the builders are used, and covering the
//! behavior of the parsing machine on classic PEG cases:
//! - `json`, `expression`: realistic languages with whitespace handling
//! - `left_recursive`: left recursion and how to eliminate it
//! - `memoization`: backtracking that relies on memoized rule matches
//! - `abc`, `recursive`: syntactic predicates and deep nesting

pub mod abc;
pub mod expression;
pub mod json;
pub mod left_recursive;
pub mod memoization;
pub mod recursive;
