//! VM Module - compiled grammars and the parsing machine
//!
//! Parsing expressions are compiled into a flat instruction list executed by
//! a backtracking machine (parsing machine of Medeiros and Ierusalimschy,
//! extended with memoization and error locating).

pub mod compiler;
pub mod instruction;
pub mod machine;
mod natives;
pub mod parse_tree;

pub use compiler::CompiledGrammar;
pub use instruction::{Instruction, Matcher, MatcherId};
pub use machine::{Input, Machine, MachineOutcome};
pub use parse_tree::{ParseNode, ParseNodeId, ParseTree};
