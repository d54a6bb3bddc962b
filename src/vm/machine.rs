//! Parsing machine
//!
//! Backtracking interpreter for compiled grammars:
//! - Stack of frames: call frames (with a matcher) and backtrack entries
//! - Memo table indexed by input position for memoized rules
//! - Left recursion detection through a per-address call table
//! - Furthest failure position kept for error reporting

use super::compiler::CompiledGrammar;
use super::instruction::{Instruction, MatcherId};
use super::parse_tree::{ParseNode, ParseNodeId, ParseTree};
use crate::api::Token;
use crate::error::{Error, Result};

/// What the machine consumes
#[derive(Debug, Clone, Copy)]
pub enum Input<'a> {
    /// Characters, addressed by byte offset
    Text(&'a str),
    Tokens(&'a [Token]),
}

impl Input<'_> {
    pub fn len(&self) -> usize {
        match self {
            Input::Text(text) => text.len(),
            Input::Tokens(tokens) => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Result of running the machine
#[derive(Debug)]
pub struct MachineOutcome {
    pub matched: bool,
    pub tree: ParseTree,
    /// Node of the root rule when matched
    pub root: Option<ParseNodeId>,
    /// Furthest position where a match failed outside of predicates
    pub error_index: usize,
}

#[derive(Debug, Default)]
struct Frame {
    sub_nodes: Vec<ParseNodeId>,
    address: isize,
    index: usize,
    ignore_errors: bool,
    /// Set on call frames, unset on backtrack entries
    matcher: Option<MatcherId>,
    left_recursion: Option<usize>,
    called_address: Option<usize>,
}

pub struct Machine<'a> {
    pub(super) grammar: &'a CompiledGrammar,
    pub(super) input: Input<'a>,
    /// frames[0] collects the root node and is never popped
    frames: Vec<Frame>,
    memos: Vec<Option<ParseNodeId>>,
    calls: Vec<Option<usize>>,
    tree: ParseTree,
    address: isize,
    pub(super) index: usize,
    ignore_errors: bool,
    matched: bool,
    error_index: usize,
}

impl<'a> Machine<'a> {
    pub fn new(grammar: &'a CompiledGrammar, input: Input<'a>) -> Self {
        Machine {
            grammar,
            input,
            frames: vec![Frame::default()],
            memos: vec![None; input.len() + 1],
            calls: vec![None; grammar.instructions().len()],
            tree: ParseTree::new(),
            address: 0,
            index: 0,
            ignore_errors: false,
            matched: true,
            error_index: 0,
        }
    }

    /// Runs the grammar's root rule over `text`
    pub fn parse_text(grammar: &'a CompiledGrammar, text: &'a str) -> Result<MachineOutcome> {
        Machine::new(grammar, Input::Text(text)).run()
    }

    /// Runs the grammar's root rule over `tokens`
    pub fn parse_tokens(grammar: &'a CompiledGrammar, tokens: &'a [Token]) -> Result<MachineOutcome> {
        Machine::new(grammar, Input::Tokens(tokens)).run()
    }

    pub fn run(mut self) -> Result<MachineOutcome> {
        let root_matcher = self
            .grammar
            .rule_matcher(self.grammar.root_rule())
            .ok_or_else(|| Error::grammar("The root rule has not been compiled."))?;

        self.push(-1);
        self.top().matcher = Some(root_matcher);
        self.jump(self.grammar.root_offset() as isize);

        let grammar = self.grammar;
        let instructions = grammar.instructions();
        while self.address >= 0 && (self.address as usize) < instructions.len() {
            let instruction = instructions[self.address as usize];
            self.execute(instruction)?;
        }

        let root = if self.matched {
            self.frames[0].sub_nodes.first().copied()
        } else {
            None
        };
        Ok(MachineOutcome {
            matched: self.matched,
            tree: self.tree,
            root,
            error_index: self.error_index,
        })
    }

    fn execute(&mut self, instruction: Instruction) -> Result<()> {
        match instruction {
            Instruction::Jump(offset) => self.jump(offset as isize),
            Instruction::Call { offset, matcher } => self.push_return(1, matcher, offset as isize)?,
            Instruction::Choice(offset) => {
                self.push_backtrack(offset as isize);
                self.jump(1);
            }
            Instruction::PredicateChoice(offset) => {
                self.push_backtrack(offset as isize);
                self.ignore_errors = true;
                self.jump(1);
            }
            Instruction::IgnoreErrors => {
                self.ignore_errors = true;
                self.jump(1);
            }
            Instruction::Commit(offset) => self.commit(offset as isize),
            Instruction::CommitVerify(offset) => {
                let frame_index = self.top().index;
                if self.index == frame_index {
                    return Err(Error::grammar(
                        "The inner part of ZeroOrMore and OneOrMore must not allow empty matches",
                    ));
                }
                self.commit(offset as isize);
            }
            Instruction::Ret => self.ret(),
            Instruction::Backtrack => self.backtrack(),
            Instruction::End => self.address = -1,
            Instruction::FailTwice => {
                // position of the failed predicate is the one reported
                self.index = self.top().index;
                self.pop();
                self.backtrack();
            }
            Instruction::BackCommit(offset) => {
                let frame = self.pop();
                self.index = frame.index;
                self.ignore_errors = frame.ignore_errors;
                self.jump(offset as isize);
            }
            Instruction::Native(matcher) => self.execute_native(matcher),
        }
        Ok(())
    }

    pub(super) fn jump(&mut self, offset: isize) {
        self.address += offset;
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn push(&mut self, address: isize) {
        self.frames.push(Frame {
            sub_nodes: Vec::new(),
            address,
            index: self.index,
            ignore_errors: self.ignore_errors,
            matcher: None,
            left_recursion: None,
            called_address: None,
        });
    }

    fn pop(&mut self) -> Frame {
        if self.frames.len() > 1 {
            self.frames.pop().unwrap_or_default()
        } else {
            Frame::default()
        }
    }

    fn pop_return(&mut self) -> Frame {
        let frame = self.pop();
        if let Some(address) = frame.called_address {
            self.calls[address] = frame.left_recursion;
        }
        frame
    }

    fn push_return(&mut self, return_offset: isize, matcher: MatcherId, call_offset: isize) -> Result<()> {
        if let Some(memo) = self.memos[self.index] {
            let node = self.tree.get(memo);
            if node.matcher == matcher {
                let end = node.end;
                self.top().sub_nodes.push(memo);
                self.index = end;
                self.jump(return_offset);
                return Ok(());
            }
        }

        self.push(self.address + return_offset);
        self.top().matcher = Some(matcher);
        self.jump(call_offset);
        let address = self.address as usize;
        if self.calls[address] == Some(self.index) {
            return Err(Error::grammar(format!(
                "Left recursion has been detected, involved rule: {}",
                self.grammar.matcher(matcher)
            )));
        }
        let index = self.index;
        let left_recursion = self.calls[address];
        let frame = self.top();
        frame.called_address = Some(address);
        frame.left_recursion = left_recursion;
        self.calls[address] = Some(index);
        Ok(())
    }

    fn push_backtrack(&mut self, offset: isize) {
        self.push(self.address + offset);
    }

    fn commit(&mut self, offset: isize) {
        let frame = self.pop();
        self.top().sub_nodes.extend(frame.sub_nodes);
        self.jump(offset);
    }

    fn ret(&mut self) {
        let frame = self.pop_return();
        if let Some(matcher) = frame.matcher {
            let node = self.tree.add(ParseNode {
                start: frame.index,
                end: self.index,
                matcher,
                children: frame.sub_nodes,
            });
            self.top().sub_nodes.push(node);
            if self.grammar.matcher(matcher).should_memoize() {
                self.memos[frame.index] = Some(node);
            }
        }
        self.ignore_errors = frame.ignore_errors;
        self.address = frame.address;
    }

    pub(super) fn backtrack(&mut self) {
        // unwind call frames down to the closest backtrack entry
        while self.top().matcher.is_some() {
            self.ignore_errors = self.top().ignore_errors;
            if !self.ignore_errors && self.error_index < self.index {
                self.error_index = self.index;
            }
            self.pop_return();
        }

        if self.frames.len() == 1 {
            self.address = -1;
            self.matched = false;
        } else {
            let frame = self.pop();
            self.index = frame.index;
            self.address = frame.address;
            self.ignore_errors = frame.ignore_errors;
        }
    }

    /// Adds a leaf covering `offset` input units and advances
    pub(super) fn create_leaf_node(&mut self, matcher: MatcherId, offset: usize) {
        let node = self.tree.add(ParseNode {
            start: self.index,
            end: self.index + offset,
            matcher,
            children: Vec::new(),
        });
        self.top().sub_nodes.push(node);
        self.index += offset;
    }

    /// Input units left
    pub(super) fn length(&self) -> usize {
        self.input.len() - self.index
    }

    /// Text from the current position (empty for token input)
    pub(super) fn remaining_text(&self) -> &'a str {
        match self.input {
            Input::Text(text) => &text[self.index..],
            Input::Tokens(_) => "",
        }
    }

    /// Token at `offset` from the current position
    pub(super) fn token_at(&self, offset: isize) -> Option<&'a Token> {
        match self.input {
            Input::Tokens(tokens) => {
                let position = self.index as isize + offset;
                if position < 0 {
                    None
                } else {
                    tokens.get(position as usize)
                }
            }
            Input::Text(_) => None,
        }
    }
}
