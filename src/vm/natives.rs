//! Native matchers executed by `Instruction::Native`

use super::instruction::{Matcher, MatcherId};
use super::machine::Machine;
use crate::api::{GenericTokenType, Token, TokenType};

impl<'a> Machine<'a> {
    pub(super) fn execute_native(&mut self, id: MatcherId) {
        let grammar = self.grammar;
        match grammar.matcher(id) {
            Matcher::String(value) => {
                if self.remaining_text().starts_with(value.as_str()) {
                    self.create_leaf_node(id, value.len());
                    self.jump(1);
                } else {
                    self.backtrack();
                }
            }
            Matcher::Pattern { regex, .. } => match regex.find(self.remaining_text()) {
                Some(found) => {
                    self.create_leaf_node(id, found.end());
                    self.jump(1);
                }
                None => self.backtrack(),
            },
            Matcher::EndOfInput => {
                if self.length() == 0 {
                    self.jump(1);
                } else {
                    self.backtrack();
                }
            }
            Matcher::Nothing => self.backtrack(),
            Matcher::TokenValue(value) => {
                self.single_token(id, |token| token.value() == value.as_str());
            }
            Matcher::TokenType(token_type) => {
                self.single_token(id, |token| token.token_type() == *token_type);
            }
            Matcher::TokenTypes(types) => {
                self.single_token(id, |token| types.contains(&token.token_type()));
            }
            Matcher::TokenTypeClass(class) => {
                self.single_token(id, |token| token.token_type().class() == *class);
            }
            Matcher::AnyToken => self.single_token(id, |_| true),
            Matcher::TillNewLine => self.till_new_line(id),
            Matcher::Adjacent => self.adjacent(),
            Matcher::Bridge { from, to } => {
                let (from, to) = (*from, *to);
                self.bridge(id, from, to);
            }
            // node matchers are entered through Call, never natively
            Matcher::Rule { .. } | Matcher::Token(_) | Matcher::Trivia(_) => self.backtrack(),
        }
    }

    fn single_token(&mut self, id: MatcherId, accept: impl Fn(&Token) -> bool) {
        match self.token_at(0) {
            Some(token) if accept(token) => {
                self.create_leaf_node(id, 1);
                self.jump(1);
            }
            _ => self.backtrack(),
        }
    }

    /// Consumes the tokens on the line of the previous token, up to EOF
    fn till_new_line(&mut self, id: MatcherId) {
        let current_line = if self.index == 0 {
            1
        } else {
            self.token_at(-1).map(|t| t.line()).unwrap_or(1)
        };
        let mut offset = 0;
        while let Some(token) = self.token_at(offset as isize) {
            if token.line() != current_line || token.token_type() == GenericTokenType::EOF {
                break;
            }
            offset += 1;
        }
        for _ in 0..offset {
            self.create_leaf_node(id, 1);
        }
        self.jump(1);
    }

    /// Succeeds when the next token starts where the previous one ends
    fn adjacent(&mut self) {
        let (Some(previous), Some(next)) = (self.token_at(-1), self.token_at(0)) else {
            self.backtrack();
            return;
        };
        let previous_end = previous.column() + previous.value().chars().count();
        if next.column() <= previous_end && next.line() == previous.line() {
            self.jump(1);
        } else {
            self.backtrack();
        }
    }

    /// Matches a balanced `from` ... `to` token sequence
    fn bridge(&mut self, id: MatcherId, from: TokenType, to: TokenType) {
        let length = self.length();
        let starts_with_from = self.token_at(0).is_some_and(|t| t.token_type() == from);
        if length < 2 || !starts_with_from {
            self.backtrack();
            return;
        }
        let mut offset = 0;
        let mut level = 1;
        while level != 0 {
            offset += 1;
            let Some(token) = self.token_at(offset as isize) else {
                self.backtrack();
                return;
            };
            if token.token_type() == from {
                level += 1;
            } else if token.token_type() == to {
                level -= 1;
            }
        }
        for _ in 0..=offset {
            self.create_leaf_node(id, 1);
        }
        self.jump(1);
    }
}
