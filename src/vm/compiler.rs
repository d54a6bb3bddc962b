//! Grammar compiler
//!
//! Translates parsing expressions into machine instructions. Rules are
//! compiled once each, starting from the root rule; every rule body ends
//! with `Ret` and rule references are linked to `Call` instructions.

use std::collections::{HashMap, VecDeque};

use regex::Regex;
use tracing::debug;

use super::instruction::{Instruction, Matcher, MatcherId};
use crate::api::RuleKey;
use crate::error::{Error, Result};
use crate::grammar::{Expression, Grammar, GrammarMode};

/// Instructions plus the matcher table they refer to
#[derive(Debug, Clone)]
pub struct CompiledGrammar {
    instructions: Vec<Instruction>,
    matchers: Vec<Matcher>,
    rules: HashMap<RuleKey, MatcherId>,
    root_rule: RuleKey,
    root_offset: usize,
    mode: GrammarMode,
}

impl CompiledGrammar {
    /// Compiles the rules reachable from the grammar's root rule
    pub fn compile(grammar: &Grammar) -> Result<Self> {
        let root = grammar
            .root_rule()
            .ok_or_else(|| Error::grammar("The grammar has no root rule."))?;
        Self::compile_rule(grammar, root)
    }

    /// Compiles the rules reachable from `root`
    pub fn compile_rule(grammar: &Grammar, root: RuleKey) -> Result<Self> {
        GrammarCompiler::new(grammar).run(root)
    }

    pub fn instructions(&self) -> &[Instruction] {
        &self.instructions
    }

    pub fn matcher(&self, id: MatcherId) -> &Matcher {
        &self.matchers[id as usize]
    }

    pub fn matchers(&self) -> &[Matcher] {
        &self.matchers
    }

    pub fn rule_matcher(&self, key: RuleKey) -> Option<MatcherId> {
        self.rules.get(&key).copied()
    }

    pub fn root_rule(&self) -> RuleKey {
        self.root_rule
    }

    pub fn root_offset(&self) -> usize {
        self.root_offset
    }

    pub fn mode(&self) -> GrammarMode {
        self.mode
    }
}

/// Instruction before linking
enum Emitted {
    Instruction(Instruction),
    RuleRef(RuleKey),
}

struct GrammarCompiler<'g> {
    grammar: &'g Grammar,
    matchers: Vec<Matcher>,
    rules: HashMap<RuleKey, MatcherId>,
    queue: VecDeque<RuleKey>,
}

impl<'g> GrammarCompiler<'g> {
    fn new(grammar: &'g Grammar) -> Self {
        GrammarCompiler {
            grammar,
            matchers: Vec::new(),
            rules: HashMap::new(),
            queue: VecDeque::new(),
        }
    }

    fn run(mut self, root: RuleKey) -> Result<CompiledGrammar> {
        self.enqueue(root)?;
        let mut program: Vec<Emitted> = Vec::new();
        let mut offsets: HashMap<RuleKey, usize> = HashMap::new();

        while let Some(key) = self.queue.pop_front() {
            let definition = self
                .grammar
                .rule(key)
                .ok_or_else(|| Error::grammar(format!("The rule '{}' hasn't been defined.", key)))?;
            offsets.insert(key, program.len());
            let body = self.compile(definition.expression())?;
            program.extend(body);
            program.push(Emitted::Instruction(Instruction::Ret));
        }

        let mut instructions = Vec::with_capacity(program.len());
        for (address, emitted) in program.into_iter().enumerate() {
            instructions.push(match emitted {
                Emitted::Instruction(instruction) => instruction,
                Emitted::RuleRef(key) => Instruction::Call {
                    offset: offsets[&key] as i32 - address as i32,
                    matcher: self.rules[&key],
                },
            });
        }

        debug!(
            root = %root,
            instructions = instructions.len(),
            matchers = self.matchers.len(),
            "grammar compiled"
        );
        Ok(CompiledGrammar {
            instructions,
            matchers: self.matchers,
            root_offset: offsets[&root],
            rules: self.rules,
            root_rule: root,
            mode: self.grammar.mode(),
        })
    }

    fn enqueue(&mut self, key: RuleKey) -> Result<MatcherId> {
        if let Some(&id) = self.rules.get(&key) {
            return Ok(id);
        }
        let definition = self
            .grammar
            .rule(key)
            .ok_or_else(|| Error::grammar(format!("The rule '{}' hasn't been defined.", key)))?;
        let id = self.add_matcher(Matcher::Rule {
            key,
            skip: definition.skip_policy(),
            memoize: definition.memoize(),
        });
        self.rules.insert(key, id);
        self.queue.push_back(key);
        Ok(id)
    }

    fn add_matcher(&mut self, matcher: Matcher) -> MatcherId {
        self.matchers.push(matcher);
        (self.matchers.len() - 1) as MatcherId
    }

    fn native(&mut self, matcher: Matcher) -> Vec<Emitted> {
        let id = self.add_matcher(matcher);
        vec![Emitted::Instruction(Instruction::Native(id))]
    }

    fn compile(&mut self, expression: &Expression) -> Result<Vec<Emitted>> {
        use Instruction::*;

        let emitted = match expression {
            Expression::Sequence(subs) => {
                let mut result = Vec::new();
                for sub in subs {
                    result.extend(self.compile(sub)?);
                }
                result
            }
            Expression::FirstOf(subs) => {
                let compiled = subs
                    .iter()
                    .map(|sub| self.compile(sub))
                    .collect::<Result<Vec<_>>>()?;
                let total: usize = compiled.iter().map(Vec::len).sum::<usize>()
                    + compiled.len().saturating_sub(1) * 2;
                let last = compiled.len().saturating_sub(1);
                let mut result = Vec::with_capacity(total);
                for (i, sub) in compiled.into_iter().enumerate() {
                    if i == last {
                        result.extend(sub);
                    } else {
                        result.push(Emitted::Instruction(Choice(sub.len() as i32 + 2)));
                        result.extend(sub);
                        let commit = total - result.len();
                        result.push(Emitted::Instruction(Commit(commit as i32)));
                    }
                }
                result
            }
            Expression::Optional(sub) => {
                let sub = self.compile(sub)?;
                let n = sub.len() as i32;
                wrap(Choice(n + 2), sub, &[Commit(1)])
            }
            Expression::ZeroOrMore(sub) => {
                let sub = self.compile(sub)?;
                let n = sub.len() as i32;
                wrap(Choice(n + 2), sub, &[CommitVerify(-1 - n)])
            }
            Expression::OneOrMore(sub) => {
                let sub = self.compile(sub)?;
                let n = sub.len() as i32;
                wrap(
                    Choice(n + 4),
                    sub,
                    &[CommitVerify(1), Choice(3), Jump(-2 - n), Backtrack],
                )
            }
            Expression::Next(sub) => {
                let sub = self.compile(sub)?;
                let n = sub.len() as i32;
                wrap(Choice(n + 2), sub, &[BackCommit(2), Backtrack])
            }
            Expression::NextNot(sub) => {
                let sub = self.compile(sub)?;
                let n = sub.len() as i32;
                wrap(PredicateChoice(n + 2), sub, &[FailTwice])
            }
            Expression::Token(token_type, sub) => {
                let matcher = self.add_matcher(Matcher::Token(*token_type));
                self.compile_node(matcher, sub)?
            }
            Expression::Trivia(kind, sub) => {
                let matcher = self.add_matcher(Matcher::Trivia(*kind));
                self.compile_node(matcher, sub)?
            }
            Expression::Rule(key) => {
                self.enqueue(*key)?;
                vec![Emitted::RuleRef(*key)]
            }
            Expression::Literal(value) => match self.grammar.mode() {
                GrammarMode::Lexerless => self.native(Matcher::String(value.clone())),
                GrammarMode::Lexerful => self.native(Matcher::TokenValue(value.clone())),
            },
            Expression::Pattern(source) => {
                let regex = Regex::new(&format!("^(?:{})", source))?;
                self.native(Matcher::Pattern {
                    regex,
                    source: source.clone(),
                })
            }
            Expression::EndOfInput => self.native(Matcher::EndOfInput),
            Expression::Nothing => self.native(Matcher::Nothing),
            Expression::TokenType(token_type) => self.native(Matcher::TokenType(*token_type)),
            Expression::TokenTypes(types) => self.native(Matcher::TokenTypes(types.clone())),
            Expression::TokenTypeClass(class) => self.native(Matcher::TokenTypeClass(class)),
            Expression::AnyToken => self.native(Matcher::AnyToken),
            Expression::TillNewLine => self.native(Matcher::TillNewLine),
            Expression::Adjacent => self.native(Matcher::Adjacent),
            Expression::Bridge(from, to) => self.native(Matcher::Bridge {
                from: *from,
                to: *to,
            }),
        };
        Ok(emitted)
    }

    /// `call(2) jump(n+3) ignoreErrors sub ret`
    fn compile_node(&mut self, matcher: MatcherId, sub: &Expression) -> Result<Vec<Emitted>> {
        let sub = self.compile(sub)?;
        let n = sub.len() as i32;
        let mut result = Vec::with_capacity(sub.len() + 4);
        result.push(Emitted::Instruction(Instruction::Call { offset: 2, matcher }));
        result.push(Emitted::Instruction(Instruction::Jump(n + 3)));
        result.push(Emitted::Instruction(Instruction::IgnoreErrors));
        result.extend(sub);
        result.push(Emitted::Instruction(Instruction::Ret));
        Ok(result)
    }
}

fn wrap(first: Instruction, sub: Vec<Emitted>, tail: &[Instruction]) -> Vec<Emitted> {
    let mut result = Vec::with_capacity(sub.len() + 1 + tail.len());
    result.push(Emitted::Instruction(first));
    result.extend(sub);
    result.extend(tail.iter().map(|&i| Emitted::Instruction(i)));
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::GenericTokenType;
    use crate::grammar::{LexerfulGrammarBuilder, LexerlessGrammarBuilder};

    const A: RuleKey = RuleKey::new("A");
    const B: RuleKey = RuleKey::new("B");

    fn compile(expression: Expression) -> Vec<Instruction> {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is(expression);
        let grammar = b.build().unwrap();
        CompiledGrammar::compile_rule(&grammar, A)
            .unwrap()
            .instructions()
            .to_vec()
    }

    fn rendered(instructions: &[Instruction]) -> Vec<String> {
        instructions.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_optional() {
        let b = LexerlessGrammarBuilder::create();
        let instructions = compile(b.optional("a"));
        assert_eq!(rendered(&instructions), ["Choice 3", "Native 1", "Commit 1", "Ret"]);
    }

    #[test]
    fn test_zero_or_more() {
        let b = LexerlessGrammarBuilder::create();
        let instructions = compile(b.zero_or_more(("a", "b")));
        assert_eq!(
            rendered(&instructions),
            ["Choice 4", "Native 1", "Native 2", "CommitVerify -3", "Ret"]
        );
    }

    #[test]
    fn test_one_or_more() {
        let b = LexerlessGrammarBuilder::create();
        let instructions = compile(b.one_or_more("a"));
        assert_eq!(
            rendered(&instructions),
            ["Choice 5", "Native 1", "CommitVerify 1", "Choice 3", "Jump -3", "Backtrack", "Ret"]
        );
    }

    #[test]
    fn test_predicates() {
        let b = LexerlessGrammarBuilder::create();
        assert_eq!(
            rendered(&compile(b.next("a"))),
            ["Choice 3", "Native 1", "BackCommit 2", "Backtrack", "Ret"]
        );
        assert_eq!(
            rendered(&compile(b.next_not("a"))),
            ["PredicateChoice 3", "Native 1", "FailTwice", "Ret"]
        );
    }

    #[test]
    fn test_first_of() {
        let b = LexerlessGrammarBuilder::create();
        let instructions = compile(b.first_of(("a", ("b", "c"), "d")));
        assert_eq!(
            rendered(&instructions),
            [
                "Choice 3", "Native 1", "Commit 6",
                "Choice 4", "Native 2", "Native 3", "Commit 2",
                "Native 4",
                "Ret",
            ]
        );
    }

    #[test]
    fn test_token() {
        let b = LexerlessGrammarBuilder::create();
        let instructions = compile(b.token(GenericTokenType::LITERAL, "a"));
        assert_eq!(
            rendered(&instructions),
            ["Call 2", "Jump 4", "IgnoreErrors", "Native 2", "Ret", "Ret"]
        );
    }

    #[test]
    fn test_rule_linking() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is((B, B));
        b.rule(B).is("b");
        let grammar = b.build().unwrap();
        let compiled = CompiledGrammar::compile_rule(&grammar, A).unwrap();

        assert_eq!(
            compiled.instructions(),
            &[
                Instruction::Call { offset: 3, matcher: 1 },
                Instruction::Call { offset: 2, matcher: 1 },
                Instruction::Ret,
                Instruction::Native(2),
                Instruction::Ret,
            ]
        );
        assert_eq!(compiled.root_offset(), 0);
        assert_eq!(compiled.rule_matcher(B), Some(1));
    }

    #[test]
    fn test_literal_in_lexerful_grammar_matches_token_value() {
        let b = LexerfulGrammarBuilder::create();
        b.rule(A).is("a");
        let grammar = b.build().unwrap();
        let compiled = CompiledGrammar::compile_rule(&grammar, A).unwrap();
        assert!(matches!(compiled.matcher(1), Matcher::TokenValue(v) if v == "a"));
    }

    #[test]
    fn test_invalid_pattern() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is(b.regexp("[a-"));
        let grammar = b.build().unwrap();
        let err = CompiledGrammar::compile_rule(&grammar, A).unwrap_err();
        assert!(matches!(err, Error::Regex(_)));
    }

    #[test]
    fn test_missing_root() {
        let b = LexerlessGrammarBuilder::create();
        b.rule(A).is("a");
        let grammar = b.build().unwrap();
        assert!(CompiledGrammar::compile(&grammar).is_err());
    }
}
