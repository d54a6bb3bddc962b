//! XPath expressions parsed into `Expr` trees
//!
//! Binary operators are parsed by precedence level, loosest first; paths,
//! filters and steps by recursive descent below them.

use super::lexer::{Lexer, Token};
use crate::error::{Error, Result};

#[derive(Debug, Clone)]
pub enum Expr {
    /// `/` alone: the document node
    Root,
    /// `.` as a primary expression
    Context,
    Union(Box<Expr>, Box<Expr>),
    /// `base/step`
    Path(Box<Expr>, Box<Step>),
    /// `base[predicate]` on a primary expression
    Filter(Box<Expr>, Box<Expr>),
    Function(String, Vec<Expr>),
    Binary(Box<Expr>, BinaryOp, Box<Expr>),
    Negate(Box<Expr>),
    Number(f64),
    String(String),
    /// `$name`, rejected at compile time
    Variable(String),
    /// Location step relative to the context node
    Step(Box<Step>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Or,
    And,
    Eq,
    NotEq,
    Lt,
    LtEq,
    Gt,
    GtEq,
    Add,
    Sub,
    Mul,
    Div,
    Mod,
}

/// Levels of `binary_op`
const PRECEDENCE_LEVELS: usize = 6;

/// Operator of `token` at precedence `level`, 0 being `or`
fn binary_op(token: &Token, level: usize) -> Option<BinaryOp> {
    let op = match (level, token) {
        (0, Token::Or) => BinaryOp::Or,
        (1, Token::And) => BinaryOp::And,
        (2, Token::Eq) => BinaryOp::Eq,
        (2, Token::NotEq) => BinaryOp::NotEq,
        (3, Token::Lt) => BinaryOp::Lt,
        (3, Token::LtEq) => BinaryOp::LtEq,
        (3, Token::Gt) => BinaryOp::Gt,
        (3, Token::GtEq) => BinaryOp::GtEq,
        (4, Token::Plus) => BinaryOp::Add,
        (4, Token::Minus) => BinaryOp::Sub,
        (5, Token::Star) => BinaryOp::Mul,
        (5, Token::Div) => BinaryOp::Div,
        (5, Token::Mod) => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

#[derive(Debug, Clone)]
pub struct Step {
    pub axis: Axis,
    pub node_test: NodeTest,
    pub predicates: Vec<Expr>,
}

impl Step {
    /// `axis::node()`, what `.`, `..` and `//` stand for
    fn any_node(axis: Axis) -> Self {
        Step {
            axis,
            node_test: NodeTest::Node,
            predicates: Vec::new(),
        }
    }
}

/// `base//step`, that is `base/descendant-or-self::node()/step`
fn descendant_path(base: Expr, step: Step) -> Expr {
    let all = Expr::Path(Box::new(base), Box::new(Step::any_node(Axis::DescendantOrSelf)));
    Expr::Path(Box::new(all), Box::new(step))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Child,
    Descendant,
    DescendantOrSelf,
    Parent,
    Ancestor,
    AncestorOrSelf,
    FollowingSibling,
    PrecedingSibling,
    Following,
    Preceding,
    Self_,
    Attribute,
    Namespace,
}

impl Axis {
    pub fn from_name(s: &str) -> Option<Self> {
        match s {
            "child" => Some(Axis::Child),
            "descendant" => Some(Axis::Descendant),
            "descendant-or-self" => Some(Axis::DescendantOrSelf),
            "parent" => Some(Axis::Parent),
            "ancestor" => Some(Axis::Ancestor),
            "ancestor-or-self" => Some(Axis::AncestorOrSelf),
            "following-sibling" => Some(Axis::FollowingSibling),
            "preceding-sibling" => Some(Axis::PrecedingSibling),
            "following" => Some(Axis::Following),
            "preceding" => Some(Axis::Preceding),
            "self" => Some(Axis::Self_),
            "attribute" => Some(Axis::Attribute),
            "namespace" => Some(Axis::Namespace),
            _ => None,
        }
    }

    /// Reverse axes number their nodes from the closest one backwards
    pub fn is_reverse(&self) -> bool {
        matches!(
            self,
            Axis::Parent | Axis::Ancestor | Axis::AncestorOrSelf | Axis::PrecedingSibling | Axis::Preceding
        )
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum NodeTest {
    /// `*`
    Any,
    Name(String),
    Node,
    Text,
    Comment,
    ProcessingInstruction(Option<String>),
}

pub struct Parser<'a> {
    input: &'a str,
    lexer: Lexer<'a>,
    current: Token,
    lookahead: Option<Token>,
}

impl<'a> Parser<'a> {
    pub fn new(input: &'a str) -> Result<Self> {
        let mut lexer = Lexer::new(input);
        let current = lexer.next_token()?;
        Ok(Parser {
            input,
            lexer,
            current,
            lookahead: None,
        })
    }

    /// The whole input as one expression
    pub fn parse(&mut self) -> Result<Expr> {
        let expr = self.expr()?;
        match self.current {
            Token::Eof => Ok(expr),
            _ => Err(self.unexpected()),
        }
    }

    fn advance(&mut self) -> Result<()> {
        self.current = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(())
    }

    fn peek(&mut self) -> Result<&Token> {
        let token = match self.lookahead.take() {
            Some(token) => token,
            None => self.lexer.next_token()?,
        };
        Ok(self.lookahead.insert(token))
    }

    fn unexpected(&self) -> Error {
        Error::xpath(format!("Unexpected token {:?} in \"{}\"", self.current, self.input))
    }

    fn expect(&mut self, expected: Token, what: &str) -> Result<()> {
        if self.current != expected {
            return Err(Error::xpath(format!(
                "Expected {} but found {:?} in \"{}\"",
                what, self.current, self.input
            )));
        }
        self.advance()
    }

    fn expr(&mut self) -> Result<Expr> {
        self.binary(0)
    }

    /// Left associative operators of `level` and tighter ones
    fn binary(&mut self, level: usize) -> Result<Expr> {
        if level == PRECEDENCE_LEVELS {
            return self.unary();
        }
        let mut left = self.binary(level + 1)?;
        while let Some(op) = binary_op(&self.current, level) {
            self.advance()?;
            let right = self.binary(level + 1)?;
            left = Expr::Binary(Box::new(left), op, Box::new(right));
        }
        Ok(left)
    }

    fn unary(&mut self) -> Result<Expr> {
        if self.current != Token::Minus {
            return self.union();
        }
        self.advance()?;
        Ok(Expr::Negate(Box::new(self.unary()?)))
    }

    fn union(&mut self) -> Result<Expr> {
        let mut left = self.path()?;
        while self.current == Token::Pipe {
            self.advance()?;
            left = Expr::Union(Box::new(left), Box::new(self.path()?));
        }
        Ok(left)
    }

    fn at_step_start(&self) -> bool {
        matches!(
            self.current,
            Token::Name(_)
                | Token::NameTest(_)
                | Token::NodeType(_)
                | Token::Axis(_)
                | Token::Star
                | Token::At
                | Token::Dot
                | Token::DoubleDot
        )
    }

    fn path(&mut self) -> Result<Expr> {
        let start = match self.current {
            Token::Slash => {
                self.advance()?;
                if !self.at_step_start() {
                    return Ok(Expr::Root);
                }
                Expr::Path(Box::new(Expr::Root), Box::new(self.step()?))
            }
            Token::DoubleSlash => {
                self.advance()?;
                descendant_path(Expr::Root, self.step()?)
            }
            _ => self.filter()?,
        };
        self.relative_steps(start)
    }

    /// Trailing `/step` and `//step` after `expr`
    fn relative_steps(&mut self, mut expr: Expr) -> Result<Expr> {
        loop {
            expr = match self.current {
                Token::Slash => {
                    self.advance()?;
                    Expr::Path(Box::new(expr), Box::new(self.step()?))
                }
                Token::DoubleSlash => {
                    self.advance()?;
                    descendant_path(expr, self.step()?)
                }
                _ => return Ok(expr),
            };
        }
    }

    fn filter(&mut self) -> Result<Expr> {
        let mut expr = self.primary()?;
        while self.current == Token::LeftBracket {
            expr = Expr::Filter(Box::new(expr), Box::new(self.predicate()?));
        }
        Ok(expr)
    }

    fn predicate(&mut self) -> Result<Expr> {
        self.expect(Token::LeftBracket, "[")?;
        let predicate = self.expr()?;
        self.expect(Token::RightBracket, "]")?;
        Ok(predicate)
    }

    fn primary(&mut self) -> Result<Expr> {
        let expr = match &self.current {
            Token::Number(n) => Expr::Number(*n),
            Token::String(s) => Expr::String(s.clone()),
            Token::Dot => Expr::Context,
            Token::Dollar => {
                self.advance()?;
                let Token::Name(name) = &self.current else {
                    return Err(Error::xpath(format!("Expected variable name in \"{}\"", self.input)));
                };
                Expr::Variable(name.clone())
            }
            Token::LeftParen => {
                self.advance()?;
                let inner = self.expr()?;
                self.expect(Token::RightParen, ")")?;
                return Ok(inner);
            }
            Token::Name(name) => {
                let name = name.clone();
                if *self.peek()? != Token::LeftParen {
                    return Ok(Expr::Step(Box::new(self.step()?)));
                }
                self.advance()?;
                self.advance()?;
                return Ok(Expr::Function(name, self.arguments()?));
            }
            _ if self.at_step_start() => return Ok(Expr::Step(Box::new(self.step()?))),
            _ => return Err(self.unexpected()),
        };
        self.advance()?;
        Ok(expr)
    }

    fn axis(&mut self) -> Result<Axis> {
        match &self.current {
            Token::At => {
                self.advance()?;
                Ok(Axis::Attribute)
            }
            Token::Axis(name) => {
                let axis = Axis::from_name(name)
                    .ok_or_else(|| Error::xpath(format!("Unknown axis \"{}\" in \"{}\"", name, self.input)))?;
                self.advance()?;
                self.expect(Token::DoubleColon, "::")?;
                Ok(axis)
            }
            _ => Ok(Axis::Child),
        }
    }

    fn node_test(&mut self) -> Result<NodeTest> {
        let test = match &self.current {
            Token::Star => NodeTest::Any,
            Token::Name(name) => NodeTest::Name(name.clone()),
            Token::NameTest(qname) => {
                return Err(Error::xpath(format!(
                    "Cannot resolve namespace prefix of \"{}\" in \"{}\"",
                    qname, self.input
                )));
            }
            Token::NodeType(kind) => {
                let kind = kind.clone();
                self.advance()?;
                self.expect(Token::LeftParen, "(")?;
                let target = match &self.current {
                    Token::String(s) => Some(s.clone()),
                    _ => None,
                };
                if target.is_some() {
                    self.advance()?;
                }
                self.expect(Token::RightParen, ")")?;
                return Ok(match kind.as_str() {
                    "node" => NodeTest::Node,
                    "text" => NodeTest::Text,
                    "comment" => NodeTest::Comment,
                    _ => NodeTest::ProcessingInstruction(target),
                });
            }
            _ => {
                return Err(Error::xpath(format!(
                    "Expected node test but found {:?} in \"{}\"",
                    self.current, self.input
                )))
            }
        };
        self.advance()?;
        Ok(test)
    }

    /// `.`, `..` or `axis::test[predicate]*`
    fn step(&mut self) -> Result<Step> {
        let abbreviated = match self.current {
            Token::Dot => Some(Axis::Self_),
            Token::DoubleDot => Some(Axis::Parent),
            _ => None,
        };
        if let Some(axis) = abbreviated {
            self.advance()?;
            return Ok(Step::any_node(axis));
        }
        let axis = self.axis()?;
        let node_test = self.node_test()?;
        let mut predicates = Vec::new();
        while self.current == Token::LeftBracket {
            predicates.push(self.predicate()?);
        }
        Ok(Step {
            axis,
            node_test,
            predicates,
        })
    }

    fn arguments(&mut self) -> Result<Vec<Expr>> {
        let mut args = Vec::new();
        if self.current != Token::RightParen {
            args.push(self.expr()?);
            while self.current == Token::Comma {
                self.advance()?;
                args.push(self.expr()?);
            }
        }
        self.expect(Token::RightParen, ")")?;
        Ok(args)
    }
}

pub fn parse(input: &str) -> Result<Expr> {
    Parser::new(input)?.parse()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_path() {
        let expr = parse("/COMPILATION_UNIT/DEFINITION").unwrap();
        let Expr::Path(base, step) = expr else {
            panic!("expected a path");
        };
        assert_eq!(step.node_test, NodeTest::Name("DEFINITION".to_string()));
        assert!(matches!(*base, Expr::Path(ref root, _) if matches!(**root, Expr::Root)));
    }

    #[test]
    fn test_step_predicates() {
        let expr = parse("DEFINITION[@tokenLine=4][1]").unwrap();
        let Expr::Step(step) = expr else {
            panic!("expected a step");
        };
        assert_eq!(step.axis, Axis::Child);
        assert_eq!(step.predicates.len(), 2);
    }

    #[test]
    fn test_abbreviated_steps_after_slash() {
        let expr = parse("STATEMENT/..").unwrap();
        assert!(matches!(expr, Expr::Path(_, ref step) if step.axis == Axis::Parent));
        let expr = parse("./leaf").unwrap();
        assert!(matches!(expr, Expr::Path(ref base, _) if matches!(**base, Expr::Context)));
        let expr = parse("..").unwrap();
        assert!(matches!(expr, Expr::Step(ref step) if step.axis == Axis::Parent));
    }

    #[test]
    fn test_context_filter() {
        let expr = parse(".[name() = \"tree\"]").unwrap();
        assert!(matches!(expr, Expr::Filter(ref base, _) if matches!(**base, Expr::Context)));
    }

    #[test]
    fn test_root_alone_and_union() {
        assert!(matches!(parse("/").unwrap(), Expr::Root));
        assert!(matches!(parse("//a | //b").unwrap(), Expr::Union(..)));
    }

    #[test]
    fn test_function() {
        let expr = parse("count(//IDENTIFIER)").unwrap();
        assert!(matches!(expr, Expr::Function(ref name, ref args) if name == "count" && args.len() == 1));
    }

    #[test]
    fn test_explicit_axis() {
        let expr = parse("ancestor-or-self::*").unwrap();
        assert!(matches!(expr, Expr::Step(ref step) if step.axis == Axis::AncestorOrSelf));
        assert!(parse("sideways::a").is_err());
    }

    #[test]
    fn test_errors() {
        assert!(parse("a b").is_err());
        assert!(parse("a[1").is_err());
        assert!(parse("count(").is_err());
        assert!(parse("p:a").is_err());
        assert!(parse("").is_err());
    }
}
