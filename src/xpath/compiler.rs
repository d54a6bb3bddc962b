//! XPath Expression Compiler
//!
//! Compiles parsed XPath expressions into a flat list of stack operations.

use super::parser::{Axis, BinaryOp, Expr, NodeTest, Step};
use super::value::AttributeName;
use crate::error::{Error, Result};

/// Compiled XPath expression
#[derive(Debug, Clone)]
pub struct CompiledExpr {
    pub ops: Vec<Op>,
}

/// Compiled operation
#[derive(Debug, Clone)]
pub enum Op {
    /// Push the document node
    Root,
    /// Push the context node
    Context,
    /// Replace the node-set on top of the stack by one location step from each node;
    /// predicates are applied per context node, in axis order
    Step(Axis, CompiledNodeTest, Vec<CompiledExpr>),
    /// Filter the node-set on top of the stack (document order positions)
    Predicate(Box<CompiledExpr>),
    /// Union two node sets
    Union,
    Number(f64),
    String(String),
    /// Call function: name, arg count
    Call(String, usize),
    Binary(BinaryOp),
    Negate,
}

/// Node test resolved against the AST data model
#[derive(Debug, Clone, PartialEq)]
pub enum CompiledNodeTest {
    /// Any node of the axis' principal type
    Any,
    /// Element with this rule or token type name
    Name(String),
    /// One of the token attributes
    Attribute(AttributeName),
    /// node()
    Node,
    /// Node kinds absent from syntax trees (text, comments, processing instructions)
    Never,
}

impl CompiledExpr {
    pub fn compile(expr: &Expr) -> Result<Self> {
        let mut ops = Vec::new();
        Self::compile_expr(expr, &mut ops)?;
        Ok(CompiledExpr { ops })
    }

    fn compile_expr(expr: &Expr, ops: &mut Vec<Op>) -> Result<()> {
        match expr {
            Expr::Root => ops.push(Op::Root),
            Expr::Context => ops.push(Op::Context),
            Expr::Number(n) => ops.push(Op::Number(*n)),
            Expr::String(s) => ops.push(Op::String(s.clone())),
            Expr::Variable(name) => {
                return Err(Error::xpath(format!("Unresolvable variable ${}", name)));
            }
            Expr::Negate(inner) => {
                Self::compile_expr(inner, ops)?;
                ops.push(Op::Negate);
            }
            Expr::Binary(left, op, right) => {
                Self::compile_expr(left, ops)?;
                Self::compile_expr(right, ops)?;
                ops.push(Op::Binary(*op));
            }
            Expr::Union(left, right) => {
                Self::compile_expr(left, ops)?;
                Self::compile_expr(right, ops)?;
                ops.push(Op::Union);
            }
            Expr::Path(base, step) => {
                Self::compile_expr(base, ops)?;
                Self::compile_step(step, ops)?;
            }
            Expr::Filter(base, pred) => {
                Self::compile_expr(base, ops)?;
                ops.push(Op::Predicate(Box::new(CompiledExpr::compile(pred)?)));
            }
            Expr::Step(step) => {
                ops.push(Op::Context);
                Self::compile_step(step, ops)?;
            }
            Expr::Function(name, args) => {
                for arg in args {
                    Self::compile_expr(arg, ops)?;
                }
                ops.push(Op::Call(name.clone(), args.len()));
            }
        }
        Ok(())
    }

    fn compile_step(step: &Step, ops: &mut Vec<Op>) -> Result<()> {
        let node_test = match (&step.node_test, step.axis) {
            (NodeTest::Name(name), Axis::Attribute) => {
                CompiledNodeTest::Attribute(AttributeName::from_name(name)?)
            }
            (NodeTest::Name(name), _) => CompiledNodeTest::Name(name.clone()),
            (NodeTest::Any, _) => CompiledNodeTest::Any,
            (NodeTest::Node, _) => CompiledNodeTest::Node,
            (NodeTest::Text | NodeTest::Comment | NodeTest::ProcessingInstruction(_), _) => {
                CompiledNodeTest::Never
            }
        };

        let predicates = step
            .predicates
            .iter()
            .map(CompiledExpr::compile)
            .collect::<Result<Vec<_>>>()?;
        ops.push(Op::Step(step.axis, node_test, predicates));
        Ok(())
    }
}

/// Compile an XPath expression string
pub fn compile(xpath: &str) -> Result<CompiledExpr> {
    let expr = super::parser::parse(xpath)?;
    CompiledExpr::compile(&expr)
}
