//! XPath Evaluation Engine
//!
//! Evaluates compiled XPath expressions against a syntax tree.

use std::cmp::Ordering;
use std::collections::HashSet;

use super::axes::{matches_node_test, navigate};
use super::compiler::{CompiledExpr, CompiledNodeTest, Op};
use super::functions;
use super::parser::{Axis, BinaryOp};
use super::value::{XNode, XPathValue};
use crate::ast::Ast;
use crate::error::{Error, Result};

/// Evaluation context
pub struct EvalContext<'a> {
    pub ast: &'a Ast,
    pub context_node: XNode,
    pub context_position: usize,
    pub context_size: usize,
}

impl<'a> EvalContext<'a> {
    pub fn new(ast: &'a Ast, context_node: XNode) -> Self {
        EvalContext {
            ast,
            context_node,
            context_position: 1,
            context_size: 1,
        }
    }

    fn at(&self, node: XNode, position: usize, size: usize) -> EvalContext<'a> {
        EvalContext {
            ast: self.ast,
            context_node: node,
            context_position: position,
            context_size: size,
        }
    }
}

/// Evaluate an XPath expression from a context node
pub fn evaluate(ast: &Ast, context_node: XNode, xpath: &str) -> Result<XPathValue> {
    let compiled = super::compiler::compile(xpath)?;
    evaluate_compiled(&compiled, &EvalContext::new(ast, context_node))
}

fn pop_nodeset(stack: &mut Vec<XPathValue>, what: &str) -> Result<Vec<XNode>> {
    match stack.pop() {
        Some(XPathValue::NodeSet(nodes)) => Ok(nodes),
        Some(other) => Err(Error::xpath(format!("{} requires a node-set, got {:?}", what, other))),
        None => Ok(Vec::new()),
    }
}

/// Evaluate a compiled expression
pub fn evaluate_compiled(expr: &CompiledExpr, ctx: &EvalContext<'_>) -> Result<XPathValue> {
    let mut stack: Vec<XPathValue> = Vec::new();

    for op in &expr.ops {
        match op {
            Op::Root => stack.push(XPathValue::single_node(XNode::Document)),

            Op::Context => stack.push(XPathValue::single_node(ctx.context_node)),

            Op::Step(axis, node_test, predicates) => {
                let nodes = pop_nodeset(&mut stack, "A location step")?;
                let mut seen = HashSet::with_capacity(nodes.len());
                let mut result = Vec::with_capacity(nodes.len());
                for node in nodes {
                    for candidate in step(ctx, node, *axis, node_test, predicates)? {
                        if seen.insert(candidate) {
                            result.push(candidate);
                        }
                    }
                }
                result.sort_unstable();
                stack.push(XPathValue::NodeSet(result));
            }

            Op::Predicate(pred_expr) => {
                let nodes = pop_nodeset(&mut stack, "A predicate")?;
                stack.push(XPathValue::NodeSet(filter(ctx, nodes, pred_expr)?));
            }

            Op::Union => {
                let right = pop_nodeset(&mut stack, "Union")?;
                let mut result = pop_nodeset(&mut stack, "Union")?;
                let mut seen: HashSet<XNode> = result.iter().copied().collect();
                result.reserve(right.len());
                for node in right {
                    if seen.insert(node) {
                        result.push(node);
                    }
                }
                result.sort_unstable();
                stack.push(XPathValue::NodeSet(result));
            }

            Op::Number(n) => stack.push(XPathValue::Number(*n)),

            Op::String(s) => stack.push(XPathValue::String(s.clone())),

            Op::Negate => {
                let val = stack.pop().unwrap_or(XPathValue::Number(0.0));
                stack.push(XPathValue::Number(-val.to_number(ctx.ast)?));
            }

            Op::Binary(op) => {
                let right = stack.pop().unwrap_or(XPathValue::Number(0.0));
                let left = stack.pop().unwrap_or(XPathValue::Number(0.0));
                let ast = ctx.ast;

                let result = match op {
                    BinaryOp::Or => XPathValue::Boolean(left.to_boolean() || right.to_boolean()),
                    BinaryOp::And => XPathValue::Boolean(left.to_boolean() && right.to_boolean()),
                    BinaryOp::Eq
                    | BinaryOp::NotEq
                    | BinaryOp::Lt
                    | BinaryOp::LtEq
                    | BinaryOp::Gt
                    | BinaryOp::GtEq => XPathValue::Boolean(compare(ast, *op, &left, &right)?),
                    BinaryOp::Add => XPathValue::Number(left.to_number(ast)? + right.to_number(ast)?),
                    BinaryOp::Sub => XPathValue::Number(left.to_number(ast)? - right.to_number(ast)?),
                    BinaryOp::Mul => XPathValue::Number(left.to_number(ast)? * right.to_number(ast)?),
                    BinaryOp::Div => XPathValue::Number(left.to_number(ast)? / right.to_number(ast)?),
                    BinaryOp::Mod => XPathValue::Number(left.to_number(ast)? % right.to_number(ast)?),
                };

                stack.push(result);
            }

            Op::Call(name, arg_count) => {
                let mut args = Vec::with_capacity(*arg_count);
                for _ in 0..*arg_count {
                    args.push(stack.pop().unwrap_or_default());
                }
                args.reverse();
                stack.push(functions::call(name, args, ctx)?);
            }
        }
    }

    Ok(stack.pop().unwrap_or_default())
}

/// One location step from a single node; predicates see axis order positions
fn step(
    ctx: &EvalContext<'_>,
    node: XNode,
    axis: Axis,
    node_test: &CompiledNodeTest,
    predicates: &[CompiledExpr],
) -> Result<Vec<XNode>> {
    let mut candidates: Vec<XNode> = navigate(ctx.ast, node, axis)
        .into_iter()
        .filter(|&candidate| matches_node_test(ctx.ast, candidate, axis, node_test))
        .collect();
    for predicate in predicates {
        candidates = filter(ctx, candidates, predicate)?;
    }
    Ok(candidates)
}

/// Keeps the nodes for which the predicate holds; a number selects a position
fn filter(ctx: &EvalContext<'_>, nodes: Vec<XNode>, predicate: &CompiledExpr) -> Result<Vec<XNode>> {
    let size = nodes.len();
    let mut filtered = Vec::new();
    for (i, node) in nodes.into_iter().enumerate() {
        let pred_ctx = ctx.at(node, i + 1, size);
        let include = match evaluate_compiled(predicate, &pred_ctx)? {
            XPathValue::Number(n) => (i + 1) as f64 == n,
            other => other.to_boolean(),
        };
        if include {
            filtered.push(node);
        }
    }
    Ok(filtered)
}

/// XPath 1.0 comparison: node-sets compare existentially through their string-values
fn compare(ast: &Ast, op: BinaryOp, left: &XPathValue, right: &XPathValue) -> Result<bool> {
    match (left, right) {
        (XPathValue::NodeSet(nodes), XPathValue::Boolean(_)) => {
            compare_atoms(ast, op, &XPathValue::Boolean(!nodes.is_empty()), right)
        }
        (XPathValue::Boolean(_), XPathValue::NodeSet(nodes)) => {
            compare_atoms(ast, op, left, &XPathValue::Boolean(!nodes.is_empty()))
        }
        (XPathValue::NodeSet(ln), XPathValue::NodeSet(rn)) => {
            for l in ln {
                let ls = XPathValue::String(l.string_value(ast)?);
                for r in rn {
                    let rs = XPathValue::String(r.string_value(ast)?);
                    if compare_atoms(ast, op, &ls, &rs)? {
                        return Ok(true);
                    }
                }
            }
            Ok(false)
        }
        (XPathValue::NodeSet(nodes), other) => {
            for n in nodes {
                if compare_atoms(ast, op, &XPathValue::String(n.string_value(ast)?), other)? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        (other, XPathValue::NodeSet(nodes)) => {
            for n in nodes {
                if compare_atoms(ast, op, other, &XPathValue::String(n.string_value(ast)?))? {
                    return Ok(true);
                }
            }
            Ok(false)
        }
        _ => compare_atoms(ast, op, left, right),
    }
}

fn compare_atoms(ast: &Ast, op: BinaryOp, left: &XPathValue, right: &XPathValue) -> Result<bool> {
    let is_boolean = |v: &XPathValue| matches!(v, XPathValue::Boolean(_));
    let is_number = |v: &XPathValue| matches!(v, XPathValue::Number(_));
    match op {
        BinaryOp::Eq | BinaryOp::NotEq => {
            let equal = if is_boolean(left) || is_boolean(right) {
                left.to_boolean() == right.to_boolean()
            } else if is_number(left) || is_number(right) {
                left.to_number(ast)? == right.to_number(ast)?
            } else {
                left.to_string_value(ast)? == right.to_string_value(ast)?
            };
            Ok(equal == (op == BinaryOp::Eq))
        }
        _ => {
            let ordering = left.to_number(ast)?.partial_cmp(&right.to_number(ast)?);
            Ok(match (op, ordering) {
                (_, None) => false,
                (BinaryOp::Lt, Some(o)) => o == Ordering::Less,
                (BinaryOp::LtEq, Some(o)) => o != Ordering::Greater,
                (BinaryOp::Gt, Some(o)) => o == Ordering::Greater,
                (_, Some(o)) => o != Ordering::Less,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenericTokenType, RuleKey, Token};
    use crate::ast::{AstBuilder, SkipPolicy};

    /// tree(branch(IDENTIFIER a, IDENTIFIER b), branch(IDENTIFIER c)); branches carry
    /// their first token, the tree carries none
    fn sample() -> Ast {
        let mut b = AstBuilder::new();
        let tree = b.rule_node(RuleKey::new("tree"), SkipPolicy::Never);
        for (line, values) in [(1, &["a", "b"][..]), (2, &["c"][..])] {
            let branch = b.rule_node(RuleKey::new("branch"), SkipPolicy::Never);
            for (column, v) in values.iter().enumerate() {
                let t = b.add_token(
                    Token::builder()
                        .token_type(GenericTokenType::IDENTIFIER)
                        .value_and_original_value(*v)
                        .line(line)
                        .column(column * 2)
                        .build()
                        .unwrap(),
                );
                let leaf = b.token_node(t);
                b.add_child(branch, leaf);
            }
            let first = b.node_token(b.children(branch)[0]);
            b.set_token(branch, first);
            b.add_child(tree, branch);
        }
        b.finish(tree)
    }

    fn eval(ast: &Ast, xpath: &str) -> XPathValue {
        evaluate(ast, XNode::Element(0), xpath).unwrap()
    }

    fn count(ast: &Ast, xpath: &str) -> usize {
        eval(ast, xpath).as_nodeset().map_or(0, |nodes| nodes.len())
    }

    #[test]
    fn test_paths() {
        let ast = sample();
        assert_eq!(eval(&ast, "/tree"), XPathValue::single_node(XNode::Element(0)));
        assert_eq!(count(&ast, "/tree/branch"), 2);
        assert_eq!(count(&ast, "//IDENTIFIER"), 3);
        assert_eq!(count(&ast, "//tree"), 1);
        assert_eq!(eval(&ast, "/"), XPathValue::single_node(XNode::Document));
    }

    #[test]
    fn test_positional_predicate_is_per_context_node() {
        let ast = sample();
        // first IDENTIFIER of each branch
        let values: Vec<_> = eval(&ast, "//branch/IDENTIFIER[1]/@tokenValue")
            .as_nodeset()
            .unwrap()
            .iter()
            .map(|n| n.string_value(&ast).unwrap())
            .collect();
        assert_eq!(values, ["a", "c"]);
        // the last ancestor in reverse axis order is the closest one
        assert_eq!(count(&ast, "//IDENTIFIER[1]/ancestor::*[1][self::branch]"), 2);
        assert_eq!(count(&ast, "(//IDENTIFIER)[3]"), 1);
    }

    #[test]
    fn test_attribute_comparisons() {
        let ast = sample();
        assert_eq!(count(&ast, "branch[@tokenLine = 2]"), 1);
        assert_eq!(count(&ast, "branch[@tokenValue = 'a']"), 1);
        assert_eq!(count(&ast, "branch[@tokenLine > 1.5]"), 1);
        assert_eq!(count(&ast, "//IDENTIFIER[@tokenColumn != 0]"), 1);
        assert_eq!(eval(&ast, "string(branch/@tokenValue)"), XPathValue::from("a"));
    }

    #[test]
    fn test_functions_in_predicates() {
        let ast = sample();
        assert_eq!(count(&ast, ".[name() = \"tree\"]"), 1);
        assert_eq!(count(&ast, ".[count(*) = 2]"), 1);
        assert_eq!(count(&ast, "branch[not(IDENTIFIER[2])]"), 1);
        assert_eq!(eval(&ast, "count(//IDENTIFIER) * 2 + 1"), XPathValue::Number(7.0));
    }

    #[test]
    fn test_union_is_in_document_order() {
        let ast = sample();
        let nodes = eval(&ast, "//branch[2] | //branch[1]/IDENTIFIER | /tree");
        assert_eq!(
            nodes.as_nodeset().unwrap(),
            [XNode::Element(0), XNode::Element(2), XNode::Element(3), XNode::Element(4)]
        );
    }

    #[test]
    fn test_relative_navigation() {
        let ast = sample();
        let from_branch = |xpath: &str| evaluate(&ast, XNode::Element(1), xpath).unwrap();
        assert_eq!(from_branch(".."), XPathValue::single_node(XNode::Element(0)));
        assert_eq!(from_branch("../branch[2]"), XPathValue::single_node(XNode::Element(4)));
        assert_eq!(from_branch("./IDENTIFIER").as_nodeset().unwrap().len(), 2);
        assert_eq!(from_branch("following::IDENTIFIER").as_nodeset().unwrap().len(), 1);
    }

    #[test]
    fn test_boolean_comparisons() {
        let ast = sample();
        assert_eq!(eval(&ast, "branch = true()"), XPathValue::Boolean(true));
        assert_eq!(eval(&ast, "nothing = false()"), XPathValue::Boolean(true));
        assert_eq!(eval(&ast, "nothing = 'x'"), XPathValue::Boolean(false));
        assert_eq!(eval(&ast, "1 < 2 and 'a' != 'b'"), XPathValue::Boolean(true));
    }

    #[test]
    fn test_element_string_value_is_an_error() {
        let ast = sample();
        let err = evaluate(&ast, XNode::Element(0), "branch = 'a'").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Implicit nodes to string conversion is not supported. Use the tokenValue attribute instead."
        );
    }

    #[test]
    fn test_step_on_a_number_is_an_error() {
        let ast = sample();
        assert!(evaluate(&ast, XNode::Element(0), "(1)/a").is_err());
    }
}
