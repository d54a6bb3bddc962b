//! Core function library of XPath 1.0
//!
//! Argument counts are checked against `arity` before dispatch. Elements
//! have no string-value, so string functions called on them (explicitly or
//! through the context node) fail; use `@tokenValue`.

use super::eval::EvalContext;
use super::value::{parse_number, XNode, XPathValue};
use crate::ast::Ast;
use crate::error::{Error, Result};

/// Minimum and maximum argument counts of each known function
fn arity(name: &str) -> Option<(usize, usize)> {
    let bounds = match name {
        "position" | "last" | "true" | "false" => (0, 0),
        "local-name" | "name" | "namespace-uri" | "string" | "string-length" | "normalize-space" | "number" => {
            (0, 1)
        }
        "count" | "id" | "boolean" | "not" | "lang" | "sum" | "floor" | "ceiling" | "round" => (1, 1),
        "starts-with" | "contains" | "substring-before" | "substring-after" => (2, 2),
        "substring" => (2, 3),
        "translate" => (3, 3),
        "concat" => (2, usize::MAX),
        _ => return None,
    };
    Some(bounds)
}

fn check_arity(name: &str, given: usize) -> Result<()> {
    let (min, max) = arity(name).ok_or_else(|| Error::xpath(format!("No such function {}()", name)))?;
    if (min..=max).contains(&given) {
        return Ok(());
    }
    let expected = match (min, max) {
        _ if min == max => format!("exactly {}", min),
        (_, usize::MAX) => format!("at least {}", min),
        _ => format!("{} to {}", min, max),
    };
    Err(Error::xpath(format!(
        "{}() requires {} argument(s), got {}",
        name, expected, given
    )))
}

pub fn call(name: &str, args: Vec<XPathValue>, ctx: &EvalContext<'_>) -> Result<XPathValue> {
    check_arity(name, args.len())?;
    let ast = ctx.ast;
    let text = |i: usize| args[i].to_string_value(ast);
    let value = match name {
        "position" => XPathValue::Number(ctx.context_position as f64),
        "last" => XPathValue::Number(ctx.context_size as f64),
        "count" => XPathValue::Number(node_set(name, &args[0])?.len() as f64),
        "local-name" | "name" => {
            let node = match args.first() {
                None => Some(ctx.context_node),
                Some(arg) => node_set(name, arg)?.first().copied(),
            };
            XPathValue::String(node.map_or("", |n| n.name(ast)).to_string())
        }
        "namespace-uri" => XPathValue::String(String::new()),
        "id" => return Err(Error::xpath("id() is not supported: syntax trees have no ID attributes")),

        "string" => XPathValue::String(string_or_context(&args, ctx)?),
        "concat" => XPathValue::String(
            args.iter()
                .map(|arg| arg.to_string_value(ast))
                .collect::<Result<String>>()?,
        ),
        "starts-with" => XPathValue::Boolean(text(0)?.starts_with(&text(1)?)),
        "contains" => XPathValue::Boolean(text(0)?.contains(&text(1)?)),
        "substring" => {
            let start = round(args[1].to_number(ast)?);
            let length = args.get(2).map(|arg| arg.to_number(ast)).transpose()?;
            XPathValue::String(substring(&text(0)?, start, length))
        }
        "substring-before" => {
            let (s, pattern) = (text(0)?, text(1)?);
            XPathValue::String(s.find(&pattern).map_or_else(String::new, |at| s[..at].to_string()))
        }
        "substring-after" => {
            let (s, pattern) = (text(0)?, text(1)?);
            XPathValue::String(
                s.find(&pattern)
                    .map_or_else(String::new, |at| s[at + pattern.len()..].to_string()),
            )
        }
        "string-length" => XPathValue::Number(string_or_context(&args, ctx)?.chars().count() as f64),
        "normalize-space" => {
            let s = string_or_context(&args, ctx)?;
            XPathValue::String(s.split_whitespace().collect::<Vec<_>>().join(" "))
        }
        "translate" => XPathValue::String(translate(&text(0)?, &text(1)?, &text(2)?)),

        "boolean" => XPathValue::Boolean(args[0].to_boolean()),
        "not" => XPathValue::Boolean(!args[0].to_boolean()),
        "true" => XPathValue::Boolean(true),
        "false" => XPathValue::Boolean(false),
        // syntax trees carry no xml:lang
        "lang" => XPathValue::Boolean(false),

        "number" => XPathValue::Number(match args.first() {
            Some(arg) => arg.to_number(ast)?,
            None => parse_number(&ctx.context_node.string_value(ast)?),
        }),
        "sum" => XPathValue::Number(sum(node_set(name, &args[0])?, ast)?),
        "floor" => XPathValue::Number(args[0].to_number(ast)?.floor()),
        "ceiling" => XPathValue::Number(args[0].to_number(ast)?.ceil()),
        "round" => XPathValue::Number(round(args[0].to_number(ast)?)),
        _ => return Err(Error::xpath(format!("No such function {}()", name))),
    };
    Ok(value)
}

fn node_set<'v>(name: &str, arg: &'v XPathValue) -> Result<&'v [XNode]> {
    match arg {
        XPathValue::NodeSet(nodes) => Ok(nodes),
        _ => Err(Error::xpath(format!("{}() argument must be a node-set", name))),
    }
}

/// First argument as a string, or the context node's string-value without one
fn string_or_context(args: &[XPathValue], ctx: &EvalContext<'_>) -> Result<String> {
    match args.first() {
        Some(arg) => arg.to_string_value(ctx.ast),
        None => ctx.context_node.string_value(ctx.ast),
    }
}

/// Characters at 1-based positions p with start <= p < start + round(length)
fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let end = length.map_or(f64::INFINITY, |len| start + round(len));
    s.chars()
        .zip(1u32..)
        .filter(|&(_, position)| {
            let position = f64::from(position);
            position >= start && position < end
        })
        .map(|(c, _)| c)
        .collect()
}

fn translate(s: &str, from: &str, to: &str) -> String {
    let from: Vec<char> = from.chars().collect();
    let to: Vec<char> = to.chars().collect();
    s.chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(i) => to.get(i).copied(),
            None => Some(c),
        })
        .collect()
}

fn sum(nodes: &[XNode], ast: &Ast) -> Result<f64> {
    nodes
        .iter()
        .map(|node| Ok(parse_number(&node.string_value(ast)?)))
        .sum()
}

/// Halves go towards positive infinity
fn round(n: f64) -> f64 {
    if n.is_finite() {
        (n + 0.5).floor()
    } else {
        n
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RuleKey;
    use crate::ast::{Ast, AstBuilder, SkipPolicy};

    fn tree() -> Ast {
        let mut b = AstBuilder::new();
        let root = b.rule_node(RuleKey::new("tree"), SkipPolicy::Never);
        b.finish(root)
    }

    fn call_on(ast: &Ast, name: &str, args: Vec<XPathValue>) -> Result<XPathValue> {
        let ctx = EvalContext {
            ast,
            context_node: XNode::Element(0),
            context_position: 2,
            context_size: 5,
        };
        call(name, args, &ctx)
    }

    fn strings(values: &[&str]) -> Vec<XPathValue> {
        values.iter().map(|&v| XPathValue::from(v)).collect()
    }

    #[test]
    fn test_context_functions() {
        let ast = tree();
        assert_eq!(call_on(&ast, "position", vec![]).unwrap(), XPathValue::Number(2.0));
        assert_eq!(call_on(&ast, "last", vec![]).unwrap(), XPathValue::Number(5.0));
        assert_eq!(call_on(&ast, "name", vec![]).unwrap(), XPathValue::from("tree"));
        let document = vec![XPathValue::single_node(XNode::Document)];
        assert_eq!(call_on(&ast, "local-name", document).unwrap(), XPathValue::from("[root]"));
    }

    #[test]
    fn test_concat() {
        let ast = tree();
        let result = call_on(&ast, "concat", strings(&["hello", " ", "world"])).unwrap();
        assert_eq!(result, XPathValue::from("hello world"));
        assert!(call_on(&ast, "concat", strings(&["alone"])).is_err());
    }

    #[test]
    fn test_contains_and_starts_with() {
        let ast = tree();
        assert!(call_on(&ast, "contains", strings(&["hello world", "o w"])).unwrap().to_boolean());
        assert!(!call_on(&ast, "starts-with", strings(&["hello", "world"])).unwrap().to_boolean());
    }

    #[test]
    fn test_substring() {
        let ast = tree();
        let args = vec![XPathValue::from("12345"), XPathValue::Number(1.5), XPathValue::Number(2.6)];
        assert_eq!(call_on(&ast, "substring", args).unwrap(), XPathValue::from("234"));
        let args = vec![XPathValue::from("hello"), XPathValue::Number(2.0)];
        assert_eq!(call_on(&ast, "substring", args).unwrap(), XPathValue::from("ello"));
        let (before, after) = (
            call_on(&ast, "substring-before", strings(&["1999/04/01", "/"])).unwrap(),
            call_on(&ast, "substring-after", strings(&["1999/04/01", "/"])).unwrap(),
        );
        assert_eq!(before, XPathValue::from("1999"));
        assert_eq!(after, XPathValue::from("04/01"));
    }

    #[test]
    fn test_normalize_space_and_translate() {
        let ast = tree();
        let result = call_on(&ast, "normalize-space", strings(&["  hello   world  "])).unwrap();
        assert_eq!(result, XPathValue::from("hello world"));
        let result = call_on(&ast, "translate", strings(&["--aaa--", "abc-", "ABC"])).unwrap();
        assert_eq!(result, XPathValue::from("AAA"));
    }

    #[test]
    fn test_numbers() {
        let ast = tree();
        assert_eq!(call_on(&ast, "round", vec![XPathValue::Number(-2.5)]).unwrap(), XPathValue::Number(-2.0));
        assert_eq!(call_on(&ast, "floor", vec![XPathValue::Number(2.7)]).unwrap(), XPathValue::Number(2.0));
        assert_eq!(call_on(&ast, "ceiling", vec![XPathValue::from("2.1")]).unwrap(), XPathValue::Number(3.0));
        assert_eq!(call_on(&ast, "sum", vec![XPathValue::empty_nodeset()]).unwrap(), XPathValue::Number(0.0));
    }

    #[test]
    fn test_element_string_value_is_rejected() {
        let ast = tree();
        let err = call_on(&ast, "string", vec![]).unwrap_err();
        assert!(err.to_string().starts_with("Implicit nodes to string conversion is not supported"));
        assert!(call_on(&ast, "string-length", vec![]).is_err());
    }

    #[test]
    fn test_unknown_function_and_arity() {
        let ast = tree();
        assert_eq!(
            call_on(&ast, "frobnicate", vec![]).unwrap_err().to_string(),
            "No such function frobnicate()"
        );
        assert_eq!(
            call_on(&ast, "not", vec![]).unwrap_err().to_string(),
            "not() requires exactly 1 argument(s), got 0"
        );
        assert!(call_on(&ast, "id", strings(&["x"])).is_err());
    }
}
