//! XPath Axes Implementation
//!
//! All 13 XPath 1.0 axes over a syntax tree:
//! - child, parent, self
//! - descendant, descendant-or-self
//! - ancestor, ancestor-or-self
//! - following, following-sibling
//! - preceding, preceding-sibling
//! - attribute, namespace
//!
//! Nodes are returned in axis order: document order for forward axes,
//! reverse document order for reverse axes.

use super::compiler::CompiledNodeTest;
use super::parser::Axis;
use super::value::{AttributeName, XNode};
use crate::ast::{Ast, NodeId};

/// Navigate along an axis from a context node
pub fn navigate(ast: &Ast, context: XNode, axis: Axis) -> Vec<XNode> {
    match axis {
        Axis::Child => child_axis(ast, context),
        Axis::Descendant => descendant_axis(ast, context),
        Axis::DescendantOrSelf => {
            let mut result = vec![context];
            result.extend(descendant_axis(ast, context));
            result
        }
        Axis::Parent => parent_of(ast, context).into_iter().collect(),
        Axis::Ancestor => ancestor_axis(ast, context),
        Axis::AncestorOrSelf => {
            let mut result = vec![context];
            result.extend(ancestor_axis(ast, context));
            result
        }
        Axis::FollowingSibling => following_sibling_axis(ast, context),
        Axis::PrecedingSibling => preceding_sibling_axis(ast, context),
        Axis::Following => following_axis(ast, context),
        Axis::Preceding => preceding_axis(ast, context),
        Axis::Self_ => vec![context],
        Axis::Attribute => attribute_axis(ast, context),
        // syntax trees carry no namespaces
        Axis::Namespace => Vec::new(),
    }
}

fn elements(ids: impl IntoIterator<Item = NodeId>) -> Vec<XNode> {
    ids.into_iter().map(XNode::Element).collect()
}

fn child_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    match context {
        XNode::Document if !ast.is_empty() => vec![XNode::Element(0)],
        XNode::Element(id) => elements(ast.children_ids(id).iter().copied()),
        _ => Vec::new(),
    }
}

fn descendant_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    match context {
        XNode::Document => elements(0..ast.len() as NodeId),
        XNode::Element(id) => elements(ast.descendant_ids(id)),
        XNode::Attribute(..) => Vec::new(),
    }
}

pub(crate) fn parent_of(ast: &Ast, context: XNode) -> Option<XNode> {
    match context {
        XNode::Document => None,
        XNode::Element(id) => Some(ast.parent_id(id).map_or(XNode::Document, XNode::Element)),
        XNode::Attribute(id, _) => Some(XNode::Element(id)),
    }
}

fn ancestor_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    let mut result = Vec::new();
    let mut current = context;
    while let Some(parent) = parent_of(ast, current) {
        result.push(parent);
        current = parent;
    }
    result
}

fn following_sibling_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    let mut result = Vec::new();
    if let XNode::Element(id) = context {
        let mut sibling = ast.next_sibling_id(id);
        while let Some(sib_id) = sibling {
            result.push(XNode::Element(sib_id));
            sibling = ast.next_sibling_id(sib_id);
        }
    }
    result
}

fn preceding_sibling_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    let mut result = Vec::new();
    if let XNode::Element(id) = context {
        let mut sibling = ast.previous_sibling_id(id);
        while let Some(sib_id) = sibling {
            result.push(XNode::Element(sib_id));
            sibling = ast.previous_sibling_id(sib_id);
        }
    }
    result
}

/// Last node id of the subtree rooted at `id` (ids are contiguous in preorder)
fn subtree_end(ast: &Ast, id: NodeId) -> NodeId {
    let mut last = id;
    while let Some(&child) = ast.children_ids(last).last() {
        last = child;
    }
    last
}

/// All nodes after the context in document order, excluding its descendants
fn following_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    let first = match context {
        XNode::Document => return Vec::new(),
        XNode::Element(id) => subtree_end(ast, id) + 1,
        // the owner's descendants follow its attributes
        XNode::Attribute(id, _) => id + 1,
    };
    elements(first..ast.len() as NodeId)
}

/// All nodes before the context in document order, excluding its ancestors
fn preceding_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    let Some(id) = context.ast_node_id() else {
        return Vec::new();
    };
    let mut ancestors = Vec::new();
    let mut current = ast.parent_id(id);
    while let Some(parent) = current {
        ancestors.push(parent);
        current = ast.parent_id(parent);
    }
    (0..id)
        .rev()
        .filter(|candidate| !ancestors.contains(candidate))
        .map(XNode::Element)
        .collect()
}

fn attribute_axis(ast: &Ast, context: XNode) -> Vec<XNode> {
    match context {
        XNode::Element(id) if ast.token_of(id).is_some() => AttributeName::ALL
            .iter()
            .map(|&name| XNode::Attribute(id, name))
            .collect(),
        _ => Vec::new(),
    }
}

/// Check if a node found on `axis` matches a node test
pub fn matches_node_test(ast: &Ast, node: XNode, axis: Axis, node_test: &CompiledNodeTest) -> bool {
    // attributes are only reachable through the attribute axis, elements never are
    let principal_attribute = axis == Axis::Attribute;
    match node_test {
        CompiledNodeTest::Node => true,
        CompiledNodeTest::Never => false,
        CompiledNodeTest::Any => match node {
            XNode::Element(_) => !principal_attribute,
            XNode::Attribute(..) => principal_attribute,
            XNode::Document => false,
        },
        CompiledNodeTest::Name(name) => match node {
            XNode::Element(id) => !principal_attribute && ast.type_of(id).name() == name.as_str(),
            _ => false,
        },
        CompiledNodeTest::Attribute(expected) => {
            matches!(node, XNode::Attribute(_, actual) if actual == *expected)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::{GenericTokenType, RuleKey, Token};
    use crate::ast::{AstBuilder, SkipPolicy};

    const TREE: RuleKey = RuleKey::new("tree");
    const BRANCH: RuleKey = RuleKey::new("branch");

    /// tree(branch(IDENTIFIER a, IDENTIFIER b), branch(IDENTIFIER c))
    ///   0      1         2             3          4         5
    fn sample() -> Ast {
        let mut b = AstBuilder::new();
        let tree = b.rule_node(TREE, SkipPolicy::Never);
        for values in [&["a", "b"][..], &["c"][..]] {
            let branch = b.rule_node(BRANCH, SkipPolicy::Never);
            for v in values {
                let t = b.add_token(
                    Token::builder()
                        .token_type(GenericTokenType::IDENTIFIER)
                        .value_and_original_value(*v)
                        .line(1)
                        .column(0)
                        .build()
                        .unwrap(),
                );
                let leaf = b.token_node(t);
                b.add_child(branch, leaf);
            }
            b.add_child(tree, branch);
        }
        b.finish(tree)
    }

    fn ids(nodes: &[XNode]) -> Vec<NodeId> {
        nodes.iter().filter_map(|n| n.ast_node_id()).collect()
    }

    #[test]
    fn test_child_axis() {
        let ast = sample();
        assert_eq!(navigate(&ast, XNode::Document, Axis::Child), [XNode::Element(0)]);
        assert_eq!(ids(&navigate(&ast, XNode::Element(0), Axis::Child)), [1, 4]);
    }

    #[test]
    fn test_descendant_axes() {
        let ast = sample();
        assert_eq!(ids(&navigate(&ast, XNode::Element(1), Axis::Descendant)), [2, 3]);
        let from_document = navigate(&ast, XNode::Document, Axis::DescendantOrSelf);
        assert_eq!(from_document.len(), 7);
        assert_eq!(from_document[0], XNode::Document);
    }

    #[test]
    fn test_ancestor_axis() {
        let ast = sample();
        assert_eq!(
            navigate(&ast, XNode::Element(3), Axis::Ancestor),
            [XNode::Element(1), XNode::Element(0), XNode::Document]
        );
        assert_eq!(navigate(&ast, XNode::Element(0), Axis::Parent), [XNode::Document]);
    }

    #[test]
    fn test_sibling_axes() {
        let ast = sample();
        assert_eq!(ids(&navigate(&ast, XNode::Element(1), Axis::FollowingSibling)), [4]);
        assert_eq!(ids(&navigate(&ast, XNode::Element(3), Axis::PrecedingSibling)), [2]);
        assert!(navigate(&ast, XNode::Element(0), Axis::FollowingSibling).is_empty());
    }

    #[test]
    fn test_following_and_preceding() {
        let ast = sample();
        assert_eq!(ids(&navigate(&ast, XNode::Element(1), Axis::Following)), [4, 5]);
        assert_eq!(ids(&navigate(&ast, XNode::Element(5), Axis::Preceding)), [3, 2, 1]);
    }

    #[test]
    fn test_attribute_axis() {
        let ast = sample();
        let attributes = navigate(&ast, XNode::Element(2), Axis::Attribute);
        assert_eq!(
            attributes,
            [
                XNode::Attribute(2, AttributeName::TokenLine),
                XNode::Attribute(2, AttributeName::TokenColumn),
                XNode::Attribute(2, AttributeName::TokenValue),
            ]
        );
        // rule nodes built without a token have no attributes
        assert!(navigate(&ast, XNode::Element(1), Axis::Attribute).is_empty());
        assert!(navigate(&ast, XNode::Element(2), Axis::Namespace).is_empty());
    }

    #[test]
    fn test_node_tests() {
        let ast = sample();
        let branch = CompiledNodeTest::Name("branch".to_string());
        assert!(matches_node_test(&ast, XNode::Element(1), Axis::Child, &branch));
        assert!(!matches_node_test(&ast, XNode::Element(2), Axis::Child, &branch));
        assert!(!matches_node_test(&ast, XNode::Document, Axis::Child, &CompiledNodeTest::Any));
        assert!(matches_node_test(&ast, XNode::Document, Axis::Self_, &CompiledNodeTest::Node));
        let value = XNode::Attribute(2, AttributeName::TokenValue);
        assert!(matches_node_test(&ast, value, Axis::Attribute, &CompiledNodeTest::Any));
        assert!(matches_node_test(
            &ast,
            value,
            Axis::Attribute,
            &CompiledNodeTest::Attribute(AttributeName::TokenValue)
        ));
    }
}
