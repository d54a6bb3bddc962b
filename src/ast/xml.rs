//! XML rendering of an AST

use super::node::AstNode;

pub struct AstXmlPrinter;

impl AstXmlPrinter {
    pub fn print(root: AstNode<'_>) -> String {
        let mut out = String::with_capacity(256);
        Self::print_node(&mut out, 0, root);
        out
    }

    fn print_node(out: &mut String, level: usize, node: AstNode<'_>) {
        if level != 0 {
            out.push('\n');
        }
        append_spaces(out, level);
        out.push('<');
        append_node_content(out, node);
        if node.has_children() {
            out.push('>');
            for child in node.children() {
                Self::print_node(out, level + 1, child);
            }
            out.push('\n');
            append_spaces(out, level);
            out.push_str("</");
            out.push_str(node.name());
            out.push('>');
        } else {
            out.push_str("/>");
        }
    }
}

fn append_spaces(out: &mut String, level: usize) {
    for _ in 0..level {
        out.push_str("  ");
    }
}

fn append_node_content(out: &mut String, node: AstNode<'_>) {
    out.push_str(node.name());
    if let Some(token) = node.token() {
        if !token.value().is_empty() {
            out.push_str(" tokenValue=\"");
            escape_attribute(out, token.value());
            out.push('"');
        }
        out.push_str(" tokenLine=\"");
        out.push_str(&token.line().to_string());
        out.push_str("\" tokenColumn=\"");
        out.push_str(&token.column().to_string());
        out.push('"');
    }
}

fn escape_attribute(out: &mut String, value: &str) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
