//! HTML Rendering for mounted trees
//!
//! Serializes a subtree back to markup, so hosts can push the current frame
//! of a reveal into a real document.

use crate::attr::Attrs;
use crate::node::{NodeData, NodeId, Tree};

/// Render a node (including its own tag) to HTML.
pub fn outer_html(tree: &Tree, id: NodeId) -> String {
    let mut output = String::new();
    render_node(tree, id, &mut output);
    output
}

/// Render only the children of a node to HTML.
pub fn inner_html(tree: &Tree, id: NodeId) -> String {
    let mut output = String::new();
    for child in tree.children(id) {
        render_node(tree, *child, &mut output);
    }
    output
}

fn render_node(tree: &Tree, id: NodeId, output: &mut String) {
    match tree.data(id) {
        Some(NodeData::Text(text)) => output.push_str(&escape_html(&text.content)),
        Some(NodeData::Element(elem)) => {
            output.push('<');
            output.push_str(&elem.tag);
            render_attrs(&elem.attrs, output);

            // Void elements
            if is_void_element(&elem.tag) {
                output.push('>');
                return;
            }

            output.push('>');
            for child in tree.children(id) {
                render_node(tree, *child, output);
            }
            output.push_str("</");
            output.push_str(&elem.tag);
            output.push('>');
        }
        None => {}
    }
}

/// Render attributes to HTML.
fn render_attrs(attrs: &Attrs, output: &mut String) {
    for (name, value) in attrs.iter() {
        output.push(' ');
        output.push_str(name);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }
}

/// Escape HTML special characters.
fn escape_html(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Escape attribute value special characters.
fn escape_attr(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => result.push_str("&amp;"),
            '"' => result.push_str("&quot;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            _ => result.push(c),
        }
    }
    result
}

/// Check if element is a void element (no closing tag).
fn is_void_element(tag: &str) -> bool {
    matches!(
        tag,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta" | "source" | "track" | "wbr"
    )
}

// =============================================================================
// Tests
// =============================================================================
