#![forbid(unsafe_code)]

//! Indented serialization of the canonical tree.
//!
//! Layout rules:
//! - one indent unit per nesting level before each opening tag,
//! - childless elements render in empty-element form (`<a/>`),
//! - an element containing text renders its entire subtree inline, with no
//!   added indentation or newlines anywhere in the run,
//! - output ends with a single newline.

use crate::escape;
use crate::tree::{Document, Element, Node};
use crate::CanonOptions;
use knivsta_core::Error;

/// Serialize a canonical tree to a string.
pub fn serialize(doc: &Document, options: &CanonOptions) -> String {
    let mut out = String::new();
    if options.xml_declaration {
        out.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    }
    render_element(&doc.root, 0, options, &mut out);
    out.push('\n');
    out
}

/// Serialize a canonical tree into an output sink.
pub fn write_to<W: std::io::Write>(
    doc: &Document,
    options: &CanonOptions,
    sink: &mut W,
) -> Result<(), Error> {
    let rendered = serialize(doc, options);
    sink.write_all(rendered.as_bytes())
        .map_err(|e| Error::Serialize(e.to_string()))
}

fn push_indent(depth: usize, options: &CanonOptions, out: &mut String) {
    for _ in 0..depth {
        out.push_str(&options.indent);
    }
}

fn render_start_tag(el: &Element, out: &mut String) {
    out.push('<');
    out.push_str(&el.qualified_name);
    for decl in &el.ns_decls {
        out.push_str(&decl.render());
    }
    for attr in &el.attributes {
        out.push_str(&attr.render());
    }
}

fn render_element(el: &Element, depth: usize, options: &CanonOptions, out: &mut String) {
    push_indent(depth, options, out);
    render_start_tag(el, out);
    if el.children.is_empty() {
        out.push_str("/>");
    } else if el.has_text() {
        // Text content renders inline; indentation inside the run would
        // introduce new character data.
        out.push('>');
        for child in &el.children {
            render_inline(child, out);
        }
        out.push_str("</");
        out.push_str(&el.qualified_name);
        out.push('>');
    } else {
        out.push('>');
        for child in &el.children {
            out.push('\n');
            render_node(child, depth + 1, options, out);
        }
        out.push('\n');
        push_indent(depth, options, out);
        out.push_str("</");
        out.push_str(&el.qualified_name);
        out.push('>');
    }
}

fn render_node(node: &Node, depth: usize, options: &CanonOptions, out: &mut String) {
    match node {
        Node::Element(el) => render_element(el, depth, options, out),
        leaf => {
            push_indent(depth, options, out);
            render_inline(leaf, out);
        }
    }
}

fn render_inline(node: &Node, out: &mut String) {
    match node {
        Node::Element(el) => {
            render_start_tag(el, out);
            if el.children.is_empty() {
                out.push_str("/>");
            } else {
                out.push('>');
                for child in &el.children {
                    render_inline(child, out);
                }
                out.push_str("</");
                out.push_str(&el.qualified_name);
                out.push('>');
            }
        }
        Node::Text(text) => out.push_str(&escape::escape_text(text)),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::Pi(pi) => {
            out.push_str("<?");
            out.push_str(&pi.target);
            if let Some(data) = &pi.data {
                out.push(' ');
                out.push_str(&escape::escape_pi(data));
            }
            out.push_str("?>");
        }
    }
}
