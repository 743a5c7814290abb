#![forbid(unsafe_code)]

//! The canonical rewrite: a single recursive pass over the parsed tree.
//!
//! Elements are classified by a per-node predicate: an *element-only
//! container* has no direct text child carrying non-whitespace content.
//! Such containers lose their whitespace-only text children and have their
//! attributes and remaining children sorted by name.  Elements with real
//! text content are copied verbatim, child order and attribute order
//! intact, while the rewrite still recurses into each child.
//!
//! The input document is never mutated; every invocation builds a fresh
//! output tree.  The rewrite is a pure function of node names, so
//! canonicalizing already-canonical output yields the same tree.

use std::collections::BTreeMap;

use crate::tree::{Attr, Document, Element, Node, NsDecl, Pi};

/// Rewrite a parsed document into its canonical tree.
pub fn canonical_tree(doc: &roxmltree::Document<'_>) -> Document {
    Document {
        root: build_element(doc.root_element(), &BTreeMap::new()),
    }
}

/// Whether the element has a direct text child with non-whitespace content.
pub fn has_direct_text(node: roxmltree::Node<'_, '_>) -> bool {
    node.children()
        .any(|c| c.is_text() && !is_xml_whitespace(c.text().unwrap_or("")))
}

fn is_xml_whitespace(s: &str) -> bool {
    s.chars().all(|c| matches!(c, ' ' | '\t' | '\n' | '\r'))
}

fn build_element(
    node: roxmltree::Node<'_, '_>,
    inherited_ns: &BTreeMap<String, String>,
) -> Element {
    let scope = namespace_scope(&node, inherited_ns);

    // Emit only the declarations this element introduces relative to the
    // inherited scope.  The xml prefix is never re-declared.
    let mut ns_decls: Vec<NsDecl> = Vec::new();
    for (prefix, uri) in &scope {
        if prefix == "xml" {
            continue;
        }
        if inherited_ns.get(prefix) != Some(uri) {
            ns_decls.push(NsDecl {
                prefix: prefix.clone(),
                uri: uri.clone(),
            });
        }
    }
    // An inherited default namespace that goes out of scope here must be
    // undeclared with xmlns="".
    if let Some(inherited_default) = inherited_ns.get("") {
        if !inherited_default.is_empty() && !scope.contains_key("") {
            ns_decls.push(NsDecl {
                prefix: String::new(),
                uri: String::new(),
            });
        }
    }
    ns_decls.sort();

    let mut attributes: Vec<Attr> = node
        .attributes()
        .map(|attr| Attr {
            local_name: attr.name().to_owned(),
            qualified_name: qualified_attr_name(&attr),
            value: attr.value().to_owned(),
        })
        .collect();

    let element_only = !has_direct_text(node);

    let mut children: Vec<Node> = Vec::new();
    for child in node.children() {
        if element_only && child.is_text() {
            // Classification guarantees this text is whitespace-only.
            continue;
        }
        if let Some(built) = build_node(child, &scope) {
            children.push(built);
        }
    }

    if element_only {
        attributes.sort();
        // Stable: children sharing a name keep their relative order.
        children.sort_by(|a, b| a.sort_name().cmp(b.sort_name()));
    }

    let (local_name, qualified_name) = qualified_element_name(&node);
    Element {
        local_name,
        qualified_name,
        ns_decls,
        attributes,
        children,
    }
}

fn build_node(
    node: roxmltree::Node<'_, '_>,
    inherited_ns: &BTreeMap<String, String>,
) -> Option<Node> {
    match node.node_type() {
        roxmltree::NodeType::Element => Some(Node::Element(build_element(node, inherited_ns))),
        roxmltree::NodeType::Text => Some(Node::Text(node.text().unwrap_or("").to_owned())),
        roxmltree::NodeType::Comment => Some(Node::Comment(node.text().unwrap_or("").to_owned())),
        roxmltree::NodeType::PI => Some(Node::Pi(Pi {
            target: node.tag_name().name().to_owned(),
            data: node.text().map(str::to_owned).filter(|s| !s.is_empty()),
        })),
        roxmltree::NodeType::Root => None,
    }
}

/// The namespace scope at `node`: the inherited scope overlaid with the
/// declarations in effect on this element.
fn namespace_scope(
    node: &roxmltree::Node<'_, '_>,
    inherited_ns: &BTreeMap<String, String>,
) -> BTreeMap<String, String> {
    let mut scope = inherited_ns.clone();
    for ns in node.namespaces() {
        let prefix = ns.name().unwrap_or("").to_owned();
        if ns.uri().is_empty() {
            // Un-declaration of the default namespace.
            scope.remove(&prefix);
        } else {
            scope.insert(prefix, ns.uri().to_owned());
        }
    }
    scope
}

/// Get the (local, qualified) element name.
fn qualified_element_name(node: &roxmltree::Node<'_, '_>) -> (String, String) {
    let local = node.tag_name().name().to_owned();
    let qualified = match node.tag_name_prefix() {
        Some(prefix) if !prefix.is_empty() => format!("{prefix}:{local}"),
        _ => local.clone(),
    };
    (local, qualified)
}

/// Get the qualified name for an attribute.
fn qualified_attr_name(attr: &roxmltree::Attribute<'_, '_>) -> String {
    if attr.namespace() == Some("http://www.w3.org/XML/1998/namespace") {
        return format!("xml:{}", attr.name());
    }
    match attr.prefix() {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, attr.name()),
        _ => attr.name().to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tree(xml: &str) -> Document {
        canonical_tree(&roxmltree::Document::parse(xml).unwrap())
    }

    fn child_names(el: &Element) -> Vec<String> {
        el.children
            .iter()
            .map(|c| c.sort_name().to_owned())
            .collect()
    }

    #[test]
    fn test_has_direct_text() {
        let doc = roxmltree::Document::parse("<a>  <b/>  </a>").unwrap();
        assert!(!has_direct_text(doc.root_element()));

        let doc = roxmltree::Document::parse("<a>x<b/></a>").unwrap();
        assert!(has_direct_text(doc.root_element()));
    }

    #[test]
    fn test_whitespace_only_text_dropped() {
        let doc = tree("<a>   <b/>   <c/>   </a>");
        assert_eq!(doc.root.children.len(), 2);
        assert!(doc
            .root
            .children
            .iter()
            .all(|c| matches!(c, Node::Element(_))));
    }

    #[test]
    fn test_children_sorted_stable() {
        let doc = tree(r#"<r><z/><a id="1"/><a id="2"/></r>"#);
        assert_eq!(child_names(&doc.root), ["a", "a", "z"]);
        match (&doc.root.children[0], &doc.root.children[1]) {
            (Node::Element(first), Node::Element(second)) => {
                assert_eq!(first.attributes[0].value, "1");
                assert_eq!(second.attributes[0].value, "2");
            }
            _ => panic!("expected elements"),
        }
    }

    #[test]
    fn test_comment_and_pi_sort_keys() {
        // Comments sort under the empty string, PIs under their target.
        let doc = tree("<r><z/><?go now?><!--note--></r>");
        assert!(matches!(doc.root.children[0], Node::Comment(_)));
        assert!(matches!(doc.root.children[1], Node::Pi(_)));
        assert!(matches!(doc.root.children[2], Node::Element(_)));
    }

    #[test]
    fn test_mixed_content_preserved() {
        let doc = tree("<p>Hello <b>world</b></p>");
        assert_eq!(doc.root.children.len(), 2);
        match &doc.root.children[0] {
            Node::Text(t) => assert_eq!(t, "Hello "),
            other => panic!("expected text, got {other:?}"),
        }
        match &doc.root.children[1] {
            Node::Element(b) => {
                assert_eq!(b.local_name, "b");
                assert_eq!(b.children, vec![Node::Text("world".to_owned())]);
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_attributes_sorted_on_element_only() {
        let doc = tree(r#"<e c="1" a="2" b="3"/>"#);
        let names: Vec<_> = doc
            .root
            .attributes
            .iter()
            .map(|a| a.local_name.as_str())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_attributes_untouched_on_text_bearing() {
        let doc = tree(r#"<e b="2" a="1">x</e>"#);
        let names: Vec<_> = doc
            .root
            .attributes
            .iter()
            .map(|a| a.local_name.as_str())
            .collect();
        assert_eq!(names, ["b", "a"]);
    }

    #[test]
    fn test_namespace_declarations_collected() {
        let doc = tree(r#"<r xmlns:b="urn:b" xmlns:a="urn:a"><a:x/></r>"#);
        let prefixes: Vec<_> = doc
            .root
            .ns_decls
            .iter()
            .map(|d| d.prefix.as_str())
            .collect();
        assert_eq!(prefixes, ["a", "b"]);

        match &doc.root.children[0] {
            Node::Element(x) => {
                assert_eq!(x.qualified_name, "a:x");
                assert!(x.ns_decls.is_empty());
            }
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_default_namespace_inherited() {
        let doc = tree(r#"<r xmlns="urn:d"><x/></r>"#);
        assert_eq!(doc.root.ns_decls.len(), 1);
        assert_eq!(doc.root.ns_decls[0].prefix, "");
        assert_eq!(doc.root.ns_decls[0].uri, "urn:d");
        match &doc.root.children[0] {
            Node::Element(x) => assert!(x.ns_decls.is_empty()),
            other => panic!("expected element, got {other:?}"),
        }
    }

    #[test]
    fn test_input_not_mutated() {
        let source = roxmltree::Document::parse("<a><c/><b/></a>").unwrap();
        let first = canonical_tree(&source);
        let second = canonical_tree(&source);
        assert_eq!(first, second);
        assert_eq!(child_names(&first.root), ["b", "c"]);
    }
}
