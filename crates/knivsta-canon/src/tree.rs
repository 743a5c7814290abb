#![forbid(unsafe_code)]

//! The canonical output tree.
//!
//! The transform never mutates the parsed input; it builds a fresh tree of
//! these types, which the serializer then renders.  Structural equality
//! (`PartialEq`) on [`Document`] is the comparison the canonical form
//! exists for.

/// A canonicalized document: a single root element, no other metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub root: Element,
}

/// A node in the canonical tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Node {
    Element(Element),
    Text(String),
    Comment(String),
    Pi(Pi),
}

impl Node {
    /// The name this node sorts under among its siblings.
    ///
    /// Elements sort by local tag name and processing instructions by
    /// target.  Comments have no name and sort under the empty string,
    /// ahead of every named sibling.
    pub fn sort_name(&self) -> &str {
        match self {
            Node::Element(el) => &el.local_name,
            Node::Pi(pi) => &pi.target,
            Node::Text(_) | Node::Comment(_) => "",
        }
    }
}

/// A processing instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pi {
    pub target: String,
    pub data: Option<String>,
}

/// An element in the canonical tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    /// The local tag name (sort key).
    pub local_name: String,
    /// The qualified tag name as serialized (prefix:local or just local).
    pub qualified_name: String,
    /// Namespace declarations introduced by this element, already ordered.
    pub ns_decls: Vec<NsDecl>,
    /// Attributes; sorted for element-only containers, source order
    /// otherwise.
    pub attributes: Vec<Attr>,
    /// Child nodes; sorted for element-only containers, source order
    /// otherwise.
    pub children: Vec<Node>,
}

impl Element {
    /// Whether this element carries direct text content.
    ///
    /// Element-only containers have every text child dropped by the
    /// transform, so any remaining text child marks the element (and its
    /// whole subtree) for inline rendering.
    pub fn has_text(&self) -> bool {
        self.children
            .iter()
            .any(|c| matches!(c, Node::Text(_)))
    }
}

/// A namespace declaration introduced by an element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NsDecl {
    /// The prefix ("" for the default namespace).
    pub prefix: String,
    /// The namespace URI ("" undeclares the default namespace).
    pub uri: String,
}

impl NsDecl {
    /// Render this declaration to a string, leading space included.
    pub fn render(&self) -> String {
        if self.prefix.is_empty() {
            format!(" xmlns=\"{}\"", crate::escape::escape_attr(&self.uri))
        } else {
            format!(
                " xmlns:{}=\"{}\"",
                self.prefix,
                crate::escape::escape_attr(&self.uri)
            )
        }
    }
}

impl Ord for NsDecl {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Default namespace (empty prefix) sorts first, then by prefix.
        match (self.prefix.is_empty(), other.prefix.is_empty()) {
            (true, false) => std::cmp::Ordering::Less,
            (false, true) => std::cmp::Ordering::Greater,
            _ => self.prefix.cmp(&other.prefix),
        }
    }
}

impl PartialOrd for NsDecl {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

/// An attribute.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attr {
    /// The local name (primary sort key).
    pub local_name: String,
    /// The qualified name as serialized (prefix:local or just local).
    pub qualified_name: String,
    /// The attribute value.
    pub value: String,
}

impl Attr {
    /// Render this attribute to a string, leading space included.
    pub fn render(&self) -> String {
        format!(
            " {}=\"{}\"",
            self.qualified_name,
            crate::escape::escape_attr(&self.value)
        )
    }
}

impl Ord for Attr {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Local name first; the qualified name breaks ties between equal
        // local names bound to different prefixes.
        self.local_name
            .cmp(&other.local_name)
            .then_with(|| self.qualified_name.cmp(&other.qualified_name))
    }
}

impl PartialOrd for Attr {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn attr(local: &str, qualified: &str) -> Attr {
        Attr {
            local_name: local.to_owned(),
            qualified_name: qualified.to_owned(),
            value: String::new(),
        }
    }

    #[test]
    fn test_attr_ordering() {
        let mut attrs = vec![attr("c", "c"), attr("a", "a"), attr("b", "b")];
        attrs.sort();
        let names: Vec<_> = attrs.iter().map(|a| a.local_name.as_str()).collect();
        assert_eq!(names, ["a", "b", "c"]);
    }

    #[test]
    fn test_attr_ordering_prefix_tiebreak() {
        let mut attrs = vec![attr("id", "b:id"), attr("id", "a:id")];
        attrs.sort();
        assert_eq!(attrs[0].qualified_name, "a:id");
        assert_eq!(attrs[1].qualified_name, "b:id");
    }

    #[test]
    fn test_ns_decl_default_first() {
        let mut decls = vec![
            NsDecl {
                prefix: "a".to_owned(),
                uri: "urn:a".to_owned(),
            },
            NsDecl {
                prefix: String::new(),
                uri: "urn:default".to_owned(),
            },
        ];
        decls.sort();
        assert!(decls[0].prefix.is_empty());
    }

    #[test]
    fn test_sort_name() {
        assert_eq!(Node::Comment("c".to_owned()).sort_name(), "");
        let pi = Node::Pi(Pi {
            target: "go".to_owned(),
            data: None,
        });
        assert_eq!(pi.sort_name(), "go");
    }
}
