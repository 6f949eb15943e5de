//! Owned view of the parsed markup.
//!
//! Parsing is handed to `scraper` (html5ever underneath), which behaves like a browser parser:
//! misnested tags are repaired, `<p>` is implicitly closed by block elements, and so on. The
//! parsed body is then copied into plain [`DomNode`]s so the tree builder does not have to hold
//! parser handles across `.await` points.

use std::collections::HashMap;

use ego_tree::NodeRef;
use scraper::{ElementRef, Html, node::Node};

use crate::errors::ConversionError;

pub const TEXT_NODE: &str = "#text";
pub const COMMENT_NODE: &str = "#comment";

#[derive(Clone, PartialEq, Debug, Default)]
pub struct DomNode {
    /// Uppercased tag name, or one of the `#text`/`#comment` markers
    pub name: String,
    pub attributes: HashMap<String, String>,
    /// Concatenated text of the node and all of its descendants
    pub text_content: String,
    pub children: Vec<DomNode>,
}

impl DomNode {
    pub fn text(value: &str) -> Self {
        DomNode {
            name: TEXT_NODE.to_string(),
            text_content: value.to_string(),
            ..Default::default()
        }
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes
            .get(&name.to_ascii_lowercase())
            .map(String::as_str)
    }

    pub fn has_text(&self) -> bool {
        !self.text_content.trim().is_empty()
    }

    fn from_node_ref(node: NodeRef<'_, Node>) -> Option<Self> {
        match node.value() {
            Node::Text(text) => Some(DomNode::text(text)),
            Node::Comment(comment) => Some(DomNode {
                name: COMMENT_NODE.to_string(),
                text_content: (**comment).to_string(),
                ..Default::default()
            }),
            Node::Element(element) => {
                let element_ref = ElementRef::wrap(node)?;
                Some(DomNode {
                    name: element.name().to_ascii_uppercase(),
                    attributes: element
                        .attrs()
                        .map(|(name, value)| (name.to_ascii_lowercase(), value.to_string()))
                        .collect(),
                    text_content: element_ref.text().collect(),
                    children: node.children().filter_map(DomNode::from_node_ref).collect(),
                })
            }
            Node::ProcessingInstruction(_) => Some(DomNode {
                name: "#processing-instruction".to_string(),
                ..Default::default()
            }),
            // doctype and document/fragment roots never show up inside <body>
            _ => None,
        }
    }
}

/// Parses a full HTML document and returns the children of its `<body>`
pub fn parse_body(document: &str) -> Result<Vec<DomNode>, ConversionError> {
    let html = Html::parse_document(document);
    let body = html
        .root_element()
        .children()
        .filter_map(ElementRef::wrap)
        .find(|element| element.value().name() == "body")
        .ok_or(ConversionError::MissingBody)?;
    Ok(body
        .children()
        .filter_map(DomNode::from_node_ref)
        .collect())
}
