//! The HTML -> structured text transducer.
//!
//! Every DOM node is classified into a [`TagKind`] and turned into zero or more document nodes.
//! Nodes that may only live at the document root (image blocks, code) are appended to a
//! [`RootAccumulator`] owned by the conversion instead of the local sequence, however deep the
//! triggering markup is. Anything that cannot be represented becomes an error paragraph; a
//! conversion only fails outright if the markup cannot be parsed at all.
//!
//! Nested emphasis does not compose: `<b><i>x</i></b>` yields a single `strong` span holding
//! `x`, since each emphasis tag emits one span for its whole text content.

use log::error;

use crate::assets::AssetResolver;
use crate::dom::{DomNode, parse_body};
use crate::errors::ConversionError;
use crate::graph::document::Document;
use crate::graph::nodes::{ListStyle, Mark, Node};
use crate::normalizer::{normalize, wrap_document};

/// Fixed, greppable prefix of every error node
pub const ERROR_PREFIX: &str = "!!!!!!!! Error !!!!!!!!";
/// Error messages are cut to this many characters before the ellipsis is added
pub const MAX_ERROR_CHARS: usize = 500;

/// Recognized tag categories; everything else ends up in `Unknown`
#[derive(Clone, PartialEq, Eq, Debug)]
pub enum TagKind {
    Paragraph,
    Heading(u8),
    PlainText,
    Anchor,
    Emphasis(Mark),
    Image,
    List(ListStyle),
    ListItem,
    Code,
    HorizontalRule,
    Blockquote,
    Aside,
    Unknown(String),
}

impl TagKind {
    pub fn classify(name: &str) -> Self {
        let name = name.to_ascii_uppercase();
        match name.as_str() {
            "P" => TagKind::Paragraph,
            "H1" => TagKind::Heading(1),
            "H2" => TagKind::Heading(2),
            "H3" => TagKind::Heading(3),
            "H4" => TagKind::Heading(4),
            "H5" => TagKind::Heading(5),
            "H6" => TagKind::Heading(6),
            "#TEXT" | "SPAN" | "SUP" | "TT" | "FONT" => TagKind::PlainText,
            "A" => TagKind::Anchor,
            "SMALL" | "I" | "EM" => TagKind::Emphasis(Mark::Emphasis),
            "STRONG" | "B" => TagKind::Emphasis(Mark::Strong),
            "U" => TagKind::Emphasis(Mark::Underline),
            "IMG" => TagKind::Image,
            "OL" => TagKind::List(ListStyle::Numbered),
            "UL" => TagKind::List(ListStyle::Bulleted),
            "LI" => TagKind::ListItem,
            "CODE" | "PRE" => TagKind::Code,
            "HR" => TagKind::HorizontalRule,
            "BLOCKQUOTE" => TagKind::Blockquote,
            "ASIDE" => TagKind::Aside,
            // keep the DOM spelling of pseudo nodes, e.g. "#comment"
            _ if name.starts_with('#') => TagKind::Unknown(name.to_ascii_lowercase()),
            _ => TagKind::Unknown(name),
        }
    }
}

/// Collects the nodes of a single conversion that belong at document root level
#[derive(Default, Debug)]
pub struct RootAccumulator {
    nodes: Vec<Node>,
}

impl RootAccumulator {
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node)
    }

    pub fn extend(&mut self, nodes: Vec<Node>) {
        self.nodes.extend(nodes)
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

/// Builds an error paragraph: a single strong span carrying the prefix and the (truncated)
/// message. The message is logged as well.
pub fn error_node(message: &str) -> Node {
    let truncated: String = message.chars().take(MAX_ERROR_CHARS).collect();
    let value = format!("{} {}...", ERROR_PREFIX, truncated);
    error!("{}", value);
    Node::paragraph(vec![Node::marked_span(Mark::Strong, value)])
}

/// Wraps every span or link sitting directly in `nodes` in a paragraph of its own
pub fn promote_inlines(nodes: Vec<Node>) -> Vec<Node> {
    nodes
        .into_iter()
        .map(|node| {
            if node.is_inline() {
                Node::paragraph(vec![node])
            } else {
                node
            }
        })
        .collect()
}

fn strip_line_breaks(text: &str) -> String {
    text.replace(['\r', '\n'], "")
}

/// Converts HTML fragments into structured text documents. A single converter can be used for
/// any number of conversions, including concurrent ones: all per-conversion state lives in the
/// `convert` call.
#[derive(Clone, Default)]
pub struct Converter {
    resolver: AssetResolver,
    /// Id of the block model image embeds are created with
    image_block_id: String,
}

impl Converter {
    pub fn new(resolver: AssetResolver, image_block_id: impl Into<String>) -> Self {
        Converter {
            resolver,
            image_block_id: image_block_id.into(),
        }
    }

    /// A converter without an asset store: every image becomes an error node
    pub fn offline() -> Self {
        Converter::new(AssetResolver::disconnected(), "")
    }

    pub async fn convert(&self, html: &str) -> Result<Document, ConversionError> {
        if html.is_empty() {
            return Ok(Document::default());
        }
        let nodes = parse_body(&wrap_document(&normalize(html)))?;
        Ok(Document::wrap(self.build_root(&nodes).await))
    }

    /// Top-level pass: local results of each node are appended to the root after whatever its
    /// subtree already placed there, then inline nodes are promoted into paragraphs.
    pub async fn build_root(&self, nodes: &[DomNode]) -> Vec<Node> {
        let mut root = RootAccumulator::default();
        for node in nodes {
            let mut local = vec![];
            self.build_node(node, &mut local, &mut root).await;
            root.extend(local);
        }
        promote_inlines(root.into_nodes())
    }

    async fn build_tree(&self, nodes: &[DomNode], root: &mut RootAccumulator) -> Vec<Node> {
        let mut local = vec![];
        for node in nodes {
            self.build_node(node, &mut local, root).await;
        }
        local
    }

    async fn build_node(
        &self,
        node: &DomNode,
        local: &mut Vec<Node>,
        root: &mut RootAccumulator,
    ) {
        match TagKind::classify(&node.name) {
            TagKind::Paragraph => {
                let children = Box::pin(self.build_tree(&node.children, root)).await;
                if node.has_text() {
                    local.push(Node::paragraph(children));
                } else {
                    // structural container only; keep whatever it held
                    local.extend(children);
                }
            }
            TagKind::Heading(level) => {
                if node.has_text() {
                    local.push(Node::Heading {
                        level,
                        children: vec![Node::span(node.text_content.trim())],
                    });
                }
            }
            TagKind::PlainText => {
                if node.has_text() {
                    local.push(Node::span(strip_line_breaks(&node.text_content)));
                }
            }
            TagKind::Anchor => {
                local.push(Node::link(
                    node.attr("href").unwrap_or_default(),
                    node.text_content.as_str(),
                ));
            }
            TagKind::Emphasis(mark) => {
                if node.has_text() {
                    local.push(Node::marked_span(
                        mark,
                        strip_line_breaks(&node.text_content),
                    ));
                }
            }
            TagKind::Image => {
                let src = node.attr("src").unwrap_or_default();
                match self.resolver.resolve(src).await {
                    Some(upload) => root.push(Node::image_block(upload, &self.image_block_id)),
                    None => root.push(error_node(&format!("Image upload failed: {}", src))),
                }
            }
            TagKind::List(style) => {
                let children = Box::pin(self.build_tree(&node.children, root)).await;
                local.push(Node::List { style, children });
            }
            TagKind::ListItem => {
                let children = Box::pin(self.build_tree(&node.children, root)).await;
                local.push(Node::ListItem {
                    children: vec![Node::paragraph(children)],
                });
            }
            TagKind::Code => root.push(Node::Code {
                code: node.text_content.clone(),
            }),
            TagKind::HorizontalRule => local.push(Node::ThematicBreak),
            TagKind::Blockquote => {
                let quote = Box::pin(self.build_tree(&node.children, root)).await;
                if !quote.is_empty() {
                    local.push(Node::Blockquote {
                        children: vec![Node::paragraph(quote)],
                    });
                }
            }
            TagKind::Aside => {
                let children = Box::pin(self.build_tree(&node.children, root)).await;
                local.push(Node::paragraph(children));
            }
            TagKind::Unknown(name) => local.push(error_node(&format!("Unknown node: {}", name))),
        }
    }
}
