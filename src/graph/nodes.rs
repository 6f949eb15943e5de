use serde::{Deserialize, Serialize};

/// Inline formatting attached to a span
#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum Mark {
    Strong,
    Emphasis,
    Underline,
}

#[derive(Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Debug)]
#[serde(rename_all = "lowercase")]
pub enum ListStyle {
    Bulleted,
    Numbered,
}

/// Key/value pair carried by links; the only one we ever produce is `target: _blank`
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct MetaEntry {
    pub id: String,
    pub value: String,
}

impl MetaEntry {
    pub fn target_blank() -> Self {
        MetaEntry {
            id: "target".to_string(),
            value: "_blank".to_string(),
        }
    }
}

/// Reference to an asset stored in the CMS media area
#[derive(Serialize, Deserialize, Clone, PartialEq, Eq, Debug)]
pub struct UploadRef {
    pub upload_id: String,
}

/// Nodes enum, containing every node the structured text tree can hold. Serializes to the dast
/// wire format, i.e. `{"type": "paragraph", "children": [...]}`.
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Node {
    Span {
        marks: Vec<Mark>,
        value: String,
    },
    Link {
        url: String,
        children: Vec<Node>,
        meta: Vec<MetaEntry>,
    },
    Heading {
        level: u8,
        children: Vec<Node>,
    },
    Paragraph {
        children: Vec<Node>,
    },
    List {
        style: ListStyle,
        children: Vec<Node>,
    },
    ListItem {
        children: Vec<Node>,
    },
    Blockquote {
        children: Vec<Node>,
    },
    ThematicBreak,
    Code {
        code: String,
    },
    Block {
        item: BlockItem,
    },
}

impl Node {
    pub fn span(value: impl Into<String>) -> Self {
        Node::Span {
            marks: vec![],
            value: value.into(),
        }
    }

    pub fn marked_span(mark: Mark, value: impl Into<String>) -> Self {
        Node::Span {
            marks: vec![mark],
            value: value.into(),
        }
    }

    /// Links always open in a new browsing context
    pub fn link(url: impl Into<String>, text: impl Into<String>) -> Self {
        Node::Link {
            url: url.into(),
            children: vec![Node::span(text)],
            meta: vec![MetaEntry::target_blank()],
        }
    }

    pub fn paragraph(children: Vec<Node>) -> Self {
        Node::Paragraph { children }
    }

    pub fn image_block(image: UploadRef, item_type_id: impl Into<String>) -> Self {
        Node::Block {
            item: BlockItem::image(image, item_type_id),
        }
    }

    /// Inline nodes may not sit directly under the document root
    pub fn is_inline(&self) -> bool {
        matches!(self, Node::Span { .. } | Node::Link { .. })
    }

    pub fn children(&self) -> &[Node] {
        match self {
            Node::Link { children, .. }
            | Node::Heading { children, .. }
            | Node::Paragraph { children }
            | Node::List { children, .. }
            | Node::ListItem { children }
            | Node::Blockquote { children } => children,
            _ => &[],
        }
    }

    /// Gathers the "literal" text of a node and its descendants, without marks
    pub fn text(&self) -> String {
        match self {
            Node::Span { value, .. } => value.clone(),
            Node::Code { code } => code.clone(),
            _ => self.children().iter().map(|child| child.text()).collect(),
        }
    }
}

/// The embedded record carried by a `block` node
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct BlockItem {
    #[serde(rename = "type")]
    pub item_type: String,
    pub attributes: BlockAttributes,
    pub relationships: BlockRelationships,
}

impl BlockItem {
    pub fn image(image: UploadRef, item_type_id: impl Into<String>) -> Self {
        BlockItem {
            item_type: "item".to_string(),
            attributes: BlockAttributes { image },
            relationships: BlockRelationships {
                item_type: Relationship {
                    data: RelationshipData {
                        id: item_type_id.into(),
                        data_type: "item_type".to_string(),
                    },
                },
            },
        }
    }
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct BlockAttributes {
    pub image: UploadRef,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct BlockRelationships {
    pub item_type: Relationship,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Relationship {
    pub data: RelationshipData,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct RelationshipData {
    pub id: String,
    #[serde(rename = "type")]
    pub data_type: String,
}
