use serde::{Deserialize, Serialize};

use super::nodes::Node;

/// Structured text document as accepted by the CMS: a fixed envelope around the root node list
#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Document {
    /// This is always "dast"
    pub schema: String,
    pub document: Root,
}

#[derive(Serialize, Deserialize, Clone, PartialEq, Debug)]
pub struct Root {
    /// This is always "root"
    #[serde(rename = "type")]
    pub node_type: String,
    pub children: Vec<Node>,
}

impl Default for Document {
    fn default() -> Self {
        Self::wrap(vec![])
    }
}

impl Document {
    pub fn wrap(children: Vec<Node>) -> Self {
        Document {
            schema: "dast".to_string(),
            document: Root {
                node_type: "root".to_string(),
                children,
            },
        }
    }

    pub fn children(&self) -> &[Node] {
        &self.document.children
    }

    pub fn is_empty(&self) -> bool {
        self.document.children.is_empty()
    }

    /// Gathers all the "literal" text in a given document (i.e., without marks, etc.)
    /// (Largely a testing/verification function)
    pub fn all_text(&self) -> String {
        self.children().iter().map(|node| node.text()).collect()
    }
}
