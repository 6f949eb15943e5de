//! Converts HTML fragments into DatoCMS structured text!
//!
//! (For information about the format, see <https://www.datocms.com/docs/structured-text/dast>)
//!
//! This crate provides a CLI tool (`html2dast`) that turns an HTML file into a dast JSON document,
//! and library access to the converter, the document tree, and a small client for the DatoCMS
//! Content Management API (record lookups, item creation, uploads from URLs).
//!
//! Conversion never fails because of odd markup: anything the converter cannot represent is
//! replaced by a bold `!!!!!!!! Error !!!!!!!!` paragraph describing the problem, so the result
//! can always be stored and the problems found afterwards.
//!
//! Supported markup includes:
//!
//! - paragraphs, headings (`h1`-`h6`), block quotes, asides, horizontal rules
//! - `strong`/`b`, `em`/`i`/`small` and `u` spans (one mark per span; nested emphasis is not
//!   composed)
//! - links, which always open in a new tab
//! - ordered and unordered lists
//! - `code`/`pre`, which are lifted to the document root
//! - images, which are uploaded through an [`assets::AssetStore`] and embedded as image blocks
//!   at the document root
//!
//! `div`, `main` and `br` tags are dropped before parsing, and bare lines of text become
//! paragraphs.
//!
//! ```no_run
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! use std::sync::Arc;
//! use html2dast::{assets::AssetResolver, builder::Converter, cms::{CmaClient, CmaConfig}};
//!
//! let client = Arc::new(CmaClient::new(CmaConfig::new("api-token"))?);
//! let converter = Converter::new(AssetResolver::new(client), "image-block-model-id");
//! let document = converter.convert("<p><strong>Bold</strong> text</p>").await?;
//! println!("{}", serde_json::to_string_pretty(&document)?);
//! # Ok(())
//! # }
//! ```

pub mod assets;
pub mod builder;
pub mod cms;
pub mod dom;
pub mod errors;
pub mod graph;
pub mod normalizer;
pub mod utils;

use builder::Converter;
use errors::ConversionError;
use graph::document::Document;

/// Converts `html` without an asset store; images become error nodes
pub async fn convert_offline(html: &str) -> Result<Document, ConversionError> {
    Converter::offline().convert(html).await
}
