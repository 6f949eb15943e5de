//! This module contains the elements of the DatoCMS structured text ("dast") tree:
//! <https://www.datocms.com/docs/structured-text/dast>
//!
//! A [`document::Document`] wraps a list of [`nodes::Node`]s. Everything is serializeable with
//! `serde`, and the field names are the wire format the CMS expects.

pub mod document;
pub mod nodes;
