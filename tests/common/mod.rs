#![allow(dead_code)]
use std::fs;
use std::sync::Mutex;

use assert_json_diff::assert_json_eq;
use async_trait::async_trait;
use html2dast::{assets::AssetStore, builder::Converter, errors::CmsError};
use serde_json::{Value, json};

pub const TEST_DIR: &str = "tests/data/";
pub const IMAGE_BLOCK_ID: &str = "123456";

pub async fn assert_converted_doc_matches_expected_dast(html_fn: &str, dast_json_fn: &str) {
    let html = fs::read_to_string(format!("{}{}", TEST_DIR, html_fn)).expect("Unable to find html");
    let dast_json =
        fs::read_to_string(format!("{}{}", TEST_DIR, dast_json_fn)).expect("Unable to find dast json");
    assert_converted_doc_matches_expected_dast_from_str(&html, &dast_json).await
}

pub async fn assert_converted_doc_matches_expected_dast_from_str(html: &str, dast_json: &str) {
    let converted = json!(
        Converter::offline()
            .convert(html)
            .await
            .expect("Conversion failed")
    );
    let expected: Value = serde_json::from_str(dast_json).expect("Invalid dast json");
    assert_json_eq!(converted, expected);
}

/// Wraps root children in the dast envelope
pub fn dast(children: Value) -> Value {
    json!({"schema": "dast", "document": {"type": "root", "children": children}})
}

pub fn error_paragraph(message: &str) -> Value {
    json!({
        "type": "paragraph",
        "children": [{
            "type": "span",
            "marks": ["strong"],
            "value": format!("!!!!!!!! Error !!!!!!!! {}...", message)
        }]
    })
}

pub fn image_block(upload_id: &str) -> Value {
    json!({
        "type": "block",
        "item": {
            "type": "item",
            "attributes": {"image": {"upload_id": upload_id}},
            "relationships": {"item_type": {"data": {"id": IMAGE_BLOCK_ID, "type": "item_type"}}}
        }
    })
}

/// Asset store answering every URL with an id derived from its last path segment, recording
/// each call
#[derive(Default)]
pub struct StubStore {
    pub calls: Mutex<Vec<String>>,
}

impl StubStore {
    pub fn id_for(url: &str) -> String {
        format!("id-{}", url.rsplit('/').next().unwrap_or_default())
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl AssetStore for StubStore {
    async fn create_from_url(&self, url: &str) -> Result<String, CmsError> {
        self.calls.lock().unwrap().push(url.to_string());
        // give other conversions on the same runtime a chance to run in between
        tokio::task::yield_now().await;
        Ok(StubStore::id_for(url))
    }
}

/// Asset store rejecting everything
pub struct FailingStore;

#[async_trait]
impl AssetStore for FailingStore {
    async fn create_from_url(&self, _url: &str) -> Result<String, CmsError> {
        Err(CmsError::Api {
            status: 500,
            body: "upstream unavailable".to_string(),
        })
    }
}
