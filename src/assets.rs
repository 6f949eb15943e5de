//! Turning image URLs into stored uploads.
//!
//! The tree builder never talks to a store directly; it goes through [`AssetResolver`], which
//! swallows every store failure and reports it as `None` so the builder can render an error node
//! in place of the image.

use std::sync::Arc;

use async_trait::async_trait;
use log::warn;

use crate::errors::CmsError;
use crate::graph::nodes::UploadRef;

/// Anything able to materialize a remote URL into a stored upload. Implementations must treat
/// repeated calls with the same URL as idempotent (no duplicate uploads).
#[async_trait]
pub trait AssetStore: Send + Sync {
    /// Returns the id of the (new or previously existing) upload for `url`
    async fn create_from_url(&self, url: &str) -> Result<String, CmsError>;
}

#[derive(Clone, Default)]
pub struct AssetResolver {
    store: Option<Arc<dyn AssetStore>>,
}

impl AssetResolver {
    pub fn new(store: Arc<dyn AssetStore>) -> Self {
        AssetResolver { store: Some(store) }
    }

    /// A resolver without a store; every resolution fails
    pub fn disconnected() -> Self {
        AssetResolver { store: None }
    }

    /// Resolves `url` into an upload reference, or `None` on any failure
    pub async fn resolve(&self, url: &str) -> Option<UploadRef> {
        match self.try_resolve(url).await {
            Ok(upload_id) => Some(UploadRef { upload_id }),
            Err(e) => {
                warn!("Unable to upload {:?}: {e}", url);
                None
            }
        }
    }

    async fn try_resolve(&self, url: &str) -> Result<String, CmsError> {
        let store = self.store.as_ref().ok_or(CmsError::NoStore)?;
        if url.trim().is_empty() {
            return Err(CmsError::EmptyUrl);
        }
        let upload_id = store.create_from_url(url).await?;
        if upload_id.is_empty() {
            return Err(CmsError::UnexpectedResponse(
                "upload created without an id".to_string(),
            ));
        }
        Ok(upload_id)
    }
}
