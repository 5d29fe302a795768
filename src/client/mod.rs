//! Admin API seam: the operations reconciliation needs, plus page flattening.

pub mod http;
pub mod types;

pub use http::{Credentials, HttpSession};
pub use types::*;

use crate::error::ApiError;
use async_trait::async_trait;
use serde_json::Value;

/// Page size used when listing collections.
pub const PER_PAGE: u32 = 200;

/// Collection management calls of an authenticated admin session.
#[async_trait]
pub trait AdminApi: Send + Sync {
    async fn list_collections(&self, page: u32, per_page: u32) -> Result<CollectionPage, ApiError>;

    async fn create_collection(&self, body: &Value) -> Result<RemoteCollection, ApiError>;

    /// Partial update: only keys present in `body` change.
    async fn update_collection(&self, id: &str, body: &Value) -> Result<RemoteCollection, ApiError>;
}

/// Fetch every page of the collection listing into one sequence.
pub async fn list_all_collections(api: &dyn AdminApi) -> Result<Vec<RemoteCollection>, ApiError> {
    let mut out = Vec::new();
    let mut page = 1;
    loop {
        let batch = api.list_collections(page, PER_PAGE).await?;
        let done = batch.items.is_empty() || batch.page >= batch.total_pages;
        out.extend(batch.items);
        if done {
            break;
        }
        page += 1;
    }
    tracing::debug!(count = out.len(), "listed collections");
    Ok(out)
}
