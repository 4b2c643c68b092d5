//! RecordStore: the engine's only view of the item catalog.
//!
//! Implementations live outside this crate (see `tagsift-store`). The engine
//! calls [`RecordStore::lookup_by_tag`] once for the literal tag and once per
//! expanded tag, possibly concurrently, and assumes no ordering between calls.

use crate::error::StoreError;
use crate::types::SearchHit;
use async_trait::async_trait;
use std::sync::Arc;

#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every `(item_id, title)` whose record declares `tag`.
    ///
    /// No matches is `Ok(vec![])`, never an error. Duplicates are allowed;
    /// callers collapse them by item id.
    async fn lookup_by_tag(&self, tag: &str) -> Result<Vec<SearchHit>, StoreError>;
}

#[async_trait]
impl<S: RecordStore + ?Sized> RecordStore for Arc<S> {
    async fn lookup_by_tag(&self, tag: &str) -> Result<Vec<SearchHit>, StoreError> {
        (**self).lookup_by_tag(tag).await
    }
}
