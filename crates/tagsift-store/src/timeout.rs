//! Per-lookup timeout for any [`RecordStore`].

use async_trait::async_trait;
use std::time::Duration;
use tagsift_core::{RecordStore, SearchHit, StoreError};

/// Fails a lookup with [`StoreError::Timeout`] if the inner store does not
/// answer within `timeout`. The abandoned lookup is dropped.
#[derive(Debug)]
pub struct TimeoutStore<S> {
    inner: S,
    timeout: Duration,
}

impl<S: RecordStore> TimeoutStore<S> {
    pub fn new(inner: S, timeout: Duration) -> Self {
        Self { inner, timeout }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[async_trait]
impl<S: RecordStore> RecordStore for TimeoutStore<S> {
    async fn lookup_by_tag(&self, tag: &str) -> Result<Vec<SearchHit>, StoreError> {
        match tokio::time::timeout(self.timeout, self.inner.lookup_by_tag(tag)).await {
            Ok(outcome) => outcome,
            Err(_) => {
                let timeout_ms = self.timeout.as_millis() as u64;
                tracing::warn!(tag, timeout_ms, "record store lookup timed out");
                Err(StoreError::Timeout {
                    tag: tag.to_string(),
                    timeout_ms,
                })
            }
        }
    }
}
