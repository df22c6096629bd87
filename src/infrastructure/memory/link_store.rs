//! In-process link store.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Duration;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use tracing::debug;

use crate::domain::clock::Clock;
use crate::domain::entities::{LinkRecord, Resolution};
use crate::domain::repositories::LinkStore;
use crate::error::AppError;

/// [`LinkStore`] backed by a [`DashMap`].
///
/// DashMap shards its locks, so operations on different identifiers proceed in
/// parallel while the entry API serializes check-and-insert on one identifier.
pub struct InMemoryLinkStore {
    records: DashMap<String, LinkRecord>,
    clock: Arc<dyn Clock>,
}

impl InMemoryLinkStore {
    pub fn new(clock: Arc<dyn Clock>) -> Self {
        Self {
            records: DashMap::new(),
            clock,
        }
    }

    /// Number of stored records, expired ones included until swept.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl LinkStore for InMemoryLinkStore {
    async fn try_create(
        &self,
        short_id: &str,
        original_url: &str,
        ttl: Duration,
    ) -> Result<Option<LinkRecord>, AppError> {
        let now = self.clock.now();
        let record = LinkRecord::new(short_id, original_url, now, ttl);

        match self.records.entry(short_id.to_owned()) {
            Entry::Occupied(mut occupied) => {
                if !occupied.get().is_expired_at(now) {
                    return Ok(None);
                }
                debug!(short_id, "Reusing expired identifier");
                occupied.insert(record.clone());
            }
            Entry::Vacant(vacant) => {
                vacant.insert(record.clone());
            }
        }

        Ok(Some(record))
    }

    async fn resolve(&self, short_id: &str) -> Result<Resolution, AppError> {
        let now = self.clock.now();

        let Some(record) = self.records.get(short_id).map(|r| r.value().clone()) else {
            return Ok(Resolution::NotFound);
        };

        if record.is_expired_at(now) {
            // Re-checked under the shard lock: a fresh record may have replaced it.
            self.records
                .remove_if(short_id, |_, current| current.is_expired_at(now));
            return Ok(Resolution::Expired);
        }

        Ok(Resolution::Found(record))
    }

    async fn exists(&self, short_id: &str) -> Result<bool, AppError> {
        let now = self.clock.now();
        Ok(self
            .records
            .get(short_id)
            .is_some_and(|record| !record.is_expired_at(now)))
    }

    async fn purge_expired(&self) -> Result<usize, AppError> {
        let now = self.clock.now();
        let before = self.records.len();
        self.records.retain(|_, record| !record.is_expired_at(now));
        Ok(before.saturating_sub(self.records.len()))
    }

    async fn health_check(&self) -> bool {
        true
    }
}
