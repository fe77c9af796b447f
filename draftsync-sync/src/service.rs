//! Remote service abstraction.
//!
//! The orchestrator never talks to a remote system directly. It goes
//! through a [`ResourceService`], which an application implements on top of
//! its HTTP client (or anything else that stores entities).

use crate::error::SyncResult;
use crate::kind::ResourceKind;
use async_trait::async_trait;
use std::collections::HashSet;

/// Remote operations on one resource kind.
#[async_trait]
pub trait ResourceService<K: ResourceKind>: Send + Sync {
    /// Fetches every existing entity whose key is in `keys`.
    async fn fetch_matching_by_keys(&self, keys: &HashSet<String>) -> SyncResult<Vec<K::Entity>>;

    /// Fetches one entity by key. `Ok(None)` when it does not exist.
    async fn fetch_by_key(&self, key: &str) -> SyncResult<Option<K::Entity>>;

    /// Creates an entity from a draft.
    async fn create(&self, draft: &K::Draft) -> SyncResult<K::Entity>;

    /// Applies `actions` in order to `entity` in a single request.
    ///
    /// Fails with [`crate::SyncError::ConcurrentModification`] when the
    /// remote version no longer matches the entity's version.
    async fn update(&self, entity: &K::Entity, actions: &[K::Action]) -> SyncResult<K::Entity>;
}
