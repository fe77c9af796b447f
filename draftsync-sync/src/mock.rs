//! In-memory [`ResourceService`] for tests and dry runs.
//!
//! Entities live in a map keyed by resource key. Failures can be scripted
//! per call type, and every call is counted so tests can assert on the
//! exact number of remote round trips.
//!
//! Updates do not interpret actions: they bump the stored version and
//! record the actions, which [`InMemoryService::applied_updates`] returns.

use crate::error::{SyncError, SyncResult};
use crate::kind::{ChannelKind, ProductKind, ResourceKind};
use crate::service::ResourceService;
use async_trait::async_trait;
use draftsync_types::{Channel, ChannelDraft, Product, ProductDraft, ResourceId};
use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tokio::sync::Mutex;

/// Kinds the in-memory service can store.
pub trait Materialize: ResourceKind {
    /// The entity a remote system would store for `draft`.
    fn materialize(draft: &Self::Draft) -> Self::Entity;

    fn bump_version(entity: &mut Self::Entity);
}

impl Materialize for ProductKind {
    fn materialize(draft: &ProductDraft) -> Product {
        Product::from_draft(ResourceId::new(), draft)
    }

    fn bump_version(entity: &mut Product) {
        entity.version += 1;
    }
}

impl Materialize for ChannelKind {
    fn materialize(draft: &ChannelDraft) -> Channel {
        Channel::from_draft(ResourceId::new(), draft)
    }

    fn bump_version(entity: &mut Channel) {
        entity.version += 1;
    }
}

#[derive(Debug, Default)]
struct CallCounts {
    fetch_matching: AtomicUsize,
    fetch_by_key: AtomicUsize,
    create: AtomicUsize,
    update: AtomicUsize,
}

#[derive(Debug, Default)]
struct Script {
    fail_fetch_matching: AtomicBool,
    fail_fetch_by_key: AtomicBool,
    missing_on_fetch_by_key: AtomicBool,
    conflicts_remaining: AtomicUsize,
    fail_updates: AtomicBool,
}

#[derive(Debug)]
pub struct InMemoryService<K: Materialize> {
    entities: Mutex<HashMap<String, K::Entity>>,
    failing_creates: Mutex<HashSet<String>>,
    applied: Mutex<Vec<(String, Vec<K::Action>)>>,
    script: Script,
    calls: CallCounts,
}

impl<K: Materialize> Default for InMemoryService<K> {
    fn default() -> Self {
        Self {
            entities: Mutex::new(HashMap::new()),
            failing_creates: Mutex::new(HashSet::new()),
            applied: Mutex::new(Vec::new()),
            script: Script::default(),
            calls: CallCounts::default(),
        }
    }
}

impl<K: Materialize> InMemoryService<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds the store with entities. Entities without a key are ignored.
    pub fn with_entities(entities: impl IntoIterator<Item = K::Entity>) -> Self {
        let map = entities
            .into_iter()
            .filter_map(|e| {
                let key = K::entity_key(&e)?.to_string();
                Some((key, e))
            })
            .collect();
        Self {
            entities: Mutex::new(map),
            ..Self::default()
        }
    }

    // ── Scripting ────────────────────────────────────────────────

    /// Every `fetch_matching_by_keys` call fails.
    pub fn fail_fetch_matching(&self) {
        self.script.fail_fetch_matching.store(true, Ordering::SeqCst);
    }

    /// Every `fetch_by_key` call fails.
    pub fn fail_fetch_by_key(&self) {
        self.script.fail_fetch_by_key.store(true, Ordering::SeqCst);
    }

    /// `fetch_by_key` reports every entity as missing, as if it was
    /// deleted concurrently.
    pub fn hide_on_fetch_by_key(&self) {
        self.script
            .missing_on_fetch_by_key
            .store(true, Ordering::SeqCst);
    }

    /// The next `count` updates fail with a concurrent modification.
    pub fn conflict_next_updates(&self, count: usize) {
        self.script
            .conflicts_remaining
            .store(count, Ordering::SeqCst);
    }

    /// Every update fails with a remote error.
    pub fn fail_updates(&self) {
        self.script.fail_updates.store(true, Ordering::SeqCst);
    }

    /// Creating a draft with `key` fails with a remote error.
    pub async fn fail_create_for(&self, key: impl Into<String>) {
        self.failing_creates.lock().await.insert(key.into());
    }

    // ── Inspection ───────────────────────────────────────────────

    pub fn fetch_matching_calls(&self) -> usize {
        self.calls.fetch_matching.load(Ordering::SeqCst)
    }

    pub fn fetch_by_key_calls(&self) -> usize {
        self.calls.fetch_by_key.load(Ordering::SeqCst)
    }

    pub fn create_calls(&self) -> usize {
        self.calls.create.load(Ordering::SeqCst)
    }

    pub fn update_calls(&self) -> usize {
        self.calls.update.load(Ordering::SeqCst)
    }

    /// Stored entity for `key`.
    pub async fn get(&self, key: &str) -> Option<K::Entity> {
        self.entities.lock().await.get(key).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entities.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entities.lock().await.is_empty()
    }

    /// Successful updates in the order they were applied: entity key and
    /// the actions sent.
    pub async fn applied_updates(&self) -> Vec<(String, Vec<K::Action>)> {
        self.applied.lock().await.clone()
    }

    /// Bumps the stored version of `key`, so updates based on an earlier
    /// read hit a concurrent modification.
    pub async fn touch(&self, key: &str) {
        if let Some(entity) = self.entities.lock().await.get_mut(key) {
            K::bump_version(entity);
        }
    }

    fn take_conflict(&self) -> bool {
        self.script
            .conflicts_remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

#[async_trait]
impl<K: Materialize> ResourceService<K> for InMemoryService<K> {
    async fn fetch_matching_by_keys(&self, keys: &HashSet<String>) -> SyncResult<Vec<K::Entity>> {
        self.calls.fetch_matching.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_fetch_matching.load(Ordering::SeqCst) {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        let entities = self.entities.lock().await;
        Ok(keys
            .iter()
            .filter_map(|key| entities.get(key).cloned())
            .collect())
    }

    async fn fetch_by_key(&self, key: &str) -> SyncResult<Option<K::Entity>> {
        self.calls.fetch_by_key.fetch_add(1, Ordering::SeqCst);
        if self.script.fail_fetch_by_key.load(Ordering::SeqCst) {
            return Err(SyncError::Network("connection reset".to_string()));
        }
        if self.script.missing_on_fetch_by_key.load(Ordering::SeqCst) {
            return Ok(None);
        }
        Ok(self.entities.lock().await.get(key).cloned())
    }

    async fn create(&self, draft: &K::Draft) -> SyncResult<K::Entity> {
        self.calls.create.fetch_add(1, Ordering::SeqCst);
        let key = K::draft_key(draft).unwrap_or_default().to_string();
        if self.failing_creates.lock().await.contains(&key) {
            return Err(SyncError::Remote(format!("create of '{key}' rejected")));
        }
        let mut entities = self.entities.lock().await;
        if entities.contains_key(&key) {
            return Err(SyncError::Remote(format!(
                "a {} with key '{key}' already exists",
                K::NAME
            )));
        }
        let entity = K::materialize(draft);
        entities.insert(key, entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: &K::Entity, actions: &[K::Action]) -> SyncResult<K::Entity> {
        self.calls.update.fetch_add(1, Ordering::SeqCst);
        let key = K::entity_key(entity).unwrap_or_default().to_string();
        if self.take_conflict() {
            return Err(SyncError::ConcurrentModification(format!(
                "version {} of '{key}' is outdated",
                K::entity_version(entity)
            )));
        }
        if self.script.fail_updates.load(Ordering::SeqCst) {
            return Err(SyncError::Remote(format!("update of '{key}' rejected")));
        }

        let mut entities = self.entities.lock().await;
        let Some(stored) = entities.get_mut(&key) else {
            return Err(SyncError::NotFound(key));
        };
        let expected = K::entity_version(stored);
        let actual = K::entity_version(entity);
        if expected != actual {
            return Err(SyncError::ConcurrentModification(format!(
                "expected version {expected} of '{key}' but got {actual}"
            )));
        }
        K::bump_version(stored);
        let updated = stored.clone();
        drop(entities);

        self.applied.lock().await.push((key, actions.to_vec()));
        Ok(updated)
    }
}
