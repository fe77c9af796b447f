#![allow(dead_code)]

use draftsync_sync::{ResourceKind, Severity, SyncEvent, SyncOptionsBuilder};
use draftsync_types::{LocalizedString, ProductDraft, ProductVariantDraft};
use std::sync::{Arc, Mutex};

/// What the tests need to know about a reported event.
#[derive(Debug, Clone, PartialEq)]
pub struct Recorded {
    pub severity: Severity,
    pub message: String,
    pub has_error: bool,
    pub has_old_entity: bool,
    pub has_draft: bool,
    pub action_count: usize,
}

/// Shared sink for events raised during a run.
#[derive(Debug, Clone, Default)]
pub struct Events(Arc<Mutex<Vec<Recorded>>>);

impl Events {
    pub fn record<K: ResourceKind>(&self, event: &SyncEvent<K>) {
        self.0.lock().unwrap().push(Recorded {
            severity: event.severity,
            message: event.message.clone(),
            has_error: event.error.is_some(),
            has_old_entity: event.old_entity.is_some(),
            has_draft: event.draft.is_some(),
            action_count: event.actions.len(),
        });
    }

    pub fn all(&self) -> Vec<Recorded> {
        self.0.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.all().into_iter().map(|r| r.message).collect()
    }
}

/// Options builder wired to record errors and warnings into `events`.
pub fn recording<K: ResourceKind>(events: &Events) -> SyncOptionsBuilder<K> {
    let errors = events.clone();
    let warnings = events.clone();
    SyncOptionsBuilder::default()
        .error_callback(move |event| errors.record(event))
        .warning_callback(move |event| warnings.record(event))
}

/// Opt-in log output: `RUST_LOG=draftsync_sync=debug cargo test`.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn en(text: &str) -> LocalizedString {
    LocalizedString::of("en", text)
}

pub fn product(key: &str) -> ProductDraft {
    ProductDraft::new(key, en("Shoe"), en(key)).with_master_variant(
        ProductVariantDraft::new(format!("{key}-master")).with_sku(format!("{key}-sku")),
    )
}
