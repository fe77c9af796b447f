//! Batch orchestrator.
//!
//! A run splits the drafts into batches and processes them one after the
//! other. Within a batch every draft is created or updated concurrently,
//! and a failing draft never cancels its siblings. Failures never escape
//! [`ResourceSync::sync`]: they end up in the statistics and the event
//! callback.

use crate::config::SyncOptions;
use crate::event::{Severity, SyncEvent};
use crate::kind::{ResourceKind, SyncResource};
use crate::matcher::{Matched, match_drafts};
use crate::service::ResourceService;
use crate::statistics::SyncStatistics;
use crate::validator::validate_batch;
use crate::SyncError;
use futures::future::join_all;
use std::collections::HashSet;
use tracing::{Instrument, debug, info, info_span, warn};
use uuid::Uuid;

const RETRY_FETCH_FAILED: &str =
    "Failed to fetch from the remote while retrying after concurrency modification.";
const RETRY_NOT_FOUND: &str =
    "Not found when attempting to fetch while retrying after concurrency modification.";

/// Syncs drafts of one resource kind through a [`ResourceService`].
pub struct ResourceSync<K: ResourceKind, S> {
    service: S,
    options: SyncOptions<K>,
}

impl<K, S> ResourceSync<K, S>
where
    K: SyncResource,
    S: ResourceService<K>,
{
    pub fn new(service: S, options: SyncOptions<K>) -> Self {
        Self { service, options }
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn options(&self) -> &SyncOptions<K> {
        &self.options
    }

    /// Syncs every draft and returns the run's statistics.
    ///
    /// Items may be drafts or `Option`s of drafts; `None` entries are
    /// reported as invalid and still count as processed.
    pub async fn sync<I>(&self, drafts: I) -> SyncStatistics
    where
        I: IntoIterator,
        I::Item: Into<Option<K::Draft>>,
    {
        let run_id = Uuid::now_v7();
        let stats = SyncStatistics::new(K::PLURAL);
        let drafts: Vec<Option<K::Draft>> = drafts.into_iter().map(Into::into).collect();
        let batch_size = self.options.batch_size().max(1);

        let span = info_span!("sync", kind = K::NAME, run = %run_id);
        async {
            info!(total = drafts.len(), batch_size, "Starting sync");
            let mut remaining = drafts.into_iter();
            loop {
                let batch: Vec<_> = remaining.by_ref().take(batch_size).collect();
                if batch.is_empty() {
                    break;
                }
                self.process_batch(batch, &stats).await;
            }
            stats.finish();
            let snapshot = stats.snapshot();
            info!(
                processed = snapshot.processed,
                created = snapshot.created,
                updated = snapshot.updated,
                failed = snapshot.failed,
                unchanged = snapshot.unchanged,
                elapsed_ms = snapshot.elapsed_ms,
                "{}",
                stats.report_message()
            );
        }
        .instrument(span)
        .await;

        stats
    }

    async fn process_batch(&self, batch: Vec<Option<K::Draft>>, stats: &SyncStatistics) {
        let raw_size = batch.len() as u64;
        debug!(size = raw_size, "Processing batch");

        let validated = validate_batch::<K>(batch);
        for (message, draft) in validated.rejected {
            let mut event = SyncEvent::error(message);
            if let Some(draft) = draft {
                event = event.with_draft(draft);
            }
            self.report(event);
        }

        if validated.drafts.is_empty() {
            stats.increment_processed(raw_size);
            return;
        }

        match self.service.fetch_matching_by_keys(&validated.keys).await {
            Ok(existing) => {
                let pending = match_drafts::<K>(existing, validated.drafts)
                    .into_iter()
                    .map(|matched| self.sync_matched(matched, stats));
                join_all(pending).await;
            }
            Err(error) => {
                let message = format!(
                    "Failed to fetch existing {} with keys: '{}'.",
                    K::PLURAL,
                    format_keys(&validated.keys)
                );
                self.report(SyncEvent::error(message).with_error(error));
                stats.increment_failed(validated.keys.len() as u64);
            }
        }

        stats.increment_processed(raw_size);
    }

    async fn sync_matched(&self, matched: Matched<K>, stats: &SyncStatistics) {
        match matched {
            Matched::Create(draft) => self.create(draft, stats).await,
            Matched::Update { existing, draft } => self.update(existing, draft, stats).await,
        }
    }

    async fn create(&self, draft: K::Draft, stats: &SyncStatistics) {
        let Some(draft) = self.options.apply_before_create(draft) else {
            debug!("Draft skipped before create");
            return;
        };
        let key = K::draft_key(&draft).unwrap_or_default().to_string();

        match self.service.create(&draft).await {
            Ok(_) => {
                debug!(%key, "Created");
                stats.increment_created();
            }
            Err(error) => {
                let message = format!(
                    "Failed to create {} with key: '{key}'. Reason: {error}",
                    K::NAME
                );
                self.report(
                    SyncEvent::error(message)
                        .with_error(error)
                        .with_draft(draft),
                );
                stats.increment_failed(1);
            }
        }
    }

    async fn update(&self, existing: K::Entity, draft: K::Draft, stats: &SyncStatistics) {
        let actions = self.build_actions(&existing, &draft);
        if actions.is_empty() {
            return;
        }

        match self.service.update(&existing, &actions).await {
            Ok(_) => {
                debug!(key = K::draft_key(&draft), actions = ?action_names::<K>(&actions), "Updated");
                stats.increment_updated();
            }
            Err(error) if error.is_concurrent_modification() => {
                info!(
                    key = K::draft_key(&draft),
                    version = K::entity_version(&existing),
                    "Concurrent modification, retrying once"
                );
                self.retry_update(existing, draft, stats).await;
            }
            Err(error) => self.fail_update(error, existing, draft, actions, stats),
        }
    }

    /// Second and last update attempt, against a freshly fetched entity.
    async fn retry_update(&self, stale: K::Entity, draft: K::Draft, stats: &SyncStatistics) {
        let key = K::draft_key(&draft).unwrap_or_default().to_string();

        let fetched = match self.service.fetch_by_key(&key).await {
            Ok(Some(fetched)) => fetched,
            Ok(None) => {
                self.report(
                    SyncEvent::error(update_failed_message::<K>(&key, RETRY_NOT_FOUND))
                        .with_old_entity(stale)
                        .with_draft(draft),
                );
                stats.increment_failed(1);
                return;
            }
            Err(error) => {
                self.report(
                    SyncEvent::error(update_failed_message::<K>(&key, RETRY_FETCH_FAILED))
                        .with_error(error)
                        .with_old_entity(stale)
                        .with_draft(draft),
                );
                stats.increment_failed(1);
                return;
            }
        };

        let actions = self.build_actions(&fetched, &draft);
        if actions.is_empty() {
            return;
        }
        match self.service.update(&fetched, &actions).await {
            Ok(_) => {
                debug!(%key, actions = ?action_names::<K>(&actions), "Updated after retry");
                stats.increment_updated();
            }
            Err(error) => self.fail_update(error, fetched, draft, actions, stats),
        }
    }

    fn fail_update(
        &self,
        error: SyncError,
        existing: K::Entity,
        draft: K::Draft,
        actions: Vec<K::Action>,
        stats: &SyncStatistics,
    ) {
        let key = K::draft_key(&draft).unwrap_or_default();
        let message = update_failed_message::<K>(key, &error.to_string());
        self.report(
            SyncEvent::error(message)
                .with_error(error)
                .with_old_entity(existing)
                .with_draft(draft)
                .with_actions(actions),
        );
        stats.increment_failed(1);
    }

    /// Diffs, reports diff issues, then runs the before-update hook.
    fn build_actions(&self, existing: &K::Entity, draft: &K::Draft) -> Vec<K::Action> {
        let outcome = K::build_actions(existing, draft, self.options.config());
        for issue in outcome.issues {
            self.report(
                SyncEvent::error(issue.to_string())
                    .with_old_entity(existing.clone())
                    .with_draft(draft.clone()),
            );
        }
        self.options
            .apply_before_update(outcome.actions, draft, existing)
    }

    fn report(&self, event: SyncEvent<K>) {
        match event.severity {
            Severity::Error => warn!(error = ?event.error, "{}", event.message),
            Severity::Warning => debug!("{}", event.message),
        }
        self.options.emit(&event);
    }
}

fn update_failed_message<K: SyncResource>(key: &str, reason: &str) -> String {
    format!("Failed to update {} with key: '{key}'. Reason: {reason}", K::NAME)
}

fn action_names<K: ResourceKind>(actions: &[K::Action]) -> Vec<&'static str> {
    actions.iter().map(K::action_name).collect()
}

fn format_keys(keys: &HashSet<String>) -> String {
    let mut sorted: Vec<&str> = keys.iter().map(String::as_str).collect();
    sorted.sort_unstable();
    format!("[{}]", sorted.join(", "))
}
