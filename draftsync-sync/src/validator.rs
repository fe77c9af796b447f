//! Batch validation.
//!
//! Filters a raw batch down to the drafts that can be synced and collects
//! their keys for the remote lookup. Rejections are returned as messages;
//! the orchestrator turns them into error events.

use crate::kind::ValidateDraft;
use draftsync_types::is_blank;
use std::collections::HashSet;

/// Outcome of validating one batch.
#[derive(Debug)]
pub struct ValidatedBatch<K: ValidateDraft> {
    /// Valid drafts in first-seen order, equal drafts collapsed.
    pub drafts: Vec<K::Draft>,
    /// Keys of the valid drafts.
    pub keys: HashSet<String>,
    /// One entry per rejected draft: the reason and the draft, if any.
    pub rejected: Vec<(String, Option<K::Draft>)>,
}

/// Validates a raw batch.
///
/// A draft is rejected when it is absent, its key is blank, or the kind's
/// own checks fail. Two distinct drafts sharing a key are both kept.
pub fn validate_batch<K: ValidateDraft>(batch: Vec<Option<K::Draft>>) -> ValidatedBatch<K> {
    let mut drafts: Vec<K::Draft> = Vec::new();
    let mut keys = HashSet::new();
    let mut rejected = Vec::new();

    for draft in batch {
        let Some(draft) = draft else {
            rejected.push((format!("{} is null.", K::DRAFT_NAME), None));
            continue;
        };
        let key = match K::draft_key(&draft) {
            Some(key) if !is_blank(Some(key)) => key.to_string(),
            _ => {
                let message = format!(
                    "{} with name: {} doesn't have a key. Please make sure all {} drafts have keys.",
                    K::DRAFT_NAME,
                    K::display_name(&draft),
                    K::NAME
                );
                rejected.push((message, Some(draft)));
                continue;
            }
        };
        if let Err(message) = K::check(&draft) {
            rejected.push((message, Some(draft)));
            continue;
        }
        if !drafts.contains(&draft) {
            drafts.push(draft);
        }
        keys.insert(key);
    }

    ValidatedBatch {
        drafts,
        keys,
        rejected,
    }
}
