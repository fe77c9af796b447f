//! Publish / unpublish decision.
//!
//! | desired | current | other changes or staged changes | action    |
//! |---------|---------|---------------------------------|-----------|
//! | false   | false   | any                             | none      |
//! | false   | true    | any                             | unpublish |
//! | true    | false   | any                             | publish   |
//! | true    | true    | true                            | publish   |
//! | true    | true    | false                           | none      |
//!
//! Re-publishing an already published product flushes its staged changes,
//! including the ones produced by the current diff.

use draftsync_types::ProductAction;

/// Decides whether a product has to be published or unpublished.
///
/// `desired` is the draft's flag (unset means `false`), `current` the
/// entity's published flag, `has_other_actions` whether the same diff
/// already produced actions, and `has_staged_changes` the entity's flag for
/// pending unpublished modifications.
pub fn build_publish_or_unpublish_action(
    desired: Option<bool>,
    current: bool,
    has_other_actions: bool,
    has_staged_changes: bool,
) -> Option<ProductAction> {
    match (desired.unwrap_or(false), current) {
        (false, false) => None,
        (false, true) => Some(ProductAction::Unpublish),
        (true, false) => Some(ProductAction::Publish),
        (true, true) => (has_other_actions || has_staged_changes).then_some(ProductAction::Publish),
    }
}
