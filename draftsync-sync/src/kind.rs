//! Resource kinds the orchestrator can sync.
//!
//! A kind binds a draft type, an entity type and an action type together
//! with the few capabilities the generic orchestrator needs: reading keys,
//! diffing, and validating drafts. The orchestrator and the statistics are
//! written once against these traits.

use crate::config::SyncConfig;
use draftsync_diff::{DiffOutcome, build_channel_actions, build_product_actions};
use draftsync_types::{
    Channel, ChannelAction, ChannelDraft, Product, ProductAction, ProductDraft,
};
use std::collections::BTreeSet;
use std::fmt::Debug;

/// Type-level description of one syncable resource.
pub trait ResourceKind: Debug + Send + Sync + 'static {
    type Draft: Debug + Clone + PartialEq + Send + Sync + 'static;
    type Entity: Debug + Clone + Send + Sync + 'static;
    type Action: Debug + Clone + PartialEq + Send + Sync + 'static;

    /// Lower-case singular name, e.g. `"product"`.
    const NAME: &'static str;
    /// Lower-case plural name, e.g. `"products"`.
    const PLURAL: &'static str;
    /// Name of the draft type in messages, e.g. `"ProductDraft"`.
    const DRAFT_NAME: &'static str;

    fn draft_key(draft: &Self::Draft) -> Option<&str>;
    fn entity_key(entity: &Self::Entity) -> Option<&str>;
    fn entity_version(entity: &Self::Entity) -> u64;
    /// Wire name of an action, e.g. `"addVariant"`.
    fn action_name(action: &Self::Action) -> &'static str;
}

/// Diff capability.
pub trait ActionBuilder: ResourceKind {
    fn build_actions(
        old: &Self::Entity,
        new: &Self::Draft,
        config: &SyncConfig,
    ) -> DiffOutcome<Self::Action>;
}

/// Draft validation capability.
pub trait ValidateDraft: ResourceKind {
    /// How a keyless draft is named in the validation error.
    fn display_name(draft: &Self::Draft) -> String;

    /// Kind-specific structural checks on a draft with a non-blank key.
    fn check(_draft: &Self::Draft) -> Result<(), String> {
        Ok(())
    }
}

/// Everything the orchestrator needs from a kind.
pub trait SyncResource: ActionBuilder + ValidateDraft {}

impl<K: ActionBuilder + ValidateDraft> SyncResource for K {}

// ── Products ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ProductKind;

impl ResourceKind for ProductKind {
    type Draft = ProductDraft;
    type Entity = Product;
    type Action = ProductAction;

    const NAME: &'static str = "product";
    const PLURAL: &'static str = "products";
    const DRAFT_NAME: &'static str = "ProductDraft";

    fn draft_key(draft: &ProductDraft) -> Option<&str> {
        draft.key.as_deref()
    }

    fn entity_key(entity: &Product) -> Option<&str> {
        entity.key.as_deref()
    }

    fn entity_version(entity: &Product) -> u64 {
        entity.version
    }

    fn action_name(action: &ProductAction) -> &'static str {
        action.name()
    }
}

impl ActionBuilder for ProductKind {
    fn build_actions(
        old: &Product,
        new: &ProductDraft,
        config: &SyncConfig,
    ) -> DiffOutcome<ProductAction> {
        build_product_actions(old, new, &config.product_diff_context())
    }
}

impl ValidateDraft for ProductKind {
    fn display_name(draft: &ProductDraft) -> String {
        draft.name.to_string()
    }

    fn check(draft: &ProductDraft) -> Result<(), String> {
        let mut seen = BTreeSet::new();
        let mut duplicated = BTreeSet::new();
        for key in draft.all_variants().into_iter().flatten().filter_map(|v| v.key.as_deref()) {
            if !seen.insert(key) {
                duplicated.insert(key);
            }
        }
        if duplicated.is_empty() {
            return Ok(());
        }
        Err(format!(
            "ProductDraft with key: '{}' has duplicated variant keys: [{}].",
            draft.key.as_deref().unwrap_or_default(),
            duplicated.into_iter().collect::<Vec<_>>().join(", ")
        ))
    }
}

// ── Channels ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, Default)]
pub struct ChannelKind;

impl ResourceKind for ChannelKind {
    type Draft = ChannelDraft;
    type Entity = Channel;
    type Action = ChannelAction;

    const NAME: &'static str = "channel";
    const PLURAL: &'static str = "channels";
    const DRAFT_NAME: &'static str = "ChannelDraft";

    fn draft_key(draft: &ChannelDraft) -> Option<&str> {
        draft.key.as_deref()
    }

    fn entity_key(entity: &Channel) -> Option<&str> {
        Some(entity.key.as_str())
    }

    fn entity_version(entity: &Channel) -> u64 {
        entity.version
    }

    fn action_name(action: &ChannelAction) -> &'static str {
        action.name()
    }
}

impl ActionBuilder for ChannelKind {
    fn build_actions(
        old: &Channel,
        new: &ChannelDraft,
        _config: &SyncConfig,
    ) -> DiffOutcome<ChannelAction> {
        DiffOutcome::clean(build_channel_actions(old, new))
    }
}

impl ValidateDraft for ChannelKind {
    fn display_name(draft: &ChannelDraft) -> String {
        draft
            .name
            .as_ref()
            .map_or_else(|| "null".to_string(), ToString::to_string)
    }
}
