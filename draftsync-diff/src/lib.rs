//! Diff engine for draftsync.
//!
//! Every function in this crate is pure: it takes an existing entity and a
//! draft by reference and returns the ordered update actions that move the
//! entity to the draft's state. Nothing is cached between calls.
//!
//! # Policy
//!
//! All field comparators are instances of one rule: an action is emitted
//! only when old and new differ under value equality. On top of that:
//!
//! - **Reference sets** (category membership, channel roles) produce one
//!   remove per element only in the old set and one add per element only in
//!   the new set, comparing references by identity-equivalence.
//! - **Category order hints** are restricted to the new category membership.
//! - **Variants** are reconciled by key: removals, per-variant updates or
//!   additions in draft order, then the master-variant change.
//! - **Publish state** is derived last from the draft's publish flag, the
//!   entity's published flag, and whether anything else changed.
//!
//! Problems that make part of a diff impossible (blank master keys, null
//! variants) are returned as [`DiffIssue`]s next to the actions instead of
//! aborting the whole diff.

mod channel;
mod common;
mod filter;
mod product;
mod publish;
mod variant;
mod variants;

pub use channel::build_channel_actions;
pub use common::{build_update_action, difference_by};
pub use filter::{ActionGroup, SyncFilter};
pub use product::{
    build_add_to_category_actions, build_category_order_hint_actions, build_product_actions,
    build_remove_from_category_actions, build_set_tax_category_action,
    build_transition_state_action,
};
pub use publish::build_publish_or_unpublish_action;
pub use variant::{
    build_asset_actions, build_attribute_actions, build_image_actions, build_price_actions,
    build_sku_action,
};
pub use variants::{build_add_variant_action, build_change_master_variant_actions, build_variants_actions};

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// Settings that shape a product diff.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductDiffContext {
    /// Which action groups may be built.
    #[serde(default)]
    pub filter: SyncFilter,
    /// Attributes constrained to hold the same value on every variant.
    /// Changes to them are sent as one product-wide action.
    #[serde(default)]
    pub same_for_all_attributes: BTreeSet<String>,
}

impl ProductDiffContext {
    pub fn is_same_for_all(&self, attribute: &str) -> bool {
        self.same_for_all_attributes.contains(attribute)
    }
}

/// Actions produced by a diff together with the problems found on the way.
#[derive(Debug, Clone, PartialEq)]
pub struct DiffOutcome<A> {
    pub actions: Vec<A>,
    pub issues: Vec<DiffIssue>,
}

impl<A> DiffOutcome<A> {
    /// An outcome without issues.
    pub fn clean(actions: Vec<A>) -> Self {
        Self {
            actions,
            issues: Vec::new(),
        }
    }
}

/// Why variant actions could not be built (fully).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VariantProblem {
    #[error("The variant is null.")]
    NullVariant,
    #[error("The variant key is blank.")]
    BlankVariantKey,
    #[error("Old master variant key is blank.")]
    BlankOldMasterKey,
    #[error("New master variant null or has blank key.")]
    BlankNewMasterKey,
    #[error("New master variant has blank SKU.")]
    BlankNewMasterSku,
}

/// A problem found while diffing one product.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Failed to build variants update actions on the product with key '{product_key}'. Reason: {problem}")]
pub struct DiffIssue {
    pub product_key: String,
    pub problem: VariantProblem,
}
