//! Action-group filtering.
//!
//! Callers that only want to sync part of a product (say, prices) restrict
//! the diff to the groups they care about. A group that does not pass the
//! filter contributes no actions at all.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// A family of related product actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionGroup {
    Name,
    Description,
    Slug,
    SearchKeywords,
    MetaTitle,
    MetaDescription,
    MetaKeywords,
    TaxCategory,
    State,
    Categories,
    CategoryOrderHints,
    Variants,
    Attributes,
    Images,
    Prices,
    Assets,
    Sku,
    Publish,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", content = "groups", rename_all = "snake_case")]
pub enum SyncFilter {
    /// Every group passes.
    #[default]
    All,
    /// Only the listed groups pass.
    Only(BTreeSet<ActionGroup>),
    /// Every group except the listed ones passes.
    Exclude(BTreeSet<ActionGroup>),
}

impl SyncFilter {
    pub fn only(groups: impl IntoIterator<Item = ActionGroup>) -> Self {
        Self::Only(groups.into_iter().collect())
    }

    pub fn exclude(groups: impl IntoIterator<Item = ActionGroup>) -> Self {
        Self::Exclude(groups.into_iter().collect())
    }

    pub fn passes(&self, group: ActionGroup) -> bool {
        match self {
            Self::All => true,
            Self::Only(groups) => groups.contains(&group),
            Self::Exclude(groups) => !groups.contains(&group),
        }
    }

    /// Runs `build` if `group` passes, otherwise yields nothing.
    pub(crate) fn build_actions<A>(
        &self,
        group: ActionGroup,
        build: impl FnOnce() -> Vec<A>,
    ) -> Vec<A> {
        if self.passes(group) { build() } else { Vec::new() }
    }

    /// Single-action counterpart of [`SyncFilter::build_actions`].
    pub(crate) fn build_action<A>(
        &self,
        group: ActionGroup,
        build: impl FnOnce() -> Option<A>,
    ) -> Option<A> {
        if self.passes(group) { build() } else { None }
    }
}
