//! Channel drafts and entities.
//!
//! Channels are flat resources: a handful of localized fields and a set of
//! roles, no child lists and no publish state.

use crate::{LocalizedString, ResourceId};
use serde::{Deserialize, Serialize};

/// What a channel is used for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum ChannelRole {
    InventorySupply,
    ProductDistribution,
    OrderExport,
    OrderImport,
    Primary,
}

/// Desired state of a channel.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default)]
    pub roles: Vec<ChannelRole>,
}

impl ChannelDraft {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_name(mut self, name: LocalizedString) -> Self {
        self.name = Some(name);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: LocalizedString) -> Self {
        self.description = Some(description);
        self
    }

    #[must_use]
    pub fn with_roles(mut self, roles: impl IntoIterator<Item = ChannelRole>) -> Self {
        self.roles = roles.into_iter().collect();
        self
    }
}

/// A channel as stored remotely.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: ResourceId,
    pub version: u64,
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default)]
    pub roles: Vec<ChannelRole>,
}

impl Channel {
    /// Builds the stored form of a draft. A missing key becomes empty.
    pub fn from_draft(id: ResourceId, draft: &ChannelDraft) -> Self {
        Self {
            id,
            version: 1,
            key: draft.key.clone().unwrap_or_default(),
            name: draft.name.clone(),
            description: draft.description.clone(),
            roles: draft.roles.clone(),
        }
    }
}
