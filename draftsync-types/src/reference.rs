use serde::{Deserialize, Serialize};

/// Points at another remote resource either by its id, its key, or both.
///
/// Drafts usually reference by key; fetched entities usually carry ids
/// (and sometimes the key as well once resolved).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ResourceIdentifier {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

impl ResourceIdentifier {
    /// References a resource by remote id.
    pub fn of_id(id: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            key: None,
        }
    }

    /// References a resource by key.
    pub fn of_key(key: impl Into<String>) -> Self {
        Self {
            id: None,
            key: Some(key.into()),
        }
    }

    /// References a resource by both id and key.
    pub fn of_id_and_key(id: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            id: Some(id.into()),
            key: Some(key.into()),
        }
    }

    /// Whether both identifiers resolve to the same resource: equal ids,
    /// or failing that, equal keys.
    pub fn is_equivalent(&self, other: &ResourceIdentifier) -> bool {
        if self.id.is_some() && self.id == other.id {
            return true;
        }
        self.key.is_some() && self.key == other.key
    }

    /// Identity-equivalence lifted to optional references. Two absent
    /// references are equivalent; absent and present never are.
    pub fn are_equivalent(a: Option<&ResourceIdentifier>, b: Option<&ResourceIdentifier>) -> bool {
        match (a, b) {
            (None, None) => true,
            (Some(a), Some(b)) => a.is_equivalent(b),
            _ => false,
        }
    }
}
