//! Pairs drafts with the entities fetched for their keys.

use crate::kind::ResourceKind;
use std::collections::HashMap;

/// What to do with one draft.
#[derive(Debug)]
pub enum Matched<K: ResourceKind> {
    Create(K::Draft),
    Update { existing: K::Entity, draft: K::Draft },
}

/// Matches every draft to the existing entity with the same key.
///
/// When several fetched entities share a key the last one wins.
pub fn match_drafts<K: ResourceKind>(
    existing: Vec<K::Entity>,
    drafts: Vec<K::Draft>,
) -> Vec<Matched<K>> {
    let mut by_key: HashMap<String, K::Entity> = HashMap::new();
    for entity in existing {
        if let Some(key) = K::entity_key(&entity) {
            by_key.insert(key.to_string(), entity);
        }
    }

    drafts
        .into_iter()
        .map(|draft| {
            let existing = K::draft_key(&draft).and_then(|key| by_key.get(key)).cloned();
            match existing {
                Some(existing) => Matched::Update { existing, draft },
                None => Matched::Create(draft),
            }
        })
        .collect()
}
