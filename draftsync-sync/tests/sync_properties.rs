//! Property-based tests for the orchestrator.
//!
//! - Partition: every raw draft is counted as processed exactly once,
//!   whatever the batch size and whatever fails along the way
//! - Outcome: each valid draft ends up created, updated or failed exactly
//!   once; invalid drafts only count as processed

mod common;

use common::{Events, en, product, recording};
use draftsync_sync::mock::InMemoryService;
use draftsync_sync::{ProductKind, ProductSync};
use draftsync_types::{Product, ProductDraft, ResourceId};
use proptest::prelude::*;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

/// What one position of the input holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Slot {
    Absent,
    BlankKey,
    New,
    RejectedCreate,
    Existing,
}

fn slot_strategy() -> impl Strategy<Value = Slot> {
    prop_oneof![
        Just(Slot::Absent),
        Just(Slot::BlankKey),
        Just(Slot::New),
        Just(Slot::RejectedCreate),
        Just(Slot::Existing),
    ]
}

#[derive(Debug, Clone, Copy)]
struct Remote {
    fail_fetch: bool,
    fail_updates: bool,
    conflicts: usize,
}

fn remote_strategy() -> impl Strategy<Value = Remote> {
    (prop::bool::weighted(0.2), any::<bool>(), 0usize..4).prop_map(
        |(fail_fetch, fail_updates, conflicts)| Remote {
            fail_fetch,
            fail_updates,
            conflicts,
        },
    )
}

fn run<F: std::future::Future>(future: F) -> F::Output {
    tokio::runtime::Builder::new_current_thread()
        .build()
        .unwrap()
        .block_on(future)
}

fn count(slots: &[Slot], wanted: &[Slot]) -> u64 {
    slots.iter().filter(|s| wanted.contains(s)).count() as u64
}

/// Drafts for `slots` plus the service already holding the existing ones.
async fn arrange(
    slots: &[Slot],
    remote: Remote,
) -> (Vec<Option<ProductDraft>>, InMemoryService<ProductKind>) {
    let seeded: Vec<Product> = slots
        .iter()
        .enumerate()
        .filter(|(_, slot)| **slot == Slot::Existing)
        .map(|(i, _)| Product::from_draft(ResourceId::new(), &product(&format!("p{i}"))))
        .collect();
    let service = InMemoryService::with_entities(seeded);

    let mut drafts = Vec::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        let key = format!("p{i}");
        let draft = match slot {
            Slot::Absent => None,
            Slot::BlankKey => Some(product("")),
            Slot::New => Some(product(&key)),
            Slot::RejectedCreate => {
                service.fail_create_for(key.clone()).await;
                Some(product(&key))
            }
            Slot::Existing => {
                let mut renamed = product(&key);
                renamed.name = en("Boot");
                Some(renamed)
            }
        };
        drafts.push(draft);
    }

    if remote.fail_fetch {
        service.fail_fetch_matching();
    }
    if remote.fail_updates {
        service.fail_updates();
    }
    service.conflict_next_updates(remote.conflicts);
    (drafts, service)
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn every_draft_is_processed_once(
        slots in prop::collection::vec(slot_strategy(), 0..30),
        remote in remote_strategy(),
        batch_size in 1usize..8,
    ) {
        let (stats, fetch_calls) = run(async {
            let (drafts, service) = arrange(&slots, remote).await;
            let options = recording::<ProductKind>(&Events::default())
                .batch_size(batch_size)
                .build()
                .unwrap();
            let sync = ProductSync::new(service, options);
            let stats = sync.sync(drafts).await;
            (stats, sync.service().fetch_matching_calls())
        });

        let invalid = count(&slots, &[Slot::Absent, Slot::BlankKey]);
        let new = count(&slots, &[Slot::New]);
        let rejected = count(&slots, &[Slot::RejectedCreate]);
        let existing = count(&slots, &[Slot::Existing]);

        prop_assert_eq!(stats.processed(), slots.len() as u64);
        prop_assert_eq!(stats.unchanged(), invalid);
        prop_assert_eq!(
            stats.created() + stats.updated() + stats.failed(),
            new + rejected + existing
        );

        if remote.fail_fetch {
            prop_assert_eq!(stats.created() + stats.updated(), 0);
        } else {
            prop_assert_eq!(stats.created(), new);
            prop_assert_eq!(stats.updated() + stats.failed(), existing + rejected);
            if remote.fail_updates {
                prop_assert_eq!(stats.updated(), 0);
            } else if remote.conflicts == 0 {
                prop_assert_eq!(stats.updated(), existing);
            }
        }

        let batches_with_valid = slots
            .chunks(batch_size)
            .filter(|batch| batch.iter().any(|s| !matches!(s, Slot::Absent | Slot::BlankKey)))
            .count();
        prop_assert_eq!(fetch_calls, batches_with_valid);
    }
}
