mod common;

use common::{Events, en, recording};
use draftsync_sync::mock::InMemoryService;
use draftsync_sync::{ChannelKind, ChannelSync};
use draftsync_types::{Channel, ChannelAction, ChannelDraft, ChannelRole, ResourceId};
use pretty_assertions::assert_eq;

fn berlin() -> ChannelDraft {
    ChannelDraft::new("berlin")
        .with_name(en("Berlin"))
        .with_roles([ChannelRole::InventorySupply])
}

fn sync_with(
    service: InMemoryService<ChannelKind>,
    events: &Events,
) -> ChannelSync<InMemoryService<ChannelKind>> {
    ChannelSync::new(service, recording(events).build().unwrap())
}

#[tokio::test]
async fn one_new_one_existing() {
    let events = Events::default();
    let service =
        InMemoryService::with_entities([Channel::from_draft(ResourceId::new(), &berlin())]);
    let sync = sync_with(service, &events);

    let munich = ChannelDraft::new("munich").with_name(en("Munich"));
    let stats = sync.sync(vec![berlin(), munich]).await;

    assert_eq!(
        (stats.processed(), stats.created(), stats.updated(), stats.failed()),
        (2, 1, 0, 0)
    );
    assert_eq!(
        stats.report_message(),
        "Summary: 2 channels were processed in total (1 created, 0 updated and 0 failed to sync)."
    );
    assert!(events.all().is_empty());
}

#[tokio::test]
async fn changed_roles_are_updated() {
    let events = Events::default();
    let service =
        InMemoryService::with_entities([Channel::from_draft(ResourceId::new(), &berlin())]);
    let sync = sync_with(service, &events);

    let draft = berlin().with_roles([ChannelRole::InventorySupply, ChannelRole::Primary]);
    let stats = sync.sync(vec![draft]).await;

    assert_eq!(stats.updated(), 1);
    assert_eq!(
        sync.service().applied_updates().await,
        vec![(
            "berlin".to_string(),
            vec![ChannelAction::AddRoles {
                roles: vec![ChannelRole::Primary]
            }]
        )]
    );
}

#[tokio::test]
async fn keyless_channel_is_rejected() {
    let events = Events::default();
    let sync = sync_with(InMemoryService::new(), &events);

    let mut keyless = berlin();
    keyless.key = None;
    let stats = sync.sync(vec![keyless]).await;

    assert_eq!(
        events.messages(),
        vec![
            "ChannelDraft with name: {en: Berlin} doesn't have a key. \
             Please make sure all channel drafts have keys."
                .to_string()
        ]
    );
    assert_eq!(stats.processed(), 1);
    assert_eq!(sync.service().fetch_matching_calls(), 0);
}

#[tokio::test]
async fn equal_duplicates_are_synced_once() {
    let sync = sync_with(InMemoryService::new(), &Events::default());

    let stats = sync.sync(vec![berlin(), berlin()]).await;

    assert_eq!(stats.processed(), 2);
    assert_eq!(stats.created(), 1);
    assert_eq!(sync.service().create_calls(), 1);
}
