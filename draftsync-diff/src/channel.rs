//! Channel diff.

use crate::common::{build_set_actions, build_update_action};
use draftsync_types::{Channel, ChannelAction, ChannelDraft};

/// Builds the ordered update actions that move `old` to the state of `new`:
/// name, description, then one `removeRoles` per dropped role and one
/// `addRoles` per new role.
pub fn build_channel_actions(old: &Channel, new: &ChannelDraft) -> Vec<ChannelAction> {
    let mut actions = Vec::new();
    actions.extend(build_update_action(&old.name, &new.name, || {
        ChannelAction::ChangeName {
            name: new.name.clone(),
        }
    }));
    actions.extend(build_update_action(&old.description, &new.description, || {
        ChannelAction::ChangeDescription {
            description: new.description.clone(),
        }
    }));
    actions.extend(build_set_actions(
        &old.roles,
        &new.roles,
        |a, b| a == b,
        |role| ChannelAction::RemoveRoles { roles: vec![*role] },
        |role| ChannelAction::AddRoles { roles: vec![*role] },
    ));
    actions
}
