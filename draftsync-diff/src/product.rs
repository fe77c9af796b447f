//! Product diff.

use crate::common::{build_set_actions, build_update_action};
use crate::filter::ActionGroup;
use crate::publish::build_publish_or_unpublish_action;
use crate::variants::build_variants_actions;
use crate::{DiffOutcome, ProductDiffContext};
use draftsync_types::{
    CategoryOrderHints, Product, ProductAction, ProductDraft, ResourceIdentifier,
};
use std::collections::HashSet;

/// Builds the ordered update actions that move `old` to the state of `new`.
///
/// Product-level fields come first, then category membership and hints, then
/// variant actions, and the publish state change last. Groups rejected by
/// `ctx.filter` contribute nothing.
pub fn build_product_actions(
    old: &Product,
    new: &ProductDraft,
    ctx: &ProductDiffContext,
) -> DiffOutcome<ProductAction> {
    let filter = &ctx.filter;
    let mut actions = Vec::new();

    actions.extend(filter.build_action(ActionGroup::Name, || {
        build_update_action(&old.name, &new.name, || ProductAction::ChangeName {
            name: new.name.clone(),
        })
    }));
    actions.extend(filter.build_action(ActionGroup::Description, || {
        build_update_action(&old.description, &new.description, || {
            ProductAction::SetDescription {
                description: new.description.clone(),
            }
        })
    }));
    actions.extend(filter.build_action(ActionGroup::Slug, || {
        build_update_action(&old.slug, &new.slug, || ProductAction::ChangeSlug {
            slug: new.slug.clone(),
        })
    }));
    actions.extend(filter.build_action(ActionGroup::SearchKeywords, || {
        build_update_action(&old.search_keywords, &new.search_keywords, || {
            ProductAction::SetSearchKeywords {
                search_keywords: new.search_keywords.clone(),
            }
        })
    }));
    actions.extend(filter.build_action(ActionGroup::MetaTitle, || {
        build_update_action(&old.meta_title, &new.meta_title, || {
            ProductAction::SetMetaTitle {
                meta_title: new.meta_title.clone(),
            }
        })
    }));
    actions.extend(filter.build_action(ActionGroup::MetaDescription, || {
        build_update_action(&old.meta_description, &new.meta_description, || {
            ProductAction::SetMetaDescription {
                meta_description: new.meta_description.clone(),
            }
        })
    }));
    actions.extend(filter.build_action(ActionGroup::MetaKeywords, || {
        build_update_action(&old.meta_keywords, &new.meta_keywords, || {
            ProductAction::SetMetaKeywords {
                meta_keywords: new.meta_keywords.clone(),
            }
        })
    }));
    actions.extend(filter.build_action(ActionGroup::TaxCategory, || {
        build_set_tax_category_action(old, new)
    }));
    actions.extend(filter.build_action(ActionGroup::State, || {
        build_transition_state_action(old, new)
    }));
    actions.extend(filter.build_actions(ActionGroup::Categories, || {
        build_remove_from_category_actions(old, new)
    }));
    actions.extend(filter.build_actions(ActionGroup::Categories, || {
        build_add_to_category_actions(old, new)
    }));
    actions.extend(filter.build_actions(ActionGroup::CategoryOrderHints, || {
        build_category_order_hint_actions(old, new)
    }));

    let variants = build_variants_actions(old, new, ctx);
    actions.extend(variants.actions);

    let publish = filter.build_action(ActionGroup::Publish, || {
        build_publish_or_unpublish_action(
            new.publish,
            old.published,
            !actions.is_empty(),
            old.has_staged_changes,
        )
    });
    actions.extend(publish);

    DiffOutcome {
        actions,
        issues: variants.issues,
    }
}

/// `setTaxCategory` when the references are not equivalent. A draft without
/// a tax category unsets it.
pub fn build_set_tax_category_action(old: &Product, new: &ProductDraft) -> Option<ProductAction> {
    if ResourceIdentifier::are_equivalent(old.tax_category.as_ref(), new.tax_category.as_ref()) {
        return None;
    }
    Some(ProductAction::SetTaxCategory {
        tax_category: new.tax_category.clone(),
    })
}

/// `transitionState` when the draft names a state the product is not in.
/// A state cannot be unset, so a draft without one yields nothing.
pub fn build_transition_state_action(old: &Product, new: &ProductDraft) -> Option<ProductAction> {
    let state = new.state.as_ref()?;
    let unchanged = old.state.as_ref().is_some_and(|s| s.is_equivalent(state));
    (!unchanged).then(|| ProductAction::TransitionState {
        state: state.clone(),
        force: true,
    })
}

fn category_membership_actions(old: &Product, new: &ProductDraft) -> Vec<ProductAction> {
    build_set_actions(
        &old.categories,
        &new.categories,
        ResourceIdentifier::is_equivalent,
        |category| ProductAction::RemoveFromCategory {
            category: category.clone(),
        },
        |category| ProductAction::AddToCategory {
            category: category.clone(),
        },
    )
}

/// `removeFromCategory` for every old category the draft no longer lists.
pub fn build_remove_from_category_actions(old: &Product, new: &ProductDraft) -> Vec<ProductAction> {
    category_membership_actions(old, new)
        .into_iter()
        .filter(|a| matches!(a, ProductAction::RemoveFromCategory { .. }))
        .collect()
}

/// `addToCategory` for every draft category the product is not in yet.
pub fn build_add_to_category_actions(old: &Product, new: &ProductDraft) -> Vec<ProductAction> {
    category_membership_actions(old, new)
        .into_iter()
        .filter(|a| matches!(a, ProductAction::AddToCategory { .. }))
        .collect()
}

/// Order hint changes, restricted to the draft's category membership.
///
/// Hints for categories the product leaves are dropped with the membership
/// itself, so only categories still listed by the draft are considered.
/// Old hints missing from the new map are cleared, new or changed hints are
/// set.
pub fn build_category_order_hint_actions(old: &Product, new: &ProductDraft) -> Vec<ProductAction> {
    let members = member_category_ids(old, new);
    let empty = CategoryOrderHints::new();
    let old_hints = old.category_order_hints.as_ref().unwrap_or(&empty);
    let new_hints = new.category_order_hints.as_ref().unwrap_or(&empty);

    if old_hints == new_hints {
        return Vec::new();
    }

    let cleared = old_hints
        .keys()
        .filter(|id| !new_hints.contains_key(*id) && members.contains(id.as_str()))
        .map(|id| ProductAction::SetCategoryOrderHint {
            category_id: id.clone(),
            order_hint: None,
        });

    let set = new_hints
        .iter()
        .filter(|(id, hint)| members.contains(id.as_str()) && old_hints.get(*id) != Some(*hint))
        .map(|(id, hint)| ProductAction::SetCategoryOrderHint {
            category_id: id.clone(),
            order_hint: Some(hint.clone()),
        });

    cleared.chain(set).collect()
}

/// Ids of the categories the draft lists. A draft category given by key
/// only takes the id of the equivalent category already on the product.
fn member_category_ids<'a>(old: &'a Product, new: &'a ProductDraft) -> HashSet<&'a str> {
    new.categories
        .iter()
        .filter_map(|category| {
            category.id.as_deref().or_else(|| {
                old.categories
                    .iter()
                    .find(|existing| existing.is_equivalent(category))
                    .and_then(|existing| existing.id.as_deref())
            })
        })
        .collect()
}
