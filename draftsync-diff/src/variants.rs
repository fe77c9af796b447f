//! Variant list reconciliation.
//!
//! Variants are matched by key across the old product (master included) and
//! the new draft's `[master] ++ variants` list. The resulting actions are:
//! removals of old variants the draft dropped, then per-variant updates or
//! additions in draft order, then the master change.

use crate::filter::ActionGroup;
use crate::variant::{
    build_asset_actions, build_attribute_actions, build_image_actions, build_price_actions,
    build_sku_action,
};
use crate::{DiffIssue, DiffOutcome, ProductDiffContext, VariantProblem};
use draftsync_types::{
    Product, ProductAction, ProductDraft, ProductVariant, ProductVariantDraft, is_blank,
};
use std::collections::{HashMap, HashSet};

/// Builds every variant-level action for one product.
///
/// Blank master keys abort the variant diff with no actions and one issue
/// per blank master.
/// Null or keyless draft variants are reported and skipped while the rest of
/// the list is still reconciled.
pub fn build_variants_actions(
    old: &Product,
    new: &ProductDraft,
    ctx: &ProductDiffContext,
) -> DiffOutcome<ProductAction> {
    let product_key = new.key.clone().unwrap_or_default();
    let issue = |problem| DiffIssue {
        product_key: product_key.clone(),
        problem,
    };

    let mut master_issues = Vec::new();
    if is_blank(old.master_variant.key.as_deref()) {
        master_issues.push(issue(VariantProblem::BlankOldMasterKey));
    }
    if is_blank(new.master_variant.as_ref().and_then(|m| m.key.as_deref())) {
        master_issues.push(issue(VariantProblem::BlankNewMasterKey));
    }
    if !master_issues.is_empty() {
        return DiffOutcome {
            actions: Vec::new(),
            issues: master_issues,
        };
    }

    let filter = &ctx.filter;
    let mut actions = Vec::new();
    let mut issues = Vec::new();

    let old_by_key: HashMap<&str, &ProductVariant> = old
        .all_variants()
        .filter_map(|v| v.key.as_deref().map(|key| (key, v)))
        .collect();
    let new_keys: HashSet<&str> = new
        .all_variants()
        .into_iter()
        .flatten()
        .filter_map(|v| v.key.as_deref())
        .collect();

    if filter.passes(ActionGroup::Variants) {
        for variant in &old.variants {
            let kept = variant
                .key
                .as_deref()
                .is_some_and(|key| new_keys.contains(key));
            if !kept {
                actions.push(ProductAction::RemoveVariant {
                    variant_id: variant.id,
                });
            }
        }
    }

    for draft in new.all_variants() {
        let Some(draft) = draft else {
            issues.push(issue(VariantProblem::NullVariant));
            continue;
        };
        let Some(key) = draft.key.as_deref().filter(|k| !k.trim().is_empty()) else {
            issues.push(issue(VariantProblem::BlankVariantKey));
            continue;
        };
        match old_by_key.get(key) {
            Some(existing) => {
                for action in build_variant_update_actions(existing, draft, ctx) {
                    let duplicate =
                        matches!(action, ProductAction::SetAttributeInAllVariants { .. })
                            && actions.contains(&action);
                    if !duplicate {
                        actions.push(action);
                    }
                }
            }
            None => {
                if filter.passes(ActionGroup::Variants) {
                    actions.push(build_add_variant_action(draft));
                }
            }
        }
    }

    if filter.passes(ActionGroup::Variants) {
        match build_change_master_variant_actions(old, new) {
            Ok(master_actions) => actions.extend(master_actions),
            Err(problem) => issues.push(issue(problem)),
        }
    }

    DiffOutcome { actions, issues }
}

/// Actions that move one matched variant to its draft, gated per group.
fn build_variant_update_actions(
    old: &ProductVariant,
    new: &ProductVariantDraft,
    ctx: &ProductDiffContext,
) -> Vec<ProductAction> {
    let filter = &ctx.filter;
    let mut actions = Vec::new();
    actions.extend(filter.build_action(ActionGroup::Sku, || build_sku_action(old, new)));
    actions.extend(filter.build_actions(ActionGroup::Attributes, || {
        build_attribute_actions(old, new, ctx)
    }));
    actions.extend(filter.build_actions(ActionGroup::Images, || build_image_actions(old, new)));
    actions.extend(filter.build_actions(ActionGroup::Prices, || build_price_actions(old, new)));
    actions.extend(filter.build_actions(ActionGroup::Assets, || build_asset_actions(old, new)));
    actions
}

/// `addVariant` carrying everything the draft defines.
pub fn build_add_variant_action(draft: &ProductVariantDraft) -> ProductAction {
    ProductAction::AddVariant {
        key: draft.key.clone(),
        sku: draft.sku.clone(),
        attributes: draft.attributes.clone(),
        prices: draft.prices.clone(),
        images: draft.images.clone(),
        assets: draft.assets.clone(),
    }
}

/// Master variant change.
///
/// Nothing happens while the master keys agree. Otherwise the new master is
/// promoted by sku, and the old master is removed unless the draft keeps it
/// as a regular variant.
pub fn build_change_master_variant_actions(
    old: &Product,
    new: &ProductDraft,
) -> Result<Vec<ProductAction>, VariantProblem> {
    let old_master = &old.master_variant;
    let Some(new_master) = new
        .master_variant
        .as_ref()
        .filter(|m| !is_blank(m.key.as_deref()))
    else {
        return Err(VariantProblem::BlankNewMasterKey);
    };
    if is_blank(old_master.key.as_deref()) {
        return Err(VariantProblem::BlankOldMasterKey);
    }
    if old_master.key == new_master.key {
        return Ok(Vec::new());
    }

    let Some(sku) = new_master.sku.as_deref().filter(|s| !s.trim().is_empty()) else {
        return Err(VariantProblem::BlankNewMasterSku);
    };

    let mut actions = vec![ProductAction::ChangeMasterVariant {
        sku: sku.to_string(),
    }];
    let demoted = new
        .variants
        .iter()
        .flatten()
        .any(|v| v.key == old_master.key);
    if !demoted {
        actions.push(ProductAction::RemoveVariant {
            variant_id: old_master.id,
        });
    }
    Ok(actions)
}
