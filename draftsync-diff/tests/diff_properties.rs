//! Property-based tests for the diff engine.
//!
//! - Idempotence: diffing a product against its own draft yields nothing
//! - Reference sets: removals and additions are exactly the set differences
//! - Variant lists: removals and additions are exactly the key differences,
//!   and a changed master is promoted and the old one removed unless demoted

use draftsync_diff::{ProductDiffContext, build_product_actions, build_variants_actions};
use draftsync_types::{
    Image, LocalizedString, Money, Price, Product, ProductAction, ProductDraft,
    ProductVariantDraft, ResourceId, ResourceIdentifier,
};
use proptest::prelude::*;
use std::collections::BTreeSet;

// =============================================================================
// HELPER STRATEGIES
// =============================================================================

fn text_strategy() -> impl Strategy<Value = String> {
    "[a-zA-Z ]{1,12}"
}

fn variant_strategy(key: String) -> impl Strategy<Value = ProductVariantDraft> {
    (
        prop::collection::btree_map("[a-c]", 0i64..5, 0..3),
        prop::collection::btree_set("[a-e]\\.png", 0..4),
        prop::collection::btree_set(prop::sample::select(vec!["EUR", "USD", "GBP"]), 0..3),
    )
        .prop_map(move |(attributes, images, currencies)| {
            let mut variant = ProductVariantDraft::new(key.clone()).with_sku(format!("sku-{key}"));
            for (name, value) in attributes {
                variant = variant.with_attribute(name, serde_json::json!(value));
            }
            for url in images {
                variant = variant.with_image(Image::of(url));
            }
            for currency in currencies {
                variant = variant.with_price(Price::of(Money::of(100, currency)));
            }
            variant
        })
}

fn product_strategy() -> impl Strategy<Value = ProductDraft> {
    (
        text_strategy(),
        prop::option::of(text_strategy()),
        prop::collection::vec("[a-f]", 0..4),
        prop::option::of(any::<bool>()),
        variant_strategy("master".to_string()),
        prop::collection::btree_set("v[0-9]", 0..4)
            .prop_flat_map(|keys| keys.into_iter().map(variant_strategy).collect::<Vec<_>>()),
    )
        .prop_map(|(name, description, categories, publish, master, variants)| {
            let mut draft = ProductDraft::new(
                "product",
                LocalizedString::of("en", &name),
                LocalizedString::of("en", name.to_lowercase()),
            )
            .with_master_variant(master);
            draft.description = description.map(|d| LocalizedString::of("en", d));
            draft.publish = publish;
            for id in categories {
                draft = draft.with_category(ResourceIdentifier::of_id(id));
            }
            for variant in variants {
                draft = draft.with_variant(variant);
            }
            draft
        })
}

fn with_variant_keys(master: &str, keys: &BTreeSet<String>) -> ProductDraft {
    let mut draft = ProductDraft::new(
        "product",
        LocalizedString::of("en", "Shoe"),
        LocalizedString::of("en", "shoe"),
    )
    .with_master_variant(ProductVariantDraft::new(master).with_sku(format!("sku-{master}")));
    for key in keys {
        draft = draft.with_variant(ProductVariantDraft::new(key.clone()).with_sku(format!("sku-{key}")));
    }
    draft
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    /// A product diffed against the draft it was built from needs no update.
    #[test]
    fn equal_inputs_produce_no_actions(draft in product_strategy()) {
        let old = Product::from_draft(ResourceId::new(), &draft);
        let outcome = build_product_actions(&old, &draft, &ProductDiffContext::default());
        prop_assert!(outcome.actions.is_empty(), "unexpected actions: {:?}", outcome.actions);
        prop_assert!(outcome.issues.is_empty());
    }

    /// Category removals are old \ new, additions are new \ old.
    #[test]
    fn category_actions_are_the_set_differences(
        old_ids in prop::collection::btree_set("[a-h]", 0..6),
        new_ids in prop::collection::btree_set("[a-h]", 0..6),
    ) {
        let mut old_draft = with_variant_keys("master", &BTreeSet::new());
        for id in &old_ids {
            old_draft = old_draft.with_category(ResourceIdentifier::of_id(id.clone()));
        }
        let mut new = with_variant_keys("master", &BTreeSet::new());
        for id in &new_ids {
            new = new.with_category(ResourceIdentifier::of_id(id.clone()));
        }
        let old = Product::from_draft(ResourceId::new(), &old_draft);

        let mut removed = BTreeSet::new();
        let mut added = BTreeSet::new();
        for action in build_product_actions(&old, &new, &ProductDiffContext::default()).actions {
            match action {
                ProductAction::RemoveFromCategory { category } => {
                    prop_assert!(added.is_empty(), "removal after an addition");
                    removed.extend(category.id);
                }
                ProductAction::AddToCategory { category } => {
                    added.extend(category.id);
                }
                other => prop_assert!(false, "unexpected action {:?}", other),
            }
        }

        let expected_removed: BTreeSet<_> = old_ids.difference(&new_ids).cloned().collect();
        let expected_added: BTreeSet<_> = new_ids.difference(&old_ids).cloned().collect();
        prop_assert_eq!(removed, expected_removed);
        prop_assert_eq!(added, expected_added);
    }

    /// Variant removals are the dropped non-master keys plus the old master
    /// when it is neither kept as master nor demoted; additions are exactly
    /// the new keys. A changed master is promoted before the old one goes.
    #[test]
    fn variant_actions_cover_key_differences(
        old_master in "v[0-5]",
        old_keys in prop::collection::btree_set("v[0-5]", 0..5),
        new_master in "v[0-5]",
        new_keys in prop::collection::btree_set("v[0-5]", 0..5),
    ) {
        prop_assume!(!old_keys.contains(&old_master));
        prop_assume!(!new_keys.contains(&new_master));

        let old = Product::from_draft(ResourceId::new(), &with_variant_keys(&old_master, &old_keys));
        let new = with_variant_keys(&new_master, &new_keys);

        let outcome = build_variants_actions(&old, &new, &ProductDiffContext::default());
        prop_assert!(outcome.issues.is_empty());

        let mut removed = Vec::new();
        let mut added = BTreeSet::new();
        let mut promoted = None;
        for action in outcome.actions {
            match action {
                ProductAction::RemoveVariant { variant_id } => {
                    let key = old
                        .all_variants()
                        .find(|v| v.id == variant_id)
                        .and_then(|v| v.key.clone());
                    prop_assert!(key.is_some(), "removed unknown variant {}", variant_id);
                    if variant_id == old.master_variant.id {
                        prop_assert!(promoted.is_some(), "old master removed before promotion");
                    }
                    removed.extend(key);
                }
                ProductAction::AddVariant { key, .. } => {
                    added.extend(key);
                }
                ProductAction::ChangeMasterVariant { sku } => {
                    prop_assert!(promoted.is_none(), "master changed twice");
                    promoted = Some(sku);
                }
                other => prop_assert!(false, "unexpected action {:?}", other),
            }
        }

        let mut old_all = old_keys.clone();
        old_all.insert(old_master.clone());
        let mut new_all = new_keys.clone();
        new_all.insert(new_master.clone());

        let mut expected_removed: BTreeSet<String> = old_keys.difference(&new_all).cloned().collect();
        let master_changed = old_master != new_master;
        if master_changed && !new_keys.contains(&old_master) {
            expected_removed.insert(old_master.clone());
        }
        let expected_added: BTreeSet<_> = new_all.difference(&old_all).cloned().collect();

        prop_assert_eq!(removed.len(), expected_removed.len(), "duplicate removals: {:?}", removed);
        prop_assert_eq!(removed.into_iter().collect::<BTreeSet<_>>(), expected_removed);
        prop_assert_eq!(added, expected_added);
        prop_assert_eq!(promoted, master_changed.then(|| format!("sku-{new_master}")));
    }
}
