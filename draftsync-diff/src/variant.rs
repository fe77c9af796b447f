//! Diffs between one existing variant and its draft.
//!
//! Each builder covers one aspect of a variant (sku, attributes, images,
//! prices, assets). Actions address the existing variant by its id, which
//! is known because only matched pairs reach this module.

use crate::common::build_update_action;
use crate::ProductDiffContext;
use draftsync_types::{ProductAction, ProductVariant, ProductVariantDraft};
use std::collections::HashSet;

/// `setSku` when the skus differ.
pub fn build_sku_action(old: &ProductVariant, new: &ProductVariantDraft) -> Option<ProductAction> {
    build_update_action(&old.sku, &new.sku, || ProductAction::SetSku {
        variant_id: old.id,
        sku: new.sku.clone(),
    })
}

/// Attribute changes of one variant.
///
/// Attributes removed from the draft are unset first, then changed or new
/// attributes are set. Attributes declared same-for-all in `ctx` use the
/// product-wide action instead of the per-variant one.
pub fn build_attribute_actions(
    old: &ProductVariant,
    new: &ProductVariantDraft,
    ctx: &ProductDiffContext,
) -> Vec<ProductAction> {
    let set = |name: &str, value: Option<serde_json::Value>| {
        if ctx.is_same_for_all(name) {
            ProductAction::SetAttributeInAllVariants {
                name: name.to_string(),
                value,
            }
        } else {
            ProductAction::SetAttribute {
                variant_id: old.id,
                name: name.to_string(),
                value,
            }
        }
    };

    let unset = old
        .attributes
        .keys()
        .filter(|name| !new.attributes.contains_key(*name))
        .map(|name| set(name.as_str(), None));

    let changed = new
        .attributes
        .iter()
        .filter(|(name, value)| old.attributes.get(*name) != Some(*value))
        .map(|(name, value)| set(name.as_str(), Some(value.clone())));

    unset.chain(changed).collect()
}

/// Image changes of one variant, images being identified by url.
///
/// Removals come first, then missing images are appended, then images are
/// moved one by one until the order matches the draft. Each move is computed
/// against the order left by the previous actions. Label changes on kept
/// images come last.
pub fn build_image_actions(old: &ProductVariant, new: &ProductVariantDraft) -> Vec<ProductAction> {
    let new_urls: HashSet<&str> = new.images.iter().map(|i| i.url.as_str()).collect();
    let old_urls: HashSet<&str> = old.images.iter().map(|i| i.url.as_str()).collect();
    let mut actions = Vec::new();

    for image in old.images.iter().filter(|i| !new_urls.contains(i.url.as_str())) {
        actions.push(ProductAction::RemoveImage {
            variant_id: old.id,
            image_url: image.url.clone(),
        });
    }

    let mut current: Vec<&str> = old
        .images
        .iter()
        .map(|i| i.url.as_str())
        .filter(|url| new_urls.contains(url))
        .collect();

    for image in new.images.iter().filter(|i| !old_urls.contains(i.url.as_str())) {
        actions.push(ProductAction::AddExternalImage {
            variant_id: old.id,
            image: image.clone(),
        });
        current.push(image.url.as_str());
    }

    for (position, image) in new.images.iter().enumerate() {
        if current.get(position) == Some(&image.url.as_str()) {
            continue;
        }
        if let Some(from) = current.iter().position(|url| *url == image.url) {
            let url = current.remove(from);
            current.insert(position.min(current.len()), url);
            actions.push(ProductAction::MoveImageToPosition {
                variant_id: old.id,
                image_url: image.url.clone(),
                position,
            });
        }
    }

    for image in &new.images {
        let Some(existing) = old.images.iter().find(|i| i.url == image.url) else {
            continue;
        };
        if let Some(action) = build_update_action(&existing.label, &image.label, || {
            ProductAction::SetImageLabel {
                variant_id: old.id,
                image_url: image.url.clone(),
                label: image.label.clone(),
            }
        }) {
            actions.push(action);
        }
    }

    actions
}

/// Price changes of one variant, prices being matched by scope.
///
/// Old prices whose scope is gone are removed, prices whose value changed
/// are replaced in place, prices for new scopes are added. Channel and
/// customer group references match by id or by key.
pub fn build_price_actions(old: &ProductVariant, new: &ProductVariantDraft) -> Vec<ProductAction> {
    let mut actions = Vec::new();

    for price in &old.prices {
        if new.prices.iter().any(|p| p.same_scope(price)) {
            continue;
        }
        if let Some(price_id) = &price.id {
            actions.push(ProductAction::RemovePrice {
                price_id: price_id.clone(),
            });
        }
    }

    for price in &new.prices {
        match old.prices.iter().find(|p| p.same_scope(price)) {
            Some(existing) if existing.value != price.value || existing.key != price.key => {
                if let Some(price_id) = &existing.id {
                    actions.push(ProductAction::ChangePrice {
                        price_id: price_id.clone(),
                        price: price.clone(),
                    });
                }
            }
            Some(_) => {}
            None => actions.push(ProductAction::AddPrice {
                variant_id: old.id,
                price: price.clone(),
            }),
        }
    }

    actions
}

/// Asset changes of one variant, assets being identified by key.
///
/// Assets without a key cannot be addressed and are left alone, so insert
/// positions count keyed assets only. After removals, changes and additions,
/// the order is fixed with a single `changeAssetOrder` when it still differs
/// from the draft.
pub fn build_asset_actions(old: &ProductVariant, new: &ProductVariantDraft) -> Vec<ProductAction> {
    let new_keys: Vec<&str> = new.assets.iter().filter_map(|a| a.key.as_deref()).collect();
    let mut actions = Vec::new();

    for key in old.assets.iter().filter_map(|a| a.key.as_deref()) {
        if !new_keys.contains(&key) {
            actions.push(ProductAction::RemoveAsset {
                variant_id: old.id,
                asset_key: key.to_string(),
            });
        }
    }

    let mut current: Vec<&str> = old
        .assets
        .iter()
        .filter_map(|a| a.key.as_deref())
        .filter(|key| new_keys.contains(key))
        .collect();

    let keyed = new
        .assets
        .iter()
        .filter_map(|a| a.key.as_deref().map(|key| (key, a)));
    for (position, (key, asset)) in keyed.enumerate() {
        match old.assets.iter().find(|a| a.key.as_deref() == Some(key)) {
            Some(existing) => {
                if existing.name != asset.name {
                    actions.push(ProductAction::ChangeAssetName {
                        variant_id: old.id,
                        asset_key: key.to_string(),
                        name: asset.name.clone(),
                    });
                }
                if existing.sources != asset.sources {
                    actions.push(ProductAction::SetAssetSources {
                        variant_id: old.id,
                        asset_key: key.to_string(),
                        sources: asset.sources.clone(),
                    });
                }
            }
            None => {
                actions.push(ProductAction::AddAsset {
                    variant_id: old.id,
                    asset: asset.clone(),
                    position,
                });
                current.insert(position.min(current.len()), key);
            }
        }
    }

    if current != new_keys {
        actions.push(ProductAction::ChangeAssetOrder {
            variant_id: old.id,
            asset_order: new_keys.iter().map(|k| k.to_string()).collect(),
        });
    }

    actions
}
