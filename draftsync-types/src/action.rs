//! Update actions.
//!
//! An action is one named instruction the remote system applies to an
//! entity. A diff produces an ordered list of them and the whole list is
//! sent in a single update call, which the remote applies in sequence.
//! Product actions always target the staged projection.

use crate::{
    Asset, AssetSource, ChannelRole, Image, LocalizedString, Price, ResourceIdentifier,
    SearchKeywords,
};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ProductAction {
    ChangeName {
        name: LocalizedString,
    },
    SetDescription {
        description: Option<LocalizedString>,
    },
    ChangeSlug {
        slug: LocalizedString,
    },
    SetSearchKeywords {
        search_keywords: Option<SearchKeywords>,
    },
    SetMetaTitle {
        meta_title: Option<LocalizedString>,
    },
    SetMetaDescription {
        meta_description: Option<LocalizedString>,
    },
    SetMetaKeywords {
        meta_keywords: Option<LocalizedString>,
    },
    SetTaxCategory {
        tax_category: Option<ResourceIdentifier>,
    },
    /// Moves the product to a workflow state without validating the
    /// transition.
    TransitionState {
        state: ResourceIdentifier,
        force: bool,
    },
    AddToCategory {
        category: ResourceIdentifier,
    },
    RemoveFromCategory {
        category: ResourceIdentifier,
    },
    /// `order_hint: None` clears the hint.
    SetCategoryOrderHint {
        category_id: String,
        order_hint: Option<String>,
    },
    AddVariant {
        key: Option<String>,
        sku: Option<String>,
        attributes: BTreeMap<String, serde_json::Value>,
        prices: Vec<Price>,
        images: Vec<Image>,
        assets: Vec<Asset>,
    },
    RemoveVariant {
        variant_id: u32,
    },
    /// Addressed by sku because the new master may not have an id yet.
    ChangeMasterVariant {
        sku: String,
    },
    SetSku {
        variant_id: u32,
        sku: Option<String>,
    },
    SetAttribute {
        variant_id: u32,
        name: String,
        value: Option<serde_json::Value>,
    },
    SetAttributeInAllVariants {
        name: String,
        value: Option<serde_json::Value>,
    },
    AddExternalImage {
        variant_id: u32,
        image: Image,
    },
    RemoveImage {
        variant_id: u32,
        image_url: String,
    },
    MoveImageToPosition {
        variant_id: u32,
        image_url: String,
        position: usize,
    },
    SetImageLabel {
        variant_id: u32,
        image_url: String,
        label: Option<String>,
    },
    AddPrice {
        variant_id: u32,
        price: Price,
    },
    ChangePrice {
        price_id: String,
        price: Price,
    },
    RemovePrice {
        price_id: String,
    },
    AddAsset {
        variant_id: u32,
        asset: Asset,
        position: usize,
    },
    RemoveAsset {
        variant_id: u32,
        asset_key: String,
    },
    ChangeAssetName {
        variant_id: u32,
        asset_key: String,
        name: LocalizedString,
    },
    SetAssetSources {
        variant_id: u32,
        asset_key: String,
        sources: Vec<AssetSource>,
    },
    ChangeAssetOrder {
        variant_id: u32,
        asset_order: Vec<String>,
    },
    Publish,
    Unpublish,
}

impl ProductAction {
    /// The wire name of the action, e.g. `"changeName"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeName { .. } => "changeName",
            Self::SetDescription { .. } => "setDescription",
            Self::ChangeSlug { .. } => "changeSlug",
            Self::SetSearchKeywords { .. } => "setSearchKeywords",
            Self::SetMetaTitle { .. } => "setMetaTitle",
            Self::SetMetaDescription { .. } => "setMetaDescription",
            Self::SetMetaKeywords { .. } => "setMetaKeywords",
            Self::SetTaxCategory { .. } => "setTaxCategory",
            Self::TransitionState { .. } => "transitionState",
            Self::AddToCategory { .. } => "addToCategory",
            Self::RemoveFromCategory { .. } => "removeFromCategory",
            Self::SetCategoryOrderHint { .. } => "setCategoryOrderHint",
            Self::AddVariant { .. } => "addVariant",
            Self::RemoveVariant { .. } => "removeVariant",
            Self::ChangeMasterVariant { .. } => "changeMasterVariant",
            Self::SetSku { .. } => "setSku",
            Self::SetAttribute { .. } => "setAttribute",
            Self::SetAttributeInAllVariants { .. } => "setAttributeInAllVariants",
            Self::AddExternalImage { .. } => "addExternalImage",
            Self::RemoveImage { .. } => "removeImage",
            Self::MoveImageToPosition { .. } => "moveImageToPosition",
            Self::SetImageLabel { .. } => "setImageLabel",
            Self::AddPrice { .. } => "addPrice",
            Self::ChangePrice { .. } => "changePrice",
            Self::RemovePrice { .. } => "removePrice",
            Self::AddAsset { .. } => "addAsset",
            Self::RemoveAsset { .. } => "removeAsset",
            Self::ChangeAssetName { .. } => "changeAssetName",
            Self::SetAssetSources { .. } => "setAssetSources",
            Self::ChangeAssetOrder { .. } => "changeAssetOrder",
            Self::Publish => "publish",
            Self::Unpublish => "unpublish",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ChannelAction {
    ChangeName { name: Option<LocalizedString> },
    ChangeDescription { description: Option<LocalizedString> },
    AddRoles { roles: Vec<ChannelRole> },
    RemoveRoles { roles: Vec<ChannelRole> },
}

impl ChannelAction {
    /// The wire name of the action, e.g. `"addRoles"`.
    pub fn name(&self) -> &'static str {
        match self {
            Self::ChangeName { .. } => "changeName",
            Self::ChangeDescription { .. } => "changeDescription",
            Self::AddRoles { .. } => "addRoles",
            Self::RemoveRoles { .. } => "removeRoles",
        }
    }
}
