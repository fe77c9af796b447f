//! Product drafts and entities.
//!
//! A product is hierarchical: besides its own fields it owns an ordered list
//! of variants, one of which is the master variant. Drafts describe the
//! desired state; [`Product`] mirrors what the remote system currently
//! stores (its staged projection) plus the remote id, version and the
//! publish flags.

use crate::{LocalizedString, ResourceId, ResourceIdentifier};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Search keyword texts per locale.
pub type SearchKeywords = BTreeMap<String, Vec<String>>;

/// Category id → order hint.
pub type CategoryOrderHints = BTreeMap<String, String>;

/// A monetary amount in the smallest currency unit.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Money {
    pub cent_amount: i64,
    pub currency: String,
}

impl Money {
    pub fn of(cent_amount: i64, currency: impl Into<String>) -> Self {
        Self {
            cent_amount,
            currency: currency.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Remote id; only set on prices of fetched entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub value: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub channel: Option<ResourceIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub customer_group: Option<ResourceIdentifier>,
}

impl Price {
    /// Creates a price draft valid for every country, channel and group.
    pub fn of(value: Money) -> Self {
        Self {
            id: None,
            key: None,
            value,
            country: None,
            channel: None,
            customer_group: None,
        }
    }

    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    #[must_use]
    pub fn with_country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    #[must_use]
    pub fn with_channel(mut self, channel: ResourceIdentifier) -> Self {
        self.channel = Some(channel);
        self
    }

    #[must_use]
    pub fn with_customer_group(mut self, group: ResourceIdentifier) -> Self {
        self.customer_group = Some(group);
        self
    }

    /// Whether both prices apply to the same currency, country, channel
    /// and customer group. Two prices of one variant never share a scope,
    /// so this is what prices are matched by.
    pub fn same_scope(&self, other: &Price) -> bool {
        self.value.currency == other.value.currency
            && self.country == other.country
            && ResourceIdentifier::are_equivalent(self.channel.as_ref(), other.channel.as_ref())
            && ResourceIdentifier::are_equivalent(
                self.customer_group.as_ref(),
                other.customer_group.as_ref(),
            )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ImageDimensions {
    pub w: u32,
    pub h: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Image {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<ImageDimensions>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl Image {
    pub fn of(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dimensions: None,
            label: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AssetSource {
    pub uri: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: LocalizedString,
    #[serde(default)]
    pub sources: Vec<AssetSource>,
}

impl Asset {
    pub fn of(key: impl Into<String>, name: LocalizedString) -> Self {
        Self {
            key: Some(key.into()),
            name,
            sources: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_source(mut self, uri: impl Into<String>) -> Self {
        self.sources.push(AssetSource {
            uri: uri.into(),
            key: None,
        });
        self
    }
}

/// Desired state of one variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductVariantDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub prices: Vec<Price>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl ProductVariantDraft {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: Some(key.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_sku(mut self, sku: impl Into<String>) -> Self {
        self.sku = Some(sku.into());
        self
    }

    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: serde_json::Value) -> Self {
        self.attributes.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_image(mut self, image: Image) -> Self {
        self.images.push(image);
        self
    }

    #[must_use]
    pub fn with_price(mut self, price: Price) -> Self {
        self.prices.push(price);
        self
    }

    #[must_use]
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }
}

/// A variant as stored remotely.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductVariant {
    pub id: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(default)]
    pub attributes: BTreeMap<String, serde_json::Value>,
    #[serde(default)]
    pub images: Vec<Image>,
    #[serde(default)]
    pub prices: Vec<Price>,
    #[serde(default)]
    pub assets: Vec<Asset>,
}

impl ProductVariant {
    /// Builds the stored form of a draft under the given variant id.
    pub fn from_draft(id: u32, draft: &ProductVariantDraft) -> Self {
        Self {
            id,
            key: draft.key.clone(),
            sku: draft.sku.clone(),
            attributes: draft.attributes.clone(),
            images: draft.images.clone(),
            prices: draft.prices.clone(),
            assets: draft.assets.clone(),
        }
    }
}

/// Desired state of a product.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductDraft {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: LocalizedString,
    pub slug: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<SearchKeywords>,
    #[serde(default)]
    pub categories: Vec<ResourceIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_order_hints: Option<CategoryOrderHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_category: Option<ResourceIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceIdentifier>,
    /// Whether the product should end up published. Unset means `false`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub master_variant: Option<ProductVariantDraft>,
    /// Non-master variants. Entries may be `null` in incoming payloads.
    #[serde(default)]
    pub variants: Vec<Option<ProductVariantDraft>>,
}

impl ProductDraft {
    pub fn new(key: impl Into<String>, name: LocalizedString, slug: LocalizedString) -> Self {
        Self {
            key: Some(key.into()),
            name,
            slug,
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_master_variant(mut self, variant: ProductVariantDraft) -> Self {
        self.master_variant = Some(variant);
        self
    }

    #[must_use]
    pub fn with_variant(mut self, variant: ProductVariantDraft) -> Self {
        self.variants.push(Some(variant));
        self
    }

    #[must_use]
    pub fn with_category(mut self, category: ResourceIdentifier) -> Self {
        self.categories.push(category);
        self
    }

    #[must_use]
    pub fn with_publish(mut self, publish: bool) -> Self {
        self.publish = Some(publish);
        self
    }

    /// Master variant first, then the non-master variants in draft order.
    pub fn all_variants(&self) -> Vec<Option<&ProductVariantDraft>> {
        std::iter::once(self.master_variant.as_ref())
            .chain(self.variants.iter().map(Option::as_ref))
            .collect()
    }
}

/// A product as stored remotely (staged projection).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: ResourceId,
    pub version: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub name: LocalizedString,
    pub slug: LocalizedString,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_title: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_description: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta_keywords: Option<LocalizedString>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_keywords: Option<SearchKeywords>,
    #[serde(default)]
    pub categories: Vec<ResourceIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category_order_hints: Option<CategoryOrderHints>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tax_category: Option<ResourceIdentifier>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<ResourceIdentifier>,
    #[serde(default)]
    pub published: bool,
    #[serde(default)]
    pub has_staged_changes: bool,
    pub master_variant: ProductVariant,
    #[serde(default)]
    pub variants: Vec<ProductVariant>,
}

impl Product {
    /// Builds the stored form of a draft, as a remote system would right
    /// after creating it. Variant ids are assigned from 1 in draft order,
    /// null variant entries are dropped.
    pub fn from_draft(id: ResourceId, draft: &ProductDraft) -> Self {
        let master = draft.master_variant.clone().unwrap_or_default();
        let variants = draft
            .variants
            .iter()
            .flatten()
            .enumerate()
            .map(|(i, v)| ProductVariant::from_draft(i as u32 + 2, v))
            .collect();
        Self {
            id,
            version: 1,
            key: draft.key.clone(),
            name: draft.name.clone(),
            slug: draft.slug.clone(),
            description: draft.description.clone(),
            meta_title: draft.meta_title.clone(),
            meta_description: draft.meta_description.clone(),
            meta_keywords: draft.meta_keywords.clone(),
            search_keywords: draft.search_keywords.clone(),
            categories: draft.categories.clone(),
            category_order_hints: draft.category_order_hints.clone(),
            tax_category: draft.tax_category.clone(),
            state: draft.state.clone(),
            published: draft.publish.unwrap_or(false),
            has_staged_changes: false,
            master_variant: ProductVariant::from_draft(1, &master),
            variants,
        }
    }

    /// Master variant first, then the non-master variants.
    pub fn all_variants(&self) -> impl Iterator<Item = &ProductVariant> {
        std::iter::once(&self.master_variant).chain(self.variants.iter())
    }
}
