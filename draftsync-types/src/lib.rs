//! Core type definitions for draftsync.
//!
//! This crate defines the value types shared by the diff engine and the
//! sync orchestrator:
//! - Remote identifiers and resource identifiers (by id or by key)
//! - Localized strings
//! - Drafts (desired state) and entities (existing remote state) for
//!   products and channels
//! - Update actions, the named instructions applied remotely
//!
//! Nothing here performs I/O or holds state between calls.

mod action;
mod channel;
mod ids;
mod localized;
mod product;
mod reference;

pub use action::{ChannelAction, ProductAction};
pub use channel::{Channel, ChannelDraft, ChannelRole};
pub use ids::ResourceId;
pub use localized::LocalizedString;
pub use product::{
    Asset, AssetSource, CategoryOrderHints, Image, ImageDimensions, Money, Price,
    Product, ProductDraft, ProductVariant, ProductVariantDraft, SearchKeywords,
};
pub use reference::ResourceIdentifier;

/// Returns true when `value` is absent, empty or only whitespace.
pub fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}
