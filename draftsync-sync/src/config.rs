//! Sync configuration and options.
//!
//! [`SyncConfig`] holds the plain, serializable settings. [`SyncOptions`]
//! adds the caller hooks (event callback, before-create and before-update
//! transforms) and is assembled through [`SyncOptionsBuilder`], which
//! validates the configuration.

use crate::error::{SyncError, SyncResult};
use crate::event::{Severity, SyncEvent};
use crate::kind::ResourceKind;
use draftsync_diff::{ProductDiffContext, SyncFilter};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Default number of drafts processed per batch.
pub const DEFAULT_BATCH_SIZE: usize = 50;

/// Value constraint of a product attribute definition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub enum AttributeConstraint {
    #[default]
    None,
    Unique,
    CombinationUnique,
    /// Every variant of a product holds the same value.
    SameForAll,
}

/// Serializable sync settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SyncConfig {
    /// Drafts per batch. Must be positive.
    pub batch_size: usize,
    /// Which product action groups are built.
    pub sync_filter: SyncFilter,
    /// Attribute name → constraint, as defined by the product type.
    pub attribute_metadata: BTreeMap<String, AttributeConstraint>,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
            sync_filter: SyncFilter::All,
            attribute_metadata: BTreeMap::new(),
        }
    }
}

impl SyncConfig {
    pub fn validate(&self) -> SyncResult<()> {
        if self.batch_size == 0 {
            return Err(SyncError::InvalidOptions(
                "batch size must be greater than zero".to_string(),
            ));
        }
        Ok(())
    }

    /// The diff settings derived from this configuration.
    pub fn product_diff_context(&self) -> ProductDiffContext {
        ProductDiffContext {
            filter: self.sync_filter.clone(),
            same_for_all_attributes: self
                .attribute_metadata
                .iter()
                .filter(|(_, constraint)| **constraint == AttributeConstraint::SameForAll)
                .map(|(name, _)| name.clone())
                .collect(),
        }
    }
}

/// Receives every error and warning raised during a run.
pub type EventCallback<K> = Arc<dyn Fn(&SyncEvent<K>) + Send + Sync>;

/// Transforms a draft before it is created. Returning `None` skips the
/// draft without touching the statistics.
pub type BeforeCreate<K> =
    Arc<dyn Fn(<K as ResourceKind>::Draft) -> Option<<K as ResourceKind>::Draft> + Send + Sync>;

/// Transforms the computed actions before an update. Returning an empty
/// list skips the update without touching the statistics.
pub type BeforeUpdate<K> = Arc<
    dyn Fn(
            Vec<<K as ResourceKind>::Action>,
            &<K as ResourceKind>::Draft,
            &<K as ResourceKind>::Entity,
        ) -> Vec<<K as ResourceKind>::Action>
        + Send
        + Sync,
>;

/// Configuration plus hooks for one [`crate::ResourceSync`].
pub struct SyncOptions<K: ResourceKind> {
    config: SyncConfig,
    event_callback: Option<EventCallback<K>>,
    before_create: Option<BeforeCreate<K>>,
    before_update: Option<BeforeUpdate<K>>,
}

impl<K: ResourceKind> SyncOptions<K> {
    pub fn builder() -> SyncOptionsBuilder<K> {
        SyncOptionsBuilder::default()
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    pub fn batch_size(&self) -> usize {
        self.config.batch_size
    }

    pub(crate) fn emit(&self, event: &SyncEvent<K>) {
        if let Some(callback) = &self.event_callback {
            callback(event);
        }
    }

    pub(crate) fn apply_before_create(&self, draft: K::Draft) -> Option<K::Draft> {
        match &self.before_create {
            Some(hook) => hook(draft),
            None => Some(draft),
        }
    }

    pub(crate) fn apply_before_update(
        &self,
        actions: Vec<K::Action>,
        draft: &K::Draft,
        entity: &K::Entity,
    ) -> Vec<K::Action> {
        match &self.before_update {
            Some(hook) if !actions.is_empty() => hook(actions, draft, entity),
            _ => actions,
        }
    }
}

impl<K: ResourceKind> Default for SyncOptions<K> {
    fn default() -> Self {
        Self {
            config: SyncConfig::default(),
            event_callback: None,
            before_create: None,
            before_update: None,
        }
    }
}

impl<K: ResourceKind> Clone for SyncOptions<K> {
    fn clone(&self) -> Self {
        Self {
            config: self.config.clone(),
            event_callback: self.event_callback.clone(),
            before_create: self.before_create.clone(),
            before_update: self.before_update.clone(),
        }
    }
}

impl<K: ResourceKind> fmt::Debug for SyncOptions<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("config", &self.config)
            .field("event_callback", &self.event_callback.is_some())
            .field("before_create", &self.before_create.is_some())
            .field("before_update", &self.before_update.is_some())
            .finish()
    }
}

/// Builder for [`SyncOptions`].
///
/// Error and warning callbacks are registered separately but end up in a
/// single event sink that dispatches on [`Severity`].
pub struct SyncOptionsBuilder<K: ResourceKind> {
    config: SyncConfig,
    error_callback: Option<EventCallback<K>>,
    warning_callback: Option<EventCallback<K>>,
    before_create: Option<BeforeCreate<K>>,
    before_update: Option<BeforeUpdate<K>>,
}

impl<K: ResourceKind> Default for SyncOptionsBuilder<K> {
    fn default() -> Self {
        Self {
            config: SyncConfig::default(),
            error_callback: None,
            warning_callback: None,
            before_create: None,
            before_update: None,
        }
    }
}

impl<K: ResourceKind> SyncOptionsBuilder<K> {
    #[must_use]
    pub fn config(mut self, config: SyncConfig) -> Self {
        self.config = config;
        self
    }

    #[must_use]
    pub fn batch_size(mut self, batch_size: usize) -> Self {
        self.config.batch_size = batch_size;
        self
    }

    #[must_use]
    pub fn sync_filter(mut self, filter: SyncFilter) -> Self {
        self.config.sync_filter = filter;
        self
    }

    #[must_use]
    pub fn attribute_constraint(
        mut self,
        attribute: impl Into<String>,
        constraint: AttributeConstraint,
    ) -> Self {
        self.config
            .attribute_metadata
            .insert(attribute.into(), constraint);
        self
    }

    #[must_use]
    pub fn error_callback(mut self, f: impl Fn(&SyncEvent<K>) + Send + Sync + 'static) -> Self {
        self.error_callback = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn warning_callback(mut self, f: impl Fn(&SyncEvent<K>) + Send + Sync + 'static) -> Self {
        self.warning_callback = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn before_create(
        mut self,
        f: impl Fn(K::Draft) -> Option<K::Draft> + Send + Sync + 'static,
    ) -> Self {
        self.before_create = Some(Arc::new(f));
        self
    }

    #[must_use]
    pub fn before_update(
        mut self,
        f: impl Fn(Vec<K::Action>, &K::Draft, &K::Entity) -> Vec<K::Action> + Send + Sync + 'static,
    ) -> Self {
        self.before_update = Some(Arc::new(f));
        self
    }

    /// Validates the configuration and assembles the options.
    pub fn build(self) -> SyncResult<SyncOptions<K>> {
        self.config.validate()?;

        let event_callback = match (self.error_callback, self.warning_callback) {
            (None, None) => None,
            (errors, warnings) => {
                let sink: EventCallback<K> = Arc::new(move |event: &SyncEvent<K>| {
                    let callback = match event.severity {
                        Severity::Error => &errors,
                        Severity::Warning => &warnings,
                    };
                    if let Some(callback) = callback {
                        callback(event);
                    }
                });
                Some(sink)
            }
        };

        Ok(SyncOptions {
            config: self.config,
            event_callback,
            before_create: self.before_create,
            before_update: self.before_update,
        })
    }
}
