//! Events reported to the caller during a sync run.

use crate::error::SyncError;
use crate::kind::ResourceKind;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Error => write!(f, "error"),
            Self::Warning => write!(f, "warning"),
        }
    }
}

/// One problem met while syncing, with whatever context was available at
/// the failing step. Validation errors carry neither entity nor draft
/// actions; update failures carry all of them.
#[derive(Debug)]
pub struct SyncEvent<K: ResourceKind> {
    pub severity: Severity,
    pub message: String,
    pub error: Option<SyncError>,
    pub old_entity: Option<K::Entity>,
    pub draft: Option<K::Draft>,
    pub actions: Vec<K::Action>,
}

impl<K: ResourceKind> SyncEvent<K> {
    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self::new(Severity::Warning, message)
    }

    fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            error: None,
            old_entity: None,
            draft: None,
            actions: Vec::new(),
        }
    }

    #[must_use]
    pub fn with_error(mut self, error: SyncError) -> Self {
        self.error = Some(error);
        self
    }

    #[must_use]
    pub fn with_old_entity(mut self, entity: K::Entity) -> Self {
        self.old_entity = Some(entity);
        self
    }

    #[must_use]
    pub fn with_draft(mut self, draft: K::Draft) -> Self {
        self.draft = Some(draft);
        self
    }

    #[must_use]
    pub fn with_actions(mut self, actions: Vec<K::Action>) -> Self {
        self.actions = actions;
        self
    }

    pub fn is_error(&self) -> bool {
        self.severity == Severity::Error
    }
}
