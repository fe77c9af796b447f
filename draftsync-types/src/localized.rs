use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

/// A text value keyed by locale tag (e.g. `"en"`, `"de-DE"`).
///
/// Backed by an ordered map so equality and serialization do not depend on
/// insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LocalizedString(BTreeMap<String, String>);

impl LocalizedString {
    /// Creates an empty localized string.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a localized string with a single locale.
    pub fn of(locale: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new().with(locale, text)
    }

    /// Adds (or replaces) the text for a locale.
    #[must_use]
    pub fn with(mut self, locale: impl Into<String>, text: impl Into<String>) -> Self {
        self.0.insert(locale.into(), text.into());
        self
    }

    /// Returns the text for a locale.
    pub fn get(&self, locale: &str) -> Option<&str> {
        self.0.get(locale).map(String::as_str)
    }

    /// Iterates `(locale, text)` pairs in locale order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(l, t)| (l.as_str(), t.as_str()))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for LocalizedString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("{")?;
        for (i, (locale, text)) in self.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{locale}: {text}")?;
        }
        f.write_str("}")
    }
}
