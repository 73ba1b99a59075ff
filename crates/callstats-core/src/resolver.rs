//! Extension → staff identity lookup.

use std::collections::HashMap;
use std::fmt;

use crate::config::{SummaryConfig, normalize_extension};

/// Who answered a call, as far as the extension map can tell.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum StaffIdentity {
    Staff(String),
    Unresolved,
}

impl StaffIdentity {
    pub fn name(&self) -> Option<&str> {
        match self {
            StaffIdentity::Staff(name) => Some(name),
            StaffIdentity::Unresolved => None,
        }
    }

    pub fn is_resolved(&self) -> bool {
        matches!(self, StaffIdentity::Staff(_))
    }
}

impl fmt::Display for StaffIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StaffIdentity::Staff(name) => f.write_str(name),
            StaffIdentity::Unresolved => f.write_str("unresolved"),
        }
    }
}

/// Static extension map, keyed by bare digits.
#[derive(Debug, Clone, Default)]
pub struct ExtensionResolver {
    by_extension: HashMap<String, String>,
}

impl ExtensionResolver {
    pub fn from_config(config: &SummaryConfig) -> Self {
        let by_extension = config
            .extensions
            .iter()
            .filter_map(|(key, staff)| normalize_extension(key).map(|ext| (ext, staff.clone())))
            .collect();
        Self { by_extension }
    }

    /// Look up an extension, with or without its leading `*`.
    ///
    /// Total: anything unknown or malformed yields [`StaffIdentity::Unresolved`].
    pub fn resolve(&self, extension: &str) -> StaffIdentity {
        normalize_extension(extension)
            .and_then(|ext| self.by_extension.get(&ext))
            .map(|name| StaffIdentity::Staff(name.clone()))
            .unwrap_or(StaffIdentity::Unresolved)
    }

    pub fn len(&self) -> usize {
        self.by_extension.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_extension.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resolver() -> ExtensionResolver {
        ExtensionResolver::from_config(&SummaryConfig::sample())
    }

    #[test]
    fn known_extension_resolves() {
        let r = resolver();
        assert_eq!(r.resolve("*202"), StaffIdentity::Staff("Jess".into()));
        assert_eq!(r.resolve("202"), StaffIdentity::Staff("Jess".into()));
        assert_eq!(r.resolve("*232"), StaffIdentity::Staff("Bethany".into()));
    }

    #[test]
    fn unknown_extension_is_unresolved() {
        let r = resolver();
        assert_eq!(r.resolve("*299"), StaffIdentity::Unresolved);
        assert_eq!(r.resolve(""), StaffIdentity::Unresolved);
        assert_eq!(r.resolve("reception"), StaffIdentity::Unresolved);
    }

    #[test]
    fn display_uses_sentinel_for_unresolved() {
        assert_eq!(StaffIdentity::Unresolved.to_string(), "unresolved");
        assert_eq!(StaffIdentity::Staff("Kim".into()).to_string(), "Kim");
        assert_eq!(StaffIdentity::Unresolved.name(), None);
    }

    #[test]
    fn every_sample_extension_is_loaded() {
        assert_eq!(resolver().len(), 21);
    }
}
