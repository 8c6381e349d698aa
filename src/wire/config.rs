//! Configuration of a type table
//!
//! This module controls how name handles are described for the "own framework" mode and
//! whether a table shares its resolver's process-wide name cache.

use crate::metadata::identity::CORE_LIBRARY_NAMES;

/// Display name every core library alias is rewritten to in "own framework" name handles.
pub const CANONICAL_CORE_LIBRARY: &str =
    "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089";

/// Configuration for a [`TypeTable`](super::TypeTable)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireConfig {
    /// Assembly display name substituted for the core library in normalized names
    pub canonical_core_library: String,

    /// Simple assembly names recognised as the runtime's standard library (case-insensitive)
    pub core_library_aliases: Vec<String>,

    /// Use the resolver's process-wide [`NameCache`](super::NameCache) instead of a private one
    pub shared_cache: bool,
}

impl Default for WireConfig {
    fn default() -> Self {
        Self {
            canonical_core_library: CANONICAL_CORE_LIBRARY.to_string(),
            core_library_aliases: CORE_LIBRARY_NAMES
                .iter()
                .map(|name| (*name).to_string())
                .collect(),
            shared_cache: true,
        }
    }
}

impl WireConfig {
    /// Creates a configuration with a private name cache
    ///
    /// Tables created with it never observe names resolved by other tables. Mostly useful
    /// for tests and for isolating untrusted sessions.
    #[must_use]
    pub fn isolated() -> Self {
        Self {
            shared_cache: false,
            ..Self::default()
        }
    }

    /// Set the canonical core library display name
    ///
    /// ## Arguments
    /// * 'display_name' - Full assembly display name to substitute
    #[must_use]
    pub fn with_canonical_core_library(mut self, display_name: &str) -> Self {
        self.canonical_core_library = display_name.to_string();
        self
    }

    /// Recognise an additional simple name as the core library
    ///
    /// ## Arguments
    /// * 'alias' - Simple assembly name, e.g. `System.Runtime`
    #[must_use]
    pub fn with_core_library_alias(mut self, alias: &str) -> Self {
        if !self
            .core_library_aliases
            .iter()
            .any(|existing| existing.eq_ignore_ascii_case(alias))
        {
            self.core_library_aliases.push(alias.to_string());
        }
        self
    }

    /// Choose between the process-wide and a private name cache
    ///
    /// ## Arguments
    /// * 'shared' - `true` for the process-wide cache
    #[must_use]
    pub fn with_shared_cache(mut self, shared: bool) -> Self {
        self.shared_cache = shared;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = WireConfig::default();
        assert_eq!(config.canonical_core_library, CANONICAL_CORE_LIBRARY);
        assert_eq!(config.core_library_aliases.len(), 4);
        assert!(config.shared_cache);
        assert!(!WireConfig::isolated().shared_cache);
    }

    #[test]
    fn test_alias_deduplicated() {
        let config = WireConfig::default()
            .with_core_library_alias("MSCORLIB")
            .with_core_library_alias("System.Runtime.Extensions");
        assert_eq!(config.core_library_aliases.len(), 5);
    }
}
