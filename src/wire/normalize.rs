//! Core library normalization of canonical type names.
//!
//! The runtime's standard library has shipped under several identities (`mscorlib` on the
//! .NET Framework, `System.Private.CoreLib` on modern runtimes, with `netstandard` and
//! `System.Runtime` as reference facades). A name handle written in "own framework" mode
//! replaces every such identity, including those inside generic arguments, with one fixed
//! display name, so that two runtime versions write byte-identical handles for standard
//! library types.
//!
//! # Example
//!
//! ```rust
//! use dotwire::wire::{CoreLibraryNormalizer, WireConfig};
//!
//! let normalizer = CoreLibraryNormalizer::new(&WireConfig::default());
//! let normalized = normalizer.normalize(
//!     "System.Int32, System.Private.CoreLib, Version=8.0.0.0, Culture=neutral, PublicKeyToken=7cec85d7bea7798e",
//! )?;
//! assert_eq!(
//!     normalized,
//!     "System.Int32, mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
//! );
//! # Ok::<(), dotwire::Error>(())
//! ```

use crate::{
    metadata::typesystem::{RuntimeType, TypeName},
    wire::WireConfig,
    Result,
};

/// Rewrites core library identities in type names
#[derive(Debug, Clone)]
pub struct CoreLibraryNormalizer {
    /// Replacement display name
    canonical: String,
    /// Simple names treated as the core library
    aliases: Vec<String>,
}

impl CoreLibraryNormalizer {
    /// Create a normalizer from the table configuration
    ///
    /// ## Arguments
    /// * 'config' - Supplies the canonical display name and the alias list
    #[must_use]
    pub fn new(config: &WireConfig) -> Self {
        CoreLibraryNormalizer {
            canonical: config.canonical_core_library.clone(),
            aliases: config.core_library_aliases.clone(),
        }
    }

    /// Returns `true` if the simple name of `display_name` is one of the core library aliases
    ///
    /// ## Arguments
    /// * 'display_name' - An assembly display name, e.g. `mscorlib, Version=4.0.0.0`
    #[must_use]
    pub fn is_core_library(&self, display_name: &str) -> bool {
        let simple_name = display_name.split(',').next().unwrap_or_default().trim();
        self.aliases
            .iter()
            .any(|alias| alias.eq_ignore_ascii_case(simple_name))
    }

    /// Replace every core library assembly in `type_name` with the canonical display name
    pub fn apply(&self, type_name: &mut TypeName) {
        type_name.map_assemblies(&mut |assembly: &str| {
            self.is_core_library(assembly)
                .then(|| self.canonical.clone())
        });
    }

    /// Normalize an assembly-qualified type name given as text
    ///
    /// # Errors
    /// Returns [`crate::Error::Malformed`] if `name` is not a valid type name.
    pub fn normalize(&self, name: &str) -> Result<String> {
        let mut type_name = TypeName::parse(name)?;
        self.apply(&mut type_name);
        Ok(type_name.to_string())
    }

    /// Produce the canonical name carried by a name handle for `runtime_type`
    ///
    /// ## Arguments
    /// * 'runtime_type' - The type being described
    /// * 'own_framework' - Normalize core library identities when set; otherwise the raw
    ///   assembly-qualified name is returned
    #[must_use]
    pub fn describe(&self, runtime_type: &RuntimeType, own_framework: bool) -> String {
        let mut type_name = runtime_type.type_name();
        if own_framework {
            self.apply(&mut type_name);
        }
        type_name.to_string()
    }
}

impl Default for CoreLibraryNormalizer {
    fn default() -> Self {
        Self::new(&WireConfig::default())
    }
}
