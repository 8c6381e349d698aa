//! Assembly identity for type names carried on the wire.
//!
//! Name handles are assembly-qualified: the type's full name is followed by the display
//! name of its defining assembly. This module parses and renders those display names and
//! knows which simple names denote the runtime's standard library, so that
//! `mscorlib, Version=4.0.0.0, ...` written by one runtime and
//! `System.Private.CoreLib, Version=8.0.0.0, ...` written by another are recognised as the
//! same library.
//!
//! # Display Name Format
//!
//! ```text
//! AssemblyName[, Version=Major.Minor.Build.Revision][, Culture=culture][, PublicKeyToken=token][, ProcessorArchitecture=arch]
//! ```
//!
//! A full `PublicKey=hex` component may stand in for the token. Rendering always prints the
//! token, derived from the key by SHA-1 when needed.
//!
//! # Examples
//!
//! ```rust
//! use dotwire::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//!
//! let mscorlib = AssemblyIdentity::parse(
//!     "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
//! )?;
//! assert_eq!(mscorlib.version, AssemblyVersion::new(4, 0, 0, 0));
//! assert!(mscorlib.is_core_library());
//! # Ok::<(), dotwire::Error>(())
//! ```

use std::{fmt, fmt::Write as _, str::FromStr};

use crate::{metadata::identity::Identity, Error, Result};

/// Simple names under which the runtime's standard library has shipped.
///
/// Any of these identifies the core library for name unification and for the
/// own-framework normalization of name handles.
pub const CORE_LIBRARY_NAMES: &[&str] = &[
    "mscorlib",
    "System.Private.CoreLib",
    "netstandard",
    "System.Runtime",
];

/// Complete identity information for a .NET assembly.
///
/// # Equality Semantics
///
/// The [`strong_name`](Self::strong_name) field is **excluded** from equality and hashing,
/// so a reference carrying a full public key and one carrying its token compare equal.
#[derive(Debug, Clone)]
pub struct AssemblyIdentity {
    /// Simple assembly name (e.g., "mscorlib", "System.Core").
    pub name: String,

    /// Four-part version number for compatibility and binding.
    pub version: AssemblyVersion,

    /// Culture information for localized assemblies; `None` is culture-neutral.
    pub culture: Option<String>,

    /// Cryptographic strong name identity.
    pub strong_name: Option<Identity>,

    /// Target processor architecture specification.
    pub processor_architecture: Option<ProcessorArchitecture>,
}

impl PartialEq for AssemblyIdentity {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.version == other.version
            && self.culture == other.culture
            && self.processor_architecture == other.processor_architecture
    }
}

impl Eq for AssemblyIdentity {}

impl std::hash::Hash for AssemblyIdentity {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.name.hash(state);
        self.version.hash(state);
        self.culture.hash(state);
        self.processor_architecture.hash(state);
    }
}

/// Four-part version numbering for .NET assemblies.
///
/// Versions are compared component-wise in order: major, minor, build, revision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct AssemblyVersion {
    /// Major version component.
    pub major: u16,
    /// Minor version component.
    pub minor: u16,
    /// Build version component.
    pub build: u16,
    /// Revision version component.
    pub revision: u16,
}

/// Processor architecture specification for .NET assemblies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProcessorArchitecture {
    /// Microsoft Intermediate Language - architecture neutral.
    MSIL,
    /// 32-bit Intel x86 architecture.
    X86,
    /// Intel Itanium 64-bit architecture.
    IA64,
    /// 64-bit x86-64 architecture. `x64` is accepted as an alias when parsing.
    AMD64,
    /// ARM processor architecture.
    ARM,
    /// 64-bit ARM architecture.
    ARM64,
}

impl AssemblyIdentity {
    /// Create a new assembly identity with the specified components.
    ///
    /// # Arguments
    ///
    /// * `name` - Simple assembly name for identification
    /// * `version` - Four-part version number
    /// * `culture` - Optional culture for localized assemblies
    /// * `strong_name` - Optional cryptographic identity
    /// * `processor_architecture` - Optional architecture specification
    pub fn new(
        name: impl Into<String>,
        version: AssemblyVersion,
        culture: Option<String>,
        strong_name: Option<Identity>,
        processor_architecture: Option<ProcessorArchitecture>,
    ) -> Self {
        Self {
            name: name.into(),
            version,
            culture,
            strong_name,
            processor_architecture,
        }
    }

    /// The historical .NET Framework core library identity,
    /// `mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089`.
    #[must_use]
    pub fn mscorlib() -> Self {
        Self::new(
            "mscorlib",
            AssemblyVersion::new(4, 0, 0, 0),
            None,
            Some(Identity::Token(u64::from_le_bytes([
                0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89,
            ]))),
            None,
        )
    }

    /// The modern runtime's core library identity,
    /// `System.Private.CoreLib, Version=8.0.0.0, Culture=neutral, PublicKeyToken=7cec85d7bea7798e`.
    #[must_use]
    pub fn private_corelib() -> Self {
        Self::new(
            "System.Private.CoreLib",
            AssemblyVersion::new(8, 0, 0, 0),
            None,
            Some(Identity::Token(u64::from_le_bytes([
                0x7c, 0xec, 0x85, 0xd7, 0xbe, 0xa7, 0x79, 0x8e,
            ]))),
            None,
        )
    }

    /// Parse assembly identity from display name string.
    ///
    /// Unknown `Key=Value` components are ignored, matching the runtime's tolerance. When
    /// both `PublicKey` and `PublicKeyToken` are given, the full key is kept.
    ///
    /// # Errors
    /// Returns an error if the name is empty, or the version, key, token or architecture
    /// components cannot be parsed.
    pub fn parse(display_name: &str) -> Result<Self> {
        let mut version = AssemblyVersion::UNKNOWN;
        let mut culture = None;
        let mut strong_name = None;
        let mut processor_architecture = None;

        let mut parts = display_name.split(',').map(str::trim);

        let name = parts.next().unwrap_or_default().to_string();
        if name.is_empty() {
            return Err(malformed_error!("Assembly name cannot be empty"));
        }

        for part in parts {
            if let Some(value) = part.strip_prefix("Version=") {
                version = AssemblyVersion::parse(value)?;
            } else if let Some(value) = part.strip_prefix("Culture=") {
                if !value.eq_ignore_ascii_case("neutral") {
                    culture = Some(value.to_string());
                }
            } else if let Some(value) = part.strip_prefix("PublicKeyToken=") {
                if value != "null" && !value.is_empty() {
                    let token_bytes = hex::decode(value).map_err(|e| {
                        malformed_error!("Invalid hex in PublicKeyToken '{}': {}", value, e)
                    })?;

                    let token_array: [u8; 8] = token_bytes.as_slice().try_into().map_err(|_| {
                        malformed_error!(
                            "PublicKeyToken must be exactly 8 bytes, got {} bytes from '{}'",
                            token_bytes.len(),
                            value
                        )
                    })?;
                    if !matches!(strong_name, Some(Identity::PubKey(_))) {
                        strong_name = Some(Identity::Token(u64::from_le_bytes(token_array)));
                    }
                }
            } else if let Some(value) = part.strip_prefix("PublicKey=") {
                if value != "null" && !value.is_empty() {
                    let key = hex::decode(value).map_err(|e| {
                        malformed_error!("Invalid hex in PublicKey '{}': {}", value, e)
                    })?;
                    strong_name = Some(Identity::PubKey(key));
                }
            } else if let Some(value) = part.strip_prefix("ProcessorArchitecture=") {
                processor_architecture = Some(ProcessorArchitecture::parse(value)?);
            }
        }

        Ok(Self {
            name,
            version,
            culture,
            strong_name,
            processor_architecture,
        })
    }

    /// Generate display name string for this assembly identity.
    ///
    /// The result always carries `Version`, `Culture` and `PublicKeyToken`, the form
    /// the runtime itself produces for assembly-qualified type names.
    ///
    /// ```rust
    /// use dotwire::metadata::identity::{AssemblyIdentity, AssemblyVersion};
    ///
    /// let identity = AssemblyIdentity::new("MyLibrary", AssemblyVersion::new(1, 2, 3, 4), None, None, None);
    /// assert_eq!(
    ///     identity.display_name(),
    ///     "MyLibrary, Version=1.2.3.4, Culture=neutral, PublicKeyToken=null"
    /// );
    /// ```
    #[must_use]
    pub fn display_name(&self) -> String {
        let mut result = String::with_capacity(self.name.len() + 80);

        result.push_str(&self.name);
        let _ = write!(result, ", Version={}", self.version);
        let _ = write!(
            result,
            ", Culture={}",
            self.culture.as_deref().unwrap_or("neutral")
        );

        result.push_str(", PublicKeyToken=");
        match &self.strong_name {
            Some(identity) => result.push_str(&identity.token_hex()),
            None => result.push_str("null"),
        }

        if let Some(arch) = &self.processor_architecture {
            let _ = write!(result, ", ProcessorArchitecture={}", arch);
        }

        result
    }

    /// Get the simple assembly name without version or culture information.
    #[must_use]
    pub fn simple_name(&self) -> &str {
        &self.name
    }

    /// Check if this assembly is strong-named.
    #[must_use]
    pub fn is_strong_named(&self) -> bool {
        self.strong_name.is_some()
    }

    /// Check if this identity names the runtime's standard library under any of
    /// its historical names ([`CORE_LIBRARY_NAMES`]).
    #[must_use]
    pub fn is_core_library(&self) -> bool {
        is_core_library_name(&self.name)
    }

    /// Check whether two identities denote the same library for type lookup.
    ///
    /// Simple names compare case-insensitively; all core library aliases are
    /// considered the same library. Versions are not compared.
    #[must_use]
    pub fn same_library(&self, other: &AssemblyIdentity) -> bool {
        self.name.eq_ignore_ascii_case(&other.name)
            || (self.is_core_library() && other.is_core_library())
    }
}

/// Check if a simple assembly name is one of [`CORE_LIBRARY_NAMES`] (case-insensitive).
#[must_use]
pub fn is_core_library_name(name: &str) -> bool {
    CORE_LIBRARY_NAMES
        .iter()
        .any(|alias| alias.eq_ignore_ascii_case(name))
}

impl AssemblyVersion {
    /// Sentinel value representing an unknown or unspecified version (0.0.0.0).
    pub const UNKNOWN: Self = Self {
        major: 0,
        minor: 0,
        build: 0,
        revision: 0,
    };

    /// Create a new assembly version with the specified components.
    #[must_use]
    pub const fn new(major: u16, minor: u16, build: u16, revision: u16) -> Self {
        Self {
            major,
            minor,
            build,
            revision,
        }
    }

    /// Check if this version represents an unknown/unspecified version.
    #[must_use]
    pub const fn is_unknown(&self) -> bool {
        self.major == 0 && self.minor == 0 && self.build == 0 && self.revision == 0
    }

    /// Parse assembly version from string representation.
    ///
    /// Supports one to four dot-separated components; missing components default to 0.
    ///
    /// # Errors
    /// Returns an error if the version string has an invalid format.
    pub fn parse(version_str: &str) -> Result<Self> {
        let parts: Vec<&str> = version_str.split('.').collect();

        if parts.is_empty() || parts.len() > 4 {
            return Err(malformed_error!("Invalid version format: {}", version_str));
        }

        let mut components = [0u16; 4];

        for (i, part) in parts.iter().enumerate() {
            components[i] = part
                .parse::<u16>()
                .map_err(|_| malformed_error!("Invalid version component: {}", part))?;
        }

        Ok(Self::new(
            components[0],
            components[1],
            components[2],
            components[3],
        ))
    }
}

impl ProcessorArchitecture {
    /// Parse processor architecture from string representation (case-insensitive).
    ///
    /// # Errors
    /// Returns an error if the architecture string is not recognized.
    pub fn parse(arch_str: &str) -> Result<Self> {
        match arch_str.trim().to_lowercase().as_str() {
            "msil" => Ok(Self::MSIL),
            "x86" => Ok(Self::X86),
            "ia64" => Ok(Self::IA64),
            "amd64" | "x64" => Ok(Self::AMD64),
            "arm" => Ok(Self::ARM),
            "arm64" => Ok(Self::ARM64),
            _ => Err(malformed_error!(
                "Unknown processor architecture: '{}'",
                arch_str.trim()
            )),
        }
    }
}

impl fmt::Display for AssemblyVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}.{}.{}.{}",
            self.major, self.minor, self.build, self.revision
        )
    }
}

impl fmt::Display for ProcessorArchitecture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let arch_str = match self {
            Self::MSIL => "MSIL",
            Self::X86 => "x86",
            Self::IA64 => "IA64",
            Self::AMD64 => "AMD64",
            Self::ARM => "ARM",
            Self::ARM64 => "ARM64",
        };
        write!(f, "{}", arch_str)
    }
}

impl fmt::Display for AssemblyIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for AssemblyVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl FromStr for AssemblyIdentity {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_assembly_version_parse_full() {
        let version = AssemblyVersion::parse("1.2.3.4").unwrap();
        assert_eq!(version, AssemblyVersion::new(1, 2, 3, 4));
    }

    #[test]
    fn test_assembly_version_parse_partial() {
        let version = AssemblyVersion::parse("2.0").unwrap();
        assert_eq!(version, AssemblyVersion::new(2, 0, 0, 0));
    }

    #[test]
    fn test_assembly_version_parse_invalid() {
        assert!(AssemblyVersion::parse("1.2.3.4.5").is_err());
        assert!(AssemblyVersion::parse("1.x").is_err());
        assert!(AssemblyVersion::parse("").is_err());
        assert!(AssemblyVersion::parse("70000").is_err());
    }

    #[test]
    fn test_assembly_version_ordering() {
        assert!(AssemblyVersion::new(4, 0, 0, 0) < AssemblyVersion::new(8, 0, 0, 0));
        assert!(AssemblyVersion::new(4, 0, 1, 0) > AssemblyVersion::new(4, 0, 0, 9));
    }

    #[test]
    fn test_assembly_identity_parse_simple_name() {
        let identity = AssemblyIdentity::parse("MyLibrary").unwrap();
        assert_eq!(identity.name, "MyLibrary");
        assert!(identity.version.is_unknown());
        assert!(identity.culture.is_none());
        assert!(!identity.is_strong_named());
    }

    #[test]
    fn test_assembly_identity_parse_full_mscorlib() {
        let identity = AssemblyIdentity::parse(
            "mscorlib, Version=4.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089",
        )
        .unwrap();

        assert_eq!(identity, AssemblyIdentity::mscorlib());
        assert_eq!(
            identity.strong_name.as_ref().map(Identity::token_hex),
            Some("b77a5c561934e089".to_string())
        );
    }

    #[test]
    fn test_assembly_identity_parse_errors() {
        assert!(AssemblyIdentity::parse("").is_err());
        assert!(AssemblyIdentity::parse("   ").is_err());
        assert!(AssemblyIdentity::parse("Lib, PublicKeyToken=zz").is_err());
        assert!(AssemblyIdentity::parse("Lib, PublicKeyToken=b77a5c56").is_err());
        assert!(AssemblyIdentity::parse("Lib, PublicKey=0x0024").is_err());
        assert!(AssemblyIdentity::parse("Lib, ProcessorArchitecture=Z80").is_err());
    }

    #[test]
    fn test_assembly_identity_parse_public_key() {
        let identity = AssemblyIdentity::parse(
            "Lib, Version=1.0.0.0, PublicKey=00000000000000000400000000000000",
        )
        .unwrap();

        assert!(matches!(identity.strong_name, Some(Identity::PubKey(ref key)) if key.len() == 16));
        assert!(identity.is_strong_named());
        assert_eq!(
            identity.display_name(),
            "Lib, Version=1.0.0.0, Culture=neutral, PublicKeyToken=b77a5c561934e089"
        );

        // The key wins over a token given alongside it
        let both = AssemblyIdentity::parse(
            "Lib, PublicKeyToken=0123456789abcdef, PublicKey=00000000000000000400000000000000",
        )
        .unwrap();
        assert!(matches!(both.strong_name, Some(Identity::PubKey(_))));
        assert!(both.display_name().ends_with("PublicKeyToken=b77a5c561934e089"));
    }

    #[test]
    fn test_assembly_identity_parse_unknown_fields_ignored() {
        let identity =
            AssemblyIdentity::parse("Lib, Version=1.0.0.0, Retargetable=Yes, Culture=en-US")
                .unwrap();
        assert_eq!(identity.culture.as_deref(), Some("en-US"));
    }

    #[test]
    fn test_assembly_identity_display_roundtrip() {
        let text = "System.Private.CoreLib, Version=8.0.0.0, Culture=neutral, PublicKeyToken=7cec85d7bea7798e";
        let identity = AssemblyIdentity::parse(text).unwrap();
        assert_eq!(identity.display_name(), text);
        assert_eq!(identity, AssemblyIdentity::private_corelib());
    }

    #[test]
    fn test_assembly_identity_display_with_architecture() {
        let identity = AssemblyIdentity::parse("Native, ProcessorArchitecture=x64").unwrap();
        assert_eq!(
            identity.display_name(),
            "Native, Version=0.0.0.0, Culture=neutral, PublicKeyToken=null, ProcessorArchitecture=AMD64"
        );
    }

    #[test]
    fn test_core_library_detection() {
        assert!(AssemblyIdentity::mscorlib().is_core_library());
        assert!(AssemblyIdentity::private_corelib().is_core_library());
        assert!(is_core_library_name("NETSTANDARD"));
        assert!(!is_core_library_name("System.Core"));
    }

    #[test]
    fn test_same_library() {
        let mscorlib = AssemblyIdentity::mscorlib();
        let corelib = AssemblyIdentity::private_corelib();
        let app = AssemblyIdentity::parse("App, Version=1.0.0.0").unwrap();
        let app_lower = AssemblyIdentity::parse("app").unwrap();

        assert!(mscorlib.same_library(&corelib));
        assert!(app.same_library(&app_lower));
        assert!(!app.same_library(&mscorlib));
    }

    #[test]
    fn test_equality_ignores_strong_name() {
        let with_token = AssemblyIdentity::parse("Lib, Version=1.0.0.0, PublicKeyToken=0123456789abcdef").unwrap();
        let without = AssemblyIdentity::parse("Lib, Version=1.0.0.0").unwrap();
        assert_eq!(with_token, without);
    }
}
