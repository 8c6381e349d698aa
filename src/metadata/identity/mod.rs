//! Assembly identity for assembly-qualified type names.
//!
//! # Module Structure
//!
//! - [`assembly`] - Assembly identity with name, version, culture, strong name, and the
//!   core library alias list
//! - [`cryptographic`] - Strong-name identity (public keys and tokens)
//!
//! # Usage Examples
//!
//! ```rust
//! use dotwire::metadata::identity::AssemblyIdentity;
//!
//! let identity = AssemblyIdentity::parse("System.Runtime, Version=8.0.0.0")?;
//! assert!(identity.is_core_library());
//! assert!(identity.same_library(&AssemblyIdentity::mscorlib()));
//! # Ok::<(), dotwire::Error>(())
//! ```

pub mod assembly;
pub mod cryptographic;

pub use assembly::{
    is_core_library_name, AssemblyIdentity, AssemblyVersion, ProcessorArchitecture,
    CORE_LIBRARY_NAMES,
};
pub use cryptographic::Identity;
