//! Runtime type metadata for the wire format.
//!
//! This module holds everything the handle table needs to know about types: the
//! descriptors themselves, how they are named, and which assembly defines them.
//!
//! # Key Components
//!
//! - [`token`] - Catalog-local identity of every type descriptor
//! - [`identity`] - Assembly display names, versions and public key tokens
//! - [`typesystem`] - Type descriptors, type name grammar and the name-resolution oracle
//!
//! # Examples
//!
//! ```rust
//! use dotwire::metadata::typesystem::{TypeCatalog, TypeResolver, WellKnownType};
//!
//! let catalog = TypeCatalog::default();
//! let guid = catalog.well_known(WellKnownType::Guid)?;
//! assert_eq!(guid.full_name(), "System.Guid");
//! assert!(guid.assembly.is_core_library());
//! # Ok::<(), dotwire::Error>(())
//! ```

/// Assembly identities and core library detection
pub mod identity;
/// Commonly used metadata token type
pub mod token;
/// Implementation of the runtime type system
pub mod typesystem;
