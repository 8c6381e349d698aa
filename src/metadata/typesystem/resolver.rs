//! The name-resolution seam between the handle table and the runtime's type system.

use crate::{
    metadata::typesystem::{TypeRc, WellKnownType},
    Result,
};

/// Maps canonical type names to stable runtime type descriptors.
///
/// The handle table treats implementations as an opaque oracle: resolution may be slow,
/// but it must be a pure function of the name, so that a result computed by one thread can
/// be cached and handed to every other thread. [`TypeCatalog`](super::TypeCatalog) is the
/// implementation shipped with this crate.
pub trait TypeResolver: Send + Sync {
    /// Resolve an (optionally assembly-qualified) type name.
    ///
    /// # Errors
    /// Returns an error if the name is malformed or names a type unknown to this process.
    fn resolve(&self, name: &str) -> Result<TypeRc>;

    /// Return the descriptor of a built-in type.
    ///
    /// # Errors
    /// Returns an error if the resolver does not provide the requested type.
    fn well_known(&self, kind: WellKnownType) -> Result<TypeRc>;
}
