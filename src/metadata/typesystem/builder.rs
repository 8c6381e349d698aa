//! Builder for application type definitions.
//!
//! This module provides the [`TypeBuilder`] struct, which offers a fluent API for defining
//! classes, value types, interfaces, enums and generic definitions in a [`TypeCatalog`].
//! Types registered this way become resolvable by name, and therefore usable in name
//! handles, exactly like the built-in types.
//!
//! # Example
//!
//! ```rust
//! use dotwire::metadata::identity::{AssemblyIdentity, AssemblyVersion};
//! use dotwire::metadata::typesystem::{TypeBuilder, TypeCatalog, TypeResolver};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::default());
//! let app = AssemblyIdentity::new("App", AssemblyVersion::new(1, 0, 0, 0), None, None, None);
//!
//! let order = TypeBuilder::new(catalog.clone())
//!     .name("App.Model", "Order")
//!     .assembly(app)
//!     .build()?;
//!
//! let resolved = catalog.resolve("App.Model.Order, App")?;
//! assert!(Arc::ptr_eq(&order, &resolved));
//! # Ok::<(), dotwire::Error>(())
//! ```

use std::sync::Arc;

use crate::{
    metadata::{
        identity::AssemblyIdentity,
        typesystem::{RuntimeType, TypeCatalog, TypeFlags, TypeFlavor, TypeRc},
    },
    Error::{GenericArity, TypeError},
    Result,
};

/// Provides a fluent API for defining types
pub struct TypeBuilder {
    /// Catalog receiving the type
    catalog: Arc<TypeCatalog>,
    /// Namespace of the new type
    namespace: String,
    /// Simple name of the new type
    name: String,
    /// Structural category
    flavor: TypeFlavor,
    /// Definition attributes
    flags: TypeFlags,
    /// Defining assembly
    assembly: Option<Arc<AssemblyIdentity>>,
    /// Enclosing type, for nested types
    declaring_type: Option<TypeRc>,
    /// Requested number of generic parameters
    generic_arity: Option<u32>,
}

impl TypeBuilder {
    /// Create a new builder with the given catalog
    ///
    /// ## Arguments
    /// * 'catalog' - The type catalog to register the type in
    pub fn new(catalog: Arc<TypeCatalog>) -> Self {
        TypeBuilder {
            catalog,
            namespace: String::new(),
            name: String::new(),
            flavor: TypeFlavor::Class,
            flags: TypeFlags::PUBLIC | TypeFlags::SERIALIZABLE,
            assembly: None,
            declaring_type: None,
            generic_arity: None,
        }
    }

    /// Set the namespace and simple name
    ///
    /// ## Arguments
    /// * 'namespace' - The namespace, may be empty
    /// * 'name'      - The simple name, optionally carrying a generic arity marker (`Cache`2`)
    #[must_use]
    pub fn name(mut self, namespace: &str, name: &str) -> Self {
        self.namespace = namespace.to_string();
        self.name = name.to_string();
        self
    }

    /// Set the defining assembly
    ///
    /// ## Arguments
    /// * 'assembly' - Identity of the assembly the type lives in
    #[must_use]
    pub fn assembly(mut self, assembly: AssemblyIdentity) -> Self {
        self.assembly = Some(Arc::new(assembly));
        self
    }

    /// Define a value type
    #[must_use]
    pub fn value_type(mut self) -> Self {
        self.flavor = TypeFlavor::ValueType;
        self.flags |= TypeFlags::SEALED;
        self
    }

    /// Define an interface
    #[must_use]
    pub fn interface(mut self) -> Self {
        self.flavor = TypeFlavor::Interface;
        self.flags |= TypeFlags::ABSTRACT;
        self
    }

    /// Define an enumeration
    #[must_use]
    pub fn enum_type(mut self) -> Self {
        self.flavor = TypeFlavor::Enum;
        self.flags |= TypeFlags::SEALED;
        self
    }

    /// Make the type a generic definition
    ///
    /// The arity marker is appended to the name on [`build`](Self::build) if missing.
    ///
    /// ## Arguments
    /// * 'arity' - Number of generic parameters
    #[must_use]
    pub fn generic_arity(mut self, arity: u32) -> Self {
        self.generic_arity = Some(arity);
        self
    }

    /// Nest the type inside `declaring_type`
    ///
    /// A nested type has no namespace of its own and defaults to the assembly of its
    /// enclosing type.
    ///
    /// ## Arguments
    /// * 'declaring_type' - The enclosing type
    #[must_use]
    pub fn nested_in(mut self, declaring_type: &TypeRc) -> Self {
        self.declaring_type = Some(declaring_type.clone());
        self
    }

    /// Replace the definition attributes
    ///
    /// ## Arguments
    /// * 'flags' - The attributes to use
    #[must_use]
    pub fn flags(mut self, flags: TypeFlags) -> Self {
        self.flags = flags;
        self
    }

    /// Register the type in the catalog and return it
    ///
    /// # Errors
    /// Returns [`crate::Error::TypeError`] if the name is missing, no assembly can be determined,
    /// the type already exists in its library, or the catalog ran out of definition tokens, and [`crate::Error::GenericArity`] if the
    /// name's arity marker contradicts [`generic_arity`](Self::generic_arity).
    pub fn build(self) -> Result<TypeRc> {
        if self.name.is_empty() {
            return Err(TypeError("Type name must not be empty".to_string()));
        }

        let assembly = match (&self.assembly, &self.declaring_type) {
            (Some(assembly), _) => assembly.clone(),
            (None, Some(declaring)) => declaring.assembly.clone(),
            (None, None) => {
                return Err(TypeError(format!(
                    "Type {} requires a defining assembly",
                    self.name
                )))
            }
        };

        let namespace = if self.declaring_type.is_some() {
            String::new()
        } else {
            self.namespace
        };

        let marker = arity_marker(&self.name);
        let (name, generic_arity) = match (marker, self.generic_arity) {
            (Some(marker), Some(requested)) if marker != requested => {
                return Err(GenericArity {
                    name: self.name,
                    expected: marker,
                    actual: requested as usize,
                })
            }
            (Some(marker), _) => (self.name, marker),
            (None, Some(requested)) if requested > 0 => {
                (format!("{}`{}", self.name, requested), requested)
            }
            (None, _) => (self.name, 0),
        };

        self.catalog.insert_definition(RuntimeType::definition(
            self.catalog.next_definition_token()?,
            namespace,
            name,
            self.flavor,
            self.flags,
            assembly,
            self.declaring_type,
            generic_arity,
        ))
    }
}

/// Parse the `` `N `` suffix of a generic definition name
fn arity_marker(name: &str) -> Option<u32> {
    let (_, arity) = name.rsplit_once('`')?;
    arity.parse().ok()
}
