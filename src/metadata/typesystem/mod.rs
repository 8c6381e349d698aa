//! Runtime type descriptors and the name-resolution oracle.
//!
//! This module models the types a serialization stream can mention: definitions (classes,
//! value types, interfaces, enums), single- and multi-dimensional arrays, and closed generic
//! instances. It also provides the oracle that turns an assembly-qualified name back into a
//! stable descriptor.
//!
//! # Key Components
//!
//! - [`RuntimeType`]: Immutable type descriptor, shared as [`TypeRc`]
//! - [`TypeName`]: Parser and formatter for .NET assembly-qualified type names
//! - [`TypeCatalog`]: Process-level set of known types, implementing [`TypeResolver`]
//! - [`TypeBuilder`]: Fluent API for defining application types in a catalog
//! - [`WellKnownType`]: Built-in types every catalog carries
//!
//! # Examples
//!
//! ```rust
//! use dotwire::metadata::typesystem::{TypeCatalog, TypeResolver};
//!
//! let catalog = TypeCatalog::default();
//! let list = catalog.resolve("System.Collections.Generic.List`1[[System.Int32, mscorlib]]")?;
//! assert_eq!(list.name, "List`1");
//! assert_eq!(list.generic_args[0].full_name(), "System.Int32");
//! # Ok::<(), dotwire::Error>(())
//! ```

mod builder;
mod catalog;
mod primitives;
mod resolver;
mod typename;

use std::{
    fmt,
    hash::{Hash, Hasher},
    sync::Arc,
};

use bitflags::bitflags;

pub use builder::TypeBuilder;
pub use catalog::TypeCatalog;
pub use primitives::{WellKnownType, FRAMEWORK_ASSEMBLY_NAME};
pub use resolver::TypeResolver;
pub use typename::TypeName;

use crate::metadata::{
    identity::{AssemblyIdentity, CORE_LIBRARY_NAMES},
    token::Token,
};

/// Reference to a `RuntimeType`
pub type TypeRc = Arc<RuntimeType>;

bitflags! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    /// Attributes of a type definition relevant to serialization
    pub struct TypeFlags : u32 {
        /// The type is visible outside its assembly
        const PUBLIC = 0x0001;
        /// The type cannot be derived from
        const SEALED = 0x0002;
        /// The type cannot be instantiated
        const ABSTRACT = 0x0004;
        /// The type opted into serialization
        const SERIALIZABLE = 0x0008;
        /// The type is a runtime primitive
        const PRIMITIVE = 0x0010;
    }
}

/// The structural category of a [`RuntimeType`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TypeFlavor {
    /// Reference type definition
    Class,
    /// Value type definition
    ValueType,
    /// Interface definition
    Interface,
    /// Enumeration definition
    Enum,
    /// Array of `element_type` with the given rank (1 for `[]`, 2 for `[,]`, ...)
    Array {
        /// Number of dimensions
        rank: u32,
    },
    /// Closed instantiation of a generic definition
    GenericInstance,
    /// Pseudo-type that only reserves a handle slot
    Placeholder,
}

/// An immutable runtime type descriptor.
///
/// Descriptors are created by a [`TypeCatalog`] and shared as [`TypeRc`]. Two descriptors are
/// equal when they have the same full name and come from the same library, and so do their
/// generic arguments at every depth. Core library aliases (`mscorlib`,
/// `System.Private.CoreLib`, ...) count as the same library, and versions are ignored.
pub struct RuntimeType {
    /// Catalog-local token
    pub token: Token,
    /// Namespace; empty for nested types and the global namespace
    pub namespace: String,
    /// Simple name, including the generic arity marker (`List`1`) and array suffix (`Byte[]`)
    pub name: String,
    /// Structural category
    pub flavor: TypeFlavor,
    /// Definition attributes
    pub flags: TypeFlags,
    /// Defining assembly; for arrays and generic instances the assembly of the element or definition
    pub assembly: Arc<AssemblyIdentity>,
    /// Enclosing type of a nested type
    pub declaring_type: Option<TypeRc>,
    /// Element type of an array
    pub element_type: Option<TypeRc>,
    /// Open definition of a generic instance
    pub generic_definition: Option<TypeRc>,
    /// Type arguments of a generic instance
    pub generic_args: Vec<TypeRc>,
    /// Number of generic parameters of a definition (0 for instances and non-generic types)
    pub generic_arity: u32,
    full_name: String,
    /// Full name with every assembly reduced to its library key; drives `Eq` and `Hash`
    library_name: String,
}

impl RuntimeType {
    /// Create a type definition descriptor.
    pub(crate) fn definition(
        token: Token,
        namespace: String,
        name: String,
        flavor: TypeFlavor,
        flags: TypeFlags,
        assembly: Arc<AssemblyIdentity>,
        declaring_type: Option<TypeRc>,
        generic_arity: u32,
    ) -> Self {
        let mut new_type = RuntimeType {
            token,
            namespace,
            name,
            flavor,
            flags,
            assembly,
            declaring_type,
            element_type: None,
            generic_definition: None,
            generic_args: Vec::new(),
            generic_arity,
            full_name: String::new(),
            library_name: String::new(),
        };
        new_type.compute_names();
        new_type
    }

    /// Create an array descriptor over `element`.
    pub(crate) fn array(token: Token, element: &TypeRc, rank: u32) -> Self {
        let mut name = element.name.clone();
        name.push('[');
        for _ in 1..rank {
            name.push(',');
        }
        name.push(']');

        let mut new_type = RuntimeType {
            token,
            namespace: element.namespace.clone(),
            name,
            flavor: TypeFlavor::Array { rank },
            flags: TypeFlags::PUBLIC | TypeFlags::SEALED | TypeFlags::SERIALIZABLE,
            assembly: element.assembly.clone(),
            declaring_type: None,
            element_type: Some(element.clone()),
            generic_definition: None,
            generic_args: Vec::new(),
            generic_arity: 0,
            full_name: String::new(),
            library_name: String::new(),
        };
        new_type.compute_names();
        new_type
    }

    /// Create a closed generic instance of `definition` over `args`.
    pub(crate) fn generic_instance(token: Token, definition: &TypeRc, args: Vec<TypeRc>) -> Self {
        let mut new_type = RuntimeType {
            token,
            namespace: definition.namespace.clone(),
            name: definition.name.clone(),
            flavor: TypeFlavor::GenericInstance,
            flags: definition.flags,
            assembly: definition.assembly.clone(),
            declaring_type: definition.declaring_type.clone(),
            element_type: None,
            generic_definition: Some(definition.clone()),
            generic_args: args,
            generic_arity: 0,
            full_name: String::new(),
            library_name: String::new(),
        };
        new_type.compute_names();
        new_type
    }

    fn compute_names(&mut self) {
        self.full_name = self.type_name().full_name();
        self.library_name = self.build_type_name(&library_key).to_string();
    }

    /// Returns the full name, e.g. `System.Collections.Generic.List`1[[System.Int32, ...]]`
    #[must_use]
    pub fn full_name(&self) -> &str {
        &self.full_name
    }

    /// Returns the full name followed by the display name of the defining assembly
    #[must_use]
    pub fn assembly_qualified_name(&self) -> String {
        self.type_name().to_string()
    }

    /// Returns the `Ns.Outer+Inner` path of this type's definition, without generic
    /// arguments or array ranks. Used as the catalog lookup key.
    #[must_use]
    pub fn definition_name(&self) -> String {
        match (&self.element_type, &self.generic_definition, &self.declaring_type) {
            (Some(element), _, _) => element.definition_name(),
            (None, Some(definition), _) => definition.definition_name(),
            (None, None, Some(declaring)) => format!("{}+{}", declaring.definition_name(), self.name),
            (None, None, None) if self.namespace.is_empty() => self.name.clone(),
            (None, None, None) => format!("{}.{}", self.namespace, self.name),
        }
    }

    /// Build the structured, assembly-qualified [`TypeName`] of this type
    #[must_use]
    pub fn type_name(&self) -> TypeName {
        self.build_type_name(&AssemblyIdentity::display_name)
    }

    /// Build the [`TypeName`] with each assembly rendered by `assembly_name`
    fn build_type_name(&self, assembly_name: &dyn Fn(&AssemblyIdentity) -> String) -> TypeName {
        if let Some(element) = &self.element_type {
            let mut type_name = element.build_type_name(assembly_name);
            if let TypeFlavor::Array { rank } = self.flavor {
                type_name.array_ranks.push(rank);
            }
            return type_name;
        }

        if let Some(definition) = &self.generic_definition {
            let mut type_name = definition.build_type_name(assembly_name);
            type_name.generic_args = self
                .generic_args
                .iter()
                .map(|arg| arg.build_type_name(assembly_name))
                .collect();
            return type_name;
        }

        match &self.declaring_type {
            Some(declaring) => {
                let mut type_name = declaring.build_type_name(assembly_name);
                type_name.nested.push(self.name.clone());
                type_name
            }
            None => TypeName {
                namespace: self.namespace.clone(),
                nested: vec![self.name.clone()],
                generic_args: Vec::new(),
                array_ranks: Vec::new(),
                assembly: Some(assembly_name(&self.assembly)),
            },
        }
    }

    /// Returns `true` for value types, including enums and generic instances of value types
    #[must_use]
    pub fn is_value_type(&self) -> bool {
        match self.flavor {
            TypeFlavor::ValueType | TypeFlavor::Enum => true,
            TypeFlavor::GenericInstance => self
                .generic_definition
                .as_ref()
                .is_some_and(|definition| definition.is_value_type()),
            _ => false,
        }
    }

    /// Returns `true` for arrays of any rank
    #[must_use]
    pub fn is_array(&self) -> bool {
        matches!(self.flavor, TypeFlavor::Array { .. })
    }

    /// Returns `true` for open generic definitions
    #[must_use]
    pub fn is_generic_definition(&self) -> bool {
        self.generic_arity > 0
    }
}

/// Name under which [`AssemblyIdentity::same_library`] groups an assembly
fn library_key(assembly: &AssemblyIdentity) -> String {
    if assembly.is_core_library() {
        CORE_LIBRARY_NAMES[0].to_string()
    } else {
        assembly.name.to_ascii_lowercase()
    }
}

impl PartialEq for RuntimeType {
    fn eq(&self, other: &Self) -> bool {
        self.library_name == other.library_name
    }
}

impl Eq for RuntimeType {}

impl Hash for RuntimeType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.library_name.hash(state);
    }
}

impl fmt::Debug for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuntimeType")
            .field("token", &self.token)
            .field("full_name", &self.full_name)
            .field("flavor", &self.flavor)
            .field("assembly", &self.assembly.name)
            .finish()
    }
}

impl fmt::Display for RuntimeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.full_name)
    }
}
