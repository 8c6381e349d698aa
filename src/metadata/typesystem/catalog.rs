//! Process-level catalog of known runtime types.
//!
//! This module provides the [`TypeCatalog`], a thread-safe registry of every type this
//! process can name on the wire. It is the name-resolution oracle behind the handle table:
//! given an assembly-qualified name it returns a stable [`TypeRc`], constructing array and
//! generic instance descriptors on demand and interning them so that repeated resolution of
//! the same name yields the identical `Arc`.
//!
//! # Catalog Architecture
//!
//! - **Token-based storage**: every descriptor is stored in a `SkipMap` keyed by its token
//! - **Name index**: definitions indexed by their `Ns.Outer+Inner` path (`DashMap`)
//! - **Constructed types**: arrays and generic instances interned by their structure (`DashMap`)
//! - **Registration order**: definitions in the order they were added (`boxcar::Vec`)
//!
//! # Library Unification
//!
//! Lookups filter definitions by the simple name of the requested assembly only; versions
//! are ignored, and every core library alias (`mscorlib`, `System.Private.CoreLib`,
//! `netstandard`, `System.Runtime`) selects the catalog's core library. A stream written by
//! a .NET Framework peer therefore resolves against a modern runtime's types and vice versa.
//!
//! # Examples
//!
//! ```rust
//! use dotwire::metadata::typesystem::{TypeCatalog, TypeResolver, WellKnownType};
//!
//! let catalog = TypeCatalog::default();
//! let bytes = catalog.well_known(WellKnownType::ByteArray)?;
//!
//! // Any core library alias finds the same interned descriptor
//! let legacy = catalog.resolve("System.Byte[], mscorlib, Version=4.0.0.0")?;
//! assert!(std::sync::Arc::ptr_eq(&bytes, &legacy));
//! # Ok::<(), dotwire::Error>(())
//! ```

use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicU32, Ordering},
        Arc,
    },
};

use crossbeam_skiplist::SkipMap;
use dashmap::{mapref::entry::Entry, DashMap};
use log::debug;
use strum::IntoEnumIterator;

use crate::{
    metadata::{
        identity::{AssemblyIdentity, AssemblyVersion},
        token::Token,
        typesystem::{
            RuntimeType, TypeName, TypeRc, TypeResolver, WellKnownType, FRAMEWORK_ASSEMBLY_NAME,
        },
    },
    Error::{self, GenericArity, TypeNotFound},
    Result,
};

/// Structural identity of a constructed type, used for interning
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum ConstructedKey {
    Array(Token, u32),
    Generic(Token, Vec<Token>),
}

/// Thread-safe catalog of the runtime types known to this process.
///
/// A catalog is created for one core library identity, seeded with every
/// [`WellKnownType`], and extended with application types through
/// [`TypeBuilder`](super::TypeBuilder). Types are never removed.
///
/// # Thread Safety
///
/// All operations take `&self` and may be called concurrently. Interning of constructed
/// types is atomic per key, so two threads constructing `List<int>` at the same time
/// receive the same descriptor.
pub struct TypeCatalog {
    /// Primary type storage indexed by token
    types: SkipMap<Token, TypeRc>,
    /// Definitions indexed by their `Ns.Outer+Inner` path
    definitions: DashMap<String, Vec<Token>>,
    /// Interned arrays and generic instances
    constructed: DashMap<ConstructedKey, TypeRc>,
    /// Built-in types
    well_known: HashMap<WellKnownType, TypeRc>,
    /// Definitions in registration order
    registration_order: boxcar::Vec<TypeRc>,
    /// Next row for `TYPE_DEF` tokens
    next_definition: AtomicU32,
    /// Next row for `TYPE_SPEC` tokens
    next_constructed: AtomicU32,
    /// Identity of the runtime's standard library
    core_library: Arc<AssemblyIdentity>,
    /// Identity of the assembly defining the wire framework's pseudo-types
    framework_assembly: Arc<AssemblyIdentity>,
}

impl TypeCatalog {
    /// Create a catalog whose standard library types live in `core_library`.
    ///
    /// All [`WellKnownType`]s are registered before the catalog is returned.
    #[must_use]
    pub fn new(core_library: AssemblyIdentity) -> Self {
        let mut catalog = TypeCatalog {
            types: SkipMap::new(),
            definitions: DashMap::new(),
            constructed: DashMap::new(),
            well_known: HashMap::new(),
            registration_order: boxcar::Vec::new(),
            next_definition: AtomicU32::new(1),
            next_constructed: AtomicU32::new(1),
            core_library: Arc::new(core_library),
            framework_assembly: Arc::new(AssemblyIdentity::new(
                FRAMEWORK_ASSEMBLY_NAME,
                AssemblyVersion::new(1, 0, 0, 0),
                None,
                None,
                None,
            )),
        };
        catalog.initialize_well_known();
        catalog
    }

    fn initialize_well_known(&mut self) {
        let mut well_known = HashMap::new();

        // Definitions first, so the array element types exist
        for (row, kind) in (1u32..).zip(WellKnownType::iter()) {
            if kind.element().is_some() {
                continue;
            }

            let assembly = if kind.is_framework_type() {
                self.framework_assembly.clone()
            } else {
                self.core_library.clone()
            };

            let new_type = Arc::new(RuntimeType::definition(
                Token::from_parts(Token::WELL_KNOWN, row),
                kind.namespace().to_string(),
                kind.name().to_string(),
                kind.flavor(),
                kind.flags(),
                assembly,
                None,
                kind.generic_arity(),
            ));
            self.register_definition(&new_type);
            well_known.insert(kind, new_type);
        }

        for kind in WellKnownType::iter() {
            if let Some(element) = kind
                .element()
                .and_then(|element| well_known.get(&element).cloned())
            {
                // Fresh counters cannot be exhausted here
                if let Ok(array) = self.make_array(&element, 1) {
                    well_known.insert(kind, array);
                }
            }
        }

        self.well_known = well_known;
    }

    /// Add a definition to all the lookup tables
    fn register_definition(&self, new_type: &TypeRc) {
        self.types.insert(new_type.token, new_type.clone());
        self.definitions
            .entry(new_type.definition_name())
            .or_default()
            .push(new_type.token);
        self.registration_order.push(new_type.clone());
    }

    /// Identity of the runtime's standard library
    #[must_use]
    pub fn core_library(&self) -> &Arc<AssemblyIdentity> {
        &self.core_library
    }

    /// Identity of the assembly that defines the wire framework's pseudo-types
    #[must_use]
    pub fn framework_assembly(&self) -> &Arc<AssemblyIdentity> {
        &self.framework_assembly
    }

    /// Allocate the next token for a new definition
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] once every row of the `TYPE_DEF` table is taken.
    pub(crate) fn next_definition_token(&self) -> Result<Token> {
        allocate_row(&self.next_definition, Token::TYPE_DEF)
    }

    fn next_constructed_token(&self) -> Result<Token> {
        allocate_row(&self.next_constructed, Token::TYPE_SPEC)
    }

    /// Register a new definition.
    ///
    /// The same-library check and the registration happen under the name index entry, so
    /// of several threads defining one name in one library exactly one succeeds.
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if the token is already taken, or if a type with the
    /// same full name already exists in the same library.
    pub(crate) fn insert_definition(&self, new_type: RuntimeType) -> Result<TypeRc> {
        if self.types.contains_key(&new_type.token) {
            return Err(Error::TypeError(format!(
                "Token {} is already assigned to {}",
                new_type.token,
                self.get(&new_type.token)
                    .map(|existing| existing.full_name().to_string())
                    .unwrap_or_default()
            )));
        }

        let definition_name = new_type.definition_name();
        let mut tokens = self.definitions.entry(definition_name.clone()).or_default();
        if tokens
            .iter()
            .filter_map(|token| self.get(token))
            .any(|existing| existing.assembly.same_library(&new_type.assembly))
        {
            return Err(Error::TypeError(format!(
                "Type {} is already defined in {}",
                definition_name, new_type.assembly.name
            )));
        }

        let new_type = Arc::new(new_type);
        self.types.insert(new_type.token, new_type.clone());
        tokens.push(new_type.token);
        drop(tokens);
        self.registration_order.push(new_type.clone());
        debug!(
            "defined {} ({}) in {}",
            new_type.full_name(),
            new_type.token,
            new_type.assembly.name
        );
        Ok(new_type)
    }

    /// Look up a type by its catalog token
    #[must_use]
    pub fn get(&self, token: &Token) -> Option<TypeRc> {
        self.types.get(token).map(|entry| entry.value().clone())
    }

    /// Number of types in the catalog, including interned constructed types
    #[must_use]
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Returns `true` if the catalog holds no types (never the case after construction)
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Iterate over all definitions in registration order
    pub fn definitions(&self) -> impl Iterator<Item = &TypeRc> {
        self.registration_order.iter().map(|(_, type_rc)| type_rc)
    }

    /// Look up a definition by its `Ns.Outer+Inner` path.
    ///
    /// With an `assembly`, only definitions from the same library qualify. Without one, a
    /// core library definition is preferred over other candidates, and otherwise the first
    /// registered candidate wins.
    #[must_use]
    pub fn lookup_definition(
        &self,
        definition_name: &str,
        assembly: Option<&AssemblyIdentity>,
    ) -> Option<TypeRc> {
        let tokens = self.definitions.get(definition_name)?;
        let mut candidates = tokens.iter().filter_map(|token| self.get(token));

        match assembly {
            Some(assembly) => candidates.find(|candidate| candidate.assembly.same_library(assembly)),
            None => {
                let all: Vec<TypeRc> = candidates.collect();
                all.iter()
                    .find(|candidate| candidate.assembly.is_core_library())
                    .or_else(|| all.first())
                    .cloned()
            }
        }
    }

    /// Get (or construct) the array type of `element` with the given rank.
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if the array is new and no constructed type token is left.
    pub fn make_array(&self, element: &TypeRc, rank: u32) -> Result<TypeRc> {
        let rank = rank.max(1);
        match self.constructed.entry(ConstructedKey::Array(element.token, rank)) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let array = Arc::new(RuntimeType::array(
                    self.next_constructed_token()?,
                    element,
                    rank,
                ));
                self.types.insert(array.token, array.clone());
                entry.insert(array.clone());
                Ok(array)
            }
        }
    }

    /// Get (or construct) the closed generic instance of `definition` over `args`.
    ///
    /// # Errors
    /// Returns [`Error::TypeError`] if `definition` is not a generic definition or no
    /// constructed type token is left, and [`Error::GenericArity`] if the number of
    /// arguments does not match its arity.
    pub fn make_generic(&self, definition: &TypeRc, args: &[TypeRc]) -> Result<TypeRc> {
        if !definition.is_generic_definition() {
            return Err(Error::TypeError(format!(
                "{} is not a generic type definition",
                definition.full_name()
            )));
        }
        if args.len() != definition.generic_arity as usize {
            return Err(GenericArity {
                name: definition.full_name().to_string(),
                expected: definition.generic_arity,
                actual: args.len(),
            });
        }

        let key = ConstructedKey::Generic(
            definition.token,
            args.iter().map(|arg| arg.token).collect(),
        );
        match self.constructed.entry(key) {
            Entry::Occupied(entry) => Ok(entry.get().clone()),
            Entry::Vacant(entry) => {
                let instance = Arc::new(RuntimeType::generic_instance(
                    self.next_constructed_token()?,
                    definition,
                    args.to_vec(),
                ));
                self.types.insert(instance.token, instance.clone());
                entry.insert(instance.clone());
                Ok(instance)
            }
        }
    }

    /// Resolve a parsed [`TypeName`] to a descriptor.
    ///
    /// # Errors
    /// Returns [`Error::TypeNotFound`] if the definition or any generic argument is unknown,
    /// [`Error::Malformed`] if an assembly display name cannot be parsed, and
    /// [`Error::GenericArity`] on an argument count mismatch.
    pub fn resolve_type_name(&self, type_name: &TypeName) -> Result<TypeRc> {
        let assembly = type_name
            .assembly
            .as_deref()
            .map(AssemblyIdentity::parse)
            .transpose()?;

        let definition_name = type_name.definition_name();
        let mut resolved = self
            .lookup_definition(&definition_name, assembly.as_ref())
            .ok_or_else(|| match &assembly {
                Some(assembly) => TypeNotFound(format!("{}, {}", definition_name, assembly.name)),
                None => TypeNotFound(definition_name.clone()),
            })?;

        if !type_name.generic_args.is_empty() {
            let args = type_name
                .generic_args
                .iter()
                .map(|arg| self.resolve_type_name(arg))
                .collect::<Result<Vec<_>>>()?;
            resolved = self.make_generic(&resolved, &args)?;
        }

        for rank in &type_name.array_ranks {
            resolved = self.make_array(&resolved, *rank)?;
        }

        Ok(resolved)
    }
}

/// Take the next row from `counter`, refusing rows a token cannot carry
fn allocate_row(counter: &AtomicU32, table: u8) -> Result<Token> {
    counter
        .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |row| {
            (row <= Token::MAX_ROW).then_some(row + 1)
        })
        .map(|row| Token::from_parts(table, row))
        .map_err(|_| Error::TypeError(format!("Token rows of table 0x{:02x} are exhausted", table)))
}

impl Default for TypeCatalog {
    /// A catalog for the modern runtime, with `System.Private.CoreLib` as core library
    fn default() -> Self {
        Self::new(AssemblyIdentity::private_corelib())
    }
}

impl TypeResolver for TypeCatalog {
    fn resolve(&self, name: &str) -> Result<TypeRc> {
        let type_name = TypeName::parse(name)?;
        self.resolve_type_name(&type_name)
    }

    fn well_known(&self, kind: WellKnownType) -> Result<TypeRc> {
        self.well_known
            .get(&kind)
            .cloned()
            .ok_or_else(|| TypeNotFound(format!("{}.{}", kind.namespace(), kind.name())))
    }
}

impl std::fmt::Debug for TypeCatalog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeCatalog")
            .field("core_library", &self.core_library.name)
            .field("types", &self.types.len())
            .finish_non_exhaustive()
    }
}
