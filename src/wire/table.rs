//! The per-session type handle table.
//!
//! A [`TypeTable`] maps type descriptors to compact [`TypeHandle`]s and back. Writer and reader
//! each own one table per session; because both register types in the order they appear in
//! the stream, the two tables converge on identical contents without ever exchanging them.
//!
//! # Reserved Slots
//!
//! Every table registers four types at construction, in this exact order, before it is
//! exposed to any caller:
//!
//! | Index | Type |
//! |-------|------|
//! | 0 | `Dotwire.Null`, the null placeholder |
//! | 1 | `System.Object` |
//! | 2 | `System.Object[]` |
//! | 3 | `System.Byte[]` |
//!
//! Handles 0 through 3 therefore mean the same thing in every table of every process, and no
//! name for these types ever crosses the wire.
//!
//! # Handle Lifecycle
//!
//! - The first [`issue_handle`](TypeTable::issue_handle) for a type registers it and returns a
//!   name handle, so the first occurrence in the stream is self-describing.
//! - Every later `issue_handle` for the same type returns its index.
//! - [`resolve_handle`](TypeTable::resolve_handle) on the reading side registers the type of
//!   every name handle it sees, so later index handles from the writer resolve.
//!
//! # Thread Safety
//!
//! A table belongs to one session and is mutated through `&mut self`. Name resolution goes
//! through a [`NameCache`] which is safe to share between tables on different threads.
//!
//! # Example
//!
//! ```rust
//! use dotwire::metadata::typesystem::{TypeCatalog, TypeResolver, WellKnownType};
//! use dotwire::wire::{TypeHandle, TypeTable};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::default());
//! let mut writer = TypeTable::new(catalog.clone())?;
//! let mut reader = TypeTable::new(catalog.clone())?;
//!
//! let guid = catalog.well_known(WellKnownType::Guid)?;
//! let first = writer.issue_handle(&guid, true)?;
//! let second = writer.issue_handle(&guid, true)?;
//! assert!(matches!(first, TypeHandle::Name(_)));
//! assert_eq!(second, TypeHandle::Index(4));
//!
//! assert_eq!(*reader.resolve_handle(&first)?, *guid);
//! assert_eq!(*reader.resolve_handle(&second)?, *guid);
//! assert_eq!(reader.checksum(), writer.checksum());
//! # Ok::<(), dotwire::Error>(())
//! ```

use std::{collections::HashMap, sync::Arc};

use log::{debug, trace};
use strum::{EnumCount, EnumIter, IntoEnumIterator};

use crate::{
    metadata::typesystem::{TypeRc, TypeResolver, WellKnownType},
    wire::{
        CoreLibraryNormalizer, HandleError, NameCache, TableSummary, TypeChecksum, TypeHandle,
        WireConfig,
    },
    Error, Result,
};

/// Handle indices fixed by the wire protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, EnumCount)]
#[repr(u32)]
pub enum ReservedSlot {
    /// Index 0, "no object"
    NullPlaceholder = 0,
    /// Index 1, any object whose declared type is unknown
    Object = 1,
    /// Index 2, `System.Object[]`
    ObjectArray = 2,
    /// Index 3, `System.Byte[]`
    ByteArray = 3,
}

/// Number of reserved slots at the start of every table
pub const RESERVED_SLOTS: usize = ReservedSlot::COUNT;

impl ReservedSlot {
    /// The handle index of this slot
    #[must_use]
    pub fn index(self) -> u32 {
        self as u32
    }

    /// The built-in type occupying this slot
    #[must_use]
    pub fn well_known(self) -> WellKnownType {
        match self {
            ReservedSlot::NullPlaceholder => WellKnownType::NullPlaceholder,
            ReservedSlot::Object => WellKnownType::Object,
            ReservedSlot::ObjectArray => WellKnownType::ObjectArray,
            ReservedSlot::ByteArray => WellKnownType::ByteArray,
        }
    }
}

/// Per-session mapping between type descriptors and handles
pub struct TypeTable {
    /// Registered types; the position is the handle index
    entries: Vec<TypeRc>,
    /// Inverse of `entries`
    index: HashMap<TypeRc, u32>,
    /// Sum of the fingerprints of all entries
    checksum: TypeChecksum,
    /// Name-resolution oracle
    resolver: Arc<dyn TypeResolver>,
    /// Resolved names, usually shared across tables
    cache: Arc<NameCache>,
    /// Produces the names carried by name handles
    normalizer: CoreLibraryNormalizer,
}

impl TypeTable {
    /// Create a table with the default configuration and the resolver's shared name cache
    ///
    /// Tables created on the same resolver share resolved names. Tables on different
    /// resolvers never observe each other's names.
    ///
    /// ## Arguments
    /// * 'resolver' - The name-resolution oracle
    ///
    /// # Errors
    /// Returns an error if the resolver does not provide the reserved types.
    pub fn new(resolver: Arc<dyn TypeResolver>) -> Result<Self> {
        Self::with_config(resolver, WireConfig::default())
    }

    /// Create a table with the given configuration
    ///
    /// ## Arguments
    /// * 'resolver' - The name-resolution oracle
    /// * 'config'   - Normalization and cache settings
    ///
    /// # Errors
    /// Returns an error if the resolver does not provide the reserved types.
    pub fn with_config(resolver: Arc<dyn TypeResolver>, config: WireConfig) -> Result<Self> {
        let cache = if config.shared_cache {
            NameCache::for_resolver(&resolver)
        } else {
            Arc::new(NameCache::new())
        };
        Self::with_cache(resolver, cache, &config)
    }

    /// Create a table using an explicit name cache
    ///
    /// ## Arguments
    /// * 'resolver' - The name-resolution oracle
    /// * 'cache'    - The cache to consult before the resolver
    /// * 'config'   - Normalization settings; `shared_cache` is ignored
    ///
    /// # Errors
    /// Returns an error if the resolver does not provide the reserved types, or provides
    /// types that collapse into fewer than four slots.
    pub fn with_cache(
        resolver: Arc<dyn TypeResolver>,
        cache: Arc<NameCache>,
        config: &WireConfig,
    ) -> Result<Self> {
        let mut table = TypeTable {
            entries: Vec::with_capacity(32),
            index: HashMap::with_capacity(32),
            checksum: TypeChecksum::new(),
            resolver,
            cache,
            normalizer: CoreLibraryNormalizer::new(config),
        };

        for slot in ReservedSlot::iter() {
            let reserved = table.resolver.well_known(slot.well_known())?;
            let index = table.register(&reserved)?;
            if index != slot.index() {
                return Err(Error::TypeError(format!(
                    "Reserved type {} landed at index {} instead of {}",
                    reserved.full_name(),
                    index,
                    slot.index()
                )));
            }
        }

        Ok(table)
    }

    /// Turn a handle read from the stream into a type
    ///
    /// - The null handle yields `System.Object`; the caller treats it as "no object".
    /// - An index handle yields the registered entry.
    /// - A name handle is resolved through the cache and the resolver, and the result is
    ///   registered so later index handles referring to it succeed.
    ///
    /// ## Arguments
    /// * 'handle' - The handle to resolve
    ///
    /// # Errors
    /// Returns [`Error::InvalidHandle`] with [`HandleError::UnknownHandle`] for an index this
    /// table never registered, and with [`HandleError::TypeResolution`] for a name the
    /// resolver cannot map to a type.
    pub fn resolve_handle(&mut self, handle: &TypeHandle) -> Result<TypeRc> {
        match (handle, handle.index()) {
            (_, Some(index)) => self.resolve_index(index),
            (TypeHandle::Name(name), None) => self.resolve_name(name),
            (TypeHandle::Index(index), None) => self.resolve_index(*index),
        }
    }

    fn resolve_index(&self, index: u32) -> Result<TypeRc> {
        let index = if index == ReservedSlot::NullPlaceholder.index() {
            ReservedSlot::Object.index()
        } else {
            index
        };

        self.entries
            .get(index as usize)
            .cloned()
            .ok_or_else(|| Error::InvalidHandle {
                handle: TypeHandle::Index(index).to_text(),
                reason: HandleError::UnknownHandle {
                    index,
                    count: self.entries.len(),
                },
            })
    }

    fn resolve_name(&mut self, name: &str) -> Result<TypeRc> {
        let resolved = match self.cache.get(name) {
            Some(cached) => {
                trace!("name cache hit for {}", name);
                cached
            }
            None => {
                let resolved =
                    self.resolver
                        .resolve(name)
                        .map_err(|error| Error::InvalidHandle {
                            handle: name.to_string(),
                            reason: HandleError::TypeResolution(error.to_string()),
                        })?;
                self.cache.publish(name, resolved)
            }
        };

        self.register(&resolved)?;
        Ok(resolved)
    }

    /// Produce the handle to write for `runtime_type`
    ///
    /// A registered type yields its index. A new type is registered and yields a name handle;
    /// with `own_framework` set the name is normalized so that core library types are named
    /// identically by every runtime version, otherwise the raw assembly-qualified name is used.
    ///
    /// ## Arguments
    /// * 'runtime_type'  - The type about to be written
    /// * 'own_framework' - Normalize core library identities in the name
    ///
    /// # Errors
    /// Returns an error if the table cannot hold another entry.
    pub fn issue_handle(&mut self, runtime_type: &TypeRc, own_framework: bool) -> Result<TypeHandle> {
        if let Some(index) = self.index.get(runtime_type) {
            return Ok(TypeHandle::Index(*index));
        }

        self.register(runtime_type)?;
        Ok(TypeHandle::Name(
            self.normalizer.describe(runtime_type, own_framework),
        ))
    }

    /// Append `runtime_type` unless present and return its index
    fn register(&mut self, runtime_type: &TypeRc) -> Result<u32> {
        if let Some(index) = self.index.get(runtime_type) {
            return Ok(*index);
        }

        let index = u32::try_from(self.entries.len())
            .ok()
            .filter(|index| *index < u32::MAX)
            .ok_or_else(|| Error::TypeError("Type table is full".to_string()))?;

        self.entries.push(runtime_type.clone());
        self.index.insert(runtime_type.clone(), index);
        self.checksum.push(&runtime_type.name);

        debug!("registered {} as ${}", runtime_type.full_name(), index);
        Ok(index)
    }

    /// Number of registered types, including the reserved slots
    #[must_use]
    pub fn count(&self) -> usize {
        self.entries.len()
    }

    /// Sum of the fingerprints of all registered types
    #[must_use]
    pub fn checksum(&self) -> u64 {
        self.checksum.finalize()
    }

    /// Count and checksum, for exchange with the remote endpoint
    #[must_use]
    pub fn summary(&self) -> TableSummary {
        TableSummary {
            count: u32::try_from(self.entries.len()).unwrap_or(u32::MAX),
            checksum: self.checksum(),
        }
    }

    /// Compare this table against the summary reported by the remote endpoint
    ///
    /// # Errors
    /// Returns [`Error::ChecksumMismatch`] if count or checksum differ.
    pub fn ensure_compatible(&self, remote: &TableSummary) -> Result<()> {
        self.summary().ensure_compatible(remote)
    }

    /// The entry registered at `index`; index 0 is the null placeholder itself
    #[must_use]
    pub fn get(&self, index: u32) -> Option<&TypeRc> {
        self.entries.get(index as usize)
    }

    /// The index of `runtime_type`, if registered
    #[must_use]
    pub fn index_of(&self, runtime_type: &TypeRc) -> Option<u32> {
        self.index.get(runtime_type).copied()
    }

    /// Returns `true` if `runtime_type` is registered
    #[must_use]
    pub fn contains(&self, runtime_type: &TypeRc) -> bool {
        self.index.contains_key(runtime_type)
    }

    /// Iterate over the registered types in handle order
    pub fn iter(&self) -> impl Iterator<Item = &TypeRc> {
        self.entries.iter()
    }

    /// The name cache this table consults
    #[must_use]
    pub fn cache(&self) -> &Arc<NameCache> {
        &self.cache
    }
}

impl std::fmt::Debug for TypeTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TypeTable")
            .field("count", &self.entries.len())
            .field("checksum", &format_args!("0x{:016x}", self.checksum()))
            .finish_non_exhaustive()
    }
}
