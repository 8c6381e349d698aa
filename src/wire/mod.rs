//! Type handles and the per-session handle table.
//!
//! This module implements the type symbol table a serialization protocol uses to avoid
//! repeating full type names in a stream. The first occurrence of a type is written as a name
//! handle; every later occurrence as the index the type received in the session's
//! [`TypeTable`]. The reading side registers types in the same order as it decodes them, so
//! both tables converge without being exchanged.
//!
//! # Key Components
//!
//! - [`TypeTable`]: Per-session mapping between descriptors and handles
//! - [`TypeHandle`]: Index or name reference to a type, with its `$N`/`$11` text form
//! - [`NameCache`]: Process-wide cache of resolved names with lock-free readers
//! - [`CoreLibraryNormalizer`]: Core library identity rewriting for "own framework" names
//! - [`TypeChecksum`]: Order-independent checksum over registered type names
//! - [`TableSummary`]: Checksum preflight between two endpoints
//! - [`WireConfig`]: Table configuration
//!
//! # Example
//!
//! ```rust
//! use dotwire::metadata::typesystem::{TypeCatalog, TypeResolver};
//! use dotwire::wire::{TableSummary, TypeTable, WireConfig};
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::default());
//! let mut writer = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;
//! let mut reader = TypeTable::with_config(catalog.clone(), WireConfig::isolated())?;
//!
//! let decimal = catalog.resolve("System.Decimal")?;
//! let handle = writer.issue_handle(&decimal, true)?;
//! reader.resolve_handle(&handle)?;
//!
//! // Exchange summaries before trusting index handles
//! let remote = TableSummary::from_bytes(&writer.summary().to_bytes())?;
//! reader.ensure_compatible(&remote)?;
//! # Ok::<(), dotwire::Error>(())
//! ```

mod cache;
mod checksum;
mod config;
mod handle;
mod normalize;
mod preflight;
mod table;

pub use crate::error::HandleError;
pub use cache::NameCache;
pub use checksum::{fingerprint, TypeChecksum};
pub use config::{WireConfig, CANONICAL_CORE_LIBRARY};
pub use handle::{TypeHandle, NULL_HANDLE_TEXT};
pub use normalize::CoreLibraryNormalizer;
pub use preflight::TableSummary;
pub use table::{ReservedSlot, TypeTable, RESERVED_SLOTS};
