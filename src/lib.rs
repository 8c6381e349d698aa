// Copyright 2025 Johann Kempter
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//
// SPDX-License-Identifier: Apache-2.0

#![doc(html_no_source)]
#![deny(missing_docs)]
#![deny(unsafe_code)]
#![allow(clippy::too_many_arguments)]

//! # dotwire
//!
//! Type handle tables for .NET-compatible serialization streams.
//!
//! A serialized object graph mentions the same types over and over. `dotwire` keeps a
//! per-session table that describes each type fully (by assembly-qualified name) the first
//! time it is written and refers to it by a small integer afterwards. The reading side
//! rebuilds the same table as it decodes, so writer and reader converge without exchanging
//! the table up front.
//!
//! ## Features
//!
//! - **Fixed reserved slots** - `Null`, `Object`, `Object[]` and `Byte[]` at handles 0 to 3 in every table
//! - **Shared name cache** - Resolved names are cached process-wide with lock-free readers
//! - **Cross-runtime names** - Core library identities are normalized so .NET Framework and
//!   modern runtimes write identical name handles
//! - **Checksum preflight** - A cheap, order-independent checksum detects diverging tables
//! - **Type catalog** - A thread-safe catalog of built-in and application types resolves
//!   assembly-qualified names, including generics, nested types and arrays
//!
//! ## Quick Start
//!
//! ```rust
//! use dotwire::prelude::*;
//! use std::sync::Arc;
//!
//! let catalog = Arc::new(TypeCatalog::default());
//! let mut writer = TypeTable::new(catalog.clone())?;
//! let mut reader = TypeTable::new(catalog.clone())?;
//!
//! let list = catalog.resolve("System.Collections.Generic.List`1[[System.String, mscorlib]]")?;
//!
//! // First occurrence: a self-describing name handle
//! let first = writer.issue_handle(&list, true)?;
//! assert!(matches!(first, TypeHandle::Name(_)));
//!
//! // Later occurrences: the index assigned on registration
//! let again = writer.issue_handle(&list, true)?;
//! assert_eq!(again.to_text(), "$4");
//!
//! assert_eq!(*reader.resolve_handle(&first)?, *list);
//! assert_eq!(*reader.resolve_handle(&again)?, *list);
//! assert_eq!(reader.summary(), writer.summary());
//! # Ok::<(), dotwire::Error>(())
//! ```
//!
//! ## Architecture
//!
//! - [`prelude`] - Convenient re-exports of commonly used types and traits
//! - [`metadata`] - Type descriptors, assembly identities and the name-resolution oracle
//! - [`wire`] - Handles, the handle table, the name cache and the checksum preflight
//! - [`Error`] and [`Result`] - Error handling

#[macro_use]
pub(crate) mod error;

/// Convenient re-exports of the most commonly used types and traits.
///
/// # Example
///
/// ```rust
/// use dotwire::prelude::*;
///
/// let catalog = std::sync::Arc::new(TypeCatalog::default());
/// let table = TypeTable::with_config(catalog, WireConfig::isolated())?;
/// assert_eq!(table.count(), RESERVED_SLOTS);
/// # Ok::<(), dotwire::Error>(())
/// ```
pub mod prelude;

/// Runtime type metadata: descriptors, names, assembly identities and type resolution
///
/// # Key Components
///
/// - [`metadata::typesystem`] - [`metadata::typesystem::RuntimeType`] descriptors and the
///   [`metadata::typesystem::TypeCatalog`] oracle
/// - [`metadata::identity`] - Assembly display names and core library detection
/// - [`metadata::token`] - Catalog-local type identities
pub mod metadata;

/// Type handles, the per-session handle table and its process-wide name cache
///
/// See [`wire::TypeTable`] for the handle lifecycle and reserved slots.
pub mod wire;

/// `dotwire` Result type
///
/// A type alias for [`std::result::Result<T, Error>`] where the error type is always [`Error`].
pub type Result<T> = std::result::Result<T, Error>;

/// `dotwire` Error type
///
/// The main error type for all operations in this crate.
///
/// # Examples
///
/// ```rust
/// use dotwire::{Error, HandleError};
/// use dotwire::metadata::typesystem::TypeCatalog;
/// use dotwire::wire::{TypeHandle, TypeTable, WireConfig};
/// use std::sync::Arc;
///
/// let mut table = TypeTable::with_config(Arc::new(TypeCatalog::default()), WireConfig::isolated())?;
/// match table.resolve_handle(&TypeHandle::from("App.Missing, App")) {
///     Err(Error::InvalidHandle { handle, reason: HandleError::TypeResolution(_) }) => {
///         assert_eq!(handle, "App.Missing, App");
///     }
///     other => panic!("unexpected {:?}", other),
/// }
/// # Ok::<(), dotwire::Error>(())
/// ```
pub use error::Error;

/// Reason carried by [`Error::InvalidHandle`]
pub use error::HandleError;
