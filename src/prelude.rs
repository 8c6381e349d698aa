//! # dotwire Prelude
//!
//! This module provides a convenient prelude for the most commonly used types and traits
//! from the dotwire library. Import this module to get quick access to the handle table
//! and the type catalog behind it.

// ================================================================================================
// Core Types and Error Handling
// ================================================================================================

/// The main error type for all dotwire operations
pub use crate::Error;

/// Reason an invalid type handle could not be resolved
pub use crate::HandleError;

/// The result type used throughout dotwire
pub use crate::Result;

// ================================================================================================
// Type System
// ================================================================================================

/// Catalog-local type identity
pub use crate::metadata::token::Token;

/// Assembly identity
pub use crate::metadata::identity::{AssemblyIdentity, AssemblyVersion};

/// Core type system components
pub use crate::metadata::typesystem::{
    RuntimeType, TypeBuilder, TypeCatalog, TypeFlags, TypeFlavor, TypeName, TypeRc, TypeResolver,
    WellKnownType,
};

// ================================================================================================
// Handle Table
// ================================================================================================

/// Handles, the table and its collaborators
pub use crate::wire::{
    NameCache, ReservedSlot, TableSummary, TypeHandle, TypeTable, WireConfig, RESERVED_SLOTS,
};
