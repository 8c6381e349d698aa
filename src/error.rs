use thiserror::Error;

macro_rules! malformed_error {
    // Single string version
    ($msg:expr) => {
        crate::Error::Malformed {
            message: $msg.to_string(),
            file: file!(),
            line: line!(),
        }
    };

    // Format string with arguments version
    ($fmt:expr, $($arg:tt)*) => {
        crate::Error::Malformed {
            message: format!($fmt, $($arg)*),
            file: file!(),
            line: line!(),
        }
    };
}

/// The generic Error type, which provides coverage for all errors this library can potentially
/// return.
///
/// # Error Categories
///
/// ## Parsing Errors
/// - [`Error::Malformed`] - A type name, assembly display name, version or summary could not be parsed
///
/// ## Type System Errors
/// - [`Error::TypeNotFound`] - The name-resolution oracle has no type with the requested name
/// - [`Error::GenericArity`] - A generic type was instantiated with the wrong number of arguments
/// - [`Error::TypeError`] - General type system operation error
///
/// ## Wire Errors
/// - [`Error::InvalidHandle`] - A handle read from the stream could not be turned into a type
/// - [`Error::ChecksumMismatch`] - Two endpoints disagree about their registered type sets
///
/// # Examples
///
/// ```rust,no_run
/// use dotwire::{Error, wire::{HandleError, TypeHandle, TypeTable}};
/// use dotwire::metadata::typesystem::TypeCatalog;
/// use std::sync::Arc;
///
/// let mut table = TypeTable::new(Arc::new(TypeCatalog::default()))?;
/// match table.resolve_handle(&TypeHandle::Index(99)) {
///     Ok(ty) => println!("Resolved {}", ty.full_name()),
///     Err(Error::InvalidHandle { handle, reason: HandleError::UnknownHandle { .. } }) => {
///         eprintln!("Tables diverged at {}", handle);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok::<(), dotwire::Error>(())
/// ```
#[derive(Error, Debug)]
pub enum Error {
    /// The input is damaged and could not be parsed.
    ///
    /// The error includes the source location where the malformation was detected
    /// for debugging purposes.
    ///
    /// # Fields
    ///
    /// * `message` - Detailed description of what was malformed
    /// * `file` - Source file where the error was detected
    /// * `line` - Source line where the error was detected
    #[error("Malformed - {file}:{line}: {message}")]
    Malformed {
        /// The message to be printed for the Malformed error
        message: String,
        /// The source file in which this error occured
        file: &'static str,
        /// The source line in which this error occured
        line: u32,
    },

    /// Failed to find a type in the `TypeCatalog`.
    ///
    /// The associated string is the full name that was looked up.
    #[error("Failed to find type - {0}")]
    TypeNotFound(String),

    /// A generic type definition received the wrong number of type arguments.
    #[error("Generic type {name} expects {expected} type arguments, got {actual}")]
    GenericArity {
        /// Full name of the generic definition
        name: String,
        /// Arity declared by the definition
        expected: u32,
        /// Number of arguments supplied
        actual: usize,
    },

    /// General error during type system usage.
    #[error("{0}")]
    TypeError(String),

    /// A type handle could not be turned into a type.
    ///
    /// Both failure kinds of the handle table are reported through this single variant,
    /// carrying the textual form of the offending handle (`$11` for index handles, the
    /// name itself for name handles) so the caller can diagnose without the table
    /// logging anything.
    #[error("Invalid type handle '{handle}' - {reason}")]
    InvalidHandle {
        /// Textual form of the offending handle
        handle: String,
        /// Why the handle could not be resolved
        #[source]
        reason: HandleError,
    },

    /// The checksum preflight detected that two endpoints registered different types.
    #[error(
        "Type table mismatch - local {local_count} types / 0x{local_checksum:016x}, remote {remote_count} types / 0x{remote_checksum:016x}"
    )]
    ChecksumMismatch {
        /// Number of types registered locally
        local_count: u32,
        /// Local checksum
        local_checksum: u64,
        /// Number of types the remote side reported
        remote_count: u32,
        /// Remote checksum
        remote_checksum: u64,
    },
}

/// The reason a type handle could not be resolved.
///
/// Wrapped by [`Error::InvalidHandle`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum HandleError {
    /// An index handle refers to a slot this table never registered.
    ///
    /// This can only happen when the two endpoints' tables diverged, which is not
    /// recoverable within the session.
    #[error("index {index} is not registered (table holds {count} entries)")]
    UnknownHandle {
        /// The index that was requested
        index: u32,
        /// Number of entries the table holds
        count: usize,
    },

    /// A name handle could not be mapped to a type in this process.
    #[error("type could not be resolved: {0}")]
    TypeResolution(String),
}
