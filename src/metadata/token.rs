use std::fmt;
use std::hash::{Hash, Hasher};

/// An artificial token identifying a type inside a [`crate::metadata::typesystem::TypeCatalog`].
///
/// Tokens follow the .NET metadata token layout:
/// - The high byte (bits 24-31) indicates the kind of entry
/// - The low 24 bits (bits 0-23) indicate the row within that kind
///
/// Catalog tokens are process-local. They never cross the wire; handles do.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Token(pub u32);

impl Token {
    /// Table byte used for types defined through a [`crate::metadata::typesystem::TypeBuilder`]
    pub const TYPE_DEF: u8 = 0x02;
    /// Table byte used for constructed types (arrays, generic instances)
    pub const TYPE_SPEC: u8 = 0x1B;
    /// Table byte used for the built-in well-known types
    pub const WELL_KNOWN: u8 = 0xF0;
    /// Largest row index a token can carry
    pub const MAX_ROW: u32 = 0x00FF_FFFF;

    /// Creates a new token from a raw 32-bit value
    #[must_use]
    pub fn new(value: u32) -> Self {
        Token(value)
    }

    /// Creates a token from a table byte and a row index
    #[must_use]
    pub fn from_parts(table: u8, row: u32) -> Self {
        Token((u32::from(table) << 24) | (row & Self::MAX_ROW))
    }

    /// Returns the raw token value
    #[must_use]
    pub fn value(&self) -> u32 {
        self.0
    }

    /// Extracts the table type from the token (high byte)
    #[must_use]
    pub fn table(&self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Extracts the row index from the token (low 24 bits)
    #[must_use]
    pub fn row(&self) -> u32 {
        self.0 & Self::MAX_ROW
    }

    /// Returns true if this is a null token (value 0)
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u32> for Token {
    fn from(value: u32) -> Self {
        Token(value)
    }
}

impl From<Token> for u32 {
    fn from(token: Token) -> Self {
        token.0
    }
}

impl fmt::Debug for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Token(0x{:08x}, table: 0x{:02x}, row: {})",
            self.0,
            self.table(),
            self.row()
        )
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}", self.0)
    }
}

impl Hash for Token {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.0.hash(state);
    }
}
