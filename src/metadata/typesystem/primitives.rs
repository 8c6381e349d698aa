//! Built-in types every [`TypeCatalog`](super::TypeCatalog) carries.
//!
//! The four types backing the reserved handle slots are part of this set, along with the
//! runtime primitives and the generic collections that commonly appear in serialized
//! object graphs.

use strum::{EnumCount, EnumIter};

use crate::metadata::typesystem::{TypeFlags, TypeFlavor};

/// Simple name of the assembly that defines the wire framework's own pseudo-types.
pub const FRAMEWORK_ASSEMBLY_NAME: &str = "Dotwire";

/// Types known to every catalog without registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, EnumCount)]
pub enum WellKnownType {
    /// `Dotwire.Null` - pseudo-type reserving handle 0 for "no object"
    NullPlaceholder,
    /// System.Object - base class for all reference types
    Object,
    /// System.Object[] - generic object array
    ObjectArray,
    /// System.Byte[] - raw byte array
    ByteArray,
    /// System.String - immutable string of Unicode characters
    String,
    /// System.Boolean - true/false value
    Boolean,
    /// System.Char - Unicode 16-bit character
    Char,
    /// System.SByte - signed 8-bit integer
    SByte,
    /// System.Byte - unsigned 8-bit integer
    Byte,
    /// System.Int16 - signed 16-bit integer
    Int16,
    /// System.UInt16 - unsigned 16-bit integer
    UInt16,
    /// System.Int32 - signed 32-bit integer
    Int32,
    /// System.UInt32 - unsigned 32-bit integer
    UInt32,
    /// System.Int64 - signed 64-bit integer
    Int64,
    /// System.UInt64 - unsigned 64-bit integer
    UInt64,
    /// System.Single - 32-bit floating point
    Single,
    /// System.Double - 64-bit floating point
    Double,
    /// System.Decimal - 128-bit decimal
    Decimal,
    /// System.DateTime
    DateTime,
    /// System.TimeSpan
    TimeSpan,
    /// System.Guid
    Guid,
    /// System.IntPtr - native sized signed integer
    IntPtr,
    /// System.UIntPtr - native sized unsigned integer
    UIntPtr,
    /// System.ValueType - base class for value types
    ValueType,
    /// System.Enum - base class for enumerations
    Enum,
    /// System.Array - base class for arrays
    Array,
    /// System.Type
    Type,
    /// System.DBNull
    DBNull,
    /// System.Nullable`1
    Nullable,
    /// System.Collections.Generic.List`1
    List,
    /// System.Collections.Generic.Dictionary`2
    Dictionary,
    /// System.Collections.Generic.KeyValuePair`2
    KeyValuePair,
}

impl WellKnownType {
    /// Namespace of the type (of the element type for arrays)
    #[must_use]
    pub fn namespace(self) -> &'static str {
        match self {
            WellKnownType::NullPlaceholder => FRAMEWORK_ASSEMBLY_NAME,
            WellKnownType::List | WellKnownType::Dictionary | WellKnownType::KeyValuePair => {
                "System.Collections.Generic"
            }
            _ => "System",
        }
    }

    /// Simple name of the type
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            WellKnownType::NullPlaceholder => "Null",
            WellKnownType::Object => "Object",
            WellKnownType::ObjectArray => "Object[]",
            WellKnownType::ByteArray => "Byte[]",
            WellKnownType::String => "String",
            WellKnownType::Boolean => "Boolean",
            WellKnownType::Char => "Char",
            WellKnownType::SByte => "SByte",
            WellKnownType::Byte => "Byte",
            WellKnownType::Int16 => "Int16",
            WellKnownType::UInt16 => "UInt16",
            WellKnownType::Int32 => "Int32",
            WellKnownType::UInt32 => "UInt32",
            WellKnownType::Int64 => "Int64",
            WellKnownType::UInt64 => "UInt64",
            WellKnownType::Single => "Single",
            WellKnownType::Double => "Double",
            WellKnownType::Decimal => "Decimal",
            WellKnownType::DateTime => "DateTime",
            WellKnownType::TimeSpan => "TimeSpan",
            WellKnownType::Guid => "Guid",
            WellKnownType::IntPtr => "IntPtr",
            WellKnownType::UIntPtr => "UIntPtr",
            WellKnownType::ValueType => "ValueType",
            WellKnownType::Enum => "Enum",
            WellKnownType::Array => "Array",
            WellKnownType::Type => "Type",
            WellKnownType::DBNull => "DBNull",
            WellKnownType::Nullable => "Nullable`1",
            WellKnownType::List => "List`1",
            WellKnownType::Dictionary => "Dictionary`2",
            WellKnownType::KeyValuePair => "KeyValuePair`2",
        }
    }

    /// Element type of the built-in array types, `None` for definitions
    #[must_use]
    pub fn element(self) -> Option<WellKnownType> {
        match self {
            WellKnownType::ObjectArray => Some(WellKnownType::Object),
            WellKnownType::ByteArray => Some(WellKnownType::Byte),
            _ => None,
        }
    }

    /// Structural category of the definition
    #[must_use]
    pub fn flavor(self) -> TypeFlavor {
        match self {
            WellKnownType::NullPlaceholder => TypeFlavor::Placeholder,
            WellKnownType::ObjectArray | WellKnownType::ByteArray => TypeFlavor::Array { rank: 1 },
            WellKnownType::Object
            | WellKnownType::String
            | WellKnownType::ValueType
            | WellKnownType::Enum
            | WellKnownType::Array
            | WellKnownType::Type
            | WellKnownType::DBNull
            | WellKnownType::List
            | WellKnownType::Dictionary => TypeFlavor::Class,
            _ => TypeFlavor::ValueType,
        }
    }

    /// Definition attributes
    #[must_use]
    pub fn flags(self) -> TypeFlags {
        let mut flags = TypeFlags::PUBLIC | TypeFlags::SERIALIZABLE;
        match self {
            WellKnownType::NullPlaceholder => flags = TypeFlags::SEALED,
            WellKnownType::ValueType | WellKnownType::Enum | WellKnownType::Array | WellKnownType::Type => {
                flags |= TypeFlags::ABSTRACT;
            }
            WellKnownType::Boolean
            | WellKnownType::Char
            | WellKnownType::SByte
            | WellKnownType::Byte
            | WellKnownType::Int16
            | WellKnownType::UInt16
            | WellKnownType::Int32
            | WellKnownType::UInt32
            | WellKnownType::Int64
            | WellKnownType::UInt64
            | WellKnownType::Single
            | WellKnownType::Double
            | WellKnownType::IntPtr
            | WellKnownType::UIntPtr => flags |= TypeFlags::PRIMITIVE | TypeFlags::SEALED,
            WellKnownType::String | WellKnownType::DBNull => flags |= TypeFlags::SEALED,
            _ => {}
        }
        flags
    }

    /// Number of generic parameters
    #[must_use]
    pub fn generic_arity(self) -> u32 {
        match self {
            WellKnownType::Nullable | WellKnownType::List => 1,
            WellKnownType::Dictionary | WellKnownType::KeyValuePair => 2,
            _ => 0,
        }
    }

    /// Returns `true` if the type is defined by the wire framework rather than the core library
    #[must_use]
    pub fn is_framework_type(self) -> bool {
        matches!(self, WellKnownType::NullPlaceholder)
    }
}
