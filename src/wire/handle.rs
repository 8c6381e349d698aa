//! Compact type references as they appear in a serialized stream.
//!
//! A [`TypeHandle`] is either the index of a type in the session's [`TypeTable`](super::TypeTable)
//! or the canonical name of a type the stream mentions for the first time. The text form of an
//! index is `$` followed by decimal digits (`$11`); the null handle is `0`, written `$N`.
//!
//! # Examples
//!
//! ```rust
//! use dotwire::wire::TypeHandle;
//!
//! assert_eq!(TypeHandle::from("$11"), TypeHandle::Index(11));
//! assert!(TypeHandle::from("$N").is_null());
//! assert!(TypeHandle::from_text(None).is_null());
//!
//! let name = TypeHandle::from("System.Int32, mscorlib");
//! assert_eq!(name.index(), None);
//! assert_eq!(TypeHandle::Index(0).to_text(), "$N");
//! ```

use std::fmt;

/// Text form of the null handle
pub const NULL_HANDLE_TEXT: &str = "$N";

/// A reference to a type inside one serialization session.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeHandle {
    /// Index of an already registered type
    Index(u32),
    /// Canonical, assembly-qualified type name
    Name(String),
}

impl TypeHandle {
    /// The null handle, standing for "no object"
    pub const NULL: TypeHandle = TypeHandle::Index(0);

    /// Build a handle from its text form.
    ///
    /// `None`, the empty string and `$N` are the null handle; `$` followed only by decimal
    /// digits that fit a `u32` is an index. Anything else is a name.
    ///
    /// ## Arguments
    /// * 'text' - The handle text, as read from the stream
    #[must_use]
    pub fn from_text(text: Option<&str>) -> Self {
        match text {
            None | Some("") | Some(NULL_HANDLE_TEXT) => TypeHandle::NULL,
            Some(text) => match parse_index(text) {
                Some(index) => TypeHandle::Index(index),
                None => TypeHandle::Name(text.to_string()),
            },
        }
    }

    /// The table index this handle denotes, if it is an index.
    ///
    /// Name handles spelled as `$digits` or `$N` count as indices.
    #[must_use]
    pub fn index(&self) -> Option<u32> {
        match self {
            TypeHandle::Index(index) => Some(*index),
            TypeHandle::Name(name) if name.is_empty() || name == NULL_HANDLE_TEXT => Some(0),
            TypeHandle::Name(name) => parse_index(name),
        }
    }

    /// Returns `true` for the null handle in any of its spellings
    #[must_use]
    pub fn is_null(&self) -> bool {
        self.index() == Some(0)
    }

    /// The text form of the handle: `$N`, `$<index>` or the name
    #[must_use]
    pub fn to_text(&self) -> String {
        match self.index() {
            Some(0) => NULL_HANDLE_TEXT.to_string(),
            Some(index) => format!("${}", index),
            None => match self {
                TypeHandle::Name(name) => name.clone(),
                TypeHandle::Index(index) => format!("${}", index),
            },
        }
    }
}

/// Parse `$digits` into an index
fn parse_index(text: &str) -> Option<u32> {
    let digits = text.strip_prefix('$')?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}

impl Default for TypeHandle {
    fn default() -> Self {
        TypeHandle::NULL
    }
}

impl From<u32> for TypeHandle {
    fn from(index: u32) -> Self {
        TypeHandle::Index(index)
    }
}

impl From<&str> for TypeHandle {
    fn from(text: &str) -> Self {
        TypeHandle::from_text(Some(text))
    }
}

impl From<String> for TypeHandle {
    fn from(text: String) -> Self {
        match TypeHandle::from_text(Some(&text)) {
            TypeHandle::Name(_) => TypeHandle::Name(text),
            index => index,
        }
    }
}

impl fmt::Display for TypeHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_null_spellings() {
        for handle in [
            TypeHandle::NULL,
            TypeHandle::Index(0),
            TypeHandle::from(0u32),
            TypeHandle::from("$N"),
            TypeHandle::from("$0"),
            TypeHandle::from(""),
            TypeHandle::from_text(None),
            TypeHandle::Name("$N".to_string()),
            TypeHandle::default(),
        ] {
            assert!(handle.is_null(), "{:?}", handle);
            assert_eq!(handle.to_text(), "$N");
        }
    }

    #[test]
    fn test_index_text() {
        assert_eq!(TypeHandle::from("$11"), TypeHandle::Index(11));
        assert_eq!(TypeHandle::from("$4294967295"), TypeHandle::Index(u32::MAX));
        assert_eq!(TypeHandle::Name("$7".to_string()).index(), Some(7));
        assert_eq!(TypeHandle::Index(11).to_text(), "$11");
        assert_eq!(TypeHandle::Index(3).to_string(), "$3");
    }

    #[test]
    fn test_names_are_not_indices() {
        for text in ["$", "$1a", "$-1", "$ 1", "$4294967296", "1", "System.Int32", "$Name"] {
            let handle = TypeHandle::from(text);
            assert_eq!(handle, TypeHandle::Name(text.to_string()), "{}", text);
            assert_eq!(handle.index(), None);
            assert_eq!(handle.to_text(), text);
        }
    }

    #[test]
    fn test_from_string() {
        assert_eq!(TypeHandle::from("$5".to_string()), TypeHandle::Index(5));
        assert_eq!(
            TypeHandle::from("System.String".to_string()),
            TypeHandle::Name("System.String".to_string())
        );
    }
}
