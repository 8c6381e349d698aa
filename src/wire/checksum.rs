//! Per-type fingerprints and the table checksum.
//!
//! Every type registered in a [`TypeTable`](super::TypeTable) contributes a 24-bit fingerprint
//! of its simple name to the table's checksum:
//!
//! ```text
//! fingerprint = (first << 16) | (last << 8) | (length & 0xFF)
//! ```
//!
//! where `first` and `last` are the first and last UTF-16 code units of the name and `length`
//! is its length in UTF-16 code units. Fingerprints are widened to 64 bits and summed with
//! wrapping arithmetic. The sum is commutative, so two tables holding the same set of types
//! have equal checksums regardless of registration order.
//!
//! This is a drift detector agreed upon by both endpoints, not a digest. Changing the
//! formula changes the protocol.
//!
//! # Example
//!
//! ```rust
//! use dotwire::wire::{fingerprint, TypeChecksum};
//!
//! // 'O' = 0x4F, 't' = 0x74, length 6
//! assert_eq!(fingerprint("Object"), 0x4F_74_06);
//!
//! let checksum = TypeChecksum::new().add_name("Object").add_name("Byte[]");
//! assert_eq!(checksum.finalize(), fingerprint("Object") + fingerprint("Byte[]"));
//! ```

/// Compute the fingerprint of a simple type name
///
/// ## Arguments
/// * 'name' - The simple name of the type (e.g. `Object`, `List`1`, `Byte[]`)
#[must_use]
pub fn fingerprint(name: &str) -> u64 {
    let mut units = name.encode_utf16();
    let Some(first) = units.next() else {
        return 0;
    };
    let (last, length) = units.fold((first, 1usize), |(_, length), unit| (unit, length + 1));

    (u64::from(first) << 16) | (u64::from(last) << 8) | (length as u64 & 0xFF)
}

/// Accumulator for the order-independent checksum over registered type names
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TypeChecksum {
    /// Current wrapping sum
    state: u64,
}

impl TypeChecksum {
    /// Create an empty checksum
    #[must_use]
    pub fn new() -> Self {
        TypeChecksum { state: 0 }
    }

    /// Fold a type name into the checksum
    ///
    /// ## Arguments
    /// * 'name' - The simple name of the registered type
    #[must_use]
    pub fn add_name(mut self, name: &str) -> Self {
        self.push(name);
        self
    }

    /// Fold a type name into the checksum in place
    ///
    /// ## Arguments
    /// * 'name' - The simple name of the registered type
    pub fn push(&mut self, name: &str) {
        self.state = self.state.wrapping_add(fingerprint(name));
    }

    /// Return the current checksum value
    #[must_use]
    pub fn finalize(self) -> u64 {
        self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_literals() {
        assert_eq!(fingerprint("Null"), (0x4E << 16) | (0x6C << 8) | 4);
        assert_eq!(fingerprint("Object"), 0x004F_7406);
        assert_eq!(fingerprint("Object[]"), (0x4F << 16) | (0x5D << 8) | 8);
        assert_eq!(fingerprint("Byte[]"), (0x42 << 16) | (0x5D << 8) | 6);
        assert_eq!(fingerprint("X"), (0x58 << 16) | (0x58 << 8) | 1);
        assert_eq!(fingerprint(""), 0);
    }

    #[test]
    fn test_fingerprint_uses_utf16_units() {
        // U+00E9 is one UTF-16 unit but two UTF-8 bytes
        assert_eq!(fingerprint("Caf\u{e9}"), (0x43 << 16) | (0xE9 << 8) | 4);

        // U+1D11E is a surrogate pair: the last unit is the low surrogate 0xDD1E
        assert_eq!(fingerprint("A\u{1D11E}"), (0x41 << 16) | (0xDD1E << 8) | 3);
    }

    #[test]
    fn test_fingerprint_length_is_truncated() {
        let long = "a".repeat(0x1FF);
        assert_eq!(fingerprint(&long), (0x61 << 16) | (0x61 << 8) | 0xFF);

        let wrapped = "a".repeat(0x100);
        assert_eq!(fingerprint(&wrapped), (0x61 << 16) | (0x61 << 8));
    }

    #[test]
    fn test_checksum_order_independent() {
        let forward = TypeChecksum::new().add_name("Alpha").add_name("Beta").finalize();
        let reverse = TypeChecksum::new().add_name("Beta").add_name("Alpha").finalize();
        assert_eq!(forward, reverse);
    }

    #[test]
    fn test_checksum_detects_different_sets() {
        let ours = TypeChecksum::new().add_name("Order").finalize();
        let theirs = TypeChecksum::new().add_name("Invoice").finalize();
        assert_ne!(ours, theirs);
    }

    #[test]
    fn test_checksum_wraps() {
        let mut checksum = TypeChecksum { state: u64::MAX };
        checksum.push("X");
        assert_eq!(checksum.finalize(), fingerprint("X") - 1);
    }
}
