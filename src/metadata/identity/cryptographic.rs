//! Strong-name identity for .NET assemblies.
//!
//! An assembly is strong-named either by its full public key or by the 8-byte
//! public key token derived from it. Both forms appear in assembly display names
//! that travel inside type-name handles, so both must reduce to the same token.
//!
//! # Example
//! ```rust
//! use dotwire::metadata::identity::Identity;
//!
//! let token = Identity::Token(0x89e0_3419_565c_7ab7);
//! assert_eq!(token.to_token(), 0x89e0_3419_565c_7ab7);
//! ```

use sha1::{Digest, Sha1};

/// An identifier for an assembly's strong name.
/// Can be either a public-key or a hashed Token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Identity {
    /// The full RSA public-key
    PubKey(Vec<u8>),
    /// 8-byte end of the SHA-1 hash of the public-key, little-endian
    Token(u64),
}

impl Identity {
    /// Get the public key token; for a full key this is the last 8 bytes of its SHA-1 hash.
    #[must_use]
    pub fn to_token(&self) -> u64 {
        match self {
            Identity::PubKey(data) => {
                let mut hasher = Sha1::new();
                hasher.update(data);
                let result = hasher.finalize();

                let mut tail = [0u8; 8];
                tail.copy_from_slice(&result[result.len() - 8..]);
                // The token is the hash tail in reverse byte order
                tail.reverse();
                u64::from_le_bytes(tail)
            }
            Identity::Token(token) => *token,
        }
    }

    /// Renders the token as the 16 lowercase hex digits used in display names.
    #[must_use]
    pub fn token_hex(&self) -> String {
        hex::encode(self.to_token().to_le_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_passthrough() {
        let identity = Identity::Token(0x1234_5678_9abc_def0);
        assert_eq!(identity.to_token(), 0x1234_5678_9abc_def0);
    }

    #[test]
    fn test_token_hex_byte_order() {
        // mscorlib's well-known token renders as b77a5c561934e089
        let identity = Identity::Token(u64::from_le_bytes([
            0xb7, 0x7a, 0x5c, 0x56, 0x19, 0x34, 0xe0, 0x89,
        ]));
        assert_eq!(identity.token_hex(), "b77a5c561934e089");
    }

    #[test]
    fn test_ecma_key_token() {
        // The 16-byte ECMA standard key hashes to the well-known b77a5c561934e089 token
        let ecma_key = vec![0, 0, 0, 0, 0, 0, 0, 0, 4, 0, 0, 0, 0, 0, 0, 0];
        let identity = Identity::PubKey(ecma_key);
        assert_eq!(identity.token_hex(), "b77a5c561934e089");
    }

    #[test]
    fn test_pubkey_token_deterministic() {
        let key = vec![1, 2, 3, 4, 5, 6, 7, 8, 9, 10];
        let first = Identity::PubKey(key.clone()).to_token();
        let second = Identity::PubKey(key).to_token();
        assert_eq!(first, second);
    }
}
