//! Deterministic 64-bit type fingerprints.
//!
//! This module provides [`TypeHash`], an FNV1a hash of a type name. Stored
//! handles carry the fingerprint of their type so that typed retrieval is a
//! single `u64` comparison instead of a string comparison.
//!
//! # Examples
//!
//! ```
//! use objstate_core::TypeHash;
//!
//! let a = TypeHash::from_name("camera");
//! let b = TypeHash::from_name("camera");
//! assert_eq!(a, b); // Deterministic
//! assert_ne!(a, TypeHash::from_name("image"));
//! ```

use std::fmt;

/// FNV1a 64-bit offset basis.
pub const FNV_OFFSET_BASIS: u64 = 0xcbf2_9ce4_8422_2325;

/// FNV1a 64-bit prime.
pub const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

/// Hash `bytes` with FNV1a.
///
/// Hashing stops at the first NUL byte or after `max_len` bytes, whichever
/// comes first. `None` means no length bound.
///
/// Bytes are mixed in as unsigned values. A C hash that sign-extends a signed
/// `char` gives different results for names with bytes of 0x80 and above.
#[inline]
pub fn fnv1a(bytes: &[u8], max_len: Option<usize>) -> u64 {
    bytes
        .iter()
        .take(max_len.unwrap_or(usize::MAX))
        .take_while(|&&b| b != 0)
        .fold(FNV_OFFSET_BASIS, |hash, &b| {
            (hash ^ u64::from(b)).wrapping_mul(FNV_PRIME)
        })
}

/// A 64-bit fingerprint of a type name.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Fingerprint of the empty name.
    pub const EMPTY: TypeHash = TypeHash(FNV_OFFSET_BASIS);

    /// Create a fingerprint from a type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(fnv1a(name.as_bytes(), None))
    }

    /// Create a fingerprint from raw bytes with an optional length bound.
    #[inline]
    pub fn from_bytes(bytes: &[u8], max_len: Option<usize>) -> Self {
        TypeHash(fnv1a(bytes, max_len))
    }

    /// Get the underlying u64 value.
    #[inline]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeHash({:#018x})", self.0)
    }
}

impl fmt::Display for TypeHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:#018x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_vectors() {
        assert_eq!(fnv1a(b"", None), 0xcbf29ce484222325);
        assert_eq!(fnv1a(b"a", None), 0xaf63dc4c8601ec8c);
        assert_eq!(fnv1a(b"foobar", None), 0x85944171f73967e8);
    }

    #[test]
    fn empty_name_is_offset_basis() {
        assert_eq!(TypeHash::from_name(""), TypeHash::EMPTY);
    }

    #[test]
    fn deterministic() {
        let first = TypeHash::from_name("widget");
        for _ in 0..10 {
            assert_eq!(TypeHash::from_name("widget"), first);
        }
    }

    #[test]
    fn length_sensitive() {
        assert_ne!(TypeHash::from_name("ab"), TypeHash::from_name("a"));
        assert_ne!(TypeHash::from_name("a"), TypeHash::from_name(""));
    }

    #[test]
    fn order_sensitive() {
        assert_ne!(TypeHash::from_name("ab"), TypeHash::from_name("ba"));
    }

    #[test]
    fn every_byte_matters() {
        let base = TypeHash::from_name("camera");
        for i in 0..6 {
            let mut bytes = b"camera".to_vec();
            bytes[i] ^= 0x01;
            assert_ne!(TypeHash::from_bytes(&bytes, None), base, "byte {i}");
        }
    }

    #[test]
    fn max_len_bounds_input() {
        assert_eq!(fnv1a(b"abcdef", Some(2)), fnv1a(b"ab", None));
        assert_eq!(fnv1a(b"ab", Some(10)), fnv1a(b"ab", None));
        assert_eq!(fnv1a(b"abc", Some(0)), FNV_OFFSET_BASIS);
    }

    #[test]
    fn stops_at_nul() {
        assert_eq!(fnv1a(b"ab\0cd", None), fnv1a(b"ab", None));
    }

    #[test]
    fn high_bytes_are_unsigned() {
        let expected = (FNV_OFFSET_BASIS ^ 0xe9).wrapping_mul(FNV_PRIME);
        assert_eq!(fnv1a(&[0xe9], None), expected);
        // 0xe9 sign-extended as a C `char` is 0xffff_ffff_ffff_ffe9.
        let sign_extended = (FNV_OFFSET_BASIS ^ 0xffff_ffff_ffff_ffe9).wrapping_mul(FNV_PRIME);
        assert_ne!(fnv1a(&[0xe9], None), sign_extended);
    }

    #[test]
    fn debug_and_display() {
        let h = TypeHash(0xff);
        assert_eq!(format!("{h}"), "0x00000000000000ff");
        assert_eq!(format!("{h:?}"), "TypeHash(0x00000000000000ff)");
    }
}
