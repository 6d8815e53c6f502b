//! Deterministic hash-based host type identity.
//!
//! [`TypeHash`] is a 64-bit hash computed from a host type's name, or from an
//! owner/name/parameter signature for callable members. Hashes are stable
//! across engines and processes, which lets the process-wide resolution cache
//! key entries by type identity without holding on to the type itself.
//!
//! # Examples
//!
//! ```
//! use hostbridge::TypeHash;
//!
//! let a = TypeHash::from_name("Widget");
//! let b = TypeHash::from_name("Widget");
//! assert_eq!(a, b);
//!
//! let int_hash = TypeHash::from_name("int");
//! let ctor1 = TypeHash::from_signature(a, ".ctor", &[int_hash]);
//! let ctor2 = TypeHash::from_signature(a, ".ctor", &[]);
//! assert_ne!(ctor1, ctor2);
//! ```

use std::fmt;
use xxhash_rust::xxh64::xxh64;

/// Domain-specific mixing constants for hash computation.
pub mod hash_constants {
    /// Separator constant for chained components.
    pub const SEP: u64 = 0x4bc94d6bd06053ad;

    /// Domain marker for type hashes.
    pub const TYPE: u64 = 0x2fac10b63a6cc57c;

    /// Domain marker for member signature hashes.
    pub const MEMBER: u64 = 0x7d3c8b4a92e15f6d;

    /// Parameter position mixing constants.
    /// Each position gets its own constant so parameter order matters.
    pub const PARAM_MARKERS: [u64; 16] = [
        0x9e3779b97f4a7c15,
        0xbf58476d1ce4e5b9,
        0x94d049bb133111eb,
        0xd6e8feb86659fd93,
        0xe7037ed1a0b428db,
        0xc6a4a7935bd1e995,
        0x8648dbbc94d49b8d,
        0xa2b48b2c69e0d657,
        0x7c3e9f2a5b8d1403,
        0x5d8c7b4a3e9f2106,
        0x3f1e9d8c7b5a4203,
        0x1a2b3c4d5e6f7089,
        0x9f8e7d6c5b4a3210,
        0x2468ace013579bdf,
        0xfdb97531eca86420,
        0x123456789abcdef0,
    ];
}

/// A deterministic 64-bit hash identifying a host type or member signature.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(transparent)]
pub struct TypeHash(pub u64);

impl TypeHash {
    /// Empty/invalid hash constant.
    pub const EMPTY: TypeHash = TypeHash(0);

    /// Create a type hash from a fully qualified host type name.
    #[inline]
    pub fn from_name(name: &str) -> Self {
        TypeHash(hash_constants::TYPE ^ xxh64(name.as_bytes(), 0))
    }

    /// Create a member hash from owner type, member name and parameter types.
    ///
    /// Parameter order matters - `(int, string)` and `(string, int)` differ.
    #[inline]
    pub fn from_signature(owner: TypeHash, name: &str, param_hashes: &[TypeHash]) -> Self {
        let mut hash = hash_constants::MEMBER ^ owner.0 ^ xxh64(name.as_bytes(), 0);
        for (i, param) in param_hashes.iter().enumerate() {
            let marker = hash_constants::PARAM_MARKERS
                .get(i)
                .copied()
                .unwrap_or_else(|| hash_constants::PARAM_MARKERS[0].wrapping_add(i as u64));
            // wrapping_mul keeps the fold non-commutative
            hash = hash.wrapping_mul(hash_constants::SEP).wrapping_add(marker ^ param.0);
        }
        TypeHash(hash)
    }

    /// Check if this is an empty/invalid hash.
    #[inline]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
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
