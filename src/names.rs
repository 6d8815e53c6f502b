//! Member name normalization.
//!
//! There is exactly one policy: whole-string, case-insensitive comparison.
//! Declared member names are normalized once when a host type is built;
//! requested names are normalized on every get, set and delete path, so
//! `testMethod1`, `TestMethod1` and `TESTMETHOD1` address the same member.

use std::borrow::Cow;

/// Normalize a member name to its lookup key.
///
/// Borrows the input when it is already normalized.
#[inline]
pub fn normalize(name: &str) -> Cow<'_, str> {
    if name.chars().any(char::is_uppercase) {
        Cow::Owned(name.to_lowercase())
    } else {
        Cow::Borrowed(name)
    }
}

/// Check whether a name is reserved for indexers.
///
/// Non-negative integer names (`"0"`, `"12"`) never match named members.
#[inline]
pub fn is_index_name(name: &str) -> bool {
    !name.is_empty() && name.parse::<u32>().is_ok()
}
