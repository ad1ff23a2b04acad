//! The index deriver.
//!
//! Maps (logical key, timestamp) to an opaque backend index: a
//! collision-resistant hash of their canonical joining. Pure,
//! deterministic, side-effect-free — the same pair always derives the
//! same index, and distinct timestamps for the same key derive
//! different indices with overwhelming probability, which is what
//! prevents the backend from seeing two reads of the same logical item
//! at the same address across batches.

use sha2::{Digest, Sha256};

/// Separator between the key and the decimal timestamp in the joined
/// string that gets hashed. A single character.
const SEPARATOR: char = ':';

/// Derives the backend index for `(key, timestamp)`.
///
/// Returns a 64-character lowercase hex string (32-byte SHA-256 digest).
#[must_use]
pub fn derive(key: &str, timestamp: i64) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key.as_bytes());
    hasher.update([SEPARATOR as u8]);
    hasher.update(timestamp.to_string().as_bytes());
    hex::encode(hasher.finalize())
}

/// Returns true if `key` belongs to the real (client-meaningful) class,
/// i.e. it does not carry the dummy-decoy naming prefix.
#[must_use]
pub fn is_real(key: &str, dummy_prefix: &str) -> bool {
    !key.starts_with(dummy_prefix)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_is_deterministic() {
        assert_eq!(derive("alpha", 1000), derive("alpha", 1000));
    }

    #[test]
    fn derive_is_64_char_lowercase_hex() {
        let idx = derive("alpha", 1000);
        assert_eq!(idx.len(), 64);
        assert!(idx.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn derive_changes_with_timestamp() {
        assert_ne!(derive("alpha", 1000), derive("alpha", 1001));
    }

    #[test]
    fn derive_changes_with_key() {
        assert_ne!(derive("alpha", 1000), derive("beta", 1000));
    }

    #[test]
    fn is_real_classifies_by_prefix() {
        assert!(is_real("alpha", "dummy_"));
        assert!(!is_real("dummy_7", "dummy_"));
    }

    proptest::proptest! {
        #[test]
        fn derive_same_inputs_same_output(key in "[a-zA-Z0-9_]{1,32}", ts in 0i64..10_000_000) {
            proptest::prop_assert_eq!(derive(&key, ts), derive(&key, ts));
        }

        #[test]
        fn derive_distinct_timestamps_distinct_index(key in "[a-zA-Z0-9_]{1,32}", ts in 0i64..5_000_000) {
            proptest::prop_assert_ne!(derive(&key, ts), derive(&key, ts + 1));
        }
    }
}
