//! Ring tokens: positions on the 32-bit hash circle.
//!
//! The ring is the numeric space `0..=u32::MAX`, wrapping at the top. Keys
//! and virtual nodes are both placed on it by hashing their byte
//! representation; ownership of a key is decided by the nearest token in the
//! clockwise direction.

use std::fmt;

/// A point on the hash ring.
///
/// Newtype over `u32` so positions are cheap to compare, copy, and store in
/// an ordered index. The underlying hash is CRC32/IEEE: fast,
/// non-cryptographic, and deterministic across calls. Collisions between
/// unrelated inputs are possible and resolved last-writer-wins by the
/// position index.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub struct RingToken(pub u32);

impl RingToken {
    /// Hash a key onto the ring.
    #[inline]
    pub fn from_key(key: &str) -> Self {
        RingToken(crc32fast::hash(key.as_bytes()))
    }

    /// Token for virtual node `index` of `server`.
    ///
    /// Derived from the fixed `server#index` form so that removal can
    /// recompute the exact points insertion produced, without storing them
    /// separately.
    pub fn for_vnode(server: &str, index: usize) -> Self {
        Self::from_key(&format!("{server}#{index}"))
    }

    /// Raw position value.
    #[inline]
    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for RingToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:08x}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_key_is_deterministic() {
        assert_eq!(RingToken::from_key("user-42"), RingToken::from_key("user-42"));
    }

    #[test]
    fn test_vnode_tokens_differ_by_index() {
        let t0 = RingToken::for_vnode("server1", 0);
        let t1 = RingToken::for_vnode("server1", 1);
        assert_ne!(t0, t1);
    }

    #[test]
    fn test_vnode_token_matches_key_form() {
        // Removal relies on recomputing the same derivation insertion used.
        assert_eq!(
            RingToken::for_vnode("server1", 7),
            RingToken::from_key("server1#7"),
        );
    }

    #[test]
    fn test_display_is_fixed_width_hex() {
        assert_eq!(RingToken(0xab).to_string(), "000000ab");
    }
}
