//! Bounded bit-strings addressing positions in the trie.
//!
//! A key is walked most-significant bit first, so a [`BitPath`] is a view of
//! the low `height` bits of a felt in Msb0 order: bit 0 is the first branch
//! taken below the root. As an integer, a path is right-aligned: the last
//! bit of the path is the least significant bit of its byte encoding.

use bitvec::order::Msb0;
use bitvec::vec::BitVec;
use bitvec::view::BitView;
use tessera_crypto::felt::FELT_LENGTH;
use tessera_crypto::Felt;

/// Maximum number of bits in a path (the trie height).
pub const MAX_PATH_LEN: usize = 251;

/// A bit-string of length `0..=251`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BitPath(BitVec<u8, Msb0>);

impl BitPath {
    /// The empty path.
    pub fn empty() -> Self {
        Self::default()
    }

    /// The low `len` bits of `value`, in walk order.
    ///
    /// This is both the key-to-path conversion (with `len` the trie height)
    /// and the inverse of [`to_felt`](Self::to_felt) for a known length.
    pub fn from_felt(value: &Felt, len: usize) -> Self {
        debug_assert!(len <= MAX_PATH_LEN);
        let bytes = value.to_bytes_be();
        Self(bytes.view_bits::<Msb0>()[8 * FELT_LENGTH - len..].to_bitvec())
    }

    /// Number of bits in the path.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the path has no bits.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The bit at position `i`, counted from the start of the walk.
    pub fn get(&self, i: usize) -> bool {
        self.0[i]
    }

    /// Sets the bit at position `i` to 1.
    pub fn set(&mut self, i: usize) {
        self.0.set(i, true);
    }

    /// The suffix of the path after skipping the first `k` bits.
    pub fn walked(&self, k: usize) -> Self {
        Self(self.0[k..].to_bitvec())
    }

    /// Length of the longest shared prefix with `other`.
    pub fn longest_common_prefix(&self, other: &Self) -> usize {
        self.0
            .iter()
            .by_vals()
            .zip(other.0.iter().by_vals())
            .take_while(|(a, b)| a == b)
            .count()
    }

    /// A copy of the path grown by one bit on the high side.
    pub fn prepend(&self, bit: bool) -> Self {
        let mut grown = BitVec::with_capacity(self.0.len() + 1);
        grown.push(bit);
        grown.extend_from_bitslice(&self.0);
        Self(grown)
    }

    /// The path as a right-aligned field element.
    pub fn to_felt(&self) -> Felt {
        let mut buf = [0u8; FELT_LENGTH];
        buf.view_bits_mut::<Msb0>()[8 * FELT_LENGTH - self.0.len()..]
            .copy_from_bitslice(&self.0);
        Felt::from_bytes_be(&buf)
    }

    /// The minimal big-endian byte encoding of the path, `⌈len/8⌉` bytes.
    pub fn bytes(&self) -> Vec<u8> {
        let felt_bytes = self.to_felt().to_bytes_be();
        felt_bytes[FELT_LENGTH - self.0.len().div_ceil(8)..].to_vec()
    }
}
