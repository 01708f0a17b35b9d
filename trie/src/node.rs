//! Trie nodes and their hashing and wire format.

use serde::de::Error as DeError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tessera_crypto::{felt, pedersen_hash, Felt};

use crate::path::{BitPath, MAX_PATH_LEN};

/// A node in the trie, in compressed-edge form.
///
/// One shape covers all three node kinds:
///
/// - a **leaf** has an empty path and holds the stored value in `bottom`;
/// - a **binary** node has an empty path and `bottom = P(H(left), H(right))`;
/// - an **edge** node has a non-empty path and stands for a chain of
///   single-child steps down to the node whose hash is `bottom`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Compressed edge path; empty for leaves and binary nodes.
    pub path: BitPath,
    /// Stored value, child-pair digest, or linked-node hash.
    pub bottom: Felt,
}

impl Node {
    /// Create a node from its parts.
    pub fn new(path: BitPath, bottom: Felt) -> Self {
        Self { path, bottom }
    }

    /// The node hash as defined by the Starknet commitment scheme.
    ///
    /// `bottom` for a node with an empty path, otherwise
    /// `P(bottom, path) + path.len()` in the field.
    pub fn hash(&self) -> Felt {
        if self.path.is_empty() {
            return self.bottom;
        }
        pedersen_hash(&self.bottom, &self.path.to_felt()) + Felt::from(self.path.len() as u64)
    }
}

/// Wire form of a node: `{"length": …, "path": "0x…", "bottom": "0x…"}`.
#[derive(Serialize, Deserialize)]
struct NodeRepr {
    length: usize,
    path: String,
    bottom: String,
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        NodeRepr {
            length: self.path.len(),
            path: felt::to_hex(&self.path.to_felt()),
            bottom: felt::to_hex(&self.bottom),
        }
        .serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let repr = NodeRepr::deserialize(deserializer)?;
        if repr.length > MAX_PATH_LEN {
            return Err(D::Error::custom(format!(
                "node path length {} exceeds {}",
                repr.length, MAX_PATH_LEN
            )));
        }
        let path = felt::from_hex(&repr.path).map_err(D::Error::custom)?;
        let bottom = felt::from_hex(&repr.bottom).map_err(D::Error::custom)?;
        Ok(Node {
            path: BitPath::from_felt(&path, repr.length),
            bottom,
        })
    }
}
