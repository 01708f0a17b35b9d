//! The binary Merkle-Patricia trie.
//!
//! Keys are field elements walked most-significant bit first over a fixed
//! height; values are field elements. Runs of single-child nodes are
//! compressed into edge nodes, so a subtree holding exactly one key is a
//! single edge whose path is the remaining key bits and whose bottom is the
//! value.
//!
//! The trie is a DAG of immutable content-addressed nodes: cross-node
//! references are hashes resolved through the [`NodeStore`], and an update
//! writes fresh nodes along the mutation path while old nodes stay on disk
//! under their hashes. Binary nodes store no child hashes of their own;
//! traversal recovers them by looking up the stored Pedersen pair of the
//! node's bottom digest.

use tessera_crypto::Felt;
use tessera_storage::{KvRead, KvStore};

use crate::error::{TrieError, TrieResult};
use crate::node::Node;
use crate::path::{BitPath, MAX_PATH_LEN};
use crate::store::NodeStore;

/// Height of the Starknet state and storage tries.
pub const TRIE_HEIGHT: usize = MAX_PATH_LEN;

/// A binary Merkle-Patricia trie over a key-value store.
pub struct Trie<'s, S> {
    root: Option<Node>,
    nodes: NodeStore<'s, S>,
    height: usize,
}

impl<'s, S: KvRead> Trie<'s, S> {
    /// Open a trie at the given root hash.
    ///
    /// A zero root denotes the empty trie; any other root must be present in
    /// the store or the call fails with [`TrieError::NotFound`].
    pub fn new(store: &'s S, root: Felt, height: usize) -> TrieResult<Self> {
        debug_assert!(height <= MAX_PATH_LEN);
        let nodes = NodeStore::new(store);
        let root = if root == Felt::ZERO {
            None
        } else {
            Some(nodes.retrieve_node(&root)?)
        };
        Ok(Self {
            root,
            nodes,
            height,
        })
    }

    /// The hash of the root node, zero for the empty trie.
    pub fn root_hash(&self) -> Felt {
        match &self.root {
            Some(node) => node.hash(),
            None => Felt::ZERO,
        }
    }

    /// The trie height.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Look up the value stored under `key`.
    pub fn get(&self, key: &Felt) -> TrieResult<Option<Felt>> {
        let Some(root) = &self.root else {
            return Ok(None);
        };

        let path = BitPath::from_felt(key, self.height);
        let mut walked = 0;
        let mut curr = root.clone();
        while walked < self.height {
            if curr.path.is_empty() {
                // Binary node: recover the child hashes from the stored
                // Pedersen pair and take the branch selected by the key bit.
                let (left, right) = self.nodes.retrieve_pair(&curr.bottom)?;
                let next = if path.get(walked) { right } else { left };
                curr = self.nodes.retrieve_node(&next)?;
                walked += 1;
            } else if curr.path.longest_common_prefix(&path.walked(walked)) == curr.path.len() {
                // Edge node matching the key: consume the whole edge path.
                // Its bottom is the bottom of the binary node or leaf the
                // edge links to, so the replacement node has an empty path.
                walked += curr.path.len();
                curr = Node::new(BitPath::empty(), curr.bottom);
            } else {
                // Edge node diverging from the key: not in the trie.
                return Ok(None);
            }
        }
        Ok(Some(curr.bottom))
    }

    /// Walk towards `key`, recording the hash of the untaken sibling at every
    /// level that has one.
    ///
    /// Returns the node the walk ended on: the full-height leaf if the key is
    /// present, `None` if the walk diverged or the trie is empty.
    fn descend(&self, path: &BitPath, siblings: &mut [Option<Felt>]) -> TrieResult<Option<Node>> {
        let mut curr = self.root.clone();
        let mut walked = 0;
        while walked < self.height {
            let Some(node) = curr.take() else { break };
            if node.path.is_empty() {
                let (left, right) = self.nodes.retrieve_pair(&node.bottom)?;
                let (next, sibling) = if path.get(walked) {
                    (right, left)
                } else {
                    (left, right)
                };
                siblings[walked] = Some(sibling);
                curr = Some(self.nodes.retrieve_node(&next)?);
                walked += 1;
                continue;
            }

            let lcp = node.path.longest_common_prefix(&path.walked(walked));
            if lcp == 0 {
                // The edge diverges on its first bit, so the node one step
                // into the edge's own path is our sibling at this level. The
                // key is not in the trie below here.
                siblings[walked] = Some(Node::new(node.path.walked(1), node.bottom).hash());
                break;
            }
            // Walk down `lcp` steps of the edge.
            curr = Some(Node::new(node.path.walked(lcp), node.bottom));
            walked += lcp;
        }
        Ok(curr)
    }
}

impl<'s, S: KvStore> Trie<'s, S> {
    /// Insert or overwrite the value stored under `key`.
    ///
    /// A zero value removes the key: the canonical form of a trie never holds
    /// zero-valued leaves, so `put(key, 0)` of an absent key is a no-op.
    pub fn put(&mut self, key: &Felt, value: &Felt) -> TrieResult<()> {
        if *value == Felt::ZERO {
            return match self.delete(key) {
                Err(TrieError::NotFound) => Ok(()),
                result => result,
            };
        }

        let path = BitPath::from_felt(key, self.height);
        let mut siblings = vec![None; self.height];
        self.descend(&path, &mut siblings)?;

        // Rebuild bottom-up from the new leaf. A level with a recorded
        // sibling becomes a binary node; any other level extends the current
        // node's path by one bit on the high side. Nodes and Pedersen pairs
        // are persisted before the parent that links to them.
        let mut curr = Node::new(BitPath::empty(), *value);
        let mut hash = self.nodes.store_node(&curr)?;
        for i in (0..path.len()).rev() {
            curr = match siblings[i] {
                Some(sibling) => {
                    let (left, right) = if path.get(i) {
                        (sibling, hash)
                    } else {
                        (hash, sibling)
                    };
                    Node::new(BitPath::empty(), self.nodes.digest(&left, &right)?)
                }
                None => Node::new(curr.path.prepend(path.get(i)), curr.bottom),
            };
            hash = self.nodes.store_node(&curr)?;
        }

        self.root = Some(curr);
        Ok(())
    }

    /// Remove the value stored under `key`.
    ///
    /// Fails with [`TrieError::NotFound`] if the key is absent.
    pub fn delete(&mut self, key: &Felt) -> TrieResult<()> {
        let path = BitPath::from_felt(key, self.height);
        let mut siblings = vec![None; self.height];
        if self.descend(&path, &mut siblings)?.is_none() {
            return Err(TrieError::NotFound);
        }

        // Rebuild bottom-up from nothing. The deepest level with a sibling
        // materializes a replacement node: the sibling node absorbs one more
        // path bit, the complement of the deleted key's bit at that level.
        // Levels above combine as in an insert.
        let mut curr: Option<Node> = None;
        let mut hash = Felt::ZERO;
        for i in (0..path.len()).rev() {
            let next = match (siblings[i], curr.take()) {
                (Some(sibling), None) => {
                    let sibling = self.nodes.retrieve_node(&sibling)?;
                    Node::new(sibling.path.prepend(!path.get(i)), sibling.bottom)
                }
                (Some(sibling), Some(_)) => {
                    let (left, right) = if path.get(i) {
                        (sibling, hash)
                    } else {
                        (hash, sibling)
                    };
                    Node::new(BitPath::empty(), self.nodes.digest(&left, &right)?)
                }
                (None, Some(node)) => Node::new(node.path.prepend(path.get(i)), node.bottom),
                (None, None) => continue,
            };
            hash = self.nodes.store_node(&next)?;
            curr = Some(next);
        }

        self.root = curr;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tessera_crypto::felt::from_hex;
    use tessera_crypto::pedersen_hash;
    use tessera_storage::MemStore;

    fn felt(hex: &str) -> Felt {
        from_hex(hex).unwrap()
    }

    #[test]
    fn test_empty_trie_root_is_zero() {
        let store = MemStore::new();
        let trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        assert_eq!(trie.root_hash(), Felt::ZERO);
        assert_eq!(trie.get(&Felt::ONE).unwrap(), None);
    }

    #[test]
    fn test_single_put_root_hash() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        trie.put(&Felt::ONE, &Felt::TWO).unwrap();

        // One key means one edge of length 251 with the value as bottom.
        let expected = pedersen_hash(&Felt::TWO, &Felt::ONE) + Felt::from(251u64);
        assert_eq!(trie.root_hash(), expected);
        assert_eq!(trie.get(&Felt::ONE).unwrap(), Some(Felt::TWO));
    }

    #[test]
    fn test_get_absent_keys() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        trie.put(&felt("0x123"), &felt("0x456")).unwrap();

        assert_eq!(trie.get(&felt("0x124")).unwrap(), None);
        assert_eq!(trie.get(&felt("0x1230")).unwrap(), None);
        assert_eq!(trie.get(&Felt::ZERO).unwrap(), None);
    }

    #[test]
    fn test_overwrite_and_idempotence() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();

        trie.put(&felt("0x5"), &felt("0x6")).unwrap();
        let first = trie.root_hash();

        trie.put(&felt("0x5"), &felt("0x7")).unwrap();
        assert_ne!(trie.root_hash(), first);
        assert_eq!(trie.get(&felt("0x5")).unwrap(), Some(felt("0x7")));

        let overwritten = trie.root_hash();
        trie.put(&felt("0x5"), &felt("0x7")).unwrap();
        assert_eq!(trie.root_hash(), overwritten);
    }

    #[test]
    fn test_put_then_delete_restores_root() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();

        trie.put(&felt("0xa"), &felt("0x1")).unwrap();
        trie.put(&felt("0xb"), &felt("0x2")).unwrap();
        let before = trie.root_hash();

        trie.put(&felt("0xc0ffee"), &felt("0x3")).unwrap();
        trie.delete(&felt("0xc0ffee")).unwrap();
        assert_eq!(trie.root_hash(), before);
    }

    #[test]
    fn test_insertion_order_independence() {
        let pairs = [
            ("0x1", "0x10"),
            ("0x2", "0x20"),
            ("0x1000000", "0x30"),
            ("0x7fffffff", "0x40"),
        ];

        let store_a = MemStore::new();
        let mut trie_a = Trie::new(&store_a, Felt::ZERO, TRIE_HEIGHT).unwrap();
        for (k, v) in pairs {
            trie_a.put(&felt(k), &felt(v)).unwrap();
        }

        let store_b = MemStore::new();
        let mut trie_b = Trie::new(&store_b, Felt::ZERO, TRIE_HEIGHT).unwrap();
        for (k, v) in pairs.iter().rev() {
            trie_b.put(&felt(k), &felt(v)).unwrap();
        }

        assert_eq!(trie_a.root_hash(), trie_b.root_hash());
    }

    #[test]
    fn test_last_bit_siblings_collapse_on_delete() {
        // Keys 0x0 and 0x1 differ only in the last bit: they share a 250-bit
        // edge down to a binary node over two leaves. Deleting one must
        // collapse the structure back to a single 251-bit edge.
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        trie.put(&felt("0x0"), &felt("0x111")).unwrap();
        let single = trie.root_hash();

        trie.put(&felt("0x1"), &felt("0x222")).unwrap();
        assert_eq!(trie.get(&felt("0x0")).unwrap(), Some(felt("0x111")));
        assert_eq!(trie.get(&felt("0x1")).unwrap(), Some(felt("0x222")));

        trie.delete(&felt("0x1")).unwrap();
        assert_eq!(trie.root_hash(), single);
        assert_eq!(trie.get(&felt("0x1")).unwrap(), None);
    }

    #[test]
    fn test_delete_absent_key_fails() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        assert!(matches!(trie.delete(&felt("0x1")), Err(TrieError::NotFound)));

        trie.put(&felt("0x1"), &felt("0x2")).unwrap();
        assert!(matches!(trie.delete(&felt("0x3")), Err(TrieError::NotFound)));
    }

    #[test]
    fn test_delete_last_key_empties_trie() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        trie.put(&felt("0x9"), &felt("0x8")).unwrap();
        trie.delete(&felt("0x9")).unwrap();
        assert_eq!(trie.root_hash(), Felt::ZERO);
    }

    #[test]
    fn test_put_zero_value_is_delete() {
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();

        trie.put(&felt("0x1"), &felt("0x2")).unwrap();
        let with_key = trie.root_hash();
        trie.put(&felt("0x3"), &felt("0x4")).unwrap();

        trie.put(&felt("0x3"), &Felt::ZERO).unwrap();
        assert_eq!(trie.root_hash(), with_key);
        assert_eq!(trie.get(&felt("0x3")).unwrap(), None);

        // Zeroing an absent key leaves the trie untouched.
        trie.put(&felt("0x5"), &Felt::ZERO).unwrap();
        assert_eq!(trie.root_hash(), with_key);
    }

    #[test]
    fn test_reopen_from_committed_root() {
        let store = MemStore::new();
        let root = {
            let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
            trie.put(&felt("0xaaa"), &felt("0x1")).unwrap();
            trie.put(&felt("0xbbb"), &felt("0x2")).unwrap();
            trie.root_hash()
        };

        let reopened = Trie::new(&store, root, TRIE_HEIGHT).unwrap();
        assert_eq!(reopened.root_hash(), root);
        assert_eq!(reopened.get(&felt("0xaaa")).unwrap(), Some(felt("0x1")));
        assert_eq!(reopened.get(&felt("0xbbb")).unwrap(), Some(felt("0x2")));
        assert_eq!(reopened.get(&felt("0xccc")).unwrap(), None);
    }

    #[test]
    fn test_open_unknown_root_fails() {
        let store = MemStore::new();
        assert!(matches!(
            Trie::new(&store, felt("0xdead"), TRIE_HEIGHT),
            Err(TrieError::NotFound)
        ));
    }

    #[test]
    fn test_divergent_edge_insert_and_lookup() {
        // Force a split in the middle of an edge: 0x10 and 0x17 share all but
        // the low three bits.
        let store = MemStore::new();
        let mut trie = Trie::new(&store, Felt::ZERO, TRIE_HEIGHT).unwrap();
        trie.put(&felt("0x10"), &felt("0x1")).unwrap();
        trie.put(&felt("0x17"), &felt("0x2")).unwrap();

        assert_eq!(trie.get(&felt("0x10")).unwrap(), Some(felt("0x1")));
        assert_eq!(trie.get(&felt("0x17")).unwrap(), Some(felt("0x2")));
        assert_eq!(trie.get(&felt("0x11")).unwrap(), None);
        assert_eq!(trie.get(&felt("0x16")).unwrap(), None);
    }
}
