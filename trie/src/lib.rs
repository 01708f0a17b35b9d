//! Tessera Trie
//!
//! The height-251 binary Merkle-Patricia trie that commits Starknet state.
//!
//! # Architecture
//!
//! - [`path`]: bounded bit-strings addressing trie positions
//! - [`node`]: compressed-edge nodes, their hashes, and the wire format
//! - [`store`]: the content-addressed node and Pedersen-pair keyspaces
//! - [`tree`]: traversal and the two-phase update algorithms
//!
//! The trie owns no storage of its own; it reads and writes through the
//! [`KvRead`](tessera_storage::KvRead)/[`KvStore`](tessera_storage::KvStore)
//! handles of `tessera-storage`, so atomicity and crash safety come from the
//! enclosing transaction.

pub mod error;
pub mod node;
pub mod path;
pub mod store;
pub mod tree;

pub use error::{TrieError, TrieResult};
pub use node::Node;
pub use path::{BitPath, MAX_PATH_LEN};
pub use store::NodeStore;
pub use tree::{Trie, TRIE_HEIGHT};
