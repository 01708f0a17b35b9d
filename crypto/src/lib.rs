//! Cryptographic primitives for the Tessera state commitment engine.
//!
//! Re-exports the Starknet field element ([`Felt`], an unsigned integer modulo
//! the 252-bit Starknet prime) together with the canonical hex/byte codecs
//! used across the persisted key formats, and the two-argument Pedersen
//! digest that every commitment in the state trie is built from.

pub mod felt;
pub mod pedersen;

pub use felt::FeltError;
pub use pedersen::{contract_state_hash, pedersen_hash};
pub use starknet_types_core::felt::Felt;
