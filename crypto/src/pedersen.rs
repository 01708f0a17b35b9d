//! The Starknet Pedersen digest and the contract-state leaf formula.

use starknet_types_core::felt::Felt;
use starknet_types_core::hash::{Pedersen, StarkHash};

/// Computes the two-argument Pedersen digest `P(a, b)`.
///
/// Uses the published Starknet constant points; the result matches the
/// commitment scheme of every conforming Starknet node bit for bit.
pub fn pedersen_hash(a: &Felt, b: &Felt) -> Felt {
    Pedersen::hash(a, b)
}

/// Computes the value stored in the global state trie for a contract.
///
/// Defined as `P(P(P(class_hash, storage_root), 0), 0)`.
pub fn contract_state_hash(class_hash: &Felt, storage_root: &Felt) -> Felt {
    let value = pedersen_hash(class_hash, storage_root);
    let value = pedersen_hash(&value, &Felt::ZERO);
    pedersen_hash(&value, &Felt::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::felt::from_hex;

    // Test vector from the published Starknet crypto suite.
    #[test]
    fn test_pedersen_known_vector() {
        let a = from_hex("0x03d937c035c878245caf64531a5756109c53068da139362728feb561405371cb")
            .unwrap();
        let b = from_hex("0x0208a0a10250e382e1e4bbe2880906c2791bf6275695e02fbbc6aeff9cd8b31a")
            .unwrap();
        let expected =
            from_hex("0x030e480bed5fe53fa909cc0f8c4d99b8f9f2c016be4c41e13a4848797979c662")
                .unwrap();
        assert_eq!(pedersen_hash(&a, &b), expected);
    }

    #[test]
    fn test_pedersen_is_order_sensitive() {
        let a = Felt::ONE;
        let b = Felt::TWO;
        assert_ne!(pedersen_hash(&a, &b), pedersen_hash(&b, &a));
    }

    #[test]
    fn test_contract_state_hash_structure() {
        let class_hash = from_hex("0xcafe").unwrap();
        let storage_root = from_hex("0x7").unwrap();
        let inner = pedersen_hash(&class_hash, &storage_root);
        let middle = pedersen_hash(&inner, &Felt::ZERO);
        let expected = pedersen_hash(&middle, &Felt::ZERO);
        assert_eq!(contract_state_hash(&class_hash, &storage_root), expected);
    }
}
