//! Per-block state mutation records.
//!
//! A [`StateDiff`] is the authoritative description of what one block changed:
//! the contracts it deployed and the storage slots it wrote. Collaborators
//! that fetch diffs off the wire deliver them as hex strings; [`RawStateDiff`]
//! mirrors that shape and converts fallibly into the typed form.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tessera_crypto::{felt, Felt};

use crate::error::StateError;

/// A contract deployment within one block.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeployedContract {
    /// Address the contract was deployed to
    pub address: Felt,
    /// Hash of the contract class
    pub class_hash: Felt,
    /// Constructor arguments recorded with the deployment
    #[serde(default)]
    pub constructor_calldata: Vec<Felt>,
}

/// A single storage slot write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StorageEntry {
    /// Storage slot key
    pub key: Felt,
    /// New slot value; zero clears the slot
    pub value: Felt,
}

/// Everything one block changed in the state.
///
/// Deployments and the per-contract entry lists are ordered as the source
/// ordered them; `storage_diffs` preserves insertion order so replaying the
/// same diffs always applies the same writes in the same sequence.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StateDiff {
    /// Contracts deployed in this block, in source order
    #[serde(default)]
    pub deployed_contracts: Vec<DeployedContract>,
    /// Storage writes per contract address, in source order
    #[serde(default)]
    pub storage_diffs: IndexMap<Felt, Vec<StorageEntry>>,
}

/// Wire form of a deployment, all fields hex strings.
#[derive(Debug, Clone, Deserialize)]
pub struct RawDeployedContract {
    /// Contract address
    pub address: String,
    /// Contract class hash
    pub contract_hash: String,
    /// Constructor arguments
    #[serde(default)]
    pub constructor_calldata: Vec<String>,
}

/// Wire form of a storage slot write.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStorageEntry {
    /// Storage slot key
    pub key: String,
    /// New slot value
    pub value: String,
}

/// Wire form of a state diff, as delivered by the feeder collaborators.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RawStateDiff {
    /// Deployed contracts
    #[serde(default)]
    pub deployed_contracts: Vec<RawDeployedContract>,
    /// Storage writes keyed by contract address hex
    #[serde(default)]
    pub storage_diffs: IndexMap<String, Vec<RawStorageEntry>>,
}

impl TryFrom<RawStateDiff> for StateDiff {
    type Error = StateError;

    fn try_from(raw: RawStateDiff) -> Result<Self, Self::Error> {
        let mut deployed_contracts = Vec::with_capacity(raw.deployed_contracts.len());
        for contract in raw.deployed_contracts {
            deployed_contracts.push(DeployedContract {
                address: felt::from_hex(&contract.address)?,
                class_hash: felt::from_hex(&contract.contract_hash)?,
                constructor_calldata: contract
                    .constructor_calldata
                    .iter()
                    .map(|data| felt::from_hex(data))
                    .collect::<Result<_, _>>()?,
            });
        }

        let mut storage_diffs = IndexMap::with_capacity(raw.storage_diffs.len());
        for (address, entries) in raw.storage_diffs {
            let entries = entries
                .iter()
                .map(|entry| {
                    Ok(StorageEntry {
                        key: felt::from_hex(&entry.key)?,
                        value: felt::from_hex(&entry.value)?,
                    })
                })
                .collect::<Result<Vec<_>, StateError>>()?;
            storage_diffs.insert(felt::from_hex(&address)?, entries);
        }

        Ok(StateDiff {
            deployed_contracts,
            storage_diffs,
        })
    }
}
