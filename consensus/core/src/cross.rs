//! Cross-chain collateral types. Their accounting is owned by the cross-chain
//! subsystem, the acceptance pipeline only selects and forwards them.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The cross-chain era a block height falls into
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrossChainEra {
    /// Before the cross-chain feature was introduced, no entangle state applies
    PreBeacon,
    /// Between the beacon and conversion heights, a transitional state derived from collateral
    Beacon,
    /// From the conversion height on, the materialized entangle state
    Converted,
}

/// A staking participant's pledge as recorded by the collateral subsystem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PledgeInfo {
    pub id: u64,
    pub address: String,
    pub staking_amount: u64,
    pub coinbase_addresses: Vec<String>,
}

/// Snapshot of all pledges as of some block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CollateralState {
    pub pledge_infos: Vec<PledgeInfo>,
}

/// A cross-chain binding record for one exchange participant
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BeaconAddressInfo {
    pub exchange_id: u64,
    pub address: String,
    pub staking_amount: u64,
    pub coinbase_addresses: Vec<String>,
}

impl From<&PledgeInfo> for BeaconAddressInfo {
    fn from(pledge: &PledgeInfo) -> Self {
        Self {
            exchange_id: pledge.id,
            address: pledge.address.clone(),
            staking_amount: pledge.staking_amount,
            coinbase_addresses: pledge.coinbase_addresses.clone(),
        }
    }
}

/// Address-keyed cross-chain bindings valid as of a specific parent block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntangleState {
    pub en_infos: BTreeMap<String, BeaconAddressInfo>,
}

impl EntangleState {
    /// Builds the transitional view from a collateral snapshot, one binding per pledge keyed by
    /// the pledge address. A later pledge of the same address replaces an earlier one.
    pub fn from_collateral(state: &CollateralState) -> Self {
        Self { en_infos: state.pledge_infos.iter().map(|pledge| (pledge.address.clone(), BeaconAddressInfo::from(pledge))).collect() }
    }

    pub fn get(&self, address: &str) -> Option<&BeaconAddressInfo> {
        self.en_infos.get(address)
    }

    pub fn len(&self) -> usize {
        self.en_infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.en_infos.is_empty()
    }
}
