// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! The catalogue of operations the client can submit.
//!
//! Each [`Operation`] maps to one immutable [`OperationDescriptor`] bundling
//! the Cadence script, its ordered parameter schema and the number of
//! accounts that must authorize it. Scripts import contracts through
//! aliases (`import FlowToken from 0xFlowToken`) that are resolved against
//! the configured [`Contracts`] right before submission.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::argument::ParamType;
use crate::{Address, Error};

/// A named, typed parameter of an operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Param {
    /// Name of the parameter in the script
    pub name: &'static str,
    /// Declared type
    pub ty: ParamType,
}

const fn param(name: &'static str, ty: ParamType) -> Param {
    Param { name, ty }
}

/// Immutable description of one submittable operation
#[derive(Debug, PartialEq, Eq)]
pub struct OperationDescriptor {
    /// Operation name
    pub name: &'static str,
    /// Cadence script with aliased imports
    pub script: &'static str,
    /// Ordered parameter schema
    pub params: &'static [Param],
    /// Number of authorizing accounts the script's `prepare` block takes
    pub authorizers: usize,
}

const AMOUNT: Param = param("amount", ParamType::UFix64);

static INIT_ACCOUNT: OperationDescriptor = OperationDescriptor {
    name: "init_account",
    script: include_str!("operation/scripts/init_account.cdc"),
    params: &[],
    authorizers: 1,
};

static SETUP_STAKE_COLLECTION: OperationDescriptor = OperationDescriptor {
    name: "setup_stake_collection",
    script: include_str!("operation/scripts/setup_stake_collection.cdc"),
    params: &[],
    authorizers: 1,
};

static SETUP_MANAGER_ACCOUNT: OperationDescriptor = OperationDescriptor {
    name: "setup_manager_account",
    script: include_str!("operation/scripts/setup_manager_account.cdc"),
    params: &[],
    authorizers: 1,
};

static SET_MANAGER_CAPABILITY: OperationDescriptor = OperationDescriptor {
    name: "set_manager_capability",
    script: include_str!("operation/scripts/set_manager_capability.cdc"),
    params: &[param("address", ParamType::Address)],
    authorizers: 1,
};

static MANAGE_COLLECTION: OperationDescriptor = OperationDescriptor {
    name: "manage_collection",
    script: include_str!("operation/scripts/manage_collection.cdc"),
    params: &[],
    authorizers: 1,
};

static STAKE: OperationDescriptor = OperationDescriptor {
    name: "stake",
    script: include_str!("operation/scripts/stake.cdc"),
    params: &[AMOUNT],
    authorizers: 1,
};

static UNSTAKE: OperationDescriptor = OperationDescriptor {
    name: "unstake",
    script: include_str!("operation/scripts/unstake.cdc"),
    params: &[AMOUNT],
    authorizers: 1,
};

static STAKE_NEW_TOKENS: OperationDescriptor = OperationDescriptor {
    name: "stake_new_tokens",
    script: include_str!("operation/scripts/stake_new_tokens.cdc"),
    params: &[
        param("nodeID", ParamType::String),
        param("delegatorID", ParamType::Optional(&ParamType::UInt32)),
        AMOUNT,
    ],
    authorizers: 1,
};

static REGISTER_DELEGATOR: OperationDescriptor = OperationDescriptor {
    name: "register_delegator",
    script: include_str!("operation/scripts/register_delegator.cdc"),
    params: &[param("id", ParamType::String), AMOUNT],
    authorizers: 1,
};

/// Operations exposed by the sFlow staking contracts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// Create the sFlow vault and publish its receiver and balance
    /// capabilities, unless already done
    InitAccount,
    /// Create a staking collection, moving existing node and delegator
    /// objects into it
    SetupStakeCollection,
    /// Store a staking manager instance and publish it
    SetupManagerAccount,
    /// Hand the manager capability to the instance published at an address
    SetManagerCapability,
    /// Let the staking manager process its collection
    ManageCollection,
    /// Stake FLOW and receive sFlow
    Stake,
    /// Return sFlow to the staking manager
    Unstake,
    /// Commit new tokens to a node or delegator of the staking collection
    StakeNewTokens,
    /// Register a delegator to a node in the staking collection
    RegisterDelegator,
}

impl Operation {
    /// Every operation, in catalogue order
    pub const ALL: [Operation; 9] = [
        Self::InitAccount,
        Self::SetupStakeCollection,
        Self::SetupManagerAccount,
        Self::SetManagerCapability,
        Self::ManageCollection,
        Self::Stake,
        Self::Unstake,
        Self::StakeNewTokens,
        Self::RegisterDelegator,
    ];

    /// Returns the descriptor of the operation
    pub fn descriptor(&self) -> &'static OperationDescriptor {
        match self {
            Self::InitAccount => &INIT_ACCOUNT,
            Self::SetupStakeCollection => &SETUP_STAKE_COLLECTION,
            Self::SetupManagerAccount => &SETUP_MANAGER_ACCOUNT,
            Self::SetManagerCapability => &SET_MANAGER_CAPABILITY,
            Self::ManageCollection => &MANAGE_COLLECTION,
            Self::Stake => &STAKE,
            Self::Unstake => &UNSTAKE,
            Self::StakeNewTokens => &STAKE_NEW_TOKENS,
            Self::RegisterDelegator => &REGISTER_DELEGATOR,
        }
    }

    /// Returns the name of the operation
    pub fn name(&self) -> &'static str {
        self.descriptor().name
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Operation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|op| op.name() == s)
            .ok_or_else(|| format!("unknown operation `{s}`"))
    }
}

/// Addresses of the deployed contracts, keyed by the alias used in script
/// imports
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct Contracts(BTreeMap<String, Address>);

impl Contracts {
    /// Creates an empty table
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the address of a contract alias
    pub fn insert<S: Into<String>>(&mut self, alias: S, address: Address) {
        self.0.insert(alias.into(), address);
    }

    /// Sets the address of a contract alias and returns the table
    pub fn with<S: Into<String>>(mut self, alias: S, address: Address) -> Self {
        self.insert(alias, address);
        self
    }

    /// Returns the address of a contract alias
    pub fn get(&self, alias: &str) -> Option<Address> {
        self.0.get(alias).copied()
    }

    /// Overrides entries with the ones in `other`
    pub fn extend(&mut self, other: Contracts) {
        self.0.extend(other.0);
    }

    /// Iterates over aliases and addresses
    pub fn iter(&self) -> impl Iterator<Item = (&str, Address)> {
        self.0.iter().map(|(alias, address)| (alias.as_str(), *address))
    }

    /// Replaces every `import X from 0xAlias` with the configured address.
    ///
    /// Imports from literal addresses are left untouched.
    ///
    /// # Errors
    /// [`Error::UnresolvedImport`] if an alias has no configured address.
    pub fn resolve(&self, script: &str) -> Result<String, Error> {
        let mut resolved = String::with_capacity(script.len());

        for line in script.split_inclusive('\n') {
            let Some((start, alias)) = import_alias(line) else {
                resolved.push_str(line);
                continue;
            };

            match self.get(alias) {
                Some(address) => {
                    let end = start + 2 + alias.len();
                    resolved.push_str(&line[..start]);
                    resolved.push_str(&address.to_string());
                    resolved.push_str(&line[end..]);
                }
                None if alias.parse::<Address>().is_ok() => {
                    resolved.push_str(line)
                }
                None => return Err(Error::UnresolvedImport(alias.to_string())),
            }
        }

        Ok(resolved)
    }
}

/// Returns the byte offset of `0x` and the alias following it, for import
/// lines
fn import_alias(line: &str) -> Option<(usize, &str)> {
    if !line.trim_start().starts_with("import ") {
        return None;
    }
    let start = line.find(" from 0x")? + " from ".len();
    let alias = line[start + 2..].split_whitespace().next()?;
    Some((start, alias))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn emulator_contracts() -> Contracts {
        let service: Address = "0xf8d6e0586b0a20c7".parse().unwrap();
        Contracts::new()
            .with("FungibleToken", "0xee82856bf20e2aa6".parse().unwrap())
            .with("FlowToken", "0x0ae53cb6e3f42a79".parse().unwrap())
            .with("FlowIDTableStaking", service)
            .with("LockedTokens", service)
            .with("FlowStakingCollection", service)
            .with("sFlowToken4", service)
            .with("sFlowStakingManager18", service)
    }

    /// Returns the `name: Type` parameters declared by the script
    fn declared_params(script: &str) -> Vec<String> {
        let header = script
            .lines()
            .find(|l| l.starts_with("transaction"))
            .expect("transaction header");
        match header.split_once('(') {
            Some((_, rest)) => {
                let params = &rest[..rest.find(')').unwrap()];
                params
                    .split(',')
                    .map(str::trim)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string)
                    .collect()
            }
            None => vec![],
        }
    }

    #[test]
    fn schema_matches_scripts() {
        for op in Operation::ALL {
            let descriptor = op.descriptor();
            let schema: Vec<String> = descriptor
                .params
                .iter()
                .map(|p| format!("{}: {}", p.name, p.ty))
                .collect();
            assert_eq!(declared_params(descriptor.script), schema, "{op}");
            assert_eq!(descriptor.authorizers, 1, "{op}");
        }
    }

    #[test]
    fn names_round_trip() {
        for op in Operation::ALL {
            assert_eq!(op.name().parse::<Operation>().unwrap(), op);
        }
        assert!("withdraw".parse::<Operation>().is_err());
    }

    #[test]
    fn resolve_imports() {
        let contracts = emulator_contracts();
        let script = contracts.resolve(Operation::Stake.descriptor().script);
        let script = script.unwrap();

        let import = "import sFlowToken4 from 0xf8d6e0586b0a20c7\n";
        assert!(script.contains(import));
        assert!(script.contains("import FlowToken from 0x0ae53cb6e3f42a79\n"));
        assert!(!script.contains("0xFlowToken"));
        // only import lines change
        assert!(script.ends_with("}\n"));
        assert_eq!(
            script.lines().count(),
            Operation::Stake.descriptor().script.lines().count()
        );

        for op in Operation::ALL {
            contracts.resolve(op.descriptor().script).unwrap();
        }
    }

    #[test]
    fn literal_addresses_are_kept() {
        let script = "import FlowToken from 0x0ae53cb6e3f42a79\n";
        assert_eq!(Contracts::new().resolve(script).unwrap(), script);
    }

    #[test]
    fn missing_alias() {
        let mut contracts = emulator_contracts();
        contracts.0.remove("sFlowStakingManager18");

        let err = contracts
            .resolve(Operation::ManageCollection.descriptor().script)
            .unwrap_err();
        let Error::UnresolvedImport(alias) = err else {
            panic!("expected an unresolved import");
        };
        assert_eq!(alias, "sFlowStakingManager18");
    }
}
