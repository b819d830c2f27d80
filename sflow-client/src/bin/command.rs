// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;

use clap::Subcommand;
use sflow_client::{Address, Client, Operation, Receipt, UFix64};

use crate::settings::Settings;

/// Commands that can be run against the sFlow contracts
#[derive(PartialEq, Eq, Hash, Clone, Subcommand, Debug)]
pub(crate) enum Command {
    /// Create the sFlow vault of the signer account, if missing
    InitAccount,

    /// Create a staking collection in the signer account
    SetupStakeCollection,

    /// Store a staking manager in the signer account
    SetupManagerAccount,

    /// Hand the manager capability to the manager at an address
    SetManagerCapability {
        /// Address of the staking manager account
        #[arg(long)]
        address: Address,
    },

    /// Let the staking manager process its collection
    ManageCollection,

    /// Stake FLOW and receive sFlow
    Stake {
        /// Amount of FLOW to stake
        #[arg(long)]
        amount: UFix64,
    },

    /// Return sFlow and receive FLOW
    Unstake {
        /// Amount of sFlow to return
        #[arg(long)]
        amount: UFix64,
    },

    /// Stake new tokens to a node, or to one of its delegators
    StakeNewTokens {
        /// Node id
        #[arg(long)]
        node_id: String,
        /// Delegator id [default: stake to the node itself]
        #[arg(long)]
        delegator_id: Option<u32>,
        /// Amount of FLOW to stake
        #[arg(long)]
        amount: UFix64,
    },

    /// Register a delegator to a node with an initial stake
    RegisterDelegator {
        /// Node id
        #[arg(long)]
        node_id: String,
        /// Initial stake
        #[arg(long)]
        amount: UFix64,
    },

    /// List the operations and their parameters
    Operations,

    /// Show current settings
    Settings,
}

impl Command {
    /// Returns `true` if the command submits a transaction
    pub fn submits(&self) -> bool {
        !matches!(self, Self::Operations | Self::Settings)
    }

    /// Runs the command with the provided client
    pub async fn run(
        self,
        client: &Client,
        settings: &Settings,
    ) -> anyhow::Result<RunResult> {
        // only submissions need keys
        let roles = settings.roles();

        let receipt = match self {
            Command::InitAccount => client.init_account(&roles?).await?,
            Command::SetupStakeCollection => {
                client.setup_stake_collection(&roles?).await?
            }
            Command::SetupManagerAccount => {
                client.setup_manager_account(&roles?).await?
            }
            Command::SetManagerCapability { address } => {
                client.set_manager_capability(&roles?, address).await?
            }
            Command::ManageCollection => {
                client.manage_collection(&roles?).await?
            }
            Command::Stake { amount } => client.stake(&roles?, amount).await?,
            Command::Unstake { amount } => {
                client.unstake(&roles?, amount).await?
            }
            Command::StakeNewTokens {
                node_id,
                delegator_id,
                amount,
            } => {
                client
                    .stake_new_tokens(&roles?, node_id, delegator_id, amount)
                    .await?
            }
            Command::RegisterDelegator { node_id, amount } => {
                client.register_delegator(&roles?, node_id, amount).await?
            }
            Command::Operations => return Ok(RunResult::Operations),
            Command::Settings => return Ok(RunResult::Settings()),
        };

        Ok(RunResult::Tx(receipt))
    }
}

/// Possible results of running a command
pub enum RunResult {
    Tx(Receipt),
    Operations,
    Settings(),
}

impl fmt::Display for RunResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use RunResult::*;
        match self {
            Tx(receipt) => {
                write!(f, "> Transaction sealed: {}", receipt.id)?;
                if let Some(block) = receipt.block_id {
                    write!(f, "\n> Block: {block}")?;
                }
                write!(
                    f,
                    "\n> Computation used: {}",
                    receipt.computation_used
                )?;
                for event in &receipt.events {
                    write!(f, "\n> Event: {}", event.ty)?;
                }
                Ok(())
            }
            Operations => {
                let lines: Vec<String> = Operation::ALL
                    .iter()
                    .map(|op| {
                        let params: Vec<String> = op
                            .descriptor()
                            .params
                            .iter()
                            .map(|p| format!("{}: {}", p.name, p.ty))
                            .collect();
                        format!("> {op}({})", params.join(", "))
                    })
                    .collect();
                write!(f, "{}", lines.join("\n"))
            }
            Settings() => Ok(()),
        }
    }
}
