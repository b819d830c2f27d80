// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::path::PathBuf;

use clap::Parser;
use sflow_client::Address;

use crate::Command;
use crate::settings::{LogFormat, LogLevel};

#[derive(Parser, Debug)]
#[command(
    version,
    about = "Submit sFlow liquid staking transactions to a Flow access node."
)]
pub(crate) struct ClientArgs {
    /// Directory to store user data [default: `$HOME/.sflow/sflow-client`]
    #[arg(short, long)]
    pub profile: Option<PathBuf>,

    /// Network to connect to
    #[arg(short, long)]
    pub network: Option<String>,

    /// The access node fully qualified URL
    #[arg(long)]
    pub access: Option<String>,

    /// Account signing and authorizing the transactions
    #[arg(long, env = "SFLOW_SIGNER_ADDRESS")]
    pub signer_address: Option<Address>,

    /// Hex encoded secp256k1 private key of the signer account
    #[arg(long, env = "SFLOW_SIGNER_KEY", hide_env_values = true)]
    pub signer_key: Option<String>,

    /// Index of the signer key in its account
    #[arg(long, default_value_t = 0)]
    pub signer_key_index: u32,

    /// Account paying the fees instead of the signer
    #[arg(long, env = "SFLOW_PAYER_ADDRESS", requires = "payer_key")]
    pub payer_address: Option<Address>,

    /// Hex encoded secp256k1 private key of the payer account
    #[arg(long, env = "SFLOW_PAYER_KEY", hide_env_values = true)]
    pub payer_key: Option<String>,

    /// Index of the payer key in its account
    #[arg(long, default_value_t = 0)]
    pub payer_key_index: u32,

    /// Output log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Logging output type
    #[arg(long, value_enum, default_value_t = LogFormat::Coloured)]
    pub log_type: LogFormat,

    /// Command
    #[command(subcommand)]
    pub command: Command,
}
