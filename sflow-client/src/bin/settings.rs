// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use sflow_client::{
    Address, Contracts, Error, HttpLedger, LocalSigner, SignerRoles,
};
use tracing::Level;
use url::Url;

use crate::config::Network;
use crate::io::ClientArgs;

#[derive(clap::ValueEnum, Debug, Clone)]
pub(crate) enum LogFormat {
    Json,
    Plain,
    Coloured,
}

#[derive(clap::ValueEnum, Debug, Clone)]
pub(crate) enum LogLevel {
    /// Designates very low priority, often extremely verbose, information.
    Trace,
    /// Designates lower priority information.
    Debug,
    /// Designates useful information.
    Info,
    /// Designates hazardous situations.
    Warn,
    /// Designates very serious errors.
    Error,
}

#[derive(Debug)]
pub(crate) struct Logging {
    /// Max log level
    pub level: LogLevel,
    /// Log format
    pub format: LogFormat,
}

/// An account key as given on the command line
pub(crate) struct KeyArgs {
    address: Option<Address>,
    key: Option<String>,
    key_index: u32,
}

impl KeyArgs {
    fn is_set(&self) -> bool {
        self.key.is_some()
    }

    fn signer(&self, role: &str) -> Result<LocalSigner, Error> {
        let (Some(address), Some(key)) = (self.address, &self.key) else {
            return Err(Error::Authorization(format!(
                "The {role} needs both an address and a key"
            )));
        };
        LocalSigner::from_hex(address, self.key_index, key)
    }
}

impl fmt::Display for KeyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "{address} #{}", self.key_index)?,
            None => write!(f, "[No address]")?,
        }
        if self.is_set() {
            write!(f, " [Key set]")
        } else {
            write!(f, " [Key not set]")
        }
    }
}

#[derive(Debug)]
pub(crate) struct Settings {
    pub(crate) access: Url,
    pub(crate) poll_interval: Duration,
    pub(crate) seal_timeout: Option<Duration>,
    pub(crate) contracts: Contracts,

    pub(crate) logging: Logging,

    pub(crate) profile: PathBuf,
    pub(crate) signer: KeyArgs,
    pub(crate) payer: KeyArgs,
}

pub(crate) struct SettingsBuilder {
    profile: PathBuf,
    pub(crate) args: ClientArgs,
}

impl SettingsBuilder {
    pub fn profile(&self) -> &PathBuf {
        &self.profile
    }

    pub fn network(self, network: Network) -> Result<Settings, Error> {
        let args = self.args;

        let network = network.select(args.network.as_deref())?;

        let access = match args.access {
            Some(value) => Url::parse(&value)
                .map_err(|e| Error::Config(format!("{value}: {e}")))?,
            None => network.access,
        };

        let logging = Logging {
            level: args.log_level,
            format: args.log_type,
        };

        Ok(Settings {
            access,
            poll_interval: Duration::from_millis(network.poll_interval),
            seal_timeout: network.seal_timeout.map(Duration::from_secs),
            contracts: network.contracts,
            logging,
            profile: self.profile,
            signer: KeyArgs {
                address: args.signer_address,
                key: args.signer_key,
                key_index: args.signer_key_index,
            },
            payer: KeyArgs {
                address: args.payer_address,
                key: args.payer_key,
                key_index: args.payer_key_index,
            },
        })
    }
}

impl Settings {
    pub fn args(args: ClientArgs) -> Result<SettingsBuilder, Error> {
        let profile = if let Some(path) = &args.profile {
            path.clone()
        } else {
            let mut path = dirs::home_dir().ok_or(Error::OsNotSupported)?;
            path.push(".sflow");
            path.push(env!("CARGO_BIN_NAME"));
            path
        };

        Ok(SettingsBuilder { profile, args })
    }

    /// Builds the signer roles: the signer in every role, unless a payer
    /// key sponsors the fees
    pub fn roles(&self) -> Result<SignerRoles, Error> {
        let signer = Arc::new(self.signer.signer("signer")?);

        if self.payer.is_set() {
            let payer = Arc::new(self.payer.signer("payer")?);
            Ok(SignerRoles::sponsored(signer, payer))
        } else {
            Ok(SignerRoles::single(signer))
        }
    }

    pub async fn check_access_con(&self) -> Result<(), Error> {
        HttpLedger::new(self.access.as_str())?.check_connection().await
    }
}

impl fmt::Debug for KeyArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl From<&LogLevel> for Level {
    fn from(level: &LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Json => "json",
                Self::Plain => "plain",
                Self::Coloured => "coloured",
            }
        )
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}",
            match self {
                Self::Trace => "trace",
                Self::Debug => "debug",
                Self::Info => "info",
                Self::Warn => "warn",
                Self::Error => "error",
            }
        )
    }
}

impl fmt::Display for Logging {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Logging: [{}] ({})", self.level, self.format)
    }
}

impl fmt::Display for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let separator = "─".repeat(14);
        writeln!(f, "{separator}")?;
        writeln!(f, "Settings")?;
        writeln!(f, "{separator}")?;
        writeln!(f, "Profile directory: {}", self.profile.display())?;
        writeln!(f, "Signer: {}", self.signer)?;
        if self.payer.is_set() {
            writeln!(f, "Payer: {}", self.payer)?;
        }
        writeln!(f, "{separator}")?;
        writeln!(f, "access: {}", self.access)?;
        writeln!(f, "poll interval: {:?}", self.poll_interval)?;
        match self.seal_timeout {
            Some(timeout) => writeln!(f, "seal timeout: {timeout:?}")?,
            None => writeln!(f, "seal timeout: [Not set]")?,
        }
        for (alias, address) in self.contracts.iter() {
            writeln!(f, "contract {alias}: {address}")?;
        }
        writeln!(f, "{separator}")?;
        writeln!(f, "{}", self.logging)
    }
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    const KEY: &str =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    fn build(args: &[&str]) -> Result<Settings, Error> {
        let network: Network =
            toml::from_str(include_str!("../../default.config.toml"))
                .map_err(|e| Error::Config(e.to_string()))?;
        let args = ClientArgs::parse_from(
            ["sflow-client", "--profile", "/tmp/sflow"]
                .iter()
                .chain(args)
                .chain(&["operations"])
                .copied(),
        );
        Settings::args(args)?.network(network)
    }

    #[test]
    fn access_override() {
        let settings = build(&["--access", "http://node:8080"]).unwrap();
        assert_eq!(settings.access.as_str(), "http://node:8080/");
    }

    #[test]
    fn unknown_network() {
        let err = build(&["-n", "nowhere"]).unwrap_err();
        assert!(matches!(err, Error::NetworkNotFound));
    }

    #[test]
    fn roles() {
        let settings = build(&[
            "--signer-address",
            "0x01",
            "--signer-key",
            KEY,
        ])
        .unwrap();
        let roles = settings.roles().unwrap();
        assert_eq!(roles.payer().address(), "0x01".parse().unwrap());

        let settings = build(&[
            "--signer-address",
            "0x01",
            "--signer-key",
            KEY,
            "--payer-address",
            "0x02",
            "--payer-key",
            KEY,
        ])
        .unwrap();
        let roles = settings.roles().unwrap();
        assert_eq!(roles.proposer().address(), "0x01".parse().unwrap());
        assert_eq!(roles.payer().address(), "0x02".parse().unwrap());
    }

    #[test]
    fn missing_key() {
        let settings = build(&["--signer-address", "0x01"]).unwrap();
        let err = settings.roles().unwrap_err();
        assert!(matches!(err, Error::Authorization(_)));
    }
}
