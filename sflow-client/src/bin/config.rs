// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::{fs, io};

use serde::Deserialize;
use sflow_client::{Contracts, Error};
use url::Url;

const DEFAULT_CONFIG: &str = include_str!("../../default.config.toml");

fn default_poll_interval() -> u64 {
    1000
}

#[derive(Debug, Deserialize, Clone)]
pub(crate) struct Network {
    /// Access node REST endpoint
    pub(crate) access: Url,
    /// Interval between two result polls, in milliseconds
    #[serde(default = "default_poll_interval")]
    pub(crate) poll_interval: u64,
    /// Maximum time to wait for a seal, in seconds
    pub(crate) seal_timeout: Option<u64>,
    /// Contract addresses, keyed by import alias
    #[serde(default)]
    pub(crate) contracts: Contracts,
    pub(crate) network: Option<HashMap<String, Network>>,
}

impl Network {
    /// Returns the named network, inheriting the contracts it does not
    /// override, or `self` when no name is given
    pub(crate) fn select(self, name: Option<&str>) -> Result<Network, Error> {
        let Some(name) = name else {
            return Ok(self);
        };

        let mut selected = self
            .network
            .and_then(|mut networks| networks.remove(name))
            .ok_or(Error::NetworkNotFound)?;

        let mut contracts = self.contracts;
        contracts.extend(selected.contracts);
        selected.contracts = contracts;

        Ok(selected)
    }
}

/// Config holds the settings for the CLI client
#[derive(Debug)]
pub struct Config {
    /// Network configuration
    pub(crate) network: Network,
}

fn read_to_string<P: AsRef<Path>>(path: P) -> io::Result<Option<String>> {
    fs::read_to_string(&path)
        .map(Some)
        .or_else(|e| match e.kind() {
            io::ErrorKind::NotFound => Ok(None),
            _ => Err(e),
        })
}

impl Config {
    /// Attempt to load configuration from the profile directory, then from
    /// the global location
    pub fn load(profile: &Path) -> Result<Config, Error> {
        let mut global = dirs::home_dir().ok_or(Error::OsNotSupported)?;
        global.push(".config");
        global.push(env!("CARGO_BIN_NAME"));
        global.push("config.toml");

        Self::load_from(profile, global)
    }

    fn load_from(profile: &Path, global: PathBuf) -> Result<Config, Error> {
        let profile = profile.join("config.toml");

        let contents = match read_to_string(&profile)? {
            Some(contents) => Some(contents),
            None => read_to_string(&global)?,
        };

        let contents = match contents {
            Some(contents) => contents,
            None => {
                // Write the default config to the global location, falling
                // back to the embedded one if that fails
                if let Some(parent) = global.parent() {
                    let _ = fs::create_dir_all(parent);
                }
                let _ = fs::write(&global, DEFAULT_CONFIG);

                DEFAULT_CONFIG.to_string()
            }
        };

        Self::parse(&contents)
    }

    fn parse(contents: &str) -> Result<Config, Error> {
        let network: Network = toml::from_str(contents)
            .map_err(|e| Error::Config(e.to_string()))?;

        Ok(Config { network })
    }
}
