// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::ArgumentError;

/// An account address on the ledger
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address([u8; Address::SIZE]);

impl Address {
    /// Size in bytes of an address
    pub const SIZE: usize = 8;

    /// Creates an address from its bytes
    pub const fn new(bytes: [u8; Self::SIZE]) -> Self {
        Self(bytes)
    }

    /// Returns the address bytes
    pub const fn to_bytes(&self) -> [u8; Self::SIZE] {
        self.0
    }

    /// Hex representation without the `0x` prefix, as the access API
    /// expects it
    pub fn sans_prefix(&self) -> String {
        hex::encode(self.0)
    }
}

/// Parses `0x`-prefixed or bare hex. Short addresses are left-padded with
/// zeros, so `0x01` is the same account as `0x0000000000000001`.
impl FromStr for Address {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ArgumentError::BadAddress(s.to_string());

        let digits = s.strip_prefix("0x").unwrap_or(s);
        if digits.is_empty() || digits.len() > Self::SIZE * 2 {
            return Err(bad());
        }

        let padded = format!("{digits:0>16}");
        let mut bytes = [0u8; Self::SIZE];
        hex::decode_to_slice(padded, &mut bytes).map_err(|_| bad())?;

        Ok(Self(bytes))
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{}", self.sans_prefix())
    }
}

impl fmt::Debug for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl Serialize for Address {
    fn serialize<S: Serializer>(
        &self,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Address {
    fn deserialize<D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}
