// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Fixed-point amounts as the Cadence `UFix64` type represents them.

use std::fmt;
use std::str::FromStr;

use crate::ArgumentError;

/// Number of decimal digits of a `UFix64`
pub const DECIMALS: usize = 8;

/// Units in one whole token
const SCALE: u64 = 100_000_000;

/// An unsigned amount with 8 decimal digits, stored as an integer number
/// of units (10^-8)
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UFix64(u64);

impl UFix64 {
    /// The zero amount
    pub const ZERO: UFix64 = UFix64(0);
    /// The largest representable amount
    pub const MAX: UFix64 = UFix64(u64::MAX);

    /// Returns an amount from its raw units
    pub const fn from_units(units: u64) -> Self {
        Self(units)
    }

    /// Returns the raw units of the amount
    pub const fn units(&self) -> u64 {
        self.0
    }

    /// Returns `true` if the amount is zero
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

/// Strings are parsed as exact decimals, with at most 8 fractional digits
impl FromStr for UFix64 {
    type Err = ArgumentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || ArgumentError::BadAmount(s.to_string());

        let (whole, fraction) = match s.split_once('.') {
            Some((_, "")) => return Err(bad()),
            Some((whole, fraction)) => (whole, fraction),
            None => (s, ""),
        };

        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if whole.is_empty()
            || !is_digits(whole)
            || !is_digits(fraction)
            || fraction.len() > DECIMALS
        {
            return Err(bad());
        }

        let whole: u64 = whole.parse().map_err(|_| bad())?;
        let fraction: u64 = if fraction.is_empty() {
            0
        } else {
            format!("{fraction:0<8}").parse().map_err(|_| bad())?
        };

        whole
            .checked_mul(SCALE)
            .and_then(|units| units.checked_add(fraction))
            .map(Self)
            .ok_or_else(bad)
    }
}

/// Always prints all 8 decimals, the form the ledger expects in arguments
impl fmt::Display for UFix64 {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}.{:08}", self.0 / SCALE, self.0 % SCALE)
    }
}
