// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! # sFlow Client Lib
//!
//! The `sflow_client` library submits the sFlow liquid-staking transactions
//! to a Flow access node and waits for them to be sealed.
//!
//! Every exported operation (account initialization, staking collection and
//! manager setup, capability delegation, stake, unstake, delegator
//! registration, collection management) is described by an immutable
//! [`OperationDescriptor`] and submitted through the single
//! [`Client::submit`] path.

#![deny(missing_docs)]

mod address;
mod client;
mod error;
mod signer;

pub mod argument;
pub mod ledger;
pub mod operation;
pub mod tx;
pub mod ufix64;

pub use address::Address;
pub use argument::{ParamType, Value};
pub use client::{Client, DEFAULT_POLL_INTERVAL, Receipt};
pub use error::{ArgumentError, Error, ErrorKind};
pub use ledger::{HttpLedger, Identifier, Ledger};
pub use operation::{Contracts, Operation, OperationDescriptor};
pub use signer::{LocalSigner, Signer, SignerRoles};
pub use ufix64::UFix64;

/// The compute limit attached to every submitted transaction
pub const COMPUTE_LIMIT: u64 = 9999;
