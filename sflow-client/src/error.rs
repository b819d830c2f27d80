// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::io;
use std::time::Duration;

use crate::argument::ParamType;
use crate::ledger::Identifier;

/// Errors returned by this library
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Arguments not matching the operation's parameter schema
    #[error(transparent)]
    Argument(#[from] ArgumentError),
    /// The signers cannot authorize the transaction
    #[error("Authorization failed: {0}")]
    Authorization(String),
    /// The ledger rejected the transaction
    #[error("Transaction rejected: {0}")]
    Rejected(String),
    /// The transaction was sealed with an execution error
    #[error("Transaction {id} failed: {message}")]
    Failed {
        /// Id of the failed transaction
        id: Identifier,
        /// Error message reported by the ledger
        message: String,
    },
    /// The transaction expired before being sealed
    #[error("Transaction {0} expired before being sealed")]
    Expired(Identifier),
    /// The transaction was not sealed in time
    #[error("Transaction {0} not sealed within {1:?}")]
    SealTimeout(Identifier, Duration),
    /// Reqwest errors
    #[error("A request error occurred: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// The ledger answered with a server error or an unreadable response
    #[error("Ledger error occurred: {0}")]
    Ledger(String),
    /// JSON serialization errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    /// Cannot build the HTTP client
    #[error("Cannot initialize the HTTP client")]
    HttpClient,
    /// A script imports a contract alias with no configured address
    #[error("No address configured for contract `{0}`")]
    UnresolvedImport(String),
    /// Filesystem errors
    #[error(transparent)]
    IO(#[from] io::Error),
    /// Configuration file content is not valid
    #[error("Invalid configuration: {0}")]
    Config(String),
    /// Provided Network not found
    #[error(
        "Network not found, check config.toml, specify network with -n flag"
    )]
    NetworkNotFound,
    /// The home directory cannot be determined
    #[error("OS not supported")]
    OsNotSupported,
}

/// The category of an [`Error`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad arguments, either caught locally or reported by the ledger
    Argument,
    /// Missing or invalid signatures, keys or authorizers
    Authorization,
    /// The ledger refused or failed the transaction
    RemoteRejection,
    /// The ledger could not be reached or answered unexpectedly
    Network,
    /// Local configuration problems
    Config,
}

impl Error {
    /// Returns the category of the error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Argument(_) => ErrorKind::Argument,
            Self::Authorization(_) => ErrorKind::Authorization,
            Self::Rejected(_) | Self::Failed { .. } | Self::Expired(_) => {
                ErrorKind::RemoteRejection
            }
            Self::SealTimeout(..)
            | Self::Reqwest(_)
            | Self::Ledger(_)
            | Self::Json(_)
            | Self::HttpClient => ErrorKind::Network,
            Self::UnresolvedImport(_)
            | Self::IO(_)
            | Self::Config(_)
            | Self::NetworkNotFound
            | Self::OsNotSupported => ErrorKind::Config,
        }
    }

    /// Classifies a rejection message returned by the ledger.
    ///
    /// Messages about arguments become [`Error::Argument`], messages about
    /// signatures, keys or authorization become [`Error::Authorization`];
    /// anything else is a plain [`Error::Rejected`].
    pub fn from_rejection<S: Into<String>>(message: S) -> Self {
        let message = message.into();
        let lower = message.to_lowercase();

        if lower.contains("argument") {
            ArgumentError::Rejected(message).into()
        } else if lower.contains("signature")
            || lower.contains("authoriz")
            || lower.contains("account key")
            || lower.contains("proposal key")
        {
            Self::Authorization(message)
        } else {
            Self::Rejected(message)
        }
    }
}

/// Errors caught while checking arguments against a parameter schema
#[derive(Debug, thiserror::Error)]
pub enum ArgumentError {
    /// Wrong number of arguments
    #[error("{operation} expects {expected} arguments, got {actual}")]
    Arity {
        /// Operation name
        operation: &'static str,
        /// Declared parameter count
        expected: usize,
        /// Supplied argument count
        actual: usize,
    },
    /// Argument type not matching the declared parameter type
    #[error("Argument `{param}` of {operation} is {actual}, not {expected}")]
    Type {
        /// Operation name
        operation: &'static str,
        /// Parameter name
        param: &'static str,
        /// Declared type
        expected: ParamType,
        /// Type of the supplied value
        actual: String,
    },
    /// Amount to stake/unstake cannot be zero
    #[error("Amount `{0}` cannot be zero")]
    AmountIsZero(&'static str),
    /// Invalid UFix64 literal
    #[error("Invalid UFix64 amount `{0}`")]
    BadAmount(String),
    /// Invalid address literal
    #[error("Invalid address `{0}`")]
    BadAddress(String),
    /// The ledger refused the arguments
    #[error("Arguments rejected: {0}")]
    Rejected(String),
}
