// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::fmt;
use std::sync::Arc;

use k256::ecdsa::signature::DigestSigner;
use k256::ecdsa::{Signature, SigningKey, VerifyingKey};
use sha3::{Digest, Sha3_256};

use crate::{Address, Error};

/// An account key able to sign transactions.
///
/// Implementations are supplied by the caller; the client never stores or
/// derives keys itself.
pub trait Signer: Send + Sync {
    /// Address of the account owning the key
    fn address(&self) -> Address;

    /// Index of the key in the account
    fn key_index(&self) -> u32;

    /// Signs `message`, which already carries the transaction domain tag
    ///
    /// # Errors
    /// Implementations return [`Error::Authorization`] when the key cannot
    /// sign.
    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error>;
}

/// A secp256k1 account key held in memory, hashing with SHA3-256
#[derive(Clone)]
pub struct LocalSigner {
    address: Address,
    key_index: u32,
    key: SigningKey,
}

impl LocalSigner {
    /// Creates a signer from a signing key
    pub fn new(address: Address, key_index: u32, key: SigningKey) -> Self {
        Self {
            address,
            key_index,
            key,
        }
    }

    /// Creates a signer from a hex encoded private key
    ///
    /// # Errors
    /// [`Error::Authorization`] if the hex is not a valid secp256k1 key
    pub fn from_hex(
        address: Address,
        key_index: u32,
        private_key: &str,
    ) -> Result<Self, Error> {
        let invalid = || Error::Authorization("Invalid signing key".into());

        let bytes = hex::decode(private_key.trim().trim_start_matches("0x"))
            .map_err(|_| invalid())?;
        let key = SigningKey::from_slice(&bytes).map_err(|_| invalid())?;

        Ok(Self::new(address, key_index, key))
    }

    /// Returns the verifying key
    pub fn verifying_key(&self) -> VerifyingKey {
        *self.key.verifying_key()
    }
}

impl Signer for LocalSigner {
    fn address(&self) -> Address {
        self.address
    }

    fn key_index(&self) -> u32 {
        self.key_index
    }

    fn sign(&self, message: &[u8]) -> Result<Vec<u8>, Error> {
        let digest = Sha3_256::new_with_prefix(message);
        let signature: Signature = self
            .key
            .try_sign_digest(digest)
            .map_err(|e| Error::Authorization(e.to_string()))?;

        Ok(signature.to_bytes().to_vec())
    }
}

impl fmt::Debug for LocalSigner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSigner")
            .field("address", &self.address)
            .field("key_index", &self.key_index)
            .finish_non_exhaustive()
    }
}

/// Assignment of signers to the proposer, payer and authorizer roles of a
/// transaction
#[derive(Clone)]
pub struct SignerRoles {
    proposer: Arc<dyn Signer>,
    payer: Arc<dyn Signer>,
    authorizers: Vec<Arc<dyn Signer>>,
}

impl SignerRoles {
    /// Uses one signer as proposer, payer and sole authorizer
    pub fn single(signer: Arc<dyn Signer>) -> Self {
        Self {
            proposer: signer.clone(),
            payer: signer.clone(),
            authorizers: vec![signer],
        }
    }

    /// Uses `signer` as proposer and sole authorizer while `payer` pays the
    /// fees
    pub fn sponsored(signer: Arc<dyn Signer>, payer: Arc<dyn Signer>) -> Self {
        Self {
            proposer: signer.clone(),
            payer,
            authorizers: vec![signer],
        }
    }

    /// Assigns every role explicitly
    pub fn new(
        proposer: Arc<dyn Signer>,
        payer: Arc<dyn Signer>,
        authorizers: Vec<Arc<dyn Signer>>,
    ) -> Self {
        Self {
            proposer,
            payer,
            authorizers,
        }
    }

    /// The signer whose key sequence number is used
    pub fn proposer(&self) -> &Arc<dyn Signer> {
        &self.proposer
    }

    /// The signer paying the fees, signing the envelope
    pub fn payer(&self) -> &Arc<dyn Signer> {
        &self.payer
    }

    /// The signers authorizing account access
    pub fn authorizers(&self) -> &[Arc<dyn Signer>] {
        &self.authorizers
    }
}

impl fmt::Debug for SignerRoles {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authorizers: Vec<Address> =
            self.authorizers.iter().map(|a| a.address()).collect();
        f.debug_struct("SignerRoles")
            .field("proposer", &self.proposer.address())
            .field("payer", &self.payer.address())
            .field("authorizers", &authorizers)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use k256::ecdsa::signature::DigestVerifier;

    use super::*;

    const KEY: &str =
        "4c0883a69102937d6231471b5dbb6204fe5129617082792ae468d01a3f362318";

    #[test]
    fn sign_and_verify() {
        let addr: Address = "0x01".parse().unwrap();
        let signer = LocalSigner::from_hex(addr, 0, KEY).unwrap();
        let signature = signer.sign(b"message").unwrap();
        assert_eq!(signature.len(), 64);

        let signature = Signature::from_slice(&signature).unwrap();
        signer
            .verifying_key()
            .verify_digest(Sha3_256::new_with_prefix(b"message"), &signature)
            .unwrap();
    }

    #[test]
    fn invalid_keys() {
        let addr = Address::default();
        assert!(LocalSigner::from_hex(addr, 0, "zz").is_err());
        assert!(LocalSigner::from_hex(addr, 0, "00").is_err());
        assert!(LocalSigner::from_hex(addr, 0, &"00".repeat(32)).is_err());
    }

    #[test]
    fn debug_hides_the_key() {
        let signer = LocalSigner::from_hex(Address::default(), 3, KEY).unwrap();
        let debug = format!("{signer:?}");
        assert!(!debug.contains(KEY));
        assert!(debug.contains("key_index: 3"));
    }

    #[test]
    fn single_signer_roles() {
        let signer: Arc<dyn Signer> = Arc::new(
            LocalSigner::from_hex("0x01".parse().unwrap(), 0, KEY).unwrap(),
        );
        let roles = SignerRoles::single(signer);
        assert_eq!(roles.proposer().address(), roles.payer().address());
        assert_eq!(roles.authorizers().len(), 1);
        assert_eq!(roles.authorizers()[0].address(), roles.payer().address());
    }
}
