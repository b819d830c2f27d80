// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

//! Transaction payloads and their signing.
//!
//! A transaction is signed in two layers: keys of the proposer and
//! authorizer accounts other than the payer sign the payload, then the keys
//! of the payer account sign the envelope (payload plus payload signatures).
//! Both messages are the RLP encoding prefixed with
//! [`TRANSACTION_DOMAIN_TAG`].

pub mod rlp;

use std::collections::BTreeSet;

use rlp::Rlp;

use crate::ledger::BlockId;
use crate::{Address, Error, SignerRoles};

/// Domain separation tag of transaction signatures, right padded with zeros
pub const TRANSACTION_DOMAIN_TAG: [u8; 32] =
    domain_tag(b"FLOW-V0.0-transaction");

const fn domain_tag(tag: &[u8]) -> [u8; 32] {
    let mut padded = [0u8; 32];
    let mut i = 0;
    while i < tag.len() {
        padded[i] = tag[i];
        i += 1;
    }
    padded
}

/// The proposer key, whose sequence number orders transactions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProposalKey {
    /// Account of the key
    pub address: Address,
    /// Index of the key in the account
    pub key_index: u32,
    /// Current sequence number of the key
    pub sequence_number: u64,
}

/// The signed part of a transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionPayload {
    /// Cadence script with resolved imports
    pub script: String,
    /// JSON-Cadence encoded arguments, in declared order
    pub arguments: Vec<Vec<u8>>,
    /// Recent sealed block the transaction refers to
    pub reference_block: BlockId,
    /// Compute limit
    pub compute_limit: u64,
    /// Proposer key
    pub proposal_key: ProposalKey,
    /// Account paying the fees
    pub payer: Address,
    /// Accounts authorizing the transaction
    pub authorizers: Vec<Address>,
}

/// A signature over the payload or the envelope
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionSignature {
    /// Account of the signing key
    pub address: Address,
    /// Position of the account in [`TransactionPayload::signers`]
    pub signer_index: u32,
    /// Index of the key in the account
    pub key_index: u32,
    /// Signature bytes
    pub signature: Vec<u8>,
}

impl TransactionSignature {
    fn rlp(&self) -> Rlp {
        Rlp::List(vec![
            Rlp::uint(self.signer_index.into()),
            Rlp::uint(self.key_index.into()),
            Rlp::bytes(&self.signature),
        ])
    }
}

/// A transaction ready to be sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedTransaction {
    /// The signed payload
    pub payload: TransactionPayload,
    /// Signatures of keys outside the payer account
    pub payload_signatures: Vec<TransactionSignature>,
    /// Signatures of keys of the payer account
    pub envelope_signatures: Vec<TransactionSignature>,
}

impl TransactionPayload {
    /// Returns the distinct signing accounts in role order: proposer, payer,
    /// then authorizers
    pub fn signers(&self) -> Vec<Address> {
        let mut signers = vec![];
        let roles = [self.proposal_key.address, self.payer];
        for address in roles.iter().chain(&self.authorizers) {
            if !signers.contains(address) {
                signers.push(*address);
            }
        }
        signers
    }

    fn rlp(&self) -> Rlp {
        Rlp::List(vec![
            Rlp::bytes(&self.script),
            Rlp::List(self.arguments.iter().map(Rlp::bytes).collect()),
            Rlp::bytes(self.reference_block.to_bytes()),
            Rlp::uint(self.compute_limit),
            Rlp::bytes(self.proposal_key.address.to_bytes()),
            Rlp::uint(self.proposal_key.key_index.into()),
            Rlp::uint(self.proposal_key.sequence_number),
            Rlp::bytes(self.payer.to_bytes()),
            Rlp::List(
                self.authorizers
                    .iter()
                    .map(|a| Rlp::bytes(a.to_bytes()))
                    .collect(),
            ),
        ])
    }

    /// The message payload signers sign
    pub fn message(&self) -> Vec<u8> {
        with_domain_tag(self.rlp().encode())
    }

    /// Signs the transaction with the given roles.
    ///
    /// Every distinct proposer and authorizer key signs once: the payload
    /// if it belongs to another account than the payer, the envelope
    /// otherwise, next to the payer key.
    ///
    /// # Errors
    /// [`Error::Authorization`] if the roles do not match the payload or a
    /// signer fails.
    pub fn sign(self, roles: &SignerRoles) -> Result<SignedTransaction, Error> {
        let payer = roles.payer();
        if payer.address() != self.payer {
            return Err(Error::Authorization(format!(
                "Payer {} does not match the payload payer {}",
                payer.address(),
                self.payer
            )));
        }

        let signers = self.signers();
        let signer_index = |address: Address| {
            signers
                .iter()
                .position(|s| *s == address)
                .map(|i| i as u32)
                .ok_or_else(|| {
                    Error::Authorization(format!(
                        "{address} is not a signer of the transaction"
                    ))
                })
        };

        let mut signed_keys = BTreeSet::new();
        let mut payload_signatures = vec![];
        let mut envelope_signers = vec![];
        let message = self.message();

        let role_signers =
            std::iter::once(roles.proposer()).chain(roles.authorizers());
        for signer in role_signers.chain(std::iter::once(payer)) {
            let address = signer.address();
            if !signed_keys.insert((address, signer.key_index())) {
                continue;
            }
            if address == self.payer {
                envelope_signers.push(signer);
                continue;
            }
            payload_signatures.push(TransactionSignature {
                address,
                signer_index: signer_index(address)?,
                key_index: signer.key_index(),
                signature: signer.sign(&message)?,
            });
        }
        payload_signatures.sort_by_key(|s| (s.signer_index, s.key_index));

        let mut tx = SignedTransaction {
            payload: self,
            payload_signatures,
            envelope_signatures: vec![],
        };

        let message = tx.envelope_message();
        let payer_index = signer_index(tx.payload.payer)?;
        for signer in envelope_signers {
            tx.envelope_signatures.push(TransactionSignature {
                address: tx.payload.payer,
                signer_index: payer_index,
                key_index: signer.key_index(),
                signature: signer.sign(&message)?,
            });
        }
        tx.envelope_signatures.sort_by_key(|s| s.key_index);

        Ok(tx)
    }
}

impl SignedTransaction {
    /// The message the payer signs
    pub fn envelope_message(&self) -> Vec<u8> {
        let envelope = Rlp::List(vec![
            self.payload.rlp(),
            Rlp::List(
                self.payload_signatures
                    .iter()
                    .map(TransactionSignature::rlp)
                    .collect(),
            ),
        ]);
        with_domain_tag(envelope.encode())
    }
}

fn with_domain_tag(encoded: Vec<u8>) -> Vec<u8> {
    let mut message = TRANSACTION_DOMAIN_TAG.to_vec();
    message.extend(encoded);
    message
}
