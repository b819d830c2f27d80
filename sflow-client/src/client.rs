// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.
//
// Copyright (c) DUSK NETWORK. All rights reserved.

use std::sync::Arc;
use std::time::Duration;

use tokio::time::sleep;
use tracing::{debug, info};

use crate::argument::{self, Value};
use crate::ledger::{BlockId, Event, TxId, TxStatus};
use crate::tx::{ProposalKey, TransactionPayload};
use crate::{
    Address, ArgumentError, COMPUTE_LIMIT, Contracts, Error, HttpLedger,
    Ledger, Operation, SignerRoles, UFix64,
};

/// Default interval between two transaction result polls
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(1000);

/// The outcome of a sealed, successful transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    /// Transaction id
    pub id: TxId,
    /// Block that sealed the transaction, when reported
    pub block_id: Option<BlockId>,
    /// Compute units used
    pub computation_used: u64,
    /// Events emitted by the transaction
    pub events: Vec<Event>,
}

/// Submits the sFlow operations to a ledger and waits for them to be sealed.
///
/// The client holds no per-submission state: it can be cloned and shared
/// across tasks, and concurrent submissions are neither ordered nor
/// deduplicated.
#[derive(Clone)]
pub struct Client {
    ledger: Arc<dyn Ledger>,
    contracts: Contracts,
    poll_interval: Duration,
    seal_timeout: Option<Duration>,
    status: fn(&str),
}

impl Client {
    /// Creates a client over the given ledger, resolving script imports with
    /// `contracts`
    pub fn new(ledger: Arc<dyn Ledger>, contracts: Contracts) -> Self {
        Self {
            ledger,
            contracts,
            poll_interval: DEFAULT_POLL_INTERVAL,
            seal_timeout: None,
            status: |_| {},
        }
    }

    /// Creates a client talking to the access node at `uri`
    ///
    /// # Errors
    /// This method errors if the HTTP client cannot be initialized.
    pub fn connect<S: Into<String>>(
        uri: S,
        contracts: Contracts,
    ) -> Result<Self, Error> {
        let ledger = HttpLedger::new(uri)?;
        Ok(Self::new(Arc::new(ledger), contracts))
    }

    /// Sets the interval between two result polls
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Bounds the time spent waiting for a transaction to be sealed
    pub fn with_seal_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.seal_timeout = timeout;
        self
    }

    /// Sets the callback notified while waiting for a transaction
    pub fn with_status(mut self, status: fn(&str)) -> Self {
        self.status = status;
        self
    }

    /// Submits `operation` with `args` signed by `roles`, then waits for the
    /// transaction to be sealed.
    ///
    /// Arguments are checked against the operation schema before anything
    /// is sent to the ledger.
    ///
    /// # Errors
    /// See [`Error::kind`] for the categories a submission can fail with.
    pub async fn submit(
        &self,
        operation: Operation,
        roles: &SignerRoles,
        args: Vec<Value>,
    ) -> Result<Receipt, Error> {
        let descriptor = operation.descriptor();
        argument::validate(descriptor, &args)?;

        if roles.authorizers().len() != descriptor.authorizers {
            return Err(Error::Authorization(format!(
                "{operation} needs {} authorizers, got {}",
                descriptor.authorizers,
                roles.authorizers().len()
            )));
        }

        let script = self.contracts.resolve(descriptor.script)?;
        let arguments = args.iter().map(Value::encode).collect();

        let proposer = roles.proposer();
        let reference = self.ledger.latest_block().await?;
        let sequence_number = self
            .ledger
            .sequence_number(proposer.address(), proposer.key_index())
            .await?;

        let authorizers: Vec<Address> =
            roles.authorizers().iter().map(|a| a.address()).collect();
        let payload = TransactionPayload {
            script,
            arguments,
            reference_block: reference.id,
            compute_limit: COMPUTE_LIMIT,
            proposal_key: ProposalKey {
                address: proposer.address(),
                key_index: proposer.key_index(),
                sequence_number,
            },
            payer: roles.payer().address(),
            authorizers,
        };
        debug!(
            %operation,
            reference_height = reference.height,
            sequence_number,
            "Signing transaction"
        );

        let tx = payload.sign(roles)?;
        let id = self.ledger.send_transaction(&tx).await?;
        info!(%operation, %id, "Transaction sent");

        let receipt = match self.seal_timeout {
            Some(timeout) => tokio::time::timeout(timeout, self.wait_for(&id))
                .await
                .map_err(|_| Error::SealTimeout(id, timeout))??,
            None => self.wait_for(&id).await?,
        };

        info!(
            %operation,
            %id,
            computation_used = receipt.computation_used,
            events = receipt.events.len(),
            "Transaction sealed"
        );
        Ok(receipt)
    }

    /// Waits for a transaction to be sealed
    ///
    /// # Errors
    /// [`Error::Failed`] if sealed with an execution error,
    /// [`Error::Expired`] if it expired, or any error raised while polling.
    pub async fn wait_for(&self, id: &TxId) -> Result<Receipt, Error> {
        loop {
            let result = self.ledger.transaction_result(id).await?;

            if !result.status.is_final() {
                debug!(%id, status = ?result.status, "Waiting for seal");
                (self.status)("Waiting for tx to be sealed...");
                sleep(self.poll_interval).await;
                continue;
            }

            if result.status == TxStatus::Expired {
                return Err(Error::Expired(*id));
            }
            if !result.error_message.is_empty() {
                return Err(Error::Failed {
                    id: *id,
                    message: result.error_message,
                });
            }

            return Ok(Receipt {
                id: *id,
                block_id: result.block_id,
                computation_used: result.computation_used,
                events: result.events,
            });
        }
    }

    /// Creates the sFlow vault and publishes its receiver and balance
    /// capabilities. Accounts already holding the receiver are left as is.
    pub async fn init_account(
        &self,
        roles: &SignerRoles,
    ) -> Result<Receipt, Error> {
        self.submit(Operation::InitAccount, roles, vec![]).await
    }

    /// Stores a staking collection in the signer account
    pub async fn setup_stake_collection(
        &self,
        roles: &SignerRoles,
    ) -> Result<Receipt, Error> {
        self.submit(Operation::SetupStakeCollection, roles, vec![]).await
    }

    /// Stores a manager resource in the signer account
    pub async fn setup_manager_account(
        &self,
        roles: &SignerRoles,
    ) -> Result<Receipt, Error> {
        self.submit(Operation::SetupManagerAccount, roles, vec![]).await
    }

    /// Hands the signer's collection capability to the manager at `address`
    pub async fn set_manager_capability(
        &self,
        roles: &SignerRoles,
        address: Address,
    ) -> Result<Receipt, Error> {
        let args = vec![address.into()];
        self.submit(Operation::SetManagerCapability, roles, args).await
    }

    /// Lets the manager act on the collections it received
    pub async fn manage_collection(
        &self,
        roles: &SignerRoles,
    ) -> Result<Receipt, Error> {
        self.submit(Operation::ManageCollection, roles, vec![]).await
    }

    /// Stakes `amount` FLOW, minting sFlow in exchange
    pub async fn stake(
        &self,
        roles: &SignerRoles,
        amount: UFix64,
    ) -> Result<Receipt, Error> {
        non_zero("amount", amount)?;
        self.submit(Operation::Stake, roles, vec![amount.into()]).await
    }

    /// Burns `amount` sFlow, returning FLOW
    pub async fn unstake(
        &self,
        roles: &SignerRoles,
        amount: UFix64,
    ) -> Result<Receipt, Error> {
        non_zero("amount", amount)?;
        self.submit(Operation::Unstake, roles, vec![amount.into()]).await
    }

    /// Stakes `amount` new tokens to a node, or to one of its delegators
    pub async fn stake_new_tokens(
        &self,
        roles: &SignerRoles,
        node_id: String,
        delegator_id: Option<u32>,
        amount: UFix64,
    ) -> Result<Receipt, Error> {
        non_zero("amount", amount)?;
        let args = vec![node_id.into(), delegator_id.into(), amount.into()];
        self.submit(Operation::StakeNewTokens, roles, args).await
    }

    /// Registers a new delegator to `node_id` with an initial stake
    pub async fn register_delegator(
        &self,
        roles: &SignerRoles,
        node_id: String,
        amount: UFix64,
    ) -> Result<Receipt, Error> {
        non_zero("amount", amount)?;
        let args = vec![node_id.into(), amount.into()];
        self.submit(Operation::RegisterDelegator, roles, args).await
    }
}

fn non_zero(param: &'static str, amount: UFix64) -> Result<(), Error> {
    if amount.is_zero() {
        return Err(ArgumentError::AmountIsZero(param).into());
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zero_amounts() {
        let err = non_zero("amount", UFix64::ZERO).unwrap_err();
        assert!(matches!(err, Error::Argument(ArgumentError::AmountIsZero(_))));
        assert!(non_zero("amount", UFix64::from_units(1)).is_ok());
    }

    #[test]
    fn client_is_shareable() {
        fn assert_send_sync<T: Send + Sync + Clone>() {}
        assert_send_sync::<Client>();
    }
}
