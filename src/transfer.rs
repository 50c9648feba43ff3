//! The value-transfer seam between the ledger and whatever actually moves funds.
//!
//! The ledger calls [`ValueTransfer::pull`] when a deposit is made and
//! [`ValueTransfer::push`] when value leaves the pool. A transfer either
//! completes in full or returns an error having moved nothing.

use crate::amount::Amount;
use crate::party::PartyId;
use std::collections::{HashMap, HashSet};
use thiserror::Error;

/// Failure reported by a value-transfer mechanism.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransferError {
    /// The payer's wallet cannot cover the transfer
    #[error("{party} holds {available}, cannot send {requested}")]
    InsufficientWallet {
        party: PartyId,
        requested: Amount,
        available: Amount,
    },

    /// The custody account cannot cover the payout
    #[error("custody holds {available}, cannot pay out {requested}")]
    CustodyShortfall { requested: Amount, available: Amount },

    /// The recipient refused the payout
    #[error("{0} refused the transfer")]
    Refused(PartyId),

    /// Receiving wallet would overflow
    #[error("wallet of {0} would overflow")]
    Overflow(PartyId),
}

/// Moves value into and out of the ledger's custody.
pub trait ValueTransfer {
    /// Moves `amount` from `from`'s wallet into custody.
    fn pull(&mut self, from: &PartyId, amount: Amount) -> Result<(), TransferError>;

    /// Moves `amount` from custody into `to`'s wallet.
    fn push(&mut self, to: &PartyId, amount: Amount) -> Result<(), TransferError>;
}

/// In-process wallets plus the custody balance the ledger holds.
///
/// Payouts to parties marked with [`InMemoryVault::refuse_payouts_to`] fail,
/// which models a recipient that rejects incoming value.
#[derive(Debug, Default, Clone)]
pub struct InMemoryVault {
    wallets: HashMap<PartyId, Amount>,
    custody: Amount,
    refusing: HashSet<PartyId>,
}

impl InMemoryVault {
    pub fn new() -> Self {
        Self::default()
    }

    /// Credits `party`'s wallet from outside the system.
    pub fn fund(&mut self, party: &PartyId, amount: Amount) -> Result<(), TransferError> {
        let wallet = self.wallets.entry(party.clone()).or_default();
        *wallet = wallet
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow(party.clone()))?;
        Ok(())
    }

    pub fn wallet(&self, party: &PartyId) -> Amount {
        self.wallets.get(party).copied().unwrap_or_default()
    }

    pub fn wallets(&self) -> impl Iterator<Item = (&PartyId, Amount)> {
        self.wallets.iter().map(|(party, amount)| (party, *amount))
    }

    /// Value currently held on the ledger's behalf.
    pub fn custody(&self) -> Amount {
        self.custody
    }

    pub fn refuse_payouts_to(&mut self, party: &PartyId) {
        self.refusing.insert(party.clone());
    }

    pub fn accept_payouts_to(&mut self, party: &PartyId) {
        self.refusing.remove(party);
    }
}

impl ValueTransfer for InMemoryVault {
    fn pull(&mut self, from: &PartyId, amount: Amount) -> Result<(), TransferError> {
        let available = self.wallet(from);
        let remaining = available
            .checked_sub(amount)
            .ok_or_else(|| TransferError::InsufficientWallet {
                party: from.clone(),
                requested: amount,
                available,
            })?;
        let custody = self
            .custody
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow(from.clone()))?;

        self.wallets.insert(from.clone(), remaining);
        self.custody = custody;
        Ok(())
    }

    fn push(&mut self, to: &PartyId, amount: Amount) -> Result<(), TransferError> {
        if self.refusing.contains(to) {
            return Err(TransferError::Refused(to.clone()));
        }
        let custody =
            self.custody
                .checked_sub(amount)
                .ok_or(TransferError::CustodyShortfall {
                    requested: amount,
                    available: self.custody,
                })?;
        let wallet = self
            .wallet(to)
            .checked_add(amount)
            .ok_or_else(|| TransferError::Overflow(to.clone()))?;

        self.custody = custody;
        self.wallets.insert(to.clone(), wallet);
        Ok(())
    }
}
