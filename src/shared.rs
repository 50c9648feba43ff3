//! A thread-safe handle to one ledger.

use crate::amount::Amount;
use crate::error::Result;
use crate::event::{EventLog, EventSink};
use crate::ledger::Ledger;
use crate::party::PartyId;
use crate::transfer::{InMemoryVault, ValueTransfer};
use parking_lot::Mutex;
use std::sync::Arc;

/// Serializes every operation on a [`Ledger`] behind a single lock.
///
/// Each call holds the lock for its whole run, value transfer included, so no
/// two operations interleave and no caller sees a half-applied state.
#[derive(Debug)]
pub struct SharedLedger<T = InMemoryVault, S = EventLog> {
    inner: Arc<Mutex<Ledger<T, S>>>,
}

impl<T, S> Clone for SharedLedger<T, S> {
    fn clone(&self) -> Self {
        SharedLedger {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: ValueTransfer, S: EventSink> SharedLedger<T, S> {
    pub fn new(ledger: Ledger<T, S>) -> Self {
        SharedLedger {
            inner: Arc::new(Mutex::new(ledger)),
        }
    }

    pub fn deposit(&self, party: &PartyId, amount: Amount) -> Result<()> {
        self.inner.lock().deposit(party, amount)
    }

    pub fn withdraw(&self, party: &PartyId, amount: Amount) -> Result<()> {
        self.inner.lock().withdraw(party, amount)
    }

    pub fn update_player_balance(
        &self,
        caller: &PartyId,
        party: &PartyId,
        new_balance: Amount,
    ) -> Result<()> {
        self.inner
            .lock()
            .update_player_balance(caller, party, new_balance)
    }

    pub fn owner_withdraw(&self, caller: &PartyId) -> Result<Amount> {
        self.inner.lock().owner_withdraw(caller)
    }

    pub fn total_pool(&self) -> Amount {
        self.inner.lock().total_pool()
    }

    pub fn player_balance(&self, party: &PartyId) -> Amount {
        self.inner.lock().player_balance(party)
    }

    pub fn transaction_counter(&self) -> u64 {
        self.inner.lock().transaction_counter()
    }

    /// Runs `f` with exclusive access to the ledger.
    pub fn with<R>(&self, f: impl FnOnce(&mut Ledger<T, S>) -> R) -> R {
        f(&mut self.inner.lock())
    }
}
