//! Ledger notifications and the sinks that observe them.

use crate::amount::Amount;
use crate::party::PartyId;
use log::info;
use std::fmt;

/// A notification emitted after a state transition commits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerEvent {
    /// A party paid value into the pool.
    Deposit { party: PartyId, amount: Amount },

    /// A party took value out of the pool.
    Withdraw { party: PartyId, amount: Amount },

    /// The operator reassigned a party's balance.
    UpdateBalance { party: PartyId, new_balance: Amount },

    /// The operator swept the pool.
    OwnerWithdraw { operator: PartyId, amount: Amount },
}

impl fmt::Display for LedgerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LedgerEvent::Deposit { party, amount } => write!(f, "Deposit({}, {})", party, amount),
            LedgerEvent::Withdraw { party, amount } => {
                write!(f, "Withdraw({}, {})", party, amount)
            }
            LedgerEvent::UpdateBalance { party, new_balance } => {
                write!(f, "UpdateBalance({}, {})", party, new_balance)
            }
            LedgerEvent::OwnerWithdraw { operator, amount } => {
                write!(f, "OwnerWithdraw({}, {})", operator, amount)
            }
        }
    }
}

/// Receives ledger events. Sinks are observers only and cannot fail an operation.
pub trait EventSink {
    fn emit(&mut self, event: LedgerEvent);
}

/// Records every event in order.
#[derive(Debug, Default, Clone)]
pub struct EventLog {
    events: Vec<LedgerEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> &[LedgerEvent] {
        &self.events
    }

    pub fn last(&self) -> Option<&LedgerEvent> {
        self.events.last()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}

impl EventSink for EventLog {
    fn emit(&mut self, event: LedgerEvent) {
        self.events.push(event);
    }
}

/// Writes events to the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&mut self, event: LedgerEvent) {
        info!("{}", event);
    }
}
