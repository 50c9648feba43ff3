//! # Pool Ledger
//!
//! A single shared pool of value that many parties deposit into and withdraw
//! from, with one operator who can reassign balances (game outcomes) and sweep
//! the pool once every position is settled.
//!
//! ## Design Principles
//!
//! - **Integer amounts**: all value is counted in wei with checked arithmetic
//! - **Plan, transfer, commit**: bookkeeping changes only after the value
//!   transfer succeeds, so a rejected or failed call changes nothing
//! - **Operator checked first**: privileged calls verify the caller before
//!   reading any state
//! - **Serialized access**: [`SharedLedger`] runs each call under one lock
//!
//! ## Example
//!
//! ```
//! use pool_ledger::{Amount, Ledger, PartyId};
//!
//! let owner = PartyId::from("owner");
//! let player = PartyId::from("player1");
//!
//! let mut ledger = Ledger::in_memory(owner.clone());
//! ledger.transfer_mut().fund(&player, Amount::gwei(1)).unwrap();
//! ledger.deposit(&player, Amount::gwei(1)).unwrap();
//! ledger.update_player_balance(&owner, &player, Amount::ZERO).unwrap();
//! ledger.withdraw(&player, Amount::ZERO).unwrap();
//!
//! assert_eq!(ledger.owner_withdraw(&owner).unwrap(), Amount::gwei(1));
//! assert_eq!(ledger.total_pool(), Amount::ZERO);
//! ```

pub mod amount;
pub mod command;
pub mod error;
pub mod event;
pub mod ledger;
pub mod party;
pub mod session;
pub mod shared;
pub mod state;
pub mod transfer;

pub use amount::{Amount, AmountError};
pub use command::{Command, CommandRecord};
pub use error::{LedgerError, Result};
pub use event::{EventLog, EventSink, LedgerEvent, LogSink};
pub use ledger::Ledger;
pub use party::PartyId;
pub use session::{ReplayStats, Session};
pub use shared::SharedLedger;
pub use state::{PoolState, Posting};
pub use transfer::{InMemoryVault, TransferError, ValueTransfer};
