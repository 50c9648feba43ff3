//! Error types for the pool ledger.

use crate::amount::Amount;
use crate::party::PartyId;
use crate::transfer::TransferError;
use thiserror::Error;

/// Result type alias for ledger operations
pub type Result<T> = std::result::Result<T, LedgerError>;

/// Errors that can occur during ledger operation.
///
/// Every rejected operation leaves the ledger exactly as it was.
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Caller is not the operator
    #[error("{caller} is not the operator")]
    Unauthorized { caller: PartyId },

    /// Withdrawal exceeds the caller's recorded balance
    #[error("insufficient funds: {party} requested {requested}, balance is {balance}")]
    InsufficientFunds {
        party: PartyId,
        requested: Amount,
        balance: Amount,
    },

    /// Operator-set balance would push recorded balances past the pool
    #[error("new balance {requested} exceeds pool: at most {limit} is unallocated")]
    ExceedsPool { requested: Amount, limit: Amount },

    /// Sweep attempted while positions are still open
    #[error("cannot sweep until all transactions are settled ({pending} pending)")]
    SettlementPending { pending: u64 },

    /// Sweep attempted with nothing in the pool
    #[error("no funds in the pool to sweep")]
    EmptyPool,

    /// Checked arithmetic overflowed or underflowed
    #[error("arithmetic fault: {0}")]
    Arithmetic(&'static str),

    /// The external value transfer failed
    #[error("value transfer failed: {0}")]
    Transfer(#[from] TransferError),

    /// Failed to open or read the input file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV parsing error
    #[error("CSV parsing error: {0}")]
    Csv(#[from] csv::Error),

    /// Invalid script record
    #[error("Invalid record at row {row}: {message}")]
    InvalidRecord { row: usize, message: String },

    /// Operator identity given on the command line is unusable
    #[error("Invalid operator: {0}")]
    InvalidOperator(String),

    /// Missing command-line argument
    #[error("Missing argument. Usage: pool-ledger <operator> <script.csv>")]
    MissingArgument,
}
