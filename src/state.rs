//! Bookkeeping state of the pool.
//!
//! Validation and mutation are split: each `plan_*` method checks its
//! preconditions and returns a [`Posting`] describing the next values without
//! touching `self`. The ledger commits a posting with [`PoolState::apply`] only
//! once the matching value transfer has gone through.

use crate::amount::Amount;
use crate::error::{LedgerError, Result};
use crate::party::PartyId;
use std::collections::HashMap;

/// Pool totals, per-party balances and the open-position counter.
///
/// # Invariants
///
/// - `allocated` equals the sum of every entry in `balances`
/// - `pending` equals deposits minus withdrawals and never goes below zero
/// - Operator adjustments keep `allocated <= total_pool`
///
/// Entries in `balances` are created on first touch and never removed, so a
/// party can be present with a zero balance.
#[derive(Debug, Clone)]
pub struct PoolState {
    operator: PartyId,
    total_pool: Amount,
    allocated: Amount,
    balances: HashMap<PartyId, Amount>,
    pending: u64,
}

/// The complete set of values an operation will write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Posting {
    /// Party whose balance changes, with its new balance.
    pub entry: Option<(PartyId, Amount)>,
    pub total_pool: Amount,
    pub allocated: Amount,
    pub pending: u64,
}

impl PoolState {
    /// Creates an empty pool bound to `operator`.
    pub fn new(operator: PartyId) -> Self {
        PoolState {
            operator,
            total_pool: Amount::ZERO,
            allocated: Amount::ZERO,
            balances: HashMap::new(),
            pending: 0,
        }
    }

    pub fn operator(&self) -> &PartyId {
        &self.operator
    }

    pub fn total_pool(&self) -> Amount {
        self.total_pool
    }

    pub fn allocated(&self) -> Amount {
        self.allocated
    }

    pub fn pending(&self) -> u64 {
        self.pending
    }

    pub fn balance(&self, party: &PartyId) -> Amount {
        self.balances.get(party).copied().unwrap_or_default()
    }

    pub fn balances(&self) -> impl Iterator<Item = (&PartyId, Amount)> {
        self.balances.iter().map(|(party, amount)| (party, *amount))
    }

    /// Rejects `caller` unless it is the operator.
    pub fn authorize(&self, caller: &PartyId) -> Result<()> {
        if caller != &self.operator {
            return Err(LedgerError::Unauthorized {
                caller: caller.clone(),
            });
        }
        Ok(())
    }

    pub fn plan_deposit(&self, party: &PartyId, amount: Amount) -> Result<Posting> {
        let balance = self
            .balance(party)
            .checked_add(amount)
            .ok_or(LedgerError::Arithmetic("party balance overflow"))?;
        let total_pool = self
            .total_pool
            .checked_add(amount)
            .ok_or(LedgerError::Arithmetic("pool overflow"))?;
        let allocated = self
            .allocated
            .checked_add(amount)
            .ok_or(LedgerError::Arithmetic("allocated balance overflow"))?;
        let pending = self
            .pending
            .checked_add(1)
            .ok_or(LedgerError::Arithmetic("transaction counter overflow"))?;

        Ok(Posting {
            entry: Some((party.clone(), balance)),
            total_pool,
            allocated,
            pending,
        })
    }

    pub fn plan_withdraw(&self, party: &PartyId, amount: Amount) -> Result<Posting> {
        let current = self.balance(party);
        let balance = current
            .checked_sub(amount)
            .ok_or_else(|| LedgerError::InsufficientFunds {
                party: party.clone(),
                requested: amount,
                balance: current,
            })?;
        // Only reachable when a sweep took value that balances still claim.
        let total_pool = self
            .total_pool
            .checked_sub(amount)
            .ok_or(LedgerError::Arithmetic("pool underflow"))?;
        let allocated = self
            .allocated
            .checked_sub(amount)
            .ok_or(LedgerError::Arithmetic("allocated balance underflow"))?;
        let pending = self
            .pending
            .checked_sub(1)
            .ok_or(LedgerError::Arithmetic("transaction counter underflow"))?;

        Ok(Posting {
            entry: Some((party.clone(), balance)),
            total_pool,
            allocated,
            pending,
        })
    }

    /// Plans replacing `party`'s balance. The caller must already be authorized.
    pub fn plan_set_balance(&self, party: &PartyId, new_balance: Amount) -> Result<Posting> {
        let others = self
            .allocated
            .checked_sub(self.balance(party))
            .ok_or(LedgerError::Arithmetic("allocated balance underflow"))?;
        let limit = self.total_pool.checked_sub(others).unwrap_or(Amount::ZERO);
        if new_balance > limit {
            return Err(LedgerError::ExceedsPool {
                requested: new_balance,
                limit,
            });
        }

        Ok(Posting {
            entry: Some((party.clone(), new_balance)),
            total_pool: self.total_pool,
            allocated: others
                .checked_add(new_balance)
                .ok_or(LedgerError::Arithmetic("allocated balance overflow"))?,
            pending: self.pending,
        })
    }

    /// Plans emptying the pool. Returns the amount swept with the posting.
    /// The caller must already be authorized.
    pub fn plan_sweep(&self) -> Result<(Amount, Posting)> {
        if self.pending != 0 {
            return Err(LedgerError::SettlementPending {
                pending: self.pending,
            });
        }
        if self.total_pool.is_zero() {
            return Err(LedgerError::EmptyPool);
        }

        Ok((
            self.total_pool,
            Posting {
                entry: None,
                total_pool: Amount::ZERO,
                allocated: self.allocated,
                pending: self.pending,
            },
        ))
    }

    pub fn apply(&mut self, posting: Posting) {
        if let Some((party, balance)) = posting.entry {
            self.balances.insert(party, balance);
        }
        self.total_pool = posting.total_pool;
        self.allocated = posting.allocated;
        self.pending = posting.pending;
    }

    /// Verifies that `allocated` matches the recorded balances.
    #[cfg(debug_assertions)]
    pub fn check_invariant(&self) -> bool {
        let sum = self
            .balances
            .values()
            .try_fold(Amount::ZERO, |acc, amount| acc.checked_add(*amount));
        sum == Some(self.allocated)
    }
}
