//! The pooled-funds ledger.
//!
//! Every operation runs as one unit: preconditions are checked and the next
//! state is planned first, then the value transfer is attempted, and the
//! bookkeeping is committed only if the transfer succeeded. Events are emitted
//! after commit.

use crate::amount::Amount;
use crate::error::Result;
use crate::event::{EventLog, EventSink, LedgerEvent};
use crate::party::PartyId;
use crate::state::PoolState;
use crate::transfer::{InMemoryVault, ValueTransfer};
use log::debug;

/// A single pool of escrowed value shared by many parties.
///
/// Parties deposit and withdraw their own balances. The operator fixed at
/// creation may reassign balances within the pool and may sweep the pool once
/// every deposit has been matched by a withdrawal.
#[derive(Debug)]
pub struct Ledger<T = InMemoryVault, S = EventLog> {
    state: PoolState,
    transfer: T,
    sink: S,
}

impl<T: ValueTransfer, S: EventSink> Ledger<T, S> {
    /// Creates an empty ledger owned by `operator`.
    pub fn new(operator: PartyId, transfer: T, sink: S) -> Self {
        Ledger {
            state: PoolState::new(operator),
            transfer,
            sink,
        }
    }

    /// Pays `amount` from `party`'s wallet into the pool.
    pub fn deposit(&mut self, party: &PartyId, amount: Amount) -> Result<()> {
        let posting = self.state.plan_deposit(party, amount)?;
        self.transfer.pull(party, amount)?;
        self.state.apply(posting);

        debug!("Deposited {} for {}", amount, party);
        self.sink.emit(LedgerEvent::Deposit {
            party: party.clone(),
            amount,
        });
        Ok(())
    }

    /// Pays `amount` of `party`'s balance back out of the pool.
    ///
    /// A zero withdrawal is valid and only closes one open position.
    pub fn withdraw(&mut self, party: &PartyId, amount: Amount) -> Result<()> {
        let posting = self.state.plan_withdraw(party, amount)?;
        self.transfer.push(party, amount)?;
        self.state.apply(posting);

        debug!("Withdrew {} for {}", amount, party);
        self.sink.emit(LedgerEvent::Withdraw {
            party: party.clone(),
            amount,
        });
        Ok(())
    }

    /// Sets `party`'s balance to `new_balance`. Operator only.
    ///
    /// The pool total and the transaction counter are left alone; this only
    /// reassigns ownership of value already in the pool.
    pub fn update_player_balance(
        &mut self,
        caller: &PartyId,
        party: &PartyId,
        new_balance: Amount,
    ) -> Result<()> {
        self.state.authorize(caller)?;
        let posting = self.state.plan_set_balance(party, new_balance)?;
        self.state.apply(posting);

        debug!("Operator set balance of {} to {}", party, new_balance);
        self.sink.emit(LedgerEvent::UpdateBalance {
            party: party.clone(),
            new_balance,
        });
        Ok(())
    }

    /// Transfers the whole pool to the operator. Operator only.
    ///
    /// Fails with `SettlementPending` while any position is open and with
    /// `EmptyPool` when there is nothing to take. Party balances are not
    /// cleared. Returns the amount swept.
    pub fn owner_withdraw(&mut self, caller: &PartyId) -> Result<Amount> {
        self.state.authorize(caller)?;
        let (amount, posting) = self.state.plan_sweep()?;
        self.transfer.push(caller, amount)?;
        self.state.apply(posting);

        debug!("Operator {} swept {}", caller, amount);
        self.sink.emit(LedgerEvent::OwnerWithdraw {
            operator: caller.clone(),
            amount,
        });
        Ok(amount)
    }

    pub fn total_pool(&self) -> Amount {
        self.state.total_pool()
    }

    pub fn player_balance(&self, party: &PartyId) -> Amount {
        self.state.balance(party)
    }

    /// Deposits not yet matched by a withdrawal.
    pub fn transaction_counter(&self) -> u64 {
        self.state.pending()
    }

    pub fn operator(&self) -> &PartyId {
        self.state.operator()
    }

    /// Sum of every recorded party balance.
    pub fn allocated(&self) -> Amount {
        self.state.allocated()
    }

    pub fn balances(&self) -> impl Iterator<Item = (&PartyId, Amount)> {
        self.state.balances()
    }

    /// Returns `true` while recorded balances are fully backed by the pool.
    pub fn is_solvent(&self) -> bool {
        self.state.allocated() <= self.state.total_pool()
    }

    pub fn transfer(&self) -> &T {
        &self.transfer
    }

    pub fn transfer_mut(&mut self) -> &mut T {
        &mut self.transfer
    }

    pub fn sink(&self) -> &S {
        &self.sink
    }

    #[cfg(test)]
    pub(crate) fn state(&self) -> &PoolState {
        &self.state
    }
}

impl Ledger {
    /// Creates an empty ledger backed by an in-memory vault that records its events.
    ///
    /// `operator` is bound at creation and cannot change.
    pub fn in_memory(operator: PartyId) -> Self {
        Ledger::new(operator, InMemoryVault::new(), EventLog::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LedgerError;
    use crate::transfer::TransferError;

    fn party(id: &str) -> PartyId {
        PartyId::from(id)
    }

    fn funded_ledger() -> Ledger {
        let mut ledger = Ledger::in_memory(party("owner"));
        for id in ["alice", "bob"] {
            ledger
                .transfer_mut()
                .fund(&party(id), Amount::gwei(10))
                .unwrap();
        }
        ledger
    }

    #[test]
    fn test_deposit_moves_value_and_emits() {
        let mut ledger = funded_ledger();
        ledger.deposit(&party("alice"), Amount::gwei(1)).unwrap();

        assert_eq!(ledger.total_pool(), Amount::gwei(1));
        assert_eq!(ledger.player_balance(&party("alice")), Amount::gwei(1));
        assert_eq!(ledger.transaction_counter(), 1);
        assert_eq!(ledger.transfer().wallet(&party("alice")), Amount::gwei(9));
        assert_eq!(ledger.transfer().custody(), Amount::gwei(1));
        assert_eq!(
            ledger.sink().last(),
            Some(&LedgerEvent::Deposit {
                party: party("alice"),
                amount: Amount::gwei(1)
            })
        );
    }

    #[test]
    fn test_deposit_without_wallet_funds_records_nothing() {
        let mut ledger = funded_ledger();
        let err = ledger
            .deposit(&party("carol"), Amount::gwei(1))
            .unwrap_err();

        assert!(matches!(
            err,
            LedgerError::Transfer(TransferError::InsufficientWallet { .. })
        ));
        assert_eq!(ledger.total_pool(), Amount::ZERO);
        assert_eq!(ledger.transaction_counter(), 0);
        assert_eq!(ledger.balances().count(), 0);
        assert!(ledger.sink().is_empty());
    }

    #[test]
    fn test_refused_payout_rolls_back_withdrawal() {
        let mut ledger = funded_ledger();
        ledger.deposit(&party("alice"), Amount::gwei(2)).unwrap();
        ledger.transfer_mut().refuse_payouts_to(&party("alice"));

        let err = ledger
            .withdraw(&party("alice"), Amount::gwei(2))
            .unwrap_err();
        assert!(matches!(
            err,
            LedgerError::Transfer(TransferError::Refused(_))
        ));
        assert_eq!(ledger.player_balance(&party("alice")), Amount::gwei(2));
        assert_eq!(ledger.total_pool(), Amount::gwei(2));
        assert_eq!(ledger.transaction_counter(), 1);
        assert_eq!(ledger.sink().len(), 1);
    }

    #[test]
    fn test_refused_sweep_keeps_pool() {
        let mut ledger = funded_ledger();
        ledger.deposit(&party("alice"), Amount::gwei(2)).unwrap();
        ledger
            .update_player_balance(&party("owner"), &party("alice"), Amount::ZERO)
            .unwrap();
        ledger.withdraw(&party("alice"), Amount::ZERO).unwrap();
        ledger.transfer_mut().refuse_payouts_to(&party("owner"));

        assert!(ledger.owner_withdraw(&party("owner")).is_err());
        assert_eq!(ledger.total_pool(), Amount::gwei(2));
        assert_eq!(ledger.transfer().custody(), Amount::gwei(2));
    }

    #[test]
    fn test_unauthorized_checked_before_pool_limits() {
        let mut ledger = funded_ledger();
        // Would also exceed the pool, but the caller check comes first.
        let err = ledger
            .update_player_balance(&party("alice"), &party("alice"), Amount::gwei(100))
            .unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));

        // Would also be SettlementPending/EmptyPool.
        let err = ledger.owner_withdraw(&party("bob")).unwrap_err();
        assert!(matches!(err, LedgerError::Unauthorized { .. }));
    }

    #[test]
    fn test_update_emits_and_keeps_custody() {
        let mut ledger = funded_ledger();
        ledger.deposit(&party("alice"), Amount::gwei(4)).unwrap();
        ledger
            .update_player_balance(&party("owner"), &party("alice"), Amount::gwei(1))
            .unwrap();
        ledger
            .update_player_balance(&party("owner"), &party("bob"), Amount::gwei(3))
            .unwrap();

        assert_eq!(ledger.player_balance(&party("alice")), Amount::gwei(1));
        assert_eq!(ledger.player_balance(&party("bob")), Amount::gwei(3));
        assert_eq!(ledger.allocated(), Amount::gwei(4));
        assert!(ledger.is_solvent());
        assert_eq!(ledger.transfer().custody(), Amount::gwei(4));
        assert_eq!(
            ledger.sink().last(),
            Some(&LedgerEvent::UpdateBalance {
                party: party("bob"),
                new_balance: Amount::gwei(3)
            })
        );
        assert!(ledger.state().check_invariant());
    }
}
