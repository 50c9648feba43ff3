//! Replays a CSV script of ledger calls.
//!
//! The session owns a ledger backed by an [`InMemoryVault`], so scripts can
//! fund wallets, run deposits and withdrawals, and exercise the operator paths
//! end to end. Rows that fail to parse or are rejected by the ledger are logged
//! and skipped.

use crate::amount::Amount;
use crate::command::{Command, CommandRecord};
use crate::error::{LedgerError, Result};
use crate::event::LogSink;
use crate::ledger::Ledger;
use crate::party::PartyId;
use crate::transfer::InMemoryVault;
use csv::{ReaderBuilder, Trim, WriterBuilder};
use log::{debug, warn};
use serde::Serialize;
use std::collections::BTreeSet;
use std::io::{Read, Write};

/// Counts of script rows by outcome.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReplayStats {
    pub applied: usize,
    pub rejected: usize,
}

/// One output row per known party.
#[derive(Debug, Serialize)]
struct PartyRow<'a> {
    party: &'a PartyId,
    balance: Amount,
    wallet: Amount,
}

/// A ledger plus the script runner around it.
pub struct Session {
    ledger: Ledger<InMemoryVault, LogSink>,
}

impl Session {
    /// Creates a session with an empty ledger and no funded wallets.
    ///
    /// `operator` is bound to the ledger at creation and cannot change.
    pub fn new(operator: PartyId) -> Self {
        Session {
            ledger: Ledger::new(operator, InMemoryVault::new(), LogSink),
        }
    }

    pub fn ledger(&self) -> &Ledger<InMemoryVault, LogSink> {
        &self.ledger
    }

    /// Processes script rows from a CSV reader in streaming fashion.
    pub fn process_csv<R: Read>(&mut self, reader: R) -> Result<ReplayStats> {
        let mut csv_reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(reader);
        let mut stats = ReplayStats::default();

        for (row_idx, result) in csv_reader.deserialize::<CommandRecord>().enumerate() {
            let row_num = row_idx + 2; // 1-indexed, accounting for header row

            let outcome = result
                .map_err(LedgerError::from)
                .and_then(|record| {
                    record
                        .parse()
                        .map_err(|message| LedgerError::InvalidRecord {
                            row: row_num,
                            message,
                        })
                })
                .and_then(|command| self.execute(command));

            match outcome {
                Ok(()) => stats.applied += 1,
                Err(e) => {
                    warn!("Row {}: {}", row_num, e);
                    stats.rejected += 1;
                }
            }
        }

        Ok(stats)
    }

    /// Runs one command against the ledger.
    pub fn execute(&mut self, command: Command) -> Result<()> {
        match command {
            Command::Fund { party, amount } => {
                self.ledger.transfer_mut().fund(&party, amount)?;
                debug!("Funded wallet of {} with {}", party, amount);
            }
            Command::Deposit { party, amount } => self.ledger.deposit(&party, amount)?,
            Command::Withdraw { party, amount } => self.ledger.withdraw(&party, amount)?,
            Command::Update {
                caller,
                party,
                balance,
            } => self
                .ledger
                .update_player_balance(&caller, &party, balance)?,
            Command::Sweep { caller } => {
                self.ledger.owner_withdraw(&caller)?;
            }
        }
        Ok(())
    }

    /// Writes every known party's ledger balance and wallet to CSV.
    ///
    /// Output is sorted by party for deterministic results.
    pub fn write_output<W: Write>(&self, writer: W) -> Result<()> {
        let mut csv_writer = WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        csv_writer.write_record(["party", "balance", "wallet"])?;

        let vault = self.ledger.transfer();
        let parties: BTreeSet<&PartyId> = self
            .ledger
            .balances()
            .map(|(party, _)| party)
            .chain(vault.wallets().map(|(party, _)| party))
            .collect();

        for party in parties {
            csv_writer.serialize(PartyRow {
                party,
                balance: self.ledger.player_balance(party),
                wallet: vault.wallet(party),
            })?;
        }

        csv_writer.flush()?;
        Ok(())
    }
}
