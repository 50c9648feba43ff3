//! Script records for replaying ledger calls from CSV.

use crate::amount::Amount;
use crate::party::PartyId;
use serde::Deserialize;
use std::str::FromStr;

/// Raw script record as read from CSV.
///
/// Header: `op,caller,party,amount`. The `party` column is only used by
/// `update`; `amount` is absent for `sweep`.
#[derive(Debug, Deserialize)]
pub struct CommandRecord {
    /// Operation: fund, deposit, withdraw, update, sweep
    pub op: String,

    /// Identity making the call
    pub caller: String,

    /// Target of an operator balance update
    pub party: Option<String>,

    /// Amount in wei, optionally suffixed with a unit (`gwei`, `ether`)
    pub amount: Option<String>,
}

impl CommandRecord {
    /// Parses the raw CSV record into a typed command.
    pub fn parse(&self) -> Result<Command, String> {
        let op = self.op.trim().to_lowercase();
        let caller = PartyId::from_str(&self.caller)?;

        match op.as_str() {
            "fund" => Ok(Command::Fund {
                party: caller,
                amount: self.parse_amount()?,
            }),
            "deposit" => Ok(Command::Deposit {
                party: caller,
                amount: self.parse_amount()?,
            }),
            "withdraw" | "withdrawal" => Ok(Command::Withdraw {
                party: caller,
                amount: self.parse_amount()?,
            }),
            "update" => {
                let party = self
                    .party
                    .as_deref()
                    .ok_or_else(|| "update requires a party".to_string())
                    .and_then(PartyId::from_str)?;
                Ok(Command::Update {
                    caller,
                    party,
                    balance: self.parse_amount()?,
                })
            }
            "sweep" => Ok(Command::Sweep { caller }),
            other => Err(format!("unknown operation {:?}", other)),
        }
    }

    fn parse_amount(&self) -> Result<Amount, String> {
        let raw = self
            .amount
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .ok_or_else(|| "missing amount".to_string())?;
        Amount::from_str(raw).map_err(|e| e.to_string())
    }
}

/// A parsed script command ready to run against a ledger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Credit an external wallet. Does not touch the ledger.
    Fund { party: PartyId, amount: Amount },

    Deposit { party: PartyId, amount: Amount },

    Withdraw { party: PartyId, amount: Amount },

    /// Operator reassigns `party`'s balance.
    Update {
        caller: PartyId,
        party: PartyId,
        balance: Amount,
    },

    /// Operator sweeps the pool.
    Sweep { caller: PartyId },
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(op: &str, caller: &str, party: Option<&str>, amount: Option<&str>) -> CommandRecord {
        CommandRecord {
            op: op.to_string(),
            caller: caller.to_string(),
            party: party.map(str::to_string),
            amount: amount.map(str::to_string),
        }
    }

    #[test]
    fn test_parse_deposit() {
        let cmd = record("deposit", "alice", None, Some("1gwei")).parse().unwrap();
        assert_eq!(
            cmd,
            Command::Deposit {
                party: PartyId::from("alice"),
                amount: Amount::gwei(1)
            }
        );
    }

    #[test]
    fn test_parse_zero_withdraw() {
        let cmd = record(" Withdraw ", " bob ", None, Some(" 0 ")).parse().unwrap();
        assert_eq!(
            cmd,
            Command::Withdraw {
                party: PartyId::from("bob"),
                amount: Amount::ZERO
            }
        );
    }

    #[test]
    fn test_parse_update_needs_party() {
        assert!(record("update", "owner", None, Some("5")).parse().is_err());

        let cmd = record("update", "owner", Some("alice"), Some("5"))
            .parse()
            .unwrap();
        assert!(matches!(cmd, Command::Update { .. }));
    }

    #[test]
    fn test_parse_sweep_ignores_amount() {
        let cmd = record("SWEEP", "owner", None, None).parse().unwrap();
        assert_eq!(
            cmd,
            Command::Sweep {
                caller: PartyId::from("owner")
            }
        );
    }

    #[test]
    fn test_parse_rejects_bad_input() {
        assert!(record("mint", "owner", None, Some("1")).parse().is_err());
        assert!(record("deposit", "", None, Some("1")).parse().is_err());
        assert!(record("deposit", "alice", None, None).parse().is_err());
        assert!(record("deposit", "alice", None, Some("")).parse().is_err());
        assert!(record("deposit", "alice", None, Some("-3")).parse().is_err());
    }
}
