//! Pool Ledger CLI
//!
//! Replays a CSV script of ledger calls and prints every party's final
//! ledger balance and wallet.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- <operator> script.csv > balances.csv
//! ```
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Set to `info`, `debug` or `warn` to control logging verbosity

use log::info;
use pool_ledger::{LedgerError, PartyId, Result, Session};
use std::env;
use std::fs::File;
use std::io::{self, BufReader};
use std::process;
use std::str::FromStr;

fn main() {
    env_logger::init();

    if let Err(e) = run() {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        return Err(LedgerError::MissingArgument);
    }

    let operator = PartyId::from_str(&args[1]).map_err(LedgerError::InvalidOperator)?;
    let file = File::open(&args[2])?;
    let reader = BufReader::new(file);

    let mut session = Session::new(operator);
    let stats = session.process_csv(reader)?;
    info!(
        "Replayed {} rows ({} rejected): pool={} pending={}",
        stats.applied + stats.rejected,
        stats.rejected,
        session.ledger().total_pool(),
        session.ledger().transaction_counter()
    );

    let stdout = io::stdout();
    let handle = stdout.lock();
    session.write_output(handle)?;

    Ok(())
}
