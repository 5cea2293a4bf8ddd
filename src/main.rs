//! Split Ledger CLI
//!
//! Command-line interface for settling shared expenses from CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- members.csv transactions.csv > report.json
//! cargo run -- --format csv members.csv transactions.csv > report.csv
//! cargo run -- --strategy sync --month 3 --year 2024 members.csv transactions.csv
//! cargo run -- --strategy async --batch-size 2000 --max-concurrent 8 members.csv transactions.csv
//! ```
//!
//! The report goes to stdout; logs go to stderr.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (invalid period, file not found, file not readable, etc.)

use split_ledger::cli;
use split_ledger::strategy;
use std::process;

fn main() {
    let args = cli::parse_args();
    cli::init_logging(&args.log_level);

    let options = match args.to_options() {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {}", e);
            process::exit(1);
        }
    };

    let strategy = {
        let config = if matches!(args.strategy, cli::StrategyType::Async) {
            Some(args.to_batch_config())
        } else {
            None
        };
        strategy::create_strategy(args.strategy, config, options)
    };

    let mut output = std::io::stdout();
    if let Err(e) = strategy.process(&args.to_input(), &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
