//! Add two bit-strings on a relay-level ripple adder.
//!
//! ```text
//! cargo run -p relaykit --example ripple_add -- 10011101 11010110
//! RUST_LOG=relaykit=trace cargo run -p relaykit --example ripple_add -- --threaded 2 0111 0001
//! ```

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;
use relaykit::prelude::*;
use relaykit::types::TracingObserver;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(version, about = "Ripple-carry addition on simulated relays", long_about = None)]
struct Args {
    /// First operand, most significant bit first.
    a: String,
    /// Second operand, same width as the first.
    b: String,
    /// Operand width. Defaults to the length of the first operand.
    #[arg(long)]
    width: Option<usize>,
    /// Feed a carry into the least significant stage.
    #[arg(long, conflicts_with = "subtract")]
    carry_in: bool,
    /// Subtract `b` from `a` instead of adding. The subtractor's carry-in
    /// is tied high, so this cannot be combined with `--carry-in`.
    #[arg(long)]
    subtract: bool,
    /// Deliver broadcasts with at least this many subscribers on worker
    /// threads. Must be 2 or more.
    #[arg(long, value_name = "SUBSCRIBERS")]
    threaded: Option<usize>,
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let config = BoardConfig {
        fan_out: match args.threaded {
            Some(min_subscribers) => FanOut::Threaded { min_subscribers },
            None => FanOut::Inline,
        },
        observer: Arc::new(TracingObserver),
    };
    let board = match Board::new(config) {
        Ok(board) => board,
        Err(err) => {
            eprintln!("error: {err}");
            return ExitCode::FAILURE;
        }
    };

    let width = args.width.unwrap_or_else(|| args.a.chars().count());
    let result = if args.subtract {
        RippleSubtractor::parse(&board, width, &args.a, &args.b).map(|sub| {
            let sign = if sub.is_negative() { "negative" } else { "non-negative" };
            format!("{} ({sign})", sub.difference_bits())
        })
    } else {
        RippleAdder::parse(&board, width, &args.a, &args.b, args.carry_in).map(|adder| adder.render())
    };

    match result {
        Ok(rendered) => {
            println!("{rendered}");
            ExitCode::SUCCESS
        }
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::error::ErrorKind;
    use clap::CommandFactory;

    #[test]
    fn command_is_well_formed() {
        Args::command().debug_assert();
    }

    #[test]
    fn carry_in_with_subtract_is_refused() {
        let err = Args::try_parse_from(["ripple_add", "--subtract", "--carry-in", "0111", "0001"])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
    }

    #[test]
    fn carry_in_alone_is_accepted() {
        let args = Args::try_parse_from(["ripple_add", "--carry-in", "0111", "0001"]).unwrap();
        assert!(args.carry_in);
        assert!(!args.subtract);

        let args = Args::try_parse_from(["ripple_add", "--subtract", "0111", "0001"]).unwrap();
        assert!(args.subtract);
        assert!(!args.carry_in);
    }
}
