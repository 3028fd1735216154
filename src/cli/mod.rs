pub mod bench;
pub mod classify;
pub mod import;
pub mod init;
pub mod records;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "momo", about = "Turn mobile-money SMS exports into structured transaction records.")]
pub struct Cli {
    /// Log progress (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Choose a data directory and write settings.
    Init {
        /// Path for momo data (default: ~/Documents/momo)
        #[arg(long = "data-dir")]
        data_dir: Option<String>,
    },
    /// Parse an SMS export (XML) into a transaction record file.
    Parse {
        /// SMS export to read (default: source_file from settings)
        source: Option<String>,
        /// Where to write the records (default: output_file from settings)
        #[arg(long)]
        output: Option<String>,
    },
    /// Classify a single message body and print the result.
    Classify {
        /// Message body text
        body: String,
    },
    /// List stored records.
    List {
        /// Only show this type, e.g. codePay
        #[arg(long = "type")]
        tx_type: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Show one record as JSON.
    Show {
        id: u64,
        #[arg(long)]
        file: Option<String>,
    },
    /// Classify a message body and append it as a new record.
    Add {
        /// Message body text
        body: String,
        /// Display date to store with the record
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Change the type or amount of a stored record.
    Edit {
        id: u64,
        #[arg(long = "type")]
        tx_type: Option<String>,
        #[arg(long)]
        amount: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Replace a stored record with a newly classified message body.
    Replace {
        id: u64,
        /// Message body text
        body: String,
        /// Display date to store with the record
        #[arg(long)]
        date: Option<String>,
        #[arg(long)]
        file: Option<String>,
    },
    /// Delete a stored record.
    Delete {
        id: u64,
        #[arg(long)]
        file: Option<String>,
    },
    /// Compare linear search with hash lookup by id.
    Bench {
        /// Number of random lookups (default: bench_trials from settings)
        #[arg(long)]
        trials: Option<usize>,
        /// RNG seed for reproducible targets
        #[arg(long)]
        seed: Option<u64>,
        #[arg(long)]
        file: Option<String>,
    },
}
