mod bench;
mod classifier;
mod cli;
mod error;
mod extractor;
mod importer;
mod models;
mod settings;
mod store;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};

fn init_logging(verbose: bool) {
    let default = if verbose { "info" } else { "warn" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = match cli.command {
        Commands::Init { data_dir } => cli::init::run(data_dir),
        Commands::Parse { source, output } => cli::import::run(source.as_deref(), output.as_deref()),
        Commands::Classify { body } => cli::classify::run(&body),
        Commands::List { tx_type, file } => cli::records::list(tx_type.as_deref(), file.as_deref()),
        Commands::Show { id, file } => cli::records::show(id, file.as_deref()),
        Commands::Add { body, date, file } => {
            cli::records::add(&body, date.as_deref(), file.as_deref())
        }
        Commands::Edit {
            id,
            tx_type,
            amount,
            file,
        } => cli::records::edit(id, tx_type.as_deref(), amount.as_deref(), file.as_deref()),
        Commands::Replace { id, body, date, file } => {
            cli::records::replace(id, &body, date.as_deref(), file.as_deref())
        }
        Commands::Delete { id, file } => cli::records::delete(id, file.as_deref()),
        Commands::Bench { trials, seed, file } => {
            cli::bench::run(trials, seed, file.as_deref())
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
