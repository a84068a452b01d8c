use clap::Parser;
use distributor::application::engine::VendingMachine;
use distributor::domain::coin::DenominationTable;
use distributor::domain::ports::ProductCatalog;
use distributor::domain::session::SessionState;
use distributor::infrastructure::in_memory::InMemoryProductCatalog;
use distributor::interfaces::csv::catalog_reader::CatalogReader;
use distributor::interfaces::csv::command_reader::CommandReader;
use distributor::interfaces::json::outcome_writer::{Outcome, OutcomeWriter};
use distributor::interfaces::script;
use miette::{IntoDiagnostic, Result};
use rust_decimal::Decimal;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use tracing::warn;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Session script CSV file (`action, arg, price`)
    script: PathBuf,

    /// Products CSV file (`name, price`) loaded into the catalog before the script runs
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Accepted coin values, comma separated. Defaults to 0.50,1.00,2.00,5.00,10.00
    #[arg(long, value_delimiter = ',')]
    coins: Option<Vec<Decimal>>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let cli = Cli::parse();

    let denominations = match cli.coins {
        Some(values) => DenominationTable::new(values).into_diagnostic()?,
        None => DenominationTable::default(),
    };

    let catalog = InMemoryProductCatalog::new();
    if let Some(path) = cli.catalog {
        let file = File::open(path).into_diagnostic()?;
        for product in CatalogReader::new(file).products() {
            catalog
                .save(product.into_diagnostic()?)
                .await
                .into_diagnostic()?;
        }
    }

    let machine = VendingMachine::new(Box::new(catalog), denominations, SessionState::new());

    let file = File::open(cli.script).into_diagnostic()?;
    let stdout = io::stdout();
    let mut writer = OutcomeWriter::new(stdout.lock());
    for command in CommandReader::new(file).commands() {
        let outcome = match command {
            Ok(command) => script::execute(&machine, command).await,
            Err(e) => {
                warn!(reason = %e, "Error reading command");
                Outcome::from(&e)
            }
        };
        writer.write(&outcome).into_diagnostic()?;
    }
    writer.flush().into_diagnostic()?;

    Ok(())
}
