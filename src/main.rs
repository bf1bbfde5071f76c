use clap::Parser;
use miette::{IntoDiagnostic, Result};
use paysm::application::service::PaymentService;
use paysm::config::{DEFAULT_APPROVAL_RATE, DEFAULT_MAX_CHAIN_LENGTH, EngineConfig};
use paysm::domain::ports::{PaymentStoreRef, ProcessorRef};
use paysm::infrastructure::in_memory::InMemoryPaymentStore;
use paysm::infrastructure::processor::SimulatedProcessor;
use paysm::interfaces::csv::command_reader::{Command, CommandReader, CommandType};
use paysm::interfaces::csv::payment_writer::PaymentWriter;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Input commands CSV file (`command, payment, amount`)
    input: PathBuf,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, env = "PAYSM_DB_PATH")]
    db_path: Option<PathBuf>,

    /// Probability that the simulated processor approves a request
    #[arg(long, env = "PAYSM_APPROVAL_RATE", default_value_t = DEFAULT_APPROVAL_RATE)]
    approval_rate: f64,

    /// Seed for the simulated processor, for reproducible runs
    #[arg(long, env = "PAYSM_SEED")]
    seed: Option<u64>,

    /// Maximum number of events handled per command
    #[arg(long, env = "PAYSM_MAX_CHAIN", default_value_t = DEFAULT_MAX_CHAIN_LENGTH)]
    max_chain_length: usize,
}

impl Cli {
    fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            approval_rate: self.approval_rate,
            max_chain_length: self.max_chain_length,
            seed: self.seed,
        }
    }

    #[cfg(feature = "storage-rocksdb")]
    fn store(&self) -> paysm::error::Result<PaymentStoreRef> {
        use paysm::infrastructure::rocksdb::RocksDBStore;

        match &self.db_path {
            Some(path) => Ok(Arc::new(RocksDBStore::open(path)?)),
            None => Ok(Arc::new(InMemoryPaymentStore::new())),
        }
    }

    #[cfg(not(feature = "storage-rocksdb"))]
    fn store(&self) -> paysm::error::Result<PaymentStoreRef> {
        if self.db_path.is_some() {
            tracing::warn!(
                "Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to in-memory storage."
            );
        }
        Ok(Arc::new(InMemoryPaymentStore::new()))
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

async fn run_command(service: &PaymentService, command: Command) -> paysm::error::Result<()> {
    match command.command {
        CommandType::New => {
            service.new_payment(command.amount()?).await?;
        }
        CommandType::PreAuth => {
            let id = command.payment_id()?;
            let sm = service.pre_auth(id).await?;
            info!(payment = %id, "Pre-authorization finished in {}", sm.state());
        }
        CommandType::Authorize => {
            let id = command.payment_id()?;
            let sm = service.authorize_payment(id).await?;
            info!(payment = %id, "Authorization finished in {}", sm.state());
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = cli.engine_config().validate().into_diagnostic()?;
    let processor: ProcessorRef = match config.seed {
        Some(seed) => Arc::new(SimulatedProcessor::seeded(config.approval_rate, seed).into_diagnostic()?),
        None => Arc::new(SimulatedProcessor::new(config.approval_rate).into_diagnostic()?),
    };
    let store = cli.store().into_diagnostic()?;
    let service = PaymentService::new(store, processor, &config).into_diagnostic()?;

    // Process commands
    let file = File::open(&cli.input).into_diagnostic()?;
    let reader = CommandReader::new(file);
    for command in reader.commands() {
        match command {
            Ok(command) => {
                if let Err(e) = run_command(&service, command).await {
                    error!("Error processing command: {}", e);
                }
            }
            Err(e) => {
                error!("Error reading command: {}", e);
            }
        }
    }

    let payments = service.payments().await.into_diagnostic()?;

    let stdout = io::stdout();
    let mut writer = PaymentWriter::new(stdout.lock());
    writer.write_payments(payments).into_diagnostic()?;

    Ok(())
}
