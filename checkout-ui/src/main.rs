use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::io::{BufReader, stdin, stdout};
use tracing::{debug, info};

use checkout_core::WizardStore;
use checkout_ui::api::{SimulatedCatalog, SimulatedPurchase};
use checkout_ui::{AppConfig, CheckoutApp, build_registry, logging, run};

// ─── CLI definition ──────────────────────────────────────────────────────────

/// Four-step checkout wizard in the terminal.
///
/// Progress is saved after every step, so quitting and starting again
/// resumes where you left off.
#[derive(Debug, Parser)]
struct Cli {
    /// Config file. Defaults to `checkout.toml` in the working directory,
    /// if present.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Storage backend (`file`, `sqlite` or `memory`).
    #[arg(long)]
    backend: Option<String>,

    /// Storage connection string: a directory for `file`, a database path
    /// or `:memory:` for `sqlite`.
    #[arg(long)]
    db: Option<String>,

    /// Log filter, e.g. `debug` or `info,checkout_core=trace`.
    #[arg(long)]
    log_level: Option<String>,

    /// Reject the first N purchase attempts.
    #[arg(long, value_name = "N")]
    fail_purchase: Option<u32>,

    /// Discard saved progress before starting.
    #[arg(long)]
    reset: bool,
}

impl Cli {
    fn apply_overrides(
        &self,
        config: &mut AppConfig,
    ) {
        if let Some(backend) = &self.backend {
            config.storage.backend = backend.clone();
        }
        if let Some(db) = &self.db {
            config.storage.connection_string = db.clone();
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(n) = self.fail_purchase {
            config.purchase.fail_first = n;
        }
    }
}

// ─── entry point ─────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load_or_default(cli.config.as_deref())?;
    cli.apply_overrides(&mut config);
    logging::init_logging(&config.logging)?;

    debug!("opening {} storage", config.storage.backend);
    let storage = build_registry().create(&config.storage).await?;
    let mut store = WizardStore::open(storage).await;
    if cli.reset {
        store.reset_wizard().await?;
        info!("saved progress discarded");
    }

    let app = CheckoutApp::start(
        store,
        Arc::new(SimulatedCatalog::from_config(&config.catalog)),
        Arc::new(SimulatedPurchase::from_config(&config.purchase)),
    );
    run(app, BufReader::new(stdin()), stdout()).await
}
