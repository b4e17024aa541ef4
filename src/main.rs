//! Vouch - a terminal workbench for AI-assisted SQL with analyst-verified queries.

use std::sync::Arc;

use sql_vouch::answer::{AnswerClient, HttpAnswerClient, MockAnswerClient};
use sql_vouch::app::Workbench;
use sql_vouch::catalog::{CatalogClient, HttpCatalogClient, MockCatalogClient, TableData};
use sql_vouch::cli::Cli;
use sql_vouch::config::Config;
use sql_vouch::error::{Result, VouchError};
use sql_vouch::oracle::{MockOracle, OpenAiOracle, Oracle, OracleProvider};
use sql_vouch::session::Session;
use sql_vouch::store::QueryStore;
use sql_vouch::{logging, tui};
use tracing::{error, info, warn};

#[tokio::main]
async fn main() {
    // Pick up OPENAI_API_KEY and friends from a local .env if present.
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    // The TUI owns the terminal, so logs go to a file.
    logging::init_file_logging(cli.log_level.as_deref());

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    // Load configuration file, then layer CLI flags and environment on top
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);
    config.credentials.apply_env_defaults();
    config.validate()?;

    let store = QueryStore::load(config.store.path.clone());
    info!(
        "Verified-query store: {} ({} queries)",
        store.path().display(),
        store.len()
    );

    let session = Session::new(config.analyst.clone(), cli.dashboard);

    let (answer, catalog, oracle) = build_clients(&cli, &config)?;

    info!(
        "Starting {} dashboard (answer: {}, catalog: {})",
        cli.dashboard,
        config.answer_display(),
        config.catalog_display()
    );

    let workbench = Workbench::new(
        answer,
        catalog,
        oracle,
        store,
        session,
        config.catalog.row_limit,
    );

    tui::run(workbench).await
}

/// Builds the upstream clients: answer service, catalog, and oracle.
///
/// With `--mock` every upstream is an in-process stand-in, so the TUI can be
/// explored without a running service or an API key.
fn build_clients(
    cli: &Cli,
    config: &Config,
) -> Result<(
    Arc<dyn AnswerClient>,
    Arc<dyn CatalogClient>,
    Option<Arc<dyn Oracle>>,
)> {
    if cli.mock {
        info!("Mock mode: all upstream clients are in-process stand-ins");
        let table = TableData::new(
            vec!["order_id".to_string(), "city".to_string()],
            vec![
                vec!["1001".to_string(), "Portland".to_string()],
                vec!["1002".to_string(), "Eugene".to_string()],
                vec!["1003".to_string(), "Salem".to_string()],
            ],
        );
        return Ok((
            Arc::new(MockAnswerClient::canned()),
            Arc::new(MockCatalogClient::with_table(table)),
            Some(Arc::new(MockOracle::new())),
        ));
    }

    let answer = Arc::new(HttpAnswerClient::new(&config.answer, &config.credentials)?);
    let catalog = Arc::new(HttpCatalogClient::new(&config.catalog, &config.credentials)?);
    let oracle = build_oracle(config)?;

    Ok((answer, catalog, oracle))
}

/// Resolves the oracle from config.
///
/// A missing API key disables the oracle instead of aborting: the assistant
/// dashboard still works, it just skips verified-query matching.
fn build_oracle(config: &Config) -> Result<Option<Arc<dyn Oracle>>> {
    let provider = config
        .oracle
        .provider
        .parse::<OracleProvider>()
        .map_err(VouchError::config)?;

    match provider {
        OracleProvider::OpenAi => match OpenAiOracle::from_env(&config.oracle.model) {
            Ok(oracle) => {
                info!("Oracle: openai ({})", config.oracle.model);
                Ok(Some(Arc::new(oracle)))
            }
            Err(e) => {
                warn!("Oracle disabled: {e}");
                Ok(None)
            }
        },
        OracleProvider::Mock => {
            info!("Oracle: mock");
            Ok(Some(Arc::new(MockOracle::new())))
        }
        OracleProvider::None => {
            info!("Oracle: none (matching disabled)");
            Ok(None)
        }
    }
}
