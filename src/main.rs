use std::{path::PathBuf, process::exit};

use clap::{Parser, Subcommand};
use compact_str::CompactString;
use gitlab_users::{
    client::{ClientConfig, GitlabUserService},
    config::{default_config_path, load_config},
    logging::{init_logging, LoggingConfig},
    result::{AppError, Result},
    SearchOptions,
};
use serde::Serialize;
use tracing_appender::non_blocking::WorkerGuard;

/// Look up GitLab users through a provider-neutral user service
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Alternate path to the configuration file.
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Print the path to the configuration file and exit.
    #[arg(short, long)]
    print_config_path: bool,
    /// Write every GitLab response body to the debug log directory.
    #[arg(long)]
    debug: bool,
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Resolve a single user by login name
    Get { login: CompactString },
    /// Resolve several users; unknown logins are skipped
    List {
        #[arg(required = true)]
        logins: Vec<CompactString>,
    },
    /// Verify credentials and print the user behind them
    Auth {
        login: CompactString,
        #[arg(long, env = "GITLAB_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Search users (not supported by GitLab, always empty)
    Search {
        query: CompactString,
        #[arg(long, default_value_t = gitlab_users::user_service::DEFAULT_SEARCH_LIMIT)]
        limit: usize,
    },
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    let config_path = args.config.clone().unwrap_or_else(default_config_path);

    if args.print_config_path {
        println!("{}", config_path.display());
        exit(0);
    }

    let Some(command) = args.command else {
        eprintln!("no command given, see --help");
        exit(2);
    };

    let config = load_config(&config_path)?.with_env_overrides();
    let _log_guard = initialize_logging(config.log_level.as_deref())?;
    tracing::info!(version = env!("CARGO_PKG_VERSION"), "gitlab-users starting up");

    config.validate()?;
    let client_config = ClientConfig::from(config).with_debug_logging(args.debug);

    let rt = tokio::runtime::Runtime::new()
        .map_err(|e| AppError::GeneralError(format!("Failed to create runtime: {e}").into()))?;

    rt.block_on(run(command, client_config))?;
    Ok(())
}

fn initialize_logging(log_level: Option<&str>) -> Result<Option<WorkerGuard>> {
    let mut logging_config = LoggingConfig::from_env();
    if let Some(level) = log_level {
        logging_config = logging_config.with_level(level);
    }

    init_logging(logging_config)
        .map_err(|e| AppError::GeneralError(format!("Failed to initialize logging: {e}").into()))
}

async fn run(command: Command, config: ClientConfig) -> Result<()> {
    let service = GitlabUserService::new(config)?;

    match command {
        Command::Get { login } => print_json(&service.get(&login).await?),
        Command::List { logins } => print_json(&service.list(&logins).await?),
        Command::Auth { login, password } => print_json(&service.auth(&login, &password).await?),
        Command::Search { query, limit } => {
            let options = SearchOptions::default().with_limit(limit);
            print_json(&service.search(&query, options).await?)
        },
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| AppError::GeneralError(format!("Failed to render output: {e}").into()))?;
    println!("{json}");
    Ok(())
}
