//! sales-profiles CLI - Run sales queries against a chosen physical profile
//!
//! Usage:
//!   sales-profiles query <family> [--profile <n>] [--cache] [--param <key=value>]...
//!   sales-profiles profiles
//!   sales-profiles init
//!   sales-profiles serve [--bind <addr>]
//!
//! Examples:
//!   sales-profiles query monthly-revenue --profile 1
//!   sales-profiles query filtered-sales --param start_date=2024-06-01 --param end_date=2025-06-01
//!   sales-profiles query top-products --param limit=3 --explain

use clap::{Parser, Subcommand, ValueEnum};
use sales_profiles::catalog;
use sales_profiles::config::Settings;
use sales_profiles::controller::{QueryController, QueryRequest};
use sales_profiles::storage::schema;
use sales_profiles::{ProfileIndex, QueryError, QueryFamily};
use std::path::PathBuf;
use std::process::ExitCode;

/// Exit code for requests rejected before touching storage.
const EXIT_INVALID_REQUEST: u8 = 2;

#[derive(Parser)]
#[command(name = "sales-profiles")]
#[command(about = "Sales analytics over interchangeable physical query profiles")]
#[command(version)]
struct Cli {
    /// Path to a config file (searches the default locations if omitted)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// SQLite database, overriding the configured path
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a query and print the normalized rows as JSON
    Query {
        /// Logical query to run
        family: FamilyArg,

        /// 1-based profile index (family default if omitted)
        #[arg(short, long, allow_negative_numbers = true)]
        profile: Option<i64>,

        /// Read and fill the response cache
        #[arg(long)]
        cache: bool,

        /// Query parameter, repeatable
        #[arg(long = "param", value_name = "KEY=VALUE", value_parser = parse_key_val)]
        params: Vec<(String, String)>,

        /// Print the resolved SQL and bind values instead of running it
        #[arg(long)]
        explain: bool,
    },

    /// List every query family and its profiles
    Profiles,

    /// Create the tables and indexes in the configured database
    Init,

    /// Serve the HTTP API
    #[cfg(feature = "server")]
    Serve {
        /// Address to listen on, overriding the config
        #[arg(short, long)]
        bind: Option<String>,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum FamilyArg {
    MonthlyRevenue,
    FilteredSales,
    TopProducts,
}

impl From<FamilyArg> for QueryFamily {
    fn from(arg: FamilyArg) -> Self {
        match arg {
            FamilyArg::MonthlyRevenue => QueryFamily::MonthlyRevenue,
            FamilyArg::FilteredSales => QueryFamily::FilteredSales,
            FamilyArg::TopProducts => QueryFamily::TopProducts,
        }
    }
}

fn parse_key_val(s: &str) -> Result<(String, String), String> {
    s.split_once('=')
        .map(|(k, v)| (k.trim().to_string(), v.to_string()))
        .ok_or_else(|| format!("expected KEY=VALUE, got {s:?}"))
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match load_settings(cli.config.as_ref(), cli.db.as_ref()) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Query {
            family,
            profile,
            cache,
            params,
            explain,
        } => cmd_query(&settings, family.into(), profile, cache, &params, explain),
        Commands::Profiles => cmd_profiles(),
        Commands::Init => cmd_init(&settings),
        #[cfg(feature = "server")]
        Commands::Serve { bind } => cmd_serve(&settings, bind),
    }
}

fn load_settings(
    config: Option<&PathBuf>,
    db: Option<&PathBuf>,
) -> Result<Settings, sales_profiles::config::SettingsError> {
    let mut settings = match config {
        Some(path) => Settings::from_file(path)?,
        None => Settings::load()?,
    };
    if let Some(db) = db {
        settings.database.path = db.to_string_lossy().into_owned();
    }
    Ok(settings)
}

fn query_failure(e: &QueryError) -> ExitCode {
    eprintln!("Error: {}", e);
    if e.is_validation() {
        ExitCode::from(EXIT_INVALID_REQUEST)
    } else {
        ExitCode::FAILURE
    }
}

fn cmd_query(
    settings: &Settings,
    family: QueryFamily,
    profile: Option<i64>,
    cache: bool,
    params: &[(String, String)],
    explain: bool,
) -> ExitCode {
    let controller = match QueryController::from_settings(settings) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let request = QueryRequest::from_pairs(
        family,
        params.iter().map(|(k, v)| (k.as_str(), v.as_str())),
    )
    .and_then(|request| match profile {
        Some(value) => Ok(request.with_profile(ProfileIndex::new(value)?)),
        None => Ok(request),
    })
    .map(|request| {
        let enabled = request.cache || cache;
        request.with_cache(enabled)
    });
    let request = match request {
        Ok(r) => r,
        Err(e) => return query_failure(&e),
    };

    if explain {
        return match controller.prepare(&request) {
            Ok(prepared) => {
                println!(
                    "-- {} profile {} ({})",
                    family, prepared.selected.index, prepared.selected.profile.name
                );
                println!("-- fingerprint: {}", prepared.fingerprint);
                println!("{}", prepared.resolved.statement.sql());
                for (position, param) in prepared.resolved.statement.params().iter().enumerate() {
                    println!("-- ?{} = {:?}", position + 1, param);
                }
                ExitCode::SUCCESS
            }
            Err(e) => query_failure(&e),
        };
    }

    match controller.run(&request) {
        Ok(output) => match serde_json::to_string_pretty(output.records()) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Failed to render rows: {}", e);
                ExitCode::FAILURE
            }
        },
        Err(e) => query_failure(&e),
    }
}

fn cmd_profiles() -> ExitCode {
    let mut current = None;
    for info in catalog::listing() {
        if current != Some(info.family) {
            if current.is_some() {
                println!();
            }
            println!("{}:", info.family);
            current = Some(info.family);
        }
        let marker = if info.is_default { " (default)" } else { "" };
        println!("  {}. {}{} - {}", info.index, info.name, marker, info.summary);
    }
    ExitCode::SUCCESS
}

fn cmd_init(settings: &Settings) -> ExitCode {
    let path = match settings.database.resolved_path() {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match schema::provision_path(&path) {
        Ok(()) => {
            println!("OK: provisioned {}", path.display());
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Error provisioning '{}': {}", path.display(), e);
            ExitCode::FAILURE
        }
    }
}

#[cfg(feature = "server")]
fn cmd_serve(settings: &Settings, bind: Option<String>) -> ExitCode {
    use sales_profiles::web::{self, AppState};

    let state = match AppState::from_settings(settings) {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            return ExitCode::FAILURE;
        }
    };
    let bind = bind.unwrap_or_else(|| settings.server.bind.clone());

    let runtime = match tokio::runtime::Runtime::new() {
        Ok(rt) => rt,
        Err(e) => {
            eprintln!("Failed to start runtime: {}", e);
            return ExitCode::FAILURE;
        }
    };
    match runtime.block_on(web::serve(state, &bind)) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Server error: {}", e);
            ExitCode::FAILURE
        }
    }
}
