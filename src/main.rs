use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use dedi_stats::api::{build_router, state::AppState};
use dedi_stats::calculate::{
    build_weekly_report, filter_roster, filter_window, latest_date, select_window,
    server_preferences, NicknameBook, WeeklyInputs,
};
use dedi_stats::config::AppConfig;
use dedi_stats::ingest::{self, ImportOptions};
use dedi_stats::models::{Record, ReportWindow};
use dedi_stats::report;
use dedi_stats::storage::{self, StorageConfig};

#[derive(Parser)]
#[command(name = "dedi-stats")]
#[command(about = "Weekly Dedimania leaderboard, rivalries and achievements")]
#[command(version)]
struct Cli {
    /// Path to configuration file
    #[arg(long, default_value = "./config.toml")]
    config: PathBuf,

    /// Data directory path (overrides the config file)
    #[arg(long)]
    data_dir: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long)]
    log_level: Option<String>,

    /// Output logs as JSON
    #[arg(long)]
    json_logs: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import record rows from a CSV/TSV export
    Import {
        /// File to import
        file: PathBuf,

        /// Player login for files without a login column
        #[arg(long)]
        player: Option<String>,

        /// Record file name under records/ (defaults to the player, then the file stem)
        #[arg(long)]
        target: Option<String>,

        /// Treat the file as a challenge_name,total_records table
        #[arg(long)]
        info: bool,
    },

    /// Build the weekly report
    Report {
        /// First day of the window (YYYY-MM-DD)
        #[arg(long)]
        from: Option<String>,

        /// Last day of the window (YYYY-MM-DD); defaults to the newest record
        #[arg(long)]
        to: Option<String>,

        /// Print only, write nothing under reports/
        #[arg(long)]
        dry_run: bool,

        /// Also write the leaderboard CSV to this path
        #[arg(long)]
        csv: Option<PathBuf>,
    },

    /// List head-to-head rivalries for a window
    Rivalries {
        #[arg(long)]
        from: Option<String>,

        #[arg(long)]
        to: Option<String>,
    },

    /// Show which servers each player races on
    Servers {
        /// Restrict to records from this day on
        #[arg(long)]
        from: Option<String>,

        /// Restrict to records up to this day
        #[arg(long)]
        to: Option<String>,

        /// Attempts needed on a server before it is listed
        #[arg(long)]
        min_records: Option<u32>,
    },

    /// Start the API server
    Serve {
        /// Bind address (overrides the config file)
        #[arg(long)]
        host: Option<String>,

        /// Port number (overrides the config file)
        #[arg(long)]
        port: Option<u16>,
    },
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = if cli.config.exists() {
        AppConfig::from_file(&cli.config)
            .with_context(|| format!("Failed to load {}", cli.config.display()))?
    } else {
        AppConfig::default()
    };
    if let Some(dir) = &cli.data_dir {
        config.data_dir = dir.clone();
    }
    if let Some(level) = &cli.log_level {
        config.log_level = level.clone();
    }
    config.validate()?;
    Ok(config)
}

fn parse_arg(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>> {
    match value {
        None => Ok(None),
        Some(raw) => match dedi_stats::parse_date(raw) {
            Some(date) => Ok(Some(date)),
            None => bail!("Invalid --{} date (expected YYYY-MM-DD): {}", name, raw),
        },
    }
}

fn resolve_window(from: Option<&str>, to: Option<&str>, records: &[Record]) -> Result<ReportWindow> {
    let from = parse_arg("from", from)?;
    let to = parse_arg("to", to)?;
    let fallback = latest_date(records).unwrap_or_else(|| Utc::now().date_naive());
    select_window(from, to, fallback).context("--from must not be after --to")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level));

    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("Starting dedi-stats v{}", env!("CARGO_PKG_VERSION"));

    let storage = StorageConfig::new(config.data_dir.clone());

    match cli.command {
        Commands::Import {
            file,
            player,
            target,
            info,
        } => {
            if info {
                let rows = ingest::import_challenge_info(&storage, &file)?;
                println!("Imported {} challenge info rows", rows);
            } else {
                let options = ImportOptions {
                    player_id: player,
                    target,
                    ..ImportOptions::default()
                };
                let summary = ingest::import_file(&storage, &file, &options)?;
                println!("\n=== Import Results ===");
                println!("Rows read:        {}", summary.rows_read);
                println!("Rows skipped:     {}", summary.rows_skipped);
                println!("Records appended: {}", summary.records_appended);
            }
        }
        Commands::Report {
            from,
            to,
            dry_run,
            csv,
        } => {
            let records = storage::load_records(&storage)?;
            let info = storage::load_competition_info(&storage)?;
            let window = resolve_window(from.as_deref(), to.as_deref(), &records)?;

            let rivalry = config.rivalry_options();
            let achievements = config.achievement_options()?;
            let inputs = WeeklyInputs {
                records: &records,
                info: &info,
                roster: &config.roster,
                rivalry: &rivalry,
                achievements: &achievements,
            };
            let weekly = build_weekly_report(window, window.previous(), &inputs);

            print!("{}", report::render_text(&weekly));

            if let Some(path) = csv {
                let file = std::fs::File::create(&path)
                    .with_context(|| format!("Failed to create {}", path.display()))?;
                report::write_leaderboard_csv(file, &weekly.leaderboard)?;
                println!("\nLeaderboard CSV: {}", path.display());
            }
            if !dry_run {
                for path in report::write_report_files(&storage, &weekly)? {
                    println!("Wrote {}", path.display());
                }
            }
        }
        Commands::Rivalries { from, to } => {
            let records = storage::load_records(&storage)?;
            let info = storage::load_competition_info(&storage)?;
            let window = resolve_window(from.as_deref(), to.as_deref(), &records)?;

            let rivalry = config.rivalry_options();
            let achievements = config.achievement_options()?;
            let inputs = WeeklyInputs {
                records: &records,
                info: &info,
                roster: &config.roster,
                rivalry: &rivalry,
                achievements: &achievements,
            };
            let weekly = build_weekly_report(window, window.previous(), &inputs);

            println!("=== Rivalries {} to {} ===", window.from, window.to);
            if weekly.rivalries.is_empty() {
                println!("No rivalries this week");
            } else {
                print!("{}", report::render_rivalries(&weekly.rivalries));
            }
        }
        Commands::Servers {
            from,
            to,
            min_records,
        } => {
            let mut records = storage::load_records(&storage)?;
            if from.is_some() || to.is_some() {
                let window = resolve_window(from.as_deref(), to.as_deref(), &records)?;
                records = filter_window(&records, &window);
            }
            let records = filter_roster(records, &config.roster);
            let names = NicknameBook::from_records(&records);
            let min_records = min_records.unwrap_or(config.server_analysis.min_records);

            let preferences = server_preferences(&records, &names, min_records);
            if preferences.is_empty() {
                println!("No player has {} or more attempts on a labelled server", min_records);
            } else {
                print!("{}", report::render_servers(&preferences));
            }
        }
        Commands::Serve { host, port } => {
            let host = host.unwrap_or_else(|| config.server.host.clone());
            let port = port.unwrap_or(config.server.port);

            let state = AppState::new(config)?;
            let app = build_router(state);
            let addr = format!("{}:{}", host, port);
            let listener = tokio::net::TcpListener::bind(&addr).await?;
            tracing::info!("Listening on http://{}", addr);
            axum::serve(listener, app).await?;
        }
    }

    Ok(())
}
