//! CUPID CLI - Standalone command-line interface for the match engine
//!
//! Runs match generation over JSON fixture files using the in-memory
//! providers. Useful for dry-running a campaign's roster and tuning
//! configuration before the surrounding system wires the engine to real
//! storage.

use clap::{Parser, Subcommand, ValueEnum};
use cupid::core::{CampaignConfig, GenerationError, MatchEngine, MatchTier, UserProfile};
use cupid::events::observers::{LoggingObserver, MetricsObserver};
use cupid::events::EventBus;
use cupid::providers::{InMemoryCrushes, InMemoryRoster, InMemoryStore, StaticConfig};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::sync::Arc;
use tracing::warn;

/// CUPID CLI - compatibility scoring and greedy match assignment
#[derive(Parser)]
#[command(name = "cupid-cli")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

/// Output format for CLI responses
#[derive(Clone, Copy, ValueEnum, Default)]
enum OutputFormat {
    /// Human-readable text output
    #[default]
    Text,
    /// JSON output for programmatic use
    Json,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full match generation over a roster file
    Generate {
        /// JSON file with the eligible users and their survey responses
        #[arg(long)]
        roster: PathBuf,

        /// JSON file with directed crush entries (optional)
        #[arg(long)]
        crushes: Option<PathBuf>,

        /// JSON file with the campaign configuration (optional)
        #[arg(long)]
        config: Option<PathBuf>,

        /// Campaign identifier
        #[arg(long, default_value = "default")]
        campaign: String,

        /// Print the metrics report after the run
        #[arg(long)]
        metrics: bool,
    },

    /// Score a single pair from a roster file
    Score {
        /// JSON file with the eligible users and their survey responses
        #[arg(long)]
        roster: PathBuf,

        /// First user id
        #[arg(long)]
        user1: String,

        /// Second user id
        #[arg(long)]
        user2: String,

        /// JSON file with the campaign configuration (optional)
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Print the match tier for a score
    Tier {
        /// Compatibility score (0-100)
        score: f64,
    },
}

/// One directed crush fact in a crushes fixture file
#[derive(Debug, Deserialize)]
struct CrushEntry {
    from: String,
    to: String,
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "info",
        1 => "debug",
        _ => "trace",
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

fn load_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> Result<T, String> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read {} file {}: {}", what, path.display(), e))?;
    serde_json::from_str(&raw)
        .map_err(|e| format!("Failed to parse {} file {}: {}", what, path.display(), e))
}

fn load_config(path: Option<&Path>) -> CampaignConfig {
    match path {
        Some(path) => match load_json::<CampaignConfig>(path, "config") {
            Ok(config) => config,
            Err(message) => {
                warn!(error = %message, "Unreadable config, using defaults");
                CampaignConfig::default()
            }
        },
        None => CampaignConfig::default(),
    }
}

async fn run_generate(
    roster_path: &Path,
    crushes_path: Option<&Path>,
    config_path: Option<&Path>,
    campaign: &str,
    show_metrics: bool,
    format: OutputFormat,
) -> Result<(), String> {
    let users: Vec<UserProfile> = load_json(roster_path, "roster")?;
    let config = load_config(config_path);

    let crushes = Arc::new(InMemoryCrushes::new());
    if let Some(path) = crushes_path {
        let entries: Vec<CrushEntry> = load_json(path, "crushes")?;
        for entry in entries {
            crushes.add_crush(&entry.from, &entry.to, campaign);
        }
    }

    let bus = EventBus::with_default_capacity();
    let logging = LoggingObserver::new(&bus);
    let metrics_observer = MetricsObserver::new(&bus);
    let metrics = metrics_observer.metrics();
    tokio::spawn(logging.run());
    let metrics_task = tokio::spawn(metrics_observer.run());

    let store = Arc::new(InMemoryStore::new());
    let engine = MatchEngine::new(
        Arc::new(InMemoryRoster::with_campaign(campaign, users)),
        crushes,
        Arc::clone(&store) as Arc<dyn cupid::providers::MatchStore>,
        Arc::new(StaticConfig::new(config)),
    )
    .with_event_bus(bus.clone());

    let summary = engine
        .generate_all_matches(campaign)
        .map_err(|e: GenerationError| e.to_string())?;

    // Close the bus so observers drain and stop
    drop(bus);
    drop(engine);
    let _ = metrics_task.await;

    let matches = store.matches_for(campaign);
    match format {
        OutputFormat::Json => {
            let output = serde_json::json!({
                "summary": summary,
                "matches": matches,
            });
            println!(
                "{}",
                serde_json::to_string_pretty(&output).map_err(|e| e.to_string())?
            );
        }
        OutputFormat::Text => {
            println!(
                "Generated {} matches from {} users",
                summary.matches_created, summary.total_users
            );
            for record in &matches {
                println!(
                    "  {} <-> {}  score={:.2} tier={} ranks={}|{}{}",
                    record.user1_id,
                    record.user2_id,
                    record.compatibility_score,
                    record.match_tier,
                    record.rank_for_user1,
                    record.rank_for_user2,
                    if record.is_mutual_crush { " (mutual crush)" } else { "" },
                );
            }
        }
    }

    if show_metrics {
        let metrics = metrics.lock().unwrap();
        println!("\n{}", metrics.report());
    }

    Ok(())
}

fn run_score(
    roster_path: &Path,
    user1: &str,
    user2: &str,
    config_path: Option<&Path>,
    format: OutputFormat,
) -> Result<(), String> {
    let users: Vec<UserProfile> = load_json(roster_path, "roster")?;
    let config = load_config(config_path);

    let find = |id: &str| {
        users
            .iter()
            .find(|u| u.id == id)
            .ok_or_else(|| format!("User {} not found in roster", id))
    };
    let a = find(user1)?;
    let b = find(user2)?;

    let score = cupid::core::calculate_compatibility(a, b, cupid::core::NO_CRUSH_BONUS, &config);
    match format {
        OutputFormat::Json => println!(
            "{}",
            serde_json::to_string_pretty(&score).map_err(|e| e.to_string())?
        ),
        OutputFormat::Text => {
            println!("score: {:.2} (tier {})", score.score, MatchTier::for_score(score.score));
            println!("  demographics: {}", score.breakdown.demographics);
            println!("  personality:  {}", score.breakdown.personality);
            println!("  values:       {}", score.breakdown.values);
            println!("  lifestyle:    {}", score.breakdown.lifestyle);
            println!("  interests:    {}", score.breakdown.interests);
        }
    }
    Ok(())
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match &cli.command {
        Commands::Generate {
            roster,
            crushes,
            config,
            campaign,
            metrics,
        } => {
            run_generate(
                roster,
                crushes.as_deref(),
                config.as_deref(),
                campaign,
                *metrics,
                cli.format,
            )
            .await
        }
        Commands::Score {
            roster,
            user1,
            user2,
            config,
        } => run_score(roster, user1, user2, config.as_deref(), cli.format),
        Commands::Tier { score } => {
            println!("{}", MatchTier::for_score(*score));
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(message) => {
            eprintln!("error: {}", message);
            ExitCode::FAILURE
        }
    }
}
