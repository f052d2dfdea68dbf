use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing::{debug, info};

use house_cup::model::{Activity, ActivityStatus, ActivityType};
use house_cup::scoring::{self, RawDistribution, ScoringError};
use house_cup::store::{HouseCupData, ScoreInput};

const EXIT_SUCCESS: i32 = 0;
const EXIT_CONFIG: i32 = 4;
const EXIT_DATA: i32 = 5;

#[derive(Subcommand, Debug)]
enum Commands {
    /// Write a default config file
    Init {
        /// Overwrite an existing config file
        #[arg(long)]
        force: bool,
    },
    /// List activities with their points distribution (default if no subcommand)
    List,
    /// Fill in missing placements on every activity's points distribution
    Normalize,
    /// Register a house
    AddHouse {
        name: String,
        #[arg(long, default_value = "")]
        description: String,
    },
    /// Create an activity; missing placements are derived from max points
    AddActivity {
        name: String,
        #[arg(long = "type", value_enum)]
        activity_type: ActivityType,
        /// House cup year id
        #[arg(long)]
        year: u64,
        #[arg(long)]
        max_points: Option<u32>,
        /// Explicit placement points, e.g. "1=120,2=90"
        #[arg(long)]
        distribution: Option<String>,
        /// RFC 3339 date (defaults to now)
        #[arg(long)]
        date: Option<String>,
    },
    /// Remove an activity with its registrations and scores
    RemoveActivity {
        #[arg(long)]
        activity: u64,
    },
    /// Record a house's score for an activity
    Score {
        #[arg(long)]
        activity: u64,
        #[arg(long)]
        house: u64,
        /// Placement rank; points come from the activity's distribution
        #[arg(long, conflicts_with = "points")]
        placement: Option<u32>,
        /// Points to award when there is no placement
        #[arg(long)]
        points: Option<u32>,
        #[arg(long)]
        notes: Option<String>,
    },
    /// Show a team's roster, or replace it from roster text ("-" for stdin)
    Roster {
        #[arg(long)]
        activity: u64,
        #[arg(long)]
        house: u64,
        file: Option<PathBuf>,
    },
    /// Make a participant the team captain
    Captain {
        #[arg(long)]
        activity: u64,
        #[arg(long)]
        house: u64,
        name: String,
    },
    /// Set an activity's status
    Status {
        #[arg(long)]
        activity: u64,
        #[arg(value_enum)]
        status: ActivityStatus,
    },
    /// Rank houses by total points
    Leaderboard {
        /// Only count activities of this house cup year
        #[arg(long)]
        year: Option<u64>,
        /// Tab-separated output for scripting
        #[arg(long)]
        tsv: bool,
    },
    /// Check every record against the scoring rules
    Check,
}

#[derive(Parser, Debug)]
#[command(name = "house-cup")]
#[command(about = "House cup scoring and leaderboard CLI", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to config file (defaults to ~/.config/house-cup/config.yaml)
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    let cli = Cli::parse();
    house_cup::logging::init(cli.verbose);

    let command = cli.command.unwrap_or(Commands::List);
    let config_path = cli.config.map(PathBuf::from);

    if let Commands::Init { force } = command {
        let result = config_path
            .map(Ok)
            .unwrap_or_else(house_cup::config::get_config_path)
            .and_then(|path| {
                house_cup::config::write_default_config(&path, force)?;
                Ok(path)
            });
        match result {
            Ok(path) => {
                println!("Wrote config to {}", path.display());
                std::process::exit(EXIT_SUCCESS);
            }
            Err(e) => {
                eprintln!("Config error: {:#}", e);
                std::process::exit(EXIT_CONFIG);
            }
        }
    }

    let config = match house_cup::config::load_config(config_path) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };

    if let Err(errors) = config.validate() {
        eprintln!("Config errors:");
        for error in errors {
            eprintln!("  - {}", error);
        }
        std::process::exit(EXIT_CONFIG);
    }

    let data_path = match house_cup::config::data_path(&config) {
        Ok(p) => p,
        Err(e) => {
            eprintln!("Config error: {:#}", e);
            std::process::exit(EXIT_CONFIG);
        }
    };
    debug!(path = %data_path.display(), "Using data file");

    let mut data = match house_cup::store::load_data(&data_path) {
        Ok(d) => d,
        Err(e) => {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    let changed = match run(command, &config, &mut data) {
        Ok(changed) => changed,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    };

    if changed {
        if let Err(e) = house_cup::store::save_data(&data_path, &data) {
            eprintln!("Data error: {:#}", e);
            std::process::exit(EXIT_DATA);
        }
    }

    std::process::exit(EXIT_SUCCESS);
}

/// Run one command against the loaded data. Returns whether it must be saved.
fn run(command: Commands, config: &house_cup::config::Config, data: &mut HouseCupData) -> Result<bool> {
    let use_colors = house_cup::output::should_use_colors();

    match command {
        Commands::Init { .. } => bail!("init does not operate on house cup data"),
        Commands::List => {
            println!("{}", house_cup::output::format_activity_list(data, use_colors));
            Ok(false)
        }
        Commands::Normalize => {
            let fixed = data.normalize_all()?;
            println!("Fixed points distribution for {} activities.", fixed);
            Ok(fixed > 0)
        }
        Commands::AddHouse { name, description } => {
            let id = data.add_house(&name, &description)?;
            println!("Added house #{} {}", id, name.trim());
            Ok(true)
        }
        Commands::AddActivity {
            name,
            activity_type,
            year,
            max_points,
            distribution,
            date,
        } => {
            let date = match date {
                Some(d) => DateTime::parse_from_rfc3339(&d)
                    .with_context(|| format!("Invalid date '{}'", d))?
                    .with_timezone(&Utc),
                None => Utc::now(),
            };
            let mut activity = Activity::new(data.next_activity_id(), name, activity_type, year, date);
            activity.max_points = max_points.unwrap_or_else(|| config.effective_max_points());
            if let Some(pairs) = distribution {
                let raw = parse_distribution_arg(&pairs)?;
                activity.points_distribution = scoring::coerce_distribution(&raw)?;
            }
            let id = activity.id;
            data.upsert_activity(activity)?;
            if let Some(saved) = data.activity(id) {
                println!(
                    "Added activity #{} {} | {}",
                    id,
                    saved,
                    house_cup::output::format_distribution_preview(saved)
                );
            }
            Ok(true)
        }
        Commands::RemoveActivity { activity } => {
            let removed = data.remove_activity(activity)?;
            println!("Removed activity #{} {}", removed.id, removed);
            Ok(true)
        }
        Commands::Score {
            activity,
            house,
            placement,
            points,
            notes,
        } => {
            let input = match (placement, points) {
                (Some(p), _) => ScoreInput::Placement(p),
                (None, Some(n)) => ScoreInput::Points(n),
                (None, None) => return Err(ScoringError::MissingPoints.into()),
            };
            let resolution = data.record_score(activity, house, input, notes)?;
            println!("{}", house_cup::output::format_resolution(&resolution));
            if let (Some(score), Some(h), Some(a)) = (
                data.score_for(activity, house),
                data.house(house),
                data.activity(activity),
            ) {
                println!("{}", score.describe(&h.name, &a.name));
            }
            Ok(true)
        }
        Commands::Roster {
            activity,
            house,
            file,
        } => match file {
            Some(path) => {
                let participants = house_cup::roster::read_roster(&path)?;
                let participation = data.import_roster(activity, house, participants)?;
                info!(
                    participation = participation.id,
                    members = participation.participant_count(),
                    "Imported roster"
                );
                println!("{}", house_cup::output::format_roster(participation, use_colors));
                Ok(true)
            }
            None => {
                let participation = data.participation_for(activity, house).with_context(|| {
                    format!("House {} is not registered for activity {}", house, activity)
                })?;
                println!("{}", house_cup::output::format_roster(participation, use_colors));
                Ok(false)
            }
        },
        Commands::Captain {
            activity,
            house,
            name,
        } => {
            data.set_captain(activity, house, &name)?;
            println!("{} is now captain", name);
            Ok(true)
        }
        Commands::Status { activity, status } => {
            let current = data
                .activity(activity)
                .with_context(|| format!("Activity {} not found", activity))?
                .clone();
            if config.strict_status_transitions && !current.status.can_transition_to(status) {
                bail!(
                    "Cannot move activity '{}' from {} to {}",
                    current.name,
                    current.status,
                    status
                );
            }
            let mut updated = current;
            updated.set_status(status);
            data.upsert_activity(updated)?;
            println!("Activity #{} is now {}", activity, status);
            Ok(true)
        }
        Commands::Leaderboard { year, tsv } => {
            let standings = house_cup::store::leaderboard(data, year);
            if tsv {
                println!("{}", house_cup::output::format_leaderboard_tsv(&standings));
            } else {
                println!("{}", house_cup::output::format_leaderboard(&standings, use_colors));
            }
            Ok(false)
        }
        Commands::Check => match scoring::validate_records(data) {
            Ok(()) => {
                println!("All records valid.");
                Ok(false)
            }
            Err(errors) => {
                for error in &errors {
                    eprintln!("  - {}", error);
                }
                bail!("{} problems found", errors.len())
            }
        },
    }
}

/// Parse "1=120,2=90" into a raw distribution for normalization.
fn parse_distribution_arg(pairs: &str) -> Result<RawDistribution> {
    let mut raw = RawDistribution::new();
    for pair in pairs.split(',').map(str::trim).filter(|p| !p.is_empty()) {
        let (placement, points) = pair
            .split_once('=')
            .with_context(|| format!("Expected PLACEMENT=POINTS, got '{}'", pair))?;
        raw.insert(
            placement.trim().to_string(),
            serde_json::Value::String(points.trim().to_string()),
        );
    }
    Ok(raw)
}
