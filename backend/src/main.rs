//! Plant Care Tracker - command line
//!
//! Works against a JSON roster of users, notification centers and plants.

use anyhow::Context;
use chrono::NaiveDate;
use clap::{Parser, Subcommand, ValueEnum};
use shared::{
    care_status, current_half_year, current_season, record_care, CareAction, Clock,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use plant_care_backend::{
    models::{Outbox, Roster},
    services::{AiAnswerService, CareCheckService},
    AppError, Config,
};

#[derive(Parser, Debug)]
#[command(name = "plant-care", version, about = "Seasonal plant care reminders")]
struct Cli {
    /// Treat this date (YYYY-MM-DD) as today
    #[arg(long, global = true)]
    date: Option<NaiveDate>,

    /// Emit logs as JSON
    #[arg(long, global = true)]
    json_logs: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print today's season and half-year
    Season,
    /// Print the care status of every plant
    Status,
    /// Record a care action on a plant
    Record {
        action: ActionArg,
        #[arg(long)]
        plant: Uuid,
    },
    /// Run the care check and queue notifications
    Check,
    /// Open an identification request for a plant
    RequestAnswer {
        #[arg(long)]
        plant: Uuid,
    },
    /// Store the identification service's JSON response for a request
    RecordAnswer {
        #[arg(long)]
        answer: Uuid,
        #[arg(long)]
        response: std::path::PathBuf,
        /// Path or URL of a generated picture of the plant
        #[arg(long)]
        image: Option<String>,
    },
    /// Apply a successful identification answer to its plant
    ApproveAnswer {
        #[arg(long)]
        answer: Uuid,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug)]
enum ActionArg {
    Water,
    Fertilize,
    Repot,
}

impl From<ActionArg> for CareAction {
    fn from(arg: ActionArg) -> Self {
        match arg {
            ActionArg::Water => CareAction::Water,
            ActionArg::Fertilize => CareAction::Fertilize,
            ActionArg::Repot => CareAction::Repot,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "plant_care=debug,plant_care_backend=debug".into());
    let registry = tracing_subscriber::registry().with(filter);
    if cli.json_logs {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    // Load configuration
    dotenvy::dotenv().ok();
    let config = Config::load().context("loading configuration")?;
    tracing::debug!("Environment: {}", config.environment);

    if let Err(e) = run(cli, &config).await {
        tracing::error!(code = e.code(), error = %e, "Command failed");
        println!("{}", serde_json::to_string_pretty(&e.to_response())?);
        std::process::exit(1);
    }
    Ok(())
}

async fn run(cli: Cli, config: &Config) -> Result<(), AppError> {
    let clock = config.check.clock(cli.date);
    let today = clock.today();
    let now = clock.now();

    match cli.command {
        Command::Season => {
            println!("{} ({} half)", current_season(&clock), current_half_year(&clock));
        }
        Command::Status => {
            let roster = Roster::load(&config.roster.path).await?;
            for plant in roster.plants() {
                let marker = if plant.is_complete() { "" } else { " (incomplete)" };
                match care_status(plant, today) {
                    Ok(status) => println!(
                        "{}{}: {}",
                        plant.display_name(),
                        marker,
                        serde_json::to_string(&status)?
                    ),
                    Err(e) => println!("{}{}: {}", plant.display_name(), marker, e),
                }
            }
        }
        Command::Record { action, plant } => {
            let mut roster = Roster::load(&config.roster.path).await?;
            let target = roster
                .find_plant_mut(plant)
                .ok_or_else(|| AppError::NotFound(format!("Plant {}", plant)))?;
            let action = CareAction::from(action);
            record_care(target, action, today)?;
            target.updated_at = now;
            tracing::info!(plant_id = %plant, %action, %today, "Care recorded");
            roster.save(&config.roster.path).await?;
        }
        Command::Check => {
            let mut roster = Roster::load(&config.roster.path).await?;
            let report = CareCheckService::new(clock).run(&mut roster);

            let mut outbox = Outbox::load(&config.outbox.path).await?;
            outbox.append(report.notifications.iter().cloned());
            outbox.save(&config.outbox.path).await?;
            roster.save(&config.roster.path).await?;

            println!(
                "{} user(s) checked, {} notification(s) queued, {} unsent in outbox, {} plant(s) skipped",
                report.checked_users,
                report.notifications.len(),
                outbox.unsent().count(),
                report.skipped.len()
            );
        }
        Command::RequestAnswer { plant } => {
            let service = AiAnswerService::new(config.ai.max_usage);
            let mut roster = Roster::load(&config.roster.path).await?;
            let target = roster
                .find_plant(plant)
                .ok_or_else(|| AppError::NotFound(format!("Plant {}", plant)))?;
            let owner = roster
                .users
                .iter()
                .find(|entry| entry.user.id == target.user_id)
                .map(|entry| &entry.user)
                .ok_or_else(|| AppError::NotFound(format!("Owner of plant {}", plant)))?;

            let answer =
                service.open_request(owner, target, roster.ai_usage(owner.id), now)?;
            println!("{} {}", answer.id, answer.status);
            roster.ai_answers.push(answer);
            roster.save(&config.roster.path).await?;
        }
        Command::RecordAnswer {
            answer,
            response,
            image,
        } => {
            let service = AiAnswerService::new(config.ai.max_usage);
            let raw = tokio::fs::read_to_string(&response).await?;
            let response: serde_json::Value = serde_json::from_str(&raw)?;

            let mut roster = Roster::load(&config.roster.path).await?;
            let index = roster
                .ai_answers
                .iter()
                .position(|a| a.id == answer)
                .ok_or_else(|| AppError::NotFound(format!("Answer {}", answer)))?;
            let mut record = roster.ai_answers[index].clone();
            let plant = roster
                .find_plant(record.plant_id)
                .ok_or_else(|| AppError::NotFound(format!("Plant {}", record.plant_id)))?;

            // A failed parse still moves the answer to failure, so persist either way
            let result = service.record_response(&mut record, plant, &response, image);
            roster.ai_answers[index] = record;
            roster.save(&config.roster.path).await?;
            result?;
        }
        Command::ApproveAnswer { answer } => {
            let service = AiAnswerService::new(config.ai.max_usage);
            let mut roster = Roster::load(&config.roster.path).await?;
            let record = roster
                .find_answer(answer)
                .cloned()
                .ok_or_else(|| AppError::NotFound(format!("Answer {}", answer)))?;
            let (owner, plant) = roster
                .plant_with_owner_mut(record.plant_id)
                .ok_or_else(|| AppError::NotFound(format!("Plant {}", record.plant_id)))?;

            service.approve(owner, &record, plant, now)?;
            roster.save(&config.roster.path).await?;
        }
    }
    Ok(())
}
