//! clinic-scheduler - submit weekly schedules and temporary adjustments
//! to the clinic scheduling service.

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use clinic_scheduler::{
    config::AppConfig,
    models::{
        AdjustmentSlot, AppointmentType, ExistingSchedule, SlotDuration, TimeSlot, Weekday,
    },
    scheduling::{parse_calendar_date, serialize_weekday_list},
    services::{day_outside_range, DayStatus, Services, WeeklyScheduleWorkflow},
    AppError,
};

#[derive(Debug, Parser)]
#[command(name = "clinic-scheduler")]
#[command(about = "Weekly slot schedules and calendar adjustments for a clinic facility", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Create or edit a weekly schedule from a JSON draft
    Submit {
        /// Schedule draft; a `slotId` switches to edit mode
        file: PathBuf,
    },
    /// Apply a single-date adjustment from a JSON draft
    Adjust {
        /// Adjustment draft
        file: PathBuf,
    },
    /// Print the calendar legend for the configured facility
    Legend,
}

/// A weekly schedule as written in a draft file
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ScheduleDraft {
    /// Present when editing an existing schedule
    slot_id: Option<String>,
    start_date: String,
    stop_date: String,
    days: Vec<Weekday>,
    slots: Vec<TimeSlot>,
    #[serde(default)]
    appointment_type: AppointmentType,
    slot_duration: Option<SlotDuration>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AdjustmentDraft {
    slot_id: String,
    date: String,
    #[serde(default)]
    slots: Vec<AdjustmentSlot>,
    #[serde(default)]
    not_available: bool,
    slot_duration: Option<SlotDuration>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("Failed to load configuration")?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("clinic_scheduler={}", config.logging.level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if config.logging.format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }

    tracing::info!("clinic-scheduler v{}", env!("CARGO_PKG_VERSION"));

    let services = Services::from_config(&config)?;

    let outcome = match &cli.command {
        Command::Submit { file } => submit_schedule(&services, file).await,
        Command::Adjust { file } => submit_adjustment(&services, file).await,
        Command::Legend => print_legend(&services).await,
    };

    if let Err(e) = outcome {
        // Same text the dialog would show in its notification
        eprintln!("{}", e.notification());
        std::process::exit(e.code() as i32);
    }

    Ok(())
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| AppError::Validation(format!("Cannot read {}: {}", path.display(), e)))?;
    serde_json::from_str(&text)
        .map_err(|e| AppError::Validation(format!("Invalid {}: {}", path.display(), e)))
}

async fn submit_schedule(services: &Services, path: &Path) -> Result<(), AppError> {
    let draft: ScheduleDraft = read_json(path)?;

    let mut workflow = match &draft.slot_id {
        Some(slot_id) => {
            let existing = ExistingSchedule {
                slot_id: slot_id.clone(),
                book_app_type: draft.appointment_type,
                checked_day: serialize_weekday_list(&draft.days),
                day_time: String::new(),
                start_date: draft.start_date.clone(),
                stop_date: draft.stop_date.clone(),
                slot_duration: draft.slot_duration,
            };
            let workflow = services.edit_weekly_schedule(&existing)?;
            for day in workflow.discarded_days() {
                eprintln!("warning: {}", day_outside_range(*day).notification());
            }
            workflow
        }
        None => new_schedule(services, &draft)?,
    };

    workflow.open_slot_editor()?;
    for (index, slot) in draft.slots.iter().enumerate() {
        if index >= workflow.schedule().slots.len() && !workflow.add_slot()? {
            tracing::warn!("Ignoring slot {}: at most two slots per schedule", index + 1);
            continue;
        }
        workflow.update_slot(index, *slot)?;
    }
    workflow.set_appointment_type(draft.appointment_type)?;
    workflow.set_slot_duration(draft.slot_duration)?;

    workflow.confirm(services.backend.as_ref()).await?;
    println!(
        "Schedule {} for {}",
        if workflow.is_edit_mode() { "updated" } else { "created" },
        serialize_weekday_list(&workflow.schedule().days())
    );
    Ok(())
}

fn new_schedule(services: &Services, draft: &ScheduleDraft) -> Result<WeeklyScheduleWorkflow, AppError> {
    let mut workflow = services.new_weekly_schedule();
    workflow.set_date_range(&draft.start_date, &draft.stop_date)?;
    for day in &draft.days {
        if let Err(e) = workflow.toggle_day(*day) {
            // Same as the picker: warn and keep the valid days
            eprintln!("warning: {}", e.notification());
        }
    }
    Ok(workflow)
}

async fn submit_adjustment(services: &Services, path: &Path) -> Result<(), AppError> {
    let draft: AdjustmentDraft = read_json(path)?;
    let date = parse_calendar_date(&draft.date)
        .ok_or_else(|| AppError::Validation(format!("Invalid date: {}", draft.date)))?;

    let mut workflow = services.temporary_adjustment(&draft.slot_id, date, draft.slot_duration);
    for (index, slot) in draft.slots.iter().enumerate() {
        if index >= workflow.adjustment().slots.len() && !workflow.add_slot()? {
            tracing::warn!("Ignoring slot {}: at most two slots per day", index + 1);
            continue;
        }
        workflow.update_slot(index, *slot)?;
    }
    if draft.not_available {
        workflow.mark_not_available()?;
    }

    workflow.submit(services.backend.as_ref()).await?;
    println!("Calendar adjusted for {}", draft.date);
    Ok(())
}

async fn print_legend(services: &Services) -> Result<(), AppError> {
    let legend = services.calendar_legend().await?;

    let mut dates: Vec<_> = legend
        .available
        .iter()
        .chain(&legend.not_available)
        .chain(&legend.fully_booked)
        .copied()
        .collect();
    dates.sort();
    dates.dedup();

    for date in dates {
        let label = match legend.status_of(date) {
            DayStatus::FullyBooked => "full",
            DayStatus::NotAvailable => "not available",
            DayStatus::Available => "available",
            DayStatus::Unscheduled => "-",
        };
        println!("{}  {}", date.format("%d/%m/%Y"), label);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_subcommands() {
        let cli = Cli::try_parse_from(["clinic-scheduler", "submit", "week.json"]).unwrap();
        assert!(matches!(cli.command, Command::Submit { file } if file == Path::new("week.json")));

        let cli = Cli::try_parse_from(["clinic-scheduler", "legend"]).unwrap();
        assert!(matches!(cli.command, Command::Legend));
    }

    #[test]
    fn test_usage_errors_rejected_by_parser() {
        assert!(Cli::try_parse_from(["clinic-scheduler"]).is_err());
        assert!(Cli::try_parse_from(["clinic-scheduler", "adjust"]).is_err());
        assert!(Cli::try_parse_from(["clinic-scheduler", "legend", "extra"]).is_err());

        let help = Cli::try_parse_from(["clinic-scheduler", "--help"]).unwrap_err();
        assert_eq!(help.kind(), clap::error::ErrorKind::DisplayHelp);
    }
}
