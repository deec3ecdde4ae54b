//! Completion log commands for CLI.

use chrono::{DateTime, Utc};
use clap::Subcommand;
use dailylog_core::{Config, Toggle};
use serde_json::json;

use super::Workspace;

#[derive(Subcommand)]
pub enum LogAction {
    /// Mark a routine done for today
    Done {
        routine_id: String,
        /// Free-text note attached to the log
        #[arg(long)]
        note: Option<String>,
    },
    /// Remove today's completion of a routine
    Undo {
        routine_id: String,
    },
    /// Mark done, or undo when already done today
    Toggle {
        routine_id: String,
    },
    /// Rewrite the time of an existing log
    Correct {
        log_id: String,
        /// New instant in RFC 3339, e.g. 2026-10-16T07:30:00+09:00
        timestamp: DateTime<chrono::FixedOffset>,
    },
    /// Show recent logs, newest first
    History {
        /// Only logs of this routine
        #[arg(long)]
        routine: Option<String>,
        /// Maximum rows (default from config)
        #[arg(long)]
        limit: Option<usize>,
        /// Group by local calendar date; the limit counts days
        #[arg(long)]
        by_day: bool,
    },
    /// Completion totals per routine
    Counts,
}

pub fn run(action: LogAction) -> Result<(), Box<dyn std::error::Error>> {
    let mut ws = Workspace::open()?;

    match action {
        LogAction::Done { routine_id, note } => {
            let log = ws.session.complete(&routine_id, note)?;
            ws.save()?;
            println!("{}", serde_json::to_string_pretty(&log)?);
        }
        LogAction::Undo { routine_id } => match ws.session.uncomplete(&routine_id) {
            Some(log) => {
                ws.save()?;
                println!("Log removed: {}", log.id);
            }
            None => println!("Not done today: {routine_id}"),
        },
        LogAction::Toggle { routine_id } => {
            match ws.session.toggle(&routine_id)? {
                Toggle::Completed(log) => println!("Done: {}", log.id),
                Toggle::Uncompleted(log) => println!("Log removed: {}", log.id),
            }
            ws.save()?;
        }
        LogAction::Correct { log_id, timestamp } => {
            ws.session
                .correct_timestamp(&log_id, timestamp.with_timezone(&Utc))?;
            ws.save()?;
            println!("Log corrected: {log_id}");
        }
        LogAction::History {
            routine,
            limit,
            by_day,
        } => {
            let limit = limit.unwrap_or_else(|| Config::load_or_default().history.limit);
            if by_day {
                let days: Vec<_> = ws
                    .session
                    .history_by_day()
                    .into_iter()
                    .filter_map(|(date, mut entries)| {
                        if let Some(id) = routine.as_deref() {
                            entries.retain(|e| e.log.routine_id == id);
                        }
                        (!entries.is_empty()).then(|| json!({ "date": date, "entries": entries }))
                    })
                    .take(limit)
                    .collect();
                println!("{}", serde_json::to_string_pretty(&days)?);
            } else {
                let entries = ws.session.history(routine.as_deref(), limit);
                println!("{}", serde_json::to_string_pretty(&entries)?);
            }
        }
        LogAction::Counts => {
            println!("{}", serde_json::to_string_pretty(&ws.session.completion_counts())?);
        }
    }
    Ok(())
}
