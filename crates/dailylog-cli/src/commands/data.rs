//! Snapshot import/export commands for CLI.

use clap::Subcommand;
use dailylog_core::{RoutineRepository, RoutineStore, Snapshot};
use std::path::PathBuf;

use super::Workspace;

#[derive(Subcommand)]
pub enum DataAction {
    /// Write routines and logs as a JSON snapshot
    Export {
        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// Replace routines and logs with a JSON snapshot
    Import {
        file: PathBuf,
    },
}

pub fn run(action: DataAction) -> Result<(), Box<dyn std::error::Error>> {
    let ws = Workspace::open()?;

    match action {
        DataAction::Export { output } => {
            let snapshot = ws.session.snapshot();
            match output {
                Some(path) => {
                    snapshot.write_to(&path)?;
                    println!(
                        "Exported {} routines, {} logs to {}",
                        snapshot.routines.len(),
                        snapshot.logs.len(),
                        path.display()
                    );
                }
                None => println!("{}", snapshot.to_json_pretty()?),
            }
        }
        DataAction::Import { file } => {
            let imported = Snapshot::read_from(&file)?;
            // Stored ranks must already be dense.
            let routines = RoutineStore::new(imported.routines).into_vec();
            ws.db().save(&routines, &imported.logs)?;
            println!("Imported {} routines, {} logs", routines.len(), imported.logs.len());
        }
    }
    Ok(())
}
