//! Routine management commands for CLI.

use clap::Subcommand;
use dailylog_core::{Category, Config};

use super::Workspace;

#[derive(Subcommand)]
pub enum RoutineAction {
    /// Create a new routine at the end of the order
    Add {
        /// Routine title (default from config)
        title: Option<String>,
        /// Display emoji (default from config)
        #[arg(long)]
        emoji: Option<String>,
        /// Morning, Afternoon or Evening (default from config)
        #[arg(long)]
        category: Option<Category>,
    },
    /// List routines in global order
    List {
        /// Only show one category
        #[arg(long)]
        category: Option<Category>,
    },
    /// Change a routine's title
    Rename {
        id: String,
        title: String,
    },
    /// Change a routine's emoji
    Emoji {
        id: String,
        emoji: String,
    },
    /// Move a routine to another category
    Category {
        id: String,
        category: Category,
    },
    /// Delete a routine (its logs are kept)
    Delete {
        id: String,
    },
    /// Move a routine within its category view
    Move {
        /// Category whose view the indices refer to
        #[arg(long)]
        category: Option<Category>,
        /// Current view index
        #[arg(allow_negative_numbers = true)]
        from: isize,
        /// Target view index
        #[arg(allow_negative_numbers = true)]
        to: isize,
    },
}

pub fn run(action: RoutineAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut ws = Workspace::open()?;

    match action {
        RoutineAction::Add {
            title,
            emoji,
            category,
        } => {
            let title = title.unwrap_or_else(|| config.new_routine.title.clone());
            let emoji = emoji.unwrap_or_else(|| config.new_routine.emoji.clone());
            let category = category.unwrap_or(config.default_category);
            let routine = ws.session.add_routine(&title, &emoji, category)?;
            ws.save()?;
            println!("{}", serde_json::to_string_pretty(&routine)?);
        }
        RoutineAction::List { category } => {
            let routines = match category {
                Some(category) => ws.session.category_view(category),
                None => ws.session.routines().as_slice().to_vec(),
            };
            println!("{}", serde_json::to_string_pretty(&routines)?);
        }
        RoutineAction::Rename { id, title } => {
            ws.session.rename(&id, &title)?;
            ws.save()?;
            println!("Routine renamed: {id}");
        }
        RoutineAction::Emoji { id, emoji } => {
            ws.session.set_emoji(&id, &emoji)?;
            ws.save()?;
            println!("Routine emoji set: {id}");
        }
        RoutineAction::Category { id, category } => {
            ws.session.set_category(&id, category)?;
            ws.save()?;
            println!("Routine moved to {category}: {id}");
        }
        RoutineAction::Delete { id } => {
            ws.session.delete_routine(&id)?;
            ws.save()?;
            println!("Routine deleted: {id}");
        }
        RoutineAction::Move { category, from, to } => {
            let category = category.unwrap_or(config.default_category);
            if ws.session.reorder(category, from, to) {
                ws.save()?;
                let view = ws.session.category_view(category);
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                println!("No change: cannot move {from} to {to} in {category}");
            }
        }
    }
    Ok(())
}
