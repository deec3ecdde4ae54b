//! Focus queue commands for CLI.
//!
//! `focus run` is the only place postponement exists: the queue lives for
//! the duration of that loop and is never written to the database.

use clap::Subcommand;
use dailylog_core::{Category, Config, FocusSnapshot};
use std::io::{self, BufRead, Write};

use super::{CliSession, Workspace};

#[derive(Subcommand)]
pub enum FocusAction {
    /// Print the focus queue as JSON
    Show {
        #[arg(long)]
        category: Option<Category>,
    },
    /// Exclude a routine from today's queue
    Skip {
        routine_id: String,
    },
    /// Interactive focus session reading commands from stdin
    Run {
        #[arg(long)]
        category: Option<Category>,
    },
}

pub fn run(action: FocusAction) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let mut ws = Workspace::open()?;

    match action {
        FocusAction::Show { category } => {
            let snapshot = ws.session.focus(category.unwrap_or(config.default_category));
            println!("{}", serde_json::to_string_pretty(&snapshot)?);
        }
        FocusAction::Skip { routine_id } => {
            ws.session.skip_today(&routine_id)?;
            ws.save()?;
            println!("Skipped for today: {routine_id}");
        }
        FocusAction::Run { category } => {
            let category = category.unwrap_or(config.default_category);
            let stdin = io::stdin();
            let mut stdout = io::stdout();
            run_loop(&mut ws, category, stdin.lock(), &mut stdout)?;
        }
    }
    Ok(())
}

enum Command<'a> {
    Done,
    Postpone,
    Skip,
    Undo(&'a str),
    List,
    Help,
    Quit,
    Unknown(&'a str),
}

fn parse(line: &str) -> Command<'_> {
    let mut parts = line.split_whitespace();
    match (parts.next(), parts.next()) {
        (Some("done" | "d"), _) => Command::Done,
        (Some("postpone" | "p"), _) => Command::Postpone,
        (Some("skip" | "s"), _) => Command::Skip,
        (Some("undo" | "u"), Some(id)) => Command::Undo(id),
        (Some("list" | "l"), _) => Command::List,
        (Some("help" | "h" | "?"), _) => Command::Help,
        (Some("quit" | "q" | "exit"), _) => Command::Quit,
        (Some(other), _) => Command::Unknown(other),
        (None, _) => Command::List,
    }
}

fn run_loop<R: BufRead, W: Write>(
    ws: &mut Workspace,
    category: Category,
    input: R,
    out: &mut W,
) -> Result<(), Box<dyn std::error::Error>> {
    print_status(out, &ws.session, category)?;

    for line in input.lines() {
        let line = line?;
        let snapshot = ws.session.focus(category);
        let next = snapshot.next_routine_id.clone();

        match (parse(line.trim()), next.as_deref()) {
            (Command::Quit, _) => break,
            (Command::Help, _) => {
                writeln!(out, "commands: done, postpone, skip, undo <id>, list, quit")?;
                continue;
            }
            (Command::List, _) => {
                print_chips(out, &snapshot)?;
                continue;
            }
            (Command::Unknown(word), _) => {
                writeln!(out, "unknown command: {word} (try 'help')")?;
                continue;
            }
            (Command::Undo(id), _) => match ws.session.uncomplete(id) {
                Some(_) => ws.save()?,
                None => writeln!(out, "not done today: {id}")?,
            },
            (Command::Done | Command::Postpone | Command::Skip, None) => {
                writeln!(out, "nothing left in {category}")?;
                continue;
            }
            (Command::Done, Some(id)) => {
                ws.session.complete(id, None)?;
                ws.save()?;
            }
            (Command::Skip, Some(id)) => {
                ws.session.skip_today(id)?;
                ws.save()?;
            }
            (Command::Postpone, Some(id)) => ws.session.postpone(id)?,
        }
        print_status(out, &ws.session, category)?;
    }
    Ok(())
}

fn print_status<W: Write>(out: &mut W, session: &CliSession, category: Category) -> io::Result<()> {
    let snapshot = session.focus(category);
    let progress = match snapshot.completion_ratio() {
        Some(ratio) => format!(
            "{}/{} ({:.0}%)",
            snapshot.completed_count,
            snapshot.total_count,
            ratio * 100.0
        ),
        None => "nothing scheduled".to_string(),
    };
    match snapshot.next_routine() {
        Some(next) => writeln!(out, "[{category}] {progress} next: {} {} ({})", next.emoji, next.title, next.id),
        None if snapshot.total_count > 0 => writeln!(out, "[{category}] {progress} all done"),
        None => writeln!(out, "[{category}] {progress}"),
    }
}

fn print_chips<W: Write>(out: &mut W, snapshot: &FocusSnapshot) -> io::Result<()> {
    for routine in snapshot.remaining() {
        writeln!(out, "  [ ] {} {} ({})", routine.emoji, routine.title, routine.id)?;
    }
    for routine in snapshot.completed() {
        writeln!(out, "  [x] {} {} ({})", routine.emoji, routine.title, routine.id)?;
    }
    Ok(())
}
