use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use timetable::model::IngestOutcome;
use timetable::{DisplayMode, GridConfig, RosterStore, TimetableController};
use tracing::{info, warn, Level};

#[derive(Parser)]
#[command(name = "timetable")]
#[command(about = "Parse portal rosters and lay them out on the weekly grid")]
#[command(version)]
struct Args {
    /// Log debug detail to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse a saved registration page into roster JSON
    Parse {
        /// Saved HTML of the registration page
        input: PathBuf,

        /// Write the roster here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the display list for a roster as JSON
    Render {
        /// Roster JSON as written by `parse`
        roster: PathBuf,

        /// day or week
        #[arg(long)]
        mode: Option<DisplayMode>,

        /// Day to show in day mode, 1 (Monday) to 5 (Friday)
        #[arg(long)]
        day: Option<i32>,

        #[arg(long, default_value_t = 720.0)]
        width: f32,

        #[arg(long, default_value_t = 1280.0)]
        height: f32,

        /// Scroll so this hour is at the top
        #[arg(long)]
        scroll_to: Option<u8>,

        /// Grid config JSON
        #[arg(long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if args.verbose {
            Level::DEBUG
        } else {
            Level::INFO
        })
        .init();

    match args.command {
        Command::Parse { input, output } => parse(input, output).await,
        Command::Render {
            roster,
            mode,
            day,
            width,
            height,
            scroll_to,
            config,
        } => render(roster, mode, day, width, height, scroll_to, config),
    }
}

async fn parse(input: PathBuf, output: Option<PathBuf>) -> Result<()> {
    let markup = std::fs::read_to_string(&input)
        .with_context(|| format!("Failed to read {}", input.display()))?;

    let store = RosterStore::new();
    match store.ingest(markup).await? {
        IngestOutcome::Replaced { subjects } => info!(subjects = subjects, "Roster parsed"),
        IngestOutcome::NothingParsed => warn!(input = %input.display(), "No subjects found"),
    }

    match output {
        Some(path) => store
            .save_to_file(&path)
            .with_context(|| format!("Failed to write {}", path.display()))?,
        None => println!("{}", store.to_json()?),
    }

    Ok(())
}

fn render(
    roster_path: PathBuf,
    mode: Option<DisplayMode>,
    day: Option<i32>,
    width: f32,
    height: f32,
    scroll_to: Option<u8>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let mut config = match config_path {
        Some(path) => GridConfig::load_from_file(&path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => GridConfig::default(),
    };
    if let Some(mode) = mode {
        config.display_mode = mode;
    }

    let store = RosterStore::new();
    let roster = store
        .load_from_file(&roster_path)
        .with_context(|| format!("Failed to load roster {}", roster_path.display()))?;

    let mut controller = TimetableController::new(config, width, height, Arc::clone(&roster))?;
    if let Some(day) = day {
        controller.set_current_day(day)?;
    }
    if let Some(hour) = scroll_to {
        controller.scroll_to_time(hour, 0);
    }

    let commands = controller.display_list();
    info!(
        subjects = roster.len(),
        commands = commands.len(),
        mode = %controller.display_mode(),
        "Rendered grid"
    );
    println!("{}", serde_json::to_string_pretty(&commands)?);

    Ok(())
}
