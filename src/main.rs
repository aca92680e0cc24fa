mod commands;
mod render;
mod source;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand};
use eventboard_core::config::BoardConfig;
use eventboard_core::month::parse_weekday;
use eventboard_core::{
    BoardState, EventSet, EventStore, FilterCriteria, LoadState, YearMonth, ZonePolicy,
};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventboard")]
#[command(about = "Browse an event feed as a list, month calendar or timeline, and export it to .ics")]
struct Cli {
    /// Event feed: JSON file path or http(s) URL (defaults to `source` in the config file)
    #[arg(short, long, global = true)]
    source: Option<String>,

    /// Zone for placing events on days: "local", "utc" or an IANA name
    #[arg(long, global = true)]
    timezone: Option<String>,

    /// Print views as JSON instead of styled text
    #[arg(long, global = true)]
    json: bool,

    /// Seconds to wait for the event feed
    #[arg(long, global = true, default_value_t = 30)]
    timeout: u64,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args, Clone, Default)]
struct FilterArgs {
    /// Free-text search over title, speaker, description and tags
    #[arg(short, long)]
    query: Option<String>,

    /// Only events in this category (exact match)
    #[arg(short, long)]
    category: Option<String>,

    /// Events starting on or after this date (YYYY-MM-DD)
    #[arg(long)]
    from: Option<String>,

    /// Events starting on or before this date (YYYY-MM-DD)
    #[arg(long)]
    to: Option<String>,
}

impl FilterArgs {
    fn criteria(&self) -> Result<FilterCriteria> {
        Ok(FilterCriteria::from_args(
            self.query.as_deref(),
            self.category.as_deref(),
            self.from.as_deref(),
            self.to.as_deref(),
        )?)
    }
}

#[derive(Subcommand)]
enum Commands {
    /// List matching events as cards
    List {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show matching events grouped by day
    Timeline {
        #[command(flatten)]
        filters: FilterArgs,
    },
    /// Show a month calendar of matching events
    Calendar {
        #[command(flatten)]
        filters: FilterArgs,

        /// Month to show (YYYY-MM), defaults to the current month
        #[arg(short, long)]
        month: Option<String>,

        /// First column of the calendar (e.g. "mon", "sun")
        #[arg(short, long)]
        week_start: Option<String>,

        /// Also list the events of this day (YYYY-MM-DD)
        #[arg(short, long)]
        day: Option<String>,

        /// Move forward one month per use (e.g. --next --next)
        #[arg(long, action = ArgAction::Count)]
        next: u8,

        /// Move back one month per use
        #[arg(long, action = ArgAction::Count)]
        prev: u8,
    },
    /// List the categories present in the feed
    Categories,
    /// Show the config file location and effective settings
    Config,
    /// Write matching events to an .ics file
    Export {
        #[command(flatten)]
        filters: FilterArgs,

        /// Only export these event ids (repeatable)
        #[arg(long = "id")]
        ids: Vec<String>,

        /// Output file (defaults to a name derived from the selection)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();

    // Config needs neither a source nor a zone, and reports its own parse errors.
    if let Commands::Config = cli.command {
        return commands::config::run();
    }

    let config = BoardConfig::load()?;

    let zone: ZonePolicy = match cli.timezone.as_deref() {
        Some(tz) => tz.parse()?,
        None => config.zone()?,
    };

    let source = cli
        .source
        .as_deref()
        .map(eventboard_core::config::expand_source)
        .or_else(|| config.source())
        .context(
            "No event source given.\n\n\
            Pass one with:\n  \
            eventboard --source <path-or-url> list\n\n\
            or set `source` in the config file.",
        )?;

    let events = load_events(&source, &zone, Duration::from_secs(cli.timeout)).await?;

    match cli.command {
        Commands::List { filters } => {
            let state = board_state(&config, zone, &filters, None)?;
            commands::list::run(&state, &events, cli.json)
        }
        Commands::Timeline { filters } => {
            let state = board_state(&config, zone, &filters, None)?;
            commands::timeline::run(&state, &events, cli.json)
        }
        Commands::Calendar {
            filters,
            month,
            week_start,
            day,
            next,
            prev,
        } => {
            let mut state = board_state(&config, zone, &filters, week_start.as_deref())?;
            match month {
                Some(month) => state.focus = month.parse::<YearMonth>()?,
                None => state.go_to_today(),
            }
            for _ in 0..next {
                state.next_month();
            }
            for _ in 0..prev {
                state.prev_month();
            }
            let day = day
                .map(|d| eventboard_core::date_range::parse_date(&d))
                .transpose()?;
            commands::calendar::run(&state, &events, day, cli.json)
        }
        Commands::Categories => commands::categories::run(&events, cli.json),
        Commands::Config => commands::config::run(),
        Commands::Export {
            filters,
            ids,
            output,
        } => {
            let state = board_state(&config, zone, &filters, None)?;
            commands::export::run(&state, &events, &ids, output, &config.export_options())
        }
    }
}

/// Log to stderr; `RUST_LOG` overrides the default level.
fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn board_state(
    config: &BoardConfig,
    zone: ZonePolicy,
    filters: &FilterArgs,
    week_start: Option<&str>,
) -> Result<BoardState> {
    let first_day_of_week = match week_start {
        Some(day) => parse_weekday(day)?,
        None => config.first_day_of_week()?,
    };

    let mut state = BoardState::new(zone, first_day_of_week);
    state.criteria = filters.criteria()?;
    Ok(state)
}

async fn load_events(source: &str, zone: &ZonePolicy, timeout: Duration) -> Result<Arc<EventSet>> {
    let mut store = EventStore::new();
    let ticket = store.begin_load();

    let result = source::fetch_events(source, zone, timeout).await;
    store.finish_load(ticket, result);

    match store.state() {
        LoadState::Loaded(set) => Ok(Arc::clone(set)),
        LoadState::Failed(message) => anyhow::bail!("{}", message),
        LoadState::NotLoaded | LoadState::Loading => anyhow::bail!("Event load did not complete"),
    }
}
