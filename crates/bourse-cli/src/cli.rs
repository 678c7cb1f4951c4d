//! CLI argument definitions for bourse.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `instruments` | List the instrument catalog |
//! | `dates` | List session dates, newest first |
//! | `latest` | Every row of the newest session |
//! | `overview` | Newest session with change against the previous one |
//! | `summary` | Breadth, turnover and top movers |
//! | `history` | One instrument's newest (or oldest) sessions |
//! | `range` | One instrument's sessions between two dates |
//! | `status` | Store-wide counts and date span |
//!
//! # Examples
//!
//! ```bash
//! bourse overview --pretty
//! bourse history SFBT --days 30 --format table
//! bourse range SFBT 2024-01-01 2024-03-31
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Daily trading-session analytics over a DuckDB warehouse.
#[derive(Debug, Parser)]
#[command(
    name = "bourse",
    author,
    version,
    about = "Daily trading-session analytics",
    long_about = "Reads the exchange's daily session table (bvmt_data) from a local DuckDB \
warehouse and reports the instrument catalog, session calendar, latest session, per-instrument \
histories and the session-over-session market overview.\n\
\n\
Configuration comes from BOURSE_* environment variables; --db overrides the database path."
)]
pub struct Cli {
    /// Output format for results.
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Json)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// DuckDB database file, overriding BOURSE_DB_PATH.
    #[arg(long, global = true, value_name = "PATH")]
    pub db: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Aligned text table for terminal display.
    Table,
    /// Single JSON object output.
    Json,
    /// Metadata line followed by one JSON line per record.
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// List distinct instruments ordered by code.
    Instruments,

    /// List distinct session dates, newest first.
    Dates,

    /// Show every row of the newest session.
    Latest,

    /// Show the newest session with change and changePercent per instrument.
    Overview,

    /// Summarize breadth, turnover and top movers of the newest session.
    Summary(SummaryArgs),

    /// Show one instrument's sessions, oldest first.
    ///
    /// By default the newest N sessions are returned; with --from-start the
    /// oldest N are returned instead.
    ///
    /// # Examples
    ///
    ///   bourse history SFBT
    ///   bourse history SFBT --days 30
    ///   bourse history SFBT --days 10 --from-start
    History(HistoryArgs),

    /// Show one instrument's sessions between two dates, both inclusive.
    Range(RangeArgs),

    /// Show row, instrument and session counts.
    Status,
}

/// Arguments for the `summary` command.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Number of gainers and losers to list.
    #[arg(long, default_value_t = bourse_core::DEFAULT_TOP_MOVERS)]
    pub top: usize,
}

/// Arguments for the `history` command.
#[derive(Debug, Args)]
pub struct HistoryArgs {
    /// Instrument code, exactly as listed by `instruments`.
    pub code: String,

    /// Number of sessions to return (default: BOURSE_HISTORY_DAYS, else 90).
    #[arg(long)]
    pub days: Option<usize>,

    /// Return the oldest sessions instead of the newest.
    #[arg(long, default_value_t = false)]
    pub from_start: bool,
}

/// Arguments for the `range` command.
#[derive(Debug, Args)]
pub struct RangeArgs {
    /// Instrument code, exactly as listed by `instruments`.
    pub code: String,

    /// First session date, YYYY-MM-DD.
    pub start: String,

    /// Last session date, YYYY-MM-DD.
    pub end: String,
}
