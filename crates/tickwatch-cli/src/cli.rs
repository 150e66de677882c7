//! CLI argument definitions for Tickwatch.
//!
//! The CLI manages a flat-file watchlist and renders historical price data
//! for a tracked symbol.
//!
//! # Commands
//!
//! | Command | Description |
//! |---------|-------------|
//! | `watch add` | Add a symbol to the watchlist |
//! | `watch remove` | Remove a symbol from the watchlist |
//! | `watch list` | List tracked symbols |
//! | `show` | Render history, chart, and profile for a symbol |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--format` | `table` | Output format (table, json, ndjson) |
//! | `--pretty` | `false` | Pretty-print JSON output |
//! | `--strict` | `false` | Treat warnings as errors |
//! | `--mock` | `false` | Serve deterministic offline data |
//! | `--watchlist` | `watchlist.json` | Watchlist file path |
//!
//! # Examples
//!
//! ```bash
//! # Track a symbol
//! tickwatch watch add AAPL
//!
//! # Render the last year of daily candles
//! tickwatch show AAPL
//!
//! # Custom window, JSON output for scripting
//! tickwatch show AAPL --start 2024-01-01 --end 2024-06-01 --format json --pretty
//! ```

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

/// Tickwatch - personal stock watchlist dashboard
///
/// Track a list of symbols in a flat file and render daily OHLCV history
/// with an ASCII candlestick chart, price summary, and company profile.
#[derive(Debug, Parser)]
#[command(
    name = "tickwatch",
    author,
    version,
    about = "Personal stock watchlist dashboard"
)]
pub struct Cli {
    /// Output format for results.
    ///
    /// - table: terminal rendering with chart and recent-data table (default)
    /// - json: Single JSON envelope
    /// - ndjson: One JSON envelope per line
    #[arg(long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    pub format: OutputFormat,

    /// Pretty-print JSON output with indentation.
    #[arg(long, global = true, default_value_t = false)]
    pub pretty: bool,

    /// Treat warnings and errors as failures (exit code 5).
    #[arg(long, global = true, default_value_t = false)]
    pub strict: bool,

    /// Serve deterministic synthetic data without touching the network.
    #[arg(long, global = true, default_value_t = false)]
    pub mock: bool,

    /// Path of the watchlist file.
    #[arg(long, global = true, default_value = "watchlist.json")]
    pub watchlist: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Terminal rendering for interactive use.
    Table,
    /// Single JSON envelope.
    Json,
    /// Newline-delimited JSON (one envelope per line).
    Ndjson,
}

/// Available CLI commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Manage the tracked symbol list.
    ///
    /// # Examples
    ///
    ///   tickwatch watch add AAPL
    ///   tickwatch watch remove aapl
    ///   tickwatch watch list
    Watch(WatchArgs),

    /// Render history, candlestick chart, and profile for one symbol.
    ///
    /// Defaults to the trailing year ending today. A start date that is not
    /// strictly before the end date falls back to the default window with a
    /// warning instead of failing.
    ///
    /// # Examples
    ///
    ///   tickwatch show AAPL
    ///   tickwatch show MSFT --start 2024-01-01 --end 2024-06-01
    Show(ShowArgs),
}

/// Arguments for the `watch` command group.
#[derive(Debug, Args)]
pub struct WatchArgs {
    #[command(subcommand)]
    pub command: WatchCommand,
}

/// Watchlist management subcommands.
#[derive(Debug, Subcommand)]
pub enum WatchCommand {
    /// Add a symbol to the watchlist (case-insensitive, deduplicated).
    Add(WatchSymbolArgs),

    /// Remove a symbol from the watchlist. Removing an untracked symbol
    /// succeeds with a warning.
    Remove(WatchSymbolArgs),

    /// List tracked symbols in insertion order.
    List,
}

/// Symbol argument shared by `watch add` and `watch remove`.
#[derive(Debug, Args)]
pub struct WatchSymbolArgs {
    /// Market symbol (e.g., AAPL). Normalized to uppercase.
    pub symbol: String,
}

/// Arguments for the `show` command.
#[derive(Debug, Args)]
pub struct ShowArgs {
    /// Market symbol to render.
    pub symbol: String,

    /// Window start date (YYYY-MM-DD). Defaults to one year ago.
    #[arg(long)]
    pub start: Option<String>,

    /// Window end date (YYYY-MM-DD). Defaults to today.
    #[arg(long)]
    pub end: Option<String>,
}
