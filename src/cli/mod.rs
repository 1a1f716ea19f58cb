//! CLI module - command-line interface
//!
//! - `traymotion preview` - render an icon animation to PNG frames
//! - `traymotion info` - print the resolved settings

pub mod info;
pub mod preview;

use clap::{Parser, Subcommand};

/// Exit codes
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const UNEXPECTED_FAILURE: i32 = 1;
    pub const INVALID_ARGUMENTS: i32 = 2;
}

/// traymotion - animated tray icon rendering engine
///
/// Renders small tray icons that animate smoothly on size, visibility
/// and attention changes, synchronized with a shared configuration.
#[derive(Parser, Debug)]
#[command(name = "traymotion")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(long = "log-level", global = true, value_parser = ["trace", "debug", "info", "warn", "error"])]
    pub log_level: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render an icon show/destroy animation to numbered PNG frames
    Preview(preview::PreviewArgs),

    /// Print the resolved settings as JSON
    Info(info::InfoArgs),
}
