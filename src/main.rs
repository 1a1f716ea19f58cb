//! traymotion - animated tray icon rendering engine
//!
//! Renders desktop-panel style tray icons that animate smoothly on
//! size, visibility and attention changes, synchronized with a shared
//! observable configuration:
//! - reactive attribute stores fan configuration changes out to icons
//! - a per-icon state machine interpolates size, alpha and overlays
//! - a compositor layers base image, emblem and arrow onto a canvas
//! - `traymotion preview` renders the pipeline to PNG frames

mod cli;
mod config;
mod icon;
mod item;
mod logging;
mod settings;
mod sources;
mod tray;

use clap::Parser;
use cli::{exit_codes, Cli, Commands};

fn main() {
    let exit_code = run();
    std::process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    // Initialize logging
    if let Err(e) = logging::init(cli.verbose, cli.log_level.as_deref()) {
        eprintln!("Failed to initialize logging: {}", e);
        return exit_codes::UNEXPECTED_FAILURE;
    }

    match cli.command {
        Commands::Preview(args) => {
            // The engine is single-threaded and cooperative; a
            // current-thread runtime drives the timer sleeps.
            let rt = match tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()
            {
                Ok(rt) => rt,
                Err(e) => {
                    eprintln!("Failed to create runtime: {}", e);
                    return exit_codes::UNEXPECTED_FAILURE;
                }
            };
            rt.block_on(async {
                match cli::preview::run(args).await {
                    Ok(()) => exit_codes::SUCCESS,
                    Err(e) => {
                        eprintln!("Error: {:#}", e);
                        categorize_error(&e)
                    }
                }
            })
        }
        Commands::Info(args) => match cli::info::run(args) {
            Ok(()) => exit_codes::SUCCESS,
            Err(e) => {
                eprintln!("Error: {:#}", e);
                exit_codes::UNEXPECTED_FAILURE
            }
        },
    }
}

/// Categorize an error into the appropriate exit code
fn categorize_error(e: &anyhow::Error) -> i32 {
    let msg = e.to_string().to_lowercase();
    if msg.contains("unknown edge") || msg.contains("invalid") {
        exit_codes::INVALID_ARGUMENTS
    } else {
        exit_codes::UNEXPECTED_FAILURE
    }
}
