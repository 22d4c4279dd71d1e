//! md2html5 - Main Entry Point
//!
//! Converts Markdown files to styled HTML5 pages, from flags or interactively.

use clap::Parser;
use log::debug;
use md2html5::cli::{self, Args};

fn main() {
    let args = Args::parse();

    // Initialize logging
    let default_filter = if args.quiet { "warn" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_filter))
        .init();

    debug!("Starting md2html5 {}", env!("CARGO_PKG_VERSION"));

    if let Err(e) = cli::run(args) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
