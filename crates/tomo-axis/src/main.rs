// ─────────────────────────────────────────────────────────────────────
// Tomo-Axis — Command-Line Entry Point
// © 2019–2026 Maria Matveeva <matveeva.maria@gmail.com>
// License: GNU LGPL v3 or later
// ─────────────────────────────────────────────────────────────────────
//! `tomo-axis`: compute the axis of rotation for parallel-beam
//! tomography from opposed projections or a sinogram.

mod angles;
mod cli;
mod commands;

use clap::Parser;

use crate::cli::{Cli, Commands};

fn main() {
    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> anyhow::Result<()> {
    let cli = Cli::parse();
    match &cli.command {
        Commands::Pair(args) => commands::run_pair(args),
        Commands::Sinogram(args) => commands::run_sinogram(args),
    }
}
