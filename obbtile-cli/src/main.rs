// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use clap::{Parser, Subcommand};
use obbtile_cli::{split, windows};

#[derive(Parser)]
#[command(version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    Split(split::SplitArgs),
    Windows(windows::WindowsArgs),
}

fn main() {
    let cli = Cli::parse();

    match &cli.command {
        Some(Commands::Split(split_args)) => split::split(split_args),
        Some(Commands::Windows(windows_args)) => windows::windows(windows_args),
        None => {}
    }
}
