#![allow(clippy::all)]
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
    clap_markdown::print_help_markdown::<Cli>();
}
