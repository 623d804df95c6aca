// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use clap::Args;

use obbtile_core::constant;
use obbtile_core::sp;

#[derive(Debug, Args)]
#[command(about = "Print the sliding windows generated for an image of a given size.")]
pub struct WindowsArgs {
    #[arg(short = 'x', long, help = "Image width in pixels.", required = true)]
    pub width: Option<u32>,

    #[arg(short = 'y', long, help = "Image height in pixels.", required = true)]
    pub height: Option<u32>,

    #[arg(
        short = 's',
        long,
        help = "Window sizes (e.g. 1024,512).",
        value_delimiter = ',',
        required = true
    )]
    pub sizes: Vec<u32>,

    #[arg(
        short = 'g',
        long,
        help = "Gaps between neighbouring windows, one per size (e.g. 200,100).",
        value_delimiter = ',',
        required = true
    )]
    pub gaps: Vec<u32>,

    #[arg(long, help = "Minimum fraction of a window covered by the image.")]
    pub img_rate_thr: Option<f64>,

    #[arg(short = 'p', long, help = "Pretty print the JSON output.")]
    pub pretty: bool,
}

pub fn windows(args: &WindowsArgs) {
    let width = args.width.unwrap_or(0);
    let height = args.height.unwrap_or(0);
    let img_rate_thr = args.img_rate_thr.unwrap_or(constant::DEFAULT_IMG_RATE_THR);

    if width == 0 || height == 0 {
        eprintln!("[obbtile::windows] ERROR: Width and height must be positive.");
        std::process::exit(1);
    }

    if !(0.0..=1.0).contains(&img_rate_thr) {
        eprintln!("[obbtile::windows] ERROR: img_rate_thr must lie in [0, 1].");
        std::process::exit(1);
    }

    if args.sizes.len() != args.gaps.len() {
        eprintln!("[obbtile::windows] ERROR: The number of sizes and gaps must be the same.");
        std::process::exit(1);
    }

    let windows = sp::generate_windows(width, height, &args.sizes, &args.gaps, img_rate_thr)
        .unwrap_or_else(|err| {
            eprintln!("[obbtile::windows] ERROR: {}", err);
            std::process::exit(1);
        });

    let json = if args.pretty {
        serde_json::to_string_pretty(&windows)
    } else {
        serde_json::to_string(&windows)
    };

    match json {
        Ok(json) => println!("{}", json),
        Err(err) => {
            eprintln!("[obbtile::windows] ERROR: {}", err);
            std::process::exit(1);
        }
    }
}
