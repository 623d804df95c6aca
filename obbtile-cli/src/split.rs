// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::PathBuf;
use std::time::Instant;

use clap::Args;

use obbtile_core::constant;
use obbtile_core::io::{SplitConfig, load_dota};
use obbtile_core::sp;
use obbtile_core::ut;

#[derive(Debug, Args)]
#[command(about = "Split images and oriented bounding box annotations into overlapping patches.")]
pub struct SplitArgs {
    #[arg(
        short = 'c',
        long,
        help = "Path to a JSON split configuration.",
        required = true
    )]
    pub config: Option<String>,

    #[arg(short = 'o', long, help = "Output directory. Overrides save_dir.")]
    pub output: Option<String>,

    #[arg(short = 't', long, help = "Number of threads. Overrides nproc.")]
    pub threads: Option<usize>,

    #[arg(short = 'v', long, help = "Verbose output.")]
    pub verbose: bool,
}

pub fn split(args: &SplitArgs) {
    let start = Instant::now();

    let config_path = args.config.to_owned().unwrap_or_else(|| {
        eprintln!("[obbtile::split] ERROR: A configuration file must be provided.");
        std::process::exit(1);
    });

    let mut config = SplitConfig::open(&config_path).unwrap_or_else(|err| {
        eprintln!("[obbtile::split] ERROR: {}", err);
        std::process::exit(1);
    });

    if let Some(output) = args.output.to_owned() {
        config.save_dir = PathBuf::from(output);
    }

    if let Some(threads) = args.threads {
        config.nproc = threads;
    }

    if let Err(err) = config.validate() {
        eprintln!("[obbtile::split] ERROR: {}", err);
        std::process::exit(1);
    }

    let mut jobs = Vec::new();

    for (index, img_dir) in config.img_dirs.iter().enumerate() {
        let infos = load_dota(img_dir, config.ann_dir(index), args.verbose).unwrap_or_else(|err| {
            eprintln!("[obbtile::split] ERROR: {}", err);
            std::process::exit(1);
        });

        jobs.extend(infos.into_iter().map(|info| (info, img_dir.clone())));
    }

    if jobs.is_empty() {
        eprintln!(
            "[obbtile::split] ERROR: No images were detected. Supported formats are: {:?}.",
            constant::DOTA_IMAGE_FORMATS
        );
        std::process::exit(1);
    }

    ut::track::progress_log(
        &format!(
            "Detected {} images across {} directories.",
            ut::track::thousands_format(jobs.len()),
            config.img_dirs.len()
        ),
        args.verbose,
    );

    let (save_dir, output) = sp::create_output_dirs(&config.save_dir).unwrap_or_else(|err| {
        eprintln!("[obbtile::split] ERROR: {}", err);
        std::process::exit(1);
    });

    ut::track::progress_log(
        &format!("Writing patches to {}.", save_dir.display()),
        args.verbose,
    );

    let results = sp::split_all(
        &jobs,
        &config.options(),
        &output,
        config.nproc,
        config.seed,
        args.verbose,
    )
    .unwrap_or_else(|err| {
        eprintln!("[obbtile::split] ERROR: {}", err);
        std::process::exit(1);
    });

    let mut patches: usize = 0;
    let mut success: Vec<String> = Vec::with_capacity(results.len());
    let mut failure: Vec<String> = Vec::new();

    for (id, run) in results.iter() {
        match run {
            Ok(n_patches) => {
                patches += n_patches;
                success.push(format!("{}\t{}", id, n_patches));
            }
            Err(err) => failure.push(format!("{}\t{}", id, err)),
        }
    }

    ut::track::progress_log(
        &format!(
            "Complete. {} patches written from {} images in {:.3} s.",
            ut::track::thousands_format(patches),
            ut::track::thousands_format(success.len()),
            start.elapsed().as_secs_f64()
        ),
        args.verbose,
    );

    if !success.is_empty() {
        std::fs::write(save_dir.join(constant::PATCH_COUNTS_FILE), success.join("\n"))
            .unwrap_or_else(|err| {
                eprintln!("[obbtile::split] ERROR: {}", err);
                std::process::exit(1);
            });
    }

    if !failure.is_empty() {
        ut::track::progress_log(
            &format!(
                "{} images failed. See {}.",
                ut::track::thousands_format(failure.len()),
                constant::SPLIT_ERRORS_FILE
            ),
            args.verbose,
        );

        std::fs::write(save_dir.join(constant::SPLIT_ERRORS_FILE), failure.join("\n"))
            .unwrap_or_else(|err| {
                eprintln!("[obbtile::split] ERROR: {}", err);
                std::process::exit(1);
            });
    }
}
