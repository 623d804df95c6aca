// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rayon::prelude::*;

use crate::constant;
use crate::error::TileError;
use crate::im::{ImageInfo, TileImage};
use crate::sp::assign::assign;
use crate::sp::window::{Window, generate_windows, validate_pairs};
use crate::ut;

/// Per-image settings shared by every job of a split
#[derive(Debug, Clone, PartialEq)]
pub struct SplitOptions {
    pub sizes: Vec<u32>,
    pub gaps: Vec<u32>,
    pub img_rate_thr: f64,
    pub iof_thr: f64,
    pub no_padding: bool,
    pub padding_value: Vec<f64>,
    pub save_ext: String,
    pub ignore_empty_prob: f64,
}

impl Default for SplitOptions {
    fn default() -> Self {
        SplitOptions {
            sizes: vec![1024],
            gaps: vec![200],
            img_rate_thr: constant::DEFAULT_IMG_RATE_THR,
            iof_thr: constant::DEFAULT_IOF_THR,
            no_padding: false,
            padding_value: constant::DEFAULT_PADDING_VALUE.to_vec(),
            save_ext: constant::DEFAULT_SAVE_EXT.to_string(),
            ignore_empty_prob: 0.0,
        }
    }
}

/// Directories receiving patch images and patch annotations
#[derive(Debug, Clone, PartialEq)]
pub struct OutputDirs {
    pub images: PathBuf,
    pub annfiles: PathBuf,
}

impl OutputDirs {
    /// Output layout below an existing save directory
    pub fn new<P: AsRef<Path>>(save_dir: P) -> Self {
        OutputDirs {
            images: save_dir.as_ref().join(constant::PATCH_IMAGE_DIR),
            annfiles: save_dir.as_ref().join(constant::PATCH_ANNOTATION_DIR),
        }
    }
}

/// Create a fresh save directory with its image and annotation sub-directories
///
/// An existing `save_dir` is never reused; a suffixed sibling is created
/// instead. Returns the directory actually created and its layout.
pub fn create_output_dirs<P: AsRef<Path>>(save_dir: P) -> Result<(PathBuf, OutputDirs), TileError> {
    let save_dir = ut::path::create_directory(save_dir)?;
    let output = OutputDirs::new(&save_dir);

    for dir in [&output.images, &output.annfiles] {
        std::fs::create_dir_all(dir).map_err(|err| TileError::DirError(err.to_string()))?;
    }

    Ok((save_dir, output))
}

/// Shared count of finished images
///
/// The counter update and its log line happen under one lock so ordinals in
/// the log are unique and increasing.
#[derive(Debug)]
pub struct Progress {
    done: Mutex<usize>,
    total: usize,
    verbose: bool,
}

impl Progress {
    pub fn new(total: usize, verbose: bool) -> Self {
        Progress {
            done: Mutex::new(0),
            total,
            verbose,
        }
    }

    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of images finished so far
    pub fn done(&self) -> usize {
        match self.done.lock() {
            Ok(done) => *done,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }

    /// Mark one image as finished and log its summary
    pub fn update(&self, info: &ImageInfo, patches: usize) {
        let mut done = match self.done.lock() {
            Ok(done) => done,
            Err(poisoned) => poisoned.into_inner(),
        };

        *done += 1;

        ut::track::progress_log(
            &format!(
                "({}/{}) {} | width: {} | height: {} | objects: {} | patches: {}",
                *done,
                self.total,
                info.filename,
                info.width,
                info.height,
                info.annotation.len(),
                patches
            ),
            self.verbose,
        );
    }

    /// Mark one image as failed and log the reason
    pub fn fail(&self, info: &ImageInfo, err: &TileError) {
        let mut done = match self.done.lock() {
            Ok(done) => done,
            Err(poisoned) => poisoned.into_inner(),
        };

        *done += 1;

        ut::track::progress_log(
            &format!("({}/{}) {} | failed: {}", *done, self.total, info.filename, err),
            self.verbose,
        );
    }
}

/// Name shared by a patch image and its annotation file
///
/// # Examples
///
/// ```
/// use obbtile_core::sp::{Window, patch_name};
///
/// let window = Window::new(824, 400, 1848, 1424);
/// assert_eq!(patch_name("P0001", &window), "P0001__1024__824___400");
/// ```
pub fn patch_name(id: &str, window: &Window) -> String {
    format!("{}__{}__{}___{}", id, window.width(), window.x1, window.y1)
}

/// Split one image into patches and write them with their annotations
///
/// # Arguments
///
/// * `info` - Image metadata and annotations
/// * `img_dir` - Directory holding `info.filename`
/// * `options` - Window, assignment and output settings
/// * `output` - Destination directories
/// * `rng` - Random source for skipping empty patches
/// * `progress` - Shared progress counter
///
/// Returns the number of patches written.
pub fn split_one<R: Rng>(
    info: &ImageInfo,
    img_dir: &Path,
    options: &SplitOptions,
    output: &OutputDirs,
    rng: &mut R,
    progress: &Progress,
) -> Result<usize, TileError> {
    let image = TileImage::open(img_dir.join(&info.filename))?;

    let windows = generate_windows(
        info.width,
        info.height,
        &options.sizes,
        &options.gaps,
        options.img_rate_thr,
    )?;

    let assigned = assign(&windows, &info.annotation, options.iof_thr);

    let mut patches = 0;

    for (window, annotation) in windows.iter().zip(assigned.iter()) {
        if annotation.is_empty()
            && options.ignore_empty_prob > 0.0
            && rng.gen_bool(options.ignore_empty_prob)
        {
            continue;
        }

        let name = patch_name(&info.id, window);
        let local = annotation.translated(window.x1 as f64, window.y1 as f64);

        image
            .crop_padded(window, &options.padding_value, options.no_padding)?
            .save(output.images.join(format!("{}.{}", name, options.save_ext)))?;

        local.save(output.annfiles.join(format!("{}.txt", name)))?;

        patches += 1;
    }

    progress.update(info, patches);

    Ok(patches)
}

/// Split every image, optionally on a pool of worker threads
///
/// # Arguments
///
/// * `jobs` - Image metadata paired with the directory holding the image
/// * `options` - Window, assignment and output settings
/// * `output` - Destination directories
/// * `threads` - Worker count; one or fewer runs sequentially
/// * `seed` - Base seed; job `i` draws from a generator seeded with `seed + i`
/// * `verbose` - Log one line per image
///
/// Pairs are checked before any image is touched. A failing image does not
/// stop the others; its error is returned next to its id.
pub fn split_all(
    jobs: &[(ImageInfo, PathBuf)],
    options: &SplitOptions,
    output: &OutputDirs,
    threads: usize,
    seed: u64,
    verbose: bool,
) -> Result<Vec<(String, Result<usize, TileError>)>, TileError> {
    validate_pairs(&options.sizes, &options.gaps)?;

    let progress = Progress::new(jobs.len(), verbose);

    let run = |(index, (info, img_dir)): (usize, &(ImageInfo, PathBuf))| {
        let mut rng = StdRng::seed_from_u64(seed.wrapping_add(index as u64));
        let result = split_one(info, img_dir, options, output, &mut rng, &progress);

        if let Err(err) = &result {
            progress.fail(info, err);
        }

        (info.id.clone(), result)
    };

    if threads <= 1 {
        return Ok(jobs.iter().enumerate().map(run).collect());
    }

    let pool = rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build()
        .map_err(|err| TileError::OtherError(err.to_string()))?;

    Ok(pool.install(|| jobs.par_iter().enumerate().map(run).collect()))
}
