// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

// Image extensions accepted by the dataset loader
pub const DOTA_IMAGE_FORMATS: [&str; 7] = ["jpg", "JPG", "jpeg", "png", "tif", "tiff", "bmp"];

// Formats patches can be written as
pub const SUPPORTED_PATCH_FORMATS: [&str; 11] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "tga", "tif", "tiff", "npy",
];

// Patch formats written through the image crate
pub const IMAGE_DYNAMIC_FORMATS: [&str; 10] = [
    "bmp", "jpeg", "jpg", "png", "pbm", "pgm", "ppm", "tga", "tif", "tiff",
];

// Tolerance for sign decisions in polygon clipping
pub const OVERLAP_EPS: f64 = 1e-6;

// An object is truncated once its IoF with a window drifts this far from 1
pub const TRUNCATION_EPS: f64 = 1e-6;

// Windows within this coverage of the best window survive when none pass the threshold
pub const COVERAGE_FALLBACK_EPS: f64 = 0.01;

// Difficulty written for objects cut by a window boundary
pub const TRUNCATED_DIFFICULTY: u8 = 2;

// Output sub-directories of a split
pub const PATCH_IMAGE_DIR: &str = "images";
pub const PATCH_ANNOTATION_DIR: &str = "annfiles";

// Report files written next to the patches
pub const PATCH_COUNTS_FILE: &str = "patch_counts.tsv";
pub const SPLIT_ERRORS_FILE: &str = "split_errors.tsv";

// Configuration defaults
pub const DEFAULT_IMG_RATE_THR: f64 = 0.6;
pub const DEFAULT_IOF_THR: f64 = 0.7;
pub const DEFAULT_PADDING_VALUE: [f64; 3] = [104.0, 116.0, 124.0];
pub const DEFAULT_SAVE_EXT: &str = "png";
pub const DEFAULT_NPROC: usize = 10;
