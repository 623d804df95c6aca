// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fmt;

#[derive(Debug, Clone)]
pub enum TileError {
    SizeGapError { size: u32, gap: u32 },
    ConfigLengthError(&'static str),
    ConfigValueError(String),
    ConfigReadError(String),
    AnnotationLengthError,
    AnnotationReadError(String),
    AnnotationWriteError,
    ImageError(&'static str),
    ImageReadError,
    ImageWriteError,
    ImageExtensionError,
    NoFileError(String),
    DirError(String),
    OtherError(String),
}

impl fmt::Display for TileError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TileError::SizeGapError { size, gap } => {
                write!(
                    f,
                    "[obbtile::SizeGapError] Invalid size gap pair [{} {}]. Window size must be greater than gap.",
                    size, gap
                )
            }
            TileError::ConfigLengthError(message) => {
                write!(
                    f,
                    "[obbtile::ConfigLengthError] Parallel configuration arrays differ in length. {}",
                    message
                )
            }
            TileError::ConfigValueError(message) => {
                write!(
                    f,
                    "[obbtile::ConfigValueError] Invalid configuration value. {}.",
                    message
                )
            }
            TileError::ConfigReadError(message) => {
                write!(
                    f,
                    "[obbtile::ConfigReadError] Configuration could not be read. {}.",
                    message
                )
            }
            TileError::AnnotationLengthError => {
                write!(
                    f,
                    "[obbtile::AnnotationLengthError] Boxes, labels, difficulties and truncation flags must have equal length."
                )
            }
            TileError::AnnotationReadError(message) => {
                write!(
                    f,
                    "[obbtile::AnnotationReadError] Annotations could not be read. {}.",
                    message
                )
            }
            TileError::AnnotationWriteError => {
                write!(
                    f,
                    "[obbtile::AnnotationWriteError] Failed to successfully write annotations to output."
                )
            }
            TileError::ImageError(message) => {
                write!(f, "[obbtile::ImageError] Failed to create image. {}", message)
            }
            TileError::ImageReadError => {
                write!(f, "[obbtile::ImageReadError] Failed to read image.")
            }
            TileError::ImageWriteError => {
                write!(f, "[obbtile::ImageWriteError] Failed to write image.")
            }
            TileError::ImageExtensionError => {
                write!(
                    f,
                    "[obbtile::ImageExtensionError] Could not detect a valid image extension for input."
                )
            }
            TileError::NoFileError(message) => {
                write!(
                    f,
                    "[obbtile::NoFileError] File could not be found. {}.",
                    message
                )
            }
            TileError::DirError(message) => {
                write!(
                    f,
                    "[obbtile::DirError] Directory could not be read. {}.",
                    message
                )
            }
            TileError::OtherError(message) => {
                write!(f, "[obbtile::OtherError] Error: {}.", message)
            }
        }
    }
}

impl std::error::Error for TileError {}
