// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::{Path, PathBuf};

use crate::error::TileError;

/// Ensures a new directory is created with an incrementing suffix if necessary.
///
/// # Arguments
///
/// * `directory` - Path to new directory - no overwrites allowed
///
/// # Examples
///
/// ```
/// use obbtile_core::ut::path::create_directory;
///
/// let base = std::env::temp_dir().join("TEST_OBBTILE_CREATE_DIRECTORY");
/// let _ = std::fs::remove_dir_all(&base);
///
/// let first = create_directory(&base).unwrap();
/// let second = create_directory(&base).unwrap();
///
/// assert_eq!(first, base);
/// assert_eq!(second, std::env::temp_dir().join("TEST_OBBTILE_CREATE_DIRECTORY_0"));
///
/// std::fs::remove_dir(first).unwrap();
/// std::fs::remove_dir(second).unwrap();
/// ```
pub fn create_directory<P: AsRef<Path>>(directory: P) -> Result<PathBuf, TileError> {
    let directory = directory.as_ref();

    if !directory.exists() {
        std::fs::create_dir_all(directory).map_err(|err| TileError::DirError(err.to_string()))?;
        return Ok(directory.to_path_buf());
    }

    let parent = directory.parent().unwrap_or_else(|| Path::new("."));
    let base_name = directory
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| TileError::DirError("Invalid directory name".to_string()))?;

    for index in 0..30 {
        let new_dir = parent.join(format!("{}_{}", base_name, index));

        if !new_dir.exists() {
            std::fs::create_dir(&new_dir).map_err(|err| TileError::DirError(err.to_string()))?;
            return Ok(new_dir);
        }
    }

    Err(TileError::DirError(format!(
        "Could not create a directory in alotted increments. Check the directory path: {}",
        directory.display()
    )))
}

/// Collect file paths with a valid extension from a directory in sorted order
///
/// # Arguments
///
/// * `directory` - Path to directory containing files
/// * `valid_ext` - Case-sensitive extensions to keep
///
/// # Examples
///
/// ```no_run
/// use obbtile_core::ut::path::collect_file_paths;
/// use obbtile_core::constant::DOTA_IMAGE_FORMATS;
/// let files = collect_file_paths("images/", DOTA_IMAGE_FORMATS.as_slice());
/// ```
pub fn collect_file_paths<P: AsRef<Path>>(
    directory: P,
    valid_ext: &[&str],
) -> Result<Vec<PathBuf>, TileError> {
    let message = directory.as_ref().display().to_string();

    let mut files: Vec<PathBuf> = std::fs::read_dir(directory)
        .map_err(|_| TileError::DirError(message))?
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file()
                && path
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| valid_ext.contains(&ext))
        })
        .collect();

    files.sort_unstable();

    Ok(files)
}

/// File name without its final extension
pub fn file_stem<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Final component of a path
pub fn file_name<P: AsRef<Path>>(path: P) -> String {
    path.as_ref()
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default()
}
