// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;
use std::time::Instant;

use kdam::TqdmParallelIterator;
use rayon::prelude::*;

use crate::constant;
use crate::error::TileError;
use crate::im::{Annotation, Gsd, ImageInfo, TileImage, read_dota_txt};
use crate::ut;

/// Load metadata and annotations of a single DOTA image
///
/// # Arguments
///
/// * `image_path` - Path to a source image
/// * `ann_dir` - Directory holding `<stem>.txt`, or `None` for unannotated images
/// * `verbose` - Log images whose annotation file is missing
///
/// Only the image header is read. A missing annotation file yields an empty
/// annotation.
pub fn load_dota_single<P: AsRef<Path>>(
    image_path: P,
    ann_dir: Option<&Path>,
    verbose: bool,
) -> Result<ImageInfo, TileError> {
    let image_path = image_path.as_ref();

    let valid = image_path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| constant::DOTA_IMAGE_FORMATS.contains(&ext));

    if !valid {
        return Err(TileError::ImageExtensionError);
    }

    let (width, height) = TileImage::dimensions(image_path)?;

    let id = ut::path::file_stem(image_path);
    let filename = ut::path::file_name(image_path);

    let (gsd, annotation) = match ann_dir {
        Some(dir) => {
            let txt = dir.join(format!("{}.txt", id));
            if txt.is_file() {
                read_dota_txt(&txt)?
            } else {
                ut::track::progress_log(
                    &format!("No annotation file found for {}.", filename),
                    verbose,
                );
                (Gsd::Unset, Annotation::empty())
            }
        }
        None => (Gsd::Unset, Annotation::empty()),
    };

    Ok(ImageInfo {
        gsd,
        filename,
        id,
        width,
        height,
        annotation,
    })
}

/// Load every supported image of a DOTA directory
///
/// # Arguments
///
/// * `img_dir` - Directory of source images
/// * `ann_dir` - Directory of DOTA annotation files, or `None`
/// * `verbose` - Show a progress bar and log skipped images
///
/// Images that fail to load are logged and skipped. The result is sorted by
/// file name.
pub fn load_dota<P: AsRef<Path>>(
    img_dir: P,
    ann_dir: Option<&Path>,
    verbose: bool,
) -> Result<Vec<ImageInfo>, TileError> {
    let start = Instant::now();
    let img_dir = img_dir.as_ref();

    ut::track::progress_log(
        &format!("Starting loading {} dataset information.", img_dir.display()),
        verbose,
    );

    let files = ut::path::collect_file_paths(img_dir, constant::DOTA_IMAGE_FORMATS.as_slice())?;

    let pb = ut::track::progress_bar(files.len(), "Loading", verbose);

    let mut infos: Vec<ImageInfo> = files
        .par_iter()
        .tqdm_with_bar(pb)
        .filter_map(|path| match load_dota_single(path, ann_dir, verbose) {
            Ok(info) => Some(info),
            Err(err) => {
                ut::track::progress_log(
                    &format!("Skipping {}: {}", path.display(), err),
                    verbose,
                );
                None
            }
        })
        .collect();

    infos.sort_unstable_by(|a, b| a.filename.cmp(&b.filename));

    if verbose {
        println!();
    }

    ut::track::progress_log(
        &format!(
            "Finished loading {} images in {:.3} s.",
            ut::track::thousands_format(infos.len()),
            start.elapsed().as_secs_f64()
        ),
        verbose,
    );

    Ok(infos)
}

#[cfg(test)]
mod test {

    use super::*;

    fn dataset(name: &str) -> std::path::PathBuf {
        let root = std::env::temp_dir().join(name);
        let _ = std::fs::remove_dir_all(&root);

        std::fs::create_dir_all(root.join("images")).unwrap();
        std::fs::create_dir_all(root.join("labelTxt")).unwrap();

        for (id, w, h) in [("P0002", 30, 20), ("P0001", 40, 50)] {
            image::RgbImage::new(w, h)
                .save(root.join("images").join(format!("{}.png", id)))
                .unwrap();
        }

        std::fs::write(root.join("images").join("notes.md"), b"").unwrap();
        std::fs::write(root.join("images").join("broken.png"), b"not a png").unwrap();

        std::fs::write(
            root.join("labelTxt").join("P0001.txt"),
            "imagesource:GoogleEarth\ngsd:0.15\n1 1 9 1 9 9 1 9 plane 1\n",
        )
        .unwrap();

        root
    }

    #[test]
    fn test_load_dota_single() {
        let root = dataset("TEST_OBBTILE_LOAD_DOTA_SINGLE");
        let labels = root.join("labelTxt");

        let info =
            load_dota_single(root.join("images").join("P0001.png"), Some(&labels), false).unwrap();

        assert_eq!(info.id, "P0001");
        assert_eq!(info.filename, "P0001.png");
        assert_eq!((info.width, info.height), (40, 50));
        assert_eq!(info.gsd, Gsd::Value(0.15));
        assert_eq!(info.annotation.len(), 1);
        assert_eq!(info.annotation.difficulties(), &[1]);

        let info =
            load_dota_single(root.join("images").join("P0002.png"), Some(&labels), false).unwrap();
        assert!(info.annotation.is_empty());
        assert_eq!(info.gsd, Gsd::Unset);

        let info = load_dota_single(root.join("images").join("P0001.png"), None, false).unwrap();
        assert!(info.annotation.is_empty());

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_load_dota_single_rejects_extension() {
        let root = dataset("TEST_OBBTILE_LOAD_DOTA_EXTENSION");

        let result = load_dota_single(root.join("images").join("notes.md"), None, false);
        assert!(matches!(result, Err(TileError::ImageExtensionError)));

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_load_dota_sorted_and_skips_broken() {
        let root = dataset("TEST_OBBTILE_LOAD_DOTA");

        let infos = load_dota(root.join("images"), Some(&root.join("labelTxt")), false).unwrap();

        let ids: Vec<&str> = infos.iter().map(|info| info.id.as_str()).collect();
        assert_eq!(ids, vec!["P0001", "P0002"]);

        std::fs::remove_dir_all(&root).unwrap();
    }

    #[test]
    fn test_load_dota_missing_dir() {
        let result = load_dota("does_not_exist/", None, false);
        assert!(matches!(result, Err(TileError::DirError(_))));
    }
}
