// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constant;
use crate::error::TileError;
use crate::sp::SplitOptions;
use crate::sp::window::validate_pairs;

fn default_rates() -> Vec<f64> {
    vec![1.0]
}

fn default_img_rate_thr() -> f64 {
    constant::DEFAULT_IMG_RATE_THR
}

fn default_iof_thr() -> f64 {
    constant::DEFAULT_IOF_THR
}

fn default_padding_value() -> Vec<f64> {
    constant::DEFAULT_PADDING_VALUE.to_vec()
}

fn default_save_ext() -> String {
    constant::DEFAULT_SAVE_EXT.to_string()
}

fn default_nproc() -> usize {
    constant::DEFAULT_NPROC
}

/// Settings of a dataset split read from a JSON file
///
/// # Examples
///
/// ```
/// use obbtile_core::io::SplitConfig;
///
/// let config = SplitConfig::from_json(r#"{
///     "img_dirs": ["train/images"],
///     "ann_dirs": ["train/labelTxt"],
///     "sizes": [1024],
///     "gaps": [200],
///     "save_dir": "split_train"
/// }"#).unwrap();
///
/// assert!(config.validate().is_ok());
/// assert_eq!(config.iof_thr, 0.7);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitConfig {
    pub img_dirs: Vec<PathBuf>,
    pub ann_dirs: Vec<PathBuf>,
    pub sizes: Vec<u32>,
    pub gaps: Vec<u32>,
    #[serde(default = "default_rates")]
    pub rates: Vec<f64>,
    #[serde(default = "default_img_rate_thr")]
    pub img_rate_thr: f64,
    #[serde(default = "default_iof_thr")]
    pub iof_thr: f64,
    #[serde(default)]
    pub no_padding: bool,
    #[serde(default = "default_padding_value")]
    pub padding_value: Vec<f64>,
    pub save_dir: PathBuf,
    #[serde(default = "default_save_ext")]
    pub save_ext: String,
    #[serde(default)]
    pub ignore_empty_prob: f64,
    #[serde(default = "default_nproc")]
    pub nproc: usize,
    #[serde(default)]
    pub seed: u64,
}

// >>> I/O METHODS

impl SplitConfig {
    /// Open a configuration from a JSON file
    ///
    /// ```no_run
    /// use obbtile_core::io::SplitConfig;
    /// let config = SplitConfig::open("split_config.json");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<SplitConfig, TileError> {
        let mut contents = String::new();

        File::open(&path)
            .map_err(|err| TileError::NoFileError(err.to_string()))?
            .read_to_string(&mut contents)
            .map_err(|err| TileError::NoFileError(err.to_string()))?;

        Self::from_json(&contents)
    }

    /// Parse a configuration from a JSON string
    pub fn from_json(contents: &str) -> Result<SplitConfig, TileError> {
        serde_json::from_str(contents).map_err(|err| TileError::ConfigReadError(err.to_string()))
    }
}

// <<< I/O METHODS

impl SplitConfig {
    /// Check the configuration before any image is touched
    pub fn validate(&self) -> Result<(), TileError> {
        if self.sizes.len() != self.gaps.len() {
            return Err(TileError::ConfigLengthError(
                "The number of sizes and gaps must be the same.",
            ));
        }

        if self.img_dirs.len() != self.ann_dirs.len() {
            return Err(TileError::ConfigLengthError(
                "The number of img_dirs and ann_dirs must be the same.",
            ));
        }

        if self.img_dirs.is_empty() {
            return Err(TileError::ConfigValueError(
                "At least one image directory is required".to_string(),
            ));
        }

        if self.sizes.is_empty() {
            return Err(TileError::ConfigValueError(
                "At least one size gap pair is required".to_string(),
            ));
        }

        if self.rates.is_empty() || self.rates.iter().any(|&rate| rate <= 0.0) {
            return Err(TileError::ConfigValueError(
                "Rates must be a non-empty list of positive values".to_string(),
            ));
        }

        for (name, value) in [
            ("img_rate_thr", self.img_rate_thr),
            ("iof_thr", self.iof_thr),
            ("ignore_empty_prob", self.ignore_empty_prob),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(TileError::ConfigValueError(format!(
                    "{} must lie in [0, 1] but got {}",
                    name, value
                )));
            }
        }

        if self.padding_value.is_empty() {
            return Err(TileError::ConfigValueError(
                "padding_value must hold at least one value".to_string(),
            ));
        }

        if !constant::SUPPORTED_PATCH_FORMATS.contains(&self.save_ext.as_str()) {
            return Err(TileError::ConfigValueError(format!(
                "save_ext {} must be one of {:?}",
                self.save_ext,
                constant::SUPPORTED_PATCH_FORMATS
            )));
        }

        if self.nproc == 0 {
            return Err(TileError::ConfigValueError(
                "nproc must be a positive integer".to_string(),
            ));
        }

        let (sizes, gaps) = self.pairs();
        validate_pairs(&sizes, &gaps)
    }

    /// Window sizes and gaps after scaling by every rate
    ///
    /// # Examples
    ///
    /// ```
    /// use obbtile_core::io::SplitConfig;
    ///
    /// let config = SplitConfig::from_json(r#"{
    ///     "img_dirs": ["images"], "ann_dirs": [""],
    ///     "sizes": [1024, 512], "gaps": [200, 100], "rates": [1.0, 2.0],
    ///     "save_dir": "split"
    /// }"#).unwrap();
    ///
    /// let (sizes, gaps) = config.pairs();
    /// assert_eq!(sizes, vec![1024, 512, 512, 256]);
    /// assert_eq!(gaps, vec![200, 100, 100, 50]);
    /// ```
    pub fn pairs(&self) -> (Vec<u32>, Vec<u32>) {
        let mut sizes = Vec::with_capacity(self.rates.len() * self.sizes.len());
        let mut gaps = Vec::with_capacity(self.rates.len() * self.gaps.len());

        for &rate in self.rates.iter() {
            for (&size, &gap) in self.sizes.iter().zip(self.gaps.iter()) {
                sizes.push((size as f64 / rate).floor() as u32);
                gaps.push((gap as f64 / rate).floor() as u32);
            }
        }

        (sizes, gaps)
    }

    /// Annotation directory paired with image directory `index`
    ///
    /// An empty entry means the images carry no annotations.
    pub fn ann_dir(&self, index: usize) -> Option<&Path> {
        self.ann_dirs
            .get(index)
            .filter(|dir| !dir.as_os_str().is_empty())
            .map(PathBuf::as_path)
    }

    /// Per-image split options derived from the configuration
    pub fn options(&self) -> SplitOptions {
        let (sizes, gaps) = self.pairs();

        SplitOptions {
            sizes,
            gaps,
            img_rate_thr: self.img_rate_thr,
            iof_thr: self.iof_thr,
            no_padding: self.no_padding,
            padding_value: self.padding_value.clone(),
            save_ext: self.save_ext.clone(),
            ignore_empty_prob: self.ignore_empty_prob,
        }
    }
}

#[cfg(test)]
mod test {

    use super::*;

    const FULL: &str = r#"{
        "img_dirs": ["train/images", "val/images"],
        "ann_dirs": ["train/labelTxt", ""],
        "sizes": [1024],
        "gaps": [200],
        "rates": [1.0, 0.5],
        "img_rate_thr": 0.5,
        "iof_thr": 0.6,
        "no_padding": true,
        "padding_value": [0, 0, 0],
        "save_dir": "split",
        "save_ext": "tif",
        "ignore_empty_prob": 0.25,
        "nproc": 4,
        "seed": 42
    }"#;

    fn full() -> SplitConfig {
        SplitConfig::from_json(FULL).unwrap()
    }

    #[test]
    fn test_parse_full() {
        let config = full();
        assert!(config.validate().is_ok());
        assert_eq!(config.nproc, 4);
        assert_eq!(config.seed, 42);
        assert!(config.no_padding);
        assert_eq!(config.pairs(), (vec![1024, 2048], vec![200, 400]));
    }

    #[test]
    fn test_defaults() {
        let config = SplitConfig::from_json(
            r#"{"img_dirs": ["a"], "ann_dirs": ["b"], "sizes": [512], "gaps": [0], "save_dir": "c"}"#,
        )
        .unwrap();

        assert_eq!(config.rates, vec![1.0]);
        assert_eq!(config.img_rate_thr, 0.6);
        assert_eq!(config.padding_value, vec![104.0, 116.0, 124.0]);
        assert_eq!(config.save_ext, "png");
        assert_eq!(config.ignore_empty_prob, 0.0);
        assert_eq!(config.nproc, 10);
        assert!(!config.no_padding);
    }

    #[test]
    fn test_missing_field() {
        let config = SplitConfig::from_json(r#"{"img_dirs": ["a"]}"#);
        assert!(matches!(config, Err(TileError::ConfigReadError(_))));
    }

    #[test]
    fn test_ann_dir_empty_means_none() {
        let config = full();
        assert_eq!(config.ann_dir(0), Some(Path::new("train/labelTxt")));
        assert_eq!(config.ann_dir(1), None);
        assert_eq!(config.ann_dir(2), None);
    }

    #[test]
    fn test_validate_lengths() {
        let mut config = full();
        config.gaps.push(100);
        assert!(matches!(
            config.validate(),
            Err(TileError::ConfigLengthError(_))
        ));

        let mut config = full();
        config.ann_dirs.pop();
        assert!(matches!(
            config.validate(),
            Err(TileError::ConfigLengthError(_))
        ));
    }

    #[test]
    fn test_validate_size_gap() {
        let mut config = full();
        config.gaps = vec![1024];
        assert!(matches!(
            config.validate(),
            Err(TileError::SizeGapError { .. })
        ));
    }

    #[test]
    fn test_validate_values() {
        let mut config = full();
        config.iof_thr = 1.5;
        assert!(config.validate().is_err());

        let mut config = full();
        config.save_ext = "gif".to_string();
        assert!(config.validate().is_err());

        let mut config = full();
        config.rates = vec![0.0];
        assert!(config.validate().is_err());

        let mut config = full();
        config.nproc = 0;
        assert!(config.validate().is_err());

        let mut config = full();
        config.padding_value.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_options() {
        let options = full().options();
        assert_eq!(options.sizes, vec![1024, 2048]);
        assert_eq!(options.gaps, vec![200, 400]);
        assert_eq!(options.iof_thr, 0.6);
        assert_eq!(options.save_ext, "tif");
    }
}
