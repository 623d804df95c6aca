// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::Path;

use crate::constant::TRUNCATED_DIFFICULTY;
use crate::error::TileError;

/// Ground sample distance recorded in an annotation file
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Gsd {
    #[default]
    Unset,
    ParseError,
    Value(f32),
}

/// Oriented bounding box annotations for a single image
///
/// Boxes, labels, difficulties, and truncation flags are stored as parallel
/// arrays where index `i` always refers to the same object. Each box holds
/// the four vertices as `[x1, y1, x2, y2, x3, y3, x4, y4]`.
///
/// # Examples
///
/// ```
/// use obbtile_core::im::Annotation;
///
/// let boxes = vec![[0., 0., 4., 0., 4., 2., 0., 2.]];
/// let labels = vec!["plane".to_string()];
///
/// let annotation = Annotation::new(boxes.clone(), labels.clone(), vec![0]);
/// assert!(annotation.is_ok());
///
/// let annotation = Annotation::new(boxes, labels, vec![0, 1]);
/// assert!(annotation.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Annotation {
    bboxes: Vec<[f64; 8]>,
    labels: Vec<String>,
    difficulties: Vec<u8>,
    truncated: Vec<bool>,
}

impl Annotation {
    /// Initialize annotations with every object marked as not truncated
    ///
    /// # Arguments
    ///
    /// * `bboxes` - Oriented boxes as four (x, y) vertices
    /// * `labels` - Category label of each object
    /// * `difficulties` - Difficulty flag of each object
    pub fn new(
        bboxes: Vec<[f64; 8]>,
        labels: Vec<String>,
        difficulties: Vec<u8>,
    ) -> Result<Self, TileError> {
        let truncated = vec![false; bboxes.len()];
        Self::with_truncation(bboxes, labels, difficulties, truncated)
    }

    /// Initialize annotations with explicit truncation flags
    pub fn with_truncation(
        bboxes: Vec<[f64; 8]>,
        labels: Vec<String>,
        difficulties: Vec<u8>,
        truncated: Vec<bool>,
    ) -> Result<Self, TileError> {
        let n = bboxes.len();

        if labels.len() != n || difficulties.len() != n || truncated.len() != n {
            return Err(TileError::AnnotationLengthError);
        }

        Ok(Self {
            bboxes,
            labels,
            difficulties,
            truncated,
        })
    }

    /// Annotations without any objects
    pub fn empty() -> Self {
        Self::default()
    }
}

// >>> I/O METHODS

impl Annotation {
    /// Open annotations from a DOTA text file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to a DOTA annotation file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use obbtile_core::im::Annotation;
    /// let annotation = Annotation::open("P0001.txt");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Annotation, TileError> {
        read_dota_txt(path).map(|(_, annotation)| annotation)
    }

    /// Save annotations as a DOTA text file
    ///
    /// Truncated objects are written with a difficulty of 2.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use obbtile_core::im::Annotation;
    /// let annotation = Annotation::open("P0001.txt").unwrap();
    /// annotation.save("P0001__1024__0___0.txt").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        write_dota_txt(path, self)
    }

    /// Format each object as a DOTA annotation line
    pub fn dota_lines(&self) -> Vec<String> {
        (0..self.len())
            .map(|i| {
                let coords = self.bboxes[i]
                    .iter()
                    .map(|c| c.to_string())
                    .collect::<Vec<String>>()
                    .join(" ");

                let difficulty = if self.truncated[i] {
                    TRUNCATED_DIFFICULTY
                } else {
                    self.difficulties[i]
                };

                format!("{} {} {}", coords, self.labels[i], difficulty)
            })
            .collect()
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl Annotation {
    /// Number of objects
    pub fn len(&self) -> usize {
        self.bboxes.len()
    }

    /// Check if there are no objects
    pub fn is_empty(&self) -> bool {
        self.bboxes.is_empty()
    }

    pub fn bboxes(&self) -> &[[f64; 8]] {
        &self.bboxes
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn difficulties(&self) -> &[u8] {
        &self.difficulties
    }

    pub fn truncated(&self) -> &[bool] {
        &self.truncated
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl Annotation {
    /// Append a copy of object `index` from `source` with a truncation flag
    pub fn push_from(&mut self, source: &Annotation, index: usize, truncated: bool) {
        self.bboxes.push(source.bboxes[index]);
        self.labels.push(source.labels[index].clone());
        self.difficulties.push(source.difficulties[index]);
        self.truncated.push(truncated);
    }

    /// Shift every box by `(-dx, -dy)`
    ///
    /// # Examples
    ///
    /// ```
    /// use obbtile_core::im::Annotation;
    ///
    /// let boxes = vec![[10., 20., 14., 20., 14., 22., 10., 22.]];
    /// let annotation = Annotation::new(boxes, vec!["ship".to_string()], vec![1]).unwrap();
    ///
    /// let local = annotation.translated(10., 20.);
    /// assert_eq!(local.bboxes()[0], [0., 0., 4., 0., 4., 2., 0., 2.]);
    /// ```
    pub fn translated(&self, dx: f64, dy: f64) -> Annotation {
        let bboxes = self
            .bboxes
            .iter()
            .map(|bbox| {
                let mut shifted = *bbox;
                for (k, value) in shifted.iter_mut().enumerate() {
                    *value -= if k % 2 == 0 { dx } else { dy };
                }
                shifted
            })
            .collect();

        Annotation {
            bboxes,
            labels: self.labels.clone(),
            difficulties: self.difficulties.clone(),
            truncated: self.truncated.clone(),
        }
    }
}

// <<< TRANSFORM METHODS

/// Metadata and annotations of a single source image
#[derive(Debug, Clone, PartialEq)]
pub struct ImageInfo {
    pub gsd: Gsd,
    pub filename: String,
    pub id: String,
    pub width: u32,
    pub height: u32,
    pub annotation: Annotation,
}

/// Read a DOTA annotation file into its ground sample distance and objects
///
/// Blank lines, `imagesource` lines, and `NAN` lines are skipped. Object
/// lines need at least nine tokens; a tenth token sets the difficulty.
pub fn read_dota_txt<P: AsRef<Path>>(path: P) -> Result<(Gsd, Annotation), TileError> {
    let mut contents = String::new();

    File::open(&path)
        .map_err(|err| TileError::NoFileError(err.to_string()))?
        .read_to_string(&mut contents)
        .map_err(|err| TileError::NoFileError(err.to_string()))?;

    parse_dota(&contents)
}

/// Parse the contents of a DOTA annotation file
pub fn parse_dota(contents: &str) -> Result<(Gsd, Annotation), TileError> {
    let mut gsd = Gsd::Unset;
    let mut annotation = Annotation::empty();

    for (number, line) in contents.lines().enumerate() {
        let line = line.trim_end_matches('\r');

        if line.is_empty() {
            continue;
        }

        if line.starts_with("gsd") {
            if let Some((_, value)) = line.split_once(':') {
                gsd = value
                    .trim()
                    .parse::<f32>()
                    .map(Gsd::Value)
                    .unwrap_or(Gsd::ParseError);
            }
            continue;
        }

        if line.starts_with("imagesource") || line.starts_with("NAN") {
            continue;
        }

        let tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 9 {
            continue;
        }

        let mut bbox = [0f64; 8];
        for (value, token) in bbox.iter_mut().zip(tokens.iter()) {
            *value = token.parse::<f64>().map_err(|_| {
                TileError::AnnotationReadError(format!(
                    "Invalid coordinate '{}' on line {}",
                    token,
                    number + 1
                ))
            })?;
        }

        let difficulty = if tokens.len() == 10 {
            tokens[9].parse::<u8>().map_err(|_| {
                TileError::AnnotationReadError(format!(
                    "Invalid difficulty '{}' on line {}",
                    tokens[9],
                    number + 1
                ))
            })?
        } else {
            0
        };

        annotation.bboxes.push(bbox);
        annotation.labels.push(tokens[8].to_string());
        annotation.difficulties.push(difficulty);
        annotation.truncated.push(false);
    }

    Ok((gsd, annotation))
}

/// Write annotations to a DOTA text file, one newline-terminated line per object
pub fn write_dota_txt<P: AsRef<Path>>(path: P, annotation: &Annotation) -> Result<(), TileError> {
    let file = File::create(path).map_err(|_| TileError::AnnotationWriteError)?;
    let mut writer = BufWriter::new(file);

    for line in annotation.dota_lines() {
        writeln!(writer, "{}", line).map_err(|_| TileError::AnnotationWriteError)?;
    }

    writer.flush().map_err(|_| TileError::AnnotationWriteError)
}
