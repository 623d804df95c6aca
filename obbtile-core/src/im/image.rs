// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

use std::path::Path;

use image::{DynamicImage, ImageBuffer, Luma, Rgb, open as open_dynamic};

use crate::constant;
use crate::error::TileError;
use crate::im::TileBuffer;
use crate::impl_enum_dispatch;
use crate::io::write_numpy;
use crate::sp::Window;

/// A source raster or a patch cut from one
///
/// Alpha channels are dropped on load so every image is stored as 1 or
/// 3 channels of its native subpixel type.
///
/// # Examples
///
/// ```
/// use image::{DynamicImage, RgbImage};
/// use obbtile_core::im::TileImage;
///
/// let dynamic = DynamicImage::ImageRgb8(RgbImage::new(10, 10));
/// let image = TileImage::new_from_default(dynamic).unwrap();
///
/// assert_eq!(image.channels(), 3);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub enum TileImage {
    U8(TileBuffer<u8>),
    U16(TileBuffer<u16>),
    F32(TileBuffer<f32>),
}

// >>> I/O METHODS

impl TileImage {
    /// Open an image from a provided path
    ///
    /// ```no_run
    /// use obbtile_core::im::TileImage;
    /// let image = TileImage::open("P0001.png");
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<TileImage, TileError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                let image = open_dynamic(&path).map_err(|_| TileError::ImageReadError)?;
                return Self::new_from_default(image);
            }
        }

        Err(TileError::ImageExtensionError)
    }

    /// Read the width and height of an image without decoding its pixels
    pub fn dimensions<P: AsRef<Path>>(path: P) -> Result<(u32, u32), TileError> {
        image::image_dimensions(path).map_err(|_| TileError::ImageReadError)
    }

    /// Initialize a new image from a DynamicImage
    pub fn new_from_default(image: DynamicImage) -> Result<TileImage, TileError> {
        let width = image.width();
        let height = image.height();

        match image {
            DynamicImage::ImageLuma8(buffer) => Ok(TileImage::U8(TileBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA8(buffer) => Ok(TileImage::U8(TileBuffer::new(
                width,
                height,
                1,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageLuma16(buffer) => Ok(TileImage::U16(TileBuffer::new(
                width,
                height,
                1,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageLumaA16(buffer) => Ok(TileImage::U16(TileBuffer::new(
                width,
                height,
                1,
                buffer
                    .into_raw()
                    .chunks_exact(2)
                    .map(|pixel| pixel[0])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb8(buffer) => Ok(TileImage::U8(TileBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba8(buffer) => Ok(TileImage::U8(TileBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb16(buffer) => Ok(TileImage::U16(TileBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba16(buffer) => Ok(TileImage::U16(TileBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            DynamicImage::ImageRgb32F(buffer) => Ok(TileImage::F32(TileBuffer::new(
                width,
                height,
                3,
                buffer.into_raw(),
            )?)),
            DynamicImage::ImageRgba32F(buffer) => Ok(TileImage::F32(TileBuffer::new(
                width,
                height,
                3,
                buffer
                    .into_raw()
                    .chunks_exact(4)
                    .flat_map(|pixel| [pixel[0], pixel[1], pixel[2]])
                    .collect(),
            )?)),
            _ => Err(TileError::ImageError(
                "A dynamic image with a valid data type was not detected.",
            )),
        }
    }

    /// Save image with the format selected by the path extension
    ///
    /// ```no_run
    /// use obbtile_core::im::TileImage;
    /// let image = TileImage::open("P0001.png").unwrap();
    /// image.save("P0001.npy").unwrap();
    /// ```
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .map(|s| s.to_lowercase());

        if let Some(ext) = extension {
            if ext == "npy" {
                return self.save_as_numpy(path);
            }

            if constant::IMAGE_DYNAMIC_FORMATS.iter().any(|e| e == &ext) {
                return self.save_as_default(path);
            }
        }

        Err(TileError::ImageExtensionError)
    }

    /// Save image through the image crate encoders
    pub fn save_as_default<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        match (self, self.channels()) {
            (TileImage::U8(buffer), 1) => {
                ImageBuffer::<Luma<u8>, &[u8]>::from_raw(
                    buffer.width(),
                    buffer.height(),
                    buffer.as_raw(),
                )
                .ok_or(TileError::ImageWriteError)?
                .save(path)
                .map_err(|_| TileError::ImageWriteError)
            }
            (TileImage::U16(buffer), 1) => {
                ImageBuffer::<Luma<u16>, &[u16]>::from_raw(
                    buffer.width(),
                    buffer.height(),
                    buffer.as_raw(),
                )
                .ok_or(TileError::ImageWriteError)?
                .save(path)
                .map_err(|_| TileError::ImageWriteError)
            }
            (TileImage::U8(buffer), 3) => {
                ImageBuffer::<Rgb<u8>, &[u8]>::from_raw(
                    buffer.width(),
                    buffer.height(),
                    buffer.as_raw(),
                )
                .ok_or(TileError::ImageWriteError)?
                .save(path)
                .map_err(|_| TileError::ImageWriteError)
            }
            (TileImage::U16(buffer), 3) => {
                ImageBuffer::<Rgb<u16>, &[u16]>::from_raw(
                    buffer.width(),
                    buffer.height(),
                    buffer.as_raw(),
                )
                .ok_or(TileError::ImageWriteError)?
                .save(path)
                .map_err(|_| TileError::ImageWriteError)
            }
            (TileImage::F32(buffer), 3) => {
                let rgb = ImageBuffer::<Rgb<f32>, Vec<f32>>::from_raw(
                    buffer.width(),
                    buffer.height(),
                    buffer.as_raw().to_vec(),
                )
                .ok_or(TileError::ImageWriteError)?;

                DynamicImage::ImageRgb32F(rgb)
                    .save(path)
                    .map_err(|_| TileError::ImageWriteError)
            }
            _ => Err(TileError::ImageError(
                "Only 1 or 3 channel images can be saved as a default image format (e.g. png).",
            )),
        }
    }

    /// Save image as a (height, width, channels) numpy array
    pub fn save_as_numpy<P: AsRef<Path>>(&self, path: P) -> Result<(), TileError> {
        let shape = [
            self.height() as u64,
            self.width() as u64,
            self.channels() as u64,
        ];

        match self {
            TileImage::U8(buffer) => write_numpy(path, buffer.as_raw(), &shape),
            TileImage::U16(buffer) => write_numpy(path, buffer.as_raw(), &shape),
            TileImage::F32(buffer) => write_numpy(path, buffer.as_raw(), &shape),
        }
    }
}

// <<< I/O METHODS

// >>> PROPERTY METHODS

impl_enum_dispatch!(TileImage, U8, U16, F32; width(&self) -> u32);
impl_enum_dispatch!(TileImage, U8, U16, F32; height(&self) -> u32);
impl_enum_dispatch!(TileImage, U8, U16, F32; channels(&self) -> u32);
impl_enum_dispatch!(TileImage, U8, U16, F32; len(&self) -> usize);
impl_enum_dispatch!(TileImage, U8, U16, F32; is_empty(&self) -> bool);

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl TileImage {
    /// Cut a window from the image, padding or clipping where it overhangs
    ///
    /// # Arguments
    ///
    /// * `window` - Crop window in pixel coordinates
    /// * `padding` - Fill value for each channel
    /// * `no_padding` - Clip the window rather than pad it
    pub fn crop_padded(
        &self,
        window: &Window,
        padding: &[f64],
        no_padding: bool,
    ) -> Result<TileImage, TileError> {
        match self {
            TileImage::U8(buffer) => Ok(TileImage::U8(
                buffer.crop_padded(window, padding, no_padding)?,
            )),
            TileImage::U16(buffer) => Ok(TileImage::U16(
                buffer.crop_padded(window, padding, no_padding)?,
            )),
            TileImage::F32(buffer) => Ok(TileImage::F32(
                buffer.crop_padded(window, padding, no_padding)?,
            )),
        }
    }
}

// <<< TRANSFORM METHODS
