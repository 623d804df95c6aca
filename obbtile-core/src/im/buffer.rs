// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use num_traits::{FromPrimitive, ToPrimitive};

use crate::error::TileError;
use crate::sp::Window;

/// A row-major container storing an image buffer or grid of pixels.
///
/// The length of the underlying vector must equal `w` * `h` * `c`.
///
/// # Examples
///
/// ```
/// use obbtile_core::im::TileBuffer;
///
/// let buffer = TileBuffer::new(10, 10, 3, vec![0u8; 300]);
/// assert!(buffer.is_ok());
///
/// let buffer = TileBuffer::new(10, 10, 3, vec![0u8; 100]);
/// assert!(buffer.is_err());
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct TileBuffer<T> {
    w: u32,         // Width
    h: u32,         // Height
    c: u32,         // Channels
    buffer: Vec<T>, // Subpixels
}

impl<T> TileBuffer<T>
where
    T: Copy + Default + ToPrimitive + FromPrimitive,
{
    /// Initializes a buffer from row-major subpixels
    ///
    /// # Arguments
    ///
    /// * `width` - Image width
    /// * `height` - Image height
    /// * `channels` - Number of image channels (e.g. 1 for grayscale)
    /// * `buffer` - Subpixels in row-major, channel-last order
    pub fn new(width: u32, height: u32, channels: u32, buffer: Vec<T>) -> Result<Self, TileError> {
        if width as usize * height as usize * channels as usize == buffer.len() {
            Ok(TileBuffer {
                w: width,
                h: height,
                c: channels,
                buffer,
            })
        } else {
            Err(TileError::ImageError(
                "The buffer does not match provided size.",
            ))
        }
    }
}

// >>> PROPERTY METHODS

impl<T> TileBuffer<T>
where
    T: Copy + Default + ToPrimitive + FromPrimitive,
{
    /// Width of the image
    pub fn width(&self) -> u32 {
        self.w
    }

    /// Height of the image
    pub fn height(&self) -> u32 {
        self.h
    }

    /// Number of channels in the image
    pub fn channels(&self) -> u32 {
        self.c
    }

    /// Length of the raw image
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Check if buffer is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a reference to the raw image
    pub fn as_raw(&self) -> &[T] {
        &self.buffer
    }

    /// Returns the raw image
    pub fn into_raw(self) -> Vec<T> {
        self.buffer
    }
}

// <<< PROPERTY METHODS

// >>> TRANSFORM METHODS

impl<T> TileBuffer<T>
where
    T: Copy + Default + ToPrimitive + FromPrimitive,
{
    /// Copy a window of the image into a new buffer
    ///
    /// Parts of the window outside the image are filled with `padding`,
    /// one value per channel; channels beyond the provided values reuse the
    /// last value. With `no_padding` the window is instead clipped to the
    /// image bounds.
    ///
    /// # Arguments
    ///
    /// * `window` - Crop window in pixel coordinates
    /// * `padding` - Fill value for each channel
    /// * `no_padding` - Clip the window rather than pad it
    ///
    /// # Examples
    ///
    /// ```
    /// use obbtile_core::im::TileBuffer;
    /// use obbtile_core::sp::Window;
    ///
    /// let buffer = TileBuffer::new(2, 2, 1, vec![1u8, 2, 3, 4]).unwrap();
    ///
    /// let padded = buffer.crop_padded(&Window::new(1, 1, 3, 3), &[9.], false).unwrap();
    /// assert_eq!(padded.as_raw(), &[4, 9, 9, 9]);
    ///
    /// let clipped = buffer.crop_padded(&Window::new(1, 1, 3, 3), &[9.], true).unwrap();
    /// assert_eq!(clipped.as_raw(), &[4]);
    /// ```
    pub fn crop_padded(
        &self,
        window: &Window,
        padding: &[f64],
        no_padding: bool,
    ) -> Result<TileBuffer<T>, TileError> {
        let copy_w = window.x2.min(self.w).saturating_sub(window.x1) as usize;
        let copy_h = window.y2.min(self.h).saturating_sub(window.y1) as usize;

        let (out_w, out_h) = if no_padding {
            (copy_w, copy_h)
        } else {
            (window.width() as usize, window.height() as usize)
        };

        if out_w == 0 || out_h == 0 {
            return Err(TileError::ImageError("Crop window lies outside of the image."));
        }

        let c = self.c as usize;
        let fill: Vec<T> = (0..c)
            .map(|k| {
                let value = padding.get(k).or(padding.last()).copied().unwrap_or(0.0);
                T::from_f64(value).unwrap_or_default()
            })
            .collect();

        let mut cropped: Vec<T> = Vec::with_capacity(out_w * out_h * c);
        for _ in 0..out_w * out_h {
            cropped.extend_from_slice(&fill);
        }

        let src_w = self.w as usize;
        let (x1, y1) = (window.x1 as usize, window.y1 as usize);

        // A window starting right of the image copies no rows
        let rows = if copy_w == 0 { 0 } else { copy_h };

        for row in 0..rows {
            let src = ((y1 + row) * src_w + x1) * c;
            let dst = row * out_w * c;
            cropped[dst..dst + copy_w * c].copy_from_slice(&self.buffer[src..src + copy_w * c]);
        }

        TileBuffer::new(out_w as u32, out_h as u32, self.c, cropped)
    }
}

// <<< TRANSFORM METHODS

#[cfg(test)]
mod test {

    use super::*;

    fn rgb_3x2() -> TileBuffer<u8> {
        TileBuffer::new(3, 2, 3, (0..18).collect()).unwrap()
    }

    #[test]
    fn test_buffer_properties() {
        let buffer = rgb_3x2();
        assert_eq!(buffer.width(), 3);
        assert_eq!(buffer.height(), 2);
        assert_eq!(buffer.channels(), 3);
        assert_eq!(buffer.len(), 18);
        assert!(!buffer.is_empty());
    }

    #[test]
    fn test_crop_inside() {
        let buffer = rgb_3x2();
        let crop = buffer
            .crop_padded(&Window::new(1, 0, 3, 2), &[0.], false)
            .unwrap();

        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(crop.as_raw(), &[3, 4, 5, 6, 7, 8, 12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn test_crop_padding_per_channel() {
        let buffer = rgb_3x2();
        let crop = buffer
            .crop_padded(&Window::new(2, 1, 4, 3), &[104., 116., 124.], false)
            .unwrap();

        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 2);
        assert_eq!(
            crop.as_raw(),
            &[15, 16, 17, 104, 116, 124, 104, 116, 124, 104, 116, 124]
        );
    }

    #[test]
    fn test_crop_padding_reuses_last_value() {
        let buffer = rgb_3x2();
        let crop = buffer
            .crop_padded(&Window::new(2, 1, 3, 3), &[7.], false)
            .unwrap();

        assert_eq!(crop.as_raw(), &[15, 16, 17, 7, 7, 7]);
    }

    #[test]
    fn test_crop_no_padding_clips() {
        let buffer = rgb_3x2();
        let crop = buffer
            .crop_padded(&Window::new(1, 1, 5, 5), &[0.], true)
            .unwrap();

        assert_eq!(crop.width(), 2);
        assert_eq!(crop.height(), 1);
        assert_eq!(crop.as_raw(), &[12, 13, 14, 15, 16, 17]);
    }

    #[test]
    fn test_crop_outside_fails_without_padding() {
        let buffer = rgb_3x2();
        let crop = buffer.crop_padded(&Window::new(5, 5, 6, 6), &[0.], true);
        assert!(crop.is_err());
    }
}
