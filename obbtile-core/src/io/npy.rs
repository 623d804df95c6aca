// Copyright (c) 2025, Tom Ouellette
// Licensed under the BSD 3-Clause License

use std::path::Path;

use npyz::{self, WriterBuilder};

use crate::error::TileError;

/// Write a numpy file from a vector of specified shape
///
/// # Arguments
///
/// * `path` - Path to output numpy file
/// * `data` - Vector of numeric type
/// * `shape` - Shape of the vector (shape product must equal length of data)
pub fn write_numpy<T, P: AsRef<Path>>(path: P, data: &[T], shape: &[u64]) -> Result<(), TileError>
where
    T: npyz::Serialize + npyz::AutoSerialize,
{
    if shape.iter().product::<u64>() != data.len() as u64 {
        return Err(TileError::ImageError(
            "Numpy shape does not match the number of values.",
        ));
    }

    let mut buffer = vec![];
    let mut writer = npyz::WriteOptions::<T>::new()
        .default_dtype()
        .shape(shape)
        .writer(&mut buffer)
        .begin_nd()
        .map_err(|_| TileError::ImageWriteError)?;

    for d in data {
        writer.push(d).map_err(|_| TileError::ImageWriteError)?;
    }

    writer.finish().map_err(|_| TileError::ImageWriteError)?;
    std::fs::write(path, buffer).map_err(|_| TileError::ImageWriteError)?;
    Ok(())
}
