// Copyright (c) 2025, Tom Ouellette
// Licensed under the MIT License

//! Sliding-window tiling of large aerial images with oriented bounding box
//! annotations.

pub mod constant;
pub mod cv;
pub mod error;
pub mod im;
pub mod io;
pub mod sp;
pub mod ut;
