mod annotation;
mod buffer;
mod image;

pub use buffer::TileBuffer;
pub use image::TileImage;

pub use annotation::Annotation;
pub use annotation::Gsd;
pub use annotation::ImageInfo;
pub use annotation::{parse_dota, read_dota_txt, write_dota_txt};
