pub mod assign;
pub mod split;
pub mod window;

pub use assign::{WindowAnnotation, assign};
pub use split::{
    OutputDirs, Progress, SplitOptions, create_output_dirs, patch_name, split_all, split_one,
};
pub use window::{Window, generate_windows, validate_pairs};
