pub mod split;
pub mod windows;
