mod config;
mod dota;
mod npy;

pub use config::SplitConfig;

pub use dota::load_dota;
pub use dota::load_dota_single;

pub use npy::write_numpy;
