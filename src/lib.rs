pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use config::cli::LocalStorage;
pub use config::toml_config::TomlConfig;

pub use core::{engine::SkaldEngine, pipeline::SkaldPipeline};
pub use utils::error::{Result, SkaldError};
