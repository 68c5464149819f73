//! Configuration management for listdsl

pub mod config;
pub mod output;
pub mod validation;

#[cfg(test)]
mod tests;

pub use config::Config;
pub use output::{OutputConfig, OutputFormat};
pub use validation::ValidationConfig;
