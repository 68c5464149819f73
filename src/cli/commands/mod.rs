//! CLI command modules

pub mod check;
pub mod defaults;
pub mod export;
pub mod fmt;
pub mod info;
pub mod init;
pub mod stats;
pub mod validate_data;
