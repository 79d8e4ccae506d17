//! # Table I/O
//!
//! Loaders for the tabular inputs that drive colouring and attribute commands: per-cell
//! colour tables and feature tables (CSV), and user residue colour schemes (TOML).

pub mod colours;
pub mod features;
pub mod scheme;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableLoadError {
    #[error("File I/O error for '{path}': {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },
    #[error("CSV parsing error for '{path}': {source}")]
    Csv { path: String, source: csv::Error },
    #[error("TOML parsing error for '{path}': {source}")]
    Toml {
        path: String,
        source: toml::de::Error,
    },
    #[error("Invalid record in '{path}': {message}")]
    InvalidRecord { path: String, message: String },
}
