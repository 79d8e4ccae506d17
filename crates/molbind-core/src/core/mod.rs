//! # Core Module
//!
//! The stateless foundation of molbind: value types, the capabilities through which an
//! alignment is read, table loaders and the viewer command backends.
//!
//! ## Architecture
//!
//! - **Data Models** ([`models`]) - Colours, commands, range selections and their groupings
//! - **Alignment Capabilities** ([`alignment`]) - Traits for reading characters, colours,
//!   structure mappings, hidden columns and features, with in-memory implementations
//! - **Input/Output** ([`io`]) - CSV colour and feature tables, TOML colour schemes
//! - **Viewer Backends** ([`viewers`]) - Shared formatting plus the PyMOL and Chimera grammars
//!
//! Everything here is synchronous and free of shared state; selections are built per
//! request and dropped once their commands have been generated.

pub mod alignment;
pub mod io;
pub mod models;
pub mod viewers;
