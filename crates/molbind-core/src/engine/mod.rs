//! # Engine Module
//!
//! The logic between the alignment-side inputs and the viewer-side command streams.
//!
//! ## Overview
//!
//! The engine decides which residues end up in which viewer command. It finds the columns
//! on which structures can be superposed, groups mapped residues by colour or feature
//! value, and sends finished command batches through a caller-supplied transport.
//!
//! ## Architecture
//!
//! - **Matching** ([`superposition`]) - Column intersection across structures and per-structure residue records
//! - **Grouping** ([`grouping`]) - Colour and feature-value grouping into range models
//! - **Transport** ([`transport`]) - The `ViewerTransport` seam, port announcement parsing and batch dispatch
//! - **Configuration** ([`config`]) - Timeouts and thresholds with a validating builder
//! - **Progress Monitoring** ([`progress`]) - Callback-based dispatch progress
//! - **Error Handling** ([`error`]) - Workflow-level error type

pub mod config;
pub mod error;
pub mod grouping;
pub mod progress;
pub mod superposition;
pub mod transport;
