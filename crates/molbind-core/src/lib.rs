//! # molbind Core Library
//!
//! The structure-viewer binding layer of an alignment workbench: it compacts per-residue
//! selections into minimal range specifications, finds the alignment columns usable for
//! superposing several structures, groups residues by colour or feature value, and turns
//! the result into command streams for external molecular viewers (PyMOL, Chimera).
//!
//! ## Architectural Philosophy
//!
//! The library keeps the same three layers throughout:
//!
//! - **[`core`]: The Foundation.** Value types (`RangeModel`, `Colour`, `Command`), the
//!   alignment capability traits, table loaders and the viewer grammars.
//!
//! - **[`engine`]: The Logic Core.** The superposition matcher, the colour and feature
//!   grouper, the transport abstraction with batch dispatch, configuration, progress
//!   reporting and error types.
//!
//! - **[`workflows`]: The Public API.** Complete requests (superpose, colour by sequence,
//!   set attributes) that tie `engine` and `core` together and hand back ordered command
//!   batches ready to be written to a script or dispatched to a running viewer.
//!
//! The library never performs network I/O or parses structure files itself; talking to a
//! viewer goes through an implementation of [`engine::transport::ViewerTransport`]
//! supplied by the caller.

pub mod core;
pub mod engine;
pub mod workflows;
