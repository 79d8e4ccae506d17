//! # Workflows Module
//!
//! Complete requests against a structure viewer, from alignment-side inputs to ordered
//! command batches.
//!
//! ## Overview
//!
//! Each workflow validates its inputs, runs the matching or grouping engine, and renders
//! the outcome through the selected viewer backend. The resulting [`CommandBatch`]es can be
//! written to a script with [`StructureCommands::to_script`] or handed to
//! [`dispatch_commands`] together with a transport and a session.
//!
//! ## Architecture
//!
//! - **Superposition** ([`superpose`]) - Fit every bound structure onto the first one
//! - **Colouring** ([`colour`]) - Colour residues as the alignment draws them, or by chain or charge
//! - **Attributes** ([`attributes`]) - Push feature annotations onto residues as named attributes
//!
//! [`CommandBatch`]: crate::core::models::command::CommandBatch
//! [`StructureCommands::to_script`]: crate::core::viewers::StructureCommands::to_script
//! [`dispatch_commands`]: crate::engine::transport::dispatch_commands

pub mod attributes;
pub mod colour;
pub mod superpose;
