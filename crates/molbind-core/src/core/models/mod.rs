//! # Core Models Module
//!
//! Value types shared by every layer of molbind.
//!
//! ## Key Components
//!
//! - [`ranges`] - [`ranges::RangeModel`], the compacted `(model, chain, residue range)` selection
//! - [`colour`] - RGB colours with the textual forms the viewers understand
//! - [`command`] - Viewer commands as a verb plus ordered parameters
//! - [`groups`] - Selections keyed by colour or feature value, in first-seen order
//! - [`feature`] - Keys for grouping residues by annotation value

pub mod colour;
pub mod command;
pub mod feature;
pub mod groups;
pub mod ranges;
