//! # Alignment Capabilities
//!
//! The read-only views of an alignment that the binding layer consumes. Nothing in molbind
//! parses alignment or structure files; callers provide these capabilities, either through
//! their own types or through the in-memory implementations in [`sequences`] and [`schemes`].
//!
//! ## Capabilities
//!
//! - [`Alignment`] - Column count, characters and gap tests
//! - [`SequenceRenderer`] - The colour a residue is currently drawn in
//! - [`ResidueMapping`] - Where an aligned residue sits in a loaded structure
//! - [`HiddenColumns`] - Columns the user has collapsed out of view
//! - [`FeatureSource`] - Annotations covering an aligned residue

pub mod schemes;
pub mod sequences;

use crate::core::models::colour::Colour;
use crate::core::models::feature::FeatureKey;
use std::collections::{BTreeSet, HashSet};

/// Returns `true` for the characters treated as alignment gaps.
#[inline]
pub fn is_gap_char(c: char) -> bool {
    matches!(c, '-' | '.' | ' ')
}

pub trait Alignment {
    /// Number of columns.
    fn width(&self) -> usize;

    fn sequence_count(&self) -> usize;

    /// The character of `sequence` at `column`, or `None` past the end of that sequence.
    fn char_at(&self, sequence: usize, column: usize) -> Option<char>;

    /// Columns beyond the end of a sequence count as gaps.
    fn is_gap(&self, sequence: usize, column: usize) -> bool {
        self.char_at(sequence, column).is_none_or(is_gap_char)
    }
}

pub trait SequenceRenderer {
    fn colour_at(&self, sequence: usize, column: usize) -> Colour;
}

/// Location of a residue inside a loaded structure.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ResidueLocation {
    pub model: String,
    pub chain: String,
    pub residue: i32,
}

impl ResidueLocation {
    pub fn new(model: impl Into<String>, chain: impl Into<String>, residue: i32) -> Self {
        Self {
            model: model.into(),
            chain: chain.into(),
            residue,
        }
    }
}

pub trait ResidueMapping {
    /// The structure residue aligned at `(sequence, column)`, or `None` when the column is
    /// a gap or the residue has no coordinates.
    fn structure_residue(&self, sequence: usize, column: usize) -> Option<ResidueLocation>;
}

pub trait HiddenColumns {
    fn is_hidden(&self, column: usize) -> bool;
}

/// Every column visible.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoHiddenColumns;

impl HiddenColumns for NoHiddenColumns {
    fn is_hidden(&self, _column: usize) -> bool {
        false
    }
}

impl HiddenColumns for BTreeSet<usize> {
    fn is_hidden(&self, column: usize) -> bool {
        self.contains(&column)
    }
}

impl HiddenColumns for HashSet<usize> {
    fn is_hidden(&self, column: usize) -> bool {
        self.contains(&column)
    }
}

pub trait FeatureSource {
    /// Annotations covering the residue at `(sequence, column)`, in a stable order.
    fn features_at(&self, sequence: usize, column: usize) -> Vec<FeatureKey>;
}

/// The structure a sequence is bound to, as needed for superposition.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StructureRef {
    pub model: String,
    pub chain: String,
    /// Nucleic acid chains are fitted on phosphates rather than alpha carbons.
    pub nucleotide: bool,
}

impl StructureRef {
    pub fn protein(model: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            chain: chain.into(),
            nucleotide: false,
        }
    }

    pub fn nucleotide(model: impl Into<String>, chain: impl Into<String>) -> Self {
        Self {
            model: model.into(),
            chain: chain.into(),
            nucleotide: true,
        }
    }
}
