use super::{Alignment, ResidueLocation, ResidueMapping, is_gap_char};
use std::collections::BTreeSet;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlignedSequence {
    pub name: String,
    residues: Vec<char>,
}

impl AlignedSequence {
    pub fn new(name: impl Into<String>, residues: &str) -> Self {
        Self {
            name: name.into(),
            residues: residues.chars().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.residues.len()
    }

    pub fn is_empty(&self) -> bool {
        self.residues.is_empty()
    }

    pub fn char_at(&self, column: usize) -> Option<char> {
        self.residues.get(column).copied()
    }
}

/// An in-memory alignment. Sequences shorter than the widest one are treated as
/// gap-padded on the right.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceAlignment {
    sequences: Vec<AlignedSequence>,
    width: usize,
}

impl SequenceAlignment {
    pub fn new(sequences: Vec<AlignedSequence>) -> Self {
        let width = sequences.iter().map(AlignedSequence::len).max().unwrap_or(0);
        Self { sequences, width }
    }

    /// Builds an alignment of anonymous sequences, named by their index.
    pub fn from_rows<S: AsRef<str>>(rows: &[S]) -> Self {
        Self::new(
            rows.iter()
                .enumerate()
                .map(|(i, row)| AlignedSequence::new(i.to_string(), row.as_ref()))
                .collect(),
        )
    }

    pub fn sequences(&self) -> &[AlignedSequence] {
        &self.sequences
    }

    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.sequences.iter().position(|s| s.name == name)
    }
}

impl Alignment for SequenceAlignment {
    fn width(&self) -> usize {
        self.width
    }

    fn sequence_count(&self) -> usize {
        self.sequences.len()
    }

    fn char_at(&self, sequence: usize, column: usize) -> Option<char> {
        self.sequences.get(sequence)?.char_at(column)
    }
}

/// How one aligned sequence maps onto a chain of a loaded structure: its ungapped
/// residues are numbered consecutively from `first_residue`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChainBinding {
    pub model: String,
    pub chain: String,
    pub first_residue: i32,
    /// Residue numbers that exist in the sequence but have no coordinates.
    pub unmapped: BTreeSet<i32>,
}

impl ChainBinding {
    pub fn new(model: impl Into<String>, chain: impl Into<String>, first_residue: i32) -> Self {
        Self {
            model: model.into(),
            chain: chain.into(),
            first_residue,
            unmapped: BTreeSet::new(),
        }
    }

    /// The number given to the `count`-th residue, or `None` if numbering would overflow.
    pub fn last_residue(&self, count: usize) -> Option<i32> {
        let offset = i32::try_from(count.checked_sub(1)?).ok()?;
        self.first_residue.checked_add(offset)
    }

    pub fn with_unmapped(mut self, residues: impl IntoIterator<Item = i32>) -> Self {
        self.unmapped.extend(residues);
        self
    }
}

/// A [`ResidueMapping`] precomputed from per-sequence [`ChainBinding`]s.
///
/// Sequences without a binding are left entirely unmapped.
#[derive(Debug, Clone, Default)]
pub struct SequentialMapping {
    columns: Vec<Vec<Option<ResidueLocation>>>,
}

impl SequentialMapping {
    pub fn new<A: Alignment>(alignment: &A, bindings: &[Option<ChainBinding>]) -> Self {
        let columns = (0..alignment.sequence_count())
            .map(|sequence| match bindings.get(sequence).and_then(Option::as_ref) {
                Some(binding) => Self::map_sequence(alignment, sequence, binding),
                None => vec![None; alignment.width()],
            })
            .collect();
        Self { columns }
    }

    fn map_sequence<A: Alignment>(
        alignment: &A,
        sequence: usize,
        binding: &ChainBinding,
    ) -> Vec<Option<ResidueLocation>> {
        let mut next_residue = Some(binding.first_residue);
        (0..alignment.width())
            .map(|column| match alignment.char_at(sequence, column) {
                Some(c) if !is_gap_char(c) => {
                    // Residues numbered past i32::MAX have no structure counterpart.
                    let residue = next_residue?;
                    next_residue = residue.checked_add(1);
                    (!binding.unmapped.contains(&residue)).then(|| {
                        ResidueLocation::new(&binding.model, &binding.chain, residue)
                    })
                }
                _ => None,
            })
            .collect()
    }
}

impl ResidueMapping for SequentialMapping {
    fn structure_residue(&self, sequence: usize, column: usize) -> Option<ResidueLocation> {
        self.columns.get(sequence)?.get(column)?.clone()
    }
}
