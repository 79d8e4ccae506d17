use crate::core::alignment::{Alignment, ResidueMapping, StructureRef};
use crate::core::models::ranges::RangeModel;
use tracing::{debug, instrument};

/// Slot value for columns that were not matched.
pub const UNMATCHED_RESIDUE: i32 = 0;

/// Residue numbers of one participating structure at every alignment column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperposeRecord {
    pub structure: StructureRef,
    /// The alignment sequence standing in for this structure.
    pub sequence: usize,
    /// The mapped residue number at each column, or [`UNMATCHED_RESIDUE`].
    pub residue_at_column: Vec<i32>,
}

impl SuperposeRecord {
    fn new(structure: StructureRef, sequence: usize, width: usize) -> Self {
        Self {
            structure,
            sequence,
            residue_at_column: vec![UNMATCHED_RESIDUE; width],
        }
    }

    /// The residues of this structure at the columns still set in `eligible`.
    ///
    /// The eligibility set, not the slot value, decides membership, so a structure
    /// numbered from residue 0 keeps that residue.
    pub fn selection(&self, eligible: &[bool]) -> RangeModel {
        let mut model = RangeModel::new();
        for (column, &residue) in self.residue_at_column.iter().enumerate() {
            if eligible.get(column).copied().unwrap_or(false) {
                model.add_residue(&self.structure.model, residue, &self.structure.chain);
            }
        }
        model
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperpositionResult {
    /// Index into `records` of the structure the others are fitted onto.
    pub reference: usize,
    pub records: Vec<SuperposeRecord>,
}

impl SuperpositionResult {
    pub fn reference_record(&self) -> Option<&SuperposeRecord> {
        self.records.get(self.reference)
    }

    pub fn moving_records(&self) -> impl Iterator<Item = (usize, &SuperposeRecord)> {
        self.records
            .iter()
            .enumerate()
            .filter(move |(index, _)| *index != self.reference)
    }
}

/// Narrows an eligibility set to the columns where every structure has a residue.
pub struct SuperpositionMatcher<'a, A, M> {
    alignment: &'a A,
    mapping: &'a M,
}

impl<'a, A: Alignment, M: ResidueMapping> SuperpositionMatcher<'a, A, M> {
    pub fn new(alignment: &'a A, mapping: &'a M) -> Self {
        Self { alignment, mapping }
    }

    /// Clears every set column of `eligible` that is gapped in, or unmapped for, any
    /// participating structure, and records residue numbers at the columns that survive.
    ///
    /// `structures[i]` is the structure sequence `i` is bound to, if any. A structure
    /// (identified by its model id) takes part once, through the first sequence bound to
    /// it; further chains of the same model are ignored. Records follow the order in which
    /// structures first appear. A missing mapping never aborts the scan; it only makes that
    /// column unusable.
    #[instrument(skip_all, name = "superposition_matcher")]
    pub fn match_columns(
        &self,
        structures: &[Option<StructureRef>],
        eligible: &mut [bool],
    ) -> SuperpositionResult {
        let width = eligible.len();
        let mut records: Vec<SuperposeRecord> = Vec::new();
        for (sequence, structure) in structures.iter().enumerate() {
            let Some(structure) = structure else { continue };
            if records.iter().all(|r| r.structure.model != structure.model) {
                records.push(SuperposeRecord::new(structure.clone(), sequence, width));
            }
        }

        for column in 0..width {
            if !eligible[column] {
                continue;
            }
            if records
                .iter()
                .any(|r| self.alignment.is_gap(r.sequence, column))
            {
                eligible[column] = false;
                continue;
            }
            let residues: Option<Vec<i32>> = records
                .iter()
                .map(|r| {
                    self.mapping
                        .structure_residue(r.sequence, column)
                        .map(|location| location.residue)
                })
                .collect();
            match residues {
                Some(residues) => {
                    for (record, residue) in records.iter_mut().zip(residues) {
                        record.residue_at_column[column] = residue;
                    }
                }
                None => eligible[column] = false,
            }
        }

        debug!(
            num_structures = records.len(),
            num_columns = eligible.iter().filter(|&&e| e).count(),
            "Superposable columns determined."
        );

        SuperpositionResult {
            reference: select_reference(&records),
            records,
        }
    }
}

/// The reference is always the first supplied structure; coverage is not ranked.
fn select_reference(_records: &[SuperposeRecord]) -> usize {
    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::sequences::{ChainBinding, SequenceAlignment, SequentialMapping};

    /// Four sequences over three structures: model 0 carries chains A and B.
    fn three_structures() -> (SequenceAlignment, SequentialMapping, Vec<Option<StructureRef>>) {
        let alignment =
            SequenceAlignment::from_rows(&["-VPSQK", "EIVKF-", "MK-KLQ", "SPK-AV"]);
        let layout = [("0", "A", 97), ("0", "B", 1), ("1", "B", 1), ("2", "A", 7)];
        let bindings: Vec<_> = layout
            .iter()
            .map(|&(model, chain, first)| Some(ChainBinding::new(model, chain, first)))
            .collect();
        let mapping = SequentialMapping::new(&alignment, &bindings);
        let structures = layout
            .iter()
            .map(|&(model, chain, _)| Some(StructureRef::protein(model, chain)))
            .collect();
        (alignment, mapping, structures)
    }

    fn set_columns(eligible: &[bool]) -> Vec<usize> {
        (0..eligible.len()).filter(|&c| eligible[c]).collect()
    }

    #[test]
    fn gapped_columns_are_intersected_out() {
        let (alignment, mapping, structures) = three_structures();
        let mut eligible = vec![true; 6];

        let result = SuperpositionMatcher::new(&alignment, &mapping)
            .match_columns(&structures, &mut eligible);

        assert_eq!(set_columns(&eligible), vec![1, 4, 5]);
        assert_eq!(result.reference, 0);
        assert_eq!(result.records.len(), 3);
        assert_eq!(
            result.records.iter().map(|r| r.sequence).collect::<Vec<_>>(),
            vec![0, 2, 3]
        );
        assert_eq!(result.records[0].residue_at_column, vec![0, 97, 0, 0, 100, 101]);
        assert_eq!(result.records[1].residue_at_column, vec![0, 2, 0, 0, 4, 5]);
        assert_eq!(result.records[2].residue_at_column, vec![0, 8, 0, 0, 10, 11]);
    }

    #[test]
    fn pre_cleared_columns_stay_cleared_and_unrecorded() {
        let (alignment, mapping, structures) = three_structures();
        let mut eligible = vec![true, true, true, true, false, true];

        let result = SuperpositionMatcher::new(&alignment, &mapping)
            .match_columns(&structures, &mut eligible);

        assert_eq!(set_columns(&eligible), vec![1, 5]);
        assert!(
            result
                .records
                .iter()
                .all(|r| r.residue_at_column[4] == UNMATCHED_RESIDUE)
        );
    }

    #[test]
    fn missing_mapping_clears_the_column_without_aborting() {
        let alignment = SequenceAlignment::from_rows(&["ABCD", "ABCD"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[
                Some(ChainBinding::new("1", "A", 10)),
                Some(ChainBinding::new("2", "A", 20).with_unmapped([21])),
            ],
        );
        let structures = vec![
            Some(StructureRef::protein("1", "A")),
            Some(StructureRef::protein("2", "A")),
        ];
        let mut eligible = vec![true; 4];

        let result = SuperpositionMatcher::new(&alignment, &mapping)
            .match_columns(&structures, &mut eligible);

        assert_eq!(set_columns(&eligible), vec![0, 2, 3]);
        assert_eq!(result.records[1].residue_at_column, vec![20, 0, 22, 23]);
    }

    #[test]
    fn unbound_sequences_do_not_take_part() {
        let alignment = SequenceAlignment::from_rows(&["ABCD", "----", "ABCD"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[
                Some(ChainBinding::new("1", "A", 1)),
                None,
                Some(ChainBinding::new("2", "A", 1)),
            ],
        );
        let structures = vec![
            Some(StructureRef::protein("1", "A")),
            None,
            Some(StructureRef::protein("2", "A")),
        ];
        let mut eligible = vec![true; 4];

        SuperpositionMatcher::new(&alignment, &mapping).match_columns(&structures, &mut eligible);

        assert_eq!(set_columns(&eligible), vec![0, 1, 2, 3]);
    }

    #[test]
    fn reference_is_first_structure_regardless_of_coverage() {
        let alignment = SequenceAlignment::from_rows(&["A---", "ABCD", "ABCD"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[
                Some(ChainBinding::new("0", "A", 1)),
                Some(ChainBinding::new("1", "A", 1)),
                Some(ChainBinding::new("2", "A", 1)),
            ],
        );
        let structures: Vec<_> = (0..3)
            .map(|i| Some(StructureRef::protein(i.to_string(), "A")))
            .collect();
        let mut eligible = vec![true; 4];

        let result = SuperpositionMatcher::new(&alignment, &mapping)
            .match_columns(&structures, &mut eligible);

        assert_eq!(result.reference, 0);
        assert_eq!(
            result.moving_records().map(|(i, _)| i).collect::<Vec<_>>(),
            vec![1, 2]
        );
    }

    #[test]
    fn selection_follows_eligible_columns() {
        let (alignment, mapping, structures) = three_structures();
        let mut eligible = vec![true; 6];
        let result = SuperpositionMatcher::new(&alignment, &mapping)
            .match_columns(&structures, &mut eligible);

        let selection = result.records[0].selection(&eligible);
        let ranges = selection.ranges("0", "A");
        assert_eq!(ranges.len(), 2);
        assert_eq!((ranges[0].start, ranges[0].end), (97, 97));
        assert_eq!((ranges[1].start, ranges[1].end), (100, 101));
    }
}
