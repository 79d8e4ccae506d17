use crate::core::alignment::{
    Alignment, FeatureSource, HiddenColumns, ResidueLocation, ResidueMapping, SequenceRenderer,
};
use crate::core::models::colour::Colour;
use crate::core::models::groups::{ColourGroups, FeatureGroups};
use tracing::{debug, instrument};

/// Groups the mapped residues of every sequence by the colour they are drawn in, or by the
/// feature values they carry.
pub struct ColourGrouper<'a, A, M> {
    alignment: &'a A,
    mapping: &'a M,
}

impl<'a, A: Alignment, M: ResidueMapping> ColourGrouper<'a, A, M> {
    pub fn new(alignment: &'a A, mapping: &'a M) -> Self {
        Self { alignment, mapping }
    }

    /// Every `(sequence, column, location)` whose column holds a real residue with
    /// structure coordinates, sequence by sequence, column by column.
    fn mapped_residues(&self) -> impl Iterator<Item = (usize, usize, ResidueLocation)> + '_ {
        let width = self.alignment.width();
        (0..self.alignment.sequence_count()).flat_map(move |sequence| {
            (0..width).filter_map(move |column| {
                if self.alignment.is_gap(sequence, column) {
                    return None;
                }
                self.mapping
                    .structure_residue(sequence, column)
                    .map(|location| (sequence, column, location))
            })
        })
    }

    /// Residues in hidden columns are grouped under [`Colour::GREY_HIDDEN`] whatever their
    /// rendered colour.
    #[instrument(skip_all, name = "group_by_colour")]
    pub fn group_by_colour<R, H>(&self, renderer: &R, hidden: &H) -> ColourGroups
    where
        R: SequenceRenderer,
        H: HiddenColumns,
    {
        let mut groups = ColourGroups::new();
        for (sequence, column, location) in self.mapped_residues() {
            let colour = if hidden.is_hidden(column) {
                Colour::GREY_HIDDEN
            } else {
                renderer.colour_at(sequence, column)
            };
            groups.add_range(
                colour,
                &location.model,
                location.residue,
                location.residue,
                &location.chain,
            );
        }
        debug!(num_colours = groups.len(), "Residues grouped by colour.");
        groups
    }

    #[instrument(skip_all, name = "group_by_feature")]
    pub fn group_by_feature<F: FeatureSource>(&self, features: &F) -> FeatureGroups {
        let mut groups = FeatureGroups::new();
        for (sequence, column, location) in self.mapped_residues() {
            for key in features.features_at(sequence, column) {
                groups.add_range(
                    key,
                    &location.model,
                    location.residue,
                    location.residue,
                    &location.chain,
                );
            }
        }
        debug!(num_values = groups.len(), "Residues grouped by feature value.");
        groups
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::NoHiddenColumns;
    use crate::core::alignment::schemes::{ResidueColourScheme, SchemeRenderer};
    use crate::core::alignment::sequences::{ChainBinding, SequenceAlignment, SequentialMapping};
    use crate::core::io::colours::ColourTable;
    use crate::core::io::features::{FeatureSpan, FeatureTable};
    use crate::core::models::feature::FeatureKey;
    use std::collections::BTreeSet;

    fn spans(groups: &ColourGroups, colour: Colour, model: &str, chain: &str) -> Vec<(i32, i32)> {
        groups
            .get(&colour)
            .map(|m| m.ranges(model, chain).iter().map(|r| (r.start, r.end)).collect())
            .unwrap_or_default()
    }

    #[test]
    fn colours_group_in_first_seen_order_across_structures() {
        let alignment = SequenceAlignment::from_rows(&["DDEEC", "-CDDE"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[
                Some(ChainBinding::new("0", "A", 1)),
                Some(ChainBinding::new("1", "B", 10)),
            ],
        );
        let renderer = SchemeRenderer::new(&alignment, ResidueColourScheme::Zappo);

        let groups = ColourGrouper::new(&alignment, &mapping)
            .group_by_colour(&renderer, &NoHiddenColumns);

        let red = Colour::rgb(255, 0, 0);
        let yellow = Colour::rgb(255, 255, 0);
        assert_eq!(groups.keys().copied().collect::<Vec<_>>(), vec![red, yellow]);
        assert_eq!(spans(&groups, red, "0", "A"), vec![(1, 4)]);
        assert_eq!(spans(&groups, red, "1", "B"), vec![(11, 13)]);
        assert_eq!(spans(&groups, yellow, "0", "A"), vec![(5, 5)]);
        assert_eq!(spans(&groups, yellow, "1", "B"), vec![(10, 10)]);
    }

    #[test]
    fn hidden_columns_are_grouped_under_the_grey_sentinel() {
        let alignment = SequenceAlignment::from_rows(&["ACDE"]);
        let mapping = SequentialMapping::new(&alignment, &[Some(ChainBinding::new("0", "A", 1))]);
        let mut table = ColourTable::new(Colour::rgb(0, 0, 255));
        table.set(0, 1, Colour::rgb(255, 0, 0));
        let hidden: BTreeSet<usize> = [1, 2].into_iter().collect();

        let groups = ColourGrouper::new(&alignment, &mapping).group_by_colour(&table, &hidden);

        assert_eq!(
            groups.keys().copied().collect::<Vec<_>>(),
            vec![Colour::rgb(0, 0, 255), Colour::GREY_HIDDEN]
        );
        assert_eq!(spans(&groups, Colour::GREY_HIDDEN, "0", "A"), vec![(2, 3)]);
        assert_eq!(
            spans(&groups, Colour::rgb(0, 0, 255), "0", "A"),
            vec![(1, 1), (4, 4)]
        );
        assert!(groups.get(&Colour::rgb(255, 0, 0)).is_none());
    }

    #[test]
    fn unmapped_residues_are_silently_skipped() {
        let alignment = SequenceAlignment::from_rows(&["AAAA", "AAAA"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[Some(ChainBinding::new("0", "A", 1).with_unmapped([2])), None],
        );
        let renderer = SchemeRenderer::new(&alignment, ResidueColourScheme::Zappo);

        let groups = ColourGrouper::new(&alignment, &mapping)
            .group_by_colour(&renderer, &NoHiddenColumns);

        assert_eq!(groups.len(), 1);
        assert_eq!(
            spans(&groups, Colour::rgb(255, 175, 175), "0", "A"),
            vec![(1, 1), (3, 4)]
        );
    }

    #[test]
    fn features_group_by_type_and_value() {
        let alignment = SequenceAlignment::from_rows(&["ACDEFG"]);
        let mapping = SequentialMapping::new(&alignment, &[Some(ChainBinding::new("3", "C", 20))]);
        let mut features = FeatureTable::new();
        features.push(FeatureSpan {
            sequence: 0,
            start: 0,
            end: 1,
            key: FeatureKey::new("metal", "zinc"),
        });
        features.push(FeatureSpan {
            sequence: 0,
            start: 4,
            end: 5,
            key: FeatureKey::new("metal", "zinc"),
        });
        features.push(FeatureSpan {
            sequence: 0,
            start: 1,
            end: 2,
            key: FeatureKey::new("metal", "iron"),
        });

        let groups = ColourGrouper::new(&alignment, &mapping).group_by_feature(&features);

        assert_eq!(
            groups.keys().cloned().collect::<Vec<_>>(),
            vec![FeatureKey::new("metal", "zinc"), FeatureKey::new("metal", "iron")]
        );
        let zinc = groups.get(&FeatureKey::new("metal", "zinc")).unwrap();
        let zinc_spans: Vec<_> = zinc.ranges("3", "C").iter().map(|r| (r.start, r.end)).collect();
        assert_eq!(zinc_spans, vec![(20, 21), (24, 25)]);
    }
}
