use crate::core::alignment::{Alignment, FeatureSource, ResidueMapping};
use crate::core::models::command::CommandBatch;
use crate::core::models::groups::FeatureGroups;
use crate::core::viewers::ViewerKind;
use crate::engine::grouping::ColourGrouper;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct AttributePlan {
    pub groups: FeatureGroups,
    pub batch: CommandBatch,
}

/// Copies sequence feature annotations onto the mapped residues as viewer attributes.
#[instrument(skip_all, name = "attributes_workflow")]
pub fn run<A, M, F>(alignment: &A, mapping: &M, features: &F, viewer: ViewerKind) -> AttributePlan
where
    A: Alignment,
    M: ResidueMapping,
    F: FeatureSource,
{
    let groups = ColourGrouper::new(alignment, mapping).group_by_feature(features);
    let commands = viewer.commands().set_attributes(&groups);
    info!(
        viewer = %viewer,
        num_attributes = commands.len(),
        "Attribute commands generated."
    );
    AttributePlan {
        groups,
        batch: CommandBatch::new("set attributes", commands),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::alignment::sequences::{ChainBinding, SequenceAlignment, SequentialMapping};
    use crate::core::io::features::{FeatureSpan, FeatureTable};
    use crate::core::models::feature::FeatureKey;

    #[test]
    fn each_feature_value_becomes_one_attribute_command() {
        let alignment = SequenceAlignment::from_rows(&["ACDEF", "A-DEF"]);
        let mapping = SequentialMapping::new(
            &alignment,
            &[
                Some(ChainBinding::new("0", "A", 1)),
                Some(ChainBinding::new("1", "A", 1)),
            ],
        );
        let mut features = FeatureTable::new();
        for sequence in 0..2 {
            features.push(FeatureSpan {
                sequence,
                start: 0,
                end: 2,
                key: FeatureKey::new("domain", "SH3"),
            });
        }
        features.push(FeatureSpan {
            sequence: 0,
            start: 4,
            end: 4,
            key: FeatureKey::from_annotation("kd", None, Some(1.5)),
        });

        let plan = run(&alignment, &mapping, &features, ViewerKind::Chimera);

        let lines: Vec<String> = plan.batch.commands.iter().map(|c| c.to_string()).collect();
        assert_eq!(
            lines,
            vec![
                "setattr res mb_domain 'SH3' #0:1-3.A|#1:1-2.A",
                "setattr res mb_kd '1.5' #0:5.A",
            ]
        );
    }
}
