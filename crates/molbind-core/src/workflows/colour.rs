use crate::core::alignment::{Alignment, HiddenColumns, ResidueMapping, SequenceRenderer};
use crate::core::models::colour::Colour;
use crate::core::models::command::CommandBatch;
use crate::core::models::groups::ColourGroups;
use crate::core::viewers::ViewerKind;
use crate::engine::grouping::ColourGrouper;
use tracing::{info, instrument};

#[derive(Debug, Clone)]
pub struct ColourPlan {
    pub groups: ColourGroups,
    pub batch: CommandBatch,
}

/// Colours every mapped residue the way the alignment currently draws it.
#[instrument(skip_all, name = "colour_workflow")]
pub fn by_sequence<A, M, R, H>(
    alignment: &A,
    mapping: &M,
    renderer: &R,
    hidden: &H,
    viewer: ViewerKind,
) -> ColourPlan
where
    A: Alignment,
    M: ResidueMapping,
    R: SequenceRenderer,
    H: HiddenColumns,
{
    let groups = ColourGrouper::new(alignment, mapping).group_by_colour(renderer, hidden);
    let commands = viewer.commands().colour_by_sequence(&groups);
    info!(
        viewer = %viewer,
        num_colours = groups.len(),
        "Colour commands generated."
    );
    ColourPlan {
        groups,
        batch: CommandBatch::new("colour by sequence", commands),
    }
}

pub fn by_chain(viewer: ViewerKind) -> CommandBatch {
    CommandBatch::new("colour by chain", vec![viewer.commands().colour_by_chain()])
}

pub fn by_charge(viewer: ViewerKind) -> CommandBatch {
    CommandBatch::new("colour by charge", viewer.commands().colour_by_charge())
}

pub fn background(viewer: ViewerKind, colour: Colour) -> CommandBatch {
    CommandBatch::new(
        "background",
        vec![viewer.commands().set_background_colour(colour)],
    )
}
