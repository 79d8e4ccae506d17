use crate::core::alignment::{Alignment, HiddenColumns, ResidueMapping, StructureRef};
use crate::core::models::command::CommandBatch;
use crate::core::models::ranges::AtomSpecType;
use crate::engine::config::ViewerConfig;
use crate::engine::error::WorkflowError;
use crate::engine::superposition::{SuperpositionMatcher, SuperpositionResult};
use crate::engine::transport::BatchReplies;
use tracing::{info, instrument, warn};

/// Reply text with which a viewer rejects a fit over selections of different sizes.
const UNEQUAL_ATOMS_REPLY: &str = "unequal numbers of atoms";

#[derive(Debug, Clone)]
pub struct SuperposePlan {
    pub reference: StructureRef,
    /// Structures fitted onto the reference, in the order of `batches[1..]`.
    pub moving: Vec<StructureRef>,
    pub matched_columns: Vec<usize>,
    pub matching: SuperpositionResult,
    /// The backbone view first, then one superposition batch per moving structure.
    pub batches: Vec<CommandBatch>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SuperposeFailure {
    pub structure: StructureRef,
    pub message: String,
}

impl SuperposePlan {
    /// Per-structure fit errors reported in the replies to this plan's batches.
    pub fn failures(&self, replies: &[BatchReplies]) -> Vec<SuperposeFailure> {
        let mut failures = Vec::new();
        for (structure, batch) in self.moving.iter().zip(replies.iter().skip(1)) {
            if let Some(line) = batch.lines().find(|l| l.contains(UNEQUAL_ATOMS_REPLY)) {
                warn!(
                    model = %structure.model,
                    chain = %structure.chain,
                    "Superposition rejected by viewer."
                );
                failures.push(SuperposeFailure {
                    structure: structure.clone(),
                    message: line.trim().to_string(),
                });
            }
        }
        failures
    }
}

/// Superposes every structure bound to the alignment onto the first one, using only the
/// columns that are visible and hold a residue in every structure.
///
/// `structures[i]` is the structure bound to sequence `i`, if any.
#[instrument(skip_all, name = "superpose_workflow")]
pub fn run<A, M, H>(
    alignment: &A,
    mapping: &M,
    structures: &[Option<StructureRef>],
    hidden: &H,
    config: &ViewerConfig,
) -> Result<SuperposePlan, WorkflowError>
where
    A: Alignment,
    M: ResidueMapping,
    H: HiddenColumns,
{
    if structures.len() != alignment.sequence_count() {
        return Err(WorkflowError::StructureCountMismatch {
            sequences: alignment.sequence_count(),
            structures: structures.len(),
        });
    }

    let mut eligible: Vec<bool> = (0..alignment.width())
        .map(|column| !hidden.is_hidden(column))
        .collect();
    let matching =
        SuperpositionMatcher::new(alignment, mapping).match_columns(structures, &mut eligible);
    if matching.records.len() < 2 {
        return Err(WorkflowError::TooFewStructures(matching.records.len()));
    }

    let matched_columns: Vec<usize> = (0..eligible.len()).filter(|&c| eligible[c]).collect();
    if matched_columns.len() < config.min_superpose_positions {
        return Err(WorkflowError::InsufficientPositions {
            found: matched_columns.len(),
            required: config.min_superpose_positions,
        });
    }

    let reference_record = &matching.records[matching.reference];
    let reference = reference_record.structure.clone();
    let spec_type = if reference.nucleotide {
        AtomSpecType::Phosphate
    } else {
        AtomSpecType::Alpha
    };
    let reference_selection = reference_record.selection(&eligible);

    let backend = config.viewer.commands();
    let mut batches = vec![CommandBatch::new("show backbone", backend.show_backbone())];
    let mut moving = Vec::new();
    for (_, record) in matching.moving_records() {
        let commands = backend.superpose_structures(
            &reference_selection,
            &record.selection(&eligible),
            spec_type,
        );
        batches.push(CommandBatch::new(
            format!(
                "superpose {}:{} onto {}:{}",
                record.structure.model,
                record.structure.chain,
                reference.model,
                reference.chain
            ),
            commands,
        ));
        moving.push(record.structure.clone());
    }

    info!(
        viewer = %config.viewer,
        num_structures = matching.records.len(),
        num_columns = matched_columns.len(),
        "Superposition planned."
    );

    Ok(SuperposePlan {
        reference,
        moving,
        matched_columns,
        matching,
        batches,
    })
}
