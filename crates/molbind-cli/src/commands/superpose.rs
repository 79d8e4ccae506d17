use super::deliver::deliver;
use super::load_settings;
use crate::cli::SuperposeArgs;
use crate::error::Result;
use crate::job::Job;
use molbind::core::alignment::sequences::SequentialMapping;
use molbind::workflows;
use tracing::{info, warn};

pub async fn run(args: SuperposeArgs) -> Result<()> {
    let target = &args.target;
    let job = Job::load(&target.job)?;
    let settings = load_settings(&target.set_values)?;
    let config = settings.viewer_config(target.viewer)?;

    let mapping = SequentialMapping::new(&job.alignment, &job.bindings);
    let plan = workflows::superpose::run(
        &job.alignment,
        &mapping,
        &job.structures,
        &job.hidden,
        &config,
    )?;
    info!(
        reference = %format!("{}:{}", plan.reference.model, plan.reference.chain),
        num_moving = plan.moving.len(),
        "Superposition plan ready."
    );
    eprintln!(
        "Superposing {} structure(s) onto {}:{} over {} aligned position(s).",
        plan.moving.len(),
        plan.reference.model,
        plan.reference.chain,
        plan.matched_columns.len()
    );

    let replies = deliver(target, &job, config, &settings, plan.batches.clone()).await?;
    if let Some(replies) = replies {
        for failure in plan.failures(&replies) {
            warn!(model = %failure.structure.model, message = %failure.message, "Superposition failed.");
            eprintln!(
                "✗ {}:{} could not be superposed: {}",
                failure.structure.model, failure.structure.chain, failure.message
            );
        }
    }
    Ok(())
}
