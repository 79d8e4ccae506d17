use super::deliver::deliver;
use super::load_settings;
use crate::cli::{ColourArgs, ColourBy};
use crate::error::{CliError, Result};
use crate::job::{Colouring, Job};
use molbind::core::alignment::schemes::{SchemeRenderer, UserColourScheme};
use molbind::core::alignment::sequences::SequentialMapping;
use molbind::core::io::colours::ColourTable;
use molbind::core::models::colour::Colour;
use molbind::core::viewers::ViewerKind;
use molbind::workflows::colour::{self, ColourPlan};
use tracing::info;

pub async fn run(args: ColourArgs) -> Result<()> {
    let target = &args.target;
    let viewer = target.viewer;
    let job = Job::load(&target.job)?;
    let settings = load_settings(&target.set_values)?;
    let config = settings.viewer_config(viewer)?;

    let mut batches = Vec::new();
    if let Some(background) = &args.background {
        let colour = background
            .parse::<Colour>()
            .map_err(|e| CliError::Argument(e.to_string()))?;
        batches.push(colour::background(viewer, colour));
    }

    match args.by {
        ColourBy::Sequence => {
            let plan = colour_by_sequence(&job, viewer)?;
            eprintln!(
                "Colouring {} structure(s) with {} colour(s).",
                job.bound_structures(),
                plan.groups.len()
            );
            batches.push(plan.batch);
        }
        ColourBy::Chain => batches.push(colour::by_chain(viewer)),
        ColourBy::Charge => batches.push(colour::by_charge(viewer)),
    }

    info!(by = ?args.by, num_batches = batches.len(), "Colour commands ready.");
    deliver(target, &job, config, &settings, batches).await?;
    Ok(())
}

fn colour_by_sequence(job: &Job, viewer: ViewerKind) -> Result<ColourPlan> {
    let alignment = &job.alignment;
    let mapping = SequentialMapping::new(alignment, &job.bindings);
    let plan = match &job.colouring {
        Colouring::Scheme(scheme) => {
            let renderer = SchemeRenderer::new(alignment, *scheme);
            colour::by_sequence(alignment, &mapping, &renderer, &job.hidden, viewer)
        }
        Colouring::SchemeFile(path) => {
            let renderer = SchemeRenderer::new(alignment, UserColourScheme::load(path)?);
            colour::by_sequence(alignment, &mapping, &renderer, &job.hidden, viewer)
        }
        Colouring::Table { path, default } => {
            let table = ColourTable::load(path, alignment, *default)?;
            colour::by_sequence(alignment, &mapping, &table, &job.hidden, viewer)
        }
    };
    Ok(plan)
}
