use super::deliver::deliver;
use super::load_settings;
use crate::cli::AttributesArgs;
use crate::error::{CliError, Result};
use crate::job::Job;
use molbind::core::alignment::sequences::SequentialMapping;
use molbind::core::io::features::FeatureTable;
use molbind::workflows;

pub async fn run(args: AttributesArgs) -> Result<()> {
    let target = &args.target;
    let job = Job::load(&target.job)?;
    let settings = load_settings(&target.set_values)?;
    let config = settings.viewer_config(target.viewer)?;

    let feature_path = job.feature_table.as_deref().ok_or_else(|| {
        CliError::Job("the 'attributes' command needs a 'feature-table' in the job file".into())
    })?;
    let features = FeatureTable::load(feature_path, &job.alignment)?;
    let mapping = SequentialMapping::new(&job.alignment, &job.bindings);
    let plan = workflows::attributes::run(&job.alignment, &mapping, &features, target.viewer);
    eprintln!(
        "Setting {} attribute value(s) from {} feature span(s).",
        plan.groups.len(),
        features.spans().len()
    );

    deliver(target, &job, config, &settings, vec![plan.batch]).await?;
    Ok(())
}
