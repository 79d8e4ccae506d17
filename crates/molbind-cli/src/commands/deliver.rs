use crate::cli::TargetArgs;
use crate::error::{CliError, Result};
use crate::job::Job;
use crate::settings::Settings;
use crate::utils::progress::CliProgressHandler;
use crate::viewer::discovery::{self, Platform};
use crate::viewer::http::HttpTransport;
use crate::viewer::launcher::{self, ViewerSession};
use molbind::core::models::command::CommandBatch;
use molbind::core::viewers::StructureCommands;
use molbind::engine::config::ViewerConfig;
use molbind::engine::progress::{Progress, ProgressReporter};
use molbind::engine::transport::{BatchReplies, dispatch_commands};
use std::io::Write;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};

const CLOSE_GRACE: Duration = Duration::from_secs(5);

/// The batches actually written or sent: the job's structure loading first (unless the
/// viewer is already running), then `batches`, then any follow-up view or session steps.
/// The range locates `batches` inside the result.
pub fn assemble(
    backend: &dyn StructureCommands,
    job: &Job,
    target: &TargetArgs,
    batches: Vec<CommandBatch>,
    load_structures: bool,
) -> (Vec<CommandBatch>, Range<usize>) {
    let mut all = Vec::with_capacity(batches.len() + 2);
    if load_structures {
        let commands = match &job.session {
            Some(session) => vec![backend.open_session(&path_arg(session))],
            None => job
                .files
                .iter()
                .map(|file| backend.load_file(&path_arg(file)))
                .collect(),
        };
        if !commands.is_empty() {
            all.push(CommandBatch::new("load structures", commands));
        }
    }

    let start = all.len();
    all.extend(batches);
    let requested = start..all.len();

    let mut finish = Vec::new();
    if target.focus {
        finish.push(backend.focus_view());
    }
    if let Some(path) = &target.save_session {
        finish.push(backend.save_session(&path_arg(path)));
    }
    if target.close {
        finish.push(backend.close_viewer());
    }
    if !finish.is_empty() {
        all.push(CommandBatch::new("finish", finish));
    }
    (all, requested)
}

fn path_arg(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn render_script(backend: &dyn StructureCommands, batches: &[CommandBatch]) -> String {
    batches
        .iter()
        .map(|batch| backend.to_script(&batch.commands))
        .collect()
}

/// Writes `script` to the `--script` file, or else to `stdout` with nothing else mixed in,
/// so the redirected output stays runnable.
fn emit_script(target: &TargetArgs, script: &str, stdout: &mut impl Write) -> Result<()> {
    match &target.script {
        Some(path) => {
            std::fs::write(path, script)?;
            info!(path = ?path, "Script written.");
            eprintln!("✓ {} script written to {}", target.viewer, path.display());
        }
        None => {
            stdout.write_all(script.as_bytes())?;
            stdout.flush()?;
        }
    }
    Ok(())
}

fn session_message(session: &ViewerSession) -> String {
    if session.is_launched() {
        format!("Launched {} on port {}", session.viewer, session.port)
    } else {
        format!("Attached to {} on port {}", session.viewer, session.port)
    }
}

/// Writes the script and/or dispatches to a viewer, as `target` asks. Returns the
/// replies to `batches` when anything was sent.
pub async fn deliver(
    target: &TargetArgs,
    job: &Job,
    config: ViewerConfig,
    settings: &Settings,
    batches: Vec<CommandBatch>,
) -> Result<Option<Vec<BatchReplies>>> {
    let backend = target.viewer.commands();

    if !target.sends() || target.script.is_some() {
        let (script_batches, _) = assemble(backend, job, target, batches.clone(), true);
        let script = render_script(backend, &script_batches);
        emit_script(target, &script, &mut std::io::stdout().lock())?;
    }

    if !target.sends() {
        return Ok(None);
    }

    let (send_batches, requested) =
        assemble(backend, job, target, batches, target.port.is_none());
    let port = target.port;
    let close = target.close;
    let preferred: Option<PathBuf> = settings.viewer_path(target.viewer).map(Path::to_path_buf);

    let replies = tokio::task::spawn_blocking(move || -> Result<Vec<BatchReplies>> {
        let viewer = config.viewer;
        let progress_handler = CliProgressHandler::new();
        let reporter = ProgressReporter::with_callback(progress_handler.get_callback());
        let session = match port {
            Some(port) => ViewerSession::attach(viewer, port),
            None => {
                let candidates = discovery::candidate_paths(
                    viewer,
                    Platform::current(),
                    &discovery::home_dir(),
                    preferred.as_deref(),
                );
                let executable = discovery::find_executable(viewer, candidates)?;
                launcher::launch(viewer, &executable, config.launch_timeout)?
            }
        };

        reporter.report(Progress::Message(session_message(&session)));

        let transport = HttpTransport::new(&config)?;
        let replies = dispatch_commands(
            &transport,
            &session,
            viewer.commands(),
            &send_batches,
            &reporter,
        );

        if close {
            session.shut_down(CLOSE_GRACE);
        } else if let Some(pid) = session.detach() {
            info!(pid, "Leaving viewer running.");
        }
        Ok(replies)
    })
    .await
    .map_err(|e| CliError::Other(anyhow::anyhow!("Viewer dispatch task failed: {}", e)))??;

    let failed: usize = replies.iter().map(BatchReplies::failures).sum();
    if failed > 0 {
        warn!(failed, "Some viewer requests failed.");
        eprintln!("Warning: {} viewer request(s) failed; see the log for details.", failed);
    }
    Ok(Some(replies[requested].to_vec()))
}
