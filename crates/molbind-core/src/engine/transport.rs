use super::progress::{Progress, ProgressReporter};
use crate::core::models::command::CommandBatch;
use crate::core::viewers::{StructureCommands, ViewerKind};
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, info, instrument, warn};

/// Lines of text a viewer returned for one request.
pub type Reply = Vec<String>;

/// Failure of a single request to a running viewer.
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Connection refused by viewer on port {port}")]
    ConnectionRefused { port: u16 },

    #[error("No reply from viewer within {0:?}")]
    Timeout(Duration),

    #[error("Viewer answered with HTTP status {0}")]
    Status(u16),

    #[error("Connection reset by viewer (it may have exited)")]
    Reset,

    #[error("Transport error: {0}")]
    Other(String),
}

/// Failure to start a viewer and learn its control port. Terminal for that launch
/// attempt, unlike a [`TransportError`].
#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("No {viewer} executable found (tried {} location(s))", tried.len())]
    NoExecutable {
        viewer: ViewerKind,
        tried: Vec<PathBuf>,
    },

    #[error("Failed to start '{path}': {source}", path = path.display())]
    Spawn {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{viewer} did not announce a control port within {timeout:?}")]
    PortNotAnnounced {
        viewer: ViewerKind,
        timeout: Duration,
    },

    #[error("{viewer} exited before announcing a control port")]
    Exited { viewer: ViewerKind },
}

/// The control channel of a launched (or attached) viewer.
///
/// Implementations handle exactly one request per call and do not retry; the session
/// value identifies the viewer instance and is owned by whoever launched it.
pub trait ViewerTransport {
    type Session;

    /// Sends one payload and collects the viewer's reply.
    ///
    /// # Arguments
    ///
    /// * `session` - The viewer instance to talk to.
    /// * `payload` - A payload produced by [`StructureCommands::payloads`].
    ///
    /// # Return
    ///
    /// The reply lines, possibly empty.
    ///
    /// # Errors
    ///
    /// Returns a [`TransportError`] when the request cannot be delivered or is rejected.
    fn send(&self, session: &Self::Session, payload: &str) -> Result<Reply, TransportError>;
}

/// Extracts the control port from a line of viewer start-up output, if the line is the
/// viewer's port announcement.
///
/// PyMOL announces `xml-rpc server running on host localhost, port 9123`; Chimera
/// announces `REST server on host 127.0.0.1 port 51235`.
pub fn parse_announced_port(viewer: ViewerKind, line: &str) -> Option<u16> {
    let announces = match viewer {
        ViewerKind::Pymol => line.contains("xml-rpc"),
        ViewerKind::Chimera => line.starts_with("REST server"),
    };
    if !announces {
        return None;
    }
    let mut tokens = line
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|t| !t.is_empty());
    tokens.find(|t| t.eq_ignore_ascii_case("port"))?;
    tokens
        .next()?
        .trim_end_matches(|c: char| !c.is_ascii_digit())
        .parse()
        .ok()
}

/// The outcome of dispatching one [`CommandBatch`]: a reply slot per payload, `None`
/// where the request failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchReplies {
    pub label: String,
    pub replies: Vec<Option<Reply>>,
}

impl BatchReplies {
    pub fn failures(&self) -> usize {
        self.replies.iter().filter(|r| r.is_none()).count()
    }

    /// Every line received for this batch.
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.replies
            .iter()
            .flatten()
            .flat_map(|reply| reply.iter().map(String::as_str))
    }
}

/// Sends every batch, payload by payload, through `transport`.
///
/// A failed request is logged and recorded as `None`; later requests are still attempted.
#[instrument(skip_all, name = "dispatch_commands")]
pub fn dispatch_commands<T: ViewerTransport>(
    transport: &T,
    session: &T::Session,
    backend: &dyn StructureCommands,
    batches: &[CommandBatch],
    reporter: &ProgressReporter,
) -> Vec<BatchReplies> {
    let packed: Vec<(&str, Vec<String>)> = batches
        .iter()
        .map(|batch| (batch.label.as_str(), backend.payloads(&batch.commands)))
        .collect();
    let total: usize = packed.iter().map(|(_, payloads)| payloads.len()).sum();
    info!(
        viewer = %backend.viewer(),
        num_batches = batches.len(),
        num_requests = total,
        "Dispatching commands to viewer."
    );
    reporter.report(Progress::DispatchStart {
        total_requests: total as u64,
    });

    let mut results = Vec::with_capacity(packed.len());
    let mut failed = 0usize;
    for (label, payloads) in packed {
        reporter.report(Progress::BatchStart {
            label: label.to_string(),
        });
        let mut replies = Vec::with_capacity(payloads.len());
        for payload in &payloads {
            debug!(batch = label, payload = %payload, "Sending request.");
            match transport.send(session, payload) {
                Ok(reply) => {
                    reporter.report(Progress::RequestDone { ok: true });
                    replies.push(Some(reply));
                }
                Err(e) => {
                    warn!(batch = label, error = %e, "Viewer request failed; continuing.");
                    failed += 1;
                    reporter.report(Progress::RequestDone { ok: false });
                    replies.push(None);
                }
            }
        }
        results.push(BatchReplies {
            label: label.to_string(),
            replies,
        });
    }

    reporter.report(Progress::DispatchFinish {
        failed_requests: failed as u64,
    });
    results
}
