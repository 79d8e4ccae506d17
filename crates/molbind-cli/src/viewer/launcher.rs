use super::discovery;
use molbind::core::viewers::ViewerKind;
use molbind::engine::transport::{LaunchError, parse_announced_port};
use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::thread;
use std::time::Duration;
use tracing::{debug, info, trace, warn};

/// A viewer instance accepting commands on `port`. `child` is set when molbind launched
/// the process itself.
#[derive(Debug)]
pub struct ViewerSession {
    pub viewer: ViewerKind,
    pub port: u16,
    child: Option<Child>,
}

impl ViewerSession {
    /// A session for a viewer someone else started.
    pub fn attach(viewer: ViewerKind, port: u16) -> Self {
        info!(viewer = %viewer, port, "Attaching to running viewer.");
        Self {
            viewer,
            port,
            child: None,
        }
    }

    pub fn is_launched(&self) -> bool {
        self.child.is_some()
    }

    /// Leaves a launched viewer running for the user once molbind exits.
    pub fn detach(mut self) -> Option<u32> {
        self.child.take().map(|child| child.id())
    }

    /// Waits up to `timeout` for a launched viewer to exit, killing it afterwards.
    pub fn shut_down(mut self, timeout: Duration) {
        let Some(mut child) = self.child.take() else {
            return;
        };
        let deadline = std::time::Instant::now() + timeout;
        while std::time::Instant::now() < deadline {
            match child.try_wait() {
                Ok(Some(status)) => {
                    debug!(?status, "Viewer exited.");
                    return;
                }
                Ok(None) => thread::sleep(Duration::from_millis(50)),
                Err(e) => {
                    warn!(error = %e, "Could not query viewer process state.");
                    break;
                }
            }
        }
        if let Err(e) = child.kill() {
            warn!(error = %e, "Failed to stop viewer process.");
        }
        let _ = child.wait();
    }
}

/// Reads lines from `output` until one announces the control port. Sends the port once
/// found; dropping the sender without a value means the stream ended first.
fn watch_for_port<R: Read + Send + 'static>(
    viewer: ViewerKind,
    output: R,
    sender: mpsc::Sender<u16>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut announced = false;
        for line in BufReader::new(output).lines() {
            let Ok(line) = line else { break };
            trace!(viewer = %viewer, line = %line, "Viewer output.");
            if announced {
                continue;
            }
            if let Some(port) = parse_announced_port(viewer, &line) {
                announced = true;
                if sender.send(port).is_err() {
                    break;
                }
            }
        }
    })
}

/// Starts `executable` with its control server enabled and waits for the port announcement.
pub fn launch(
    viewer: ViewerKind,
    executable: &Path,
    timeout: Duration,
) -> Result<ViewerSession, LaunchError> {
    let args = discovery::launch_args(viewer, executable);
    info!(viewer = %viewer, path = ?executable, ?args, "Launching viewer.");
    let mut child = Command::new(executable)
        .args(&args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .spawn()
        .map_err(|source| LaunchError::Spawn {
            path: executable.to_path_buf(),
            source,
        })?;

    let Some(stdout) = child.stdout.take() else {
        let _ = child.kill();
        return Err(LaunchError::Exited { viewer });
    };
    let (sender, receiver) = mpsc::channel();
    // Drains stdout until the viewer closes it.
    watch_for_port(viewer, stdout, sender);

    match receiver.recv_timeout(timeout) {
        Ok(port) => {
            info!(viewer = %viewer, port, "Viewer control server is up.");
            Ok(ViewerSession {
                viewer,
                port,
                child: Some(child),
            })
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            warn!(viewer = %viewer, ?timeout, "Viewer did not announce a port; stopping it.");
            let _ = child.kill();
            let _ = child.wait();
            Err(LaunchError::PortNotAnnounced { viewer, timeout })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            let _ = child.wait();
            Err(LaunchError::Exited { viewer })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn port_watcher_reports_the_announced_port() {
        let output = Cursor::new(
            " PyMOL(TM) Molecular Graphics System\nxml-rpc server running on host localhost, port 9124\nready\n",
        );
        let (sender, receiver) = mpsc::channel();

        watch_for_port(ViewerKind::Pymol, output, sender).join().unwrap();

        assert_eq!(receiver.recv_timeout(Duration::from_secs(1)), Ok(9124));
    }

    #[test]
    fn port_watcher_disconnects_when_output_ends_without_a_port() {
        let output = Cursor::new("Chimera starting\nno server today\n");
        let (sender, receiver) = mpsc::channel();

        watch_for_port(ViewerKind::Chimera, output, sender).join().unwrap();

        assert_eq!(
            receiver.recv_timeout(Duration::from_secs(1)),
            Err(mpsc::RecvTimeoutError::Disconnected)
        );
    }

    #[test]
    fn missing_executable_is_a_spawn_error() {
        let dir = tempfile::tempdir().unwrap();
        let result = launch(
            ViewerKind::Pymol,
            &dir.path().join("no-such-pymol"),
            Duration::from_millis(100),
        );
        assert!(matches!(result, Err(LaunchError::Spawn { .. })));
    }

    #[test]
    fn attached_sessions_own_no_process() {
        let session = ViewerSession::attach(ViewerKind::Chimera, 51235);
        assert!(!session.is_launched());
        assert_eq!(session.detach(), None);
    }
}
