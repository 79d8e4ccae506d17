use super::launcher::ViewerSession;
use molbind::core::viewers::ViewerKind;
use molbind::engine::config::ViewerConfig;
use molbind::engine::transport::{Reply, TransportError, ViewerTransport};
use reqwest::blocking::{Client, Response};
use std::time::Duration;
use tracing::trace;

/// Sends payloads over HTTP on the local host: XML-RPC posts for PyMOL, form posts to
/// `/run` for Chimera's REST server.
pub struct HttpTransport {
    client: Client,
    reply_timeout: Duration,
}

impl HttpTransport {
    pub fn new(config: &ViewerConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(config.reply_timeout)
            .build()
            .map_err(|e| TransportError::Other(e.to_string()))?;
        Ok(Self {
            client,
            reply_timeout: config.reply_timeout,
        })
    }

    fn classify(&self, port: u16, e: reqwest::Error) -> TransportError {
        if e.is_timeout() {
            TransportError::Timeout(self.reply_timeout)
        } else if e.is_connect() {
            TransportError::ConnectionRefused { port }
        } else if e.is_body() || e.is_decode() || e.is_request() {
            TransportError::Reset
        } else {
            TransportError::Other(e.to_string())
        }
    }

    fn read_reply(&self, port: u16, response: Response) -> Result<Reply, TransportError> {
        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }
        let text = response.text().map_err(|e| self.classify(port, e))?;
        Ok(text.lines().map(str::to_string).collect())
    }
}

impl ViewerTransport for HttpTransport {
    type Session = ViewerSession;

    fn send(&self, session: &ViewerSession, payload: &str) -> Result<Reply, TransportError> {
        let port = session.port;
        trace!(viewer = %session.viewer, port, payload, "HTTP request.");
        let request = match session.viewer {
            ViewerKind::Pymol => self
                .client
                .post(format!("http://127.0.0.1:{}", port))
                .header("accept", "*/*")
                .header("content-type", "text/xml")
                .body(payload.to_string()),
            ViewerKind::Chimera => self
                .client
                .post(format!("http://127.0.0.1:{}/run", port))
                .form(&[("command", payload)]),
        };
        let response = request.send().map_err(|e| self.classify(port, e))?;
        self.read_reply(port, response)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use molbind::engine::config::ViewerConfigBuilder;
    use std::io::{Read, Write};
    use std::net::TcpListener;
    use std::sync::mpsc;
    use std::thread;

    /// Serves one request on a free local port, answering with `status` and `body`, and
    /// hands the raw request text back through the returned receiver.
    fn one_shot_server(status: &'static str, body: &'static str) -> (u16, mpsc::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        let (sender, receiver) = mpsc::channel();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut request = Vec::new();
            let mut buf = [0u8; 1024];
            loop {
                let n = stream.read(&mut buf).unwrap();
                if n == 0 {
                    break;
                }
                request.extend_from_slice(&buf[..n]);
                let text = String::from_utf8_lossy(&request).to_string();
                if let Some(header_end) = text.find("\r\n\r\n") {
                    let content_length = text[..header_end]
                        .lines()
                        .find_map(|l| {
                            let (name, value) = l.split_once(':')?;
                            name.eq_ignore_ascii_case("content-length")
                                .then(|| value.trim().parse::<usize>().ok())
                                .flatten()
                        })
                        .unwrap_or(0);
                    if request.len() >= header_end + 4 + content_length {
                        break;
                    }
                }
            }
            let response = format!(
                "HTTP/1.1 {}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                status,
                body.len(),
                body
            );
            stream.write_all(response.as_bytes()).unwrap();
            sender.send(String::from_utf8_lossy(&request).to_string()).unwrap();
        });
        (port, receiver)
    }

    fn transport(viewer: ViewerKind) -> HttpTransport {
        let config = ViewerConfigBuilder::new()
            .viewer(viewer)
            .connect_timeout(Duration::from_secs(2))
            .reply_timeout(Duration::from_secs(5))
            .build()
            .unwrap();
        HttpTransport::new(&config).unwrap()
    }

    #[test]
    fn pymol_payload_is_posted_as_xml() {
        let (port, requests) = one_shot_server("200 OK", "<methodResponse/>\n");
        let session = ViewerSession::attach(ViewerKind::Pymol, port);
        let body = "<methodCall><methodName>zoom</methodName><params></params></methodCall>";

        let reply = transport(ViewerKind::Pymol).send(&session, body).unwrap();

        assert_eq!(reply, vec!["<methodResponse/>"]);
        let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(request.starts_with("POST / HTTP/1.1"));
        assert!(request.to_ascii_lowercase().contains("content-type: text/xml"));
        assert!(request.ends_with(body));
    }

    #[test]
    fn chimera_payload_is_form_posted_to_run() {
        let (port, requests) = one_shot_server("200 OK", "RMSD between 3 atom pairs is 0.412\n");
        let session = ViewerSession::attach(ViewerKind::Chimera, port);

        let reply = transport(ViewerKind::Chimera)
            .send(&session, "focus;color red #1:1.A")
            .unwrap();

        assert_eq!(reply, vec!["RMSD between 3 atom pairs is 0.412"]);
        let request = requests.recv_timeout(Duration::from_secs(5)).unwrap();
        assert!(request.starts_with("POST /run HTTP/1.1"));
        assert!(request.ends_with("command=focus%3Bcolor+red+%231%3A1.A"));
    }

    #[test]
    fn error_status_is_reported() {
        let (port, _requests) = one_shot_server("500 Internal Server Error", "");
        let session = ViewerSession::attach(ViewerKind::Chimera, port);

        let result = transport(ViewerKind::Chimera).send(&session, "focus");

        assert!(matches!(result, Err(TransportError::Status(500))));
    }

    #[test]
    fn closed_port_is_connection_refused() {
        let port = {
            let listener = TcpListener::bind("127.0.0.1:0").unwrap();
            listener.local_addr().unwrap().port()
        };
        let session = ViewerSession::attach(ViewerKind::Pymol, port);

        let result = transport(ViewerKind::Pymol).send(&session, "<methodCall/>");

        assert!(matches!(
            result,
            Err(TransportError::ConnectionRefused { port: p }) if p == port
        ));
    }
}
