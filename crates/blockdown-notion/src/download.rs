//! HTTP downloads of images and attachments.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use blockdown::Materializer;
use tracing::{debug, warn};

use crate::client::agent;
use crate::config::ApiSettings;

#[derive(Debug, thiserror::Error)]
enum DownloadError {
    #[error("unexpected status {0}")]
    Status(u16),

    #[error("{0}")]
    Transport(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// [`Materializer`] that GETs the URL without credentials.
///
/// Notion file URLs are pre-signed, so the API token is never sent along.
pub struct HttpMaterializer {
    agent: ureq::Agent,
}

impl HttpMaterializer {
    pub fn new(api: &ApiSettings) -> Self {
        Self { agent: agent(api) }
    }

    fn download(&self, url: &str, destination: &Path) -> Result<(), DownloadError> {
        let response = self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(status, _) => DownloadError::Status(status),
            ureq::Error::Transport(t) => DownloadError::Transport(t.to_string()),
        })?;
        if response.status() != 200 {
            return Err(DownloadError::Status(response.status()));
        }

        if let Some(parent) = destination.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut reader = response.into_reader();
        let mut writer = BufWriter::new(File::create(destination)?);
        io::copy(&mut reader, &mut writer)?;
        writer.flush()?;
        Ok(())
    }
}

impl Materializer for HttpMaterializer {
    fn materialize(&self, url: &str, destination: &Path) -> bool {
        match self.download(url, destination) {
            Ok(()) => {
                debug!(path = %destination.display(), "downloaded");
                true
            }
            Err(e) => {
                warn!(url = short_url(url), error = %e, "download failed");
                false
            }
        }
    }
}

/// URL without its query string; pre-signed signatures stay out of logs
fn short_url(url: &str) -> &str {
    url.split('?').next().unwrap_or(url)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{BufRead, BufReader};
    use std::net::TcpListener;
    use std::thread;

    /// Answer a single request with a canned response; returns the base URL
    fn serve_once(response: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        thread::spawn(move || {
            let (mut stream, _) = listener.accept().unwrap();
            let mut reader = BufReader::new(stream.try_clone().unwrap());
            let mut line = String::new();
            while reader.read_line(&mut line).unwrap() > 0 && line != "\r\n" {
                line.clear();
            }
            stream.write_all(response.as_bytes()).unwrap();
        });
        format!("http://{}", addr)
    }

    #[test]
    fn test_error_status_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_once(
            "HTTP/1.1 404 Not Found\r\nContent-Length: 9\r\nConnection: close\r\n\r\nnot found",
        );
        let destination = dir.path().join("images/x.png");

        let materializer = HttpMaterializer::new(&ApiSettings::default());
        assert!(!materializer.materialize(&format!("{}/x.png", base), &destination));
        assert!(!destination.exists());
        assert!(!dir.path().join("images").exists());
    }

    #[test]
    fn test_ok_response_is_written() {
        let dir = tempfile::tempdir().unwrap();
        let base = serve_once(
            "HTTP/1.1 200 OK\r\nContent-Length: 7\r\nConnection: close\r\n\r\nPNGDATA",
        );
        let destination = dir.path().join("images/x.png");

        let materializer = HttpMaterializer::new(&ApiSettings::default());
        assert!(materializer.materialize(&format!("{}/x.png", base), &destination));
        assert_eq!(fs::read(&destination).unwrap(), b"PNGDATA");
    }

    #[test]
    fn test_short_url_drops_signature() {
        assert_eq!(
            short_url("https://s3.example.com/a.png?X-Amz-Signature=abc"),
            "https://s3.example.com/a.png"
        );
        assert_eq!(short_url("https://example.com/a.pdf"), "https://example.com/a.pdf");
    }

    #[test]
    fn test_unreachable_url_reports_failure() {
        let dir = tempfile::tempdir().unwrap();
        let api = ApiSettings {
            timeout_secs: 2,
            ..ApiSettings::default()
        };
        let destination = dir.path().join("images/x.png");

        let materializer = HttpMaterializer::new(&api);
        assert!(!materializer.materialize("http://127.0.0.1:9/x.png", &destination));
        assert!(!destination.exists());
    }
}
