//! Export server HTTP client
//!
//! Sends an [`ExportConfig`] to the export server as a multipart form and
//! returns the raw archive bytes of the response.

use crate::domain::{ConnectionConfig, ExportConfig, OptionValue, Result, TransportError};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, ClientBuilder};
use std::time::Duration;
use url::Url;

/// Path of the export endpoint on the server
pub const EXPORT_API_PATH: &str = "/api/v2.0/export";

/// Client name reported to the export server
const CLIENT_NAME: &str = "RUST";

/// Transport tuning that is not part of the connection identity
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Verify TLS certificates on secure connections
    pub tls_verify: bool,

    /// Client-side request timeout; `None` keeps the reqwest default
    pub timeout: Option<Duration>,
}

impl Default for TransportOptions {
    fn default() -> Self {
        Self {
            tls_verify: true,
            timeout: None,
        }
    }
}

/// HTTP client for one export server
///
/// Idle connections are not pooled: every [`send`](Self::send) opens its own
/// connection and releases it when the response has been read.
///
/// # Example
///
/// ```no_run
/// use chartex::adapters::exporter::{ExportClient, TransportOptions};
/// use chartex::domain::{ConnectionConfig, ExportConfig};
///
/// # async fn example() -> chartex::domain::Result<()> {
/// let client = ExportClient::new(ConnectionConfig::default(), &TransportOptions::default())?;
///
/// let mut config = ExportConfig::new();
/// config.set("type", "png");
/// let archive = client.send(&config, false, true).await?;
/// println!("received {} bytes", archive.len());
/// # Ok(())
/// # }
/// ```
pub struct ExportClient {
    client: Client,
    connection: ConnectionConfig,
}

impl ExportClient {
    /// Create a client for the given endpoint
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(connection: ConnectionConfig, options: &TransportOptions) -> Result<Self> {
        let mut builder = ClientBuilder::new().pool_max_idle_per_host(0);

        if let Some(timeout) = options.timeout {
            builder = builder.timeout(timeout);
        }

        if connection.is_secure() && !options.tls_verify {
            tracing::warn!(
                host = %connection.host(),
                "TLS certificate verification disabled for export server"
            );
            builder = builder.danger_accept_invalid_certs(true);
        }

        let client = builder.build().map_err(|e| {
            TransportError::InvalidRequest(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self { client, connection })
    }

    /// The endpoint this client talks to
    pub fn connection(&self) -> &ConnectionConfig {
        &self.connection
    }

    /// Full URL of the export endpoint
    pub fn endpoint(&self) -> Result<Url> {
        let base = self.connection.to_string();
        let url = Url::parse(&base)
            .and_then(|base| base.join(EXPORT_API_PATH))
            .map_err(|e| TransportError::InvalidRequest(format!("Invalid export URL {base}: {e}")))?;
        Ok(url)
    }

    /// Send an export request and return the archive bytes
    ///
    /// A single attempt is made; any failure surfaces immediately.
    ///
    /// # Errors
    ///
    /// - [`TransportError::InvalidRequest`] if a file option cannot be read
    /// - [`TransportError::ConnectionFailed`] if the server is unreachable
    /// - [`TransportError::ServerError`] on a non-success status
    /// - [`TransportError::ResponseTruncated`] if the body is cut short or empty
    /// - [`TransportError::Timeout`] if a configured timeout elapses
    pub async fn send(
        &self,
        config: &ExportConfig,
        minify_resources: bool,
        export_bulk: bool,
    ) -> Result<Vec<u8>> {
        let url = self.endpoint()?;
        let form = build_form(config, minify_resources, export_bulk).await?;

        tracing::debug!(
            url = %url,
            option_count = config.len(),
            minify_resources = minify_resources,
            export_bulk = export_bulk,
            "Sending export request"
        );

        let response = self
            .client
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    TransportError::Timeout(e.to_string())
                } else {
                    TransportError::ConnectionFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TransportError::ServerError {
                status: status.as_u16(),
                message: body,
            }
            .into());
        }

        let body = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                TransportError::Timeout(e.to_string())
            } else {
                TransportError::ResponseTruncated(e.to_string())
            }
        })?;

        if body.is_empty() {
            return Err(
                TransportError::ResponseTruncated("empty response body".to_string()).into(),
            );
        }

        tracing::debug!(bytes = body.len(), "Received export archive");
        Ok(body.to_vec())
    }
}

/// Builds the multipart request body
///
/// Text and JSON options become text fields, path options become file parts
/// carrying the file's bytes. The request flags and client identity are
/// appended as text fields.
async fn build_form(config: &ExportConfig, minify_resources: bool, export_bulk: bool) -> Result<Form> {
    let mut form = Form::new();

    for (name, value) in config.iter() {
        form = match value {
            OptionValue::Path(path) => {
                let bytes = tokio::fs::read(path).await.map_err(|e| {
                    TransportError::InvalidRequest(format!(
                        "Failed to read {} for option {name}: {e}",
                        path.display()
                    ))
                })?;
                let file_name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| name.to_string());
                form.part(name.to_string(), Part::bytes(bytes).file_name(file_name))
            }
            other => {
                let text = other.as_form_text().unwrap_or_default();
                form.text(name.to_string(), text)
            }
        };
    }

    Ok(form
        .text("exportBulk", export_bulk.to_string())
        .text("minifyResources", minify_resources.to_string())
        .text("clientName", CLIENT_NAME)
        .text("platform", std::env::consts::OS))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ChartexError;
    use mockito::Matcher;
    use std::io::Write;

    fn connection_for(server: &mockito::ServerGuard) -> ConnectionConfig {
        let addr: std::net::SocketAddr = server.host_with_port().parse().unwrap();
        ConnectionConfig::new(addr.ip().to_string(), addr.port(), false)
    }

    #[test]
    fn test_endpoint_url() {
        let client = ExportClient::new(
            ConnectionConfig::new("export.example.com", 8443, true),
            &TransportOptions::default(),
        )
        .unwrap();

        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "https://export.example.com:8443/api/v2.0/export"
        );
    }

    #[test]
    fn test_endpoint_url_with_ipv6_host() {
        let client = ExportClient::new(
            ConnectionConfig::new("::1", 1337, false),
            &TransportOptions::default(),
        )
        .unwrap();

        assert_eq!(
            client.endpoint().unwrap().as_str(),
            "http://[::1]:1337/api/v2.0/export"
        );
    }

    #[tokio::test]
    async fn test_send_returns_archive_bytes() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", EXPORT_API_PATH)
            .match_header(
                "content-type",
                Matcher::Regex("multipart/form-data".to_string()),
            )
            .match_body(Matcher::AllOf(vec![
                Matcher::Regex(r#"name="type""#.to_string()),
                Matcher::Regex(r#"name="exportBulk""#.to_string()),
                Matcher::Regex(r#"name="clientName""#.to_string()),
            ]))
            .with_status(200)
            .with_body(b"PK\x03\x04archive")
            .create_async()
            .await;

        let client = ExportClient::new(connection_for(&server), &TransportOptions::default()).unwrap();
        let mut config = ExportConfig::new();
        config.set("type", "png");

        let bytes = client.send(&config, false, true).await.unwrap();
        assert_eq!(bytes, b"PK\x03\x04archive".to_vec());
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_uploads_path_option_contents() {
        let mut chart_file = tempfile::NamedTempFile::new().unwrap();
        chart_file
            .write_all(br#"{"type":"column2d","renderAt":"chart-container"}"#)
            .unwrap();

        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", EXPORT_API_PATH)
            .match_body(Matcher::Regex("column2d".to_string()))
            .with_status(200)
            .with_body("zip")
            .create_async()
            .await;

        let client = ExportClient::new(connection_for(&server), &TransportOptions::default()).unwrap();
        let mut config = ExportConfig::new();
        config.set("chartConfig", chart_file.path());

        client.send(&config, true, false).await.unwrap();
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_send_missing_path_option() {
        let server = mockito::Server::new_async().await;
        let client = ExportClient::new(connection_for(&server), &TransportOptions::default()).unwrap();
        let mut config = ExportConfig::new();
        config.set("chartConfig", std::path::Path::new("/nonexistent/chart.json"));

        let result = client.send(&config, false, true).await;
        assert!(matches!(
            result,
            Err(ChartexError::Transport(TransportError::InvalidRequest(_)))
        ));
    }

    #[tokio::test]
    async fn test_send_server_error() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", EXPORT_API_PATH)
            .with_status(500)
            .with_body("Chart configuration is invalid")
            .create_async()
            .await;

        let client = ExportClient::new(connection_for(&server), &TransportOptions::default()).unwrap();
        let result = client.send(&ExportConfig::new(), false, true).await;

        match result {
            Err(ChartexError::Transport(TransportError::ServerError { status, message })) => {
                assert_eq!(status, 500);
                assert_eq!(message, "Chart configuration is invalid");
            }
            other => panic!("Expected ServerError, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_send_empty_body_is_truncated() {
        let mut server = mockito::Server::new_async().await;
        server
            .mock("POST", EXPORT_API_PATH)
            .with_status(200)
            .create_async()
            .await;

        let client = ExportClient::new(connection_for(&server), &TransportOptions::default()).unwrap();
        let result = client.send(&ExportConfig::new(), false, true).await;

        assert!(matches!(
            result,
            Err(ChartexError::Transport(TransportError::ResponseTruncated(_)))
        ));
    }

    #[tokio::test]
    async fn test_send_connection_refused() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let client = ExportClient::new(
            ConnectionConfig::new("127.0.0.1", port, false),
            &TransportOptions::default(),
        )
        .unwrap();
        let result = client.send(&ExportConfig::new(), false, true).await;

        assert!(matches!(
            result,
            Err(ChartexError::Transport(TransportError::ConnectionFailed(_)))
        ));
    }
}
