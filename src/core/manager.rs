//! Export manager - entry point of the export pipeline
//!
//! Sends a request to the export server, then hands the returned archive to
//! a delivery mode: files on disk, an in-memory map, or a remote destination.

use crate::adapters::destination::{RemoteDestination, UploadReport};
use crate::adapters::exporter::{ExportClient, TransportOptions};
use crate::config::ServerConfig;
use crate::core::delivery::{deliver_to_disk, deliver_to_memory, deliver_to_memory_files};
use crate::domain::{ConnectionConfig, ExportConfig, Result};
use crate::{log_export_complete, log_export_start};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

/// Runs exports against one export server
///
/// # Example
///
/// ```no_run
/// use chartex::core::ExportManager;
/// use chartex::domain::{ConnectionConfig, ExportConfig};
/// use std::path::Path;
///
/// # async fn example() -> chartex::domain::Result<()> {
/// let manager = ExportManager::new(ConnectionConfig::default())?;
///
/// let mut config = ExportConfig::new();
/// config.set("type", "png");
/// config.set("chartConfig", Path::new("chart.json"));
///
/// let paths = manager.export(&config, Path::new("out"), true, true).await?;
/// for path in paths {
///     println!("{}", path.display());
/// }
/// # Ok(())
/// # }
/// ```
pub struct ExportManager {
    client: ExportClient,
    minify_resources: bool,
}

impl ExportManager {
    /// Create a manager with default transport options
    ///
    /// # Errors
    ///
    /// Returns a transport error if the HTTP client cannot be built.
    pub fn new(connection: ConnectionConfig) -> Result<Self> {
        Self::with_options(connection, &TransportOptions::default())
    }

    /// Create a manager with explicit transport options
    pub fn with_options(connection: ConnectionConfig, options: &TransportOptions) -> Result<Self> {
        Ok(Self {
            client: ExportClient::new(connection, options)?,
            minify_resources: false,
        })
    }

    /// Create a manager from the `[server]` configuration section
    pub fn from_config(server: &ServerConfig) -> Result<Self> {
        let options = TransportOptions {
            tls_verify: server.tls_verify,
            timeout: server.timeout_seconds.map(Duration::from_secs),
        };
        Ok(Self::with_options(server.connection(), &options)?
            .with_minify_resources(server.minify_resources))
    }

    /// Ask the server to minify chart resources
    pub fn with_minify_resources(mut self, minify_resources: bool) -> Self {
        self.minify_resources = minify_resources;
        self
    }

    pub fn connection(&self) -> &ConnectionConfig {
        self.client.connection()
    }

    /// Export and write the result into `output_dir`
    ///
    /// With `unzip` the returned paths are the extracted members in archive
    /// order; without it, the single path of the kept archive.
    pub async fn export(
        &self,
        config: &ExportConfig,
        output_dir: &Path,
        unzip: bool,
        export_bulk: bool,
    ) -> Result<Vec<PathBuf>> {
        let started = Instant::now();
        log_export_start!(self.connection(), "disk");

        let archive = self.fetch(config, export_bulk).await?;
        let output_dir = output_dir.to_path_buf();
        let paths = tokio::task::spawn_blocking(move || {
            deliver_to_disk(&archive, &output_dir, unzip)
        })
        .await??;

        log_export_complete!(paths.len(), started.elapsed());
        Ok(paths)
    }

    /// Export and return the archive members keyed by name
    pub async fn export_as_stream(
        &self,
        config: &ExportConfig,
        export_bulk: bool,
    ) -> Result<BTreeMap<String, Vec<u8>>> {
        let started = Instant::now();
        log_export_start!(self.connection(), "memory");

        let archive = self.fetch(config, export_bulk).await?;
        let contents = tokio::task::spawn_blocking(move || deliver_to_memory(&archive)).await??;

        log_export_complete!(contents.len(), started.elapsed());
        Ok(contents)
    }

    /// Export and upload the archive's files to a remote destination
    ///
    /// Directory members are not uploaded.
    ///
    /// Per-file upload failures are in the returned report; the call only
    /// fails when the export fails or the destination cannot be used at all.
    pub async fn export_to(
        &self,
        config: &ExportConfig,
        export_bulk: bool,
        destination: &dyn RemoteDestination,
    ) -> Result<UploadReport> {
        let started = Instant::now();
        log_export_start!(self.connection(), destination.name());

        let archive = self.fetch(config, export_bulk).await?;
        let files =
            tokio::task::spawn_blocking(move || deliver_to_memory_files(&archive)).await??;

        let report = destination.deliver(&files).await?;

        log_export_complete!(report.success_count(), started.elapsed());
        Ok(report)
    }

    async fn fetch(&self, config: &ExportConfig, export_bulk: bool) -> Result<Vec<u8>> {
        self.client
            .send(config, self.minify_resources, export_bulk)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::exporter::EXPORT_API_PATH;
    use crate::core::delivery::test_support::build_archive;
    use crate::domain::{ChartexError, ExportedFile, TransportError};
    use async_trait::async_trait;
    use std::net::SocketAddr;
    use std::sync::Mutex;
    use tempfile::TempDir;

    fn manager_for(server: &mockito::ServerGuard) -> ExportManager {
        let addr: SocketAddr = server.host_with_port().parse().unwrap();
        ExportManager::new(ConnectionConfig::new(addr.ip().to_string(), addr.port(), false)).unwrap()
    }

    fn png_config() -> ExportConfig {
        let mut config = ExportConfig::new();
        config.set("type", "png");
        config
    }

    #[derive(Default)]
    struct RecordingDestination {
        received: Mutex<Vec<ExportedFile>>,
    }

    #[async_trait]
    impl RemoteDestination for RecordingDestination {
        fn name(&self) -> &str {
            "recording"
        }

        async fn deliver(&self, files: &[ExportedFile]) -> Result<UploadReport> {
            let mut report = UploadReport::new(self.name());
            for file in files {
                report.record_success(&file.name);
            }
            self.received.lock().unwrap().extend_from_slice(files);
            Ok(report)
        }
    }

    #[tokio::test]
    async fn test_export_to_disk() {
        let mut server = mockito::Server::new_async().await;
        let archive = build_archive(&[("chart-1.png", "one"), ("chart-2.png", "two")]);
        let _mock = server
            .mock("POST", EXPORT_API_PATH)
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let dir = TempDir::new().unwrap();
        let paths = manager_for(&server)
            .export(&png_config(), dir.path(), true, true)
            .await
            .unwrap();

        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.exists()));
    }

    #[tokio::test]
    async fn test_export_as_stream() {
        let mut server = mockito::Server::new_async().await;
        let archive = build_archive(&[("chart.svg", "<svg/>")]);
        let _mock = server
            .mock("POST", EXPORT_API_PATH)
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let contents = manager_for(&server)
            .export_as_stream(&png_config(), false)
            .await
            .unwrap();

        assert_eq!(contents.len(), 1);
        assert_eq!(contents["chart.svg"], b"<svg/>");
    }

    #[tokio::test]
    async fn test_export_to_destination() {
        let mut server = mockito::Server::new_async().await;
        let archive = build_archive(&[("a.png", "a"), ("b.png", "b")]);
        let _mock = server
            .mock("POST", EXPORT_API_PATH)
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let destination = RecordingDestination::default();
        let report = manager_for(&server)
            .export_to(&png_config(), true, &destination)
            .await
            .unwrap();

        assert!(report.is_successful());
        assert_eq!(report.total(), 2);
        let received = destination.received.lock().unwrap();
        assert_eq!(received[0].name, "a.png");
        assert_eq!(received[1].content, b"b");
    }

    #[tokio::test]
    async fn test_directory_members_are_not_uploaded() {
        let mut server = mockito::Server::new_async().await;
        let archive = build_archive(&[("charts/", ""), ("charts/a.png", "a")]);
        let _mock = server
            .mock("POST", EXPORT_API_PATH)
            .with_status(200)
            .with_body(archive)
            .create_async()
            .await;

        let destination = RecordingDestination::default();
        let report = manager_for(&server)
            .export_to(&png_config(), true, &destination)
            .await
            .unwrap();

        assert!(report.is_successful());
        assert_eq!(report.total(), 1);
        let received = destination.received.lock().unwrap();
        let names: Vec<&str> = received.iter().map(|f| f.name.as_str()).collect();
        assert_eq!(names, vec!["charts/a.png"]);
    }

    #[tokio::test]
    async fn test_server_error_skips_delivery() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("POST", EXPORT_API_PATH)
            .with_status(400)
            .with_body("Invalid chart configuration")
            .create_async()
            .await;

        let destination = RecordingDestination::default();
        let result = manager_for(&server)
            .export_to(&png_config(), true, &destination)
            .await;

        assert!(matches!(
            result,
            Err(ChartexError::Transport(TransportError::ServerError { status: 400, .. }))
        ));
        assert!(destination.received.lock().unwrap().is_empty());
    }

    #[test]
    fn test_from_config() {
        let server = ServerConfig {
            host: "charts.internal".to_string(),
            port: 8443,
            secure: true,
            minify_resources: true,
            timeout_seconds: Some(30),
            ..Default::default()
        };

        let manager = ExportManager::from_config(&server).unwrap();

        assert_eq!(manager.connection().to_string(), "https://charts.internal:8443");
        assert!(manager.minify_resources);
    }
}
