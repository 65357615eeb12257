//! Object storage uploader

use super::client::{AwsS3Connector, ObjectStorageConnector};
use super::DEFAULT_PROBE_REGION;
use crate::adapters::destination::{RemoteDestination, UploadReport};
use crate::config::S3Config;
use crate::domain::{ExportedFile, Result, StorageError};
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Uploads exported files into an existing bucket
///
/// The bucket must already exist: it is looked up among the account's
/// buckets (case-sensitive) and a missing bucket fails the call before any
/// upload. Each file is stored under its archive-relative name.
///
/// # Example
///
/// ```no_run
/// use chartex::adapters::s3::{AwsS3Connector, ObjectStoreUploader};
/// use chartex::config::secret_string;
/// use chartex::domain::ExportedFile;
/// use std::sync::Arc;
///
/// # async fn example() -> chartex::domain::Result<()> {
/// let connector = AwsS3Connector::new("AKIA...", secret_string("secret".to_string()));
/// let uploader = ObjectStoreUploader::new("chart-exports", Arc::new(connector));
///
/// let files = vec![ExportedFile::new("chart.png", vec![0x89, b'P', b'N', b'G'])];
/// let report = uploader.upload(&files).await?;
/// report.log_summary();
/// # Ok(())
/// # }
/// ```
pub struct ObjectStoreUploader {
    bucket: String,
    probe_region: String,
    connector: Arc<dyn ObjectStorageConnector>,
}

impl ObjectStoreUploader {
    /// Create an uploader for `bucket`
    pub fn new(bucket: impl Into<String>, connector: Arc<dyn ObjectStorageConnector>) -> Self {
        Self {
            bucket: bucket.into(),
            probe_region: DEFAULT_PROBE_REGION.to_string(),
            connector,
        }
    }

    /// Create an uploader backed by the AWS SDK from configuration
    pub fn from_config(config: &S3Config) -> Self {
        Self::new(
            config.bucket.clone(),
            Arc::new(AwsS3Connector::from_config(config)),
        )
        .with_probe_region(config.probe_region.clone())
    }

    /// Region used for the initial bucket listing
    pub fn with_probe_region(mut self, region: impl Into<String>) -> Self {
        self.probe_region = region.into();
        self
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }

    /// Upload every file into the bucket
    ///
    /// # Errors
    ///
    /// - [`StorageError::ListBucketsFailed`] if the buckets cannot be listed
    /// - [`StorageError::BucketNotFound`] if the bucket does not exist; no
    ///   object is written
    /// - [`StorageError::RegionLookupFailed`] if the bucket region is unknown
    ///
    /// Failed puts are recorded in the report and do not stop the batch.
    pub async fn upload(&self, files: &[ExportedFile]) -> Result<UploadReport> {
        let started = Instant::now();

        let probe = self.connector.connect(&self.probe_region)?;
        let buckets = probe.list_buckets().await?;

        if !buckets.iter().any(|name| name == &self.bucket) {
            tracing::error!(
                bucket = %self.bucket,
                visible_buckets = buckets.len(),
                "Bucket does not exist, nothing uploaded"
            );
            return Err(StorageError::BucketNotFound(self.bucket.clone()).into());
        }

        let region = probe.bucket_region(&self.bucket).await?;
        drop(probe);

        tracing::info!(
            bucket = %self.bucket,
            region = %region,
            file_count = files.len(),
            "Uploading exported files to object storage"
        );
        let client = self.connector.connect(&region)?;

        let mut report = UploadReport::new(self.name());
        for file in files {
            match client
                .put_object(&self.bucket, &file.name, file.content.clone())
                .await
            {
                Ok(()) => {
                    tracing::debug!(key = %file.name, bytes = file.len(), "Object stored");
                    report.record_success(&file.name);
                }
                Err(e) => {
                    tracing::warn!(key = %file.name, error = %e, "Object upload failed");
                    report.record_failure(&file.name, e);
                }
            }
        }

        Ok(report.with_duration(started.elapsed()))
    }
}

#[async_trait]
impl RemoteDestination for ObjectStoreUploader {
    fn name(&self) -> &str {
        "s3"
    }

    async fn deliver(&self, files: &[ExportedFile]) -> Result<UploadReport> {
        self.upload(files).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::s3::client::ObjectStorageClient;
    use crate::domain::ChartexError;
    use std::sync::Mutex;

    /// Records every call made through the clients it hands out
    #[derive(Default)]
    struct FakeStorage {
        buckets: Vec<String>,
        region: String,
        failing_keys: Vec<String>,
        connected_regions: Mutex<Vec<String>>,
        puts: Mutex<Vec<(String, String, String, Vec<u8>)>>,
    }

    struct FakeClient {
        storage: Arc<FakeStorage>,
        region: String,
    }

    struct FakeConnector(Arc<FakeStorage>);

    impl ObjectStorageConnector for FakeConnector {
        fn connect(&self, region: &str) -> Result<Box<dyn ObjectStorageClient>> {
            self.0
                .connected_regions
                .lock()
                .unwrap()
                .push(region.to_string());
            Ok(Box::new(FakeClient {
                storage: Arc::clone(&self.0),
                region: region.to_string(),
            }))
        }
    }

    #[async_trait]
    impl ObjectStorageClient for FakeClient {
        async fn list_buckets(&self) -> Result<Vec<String>> {
            Ok(self.storage.buckets.clone())
        }

        async fn bucket_region(&self, _bucket: &str) -> Result<String> {
            Ok(self.storage.region.clone())
        }

        async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
            if self.storage.failing_keys.iter().any(|k| k == key) {
                return Err(StorageError::PutFailed {
                    key: key.to_string(),
                    message: "AccessDenied".to_string(),
                }
                .into());
            }
            self.storage.puts.lock().unwrap().push((
                self.region.clone(),
                bucket.to_string(),
                key.to_string(),
                body,
            ));
            Ok(())
        }
    }

    fn uploader(storage: &Arc<FakeStorage>, bucket: &str) -> ObjectStoreUploader {
        ObjectStoreUploader::new(bucket, Arc::new(FakeConnector(Arc::clone(storage))))
    }

    fn files() -> Vec<ExportedFile> {
        vec![
            ExportedFile::new("chart-1.png", b"first".to_vec()),
            ExportedFile::new("chart-2.png", b"second".to_vec()),
        ]
    }

    #[tokio::test]
    async fn test_missing_bucket_performs_no_puts() {
        let storage = Arc::new(FakeStorage {
            buckets: vec!["other".to_string(), "Charts".to_string()],
            region: "eu-central-1".to_string(),
            ..Default::default()
        });

        let result = uploader(&storage, "charts").upload(&files()).await;

        assert!(matches!(
            result,
            Err(ChartexError::Storage(StorageError::BucketNotFound(ref name))) if name == "charts"
        ));
        assert!(storage.puts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_puts_go_through_bucket_region_client() {
        let storage = Arc::new(FakeStorage {
            buckets: vec!["charts".to_string()],
            region: "eu-central-1".to_string(),
            ..Default::default()
        });

        let report = uploader(&storage, "charts").upload(&files()).await.unwrap();

        assert!(report.is_successful());
        assert_eq!(report.success_count(), 2);
        assert_eq!(
            *storage.connected_regions.lock().unwrap(),
            vec!["us-west-2".to_string(), "eu-central-1".to_string()]
        );

        let puts = storage.puts.lock().unwrap();
        assert_eq!(puts.len(), 2);
        assert_eq!(
            puts[0],
            (
                "eu-central-1".to_string(),
                "charts".to_string(),
                "chart-1.png".to_string(),
                b"first".to_vec()
            )
        );
        assert_eq!(puts[1].2, "chart-2.png");
    }

    #[tokio::test]
    async fn test_failed_put_does_not_stop_batch() {
        let storage = Arc::new(FakeStorage {
            buckets: vec!["charts".to_string()],
            region: "us-east-1".to_string(),
            failing_keys: vec!["chart-1.png".to_string()],
            ..Default::default()
        });

        let report = uploader(&storage, "charts").upload(&files()).await.unwrap();

        assert_eq!(report.failure_count(), 1);
        assert_eq!(report.success_count(), 1);
        assert_eq!(report.outcomes[0].name, "chart-1.png");
        assert!(!report.outcomes[0].is_uploaded());
        assert_eq!(storage.puts.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_custom_probe_region() {
        let storage = Arc::new(FakeStorage {
            buckets: vec!["charts".to_string()],
            region: "us-east-1".to_string(),
            ..Default::default()
        });

        uploader(&storage, "charts")
            .with_probe_region("ap-south-1")
            .deliver(&[])
            .await
            .unwrap();

        assert_eq!(storage.connected_regions.lock().unwrap()[0], "ap-south-1");
    }
}
