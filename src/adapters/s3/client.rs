//! Object storage client
//!
//! The uploader only needs three operations: list buckets, look up a
//! bucket's region and put an object. They are expressed as the
//! [`ObjectStorageClient`] trait; [`AwsS3Connector`] provides region-bound
//! clients backed by the AWS SDK.

use crate::config::{S3Config, SecretString};
use crate::domain::{Result, StorageError};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use secrecy::ExposeSecret;

/// Region reported for buckets with an empty location constraint
const US_EAST_1: &str = "us-east-1";

/// Object storage operations used by the uploader
#[async_trait]
pub trait ObjectStorageClient: Send + Sync {
    /// Names of every bucket visible to the credentials
    async fn list_buckets(&self) -> Result<Vec<String>>;

    /// Region the bucket lives in
    async fn bucket_region(&self, bucket: &str) -> Result<String>;

    /// Store `body` under `key`
    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()>;
}

/// Builds clients bound to a region
///
/// Puts must go through a client bound to the bucket's own region, so the
/// uploader reconnects once the region is known.
pub trait ObjectStorageConnector: Send + Sync {
    fn connect(&self, region: &str) -> Result<Box<dyn ObjectStorageClient>>;
}

/// Connector producing AWS SDK clients with static credentials
#[derive(Clone)]
pub struct AwsS3Connector {
    access_key_id: String,
    secret_access_key: SecretString,
    endpoint: Option<String>,
    force_path_style: bool,
}

impl AwsS3Connector {
    /// Create a connector from an access key pair
    pub fn new(access_key_id: impl Into<String>, secret_access_key: SecretString) -> Self {
        Self {
            access_key_id: access_key_id.into(),
            secret_access_key,
            endpoint: None,
            force_path_style: false,
        }
    }

    /// Create a connector from configuration
    pub fn from_config(config: &S3Config) -> Self {
        Self {
            access_key_id: config.access_key_id.clone(),
            secret_access_key: config.secret_access_key.clone(),
            endpoint: config.endpoint.clone(),
            force_path_style: config.force_path_style,
        }
    }

    /// Use a custom endpoint (MinIO or other S3-compatible services)
    pub fn with_endpoint(mut self, endpoint: impl Into<String>, force_path_style: bool) -> Self {
        self.endpoint = Some(endpoint.into());
        self.force_path_style = force_path_style;
        self
    }
}

impl std::fmt::Debug for AwsS3Connector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AwsS3Connector")
            .field("access_key_id", &self.access_key_id)
            .field("endpoint", &self.endpoint)
            .field("force_path_style", &self.force_path_style)
            .finish()
    }
}

impl ObjectStorageConnector for AwsS3Connector {
    fn connect(&self, region: &str) -> Result<Box<dyn ObjectStorageClient>> {
        if region.is_empty() {
            return Err(StorageError::ClientConfig("region cannot be empty".to_string()).into());
        }

        let credentials = Credentials::new(
            self.access_key_id.clone(),
            self.secret_access_key.expose_secret().as_str().to_string(),
            None,
            None,
            "chartex",
        );

        let mut builder = aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new(region.to_string()))
            .credentials_provider(credentials);

        if let Some(ref endpoint) = self.endpoint {
            builder = builder.endpoint_url(endpoint.clone());
        }

        if self.force_path_style {
            builder = builder.force_path_style(true);
        }

        tracing::debug!(region = %region, "Creating object storage client");

        Ok(Box::new(AwsS3Client {
            client: aws_sdk_s3::Client::from_conf(builder.build()),
        }))
    }
}

/// AWS SDK backed client bound to one region
pub struct AwsS3Client {
    client: aws_sdk_s3::Client,
}

#[async_trait]
impl ObjectStorageClient for AwsS3Client {
    async fn list_buckets(&self) -> Result<Vec<String>> {
        let output = self
            .client
            .list_buckets()
            .send()
            .await
            .map_err(|e| StorageError::ListBucketsFailed(DisplayErrorContext(&e).to_string()))?;

        Ok(output
            .buckets()
            .iter()
            .filter_map(|bucket| bucket.name().map(str::to_string))
            .collect())
    }

    async fn bucket_region(&self, bucket: &str) -> Result<String> {
        let output = self
            .client
            .get_bucket_location()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| StorageError::RegionLookupFailed {
                bucket: bucket.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;

        Ok(normalize_location(
            output.location_constraint().map(|c| c.as_str()),
        ))
    }

    async fn put_object(&self, bucket: &str, key: &str, body: Vec<u8>) -> Result<()> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StorageError::PutFailed {
                key: key.to_string(),
                message: DisplayErrorContext(&e).to_string(),
            })?;
        Ok(())
    }
}

/// Maps a GetBucketLocation constraint to a region name
///
/// Buckets in us-east-1 report no constraint; old buckets in eu-west-1
/// report the legacy value `EU`.
pub fn normalize_location(constraint: Option<&str>) -> String {
    match constraint {
        None | Some("") => US_EAST_1.to_string(),
        Some("EU") => "eu-west-1".to_string(),
        Some(region) => region.to_string(),
    }
}
