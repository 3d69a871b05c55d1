use anyhow::Result;
use async_trait::async_trait;
use aws_config::Region;
use aws_sdk_s3::config::Credentials;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::types::ObjectCannedAcl;
use bytes::Bytes;
use tracing::info;

use crate::config::Config;

/// Write-only view of the bucket that archives pictures.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn upload(&self, body: Bytes, key: &str) -> Result<()>;
}

/// S3 (or S3-compatible) bucket.
#[derive(Clone)]
pub struct S3Store {
    client: aws_sdk_s3::Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: aws_sdk_s3::Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn upload(&self, body: Bytes, key: &str) -> Result<()> {
        let size = body.len();
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type("image/jpeg")
            .acl(ObjectCannedAcl::PublicRead)
            .send()
            .await
            .map_err(upload_failure)?;

        info!("Uploaded {size} bytes to s3://{}/{}", self.bucket, key);
        Ok(())
    }
}

/// `SdkError` displays only its category ("service error"); keep the whole cause chain.
fn upload_failure<E: std::error::Error>(err: E) -> anyhow::Error {
    anyhow::anyhow!("S3 upload failed: {}", DisplayErrorContext(&err))
}

/// Constructs an S3 client for AWS, or for a custom endpoint (MinIO) when configured.
pub async fn build_s3_client(config: &Config) -> aws_sdk_s3::Client {
    let credentials = Credentials::new(
        &config.aws_access_key_id,
        &config.aws_access_key,
        None,
        None,
        "astro-static",
    );

    let mut loader = aws_config::defaults(aws_config::BehaviorVersion::latest())
        .region(Region::new(config.aws_region.clone()))
        .credentials_provider(credentials);
    if let Some(endpoint) = &config.s3_endpoint {
        loader = loader.endpoint_url(endpoint);
    }
    let s3_config = loader.load().await;

    // Path-style addressing keeps MinIO-style endpoints working.
    let s3_config = aws_sdk_s3::config::Builder::from(&s3_config)
        .force_path_style(config.s3_endpoint.is_some())
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}
