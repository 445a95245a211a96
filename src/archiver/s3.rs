//! Upload the source PDF to an S3 bucket.

use super::Archiver;
use crate::settings::S3Settings;
use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::config::{BehaviorVersion, Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::{Client as S3Client, Config};
use std::path::Path;

const CREDENTIALS_PROVIDER: &str = "pdfsprc";

pub struct S3Archiver {
    client: S3Client,
    bucket: String,
    prefix: String,
}

impl S3Archiver {
    pub fn new(settings: S3Settings) -> Self {
        let client = S3Client::from_conf(client_config(&settings));
        S3Archiver {
            client,
            bucket: settings.bucket,
            prefix: settings.prefix,
        }
    }

    /// Object key for `source`: the configured prefix plus the file name.
    pub fn object_key(&self, source: &Path) -> String {
        let name = source
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("{}{}", self.prefix, name)
    }
}

/// Where requests go: AWS virtual-hosted by default, path-style on a
/// custom endpoint, which S3-compatible stores expect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Addressing {
    pub endpoint_url: Option<String>,
    pub force_path_style: bool,
}

impl Addressing {
    pub fn from_settings(settings: &S3Settings) -> Self {
        Addressing {
            endpoint_url: settings.endpoint.clone(),
            force_path_style: settings.endpoint.is_some(),
        }
    }
}

/// SDK config from the `[archiver]` table.
pub fn client_config(settings: &S3Settings) -> Config {
    let credentials = Credentials::new(
        settings.access_key_id.clone(),
        settings.secret_access_key.clone(),
        None,
        None,
        CREDENTIALS_PROVIDER,
    );

    let mut builder = Config::builder()
        .behavior_version(BehaviorVersion::latest())
        .credentials_provider(credentials)
        .region(Region::new(settings.region.clone()));

    let addressing = Addressing::from_settings(settings);
    if let Some(endpoint) = addressing.endpoint_url {
        builder = builder.endpoint_url(endpoint);
    }
    builder.force_path_style(addressing.force_path_style).build()
}

#[async_trait]
impl Archiver for S3Archiver {
    async fn archive(&self, source: &Path) -> Result<()> {
        let key = self.object_key(source);
        let body = ByteStream::from_path(source)
            .await
            .with_context(|| format!("Failed to read {}", source.display()))?;

        tracing::info!(bucket = %self.bucket, key = %key, "uploading source");
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(&key)
            .content_type("application/pdf")
            .body(body)
            .send()
            .await
            .with_context(|| {
                format!(
                    "Failed to upload {} to s3://{}/{}",
                    source.display(),
                    self.bucket,
                    key
                )
            })?;

        Ok(())
    }

    fn name(&self) -> &'static str {
        "s3"
    }
}
