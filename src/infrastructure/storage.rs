use crate::config::CloudinaryConfig;
use crate::domain::artifacts::{ArtifactRef, ArtifactStore};
use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use std::path::PathBuf;
use std::time::Duration;
use time::OffsetDateTime;

const UPLOAD_TIMEOUT_SECS: u64 = 30;

/// Signed raw-file uploads to Cloudinary.
pub struct CloudinaryUploader {
    config: CloudinaryConfig,
    client: reqwest::Client,
}

#[derive(Debug, Deserialize)]
struct UploadResponse {
    secure_url: String,
}

/// Hex SHA-256 over the alphabetically sorted `key=value` pairs followed by the secret.
pub fn sign_params(params: &[(&str, &str)], secret: &str) -> String {
    let mut sorted = params.to_vec();
    sorted.sort_by(|a, b| a.0.cmp(b.0));
    let joined = sorted
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect::<Vec<_>>()
        .join("&");

    let mut hasher = Sha256::new();
    hasher.update(joined.as_bytes());
    hasher.update(secret.as_bytes());
    hex::encode(hasher.finalize())
}

impl CloudinaryUploader {
    pub fn new(config: CloudinaryConfig) -> Result<Self, anyhow::Error> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(UPLOAD_TIMEOUT_SECS))
            .build()?;
        Ok(Self { config, client })
    }

    pub async fn upload(&self, name: &str, bytes: Vec<u8>) -> Result<String, anyhow::Error> {
        let public_id = name.trim_end_matches(".pdf").to_string();
        let timestamp = OffsetDateTime::now_utc().unix_timestamp().to_string();
        let signature = sign_params(
            &[
                ("folder", self.config.folder.as_str()),
                ("public_id", public_id.as_str()),
                ("timestamp", timestamp.as_str()),
            ],
            &self.config.api_secret,
        );

        let file = reqwest::multipart::Part::bytes(bytes)
            .file_name(name.to_string())
            .mime_str("application/pdf")?;
        let form = reqwest::multipart::Form::new()
            .part("file", file)
            .text("api_key", self.config.api_key.clone())
            .text("folder", self.config.folder.clone())
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("signature_algorithm", "sha256")
            .text("signature", signature);

        let url = format!(
            "https://api.cloudinary.com/v1_1/{}/raw/upload",
            self.config.cloud_name
        );
        let response = self.client.post(&url).multipart(form).send().await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("upload rejected with {}: {}", status, body);
        }

        let uploaded: UploadResponse = response.json().await?;
        Ok(uploaded.secure_url)
    }
}

/// Writes artifacts under a local directory and optionally mirrors them remotely.
pub struct LocalArtifactStore {
    dir: PathBuf,
    remote: Option<CloudinaryUploader>,
}

impl LocalArtifactStore {
    pub fn new(dir: impl Into<PathBuf>, remote: Option<CloudinaryUploader>) -> Self {
        Self {
            dir: dir.into(),
            remote,
        }
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStore {
    async fn store(&self, name: &str, bytes: Vec<u8>) -> Result<ArtifactRef, anyhow::Error> {
        tokio::fs::create_dir_all(&self.dir).await?;
        let path = self.dir.join(name);
        tokio::fs::write(&path, &bytes).await?;
        tracing::debug!(path = %path.display(), "artifact written");

        // remote mirroring is best-effort; the local copy is authoritative
        let remote_url = match &self.remote {
            Some(remote) => match remote.upload(name, bytes).await {
                Ok(url) => Some(url),
                Err(e) => {
                    tracing::warn!(error = %e, name, "remote upload failed; keeping local copy only");
                    None
                }
            },
            None => None,
        };

        Ok(ArtifactRef {
            local_path: Some(path.to_string_lossy().into_owned()),
            remote_url,
        })
    }

    async fn read_local(&self, path: &str) -> Result<Option<Vec<u8>>, anyhow::Error> {
        match tokio::fs::read(path).await {
            Ok(bytes) => Ok(Some(bytes)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}
