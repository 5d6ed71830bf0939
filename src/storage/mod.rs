use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use mime_guess::Mime;
use thiserror::Error;
use tokio::{
    fs::OpenOptions,
    io::{AsyncWrite, AsyncWriteExt},
};
use tracing::warn;
use uuid::Uuid;

/// Public path prefix under which stored images are served.
pub const FILES_ROUTE_PREFIX: &str = "/api/storage/files/";

#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
    max_bytes: usize,
    public_base_url: Option<String>,
}

#[derive(Debug, Clone)]
pub struct StoredImage {
    pub filename: String,
    pub size: usize,
}

impl StoredImage {
    pub fn url(&self) -> String {
        format!("{FILES_ROUTE_PREFIX}{}", self.filename)
    }
}

#[derive(Error, Debug, PartialEq, Eq)]
pub enum UploadRejection {
    #[error("Please upload an image file.")]
    NotAnImage,
    #[error("Image file is too large. Please upload an image under {limit_mb}MB.")]
    TooLarge { limit_mb: usize },
    #[error("Uploaded file is empty.")]
    Empty,
}

impl StorageService {
    pub async fn new(root: impl AsRef<Path>, max_bytes: usize) -> Result<Self> {
        let root = root.as_ref().to_path_buf();
        tokio::fs::create_dir_all(&root)
            .await
            .with_context(|| format!("Failed to create storage dir at {}", root.display()))?;

        Ok(Self {
            root,
            max_bytes,
            public_base_url: None,
        })
    }

    /// Absolute URLs under this origin also count as local uploads.
    pub fn with_public_base_url(mut self, base_url: Option<String>) -> Self {
        self.public_base_url = base_url
            .map(|u| u.trim().trim_end_matches('/').to_string())
            .filter(|u| !u.is_empty());
        self
    }

    pub fn max_bytes(&self) -> usize {
        self.max_bytes
    }

    pub fn check_upload(&self, mime: Option<&str>, len: usize) -> Result<(), UploadRejection> {
        let is_image = mime
            .map(|m| m.trim().to_ascii_lowercase().starts_with("image/"))
            .unwrap_or(false);
        if !is_image {
            return Err(UploadRejection::NotAnImage);
        }
        if len == 0 {
            return Err(UploadRejection::Empty);
        }
        if len > self.max_bytes {
            return Err(UploadRejection::TooLarge {
                limit_mb: self.max_bytes.div_ceil(1024 * 1024),
            });
        }
        Ok(())
    }

    /// Writes an already checked upload as `<user_id>-<unix_millis>-<suffix>.<ext>`.
    /// Never replaces an existing file.
    pub async fn save_image(
        &self,
        user_id: &str,
        bytes: &[u8],
        original_name: Option<&str>,
    ) -> Result<StoredImage> {
        let ext = original_name
            .and_then(|name| Path::new(name).extension().and_then(|e| e.to_str()))
            .and_then(clean_extension);

        let suffix = Uuid::new_v4().simple().to_string();
        let stem = format!(
            "{}-{}-{}",
            clean_stem(user_id),
            chrono::Utc::now().timestamp_millis(),
            &suffix[..12]
        );
        let filename = match ext {
            Some(ext) => format!("{stem}.{ext}"),
            None => stem,
        };

        let path = self.root.join(&filename);

        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
            .with_context(|| format!("Failed to create file {}", path.display()))?;
        write_or_discard(file, &path, bytes).await?;

        Ok(StoredImage {
            filename,
            size: bytes.len(),
        })
    }

    /// Returns `None` for unknown or unsafe names.
    pub async fn read_image(&self, filename: &str) -> Option<Vec<u8>> {
        if !is_safe_filename(filename) {
            return None;
        }
        tokio::fs::read(self.root.join(filename)).await.ok()
    }

    /// Maps `/api/storage/files/<name>` to `<name>`. Absolute URLs only match
    /// when they sit under the configured public base URL.
    pub fn local_filename<'a>(&self, url: &'a str) -> Option<&'a str> {
        let path = if url.starts_with('/') {
            url
        } else {
            let base = self.public_base_url.as_deref()?;
            let rest = url.strip_prefix(base)?;
            if !rest.starts_with('/') {
                return None;
            }
            rest
        };
        path.strip_prefix(FILES_ROUTE_PREFIX)
            .filter(|name| is_safe_filename(name))
    }
}

pub fn content_type_for(filename: &str) -> Mime {
    mime_guess::from_path(filename).first_or_octet_stream()
}

/// A partially written upload is removed rather than left on disk.
async fn write_or_discard<W>(mut file: W, path: &Path, bytes: &[u8]) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let written = match file.write_all(bytes).await {
        Ok(()) => file.flush().await,
        Err(err) => Err(err),
    };
    drop(file);

    if let Err(err) = written {
        if let Err(cleanup) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove partial upload {}: {cleanup}", path.display());
        }
        return Err(err).with_context(|| format!("Failed to write file {}", path.display()));
    }
    Ok(())
}

fn is_safe_filename(name: &str) -> bool {
    !name.is_empty() && !name.contains('/') && !name.contains('\\') && !name.contains("..")
}

fn clean_extension(ext: &str) -> Option<String> {
    let filtered: String = ext.chars().filter(|c| c.is_ascii_alphanumeric()).collect();

    if filtered.is_empty() {
        None
    } else {
        Some(filtered.to_lowercase())
    }
}

fn clean_stem(user_id: &str) -> String {
    let filtered: String = user_id
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == '-' || *c == '_')
        .collect();
    if filtered.is_empty() {
        "anonymous".to_string()
    } else {
        filtered
    }
}
