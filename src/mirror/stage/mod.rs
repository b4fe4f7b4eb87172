//! Download media into a scoped temp file and load it into memory.

use crate::errors::GroupSyncError;
use crate::mirror::classify::MediaDescriptor;
use crate::transport::Transport;
use crate::utils::media::extension_from_mime;
use crate::utils::{ensure_dir, safe_filename};
use futures_util::StreamExt;
use std::io;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use tracing::{debug, info, warn};

/// A downloaded attachment. The backing file is removed when this drops.
#[derive(Debug)]
pub struct StagedMedia {
    path: PathBuf,
    pub data: Vec<u8>,
}

impl Drop for StagedMedia {
    fn drop(&mut self) {
        remove_staged_file(&self.path);
    }
}

fn remove_staged_file(path: &Path) {
    match std::fs::remove_file(path) {
        Ok(()) => debug!("removed temp file {}", path.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove temp file {}: {}", path.display(), e),
    }
}

/// Create the temp directory. Called once at startup.
pub fn prepare_temp_dir(dir: &Path) -> Result<(), GroupSyncError> {
    ensure_dir(dir)?;
    Ok(())
}

/// Remove the temp directory and anything left in it.
pub async fn remove_temp_dir(dir: &Path) {
    match tokio::fs::remove_dir_all(dir).await {
        Ok(()) => info!("removed temp directory {}", dir.display()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => warn!("failed to remove temp directory {}: {}", dir.display(), e),
    }
}

pub struct MediaStager {
    temp_dir: PathBuf,
    max_bytes: usize,
}

impl MediaStager {
    pub fn new(temp_dir: impl Into<PathBuf>, max_bytes: usize) -> Self {
        Self {
            temp_dir: temp_dir.into(),
            max_bytes,
        }
    }

    pub fn path_for(&self, event_id: &str, media: &MediaDescriptor) -> PathBuf {
        self.temp_dir.join(format!(
            "{}.{}",
            safe_filename(event_id),
            extension_from_mime(media.mime_type.as_deref())
        ))
    }

    /// Stream the attachment of `event_id` to disk, then read it back.
    ///
    /// On any failure the partial file is gone by the time this returns.
    pub async fn stage(
        &self,
        event_id: &str,
        media: &MediaDescriptor,
        transport: &dyn Transport,
    ) -> Result<StagedMedia, GroupSyncError> {
        let mut staged = StagedMedia {
            path: self.path_for(event_id, media),
            data: Vec::new(),
        };
        if let Some(len) = media.byte_length {
            info!(
                "downloading {} ({:.2} MB) to {}",
                media.kind,
                len as f64 / 1024.0 / 1024.0,
                staged.path.display()
            );
        }

        let written = self.download_to(&staged.path, event_id, media, transport).await?;
        staged.data = tokio::fs::read(&staged.path).await.map_err(|e| {
            GroupSyncError::Download(format!(
                "cannot read back {}: {}",
                staged.path.display(),
                e
            ))
        })?;
        debug!("staged {} bytes for {}", written, event_id);
        Ok(staged)
    }

    async fn download_to(
        &self,
        path: &Path,
        event_id: &str,
        media: &MediaDescriptor,
        transport: &dyn Transport,
    ) -> Result<usize, GroupSyncError> {
        let io_err = |e: io::Error| {
            GroupSyncError::Download(format!("cannot write {}: {}", path.display(), e))
        };

        let mut stream = transport.open_media(event_id, media).await?;
        let mut file = tokio::fs::File::create(path).await.map_err(io_err)?;
        let mut written = 0usize;
        while let Some(chunk) = stream.next().await {
            let chunk = chunk?;
            written += chunk.len();
            if written > self.max_bytes {
                return Err(GroupSyncError::Download(format!(
                    "media exceeds {} byte limit",
                    self.max_bytes
                )));
            }
            file.write_all(&chunk).await.map_err(io_err)?;
        }
        file.flush().await.map_err(io_err)?;
        file.sync_all().await.map_err(io_err)?;
        Ok(written)
    }
}
