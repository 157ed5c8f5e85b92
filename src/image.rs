//! Image attachments: encoding for the model and scoped display handles.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::error::ChatError;
use crate::types::{ImagePayload, ImageRef};

/// A user-selected image file, not yet read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageAttachment {
    path: PathBuf,
}

impl ImageAttachment {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.display().to_string())
    }

    /// Read the file and base64 encode it with its media type.
    pub async fn encode(&self) -> Result<ImagePayload, ChatError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|e| {
            ChatError::ImageEncoding(format!("{}: {}", self.path.display(), e))
        })?;

        let mime_type = mime_from_extension(&self.path)
            .or_else(|| sniff_mime(&bytes))
            .ok_or_else(|| {
                ChatError::ImageEncoding(format!(
                    "{} is not a supported image type",
                    self.path.display()
                ))
            })?;

        log::debug!(
            "Encoded {} ({} bytes, {})",
            self.file_name(),
            bytes.len(),
            mime_type
        );

        Ok(ImagePayload {
            data: STANDARD.encode(&bytes),
            mime_type: mime_type.to_string(),
        })
    }
}

fn mime_from_extension(path: &Path) -> Option<&'static str> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    match ext.as_str() {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "webp" => Some("image/webp"),
        "gif" => Some("image/gif"),
        "heic" => Some("image/heic"),
        "heif" => Some("image/heif"),
        _ => None,
    }
}

fn sniff_mime(bytes: &[u8]) -> Option<&'static str> {
    if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
        Some("image/png")
    } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
        Some("image/jpeg")
    } else if bytes.starts_with(b"GIF8") {
        Some("image/gif")
    } else if bytes.len() >= 12 && &bytes[0..4] == b"RIFF" && &bytes[8..12] == b"WEBP" {
        Some("image/webp")
    } else {
        None
    }
}

/// Registry of images currently shown in the conversation.
///
/// Cheap to clone; clones share the same table.
#[derive(Debug, Clone, Default)]
pub struct DisplayHandles {
    live: Arc<Mutex<HashMap<u64, PathBuf>>>,
    next_id: Arc<AtomicU64>,
}

impl DisplayHandles {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `attachment` for display. The slot is released when the
    /// returned handle is dropped.
    pub fn acquire(&self, attachment: &ImageAttachment) -> DisplayHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut live) = self.live.lock() {
            live.insert(id, attachment.path().to_path_buf());
        }
        log::trace!("Acquired display handle {} for {}", id, attachment.file_name());

        DisplayHandle {
            image: ImageRef {
                handle: id,
                file_name: attachment.file_name(),
            },
            live: Arc::clone(&self.live),
        }
    }

    pub fn live_count(&self) -> usize {
        self.live.lock().map(|live| live.len()).unwrap_or(0)
    }

    pub fn is_live(&self, handle: u64) -> bool {
        self.live
            .lock()
            .map(|live| live.contains_key(&handle))
            .unwrap_or(false)
    }
}

/// Scoped display slot for one attached image
#[derive(Debug)]
pub struct DisplayHandle {
    image: ImageRef,
    live: Arc<Mutex<HashMap<u64, PathBuf>>>,
}

impl DisplayHandle {
    pub fn image_ref(&self) -> ImageRef {
        self.image.clone()
    }
}

impl Drop for DisplayHandle {
    fn drop(&mut self) {
        if let Ok(mut live) = self.live.lock() {
            live.remove(&self.image.handle);
        }
        log::trace!("Released display handle {}", self.image.handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[tokio::test]
    async fn test_encode_png_by_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("leaf.PNG");
        std::fs::write(&path, PNG_HEADER).unwrap();

        let payload = ImageAttachment::new(&path).encode().await.unwrap();
        assert_eq!(payload.mime_type, "image/png");
        assert_eq!(payload.data, STANDARD.encode(PNG_HEADER));
    }

    #[tokio::test]
    async fn test_encode_sniffs_unknown_extension() {
        let mut file = tempfile::Builder::new().suffix(".bin").tempfile().unwrap();
        file.write_all(&[0xFF, 0xD8, 0xFF, 0xE0, 0x00]).unwrap();

        let payload = ImageAttachment::new(file.path()).encode().await.unwrap();
        assert_eq!(payload.mime_type, "image/jpeg");
    }

    #[tokio::test]
    async fn test_encode_failures() {
        let missing = ImageAttachment::new("/definitely/not/here.jpg");
        assert!(matches!(
            missing.encode().await,
            Err(ChatError::ImageEncoding(_))
        ));

        let mut text = tempfile::Builder::new().suffix(".txt").tempfile().unwrap();
        text.write_all(b"not an image").unwrap();
        match ImageAttachment::new(text.path()).encode().await {
            Err(ChatError::ImageEncoding(msg)) => assert!(msg.contains("not a supported image")),
            other => panic!("expected image error, got {:?}", other),
        }
    }

    #[test]
    fn test_display_handle_released_on_drop() {
        let handles = DisplayHandles::new();
        let attachment = ImageAttachment::new("/tmp/coffee.jpg");

        let first = handles.acquire(&attachment);
        let second = handles.acquire(&attachment);
        assert_ne!(first.image_ref().handle, second.image_ref().handle);
        assert_eq!(first.image_ref().file_name, "coffee.jpg");
        assert_eq!(handles.live_count(), 2);

        let id = first.image_ref().handle;
        drop(first);
        assert!(!handles.is_live(id));
        assert_eq!(handles.live_count(), 1);

        drop(second);
        assert_eq!(handles.live_count(), 0);
    }
}
