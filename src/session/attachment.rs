//! Pending image attachment
//!
//! At most one image awaits the next turn. Drag-and-drop, clipboard paste,
//! and explicit file pick all normalize to the same acceptance path, which
//! sniffs the format, enforces the backend's size limit, and encodes the
//! payload off the async executor. A new acceptance silently replaces any
//! pending one; the slot is consumed when the turn is built.

use crate::error::{Result, ShopchatError};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use std::path::Path;

/// Raw image size limit; the backend rejects anything larger
pub const MAX_IMAGE_BYTES: usize = 4 * 1024 * 1024;

/// Where an attachment came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttachmentOrigin {
    /// Drag-and-drop
    Drop,
    /// Clipboard paste
    Paste,
    /// Explicit file pick
    Pick,
}

impl fmt::Display for AttachmentOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Drop => write!(f, "drop"),
            Self::Paste => write!(f, "paste"),
            Self::Pick => write!(f, "pick"),
        }
    }
}

/// A transport-ready encoded image
#[derive(Debug, Clone)]
pub struct EncodedImage {
    /// Base64 payload (standard alphabet) for the `image_base64` field
    pub base64: String,
    /// Sniffed media type, e.g. "image/png"
    pub media_type: String,
    /// Where the image came from
    pub origin: AttachmentOrigin,
}

/// One item from a clipboard paste
#[derive(Debug, Clone)]
pub struct ClipboardItem {
    /// Declared media type, e.g. "text/plain" or "image/png"
    pub media_type: String,
    /// Raw payload
    pub data: Vec<u8>,
}

/// Holder for the single pending attachment
#[derive(Debug, Default)]
pub struct AttachmentSlot {
    pending: Option<EncodedImage>,
}

impl AttachmentSlot {
    /// Creates an empty slot
    pub fn new() -> Self {
        Self::default()
    }

    /// The pending attachment, if any
    pub fn pending(&self) -> Option<&EncodedImage> {
        self.pending.as_ref()
    }

    /// Explicit user removal of the pending attachment
    pub fn remove(&mut self) {
        if self.pending.take().is_some() {
            tracing::debug!("Pending attachment removed");
        }
    }

    /// Consumes the pending attachment for an outgoing turn
    pub(crate) fn take(&mut self) -> Option<EncodedImage> {
        self.pending.take()
    }

    /// Accepts raw image bytes from any origin
    ///
    /// Validates and encodes off the executor, then replaces whatever was
    /// pending. Non-image data and oversized payloads are rejected.
    pub async fn accept(&mut self, bytes: Vec<u8>, origin: AttachmentOrigin) -> Result<()> {
        let encoded = encode_image(bytes, origin).await?;
        tracing::debug!(
            "Attached {} image via {} ({} base64 chars)",
            encoded.media_type,
            origin,
            encoded.base64.len()
        );
        self.pending = Some(encoded);
        Ok(())
    }

    /// Accepts an image from a file path (the "file pick" origin)
    pub async fn accept_file(&mut self, path: &Path) -> Result<()> {
        let bytes = tokio::fs::read(path).await.map_err(|e| {
            ShopchatError::Attachment(format!("cannot read {}: {}", path.display(), e))
        })?;
        self.accept(bytes, AttachmentOrigin::Pick).await
    }

    /// Accepts the first image item from a clipboard paste
    ///
    /// Scans the items in order and takes the first whose declared type is
    /// an image, ignoring everything else. Returns Ok(false) when no item
    /// is an image — a silent no-op, not an error.
    pub async fn accept_paste(&mut self, items: &[ClipboardItem]) -> Result<bool> {
        let Some(item) = items.iter().find(|i| i.media_type.starts_with("image/")) else {
            tracing::debug!("Paste contained no image item, ignoring");
            return Ok(false);
        };
        self.accept(item.data.clone(), AttachmentOrigin::Paste)
            .await?;
        Ok(true)
    }
}

/// Validates and base64-encodes raw image bytes
///
/// Format sniffing and encoding run on the blocking pool; this is the
/// attachment path's suspension point.
async fn encode_image(bytes: Vec<u8>, origin: AttachmentOrigin) -> Result<EncodedImage> {
    if bytes.len() > MAX_IMAGE_BYTES {
        return Err(ShopchatError::Attachment(format!(
            "image is {} bytes, limit is {}",
            bytes.len(),
            MAX_IMAGE_BYTES
        ))
        .into());
    }

    let encoded = tokio::task::spawn_blocking(move || -> Result<EncodedImage> {
        let format = image::guess_format(&bytes)
            .map_err(|e| ShopchatError::Attachment(format!("unrecognized image data: {}", e)))?;
        Ok(EncodedImage {
            base64: STANDARD.encode(&bytes),
            media_type: format.to_mime_type().to_string(),
            origin,
        })
    })
    .await
    .map_err(|e| ShopchatError::Attachment(format!("encoding task failed: {}", e)))??;

    Ok(encoded)
}
