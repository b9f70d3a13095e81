//! Attachment validation and encoding
//!
//! Files are validated at the boundary, before any network activity:
//! image content only, at most 1 MiB each. Accepted files are carried as
//! base64 data URLs so the wire format matches what the provider expects.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use std::path::Path;
use tracing::debug;

use crate::error::{FitsageError, Result};

/// Maximum attachment size: 1 MiB
pub const MAX_ATTACHMENT_BYTES: usize = 1024 * 1024;

/// A validated image attachment, ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct Attachment {
    pub filename: String,
    pub media_type: String,
    /// base64 data URL carrying the file contents
    pub url: String,
}

impl Attachment {
    /// Validate raw bytes and build an attachment
    ///
    /// The size cap is checked first, then the content is sniffed to
    /// confirm it is an image. Both failures name the offending file so
    /// the caller can report it inline without touching session state.
    ///
    /// # Errors
    ///
    /// Returns `FitsageError::Validation` when the file exceeds 1 MiB or
    /// is not an image.
    pub fn from_bytes(filename: &str, bytes: &[u8]) -> Result<Self> {
        if bytes.len() > MAX_ATTACHMENT_BYTES {
            return Err(FitsageError::Validation {
                file: filename.to_string(),
                reason: format!("file is {} bytes, max size is 1 MiB", bytes.len()),
            }
            .into());
        }

        let format = image::guess_format(bytes).map_err(|_| FitsageError::Validation {
            file: filename.to_string(),
            reason: "only image files can be attached".to_string(),
        })?;
        let media_type = format.to_mime_type().to_string();

        debug!(filename, media_type, size = bytes.len(), "attachment accepted");

        let url = format!("data:{};base64,{}", media_type, BASE64.encode(bytes));
        Ok(Self {
            filename: filename.to_string(),
            media_type,
            url,
        })
    }

    /// Read and validate a file from disk
    ///
    /// # Errors
    ///
    /// Returns an IO error when the file cannot be read, or a validation
    /// error from [`Attachment::from_bytes`].
    pub fn from_path(path: &Path) -> Result<Self> {
        let filename = path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| path.display().to_string());
        let bytes = std::fs::read(path)?;
        Self::from_bytes(&filename, &bytes)
    }
}
