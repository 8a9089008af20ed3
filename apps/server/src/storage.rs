//! # Object Storage Upload
//!
//! Proof photos go to an external object-storage service: PUT bytes to
//! `endpoint/bucket/path`, record the public URL on success. The service is
//! an opaque collaborator - one best-effort call, no retry, no backoff.
//!
//! Images are downscaled and re-encoded before upload so a phone camera
//! photo becomes a thumbnail-sized JPEG.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use reqwest::header::CONTENT_TYPE;
use tracing::info;
use uuid::Uuid;

use crate::error::ApiError;

/// Bucket for pickup collection proofs.
pub const PICKUP_PROOF_BUCKET: &str = "pickup-proofs";

/// Bucket for bill payment receipts.
pub const PAYMENT_PROOF_BUCKET: &str = "payment-proofs";

/// Maximum accepted upload size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Longest edge after downscaling
const MAX_DIMENSION: u32 = 300;

/// JPEG quality for proof photos
const JPEG_QUALITY: u8 = 80;

// =============================================================================
// Image Processing
// =============================================================================

/// Validates, downscales, and re-encodes an uploaded image as JPEG.
///
/// ## Flow
/// ```text
/// raw bytes (png/jpg/webp, ≤5MB)
///      │
///      ▼
/// decode ── invalid? → ValidationError
///      │
///      ▼
/// thumbnail to ≤300px (aspect ratio kept)
///      │
///      ▼
/// JPEG @ quality 80
/// ```
pub fn compress_image(data: &[u8]) -> Result<Vec<u8>, ApiError> {
    if data.is_empty() {
        return Err(ApiError::validation("Empty file provided"));
    }

    if data.len() > MAX_FILE_SIZE {
        return Err(ApiError::validation(format!(
            "File too large. Maximum size is {}MB",
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let img = image::load_from_memory(data)
        .map_err(|e| ApiError::validation(format!("Invalid image: {}", e)))?;

    let img = img.thumbnail(MAX_DIMENSION, MAX_DIMENSION);

    let mut buffer = Vec::new();
    {
        let mut cursor = Cursor::new(&mut buffer);
        let rgb_img = img.to_rgb8();
        let encoder = JpegEncoder::new_with_quality(&mut cursor, JPEG_QUALITY);
        rgb_img
            .write_with_encoder(encoder)
            .map_err(|e| ApiError::internal(format!("Failed to compress image: {}", e)))?;
    }

    Ok(buffer)
}

/// Object path for a proof photo: `<record>-<random>.jpg`.
pub fn object_path(record_id: &str) -> String {
    format!("{}-{}.jpg", record_id, Uuid::new_v4())
}

// =============================================================================
// Storage Client
// =============================================================================

/// Client for the external object-storage API.
#[derive(Debug)]
pub struct ObjectStorage {
    client: reqwest::Client,
    endpoint: String,
    public_base: String,
}

impl ObjectStorage {
    /// Creates a client for the given endpoint and public URL base.
    pub fn new(endpoint: impl Into<String>, public_base: impl Into<String>) -> Self {
        let endpoint = endpoint.into().trim_end_matches('/').to_string();
        let public_base = public_base.into().trim_end_matches('/').to_string();
        ObjectStorage {
            client: reqwest::Client::new(),
            endpoint,
            public_base,
        }
    }

    /// Uploads an image and returns its public URL.
    ///
    /// Single best-effort call. A failure surfaces as a StorageError and
    /// nothing is recorded - the caller simply does not get a URL.
    pub async fn put_image(
        &self,
        bucket: &str,
        path: &str,
        data: Vec<u8>,
    ) -> Result<String, ApiError> {
        let url = format!("{}/{}/{}", self.endpoint, bucket, path);
        let size = data.len();

        let response = self
            .client
            .put(&url)
            .header(CONTENT_TYPE, "image/jpeg")
            .body(data)
            .send()
            .await
            .map_err(|e| ApiError::storage(format!("Upload failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(ApiError::storage(format!(
                "Upload failed: storage returned {}",
                response.status()
            )));
        }

        info!(bucket = %bucket, path = %path, size, "Image uploaded");
        Ok(format!("{}/{}/{}", self.public_base, bucket, path))
    }
}
