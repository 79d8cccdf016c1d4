// ── Typed request payloads ──
//
// Create payloads carry every required field; update payloads are all
// `Option` and `None` never reaches the wire. Image files are kept out of
// serde and attached by the multipart codec.

use std::fmt;
use std::path::Path;

use serde::Serialize;

// ── Image upload ───────────────────────────────────────────────────

/// An image file to send as the multipart `image` part.
#[derive(Clone, PartialEq, Eq)]
pub struct ImageUpload {
    pub file_name: String,
    pub mime: String,
    pub bytes: Vec<u8>,
}

impl ImageUpload {
    pub fn new(file_name: impl Into<String>, mime: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        }
    }

    /// Read an image from disk, guessing the MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map_or_else(|| "image".to_owned(), |n| n.to_string_lossy().into_owned());
        let mime = mime_for(path);
        Ok(Self::new(file_name, mime, bytes))
    }
}

impl fmt::Debug for ImageUpload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageUpload")
            .field("file_name", &self.file_name)
            .field("mime", &self.mime)
            .field("len", &self.bytes.len())
            .finish()
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "webp" => "image/webp",
        "gif" => "image/gif",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

// ── Services ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CreateServiceRequest {
    pub page_number: u32,
    pub title_ar: String,
    pub title_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip)]
    pub image: ImageUpload,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateServiceRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}

// ── Pricings ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewPriceItem {
    pub text_ar: String,
    pub text_en: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_order: Option<i32>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CreatePricingRequest {
    pub page_number: u32,
    pub title_ar: String,
    pub title_en: String,
    pub price: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NewPriceItem>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UpdatePricingRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page_number: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_ar: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title_en: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
    /// Replaces the whole item list when present.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<NewPriceItem>>,
}

// ── Brands ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Serialize)]
pub struct CreateBrandRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip)]
    pub image: ImageUpload,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct UpdateBrandRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order: Option<i32>,
    #[serde(skip)]
    pub image: Option<ImageUpload>,
}
