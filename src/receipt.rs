use anyhow::{Context, Result, anyhow};
use std::path::Path;

/// Raw receipt bytes as selected by the user, before PNG normalization.
#[derive(Debug, Clone)]
pub struct ReceiptFile {
    pub bytes: Vec<u8>,
    pub mime: String,
    pub name: Option<String>,
}

pub fn load_receipt(path: &Path) -> Result<ReceiptFile> {
    let bytes = std::fs::read(path)
        .with_context(|| format!("failed to read receipt file: {}", path.display()))?;
    let mime = detect_image_mime(&bytes, Some(path))?;
    let name = path
        .file_name()
        .and_then(|value| value.to_str())
        .map(|value| value.to_string());
    Ok(ReceiptFile { bytes, mime, name })
}

pub fn load_receipt_from_bytes(bytes: Vec<u8>, name: Option<&str>) -> Result<ReceiptFile> {
    let path = name.map(Path::new);
    let mime = detect_image_mime(&bytes, path)?;
    Ok(ReceiptFile {
        bytes,
        mime,
        name: name.map(|value| value.to_string()),
    })
}

fn detect_image_mime(bytes: &[u8], path: Option<&Path>) -> Result<String> {
    if let Some(kind) = infer::get(bytes) {
        let detected = kind.mime_type();
        if detected.starts_with("image/") {
            return Ok(detected.to_string());
        }
        return Err(anyhow!(
            "receipt must be an image (detected '{}')",
            detected
        ));
    }

    if let Some(ext) = extension_lower(path) {
        if let Some(mime) = mime_from_extension(&ext) {
            return Ok(mime.to_string());
        }
    }

    Err(anyhow!(
        "unable to detect an image mime for '{}'",
        path.map(|value| value.display().to_string())
            .unwrap_or_else(|| "stdin".to_string())
    ))
}

fn extension_lower(path: Option<&Path>) -> Option<String> {
    path.and_then(|path| path.extension())
        .and_then(|value| value.to_str())
        .map(|value| value.to_lowercase())
}

fn mime_from_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "png" => Some("image/png"),
        "jpg" | "jpeg" => Some("image/jpeg"),
        "gif" => Some("image/gif"),
        "webp" => Some("image/webp"),
        "bmp" => Some("image/bmp"),
        "tiff" | "tif" => Some("image/tiff"),
        _ => None,
    }
}
