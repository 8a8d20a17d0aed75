use anyhow::{Context, Result};
use std::io::Cursor;

use crate::data_uri;
use crate::receipt::ReceiptFile;

pub const PNG_MIME: &str = "image/png";

/// Decodes the receipt into a pixel surface at its natural dimensions and
/// re-encodes it as a PNG data URI. The output format is always PNG, no
/// matter what format the receipt arrived in.
pub fn to_png_data_uri(receipt: &ReceiptFile) -> Result<String> {
    let surface = image::load_from_memory(&receipt.bytes).with_context(|| {
        format!(
            "failed to decode receipt image ({})",
            receipt.name.as_deref().unwrap_or(&receipt.mime)
        )
    })?;
    let mut encoded = Cursor::new(Vec::new());
    surface
        .write_to(&mut encoded, image::ImageFormat::Png)
        .with_context(|| "failed to re-encode receipt as PNG")?;
    Ok(data_uri::encode(encoded.get_ref(), PNG_MIME))
}

#[cfg(test)]
mod tests {
    use super::{PNG_MIME, to_png_data_uri};
    use crate::data_uri;
    use crate::receipt::ReceiptFile;
    use std::io::Cursor;

    fn jpeg_receipt() -> ReceiptFile {
        let surface = image::DynamicImage::ImageRgb8(image::RgbImage::from_pixel(
            4,
            2,
            image::Rgb([200u8, 16, 16]),
        ));
        let mut bytes = Cursor::new(Vec::new());
        surface
            .write_to(&mut bytes, image::ImageFormat::Jpeg)
            .unwrap();
        ReceiptFile {
            bytes: bytes.into_inner(),
            mime: "image/jpeg".to_string(),
            name: Some("receipt.jpg".to_string()),
        }
    }

    #[test]
    fn normalizes_jpeg_input_to_png() {
        let encoded = to_png_data_uri(&jpeg_receipt()).unwrap();
        assert!(encoded.starts_with("data:image/png;base64,"));

        let decoded = data_uri::decode(&encoded).unwrap();
        assert_eq!(decoded.mime, PNG_MIME);
        assert!(decoded.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
    }

    #[test]
    fn keeps_the_natural_dimensions() {
        let encoded = to_png_data_uri(&jpeg_receipt()).unwrap();
        let decoded = data_uri::decode(&encoded).unwrap();
        let surface = image::load_from_memory(&decoded.bytes).unwrap();
        assert_eq!((surface.width(), surface.height()), (4, 2));
    }

    #[test]
    fn rejects_undecodable_bytes() {
        let receipt = ReceiptFile {
            bytes: vec![0u8; 32],
            mime: "image/png".to_string(),
            name: None,
        };
        let err = to_png_data_uri(&receipt).unwrap_err();
        assert!(err.to_string().contains("failed to decode receipt image"));
    }
}
