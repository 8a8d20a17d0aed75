use anyhow::{Result, anyhow};

use crate::data_uri::{self, DecodedImage};

/// Owns the encoded image string shared by the capture and submission flows.
/// The capture flow is the single writer; each flow reads at most once.
#[derive(Debug, Clone, Default)]
pub struct CaptureSession {
    image: Option<String>,
}

impl CaptureSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stores a freshly captured encoded image, overwriting any previous one.
    pub fn store(&mut self, encoded: String) {
        self.image = Some(encoded);
    }

    pub fn image(&self) -> Option<&str> {
        self.image.as_deref()
    }

    pub fn has_image(&self) -> bool {
        self.image.is_some()
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    /// Decodes the stored image for submission. An empty session is an
    /// error: submission never sends an absent or empty image part.
    pub fn decoded(&self) -> Result<DecodedImage> {
        let encoded = self
            .image
            .as_deref()
            .ok_or_else(|| anyhow!("no receipt captured; capture one before submitting"))?;
        Ok(data_uri::decode(encoded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::CaptureSession;
    use crate::data_uri;

    #[test]
    fn stores_and_decodes_the_latest_capture() {
        let mut session = CaptureSession::new();
        session.store(data_uri::encode(b"old", "image/png"));
        session.store(data_uri::encode(b"new", "image/png"));
        let decoded = session.decoded().unwrap();
        assert_eq!(decoded.bytes, b"new");
    }

    #[test]
    fn rejects_decoding_an_empty_session() {
        let session = CaptureSession::new();
        let err = session.decoded().unwrap_err();
        assert!(err.to_string().contains("no receipt captured"));
    }

    #[test]
    fn surfaces_malformed_stored_images() {
        let mut session = CaptureSession::new();
        session.store("not a data uri".to_string());
        assert!(session.decoded().is_err());
    }

    #[test]
    fn clear_empties_the_slot() {
        let mut session = CaptureSession::new();
        session.store(data_uri::encode(b"bytes", "image/png"));
        session.clear();
        assert!(!session.has_image());
    }
}
