use anyhow::{Result, anyhow};
use tracing::error;

use crate::client::{BackendClient, OcrFields};
use crate::preview;
use crate::receipt::ReceiptFile;
use crate::session::CaptureSession;
use crate::transcode;

/// Capture flow: transcode the receipt to a PNG data URI, store it in the
/// session, request OCR, and render the preview. Everything after the store
/// is contained: an OCR failure is logged and rendered as the fixed failure
/// message, never returned as an error.
pub async fn run_capture(
    client: &BackendClient,
    session: &mut CaptureSession,
    receipt: &ReceiptFile,
) -> Result<String> {
    let encoded = transcode::to_png_data_uri(receipt)?;
    session.store(encoded.clone());
    Ok(preview_for(client.request_ocr(&encoded).await))
}

/// Re-requests OCR for the already-stored image, producing a fresh preview.
pub async fn refresh_preview(client: &BackendClient, session: &CaptureSession) -> Result<String> {
    let Some(image) = session.image() else {
        return Err(anyhow!("no receipt captured; capture one first"));
    };
    Ok(preview_for(client.request_ocr(image).await))
}

fn preview_for(result: Result<OcrFields>) -> String {
    match result {
        Ok(fields) => preview::render_ocr(&fields),
        Err(err) => {
            error!("receipt OCR failed: {:#}", err);
            preview::CAPTURE_FAILURE_MESSAGE.to_string()
        }
    }
}
