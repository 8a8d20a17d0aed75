use crate::client::{OcrFields, SubmissionResult};

/// Fixed text shown when the capture flow fails; no error detail leaks
/// into the preview area.
pub const CAPTURE_FAILURE_MESSAGE: &str = "Error processing the image.";

/// Renders the four labeled preview lines, always in this order.
pub fn render_ocr(fields: &OcrFields) -> String {
    [
        format!("OR Number: {}", fields.or_number.as_deref().unwrap_or("")),
        format!("Date: {}", fields.date.as_deref().unwrap_or("")),
        format!("Time: {}", fields.time.as_deref().unwrap_or("")),
        format!(
            "Amount Paid: {}",
            fields.amount_paid.as_deref().unwrap_or("")
        ),
    ]
    .join("\n")
}

pub fn render_submission(result: &SubmissionResult) -> String {
    format!(
        "Status: {}, Updated Range: {}",
        result.status, result.updated_range
    )
}
