use anyhow::Result;

use crate::client::BackendClient;
use crate::form::ReimbursementForm;
use crate::preview;
use crate::session::CaptureSession;

/// Submission flow: check the form, decode the stored image, post the
/// multipart payload, and render the acknowledgment. Unlike the capture
/// flow, failures here propagate to the caller.
pub async fn run_submission(
    client: &BackendClient,
    session: &CaptureSession,
    form: &ReimbursementForm,
) -> Result<String> {
    form.ensure_complete()?;
    let image = session.decoded()?;
    let result = client.submit(form, image).await?;
    Ok(preview::render_submission(&result))
}
