use anyhow::{Result, anyhow};
use std::path::Path;

pub mod capture;
pub mod client;
pub mod data_uri;
pub mod form;
pub mod logging;
pub mod preview;
pub mod receipt;
pub mod session;
pub mod settings;
pub mod submit;
pub mod transcode;

pub use client::BackendClient;
pub use form::ReimbursementForm;
pub use receipt::ReceiptFile;
pub use session::CaptureSession;

#[derive(Debug, Clone, Default)]
pub struct Config {
    pub receipt: Option<String>,
    pub receipt_attachment: Option<ReceiptFile>,
    pub submit: bool,
    pub base_url: Option<String>,
    pub settings_path: Option<String>,
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub position: Option<String>,
    pub division: Option<String>,
    pub team_head: Option<String>,
    pub month: Option<String>,
    pub pid: Option<String>,
}

/// One-shot pipeline: optionally capture a receipt (transcode, store, OCR
/// preview) and optionally submit the stored capture with the resolved form.
pub async fn run(config: Config) -> Result<String> {
    let settings_path = config.settings_path.as_deref().map(Path::new);
    let settings = settings::load_settings(settings_path)?;
    let base_url =
        client::resolve_base_url(config.base_url.as_deref(), settings.base_url.as_deref());
    let client = BackendClient::new(base_url);
    let form = build_form(&config, &settings);

    let mut session = CaptureSession::new();
    let mut outputs = Vec::new();

    if let Some(attachment) = &config.receipt_attachment {
        outputs.push(capture::run_capture(&client, &mut session, attachment).await?);
    } else if let Some(path) = config.receipt.as_deref() {
        let receipt = receipt::load_receipt(Path::new(path))?;
        outputs.push(capture::run_capture(&client, &mut session, &receipt).await?);
    }

    if config.submit {
        outputs.push(submit::run_submission(&client, &session, &form).await?);
    }

    if outputs.is_empty() {
        return Err(anyhow!(
            "nothing to do: pass --receipt to capture, --submit to submit, or --interactive"
        ));
    }
    Ok(outputs.join("\n"))
}

/// CLI flags win over settings defaults, field by field.
pub fn build_form(config: &Config, settings: &settings::Settings) -> ReimbursementForm {
    ReimbursementForm {
        name: pick(&config.name, &settings.form.name),
        id_number: pick(&config.id_number, &settings.form.id_number),
        position: pick(&config.position, &settings.form.position),
        division: pick(&config.division, &settings.form.division),
        team_head: pick(&config.team_head, &settings.form.team_head),
        month: pick(&config.month, &settings.form.month),
        pid: pick(&config.pid, &settings.form.pid),
    }
}

fn pick(flag: &Option<String>, fallback: &Option<String>) -> String {
    flag.as_deref()
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| {
            fallback
                .as_deref()
                .map(str::trim)
                .filter(|value| !value.is_empty())
        })
        .unwrap_or("")
        .to_string()
}
