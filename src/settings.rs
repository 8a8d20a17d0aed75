use anyhow::{Context, Result, anyhow};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

const DEFAULT_SETTINGS_TOML: &str = include_str!("../settings.toml");

#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub base_url: Option<String>,
    pub form: FormDefaults,
}

/// Pre-filled values for the operator's fixed identity fields; CLI flags
/// override them.
#[derive(Debug, Clone, Default)]
pub struct FormDefaults {
    pub name: Option<String>,
    pub id_number: Option<String>,
    pub position: Option<String>,
    pub division: Option<String>,
    pub team_head: Option<String>,
    pub month: Option<String>,
    pub pid: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct SettingsFile {
    backend: Option<BackendSettings>,
    form: Option<FormSettings>,
}

#[derive(Debug, Default, Deserialize)]
struct BackendSettings {
    base_url: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct FormSettings {
    name: Option<String>,
    id_number: Option<String>,
    position: Option<String>,
    division: Option<String>,
    team_head: Option<String>,
    month: Option<String>,
    pid: Option<String>,
}

pub fn load_settings(extra_path: Option<&Path>) -> Result<Settings> {
    let mut settings = Settings::default();
    ensure_home_settings_file()?;

    let mut ordered_paths = Vec::new();
    ordered_paths.push(PathBuf::from("settings.toml"));
    ordered_paths.push(PathBuf::from("settings.local.toml"));

    if let Some(home) = home_dir() {
        ordered_paths.push(home.join("settings.toml"));
        ordered_paths.push(home.join("settings.local.toml"));
    }

    if let Some(extra) = extra_path {
        if !extra.exists() {
            return Err(anyhow!("settings file not found: {}", extra.display()));
        }
        ordered_paths.push(extra.to_path_buf());
    }

    for path in ordered_paths {
        if path.exists() {
            let content = fs::read_to_string(&path)
                .with_context(|| format!("failed to read settings: {}", path.display()))?;
            let parsed: SettingsFile = toml::from_str(&content)
                .with_context(|| format!("failed to parse settings: {}", path.display()))?;
            settings.merge(parsed);
        }
    }

    Ok(settings)
}

impl Settings {
    fn merge(&mut self, incoming: SettingsFile) {
        if let Some(backend) = incoming.backend {
            merge_value(&mut self.base_url, backend.base_url);
        }
        if let Some(form) = incoming.form {
            merge_value(&mut self.form.name, form.name);
            merge_value(&mut self.form.id_number, form.id_number);
            merge_value(&mut self.form.position, form.position);
            merge_value(&mut self.form.division, form.division);
            merge_value(&mut self.form.team_head, form.team_head);
            merge_value(&mut self.form.month, form.month);
            merge_value(&mut self.form.pid, form.pid);
        }
    }
}

fn merge_value(slot: &mut Option<String>, incoming: Option<String>) {
    if let Some(value) = incoming {
        if !value.trim().is_empty() {
            *slot = Some(value);
        }
    }
}

fn ensure_home_settings_file() -> Result<()> {
    let Some(home) = home_dir() else {
        return Ok(());
    };
    fs::create_dir_all(&home)
        .with_context(|| format!("failed to create settings directory: {}", home.display()))?;
    let path = home.join("settings.toml");
    if !path.exists() {
        fs::write(&path, DEFAULT_SETTINGS_TOML)
            .with_context(|| format!("failed to write settings: {}", path.display()))?;
    }
    Ok(())
}

fn home_dir() -> Option<PathBuf> {
    std::env::var("HOME").ok().and_then(|home| {
        let home = home.trim();
        if home.is_empty() {
            None
        } else {
            Some(Path::new(home).join(".receipt-capture-rust"))
        }
    })
}
