use std::path::{Path, PathBuf};

use slide_common::{slide_image_ref, RunLedger, LEDGER_FILE, VIEWER_FILE};

use crate::error::Result;

pub const IMAGE_LIST_PLACEHOLDER: &str = "/* IMAGE_LIST_PLACEHOLDER */";
pub const DEFAULT_TEMPLATE_PATH: &str = "templates/viewer.html";
pub const BUILTIN_VIEWER_TEMPLATE: &str = include_str!("../templates/viewer.html");

const IMAGE_LIST_SEPARATOR: &str = ",\n            ";

/// Write the ledger as pretty JSON to `<output_dir>/prompts.json`.
pub async fn write_ledger(output_dir: &Path, ledger: &RunLedger) -> Result<PathBuf> {
    let path = output_dir.join(LEDGER_FILE);
    let json = serde_json::to_string_pretty(ledger)?;
    tokio::fs::write(&path, json).await?;
    Ok(path)
}

/// Resolve the viewer template.
///
/// An explicit path must be readable. Without one, `templates/viewer.html`
/// is used when present, otherwise the bundled template.
pub async fn load_viewer_template(path: Option<&Path>) -> Result<String> {
    if let Some(path) = path {
        return Ok(tokio::fs::read_to_string(path).await?);
    }
    let default = Path::new(DEFAULT_TEMPLATE_PATH);
    if tokio::fs::try_exists(default).await.unwrap_or(false) {
        return Ok(tokio::fs::read_to_string(default).await?);
    }
    tracing::debug!("{DEFAULT_TEMPLATE_PATH} not found, using bundled viewer template");
    Ok(BUILTIN_VIEWER_TEMPLATE.to_string())
}

/// Substitute the image list for `slide_count` slides, whether or not they exist.
pub fn render_viewer(template: &str, slide_count: usize) -> String {
    let images = (1..=slide_count)
        .map(|position| format!("'{}'", slide_image_ref(position)))
        .collect::<Vec<_>>()
        .join(IMAGE_LIST_SEPARATOR);
    template.replace(IMAGE_LIST_PLACEHOLDER, &images)
}

pub async fn write_viewer(output_dir: &Path, template: &str, slide_count: usize) -> Result<PathBuf> {
    let path = output_dir.join(VIEWER_FILE);
    tokio::fs::write(&path, render_viewer(template, slide_count)).await?;
    Ok(path)
}
