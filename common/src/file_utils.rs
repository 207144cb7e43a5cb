use anyhow::Result;
use std::path::{Path, PathBuf};

pub const IMAGES_DIR: &str = "images";
pub const LEDGER_FILE: &str = "prompts.json";
pub const VIEWER_FILE: &str = "index.html";
pub const OUTPUTS_ROOT: &str = "outputs";

/// File name of a slide image, e.g. `slide-03.png`.
pub fn slide_image_name(position: usize) -> String {
    format!("slide-{position:02}.png")
}

/// Image reference relative to the output directory, as the viewer sees it.
pub fn slide_image_ref(position: usize) -> String {
    format!("{IMAGES_DIR}/{}", slide_image_name(position))
}

pub fn slide_image_path<P: AsRef<Path>>(output_dir: P, position: usize) -> PathBuf {
    output_dir
        .as_ref()
        .join(IMAGES_DIR)
        .join(slide_image_name(position))
}

/// Default output directory, `outputs/<timestamp>`.
pub fn timestamped_output_dir(timestamp: &str) -> PathBuf {
    Path::new(OUTPUTS_ROOT).join(timestamp)
}

/// Ensure the output directory and its `images/` subdirectory exist
pub async fn ensure_output_dirs<P: AsRef<Path>>(output_dir: P) -> Result<PathBuf> {
    let images = output_dir.as_ref().join(IMAGES_DIR);
    tokio::fs::create_dir_all(&images).await?;
    Ok(images)
}
