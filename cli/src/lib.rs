use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use slide_common::{
    ensure_output_dirs, program_dir, timestamped_output_dir, ConfigSources, GenerationSettings,
    Resolution, RunLedger, API_KEY_VAR, DEFAULT_HOST, DEFAULT_MODEL, HOST_VAR, MODEL_VAR,
};
use slide_core::report::{load_viewer_template, write_ledger, write_viewer};
use slide_core::{load_plan, FixedDelay, Orchestrator, RunOptions, StyleTemplate};
use slide_imagegen::HttpGenerationClient;

const RULE: &str = "============================================================";

fn env_help() -> String {
    format!(
        "Environment (read from .env files or the process environment):\n  \
         {API_KEY_VAR}: API key (required)\n  \
         {HOST_VAR}: API host (default: {DEFAULT_HOST})\n  \
         {MODEL_VAR}: model name (default: {DEFAULT_MODEL})\n\n\
         Example:\n  slidegen --plan slides_plan.json --style styles/gradient-glass.md --resolution 2K"
    )
}

fn parse_resolution(value: &str) -> std::result::Result<Resolution, String> {
    value.parse()
}

#[derive(Parser, Debug)]
#[command(name = "slidegen")]
#[command(about = "Generate presentation slide images from a slide plan")]
#[command(after_help = env_help())]
pub struct Cli {
    /// Path to the slide plan JSON
    #[arg(long)]
    pub plan: PathBuf,

    /// Path to the style template document
    #[arg(long)]
    pub style: PathBuf,

    /// Image resolution: 2K | 4K
    #[arg(long, default_value = "2K", value_parser = parse_resolution)]
    pub resolution: Resolution,

    /// Output directory (default: outputs/<timestamp>)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Viewer HTML template (default: templates/viewer.html, or the bundled one)
    #[arg(long)]
    pub template: Option<PathBuf>,

    /// Enable debug output
    #[arg(long)]
    pub debug: bool,
}

pub async fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.debug);
    run(cli).await
}

fn init_logging(debug: bool) {
    let level = if debug { Level::DEBUG } else { Level::WARN };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber).ok();
}

pub async fn run(cli: Cli) -> Result<()> {
    let plan = load_plan(&cli.plan)
        .await
        .with_context(|| format!("failed to load slide plan {}", cli.plan.display()))?;
    let style = StyleTemplate::load(&cli.style)
        .await
        .with_context(|| format!("failed to load style template {}", cli.style.display()))?;
    if style.whole_document {
        println!(
            "Warning: template markers not found in {}, using the whole file",
            cli.style.display()
        );
    }

    // Missing credentials abort here, before any request is made.
    let cwd = std::env::current_dir()?;
    let sources = ConfigSources::discover(program_dir().as_deref(), &cwd);
    let settings = GenerationSettings::from_sources(&sources)?;
    tracing::debug!("generation settings: {settings:?}");

    let viewer_template = load_viewer_template(cli.template.as_deref())
        .await
        .context("failed to load viewer template")?;

    let output_dir = cli.output.clone().unwrap_or_else(|| {
        timestamped_output_dir(&chrono::Local::now().format("%Y%m%d_%H%M%S").to_string())
    });
    ensure_output_dirs(&output_dir)
        .await
        .with_context(|| format!("failed to create {}", output_dir.display()))?;

    println!("{RULE}");
    println!("Slide generator");
    println!("{RULE}");
    println!("Style: {}", cli.style.display());
    println!("Resolution: {}", cli.resolution);
    println!("Slides: {}", plan.slides.len());
    println!("Output directory: {}", output_dir.display());
    println!("{RULE}");
    println!();

    let client = HttpGenerationClient::new(settings);
    let pacer = FixedDelay::default();
    let options = RunOptions {
        output_dir: output_dir.clone(),
        resolution: cli.resolution,
        style_ref: cli.style.display().to_string(),
    };
    let ledger = Orchestrator::new(&client, &pacer)
        .run(&plan, &style.text, &options)
        .await;

    let ledger_path = write_ledger(&output_dir, &ledger).await?;
    println!("✓ Prompts saved: {}", ledger_path.display());
    let viewer_path = write_viewer(&output_dir, &viewer_template, ledger.metadata.total_slides).await?;
    println!("✓ Viewer generated: {}", viewer_path.display());

    println!();
    print!("{}", format_summary(&ledger, &output_dir, &viewer_path));
    Ok(())
}

fn format_summary(ledger: &RunLedger, output_dir: &Path, viewer_path: &Path) -> String {
    let total = ledger.metadata.total_slides;
    let failed = ledger.failed_positions();
    let mut out = format!("{RULE}\nGeneration complete!\n{RULE}\n");
    out.push_str(&format!("Succeeded: {}/{total} slides\n", ledger.success_count()));
    if !failed.is_empty() {
        let list = failed
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join(", ");
        out.push_str(&format!("Failed: {} slides\n", failed.len()));
        out.push_str(&format!("Failed slides: {list}\n"));
    }
    out.push('\n');
    out.push_str(&format!("Output directory: {}\n", output_dir.display()));
    out.push_str(&format!("Viewer: {}\n\n", viewer_path.display()));
    out.push_str(&format!("Open the viewer:\n  open {}\n", viewer_path.display()));
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_common::{PageType, RunMetadata, SlideResult};

    #[test]
    fn test_parse_defaults() {
        let cli = Cli::try_parse_from(["slidegen", "--plan", "p.json", "--style", "s.md"]).unwrap();
        assert_eq!(cli.resolution, Resolution::TwoK);
        assert!(cli.output.is_none());
        assert!(cli.template.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn test_parse_resolution() {
        let cli = Cli::try_parse_from([
            "slidegen", "--plan", "p.json", "--style", "s.md", "--resolution", "4K",
        ])
        .unwrap();
        assert_eq!(cli.resolution, Resolution::FourK);

        assert!(Cli::try_parse_from([
            "slidegen", "--plan", "p.json", "--style", "s.md", "--resolution", "1080p",
        ])
        .is_err());
    }

    #[test]
    fn test_plan_and_style_required() {
        assert!(Cli::try_parse_from(["slidegen", "--plan", "p.json"]).is_err());
        assert!(Cli::try_parse_from(["slidegen", "--style", "s.md"]).is_err());
    }

    #[test]
    fn test_summary_lists_failed_slides() {
        let slide = |n: usize, ok: bool| SlideResult {
            slide_number: n,
            page_type: PageType::Content,
            content: String::new(),
            prompt: String::new(),
            image_path: ok.then(|| PathBuf::from("x.png")),
        };
        let ledger = RunLedger {
            metadata: RunMetadata {
                title: "t".to_string(),
                total_slides: 4,
                resolution: Resolution::TwoK,
                style: "s.md".to_string(),
                generated_at: String::new(),
            },
            slides: vec![slide(1, true), slide(2, false), slide(3, true), slide(4, false)],
        };
        let summary = format_summary(&ledger, Path::new("out"), Path::new("out/index.html"));
        assert!(summary.contains("Succeeded: 2/4 slides"));
        assert!(summary.contains("Failed: 2 slides"));
        assert!(summary.contains("Failed slides: 2, 4"));
        assert!(summary.contains("open out/index.html"));
    }
}
