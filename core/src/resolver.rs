use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Instant;

use slide_common::{slide_image_path, Resolution};
use slide_imagegen::{EventReader, GenerationBackend, GenerationError, GenerationEvent};

/// Where a job ended up.
#[derive(Debug)]
pub enum JobTerminal {
    Succeeded { url: String },
    Failed(GenerationError),
}

/// Transient state of one generation request, alive for a single slide.
#[derive(Debug)]
pub struct GenerationJob {
    submitted_at: Instant,
    last_progress: f64,
    terminal: Option<JobTerminal>,
}

impl GenerationJob {
    pub fn new() -> Self {
        Self {
            submitted_at: Instant::now(),
            last_progress: 0.0,
            terminal: None,
        }
    }

    /// Apply one record. Returns the new progress when it went up.
    pub fn observe(&mut self, event: &GenerationEvent) -> Option<f64> {
        if self.is_terminal() {
            return None;
        }

        let progress = event.progress();
        let increased = (progress > self.last_progress).then(|| {
            self.last_progress = progress;
            progress
        });

        if event.signals_success() {
            self.terminal = Some(match event.first_url() {
                Some(url) => JobTerminal::Succeeded {
                    url: url.to_string(),
                },
                None => JobTerminal::Failed(GenerationError::NoImageData),
            });
        } else if event.signals_failure() {
            self.terminal = Some(JobTerminal::Failed(GenerationError::Failed(
                event.failure_reason(),
            )));
        }
        increased
    }

    /// Transport failure while the stream was open.
    pub fn abort(&mut self, error: GenerationError) {
        if !self.is_terminal() {
            self.terminal = Some(JobTerminal::Failed(error));
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.terminal.is_some()
    }

    pub fn last_progress(&self) -> f64 {
        self.last_progress
    }

    pub fn submitted_at(&self) -> Instant {
        self.submitted_at
    }

    /// A stream that closed without a terminal record is a failure.
    pub fn finish(self) -> Result<String, GenerationError> {
        match self.terminal {
            Some(JobTerminal::Succeeded { url }) => Ok(url),
            Some(JobTerminal::Failed(error)) => Err(error),
            None => Err(GenerationError::StreamEnded),
        }
    }
}

/// Drives one generation job per slide and saves the resulting image.
pub struct AssetResolver<'a> {
    backend: &'a dyn GenerationBackend,
    output_dir: PathBuf,
    resolution: Resolution,
}

impl<'a> AssetResolver<'a> {
    pub fn new(backend: &'a dyn GenerationBackend, output_dir: &Path, resolution: Resolution) -> Self {
        Self {
            backend,
            output_dir: output_dir.to_path_buf(),
            resolution,
        }
    }

    /// Never fails the run: every error becomes a printed diagnostic and `None`.
    pub async fn resolve(&self, prompt: &str, position: usize) -> Option<PathBuf> {
        println!("Generating slide {position}...");
        match self.generate(prompt, position).await {
            Ok(path) => {
                println!("✓ Slide {position} saved: {}", path.display());
                Some(path)
            }
            Err(e) => {
                println!("✗ Slide {position} failed: {e}");
                tracing::warn!("slide {position} failed: {e:?}");
                None
            }
        }
    }

    pub async fn generate(&self, prompt: &str, position: usize) -> Result<PathBuf, GenerationError> {
        let url = self.await_image_url(prompt).await?;

        let image = self.backend.download(&url).await?;
        let path = slide_image_path(&self.output_dir, position);
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&path, &image).await?;
        Ok(path)
    }

    async fn await_image_url(&self, prompt: &str) -> Result<String, GenerationError> {
        let body = self.backend.submit(prompt, self.resolution).await?;
        let mut reader = EventReader::new(body);
        let mut job = GenerationJob::new();
        let mut reported = false;

        while let Some(record) = reader.next_event().await {
            match record {
                Ok(event) => {
                    if let Some(progress) = job.observe(&event) {
                        print!("  progress: {progress}%\r");
                        let _ = std::io::stdout().flush();
                        reported = true;
                    }
                }
                Err(e) => job.abort(e),
            }
            if job.is_terminal() {
                break;
            }
        }
        if reported {
            println!();
        }

        tracing::debug!(
            "job finished after {:.1?} at {}%",
            job.submitted_at().elapsed(),
            job.last_progress()
        );
        job.finish()
    }
}
