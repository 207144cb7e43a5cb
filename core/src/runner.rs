use async_trait::async_trait;
use std::path::PathBuf;
use std::time::Duration;

use slide_common::{Resolution, RunLedger, RunMetadata, SlidePlan, SlideResult};
use slide_imagegen::GenerationBackend;

use crate::prompt::compose;
use crate::resolver::AssetResolver;

/// Courtesy delay between consecutive generation requests.
pub const PACING_DELAY: Duration = Duration::from_secs(3);

#[async_trait]
pub trait Pacer: Send + Sync {
    async fn pause(&self);
}

pub struct FixedDelay(pub Duration);

impl Default for FixedDelay {
    fn default() -> Self {
        Self(PACING_DELAY)
    }
}

#[async_trait]
impl Pacer for FixedDelay {
    async fn pause(&self) {
        println!("Waiting {}s before the next slide...", self.0.as_secs_f32());
        tokio::time::sleep(self.0).await;
    }
}

#[derive(Debug, Clone)]
pub struct RunOptions {
    pub output_dir: PathBuf,
    pub resolution: Resolution,
    /// How the style document is referenced in the ledger.
    pub style_ref: String,
}

/// Walks the plan in order, one slide at a time.
pub struct Orchestrator<'a> {
    backend: &'a dyn GenerationBackend,
    pacer: &'a dyn Pacer,
}

impl<'a> Orchestrator<'a> {
    pub fn new(backend: &'a dyn GenerationBackend, pacer: &'a dyn Pacer) -> Self {
        Self { backend, pacer }
    }

    pub async fn run(&self, plan: &SlidePlan, style_template: &str, options: &RunOptions) -> RunLedger {
        let total = plan.slides.len();
        let resolver = AssetResolver::new(self.backend, &options.output_dir, options.resolution);
        let mut slides = Vec::with_capacity(total);

        for (index, slide) in plan.slides.iter().enumerate() {
            let prompt = compose(
                style_template,
                &slide.page_type,
                &slide.content,
                slide.slide_number,
                total,
            );
            let image_path = resolver.resolve(&prompt, slide.slide_number).await;

            slides.push(SlideResult {
                slide_number: slide.slide_number,
                page_type: slide.page_type.clone(),
                content: slide.content.clone(),
                prompt,
                image_path,
            });

            if index + 1 < total {
                self.pacer.pause().await;
            }
            println!();
        }

        let ledger = RunLedger {
            metadata: RunMetadata {
                title: plan.title.clone(),
                total_slides: total,
                resolution: options.resolution,
                style: options.style_ref.clone(),
                generated_at: chrono::Local::now().to_rfc3339(),
            },
            slides,
        };
        tracing::info!(
            "run finished: {}/{} slides generated",
            ledger.success_count(),
            total
        );
        ledger
    }
}
