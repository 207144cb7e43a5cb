use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

pub const DEFAULT_TITLE: &str = "Untitled presentation";

fn default_title() -> String {
    DEFAULT_TITLE.to_string()
}

/// Ordered slide plan, loaded once per run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlidePlan {
    #[serde(default = "default_title")]
    pub title: String,
    pub slides: Vec<SlideSpec>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideSpec {
    /// 1-based position in viewing order.
    pub slide_number: usize,
    #[serde(default)]
    pub page_type: PageType,
    pub content: String,
}

/// Declared layout hint of a slide. Unknown values are kept verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PageType {
    Cover,
    #[default]
    Content,
    Data,
    Other(String),
}

impl PageType {
    pub fn as_str(&self) -> &str {
        match self {
            PageType::Cover => "cover",
            PageType::Content => "content",
            PageType::Data => "data",
            PageType::Other(other) => other,
        }
    }
}

impl From<String> for PageType {
    fn from(value: String) -> Self {
        match value.as_str() {
            "cover" => PageType::Cover,
            "content" => PageType::Content,
            "data" => PageType::Data,
            _ => PageType::Other(value),
        }
    }
}

impl From<PageType> for String {
    fn from(value: PageType) -> Self {
        match value {
            PageType::Other(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requested image size sent to the generation service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Resolution {
    #[default]
    #[serde(rename = "2K")]
    TwoK,
    #[serde(rename = "4K")]
    FourK,
}

impl Resolution {
    pub fn as_str(self) -> &'static str {
        match self {
            Resolution::TwoK => "2K",
            Resolution::FourK => "4K",
        }
    }
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Resolution {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "2K" => Ok(Resolution::TwoK),
            "4K" => Ok(Resolution::FourK),
            other => Err(format!("unsupported resolution '{other}' (expected 2K or 4K)")),
        }
    }
}

/// Outcome of one slide, appended to the ledger in processing order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SlideResult {
    pub slide_number: usize,
    pub page_type: PageType,
    pub content: String,
    pub prompt: String,
    /// `None` marks a failed slide.
    pub image_path: Option<PathBuf>,
}

impl SlideResult {
    pub fn succeeded(&self) -> bool {
        self.image_path.is_some()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunMetadata {
    pub title: String,
    pub total_slides: usize,
    pub resolution: Resolution,
    pub style: String,
    pub generated_at: String,
}

/// End-of-run record of every slide's prompt and outcome.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunLedger {
    pub metadata: RunMetadata,
    pub slides: Vec<SlideResult>,
}

impl RunLedger {
    pub fn success_count(&self) -> usize {
        self.slides.iter().filter(|s| s.succeeded()).count()
    }

    pub fn failed_positions(&self) -> Vec<usize> {
        self.slides
            .iter()
            .filter(|s| !s.succeeded())
            .map(|s| s.slide_number)
            .collect()
    }
}
