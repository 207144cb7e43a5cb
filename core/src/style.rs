use std::path::Path;

use crate::error::Result;

/// Section markers delimiting the reusable prompt fragment of a style document.
pub const TEMPLATE_MARKERS: &[(&str, &str)] = &[
    ("## 基础提示词模板", "## 页面类型模板"),
    ("## Base Prompt Template", "## Page Type Templates"),
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StyleTemplate {
    pub text: String,
    /// Markers were missing and the whole document is used.
    pub whole_document: bool,
}

impl StyleTemplate {
    pub fn extract(document: &str) -> Self {
        let fragment = TEMPLATE_MARKERS.iter().find_map(|(start, end)| {
            let from = document.find(start)? + start.len();
            let len = document[from..].find(end)?;
            Some(document[from..from + len].trim())
        });
        match fragment {
            Some(text) => Self {
                text: text.to_string(),
                whole_document: false,
            },
            None => Self {
                text: document.to_string(),
                whole_document: true,
            },
        }
    }

    pub async fn load(path: &Path) -> Result<Self> {
        let document = tokio::fs::read_to_string(path).await?;
        let template = Self::extract(&document);
        if template.whole_document {
            tracing::warn!(
                "No template markers in {}, using the full document",
                path.display()
            );
        }
        Ok(template)
    }
}
