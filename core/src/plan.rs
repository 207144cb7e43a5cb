use std::collections::HashSet;
use std::path::Path;

use slide_common::SlidePlan;

use crate::error::{Result, SlideError};

pub async fn load_plan(path: &Path) -> Result<SlidePlan> {
    let content = tokio::fs::read_to_string(path).await?;
    parse_plan(&content)
}

pub fn parse_plan(content: &str) -> Result<SlidePlan> {
    let plan: SlidePlan = serde_json::from_str(content)?;
    validate_plan(&plan)?;
    Ok(plan)
}

/// Positions must run 1..=N in plan order, so the first and last slides in
/// viewing order are the ones numbered 1 and N.
pub fn validate_plan(plan: &SlidePlan) -> Result<()> {
    let mut seen = HashSet::new();
    for (index, slide) in plan.slides.iter().enumerate() {
        if slide.slide_number == 0 {
            return Err(SlideError::InvalidPlan(
                "slide_number starts at 1".to_string(),
            ));
        }
        if !seen.insert(slide.slide_number) {
            return Err(SlideError::InvalidPlan(format!(
                "duplicate slide_number {}",
                slide.slide_number
            )));
        }
        if slide.slide_number != index + 1 {
            return Err(SlideError::InvalidPlan(format!(
                "slide at index {index} declares slide_number {}, expected {}",
                slide.slide_number,
                index + 1
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use slide_common::PageType;

    #[test]
    fn test_parse_plan() {
        let plan = parse_plan(
            r#"{
                "title": "AI Trends",
                "slides": [
                    {"slide_number": 1, "page_type": "cover", "content": "AI Trends 2026"},
                    {"slide_number": 2, "content": "Agents everywhere"},
                    {"slide_number": 3, "page_type": "data", "content": "Adoption: 78%"}
                ]
            }"#,
        )
        .unwrap();
        assert_eq!(plan.title, "AI Trends");
        assert_eq!(plan.slides.len(), 3);
        assert_eq!(plan.slides[1].page_type, PageType::Content);
        assert_eq!(plan.slides[2].page_type, PageType::Data);
    }

    #[test]
    fn test_rejects_duplicate_positions() {
        let err = parse_plan(
            r#"{"slides":[{"slide_number":1,"content":"a"},{"slide_number":1,"content":"b"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SlideError::InvalidPlan(_)));
    }

    #[test]
    fn test_rejects_zero_position() {
        let err = parse_plan(r#"{"slides":[{"slide_number":0,"content":"a"}]}"#).unwrap_err();
        assert!(matches!(err, SlideError::InvalidPlan(_)));
    }

    #[test]
    fn test_rejects_gap_in_positions() {
        let err = parse_plan(
            r#"{"slides":[
                {"slide_number":1,"content":"a"},
                {"slide_number":2,"content":"b"},
                {"slide_number":4,"content":"c"}
            ]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SlideError::InvalidPlan(ref msg) if msg.contains("expected 3")));
    }

    #[test]
    fn test_rejects_reordered_positions() {
        let err = parse_plan(
            r#"{"slides":[{"slide_number":2,"content":"a"},{"slide_number":1,"content":"b"}]}"#,
        )
        .unwrap_err();
        assert!(matches!(err, SlideError::InvalidPlan(_)));
    }

    #[test]
    fn test_missing_content_is_json_error() {
        let err = parse_plan(r#"{"slides":[{"slide_number":1}]}"#).unwrap_err();
        assert!(matches!(err, SlideError::Json(_)));
    }
}
