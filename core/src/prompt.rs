use slide_common::PageType;

/// Visual composition used for a slide.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Cover,
    Summary,
    Content,
}

struct SlideContext<'a> {
    page_type: &'a PageType,
    position: usize,
    total: usize,
}

fn is_first(slide: &SlideContext) -> bool {
    slide.position == 1
}

fn is_last(slide: &SlideContext) -> bool {
    slide.position == slide.total
}

fn is_declared_data(slide: &SlideContext) -> bool {
    *slide.page_type == PageType::Data
}

/// First match wins. Position rules come before the declared page type.
const LAYOUT_RULES: &[(fn(&SlideContext) -> bool, Layout)] = &[
    (is_first, Layout::Cover),
    (is_last, Layout::Summary),
    (is_declared_data, Layout::Summary),
];

impl Layout {
    pub fn classify(page_type: &PageType, position: usize, total: usize) -> Self {
        let slide = SlideContext {
            page_type,
            position,
            total,
        };
        LAYOUT_RULES
            .iter()
            .find(|(matches, _)| matches(&slide))
            .map(|(_, layout)| *layout)
            .unwrap_or(Layout::Content)
    }

    fn lead(self) -> &'static str {
        match self {
            Layout::Cover => "Generate a cover slide following the aesthetics of visual balance. Place one huge, intricate 3D glass object in the center, overlaid with bold oversized type:",
            Layout::Summary => "Generate a data or summary slide. Use a split-screen design: typeset the following text on the left, with a huge glowing 3D data visualization floating on the right:",
            Layout::Content => "Generate a content slide. Use a Bento grid layout and organize the following content into modular rounded-rectangle containers made of frosted glass with a blur effect:",
        }
    }

    fn trailer(self) -> Option<&'static str> {
        match self {
            Layout::Cover => Some("Aurora waves extend across the background."),
            Layout::Summary | Layout::Content => None,
        }
    }
}

/// Build the final prompt for one slide. `text` is embedded verbatim.
pub fn compose(
    style_template: &str,
    page_type: &PageType,
    text: &str,
    position: usize,
    total: usize,
) -> String {
    let layout = Layout::classify(page_type, position, total);
    let mut prompt = format!("{style_template}\n\n{}\n\n{text}", layout.lead());
    if let Some(trailer) = layout.trailer() {
        prompt.push_str("\n\n");
        prompt.push_str(trailer);
    }
    prompt
}

#[cfg(test)]
mod tests {
    use super::*;

    const STYLE: &str = "Frosted glass, aurora gradients, deep navy background.";

    #[test]
    fn test_position_overrides_declared_type() {
        assert_eq!(Layout::classify(&PageType::Content, 1, 5), Layout::Cover);
        assert_eq!(Layout::classify(&PageType::Data, 1, 5), Layout::Cover);
        assert_eq!(Layout::classify(&PageType::Cover, 5, 5), Layout::Summary);
        assert_eq!(Layout::classify(&PageType::Content, 5, 5), Layout::Summary);
    }

    #[test]
    fn test_middle_slides() {
        assert_eq!(Layout::classify(&PageType::Data, 3, 5), Layout::Summary);
        assert_eq!(Layout::classify(&PageType::Content, 3, 5), Layout::Content);
        assert_eq!(Layout::classify(&PageType::Cover, 3, 5), Layout::Content);
        assert_eq!(
            Layout::classify(&PageType::Other("timeline".to_string()), 2, 5),
            Layout::Content
        );
    }

    #[test]
    fn test_single_slide_is_cover() {
        assert_eq!(Layout::classify(&PageType::Data, 1, 1), Layout::Cover);
    }

    #[test]
    fn test_prompt_prefix_and_text() {
        for position in 1..=4 {
            let text = format!("Slide {position}: {{\"quotes\"}} & <tags>");
            let prompt = compose(STYLE, &PageType::Content, &text, position, 4);
            assert!(prompt.starts_with(STYLE));
            assert!(prompt.contains(&text));
        }
    }

    #[test]
    fn test_cover_prompt_for_content_first_slide() {
        let prompt = compose(STYLE, &PageType::Content, "Quarterly Review", 1, 3);
        assert!(prompt.contains(Layout::Cover.lead()));
        assert!(prompt.ends_with("Aurora waves extend across the background."));

        let last = compose(STYLE, &PageType::Content, "Thanks", 3, 3);
        assert!(last.contains(Layout::Summary.lead()));
        assert!(last.ends_with("Thanks"));
    }
}
