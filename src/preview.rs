use serde::Serialize;
use utoipa::ToSchema;

use crate::error::{AppError, AppResult};

pub const SECTION_TITLES: [&str; 4] = [
    "Introduction",
    "Market Overview",
    "Market Analysis",
    "Key Findings",
];

/// Maximum characters consumed by one section.
pub const SECTION_WINDOW: usize = 2500;

#[derive(Debug, Clone, Serialize, ToSchema, PartialEq)]
pub struct PreviewSection {
    pub title: String,
    pub content: String,
}

/// Text pulled out of a stored PDF.
#[derive(Debug, Clone)]
pub struct ExtractedPdf {
    pub text: String,
    pub total_pages: usize,
}

/// Greedily fills the fixed sections from `text`.
///
/// Each section takes at most [`SECTION_WINDOW`] characters and, when the
/// window holds a `.`, ends right after the last one. Leftover text rolls into
/// the next section; segmentation stops once the text is exhausted.
pub fn split_into_sections(text: &str) -> Vec<PreviewSection> {
    let mut rest = text.trim();
    let mut sections = Vec::with_capacity(SECTION_TITLES.len());

    for title in SECTION_TITLES {
        let window_end = rest
            .char_indices()
            .nth(SECTION_WINDOW)
            .map(|(idx, _)| idx)
            .unwrap_or(rest.len());
        let window = rest[..window_end].trim_end();
        let content = match window.rfind('.') {
            Some(idx) => &window[..=idx],
            None => window,
        };

        sections.push(PreviewSection {
            title: title.to_string(),
            content: content.to_string(),
        });

        rest = rest[content.len()..].trim();
        if rest.is_empty() {
            break;
        }
    }

    sections
}

/// Extracts text and page count. Runs on the blocking pool since both parsers
/// are CPU bound.
pub async fn extract_pdf(bytes: Vec<u8>) -> AppResult<ExtractedPdf> {
    tokio::task::spawn_blocking(move || {
        let total_pages = lopdf::Document::load_mem(&bytes)
            .map(|doc| doc.get_pages().len())
            .map_err(|e| AppError::validation(format!("Stored file is not a readable PDF: {e}")))?;
        let text = pdf_extract::extract_text_from_mem(&bytes)
            .map_err(|e| AppError::validation(format!("Could not extract PDF text: {e}")))?;
        Ok(ExtractedPdf { text, total_pages })
    })
    .await
    .map_err(|e| AppError::Internal(anyhow::anyhow!("pdf extraction task failed: {e}")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentences(total_chars: usize) -> String {
        let sentence = "The regional market expanded steadily across segments. ";
        sentence.repeat(total_chars / sentence.len() + 1)
    }

    #[test]
    fn long_text_fills_all_four_sections() {
        let text = sentences(12_000);
        assert!(text.chars().count() > 10_000);

        let sections = split_into_sections(&text);
        assert_eq!(sections.len(), 4);
        for (section, title) in sections.iter().zip(SECTION_TITLES) {
            assert_eq!(section.title, title);
            assert!(section.content.chars().count() <= SECTION_WINDOW);
            assert!(section.content.ends_with('.'));
        }
    }

    #[test]
    fn short_text_stops_early() {
        let sections = split_into_sections("  Only one sentence here. And a tail  ");
        assert_eq!(sections.len(), 2);
        assert_eq!(sections[0].content, "Only one sentence here.");
        assert_eq!(sections[1].title, "Market Overview");
        assert_eq!(sections[1].content, "And a tail");
    }

    #[test]
    fn text_without_periods_is_cut_at_the_window() {
        let text = "x".repeat(SECTION_WINDOW * 2 + 10);
        let sections = split_into_sections(&text);
        assert_eq!(sections.len(), 3);
        assert_eq!(sections[0].content.len(), SECTION_WINDOW);
        assert_eq!(sections[1].content.len(), SECTION_WINDOW);
        assert_eq!(sections[2].content.len(), 10);
    }

    #[test]
    fn window_counts_characters_not_bytes() {
        let text = "é".repeat(SECTION_WINDOW + 5);
        let sections = split_into_sections(&text);
        assert_eq!(sections[0].content.chars().count(), SECTION_WINDOW);
        assert_eq!(sections[1].content.chars().count(), 5);
    }

    #[test]
    fn empty_text_yields_one_empty_section() {
        let sections = split_into_sections("   ");
        assert_eq!(sections.len(), 1);
        assert!(sections[0].content.is_empty());
    }
}
