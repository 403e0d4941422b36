// src/core/rewrite.rs
use crate::core::document::{Inline, Paragraph, Run, RunStyle};
use crate::placeholders::PlaceholderMap;

/// Copy formatting from a donor style onto a freshly created run.
///
/// The font name, when set, is also propagated to the east-asian fallback so
/// mixed-script documents keep rendering with one face. The color is copied
/// only when the donor had one explicitly set; bold and italic mirror the
/// donor wholesale, including the unset state.
pub fn copy_style(source: &RunStyle, target: &mut Run) {
    if let Some(font) = &source.font {
        target.style.font = Some(font.clone());
        target.style.east_asia_font = Some(font.clone());
    }
    if let Some(size) = source.size {
        target.style.size = Some(size);
    }
    if let Some(color) = &source.color {
        target.style.color = Some(color.clone());
    }
    target.style.bold = source.bold;
    target.style.italic = source.italic;
}

/// Replace placeholder tokens in a paragraph, preserving run formatting.
///
/// Matching runs over the paragraph's concatenated text, so a token split
/// across run boundaries by formatting changes is still found. Replacement is
/// literal substring, applied per token sequentially in map insertion order;
/// a later token can therefore match text inserted by an earlier one. That is
/// the documented behavior of the source system and is kept as-is.
///
/// When any token matched, the paragraph collapses to a single run holding
/// the substituted text, styled from the first original run that had text.
/// Paragraphs with no match are left untouched.
pub fn rewrite_paragraph(para: &mut Paragraph, placeholders: &PlaceholderMap) {
    let original_text = para.text();
    let mut full_text = original_text.clone();
    for (token, value) in placeholders.iter() {
        full_text = full_text.replace(token, value);
    }

    if full_text == original_text {
        return;
    }

    let donor = para
        .runs()
        .find(|run| !run.text.trim().is_empty())
        .map(|run| run.style.clone());

    let mut new_run = Run::new(full_text);
    if let Some(style) = donor {
        copy_style(&style, &mut new_run);
    }

    // The captured source XML no longer reflects the content.
    para.raw = None;
    para.content.clear();
    para.content.push(Inline::Run(new_run));
}
