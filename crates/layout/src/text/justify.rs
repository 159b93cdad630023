//! Horizontal alignment of a broken line, including justification.
//!
//! Justification distributes the free width of the band evenly across the
//! inter-word gaps of the line. The last line of a paragraph is left
//! ragged under `Justify` and stretched under `JustifyAll`. A gapless line
//! (a single word or clipped fragment) falls back to stretching the
//! advances between its characters.

use super::breaker::{Line, LineItemKind};
use super::builder::{InlineItem, ParagraphContent};
use quire_style::text::TextAlign;

pub fn align_line(
    line: &mut Line,
    max_width: f32,
    align: &TextAlign,
    content: &ParagraphContent,
) {
    if line.items.is_empty() || !max_width.is_finite() {
        return;
    }

    let free_space = (max_width - line.width).max(0.0);
    if free_space <= 0.0 {
        return;
    }

    match align {
        TextAlign::Left => {}
        TextAlign::Center => {
            let offset = free_space / 2.0;
            for item in &mut line.items {
                item.x += offset;
            }
        }
        TextAlign::Right => {
            for item in &mut line.items {
                item.x += free_space;
            }
        }
        TextAlign::Justify => {
            if !line.is_last {
                distribute(line, free_space, content);
            }
        }
        TextAlign::JustifyAll => distribute(line, free_space, content),
    }
}

fn distribute(line: &mut Line, free_space: f32, content: &ParagraphContent) {
    let gaps = line.items.len().saturating_sub(1);
    if gaps > 0 {
        let extra_per_gap = free_space / gaps as f32;
        for (i, item) in line.items.iter_mut().enumerate() {
            item.x += extra_per_gap * i as f32;
        }
        line.width += free_space;
        return;
    }
    stretch_between_characters(line, free_space, content);
}

/// Inter-character fallback for a line with no word gaps: the free width is
/// spread over the advances between the characters of the single item.
fn stretch_between_characters(line: &mut Line, free_space: f32, content: &ParagraphContent) {
    let item = match line.items.first_mut() {
        Some(item) => item,
        None => return,
    };
    let (start, end) = match item.kind {
        LineItemKind::Text { start, end } => (start, end),
        LineItemKind::Image { .. } => return,
    };
    let run = match &content.items[item.item_index] {
        InlineItem::Run(run) => run,
        _ => return,
    };
    let char_gaps = run.text[start..end].chars().count().saturating_sub(1);
    if char_gaps == 0 {
        return;
    }
    item.char_spacing += free_space / char_gaps as f32;
    item.width += free_space;
    line.width += free_space;
}
