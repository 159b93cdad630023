//! Flattens the inline tree of a paragraph into a run list for the breaker.

use crate::engine::LayoutEngine;
use crate::style::ComputedStyle;
use quire_dom::Inline;
use std::sync::Arc;

/// A run of text with one resolved style and optional link target.
#[derive(Debug, Clone)]
pub struct TextRun {
    pub text: String,
    pub style: Arc<ComputedStyle>,
    pub href: Option<String>,
}

#[derive(Debug, Clone)]
pub enum InlineItem {
    Run(TextRun),
    Image {
        width: f32,
        height: f32,
        style: Arc<ComputedStyle>,
    },
    HardBreak,
}

/// The flattened inline content of one paragraph.
#[derive(Debug, Clone, Default)]
pub struct ParagraphContent {
    pub items: Vec<InlineItem>,
}

pub fn build_paragraph_content(
    children: &[Inline],
    engine: &LayoutEngine,
    block_style: &Arc<ComputedStyle>,
) -> ParagraphContent {
    let mut content = ParagraphContent::default();
    flatten(children, engine, block_style, None, &mut content);
    content
}

fn flatten(
    children: &[Inline],
    engine: &LayoutEngine,
    style: &Arc<ComputedStyle>,
    href: Option<&str>,
    out: &mut ParagraphContent,
) {
    for child in children {
        match child {
            Inline::Text(text) => {
                if !text.is_empty() {
                    out.items.push(InlineItem::Run(TextRun {
                        text: text.clone(),
                        style: style.clone(),
                        href: href.map(str::to_string),
                    }));
                }
            }
            Inline::StyledSpan { meta, children } => {
                let span_style =
                    engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), style);
                flatten(children, engine, &span_style, href, out);
            }
            Inline::Link {
                meta,
                href: target,
                children,
            } => {
                let link_style =
                    engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), style);
                flatten(children, engine, &link_style, Some(target), out);
            }
            Inline::Image {
                meta,
                width,
                height,
            } => {
                let image_style =
                    engine.compute_style(&meta.style_sets, meta.style_override.as_ref(), style);
                out.items.push(InlineItem::Image {
                    width: *width,
                    height: *height,
                    style: image_style,
                });
            }
            Inline::LineBreak => out.items.push(InlineItem::HardBreak),
        }
    }
}
