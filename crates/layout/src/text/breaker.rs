//! Greedy line breaking over flattened inline content.
//!
//! The breaker is incremental: each call to [`LineBreaker::next_line`] takes
//! the width of the band the line will occupy, so lines flowing beside
//! floats can narrow and widen per band. Progress is captured by
//! [`BreakerPos`] so a paragraph split across areas resumes exactly where
//! it stopped.

use super::builder::{InlineItem, ParagraphContent};
use crate::metrics::FontMetrics;
use quire_style::flow::Overflow;

const EPSILON: f32 = 0.01;

#[derive(Debug, Clone)]
enum Token {
    Word {
        item_index: usize,
        start: usize,
        end: usize,
        width: f32,
        line_height: f32,
    },
    Space {
        width: f32,
    },
    Break {
        line_height: f32,
    },
    Image {
        item_index: usize,
        width: f32,
        height: f32,
    },
}

/// Breaker progress: the next token, and a byte offset into it when a word
/// was split mid-token by overflow clipping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BreakerPos {
    pub token_index: usize,
    pub word_offset: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum LineItemKind {
    Text { start: usize, end: usize },
    Image { height: f32 },
}

#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub item_index: usize,
    pub kind: LineItemKind,
    pub x: f32,
    pub width: f32,
    /// Extra inter-character advance added by justification.
    pub char_spacing: f32,
}

#[derive(Debug, Clone)]
pub struct Line {
    pub items: Vec<LineItem>,
    /// Natural content width, before alignment.
    pub width: f32,
    pub height: f32,
    /// True when no content remains after this line.
    pub is_last: bool,
}

pub struct LineBreaker<'a> {
    content: &'a ParagraphContent,
    metrics: &'a dyn FontMetrics,
    tokens: Vec<Token>,
    overflow: Overflow,
    default_line_height: f32,
    pos: BreakerPos,
}

impl<'a> LineBreaker<'a> {
    pub fn new(
        content: &'a ParagraphContent,
        metrics: &'a dyn FontMetrics,
        overflow: Overflow,
        default_line_height: f32,
    ) -> Self {
        let tokens = tokenize(content, metrics);
        Self {
            content,
            metrics,
            tokens,
            overflow,
            default_line_height,
            pos: BreakerPos::default(),
        }
    }

    pub fn pos(&self) -> BreakerPos {
        self.pos
    }

    pub fn seek(&mut self, pos: BreakerPos) {
        self.pos = pos;
    }

    pub fn is_done(&self) -> bool {
        self.pos.token_index >= self.tokens.len()
    }

    /// Width of `text[a..b]` of run `item_index`, spacing included.
    fn measure_range(&self, item_index: usize, a: usize, b: usize) -> f32 {
        match &self.content.items[item_index] {
            InlineItem::Run(run) => run.text[a..b]
                .chars()
                .map(|c| {
                    self.metrics
                        .char_width(c, run.style.text.font_size, &run.style.text.font_weight)
                        + run.style.text.char_spacing
                })
                .sum(),
            _ => 0.0,
        }
    }

    /// Longest prefix of `text[from..end]` of run `item_index` that fits in
    /// `budget`, at least one character. Returns (end byte, width).
    fn clip_word(&self, item_index: usize, from: usize, end: usize, budget: f32) -> (usize, f32) {
        let run = match &self.content.items[item_index] {
            InlineItem::Run(run) => run,
            _ => return (end, 0.0),
        };
        let mut width = 0.0;
        let mut cut = from;
        for (offset, c) in run.text[from..end].char_indices() {
            let w = self
                .metrics
                .char_width(c, run.style.text.font_size, &run.style.text.font_weight)
                + run.style.text.char_spacing;
            if cut > from && width + w > budget + EPSILON {
                break;
            }
            width += w;
            cut = from + offset + c.len_utf8();
        }
        (cut, width)
    }

    pub fn next_line(&mut self, max_width: f32) -> Option<Line> {
        if self.is_done() {
            return None;
        }

        let mut items: Vec<LineItem> = Vec::new();
        let mut x = 0.0f32;
        let mut pending_gap = 0.0f32;
        let mut height = 0.0f32;

        while self.pos.token_index < self.tokens.len() {
            match self.tokens[self.pos.token_index].clone() {
                Token::Break { line_height } => {
                    self.pos.token_index += 1;
                    self.pos.word_offset = 0;
                    if items.is_empty() {
                        height = height.max(line_height);
                    }
                    break;
                }
                Token::Space { width } => {
                    // Leading spaces on a line are dropped; trailing spaces
                    // are dropped implicitly when the line breaks.
                    if !items.is_empty() {
                        pending_gap += width;
                    }
                    self.pos.token_index += 1;
                    self.pos.word_offset = 0;
                }
                Token::Word {
                    item_index,
                    start,
                    end,
                    width,
                    line_height,
                } => {
                    let from = start + self.pos.word_offset;
                    let word_width = if self.pos.word_offset == 0 {
                        width
                    } else {
                        self.measure_range(item_index, from, end)
                    };

                    if x + pending_gap + word_width <= max_width + EPSILON {
                        items.push(LineItem {
                            item_index,
                            kind: LineItemKind::Text { start: from, end },
                            x: x + pending_gap,
                            width: word_width,
                            char_spacing: 0.0,
                        });
                        x += pending_gap + word_width;
                        pending_gap = 0.0;
                        height = height.max(line_height);
                        self.pos.token_index += 1;
                        self.pos.word_offset = 0;
                    } else if items.is_empty() {
                        // A word wider than the band, alone at line start.
                        match self.overflow {
                            Overflow::Visible => {
                                items.push(LineItem {
                                    item_index,
                                    kind: LineItemKind::Text { start: from, end },
                                    x: 0.0,
                                    width: word_width,
                                    char_spacing: 0.0,
                                });
                                x = word_width;
                                height = height.max(line_height);
                                self.pos.token_index += 1;
                                self.pos.word_offset = 0;
                                break;
                            }
                            Overflow::Clip => {
                                let (cut, clipped_width) =
                                    self.clip_word(item_index, from, end, max_width);
                                items.push(LineItem {
                                    item_index,
                                    kind: LineItemKind::Text { start: from, end: cut },
                                    x: 0.0,
                                    width: clipped_width,
                                    char_spacing: 0.0,
                                });
                                x = clipped_width;
                                height = height.max(line_height);
                                if cut >= end {
                                    self.pos.token_index += 1;
                                    self.pos.word_offset = 0;
                                } else {
                                    self.pos.word_offset = cut - start;
                                }
                                break;
                            }
                        }
                    } else {
                        // Line is full.
                        break;
                    }
                }
                Token::Image {
                    item_index,
                    width,
                    height: image_height,
                } => {
                    if x + pending_gap + width <= max_width + EPSILON || items.is_empty() {
                        items.push(LineItem {
                            item_index,
                            kind: LineItemKind::Image {
                                height: image_height,
                            },
                            x: x + pending_gap,
                            width,
                            char_spacing: 0.0,
                        });
                        x += pending_gap + width;
                        pending_gap = 0.0;
                        height = height.max(image_height);
                        self.pos.token_index += 1;
                        self.pos.word_offset = 0;
                    } else {
                        break;
                    }
                }
            }
        }

        if height == 0.0 {
            height = self.default_line_height;
        }

        Some(Line {
            items,
            width: x,
            height,
            is_last: self.is_done(),
        })
    }
}

fn tokenize(content: &ParagraphContent, metrics: &dyn FontMetrics) -> Vec<Token> {
    let mut tokens = Vec::new();
    for (item_index, item) in content.items.iter().enumerate() {
        match item {
            InlineItem::Run(run) => {
                let text = &run.style.text;
                let mut word_start: Option<usize> = None;
                let mut word_width = 0.0f32;
                let flush = |tokens: &mut Vec<Token>, start: Option<usize>, end, width| {
                    if let Some(start) = start {
                        tokens.push(Token::Word {
                            item_index,
                            start,
                            end,
                            width,
                            line_height: text.line_height,
                        });
                    }
                };
                for (offset, c) in run.text.char_indices() {
                    if c.is_whitespace() {
                        flush(&mut tokens, word_start.take(), offset, word_width);
                        word_width = 0.0;
                        tokens.push(Token::Space {
                            width: metrics.char_width(' ', text.font_size, &text.font_weight)
                                + text.word_spacing
                                + text.char_spacing,
                        });
                    } else {
                        if word_start.is_none() {
                            word_start = Some(offset);
                        }
                        word_width += metrics.char_width(c, text.font_size, &text.font_weight)
                            + text.char_spacing;
                    }
                }
                flush(&mut tokens, word_start.take(), run.text.len(), word_width);
            }
            InlineItem::Image {
                width,
                height,
                style: _,
            } => {
                tokens.push(Token::Image {
                    item_index,
                    width: *width,
                    height: *height,
                });
            }
            InlineItem::HardBreak => {
                let line_height = content
                    .items
                    .get(item_index.wrapping_sub(1))
                    .and_then(|prev| match prev {
                        InlineItem::Run(run) => Some(run.style.text.line_height),
                        _ => None,
                    })
                    .unwrap_or(0.0);
                tokens.push(Token::Break { line_height });
            }
        }
    }
    tokens
}
