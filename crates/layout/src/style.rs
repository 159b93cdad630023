use quire_style::border::Border;
use quire_style::dimension::{Dimension, Margins};
use quire_style::flow::{Clear, Float, Overflow};
use quire_style::font::{FontStyle, FontWeight};
use quire_style::list::ListStyleType;
use quire_style::stylesheet::ElementStyle;
use quire_style::text::{TextAlign, TextDecoration};
use quire_types::Color;
use quire_types::geometry::BoxConstraints;
use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

// Helper to hash floats
fn hash_f32<H: Hasher>(v: &f32, state: &mut H) {
    v.to_bits().hash(state);
}

// Grouped Style Structures

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BoxModel {
    pub margin: Margins,
    pub padding: Margins,
    pub width: Option<Dimension>,
    pub height: Option<Dimension>,
    pub min_height: Option<Dimension>,
}

impl Eq for BoxModel {}

impl Hash for BoxModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.margin.hash(state);
        self.padding.hash(state);
        self.width.hash(state);
        self.height.hash(state);
        self.min_height.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct BorderModel {
    pub top: Option<Border>,
    pub right: Option<Border>,
    pub bottom: Option<Border>,
    pub left: Option<Border>,
}

impl Eq for BorderModel {}

impl Hash for BorderModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.top.hash(state);
        self.right.hash(state);
        self.bottom.hash(state);
        self.left.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextModel {
    pub font_family: Arc<String>,
    pub font_size: f32,
    pub font_weight: FontWeight,
    pub font_style: FontStyle,
    pub line_height: f32,
    pub text_align: TextAlign,
    pub text_decoration: TextDecoration,
    pub color: Color,
    pub char_spacing: f32,
    pub word_spacing: f32,
    pub stroke_width: f32,
    pub stroke_color: Option<Color>,
}

impl Default for TextModel {
    fn default() -> Self {
        Self {
            font_family: Arc::new("Helvetica".to_string()),
            font_size: 12.0,
            font_weight: FontWeight::Regular,
            font_style: FontStyle::Normal,
            line_height: 14.4,
            text_align: TextAlign::Left,
            text_decoration: TextDecoration::None,
            color: Color::default(),
            char_spacing: 0.0,
            word_spacing: 0.0,
            stroke_width: 0.0,
            stroke_color: None,
        }
    }
}

impl Eq for TextModel {}

impl Hash for TextModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.font_family.hash(state);
        hash_f32(&self.font_size, state);
        self.font_weight.hash(state);
        self.font_style.hash(state);
        hash_f32(&self.line_height, state);
        self.text_align.hash(state);
        self.text_decoration.hash(state);
        self.color.hash(state);
        hash_f32(&self.char_spacing, state);
        hash_f32(&self.word_spacing, state);
        hash_f32(&self.stroke_width, state);
        self.stroke_color.hash(state);
    }
}

/// Out-of-stacking behavior and area-boundary policy. Not inherited.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlowModel {
    pub float: Float,
    pub clear: Clear,
    pub overflow: Overflow,
    pub keep_together: bool,
    /// Rotation in degrees, counter-clockwise about the box center.
    pub rotation: Option<f32>,
}

impl Eq for FlowModel {}

impl Hash for FlowModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.float.hash(state);
        self.clear.hash(state);
        self.overflow.hash(state);
        self.keep_together.hash(state);
        match self.rotation {
            Some(v) => {
                1u8.hash(state);
                hash_f32(&v, state);
            }
            None => 0u8.hash(state),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct ListModel {
    pub style_type: ListStyleType,
}

impl Eq for ListModel {}

impl Hash for ListModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.style_type.hash(state);
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct MiscModel {
    pub background_color: Option<Color>,
}

impl Eq for MiscModel {}

impl Hash for MiscModel {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.background_color.hash(state);
    }
}

/// Holds the raw styling data. Separated from `ComputedStyle` to enforce safe hashing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyleData {
    pub box_model: BoxModel,
    pub border: BorderModel,
    pub text: TextModel,
    pub flow: FlowModel,
    pub list: ListModel,
    pub misc: MiscModel,
}

// We implement Hash manually for the Data struct because it contains f32s,
// which don't support auto-derive Hash.
impl Hash for ComputedStyleData {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.box_model.hash(state);
        self.border.hash(state);
        self.text.hash(state);
        self.flow.hash(state);
        self.list.hash(state);
        self.misc.hash(state);
    }
}

impl ComputedStyleData {
    /// Returns the total width of horizontal padding.
    pub fn padding_x(&self) -> f32 {
        self.box_model.padding.left + self.box_model.padding.right
    }

    /// Returns the total height of vertical padding.
    pub fn padding_y(&self) -> f32 {
        self.box_model.padding.top + self.box_model.padding.bottom
    }

    /// Returns the total width of horizontal borders.
    pub fn border_x(&self) -> f32 {
        self.border.left.as_ref().map_or(0.0, |b| b.width)
            + self.border.right.as_ref().map_or(0.0, |b| b.width)
    }

    /// Returns the total height of vertical borders.
    pub fn border_y(&self) -> f32 {
        self.border.top.as_ref().map_or(0.0, |b| b.width)
            + self.border.bottom.as_ref().map_or(0.0, |b| b.width)
    }

    pub fn border_top_width(&self) -> f32 {
        self.border.top.as_ref().map_or(0.0, |b| b.width)
    }

    pub fn border_bottom_width(&self) -> f32 {
        self.border.bottom.as_ref().map_or(0.0, |b| b.width)
    }

    pub fn border_left_width(&self) -> f32 {
        self.border.left.as_ref().map_or(0.0, |b| b.width)
    }

    pub fn border_right_width(&self) -> f32 {
        self.border.right.as_ref().map_or(0.0, |b| b.width)
    }

    /// Rotation in radians, when set and not a multiple of a full turn.
    pub fn rotation_radians(&self) -> Option<f32> {
        let degrees = self.flow.rotation?;
        let normalized = degrees.rem_euclid(360.0);
        if normalized.abs() < 1e-3 {
            None
        } else {
            Some(normalized.to_radians())
        }
    }

    /// Calculates constraints for the content box by subtracting padding and borders.
    pub fn content_constraints(&self, constraints: BoxConstraints) -> BoxConstraints {
        let h_deduction = self.padding_x() + self.border_x();
        if constraints.has_bounded_width() {
            let max_w = (constraints.max_width - h_deduction).max(0.0);
            BoxConstraints {
                min_width: 0.0,
                max_width: max_w,
                min_height: 0.0,
                max_height: f32::INFINITY,
            }
        } else {
            BoxConstraints {
                min_width: 0.0,
                max_width: f32::INFINITY,
                min_height: 0.0,
                max_height: f32::INFINITY,
            }
        }
    }
}

/// A wrapper around style data that enforces hashing on construction.
/// This prevents bugs where data changes but the hash doesn't.
#[derive(Debug, Clone)]
pub struct ComputedStyle {
    /// The actual style data.
    pub inner: ComputedStyleData,
    /// Pre-calculated hash for rapid HashMap lookups (caching).
    cached_hash: u64,
}

impl ComputedStyle {
    pub fn new(data: ComputedStyleData) -> Self {
        let mut s = DefaultHasher::new();
        data.hash(&mut s);
        Self {
            inner: data,
            cached_hash: s.finish(),
        }
    }
}

impl Default for ComputedStyle {
    fn default() -> Self {
        Self::new(ComputedStyleData::default())
    }
}

// Allows accessing style data directly (e.g. style.box_model)
impl std::ops::Deref for ComputedStyle {
    type Target = ComputedStyleData;
    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl Eq for ComputedStyle {}

impl PartialEq for ComputedStyle {
    fn eq(&self, other: &Self) -> bool {
        if self.cached_hash != other.cached_hash {
            return false;
        }
        self.inner == other.inner
    }
}

impl Hash for ComputedStyle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.cached_hash.hash(state);
    }
}

/// Computes the style for a node by inheriting from its parent, applying any named
/// style sets, and finally applying any inline style overrides.
pub fn compute_style(
    style_sets: &[Arc<ElementStyle>],
    style_override: Option<&ElementStyle>,
    parent_style: &Arc<ComputedStyle>,
) -> Arc<ComputedStyle> {
    if style_sets.is_empty() && style_override.is_none() {
        let mut computed_data = parent_style.inner.clone();

        // Reset non-inherited properties
        computed_data.box_model = BoxModel::default();
        computed_data.border = BorderModel::default();
        computed_data.flow = FlowModel::default();
        computed_data.misc.background_color = None;

        return Arc::new(ComputedStyle::new(computed_data));
    }

    let mut merged = ElementStyle::default();
    for style_def in style_sets {
        merged.apply(style_def);
    }
    if let Some(override_style_def) = style_override {
        merged.apply(override_style_def);
    }

    let computed_data = ComputedStyleData {
        text: TextModel {
            font_family: merged
                .font_family
                .map(Arc::new)
                .unwrap_or_else(|| parent_style.text.font_family.clone()),
            font_size: merged.font_size.unwrap_or(parent_style.text.font_size),
            font_weight: merged
                .font_weight
                .unwrap_or_else(|| parent_style.text.font_weight.clone()),
            font_style: merged
                .font_style
                .unwrap_or_else(|| parent_style.text.font_style.clone()),
            line_height: merged.line_height.unwrap_or_else(|| {
                merged
                    .font_size
                    .map(|fs| fs * 1.2)
                    .unwrap_or(parent_style.text.line_height)
            }),
            text_align: merged
                .text_align
                .unwrap_or_else(|| parent_style.text.text_align.clone()),
            text_decoration: merged
                .text_decoration
                .unwrap_or_else(|| parent_style.text.text_decoration.clone()),
            color: merged
                .color
                .unwrap_or_else(|| parent_style.text.color.clone()),
            char_spacing: merged
                .char_spacing
                .unwrap_or(parent_style.text.char_spacing),
            word_spacing: merged
                .word_spacing
                .unwrap_or(parent_style.text.word_spacing),
            stroke_width: merged
                .stroke_width
                .unwrap_or(parent_style.text.stroke_width),
            stroke_color: merged
                .stroke_color
                .or_else(|| parent_style.text.stroke_color.clone()),
        },
        list: ListModel {
            style_type: merged
                .list_style_type
                .unwrap_or_else(|| parent_style.list.style_type.clone()),
        },
        // Non-inherited properties
        misc: MiscModel {
            background_color: merged.background_color,
        },
        box_model: BoxModel {
            margin: merged.margin.unwrap_or_default(),
            padding: merged.padding.unwrap_or_default(),
            width: merged.width,
            height: merged.height,
            min_height: merged.min_height,
        },
        border: BorderModel {
            top: merged.border_top.or_else(|| merged.border.clone()),
            right: merged.border_right.or_else(|| merged.border.clone()),
            bottom: merged.border_bottom.or_else(|| merged.border.clone()),
            left: merged.border_left.or_else(|| merged.border.clone()),
        },
        flow: FlowModel {
            float: merged.float.unwrap_or_default(),
            clear: merged.clear.unwrap_or_default(),
            overflow: merged.overflow.unwrap_or_default(),
            keep_together: merged.keep_together.unwrap_or(false),
            rotation: merged.rotation,
        },
    };

    Arc::new(ComputedStyle::new(computed_data))
}

/// Returns the default style for the document root.
pub fn get_default_style() -> Arc<ComputedStyle> {
    Arc::new(ComputedStyle::default())
}
