//! The style property bag and top-level stylesheet structures.

use super::border::Border;
use super::dimension::{Dimension, Margins, PageSize};
use super::flow::{Clear, Float, Overflow};
use super::font::{FontStyle, FontWeight};
use super::list::ListStyleType;
use super::text::{TextAlign, TextDecoration};
use quire_types::Color;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Clone, Default)]
pub struct Stylesheet {
    /// A map of all named page layouts.
    pub page_masters: HashMap<String, PageLayout>,
    /// The name of the master to use for the first page.
    pub default_page_master_name: Option<String>,
    /// A map of all named element styles.
    pub styles: HashMap<String, Arc<ElementStyle>>,
}

impl Stylesheet {
    /// Returns the default page layout, or a default A4 layout if none is defined.
    /// Without a declared default, the master with the lexicographically first
    /// name wins, so the choice does not depend on map iteration order.
    pub fn get_default_page_layout(&self) -> &PageLayout {
        self.default_page_master_name
            .as_ref()
            .and_then(|name| self.page_masters.get(name))
            .or_else(|| {
                self.page_masters
                    .iter()
                    .min_by(|a, b| a.0.cmp(b.0))
                    .map(|(_, layout)| layout)
            })
            .unwrap_or_else(|| {
                static FALLBACK_LAYOUT: PageLayout = PageLayout {
                    size: PageSize::A4,
                    margins: None,
                };
                &FALLBACK_LAYOUT
            })
    }

    pub fn get_style_by_class_name(&self, class_name: &str) -> Option<&Arc<ElementStyle>> {
        self.styles.get(class_name)
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageLayout {
    #[serde(default)]
    pub size: PageSize,
    #[serde(default)]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margins: Option<Margins>,
}

impl PageLayout {
    /// The content rectangle origin and size after page margins.
    pub fn content_area(&self) -> quire_types::Rect {
        let (page_w, page_h) = self.size.dimensions_pt();
        let margins = self.margins.clone().unwrap_or_else(|| Margins::all(36.0));
        quire_types::Rect {
            x: margins.left,
            y: margins.top,
            width: (page_w - margins.left - margins.right).max(0.0),
            height: (page_h - margins.top - margins.bottom).max(0.0),
        }
    }
}

/// A sparse bag of style properties. `None` means "not set here"; resolution
/// falls through style sets, then the inherited parent style, then defaults.
#[derive(Deserialize, Serialize, Default, Clone, PartialEq, Debug)]
#[serde(rename_all = "camelCase")]
pub struct ElementStyle {
    // Font & text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub char_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub word_spacing: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_color: Option<Color>,

    // Box model
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Color>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_top: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_right: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_bottom: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_left: Option<Border>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub margin: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Margins>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Dimension>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<Dimension>,

    // Flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub float: Option<Float>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub clear: Option<Clear>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub overflow: Option<Overflow>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub keep_together: Option<bool>,
    /// Rotation angle in degrees, counter-clockwise about the box center.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,

    // Lists
    #[serde(skip_serializing_if = "Option::is_none")]
    pub list_style_type: Option<ListStyleType>,
}

impl ElementStyle {
    /// Merges properties from `to_apply` into `self` (set-wins).
    pub fn apply(&mut self, to_apply: &ElementStyle) {
        macro_rules! merge {
            ($($field:ident),* $(,)?) => {
                $(if to_apply.$field.is_some() {
                    self.$field = to_apply.$field.clone();
                })*
            };
        }
        merge!(
            font_family,
            font_size,
            font_weight,
            font_style,
            line_height,
            text_align,
            color,
            text_decoration,
            char_spacing,
            word_spacing,
            stroke_width,
            stroke_color,
            background_color,
            border,
            border_top,
            border_right,
            border_bottom,
            border_left,
            margin,
            padding,
            width,
            height,
            min_height,
            float,
            clear,
            overflow,
            keep_together,
            rotation,
            list_style_type,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unnamed_default_master_falls_back_to_first_by_name() {
        let mut sheet = Stylesheet::default();
        sheet.page_masters.insert(
            "b".to_string(),
            PageLayout {
                size: PageSize::Letter,
                margins: None,
            },
        );
        sheet.page_masters.insert(
            "a".to_string(),
            PageLayout {
                size: PageSize::A4,
                margins: None,
            },
        );

        assert_eq!(
            sheet.get_default_page_layout().size.dimensions_pt(),
            PageSize::A4.dimensions_pt()
        );
    }

    #[test]
    fn declared_default_master_wins_over_name_order() {
        let mut sheet = Stylesheet::default();
        sheet.page_masters.insert(
            "a".to_string(),
            PageLayout {
                size: PageSize::A4,
                margins: None,
            },
        );
        sheet.page_masters.insert(
            "z".to_string(),
            PageLayout {
                size: PageSize::Letter,
                margins: None,
            },
        );
        sheet.default_page_master_name = Some("z".to_string());

        assert_eq!(
            sheet.get_default_page_layout().size.dimensions_pt(),
            PageSize::Letter.dimensions_pt()
        );
    }
}
