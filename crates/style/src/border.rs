//! Border definitions and the deterministic collapse priority order.

use quire_types::Color;
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum BorderStyle {
    None,
    Dotted,
    Dashed,
    #[default]
    Solid,
    Double,
}

impl BorderStyle {
    /// Tie-break rank used when two collapsing borders have equal width.
    /// Higher wins: Double > Solid > Dashed > Dotted > None.
    pub fn priority(&self) -> u8 {
        match self {
            BorderStyle::None => 0,
            BorderStyle::Dotted => 1,
            BorderStyle::Dashed => 2,
            BorderStyle::Solid => 3,
            BorderStyle::Double => 4,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
pub struct Border {
    pub width: f32,
    #[serde(default)]
    pub style: BorderStyle,
    #[serde(default)]
    pub color: Color,
}

impl Eq for Border {}

impl Hash for Border {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.width.to_bits().hash(state);
        self.style.hash(state);
        self.color.hash(state);
    }
}

impl Border {
    pub fn solid(width: f32, color: Color) -> Self {
        Self {
            width,
            style: BorderStyle::Solid,
            color,
        }
    }

    /// An explicit "no border" marker. Distinct from an absent border: on a
    /// table cell edge it suppresses collapsing for that cell only.
    pub fn none() -> Self {
        Self {
            width: 0.0,
            style: BorderStyle::None,
            color: Color::default(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.style == BorderStyle::None || self.width <= 0.0
    }
}
