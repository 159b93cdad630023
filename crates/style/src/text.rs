use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum TextAlign {
    #[default]
    Left,
    Right,
    Center,
    /// Justify every line except the last line of the block.
    Justify,
    /// Justify every line, including the last.
    JustifyAll,
}

impl TextAlign {
    pub fn is_justified(&self) -> bool {
        matches!(self, TextAlign::Justify | TextAlign::JustifyAll)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum TextDecoration {
    #[default]
    None,
    Underline,
    LineThrough,
}
