use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
#[derive(Default)]
pub enum ListStyleType {
    #[default]
    Disc,
    Circle,
    Square,
    Decimal,
    None,
}

impl ListStyleType {
    /// The marker text for the item at `index` (zero-based).
    pub fn marker(&self, index: usize) -> String {
        match self {
            ListStyleType::Disc => "\u{2022}".to_string(),
            ListStyleType::Circle => "\u{25E6}".to_string(),
            ListStyleType::Square => "\u{25AA}".to_string(),
            ListStyleType::Decimal => format!("{}.", index + 1),
            ListStyleType::None => String::new(),
        }
    }
}
