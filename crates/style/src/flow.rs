//! Flow properties: floats, clearing, and overflow policy.

use serde::{Deserialize, Serialize};

/// Removes a box from normal stacking and shifts it to one side; later
/// in-flow content wraps around it.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Float {
    #[default]
    None,
    Left,
    Right,
}

/// Forces a box below previously placed floats.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Clear {
    #[default]
    None,
    Left,
    Right,
    Both,
}

/// What happens to content wider than its line box.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "kebab-case")]
pub enum Overflow {
    /// Break the oversized word at a character boundary.
    #[default]
    Clip,
    /// Place the word alone on its line and let it overflow.
    Visible,
}
