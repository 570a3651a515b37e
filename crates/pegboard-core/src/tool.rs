//! Editing tools and preview modes.

use serde::{Deserialize, Serialize};

/// The active editing tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Tool {
    /// Place the selected color on one hole.
    #[default]
    Paint,
    /// Empty one hole.
    Erase,
    /// Flood-fill a connected region with the selected color.
    Fill,
    /// Reserved; behaves like [`Tool::Paint`].
    Line,
}

impl Tool {
    /// Every tool, in toolbar order.
    pub const ALL: [Tool; 4] = [Tool::Paint, Tool::Erase, Tool::Fill, Tool::Line];

    /// Whether a single-cell edit with this tool writes the selected color.
    #[must_use]
    pub const fn is_paint_like(self) -> bool {
        !matches!(self, Tool::Erase)
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Tool::Paint => "paint",
            Tool::Erase => "erase",
            Tool::Fill => "fill",
            Tool::Line => "line",
        }
    }
}

/// How the presentation layer previews the pattern. No effect on editing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ViewMode {
    /// Top-down canvas.
    #[default]
    #[serde(rename = "2d")]
    Flat,
    /// Instanced 3D pegs.
    #[serde(rename = "3d")]
    Perspective,
    /// Camera overlay.
    #[serde(rename = "ar")]
    Augmented,
}
