//! Peg colors and the ordered palette the user picks from.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Opaque RGB color, written as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    /// Red channel (0–255).
    pub r: u8,
    /// Green channel (0–255).
    pub g: u8,
    /// Blue channel (0–255).
    pub b: u8,
}

impl Rgb {
    /// Create a new RGB color.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `rrggbb` (case-insensitive).
    ///
    /// # Errors
    ///
    /// Returns [`PaletteError::InvalidColor`] for any other shape.
    pub fn from_hex(hex: &str) -> Result<Self, PaletteError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(PaletteError::InvalidColor(hex.to_owned()));
        }
        let channel = |i: usize| {
            u8::from_str_radix(&digits[i..i + 2], 16)
                .map_err(|_| PaletteError::InvalidColor(hex.to_owned()))
        };
        Ok(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    /// Lowercase `#rrggbb`.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl FromStr for Rgb {
    type Err = PaletteError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

impl TryFrom<String> for Rgb {
    type Error = PaletteError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::from_hex(&value)
    }
}

impl From<Rgb> for String {
    fn from(color: Rgb) -> Self {
        color.to_hex()
    }
}

/// Palette construction errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PaletteError {
    /// Two entries share an identifier.
    DuplicateId(String),
    /// An entry has an empty identifier.
    EmptyId,
    /// A color string is not `#rrggbb`.
    InvalidColor(String),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PaletteError::DuplicateId(id) => write!(f, "duplicate palette id {id:?}"),
            PaletteError::EmptyId => write!(f, "palette id must not be empty"),
            PaletteError::InvalidColor(hex) => write!(f, "invalid color {hex:?}, expected #rrggbb"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// One selectable peg color.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaletteEntry {
    /// Identifier stored in cells and patterns.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Display color.
    pub color: Rgb,
}

impl PaletteEntry {
    #[must_use]
    pub fn new(id: impl Into<String>, name: impl Into<String>, color: Rgb) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            color,
        }
    }
}

/// Ordered set of palette entries with unique ids.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Palette {
    entries: Vec<PaletteEntry>,
}

impl Palette {
    /// Color used for cells whose id is no longer in the palette.
    pub const FALLBACK: Rgb = Rgb::new(0x80, 0x80, 0x80);

    /// Build a palette, rejecting empty or duplicate ids.
    ///
    /// # Errors
    ///
    /// See [`PaletteError`].
    pub fn from_entries(entries: Vec<PaletteEntry>) -> Result<Self, PaletteError> {
        let mut palette = Self {
            entries: Vec::with_capacity(entries.len()),
        };
        for entry in entries {
            palette = palette.with_entry(entry)?;
        }
        Ok(palette)
    }

    /// Append an entry.
    ///
    /// # Errors
    ///
    /// Rejects empty or already-present ids.
    pub fn with_entry(mut self, entry: PaletteEntry) -> Result<Self, PaletteError> {
        if entry.id.is_empty() {
            return Err(PaletteError::EmptyId);
        }
        if self.contains(&entry.id) {
            return Err(PaletteError::DuplicateId(entry.id));
        }
        self.entries.push(entry);
        Ok(self)
    }

    #[must_use]
    pub fn entries(&self) -> &[PaletteEntry] {
        &self.entries
    }

    pub fn iter(&self) -> impl Iterator<Item = &PaletteEntry> {
        self.entries.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// First entry, used as the initial selection.
    #[must_use]
    pub fn first(&self) -> Option<&PaletteEntry> {
        self.entries.first()
    }

    #[must_use]
    pub fn contains(&self, id: &str) -> bool {
        self.resolve(id).is_some()
    }

    /// Look up an entry by id.
    #[must_use]
    pub fn resolve(&self, id: &str) -> Option<&PaletteEntry> {
        self.entries.iter().find(|e| e.id == id)
    }

    /// Position of `id` in palette order.
    #[must_use]
    pub fn position(&self, id: &str) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    /// Display color for `id`, or [`Palette::FALLBACK`] when it is stale.
    #[must_use]
    pub fn color_or_fallback(&self, id: &str) -> Rgb {
        self.resolve(id).map_or(Self::FALLBACK, |e| e.color)
    }
}

impl Default for Palette {
    /// The ten stock peg colors.
    fn default() -> Self {
        const STOCK: [(&str, &str, Rgb); 10] = [
            ("red", "Red", Rgb::new(0xe5, 0x39, 0x35)),
            ("orange", "Orange", Rgb::new(0xfb, 0x8c, 0x00)),
            ("yellow", "Yellow", Rgb::new(0xfd, 0xd8, 0x35)),
            ("green", "Green", Rgb::new(0x43, 0xa0, 0x47)),
            ("blue", "Blue", Rgb::new(0x1e, 0x88, 0xe5)),
            ("purple", "Purple", Rgb::new(0x8e, 0x24, 0xaa)),
            ("pink", "Pink", Rgb::new(0xec, 0x40, 0x7a)),
            ("brown", "Brown", Rgb::new(0x6d, 0x4c, 0x41)),
            ("black", "Black", Rgb::new(0x21, 0x21, 0x21)),
            ("white", "White", Rgb::new(0xfa, 0xfa, 0xfa)),
        ];
        Self {
            entries: STOCK
                .iter()
                .map(|&(id, name, color)| PaletteEntry::new(id, name, color))
                .collect(),
        }
    }
}

impl<'de> Deserialize<'de> for Palette {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            entries: Vec<PaletteEntry>,
        }
        let raw = Raw::deserialize(deserializer)?;
        Palette::from_entries(raw.entries).map_err(serde::de::Error::custom)
    }
}
