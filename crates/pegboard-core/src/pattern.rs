//! The exported/persisted pattern unit and its JSON form.
//!
//! ```json
//! {
//!   "id": "6f1c...",
//!   "metadata": { "title": "Heart", "author": "", "difficulty": "Easy", "created": 1700000000000 },
//!   "cells": { "3,4": "red", "4,4": "red" }
//! }
//! ```
//!
//! Cell keys use the [`coord`](crate::coord) codec. A pattern carries no board
//! or palette; decoding it against a board happens in
//! [`PatternEngine::load_pattern`](crate::engine::PatternEngine::load_pattern).

use std::collections::BTreeMap;
use std::fmt;
use std::io::{Read, Write};

use serde::{Deserialize, Serialize};

/// Errors reading or writing a pattern.
#[derive(Debug)]
pub enum PatternError {
    /// I/O failure on the underlying reader or writer.
    Io(std::io::Error),
    /// JSON encode or decode failure.
    Json(serde_json::Error),
}

impl fmt::Display for PatternError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PatternError::Io(e) => write!(f, "I/O error: {e}"),
            PatternError::Json(e) => write!(f, "pattern JSON error: {e}"),
        }
    }
}

impl std::error::Error for PatternError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PatternError::Io(e) => Some(e),
            PatternError::Json(e) => Some(e),
        }
    }
}

impl From<std::io::Error> for PatternError {
    fn from(e: std::io::Error) -> Self {
        PatternError::Io(e)
    }
}

impl From<serde_json::Error> for PatternError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            PatternError::Io(e.into())
        } else {
            PatternError::Json(e)
        }
    }
}

/// Difficulty tier shown on the printed sheet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Difficulty {
    #[default]
    Easy,
    Medium,
    Hard,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Difficulty::Easy => "Easy",
            Difficulty::Medium => "Medium",
            Difficulty::Hard => "Hard",
        })
    }
}

/// Descriptive data attached to a pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PatternMetadata {
    pub title: String,
    pub author: String,
    pub difficulty: Difficulty,
    /// Creation time in milliseconds since the Unix epoch.
    pub created: u64,
}

impl PatternMetadata {
    /// Title given to patterns nobody has named yet.
    pub const UNTITLED: &'static str = "Untitled Pattern";

    #[must_use]
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = author.into();
        self
    }

    #[must_use]
    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }
}

impl Default for PatternMetadata {
    fn default() -> Self {
        Self {
            title: Self::UNTITLED.to_owned(),
            author: String::new(),
            difficulty: Difficulty::Easy,
            created: 0,
        }
    }
}

/// A pattern as it crosses the system boundary.
///
/// Cell entries whose value is not a string are dropped while decoding and
/// their keys kept in [`malformed_cells`](Self::malformed_cells), so one bad
/// entry never rejects the whole document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawPattern")]
pub struct Pattern {
    pub id: String,
    pub metadata: PatternMetadata,
    /// Canonical `"x,y"` key to color id.
    pub cells: BTreeMap<String, String>,
    /// Keys dropped during decoding because their value was not a color id.
    #[serde(skip)]
    pub malformed_cells: Vec<String>,
}

/// Wire form with cell values left untyped.
#[derive(Deserialize)]
struct RawPattern {
    id: String,
    metadata: PatternMetadata,
    cells: BTreeMap<String, serde_json::Value>,
}

impl From<RawPattern> for Pattern {
    fn from(raw: RawPattern) -> Self {
        let mut cells = BTreeMap::new();
        let mut malformed_cells = Vec::new();
        for (key, value) in raw.cells {
            match value {
                serde_json::Value::String(id) => {
                    cells.insert(key, id);
                }
                other => {
                    tracing::warn!(key = %key, value = %other, "pattern cell value is not a color id, skipping");
                    malformed_cells.push(key);
                }
            }
        }
        Self {
            id: raw.id,
            metadata: raw.metadata,
            cells,
            malformed_cells,
        }
    }
}

impl Pattern {
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        metadata: PatternMetadata,
        cells: BTreeMap<String, String>,
    ) -> Self {
        Self {
            id: id.into(),
            metadata,
            cells,
            malformed_cells: Vec::new(),
        }
    }

    /// Parse a pattern from JSON text.
    ///
    /// # Errors
    ///
    /// Fails on malformed JSON or a missing field. Malformed cell keys are
    /// accepted here and skipped at load time.
    pub fn from_json(json: &str) -> Result<Self, PatternError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Serialization of this type does not fail in practice; the error is
    /// surfaced rather than unwrapped.
    pub fn to_json_pretty(&self) -> Result<String, PatternError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Read a pattern from `reader`.
    ///
    /// # Errors
    ///
    /// I/O or JSON failures.
    pub fn read_json<R: Read>(reader: R) -> Result<Self, PatternError> {
        Ok(serde_json::from_reader(reader)?)
    }

    /// Write this pattern to `writer` as pretty JSON.
    ///
    /// # Errors
    ///
    /// I/O or JSON failures.
    pub fn write_json<W: Write>(&self, mut writer: W) -> Result<(), PatternError> {
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush()?;
        Ok(())
    }
}
