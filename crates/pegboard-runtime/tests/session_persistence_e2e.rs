//! Editor session persistence E2E tests.
//!
//! # Running Tests
//!
//! ```sh
//! cargo test -p pegboard-runtime --test session_persistence_e2e
//! ```
//!
//! # Invariants
//!
//! 1. **Restart integrity**: a restarted session shows the saved cells,
//!    color, tool and view mode, with a fresh single-entry history
//! 2. **Graceful degradation**: corrupt or foreign files start an empty
//!    session instead of failing
//! 3. **Best effort**: a failed write never rolls back the edit

#![cfg(test)]

use std::fs;

use pegboard_core::{BoardSpec, Difficulty, EngineConfig, Pattern, PatternMetadata, Tool, ViewMode};
use pegboard_runtime::{
    EditorSession, FileStorage, SessionConfig, SessionStorage, StoredSession,
};

// ============================================================================
// Test Utilities
// ============================================================================

fn log_jsonl(event: &str, case: &str, passed: bool, details: &str) {
    let timestamp = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0);

    eprintln!(
        r#"{{"event":"{event}","case":"{case}","passed":{passed},"details":"{details}","timestamp":{timestamp}}}"#
    );
}

fn config(cols: u32, rows: u32) -> SessionConfig {
    SessionConfig::default()
        .with_engine(EngineConfig::default().with_board(BoardSpec::new(cols, rows, 5.0).unwrap()))
}

// ============================================================================
// 1. Restart Cycle
// ============================================================================

#[test]
fn restart_restores_cells_and_selection() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let mut session = EditorSession::with_storage(config(8, 8), Box::new(FileStorage::new(&path)));
        session.set_cell(1, 1).unwrap();
        session.set_color("blue");
        session.set_cell(2, 1).unwrap();
        session.set_tool(Tool::Fill);
        session.set_view_mode(ViewMode::Perspective);
        assert_eq!(session.persist_failures(), 0);
    }
    assert!(path.exists());

    // Board comes from the stored session, not the config.
    let restored = EditorSession::with_storage(config(3, 3), Box::new(FileStorage::new(&path)));
    let engine = restored.engine();
    assert_eq!(engine.board().cols(), 8);
    assert_eq!(engine.cell(1, 1), Some("red"));
    assert_eq!(engine.cell(2, 1), Some("blue"));
    assert_eq!(engine.selected_color(), "blue");
    assert_eq!(engine.active_tool(), Tool::Fill);
    assert_eq!(engine.view_mode(), ViewMode::Perspective);
    assert_eq!(engine.history_len(), 1);
    assert!(!engine.can_undo());

    log_jsonl("restart", "cells_and_selection", true, "8x8 board restored");
}

#[test]
fn restart_after_undo_persists_undone_state() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
        session.set_cell(0, 0).unwrap();
        session.set_cell(3, 3).unwrap();
        assert!(session.undo());
    }

    let restored = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert_eq!(restored.engine().cell(0, 0), Some("red"));
    assert_eq!(restored.engine().cell(3, 3), None);

    log_jsonl("restart", "after_undo", true, "undone cell absent");
}

#[test]
fn metadata_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
        session.set_metadata(
            PatternMetadata::new("Heart")
                .with_author("sam")
                .with_difficulty(Difficulty::Medium),
        );
    }

    let restored = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert_eq!(restored.engine().metadata().title, "Heart");
    assert_eq!(restored.engine().metadata().created, 0);
    assert_eq!(restored.engine().metadata().author, "sam");
    assert_eq!(restored.engine().metadata().difficulty, Difficulty::Medium);
}

#[test]
fn restart_keeps_pattern_id_and_created() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    let mut loaded = Pattern::new("heart-7", PatternMetadata::default(), Default::default());
    loaded.metadata.created = 1_600_000_000_000;

    {
        let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
        session.load_pattern(&loaded);
        session.set_cell(1, 1).unwrap();
        session.set_cell(2, 2).unwrap();
    }

    let restored = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert_eq!(restored.engine().pattern_id(), "heart-7");
    assert_eq!(restored.engine().metadata().created, 1_600_000_000_000);
}

#[test]
fn clear_saved_removes_session_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    session.set_cell(0, 0).unwrap();
    assert!(path.exists());

    session.clear_saved().unwrap();
    assert!(!path.exists());
    assert_eq!(session.engine().cell(0, 0), Some("red"));

    let fresh = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert!(fresh.engine().cells().is_empty());
}

// ============================================================================
// 2. Graceful Degradation
// ============================================================================

#[test]
fn bad_cell_value_skips_only_that_cell() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    {
        let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
        for (x, y) in [(0, 0), (1, 1), (2, 2)] {
            session.set_cell(x, y).unwrap();
        }
    }
    let mut value: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    value["pattern"]["cells"]["1,1"] = serde_json::json!(7);
    fs::write(&path, value.to_string()).unwrap();

    let restored = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert!(restored.last_persist_error().is_none());
    assert_eq!(restored.engine().cells().len(), 2);
    assert_eq!(restored.engine().cell(0, 0), Some("red"));
    assert_eq!(restored.engine().cell(1, 1), None);
    assert_eq!(restored.engine().cell(2, 2), Some("red"));

    log_jsonl("degrade", "bad_cell_value", true, "2 of 3 cells restored");
}

#[test]
fn corrupt_file_starts_empty() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    fs::write(&path, b"{ not json").unwrap();

    let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert!(session.engine().cells().is_empty());
    assert!(session.last_persist_error().is_some());

    // The next edit overwrites the corrupt file.
    session.set_cell(1, 2).unwrap();
    let stored = FileStorage::new(&path).load().unwrap().unwrap();
    assert_eq!(stored.pattern.cells.get("1,2").map(String::as_str), Some("red"));

    log_jsonl("degrade", "corrupt_file", true, "recovered on next save");
}

#[test]
fn foreign_format_version_is_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");

    let mut seeded = EditorSession::new(config(4, 4));
    seeded.set_cell(0, 0).unwrap();
    let mut stored = seeded.snapshot();
    stored.format_version = StoredSession::FORMAT_VERSION + 1;
    fs::write(&path, serde_json::to_vec(&stored).unwrap()).unwrap();

    let session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert!(session.engine().cells().is_empty());
    assert!(session.last_persist_error().is_none());
}

// ============================================================================
// 3. Best Effort Writes
// ============================================================================

#[test]
fn unwritable_location_keeps_edits() {
    let dir = tempfile::tempdir().unwrap();
    // A regular file where the parent directory should be.
    let blocker = dir.path().join("blocker");
    fs::write(&blocker, b"").unwrap();
    let path = blocker.join("session.json");

    let mut session = EditorSession::with_storage(config(4, 4), Box::new(FileStorage::new(&path)));
    assert!(session.last_persist_error().unwrap().contains("not available"));
    session.set_cell(0, 0).unwrap();
    session.fill(3, 3).unwrap();

    assert_eq!(session.engine().cell(0, 0), Some("red"));
    assert_eq!(session.engine().cell(3, 3), Some("red"));
    assert_eq!(session.engine().history_len(), 3);
    assert_eq!(session.persist_failures(), 2);
    assert!(session.save().is_err());

    log_jsonl("best_effort", "unwritable", true, "edits kept after 2 failures");
}

// ============================================================================
// 4. Pattern Files
// ============================================================================

#[test]
fn export_then_import_pattern_file() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("heart.json");

    let mut author = EditorSession::new(config(6, 6));
    author.set_cell(2, 2).unwrap();
    author.set_color("green");
    author.set_cell(3, 2).unwrap();
    let exported = author.export_pattern_file(&file).unwrap();
    assert_eq!(exported.cells.len(), 2);

    let mut reader = EditorSession::new(config(6, 6));
    reader.set_cell(5, 5).unwrap();
    let report = reader.import_pattern_file(&file).unwrap();
    assert_eq!(report.loaded, 2);
    assert!(report.skipped.is_empty());
    assert_eq!(reader.engine().cell(3, 2), Some("green"));
    assert_eq!(reader.engine().cell(5, 5), None);
    assert_eq!(reader.engine().history_len(), 1);
}

#[test]
fn import_skips_null_cell_values() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("shared.json");
    fs::write(
        &file,
        r#"{"id":"x","metadata":{"title":"T","author":"","difficulty":"Easy","created":0},
            "cells":{"0,0":"red","1,1":null,"2,2":"blue"}}"#,
    )
    .unwrap();

    let mut session = EditorSession::new(config(4, 4));
    let report = session.import_pattern_file(&file).unwrap();
    assert_eq!(report.loaded, 2);
    assert_eq!(report.skipped, vec!["1,1".to_string()]);
    assert_eq!(session.engine().cell(2, 2), Some("blue"));
}

#[test]
fn import_missing_file_leaves_session_untouched() {
    let dir = tempfile::tempdir().unwrap();
    let mut session = EditorSession::new(config(4, 4));
    session.set_cell(1, 1).unwrap();

    assert!(session.import_pattern_file(dir.path().join("missing.json")).is_err());
    assert_eq!(session.engine().cell(1, 1), Some("red"));
    assert_eq!(session.engine().history_len(), 2);
}
