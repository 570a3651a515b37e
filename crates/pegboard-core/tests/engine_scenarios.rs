use std::sync::Arc;

use pegboard_core::{
    BoardSpec, Difficulty, EngineConfig, FixedProvenance, Pattern, PatternEngine, PatternMetadata,
    Tool,
};

fn three_by_three() -> PatternEngine {
    PatternEngine::new(
        EngineConfig::default()
            .with_board(BoardSpec::new(3, 3, 5.0).unwrap())
            .with_provenance(Arc::new(FixedProvenance::new(1_700_000_000_000))),
    )
}

#[test]
fn fill_empty_board_and_undo() {
    let mut engine = three_by_three();
    engine.set_color("red");
    engine.set_tool(Tool::Fill);

    assert!(engine.apply_tool(1, 1).unwrap());
    assert_eq!(engine.cells().len(), 9);
    assert!(engine.cells().iter().all(|(_, id)| id == "red"));
    assert_eq!(engine.history_len(), 2);

    assert!(engine.undo());
    assert!(engine.cells().is_empty());
    assert_eq!(engine.history_pointer(), 0);
}

#[test]
fn double_click_same_color_records_once() {
    let mut engine = three_by_three();
    engine.set_color("blue");
    engine.set_cell(0, 0).unwrap();
    engine.set_cell(0, 0).unwrap();
    assert_eq!(engine.history_len(), 2);
}

#[test]
fn diagonal_neighbour_survives_fill() {
    // r . .
    // . r .
    // . . .
    let mut engine = three_by_three();
    engine.set_cell(0, 0).unwrap();
    engine.set_cell(1, 1).unwrap();

    engine.set_color("yellow");
    engine.fill(0, 0).unwrap();
    assert_eq!(engine.cell(0, 0), Some("yellow"));
    assert_eq!(engine.cell(1, 1), Some("red"));
    assert_eq!(engine.cell(2, 2), None);
}

#[test]
fn json_file_round_trip_through_engine() {
    let mut engine = three_by_three();
    engine.set_metadata(
        PatternMetadata::new("Checker")
            .with_author("Sam")
            .with_difficulty(Difficulty::Medium),
    );
    for (x, y) in [(0, 0), (2, 0), (1, 1), (0, 2), (2, 2)] {
        engine.set_cell(x, y).unwrap();
    }

    let json = engine.export_pattern().to_json_pretty().unwrap();
    assert!(json.contains("\"2,2\": \"red\""));
    assert!(json.contains("\"created\": 1700000000000"));

    let parsed = Pattern::from_json(&json).unwrap();
    let mut restored = three_by_three();
    let report = restored.load_pattern(&parsed);
    assert_eq!(report.loaded, 5);
    assert_eq!(restored.cells(), engine.cells());
    assert_eq!(restored.metadata().title, "Checker");
    assert_eq!(restored.metadata().created, 1_700_000_000_000);
}

#[test]
fn bill_of_materials_tracks_edits() {
    let mut engine = three_by_three();
    engine.set_cell(0, 0).unwrap();
    engine.set_color("white");
    engine.set_cell(1, 0).unwrap();
    engine.set_cell(2, 0).unwrap();

    let bom = engine.bill_of_materials();
    assert_eq!(bom.count_of("red"), 1);
    assert_eq!(bom.count_of("white"), 2);
    assert_eq!(bom.total(), 3);

    engine.undo();
    assert_eq!(engine.bill_of_materials().count_of("white"), 1);
}

#[test]
fn enclosed_fill_on_largest_board() {
    let max = BoardSpec::MAX_DIMENSION;
    let mut engine =
        PatternEngine::new(EngineConfig::default().with_board(BoardSpec::new(max, max, 5.0).unwrap()));
    engine.set_color("black");
    engine.set_cell(1, 0).unwrap();
    engine.set_cell(0, 1).unwrap();

    engine.set_color("red");
    assert!(engine.fill(0, 0).unwrap());
    assert_eq!(engine.cell(0, 0), Some("red"));
    assert_eq!(engine.cells().len(), 3);
}

#[test]
fn oversized_board_is_rejected() {
    assert!(BoardSpec::new(u32::MAX, u32::MAX, 5.0).is_err());
}
