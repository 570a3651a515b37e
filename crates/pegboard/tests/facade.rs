//! Facade smoke tests: the prelude is enough to drive an editing session.

#![cfg(feature = "runtime")]

use pegboard::prelude::*;

fn paint_heart(session: &mut EditorSession) -> Result<()> {
    for (x, y) in [(1, 0), (3, 0), (0, 1), (2, 1), (4, 1), (1, 2), (3, 2), (2, 3)] {
        session.set_cell(x, y)?;
    }
    Ok(())
}

#[test]
fn prelude_drives_a_session() {
    let board = BoardSpec::new(5, 5, 5.0).unwrap();
    let mut session = EditorSession::new(
        SessionConfig::default().with_engine(EngineConfig::default().with_board(board)),
    );
    paint_heart(&mut session).unwrap();
    assert_eq!(session.engine().cells().len(), 8);
    assert_eq!(session.engine().bill_of_materials().count_of("red"), 8);
}

#[test]
fn errors_convert_into_facade_error() {
    let board = BoardSpec::new(2, 2, 5.0).unwrap();
    let mut session = EditorSession::new(
        SessionConfig::default().with_engine(EngineConfig::default().with_board(board)),
    );
    let err = paint_heart(&mut session).unwrap_err();
    assert!(matches!(err, Error::Engine(_)));
    assert!(std::error::Error::source(&err).is_some());

    let err: Error = BoardSpec::new(0, 3, 5.0).unwrap_err().into();
    assert!(matches!(err, Error::Board(_)));

    let err: Error = pegboard::decode("1,x").unwrap_err().into();
    assert!(matches!(err, Error::Key(_)));
    assert!(!err.to_string().is_empty());
}

#[test]
fn session_persists_through_file_storage() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("session.json");
    {
        let mut session =
            EditorSession::with_storage(SessionConfig::default(), Box::new(FileStorage::new(&path)));
        session.set_tool(Tool::Fill);
        session.fill(0, 0).unwrap();
    }
    let session =
        EditorSession::with_storage(SessionConfig::default(), Box::new(FileStorage::new(&path)));
    let board = session.engine().board().clone();
    assert_eq!(session.engine().cells().len(), board.cell_count());
    assert_eq!(session.engine().active_tool(), Tool::Fill);
}
