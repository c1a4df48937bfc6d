//! Integration tests for the labeling session controller: startup
//! positioning, navigation notices, unreadable-item skipping, the
//! save/undo persistence discipline and playback cancellation.

mod common;

use common::{StubSource, animated_gif_dir, options_in, placeholder_gif_dir, pointer_for, write_store};
use giflabel::label::{CatalogError, StoreError};
use giflabel::{
    Command, GifFolderSource, InputEvent, LabelStore, Notice, Session, SessionError, dispatch,
};

fn open_with_stub(
    dir: &tempfile::TempDir,
    source: StubSource,
) -> (Session, Vec<Notice>) {
    Session::open(options_in(dir), Box::new(source)).expect("session should open")
}

#[test]
fn startup_lands_on_first_unlabeled_item() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif", "c.gif"]);
    write_store(&dir.path().join("labels.csv"), &[("a.gif", 45.0)]);

    let (session, notices) = open_with_stub(&dir, StubSource::new(3));
    assert_eq!(session.cursor(), 1);
    assert_eq!(session.current_name(), "b.gif");
    assert_eq!(
        notices,
        vec![Notice::Loaded {
            index: 1,
            name: "b.gif".to_string()
        }]
    );
}

#[test]
fn startup_with_everything_labeled_starts_at_zero_for_review() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    write_store(
        &dir.path().join("labels.csv"),
        &[("a.gif", 10.0), ("b.gif", 20.0)],
    );

    let (session, _) = open_with_stub(&dir, StubSource::new(2));
    assert_eq!(session.cursor(), 0);
    // The stored label shows up as the persistent selection.
    assert_eq!(session.pending(), Some(10.0));
}

#[test]
fn startup_fails_when_source_directory_is_missing() {
    let dir = placeholder_gif_dir(&["a.gif"]);
    let mut options = options_in(&dir);
    options.source_dir = dir.path().join("nope");

    let err = Session::open(options, Box::new(StubSource::new(1))).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Catalog(CatalogError::SourceNotFound(_))
    ));
}

#[test]
fn startup_fails_on_corrupt_store() {
    let dir = placeholder_gif_dir(&["a.gif"]);
    std::fs::write(dir.path().join("labels.csv"), "filename,angle\na.gif,oops\n").unwrap();

    let err = Session::open(options_in(&dir), Box::new(StubSource::new(1))).unwrap_err();
    assert!(matches!(
        err,
        SessionError::Store(StoreError::Corrupt { .. })
    ));
}

#[test]
fn navigation_reports_both_ends_without_moving() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    assert_eq!(session.retreat(), vec![Notice::StartOfSequence]);
    assert_eq!(session.cursor(), 0);

    session.advance();
    assert_eq!(session.advance(), vec![Notice::EndOfSequence]);
    assert_eq!(session.cursor(), 1);
}

#[test]
fn landing_resets_the_pending_selection() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    session.select(pointer_for(session.viewport(), 90.0));
    assert!(session.pending().is_some());

    session.advance();
    assert_eq!(session.pending(), None);
}

#[test]
fn unreadable_items_are_reported_and_skipped() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif", "c.gif"]);
    let source = StubSource::new(2).with_unreadable(&["b.gif"]);
    let (mut session, _) = open_with_stub(&dir, source);

    let notices = session.advance();
    assert_eq!(session.cursor(), 2);
    assert!(matches!(
        notices[0],
        Notice::SkippedUnreadable { ref name, .. } if name == "b.gif"
    ));
    assert!(matches!(notices[1], Notice::Loaded { index: 2, .. }));
}

#[test]
fn unreadable_final_item_stays_put_with_nothing_on_display() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let source = StubSource::new(2).with_unreadable(&["b.gif"]);
    let (mut session, _) = open_with_stub(&dir, source);

    let notices = session.advance();
    assert_eq!(session.cursor(), 1);
    assert_eq!(notices.last(), Some(&Notice::EndOfSequence));
    assert!(session.current_frame().is_none());
}

#[test]
fn save_writes_the_store_and_advances_to_next_unlabeled() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif", "c.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    session.select(pointer_for(session.viewport(), 57.3));
    let notices = session.save().expect("save should succeed");

    assert!(matches!(
        notices[0],
        Notice::Saved { ref name, angle } if name == "a.gif" && (angle - 57.3).abs() < 1e-6
    ));
    assert_eq!(session.cursor(), 1);

    let reloaded = LabelStore::new(dir.path().join("labels.csv")).load().unwrap();
    let stored = reloaded.get("a.gif").copied().expect("row should exist");
    assert!((stored - 57.3).abs() < 0.01, "two-decimal round trip");
}

#[test]
fn save_without_selection_does_no_io() {
    let dir = placeholder_gif_dir(&["a.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    let notices = session.save().expect("no-selection save is not an error");
    assert_eq!(notices, vec![Notice::NoSelection]);
    assert!(!dir.path().join("labels.csv").exists());
}

#[test]
fn undo_removes_the_row_entirely() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    session.select(pointer_for(session.viewport(), 90.0));
    session.save().unwrap();

    // Save auto-advanced to b.gif; go back to the labeled item.
    session.retreat();
    let notices = session.undo().expect("undo should succeed");
    assert!(matches!(notices[0], Notice::Removed { ref name } if name == "a.gif"));
    assert_eq!(session.pending(), None);

    let text = std::fs::read_to_string(dir.path().join("labels.csv")).unwrap();
    assert_eq!(text, "filename,angle\n", "no placeholder row remains");
}

#[test]
fn undo_without_a_label_is_a_silent_noop() {
    let dir = placeholder_gif_dir(&["a.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    let notices = session.undo().expect("noop undo is not an error");
    assert!(notices.is_empty());
    assert!(!dir.path().join("labels.csv").exists());
}

#[test]
fn failed_store_write_leaves_the_mapping_untouched() {
    let dir = placeholder_gif_dir(&["a.gif"]);
    let mut options = options_in(&dir);
    // Parent directory of the store does not exist, so every write fails.
    options.store_path = dir.path().join("missing").join("labels.csv");
    let (mut session, _) = Session::open(options, Box::new(StubSource::new(2))).unwrap();

    session.select(pointer_for(session.viewport(), 90.0));
    let err = session.save().unwrap_err();
    assert!(matches!(err, StoreError::Write { .. }));

    // The pre-write mapping is still the source of truth.
    assert!(session.labels().is_empty());
    assert!(session.pending().is_some());
    assert_eq!(session.cursor(), 0, "no auto-advance after a failed save");
}

#[test]
fn seek_visits_every_unlabeled_item_once_per_lap() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif", "c.gif", "d.gif", "e.gif"]);
    write_store(
        &dir.path().join("labels.csv"),
        &[("b.gif", 1.0), ("d.gif", 2.0)],
    );

    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));
    assert_eq!(session.cursor(), 0);

    // Static mapping: repeated seeks cycle a -> c -> e -> a without
    // visiting any unlabeled item twice per lap.
    let mut visited = Vec::new();
    for _ in 0..4 {
        session.seek_next_unlabeled();
        visited.push(session.cursor());
    }
    assert_eq!(visited, vec![2, 4, 0, 2]);
}

#[test]
fn seek_with_everything_labeled_falls_back_to_advance() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    write_store(
        &dir.path().join("labels.csv"),
        &[("a.gif", 1.0), ("b.gif", 2.0)],
    );

    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));
    let notices = session.seek_next_unlabeled();
    assert_eq!(notices[0], Notice::AllLabeled);
    assert_eq!(session.cursor(), 1);
}

#[test]
fn stale_playback_ticks_are_rejected_after_navigation() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(3));

    let stale = session.playback().generation();
    assert_eq!(session.tick(stale), Some(1));

    session.advance();
    assert_eq!(session.tick(stale), None, "old timer may not touch the new item");
    assert_eq!(session.playback().current_frame(), 0);
    assert_eq!(session.tick(session.playback().generation()), Some(1));
}

#[test]
fn progress_counts_labeled_items_against_the_catalog() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif", "c.gif"]);
    write_store(&dir.path().join("labels.csv"), &[("c.gif", 3.0)]);

    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));
    assert_eq!(session.progress().labeled, 1);
    assert_eq!(session.progress().total, 3);

    session.select(pointer_for(session.viewport(), 90.0));
    session.save().unwrap();
    assert_eq!(session.progress().labeled, 2);
}

#[test]
fn real_gif_source_decodes_and_resizes_to_the_viewport() {
    let dir = animated_gif_dir(&["a.gif", "b.gif"]);
    let options = options_in(&dir);
    let source = GifFolderSource::new(dir.path(), options.viewport);

    let (session, notices) = Session::open(options, Box::new(source)).unwrap();
    assert!(matches!(notices[0], Notice::Loaded { index: 0, .. }));

    let frame = session.current_frame().expect("frames should be loaded");
    assert_eq!((frame.width(), frame.height()), (400, 200));
    assert!(session.playback().is_running());
}

#[test]
fn dispatch_routes_commands_to_the_session() {
    let dir = placeholder_gif_dir(&["a.gif", "b.gif"]);
    let (mut session, _) = open_with_stub(&dir, StubSource::new(2));

    dispatch(&mut session, InputEvent::Command(Command::Next)).unwrap();
    assert_eq!(session.cursor(), 1);
    dispatch(&mut session, InputEvent::Command(Command::Previous)).unwrap();
    assert_eq!(session.cursor(), 0);

    let p = pointer_for(session.viewport(), 120.0);
    // Motion never mutates the pending selection; a press commits it.
    dispatch(&mut session, InputEvent::PointerMoved(p)).unwrap();
    assert_eq!(session.pending(), None);
    let notices = dispatch(&mut session, InputEvent::PointerPressed(p)).unwrap();
    assert!(matches!(notices[0], Notice::Selected { angle } if (angle - 120.0).abs() < 1e-6));

    dispatch(&mut session, InputEvent::Command(Command::Save)).unwrap();
    let reloaded = LabelStore::new(dir.path().join("labels.csv")).load().unwrap();
    assert!(reloaded.contains_key("a.gif"));
}
