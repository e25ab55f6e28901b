// Figure state machine and artifact continuation-marker contract.
use std::path::PathBuf;

use terraplot::{ErrorKind, Figure, FigureState, Session};

fn init_tracing() {
    use tracing_subscriber::EnvFilter;
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .try_init();
}

fn artifact_path(dir: &tempfile::TempDir) -> PathBuf {
    dir.path().join("map.ps")
}

#[test]
fn marker_sequence_matches_append_count() {
    init_tracing();
    for appends in 1usize..=4 {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = artifact_path(&dir);
        let session = Session::open().expect("open");

        let mut figure = Figure::new(&session, &path);
        for _ in 0..appends {
            figure.append("basemap", "-R0/10/0/10").expect("append");
        }
        figure.finalize().expect("finalize");

        let text = std::fs::read_to_string(&path).expect("read artifact");
        let opens = text.matches("%!ATLASPS").count();
        let continues = text.matches("%%AtlasContinue").count();
        let trailers = text.matches("%%EOF").count();
        assert_eq!(opens, 1, "appends={appends}");
        assert_eq!(continues, appends - 1, "appends={appends}");
        assert_eq!(trailers, 1, "appends={appends}");

        // Open first, continuations in the middle, trailer last.
        let open_at = text.find("%!ATLASPS").expect("open marker");
        let trailer_at = text.find("%%EOF").expect("trailer");
        assert!(open_at < trailer_at);
        if let Some(continue_at) = text.find("%%AtlasContinue") {
            assert!(open_at < continue_at && continue_at < trailer_at);
        }
        assert!(text.trim_end().ends_with("%%EOF"));
    }
}

#[test]
fn append_after_finalize_fails_without_touching_the_artifact() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact_path(&dir);
    let session = Session::open().expect("open");

    let mut figure = Figure::new(&session, &path);
    figure.append("basemap", "-R0/1/0/1").expect("append");
    figure.finalize().expect("finalize");
    let before = std::fs::read(&path).expect("read");

    let err = figure.append("basemap", "-R0/1/0/1").expect_err("finalized");
    assert_eq!(err.kind(), ErrorKind::Finalized);
    assert_eq!(figure.state(), FigureState::Finalized);
    assert_eq!(std::fs::read(&path).expect("read"), before);
}

#[test]
fn finalize_on_empty_reports_empty_artifact_and_emits_nothing() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact_path(&dir);
    let session = Session::open().expect("open");

    let mut figure = Figure::new(&session, &path);
    let err = figure.finalize().expect_err("empty artifact");
    assert_eq!(err.kind(), ErrorKind::EmptyArtifact);
    assert!(!path.exists());
}

#[test]
fn dropping_an_open_figure_leaves_a_terminated_sink() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact_path(&dir);
    let session = Session::open().expect("open");

    {
        let mut figure = Figure::new(&session, &path);
        figure.append("basemap", "-R0/1/0/1").expect("append");
    }

    let text = std::fs::read_to_string(&path).expect("read artifact");
    assert!(text.trim_end().ends_with("%%EOF"));
}

#[test]
fn a_new_figure_on_the_same_path_starts_fresh() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact_path(&dir);
    let session = Session::open().expect("open");

    let mut first = Figure::new(&session, &path);
    first.append("basemap", "-R0/1/0/1").expect("append");
    first.finalize().expect("finalize");

    let mut second = Figure::new(&session, &path);
    second.append("basemap", "-R0/2/0/2").expect("append");
    second.finalize().expect("finalize");

    let text = std::fs::read_to_string(&path).expect("read artifact");
    assert_eq!(text.matches("%!ATLASPS").count(), 1);
    assert_eq!(text.matches("%%EOF").count(), 1);
    assert!(text.contains("basemap 0/2/0/2"));
    assert!(!text.contains("basemap 0/1/0/1"));
}

#[test]
fn session_close_is_idempotent_after_figure_work() {
    init_tracing();
    let dir = tempfile::tempdir().expect("tempdir");
    let path = artifact_path(&dir);
    let mut session = Session::open().expect("open");

    {
        let mut figure = Figure::new(&session, &path);
        figure.append("basemap", "-R0/1/0/1").expect("append");
        figure.finalize().expect("finalize");
    }

    session.close();
    session.close();
    assert!(session.is_closed());
}
