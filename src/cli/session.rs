use std::io::Write;

use anyhow::Result;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, warn};

use crate::{
    feelings::Feeling,
    storage::{key_value::KeyValueStore, record_store::RecordStore},
    view::{DialogState, TodayView, ViewAction},
};

use super::render::{render_screen, Painter};

/// What a line typed by the user means in the current state of the picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SessionInput {
    Open,
    Cancel,
    Pick(Feeling),
    Quit,
    Unknown,
}

fn interpret(dialog: DialogState, line: &str) -> SessionInput {
    let line = line.trim();
    if line.eq_ignore_ascii_case("q") {
        return SessionInput::Quit;
    }
    match dialog {
        DialogState::Hidden if line.is_empty() || line.eq_ignore_ascii_case("r") => {
            SessionInput::Open
        }
        DialogState::Hidden => SessionInput::Unknown,
        DialogState::Visible if line.eq_ignore_ascii_case("c") => SessionInput::Cancel,
        DialogState::Visible => line
            .parse::<Feeling>()
            .map(SessionInput::Pick)
            .unwrap_or(SessionInput::Unknown),
    }
}

/// Runs the interactive screen until the user quits or the input ends. Returns the final state
/// of the screen.
pub async fn run_session<S: KeyValueStore>(
    records: &RecordStore<S>,
    input: impl AsyncBufRead + Unpin,
    out: &mut impl Write,
    painter: Painter,
) -> Result<TodayView> {
    let mut view = TodayView::default().reduce(ViewAction::Loaded(records.load_today().await));
    info!("Session started with {} records", view.records().len());
    let mut lines = input.lines();

    loop {
        write!(out, "{}", render_screen(&view, painter))?;
        out.flush()?;

        let Some(line) = lines.next_line().await? else {
            writeln!(out)?;
            break;
        };
        writeln!(out)?;

        let action = match interpret(view.dialog(), &line) {
            SessionInput::Quit => break,
            SessionInput::Open => ViewAction::OpenDialog,
            SessionInput::Cancel => ViewAction::Cancel,
            SessionInput::Pick(feeling) => match records.append(feeling).await {
                Some(record) => ViewAction::Appended(record),
                None => ViewAction::AppendFailed,
            },
            SessionInput::Unknown => {
                debug!("Ignoring input {line:?}");
                continue;
            }
        };
        if action == ViewAction::AppendFailed {
            warn!("Feeling was not stored, keeping the picker open");
        }
        view = view.reduce(action);
    }

    info!("Session finished");
    Ok(view)
}

#[cfg(test)]
mod tests {
    use anyhow::Result;
    use tempfile::tempdir;

    use crate::{
        cli::render::Painter,
        feelings::Feeling,
        storage::{
            error::PersistenceError,
            key_value::{FileKeyValueStore, MockKeyValueStore},
            record_store::RecordStore,
        },
        utils::{
            clock::ManualClock,
            logging::TEST_LOGGING,
            time::local_time,
        },
        view::DialogState,
    };

    use super::{interpret, run_session, SessionInput};

    #[test]
    fn test_interpret_depends_on_dialog() {
        assert_eq!(interpret(DialogState::Hidden, "r"), SessionInput::Open);
        assert_eq!(interpret(DialogState::Hidden, ""), SessionInput::Open);
        assert_eq!(interpret(DialogState::Hidden, "1"), SessionInput::Unknown);
        assert_eq!(interpret(DialogState::Hidden, "Q"), SessionInput::Quit);
        assert_eq!(interpret(DialogState::Visible, " c "), SessionInput::Cancel);
        assert_eq!(
            interpret(DialogState::Visible, "3"),
            SessionInput::Pick(Feeling::Fatigue)
        );
        assert_eq!(
            interpret(DialogState::Visible, "头晕"),
            SessionInput::Pick(Feeling::Dizziness)
        );
        assert_eq!(interpret(DialogState::Visible, "r"), SessionInput::Unknown);
        assert_eq!(interpret(DialogState::Visible, "q"), SessionInput::Quit);
    }

    #[tokio::test]
    async fn test_session_records_picked_feelings() -> Result<()> {
        *TEST_LOGGING;
        let dir = tempdir()?;
        let clock = ManualClock::new(local_time(2024, 6, 10, 10, 0));
        let records = RecordStore::new(
            FileKeyValueStore::new(dir.path().to_owned())?,
            Box::new(clock.clone()),
        );

        let mut out = Vec::new();
        let view = run_session(&records, &b"r\n1\n"[..], &mut out, Painter::plain()).await?;
        assert_eq!(view.dialog(), DialogState::Hidden);

        clock.set(local_time(2024, 6, 10, 10, 5));
        let mut out = Vec::new();
        let view = run_session(&records, &b"\nanxiety\nq\n"[..], &mut out, Painter::plain()).await?;

        let rows = view
            .rows()
            .into_iter()
            .map(|v| format!("{}  {}", v.time, v.feeling))
            .collect::<Vec<_>>();
        assert_eq!(rows, vec!["10:05  焦虑", "10:00  饥饿"]);

        let screen = String::from_utf8(out)?;
        assert!(screen.contains("10:00  饥饿"));
        assert!(screen.ends_with("10:05  焦虑\n10:00  饥饿\n\n[r] record a feeling  [q] quit > \n"));

        assert_eq!(records.load_all().await?.len(), 2);
        Ok(())
    }

    #[tokio::test]
    async fn test_session_cancel_records_nothing() -> Result<()> {
        let dir = tempdir()?;
        let clock = ManualClock::new(local_time(2024, 6, 10, 10, 0));
        let records = RecordStore::new(
            FileKeyValueStore::new(dir.path().to_owned())?,
            Box::new(clock),
        );

        let mut out = Vec::new();
        let view = run_session(&records, &b"r\nc\nnonsense\n"[..], &mut out, Painter::plain()).await?;

        assert_eq!(view.dialog(), DialogState::Hidden);
        assert!(view.records().is_empty());
        assert!(records.load_all().await?.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_session_keeps_picker_open_on_failure() -> Result<()> {
        *TEST_LOGGING;
        let mut store = MockKeyValueStore::new();
        store.expect_get().returning(|_| Ok(None));
        store
            .expect_update()
            .times(1)
            .returning(|_, _| Err(PersistenceError::Io(std::io::Error::other("read only"))));
        let clock = ManualClock::new(local_time(2024, 6, 10, 10, 0));
        let records = RecordStore::new(store, Box::new(clock));

        let mut out = Vec::new();
        let view = run_session(&records, &b"r\n2\n"[..], &mut out, Painter::plain()).await?;

        assert_eq!(view.dialog(), DialogState::Visible);
        assert!(view.records().is_empty());
        Ok(())
    }
}
