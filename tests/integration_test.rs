use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use payscope::{App, AppEvent, InputMode, InputType, Operation, Severity, Workspace};
use std::sync::mpsc::{self, Receiver};

mod common;
use common::{cleaned_workspace, raw_workspace, CLEANED_ROWS};

/// The form together with the receiving end of its event channel.
struct Form {
    app: App,
    rx: Receiver<AppEvent>,
}

impl Form {
    fn new(workspace: Workspace) -> Self {
        let (tx, rx) = mpsc::channel();
        Form {
            app: App::new(tx).with_workspace(workspace),
            rx,
        }
    }

    fn key(&mut self, code: KeyCode) -> Option<AppEvent> {
        self.app
            .event(&AppEvent::Key(KeyEvent::new(code, KeyModifiers::NONE)))
    }

    /// Feed returned and queued events back until nothing is left to do.
    fn settle(&mut self, mut next: Option<AppEvent>) {
        while let Some(event) = next.take().or_else(|| self.rx.try_recv().ok()) {
            if matches!(event, AppEvent::Exit | AppEvent::Crash(_)) {
                panic!("unexpected exit");
            }
            next = self.app.event(&event);
        }
    }

    fn press(&mut self, c: char) {
        let next = self.key(KeyCode::Char(c));
        self.settle(next);
    }
}

#[test]
fn test_app_creation() {
    let (tx, _) = mpsc::channel();
    let app = App::new(tx);
    assert_eq!(app.input_mode, InputMode::Normal);
    assert!(app.grid().frame().is_none());
}

#[test]
fn test_request_marks_busy_before_running() {
    let (_dir, ws) = raw_workspace();
    let mut form = Form::new(ws);
    let next = form.key(KeyCode::Char('n'));
    assert!(matches!(next, Some(AppEvent::Request(Operation::Clean))));

    // the run is queued on the channel, not performed right away
    assert!(form.app.event(&next.unwrap()).is_none());
    assert_eq!(form.app.busy(), Some("Clean"));
    let run = form.rx.try_recv().unwrap();
    assert!(matches!(run, AppEvent::Run(Operation::Clean)));

    assert!(form.app.event(&run).is_none());
    assert_eq!(form.app.busy(), None);
    assert_eq!(form.app.grid().num_rows(), CLEANED_ROWS);
    // cleaning announces itself
    assert!(form.app.notice.active);
    assert_eq!(form.app.notice.severity, Some(Severity::Info));
}

#[test]
fn test_preview_prompt_flow() {
    let (_dir, ws) = raw_workspace();
    let mut form = Form::new(ws);

    form.press('p');
    assert_eq!(form.app.input_mode, InputMode::Editing);
    assert_eq!(form.app.input_type(), Some(InputType::PreviewRows));
    assert_eq!(form.app.input(), "10");

    form.key(KeyCode::Backspace);
    form.key(KeyCode::Backspace);
    form.press('2');
    let next = form.key(KeyCode::Enter);
    form.settle(next);

    assert_eq!(form.app.input_mode, InputMode::Normal);
    assert_eq!(form.app.grid().num_rows(), 2);
    assert!(!form.app.notice.active);
}

#[test]
fn test_invalid_preview_shows_error_modal() {
    let (_dir, ws) = raw_workspace();
    let mut form = Form::new(ws);
    form.press('p');
    form.key(KeyCode::Backspace);
    form.key(KeyCode::Backspace);
    form.press('0');
    let next = form.key(KeyCode::Enter);
    form.settle(next);

    assert!(form.app.notice.active);
    assert_eq!(form.app.notice.severity, Some(Severity::Error));
    assert_eq!(form.app.notice.message, "Enter a valid positive number");

    // the modal swallows keys until dismissed
    assert!(form.key(KeyCode::Char('q')).is_none());
    form.key(KeyCode::Esc);
    assert!(!form.app.notice.active);
    assert!(matches!(form.key(KeyCode::Char('q')), Some(AppEvent::Exit)));
}

#[test]
fn test_missing_file_is_reported() {
    let dir = tempfile::TempDir::new().unwrap();
    let mut form = Form::new(Workspace::new(payscope::DataPaths::under(dir.path())));
    form.press('h');
    assert!(form.app.notice.active);
    assert!(form.app.notice.message.ends_with("cleaned_data.csv not found"));
}

#[test]
fn test_empty_result_clears_display() {
    let (_dir, ws) = cleaned_workspace();
    let mut form = Form::new(ws);
    form.press('h');
    assert_eq!(form.app.grid().num_rows(), 3);

    form.press('f');
    assert_eq!(form.app.input_type(), Some(InputType::Year));
    for c in "1999".chars() {
        form.press(c);
    }
    let next = form.key(KeyCode::Enter);
    form.settle(next);

    assert!(form.app.grid().frame().is_none());
    assert!(form.app.notice.active);
    assert_eq!(form.app.notice.severity, Some(Severity::Info));
}

#[test]
fn test_statistics_and_join_fill_summary() {
    let (_dir, ws) = cleaned_workspace();
    let mut form = Form::new(ws);
    form.press('s');
    assert!(form.app.grid().frame().is_none());
    assert_eq!(form.app.lines()[0], "Rows: 5");

    form.press('j');
    assert_eq!(form.app.grid().num_rows(), CLEANED_ROWS);
    assert_eq!(form.app.lines().last().unwrap(), "Unmatched rows: 1");
}

#[test]
fn test_escape_cancels_prompt() {
    let mut form = Form::new(Workspace::new(payscope::DataPaths::default()));
    form.press('f');
    form.press('2');
    assert!(form.key(KeyCode::Esc).is_none());
    assert_eq!(form.app.input_mode, InputMode::Normal);
    assert_eq!(form.app.input(), "");
}

#[test]
fn test_ctrl_c_exits_while_editing() {
    let mut form = Form::new(Workspace::new(payscope::DataPaths::default()));
    form.press('f');
    assert_eq!(form.app.input_mode, InputMode::Editing);
    let next = form.app.event(&AppEvent::Key(KeyEvent::new(
        KeyCode::Char('c'),
        KeyModifiers::CONTROL,
    )));
    assert!(matches!(next, Some(AppEvent::Exit)));
    assert_eq!(form.app.input(), "");
}
