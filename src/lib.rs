use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::mpsc::{SendError, Sender};

use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::{Color, Style};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

use ratatui::widgets::{Block, Borders, Clear, Paragraph, StatefulWidget, Wrap};

pub mod cache;
pub mod clean;
pub mod config;
pub mod derive;
pub mod error;
pub mod error_display;
pub mod filter;
pub mod investigate;
pub mod join;
pub mod logging;
pub mod lookup;
pub mod operations;
pub mod present;
pub mod schema;
pub mod statistics;
pub mod store;
pub mod widgets;

pub use cache::CacheManager;
pub use config::{AppConfig, ConfigManager};
pub use error::{PayscopeError, Result};
pub use operations::{Operation, Outcome, Workspace};
pub use payscope_cli::{Args, Command};
pub use present::{present, present_error, ConsolePresenter, Presenter, Severity};
pub use store::DataPaths;

use widgets::controls::Controls;
use widgets::debug::DebugState;
use widgets::grid::{Grid, GridState};

/// Application name used for config and cache directories
pub const APP_NAME: &str = "payscope";

/// Keyword searched by the chief button.
pub const CHIEF_KEYWORD: &str = "chief";

pub enum AppEvent {
    Key(KeyEvent),
    /// An operation was requested; the busy label renders before it runs.
    Request(Operation),
    /// Internal event that performs the operation after the UI updated.
    Run(Operation),
    Exit,
    Crash(String),
    Resize(u16, u16), // resized (width, height)
}

#[derive(Debug, Default, PartialEq, Eq)]
pub enum InputMode {
    #[default]
    Normal,
    Editing,
}

/// Which form field the input box edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputType {
    PreviewRows,
    Year,
}

impl InputType {
    fn title(self) -> &'static str {
        match self {
            InputType::PreviewRows => "Rows to preview",
            InputType::Year => "Year",
        }
    }
}

#[derive(Default)]
pub struct NoticeModal {
    pub active: bool,
    pub severity: Option<Severity>,
    pub title: String,
    pub message: String,
}

impl NoticeModal {
    pub fn show(&mut self, severity: Severity, title: &str, message: &str) {
        self.active = true;
        self.severity = Some(severity);
        self.title = title.to_string();
        self.message = message.to_string();
    }

    pub fn hide(&mut self) {
        self.active = false;
        self.severity = None;
        self.title.clear();
        self.message.clear();
    }
}

pub struct App {
    workspace: Workspace,
    events: Sender<AppEvent>,
    debug: DebugState,
    grid: GridState,
    lines: Vec<String>,
    input: String,
    pub input_mode: InputMode,
    input_type: Option<InputType>,
    /// Last row count typed in the preview field.
    preview_rows: String,
    pub notice: NoticeModal,
    busy: Option<String>,
    alternate_rows: bool,
}

impl App {
    pub fn new(events: Sender<AppEvent>) -> App {
        App {
            workspace: Workspace::new(DataPaths::default()),
            events,
            debug: DebugState::default(),
            grid: GridState::default(),
            lines: Vec::new(),
            input: String::new(),
            input_mode: InputMode::Normal,
            input_type: None,
            preview_rows: AppConfig::default().display.preview_default_rows.to_string(),
            notice: NoticeModal::default(),
            busy: None,
            alternate_rows: AppConfig::default().display.alternate_row_colors,
        }
    }

    pub fn send_event(&self, event: AppEvent) -> std::result::Result<(), SendError<AppEvent>> {
        self.events.send(event)
    }

    pub fn with_workspace(mut self, workspace: Workspace) -> Self {
        self.workspace = workspace;
        self
    }

    /// Apply display settings from the configuration.
    pub fn with_config(mut self, config: &AppConfig) -> Self {
        self.preview_rows = config.display.preview_default_rows.to_string();
        self.workspace.top_n = config.display.summary_top_n;
        self.alternate_rows = config.display.alternate_row_colors;
        self
    }

    pub fn enable_debug(&mut self) {
        self.debug.enabled = true;
    }

    pub fn grid(&self) -> &GridState {
        &self.grid
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn input_type(&self) -> Option<InputType> {
        self.input_type
    }

    pub fn busy(&self) -> Option<&str> {
        self.busy.as_deref()
    }

    fn start_editing(&mut self, input_type: InputType) {
        self.input = match input_type {
            InputType::PreviewRows => self.preview_rows.clone(),
            InputType::Year => String::new(),
        };
        self.input_type = Some(input_type);
        self.input_mode = InputMode::Editing;
    }

    fn finish_editing(&mut self) -> Option<AppEvent> {
        let text = std::mem::take(&mut self.input);
        self.input_mode = InputMode::Normal;
        let op = match self.input_type.take()? {
            InputType::PreviewRows => {
                self.preview_rows = text.clone();
                Operation::Preview { rows: text }
            }
            InputType::Year => Operation::FilterYear { year: text },
        };
        Some(AppEvent::Request(op))
    }

    fn editing_key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        match event.code {
            KeyCode::Enter => self.finish_editing(),
            KeyCode::Esc => {
                self.input.clear();
                self.input_type = None;
                self.input_mode = InputMode::Normal;
                None
            }
            KeyCode::Backspace => {
                self.input.pop();
                None
            }
            KeyCode::Char(c) => {
                self.input.push(c);
                None
            }
            _ => None,
        }
    }

    fn key(&mut self, event: &KeyEvent) -> Option<AppEvent> {
        self.debug.on_key(event);

        if event.code == KeyCode::Char('c') && event.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppEvent::Exit);
        }

        // Notice modal swallows every other key until dismissed
        if self.notice.active {
            if matches!(event.code, KeyCode::Esc | KeyCode::Enter) {
                self.notice.hide();
            }
            return None;
        }

        if self.input_mode == InputMode::Editing {
            return self.editing_key(event);
        }

        let request = |op| Some(AppEvent::Request(op));
        match event.code {
            KeyCode::Char('q') => Some(AppEvent::Exit),
            KeyCode::Char('p') => {
                self.start_editing(InputType::PreviewRows);
                None
            }
            KeyCode::Char('f') => {
                self.start_editing(InputType::Year);
                None
            }
            KeyCode::Char('c') => request(Operation::SearchTitles {
                keyword: CHIEF_KEYWORD.to_string(),
            }),
            KeyCode::Char('t') => request(Operation::TwoColumns),
            KeyCode::Char('n') => request(Operation::Clean),
            KeyCode::Char('h') => request(Operation::HighEarners),
            KeyCode::Char('m') => request(Operation::FlagManagers),
            KeyCode::Char('s') => request(Operation::Statistics),
            KeyCode::Char('y') => request(Operation::YearlyAverages),
            KeyCode::Char('j') => request(Operation::Join),
            KeyCode::Down => {
                self.grid.select_next();
                None
            }
            KeyCode::Up => {
                self.grid.select_previous();
                None
            }
            KeyCode::PageDown => {
                self.grid.page_down();
                None
            }
            KeyCode::PageUp => {
                self.grid.page_up();
                None
            }
            KeyCode::Right => {
                self.grid.scroll_right();
                None
            }
            KeyCode::Left => {
                self.grid.scroll_left();
                None
            }
            _ => None,
        }
    }

    fn run(&mut self, op: &Operation) -> Option<AppEvent> {
        self.debug.last_operation = op.label().to_string();
        let result = self.workspace.run(op);
        self.busy = None;
        let shown = match result {
            Ok(outcome) => present(&outcome, self),
            Err(e) => present_error(&e, self),
        };
        shown.err().map(|e| AppEvent::Crash(e.to_string()))
    }

    pub fn event(&mut self, event: &AppEvent) -> Option<AppEvent> {
        self.debug.num_events += 1;
        match event {
            AppEvent::Key(key) => self.key(key),
            AppEvent::Request(op) => {
                self.busy = Some(op.label().to_string());
                // Queued so the busy label renders before the run is picked up.
                self.send_event(AppEvent::Run(op.clone()))
                    .err()
                    .map(|_| AppEvent::Crash("event channel closed".to_string()))
            }
            AppEvent::Run(op) => self.run(op),
            _ => None,
        }
    }
}

impl Presenter for App {
    fn show_table(&mut self, frame: &polars::prelude::DataFrame) -> Result<()> {
        self.grid.set_frame(frame.clone());
        Ok(())
    }

    fn show_lines(&mut self, lines: &[String]) -> Result<()> {
        self.lines = lines.to_vec();
        Ok(())
    }

    fn clear(&mut self) -> Result<()> {
        self.grid.clear();
        self.lines.clear();
        Ok(())
    }

    fn notify(&mut self, severity: Severity, title: &str, message: &str) -> Result<()> {
        self.notice.show(severity, title, message);
        Ok(())
    }
}

impl Widget for &mut App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.debug.num_frames += 1;

        let mut constraints = vec![Constraint::Fill(1)];
        if self.input_mode == InputMode::Editing {
            constraints.push(Constraint::Length(3));
        }
        constraints.push(Constraint::Length(1)); // Controls
        if self.debug.enabled {
            constraints.push(Constraint::Length(1));
        }
        let layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(area);

        let main_area = layout[0];
        let has_table = self.grid.frame().is_some();
        let has_lines = !self.lines.is_empty();
        let shade = self.alternate_rows.then_some(Color::DarkGray);
        let grid = Grid::default().with_alternate_row_bg(shade);
        let summary = || {
            Paragraph::new(self.lines.join("\n"))
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).title("Summary"))
        };

        match (has_table, has_lines) {
            (true, true) => {
                let chunks = Layout::default()
                    .direction(Direction::Horizontal)
                    .constraints([Constraint::Fill(1), Constraint::Length(40)])
                    .split(main_area);
                summary().render(chunks[1], buf);
                grid.render(chunks[0], buf, &mut self.grid);
            }
            (true, false) => grid.render(main_area, buf, &mut self.grid),
            (false, true) => summary().render(main_area, buf),
            (false, false) => Paragraph::new("Press a key below to run an operation")
                .centered()
                .style(Style::default().fg(Color::DarkGray))
                .render(main_area, buf),
        }

        let mut next = 1;
        if self.input_mode == InputMode::Editing {
            let title = self.input_type.map_or("Input", InputType::title);
            Paragraph::new(self.input.as_str())
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .title(title)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .render(layout[next], buf);
            next += 1;
        }

        let controls = if has_table {
            Controls::with_row_count(self.grid.num_rows())
        } else {
            Controls::new()
        };
        controls
            .with_dimmed(self.notice.active || self.input_mode == InputMode::Editing)
            .with_busy(self.busy.clone())
            .render(layout[next], buf);

        if self.debug.enabled {
            (&self.debug).render(layout[next + 1], buf);
        }

        if self.notice.active {
            let popup_area = centered_rect(area, 60, 30);
            Clear.render(popup_area, buf);
            let border = match self.notice.severity {
                Some(Severity::Error) => Color::Red,
                _ => Color::Cyan,
            };
            let block = Block::default()
                .borders(Borders::ALL)
                .title(self.notice.title.as_str())
                .border_style(Style::default().fg(border));
            let inner_area = block.inner(popup_area);
            block.render(popup_area, buf);

            let chunks = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(3)])
                .split(inner_area);

            Paragraph::new(self.notice.message.as_str())
                .wrap(Wrap { trim: true })
                .render(chunks[0], buf);
            Paragraph::new("[ OK ]")
                .centered()
                .block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Yellow)),
                )
                .render(chunks[1], buf);
        }
    }
}

fn centered_rect(r: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}
