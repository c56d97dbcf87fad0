use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use payscope::config::AppConfig;
use payscope::{App, AppEvent};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::Color;
use ratatui::widgets::Widget;
use std::sync::mpsc;

mod common;
use common::cleaned_workspace;

#[test]
fn test_config_sets_preview_default() {
    let mut config = AppConfig::default();
    config.display.preview_default_rows = 4;

    let (tx, _) = mpsc::channel();
    let mut app = App::new(tx).with_config(&config);
    app.event(&AppEvent::Key(KeyEvent::new(
        KeyCode::Char('p'),
        KeyModifiers::NONE,
    )));
    assert_eq!(app.input(), "4");
}

#[test]
fn test_config_limits_top_titles() {
    let mut config = AppConfig::default();
    config.display.summary_top_n = 1;

    let (_dir, ws) = cleaned_workspace();
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(tx).with_workspace(ws).with_config(&config);

    let mut next = app.event(&AppEvent::Key(KeyEvent::new(
        KeyCode::Char('s'),
        KeyModifiers::NONE,
    )));
    while let Some(event) = next.take().or_else(|| rx.try_recv().ok()) {
        next = app.event(&event);
    }
    assert!(app.lines().iter().any(|l| l == "Top 1 job titles:"));
}

/// Background of the second data row after showing the high earners.
fn second_row_background(config: &AppConfig) -> Color {
    let (_dir, ws) = cleaned_workspace();
    let (tx, rx) = mpsc::channel();
    let mut app = App::new(tx).with_workspace(ws).with_config(config);
    let mut next = app.event(&AppEvent::Key(KeyEvent::new(
        KeyCode::Char('h'),
        KeyModifiers::NONE,
    )));
    while let Some(event) = next.take().or_else(|| rx.try_recv().ok()) {
        next = app.event(&event);
    }

    let area = Rect::new(0, 0, 80, 10);
    let mut buf = Buffer::empty(area);
    (&mut app).render(area, &mut buf);
    // header on line 0, data rows from line 1
    buf[(0, 2)].bg
}

#[test]
fn test_alternate_row_colors_setting() {
    let mut config = AppConfig::default();
    assert!(config.display.alternate_row_colors);
    assert_eq!(second_row_background(&config), Color::DarkGray);

    config.display.alternate_row_colors = false;
    assert_eq!(second_row_background(&config), Color::Reset);
}
