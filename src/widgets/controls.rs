use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style, Stylize},
    widgets::{Paragraph, Widget},
};

/// Key and label of every button on the form.
pub const CONTROLS: [(&str, &str); 11] = [
    ("p", "Preview"),
    ("c", "Chief"),
    ("t", "Columns"),
    ("n", "Clean"),
    ("h", "High"),
    ("m", "Managers"),
    ("s", "Stats"),
    ("y", "ByYear"),
    ("f", "Year"),
    ("j", "Join"),
    ("q", "Quit"),
];

#[derive(Default)]
pub struct Controls {
    pub row_count: Option<usize>,
    pub dimmed: bool,
    /// Label of the operation in progress.
    pub busy: Option<String>,
}

impl Controls {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_row_count(row_count: usize) -> Self {
        Self {
            row_count: Some(row_count),
            ..Self::default()
        }
    }

    pub fn with_dimmed(mut self, dimmed: bool) -> Self {
        self.dimmed = dimmed;
        self
    }

    pub fn with_busy(mut self, busy: Option<String>) -> Self {
        self.busy = busy;
        self
    }
}

impl Widget for &Controls {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let mut constraints = CONTROLS.iter().fold(vec![], |mut acc, (key, action)| {
            acc.push(Constraint::Length(key.chars().count() as u16 + 2));
            acc.push(Constraint::Length(action.chars().count() as u16 + 1));
            acc
        });

        let status = match (&self.busy, self.row_count) {
            (Some(label), _) => Some(format!("{label}...")),
            (None, Some(count)) => Some(format!("Rows: {}", count)),
            (None, None) => None,
        };
        if let Some(text) = &status {
            constraints.push(Constraint::Length(text.chars().count() as u16 + 2));
        }
        constraints.push(Constraint::Fill(1));

        let layout = Layout::new(Direction::Horizontal, constraints).split(area);
        let color = Color::DarkGray;

        let base_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default()
        };

        for (i, (key, action)) in CONTROLS.iter().enumerate() {
            let j = i * 2;
            Paragraph::new(*key)
                .style(base_style.bold())
                .centered()
                .render(layout[j], buf);
            Paragraph::new(*action)
                .style(base_style.bg(color))
                .render(layout[j + 1], buf);
        }

        let mut fill_start_idx = CONTROLS.len() * 2;
        if let Some(text) = status {
            let fg = if self.busy.is_some() {
                Color::Yellow
            } else if self.dimmed {
                Color::DarkGray
            } else {
                Color::White
            };
            Paragraph::new(text)
                .style(base_style.bg(color).fg(fg))
                .right_aligned()
                .render(layout[fill_start_idx], buf);
            fill_start_idx += 1;
        }

        Paragraph::new("")
            .style(base_style.bg(color))
            .render(layout[fill_start_idx], buf);
    }
}
