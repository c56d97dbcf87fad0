//! Scrollable view of a DataFrame.

use polars::prelude::*;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Cell, Paragraph, Row, StatefulWidget, Table, TableState, Widget},
};

#[derive(Default)]
pub struct GridState {
    df: Option<DataFrame>,
    /// Index of the first row on screen.
    pub start_row: usize,
    /// Index of the first column on screen.
    pub start_col: usize,
    pub visible_rows: usize,
    table_state: TableState,
}

impl GridState {
    pub fn set_frame(&mut self, df: DataFrame) {
        self.df = Some(df);
        self.start_row = 0;
        self.start_col = 0;
        self.table_state.select(None);
    }

    pub fn clear(&mut self) {
        self.df = None;
        self.start_row = 0;
        self.start_col = 0;
        self.table_state.select(None);
    }

    pub fn frame(&self) -> Option<&DataFrame> {
        self.df.as_ref()
    }

    pub fn num_rows(&self) -> usize {
        self.df.as_ref().map_or(0, |df| df.height())
    }

    fn num_cols(&self) -> usize {
        self.df.as_ref().map_or(0, |df| df.width())
    }

    fn max_start(&self) -> usize {
        self.num_rows().saturating_sub(self.visible_rows)
    }

    fn slide(&mut self, rows: i64) {
        let next = (self.start_row as i64 + rows).max(0) as usize;
        self.start_row = next.min(self.max_start());
    }

    pub fn select_next(&mut self) {
        let selected = self.table_state.selected().map_or(0, |s| s + 1);
        if selected >= self.visible_rows && self.visible_rows > 0 {
            self.slide(1);
            self.table_state.select(Some(self.visible_rows - 1));
        } else if self.start_row + selected < self.num_rows() {
            self.table_state.select(Some(selected));
        }
    }

    pub fn select_previous(&mut self) {
        match self.table_state.selected() {
            Some(0) | None => {
                self.slide(-1);
                self.table_state.select(Some(0));
            }
            Some(s) => self.table_state.select(Some(s - 1)),
        }
    }

    pub fn page_down(&mut self) {
        self.slide(self.visible_rows as i64);
    }

    pub fn page_up(&mut self) {
        self.slide(-(self.visible_rows as i64));
    }

    pub fn scroll_right(&mut self) {
        if self.start_col + 1 < self.num_cols() {
            self.start_col += 1;
        }
    }

    pub fn scroll_left(&mut self) {
        self.start_col = self.start_col.saturating_sub(1);
    }
}

pub struct Grid {
    pub header_fg: Color,
    pub alternate_row_bg: Option<Color>,
    pub cell_padding: u16,
}

impl Default for Grid {
    fn default() -> Self {
        Self {
            header_fg: Color::Cyan,
            alternate_row_bg: None,
            cell_padding: 1,
        }
    }
}

impl Grid {
    pub fn with_alternate_row_bg(mut self, color: Option<Color>) -> Self {
        self.alternate_row_bg = color;
        self
    }
}

/// Display width of `text` in characters, clamped to `u16::MAX`.
fn text_width(text: &str) -> u16 {
    u16::try_from(text.chars().count()).unwrap_or(u16::MAX)
}

fn cell_text(value: &AnyValue<'_>) -> String {
    if matches!(value, AnyValue::Null) {
        String::new()
    } else {
        value.str_value().into_owned()
    }
}

impl StatefulWidget for Grid {
    type State = GridState;

    fn render(self, area: Rect, buf: &mut Buffer, state: &mut Self::State) {
        state.visible_rows = area.height.saturating_sub(1) as usize;
        state.start_row = state.start_row.min(state.max_start());

        let Some(df) = state.df.as_ref() else {
            Paragraph::new("No table").centered().render(area, buf);
            return;
        };

        let height = df.height().saturating_sub(state.start_row).min(state.visible_rows);
        let window = df.slice(state.start_row as i64, height);

        let mut widths: Vec<u16> = Vec::new();
        let mut headers: Vec<Span> = Vec::new();
        let mut rows: Vec<Vec<Cell>> = vec![vec![]; height];
        let mut used_width: u16 = 0;

        for column in window.get_columns().iter().skip(state.start_col) {
            let mut max_len = text_width(column.name());
            let mut cells = Vec::with_capacity(height);
            for row_index in 0..height {
                let text = cell_text(&column.get(row_index).unwrap_or(AnyValue::Null));
                max_len = max_len.max(text_width(&text));
                cells.push(text);
            }

            let overflows = used_width.saturating_add(max_len) > area.width;
            let width = if overflows {
                // Text columns are cut at the edge; others are left for the next scroll.
                if column.dtype() != &DataType::String || used_width >= area.width {
                    break;
                }
                area.width - used_width
            } else {
                max_len
            };

            widths.push(width);
            headers.push(Span::raw(column.name().to_string()));
            for (row, text) in rows.iter_mut().zip(cells) {
                row.push(Cell::from(Line::from(text)));
            }
            used_width = used_width
                .saturating_add(width)
                .saturating_add(self.cell_padding);
            if overflows {
                break;
            }
        }

        let rows: Vec<Row> = rows
            .into_iter()
            .enumerate()
            .map(|(row_index, row)| {
                let style = match self.alternate_row_bg {
                    Some(c) if row_index % 2 == 1 => Style::default().bg(c),
                    _ => Style::default(),
                };
                Row::new(row).style(style)
            })
            .collect();

        StatefulWidget::render(
            Table::new(rows, widths)
                .column_spacing(self.cell_padding)
                .header(Row::new(headers).style(Style::default().fg(self.header_fg)))
                .row_highlight_style(Style::default().add_modifier(Modifier::REVERSED)),
            area,
            buf,
            &mut state.table_state,
        );
    }
}
