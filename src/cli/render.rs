use std::fmt::Write;

use ansi_term::{Colour, Style};

use crate::view::{DialogState, DisplayRow, TodayView};

/// Applies terminal styling, or leaves text untouched when output isn't a terminal.
#[derive(Debug, Clone, Copy)]
pub struct Painter {
    colored: bool,
}

impl Painter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    pub fn plain() -> Self {
        Self { colored: false }
    }

    fn paint(&self, style: Style, text: &str) -> String {
        if self.colored {
            style.paint(text).to_string()
        } else {
            text.to_string()
        }
    }
}

pub fn render_row(row: &DisplayRow, painter: Painter) -> String {
    format!(
        "{}  {}",
        painter.paint(Colour::Cyan.bold(), &row.time),
        row.feeling
    )
}

/// Today's records, most recent first.
pub fn render_today(view: &TodayView, painter: Painter) -> String {
    let rows = view.rows();
    if rows.is_empty() {
        return format!("{}\n", painter.paint(Style::new().dimmed(), "Nothing recorded today"));
    }
    let mut out = String::new();
    for row in rows {
        let _ = writeln!(out, "{}", render_row(&row, painter));
    }
    out
}

pub fn render_palette(painter: Painter) -> String {
    let mut out = String::new();
    for (number, feeling) in TodayView::palette() {
        let _ = writeln!(
            out,
            "  {}. {} {}",
            painter.paint(Style::new().bold(), &number.to_string()),
            feeling,
            painter.paint(Style::new().dimmed(), &format!("({})", feeling.alias())),
        );
    }
    out
}

/// The whole screen: header, today's list and either the picker or the main action.
pub fn render_screen(view: &TodayView, painter: Painter) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", painter.paint(Colour::Purple.bold(), "今日感受 · Today"));
    out.push_str(&render_today(view, painter));
    out.push('\n');
    match view.dialog() {
        DialogState::Hidden => {
            let _ = write!(out, "[r] record a feeling  [q] quit > ");
        }
        DialogState::Visible => {
            let _ = writeln!(out, "{}", painter.paint(Style::new().bold(), "How do you feel?"));
            out.push_str(&render_palette(painter));
            let _ = write!(out, "pick 1-{} or [c] cancel > ", TodayView::palette().count());
        }
    }
    out
}
