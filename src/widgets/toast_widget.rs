//! Notification stack drawn in the top-right corner

use crate::config::config::IconConfig;
use crate::page::{Severity, Toasts};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const TOAST_WIDTH: u16 = 44;
const TOAST_HEIGHT: u16 = 4;
const MAX_VISIBLE: usize = 3;

fn severity_color(severity: Severity) -> Color {
    match severity {
        Severity::Warning => Color::Yellow,
        Severity::Success => Color::Green,
        Severity::Info => Color::Cyan,
        Severity::Error => Color::Red,
    }
}

fn severity_icon(severity: Severity, icons: &IconConfig) -> &str {
    match severity {
        Severity::Warning => &icons.warning,
        Severity::Success => &icons.success,
        Severity::Info => &icons.info,
        Severity::Error => &icons.error,
    }
}

/// Draw the newest notifications, most recent on top
pub fn render_toasts(f: &mut Frame, area: Rect, toasts: &Toasts, icons: &IconConfig) {
    let width = TOAST_WIDTH.min(area.width);
    let x = area.x + area.width.saturating_sub(width + 1);
    let mut y = area.y + 1;

    let newest: Vec<_> = toasts.iter().rev().take(MAX_VISIBLE).collect();
    for toast in newest {
        if y + TOAST_HEIGHT > area.y + area.height {
            break;
        }
        let rect = Rect::new(x, y, width, TOAST_HEIGHT);
        let color = severity_color(toast.severity);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(color))
            .title(Line::from(vec![
                Span::raw(format!(" {} ", severity_icon(toast.severity, icons))),
                Span::styled(
                    format!("{} ", toast.title),
                    Style::default().fg(color).add_modifier(Modifier::BOLD),
                ),
            ]));

        f.render_widget(Clear, rect);
        f.render_widget(
            Paragraph::new(toast.message.as_str())
                .block(block)
                .wrap(Wrap { trim: true }),
            rect,
        );
        y += TOAST_HEIGHT;
    }
}
