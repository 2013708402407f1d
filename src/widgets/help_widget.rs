use crate::widgets::centered_rect;
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Actions that can be returned from the help widget
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HelpAction {
    None,
    Exit,
    ScrollUp,
    ScrollDown,
}

/// Help popup that manages its own scroll position
#[derive(Debug, Default)]
pub struct HelpWidget {
    scroll_offset: u16,
}

fn heading(text: &'static str) -> Line<'static> {
    Line::from(text).style(
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )
}

impl HelpWidget {
    pub fn new() -> Self {
        Self::default()
    }

    fn lines() -> Vec<Line<'static>> {
        vec![
            Line::from("pixsearch - Pixabay image search").style(
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::from(""),
            heading("SEARCH"),
            Line::from("  Enter    - Search for the typed query"),
            Line::from("  Tab      - Move to the gallery"),
            Line::from("  Esc      - Quit"),
            Line::from(""),
            heading("GALLERY"),
            Line::from("  j/k ↑/↓  - Select card"),
            Line::from("  g/G      - First/last card"),
            Line::from("  Enter    - Open lightbox"),
            Line::from("  m        - Load more"),
            Line::from("  y        - Copy full image URL"),
            Line::from("  e        - Export gallery as HTML"),
            Line::from("  / or Tab - Back to search"),
            Line::from("  q / Esc  - Quit"),
            Line::from(""),
            heading("LIGHTBOX"),
            Line::from("  ←/→      - Previous/next image"),
            Line::from("  y        - Copy full image URL"),
            Line::from("  Esc      - Close"),
            Line::from(""),
            heading("GLOBAL"),
            Line::from("  F1       - Toggle this help"),
            Line::from("  F5       - Toggle log panel"),
        ]
    }

    pub fn reset(&mut self) {
        self.scroll_offset = 0;
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> HelpAction {
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::F(1) => HelpAction::Exit,
            KeyCode::Char('j') | KeyCode::Down => {
                let max = Self::lines().len().saturating_sub(1) as u16;
                self.scroll_offset = (self.scroll_offset + 1).min(max);
                HelpAction::ScrollDown
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.scroll_offset = self.scroll_offset.saturating_sub(1);
                HelpAction::ScrollUp
            }
            _ => HelpAction::None,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(70, 70, area);
        f.render_widget(Clear, popup);
        f.render_widget(
            Paragraph::new(Self::lines())
                .block(Block::default().borders(Borders::ALL).title("Help"))
                .wrap(Wrap { trim: false })
                .scroll((self.scroll_offset, 0)),
            popup,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyModifiers;

    #[test]
    fn test_help_scroll_and_exit() {
        let mut help = HelpWidget::new();
        let down = KeyEvent::new(KeyCode::Down, KeyModifiers::empty());
        let up = KeyEvent::new(KeyCode::Up, KeyModifiers::empty());

        assert_eq!(help.handle_key(up), HelpAction::ScrollUp);
        assert_eq!(help.scroll_offset, 0);
        help.handle_key(down);
        help.handle_key(down);
        assert_eq!(help.scroll_offset, 2);

        let esc = KeyEvent::new(KeyCode::Esc, KeyModifiers::empty());
        assert_eq!(help.handle_key(esc), HelpAction::Exit);
    }
}
