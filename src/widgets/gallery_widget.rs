//! Card gallery rendering for the terminal UI

use crate::page::{GalleryCard, PageModel, Viewport, Visibility};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

const SPINNER: [&str; 4] = ["|", "/", "-", "\\"];

/// Options that affect how cards are drawn
#[derive(Debug, Clone, Copy)]
pub struct GalleryStyle {
    pub show_stats: bool,
    pub use_glyphs: bool,
}

fn card_lines(
    index: usize,
    card: &GalleryCard,
    selected: bool,
    style: GalleryStyle,
    card_height: usize,
) -> Vec<Line<'static>> {
    let item = &card.item;
    let marker = if selected { ">> " } else { "   " };
    let title_style = if selected {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD | Modifier::REVERSED)
    } else {
        Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
    };

    let mut lines = vec![Line::from(vec![
        Span::raw(marker),
        Span::styled(format!("#{:<3} {}", index + 1, item.tags), title_style),
    ])];

    if style.show_stats {
        let (likes, views, comments, downloads) = if style.use_glyphs {
            ("♥", "👁", "💬", "⬇")
        } else {
            ("Likes", "Views", "Comments", "Downloads")
        };
        lines.push(Line::from(vec![
            Span::raw("     "),
            Span::styled(format!("{} {}", likes, item.likes), Style::default().fg(Color::Red)),
            Span::raw("  "),
            Span::styled(format!("{} {}", views, item.views), Style::default().fg(Color::Cyan)),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", comments, item.comments),
                Style::default().fg(Color::Green),
            ),
            Span::raw("  "),
            Span::styled(
                format!("{} {}", downloads, item.downloads),
                Style::default().fg(Color::Magenta),
            ),
        ]));
    }

    lines.push(Line::from(Span::styled(
        format!("     {}", item.preview_url),
        Style::default().fg(Color::DarkGray),
    )));

    while lines.len() < card_height {
        lines.push(Line::from(""));
    }
    lines.truncate(card_height.max(1));
    lines
}

/// Keep the selected card inside the visible rows
pub fn follow_selection(viewport: &mut Viewport, selected: usize, card_height: usize, rows: usize) {
    if rows == 0 {
        return;
    }
    let top = selected * card_height;
    let bottom = top + card_height;
    if top < viewport.offset {
        viewport.offset = top;
    } else if bottom > viewport.offset + rows {
        viewport.offset = bottom.saturating_sub(rows);
    }
}

/// Draw the gallery, loader and load-more button
pub fn render_gallery(
    f: &mut Frame,
    area: Rect,
    page: &PageModel,
    selected: Option<usize>,
    style: GalleryStyle,
    tick: usize,
) {
    let mut lines: Vec<Line> = Vec::new();
    for (idx, card) in page.gallery.cards().iter().enumerate() {
        lines.extend(card_lines(
            idx,
            card,
            selected == Some(idx),
            style,
            page.card_height,
        ));
    }

    if page.is_loading() {
        lines.push(Line::from(Span::styled(
            format!("   {} Loading images...", SPINNER[tick % SPINNER.len()]),
            Style::default().fg(Color::Yellow),
        )));
    }

    if let Some(button) = page.load_more.as_ref().filter(|b| b.is_visible()) {
        let button_style = if button.is_enabled() {
            Style::default()
                .fg(Color::Black)
                .bg(Color::Cyan)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Gray).bg(Color::DarkGray)
        };
        lines.push(Line::from(""));
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("[ {} ]", button.label()), button_style),
            Span::styled("  (m)", Style::default().fg(Color::DarkGray)),
        ]));
    }

    if lines.is_empty() {
        lines.push(Line::from(Span::styled(
            "Type a query above and press Enter to search Pixabay",
            Style::default().fg(Color::DarkGray),
        )));
    }

    let title = format!("Gallery ({} images)", page.gallery.len());
    let offset = u16::try_from(page.viewport.offset).unwrap_or(u16::MAX);
    let paragraph = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((offset, 0));
    f.render_widget(paragraph, area);
}
