use crate::page::PageModel;
use crate::widgets::centered_rect;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Overlay for the image the lightbox currently points at
pub fn render_lightbox(f: &mut Frame, area: Rect, page: &PageModel) {
    let Some(index) = page.lightbox.current() else {
        return;
    };
    let entries = page.lightbox.entries();
    let Some(url) = entries.get(index) else {
        return;
    };
    // The lightbox holds links only; details come from the matching card
    let card = page
        .gallery
        .cards()
        .iter()
        .find(|c| &c.item.full_url == url);

    let label = Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD);
    let mut lines = vec![
        Line::from(vec![Span::styled("Image  ", label), Span::raw(url.clone())]),
        Line::from(""),
    ];

    if let Some(card) = card {
        let item = &card.item;
        lines.push(Line::from(vec![
            Span::styled("Tags   ", label),
            Span::raw(item.tags.clone()),
        ]));
        if let Some(user) = &item.user {
            lines.push(Line::from(vec![
                Span::styled("By     ", label),
                Span::raw(user.clone()),
            ]));
        }
        if let Some(page_url) = &item.page_url {
            lines.push(Line::from(vec![
                Span::styled("Page   ", label),
                Span::raw(page_url.clone()),
            ]));
        }
        lines.push(Line::from(""));
        lines.push(Line::from(format!(
            "Likes {}   Views {}   Comments {}   Downloads {}",
            item.likes, item.views, item.comments, item.downloads
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "←/→ previous/next   y copy URL   Esc close",
        Style::default().fg(Color::DarkGray),
    )));

    let popup = centered_rect(80, 50, area);
    f.render_widget(Clear, popup);
    f.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title(format!(" {} / {} ", index + 1, entries.len())),
            )
            .wrap(Wrap { trim: false }),
        popup,
    );
}
