//! Gallery rendering helpers
//!
//! Card markup is produced by pure functions; the remaining helpers act on
//! parts of the [`PageModel`](crate::page::PageModel) and keep no state.

use crate::api_client::ResultItem;
use crate::page::{Gallery, GalleryCard, Viewport, Visibility};

/// Rows advanced per card height after a load-more
pub const SCROLL_FACTOR: usize = 2;

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for ch in raw.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn info_item(label: &str, value: u64) -> String {
    format!(
        r#"      <div class="info-item">
        <span class="info-label">{label}</span>
        <span class="info-value">{value}</span>
      </div>
"#
    )
}

/// Markup for a single gallery card
pub fn card_markup(item: &ResultItem) -> String {
    let full = escape_html(&item.full_url);
    let preview = escape_html(&item.preview_url);
    let tags = escape_html(&item.tags);

    let mut out = String::new();
    out.push_str("<li class=\"gallery-item\">\n");
    out.push_str(&format!("  <a class=\"gallery-link\" href=\"{full}\">\n"));
    out.push_str(&format!(
        "    <img class=\"gallery-image\" src=\"{preview}\" alt=\"{tags}\" loading=\"lazy\" />\n"
    ));
    out.push_str("    <div class=\"image-info\">\n");
    out.push_str(&info_item("Likes", item.likes));
    out.push_str(&info_item("Views", item.views));
    out.push_str(&info_item("Comments", item.comments));
    out.push_str(&info_item("Downloads", item.downloads));
    out.push_str("    </div>\n  </a>\n</li>\n");
    out
}

/// One fragment per item, in input order, concatenated
pub fn render_cards(items: &[ResultItem]) -> String {
    items.iter().map(card_markup).collect()
}

/// Toggle an optional element; absent elements are ignored
pub fn set_visible<E: Visibility>(element: Option<&mut E>, visible: bool) {
    if let Some(element) = element {
        element.set_visible(visible);
    }
}

pub fn clear(gallery: &mut Gallery) {
    gallery.clear();
}

/// Add cards after the existing ones without touching them
pub fn append_cards(gallery: &mut Gallery, items: &[ResultItem]) {
    for item in items {
        gallery.push(GalleryCard {
            markup: card_markup(item),
            item: item.clone(),
        });
    }
}

pub fn scroll_to_new_content(viewport: &mut Viewport, card_height: usize) {
    viewport.offset += card_height * SCROLL_FACTOR;
}

/// Standalone HTML document wrapping the gallery markup
pub fn gallery_document(title: &str, gallery: &Gallery) -> String {
    let title = escape_html(title);
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <title>{title}</title>
  <style>
    .gallery {{ display: flex; flex-wrap: wrap; gap: 24px; list-style: none; padding: 0; }}
    .gallery-item {{ width: 360px; border: 1px solid #808080; }}
    .gallery-image {{ width: 100%; height: 200px; object-fit: cover; display: block; }}
    .image-info {{ display: flex; justify-content: space-around; padding: 4px 0; }}
    .info-item {{ display: flex; flex-direction: column; align-items: center; font-size: 12px; }}
    .info-label {{ font-weight: 600; }}
  </style>
</head>
<body>
  <h1>{title}</h1>
  <ul class="gallery">
{cards}  </ul>
</body>
</html>
"#,
        cards = gallery.markup()
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::page::{Element, LoadMoreButton};

    fn item(n: u64) -> ResultItem {
        ResultItem {
            id: Some(n),
            preview_url: format!("https://cdn.example/{n}_640.jpg"),
            full_url: format!("https://cdn.example/{n}_1280.jpg"),
            page_url: None,
            tags: format!("tag{n}"),
            user: None,
            likes: n,
            views: n * 10,
            comments: 0,
            downloads: n * 2,
        }
    }

    #[test]
    fn test_card_markup_contains_links_and_stats() {
        let markup = card_markup(&item(7));
        assert!(markup.contains(r#"href="https://cdn.example/7_1280.jpg""#));
        assert!(markup.contains(r#"src="https://cdn.example/7_640.jpg""#));
        assert!(markup.contains(r#"alt="tag7""#));
        assert!(markup.contains(r#"loading="lazy""#));
        assert!(markup.contains("<span class=\"info-value\">70</span>"));
        assert!(markup.starts_with("<li class=\"gallery-item\">"));
    }

    #[test]
    fn test_card_markup_escapes_attributes() {
        let mut hostile = item(1);
        hostile.tags = "a\" onerror=\"x <b>".to_string();
        let markup = card_markup(&hostile);
        assert!(markup.contains("alt=\"a&quot; onerror=&quot;x &lt;b&gt;\""));
    }

    #[test]
    fn test_render_cards_preserves_order() {
        let items = vec![item(3), item(1), item(2)];
        let markup = render_cards(&items);
        let first = markup.find("tag3").unwrap();
        let second = markup.find("tag1").unwrap();
        let third = markup.find("tag2").unwrap();
        assert!(first < second && second < third);
        assert_eq!(markup.matches("gallery-item").count(), 3);
        assert_eq!(render_cards(&[]), "");
    }

    #[test]
    fn test_append_keeps_existing_cards() {
        let mut gallery = Gallery::default();
        append_cards(&mut gallery, &[item(1), item(2)]);
        let before = gallery.cards()[0].clone();

        append_cards(&mut gallery, &[item(3)]);
        assert_eq!(gallery.len(), 3);
        assert_eq!(gallery.cards()[0], before);
        assert_eq!(gallery.markup(), render_cards(&[item(1), item(2), item(3)]));

        clear(&mut gallery);
        assert!(gallery.is_empty());
    }

    #[test]
    fn test_set_visible_is_idempotent_and_tolerates_absence() {
        let mut loader = Element::hidden();
        set_visible(Some(&mut loader), true);
        set_visible(Some(&mut loader), true);
        assert!(loader.is_visible());

        set_visible::<LoadMoreButton>(None, true);
    }

    #[test]
    fn test_scroll_advances_by_two_cards() {
        let mut viewport = Viewport::default();
        scroll_to_new_content(&mut viewport, 4);
        assert_eq!(viewport.offset, 8);
    }

    #[test]
    fn test_gallery_document_wraps_cards() {
        let mut gallery = Gallery::default();
        append_cards(&mut gallery, &[item(1)]);
        let doc = gallery_document("cats & dogs", &gallery);
        assert!(doc.contains("<title>cats &amp; dogs</title>"));
        assert!(doc.contains("<ul class=\"gallery\">"));
        assert!(doc.contains("tag1"));
    }
}
