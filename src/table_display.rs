use crate::config::config::IconConfig;
use crate::page::{Gallery, Severity, Toast};
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use crossterm::style::Stylize;

pub fn display_gallery(gallery: &Gallery) {
    if gallery.is_empty() {
        println!("{}", "No images in gallery.".yellow());
        return;
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);

    let headers: Vec<Cell> = ["#", "Tags", "Likes", "Views", "Comments", "Downloads", "Image"]
        .iter()
        .map(|h| Cell::new(h).add_attribute(Attribute::Bold))
        .collect();
    table.set_header(headers);

    for (idx, card) in gallery.cards().iter().enumerate() {
        let item = &card.item;
        table.add_row(vec![
            (idx + 1).to_string(),
            item.tags.clone(),
            item.likes.to_string(),
            item.views.to_string(),
            item.comments.to_string(),
            item.downloads.to_string(),
            item.full_url.clone(),
        ]);
    }

    println!("{table}");
    println!("\n{}", format!("{} images shown", gallery.len()).green());
}

pub fn toast_line(toast: &Toast, icons: &IconConfig) -> String {
    let (icon, title) = match toast.severity {
        Severity::Warning => (&icons.warning, toast.title.as_str().yellow()),
        Severity::Success => (&icons.success, toast.title.as_str().green()),
        Severity::Info => (&icons.info, toast.title.as_str().cyan()),
        Severity::Error => (&icons.error, toast.title.as_str().red()),
    };
    format!("{} {}: {}", icon, title.bold(), toast.message)
}

pub fn display_toasts(toasts: impl IntoIterator<Item = Toast>, icons: &IconConfig) {
    for toast in toasts {
        match toast.severity {
            Severity::Warning | Severity::Error => eprintln!("{}", toast_line(&toast, icons)),
            Severity::Success | Severity::Info => println!("{}", toast_line(&toast, icons)),
        }
    }
}
