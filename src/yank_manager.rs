use crate::page::Gallery;
use anyhow::{anyhow, Result};
use arboard::Clipboard;

/// Manages clipboard operations for gallery cards
pub struct YankManager;

/// Result of a yank operation
pub struct YankResult {
    pub description: String,
    pub preview: String,
    pub full_value: String,
}

impl YankManager {
    /// Copy the full-size image URL of a card
    pub fn yank_full_url(gallery: &Gallery, index: usize) -> Result<YankResult> {
        let card = gallery
            .cards()
            .get(index)
            .ok_or_else(|| anyhow!("Card index out of bounds"))?;

        let value = card.item.full_url.clone();

        let mut clipboard = Clipboard::new()?;
        clipboard.set_text(&value)?;

        Ok(YankResult {
            description: format!("card #{}", index + 1),
            preview: Self::preview(&value),
            full_value: value,
        })
    }

    fn preview(value: &str) -> String {
        if value.chars().count() > 40 {
            let head: String = value.chars().take(37).collect();
            format!("{}...", head)
        } else {
            value.to_string()
        }
    }
}
