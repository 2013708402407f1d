//! In-memory page model
//!
//! The session controller never talks to a terminal directly. It mutates a
//! `PageModel` (gallery, loader, load-more button, form, notifications,
//! lightbox, viewport) and the front-ends render whatever the model holds.

use crate::api_client::ResultItem;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

pub const LOAD_MORE_LABEL: &str = "Load more";
pub const LOADING_LABEL: &str = "Loading...";

/// Maximum notifications kept on the surface at once
const MAX_TOASTS: usize = 8;

/// Anything whose visibility can be toggled
pub trait Visibility {
    fn is_visible(&self) -> bool;
    fn set_visible(&mut self, visible: bool);
}

/// A plain show/hide element such as the loader
#[derive(Debug, Clone, Default)]
pub struct Element {
    visible: bool,
    show_count: usize,
    hide_count: usize,
}

impl Element {
    pub fn hidden() -> Self {
        Self::default()
    }

    /// How many times the element was asked to become visible
    pub fn show_count(&self) -> usize {
        self.show_count
    }

    /// How many times the element was asked to hide
    pub fn hide_count(&self) -> usize {
        self.hide_count
    }
}

impl Visibility for Element {
    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        if visible {
            self.show_count += 1;
        } else {
            self.hide_count += 1;
        }
        self.visible = visible;
    }
}

#[derive(Debug, Clone)]
pub struct LoadMoreButton {
    element: Element,
    enabled: bool,
    label: String,
}

impl Default for LoadMoreButton {
    fn default() -> Self {
        Self {
            element: Element::hidden(),
            enabled: true,
            label: LOAD_MORE_LABEL.to_string(),
        }
    }
}

impl LoadMoreButton {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Visible and clickable
    pub fn is_actionable(&self) -> bool {
        self.element.is_visible() && self.enabled
    }

    pub fn set_busy(&mut self) {
        self.enabled = false;
        self.label = LOADING_LABEL.to_string();
    }

    pub fn restore(&mut self) {
        self.enabled = true;
        self.label = LOAD_MORE_LABEL.to_string();
    }
}

impl Visibility for LoadMoreButton {
    fn is_visible(&self) -> bool {
        self.element.is_visible()
    }

    fn set_visible(&mut self, visible: bool) {
        self.element.set_visible(visible);
    }
}

/// A rendered card: the item plus the markup fragment produced for it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GalleryCard {
    pub item: ResultItem,
    pub markup: String,
}

#[derive(Debug, Clone, Default)]
pub struct Gallery {
    cards: Vec<GalleryCard>,
}

impl Gallery {
    pub fn cards(&self) -> &[GalleryCard] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub(crate) fn push(&mut self, card: GalleryCard) {
        self.cards.push(card);
    }

    pub(crate) fn clear(&mut self) {
        self.cards.clear();
    }

    /// All card fragments concatenated in display order
    pub fn markup(&self) -> String {
        self.cards.iter().map(|c| c.markup.as_str()).collect()
    }
}

/// The search form; holds the text typed so far
#[derive(Debug, Clone, Default)]
pub struct SearchForm {
    value: String,
    reset_count: usize,
}

impl SearchForm {
    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn set_value(&mut self, value: impl Into<String>) {
        self.value = value.into();
    }

    pub fn reset(&mut self) {
        self.value.clear();
        self.reset_count += 1;
    }

    pub fn reset_count(&self) -> usize {
        self.reset_count
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Success,
    Info,
    Error,
}

#[derive(Debug, Clone)]
pub struct Toast {
    pub severity: Severity,
    pub title: String,
    pub message: String,
    pub created: Instant,
}

impl Toast {
    pub fn new(severity: Severity, title: &str, message: impl Into<String>) -> Self {
        Self {
            severity,
            title: title.to_string(),
            message: message.into(),
            created: Instant::now(),
        }
    }
}

/// Notification surface, newest last
#[derive(Debug, Clone, Default)]
pub struct Toasts {
    entries: VecDeque<Toast>,
}

impl Toasts {
    pub fn push(&mut self, toast: Toast) {
        if self.entries.len() >= MAX_TOASTS {
            self.entries.pop_front();
        }
        self.entries.push_back(toast);
    }

    pub fn warning(&mut self, title: &str, message: impl Into<String>) {
        self.push(Toast::new(Severity::Warning, title, message));
    }

    pub fn success(&mut self, title: &str, message: impl Into<String>) {
        self.push(Toast::new(Severity::Success, title, message));
    }

    pub fn info(&mut self, title: &str, message: impl Into<String>) {
        self.push(Toast::new(Severity::Info, title, message));
    }

    pub fn error(&mut self, title: &str, message: impl Into<String>) {
        self.push(Toast::new(Severity::Error, title, message));
    }

    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &Toast> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&Toast> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop notifications older than `ttl`
    pub fn expire(&mut self, now: Instant, ttl: Duration) {
        self.entries
            .retain(|t| now.saturating_duration_since(t.created) < ttl);
    }

    pub fn drain(&mut self) -> impl Iterator<Item = Toast> + '_ {
        self.entries.drain(..)
    }
}

/// Overlay viewer bound to the gallery's full-size links
///
/// It only knows the links it saw on its last scan, so it must be refreshed
/// after every render or append.
#[derive(Debug, Clone, Default)]
pub struct Lightbox {
    entries: Vec<String>,
    refresh_count: usize,
    open_at: Option<usize>,
}

impl Lightbox {
    pub fn refresh(&mut self, gallery: &Gallery) {
        self.entries = gallery
            .cards()
            .iter()
            .map(|c| c.item.full_url.clone())
            .collect();
        self.refresh_count += 1;
        if let Some(idx) = self.open_at {
            if idx >= self.entries.len() {
                self.open_at = None;
            }
        }
    }

    pub fn entries(&self) -> &[String] {
        &self.entries
    }

    pub fn refresh_count(&self) -> usize {
        self.refresh_count
    }

    pub fn open(&mut self, index: usize) -> bool {
        if index < self.entries.len() {
            self.open_at = Some(index);
            true
        } else {
            false
        }
    }

    pub fn close(&mut self) {
        self.open_at = None;
    }

    pub fn current(&self) -> Option<usize> {
        self.open_at
    }

    pub fn next(&mut self) {
        if let Some(idx) = self.open_at {
            if !self.entries.is_empty() {
                self.open_at = Some((idx + 1) % self.entries.len());
            }
        }
    }

    pub fn previous(&mut self) {
        if let Some(idx) = self.open_at {
            if !self.entries.is_empty() {
                self.open_at = Some(idx.checked_sub(1).unwrap_or(self.entries.len() - 1));
            }
        }
    }
}

/// Vertical scroll position of the gallery, in rows
#[derive(Debug, Clone, Copy, Default)]
pub struct Viewport {
    pub offset: usize,
}

/// Everything the user can see
#[derive(Debug, Clone)]
pub struct PageModel {
    pub form: SearchForm,
    pub gallery: Gallery,
    pub loader: Option<Element>,
    pub load_more: Option<LoadMoreButton>,
    pub toasts: Toasts,
    pub lightbox: Lightbox,
    pub viewport: Viewport,
    /// Rows one card occupies when rendered
    pub card_height: usize,
}

impl Default for PageModel {
    fn default() -> Self {
        Self {
            form: SearchForm::default(),
            gallery: Gallery::default(),
            loader: Some(Element::hidden()),
            load_more: Some(LoadMoreButton::default()),
            toasts: Toasts::default(),
            lightbox: Lightbox::default(),
            viewport: Viewport::default(),
            card_height: 4,
        }
    }
}

impl PageModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.loader.as_ref().is_some_and(|l| l.is_visible())
    }

    pub fn load_more_visible(&self) -> bool {
        self.load_more.as_ref().is_some_and(|b| b.is_visible())
    }

    pub fn load_more_actionable(&self) -> bool {
        self.load_more.as_ref().is_some_and(|b| b.is_actionable())
    }
}
