use crate::api_client::ImageSearch;
use crate::config::config::Config;
use crate::page::PageModel;
use crate::render;
use crate::session::{Applied, FetchKind, FetchOutcome, SearchSession, SessionPhase};
use crate::utils::app_paths::AppPaths;
use crate::utils::logging::LogRingBuffer;
use crate::widgets::centered_rect;
use crate::widgets::gallery_widget::{follow_selection, render_gallery, GalleryStyle};
use crate::widgets::help_widget::{HelpAction, HelpWidget};
use crate::widgets::lightbox_widget::render_lightbox;
use crate::widgets::toast_widget::render_toasts;
use crate::yank_manager::YankManager;
use anyhow::{Context, Result};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::{Backend, CrosstermBackend},
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use std::io;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info, warn};
use tui_input::{backend::crossterm::EventHandler, Input};

const POLL_INTERVAL: Duration = Duration::from_millis(50);
const LOG_PANEL_LINES: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    Search,
    Gallery,
}

/// Typed user intents produced from key events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppAction {
    SubmitSearch(String),
    LoadMore,
    SelectNext,
    SelectPrevious,
    SelectFirst,
    SelectLast,
    OpenLightbox,
    CloseLightbox,
    LightboxNext,
    LightboxPrevious,
    YankUrl,
    ExportHtml,
    FocusSearch,
    FocusGallery,
    ToggleHelp,
    ToggleLogs,
    Quit,
}

pub struct TuiApp {
    session: SearchSession<dyn ImageSearch>,
    page: PageModel,
    config: Config,
    input: Input,
    mode: AppMode,
    selected: Option<usize>,
    help: HelpWidget,
    show_help: bool,
    show_logs: bool,
    log_buffer: Option<LogRingBuffer>,
    status_message: String,
    outcome_tx: UnboundedSender<FetchOutcome>,
    outcome_rx: UnboundedReceiver<FetchOutcome>,
    gallery_rows: usize,
    tick: usize,
    should_quit: bool,
}

impl TuiApp {
    pub fn new(
        client: Arc<dyn ImageSearch>,
        config: Config,
        log_buffer: Option<LogRingBuffer>,
    ) -> Self {
        let (outcome_tx, outcome_rx) = mpsc::unbounded_channel();
        let session =
            SearchSession::new(client).with_strict_validation(config.search.strict_validation);

        Self {
            session,
            page: PageModel::new(),
            config,
            input: Input::default(),
            mode: AppMode::Search,
            selected: None,
            help: HelpWidget::new(),
            show_help: false,
            show_logs: false,
            log_buffer,
            status_message: "Type a query and press Enter - F1 for help".to_string(),
            outcome_tx,
            outcome_rx,
            gallery_rows: 0,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn page(&self) -> &PageModel {
        &self.page
    }

    pub fn mode(&self) -> AppMode {
        self.mode
    }

    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let toast_ttl = Duration::from_secs(self.config.display.toast_seconds);

        while !self.should_quit {
            self.drain_outcomes();
            self.page.toasts.expire(Instant::now(), toast_ttl);
            self.tick = self.tick.wrapping_add(1);

            terminal.draw(|f| self.ui(f))?;

            if event::poll(POLL_INTERVAL)? {
                if let Event::Key(key) = event::read()? {
                    if let Some(action) = self.handle_key(key) {
                        self.apply(action);
                    }
                }
            }
            tokio::task::yield_now().await;
        }
        Ok(())
    }

    /// Apply every fetch outcome that has arrived
    fn drain_outcomes(&mut self) {
        while let Ok(outcome) = self.outcome_rx.try_recv() {
            self.apply_outcome(outcome);
        }
    }

    pub fn apply_outcome(&mut self, outcome: FetchOutcome) {
        let kind = outcome.ticket.kind;
        let applied = self
            .session
            .complete(&mut self.page, outcome.ticket, outcome.result);
        if applied == Applied::Stale {
            return;
        }

        if kind == FetchKind::NewSearch {
            if self.page.gallery.is_empty() {
                self.selected = None;
            } else {
                self.selected = Some(0);
                self.mode = AppMode::Gallery;
            }
        }
        self.sync_input_with_form();
        self.status_message = self.describe_state();
    }

    /// The form is reset by the session; mirror that into the text input
    fn sync_input_with_form(&mut self) {
        if self.input.value() != self.page.form.value() {
            self.input = Input::default().with_value(self.page.form.value().to_string());
        }
    }

    fn describe_state(&self) -> String {
        let state = self.session.state();
        match self.session.phase() {
            SessionPhase::Idle => "Ready".to_string(),
            SessionPhase::Searching => format!("Searching for '{}'...", state.query),
            SessionPhase::LoadingMore => format!("Loading page {}...", state.page),
            SessionPhase::Ready { has_more } => format!(
                "'{}' - page {}/{} - {} hits{}",
                state.query,
                state.page,
                state.total_pages(),
                state.total_hits,
                if has_more { " - m to load more" } else { "" }
            ),
        }
    }

    /// Map a key to an action for the current mode
    pub fn handle_key(&mut self, key: KeyEvent) -> Option<AppAction> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            return Some(AppAction::Quit);
        }

        if self.show_help {
            return match self.help.handle_key(key) {
                HelpAction::Exit => Some(AppAction::ToggleHelp),
                _ => None,
            };
        }

        match key.code {
            KeyCode::F(1) => return Some(AppAction::ToggleHelp),
            KeyCode::F(5) => return Some(AppAction::ToggleLogs),
            _ => {}
        }

        if self.page.lightbox.current().is_some() {
            return match key.code {
                KeyCode::Esc | KeyCode::Char('q') => Some(AppAction::CloseLightbox),
                KeyCode::Right | KeyCode::Char('l') => Some(AppAction::LightboxNext),
                KeyCode::Left | KeyCode::Char('h') => Some(AppAction::LightboxPrevious),
                KeyCode::Char('y') => Some(AppAction::YankUrl),
                _ => None,
            };
        }

        match self.mode {
            AppMode::Search => match key.code {
                KeyCode::Enter => Some(AppAction::SubmitSearch(self.input.value().to_string())),
                KeyCode::Tab => Some(AppAction::FocusGallery),
                KeyCode::Esc => Some(AppAction::Quit),
                _ => {
                    self.input.handle_event(&Event::Key(key));
                    self.page.form.set_value(self.input.value());
                    None
                }
            },
            AppMode::Gallery => match key.code {
                KeyCode::Char('j') | KeyCode::Down => Some(AppAction::SelectNext),
                KeyCode::Char('k') | KeyCode::Up => Some(AppAction::SelectPrevious),
                KeyCode::Char('g') | KeyCode::Home => Some(AppAction::SelectFirst),
                KeyCode::Char('G') | KeyCode::End => Some(AppAction::SelectLast),
                KeyCode::Enter => Some(AppAction::OpenLightbox),
                KeyCode::Char('m') => Some(AppAction::LoadMore),
                KeyCode::Char('y') => Some(AppAction::YankUrl),
                KeyCode::Char('e') => Some(AppAction::ExportHtml),
                KeyCode::Char('/') | KeyCode::Tab => Some(AppAction::FocusSearch),
                KeyCode::Esc | KeyCode::Char('q') => Some(AppAction::Quit),
                _ => None,
            },
        }
    }

    pub fn apply(&mut self, action: AppAction) {
        debug!(target: "tui", "Action: {:?}", action);
        match action {
            AppAction::SubmitSearch(query) => {
                self.page.lightbox.close();
                if let Some(ticket) = self.session.begin_search(&mut self.page, &query) {
                    self.selected = None;
                    self.status_message = format!("Searching for '{}'...", ticket.query);
                    self.session.spawn_fetch(ticket, self.outcome_tx.clone());
                }
            }
            AppAction::LoadMore => {
                if !self.page.load_more_actionable() {
                    return;
                }
                if let Some(ticket) = self.session.begin_load_more(&mut self.page) {
                    self.status_message = format!("Loading page {}...", ticket.page);
                    self.session.spawn_fetch(ticket, self.outcome_tx.clone());
                }
            }
            AppAction::SelectNext => self.move_selection(|idx, len| (idx + 1).min(len - 1)),
            AppAction::SelectPrevious => self.move_selection(|idx, _| idx.saturating_sub(1)),
            AppAction::SelectFirst => self.move_selection(|_, _| 0),
            AppAction::SelectLast => self.move_selection(|_, len| len - 1),
            AppAction::OpenLightbox => {
                if let Some(idx) = self.selected {
                    self.page.lightbox.open(idx);
                }
            }
            AppAction::CloseLightbox => self.page.lightbox.close(),
            AppAction::LightboxNext => self.page.lightbox.next(),
            AppAction::LightboxPrevious => self.page.lightbox.previous(),
            AppAction::YankUrl => self.yank_url(),
            AppAction::ExportHtml => self.export_html(),
            AppAction::FocusSearch => self.mode = AppMode::Search,
            AppAction::FocusGallery => {
                if !self.page.gallery.is_empty() {
                    self.mode = AppMode::Gallery;
                    self.selected.get_or_insert(0);
                }
            }
            AppAction::ToggleHelp => {
                self.show_help = !self.show_help;
                self.help.reset();
            }
            AppAction::ToggleLogs => self.show_logs = !self.show_logs,
            AppAction::Quit => self.should_quit = true,
        }
    }

    fn move_selection(&mut self, step: impl Fn(usize, usize) -> usize) {
        let len = self.page.gallery.len();
        if len == 0 {
            self.selected = None;
            return;
        }
        let next = step(self.selected.unwrap_or(0), len);
        self.selected = Some(next);
        follow_selection(
            &mut self.page.viewport,
            next,
            self.page.card_height,
            self.gallery_rows,
        );
    }

    fn yank_url(&mut self) {
        let index = self.page.lightbox.current().or(self.selected);
        let Some(index) = index else {
            return;
        };
        match YankManager::yank_full_url(&self.page.gallery, index) {
            Ok(result) => {
                self.status_message = format!("Copied {}: {}", result.description, result.preview);
                debug!(target: "tui", "Yanked {}", result.full_value);
            }
            Err(e) => {
                warn!(target: "tui", "Yank failed: {}", e);
                self.status_message = format!("Copy failed: {}", e);
            }
        }
    }

    fn export_html(&mut self) {
        if self.page.gallery.is_empty() {
            self.status_message = "Nothing to export".to_string();
            return;
        }
        match self.write_export() {
            Ok(path) => {
                info!(target: "tui", "Exported gallery to {}", path.display());
                self.page
                    .toasts
                    .success("Exported", format!("Gallery saved to {}", path.display()));
            }
            Err(e) => {
                warn!(target: "tui", "Export failed: {:#}", e);
                self.page.toasts.error("Export failed", e.to_string());
            }
        }
    }

    fn write_export(&self) -> Result<std::path::PathBuf> {
        let query = &self.session.state().query;
        let path = AppPaths::default_export_file(query)?;
        let doc = render::gallery_document(query, &self.page.gallery);
        std::fs::write(&path, doc)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(path)
    }

    fn ui(&mut self, f: &mut Frame) {
        let full = f.area();
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Search input
                Constraint::Min(5),    // Gallery
                Constraint::Length(1), // Status bar
            ])
            .split(full);

        let input_style = if self.mode == AppMode::Search {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input_paragraph = Paragraph::new(self.input.value())
            .block(Block::default().borders(Borders::ALL).title("Search images"))
            .style(input_style);
        f.render_widget(input_paragraph, chunks[0]);

        if self.mode == AppMode::Search && self.page.lightbox.current().is_none() {
            f.set_cursor_position((
                chunks[0].x + self.input.visual_cursor() as u16 + 1,
                chunks[0].y + 1,
            ));
        }

        self.gallery_rows = chunks[1].height.saturating_sub(2) as usize;
        let style = GalleryStyle {
            show_stats: self.config.display.show_stats,
            use_glyphs: self.config.display.use_glyphs,
        };
        render_gallery(f, chunks[1], &self.page, self.selected, style, self.tick);

        let status_line = Line::from(vec![
            Span::styled(&self.status_message, Style::default().fg(Color::White)),
            Span::raw(" | "),
            Span::styled(
                match self.mode {
                    AppMode::Search => "SEARCH",
                    AppMode::Gallery => "GALLERY",
                },
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
            Span::raw(" | F1=Help | F5=Logs"),
        ]);
        f.render_widget(
            Paragraph::new(status_line).style(Style::default().bg(Color::DarkGray)),
            chunks[2],
        );

        render_lightbox(f, chunks[1], &self.page);

        if self.show_logs {
            self.render_logs(f);
        }
        if self.show_help {
            self.help.render(f, full);
        }

        render_toasts(f, full, &self.page.toasts, &self.config.display.icons);
    }

    fn render_logs(&self, f: &mut Frame) {
        let area: Rect = centered_rect(90, 80, f.area());
        let height = area.height.saturating_sub(2) as usize;
        let lines: Vec<Line> = match &self.log_buffer {
            Some(buffer) => buffer
                .get_recent(LOG_PANEL_LINES)
                .iter()
                .rev()
                .take(height)
                .rev()
                .map(|entry| Line::from(entry.format_for_display()))
                .collect(),
            None => vec![Line::from("Log capture is not enabled")],
        };

        f.render_widget(Clear, area);
        f.render_widget(
            Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Logs (F5)")),
            area,
        );
    }
}

pub async fn run_tui_app(
    client: Arc<dyn ImageSearch>,
    config: Config,
    log_buffer: Option<LogRingBuffer>,
    initial_query: Option<String>,
) -> Result<()> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = TuiApp::new(client, config, log_buffer);
    if let Some(query) = initial_query {
        app.page.form.set_value(query.as_str());
        app.input = Input::default().with_value(query.clone());
        app.apply(AppAction::SubmitSearch(query));
    }
    let res = app.run(&mut terminal).await;

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    res
}
