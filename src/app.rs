use std::io;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Direction, Layout},
    style::Color,
    widgets::ListState,
};
use tokio::sync::mpsc;
use tracing::{debug, error, info};

use crate::catalog::{AnimeSummary, CatalogProvider, DEFAULT_PAGE};
use crate::config::Config;
use crate::error::Result;
use crate::mirror::MirrorResolver;
use crate::player::ExternalOpener;
use crate::route::Route;
use crate::ui::{CatalogViewState, render_catalog_view, render_watch_view, widgets};
use crate::watch::WatchSession;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum View {
    Catalog,
    Watch,
    Help,
}

pub enum AppMessage {
    CatalogLoaded {
        search: Option<String>,
        results: Vec<AnimeSummary>,
    },
    DetailsLoaded {
        id: u64,
        anime: Option<AnimeSummary>,
    },
}

pub struct App {
    pub config: Config,
    pub running: bool,
    pub view: View,
    pub previous_view: View,
    pub accent: Color,
    pub route: Route,

    pub catalog: Vec<AnimeSummary>,
    pub catalog_state: ListState,
    pub catalog_loading: bool,
    pub active_search: Option<String>,
    pub search_input: String,
    pub search_focused: bool,

    pub watch: Option<WatchSession>,
    pub episodes_state: ListState,

    pub status: Option<String>,

    pub msg_tx: mpsc::UnboundedSender<AppMessage>,
    pub msg_rx: mpsc::UnboundedReceiver<AppMessage>,

    pub provider: Arc<dyn CatalogProvider + Send + Sync>,
    pub resolver: MirrorResolver,
    pub opener: ExternalOpener,
}

impl App {
    pub fn new(config: Config, provider: Arc<dyn CatalogProvider + Send + Sync>) -> Self {
        let accent = widgets::parse_accent_color(&config.ui.accent_color);
        let resolver = MirrorResolver::new(&config.mirror.base_url);
        let opener = ExternalOpener::from_config(&config.player);

        let (msg_tx, msg_rx) = mpsc::unbounded_channel();

        Self {
            config,
            running: true,
            view: View::Catalog,
            previous_view: View::Catalog,
            accent,
            route: Route::default(),

            catalog: Vec::new(),
            catalog_state: ListState::default(),
            catalog_loading: false,
            active_search: None,
            search_input: String::new(),
            search_focused: false,

            watch: None,
            episodes_state: ListState::default(),

            status: None,

            msg_tx,
            msg_rx,

            provider,
            resolver,
            opener,
        }
    }

    pub async fn run(&mut self, terminal: &mut DefaultTerminal, start: Route) -> Result<()> {
        self.navigate(start);

        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_events().await?;
            self.process_messages();
        }

        info!("Shutting down");
        Ok(())
    }

    /// Switch to `route`, issuing the one request it needs
    pub fn navigate(&mut self, route: Route) {
        debug!(route = %route.path(), "Navigating");
        self.status = None;

        match &route {
            Route::Catalog { search, .. } => {
                self.view = View::Catalog;
                self.watch = None;
                self.search_input = search.clone().unwrap_or_default();
                self.load_catalog(search.clone());
            }
            Route::Watch { id } => {
                self.view = View::Watch;
                self.open_watch(*id);
            }
        }

        self.route = route;
    }

    fn load_catalog(&mut self, search: Option<String>) {
        self.catalog_loading = true;
        self.catalog.clear();
        self.catalog_state.select(None);
        self.active_search = search.clone();

        let provider = Arc::clone(&self.provider);
        let per_page = self.config.catalog.per_page;
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let results = match &search {
                Some(term) => provider.search_by_title(term, DEFAULT_PAGE, per_page).await,
                None => provider.fetch_trending(DEFAULT_PAGE, per_page).await,
            };
            let _ = tx.send(AppMessage::CatalogLoaded { search, results });
        });
    }

    fn open_watch(&mut self, id: u64) {
        self.watch = Some(WatchSession::pending(
            id,
            self.resolver.clone(),
            self.config.mirror.fallback_episodes,
        ));
        self.episodes_state = ListState::default();

        let provider = Arc::clone(&self.provider);
        let tx = self.msg_tx.clone();

        tokio::spawn(async move {
            let anime = provider.fetch_details(id).await;
            let _ = tx.send(AppMessage::DetailsLoaded { id, anime });
        });
    }

    /// Submit the search box. Blank terms are not sent.
    pub fn submit_search(&mut self) -> bool {
        let term = self.search_input.trim().to_string();
        self.search_focused = false;

        if term.is_empty() {
            return false;
        }

        self.navigate(Route::Catalog {
            search: Some(term),
            filter: None,
        });
        true
    }

    fn process_messages(&mut self) {
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.apply_message(msg);
        }
    }

    pub fn apply_message(&mut self, msg: AppMessage) {
        match msg {
            AppMessage::CatalogLoaded { search, results } => {
                info!(
                    search = ?search,
                    count = results.len(),
                    "Catalog loaded"
                );
                self.catalog_loading = false;
                self.active_search = search;
                self.catalog = results;
                let selection = (!self.display_list().is_empty()).then_some(0);
                self.catalog_state.select(selection);
            }
            AppMessage::DetailsLoaded { id, anime } => {
                let Some(session) = self.watch.as_mut().filter(|s| s.id == id) else {
                    debug!(id, "Dropping details for a closed watch screen");
                    return;
                };

                if anime.is_none() {
                    error!(id, "No details for watch screen");
                }
                session.load(anime);
                self.episodes_state.select(Some(0));
            }
        }
    }

    /// Catalog entries listed below the trending hero
    pub fn display_list(&self) -> &[AnimeSummary] {
        split_featured(&self.catalog, self.active_search.is_some()).1
    }

    fn render(&mut self, frame: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(frame.area());

        let main_area = chunks[0];
        let help_area = chunks[1];

        let current = if self.view == View::Help {
            self.previous_view
        } else {
            self.view
        };

        match current {
            View::Catalog | View::Help => self.render_catalog(frame, main_area),
            View::Watch => {
                if let Some(session) = &self.watch {
                    render_watch_view(
                        frame,
                        main_area,
                        session,
                        &mut self.episodes_state,
                        self.accent,
                    );
                }
            }
        }

        if self.view == View::Help {
            self.render_help(frame);
        }

        if let Some(message) = &self.status {
            frame.render_widget(widgets::status_bar(message), help_area);
            return;
        }

        let hints: &[(&str, &str)] = match self.view {
            View::Catalog if self.search_focused => &[("Enter", "search"), ("Esc", "cancel")],
            View::Catalog if self.active_search.is_none() => &[
                ("/", "search"),
                ("Enter", "watch"),
                ("w", "watch featured"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::Catalog => &[
                ("/", "search"),
                ("Enter", "watch"),
                ("Esc", "trending"),
                ("?", "help"),
                ("q", "quit"),
            ],
            View::Watch if self.watch.as_ref().is_some_and(|s| s.override_visible) => &[
                ("type", "edit slug"),
                ("Enter", "open source"),
                ("Tab", "close console"),
            ],
            View::Watch => &[
                ("j/k", "episode"),
                ("Enter", "open source"),
                ("o", "fix link"),
                ("Esc", "back"),
            ],
            View::Help => &[("Esc", "close")],
        };
        frame.render_widget(widgets::help_bar(hints), help_area);
    }

    fn render_catalog(&mut self, frame: &mut Frame, area: ratatui::layout::Rect) {
        let (featured, results) = split_featured(&self.catalog, self.active_search.is_some());
        let view = CatalogViewState {
            search_input: &self.search_input,
            search_focused: self.search_focused,
            active_search: self.active_search.as_deref(),
            featured,
            results,
            is_loading: self.catalog_loading,
        };
        render_catalog_view(frame, area, &view, &mut self.catalog_state, self.accent);
    }

    async fn handle_events(&mut self) -> Result<()> {
        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    return Ok(());
                }
                if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                    self.running = false;
                    return Ok(());
                }

                self.handle_key(key);
            }
        }
        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        match self.view {
            View::Catalog => self.handle_catalog_input(key),
            View::Watch => self.handle_watch_input(key),
            View::Help => self.handle_help_input(key.code),
        }
    }

    fn handle_catalog_input(&mut self, key: KeyEvent) {
        if self.search_focused {
            match key.code {
                KeyCode::Esc => {
                    self.search_focused = false;
                    self.search_input = self.active_search.clone().unwrap_or_default();
                }
                KeyCode::Enter => {
                    self.submit_search();
                }
                KeyCode::Backspace => {
                    self.search_input.pop();
                }
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    self.search_input.push(c);
                }
                _ => {}
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') => {
                self.running = false;
            }
            KeyCode::Char('/') => {
                self.search_focused = true;
                self.status = None;
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_selection_down(),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection_up(),
            KeyCode::Enter | KeyCode::Char('l') | KeyCode::Right => {
                let id = self
                    .catalog_state
                    .selected()
                    .and_then(|i| self.display_list().get(i))
                    .map(|a| a.id);
                if let Some(id) = id {
                    self.navigate(Route::Watch { id });
                }
            }
            KeyCode::Char('w') => {
                let featured = split_featured(&self.catalog, self.active_search.is_some())
                    .0
                    .map(|a| a.id);
                if let Some(id) = featured {
                    self.navigate(Route::Watch { id });
                }
            }
            KeyCode::Char('r') => {
                self.navigate(self.route.clone());
            }
            KeyCode::Esc if self.active_search.is_some() => {
                self.navigate(Route::default());
            }
            KeyCode::Char('?') => self.toggle_help(),
            _ => {}
        }
    }

    fn handle_watch_input(&mut self, key: KeyEvent) {
        let Some(session) = self.watch.as_mut() else {
            self.navigate(Route::default());
            return;
        };

        if session.override_visible {
            match key.code {
                KeyCode::Tab | KeyCode::Esc => session.toggle_override(),
                KeyCode::Enter => self.open_source(),
                KeyCode::Backspace => session.pop_slug_char(),
                KeyCode::Down => session.next_episode(),
                KeyCode::Up => session.previous_episode(),
                KeyCode::Char(c)
                    if !key
                        .modifiers
                        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
                {
                    session.push_slug_char(c)
                }
                _ => {}
            }
        } else {
            match key.code {
                KeyCode::Char('q') => self.running = false,
                KeyCode::Esc | KeyCode::Char('h') | KeyCode::Left => {
                    self.navigate(self.back_route());
                    return;
                }
                KeyCode::Char('j') | KeyCode::Down => session.next_episode(),
                KeyCode::Char('k') | KeyCode::Up => session.previous_episode(),
                KeyCode::Char('g') | KeyCode::Home => session.select_episode(1),
                KeyCode::Char('G') | KeyCode::End => {
                    let last = session.total_episodes();
                    session.select_episode(last);
                }
                KeyCode::Char('o') | KeyCode::Tab => session.toggle_override(),
                KeyCode::Char('r') => session.reset_slug(),
                KeyCode::Enter | KeyCode::Char('O') => self.open_source(),
                KeyCode::Char('?') => self.toggle_help(),
                _ => {}
            }
        }

        if let Some(session) = &self.watch {
            self.episodes_state
                .select(Some(session.current_episode.saturating_sub(1) as usize));
        }
    }

    /// Catalog the user came from: the last search, or trending
    fn back_route(&self) -> Route {
        Route::Catalog {
            search: self.active_search.clone(),
            filter: None,
        }
    }

    fn open_source(&mut self) {
        let Some(session) = &self.watch else {
            return;
        };
        if session.anime.is_none() {
            return;
        }

        let url = session.source_url();
        match self.opener.open(&url) {
            Ok(()) => self.status = None,
            Err(e) => {
                error!(url = %url, error = %e, "Could not open source");
                self.status = Some(format!("{} ({})", e, url));
            }
        }
    }

    fn move_selection_down(&mut self) {
        let len = self.display_list().len();
        if len == 0 {
            return;
        }

        let next = match self.catalog_state.selected() {
            Some(i) => (i + 1).min(len - 1),
            None => 0,
        };
        self.catalog_state.select(Some(next));
    }

    fn move_selection_up(&mut self) {
        let len = self.display_list().len();
        if len > 0 {
            let i = match self.catalog_state.selected() {
                Some(0) => len - 1,
                Some(i) => i - 1,
                None => 0,
            };
            self.catalog_state.select(Some(i));
        }
    }

    fn toggle_help(&mut self) {
        if self.view == View::Help {
            self.view = self.previous_view;
        } else {
            self.previous_view = self.view;
            self.view = View::Help;
        }
    }

    fn render_help(&self, frame: &mut Frame) {
        use ratatui::layout::Rect;
        use ratatui::style::{Modifier, Style};
        use ratatui::widgets::{Block, Borders, Clear, Row, Table};

        let area = frame.area();
        let dialog_area = Rect {
            x: area.width.saturating_sub(64) / 2,
            y: area.height.saturating_sub(22) / 2,
            width: area.width.min(64),
            height: area.height.min(22),
        };

        frame.render_widget(Clear, dialog_area);

        let block = Block::default()
            .title(" Help ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(self.accent));

        let inner = block.inner(dialog_area);
        frame.render_widget(block, dialog_area);

        let rows = vec![
            Row::new(vec!["Global", "?", "Toggle Help"]),
            Row::new(vec!["", "q / Ctrl-C", "Quit"]),
            Row::new(vec!["Catalog", "j/k", "Navigate"]),
            Row::new(vec!["", "/", "Search AniList"]),
            Row::new(vec!["", "Enter/l", "Watch"]),
            Row::new(vec!["", "w", "Watch Featured"]),
            Row::new(vec!["", "r", "Reload"]),
            Row::new(vec!["", "Esc", "Back to Trending"]),
            Row::new(vec!["Watch", "j/k", "Next/Previous Episode"]),
            Row::new(vec!["", "g/G", "First/Last Episode"]),
            Row::new(vec!["", "Enter/O", "Open Source"]),
            Row::new(vec!["", "o/Tab", "Fix Link (edit slug)"]),
            Row::new(vec!["", "r", "Reset Slug"]),
            Row::new(vec!["", "Esc/h", "Back"]),
        ];

        let table = Table::new(
            rows,
            &[
                Constraint::Percentage(20),
                Constraint::Percentage(25),
                Constraint::Percentage(55),
            ],
        )
        .header(
            Row::new(vec!["Context", "Key", "Action"]).style(
                Style::default()
                    .add_modifier(Modifier::BOLD)
                    .fg(self.accent),
            ),
        )
        .block(Block::default().borders(Borders::NONE));

        frame.render_widget(table, inner);
    }

    fn handle_help_input(&mut self, key: KeyCode) {
        if let KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('?') = key {
            self.toggle_help();
        }
    }
}

fn split_featured(
    catalog: &[AnimeSummary],
    searching: bool,
) -> (Option<&AnimeSummary>, &[AnimeSummary]) {
    match catalog.split_first() {
        Some((first, rest)) if !searching => (Some(first), rest),
        _ => (None, catalog),
    }
}

pub fn init_terminal() -> io::Result<DefaultTerminal> {
    crossterm::terminal::enable_raw_mode()?;
    crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
    Ok(ratatui::init())
}

pub fn restore_terminal() -> io::Result<()> {
    ratatui::restore();
    Ok(())
}

const GLYPH_L: [&str; 6] = [
    "██╗     ",
    "██║     ",
    "██║     ",
    "██║     ",
    "███████╗",
    "╚══════╝",
];

const GLYPH_V: [&str; 6] = [
    "██╗   ██╗",
    "██║   ██║",
    "██║   ██║",
    "╚██╗ ██╔╝",
    " ╚████╔╝ ",
    "  ╚═══╝  ",
];

const GLYPH_1: [&str; 6] = [" ██╗", "███║", "╚██║", " ██║", " ██║", " ╚═╝"];

const SPLASH_TAGLINE: &str = "catalog: anilist // mirror: animesonlinecc";

/// Lay glyphs side by side, one space apart
fn banner(glyphs: &[&[&str; 6]]) -> String {
    (0..6)
        .map(|row| {
            let line: Vec<&str> = glyphs.iter().map(|g| g[row]).collect();
            format!("  {}  ", line.join(" "))
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn splash_frames() -> [String; 4] {
    [
        banner(&[&GLYPH_L]),
        banner(&[&GLYPH_L, &GLYPH_V]),
        banner(&[&GLYPH_L, &GLYPH_V, &GLYPH_L]),
        banner(&[&GLYPH_L, &GLYPH_V, &GLYPH_L, &GLYPH_1]),
    ]
}

fn draw_centered(terminal: &mut DefaultTerminal, frame_text: &str, accent: Color) -> io::Result<()> {
    use ratatui::{
        layout::{Alignment, Rect},
        style::Style,
        text::Text,
        widgets::Paragraph,
    };

    terminal.draw(|f| {
        let area = f.area();
        let lines = frame_text.lines().count() as u16;
        let y_offset = area.height.saturating_sub(lines) / 2;

        let centered_area = Rect {
            x: 0,
            y: y_offset,
            width: area.width,
            height: (lines + 2).min(area.height.saturating_sub(y_offset)),
        };

        let para = Paragraph::new(Text::styled(frame_text.to_string(), Style::default().fg(accent)))
            .alignment(Alignment::Center);
        f.render_widget(para, centered_area);
    })?;
    Ok(())
}

pub fn play_splash(terminal: &mut DefaultTerminal, accent: Color) -> io::Result<()> {
    use ratatui::{
        layout::{Alignment, Rect},
        style::Style,
        text::{Line, Text},
        widgets::Paragraph,
    };

    let frames = splash_frames();

    for frame_text in &frames {
        draw_centered(terminal, frame_text, accent)?;
        thread::sleep(Duration::from_millis(150));
    }

    terminal.draw(|f| {
        let area = f.area();
        let frame_text = &frames[3];
        let lines = frame_text.lines().count() as u16;
        let y_offset = area.height.saturating_sub(lines + 2) / 2;

        let logo_area = Rect {
            x: 0,
            y: y_offset,
            width: area.width,
            height: lines.min(area.height.saturating_sub(y_offset)),
        };

        let tagline_area = Rect {
            x: 0,
            y: (y_offset + lines).min(area.height.saturating_sub(1)),
            width: area.width,
            height: 1,
        };

        let logo = Paragraph::new(Text::styled(frame_text.clone(), Style::default().fg(accent)))
            .alignment(Alignment::Center);
        let tagline = Paragraph::new(Line::styled(
            SPLASH_TAGLINE,
            Style::default().fg(Color::DarkGray),
        ))
        .alignment(Alignment::Center);

        f.render_widget(logo, logo_area);
        f.render_widget(tagline, tagline_area);
    })?;

    thread::sleep(Duration::from_millis(800));

    for frame_text in frames.iter().rev() {
        draw_centered(terminal, frame_text, accent)?;
        thread::sleep(Duration::from_millis(80));
    }

    terminal.draw(|_f| {})?;
    thread::sleep(Duration::from_millis(100));

    Ok(())
}
