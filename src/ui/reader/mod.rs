use std::io;
use std::time::{Duration, Instant};

use crossterm::event::{
    Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Position, Rect},
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Gauge, Paragraph, Wrap},
};

use crate::affordances::SystemClipboard;
use crate::app::{AppState, Behavior, UiEvent};
use crate::config::Config;
use crate::document::{Document, Roles};
use crate::logging;
use crate::models::{MessageType, WindowType};
use crate::outline::NodeId;
use crate::preferences::PreferenceStore;
use crate::settings::{CfgDefaultKeymaps, Settings};
use crate::theme;
use crate::tracker::reveal_scroll_top;
use crate::ui::board::{Board, Palette};
use crate::ui::windows::{
    centered_popup_area,
    formulas::FormulasWindow,
    help::HelpWindow,
    landing::LandingWindow,
    toc::{TocPanel, TocView},
};

const FRAME_INTERVAL: Duration = Duration::from_millis(16);
const MESSAGE_DURATION: Duration = Duration::from_secs(3);
const IDLE_POLL: Duration = Duration::from_secs(60);
const MOUSE_SCROLL_ROWS: i64 = 3;
const BOARD_PADDING: u16 = 1;

#[derive(Debug, Clone)]
pub struct UiState {
    pub active_window: WindowType,
    pub toc_selected: Option<NodeId>,
    pub formulas_selected_index: usize,
    pub help_scroll_offset: u16,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub message_time: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            active_window: WindowType::Reader,
            toc_selected: None,
            formulas_selected_index: 0,
            help_scroll_offset: 0,
            message: None,
            message_type: MessageType::Info,
            message_time: None,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>, message_type: MessageType) {
        self.message = Some(message.into());
        self.message_type = message_type;
        self.message_time = Some(Instant::now());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    /// Returns true if the current message has expired (older than 3 seconds).
    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|t| t.elapsed() >= MESSAGE_DURATION)
    }

    pub fn message_deadline(&self) -> Option<Instant> {
        self.message_time.map(|t| t + MESSAGE_DURATION)
    }

    pub fn open_window(&mut self, window_type: WindowType) {
        if window_type == WindowType::Help {
            self.help_scroll_offset = 0;
        }
        self.active_window = window_type;
    }
}

/// Key actions of the reading window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    ScrollDown,
    ScrollUp,
    PageDown,
    PageUp,
    BackToTop,
    EndOfDocument,
    TogglePanel,
    FocusOutline,
    SearchOutline,
    SwitchTheme,
    ShowLanding,
    Formulas,
    Help,
    Quit,
}

pub fn normal_action(keymap: &CfgDefaultKeymaps, key: &KeyEvent) -> Option<Action> {
    match key.code {
        KeyCode::Down => Some(Action::ScrollDown),
        KeyCode::Up => Some(Action::ScrollUp),
        KeyCode::PageDown | KeyCode::Char(' ') => Some(Action::PageDown),
        KeyCode::PageUp => Some(Action::PageUp),
        KeyCode::Home => Some(Action::BackToTop),
        KeyCode::End => Some(Action::EndOfDocument),
        KeyCode::Tab => Some(Action::FocusOutline),
        KeyCode::Esc => Some(Action::Quit),
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let bindings = [
                (&keymap.scroll_down, Action::ScrollDown),
                (&keymap.scroll_up, Action::ScrollUp),
                (&keymap.page_down, Action::PageDown),
                (&keymap.page_up, Action::PageUp),
                (&keymap.back_to_top, Action::BackToTop),
                (&keymap.end_of_document, Action::EndOfDocument),
                (&keymap.toggle_panel, Action::TogglePanel),
                (&keymap.focus_outline, Action::FocusOutline),
                (&keymap.search_outline, Action::SearchOutline),
                (&keymap.switch_theme, Action::SwitchTheme),
                (&keymap.show_landing, Action::ShowLanding),
                (&keymap.formulas, Action::Formulas),
                (&keymap.help, Action::Help),
                (&keymap.quit, Action::Quit),
            ];
            bindings
                .into_iter()
                .find(|(binding, _)| CfgDefaultKeymaps::matches(binding, c))
                .map(|(_, action)| action)
        }
        _ => None,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameAreas {
    pub header: Rect,
    pub progress: Option<Rect>,
    pub sidebar: Option<Rect>,
    pub content: Rect,
    pub status: Rect,
}

/// Split the terminal into header, optional progress bar, optional contents
/// sidebar, the reading pane and a status line.
pub fn split_frame(area: Rect, settings: &Settings, roles: &Roles, sidebar_open: bool) -> FrameAreas {
    let show_bar = settings.show_progress_bar && roles.progress_bar;
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(if show_bar { 1 } else { 0 }),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(area);

    // Keep at least a usable reading column next to the sidebar.
    let show_sidebar = sidebar_open && chunks[2].width >= settings.toc_width.saturating_add(20);
    let (sidebar, content) = if show_sidebar {
        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(settings.toc_width), Constraint::Min(0)])
            .split(chunks[2]);
        (Some(columns[0]), columns[1])
    } else {
        (None, chunks[2])
    };

    FrameAreas {
        header: chunks[0],
        progress: show_bar.then_some(chunks[1]),
        sidebar,
        content,
        status: chunks[3],
    }
}

/// Columns available to the text, capped by the configured width.
pub fn text_width(content: Rect, settings: &Settings) -> usize {
    let available = content.width.saturating_sub(BOARD_PADDING * 2) as usize;
    settings.width.map_or(available, |w| w.min(available))
}

fn landing_width(area: Rect) -> usize {
    centered_popup_area(area, 70, 70).width.saturating_sub(2) as usize
}

fn terminal_area() -> Rect {
    let (width, height) = crossterm::terminal::size().unwrap_or((80, 24));
    Rect::new(0, 0, width, height)
}

/// Main reader application struct
pub struct Reader {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    config: Config,
    document: Document,
    landing_lines: Vec<String>,
    app: AppState,
    ui_state: UiState,
    board: Board,
    store: Box<dyn PreferenceStore>,
    clipboard: SystemClipboard,
    should_quit: bool,
}

impl Reader {
    /// Create a new Reader instance
    pub fn new(config: Config, document: Document, store: Box<dyn PreferenceStore>) -> eyre::Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        let area = terminal_area();
        let sidebar_open = !document.outline.is_empty();
        let areas = split_frame(area, &config.settings, &document.roles, sidebar_open);
        let layout = document.layout(text_width(areas.content, &config.settings))?;
        let landing_lines = document.landing_lines(landing_width(area))?;
        let toc_height = Self::toc_height(&areas, &document.roles);

        let app = AppState::bootstrap(
            &document,
            &layout,
            areas.content.height as i64,
            toc_height,
            Behavior::from_settings(&config.settings),
            store.as_ref(),
            theme::os_dark_hint(),
        );
        logging::info(format!(
            "Starting at {}% with theme {}",
            app.progress,
            app.theme.theme().as_str()
        ));

        let board = Board::new()
            .with_layout(layout)
            .with_palette(Palette::for_theme(app.theme.theme(), &config.settings))
            .with_padding(BOARD_PADDING);

        let mut ui_state = UiState::new();
        if app.gate.overlay_visible() {
            ui_state.open_window(WindowType::Landing);
        }

        Ok(Self {
            terminal,
            config,
            document,
            landing_lines,
            app,
            ui_state,
            board,
            store,
            clipboard: SystemClipboard::new(),
            should_quit: false,
        })
    }

    fn toc_height(areas: &FrameAreas, roles: &Roles) -> i64 {
        areas
            .sidebar
            .map(|sidebar| TocPanel::areas(sidebar, roles.toc_search).list.height as i64)
            .unwrap_or(0)
    }

    fn sidebar_open(&self) -> bool {
        !self.document.outline.is_empty() && !self.app.panel_collapsed
    }

    fn frame_areas(&self, area: Rect) -> FrameAreas {
        split_frame(area, &self.config.settings, &self.app.roles, self.sidebar_open())
    }

    /// Run the main application loop
    pub fn run(&mut self) -> eyre::Result<()> {
        // Initialize terminal
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;
        if self.config.settings.mouse_support {
            crossterm::execute!(io::stdout(), crossterm::event::EnableMouseCapture)?;
        }

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop();

        // Cleanup terminal
        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        if self.config.settings.mouse_support {
            crossterm::execute!(io::stdout(), crossterm::event::DisableMouseCapture)?;
        }
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self) -> eyre::Result<()> {
        loop {
            if self.should_quit {
                break;
            }

            // Auto-clear expired messages before rendering
            if self.ui_state.message_expired() {
                self.ui_state.clear_message();
            }

            self.dispatch(UiEvent::Tick);
            self.sync_geometry()?;

            // Render UI
            self.terminal.draw(|f| {
                Self::render_static(
                    f,
                    &self.app,
                    &self.ui_state,
                    &self.board,
                    &self.document,
                    &self.landing_lines,
                    &self.config,
                );
            })?;

            // Poll with timeout so animation frames and feedback reverts land on time
            let poll_timeout = if self.app.is_animating() {
                FRAME_INTERVAL
            } else {
                [self.app.next_deadline(), self.ui_state.message_deadline()]
                    .into_iter()
                    .flatten()
                    .min()
                    .map(|at| {
                        at.saturating_duration_since(Instant::now())
                            .max(Duration::from_millis(10))
                    })
                    .unwrap_or(IDLE_POLL)
            };

            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }

            // Handle events
            match crossterm::event::read()? {
                Event::Key(key) => {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key)?;
                    }
                }
                Event::Mouse(mouse) => {
                    if self.config.settings.mouse_support {
                        self.handle_mouse_event(mouse);
                    }
                }
                // Geometry is re-read at the top of the loop.
                Event::Resize(_, _) => {}
                _ => {}
            }
        }
        Ok(())
    }

    /// Feed one event to the page state and bring the view in line with it.
    fn dispatch(&mut self, event: UiEvent) -> bool {
        let changed = self.app.handle(
            event,
            self.store.as_ref(),
            &mut self.clipboard,
            Instant::now(),
        );
        self.after_update();
        changed
    }

    fn after_update(&mut self) {
        self.board.set_scroll_top(self.app.scroll_top());
        self.board
            .set_palette(Palette::for_theme(self.app.theme.theme(), &self.config.settings));

        let landing_open = self.ui_state.active_window == WindowType::Landing;
        if self.app.gate.overlay_visible() && !landing_open {
            self.ui_state.open_window(WindowType::Landing);
        } else if !self.app.gate.overlay_visible() && landing_open {
            self.ui_state.open_window(WindowType::Reader);
        }
    }

    /// Re-measure the terminal; resize the state and re-lay the text when the
    /// reading column changed width.
    fn sync_geometry(&mut self) -> eyre::Result<()> {
        let area = terminal_area();
        let areas = self.frame_areas(area);
        let viewport_height = areas.content.height as i64;
        let toc_height = Self::toc_height(&areas, &self.app.roles);

        if viewport_height != self.app.metrics.viewport_height || toc_height != self.app.toc_view.height {
            self.dispatch(UiEvent::Resize {
                viewport_height,
                toc_height,
            });
        }

        let width = text_width(areas.content, &self.config.settings);
        if self.board.layout().map(|l| l.width) != Some(width.max(20)) {
            logging::debug(format!("Re-laying out document at {width} columns"));
            let layout = self.document.layout(width)?;
            self.dispatch(UiEvent::Relayout {
                anchors: layout.anchors.clone(),
                content_height: layout.height(),
            });
            self.board.update_layout(layout);
            self.landing_lines = self.document.landing_lines(landing_width(area))?;
        }
        Ok(())
    }

    /// Handle keyboard input events
    fn handle_key_event(&mut self, key: KeyEvent) -> eyre::Result<()> {
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return Ok(());
        }

        if self.ui_state.message.is_some() && self.ui_state.active_window == WindowType::Reader {
            self.ui_state.clear_message();
        }

        match self.ui_state.active_window {
            WindowType::Landing => self.handle_landing_keys(key),
            WindowType::Toc => self.handle_toc_mode_keys(key),
            WindowType::Search => self.handle_search_mode_keys(key),
            WindowType::Formulas => self.handle_formulas_mode_keys(key),
            WindowType::Help => self.handle_help_mode_keys(key),
            WindowType::Reader => self.handle_normal_mode_keys(key),
        }

        self.sync_geometry()
    }

    fn handle_normal_mode_keys(&mut self, key: KeyEvent) {
        let Some(action) = normal_action(&self.config.keymap, &key) else {
            return;
        };
        let page = (self.app.metrics.viewport_height - 1).max(1);

        match action {
            Action::ScrollDown => {
                self.dispatch(UiEvent::ScrollBy(1));
            }
            Action::ScrollUp => {
                self.dispatch(UiEvent::ScrollBy(-1));
            }
            Action::PageDown => {
                self.dispatch(UiEvent::ScrollBy(page));
            }
            Action::PageUp => {
                self.dispatch(UiEvent::ScrollBy(-page));
            }
            Action::BackToTop => {
                self.dispatch(UiEvent::BackToTop);
            }
            Action::EndOfDocument => {
                self.dispatch(UiEvent::ScrollToEnd);
            }
            Action::TogglePanel => {
                if !self.dispatch(UiEvent::TogglePanel) {
                    self.ui_state
                        .set_message("This page has no contents toggle", MessageType::Info);
                }
            }
            Action::FocusOutline => self.focus_outline(),
            Action::SearchOutline => {
                if !self.app.roles.toc_search {
                    self.ui_state
                        .set_message("This page has no contents search", MessageType::Info);
                } else if !self.sidebar_open() {
                    self.ui_state
                        .set_message("Contents are hidden", MessageType::Info);
                } else {
                    self.ui_state.open_window(WindowType::Search);
                }
            }
            Action::SwitchTheme => {
                if !self.dispatch(UiEvent::ToggleTheme) {
                    self.ui_state
                        .set_message("This page has no theme toggle", MessageType::Info);
                }
            }
            Action::ShowLanding => {
                if !self.dispatch(UiEvent::ShowLanding) {
                    self.ui_state
                        .set_message("This page has no landing page", MessageType::Info);
                }
            }
            Action::Formulas => {
                if self.app.copy_buttons.is_empty() {
                    self.ui_state
                        .set_message("No copyable formulas on this page", MessageType::Info);
                } else {
                    self.ui_state.formulas_selected_index = 0;
                    self.ui_state.open_window(WindowType::Formulas);
                }
            }
            Action::Help => self.ui_state.open_window(WindowType::Help),
            Action::Quit => self.should_quit = true,
        }
    }

    fn focus_outline(&mut self) {
        if self.document.outline.is_empty() {
            self.ui_state
                .set_message("This page has no contents", MessageType::Info);
            return;
        }
        if !self.sidebar_open() {
            self.ui_state
                .set_message("Contents are hidden", MessageType::Info);
            return;
        }
        self.ui_state.toc_selected = self.app.outline.active();
        self.ensure_toc_selection();
        self.ui_state.open_window(WindowType::Toc);
    }

    /// Keep the outline cursor on a row that is actually displayed.
    fn ensure_toc_selection(&mut self) {
        let rows = self.app.outline.visible_rows();
        let valid = self
            .ui_state
            .toc_selected
            .is_some_and(|id| rows.contains(&id));
        if !valid {
            self.ui_state.toc_selected = rows.first().copied();
        }
        self.reveal_toc_selection();
    }

    fn reveal_toc_selection(&mut self) {
        let Some(row) = self
            .ui_state
            .toc_selected
            .and_then(|id| self.app.outline.row_of(id))
        else {
            return;
        };
        let view = self.app.toc_view;
        let top = row as i64 - view.scroll_top;
        if let Some(scroll_top) = reveal_scroll_top(view, top, top + 1, 0) {
            let max_scroll = (self.app.outline.visible_rows().len() as i64 - view.height).max(0);
            self.app.toc_view.scroll_top = scroll_top.clamp(0, max_scroll);
        }
    }

    fn move_toc_selection(&mut self, delta: isize) {
        let rows = self.app.outline.visible_rows();
        if rows.is_empty() {
            return;
        }
        let index = self
            .ui_state
            .toc_selected
            .and_then(|id| rows.iter().position(|&r| r == id))
            .unwrap_or(0);
        let next = index.saturating_add_signed(delta).min(rows.len() - 1);
        self.ui_state.toc_selected = Some(rows[next]);
        self.reveal_toc_selection();
    }

    /// Enter on an entry: links navigate, bare entries expand or collapse.
    fn activate_entry(&mut self, id: NodeId) {
        let is_link = self
            .app
            .outline
            .node(id)
            .is_some_and(|n| n.is_link && n.target.is_some());
        if is_link {
            if !self.dispatch(UiEvent::Navigate(id)) {
                self.ui_state
                    .set_message("No section for this entry", MessageType::Warning);
            }
            self.ui_state.open_window(WindowType::Reader);
        } else {
            self.dispatch(UiEvent::ToggleEntry(id));
            self.ensure_toc_selection();
        }
    }

    fn handle_landing_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Enter => {
                self.dispatch(UiEvent::EnterLanding);
            }
            KeyCode::Esc => self.should_quit = true,
            KeyCode::Char(c) if CfgDefaultKeymaps::matches(&self.config.keymap.quit, c) => {
                self.should_quit = true;
            }
            KeyCode::Char(c) if CfgDefaultKeymaps::matches(&self.config.keymap.switch_theme, c) => {
                self.dispatch(UiEvent::ToggleTheme);
            }
            _ => {}
        }
    }

    fn handle_toc_mode_keys(&mut self, key: KeyEvent) {
        if !self.sidebar_open() {
            self.ui_state.open_window(WindowType::Reader);
            return;
        }
        self.ensure_toc_selection();

        match key.code {
            KeyCode::Esc | KeyCode::Tab | KeyCode::Char('q') => {
                self.ui_state.open_window(WindowType::Reader);
            }
            KeyCode::Char('j') | KeyCode::Down => self.move_toc_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_toc_selection(-1),
            KeyCode::Enter => {
                if let Some(id) = self.ui_state.toc_selected {
                    self.activate_entry(id);
                }
            }
            KeyCode::Char(' ')
            | KeyCode::Char('h')
            | KeyCode::Char('l')
            | KeyCode::Left
            | KeyCode::Right => {
                if let Some(id) = self.ui_state.toc_selected {
                    self.dispatch(UiEvent::ToggleEntry(id));
                    self.ensure_toc_selection();
                }
            }
            KeyCode::Char(c)
                if self.app.roles.toc_search
                    && CfgDefaultKeymaps::matches(&self.config.keymap.search_outline, c) =>
            {
                self.ui_state.open_window(WindowType::Search);
            }
            _ => {}
        }
    }

    fn handle_search_mode_keys(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.ui_state.open_window(WindowType::Reader),
            KeyCode::Enter => {
                self.ui_state.toc_selected = None;
                self.ensure_toc_selection();
                self.ui_state.open_window(WindowType::Toc);
            }
            KeyCode::Backspace => {
                let mut query = self.app.search_query.clone();
                query.pop();
                self.dispatch(UiEvent::SearchInput(query));
            }
            KeyCode::Char('u') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.dispatch(UiEvent::SearchInput(String::new()));
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                let mut query = self.app.search_query.clone();
                query.push(c);
                self.dispatch(UiEvent::SearchInput(query));
            }
            _ => {}
        }
    }

    fn handle_formulas_mode_keys(&mut self, key: KeyEvent) {
        let list_len = self.app.copy_buttons.len();
        let index = self.ui_state.formulas_selected_index;
        match key.code {
            KeyCode::Esc | KeyCode::Char('q') => {
                self.ui_state.open_window(WindowType::Reader);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                if list_len > 0 {
                    self.ui_state.formulas_selected_index = (index + 1).min(list_len - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.formulas_selected_index = index.saturating_sub(1);
            }
            KeyCode::Enter => self.copy_selected_formula(),
            KeyCode::Char(c) if CfgDefaultKeymaps::matches(&self.config.keymap.formulas, c) => {
                self.copy_selected_formula();
            }
            _ => {}
        }
    }

    fn copy_selected_formula(&mut self) {
        let index = self.ui_state.formulas_selected_index;
        if !self.dispatch(UiEvent::Copy(index)) {
            self.ui_state
                .set_message("Could not copy to the clipboard", MessageType::Warning);
        }
    }

    fn handle_help_mode_keys(&mut self, key: KeyEvent) {
        let max_offset = HelpWindow::max_scroll_offset(terminal_area(), &self.config.keymap);

        match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Enter => {
                self.ui_state.open_window(WindowType::Reader);
            }
            KeyCode::Char('j') | KeyCode::Down => {
                self.ui_state.help_scroll_offset =
                    self.ui_state.help_scroll_offset.saturating_add(1).min(max_offset);
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.help_scroll_offset = self.ui_state.help_scroll_offset.saturating_sub(1);
            }
            _ => {}
        }
    }

    fn handle_mouse_event(&mut self, mouse: MouseEvent) {
        if self.ui_state.active_window == WindowType::Landing {
            return;
        }
        let areas = self.frame_areas(terminal_area());
        let position = Position::new(mouse.column, mouse.row);
        let list = areas
            .sidebar
            .map(|sidebar| TocPanel::areas(sidebar, self.app.roles.toc_search).list);
        let over_list = list.is_some_and(|l| l.contains(position));

        match mouse.kind {
            MouseEventKind::ScrollDown if over_list => {
                let max_scroll =
                    (self.app.outline.visible_rows().len() as i64 - self.app.toc_view.height).max(0);
                self.app.toc_view.scroll_top = (self.app.toc_view.scroll_top + 1).min(max_scroll);
            }
            MouseEventKind::ScrollUp if over_list => {
                self.app.toc_view.scroll_top = (self.app.toc_view.scroll_top - 1).max(0);
            }
            MouseEventKind::ScrollDown => {
                self.dispatch(UiEvent::ScrollBy(MOUSE_SCROLL_ROWS));
            }
            MouseEventKind::ScrollUp => {
                self.dispatch(UiEvent::ScrollBy(-MOUSE_SCROLL_ROWS));
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let (Some(list), true) = (list, over_list) else {
                    return;
                };
                let scroll_top = usize::try_from(self.app.toc_view.scroll_top).unwrap_or(0);
                let Some(id) = TocPanel::entry_at(&self.app.outline, scroll_top, mouse.row - list.y) else {
                    return;
                };
                let glyph_column = self
                    .app
                    .outline
                    .node(id)
                    .filter(|n| n.expandable)
                    .map(|n| list.x + (n.depth as u16) * 2);
                self.ui_state.toc_selected = Some(id);
                if glyph_column.is_some_and(|col| mouse.column <= col + 1) {
                    self.dispatch(UiEvent::ToggleEntry(id));
                } else {
                    self.activate_entry(id);
                }
            }
            _ => {}
        }
    }

    fn render_static(
        frame: &mut Frame,
        app: &AppState,
        ui_state: &UiState,
        board: &Board,
        document: &Document,
        landing_lines: &[String],
        config: &Config,
    ) {
        let sidebar_open = !document.outline.is_empty() && !app.panel_collapsed;
        let areas = split_frame(frame.area(), &config.settings, &app.roles, sidebar_open);
        let palette = Palette::for_theme(app.theme.theme(), &config.settings);

        Self::render_header(frame, areas.header, app, &document.title, palette);

        if let Some(bar) = areas.progress {
            let color = if app.pulse.is_highlighted() {
                Color::Green
            } else {
                Color::Blue
            };
            let gauge = Gauge::default()
                .ratio(f64::from(app.progress) / 100.0)
                .label(format!("{}%", app.progress))
                .use_unicode(true)
                .gauge_style(Style::default().fg(color).bg(palette.bg));
            frame.render_widget(gauge, bar);
        }

        if let Some(sidebar) = areas.sidebar {
            let focused = matches!(ui_state.active_window, WindowType::Toc | WindowType::Search);
            let view = TocView {
                scroll_top: usize::try_from(app.toc_view.scroll_top).unwrap_or(0),
                selected: ui_state.toc_selected,
                focused,
                search: app.roles.toc_search.then(|| {
                    (
                        app.search_query.as_str(),
                        ui_state.active_window == WindowType::Search,
                    )
                }),
                palette,
            };
            TocPanel::render(frame, sidebar, &app.outline, view);
        }

        board.render(frame, areas.content);

        let section_title = app.active_section.as_deref().and_then(|id| {
            document
                .sections
                .iter()
                .find(|s| s.id.as_deref() == Some(id))
                .map(|s| s.title.as_str())
        });
        let status = Self::build_status_line(section_title, &config.keymap.help, areas.status.width);
        frame.render_widget(
            Paragraph::new(Line::from(status)).style(palette.style().fg(Color::DarkGray)),
            areas.status,
        );

        // Render overlays/modals if active
        match ui_state.active_window {
            WindowType::Landing => {
                LandingWindow::render(frame, frame.area(), &document.title, landing_lines, palette);
            }
            WindowType::Formulas => {
                FormulasWindow::render(
                    frame,
                    frame.area(),
                    &app.copy_buttons,
                    &document.formulas,
                    ui_state.formulas_selected_index,
                );
            }
            WindowType::Help => {
                HelpWindow::render(frame, frame.area(), &config.keymap, ui_state.help_scroll_offset);
            }
            _ => {}
        }

        // Render message if present
        if let Some(ref message) = ui_state.message {
            Self::render_message_static(frame, message, &ui_state.message_type);
        }
    }

    fn render_header(frame: &mut Frame, area: Rect, app: &AppState, title: &str, palette: Palette) {
        let mut right = Vec::new();
        if let Some(glyph) = app.theme.glyph() {
            right.push(glyph.to_string());
        }
        if app.roles.progress_indicator {
            right.push(format!("{:>3}%", app.progress));
        }
        let right_line = Line::from(right.join(" "));
        let right_width = (right_line.width() as u16).min(area.width);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Min(0), Constraint::Length(right_width)])
            .split(area);

        frame.render_widget(
            Paragraph::new(Line::from(title.to_string()).centered())
                .style(palette.style().add_modifier(Modifier::BOLD)),
            columns[0],
        );

        let right_style = if app.pulse.is_highlighted() {
            palette.style().fg(Color::Green).add_modifier(Modifier::BOLD)
        } else {
            palette.style()
        };
        frame.render_widget(Paragraph::new(right_line).style(right_style), columns[1]);
    }

    fn build_status_line(section_title: Option<&str>, help_key: &str, width: u16) -> String {
        let width = width as usize;
        if width == 0 {
            return String::new();
        }
        let hint = format!("{help_key} help");
        let left_room = width.saturating_sub(hint.chars().count() + 1);
        let left: String = section_title
            .map(|t| format!("§ {t}"))
            .unwrap_or_default()
            .chars()
            .take(left_room)
            .collect();
        let gap = width.saturating_sub(left.chars().count() + hint.chars().count());
        if gap == 0 {
            return left;
        }
        format!("{}{}{}", left, " ".repeat(gap), hint)
    }

    fn render_message_static(frame: &mut Frame, message: &str, message_type: &MessageType) {
        let color = match message_type {
            MessageType::Info => Color::Blue,
            MessageType::Warning => Color::Yellow,
            MessageType::Error => Color::Red,
        };

        let message_paragraph = Paragraph::new(message)
            .style(Style::default().fg(color))
            .block(Block::default().borders(Borders::ALL))
            .wrap(Wrap { trim: true });

        let frame_area = frame.area();
        if frame_area.width < 6 || frame_area.height < 5 {
            return;
        }
        let area = Rect {
            x: frame_area.x + 2,
            y: frame_area.y + 2,
            width: frame_area.width - 4,
            height: 3,
        };

        frame.render_widget(Clear, area);
        frame.render_widget(message_paragraph, area);
    }
}
