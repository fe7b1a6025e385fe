//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, projects the element
//! tree rendered by [`App`], and translates keyboard events into
//! `core::Action` values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! Nothing animates, so the loop sleeps up to 500ms between polls and only
//! redraws after input, a background action, or a resize.
//!
//! ## Background work
//!
//! The symbols fetch runs in a tokio task and reports back with
//! `Action::SymbolsLoaded` over a std channel, drained once per loop turn.

mod event;
pub mod ui;

use log::{debug, info, warn};
use std::io::stdout;
use std::sync::{Arc, mpsc};

use crossterm::clipboard::CopyToClipboard;
use crossterm::event::{DisableMouseCapture, EnableMouseCapture};
use crossterm::execute;
use ratatui::layout::Position;
use tui_scrollview::ScrollViewState;

use crate::app::App;
use crate::core::action::{Action, Effect, update};
use crate::registry::Registry;
use crate::registry::symbols::{SymbolsSource, load_registry_with_symbols};
use crate::ui::component::Key;
use crate::ui::dom::Element;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};
use crate::tui::ui::{Projection, project};

/// TUI-specific presentation state (not part of the application)
#[derive(Default)]
pub struct TuiState {
    pub projection: Projection,
    pub selected_link: Option<usize>,
    pub scroll_state: ScrollViewState,
    pub viewport_height: u16,
    pub status: String,
    location: String,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Re-project the app. A location change resets link selection and
    /// scrolls back to the top.
    pub fn refresh(&mut self, app: &App) {
        if app.location() != self.location {
            self.location = app.location().to_string();
            self.selected_link = None;
            self.scroll_state.scroll_to_top();
        }
        self.projection = match app.render() {
            Ok(page) => project(&page, self.selected_link),
            Err(e) => {
                warn!("render failed: {e}");
                project(&Element::new("p").text(format!("Render error: {e}")), None)
            }
        };
        if let Some(i) = self.selected_link
            && i >= self.projection.links.len()
        {
            self.selected_link = None;
        }
    }

    pub fn selected_element(&self) -> Option<Element> {
        self.selected_link
            .and_then(|i| self.projection.links.get(i))
            .map(|link| link.element.clone())
    }

    fn select_link(&mut self, forward: bool) {
        let count = self.projection.links.len();
        if count == 0 {
            return;
        }
        self.selected_link = Some(match (self.selected_link, forward) {
            (None, true) => 0,
            (None, false) => count - 1,
            (Some(i), true) => (i + 1) % count,
            (Some(i), false) => (i + count - 1) % count,
        });
        self.reveal_selected();
    }

    /// Scroll so the selected link's line is inside the viewport.
    fn reveal_selected(&mut self) {
        let Some(link) = self.selected_link.and_then(|i| self.projection.links.get(i)) else {
            return;
        };
        let line = u16::try_from(link.line).unwrap_or(u16::MAX);
        let top = self.scroll_state.offset().y;
        let height = self.viewport_height.max(1);
        if line < top {
            self.scroll_state.set_offset(Position::new(0, line));
        } else if line >= top.saturating_add(height) {
            self.scroll_state.set_offset(Position::new(0, line - height + 1));
        }
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        execute!(stdout(), EnableMouseCapture)?;
        info!("Terminal modes enabled (mouse)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), DisableMouseCapture);
    }
}

/// Start the symbols fetch in the background.
pub fn spawn_symbols_fetch(
    registry: Arc<Registry>,
    source: Arc<dyn SymbolsSource>,
    tx: mpsc::Sender<Action>,
) -> tokio::task::JoinHandle<()> {
    tokio::spawn(async move {
        let loaded = load_registry_with_symbols(registry, source.as_ref()).await;
        if tx.send(Action::SymbolsLoaded(loaded)).is_err() {
            warn!("Failed to deliver symbols: receiver dropped");
        }
    })
}

pub fn run(mut app: App, source: Arc<dyn SymbolsSource>) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // Channel for actions from background tasks
    let (tx, rx) = mpsc::channel();
    let fetch = spawn_symbols_fetch(app.registry().clone(), source, tx);

    tui.refresh(&app);
    let mut needs_redraw = true; // Force first frame

    'main: loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let first_event = poll_event_timeout(std::time::Duration::from_millis(500));
        if first_event.is_some() {
            needs_redraw = true;
        }

        // Process first event + drain ALL pending events before next draw
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            let action = match event {
                TuiEvent::ForceQuit => Some(Action::Quit),
                TuiEvent::Back => Some(Action::Back),
                TuiEvent::Forward => Some(Action::Forward),
                TuiEvent::Key(Key::Enter) if !app.search().focused => {
                    tui.selected_element().map(Action::Activate)
                }
                TuiEvent::Key(key) => Some(Action::Key(key)),
                TuiEvent::NextLink => {
                    tui.select_link(true);
                    None
                }
                TuiEvent::PrevLink => {
                    tui.select_link(false);
                    None
                }
                TuiEvent::ScrollUp => {
                    tui.scroll_state.scroll_up();
                    None
                }
                TuiEvent::ScrollDown => {
                    tui.scroll_state.scroll_down();
                    None
                }
                TuiEvent::ScrollPageUp => {
                    tui.scroll_state.scroll_page_up();
                    None
                }
                TuiEvent::ScrollPageDown => {
                    tui.scroll_state.scroll_page_down();
                    None
                }
                TuiEvent::ScrollToTop => {
                    tui.scroll_state.scroll_to_top();
                    None
                }
                TuiEvent::Resize => None,
            };
            if let Some(action) = action {
                tui.status.clear();
                let effect = update(&mut app, action);
                if apply_effect(effect, &mut tui) {
                    break 'main;
                }
            }
            tui.refresh(&app);
        }

        // Handle background task actions
        while let Ok(action) = rx.try_recv() {
            needs_redraw = true;
            debug!("Event loop received: {}", action_name(&action));
            let effect = update(&mut app, action);
            if apply_effect(effect, &mut tui) {
                break 'main;
            }
            tui.refresh(&app);
        }
    }

    fetch.abort();
    ratatui::restore();
    Ok(())
}

fn action_name(action: &Action) -> &'static str {
    match action {
        Action::Key(_) => "Key",
        Action::Navigate(_) => "Navigate",
        Action::Back => "Back",
        Action::Forward => "Forward",
        Action::Activate(_) => "Activate",
        Action::SymbolsLoaded(_) => "SymbolsLoaded",
        Action::Quit => "Quit",
    }
}

/// Carry out an effect. Returns true when the loop should stop.
fn apply_effect(effect: Effect, tui: &mut TuiState) -> bool {
    match effect {
        Effect::Quit => return true,
        Effect::Copy(text) => match execute!(stdout(), CopyToClipboard::to_clipboard_from(&text)) {
            Ok(()) => tui.status = format!("Copied: {text}"),
            Err(e) => {
                warn!("clipboard write failed: {e}");
                tui.status = "Copy failed".to_string();
            }
        },
        Effect::OpenExternal(url) => tui.status = url,
        Effect::None => {}
    }
    false
}

/// Dispatch `location` once and return the projected text. If the page
/// waits on symbols, the fetch is awaited first.
pub async fn render_to_string(
    mut app: App,
    location: &str,
    source: &dyn SymbolsSource,
) -> Result<String, Box<dyn std::error::Error>> {
    app.start(location)?;
    if app.is_suspended() {
        let loaded = load_registry_with_symbols(app.registry().clone(), source).await;
        app.symbols_loaded(loaded)?;
    }
    let page = app.render()?;
    Ok(format!("/{}\n{}", app.location(), project(&page, None).plain_text()))
}
