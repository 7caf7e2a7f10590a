//! Application core: event loop, overlays and action dispatch.
//!
//! The app owns the poller and the current query. Every new snapshot or
//! query change is compiled into a `Render` here and handed to the
//! topology screen.

use std::sync::Arc;
use std::time::Duration;

use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    Frame,
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph},
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

use routemap_config::UrlStore;
use routemap_core::{PollState, Poller, Snapshot, compile};

use crate::action::Action;
use crate::component::Component;
use crate::data_bridge::{spawn_data_bridge, spawn_url_applier};
use crate::event::{Event, EventReader};
use crate::screens::topology::TopologyScreen;
use crate::theme;
use crate::tui::Tui;
use crate::widgets::input::{InputOutcome, TextInput};

/// Which text field is open, if any.
enum Overlay {
    Search(TextInput),
    Url(TextInput),
}

pub struct App {
    poller: Poller,
    url_store: UrlStore,
    screen: TopologyScreen,
    overlay: Option<Overlay>,
    help_visible: bool,
    running: bool,
    query: String,
    snapshot: Option<Arc<Snapshot>>,
    poll_state: PollState,
    /// Last notification for the status bar.
    notice: Option<String>,
    action_tx: mpsc::UnboundedSender<Action>,
    action_rx: mpsc::UnboundedReceiver<Action>,
    /// URL changes, applied in order by a single task.
    url_tx: mpsc::UnboundedSender<Option<Url>>,
    url_rx: Option<mpsc::UnboundedReceiver<Option<Url>>>,
    cancel: CancellationToken,
}

impl App {
    pub fn new(poller: Poller, url_store: UrlStore) -> Self {
        let (action_tx, action_rx) = mpsc::unbounded_channel();
        let (url_tx, url_rx) = mpsc::unbounded_channel();
        let has_url = poller.url().is_some();

        Self {
            poller,
            url_store,
            screen: TopologyScreen::new(has_url),
            overlay: None,
            help_visible: false,
            running: true,
            query: String::new(),
            snapshot: None,
            poll_state: PollState::Idle,
            notice: None,
            action_tx,
            action_rx,
            url_tx,
            url_rx: Some(url_rx),
            cancel: CancellationToken::new(),
        }
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut tui = Tui::new()?;
        tui.enter()?;
        let (cols, rows) = tui.size().unwrap_or((80, 24));
        debug!(cols, rows, "terminal size");

        self.screen.init(self.action_tx.clone())?;
        debug!(screen = self.screen.id(), "screen mounted");

        tokio::spawn(spawn_data_bridge(
            self.poller.clone(),
            self.action_tx.clone(),
            self.cancel.clone(),
        ));
        if let Some(url_rx) = self.url_rx.take() {
            tokio::spawn(spawn_url_applier(
                self.poller.clone(),
                url_rx,
                self.action_tx.clone(),
                self.cancel.clone(),
            ));
        }
        self.poller.start().await?;

        let mut events = EventReader::new(
            Duration::from_millis(250), // throbber tick
            Duration::from_millis(33),  // ~30 FPS render
        );

        info!("TUI event loop started");

        while self.running {
            let Some(event) = events.next().await else {
                break;
            };

            match event {
                Event::Key(key) => {
                    if let Some(action) = self.handle_key_event(key)? {
                        self.action_tx.send(action)?;
                    }
                }
                Event::Resize(w, h) => self.action_tx.send(Action::Resize(w, h))?,
                Event::Tick => self.action_tx.send(Action::Tick)?,
                Event::Render => self.action_tx.send(Action::Render)?,
            }

            while let Ok(action) = self.action_rx.try_recv() {
                self.process_action(&action)?;

                if let Action::Render = action {
                    tui.draw(|frame| self.render(frame))?;
                }
            }
        }

        events.stop();
        self.cancel.cancel();
        self.poller.stop().await;
        info!("TUI event loop ended");
        Ok(())
    }

    // ── Input ────────────────────────────────────────────────────────

    /// Overlays first, then global keys, then the screen.
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if let Some(overlay) = self.overlay.as_mut() {
            return Ok(match overlay {
                Overlay::Search(input) => match input.handle_key(key) {
                    InputOutcome::Changed => Some(Action::QueryChanged(input.value().to_owned())),
                    InputOutcome::Submit => Some(Action::CloseSearch),
                    InputOutcome::Cancel => Some(Action::ClearSearch),
                    InputOutcome::Ignored => None,
                },
                Overlay::Url(input) => match input.handle_key(key) {
                    InputOutcome::Submit => Some(Action::SubmitUrl(input.value().to_owned())),
                    InputOutcome::Cancel => Some(Action::CloseUrlInput),
                    InputOutcome::Changed | InputOutcome::Ignored => None,
                },
            });
        }

        if self.help_visible {
            return Ok(match key.code {
                KeyCode::Esc | KeyCode::Char('?' | 'q') => Some(Action::ToggleHelp),
                _ => None,
            });
        }

        match (key.modifiers, key.code) {
            (KeyModifiers::CONTROL, KeyCode::Char('c')) | (_, KeyCode::Char('q')) => {
                return Ok(Some(Action::Quit));
            }
            (_, KeyCode::Char('?')) => return Ok(Some(Action::ToggleHelp)),
            (_, KeyCode::Char('/')) => return Ok(Some(Action::OpenSearch)),
            (KeyModifiers::NONE, KeyCode::Char('u')) => return Ok(Some(Action::OpenUrlInput)),
            // Esc outside an overlay drops an applied query
            (_, KeyCode::Esc) if !self.query.is_empty() => return Ok(Some(Action::ClearSearch)),
            _ => {}
        }

        self.screen.handle_key_event(key)
    }

    // ── Actions ──────────────────────────────────────────────────────

    fn process_action(&mut self, action: &Action) -> Result<()> {
        match action {
            Action::Quit => self.running = false,

            Action::ToggleHelp => self.help_visible = !self.help_visible,

            Action::OpenSearch => {
                self.open_overlay(Overlay::Search(TextInput::new(
                    "Search",
                    "Enter keep · Esc clear",
                    self.query.as_str(),
                )));
            }
            Action::QueryChanged(query) => {
                self.query.clone_from(query);
                self.recompile()?;
            }
            Action::CloseSearch => self.close_overlay(),
            Action::ClearSearch => {
                self.close_overlay();
                if !self.query.is_empty() {
                    self.query.clear();
                    self.recompile()?;
                }
            }

            Action::OpenUrlInput => {
                let current = self.poller.url().map_or_else(String::new, String::from);
                self.open_overlay(Overlay::Url(TextInput::new(
                    "Traefik API URL",
                    "Enter save · empty stops polling · Esc cancel",
                    current,
                )));
            }
            Action::CloseUrlInput => self.close_overlay(),
            Action::SubmitUrl(raw) => {
                self.close_overlay();
                self.apply_url(raw);
            }

            Action::Refresh => self.refresh(),

            Action::SnapshotUpdated(snapshot) => {
                self.snapshot.clone_from(snapshot);
                self.recompile()?;
            }
            Action::PollStateChanged(state) => {
                if let PollState::Failed { message } = state {
                    debug!(%message, "poll cycle failed");
                }
                self.poll_state = state.clone();
                self.forward(action)?;
            }
            Action::UrlApplied(_) => {
                self.notice = None;
                self.forward(action)?;
            }

            Action::Notify(message) => self.notice = Some(message.clone()),

            Action::Resize(w, h) => debug!(cols = w, rows = h, "terminal resized"),
            Action::Render => {}

            other => self.forward(other)?,
        }
        Ok(())
    }

    fn forward(&mut self, action: &Action) -> Result<()> {
        if let Some(follow_up) = self.screen.update(action)? {
            self.action_tx.send(follow_up)?;
        }
        Ok(())
    }

    fn open_overlay(&mut self, overlay: Overlay) {
        self.overlay = Some(overlay);
        self.screen.set_focused(false);
    }

    fn close_overlay(&mut self) {
        self.overlay = None;
        self.screen.set_focused(true);
    }

    /// Compile the current snapshot against the current query.
    fn recompile(&mut self) -> Result<()> {
        let render = self
            .snapshot
            .as_ref()
            .map(|snapshot| Arc::new(compile(snapshot, &self.query)));
        self.forward(&Action::RenderUpdated(render))
    }

    /// Persist the URL and point the poller at it. Empty stops polling.
    fn apply_url(&mut self, raw: &str) {
        let url = if raw.trim().is_empty() {
            if let Err(e) = self.url_store.clear_url() {
                warn!(error = %e, "failed to clear stored URL");
            }
            None
        } else {
            match routemap_config::parse_url(raw) {
                Ok(url) => {
                    if let Err(e) = self.url_store.set_url(&url) {
                        warn!(error = %e, "failed to store URL");
                        self.notice = Some(format!("URL not saved: {e}"));
                    }
                    Some(url)
                }
                Err(e) => {
                    self.notice = Some(e.to_string());
                    return;
                }
            }
        };

        info!(url = ?url.as_ref().map(Url::as_str), "switching proxy URL");
        if self.url_tx.send(url).is_err() {
            warn!("url applier stopped, URL change dropped");
        }
    }

    fn refresh(&mut self) {
        if self.poller.url().is_none() {
            self.notice = Some("No URL configured, press u".to_owned());
            return;
        }
        let poller = self.poller.clone();
        tokio::spawn(async move {
            // Failures surface through the poll state
            if let Err(e) = poller.refresh().await {
                debug!(error = %e, "manual refresh failed");
            }
        });
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render(&self, frame: &mut Frame) {
        let area = frame.area();
        let [content, status] =
            Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).areas(area);

        self.screen.render(frame, content);
        self.render_status_bar(frame, status);

        if let Some(Overlay::Search(input) | Overlay::Url(input)) = &self.overlay {
            input.render(frame, content);
        }
        if self.help_visible {
            render_help_overlay(frame, area);
        }
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mut spans = vec![Span::raw(" "), self.state_span()];

        if let Some(url) = self.poller.url() {
            spans.push(Span::styled(format!("  {url}"), theme::dim()));
        }
        if !self.query.is_empty() {
            spans.push(Span::styled("  / ", theme::key_hint_key()));
            spans.push(Span::styled(
                self.query.as_str(),
                Style::default().fg(theme::ELECTRIC_YELLOW),
            ));
        }
        if let Some(notice) = self.notice.as_deref() {
            spans.push(Span::styled(format!("  {notice}"), Style::default().fg(theme::CORAL)));
        }
        spans.push(Span::styled(
            " │ ? help  / search  u url  r refresh  q quit",
            theme::key_hint(),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn state_span(&self) -> Span<'static> {
        let last = self
            .snapshot
            .as_ref()
            .and_then(|s| s.fetched_at)
            .map(|at| at.with_timezone(&chrono::Local).format("%H:%M:%S").to_string());

        match &self.poll_state {
            PollState::Idle => Span::styled("○ idle", theme::dim()),
            PollState::Fetching => {
                Span::styled("◐ fetching", Style::default().fg(theme::ELECTRIC_YELLOW))
            }
            PollState::Ready { .. } => Span::styled(
                format!("● updated {}", last.unwrap_or_default()),
                Style::default().fg(theme::SUCCESS_GREEN),
            ),
            PollState::Failed { message } => Span::styled(
                format!(
                    "✗ {message} (last update {})",
                    last.as_deref().unwrap_or("never")
                ),
                Style::default().fg(theme::ERROR_RED),
            ),
        }
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

fn render_help_overlay(frame: &mut Frame, area: Rect) {
    let width = 52u16.min(area.width.saturating_sub(4));
    let height = 17u16.min(area.height.saturating_sub(2));
    let help_area = Rect::new(
        area.x + (area.width.saturating_sub(width)) / 2,
        area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    );

    let block = Block::default()
        .title(" Keyboard Shortcuts ")
        .title_style(theme::title_style())
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_focused())
        .style(Style::default().bg(theme::BG_DARK));

    let entry = |keys: &'static str, what: &'static str| {
        Line::from(vec![
            Span::styled(format!("  {keys:<10}"), theme::key_hint_key()),
            Span::styled(what, theme::key_hint()),
        ])
    };
    let heading =
        |text: &'static str| Line::from(Span::styled(text, Style::default().fg(theme::NEON_CYAN)));

    let lines = vec![
        Line::from(""),
        heading("  Navigation"),
        entry("Tab", "Switch backend / frontage"),
        entry("h/l", "Focus backend / frontage"),
        entry("j/k ↑/↓", "Move up/down"),
        entry("g/G", "Top / bottom"),
        Line::from(""),
        heading("  Global"),
        entry("/", "Search (Enter keep, Esc clear)"),
        entry("u", "Set Traefik API URL"),
        entry("r", "Refresh now"),
        entry("?", "Toggle this help"),
        entry("q", "Quit"),
    ];

    frame.render_widget(Clear, help_area);
    frame.render_widget(Paragraph::new(lines).block(block), help_area);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use routemap_core::PollerConfig;

    use super::*;

    fn app(dir: &std::path::Path) -> App {
        App::new(
            Poller::new(PollerConfig::default()),
            UrlStore::open(dir.join("state.toml")),
        )
    }

    fn key(c: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(c), KeyModifiers::NONE)
    }

    /// Feed a key and process whatever it produced.
    fn press(app: &mut App, event: KeyEvent) {
        if let Some(action) = app.handle_key_event(event).unwrap() {
            app.process_action(&action).unwrap();
        }
    }

    #[test]
    fn search_is_live_and_enter_keeps_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, key('/'));
        assert!(matches!(app.overlay, Some(Overlay::Search(_))));
        press(&mut app, key('w'));
        press(&mut app, key('h'));
        assert_eq!(app.query, "wh");

        press(&mut app, KeyEvent::new(KeyCode::Enter, KeyModifiers::NONE));
        assert!(app.overlay.is_none());
        assert_eq!(app.query, "wh");
    }

    #[test]
    fn esc_in_search_clears_query() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, key('/'));
        press(&mut app, key('x'));
        press(&mut app, KeyEvent::new(KeyCode::Esc, KeyModifiers::NONE));
        assert!(app.overlay.is_none());
        assert_eq!(app.query, "");
    }

    #[test]
    fn keys_inside_overlay_do_not_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, key('u'));
        press(&mut app, key('q'));
        assert!(app.running);
        assert!(matches!(app.overlay, Some(Overlay::Url(_))));
    }

    #[test]
    fn invalid_url_is_reported_and_not_stored() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.process_action(&Action::SubmitUrl("ftp://traefik".into()))
            .unwrap();
        assert!(app.notice.as_deref().unwrap().contains("scheme"));
        assert_eq!(app.url_store.url().unwrap(), None);
    }

    #[test]
    fn submitted_urls_are_stored_and_queued_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        app.process_action(&Action::SubmitUrl("http://first:8080".into()))
            .unwrap();
        app.process_action(&Action::SubmitUrl("http://second:8080".into()))
            .unwrap();
        app.process_action(&Action::SubmitUrl("  ".into())).unwrap();

        let mut url_rx = app.url_rx.take().unwrap();
        let queued: Vec<Option<String>> = std::iter::from_fn(|| url_rx.try_recv().ok())
            .map(|url| url.map(String::from))
            .collect();
        assert_eq!(
            queued,
            vec![
                Some("http://first:8080/".to_owned()),
                Some("http://second:8080/".to_owned()),
                None,
            ]
        );
        assert_eq!(app.url_store.url().unwrap(), None);
    }

    #[test]
    fn help_swallows_keys_until_closed() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, key('?'));
        assert!(app.help_visible);
        press(&mut app, key('/'));
        assert!(app.overlay.is_none());
        press(&mut app, key('?'));
        assert!(!app.help_visible);
    }

    #[test]
    fn refresh_without_url_sets_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = app(dir.path());

        press(&mut app, key('r'));
        assert_eq!(app.notice.as_deref(), Some("No URL configured, press u"));
    }
}
