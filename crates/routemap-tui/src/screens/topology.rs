//! Topology screen: backend tree on the left, frontage tree on the right,
//! detail panel for the selected node underneath.

use std::sync::Arc;

use chrono::{DateTime, Local, Utc};
use color_eyre::eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, BorderType, Borders, List, ListItem, ListState, Paragraph, Wrap};
use throbber_widgets_tui::{Throbber, ThrobberState};

use routemap_core::{Node, PollState, Render, Topology, Tree};

use crate::action::Action;
use crate::component::Component;
use crate::theme;
use crate::widgets::tree::{self, TreeRow};

// ── Panes ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Pane {
    #[default]
    Backend,
    Frontage,
}

impl Pane {
    fn other(self) -> Self {
        match self {
            Self::Backend => Self::Frontage,
            Self::Frontage => Self::Backend,
        }
    }

    fn index(self) -> usize {
        match self {
            Self::Backend => 0,
            Self::Frontage => 1,
        }
    }
}

/// What the body of the screen shows.
#[derive(Debug, PartialEq, Eq)]
enum View<'a> {
    NoUrl,
    Loading,
    Failed(&'a str),
    Empty(String),
    Topology(&'a Topology),
}

// ── Screen state ─────────────────────────────────────────────────────

pub struct TopologyScreen {
    focused: bool,
    has_url: bool,
    poll_state: PollState,
    render: Option<Arc<Render>>,
    /// Flattened rows per pane, rebuilt on every new render.
    rows: [Vec<TreeRow>; 2],
    selected: [usize; 2],
    pane: Pane,
    throbber: ThrobberState,
    last_update: Option<DateTime<Utc>>,
}

impl TopologyScreen {
    pub fn new(has_url: bool) -> Self {
        Self {
            focused: true,
            has_url,
            poll_state: PollState::Idle,
            render: None,
            rows: [Vec::new(), Vec::new()],
            selected: [0, 0],
            pane: Pane::default(),
            throbber: ThrobberState::default(),
            last_update: None,
        }
    }

    fn view(&self) -> View<'_> {
        if !self.has_url {
            return View::NoUrl;
        }
        match self.render.as_deref() {
            Some(Render::Topology(topology)) => View::Topology(topology),
            Some(other) => View::Empty(other.message().unwrap_or_default()),
            None => match &self.poll_state {
                PollState::Failed { message } => View::Failed(message),
                _ => View::Loading,
            },
        }
    }

    fn tree(&self, pane: Pane) -> Option<&Tree> {
        let topology = self.render.as_deref()?.topology()?;
        Some(match pane {
            Pane::Backend => &topology.backend,
            Pane::Frontage => &topology.frontage,
        })
    }

    /// Currently selected node in the focused pane.
    pub fn selected_node(&self) -> Option<&Node> {
        let row = self.rows[self.pane.index()].get(self.selected[self.pane.index()])?;
        tree::node_at(&self.tree(self.pane)?.root, &row.path)
    }

    fn set_render(&mut self, render: Option<Arc<Render>>) {
        self.render = render;
        for pane in [Pane::Backend, Pane::Frontage] {
            let rows = self
                .tree(pane)
                .map_or_else(Vec::new, |t| tree::flatten(&t.root));
            let i = pane.index();
            self.selected[i] = self.selected[i].min(rows.len().saturating_sub(1));
            self.rows[i] = rows;
        }
    }

    fn move_selection(&mut self, delta: isize) {
        let i = self.pane.index();
        let len = self.rows[i].len();
        if len == 0 {
            return;
        }
        self.selected[i] = self.selected[i].saturating_add_signed(delta).min(len - 1);
    }

    fn jump(&mut self, to_end: bool) {
        let i = self.pane.index();
        self.selected[i] = if to_end {
            self.rows[i].len().saturating_sub(1)
        } else {
            0
        };
    }

    // ── Rendering ────────────────────────────────────────────────────

    fn render_tree(&self, frame: &mut Frame, area: Rect, pane: Pane, title: &str) {
        let active = self.focused && self.pane == pane;
        let block = Block::default()
            .title(format!(" {title} "))
            .title_style(theme::title_style())
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(if active {
                theme::border_focused()
            } else {
                theme::border_default()
            });

        let Some(tree) = self.tree(pane) else {
            frame.render_widget(block, area);
            return;
        };

        let items: Vec<ListItem> = self.rows[pane.index()]
            .iter()
            .filter_map(|row| {
                tree::node_at(&tree.root, &row.path).map(|node| ListItem::new(tree::row_line(row, node)))
            })
            .collect();

        let list = List::new(items).block(block).highlight_style(if active {
            theme::row_selected()
        } else {
            Style::default()
        });
        let mut state = ListState::default().with_selected(Some(self.selected[pane.index()]));
        frame.render_stateful_widget(list, area, &mut state);
    }

    fn render_detail(&self, frame: &mut Frame, area: Rect, topology: &Topology) {
        let block = Block::default()
            .title(" Detail ")
            .title_style(theme::title_style())
            .title_bottom(Line::from(Span::styled(
                format!(
                    " {} middlewares · {} certificates ",
                    topology.middlewares.len(),
                    topology.certificates.len()
                ),
                theme::key_hint(),
            )))
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());

        let lines = self.selected_node().map_or_else(Vec::new, detail_lines);
        frame.render_widget(
            Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
            area,
        );
    }

    fn render_topology(&self, frame: &mut Frame, area: Rect, topology: &Topology) {
        let [trees, detail] =
            Layout::vertical([Constraint::Min(5), Constraint::Length(8)]).areas(area);

        // Split by the engine's width hints so the wider tree gets more room
        let backend = topology.backend.width_hint.max(1);
        let frontage = topology.frontage.width_hint.max(1);
        let [left, right] = Layout::horizontal([
            Constraint::Ratio(backend, backend + frontage),
            Constraint::Ratio(frontage, backend + frontage),
        ])
        .areas(trees);

        self.render_tree(frame, left, Pane::Backend, "Backend");
        self.render_tree(frame, right, Pane::Frontage, "Frontage");
        self.render_detail(frame, detail, topology);
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(BorderType::Rounded)
            .border_style(theme::border_default());
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [_, middle, _] = Layout::vertical([
            Constraint::Fill(1),
            Constraint::Length(1),
            Constraint::Fill(1),
        ])
        .areas(inner);
        let [_, center, _] = Layout::horizontal([
            Constraint::Fill(1),
            Constraint::Length(28),
            Constraint::Fill(1),
        ])
        .areas(middle);

        let throbber = Throbber::default()
            .label(" Fetching topology...")
            .style(Style::default().fg(theme::NEON_CYAN))
            .throbber_style(Style::default().fg(theme::ELECTRIC_PURPLE));
        frame.render_stateful_widget(throbber, center, &mut self.throbber.clone());
    }
}

/// Detail panel content for one node.
fn detail_lines(node: &Node) -> Vec<Line<'_>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(format!("{} ", node.kind), theme::key_hint()),
        Span::styled(node.label.as_str(), theme::node_label(node.kind)),
    ])];

    if let Some(status) = node.status.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Status: ", theme::dim()),
            Span::styled(status, theme::status(status)),
        ]));
    }
    if let Some(link) = node.link.as_deref() {
        lines.push(Line::from(vec![
            Span::styled("Link: ", theme::dim()),
            Span::styled(link, Style::default().fg(theme::LIGHT_BLUE)),
        ]));
    }
    lines.extend(
        node.details
            .iter()
            .map(|detail| Line::from(Span::styled(detail.as_str(), theme::dim()))),
    );
    lines
}

/// Centered text inside a bordered box.
fn render_message(frame: &mut Frame, area: Rect, lines: Vec<Line<'_>>) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(theme::border_default());
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let height = u16::try_from(lines.len()).unwrap_or(u16::MAX);
    let [_, middle, _] = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(height),
        Constraint::Fill(1),
    ])
    .areas(inner);
    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), middle);
}

fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

impl Component for TopologyScreen {
    fn handle_key_event(&mut self, key: KeyEvent) -> Result<Option<Action>> {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return Ok(None);
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab => self.pane = self.pane.other(),
            KeyCode::Char('h') | KeyCode::Left => self.pane = Pane::Backend,
            KeyCode::Char('l') | KeyCode::Right => self.pane = Pane::Frontage,
            KeyCode::Char('j') | KeyCode::Down => self.move_selection(1),
            KeyCode::Char('k') | KeyCode::Up => self.move_selection(-1),
            KeyCode::PageDown => self.move_selection(10),
            KeyCode::PageUp => self.move_selection(-10),
            KeyCode::Char('g') | KeyCode::Home => self.jump(false),
            KeyCode::Char('G') | KeyCode::End => self.jump(true),
            KeyCode::Char('r') => return Ok(Some(Action::Refresh)),
            _ => {}
        }
        Ok(None)
    }

    fn update(&mut self, action: &Action) -> Result<Option<Action>> {
        match action {
            Action::Tick => {
                if matches!(self.poll_state, PollState::Fetching) {
                    self.throbber.calc_next();
                }
            }
            Action::RenderUpdated(render) => self.set_render(render.clone()),
            Action::PollStateChanged(state) => {
                if let PollState::Ready { at } = state {
                    self.last_update = Some(*at);
                }
                self.poll_state = state.clone();
            }
            Action::UrlApplied(url) => {
                self.has_url = url.is_some();
                if url.is_none() {
                    self.last_update = None;
                }
            }
            _ => {}
        }
        Ok(None)
    }

    fn render(&self, frame: &mut Frame, area: Rect) {
        match self.view() {
            View::Topology(topology) => self.render_topology(frame, area, topology),
            View::Loading => self.render_loading(frame, area),
            View::NoUrl => render_message(
                frame,
                area,
                vec![
                    Line::from(Span::styled(
                        "No Traefik URL configured",
                        Style::default().fg(theme::ELECTRIC_YELLOW),
                    )),
                    Line::from(""),
                    Line::from(vec![
                        Span::styled("Press ", theme::key_hint()),
                        Span::styled("u", theme::key_hint_key()),
                        Span::styled(" to enter the API address, e.g. ", theme::key_hint()),
                        Span::styled("http://traefik:8080", theme::dim()),
                    ]),
                ],
            ),
            View::Failed(message) => {
                let last = self
                    .last_update
                    .map_or_else(|| "never".to_owned(), format_time);
                render_message(
                    frame,
                    area,
                    vec![
                        Line::from(Span::styled(
                            "Could not fetch topology",
                            Style::default().fg(theme::ERROR_RED),
                        )),
                        Line::from(Span::styled(message, theme::dim())),
                        Line::from(""),
                        Line::from(Span::styled(
                            format!("Last update: {last}"),
                            theme::key_hint(),
                        )),
                    ],
                );
            }
            View::Empty(message) => render_message(
                frame,
                area,
                vec![Line::from(Span::styled(message, theme::dim()))],
            ),
        }
    }

    fn set_focused(&mut self, focused: bool) {
        self.focused = focused;
    }

    fn id(&self) -> &str {
        "topology"
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;
    use routemap_core::{Anchor, NodeKind};

    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn topology() -> Render {
        let mut backend = Node::new(NodeKind::Instance, "Traefik Instance");
        let mut docker = Node::new(NodeKind::Provider, "docker");
        docker.children.push(Node::new(NodeKind::Service, "whoami@docker"));
        backend.children.push(docker);

        let mut frontage = Node::new(NodeKind::Ingress, "Internet / Entrypoints");
        frontage.children.push(Node::new(NodeKind::Entrypoint, "web"));

        Render::Topology(Box::new(Topology {
            backend: Tree {
                root: backend,
                width_hint: 600,
                anchor: Anchor::LeftToRight,
            },
            frontage: Tree {
                root: frontage,
                width_hint: 600,
                anchor: Anchor::RightToLeft,
            },
            middlewares: Vec::new(),
            certificates: Vec::new(),
        }))
    }

    fn loaded() -> TopologyScreen {
        let mut screen = TopologyScreen::new(true);
        screen
            .update(&Action::RenderUpdated(Some(Arc::new(topology()))))
            .unwrap();
        screen
    }

    #[test]
    fn view_follows_url_and_poll_state() {
        let mut screen = TopologyScreen::new(false);
        assert_eq!(screen.view(), View::NoUrl);

        screen.update(&Action::UrlApplied(Some("http://t:8080".parse().unwrap()))).unwrap();
        assert_eq!(screen.view(), View::Loading);

        screen
            .update(&Action::PollStateChanged(PollState::Failed {
                message: "refused".into(),
            }))
            .unwrap();
        assert_eq!(screen.view(), View::Failed("refused"));

        screen
            .update(&Action::RenderUpdated(Some(Arc::new(Render::NoResults {
                query: "zzz".into(),
            }))))
            .unwrap();
        assert_eq!(screen.view(), View::Empty("No results for \"zzz\"".into()));
    }

    #[test]
    fn navigation_stays_in_bounds() {
        let mut screen = loaded();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        assert_eq!(screen.selected_node().unwrap().label, "whoami@docker");

        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        assert_eq!(screen.selected_node().unwrap().label, "whoami@docker");

        screen.handle_key_event(key(KeyCode::Char('g'))).unwrap();
        screen.handle_key_event(key(KeyCode::Char('k'))).unwrap();
        assert_eq!(screen.selected_node().unwrap().label, "Traefik Instance");
    }

    #[test]
    fn tab_switches_pane_and_keeps_selection() {
        let mut screen = loaded();
        screen.handle_key_event(key(KeyCode::Char('j'))).unwrap();
        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(screen.pane, Pane::Frontage);
        assert_eq!(screen.selected_node().unwrap().label, "Internet / Entrypoints");

        screen.handle_key_event(key(KeyCode::Tab)).unwrap();
        assert_eq!(screen.selected_node().unwrap().label, "docker");
    }

    #[test]
    fn selection_is_clamped_when_tree_shrinks() {
        let mut screen = loaded();
        screen.handle_key_event(key(KeyCode::Char('G'))).unwrap();
        screen.update(&Action::RenderUpdated(Some(Arc::new(Render::NoData)))).unwrap();
        assert_eq!(screen.selected, [0, 0]);
        assert!(screen.selected_node().is_none());
    }

    #[test]
    fn r_requests_refresh() {
        let mut screen = loaded();
        let action = screen.handle_key_event(key(KeyCode::Char('r'))).unwrap();
        assert!(matches!(action, Some(Action::Refresh)));
    }
}
