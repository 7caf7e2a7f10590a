//! Palette and semantic styles for the TUI.

use ratatui::style::{Color, Modifier, Style};

use routemap_core::{NodeKind, ServerHealth};

// ── Core Palette ──────────────────────────────────────────────────────

pub const ELECTRIC_PURPLE: Color = Color::Rgb(225, 53, 255); // #e135ff
pub const NEON_CYAN: Color = Color::Rgb(128, 255, 234); // #80ffea
pub const CORAL: Color = Color::Rgb(255, 106, 193); // #ff6ac1
pub const ELECTRIC_YELLOW: Color = Color::Rgb(241, 250, 140); // #f1fa8c
pub const SUCCESS_GREEN: Color = Color::Rgb(80, 250, 123); // #50fa7b
pub const ERROR_RED: Color = Color::Rgb(255, 99, 99); // #ff6363

// ── Extended Palette ──────────────────────────────────────────────────

pub const DIM_WHITE: Color = Color::Rgb(189, 193, 207); // #bdc1cf
pub const BORDER_GRAY: Color = Color::Rgb(98, 114, 164); // #6272a4
pub const BG_HIGHLIGHT: Color = Color::Rgb(40, 42, 54); // #282a36
pub const BG_DARK: Color = Color::Rgb(30, 31, 41); // #1e1f29
pub const LIGHT_BLUE: Color = Color::Rgb(139, 233, 253); // #8be9fd

// ── Semantic Styles ───────────────────────────────────────────────────

/// Title text for blocks/panels.
pub fn title_style() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn border_focused() -> Style {
    Style::default().fg(ELECTRIC_PURPLE)
}

pub fn border_default() -> Style {
    Style::default().fg(BORDER_GRAY)
}

/// Selected tree row.
pub fn row_selected() -> Style {
    Style::default().bg(BG_HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Tree guides (`├──`, `│`).
pub fn guide() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint() -> Style {
    Style::default().fg(BORDER_GRAY)
}

pub fn key_hint_key() -> Style {
    Style::default().fg(NEON_CYAN).add_modifier(Modifier::BOLD)
}

pub fn dim() -> Style {
    Style::default().fg(DIM_WHITE)
}

// ── Domain Styles ─────────────────────────────────────────────────────

/// Label style per node kind: roots bold, backend cool, frontage warm.
pub fn node_label(kind: NodeKind) -> Style {
    match kind {
        NodeKind::Instance | NodeKind::Ingress => Style::default()
            .fg(ELECTRIC_PURPLE)
            .add_modifier(Modifier::BOLD),
        NodeKind::Provider => Style::default().fg(LIGHT_BLUE),
        NodeKind::Service => Style::default().fg(NEON_CYAN),
        NodeKind::Server | NodeKind::Middleware | NodeKind::Certificate => dim(),
        NodeKind::Entrypoint => Style::default().fg(ELECTRIC_YELLOW),
        NodeKind::Route => Style::default().fg(CORAL),
    }
}

/// Colour for a health or status string reported by the proxy.
/// Backend server health. A status the proxy does not spell as up or down
/// stands out rather than fading into the tree.
pub fn health(health: ServerHealth) -> Style {
    let color = match health {
        ServerHealth::Up => SUCCESS_GREEN,
        ServerHealth::Down => ERROR_RED,
        ServerHealth::Unknown => ELECTRIC_YELLOW,
    };
    Style::default().fg(color)
}

pub fn status(value: &str) -> Style {
    let color = match value.to_ascii_lowercase().as_str() {
        "up" | "enabled" => SUCCESS_GREEN,
        "down" | "disabled" => ERROR_RED,
        "warning" => ELECTRIC_YELLOW,
        _ => BORDER_GRAY,
    };
    Style::default().fg(color)
}
