use std::sync::OnceLock;

use ratatui::style::{Color, Modifier, Style};

use crate::config::ThemeConfig;

static THEME: OnceLock<Theme> = OnceLock::new();

/// Set the theme for the rest of the process. Only the first call wins.
pub fn install(theme: Theme) {
    let _ = THEME.set(theme);
}

/// The active theme, or the default if none was installed.
pub fn current() -> &'static Theme {
    THEME.get_or_init(Theme::default)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub name: String,
    pub today: Style,
    pub selected: Style,
    pub header: Style,
    pub dim: Style,
    pub border: Style,
    pub status: Style,
    /// Dot shown on days that have events.
    pub marker: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            today: Style::default().fg(Color::Black).bg(Color::Yellow),
            selected: Style::default().fg(Color::Black).bg(Color::Cyan),
            header: Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(Color::DarkGray),
            border: Style::default().fg(Color::Gray),
            status: Style::default().fg(Color::White).bg(Color::DarkGray),
            marker: Style::default().fg(Color::Green),
        }
    }
}

impl Theme {
    /// Built-in preset by name; unknown names give the default.
    pub fn preset(name: &str) -> Self {
        match name {
            "dracula" => Self::palette(
                "dracula",
                Color::Rgb(189, 147, 249), // purple
                Color::Rgb(139, 233, 253), // cyan
                Color::Rgb(248, 248, 242),
                Color::Rgb(98, 114, 164),
                Color::Rgb(68, 71, 90),
                Color::Rgb(80, 250, 123), // green
            ),
            "gruvbox" => Self::palette(
                "gruvbox",
                Color::Rgb(250, 189, 47),  // yellow
                Color::Rgb(131, 165, 152), // aqua
                Color::Rgb(235, 219, 178),
                Color::Rgb(146, 131, 116),
                Color::Rgb(80, 73, 69),
                Color::Rgb(184, 187, 38), // green
            ),
            "nord" => Self::palette(
                "nord",
                Color::Rgb(235, 203, 139), // yellow
                Color::Rgb(136, 192, 208), // frost
                Color::Rgb(229, 233, 240),
                Color::Rgb(76, 86, 106),
                Color::Rgb(67, 76, 94),
                Color::Rgb(163, 190, 140), // green
            ),
            _ => Self::default(),
        }
    }

    fn palette(
        name: &str,
        today: Color,
        selected: Color,
        text: Color,
        dim: Color,
        surface: Color,
        marker: Color,
    ) -> Self {
        Self {
            name: name.to_string(),
            today: Style::default().fg(Color::Black).bg(today),
            selected: Style::default().fg(Color::Black).bg(selected),
            header: Style::default().fg(text).add_modifier(Modifier::BOLD),
            dim: Style::default().fg(dim),
            border: Style::default().fg(surface),
            status: Style::default().fg(text).bg(surface),
            marker: Style::default().fg(marker),
        }
    }

    /// Start from the configured preset, then apply individual overrides.
    /// Colors that fail to parse are ignored.
    pub fn from_config(config: &ThemeConfig) -> Self {
        let mut theme = config
            .preset
            .as_deref()
            .map(Theme::preset)
            .unwrap_or_default();

        let color = |value: &Option<String>| value.as_deref().and_then(parse_color);

        if let Some(c) = color(&config.today_fg) {
            theme.today = theme.today.fg(c);
        }
        if let Some(c) = color(&config.today_bg) {
            theme.today = theme.today.bg(c);
        }
        if let Some(c) = color(&config.selected_fg) {
            theme.selected = theme.selected.fg(c);
        }
        if let Some(c) = color(&config.selected_bg) {
            theme.selected = theme.selected.bg(c);
        }
        if let Some(c) = color(&config.header_fg) {
            theme.header = theme.header.fg(c);
        }
        if let Some(c) = color(&config.dim_fg) {
            theme.dim = theme.dim.fg(c);
        }
        if let Some(c) = color(&config.border_fg) {
            theme.border = theme.border.fg(c);
        }
        if let Some(c) = color(&config.status_fg) {
            theme.status = theme.status.fg(c);
        }
        if let Some(c) = color(&config.status_bg) {
            theme.status = theme.status.bg(c);
        }
        if let Some(c) = color(&config.marker_fg) {
            theme.marker = theme.marker.fg(c);
        }

        theme
    }
}

/// Parse "#rrggbb" or a basic color name.
fn parse_color(s: &str) -> Option<Color> {
    let s = s.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() != 6 || !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        return Some(Color::Rgb(channel(0)?, channel(2)?, channel(4)?));
    }
    let color = match s.to_lowercase().as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" => Color::Magenta,
        "cyan" => Color::Cyan,
        "white" => Color::White,
        "gray" | "grey" => Color::Gray,
        "darkgray" | "darkgrey" => Color::DarkGray,
        "lightred" => Color::LightRed,
        "lightgreen" => Color::LightGreen,
        "lightyellow" => Color::LightYellow,
        "lightblue" => Color::LightBlue,
        "lightmagenta" => Color::LightMagenta,
        "lightcyan" => Color::LightCyan,
        _ => return None,
    };
    Some(color)
}
