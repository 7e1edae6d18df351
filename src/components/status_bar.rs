use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{App, Focus, InputMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = theme::current();
        let w = area.width as usize;

        let mode_str = match (app.input_mode, app.focus) {
            (InputMode::Form, _) => "[New Event]",
            (InputMode::Normal, Focus::Grid) => "[Month]",
            (InputMode::Normal, Focus::Upcoming) => "[Upcoming]",
        };

        let count = app.event_count();
        let left = format!(
            " {} {} event{} ",
            mode_str,
            count,
            if count == 1 { "" } else { "s" }
        );

        let right = match app.status_message {
            Some(ref msg) => format!(" {} ", msg),
            None => hints(app, w).to_string(),
        };

        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme.status),
            Span::styled(padding, theme.status),
            Span::styled(right, theme.status),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme.status), area);
    }
}

fn hints(app: &App, w: usize) -> &'static str {
    match (app.input_mode, app.focus) {
        (InputMode::Form, _) => " Tab:Next Enter:Save Esc:Cancel",
        (InputMode::Normal, Focus::Grid) if w >= 80 => {
            " hjkl:Move [/]:Month t:Today Enter:Pick n:New Tab:List ?:Help q:Quit"
        }
        (InputMode::Normal, Focus::Upcoming) if w >= 80 => {
            " jk:Select Enter:Detail d:Delete Tab:Grid ?:Help q:Quit"
        }
        (InputMode::Normal, _) if w >= 40 => " n:New Tab:Focus ?:Help q:Quit",
        _ => " ?:Help q:Quit",
    }
}
