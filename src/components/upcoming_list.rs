use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::calendar::UpcomingEvent;
use crate::theme;

pub struct UpcomingList;

impl UpcomingList {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        upcoming: &[UpcomingEvent],
        selected_index: usize,
        focused: bool,
    ) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = if w >= 28 && !upcoming.is_empty() {
            format!(" Upcoming Events ({}) ", upcoming.len())
        } else {
            " Upcoming Events ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(if focused { theme.header } else { theme.border });

        if upcoming.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No upcoming events").style(theme.dim);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = upcoming
            .iter()
            .map(|item| format_upcoming(item, inner_w))
            .collect();

        let list = List::new(items)
            .block(block)
            .highlight_style(if focused { theme.selected } else { Style::default() });

        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(list, area, &mut state);
    }
}

fn format_upcoming(item: &UpcomingEvent, max_width: usize) -> ListItem<'static> {
    let theme = theme::current();
    let event = &item.event;

    let mut header = vec![Span::styled(
        item.date.format(" %a, %b %-d, %Y").to_string(),
        theme.dim,
    )];
    if let Some(ref time) = event.time {
        header.push(Span::styled(format!("  {}", time), theme.marker));
    }

    let mut lines = vec![
        Line::from(header),
        Line::from(Span::styled(
            format!(" {}", truncate(&event.title, max_width.saturating_sub(1))),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    if let Some(ref description) = event.description {
        lines.push(Line::from(Span::styled(
            format!(" {}", truncate(description, max_width.saturating_sub(1))),
            theme.dim,
        )));
    }

    lines.push(Line::from(""));
    ListItem::new(Text::from(lines))
}

/// Shorten to `max` characters, ending in "..." when cut.
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let kept: String = s.chars().take(max - 3).collect();
        format!("{}...", kept)
    } else {
        s.chars().take(max).collect()
    }
}
