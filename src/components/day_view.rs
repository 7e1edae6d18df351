use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::calendar::{Event, UpcomingEvent};
use crate::theme;

use super::upcoming_list::truncate;

/// Events filed under the selected grid cell.
pub struct DayView;

impl DayView {
    pub fn render(frame: &mut Frame, area: Rect, date: Option<NaiveDate>, events: &[Event]) {
        let theme = theme::current();
        let w = area.width as usize;

        let title = match date {
            Some(d) if w >= 30 => format!(" {} ", d.format("%A, %B %-d")),
            Some(d) => format!(" {} ", d.format("%b %-d")),
            None => " Day ".to_string(),
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme.header)
            .title_bottom(Line::from(Span::styled(count_str, theme.dim)))
            .borders(Borders::ALL)
            .border_style(theme.border);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            frame.render_widget(Paragraph::new("No events").style(theme.dim), inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = events.iter().map(|ev| format_event(ev, inner_w)).collect();
        frame.render_widget(List::new(items).block(block), area);
    }
}

fn format_event(ev: &Event, max_width: usize) -> ListItem<'static> {
    let theme = theme::current();
    let time_str = format!(" {:<7} ", ev.time_display());
    let room = max_width.saturating_sub(time_str.chars().count());

    ListItem::new(Line::from(vec![
        Span::styled(time_str, Style::default().add_modifier(Modifier::DIM)),
        Span::styled(truncate(&ev.title, room), Style::default()),
    ]))
    .style(if ev.time.is_none() { theme.marker } else { Style::default() })
}

/// Popup with everything known about one upcoming event.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, item: &UpcomingEvent) {
    let theme = theme::current();
    let ev = &item.event;

    let popup_w = area.width.clamp(30, 60);
    let popup_h = area.height.clamp(8, 14);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w, popup_h).intersection(area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {} ", ev.title))
        .title_style(theme.header)
        .borders(Borders::ALL)
        .border_style(theme.header);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let mut lines = vec![
        Line::from(vec![
            Span::styled("Date: ", theme.dim),
            Span::raw(item.date.format("%A, %B %-d, %Y").to_string()),
        ]),
        Line::from(vec![
            Span::styled("Time: ", theme.dim),
            Span::raw(ev.time_display()),
        ]),
    ];

    if let Some(ref notes) = ev.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes:", theme.dim)));
        lines.extend(notes.lines().map(|l| Line::from(l.to_string())));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "d: Delete  Esc: Close",
        theme.dim,
    )));

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
