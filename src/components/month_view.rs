use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::grid::WEEKDAY_LABELS;
use crate::calendar::DayCell;
use crate::controller::CalendarView;
use crate::theme;

const CELL_WIDTH: usize = 5;

/// Width of the grid including its border.
pub const MONTH_VIEW_WIDTH: u16 = (CELL_WIDTH as u16) * 7 + 2;
/// Header row, six weeks, and the border.
pub const MONTH_VIEW_HEIGHT: u16 = 1 + 6 + 2;

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        view: &CalendarView,
        selected_cell: usize,
        focused: bool,
    ) {
        let theme = theme::current();

        let block = Block::default()
            .title(format!(" {} ", view.title))
            .title_style(theme.header)
            .borders(Borders::ALL)
            .border_style(if focused { theme.header } else { theme.border });

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let header: Vec<Span> = WEEKDAY_LABELS
            .iter()
            .map(|d| Span::styled(format!("{:^width$}", d, width = CELL_WIDTH), theme.header))
            .collect();

        let weeks: Vec<Line> = view
            .cells
            .chunks(7)
            .enumerate()
            .map(|(row, week)| {
                let spans = week
                    .iter()
                    .enumerate()
                    .flat_map(|(col, cell)| {
                        let selected = focused && row * 7 + col == selected_cell;
                        cell_spans(cell, selected)
                    })
                    .collect::<Vec<_>>();
                Line::from(spans)
            })
            .collect();

        let mut constraints = vec![Constraint::Length(1)];
        constraints.extend(weeks.iter().map(|_| Constraint::Length(1)));
        constraints.push(Constraint::Min(0));
        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(Line::from(header)), rows[0]);
        for (week, row) in weeks.into_iter().zip(rows.iter().skip(1)) {
            frame.render_widget(Paragraph::new(week), *row);
        }
    }
}

/// " 12• " with the dot only on days that have events.
fn cell_spans(cell: &DayCell, selected: bool) -> [Span<'static>; 2] {
    let theme = theme::current();

    let style = if selected {
        theme.selected
    } else if cell.is_today {
        theme.today
    } else if cell.is_other_month {
        theme.dim
    } else {
        Style::default()
    };

    let marker = if cell.has_events { "\u{2022} " } else { "  " };
    let marker_style = if selected || cell.is_today {
        style
    } else {
        theme.marker
    };

    [
        Span::styled(format!(" {:>2}", cell.day_number), style),
        Span::styled(marker, marker_style),
    ]
}
