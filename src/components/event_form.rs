use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::controller::EventDraft;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Date,
    Title,
    Time,
    Description,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Date => FormField::Title,
            FormField::Title => FormField::Time,
            FormField::Time => FormField::Description,
            FormField::Description => FormField::Date,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Date => FormField::Description,
            FormField::Title => FormField::Date,
            FormField::Time => FormField::Title,
            FormField::Description => FormField::Time,
        }
    }
}

/// Text typed into the new-event form. Nothing is checked here; the store
/// validates on submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventFormState {
    pub date: String,
    pub title: String,
    pub time: String,
    pub description: String,
    pub active_field: FormField,
}

impl EventFormState {
    /// Empty form on `date`, with the cursor in the title.
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date: date.format("%Y-%m-%d").to_string(),
            title: String::new(),
            time: String::new(),
            description: String::new(),
            active_field: FormField::Title,
        }
    }

    fn active_mut(&mut self) -> &mut String {
        match self.active_field {
            FormField::Date => &mut self.date,
            FormField::Title => &mut self.title,
            FormField::Time => &mut self.time,
            FormField::Description => &mut self.description,
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.active_mut().push(c);
    }

    pub fn backspace(&mut self) {
        self.active_mut().pop();
    }

    pub fn next_field(&mut self) {
        self.active_field = self.active_field.next();
    }

    pub fn prev_field(&mut self) {
        self.active_field = self.active_field.prev();
    }

    pub fn to_draft(&self) -> EventDraft {
        let optional = |s: &str| Some(s.to_string()).filter(|s| !s.trim().is_empty());
        EventDraft {
            date: self.date.clone(),
            title: self.title.clone(),
            time: optional(&self.time),
            description: optional(&self.description),
        }
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        let theme = theme::current();

        let form_w = area.width.clamp(30, 54);
        let form_h = area.height.clamp(8, 10);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h).intersection(area);

        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(" New Event ")
            .title_style(theme.marker.add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(theme.marker);

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // date
            Constraint::Length(1), // title
            Constraint::Length(1), // time
            Constraint::Length(1), // description
            Constraint::Length(1), // spacer
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let fields = [
            (FormField::Date, "Date:", state.date.as_str(), "YYYY-MM-DD"),
            (FormField::Title, "Title:", state.title.as_str(), "required"),
            (FormField::Time, "Time:", state.time.as_str(), "HH:MM, optional"),
            (FormField::Description, "Notes:", state.description.as_str(), "optional"),
        ];
        for ((field, label, value, placeholder), row) in fields.into_iter().zip(rows.iter()) {
            render_field(frame, *row, label, value, placeholder, state.active_field == field);
        }

        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme.dim),
            Span::styled("Enter", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Save ", theme.dim),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme.dim),
        ]);
        frame.render_widget(Paragraph::new(help), rows[5]);
    }
}

fn render_field(
    frame: &mut Frame,
    area: Rect,
    label: &str,
    value: &str,
    placeholder: &str,
    active: bool,
) {
    let theme = theme::current();
    let cursor = if active { "_" } else { "" };

    let mut spans = vec![Span::styled(format!("{:<8}", label), theme.dim)];
    if value.is_empty() && !active {
        spans.push(Span::styled(placeholder.to_string(), theme.dim.add_modifier(Modifier::ITALIC)));
    } else {
        let style = if active {
            theme.header.remove_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!("{}{}", value, cursor), style));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form() -> EventFormState {
        EventFormState::new(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap())
    }

    #[test]
    fn test_new_form_starts_on_title_with_date_filled() {
        let state = form();
        assert_eq!(state.date, "2025-03-10");
        assert_eq!(state.active_field, FormField::Title);
    }

    #[test]
    fn test_typing_goes_to_active_field() {
        let mut state = form();
        "Standup".chars().for_each(|c| state.input_char(c));
        state.next_field();
        "09:3".chars().for_each(|c| state.input_char(c));
        state.input_char('x');
        state.backspace();
        state.input_char('0');

        assert_eq!(state.title, "Standup");
        assert_eq!(state.time, "09:30");
    }

    #[test]
    fn test_field_cycle_wraps_both_ways() {
        let mut state = form();
        for _ in 0..4 {
            state.next_field();
        }
        assert_eq!(state.active_field, FormField::Title);
        state.prev_field();
        state.prev_field();
        assert_eq!(state.active_field, FormField::Description);
    }

    #[test]
    fn test_blank_optional_fields_become_none() {
        let mut state = form();
        state.title = "Standup".to_string();
        state.time = "  ".to_string();
        let draft = state.to_draft();
        assert_eq!(draft.date, "2025-03-10");
        assert_eq!(draft.time, None);
        assert_eq!(draft.description, None);
    }
}
