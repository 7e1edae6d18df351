use chrono::NaiveDate;
use tracing::error;

use crate::calendar::grid::GRID_CELLS;
use crate::calendar::{DayCell, Event, UpcomingEvent};
use crate::components::event_form::EventFormState;
use crate::controller::{CalendarController, CalendarView, Outcome, RenderSink, UiCommand};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    Form,
}

/// Which pane arrow keys and actions apply to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Grid,
    Upcoming,
}

/// Holds the last view the controller pushed.
#[derive(Debug, Default)]
pub struct Screen {
    view: Option<CalendarView>,
}

impl Screen {
    pub fn view(&self) -> Option<&CalendarView> {
        self.view.as_ref()
    }
}

impl RenderSink for Screen {
    fn render(&mut self, view: &CalendarView) {
        self.view = Some(view.clone());
    }
}

pub struct App {
    pub running: bool,
    pub input_mode: InputMode,
    pub focus: Focus,
    pub selected_cell: usize,
    pub upcoming_index: usize,
    pub form_state: Option<EventFormState>,
    pub show_detail: bool,
    pub show_help: bool,
    pub status_message: Option<String>,
    pub screen: Screen,
    controller: CalendarController,
}

impl App {
    pub fn new(controller: CalendarController) -> Self {
        let mut app = Self {
            running: true,
            input_mode: InputMode::Normal,
            focus: Focus::Grid,
            selected_cell: 0,
            upcoming_index: 0,
            form_state: None,
            show_detail: false,
            show_help: false,
            status_message: None,
            screen: Screen::default(),
            controller,
        };
        app.controller.refresh(&mut app.screen);
        app.select_default_cell();
        app
    }

    fn dispatch(&mut self, command: UiCommand) -> Option<Outcome> {
        match self.controller.dispatch(command, &mut self.screen) {
            Ok(outcome) => Some(outcome),
            Err(e) => {
                error!(error = %e, "command failed");
                self.status_message = Some(format!("Could not save: {}", e));
                None
            }
        }
    }

    /// Repaint if the date rolled over since the last frame.
    pub fn tick(&mut self) {
        let stale = self
            .screen
            .view()
            .is_some_and(|v| v.today != self.controller.today());
        if stale {
            self.controller.refresh(&mut self.screen);
            self.clamp_upcoming();
        }
    }

    pub fn upcoming(&self) -> &[UpcomingEvent] {
        self.screen
            .view()
            .map(|v| v.upcoming.as_slice())
            .unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.controller.store().event_count()
    }

    // ── Grid ──

    pub fn selected_cell(&self) -> Option<&DayCell> {
        self.screen.view()?.cells.get(self.selected_cell)
    }

    pub fn selected_date(&self) -> Option<NaiveDate> {
        self.selected_cell().and_then(DayCell::date)
    }

    pub fn selected_day_events(&self) -> &[Event] {
        match self.selected_date() {
            Some(date) => self.controller.store().events_on(date),
            None => &[],
        }
    }

    pub fn move_selection(&mut self, delta: isize) {
        self.selected_cell = self
            .selected_cell
            .saturating_add_signed(delta)
            .min(GRID_CELLS - 1);
    }

    pub fn prev_month(&mut self) {
        self.navigate(UiCommand::PrevMonth);
    }

    pub fn next_month(&mut self) {
        self.navigate(UiCommand::NextMonth);
    }

    pub fn go_to_today(&mut self) {
        self.navigate(UiCommand::Today);
    }

    fn navigate(&mut self, command: UiCommand) {
        if let Some(Outcome::Navigated(_)) = self.dispatch(command) {
            self.select_default_cell();
        }
    }

    /// Today if it is on screen, otherwise the first of the month.
    fn select_default_cell(&mut self) {
        if let Some(view) = self.screen.view() {
            self.selected_cell = view
                .cells
                .iter()
                .position(|c| c.is_today)
                .or_else(|| view.cells.iter().position(|c| !c.is_other_month))
                .unwrap_or(0);
        }
    }

    /// Pick the selected cell's date and open the form on it.
    pub fn click_selected_cell(&mut self) {
        let Some(date_key) = self.selected_cell().map(|c| c.date_key.clone()) else {
            return;
        };
        match self.dispatch(UiCommand::CellClicked { date_key }) {
            Some(Outcome::DateSelected(date)) => self.open_event_form_on(date),
            Some(Outcome::Rejected(e)) => self.status_message = Some(e.to_string()),
            _ => {}
        }
    }

    // ── Form ──

    pub fn open_event_form(&mut self) {
        let today = self.controller.today();
        self.open_event_form_on(today);
    }

    fn open_event_form_on(&mut self, date: NaiveDate) {
        self.form_state = Some(EventFormState::new(date));
        self.input_mode = InputMode::Form;
    }

    pub fn close_event_form(&mut self) {
        self.form_state = None;
        self.input_mode = InputMode::Normal;
    }

    pub fn submit_event_form(&mut self) {
        let Some(draft) = self.form_state.as_ref().map(EventFormState::to_draft) else {
            return;
        };
        match self.dispatch(UiCommand::FormSubmitted(draft)) {
            Some(Outcome::EventAdded(event)) => {
                self.status_message = Some(format!("Event added: {}", event.title));
                self.close_event_form();
            }
            Some(Outcome::Rejected(e)) => self.status_message = Some(e.to_string()),
            _ => {}
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(ref mut form) = self.form_state {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.backspace();
        }
    }

    pub fn form_tab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.next_field();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(ref mut form) = self.form_state {
            form.prev_field();
        }
    }

    // ── Upcoming list ──

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            Focus::Grid => Focus::Upcoming,
            Focus::Upcoming => Focus::Grid,
        };
    }

    pub fn selected_upcoming(&self) -> Option<&UpcomingEvent> {
        self.upcoming().get(self.upcoming_index)
    }

    pub fn scroll_upcoming(&mut self, delta: isize) {
        self.upcoming_index = self.upcoming_index.saturating_add_signed(delta);
        self.clamp_upcoming();
    }

    fn clamp_upcoming(&mut self) {
        let len = self.upcoming().len();
        self.upcoming_index = self.upcoming_index.min(len.saturating_sub(1));
    }

    pub fn open_detail(&mut self) {
        self.show_detail = self.selected_upcoming().is_some();
    }

    pub fn delete_selected_event(&mut self) {
        let Some((date, id, title)) = self
            .selected_upcoming()
            .map(|u| (u.date, u.event.id, u.event.title.clone()))
        else {
            self.status_message = Some("No event selected".to_string());
            return;
        };

        match self.dispatch(UiCommand::DeleteClicked { date, id }) {
            Some(Outcome::EventDeleted(true)) => {
                self.status_message = Some(format!("Deleted: {}", title));
            }
            Some(Outcome::EventDeleted(false)) => {
                self.status_message = Some("Event no longer exists".to_string());
            }
            _ => {}
        }
        self.show_detail = false;
        self.clamp_upcoming();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::clock::FixedClock;
    use crate::calendar::{EventStore, MemoryStore};

    fn app() -> App {
        let store = EventStore::load(Box::new(MemoryStore::new()));
        App::new(CalendarController::new(
            store,
            Box::new(FixedClock::on(2025, 3, 10)),
        ))
    }

    fn type_text(app: &mut App, text: &str) {
        text.chars().for_each(|c| app.form_input_char(c));
    }

    #[test]
    fn test_starts_with_today_selected() {
        let app = app();
        let cell = app.selected_cell().unwrap();
        assert!(cell.is_today);
        assert_eq!(cell.date_key, "2025-03-10");
    }

    #[test]
    fn test_enter_on_cell_opens_form_with_cell_date() {
        let mut app = app();
        app.move_selection(-7);
        app.click_selected_cell();

        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(app.form_state.as_ref().unwrap().date, "2025-03-03");
    }

    #[test]
    fn test_submit_adds_event_and_closes_form() {
        let mut app = app();
        app.open_event_form();
        type_text(&mut app, "Standup");

        app.submit_event_form();

        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.status_message.as_deref(), Some("Event added: Standup"));
        assert_eq!(app.upcoming().len(), 1);
        assert!(app.selected_cell().unwrap().has_events);
        assert_eq!(app.selected_day_events().len(), 1);
    }

    #[test]
    fn test_rejected_submit_keeps_form_open() {
        let mut app = app();
        app.open_event_form();
        app.submit_event_form();

        assert_eq!(app.input_mode, InputMode::Form);
        assert_eq!(
            app.status_message.as_deref(),
            Some("Please fill in the event title")
        );
        assert_eq!(app.event_count(), 0);
    }

    #[test]
    fn test_delete_selected_upcoming_event() {
        let mut app = app();
        for title in ["One", "Two"] {
            app.open_event_form();
            type_text(&mut app, title);
            app.submit_event_form();
        }
        app.toggle_focus();
        app.scroll_upcoming(5);
        assert_eq!(app.upcoming_index, 1);

        app.delete_selected_event();

        assert_eq!(app.status_message.as_deref(), Some("Deleted: Two"));
        assert_eq!(app.upcoming_index, 0);
        assert_eq!(app.selected_upcoming().unwrap().event.title, "One");
    }

    #[test]
    fn test_delete_with_empty_list_reports() {
        let mut app = app();
        app.delete_selected_event();
        assert_eq!(app.status_message.as_deref(), Some("No event selected"));
    }

    #[test]
    fn test_month_navigation_moves_selection_to_first_day() {
        let mut app = app();
        app.next_month();
        let cell = app.selected_cell().unwrap();
        assert_eq!(cell.date_key, "2025-04-01");

        app.go_to_today();
        assert_eq!(app.selected_cell().unwrap().date_key, "2025-03-10");
    }

    #[test]
    fn test_selection_is_clamped_to_grid() {
        let mut app = app();
        app.move_selection(-100);
        assert_eq!(app.selected_cell, 0);
        app.move_selection(100);
        assert_eq!(app.selected_cell, GRID_CELLS - 1);
    }
}
