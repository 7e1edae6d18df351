//! Owns the calendar state and turns UI commands into state changes.
//!
//! The controller never draws. After each command that changes what is on
//! screen it hands a freshly computed [`CalendarView`] to a [`RenderSink`].

use chrono::NaiveDate;
use tracing::debug;

use crate::calendar::grid::{self, generate_grid, parse_date_key};
use crate::calendar::{
    Clock, DayCell, Event, EventId, EventStore, StoreError, UpcomingEvent, ValidationError,
    ViewMonth,
};

/// Everything a renderer needs for one paint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CalendarView {
    pub month: ViewMonth,
    pub title: String,
    pub today: NaiveDate,
    pub cells: Vec<DayCell>,
    pub upcoming: Vec<UpcomingEvent>,
}

pub trait RenderSink {
    fn render(&mut self, view: &CalendarView);
}

/// Raw field values from the new-event form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventDraft {
    pub date: String,
    pub title: String,
    pub time: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UiCommand {
    PrevMonth,
    NextMonth,
    Today,
    CellClicked { date_key: String },
    DeleteClicked { date: NaiveDate, id: EventId },
    FormSubmitted(EventDraft),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Navigated(ViewMonth),
    /// A cell was picked; the form should use this date.
    DateSelected(NaiveDate),
    EventAdded(Event),
    /// Bad form input. Nothing changed.
    Rejected(ValidationError),
    EventDeleted(bool),
}

pub struct CalendarController {
    month: ViewMonth,
    store: EventStore,
    clock: Box<dyn Clock>,
}

impl CalendarController {
    /// Start on the month containing today.
    pub fn new(store: EventStore, clock: Box<dyn Clock>) -> Self {
        let month = ViewMonth::containing(clock.today());
        Self {
            month,
            store,
            clock,
        }
    }

    #[cfg(test)]
    pub fn month(&self) -> ViewMonth {
        self.month
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    pub fn store(&self) -> &EventStore {
        &self.store
    }

    pub fn view(&self) -> CalendarView {
        let today = self.clock.today();
        CalendarView {
            month: self.month,
            title: self.month.title(),
            today,
            cells: generate_grid(self.month, today, |d| self.store.has_events_on(d)),
            upcoming: self.store.upcoming_events(today),
        }
    }

    pub fn refresh(&self, sink: &mut dyn RenderSink) {
        sink.render(&self.view());
    }

    pub fn dispatch(
        &mut self,
        command: UiCommand,
        sink: &mut dyn RenderSink,
    ) -> Result<Outcome, StoreError> {
        debug!(?command, "dispatch");

        let outcome = match command {
            UiCommand::PrevMonth => self.navigate(grid::prev_month(self.month)),
            UiCommand::NextMonth => self.navigate(grid::next_month(self.month)),
            UiCommand::Today => self.navigate(ViewMonth::containing(self.clock.today())),
            UiCommand::CellClicked { date_key } => {
                return Ok(match parse_date_key(&date_key) {
                    Some(date) => Outcome::DateSelected(date),
                    None => Outcome::Rejected(ValidationError::InvalidDate(date_key)),
                });
            }
            UiCommand::DeleteClicked { date, id } => {
                if !self.store.delete_event(date, id)? {
                    return Ok(Outcome::EventDeleted(false));
                }
                Outcome::EventDeleted(true)
            }
            UiCommand::FormSubmitted(draft) => {
                match self.store.add_event(
                    &draft.date,
                    &draft.title,
                    draft.time.as_deref(),
                    draft.description.as_deref(),
                ) {
                    Ok(event) => Outcome::EventAdded(event),
                    Err(StoreError::Validation(e)) => return Ok(Outcome::Rejected(e)),
                    Err(e) => return Err(e),
                }
            }
        };

        self.refresh(sink);
        Ok(outcome)
    }

    fn navigate(&mut self, month: ViewMonth) -> Outcome {
        self.month = month;
        Outcome::Navigated(month)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::clock::FixedClock;
    use crate::calendar::MemoryStore;

    #[derive(Default)]
    struct RecordingSink {
        frames: Vec<CalendarView>,
    }

    impl RenderSink for RecordingSink {
        fn render(&mut self, view: &CalendarView) {
            self.frames.push(view.clone());
        }
    }

    fn controller() -> CalendarController {
        let store = EventStore::load(Box::new(MemoryStore::new()));
        CalendarController::new(store, Box::new(FixedClock::on(2025, 3, 10)))
    }

    fn draft(date: &str, title: &str, time: Option<&str>) -> EventDraft {
        EventDraft {
            date: date.to_string(),
            title: title.to_string(),
            time: time.map(str::to_string),
            description: None,
        }
    }

    #[test]
    fn test_starts_on_current_month() {
        let c = controller();
        assert_eq!(c.month(), ViewMonth::new(2025, 2));
        let view = c.view();
        assert_eq!(view.title, "March 2025");
        assert_eq!(view.cells.len(), grid::GRID_CELLS);
        assert_eq!(view.cells.iter().filter(|c| c.is_today).count(), 1);
    }

    #[test]
    fn test_navigation_renders_each_step() {
        let mut c = controller();
        let mut sink = RecordingSink::default();

        let outcome = c.dispatch(UiCommand::NextMonth, &mut sink).unwrap();
        assert_eq!(outcome, Outcome::Navigated(ViewMonth::new(2025, 3)));
        c.dispatch(UiCommand::PrevMonth, &mut sink).unwrap();
        c.dispatch(UiCommand::PrevMonth, &mut sink).unwrap();

        let titles: Vec<&str> = sink.frames.iter().map(|f| f.title.as_str()).collect();
        assert_eq!(titles, vec!["April 2025", "March 2025", "February 2025"]);
        assert!(sink.frames[2].cells.iter().all(|c| !c.is_today));

        c.dispatch(UiCommand::Today, &mut sink).unwrap();
        assert_eq!(c.month(), ViewMonth::new(2025, 2));
    }

    #[test]
    fn test_cell_click_selects_date_without_rendering() {
        let mut c = controller();
        let mut sink = RecordingSink::default();

        let outcome = c
            .dispatch(
                UiCommand::CellClicked {
                    date_key: "2025-02-28".to_string(),
                },
                &mut sink,
            )
            .unwrap();
        assert_eq!(
            outcome,
            Outcome::DateSelected(NaiveDate::from_ymd_opt(2025, 2, 28).unwrap())
        );
        assert!(sink.frames.is_empty());
    }

    #[test]
    fn test_form_submit_adds_and_marks_cell() {
        let mut c = controller();
        let mut sink = RecordingSink::default();

        let outcome = c
            .dispatch(
                UiCommand::FormSubmitted(draft("2025-03-12", "Dentist", Some("15:00"))),
                &mut sink,
            )
            .unwrap();
        let event = match outcome {
            Outcome::EventAdded(event) => event,
            other => panic!("expected EventAdded, got {other:?}"),
        };
        assert_eq!(event.title, "Dentist");

        let frame = sink.frames.last().unwrap();
        let cell = frame.cells.iter().find(|c| c.date_key == "2025-03-12").unwrap();
        assert!(cell.has_events);
        assert_eq!(frame.upcoming.len(), 1);
        assert_eq!(frame.upcoming[0].event, event);
    }

    #[test]
    fn test_rejected_submit_leaves_state_and_screen_alone() {
        let mut c = controller();
        let mut sink = RecordingSink::default();

        let outcome = c
            .dispatch(UiCommand::FormSubmitted(draft("2025-03-12", "", None)), &mut sink)
            .unwrap();
        assert_eq!(outcome, Outcome::Rejected(ValidationError::MissingTitle));
        assert!(sink.frames.is_empty());
        assert_eq!(c.store().event_count(), 0);
    }

    #[test]
    fn test_delete_click_removes_event() {
        let mut c = controller();
        let mut sink = RecordingSink::default();
        let Outcome::EventAdded(event) = c
            .dispatch(
                UiCommand::FormSubmitted(draft("2025-03-10", "Standup", None)),
                &mut sink,
            )
            .unwrap()
        else {
            panic!("expected EventAdded");
        };

        let outcome = c
            .dispatch(
                UiCommand::DeleteClicked {
                    date: event.date,
                    id: event.id,
                },
                &mut sink,
            )
            .unwrap();
        assert_eq!(outcome, Outcome::EventDeleted(true));
        assert!(sink.frames.last().unwrap().upcoming.is_empty());
        assert!(!c.store().has_events_on(event.date));

        let frames = sink.frames.len();
        let again = c
            .dispatch(
                UiCommand::DeleteClicked {
                    date: event.date,
                    id: event.id,
                },
                &mut sink,
            )
            .unwrap();
        assert_eq!(again, Outcome::EventDeleted(false));
        assert_eq!(sink.frames.len(), frames);
    }

    #[test]
    fn test_upcoming_excludes_past_events() {
        let mut c = controller();
        let mut sink = RecordingSink::default();
        let drafts = [
            ("2025-03-09", "Past"),
            ("2025-03-10", "Today"),
            ("2025-04-01", "Next month"),
        ];
        for (date, title) in drafts {
            c.dispatch(UiCommand::FormSubmitted(draft(date, title, None)), &mut sink)
                .unwrap();
        }

        let titles: Vec<String> = c.view().upcoming.into_iter().map(|u| u.event.title).collect();
        assert_eq!(titles, vec!["Today", "Next month"]);
    }
}
