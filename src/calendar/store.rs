use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveTime};
use tracing::{debug, info, warn};

use super::error::{PersistError, StoreError, ValidationError};
use super::event::{Event, EventId, UpcomingEvent};
use super::grid::parse_date_key;
use super::persistence::KeyValueStore;

/// Key the whole store is saved under.
pub const STORAGE_KEY: &str = "calendarEvents";

pub type EventMap = BTreeMap<NaiveDate, Vec<Event>>;

/// All events, indexed by date.
///
/// Every date key maps to a non-empty list kept in insertion order. Each
/// mutation is written through to the backend before it returns; if the write
/// fails the in-memory state is rolled back.
pub struct EventStore {
    events: EventMap,
    /// `None` once the id after `u64::MAX` would be needed.
    next_id: Option<EventId>,
    backend: Box<dyn KeyValueStore>,
}

impl EventStore {
    /// Load from `backend`. Missing or unreadable data gives an empty store.
    pub fn load(backend: Box<dyn KeyValueStore>) -> Self {
        let events = match backend.get(STORAGE_KEY) {
            Some(raw) => decode(&raw),
            None => {
                debug!("no saved events found");
                EventMap::new()
            }
        };

        let next_id = events
            .values()
            .flatten()
            .map(|e| e.id)
            .max()
            .map_or(Some(1), |id| id.checked_add(1));

        info!(
            dates = events.len(),
            events = events.values().map(Vec::len).sum::<usize>(),
            "event store loaded"
        );

        Self {
            events,
            next_id,
            backend,
        }
    }

    /// Write the whole mapping to the backend.
    pub fn persist(&mut self) -> Result<(), PersistError> {
        let json = serde_json::to_string(&self.events)?;
        self.backend.set(STORAGE_KEY, &json)
    }

    pub fn add_event(
        &mut self,
        date: &str,
        title: &str,
        time: Option<&str>,
        description: Option<&str>,
    ) -> Result<Event, StoreError> {
        let date = validate_date(date)?;
        let title = validate_title(title)?;
        let time = validate_time(time)?;
        let description = description
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_string);

        let event = Event {
            id: self.allocate_id()?,
            date,
            title,
            time,
            description,
        };

        let snapshot = self.events.clone();
        self.events.entry(date).or_default().push(event.clone());
        self.commit(snapshot)?;

        debug!(id = event.id, date = %date, "event added");
        Ok(event)
    }

    /// Remove the event `id` filed under `date`. Returns whether anything was
    /// removed; a missing event is not an error.
    pub fn delete_event(&mut self, date: NaiveDate, id: EventId) -> Result<bool, StoreError> {
        let Some(list) = self.events.get(&date) else {
            return Ok(false);
        };
        let Some(index) = list.iter().position(|e| e.id == id) else {
            return Ok(false);
        };

        let snapshot = self.events.clone();
        if let Some(list) = self.events.get_mut(&date) {
            list.remove(index);
            if list.is_empty() {
                self.events.remove(&date);
            }
        }
        self.commit(snapshot)?;

        debug!(id, date = %date, "event deleted");
        Ok(true)
    }

    pub fn has_events_on(&self, date: NaiveDate) -> bool {
        self.events.get(&date).is_some_and(|list| !list.is_empty())
    }

    pub fn events_on(&self, date: NaiveDate) -> &[Event] {
        self.events.get(&date).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn event_count(&self) -> usize {
        self.events.values().map(Vec::len).sum()
    }

    #[cfg(test)]
    pub fn events(&self) -> &EventMap {
        &self.events
    }

    /// Events on or after `reference`, ordered by date then time. Untimed
    /// events come first within a day and ties keep insertion order.
    pub fn upcoming_events(&self, reference: NaiveDate) -> Vec<UpcomingEvent> {
        let mut upcoming: Vec<UpcomingEvent> = self
            .events
            .range(reference..)
            .flat_map(|(date, list)| {
                list.iter().map(|event| UpcomingEvent {
                    date: *date,
                    event: event.clone(),
                })
            })
            .collect();

        upcoming.sort_by(|a, b| {
            a.date
                .cmp(&b.date)
                .then_with(|| a.event.sort_time().cmp(b.event.sort_time()))
        });
        upcoming
    }

    fn allocate_id(&mut self) -> Result<EventId, StoreError> {
        let id = self.next_id.ok_or(StoreError::IdsExhausted)?;
        self.next_id = id.checked_add(1);
        Ok(id)
    }

    fn commit(&mut self, snapshot: EventMap) -> Result<(), PersistError> {
        if let Err(e) = self.persist() {
            warn!(error = %e, "failed to save events, rolling back");
            self.events = snapshot;
            return Err(e);
        }
        Ok(())
    }
}

fn decode(raw: &str) -> EventMap {
    match serde_json::from_str::<EventMap>(raw) {
        Ok(mut events) => {
            events.retain(|_, list| !list.is_empty());
            for (date, list) in &mut events {
                for event in list {
                    event.date = *date;
                }
            }
            events
        }
        Err(e) => {
            warn!(error = %e, "saved events are corrupt, starting with an empty calendar");
            EventMap::new()
        }
    }
}

fn validate_date(raw: &str) -> Result<NaiveDate, ValidationError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationError::MissingDate);
    }
    parse_date_key(raw).ok_or_else(|| ValidationError::InvalidDate(raw.to_string()))
}

fn validate_title(raw: &str) -> Result<String, ValidationError> {
    let title = raw.trim();
    if title.is_empty() {
        return Err(ValidationError::MissingTitle);
    }
    Ok(title.to_string())
}

/// Normalizes to zero-padded "HH:MM" so times sort lexicographically.
fn validate_time(raw: Option<&str>) -> Result<Option<String>, ValidationError> {
    let Some(raw) = raw.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };
    NaiveTime::parse_from_str(raw, "%H:%M")
        .map(|t| Some(t.format("%H:%M").to_string()))
        .map_err(|_| ValidationError::InvalidTime(raw.to_string()))
}
