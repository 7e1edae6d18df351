use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub type EventId = u64;

/// A single calendar entry.
///
/// `time` and `description` are stored as empty strings when absent, which
/// keeps the saved JSON in the same shape the widget has always written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    pub id: EventId,
    pub date: NaiveDate,
    pub title: String,
    #[serde(default, with = "blank_as_none")]
    pub time: Option<String>,
    #[serde(default, with = "blank_as_none")]
    pub description: Option<String>,
}

impl Event {
    /// Sort key for ordering within a day. Untimed events sort first.
    pub fn sort_time(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }

    pub fn time_display(&self) -> String {
        match self.time {
            Some(ref t) => t.clone(),
            None => "All day".to_string(),
        }
    }
}

/// An event paired with the date key it is filed under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpcomingEvent {
    pub date: NaiveDate,
    pub event: Event,
}

mod blank_as_none {
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S>(value: &Option<String>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(value.as_deref().unwrap_or(""))
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = Option::<String>::deserialize(deserializer)?;
        Ok(raw.filter(|s| !s.is_empty()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_fields_deserialize_as_none() {
        let json = r#"{"id": 1741600000000, "date": "2025-03-10", "title": "Standup",
                       "time": "", "description": ""}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, 1741600000000);
        assert_eq!(event.time, None);
        assert_eq!(event.description, None);
        assert_eq!(event.sort_time(), "");
        assert_eq!(event.time_display(), "All day");
    }

    #[test]
    fn test_missing_optional_fields_are_accepted() {
        let json = r#"{"id":7,"date":"2025-03-10","title":"Lunch","time":"12:30"}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.time.as_deref(), Some("12:30"));
        assert_eq!(event.description, None);
    }

    #[test]
    fn test_none_serializes_as_empty_string() {
        let event = Event {
            id: 3,
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            title: "Review".to_string(),
            time: None,
            description: Some("Q1 numbers".to_string()),
        };
        let value = serde_json::to_value(&event).unwrap();
        assert_eq!(value["date"], "2025-03-10");
        assert_eq!(value["time"], "");
        assert_eq!(value["description"], "Q1 numbers");
    }
}
