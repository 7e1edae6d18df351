pub mod clock;
pub mod error;
pub mod event;
pub mod grid;
pub mod persistence;
pub mod store;

pub use clock::{Clock, SystemClock};
pub use error::{StoreError, ValidationError};
pub use event::{Event, EventId, UpcomingEvent};
pub use grid::{DayCell, ViewMonth};
pub use persistence::{FileStore, KeyValueStore, MemoryStore};
pub use store::EventStore;
