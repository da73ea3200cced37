pub mod gate;
pub mod query;
pub mod store;

pub use gate::SessionGate;
pub use query::{EventPage, EventQuery, SortField, SortOrder, TimeWindow};
pub use store::{EventStore, InMemoryEventStore};

#[cfg(test)]
mod store_test;
