pub mod event_type;
pub mod record;

pub use event_type::EventType;
pub use record::RawEventRecord;
