pub use super::factories::{PlanFactory, RecordFactory};

pub struct Factory;

impl Factory {
    pub fn record() -> RecordFactory {
        RecordFactory::new()
    }

    pub fn plan() -> PlanFactory {
        PlanFactory::new()
    }
}
