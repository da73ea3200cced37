pub mod event;
pub mod normalize;
pub mod rollup;

pub use event::{EventType, RawEventRecord};
pub use rollup::{RollupPlan, RollupResult, aggregate};
