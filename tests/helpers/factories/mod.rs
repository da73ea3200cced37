pub mod plan_factory;
pub mod record_factory;

pub use plan_factory::PlanFactory;
pub use record_factory::RecordFactory;

#[cfg(test)]
mod plan_factory_test;
#[cfg(test)]
mod record_factory_test;
