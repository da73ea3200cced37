pub mod core;
pub mod dashboard;
pub mod errors;
pub mod panels;
pub mod source;
pub mod types;

pub use errors::*;
