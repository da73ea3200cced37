pub mod normalizer;
pub mod schema;

pub use normalizer::{NormalizedFields, NormalizedRecord, normalize, normalize_by_type};
pub use schema::{FieldSpec, RecordSchema};
