pub mod compare;
pub mod error;
pub mod fold;
pub mod plan;
pub mod profile;
pub mod report;
pub mod score;
pub mod table;
pub mod tag;

pub use error::{Error, SchemaViolation};
