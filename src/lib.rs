pub mod error;
pub mod field;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod topology;

pub use error::{ContourError, Result};
