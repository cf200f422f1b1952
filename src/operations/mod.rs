pub mod contour;
pub mod creation;
pub mod modification;
pub mod query;
