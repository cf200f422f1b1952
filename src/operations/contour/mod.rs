//! Iso-contour extraction on weighted meshes.
//!
//! The pipeline runs leaves first:
//!
//! 1. [`ExtractCrossings`] places a vertex on every edge whose contour weight
//!    straddles the iso-value.
//! 2. [`BuildSegments`] links the two crossings of each crossed face.
//! 3. [`find_curves`] walks the segment graph into polylines and
//!    [`select_widest`] keeps the main one.
//!
//! [`ExtractContour`] runs all of it over a set of [`IsoLevels`].

mod crossing;
mod curve;
mod extract;
mod levels;
mod segment;

pub use crossing::{CrossingSet, DisplaceParams, EdgeCrossing, Extraction, ExtractCrossings};
pub use curve::{find_curves, select_widest, Curve, Curves};
pub use extract::{ContourParams, ExtractContour};
pub use levels::IsoLevels;
pub use segment::{BuildSegments, ContourLayers, Segment};
