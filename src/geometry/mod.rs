pub mod contour_curve;

pub use contour_curve::ContourCurve;
