//! Math utilities

pub mod ray;
pub mod spline;

pub use ray::Ray;
pub use spline::ClosedSpline;
