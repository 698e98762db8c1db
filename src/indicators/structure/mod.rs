pub mod pivots;

pub use pivots::{pivot_points, PivotPoints};
