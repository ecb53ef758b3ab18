//! Field of vision with distance falloff.
//!
//! [`LightField`] runs recursive shadow casting over the eight octants
//! around a viewer and records a brightness in `(0, 1]` for every visible
//! cell, fading with distance under a selectable [`FalloffMetric`]. Walls
//! are reported by an [`Opacity`] provider; any `Fn(Point) -> bool` works.

mod light;
mod metric;

pub use gridfield_core::{Point, Range};
pub use light::{LightField, Opacity};
pub use metric::{FalloffMetric, ParseMetricError};
