//! **gridfield-core**: geometry primitives for grid AI algorithms.
//!
//! Provides [`Point`] (a value-typed integer coordinate), [`Range`] (a
//! half-open rectangle of points) and the distance metrics used by the
//! potential-field solver and the light field.

pub mod distance;
pub mod geom;

pub use distance::{chebyshev, euclidean, manhattan};
pub use geom::{Point, Range, RangeIter};
