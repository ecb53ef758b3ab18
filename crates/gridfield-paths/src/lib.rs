//! Potential fields ("Dijkstra maps") for grid-based game AI.
//!
//! A [`PotentialField`] assigns every cell of a caller-chosen domain the
//! accumulated traversal cost from a set of attraction sources. Agents move
//! downhill with [`PotentialField::chase`] to approach those sources.
//!
//! - **Attraction** sources seed the field with their force.
//! - **Repulsion** sources seed nothing; they amplify the cost of edges that
//!   step closer to them inside their radius.
//! - **Flee** and **range** fields are derived from a solved field
//!   ([`PotentialField::make_flee_map`], [`PotentialField::make_range_map`])
//!   and drive away-from-goal and stay-at-distance behaviours.
//!
//! Grid topology and costs are supplied through the [`Pather`] and
//! [`WeightedPather`] traits on every call; the field never owns them.
//!
//! # Trait hierarchy
//!
//! | Trait | Required for |
//! |---|---|
//! | [`Pather`] | [`PotentialField::chase`], [`PotentialField::descend`] |
//! | [`WeightedPather`] : [`Pather`] | solving and deriving fields |

mod chase;
mod derived;
mod field;
mod relax;
mod traits;

#[cfg(test)]
mod testgrid;

pub use derived::{DEFAULT_DERIVED_FORCE, DEFAULT_FLEE_CUT, DEFAULT_RANGE};
pub use field::{PotentialField, Repulsion, UNREACHABLE};
pub use gridfield_core::Point;
pub use traits::{FnPather, Pather, WeightedPather};
