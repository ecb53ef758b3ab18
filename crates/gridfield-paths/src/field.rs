use std::collections::HashMap;

use gridfield_core::Point;

/// Sentinel potential meaning "unreached or blocked".
///
/// Relaxation never turns it finite: an edge out of an unreached cell stays
/// unreached.
pub const UNREACHABLE: f64 = f64::INFINITY;

/// A repulsion source: discourages approaching a cell without forbidding it.
///
/// An edge `u -> v` is amplified when both ends lie within `radius`
/// (Manhattan) of the source and `v` is strictly closer to it than `u`.
/// A non-positive radius never matches any edge.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Repulsion {
    pub radius: i32,
    /// Multiplier applied to the base cost of an approaching edge.
    pub force: f64,
}

impl Default for Repulsion {
    fn default() -> Self {
        Self {
            radius: 3,
            force: 1.2,
        }
    }
}

impl Repulsion {
    pub fn new(radius: i32, force: f64) -> Self {
        Self { radius, force }
    }

    /// Whether the step `from -> to` approaches `center` inside the radius.
    #[inline]
    pub(crate) fn applies(&self, center: Point, from: Point, to: Point) -> bool {
        if self.radius <= 0 {
            return false;
        }
        let df = from.distance(center);
        let dt = to.distance(center);
        df <= self.radius && dt <= self.radius && dt < df
    }
}

// ---------------------------------------------------------------------------
// Internal priority-queue entry
// ---------------------------------------------------------------------------

/// Open-list entry ordered by potential for use in `BinaryHeap`.
#[derive(Clone, Copy, Debug)]
pub(crate) struct NodeRef {
    pub(crate) pos: Point,
    pub(crate) f: f64,
}

impl Ord for NodeRef {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        // Reverse so BinaryHeap (max-heap) pops smallest f first.
        other.f.total_cmp(&self.f).then_with(|| other.pos.cmp(&self.pos))
    }
}

impl PartialOrd for NodeRef {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other).is_eq()
    }
}

impl Eq for NodeRef {}

// ---------------------------------------------------------------------------
// PotentialField
// ---------------------------------------------------------------------------

/// A scalar potential over a set of cells, solved from attraction and
/// repulsion sources.
///
/// The field is mutated only by [`calculate`](Self::calculate) and
/// [`clear`](Self::clear); every other method reads the last solve.
#[derive(Debug, Clone, Default)]
pub struct PotentialField {
    pub(crate) follow: HashMap<Point, f64>,
    pub(crate) attraction: HashMap<Point, f64>,
    // Kept in registration order: repulsions compose in that order.
    pub(crate) repulsion: Vec<(Point, Repulsion)>,
    pub(crate) max: f64,
    // shared scratch buffer for neighbor queries
    pub(crate) nbuf: Vec<Point>,
}

impl PotentialField {
    pub fn new() -> Self {
        Self {
            nbuf: Vec::with_capacity(8),
            ..Self::default()
        }
    }

    /// Register an attraction source, replacing any previous one at `pos`.
    ///
    /// The force becomes the seed potential of `pos`, so smaller (or
    /// negative) forces attract more strongly.
    pub fn add_attraction_point(&mut self, pos: Point, force: f64) {
        self.attraction.insert(pos, force);
    }

    /// Register a repulsion source, replacing any previous one at `pos`.
    ///
    /// A replaced source keeps its place in the composition order.
    pub fn add_repulsion_point(&mut self, pos: Point, repulsion: Repulsion) {
        match self.repulsion.iter_mut().find(|(c, _)| *c == pos) {
            Some(entry) => entry.1 = repulsion,
            None => self.repulsion.push((pos, repulsion)),
        }
    }

    /// Drop the solved field and every registered source.
    pub fn clear(&mut self) {
        self.follow.clear();
        self.attraction.clear();
        self.repulsion.clear();
        self.max = 0.0;
    }

    /// Potential at `p` from the last solve.
    ///
    /// Returns `None` if `p` is outside the solved domain and
    /// `Some(UNREACHABLE)` if it is inside but was never reached.
    #[inline]
    pub fn at(&self, p: Point) -> Option<f64> {
        self.follow.get(&p).copied()
    }

    /// Whether `p` belongs to the solved domain.
    #[inline]
    pub fn contains(&self, p: Point) -> bool {
        self.follow.contains_key(&p)
    }

    /// Greatest finite potential that relaxation settled in the last solve
    /// (0 when no cell was reached by relaxation).
    #[inline]
    pub fn max(&self) -> f64 {
        self.max
    }

    /// Number of cells in the solved domain.
    #[inline]
    pub fn len(&self) -> usize {
        self.follow.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.follow.is_empty()
    }

    /// Iterate over every `(cell, potential)` pair of the solved domain, in
    /// no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.follow.iter().map(|(&p, &v)| (p, v))
    }

    pub fn attraction_points(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.attraction.iter().map(|(&p, &f)| (p, f))
    }

    /// Registered repulsion sources in composition order.
    pub fn repulsion_points(&self) -> &[(Point, Repulsion)] {
        &self.repulsion
    }
}


#[cfg(all(test, feature = "serde"))]
mod serde_tests {
    use super::*;

    #[test]
    fn repulsion_round_trip() {
        let r = Repulsion::new(4, 1.5);
        let json = serde_json::to_string(&r).unwrap();
        let back: Repulsion = serde_json::from_str(&json).unwrap();
        assert_eq!(r, back);
    }
}
