use gridfield_core::Point;

/// Neighbourhood provider: enumerates the cells one step away from `p`.
///
/// This is where walls and map bounds live: a cell that is not returned is
/// not adjacent. Neighbour order is significant, [`chase`] breaks ties in
/// favour of the first neighbour returned.
///
/// [`chase`]: crate::PotentialField::chase
pub trait Pather {
    /// Append neighbors of `p` into `buf`. The caller clears `buf` before calling.
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>);
}

/// Pather with real-valued traversal costs.
pub trait WeightedPather: Pather {
    /// Base cost of moving from `from` to `to`. Must be >= 0.
    ///
    /// Repulsion sources also query this with a cell and the source centre,
    /// which need not be adjacent, and use the difference as a cost proxy
    /// for how much closer a step gets to the source.
    fn cost(&self, from: Point, to: Point) -> f64;
}

impl<P: Pather + ?Sized> Pather for &P {
    #[inline]
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        (**self).neighbors(p, buf);
    }
}

impl<P: WeightedPather + ?Sized> WeightedPather for &P {
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        (**self).cost(from, to)
    }
}

/// A [`WeightedPather`] built from a pair of closures.
///
/// ```
/// use gridfield_paths::{FnPather, Point};
///
/// let pather = FnPather::new(
///     |p: Point, buf: &mut Vec<Point>| buf.extend(p.neighbors_4()),
///     |_: Point, _: Point| 1.0,
/// );
/// # let _ = pather;
/// ```
pub struct FnPather<N, C> {
    neighbors: N,
    cost: C,
}

impl<N, C> FnPather<N, C>
where
    N: Fn(Point, &mut Vec<Point>),
    C: Fn(Point, Point) -> f64,
{
    pub fn new(neighbors: N, cost: C) -> Self {
        Self { neighbors, cost }
    }
}

impl<N, C> Pather for FnPather<N, C>
where
    N: Fn(Point, &mut Vec<Point>),
{
    #[inline]
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        (self.neighbors)(p, buf);
    }
}

impl<N, C> WeightedPather for FnPather<N, C>
where
    N: Fn(Point, &mut Vec<Point>),
    C: Fn(Point, Point) -> f64,
{
    #[inline]
    fn cost(&self, from: Point, to: Point) -> f64 {
        (self.cost)(from, to)
    }
}
