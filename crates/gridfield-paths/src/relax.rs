use std::collections::{BinaryHeap, HashSet};

use gridfield_core::Point;

use crate::PotentialField;
use crate::field::{NodeRef, UNREACHABLE};
use crate::traits::WeightedPather;

impl PotentialField {
    /// Solve the field over `cells`.
    ///
    /// Every cell starts at [`UNREACHABLE`]; cells that are also attraction
    /// sources start at their force. Attraction sources outside `cells` are
    /// ignored, and neighbours outside `cells` are treated as impassable.
    /// An empty cell set yields an empty field.
    pub fn calculate<P: WeightedPather>(
        &mut self,
        pather: &P,
        cells: impl IntoIterator<Item = Point>,
    ) {
        self.follow.clear();
        for c in cells {
            self.follow.insert(c, UNREACHABLE);
        }
        for (&pos, &force) in &self.attraction {
            if let Some(v) = self.follow.get_mut(&pos) {
                *v = force;
            }
        }
        self.relax(pather);
    }

    /// Build and solve a field from explicit seed potentials.
    ///
    /// The domain is exactly the seeded cells. The new field has no
    /// registered sources.
    pub fn from_seeds<P: WeightedPather>(
        pather: &P,
        seeds: impl IntoIterator<Item = (Point, f64)>,
    ) -> Self {
        let mut field = Self::new();
        field.follow.extend(seeds);
        field.relax(pather);
        field
    }

    /// Cost of the edge `from -> to` after applying every repulsion source
    /// in registration order.
    pub fn edge_cost<P: WeightedPather>(&self, pather: &P, from: Point, to: Point) -> f64 {
        let mut cost = pather.cost(from, to);
        for &(center, rep) in &self.repulsion {
            if rep.applies(center, from, to) {
                cost = cost * rep.force + (pather.cost(from, center) - pather.cost(to, center));
            }
        }
        cost
    }

    /// Multi-source relaxation of the current seeds.
    ///
    /// Entries are pushed again whenever a potential drops and stale ones are
    /// skipped on pop, so the result is an exact shortest-path field for
    /// non-negative edge costs. `max` is raised when a relaxed cell settles,
    /// so it only ever holds final potentials.
    pub(crate) fn relax<P: WeightedPather>(&mut self, pather: &P) {
        self.max = 0.0;

        let mut open: BinaryHeap<NodeRef> = self
            .follow
            .iter()
            .filter(|(_, v)| v.is_finite())
            .map(|(&pos, &f)| NodeRef { pos, f })
            .collect();
        let mut settled: HashSet<Point> = HashSet::with_capacity(self.follow.len());
        let mut relaxed: HashSet<Point> = HashSet::new();
        let mut nbuf = std::mem::take(&mut self.nbuf);

        while let Some(current) = open.pop() {
            let Some(&g) = self.follow.get(&current.pos) else {
                continue;
            };
            // Skip stale entries.
            if current.f > g || !settled.insert(current.pos) {
                continue;
            }
            if g.is_finite() && g > self.max && relaxed.contains(&current.pos) {
                self.max = g;
            }

            nbuf.clear();
            pather.neighbors(current.pos, &mut nbuf);

            for &np in nbuf.iter() {
                let Some(&old) = self.follow.get(&np) else {
                    continue;
                };
                let tentative = g + self.edge_cost(pather, current.pos, np);
                if !(tentative < old) {
                    continue;
                }
                self.follow.insert(np, tentative);
                relaxed.insert(np);
                open.push(NodeRef {
                    pos: np,
                    f: tentative,
                });
            }
        }

        self.nbuf = nbuf;
        log::debug!(
            "potential field solved: {} cells, {} settled, max {}",
            self.follow.len(),
            settled.len(),
            self.max
        );
    }
}
