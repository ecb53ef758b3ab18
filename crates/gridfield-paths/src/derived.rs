//! Flee and range fields derived from a solved field.

use std::collections::HashMap;

use gridfield_core::Point;
use rand::Rng;

use crate::PotentialField;
use crate::field::UNREACHABLE;
use crate::traits::WeightedPather;

/// Default seed multiplier for derived fields. Negative so that the cells
/// farthest from the parent's sources become the most attractive.
pub const DEFAULT_DERIVED_FORCE: f64 = -1.2;

/// Default band start for [`PotentialField::make_range_map`].
pub const DEFAULT_RANGE: f64 = 3.0;

/// Default fraction of the parent's maximum for
/// [`PotentialField::make_flee_map`].
pub const DEFAULT_FLEE_CUT: f64 = 0.9;

const RANGE_JITTER: f64 = 0.001;
const FLEE_JITTER: f64 = 0.01;

impl PotentialField {
    /// Build a field that pulls agents into the band `range <= v < range + 1`
    /// of this field's potentials.
    ///
    /// Cells in the band are seeded with `force * v` plus a tiny random
    /// jitter that breaks ties between equal potentials; every other cell is
    /// seeded [`UNREACHABLE`]. The result is solved independently and shares
    /// nothing with `self`.
    pub fn make_range_map<P, R>(&self, pather: &P, rng: &mut R, force: f64, range: f64) -> Self
    where
        P: WeightedPather,
        R: Rng,
    {
        let seeds = self.derived_seeds(rng, force, RANGE_JITTER, |v| v >= range && v < range + 1.0);
        Self::from_seeds(pather, seeds)
    }

    /// Build a field that pushes agents away from this field's sources.
    ///
    /// Cells whose potential is at least `max * cut` are seeded with
    /// `force * v` plus a small random jitter; every other cell is seeded
    /// [`UNREACHABLE`].
    pub fn make_flee_map<P, R>(&self, pather: &P, rng: &mut R, force: f64, cut: f64) -> Self
    where
        P: WeightedPather,
        R: Rng,
    {
        let threshold = self.max * cut;
        let seeds = self.derived_seeds(rng, force, FLEE_JITTER, |v| v >= threshold);
        Self::from_seeds(pather, seeds)
    }

    /// Seed potentials for a derived field.
    ///
    /// Cells are visited in row-major order so a seeded `rng` gives the same
    /// jitter to the same cell on every run.
    pub(crate) fn derived_seeds<R: Rng>(
        &self,
        rng: &mut R,
        force: f64,
        jitter: f64,
        keep: impl Fn(f64) -> bool,
    ) -> HashMap<Point, f64> {
        let mut cells: Vec<(Point, f64)> = self.iter().collect();
        cells.sort_unstable_by_key(|&(p, _)| p);

        let mut seeds = HashMap::with_capacity(cells.len());
        for (p, v) in cells {
            let seed = if v.is_finite() && keep(v) {
                force * v + jitter * rng.random::<f64>()
            } else {
                UNREACHABLE
            };
            seeds.insert(p, seed);
        }
        seeds
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testgrid::TestGrid;
    use crate::Repulsion;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    fn corner_field(grid: &TestGrid) -> PotentialField {
        let mut field = PotentialField::new();
        field.add_attraction_point(Point::new(0, 0), 0.0);
        field.calculate(grid, grid.cells());
        field
    }

    #[test]
    fn flee_seeds_respect_threshold() {
        let grid = TestGrid::open(5, 5);
        let parent = corner_field(&grid);
        assert_eq!(parent.max(), 8.0);
        let mut rng = StdRng::seed_from_u64(7);
        let seeds = parent.derived_seeds(&mut rng, -1.2, FLEE_JITTER, |v| v >= parent.max() * 0.5);
        assert_eq!(seeds.len(), parent.len());
        for (p, seed) in &seeds {
            let v = parent.at(*p).unwrap();
            if v >= 4.0 {
                assert!(seed.is_finite(), "{p} should be seeded");
                let base = -1.2 * v;
                assert!(*seed >= base && *seed < base + FLEE_JITTER, "{p}: {seed}");
            } else {
                assert_eq!(*seed, UNREACHABLE, "{p} is below the cut");
            }
        }
    }

    #[test]
    fn flee_map_points_away_from_goal() {
        let grid = TestGrid::open(5, 5);
        let parent = corner_field(&grid);
        let mut rng = StdRng::seed_from_u64(1);
        let flee = parent.make_flee_map(&grid, &mut rng, DEFAULT_DERIVED_FORCE, DEFAULT_FLEE_CUT);
        assert_eq!(flee.len(), parent.len());
        // Only the far corner (8 >= 7.2) is seeded.
        let far = Point::new(4, 4);
        let fv = flee.at(far).unwrap();
        assert!(fv >= -9.6 && fv < -9.6 + FLEE_JITTER);
        // Stepping from next to the goal, the flee field moves away from it.
        let start = Point::new(1, 0);
        let next = flee.chase(&grid, start).unwrap();
        assert!(parent.at(next).unwrap() > parent.at(start).unwrap());
        // Derived fields carry no sources of their own.
        assert_eq!(flee.attraction_points().count(), 0);
        assert!(flee.repulsion_points().is_empty());
    }

    #[test]
    fn range_seeds_cover_only_the_band() {
        let grid = TestGrid::open(7, 7);
        let mut parent = PotentialField::new();
        parent.add_attraction_point(Point::new(3, 3), 0.0);
        parent.calculate(&grid, grid.cells());

        let mut rng = StdRng::seed_from_u64(3);
        let seeds = parent.derived_seeds(&mut rng, -1.2, RANGE_JITTER, |v| v >= 2.0 && v < 3.0);
        let seeded: Vec<Point> = seeds
            .iter()
            .filter(|(_, s)| s.is_finite())
            .map(|(&p, _)| p)
            .collect();
        // The diamond ring at distance 2 has 8 cells.
        assert_eq!(seeded.len(), 8);
        assert!(seeded.iter().all(|&p| p.distance(Point::new(3, 3)) == 2));
    }

    #[test]
    fn range_map_keeps_agents_at_distance() {
        let grid = TestGrid::open(9, 9);
        let mut parent = PotentialField::new();
        parent.add_attraction_point(Point::new(4, 4), 0.0);
        parent.calculate(&grid, grid.cells());

        let mut rng = StdRng::seed_from_u64(11);
        let ranged = parent.make_range_map(&grid, &mut rng, DEFAULT_DERIVED_FORCE, DEFAULT_RANGE);
        // Standing right next to the goal, the range field backs off.
        let start = Point::new(4, 3);
        let path = ranged.descend(&grid, start);
        let end = *path.last().unwrap();
        assert_eq!(parent.at(end), Some(3.0));
        // Approaching from afar, it stops at the band too.
        let path = ranged.descend(&grid, Point::new(0, 0));
        assert_eq!(parent.at(*path.last().unwrap()), Some(3.0));
    }

    #[test]
    fn empty_band_gives_unreached_field() {
        let grid = TestGrid::open(3, 3);
        let parent = corner_field(&grid);
        let mut rng = StdRng::seed_from_u64(0);
        let ranged = parent.make_range_map(&grid, &mut rng, -1.2, 50.0);
        assert_eq!(ranged.len(), 9);
        assert!(ranged.iter().all(|(_, v)| v == UNREACHABLE));
    }

    #[test]
    fn unreached_parent_cells_are_never_seeded() {
        let walls: Vec<Point> = (0..3).map(|y| Point::new(1, y)).collect();
        let grid = TestGrid::with_walls(3, 3, &walls);
        let parent = corner_field(&grid);
        assert_eq!(parent.at(Point::new(2, 2)), Some(UNREACHABLE));
        let mut rng = StdRng::seed_from_u64(5);
        let flee = parent.make_flee_map(&grid, &mut rng, -1.2, 0.0);
        assert_eq!(flee.at(Point::new(2, 2)), Some(UNREACHABLE));
        assert!(flee.at(Point::new(0, 2)).unwrap().is_finite());
    }

    #[test]
    fn seeded_rng_makes_derived_fields_reproducible() {
        let grid = TestGrid::open(6, 6);
        let mut parent = corner_field(&grid);
        parent.add_repulsion_point(Point::new(3, 3), Repulsion::default());
        parent.calculate(&grid, grid.cells());

        let a = parent.make_flee_map(&grid, &mut StdRng::seed_from_u64(42), -1.2, 0.5);
        let b = parent.make_flee_map(&grid, &mut StdRng::seed_from_u64(42), -1.2, 0.5);
        for (p, v) in a.iter() {
            assert_eq!(b.at(p), Some(v));
        }
    }

    #[test]
    fn derived_field_is_independent_of_parent() {
        let grid = TestGrid::open(4, 4);
        let mut parent = corner_field(&grid);
        let mut rng = StdRng::seed_from_u64(9);
        let flee = parent.make_flee_map(&grid, &mut rng, -1.2, 0.5);
        let before: Vec<(Point, f64)> = {
            let mut v: Vec<_> = flee.iter().collect();
            v.sort_unstable_by_key(|&(p, _)| p);
            v
        };
        parent.clear();
        let mut after: Vec<(Point, f64)> = flee.iter().collect();
        after.sort_unstable_by_key(|&(p, _)| p);
        assert_eq!(before, after);
    }
}
