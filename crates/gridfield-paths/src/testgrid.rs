//! Small rectangular test maps shared by the unit tests.

use std::collections::{HashMap, VecDeque};

use gridfield_core::{Point, Range};

use crate::{Pather, WeightedPather};

/// 4-connected grid with walls and unit move cost.
pub(crate) struct TestGrid {
    pub(crate) range: Range,
    pub(crate) walls: Vec<Point>,
}

impl TestGrid {
    pub(crate) fn open(w: i32, h: i32) -> Self {
        Self {
            range: Range::new(0, 0, w, h),
            walls: Vec::new(),
        }
    }

    pub(crate) fn with_walls(w: i32, h: i32, walls: &[Point]) -> Self {
        Self {
            range: Range::new(0, 0, w, h),
            walls: walls.to_vec(),
        }
    }

    pub(crate) fn passable(&self, p: Point) -> bool {
        self.range.contains(p) && !self.walls.contains(&p)
    }

    /// Every passable cell, row-major.
    pub(crate) fn cells(&self) -> Vec<Point> {
        self.range.iter().filter(|&p| self.passable(p)).collect()
    }

    /// Brute-force BFS distances from the nearest source.
    pub(crate) fn bfs(&self, sources: &[Point]) -> HashMap<Point, i32> {
        let mut dist = HashMap::new();
        let mut queue = VecDeque::new();
        for &s in sources {
            if self.passable(s) && !dist.contains_key(&s) {
                dist.insert(s, 0);
                queue.push_back(s);
            }
        }
        while let Some(p) = queue.pop_front() {
            let d = dist[&p];
            for n in p.neighbors_4() {
                if self.passable(n) && !dist.contains_key(&n) {
                    dist.insert(n, d + 1);
                    queue.push_back(n);
                }
            }
        }
        dist
    }
}

impl Pather for TestGrid {
    fn neighbors(&self, p: Point, buf: &mut Vec<Point>) {
        for n in p.neighbors_4() {
            if self.passable(n) {
                buf.push(n);
            }
        }
    }
}

impl WeightedPather for TestGrid {
    fn cost(&self, _from: Point, _to: Point) -> f64 {
        1.0
    }
}
