use gridfield_core::Point;

use crate::PotentialField;
use crate::traits::Pather;

impl PotentialField {
    /// Neighbour of `p` with the smallest potential.
    ///
    /// Only neighbours inside the solved domain are considered; ties go to
    /// the first one `pather` returns. Returns `None` if `p` is outside the
    /// domain or has no in-domain neighbour.
    pub fn chase<P: Pather>(&self, pather: &P, p: Point) -> Option<Point> {
        if !self.contains(p) {
            return None;
        }
        let mut nbuf = Vec::with_capacity(8);
        pather.neighbors(p, &mut nbuf);

        let mut best: Option<(Point, f64)> = None;
        for np in nbuf {
            let Some(v) = self.at(np) else {
                continue;
            };
            match best {
                Some((_, bv)) if !(v < bv) => {}
                _ => best = Some((np, v)),
            }
        }
        best.map(|(np, _)| np)
    }

    /// Follow [`chase`](Self::chase) downhill from `from` until no neighbour
    /// is strictly lower.
    ///
    /// The returned path starts with `from` and ends at a local minimum. It
    /// is empty if `from` is outside the domain, and never longer than the
    /// domain.
    pub fn descend<P: Pather>(&self, pather: &P, from: Point) -> Vec<Point> {
        let Some(mut cur_v) = self.at(from) else {
            return Vec::new();
        };
        let mut path = vec![from];
        let mut cur = from;
        while path.len() < self.len() {
            let Some(next) = self.chase(pather, cur) else {
                break;
            };
            let next_v = self.follow[&next];
            if !(next_v < cur_v) {
                break;
            }
            path.push(next);
            cur = next;
            cur_v = next_v;
        }
        path
    }
}
