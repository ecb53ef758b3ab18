use std::collections::HashMap;

use gridfield_core::{Point, Range};

use crate::metric::FalloffMetric;

/// Opacity provider: reports whether a cell blocks light.
///
/// Must answer for every cell the scan may probe within `radius` of the
/// viewer. Off-map cells should report `false` unless the field is clipped
/// with [`LightField::with_bounds`].
pub trait Opacity {
    fn is_opaque(&self, p: Point) -> bool;
}

impl<F: Fn(Point) -> bool> Opacity for F {
    #[inline]
    fn is_opaque(&self, p: Point) -> bool {
        self(p)
    }
}

/// Light field around a single viewer, computed by shadow casting.
///
/// [`calculate`](Self::calculate) is cached: it rebuilds the map only when
/// the viewer moved or the field was marked dirty. Call
/// [`mark_dirty`](Self::mark_dirty) after the map's opacity changes.
#[derive(Debug, Clone)]
pub struct LightField {
    radius: i32,
    metric: FalloffMetric,
    /// Cells outside are skipped without probing opacity.
    bounds: Option<Range>,
    center: Option<Point>,
    dirty: bool,
    light: HashMap<Point, f64>,
    /// Pending scans, reused between calculations.
    rows: Vec<ScanRow>,
}

impl LightField {
    pub fn new(radius: i32, metric: FalloffMetric) -> Self {
        Self {
            radius,
            metric,
            bounds: None,
            center: None,
            dirty: true,
            light: HashMap::new(),
            rows: Vec::new(),
        }
    }

    /// Clip every scan to `bounds`.
    pub fn with_bounds(mut self, bounds: Range) -> Self {
        self.bounds = Some(bounds);
        self
    }

    #[inline]
    pub fn radius(&self) -> i32 {
        self.radius
    }

    pub fn set_radius(&mut self, radius: i32) {
        self.radius = radius;
        self.dirty = true;
    }

    #[inline]
    pub fn metric(&self) -> FalloffMetric {
        self.metric
    }

    pub fn set_metric(&mut self, metric: FalloffMetric) {
        self.metric = metric;
        self.dirty = true;
    }

    #[inline]
    pub fn bounds(&self) -> Option<Range> {
        self.bounds
    }

    pub fn set_bounds(&mut self, bounds: Option<Range>) {
        self.bounds = bounds;
        self.dirty = true;
    }

    /// Force the next [`calculate`](Self::calculate) to rebuild the map.
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    #[inline]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Viewer position of the last computation.
    #[inline]
    pub fn center(&self) -> Option<Point> {
        self.center
    }

    /// Compute the light map seen from `center`.
    ///
    /// Returns the cached map unchanged when the field is clean and `center`
    /// equals the previous one. Otherwise the map is rebuilt from scratch:
    /// the viewer's cell gets brightness 1 and every other visible cell
    /// `1 - distance / radius` under the field's metric. Cells whose
    /// brightness would be 0 or less are left out. A non-positive radius
    /// lights the viewer's cell only.
    pub fn calculate(&mut self, center: Point, opacity: &impl Opacity) -> &HashMap<Point, f64> {
        if !self.dirty && self.center == Some(center) {
            log::trace!("light field at {center}: cached, {} cells", self.light.len());
            return &self.light;
        }
        self.center = Some(center);
        self.dirty = false;
        self.light.clear();
        self.light.insert(center, 1.0);

        if self.radius > 0 {
            let mut rows = std::mem::take(&mut self.rows);
            rows.clear();
            for d in Point::diagonals() {
                rows.push(ScanRow::first(Octant::new(0, d.x, d.y, 0)));
                rows.push(ScanRow::first(Octant::new(d.x, 0, 0, d.y)));
            }
            while let Some(row) = rows.pop() {
                self.cast(center, row, opacity, &mut rows);
            }
            self.rows = rows;
        }

        log::trace!(
            "light field at {center}: radius {} ({}), {} cells lit",
            self.radius,
            self.metric,
            self.light.len()
        );
        &self.light
    }

    /// Scan one octant from `row` outwards between the slopes `start` and
    /// `end`, queueing a narrower scan behind every run of opaque cells.
    fn cast(&mut self, center: Point, row: ScanRow, opacity: &impl Opacity, pending: &mut Vec<ScanRow>) {
        let ScanRow {
            row: first,
            mut start,
            end,
            oct,
        } = row;
        if start < end {
            return;
        }

        let mut new_start = 0.0;
        let mut blocked = false;
        let mut distance = first;
        while distance <= self.radius && !blocked {
            let dy = -distance;
            for dx in -distance..=0 {
                let cur = oct.to_world(center, dx, dy);
                let left_slope = (f64::from(dx) - 0.5) / (f64::from(dy) + 0.5);
                let right_slope = (f64::from(dx) + 0.5) / (f64::from(dy) - 0.5);

                if self.bounds.is_some_and(|b| !cur.in_range(&b)) || start < right_slope {
                    continue;
                } else if end > left_slope {
                    break;
                }

                if let Some(b) = self.metric.brightness(dx, dy, self.radius) {
                    self.light.insert(cur, b);
                }

                let opaque = opacity.is_opaque(cur);
                if blocked {
                    if opaque {
                        new_start = right_slope;
                        continue;
                    }
                    blocked = false;
                    start = new_start;
                } else if opaque && distance < self.radius {
                    blocked = true;
                    pending.push(ScanRow {
                        row: distance + 1,
                        start,
                        end: left_slope,
                        oct,
                    });
                    new_start = right_slope;
                }
            }
            distance += 1;
        }
    }

    /// Brightness at `p` from the last computation.
    #[inline]
    pub fn light_at(&self, p: Point) -> Option<f64> {
        self.light.get(&p).copied()
    }

    #[inline]
    pub fn is_lit(&self, p: Point) -> bool {
        self.light.contains_key(&p)
    }

    /// The whole light map from the last computation.
    #[inline]
    pub fn light_map(&self) -> &HashMap<Point, f64> {
        &self.light
    }

    /// Iterate over every lit `(cell, brightness)` pair, in no particular
    /// order.
    pub fn iter_lit(&self) -> impl Iterator<Item = (Point, f64)> + '_ {
        self.light.iter().map(|(&p, &b)| (p, b))
    }

    /// Number of lit cells.
    #[inline]
    pub fn len(&self) -> usize {
        self.light.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.light.is_empty()
    }
}

// ── Shadow-casting helper types ───────────────────────────────────

/// Basis mapping an octant-local `(col, row)` offset to a world offset.
#[derive(Debug, Clone, Copy)]
struct Octant {
    xx: i32,
    xy: i32,
    yx: i32,
    yy: i32,
}

impl Octant {
    const fn new(xx: i32, xy: i32, yx: i32, yy: i32) -> Self {
        Self { xx, xy, yx, yy }
    }

    #[inline]
    fn to_world(self, center: Point, dx: i32, dy: i32) -> Point {
        Point::new(
            center.x + dx * self.xx + dy * self.xy,
            center.y + dx * self.yx + dy * self.yy,
        )
    }
}

/// A pending scan: one octant from `row` outwards within `[end, start]`.
#[derive(Debug, Clone, Copy)]
struct ScanRow {
    row: i32,
    start: f64,
    end: f64,
    oct: Octant,
}

impl ScanRow {
    fn first(oct: Octant) -> Self {
        Self {
            row: 1,
            start: 1.0,
            end: 0.0,
            oct,
        }
    }
}
