use std::fmt;
use std::str::FromStr;

/// Distance metric that shapes how light fades from the viewer.
///
/// Brightness at offset `(dx, dy)` is `1 - distance / radius`, so the metric
/// also decides the outline of the lit area.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum FalloffMetric {
    /// Euclidean distance.
    Circle,
    /// Chebyshev distance.
    Square,
    /// Manhattan distance. This is the default.
    #[default]
    Diamond,
}

impl FalloffMetric {
    /// Distance of the offset `(dx, dy)` from the viewer.
    #[inline]
    pub fn distance(self, dx: i32, dy: i32) -> f64 {
        let (ax, ay) = (f64::from(dx.abs()), f64::from(dy.abs()));
        match self {
            Self::Circle => ax.hypot(ay),
            Self::Square => ax.max(ay),
            Self::Diamond => ax + ay,
        }
    }

    /// Brightness at offset `(dx, dy)` for a light of the given radius.
    ///
    /// Returns `None` outside the radius and wherever the brightness is not
    /// strictly positive.
    #[inline]
    pub fn brightness(self, dx: i32, dy: i32, radius: i32) -> Option<f64> {
        if radius <= 0 {
            return None;
        }
        let d = self.distance(dx, dy);
        let r = f64::from(radius);
        if d > r {
            return None;
        }
        let b = 1.0 - d / r;
        (b > 0.0).then_some(b)
    }

    fn name(self) -> &'static str {
        match self {
            Self::Circle => "circle",
            Self::Square => "square",
            Self::Diamond => "diamond",
        }
    }
}

impl fmt::Display for FalloffMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for FalloffMetric {
    type Err = ParseMetricError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "circle" => Ok(Self::Circle),
            "square" => Ok(Self::Square),
            "diamond" => Ok(Self::Diamond),
            _ => Err(ParseMetricError(s.to_string())),
        }
    }
}

/// Error returned when a string names no known [`FalloffMetric`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseMetricError(pub String);

impl fmt::Display for ParseMetricError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "unknown falloff metric \u{201c}{}\u{201d} (expected circle, square or diamond)",
            self.0
        )
    }
}

impl std::error::Error for ParseMetricError {}
