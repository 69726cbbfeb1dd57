use serde::{Deserialize, Serialize};

/// Left edge of the playfield in world units.
pub const X_MIN: f64 = 0.0;
/// Right edge of the playfield; x wraps back to `X_MIN` past it.
pub const X_MAX: f64 = 1000.0;
/// Bottom of the playfield (y grows upward).
pub const Y_MIN: f64 = 0.0;
/// Top of the playfield.
pub const Y_MAX: f64 = 500.0;

/// A ground segment between two terrain breakpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
}

/// The cup: an x interval on the terrain surface.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Hole {
    pub x1: f64,
    pub x2: f64,
}

impl Hole {
    /// Whether `x` lies strictly inside the cup.
    pub fn contains(&self, x: f64) -> bool {
        self.x1 < x && x < self.x2
    }
}

/// A level's terrain: elevation breakpoints over a looping x domain.
///
/// `domain` is strictly increasing and starts at `X_MIN`. When the last
/// breakpoint sits short of `X_MAX`, an implicit closing segment joins it to
/// the first breakpoint's elevation at `X_MAX`, so the surface loops.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Level {
    pub domain: Vec<f64>,
    pub elevation: Vec<f64>,
    pub hole: Hole,
}

impl Level {
    /// Flat terrain across the whole playfield, with the cup at a fixed spot.
    pub fn flat(elevation: f64) -> Self {
        Self {
            domain: vec![X_MIN, X_MAX],
            elevation: vec![elevation, elevation],
            hole: Hole {
                x1: 850.0,
                x2: 880.0,
            },
        }
    }

    /// The terrain surface as ordered segments, closing wrap segment included
    /// unless the last breakpoint already sits on the right edge.
    pub fn ground_lines(&self) -> Vec<Segment> {
        let mut lines = Vec::with_capacity(self.domain.len());
        for i in 1..self.domain.len() {
            lines.push(Segment {
                x1: self.domain[i - 1],
                y1: self.elevation[i - 1],
                x2: self.domain[i],
                y2: self.elevation[i],
            });
        }
        if let (Some(&last_x), Some(&last_y)) = (self.domain.last(), self.elevation.last())
            && last_x < X_MAX
        {
            lines.push(Segment {
                x1: last_x,
                y1: last_y,
                x2: X_MAX,
                y2: self.elevation[0],
            });
        }
        lines
    }

    /// Terrain height at `x`, linearly interpolated over the bracketing
    /// segment. 0.0 when no segment brackets `x`.
    pub fn elevation_at(&self, x: f64) -> f64 {
        for seg in self.ground_lines() {
            if seg.x1 <= x && x <= seg.x2 {
                return seg.y1 + (seg.y2 - seg.y1) * (x - seg.x1) / (seg.x2 - seg.x1);
            }
        }
        0.0
    }

    /// Ground segments overlapping the x window `[left, right]`.
    ///
    /// The x axis is circular, so a window hanging past either playfield edge
    /// also picks up segments at the opposite edge. Matched segments keep
    /// their stored coordinates.
    pub fn relevant_land(&self, left: f64, right: f64) -> Vec<Segment> {
        let extent = X_MAX - X_MIN;
        self.ground_lines()
            .into_iter()
            .filter(|seg| {
                overlaps(seg, left, right)
                    || overlaps(seg, left - extent, right - extent)
                    || overlaps(seg, left + extent, right + extent)
            })
            .collect()
    }
}

fn overlaps(seg: &Segment, left: f64, right: f64) -> bool {
    seg.x1 <= right && left <= seg.x2
}
