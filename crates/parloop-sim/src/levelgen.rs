use rand::Rng;

use crate::physics::BALL_RADIUS;
use crate::terrain::{Hole, Level, X_MAX, X_MIN, Y_MAX, Y_MIN};

/// Number of terrain breakpoints laid down before the cup is cut in.
const PROFILE_POINTS: usize = 12;
/// Fraction of the playfield width covered by explicit breakpoints; the
/// remainder is the closing wrap segment.
const PROFILE_SPAN: f64 = 0.93;
/// Most the elevation walk's slope can reach per breakpoint, pre-rescale.
const MAX_WALK_STEP: f64 = 60.0;
/// Cup half-width at the lip.
const CUP_HALF_WIDTH: f64 = 1.5 * BALL_RADIUS;
/// Cup depth below the lip.
const CUP_DEPTH: f64 = 2.5 * BALL_RADIUS;

/// Generate a fresh level with the thread RNG.
pub fn generate_level() -> Level {
    generate_level_with(&mut rand::rng())
}

/// Generate a level from the given RNG (seedable for tests).
///
/// Rolling hills from a momentum random walk, rescaled into the lower half
/// of the playfield so there is always clear sky above the peaks, then a cup
/// notch spliced into the back half.
pub fn generate_level_with<R: Rng + ?Sized>(rng: &mut R) -> Level {
    // Breakpoint spacing: random gaps normalized onto the profile span
    let gaps: Vec<f64> = (1..PROFILE_POINTS)
        .map(|_| rng.random_range(0.5..1.5))
        .collect();
    let total: f64 = gaps.iter().sum();
    let span = (X_MAX - X_MIN) * PROFILE_SPAN;
    let mut domain = Vec::with_capacity(PROFILE_POINTS);
    domain.push(X_MIN);
    let mut x = X_MIN;
    for gap in &gaps {
        x += gap / total * span;
        domain.push(x);
    }

    // Momentum random walk across the upper band, rescaled down below
    let mut elevation = Vec::with_capacity(PROFILE_POINTS);
    let mut height = rng.random_range(Y_MAX / 2.0..Y_MAX);
    let mut slope = 0.0;
    for _ in 0..PROFILE_POINTS {
        elevation.push(height);
        slope = (slope + rng.random_range(-MAX_WALK_STEP / 2.0..MAX_WALK_STEP / 2.0))
            .clamp(-MAX_WALK_STEP, MAX_WALK_STEP);
        height = (height + slope).clamp(Y_MAX / 2.0, Y_MAX);
    }

    // Rescale: peaks stay two ball widths under the halfway line, valleys
    // keep enough ground below them for the cup to cut into
    let floor = Y_MIN + 3.0 * BALL_RADIUS;
    let ceiling = Y_MAX / 2.0 - 2.0 * BALL_RADIUS;
    for e in &mut elevation {
        *e = floor + (*e - Y_MAX / 2.0) / (Y_MAX / 2.0) * (ceiling - floor);
    }

    let mut level = Level {
        domain,
        elevation,
        hole: Hole { x1: 0.0, x2: 0.0 },
    };
    cut_cup(&mut level, rng);
    level
}

/// Splice the cup into the back half of the terrain: two lip points
/// bracketing a flat bottom `CUP_DEPTH` below, replacing any breakpoints
/// they straddle.
fn cut_cup<R: Rng + ?Sized>(level: &mut Level, rng: &mut R) {
    let extent = X_MAX - X_MIN;
    let center = X_MIN + rng.random_range(0.55..0.9) * extent;
    let lip = level.elevation_at(center);

    // Drop breakpoints under the notch, with margin so no sliver segments
    // appear next to the lips
    let clear_left = center - CUP_HALF_WIDTH - BALL_RADIUS;
    let clear_right = center + CUP_HALF_WIDTH + BALL_RADIUS;
    let mut points: Vec<(f64, f64)> = level
        .domain
        .iter()
        .copied()
        .zip(level.elevation.iter().copied())
        .filter(|(x, _)| *x < clear_left || *x > clear_right)
        .collect();

    points.push((center - CUP_HALF_WIDTH, lip));
    points.push((center - 0.6 * BALL_RADIUS, lip - CUP_DEPTH));
    points.push((center + 0.6 * BALL_RADIUS, lip - CUP_DEPTH));
    points.push((center + CUP_HALF_WIDTH, lip));
    points.sort_by(|a, b| a.0.total_cmp(&b.0));

    level.domain = points.iter().map(|p| p.0).collect();
    level.elevation = points.iter().map(|p| p.1).collect();
    level.hole = Hole {
        x1: center - CUP_HALF_WIDTH,
        x2: center + CUP_HALF_WIDTH,
    };
}
