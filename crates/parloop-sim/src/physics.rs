use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Feature, bounce, closest_feature};
use crate::terrain::{Level, X_MAX, X_MIN};

/// Ball radius in world units.
pub const BALL_RADIUS: f64 = 10.0;
/// Simulation-time milliseconds advanced per step.
pub const STEP_MS: f64 = 10.0;
/// Velocity multiplier per step, both axes.
pub const DRAG: f64 = 0.995;
/// Downward velocity added per step, after drag.
pub const GRAVITY_STEP: f64 = 0.08;
/// Velocity multiplier applied on top of reflection at a contact.
pub const RESTITUTION: f64 = 0.76;
/// Squared speed below which a contacting ball counts as settled.
pub const REST_SPEED_SQ: f64 = 1.0;

/// Identity of a ball across strokes and updates.
pub type BallId = Uuid;

/// Kinematic state of a ball at timestamp `ts` (epoch milliseconds).
///
/// A value type: transitions return new states, nothing mutates in place.
/// `updates` counts the impulses applied to the ball so far; the physics
/// never reads it, the driver keys its memoization on it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BallState {
    pub id: BallId,
    pub updates: u64,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub ts: f64,
    /// Settled on terrain; terminal until the next stroke.
    pub grounded: bool,
    /// Settled inside the cup.
    pub finished: bool,
}

impl BallState {
    /// A fresh, motionless ball at the given position and time.
    pub fn new(x: f64, y: f64, ts: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            updates: 0,
            x,
            y,
            dx: 0.0,
            dy: 0.0,
            ts,
            grounded: false,
            finished: false,
        }
    }
}

fn wrap_x(x: f64) -> f64 {
    if x < X_MIN {
        x + (X_MAX - X_MIN)
    } else if x > X_MAX {
        x - (X_MAX - X_MIN)
    } else {
        x
    }
}

/// Advance one fixed step: wrap x around the playfield, tick the clock,
/// apply drag and gravity, then move. No collision handling here.
pub fn step(ball: &BallState) -> BallState {
    let mut next = *ball;
    next.x = wrap_x(next.x);
    next.ts += STEP_MS;
    next.dx *= DRAG;
    next.dy = next.dy * DRAG - GRAVITY_STEP;
    next.x += next.dx;
    next.y += next.dy;
    next
}

/// Outcome of one resolved step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Advanced {
    pub ball: BallState,
    /// The step ended in terrain contact.
    pub contact: bool,
    /// Contact at rest speed: the ball has settled.
    pub rested: bool,
}

/// One step plus contact resolution against the terrain.
///
/// Collision is discrete: only the post-step position is tested, so a fast
/// enough ball can cross a thin ridge within one step. On contact the
/// velocity reflects off the nearest feature (damped by `RESTITUTION`) and
/// the position reverts to its pre-step value (post-wrap, so a reverted ball
/// stays inside the playfield); the reflected velocity takes effect on the
/// next step.
pub fn advance(ball: &BallState, level: &Level) -> Advanced {
    let mut next = step(ball);

    let land = level.relevant_land(next.x - BALL_RADIUS, next.x + BALL_RADIUS);
    let mut nearest: Option<(Feature, f64)> = None;
    for seg in &land {
        let (feature, dist) = closest_feature(next.x, next.y, seg);
        if nearest.is_none_or(|(_, best)| dist < best) {
            nearest = Some((feature, dist));
        }
    }

    let mut contact = false;
    if let Some((feature, dist)) = nearest
        && dist < BALL_RADIUS
    {
        contact = true;
        let (dx, dy) = bounce(next.dx, next.dy, next.x, next.y, &feature);
        next.dx = dx * RESTITUTION;
        next.dy = dy * RESTITUTION;
        next.x = wrap_x(ball.x);
        next.y = ball.y;
    }

    let rested = contact && next.dx * next.dx + next.dy * next.dy < REST_SPEED_SQ;
    Advanced {
        ball: next,
        contact,
        rested,
    }
}
