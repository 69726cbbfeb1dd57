pub mod bot;
pub mod config;
pub mod scoring;

use std::collections::HashMap;

use rand::Rng;
use serde::{Deserialize, Serialize};

use parloop_sim::driver::{SimulationResult, Simulator};
use parloop_sim::geometry::degrees_to_vector;
use parloop_sim::levelgen::generate_level;
use parloop_sim::physics::{BallId, BallState};
use parloop_sim::terrain::{Level, Y_MAX, Y_MIN};

use config::RoundConfig;

/// Stroke angle bounds, degrees on the unit circle.
const ANGLE_MIN: f64 = -180.0;
const ANGLE_MAX: f64 = 180.0;
/// Hardest allowed hit.
const MIGHTINESS_MAX: f64 = 20.0;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    UnknownBall,
    AngleOutOfRange,
    MightinessOutOfRange,
    /// A settlement ran but the ball never came to rest. Application fault:
    /// the step budget and terrain should always produce a resting ball.
    SimulationDiverged,
}

impl std::fmt::Display for GameError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownBall => write!(f, "no ball with that token"),
            Self::AngleOutOfRange => write!(f, "angle must be within -180 to 180 degrees"),
            Self::MightinessOutOfRange => write!(f, "mightiness must be within 0 to 20"),
            Self::SimulationDiverged => write!(f, "ball never came to rest"),
        }
    }
}

impl std::error::Error for GameError {}

/// Full ball record as the host stores it. The token is the bearer secret
/// that authorizes strokes; anything client-facing goes through
/// [`PublicBall`] instead.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BallRecord {
    pub state: BallState,
    pub token: String,
    pub color: String,
    pub name: Option<String>,
    pub strokes: u32,
}

/// Snapshot of a ball with the secret token stripped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicBall {
    pub id: BallId,
    pub x: f64,
    pub y: f64,
    pub dx: f64,
    pub dy: f64,
    pub ts: f64,
    pub color: String,
    pub name: Option<String>,
    pub strokes: u32,
    pub updates: u64,
    pub grounded: bool,
    pub finished: bool,
}

impl From<&BallRecord> for PublicBall {
    fn from(record: &BallRecord) -> Self {
        Self {
            id: record.state.id,
            x: record.state.x,
            y: record.state.y,
            dx: record.state.dx,
            dy: record.state.dy,
            ts: record.state.ts,
            color: record.color.clone(),
            name: record.name.clone(),
            strokes: record.strokes,
            updates: record.state.updates,
            grounded: record.state.grounded,
            finished: record.state.finished,
        }
    }
}

/// One level plus every ball playing it. The serialized unit for host
/// state sync.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Round {
    pub level: Level,
    pub started_ms: f64,
    pub balls: HashMap<BallId, BallRecord>,
}

/// Instruction to the host: call `settle_ball(ball, last_update)` at
/// `run_at_ms`. The counter lets a newer stroke orphan an older schedule.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScheduledUpdate {
    pub ball: BallId,
    pub last_update: u64,
    pub run_at_ms: f64,
}

/// Host-side golf state machine: rounds, balls, strokes, settlement.
///
/// Pure library. The host supplies `now_ms` (epoch milliseconds) and is
/// responsible for firing returned [`ScheduledUpdate`]s on time.
pub struct GolfGame {
    config: RoundConfig,
    sim: Simulator,
    round: Round,
}

impl GolfGame {
    /// Start a game on a freshly generated level.
    pub fn new(config: RoundConfig, now_ms: f64) -> Self {
        Self::with_level(config, generate_level(), now_ms)
    }

    /// Start a game on a specific level. Tests and replays use this.
    pub fn with_level(config: RoundConfig, level: Level, now_ms: f64) -> Self {
        Self {
            config,
            sim: Simulator::new(),
            round: Round {
                level,
                started_ms: now_ms,
                balls: HashMap::new(),
            },
        }
    }

    pub fn config(&self) -> &RoundConfig {
        &self.config
    }

    pub fn level(&self) -> &Level {
        &self.round.level
    }

    pub fn started_ms(&self) -> f64 {
        self.round.started_ms
    }

    /// Direct access to the live round, for hosts that persist it themselves.
    pub fn round(&self) -> &Round {
        &self.round
    }

    /// Add a ball for `token`, replacing any existing ball with the same
    /// token. Spawns in the tee band with zero velocity and returns the
    /// settlement schedule for the initial drop.
    pub fn create_ball(
        &mut self,
        token: &str,
        color: &str,
        name: Option<&str>,
        now_ms: f64,
    ) -> (BallId, ScheduledUpdate) {
        let stale: Vec<BallId> = self
            .round
            .balls
            .iter()
            .filter(|(_, record)| record.token == token)
            .map(|(&id, _)| id)
            .collect();
        for id in stale {
            self.round.balls.remove(&id);
        }

        let mut rng = rand::rng();
        // Tee band: low x, upper half of the sky
        let x = 10.0 + rng.random_range(0.0..200.0);
        let y = Y_MIN + (Y_MAX - Y_MIN) * (1.0 + rng.random_range(0.0..1.0)) / 2.0;
        let state = BallState::new(x, y, now_ms);
        let id = state.id;

        let schedule = self.settlement_schedule(&state);
        self.round.balls.insert(
            id,
            BallRecord {
                state,
                token: token.to_string(),
                color: color.to_string(),
                name: name.map(str::to_string),
                strokes: 0,
            },
        );
        (id, schedule)
    }

    /// Hit the ball: replace its velocity with
    /// `mightiness * degrees_to_vector(angle_deg)` from wherever it is at
    /// `now_ms`. A ball may be hit mid-flight.
    pub fn publish_stroke(
        &mut self,
        token: &str,
        angle_deg: f64,
        mightiness: f64,
        now_ms: f64,
    ) -> Result<ScheduledUpdate, GameError> {
        let state = self
            .round
            .balls
            .values()
            .find(|record| record.token == token)
            .map(|record| record.state)
            .ok_or(GameError::UnknownBall)?;
        if !(ANGLE_MIN..=ANGLE_MAX).contains(&angle_deg) {
            return Err(GameError::AngleOutOfRange);
        }
        if !(0.0..=MIGHTINESS_MAX).contains(&mightiness) {
            return Err(GameError::MightinessOutOfRange);
        }

        let here = self.sim.resolve(&state, now_ms, &self.round.level);
        let (dx, dy) = degrees_to_vector(angle_deg);

        let record = self
            .round
            .balls
            .get_mut(&state.id)
            .ok_or(GameError::UnknownBall)?;
        record.state.x = here.x;
        record.state.y = here.y;
        record.state.dx = mightiness * dx;
        record.state.dy = mightiness * dy;
        record.state.ts = now_ms;
        record.state.updates += 1;
        record.state.grounded = false;
        record.state.finished = false;
        record.strokes += 1;

        let struck = record.state;
        Ok(self.settlement_schedule(&struck))
    }

    /// Finalize a ball that should have come to rest. The host calls this
    /// when a [`ScheduledUpdate`] fires.
    ///
    /// Returns `Ok(false)` without touching the ball when a newer stroke
    /// has taken over since the schedule was issued.
    pub fn settle_ball(&mut self, id: BallId, last_update: u64) -> Result<bool, GameError> {
        let state = self
            .round
            .balls
            .get(&id)
            .map(|record| record.state)
            .ok_or(GameError::UnknownBall)?;
        if state.updates != last_update {
            tracing::debug!(
                ball_id = %id,
                scheduled = last_update,
                current = state.updates,
                "Skipping stale settlement"
            );
            return Ok(false);
        }

        let eventual = self.sim.resolve(&state, f64::INFINITY, &self.round.level);
        if !eventual.stuck_on_ground {
            return Err(GameError::SimulationDiverged);
        }

        let record = self
            .round
            .balls
            .get_mut(&id)
            .ok_or(GameError::UnknownBall)?;
        record.state.x = eventual.x;
        record.state.y = eventual.y;
        record.state.ts = eventual.ts;
        record.state.dx = 0.0;
        record.state.dy = 0.0;
        record.state.updates += 1;
        record.state.grounded = true;
        record.state.finished = eventual.in_hole;
        Ok(true)
    }

    /// Every ball in the round, tokens stripped. Unordered; callers that
    /// want scoreboard order go through [`scoring::standings`].
    pub fn balls(&self) -> Vec<PublicBall> {
        self.round.balls.values().map(PublicBall::from).collect()
    }

    pub fn ball(&self, id: BallId) -> Option<PublicBall> {
        self.round.balls.get(&id).map(PublicBall::from)
    }

    /// Where a ball is at `now_ms`, through the memoizing simulator.
    pub fn position_at(&self, id: BallId, now_ms: f64) -> Option<SimulationResult> {
        let record = self.round.balls.get(&id)?;
        Some(self.sim.resolve(&record.state, now_ms, &self.round.level))
    }

    pub fn set_name(&mut self, token: &str, name: &str) -> Result<(), GameError> {
        let record = self
            .round
            .balls
            .values_mut()
            .find(|record| record.token == token)
            .ok_or(GameError::UnknownBall)?;
        record.name = Some(name.to_string());
        Ok(())
    }

    /// Whether the round can roll over: time is up or somebody sank.
    pub fn can_advance(&self, now_ms: f64) -> bool {
        let time_up = now_ms - self.round.started_ms > self.config.round_length_ms;
        let one_in = self
            .round
            .balls
            .values()
            .any(|record| record.state.finished);
        time_up || one_in
    }

    /// Start the next round on a fresh level, dropping all balls. No-op
    /// (returns `false`) while the current round is still live.
    pub fn advance_round(&mut self, now_ms: f64) -> bool {
        if !self.can_advance(now_ms) {
            return false;
        }
        self.round = Round {
            level: generate_level(),
            started_ms: now_ms,
            balls: HashMap::new(),
        };
        true
    }

    /// Serialize the round for host-to-host sync.
    pub fn round_snapshot(&self) -> Vec<u8> {
        rmp_serde::to_vec(&self.round).unwrap_or_default()
    }

    /// Replace the round from a snapshot. Bytes that do not decode are
    /// ignored.
    pub fn restore_round(&mut self, bytes: &[u8]) {
        if let Ok(round) = rmp_serde::from_slice::<Round>(bytes) {
            self.round = round;
        }
    }

    fn settlement_schedule(&self, state: &BallState) -> ScheduledUpdate {
        let eventual = self.sim.resolve(state, f64::INFINITY, &self.round.level);
        ScheduledUpdate {
            ball: state.id,
            last_update: state.updates,
            run_at_ms: eventual.ts,
        }
    }
}
