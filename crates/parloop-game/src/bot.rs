use rand::Rng;

use crate::config::RoundConfig;

/// Token prefix for house-controlled balls. Tokens stay secret like any
/// other ball token; the prefix only matters to the host's scheduler.
pub const CPU_TOKEN_PREFIX: &str = "secretCPU-";

/// Delay before a freshly seated CPU takes its first stroke.
pub const FIRST_MOVE_DELAY_MS: f64 = 7000.0;

/// Display names the house picks from.
pub const CPU_NAMES: [&str; 16] = [
    "Freddy Allstar",
    "Chip \"Slice\" McDivot",
    "Sandy \"Bunker\" Bottoms",
    "Bogey \"Mulligan\" Johnson",
    "Tee \"Off\" Thompson",
    "Albatross \"Eagle\" Featherstone",
    "Birdie \"Putt\" Parson",
    "Putter \"Whacker\" Wilson",
    "Fairway \"Duffer\" Davis",
    "Ace \"Golfzilla\" Anderson",
    "Caddy \"Clubber\" Clarkson",
    "Slice \"Hook\" Hamilton",
    "Fore \"Bogeyman\" Barclay",
    "Mulligan \"Putter\" Peterson",
    "Shank \"Swing\" Sullivan",
    "Dimples \"Chipper\" Chandler",
];

/// Ball colors the house picks from.
pub const CPU_COLORS: [&str; 12] = [
    "crimson",
    "deeppink",
    "hotpink",
    "lightcoral",
    "lightpink",
    "magenta",
    "mediumvioletred",
    "orchid",
    "pink",
    "plum",
    "salmon",
    "tomato",
];

/// Token, name, and color for a new CPU ball.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CpuIdentity {
    pub token: String,
    pub name: &'static str,
    pub color: &'static str,
}

/// Whether the house should seat another CPU player.
pub fn should_add_cpu(ball_count: usize, config: &RoundConfig) -> bool {
    ball_count < config.cpu_fill_target
}

pub fn is_cpu_token(token: &str) -> bool {
    token.starts_with(CPU_TOKEN_PREFIX)
}

/// Roll a fresh CPU identity.
pub fn cpu_identity<R: Rng + ?Sized>(rng: &mut R) -> CpuIdentity {
    let tag = rng.random_range(1..=100u32);
    CpuIdentity {
        token: format!("{CPU_TOKEN_PREFIX}{tag}"),
        name: CPU_NAMES[rng.random_range(0..CPU_NAMES.len())],
        color: CPU_COLORS[rng.random_range(0..CPU_COLORS.len())],
    }
}

/// Plan a CPU stroke: `(angle_deg, mightiness)`. Always inside the
/// published validation bounds, so the stroke cannot be rejected.
pub fn plan_stroke<R: Rng + ?Sized>(rng: &mut R) -> (f64, f64) {
    (rng.random_range(0.0..180.0), rng.random_range(0.0..20.0))
}

/// Delay until the CPU's next stroke after this one.
pub fn next_move_delay_ms<R: Rng + ?Sized>(rng: &mut R) -> f64 {
    (5000.0 + rng.random_range(0.0..5000.0f64)).floor()
}
