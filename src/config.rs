//! Gameplay tuning bundle.
//!
//! Assembled once by whatever loads it (the binary reads JSON) and handed to
//! the simulation as a shared, read-only reference.

use serde::Deserialize;

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    /// Seed for the round generator; 0 means seed from entropy.
    pub random_seed: u64,
    /// Players ignore lethal contacts.
    pub god_mode: bool,

    // ── Player ───────────────────────────────────────────────────────────────
    /// Base seconds between player shots (randomized up to 2x).
    pub player_fire_rate: f32,
    /// Player laser speed in world units per second.
    pub player_laser_velocity: f32,
    /// Shared friendly laser pool for all players.
    pub max_player_lasers: u32,

    // ── Aliens ───────────────────────────────────────────────────────────────
    pub alien_fire_rate: f32,
    pub better_alien_fire_rate: f32,
    pub alien_laser_velocity: f32,
    pub max_alien_lasers: u32,
    /// Energy gained per frame is `uniform(0, 1) * alien_update_rate`.
    pub alien_update_rate: f32,
    /// Energy at which an alien starts evolving.
    pub alien_transform_energy: f32,
    /// Per-frame probability that an evolving alien completes its transform.
    pub alien_transform_rate: f32,

    // ── Power-ups ────────────────────────────────────────────────────────────
    /// Chance that a destroyed alien drops a power-up.
    pub power_up_rate: f32,
    pub power_up_velocity: f32,
    /// Seconds a speed/fire/multi-shot boost lasts.
    pub power_up_time: f32,
    pub power_up_invulnerability_time: f32,
    pub speed_boost: f32,
    /// Divides the interval between player shots.
    pub fire_boost: f32,
    pub bomb_explosions: u32,
    /// Seconds between consecutive bomb explosions becoming visible.
    pub bomb_stagger: f32,

    // ── Misc ─────────────────────────────────────────────────────────────────
    pub explosion_timer: f32,
    pub wall_max_hits: i32,
    /// Gap left between an alien and the wall it bounced off.
    pub wall_safe_distance: f32,
    pub score_normal_alien: u32,
    pub score_better_alien: u32,
    /// Contacts reported per frame; the rest are dropped.
    pub max_contacts: usize,
    /// Broad-phase grid cell edge, at least the largest entity size.
    pub grid_cell_size: f32,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            random_seed: 0,
            god_mode: false,

            player_fire_rate: 0.25,
            player_laser_velocity: 40.0,
            max_player_lasers: 6,

            alien_fire_rate: 2.0,
            better_alien_fire_rate: 1.0,
            alien_laser_velocity: 20.0,
            max_alien_lasers: 10,
            alien_update_rate: 0.01,
            alien_transform_energy: 1.0,
            alien_transform_rate: 0.01,

            power_up_rate: 0.25,
            power_up_velocity: 8.0,
            power_up_time: 10.0,
            power_up_invulnerability_time: 5.0,
            speed_boost: 2.0,
            fire_boost: 2.0,
            bomb_explosions: 60,
            bomb_stagger: 0.05,

            explosion_timer: 0.5,
            wall_max_hits: 3,
            wall_safe_distance: 1.0,
            score_normal_alien: 10,
            score_better_alien: 20,
            max_contacts: 64,
            grid_cell_size: 8.0,
        }
    }
}
