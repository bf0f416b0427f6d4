//! Per-kind frame logic: movement, boundary policy, state machines and the
//! fire timers. Runs once per live entity per frame, before collision
//! detection. Randomness always comes through the `rng` argument.

use rand::Rng;
use tracing::debug;

use crate::catalog::{Color, ImageId, ImageSizes, Visual};
use crate::config::GameConfig;
use crate::entities::{
    Alien, AlienState, Collidable, Laser, LifeState, Owner, Player, PowerUp, ShotMode,
};
use crate::math::Vec2;
use crate::ports::Steering;
use crate::population::LaserBank;

const PLAYER_LASER: Visual = Visual::new(ImageId::PlayerLaser, Color::LightBlueIntense);
const PLAYER_LASER_LEFT: Visual = Visual::new(ImageId::PlayerLaserLeft, Color::LightBlueIntense);
const PLAYER_LASER_RIGHT: Visual = Visual::new(ImageId::PlayerLaserRight, Color::LightBlueIntense);
const ALIEN_LASER: Visual = Visual::new(ImageId::AlienLaser, Color::GreenIntense);

/// Flicker frequency of an invulnerable ship, in radians per second.
const FLICKER_RATE: f32 = 20.0;

// ── Fire timer ───────────────────────────────────────────────────────────────

/// Two-phase fire timer shared by players and aliens.
///
/// A timer at exactly zero is armed to `interval * (1 + uniform(0, 1))`, then
/// counts down by `dt`. Returns true when it drops below zero; the timer is
/// then parked at zero so it re-arms on the next frame.
pub fn tick_fire_timer<R: Rng + ?Sized>(timer: &mut f32, interval: f32, dt: f32, rng: &mut R) -> bool {
    if *timer == 0.0 {
        *timer = interval * (1.0 + rng.gen::<f32>());
    }
    *timer -= dt;
    if *timer < 0.0 {
        *timer = 0.0;
        return true;
    }
    false
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Steer, clamp to the screen, and run down boosts and invulnerability.
pub fn move_player(player: &mut Player, steering: Steering, dt: f32, bounds: Vec2) {
    let half_width = player.body.size.x * 0.5;
    let speed = player.profile.velocity * player.speed_boost;

    player.velocity = if steering.left {
        Vec2::new(-speed, 0.0)
    } else if steering.right {
        Vec2::new(speed, 0.0)
    } else {
        Vec2::ZERO
    };

    let mut pos = player.body.pos + player.velocity * dt;
    pos.x = pos.x.min(bounds.x - half_width).max(half_width);
    player.body.step_to(pos);

    // Boosts share one countdown; crossing zero resets all of them.
    player.boost_timer -= dt;
    if player.boost_timer < 0.0 {
        player.clear_boosts();
    }

    player.accum_time += dt;
    player.invulnerability_time = (player.invulnerability_time - dt).max(0.0);
    player.visual.image = player.profile.visual.image;
    player.visual.color = if player.is_shielded() && (FLICKER_RATE * player.accum_time).sin() > 0.0 {
        player.profile.invulnerable_color
    } else {
        player.profile.visual.color
    };
}

/// Run the player's fire timer and, when it elapses, fire the current shot
/// pattern. Double and triple bursts are all-or-nothing: without enough
/// friendly capacity nothing is fired and the next elapse tries again.
/// Returns the number of lasers spawned.
pub fn fire_player<R: Rng + ?Sized>(
    player: &mut Player,
    dt: f32,
    config: &GameConfig,
    rng: &mut R,
    bank: &mut LaserBank,
    images: &dyn ImageSizes,
) -> u32 {
    let interval = config.player_fire_rate * player.fire_boost;
    if !tick_fire_timer(&mut player.fire_timer, interval, dt, rng) {
        return 0;
    }

    let owner = Owner::Player(player.id);
    let l = config.player_laser_velocity;
    let offset = player.profile.laser_offset;
    let pos = player.body.pos;
    let muzzle_y = pos.y - player.body.size.y;
    let side = if player.laser_shots % 2 == 1 { -1.0 } else { 1.0 };

    let laser = |at: Vec2, velocity: Vec2, visual: Visual| Laser::new(at, velocity, visual, owner, images);

    let fired = match player.shot_mode {
        ShotMode::Triple if bank.available_friendly() >= 3 => {
            let muzzle = Vec2::new(pos.x + offset * side, muzzle_y);
            bank.spawn(laser(muzzle, Vec2::new(0.0, -l), PLAYER_LASER));
            bank.spawn(laser(muzzle, Vec2::new(-l * 0.5, -l * 0.5), PLAYER_LASER_LEFT));
            bank.spawn(laser(muzzle, Vec2::new(l * 0.5, -l * 0.5), PLAYER_LASER_RIGHT));
            3
        }
        ShotMode::Double if bank.available_friendly() >= 2 => {
            bank.spawn(laser(Vec2::new(pos.x - offset, muzzle_y), Vec2::new(0.0, -l), PLAYER_LASER));
            bank.spawn(laser(Vec2::new(pos.x + offset, muzzle_y), Vec2::new(0.0, -l), PLAYER_LASER));
            2
        }
        ShotMode::Single => {
            let muzzle = Vec2::new(pos.x + offset * side, muzzle_y);
            u32::from(bank.spawn(laser(muzzle, Vec2::new(0.0, -l), PLAYER_LASER)))
        }
        // Burst does not fit; try again next time the timer elapses.
        ShotMode::Triple | ShotMode::Double => 0,
    };
    player.laser_shots = player.laser_shots.wrapping_add(1);
    fired
}

// ── Alien ────────────────────────────────────────────────────────────────────

/// Integrate velocity; bounce off the side walls one row further down.
pub fn move_alien(alien: &mut Alien, dt: f32, bounds: Vec2) {
    let size = alien.body.size;
    let half_width = size.x * 0.5;
    let mut pos = alien.body.pos + alien.velocity * dt;

    if pos.x < half_width {
        pos.x = half_width;
        pos.y += size.y;
        alien.velocity.x = alien.velocity.x.abs();
    } else if pos.x > bounds.x - half_width {
        pos.x = bounds.x - half_width;
        pos.y += size.y;
        alien.velocity.x = -alien.velocity.x.abs();
    }
    alien.body.step_to(pos);
}

/// Bottom checks, energy and evolution, and the fire timer.
///
/// Returns true when the alien is inside the loss band at the bottom of the
/// screen. An alien that sinks past the lower half of its own height goes
/// terminal and does nothing else this frame.
pub fn update_alien<R: Rng + ?Sized>(
    alien: &mut Alien,
    dt: f32,
    bounds: Vec2,
    config: &GameConfig,
    rng: &mut R,
    bank: &mut LaserBank,
    images: &dyn ImageSizes,
) -> bool {
    let size = alien.body.size;
    let pos = alien.body.pos;

    let bottom_reached = pos.y >= bounds.y - size.y;
    if bottom_reached {
        debug!(x = pos.x, y = pos.y, "alien reached the bottom");
    }
    if pos.y > bounds.y - size.y * 0.5 {
        alien.mark_terminal();
        return bottom_reached;
    }

    alien.energy += rng.gen::<f32>() * config.alien_update_rate;
    match alien.state {
        AlienState::Normal if alien.energy >= config.alien_transform_energy => {
            alien.state = AlienState::Evolving;
        }
        AlienState::Evolving if rng.gen::<f32>() < config.alien_transform_rate => {
            alien.transform();
            debug!(x = pos.x, y = pos.y, "alien evolved");
        }
        _ => {}
    }

    let interval = match alien.state {
        AlienState::Normal => config.alien_fire_rate,
        AlienState::Evolving | AlienState::Better | AlienState::Dead => config.better_alien_fire_rate,
    };
    if tick_fire_timer(&mut alien.fire_timer, interval, dt, rng) {
        let muzzle = Vec2::new(pos.x, pos.y + alien.body.size.y * 0.5);
        let velocity = Vec2::new(0.0, config.alien_laser_velocity);
        bank.spawn(Laser::new(muzzle, velocity, ALIEN_LASER, Owner::Alien, images));
    }

    bottom_reached
}

// ── Lasers and power-ups ─────────────────────────────────────────────────────

fn out_of_bounds(pos: Vec2, bounds: Vec2) -> bool {
    pos.x < 0.0 || pos.x > bounds.x || pos.y < 0.5 || pos.y > bounds.y - 0.5
}

pub fn move_laser(laser: &mut Laser, dt: f32, bounds: Vec2) {
    laser.body.step_to(laser.body.pos + laser.velocity * dt);
    if out_of_bounds(laser.body.pos, bounds) {
        laser.state = LifeState::Dead;
    }
}

pub fn move_power_up(power_up: &mut PowerUp, dt: f32, bounds: Vec2) {
    power_up.body.step_to(power_up.body.pos + power_up.velocity * dt);
    if out_of_bounds(power_up.body.pos, bounds) {
        power_up.state = LifeState::Dead;
    }
}
