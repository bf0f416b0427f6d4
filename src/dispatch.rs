//! Contact resolution.
//!
//! An ordered table maps a pair of collider kinds to the handler that
//! resolves their contact. For each contact the first row matching either
//! orientation fires once, with the handles swapped into the row's order.
//! Rows must not overlap; kinds with no row are ignored.

use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::catalog::ImageSizes;
use crate::collision::Contact;
use crate::config::GameConfig;
use crate::entities::{AlienState, ColliderKind, EntityRef, Owner, Player, PowerUp, PowerUpKind};
use crate::math::Vec2;
use crate::ports::MessageSink;
use crate::population::Population;

/// Everything a handler may touch while resolving one frame's contacts.
pub struct Resolver<'a> {
    pub population: &'a mut Population,
    pub config: &'a GameConfig,
    pub bounds: Vec2,
    pub images: &'a dyn ImageSizes,
    pub rng: &'a mut dyn RngCore,
    pub messages: &'a mut dyn MessageSink,
}

type Handler = fn(&mut Resolver<'_>, EntityRef, EntityRef);

struct Rule {
    first: ColliderKind,
    second: ColliderKind,
    handler: Handler,
}

const RULES: [Rule; 8] = [
    Rule { first: ColliderKind::Player, second: ColliderKind::AlienLaser, handler: player_vs_laser },
    Rule { first: ColliderKind::Player, second: ColliderKind::PowerUp, handler: player_vs_power_up },
    Rule { first: ColliderKind::Player, second: ColliderKind::Alien, handler: player_vs_alien },
    Rule { first: ColliderKind::Alien, second: ColliderKind::Alien, handler: alien_vs_alien },
    Rule { first: ColliderKind::Alien, second: ColliderKind::PlayerLaser, handler: alien_vs_laser },
    Rule { first: ColliderKind::Alien, second: ColliderKind::Wall, handler: alien_vs_wall },
    Rule { first: ColliderKind::PlayerLaser, second: ColliderKind::AlienLaser, handler: laser_vs_laser },
    Rule { first: ColliderKind::PlayerLaser, second: ColliderKind::Wall, handler: laser_vs_wall },
];

/// Whether any row covers this pair, in either orientation.
pub fn handles(a: ColliderKind, b: ColliderKind) -> bool {
    RULES
        .iter()
        .any(|r| (r.first == a && r.second == b) || (r.first == b && r.second == a))
}

/// Resolve one contact. Contacts involving an entity that already went
/// terminal this frame, or with no matching row, are ignored.
pub fn resolve(resolver: &mut Resolver<'_>, contact: Contact) -> bool {
    let Contact { a, b } = contact;
    if !resolver.population.is_live(a) || !resolver.population.is_live(b) {
        return false;
    }
    for rule in &RULES {
        if rule.first == a.kind && rule.second == b.kind {
            (rule.handler)(resolver, a, b);
            return true;
        }
        if rule.first == b.kind && rule.second == a.kind {
            (rule.handler)(resolver, b, a);
            return true;
        }
    }
    false
}

/// Resolve a frame's contacts in order; returns how many fired a handler.
pub fn resolve_all(resolver: &mut Resolver<'_>, contacts: &[Contact]) -> usize {
    contacts.iter().filter(|&&c| resolve(resolver, c)).count()
}

// ── Handlers ─────────────────────────────────────────────────────────────────

fn player_vs_laser(r: &mut Resolver<'_>, player: EntityRef, laser: EntityRef) {
    if let Some(laser) = r.population.lasers.lasers_mut().get_mut(laser) {
        laser.destroy();
    }
    let Some(player) = r.population.players.get_mut(player) else {
        return;
    };
    let pos = player.body.pos;
    if !r.config.god_mode && player.destroy() {
        debug!(player = player.id.0, "player shot down");
    }
    r.population.add_explosion(pos, r.config.explosion_timer, 0.0);
}

fn player_vs_alien(r: &mut Resolver<'_>, player: EntityRef, alien: EntityRef) {
    let Some(alien) = r.population.aliens.get_mut(alien) else {
        return;
    };
    alien.state = AlienState::Dead;
    let pos = alien.body.pos;
    if let Some(player) = r.population.players.get_mut(player) {
        if !r.config.god_mode && player.destroy() {
            debug!(player = player.id.0, "player rammed");
        }
    }
    r.population.add_explosion(pos, r.config.explosion_timer, 0.0);
}

fn player_vs_power_up(r: &mut Resolver<'_>, player: EntityRef, power_up: EntityRef) {
    let Some(power_up) = r.population.power_ups.get_mut(power_up) else {
        return;
    };
    power_up.destroy();
    let kind = power_up.kind;

    r.messages.push_message(kind.message());
    let config = r.config;
    if let Some(player) = r.population.players.get_mut(player) {
        info!(player = player.id.0, power_up = ?kind, "power-up collected");
        if kind != PowerUpKind::Bomb {
            activate_power_up(player, kind, config);
            return;
        }
    }
    if kind == PowerUpKind::Bomb {
        detonate_bomb(r);
    }
}

/// Enemy pairs are reserved; nothing happens.
fn alien_vs_alien(_: &mut Resolver<'_>, _: EntityRef, _: EntityRef) {}

fn alien_vs_laser(r: &mut Resolver<'_>, alien: EntityRef, laser: EntityRef) {
    let Some(laser) = r.population.lasers.lasers_mut().get_mut(laser) else {
        return;
    };
    laser.destroy();
    let owner = laser.owner;

    let Some(alien) = r.population.aliens.get_mut(alien) else {
        return;
    };
    let score = if alien.state == AlienState::Better {
        r.config.score_better_alien
    } else {
        r.config.score_normal_alien
    };
    let killed = alien.decrease_health();
    let pos = alien.body.pos;

    if let Owner::Player(id) = owner {
        r.population.credit(id, score);
    }
    r.population.add_explosion(pos, r.config.explosion_timer, 0.0);
    if killed && r.rng.gen::<f32>() < r.config.power_up_rate {
        spawn_random_power_up(r, pos);
    }
}

fn alien_vs_wall(r: &mut Resolver<'_>, alien: EntityRef, wall: EntityRef) {
    let Some(wall) = r.population.walls.get(wall).map(|w| w.body) else {
        return;
    };
    if let Some(alien) = r.population.aliens.get_mut(alien) {
        alien.avoid_wall(&wall, r.config.wall_safe_distance);
    }
}

fn laser_vs_laser(r: &mut Resolver<'_>, friendly: EntityRef, hostile: EntityRef) {
    let Some((friendly, hostile)) = r.population.lasers.lasers_mut().get_pair_mut(friendly, hostile) else {
        return;
    };
    friendly.destroy();
    hostile.destroy();
    let pos = friendly.body.pos.lerp(hostile.body.pos, 0.5);
    r.population.add_explosion(pos, r.config.explosion_timer, 0.0);
}

fn laser_vs_wall(r: &mut Resolver<'_>, laser: EntityRef, wall: EntityRef) {
    if let Some(laser) = r.population.lasers.lasers_mut().get_mut(laser) {
        laser.destroy();
    }
    let Some(wall) = r.population.walls.get_mut(wall) else {
        return;
    };
    if wall.hit() {
        debug!(x = wall.body.pos.x, y = wall.body.pos.y, "wall destroyed");
    }
    let pos = Vec2::new(wall.body.pos.x, wall.body.pos.y - 1.0);
    r.population.add_explosion(pos, r.config.explosion_timer, 0.0);
}

// ── Effects ──────────────────────────────────────────────────────────────────

/// Apply a pickup to the player. Boost durations do not stack: every
/// pickup restarts the shared boost timer.
pub fn activate_power_up(player: &mut Player, kind: PowerUpKind, config: &GameConfig) {
    match kind {
        PowerUpKind::SpeedBoost => player.set_speed_boost(config.speed_boost, config.power_up_time),
        PowerUpKind::FireBoost => player.set_fire_boost(config.fire_boost, config.power_up_time),
        PowerUpKind::DoubleFire => player.set_double_fire(config.power_up_time),
        PowerUpKind::TripleFire => player.set_triple_fire(config.power_up_time),
        PowerUpKind::Invulnerability => player.set_invulnerable(config.power_up_invulnerability_time),
        PowerUpKind::Bomb => {}
    }
}

/// Staggered explosions all over the screen and one hit on every alien.
fn detonate_bomb(r: &mut Resolver<'_>) {
    let Resolver { population, config, bounds, rng, .. } = r;
    for i in 0..config.bomb_explosions {
        let x = 10.0 + (bounds.x - 20.0) * rng.gen::<f32>();
        let y = 10.0 + (bounds.y - 20.0) * rng.gen::<f32>();
        let delay = i as f32 * config.bomb_stagger;
        population.add_explosion(Vec2::new(x, y), config.explosion_timer, delay);
    }
    for alien in population.aliens.as_mut_slice() {
        alien.decrease_health();
    }
}

fn spawn_random_power_up(r: &mut Resolver<'_>, pos: Vec2) {
    let kind = PowerUpKind::ALL[r.rng.gen_range(0..PowerUpKind::ALL.len())];
    debug!(power_up = ?kind, x = pos.x, y = pos.y, "power-up dropped");
    r.population
        .add_power_up(PowerUp::new(pos, r.config.power_up_velocity, kind, r.images));
}
