use std::num::NonZeroU32;

use space_raiders::catalog::*;
use space_raiders::entities::*;
use space_raiders::math::Vec2;

fn player() -> Player {
    let catalog = DefaultCatalog;
    Player::new(PlayerId(0), Vec2::new(40.0, 38.0), catalog.player_profile(0), &catalog)
}

fn alien(pos: Vec2, velocity: Vec2) -> Alien {
    let catalog = DefaultCatalog;
    Alien::new(pos, velocity, catalog.alien_profile(0), catalog.alien_profile(1), &catalog)
}

// ── Player ───────────────────────────────────────────────────────────────────

#[test]
fn player_starts_at_baseline() {
    let p = player();
    assert_eq!(p.score(), 0);
    assert_eq!(p.shot_mode, ShotMode::Single);
    assert_eq!(p.speed_boost, 1.0);
    assert_eq!(p.fire_boost, 1.0);
    assert_eq!(p.body.size, Vec2::new(5.0, 2.0));
    assert_eq!(p.body.prev_pos, p.body.pos);
}

#[test]
fn score_is_sum_of_increments() {
    let mut p = player();
    let mut last = 0;
    for amount in [10, 20, 10, 1, 20] {
        p.add_score(NonZeroU32::new(amount).unwrap());
        assert!(p.score() >= last);
        last = p.score();
    }
    assert_eq!(p.score(), 61);
}

#[test]
fn destroy_is_idempotent() {
    let mut p = player();
    assert!(p.destroy());
    assert!(!p.destroy());
    assert!(p.is_terminal());
}

#[test]
fn shield_absorbs_destroy() {
    let mut p = player();
    p.set_invulnerable(2.0);
    assert!(!p.destroy());
    assert!(!p.is_terminal());
}

#[test]
fn triple_replaces_double() {
    let mut p = player();
    p.set_double_fire(10.0);
    p.boost_timer = 3.0;
    p.set_triple_fire(10.0);
    assert_eq!(p.shot_mode, ShotMode::Triple);
    assert_eq!(p.boost_timer, 10.0);
}

#[test]
fn fire_boost_shortens_interval() {
    let mut p = player();
    p.set_fire_boost(2.0, 5.0);
    assert_eq!(p.fire_boost, 0.5);
    p.clear_boosts();
    assert_eq!(p.fire_boost, 1.0);
    assert_eq!(p.boost_timer, 0.0);
}

// ── Alien ────────────────────────────────────────────────────────────────────

#[test]
fn alien_damage_after_death_is_ignored() {
    let mut a = alien(Vec2::new(10.0, 10.0), Vec2::new(4.5, 0.0));
    assert_eq!(a.health, 1);
    assert!(a.decrease_health());
    assert_eq!(a.state, AlienState::Dead);
    for _ in 0..3 {
        assert!(!a.decrease_health());
    }
    assert_eq!(a.health, 0);
    assert!(a.is_terminal());
}

#[test]
fn transform_swaps_profile_and_reverses() {
    let mut a = alien(Vec2::new(10.0, 10.0), Vec2::new(4.5, 0.0));
    a.transform();
    assert_eq!(a.state, AlienState::Better);
    assert_eq!(a.velocity.x, -9.0);
    assert_eq!(a.health, 2);
    assert_eq!(a.body.size, Vec2::new(5.0, 3.0));
    assert_eq!(a.visual().image, ImageId::BetterAlien);
}

#[test]
fn avoid_wall_parks_alien_outside() {
    let catalog = DefaultCatalog;
    let wall = Wall::new(Vec2::new(20.0, 10.0), 3, &catalog);
    let mut a = alien(Vec2::new(17.0, 10.0), Vec2::new(4.5, 0.0));
    a.avoid_wall(&wall.body, 1.0);

    let reach = (wall.body.size + a.body.size) * 0.5;
    assert!((a.body.pos.x - wall.body.pos.x).abs() > reach.x);
    assert_eq!(a.body.prev_pos, a.body.pos);
    assert!(a.velocity.x < 0.0);
    assert!(a.velocity.y >= 0.0);
    assert!((a.velocity.length() - 4.5).abs() < 1e-4);
}

#[test]
fn avoid_wall_never_sends_alien_upward() {
    let catalog = DefaultCatalog;
    let wall = Wall::new(Vec2::new(20.0, 10.0), 3, &catalog);
    // Falling onto the top face.
    let mut a = alien(Vec2::new(20.0, 8.5), Vec2::new(1.0, 6.0));
    a.avoid_wall(&wall.body, 1.0);
    assert!(a.velocity.y >= 0.0);
    assert!(a.body.pos.y < wall.body.pos.y - (wall.body.size.y + a.body.size.y) * 0.5);
}

// ── Wall, laser, power-up, explosion ─────────────────────────────────────────

#[test]
fn wall_falls_after_max_hits() {
    let mut w = Wall::new(Vec2::new(10.0, 10.0), 3, &DefaultCatalog);
    assert!(!w.hit());
    assert!(!w.hit());
    assert!(w.hit());
    assert!(!w.hit());
    assert_eq!(w.hits, 0);
}

#[test]
fn laser_collider_kind_follows_owner() {
    let visual = Visual::new(ImageId::PlayerLaser, Color::White);
    let friendly = Laser::new(Vec2::ZERO, Vec2::ZERO, visual, Owner::Player(PlayerId(1)), &DefaultCatalog);
    let hostile = Laser::new(Vec2::ZERO, Vec2::ZERO, visual, Owner::Alien, &DefaultCatalog);
    assert!(friendly.is_friendly());
    assert_eq!(friendly.collider_kind(), ColliderKind::PlayerLaser);
    assert!(!hostile.is_friendly());
    assert_eq!(hostile.collider_kind(), ColliderKind::AlienLaser);
}

#[test]
fn power_up_falls_and_names_itself() {
    let p = PowerUp::new(Vec2::new(5.0, 5.0), 8.0, PowerUpKind::TripleFire, &DefaultCatalog);
    assert_eq!(p.velocity, Vec2::new(0.0, 8.0));
    assert_eq!(p.visual.image, ImageId::TriplePowerUp);
    assert_eq!(PowerUpKind::TripleFire.message(), "Triple Fire!");
}

#[test]
fn delayed_explosion_is_invisible_until_due() {
    let mut e = Explosion::new(Vec2::ZERO, 0.1, 0.5);
    assert_eq!(e.visual.image, ImageId::Null);
    assert!(!e.advance(0.2));
    assert!(!e.advance(0.2));
    assert_eq!(e.visual.image, ImageId::Null);
    assert!(e.advance(0.2));
    assert_eq!(e.visual.image, ImageId::Explosion);
}
