use space_raiders::catalog::*;
use space_raiders::config::GameConfig;
use space_raiders::entities::*;
use space_raiders::math::Vec2;
use space_raiders::population::Population;
use space_raiders::ports::Steering;
use space_raiders::update::*;

use rand::rngs::StdRng;
use rand::SeedableRng;

const BOUNDS: Vec2 = Vec2::new(80.0, 40.0);

fn seeded_rng() -> StdRng {
    StdRng::seed_from_u64(42)
}

fn player_at(x: f32) -> Player {
    let catalog = DefaultCatalog;
    Player::new(PlayerId(0), Vec2::new(x, 38.0), catalog.player_profile(0), &catalog)
}

fn alien_at(pos: Vec2, velocity: Vec2) -> Alien {
    let catalog = DefaultCatalog;
    Alien::new(pos, velocity, catalog.alien_profile(0), catalog.alien_profile(1), &catalog)
}

fn friendly_laser() -> Laser {
    let visual = Visual::new(ImageId::PlayerLaser, Color::White);
    Laser::new(Vec2::new(40.0, 20.0), Vec2::new(0.0, -40.0), visual, Owner::Player(PlayerId(0)), &DefaultCatalog)
}

fn live_friendly(pop: &Population) -> u32 {
    pop.lasers.lasers().iter().filter(|l| l.is_friendly() && !l.is_terminal()).count() as u32
}

// ── Fire timer ───────────────────────────────────────────────────────────────

#[test]
fn fire_timer_arms_before_counting_down() {
    let mut rng = seeded_rng();
    let mut timer = 0.0;
    assert!(!tick_fire_timer(&mut timer, 1.0, 0.1, &mut rng));
    assert!(timer >= 0.9 && timer < 1.9);
}

#[test]
fn fire_timer_parks_at_zero_after_firing() {
    let mut rng = seeded_rng();
    let mut timer = 0.0;
    let mut frames = 0;
    while !tick_fire_timer(&mut timer, 1.0, 0.1, &mut rng) {
        frames += 1;
        assert!(frames < 25, "timer never elapsed");
    }
    assert_eq!(timer, 0.0);
    // Fires somewhere between one and two intervals.
    assert!((9..20).contains(&frames));
}

// ── Player movement ──────────────────────────────────────────────────────────

#[test]
fn player_clamped_to_left_edge() {
    let mut p = player_at(3.0);
    move_player(&mut p, Steering::LEFT, 1.0, BOUNDS);
    assert_eq!(p.body.pos.x, 2.5);
    assert_eq!(p.body.prev_pos.x, 3.0);
}

#[test]
fn player_clamped_to_right_edge() {
    let mut p = player_at(76.0);
    move_player(&mut p, Steering::RIGHT, 1.0, BOUNDS);
    assert_eq!(p.body.pos.x, 77.5);
}

#[test]
fn speed_boost_scales_movement() {
    let mut p = player_at(40.0);
    p.set_speed_boost(2.0, 10.0);
    move_player(&mut p, Steering::RIGHT, 0.1, BOUNDS);
    assert!((p.body.pos.x - 48.0).abs() < 1e-4);
}

#[test]
fn boosts_expire_together() {
    let mut p = player_at(40.0);
    p.set_speed_boost(2.0, 0.5);
    p.set_double_fire(0.5);
    move_player(&mut p, Steering::NEUTRAL, 0.3, BOUNDS);
    assert_eq!(p.shot_mode, ShotMode::Double);
    assert_eq!(p.speed_boost, 2.0);

    move_player(&mut p, Steering::NEUTRAL, 0.3, BOUNDS);
    assert_eq!(p.shot_mode, ShotMode::Single);
    assert_eq!(p.speed_boost, 1.0);
    assert_eq!(p.boost_timer, 0.0);
}

#[test]
fn invulnerable_player_flickers() {
    let mut p = player_at(40.0);
    p.set_invulnerable(1.0);
    move_player(&mut p, Steering::NEUTRAL, 0.05, BOUNDS);
    assert_eq!(p.visual.color, p.profile.invulnerable_color);
    move_player(&mut p, Steering::NEUTRAL, 0.15, BOUNDS);
    assert_eq!(p.visual.color, p.profile.visual.color);
}

#[test]
fn invulnerability_runs_out() {
    let mut p = player_at(40.0);
    p.set_invulnerable(0.2);
    move_player(&mut p, Steering::NEUTRAL, 0.3, BOUNDS);
    assert!(!p.is_shielded());
    assert_eq!(p.visual.color, p.profile.visual.color);
}

// ── Player firing ────────────────────────────────────────────────────────────

#[test]
fn single_shot_spawns_one_laser() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut p = player_at(40.0);
    p.fire_timer = 0.01;
    let fired = fire_player(&mut p, 0.1, &config, &mut seeded_rng(), &mut pop.lasers, &DefaultCatalog);
    assert_eq!(fired, 1);
    assert_eq!(pop.lasers.available_friendly(), config.max_player_lasers - 1);
    let laser = &pop.lasers.lasers().as_slice()[0];
    assert_eq!(laser.velocity, Vec2::new(0.0, -config.player_laser_velocity));
    assert_eq!(laser.owner, Owner::Player(PlayerId(0)));
}

#[test]
fn double_shot_spawns_two_offset_lasers() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut p = player_at(40.0);
    p.set_double_fire(10.0);
    p.fire_timer = 0.01;
    let fired = fire_player(&mut p, 0.1, &config, &mut seeded_rng(), &mut pop.lasers, &DefaultCatalog);
    assert_eq!(fired, 2);
    let mut xs: Vec<f32> = pop.lasers.lasers().iter().map(|l| l.body.pos.x).collect();
    xs.sort_by(f32::total_cmp);
    assert_eq!(xs, vec![39.0, 41.0]);
}

#[test]
fn no_shot_until_timer_elapses() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut p = player_at(40.0);
    p.fire_timer = 1.0;
    let fired = fire_player(&mut p, 0.1, &config, &mut seeded_rng(), &mut pop.lasers, &DefaultCatalog);
    assert_eq!(fired, 0);
    assert!(pop.lasers.lasers().is_empty());
}

#[test]
fn triple_burst_skipped_without_capacity() {
    let config = GameConfig { max_player_lasers: 3, ..GameConfig::default() };
    let mut pop = Population::new(&config);
    let mut rng = seeded_rng();
    assert!(pop.spawn_laser(friendly_laser()));
    assert!(pop.spawn_laser(friendly_laser()));
    assert_eq!(pop.lasers.available_friendly(), 1);

    let mut p = player_at(40.0);
    p.set_triple_fire(10.0);
    p.fire_timer = 0.01;
    let fired = fire_player(&mut p, 0.1, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(fired, 0);
    assert_eq!(live_friendly(&pop), 2);
    assert_eq!(pop.lasers.available_friendly(), 1);

    // Free the slots; the next elapse fires the full burst.
    for laser in pop.lasers.lasers_mut().as_mut_slice() {
        laser.destroy();
    }
    pop.compact(0.1);
    assert_eq!(pop.lasers.available_friendly(), 3);

    p.fire_timer = 0.01;
    let fired = fire_player(&mut p, 0.1, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(fired, 3);
    assert_eq!(live_friendly(&pop), 3);
    assert_eq!(pop.lasers.available_friendly(), 0);
}

#[test]
fn triple_burst_has_straight_and_diagonals() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut p = player_at(40.0);
    p.set_triple_fire(10.0);
    p.fire_timer = 0.01;
    fire_player(&mut p, 0.1, &config, &mut seeded_rng(), &mut pop.lasers, &DefaultCatalog);

    let l = config.player_laser_velocity;
    let velocities: Vec<Vec2> = pop.lasers.lasers().iter().map(|laser| laser.velocity).collect();
    assert!(velocities.contains(&Vec2::new(0.0, -l)));
    assert!(velocities.contains(&Vec2::new(-l * 0.5, -l * 0.5)));
    assert!(velocities.contains(&Vec2::new(l * 0.5, -l * 0.5)));
    // All three leave from the same muzzle.
    let first = pop.lasers.lasers().as_slice()[0].body.pos;
    assert!(pop.lasers.lasers().iter().all(|laser| laser.body.pos == first));
}

// ── Alien ────────────────────────────────────────────────────────────────────

#[test]
fn alien_bounces_off_left_edge() {
    let mut a = alien_at(Vec2::new(1.5, 10.0), Vec2::new(-4.5, 0.0));
    let half_width = a.body.size.x * 0.5;
    let row = a.body.size.y;
    move_alien(&mut a, 0.1, BOUNDS);
    assert_eq!(a.body.pos.x, half_width);
    assert_eq!(a.body.pos.y, 10.0 + row);
    assert!(a.velocity.x > 0.0);
}

#[test]
fn alien_bounces_off_right_edge() {
    let mut a = alien_at(Vec2::new(77.0, 10.0), Vec2::new(4.5, 0.0));
    move_alien(&mut a, 0.2, BOUNDS);
    assert_eq!(a.body.pos.x, 77.5);
    assert_eq!(a.body.pos.y, 12.0);
    assert!(a.velocity.x < 0.0);
}

#[test]
fn alien_in_open_space_keeps_row() {
    let mut a = alien_at(Vec2::new(40.0, 10.0), Vec2::new(4.5, 0.0));
    move_alien(&mut a, 0.1, BOUNDS);
    assert!((a.body.pos.x - 40.45).abs() < 1e-4);
    assert_eq!(a.body.pos.y, 10.0);
    assert_eq!(a.body.prev_pos, Vec2::new(40.0, 10.0));
}

#[test]
fn alien_bottom_bands() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut rng = seeded_rng();

    let mut high = alien_at(Vec2::new(40.0, 10.0), Vec2::ZERO);
    assert!(!update_alien(&mut high, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog));
    assert!(!high.is_terminal());

    let mut low = alien_at(Vec2::new(40.0, 38.5), Vec2::ZERO);
    assert!(update_alien(&mut low, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog));
    assert!(!low.is_terminal());

    let mut sunk = alien_at(Vec2::new(40.0, 39.5), Vec2::ZERO);
    assert!(update_alien(&mut sunk, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog));
    assert!(sunk.is_terminal());
}

#[test]
fn alien_evolves_then_transforms() {
    let config = GameConfig { alien_transform_rate: 1.0, ..GameConfig::default() };
    let mut pop = Population::new(&config);
    let mut rng = seeded_rng();
    let mut a = alien_at(Vec2::new(40.0, 10.0), Vec2::new(4.5, 0.0));
    a.energy = config.alien_transform_energy;

    update_alien(&mut a, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(a.state, AlienState::Evolving);

    update_alien(&mut a, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(a.state, AlienState::Better);
    assert!(a.velocity.x < 0.0);
    assert_eq!(a.health, 2);
}

#[test]
fn alien_fires_hostile_lasers() {
    let config = GameConfig::default();
    let mut pop = Population::new(&config);
    let mut rng = seeded_rng();
    let mut a = alien_at(Vec2::new(40.0, 10.0), Vec2::ZERO);
    a.fire_timer = 0.005;
    update_alien(&mut a, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);

    assert_eq!(pop.lasers.available_hostile(), config.max_alien_lasers - 1);
    let laser = &pop.lasers.lasers().as_slice()[0];
    assert_eq!(laser.collider_kind(), ColliderKind::AlienLaser);
    assert_eq!(laser.velocity, Vec2::new(0.0, config.alien_laser_velocity));
    assert_eq!(laser.body.pos, Vec2::new(40.0, 11.0));
}

#[test]
fn evolving_alien_rearms_at_better_fire_rate() {
    let config = GameConfig {
        alien_fire_rate: 10.0,
        better_alien_fire_rate: 1.0,
        alien_update_rate: 0.0,
        alien_transform_rate: 0.0,
        ..GameConfig::default()
    };
    let mut pop = Population::new(&config);
    let mut rng = seeded_rng();

    let mut normal = alien_at(Vec2::new(40.0, 10.0), Vec2::ZERO);
    update_alien(&mut normal, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(normal.state, AlienState::Normal);
    assert!(normal.fire_timer >= 10.0 - 0.01);

    let mut evolving = alien_at(Vec2::new(40.0, 10.0), Vec2::ZERO);
    evolving.state = AlienState::Evolving;
    update_alien(&mut evolving, 0.01, BOUNDS, &config, &mut rng, &mut pop.lasers, &DefaultCatalog);
    assert_eq!(evolving.state, AlienState::Evolving);
    assert!(evolving.fire_timer < 2.0);
}

// ── Lasers and power-ups ─────────────────────────────────────────────────────

#[test]
fn laser_leaving_top_goes_terminal() {
    let mut laser = friendly_laser();
    laser.body = Body::new(Vec2::new(40.0, 1.0), laser.body.size);
    move_laser(&mut laser, 0.1, BOUNDS);
    assert!(laser.is_terminal());
    assert_eq!(laser.body.prev_pos, Vec2::new(40.0, 1.0));
}

#[test]
fn power_up_falls_until_bottom() {
    let mut p = PowerUp::new(Vec2::new(20.0, 30.0), 8.0, PowerUpKind::Bomb, &DefaultCatalog);
    move_power_up(&mut p, 0.5, BOUNDS);
    assert_eq!(p.body.pos, Vec2::new(20.0, 34.0));
    assert!(!p.is_terminal());
    move_power_up(&mut p, 1.0, BOUNDS);
    assert!(p.is_terminal());
}
