//! The play field: one world, one population, one frame at a time.
//!
//! [`PlayField::update`] runs the per-kind update of every live entity,
//! collects colliders, resolves the frame's contacts through the dispatch
//! table and finally compacts every collection. Nothing in here blocks and
//! nothing is retained across frames except the population itself.

use rand::{Rng, RngCore};
use tracing::{debug, info};

use crate::catalog::{DefaultCatalog, ImageId, ImageSizes, ProfileCatalog, Visual};
use crate::collision::CollisionSpace;
use crate::config::GameConfig;
use crate::dispatch::{self, Resolver};
use crate::entities::{Alien, Collidable, PlayerId, Player, PowerUp, PowerUpKind, Wall};
use crate::math::Vec2;
use crate::ports::{AlienScript, MessageSink, Steering};
use crate::population::Population;
use crate::update;

/// Something to draw this frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderItem {
    pub pos: Vec2,
    pub visual: Visual,
}

/// What one frame produced for the meta-state layer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FrameReport {
    /// An alien entered the loss band at the bottom of the screen.
    pub bottom_reached: bool,
    /// Contacts that fired a handler.
    pub contacts: usize,
    /// The contact list hit its cap and later contacts were not reported.
    pub contacts_dropped: bool,
}

/// A row of aliens entering from the top of the screen.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienWave {
    pub count: usize,
    /// Horizontal distance between neighbors.
    pub spacing: f32,
    /// Vertical position of the row.
    pub row_y: f32,
    /// +1 travels right, -1 travels left.
    pub direction: f32,
    /// Profile ids in the catalog.
    pub normal_profile: usize,
    pub better_profile: usize,
}

/// A run of walls placed edge to edge, starting at `x`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallRow {
    pub count: usize,
    pub x: f32,
    pub y: f32,
}

pub struct PlayField<C = DefaultCatalog> {
    bounds: Vec2,
    config: GameConfig,
    catalog: C,
    population: Population,
    collisions: CollisionSpace,
}

impl PlayField<DefaultCatalog> {
    pub fn new(bounds: Vec2, config: GameConfig) -> Self {
        Self::with_catalog(bounds, config, DefaultCatalog)
    }
}

impl<C: ImageSizes + ProfileCatalog> PlayField<C> {
    pub fn with_catalog(bounds: Vec2, config: GameConfig, catalog: C) -> Self {
        let collisions = CollisionSpace::new(bounds, config.grid_cell_size, config.max_contacts);
        Self {
            bounds,
            population: Population::new(&config),
            config,
            catalog,
            collisions,
        }
    }

    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn catalog(&self) -> &C {
        &self.catalog
    }

    pub fn population(&self) -> &Population {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population {
        &mut self.population
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// Place a player at the bottom of the screen, horizontally at `x`.
    pub fn spawn_player(&mut self, id: PlayerId, x: f32) {
        let profile = self.catalog.player_profile(usize::from(id.0));
        let size = self.catalog.image_size(profile.visual.image);
        let pos = Vec2::new(x, self.bounds.y - size.y);
        self.population
            .add_player(Player::new(id, pos, profile, &self.catalog));
        debug!(player = id.0, x, "player spawned");
    }

    pub fn spawn_alien(&mut self, pos: Vec2, direction: f32, normal_profile: usize, better_profile: usize) {
        let normal = self.catalog.alien_profile(normal_profile);
        let better = self.catalog.alien_profile(better_profile);
        let velocity = Vec2::new(normal.speed * direction.signum(), 0.0);
        self.population
            .add_alien(Alien::new(pos, velocity, normal, better, &self.catalog));
    }

    /// Spawn a wave. Aliens start on the side they travel away from and
    /// anything that would land off screen is skipped.
    pub fn spawn_wave(&mut self, wave: &AlienWave) -> usize {
        let width = self
            .catalog
            .image_size(self.catalog.alien_profile(wave.normal_profile).visual.image)
            .x;
        let mut spawned = 0;
        for i in 0..wave.count {
            let offset = width * 0.5 + i as f32 * wave.spacing;
            let x = if wave.direction < 0.0 { self.bounds.x - offset } else { offset };
            if x < width * 0.5 || x > self.bounds.x - width * 0.5 {
                continue;
            }
            self.spawn_alien(Vec2::new(x, wave.row_y), wave.direction, wave.normal_profile, wave.better_profile);
            spawned += 1;
        }
        info!(aliens = spawned, y = wave.row_y, "wave spawned");
        spawned
    }

    pub fn spawn_wall(&mut self, pos: Vec2) {
        self.population
            .add_wall(Wall::new(pos, self.config.wall_max_hits, &self.catalog));
    }

    pub fn spawn_walls(&mut self, row: &WallRow) {
        let width = self.catalog.image_size(ImageId::Wall).x;
        for i in 0..row.count {
            self.spawn_wall(Vec2::new(row.x + i as f32 * width, row.y));
        }
    }

    pub fn spawn_power_up(&mut self, pos: Vec2, kind: PowerUpKind) {
        self.population.add_power_up(PowerUp::new(
            pos,
            self.config.power_up_velocity,
            kind,
            &self.catalog,
        ));
    }

    // ── Round state ──────────────────────────────────────────────────────────

    /// Drop every entity and refill the laser pools.
    pub fn reset(&mut self) {
        self.population.reset();
        self.collisions.clear();
    }

    pub fn no_aliens(&self) -> bool {
        self.population.live_aliens() == 0
    }

    pub fn no_players(&self) -> bool {
        self.population.players.iter().all(|p| p.is_terminal())
    }

    /// Score of every player this round, live or retired, ordered by id.
    pub fn scores(&self) -> Vec<(PlayerId, u32)> {
        let mut scores: Vec<_> = self
            .population
            .players
            .iter()
            .map(|p| (p.id, p.score()))
            .chain(self.population.retired_scores().iter().map(|r| (r.id, r.score)))
            .collect();
        scores.sort_by_key(|&(id, _)| id);
        scores
    }

    // ── Frame ────────────────────────────────────────────────────────────────

    /// Advance the world by `dt`.
    ///
    /// `inputs` is indexed by player id; players without an entry idle.
    /// `script`, if given, may override alien steering for this frame only.
    pub fn update<R: Rng>(
        &mut self,
        dt: f32,
        rng: &mut R,
        inputs: &[Steering],
        script: Option<&dyn AlienScript>,
        messages: &mut dyn MessageSink,
    ) -> FrameReport {
        let bounds = self.bounds;
        let config = &self.config;
        let images: &dyn ImageSizes = &self.catalog;
        let population = &mut self.population;
        let mut report = FrameReport::default();

        // Movement and state machines.
        let aliens_remain = population.live_aliens() > 0;
        for player in population.players.as_mut_slice() {
            if player.is_terminal() {
                continue;
            }
            let steering = inputs
                .get(usize::from(player.id.0))
                .copied()
                .unwrap_or_default();
            update::move_player(player, steering, dt, bounds);
            if aliens_remain {
                update::fire_player(player, dt, config, rng, &mut population.lasers, images);
            }
        }

        for power_up in population.power_ups.as_mut_slice() {
            if !power_up.is_terminal() {
                update::move_power_up(power_up, dt, bounds);
            }
        }

        for laser in population.lasers.lasers_mut().as_mut_slice() {
            if !laser.is_terminal() {
                update::move_laser(laser, dt, bounds);
            }
        }

        for alien in population.aliens.as_mut_slice() {
            if alien.is_terminal() {
                continue;
            }
            if let Some(velocity) = script.and_then(|s| s.steer(alien, bounds, dt)) {
                alien.velocity = velocity;
            }
            update::move_alien(alien, dt, bounds);
            report.bottom_reached |=
                update::update_alien(alien, dt, bounds, config, rng, &mut population.lasers, images);
        }

        // Detection and resolution.
        self.collisions.clear();
        population.collect_colliders(&mut self.collisions);
        self.collisions.execute(dispatch::handles);
        report.contacts_dropped = self.collisions.overflowed();
        let contacts = self.collisions.contacts();

        let mut resolver = Resolver {
            population,
            config,
            bounds,
            images,
            rng: rng as &mut dyn RngCore,
            messages,
        };
        report.contacts = dispatch::resolve_all(&mut resolver, contacts);

        self.population.compact(dt);
        report
    }

    /// Every visible entity, in draw order: walls, power-ups, aliens,
    /// lasers, players, explosions.
    pub fn render_items(&self) -> Vec<RenderItem> {
        let p = &self.population;
        let mut items = Vec::new();
        items.extend(p.walls.iter().map(|w| RenderItem { pos: w.body.pos, visual: w.visual }));
        items.extend(p.power_ups.iter().map(|u| RenderItem { pos: u.body.pos, visual: u.visual }));
        items.extend(p.aliens.iter().map(|a| RenderItem { pos: a.body.pos, visual: a.visual() }));
        items.extend(p.lasers.lasers().iter().map(|l| RenderItem { pos: l.body.pos, visual: l.visual }));
        items.extend(p.players.iter().map(|s| RenderItem { pos: s.body.pos, visual: s.visual }));
        items.extend(p.explosions.iter().map(|e| RenderItem { pos: e.pos, visual: e.visual }));
        items
    }
}
