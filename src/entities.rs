//! All entity kinds: plain data plus the few state transitions that must be
//! idempotent once an entity is terminal. Per-frame behavior lives in
//! `update`, contact semantics in `dispatch`.

use std::num::NonZeroU32;

use crate::catalog::{AlienProfile, Color, ImageId, ImageSizes, PlayerProfile, Visual};
use crate::math::{self, Vec2};

// ── Shared pieces ────────────────────────────────────────────────────────────

/// Position at the end of this step, position at the end of the previous
/// step, and bounding extents.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Body {
    pub pos: Vec2,
    pub prev_pos: Vec2,
    pub size: Vec2,
}

impl Body {
    pub fn new(pos: Vec2, size: Vec2) -> Self {
        Self { pos, prev_pos: pos, size }
    }

    /// Start a step: remember where we were, then move.
    pub fn step_to(&mut self, pos: Vec2) {
        self.prev_pos = self.pos;
        self.pos = pos;
    }

    pub fn half_size(&self) -> Vec2 {
        self.size * 0.5
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LifeState {
    Normal,
    Dead,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerId(pub u8);

/// Who fired a laser. Decides the capacity pool and the collider kind.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Owner {
    Player(PlayerId),
    Alien,
}

/// Collision category of an entity; also the dispatch-table key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ColliderKind {
    Player,
    Alien,
    PlayerLaser,
    AlienLaser,
    PowerUp,
    Wall,
}

/// Handle to an entity for the duration of one frame.
///
/// `generation` must match the owning pool's generation; every compaction
/// bumps it, so a handle never resolves past the end of its frame.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntityRef {
    pub kind: ColliderKind,
    pub index: u32,
    pub generation: u32,
}

/// What every collidable kind exposes to the population and collision code.
pub trait Collidable {
    fn collider_kind(&self) -> ColliderKind;
    fn body(&self) -> &Body;
    fn is_terminal(&self) -> bool;
    /// Flip to the terminal state unconditionally. Never removes anything.
    fn mark_terminal(&mut self);
}

// ── Player ───────────────────────────────────────────────────────────────────

/// Mutually exclusive multi-shot modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShotMode {
    Single,
    Double,
    Triple,
}

#[derive(Clone, Debug)]
pub struct Player {
    pub id: PlayerId,
    pub body: Body,
    /// Derived every step from the steering input.
    pub velocity: Vec2,
    pub visual: Visual,
    pub profile: PlayerProfile,
    pub state: LifeState,
    /// Two-phase fire timer: 0 means "re-arm next frame".
    pub fire_timer: f32,
    /// Multiplier on the shot interval (below 1 fires faster).
    pub fire_boost: f32,
    pub speed_boost: f32,
    /// Shared countdown for speed, fire-rate and multi-shot boosts.
    pub boost_timer: f32,
    pub shot_mode: ShotMode,
    pub invulnerability_time: f32,
    /// Running clock for the invulnerability flicker.
    pub accum_time: f32,
    /// Shots fired so far; parity picks the triple-shot muzzle side.
    pub laser_shots: u32,
    score: u32,
}

impl Player {
    pub fn new(id: PlayerId, pos: Vec2, profile: PlayerProfile, images: &dyn ImageSizes) -> Self {
        Self {
            id,
            body: Body::new(pos, images.image_size(profile.visual.image)),
            velocity: Vec2::ZERO,
            visual: profile.visual,
            profile,
            state: LifeState::Normal,
            fire_timer: 0.0,
            fire_boost: 1.0,
            speed_boost: 1.0,
            boost_timer: 0.0,
            shot_mode: ShotMode::Single,
            invulnerability_time: 0.0,
            accum_time: 0.0,
            laser_shots: 0,
            score: 0,
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// The only way a score changes.
    pub fn add_score(&mut self, increment: NonZeroU32) {
        self.score = self.score.saturating_add(increment.get());
    }

    pub fn is_shielded(&self) -> bool {
        self.invulnerability_time > 0.0
    }

    /// Lethal hit. A shield absorbs it; returns whether the player died now.
    pub fn destroy(&mut self) -> bool {
        if self.state == LifeState::Dead || self.is_shielded() {
            return false;
        }
        self.state = LifeState::Dead;
        true
    }

    pub fn set_speed_boost(&mut self, boost: f32, duration: f32) {
        self.speed_boost = boost;
        self.boost_timer = duration;
    }

    pub fn set_fire_boost(&mut self, boost: f32, duration: f32) {
        self.fire_boost = 1.0 / boost;
        self.boost_timer = duration;
    }

    pub fn set_double_fire(&mut self, duration: f32) {
        self.shot_mode = ShotMode::Double;
        self.boost_timer = duration;
    }

    pub fn set_triple_fire(&mut self, duration: f32) {
        self.shot_mode = ShotMode::Triple;
        self.boost_timer = duration;
    }

    pub fn set_invulnerable(&mut self, duration: f32) {
        self.invulnerability_time = duration;
    }

    /// Drop every boost back to baseline.
    pub fn clear_boosts(&mut self) {
        self.boost_timer = 0.0;
        self.speed_boost = 1.0;
        self.fire_boost = 1.0;
        self.shot_mode = ShotMode::Single;
    }
}

impl Collidable for Player {
    fn collider_kind(&self) -> ColliderKind {
        ColliderKind::Player
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_terminal(&self) -> bool {
        self.state == LifeState::Dead
    }

    fn mark_terminal(&mut self) {
        self.state = LifeState::Dead;
    }
}

// ── Alien ────────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AlienState {
    Normal,
    /// Enough energy collected; transforms on a successful per-frame roll.
    Evolving,
    Better,
    Dead,
}

/// A behavior profile with its resolved sprite size.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienStage {
    pub profile: AlienProfile,
    pub size: Vec2,
}

impl AlienStage {
    pub fn resolve(profile: AlienProfile, images: &dyn ImageSizes) -> Self {
        Self { profile, size: images.image_size(profile.visual.image) }
    }
}

#[derive(Clone, Debug)]
pub struct Alien {
    pub body: Body,
    pub velocity: Vec2,
    pub health: i32,
    pub energy: f32,
    pub fire_timer: f32,
    pub state: AlienState,
    pub normal: AlienStage,
    pub better: AlienStage,
}

impl Alien {
    pub fn new(
        pos: Vec2,
        velocity: Vec2,
        normal: AlienProfile,
        better: AlienProfile,
        images: &dyn ImageSizes,
    ) -> Self {
        let normal = AlienStage::resolve(normal, images);
        let better = AlienStage::resolve(better, images);
        Self {
            body: Body::new(pos, normal.size),
            velocity,
            health: normal.profile.health,
            energy: 0.0,
            fire_timer: 0.0,
            state: AlienState::Normal,
            normal,
            better,
        }
    }

    pub fn stage(&self) -> &AlienStage {
        if self.state == AlienState::Better {
            &self.better
        } else {
            &self.normal
        }
    }

    pub fn visual(&self) -> Visual {
        self.stage().profile.visual
    }

    /// One unit of damage. Returns true only on the hit that kills.
    pub fn decrease_health(&mut self) -> bool {
        if self.state == AlienState::Dead {
            return false;
        }
        self.health -= 1;
        if self.health <= 0 {
            self.state = AlienState::Dead;
            return true;
        }
        false
    }

    /// Switch to the evolved profile and turn around horizontally.
    pub fn transform(&mut self) {
        self.state = AlienState::Better;
        let sign = if self.velocity.x > 0.0 { -1.0 } else { 1.0 };
        self.velocity.x = self.better.profile.speed * sign;
        self.health = self.better.profile.health;
        self.body.size = self.better.size;
    }

    /// Bounce off a wall: reflect the velocity about the face the alien ran
    /// into and park it outside the wall box, `safe_distance` away.
    pub fn avoid_wall(&mut self, wall: &Body, safe_distance: f32) {
        let normal = math::closest_normal(self.velocity);
        let speed = self.velocity.length();
        let reflected = self.velocity.reflect(normal).normalize_or_zero();

        let reach = (wall.size + self.body.size) * 0.5;
        let mut pos = self.body.pos;
        if normal.x != 0.0 {
            pos.x = wall.pos.x + normal.x * (reach.x + safe_distance);
        } else {
            pos.y = wall.pos.y + normal.y * (reach.y + safe_distance);
        }
        // Teleport: no swept path back through the wall.
        self.body.pos = pos;
        self.body.prev_pos = pos;

        self.velocity = reflected * speed;
        self.velocity.y = self.velocity.y.max(0.0);
    }
}

impl Collidable for Alien {
    fn collider_kind(&self) -> ColliderKind {
        ColliderKind::Alien
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_terminal(&self) -> bool {
        self.state == AlienState::Dead
    }

    fn mark_terminal(&mut self) {
        self.state = AlienState::Dead;
    }
}

// ── Laser ────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Laser {
    pub body: Body,
    pub velocity: Vec2,
    pub visual: Visual,
    pub owner: Owner,
    pub state: LifeState,
}

impl Laser {
    pub fn new(pos: Vec2, velocity: Vec2, visual: Visual, owner: Owner, images: &dyn ImageSizes) -> Self {
        Self {
            body: Body::new(pos, images.image_size(visual.image)),
            velocity,
            visual,
            owner,
            state: LifeState::Normal,
        }
    }

    pub fn is_friendly(&self) -> bool {
        matches!(self.owner, Owner::Player(_))
    }

    pub fn destroy(&mut self) {
        self.state = LifeState::Dead;
    }
}

impl Collidable for Laser {
    fn collider_kind(&self) -> ColliderKind {
        match self.owner {
            Owner::Player(_) => ColliderKind::PlayerLaser,
            Owner::Alien => ColliderKind::AlienLaser,
        }
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_terminal(&self) -> bool {
        self.state == LifeState::Dead
    }

    fn mark_terminal(&mut self) {
        self.destroy();
    }
}

// ── Power-up ─────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PowerUpKind {
    SpeedBoost,
    FireBoost,
    DoubleFire,
    TripleFire,
    Invulnerability,
    Bomb,
}

impl PowerUpKind {
    pub const ALL: [PowerUpKind; 6] = [
        PowerUpKind::SpeedBoost,
        PowerUpKind::FireBoost,
        PowerUpKind::DoubleFire,
        PowerUpKind::TripleFire,
        PowerUpKind::Invulnerability,
        PowerUpKind::Bomb,
    ];

    pub fn visual(self) -> Visual {
        let image = match self {
            PowerUpKind::SpeedBoost => ImageId::SpeedPowerUp,
            PowerUpKind::FireBoost => ImageId::FirePowerUp,
            PowerUpKind::DoubleFire => ImageId::DoublePowerUp,
            PowerUpKind::TripleFire => ImageId::TriplePowerUp,
            PowerUpKind::Invulnerability => ImageId::InvulnerabilityPowerUp,
            PowerUpKind::Bomb => ImageId::Bomb,
        };
        Visual::new(image, Color::YellowIntense)
    }

    /// HUD text shown on pickup.
    pub fn message(self) -> &'static str {
        match self {
            PowerUpKind::SpeedBoost => "Speed Boost!",
            PowerUpKind::FireBoost => "Fire Boost!",
            PowerUpKind::DoubleFire => "Double Fire!",
            PowerUpKind::TripleFire => "Triple Fire!",
            PowerUpKind::Invulnerability => "Invulnerability!",
            PowerUpKind::Bomb => "Bomb!",
        }
    }
}

#[derive(Clone, Debug)]
pub struct PowerUp {
    pub body: Body,
    pub velocity: Vec2,
    pub kind: PowerUpKind,
    pub visual: Visual,
    pub state: LifeState,
}

impl PowerUp {
    pub fn new(pos: Vec2, fall_speed: f32, kind: PowerUpKind, images: &dyn ImageSizes) -> Self {
        let visual = kind.visual();
        Self {
            body: Body::new(pos, images.image_size(visual.image)),
            velocity: Vec2::new(0.0, fall_speed),
            kind,
            visual,
            state: LifeState::Normal,
        }
    }

    pub fn destroy(&mut self) {
        self.state = LifeState::Dead;
    }
}

impl Collidable for PowerUp {
    fn collider_kind(&self) -> ColliderKind {
        ColliderKind::PowerUp
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_terminal(&self) -> bool {
        self.state == LifeState::Dead
    }

    fn mark_terminal(&mut self) {
        self.destroy();
    }
}

// ── Wall ─────────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
pub struct Wall {
    pub body: Body,
    pub visual: Visual,
    pub state: LifeState,
    /// Hits left before the wall crumbles.
    pub hits: i32,
}

impl Wall {
    pub fn new(pos: Vec2, max_hits: i32, images: &dyn ImageSizes) -> Self {
        let visual = Visual::new(ImageId::Wall, Color::Yellow);
        Self {
            body: Body::new(pos, images.image_size(visual.image)),
            visual,
            state: LifeState::Normal,
            hits: max_hits,
        }
    }

    /// Returns true only on the hit that brings the wall down.
    pub fn hit(&mut self) -> bool {
        if self.state == LifeState::Dead {
            return false;
        }
        self.hits -= 1;
        if self.hits <= 0 {
            self.state = LifeState::Dead;
            return true;
        }
        false
    }
}

impl Collidable for Wall {
    fn collider_kind(&self) -> ColliderKind {
        ColliderKind::Wall
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn is_terminal(&self) -> bool {
        self.state == LifeState::Dead
    }

    fn mark_terminal(&mut self) {
        self.state = LifeState::Dead;
    }
}

// ── Explosion ────────────────────────────────────────────────────────────────

/// Purely visual; never collides.
#[derive(Clone, Debug)]
pub struct Explosion {
    pub pos: Vec2,
    pub visual: Visual,
    /// Seconds visible once the delay has passed.
    pub timer: f32,
    /// Seconds spent invisible before the countdown starts.
    pub delay: f32,
}

impl Explosion {
    pub fn new(pos: Vec2, timer: f32, delay: f32) -> Self {
        let image = if delay > 0.0 { ImageId::Null } else { ImageId::Explosion };
        Self {
            pos,
            visual: Visual::new(image, Color::YellowIntense),
            timer,
            delay,
        }
    }

    /// Advance one frame. Returns true once the explosion has run out.
    pub fn advance(&mut self, dt: f32) -> bool {
        if self.delay > dt {
            self.delay -= dt;
            self.visual.image = ImageId::Null;
        } else {
            self.delay = 0.0;
            self.visual.image = ImageId::Explosion;
            self.timer -= dt;
        }
        self.timer <= 0.0
    }
}
