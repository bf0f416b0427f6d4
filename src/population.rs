//! Owner of every per-kind collection.
//!
//! Entities are only ever added through spawn calls and only ever removed by
//! [`Population::compact`] at the end of a frame. Removal is swap-with-last
//! (`Vec::swap_remove`): order inside a kind carries no meaning.

use std::num::NonZeroU32;

use tracing::{debug, info, trace};

use crate::collision::{Collider, CollisionSpace};
use crate::config::GameConfig;
use crate::entities::{
    Alien, Body, Collidable, ColliderKind, EntityRef, Explosion, Laser, Player, PlayerId, PowerUp,
    Wall,
};
use crate::math::Vec2;

/// Remove every element matching `remove` in O(1) each, without preserving
/// order. Returns how many were removed.
fn swap_remove_where<T>(items: &mut Vec<T>, mut remove: impl FnMut(&mut T) -> bool) -> usize {
    let mut removed = 0;
    let mut i = 0;
    while i < items.len() {
        if remove(&mut items[i]) {
            items.swap_remove(i);
            removed += 1;
        } else {
            i += 1;
        }
    }
    removed
}

// ── Pool ─────────────────────────────────────────────────────────────────────

/// A kind collection with a generation counter for frame-scoped handles.
#[derive(Clone, Debug)]
pub struct Pool<T> {
    items: Vec<T>,
    generation: u32,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self { items: Vec::new(), generation: 0 }
    }
}

impl<T> Pool<T> {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Mutable access to the live entities. The set itself cannot change.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.items
    }

    pub fn get(&self, handle: EntityRef) -> Option<&T> {
        if handle.generation != self.generation {
            return None;
        }
        self.items.get(handle.index as usize)
    }

    pub fn get_mut(&mut self, handle: EntityRef) -> Option<&mut T> {
        if handle.generation != self.generation {
            return None;
        }
        self.items.get_mut(handle.index as usize)
    }

    /// Two distinct entities of the same pool at once.
    pub fn get_pair_mut(&mut self, a: EntityRef, b: EntityRef) -> Option<(&mut T, &mut T)> {
        if a.generation != self.generation || b.generation != self.generation {
            return None;
        }
        let (i, j) = (a.index as usize, b.index as usize);
        if i == j || i >= self.items.len() || j >= self.items.len() {
            return None;
        }
        if i < j {
            let (lo, hi) = self.items.split_at_mut(j);
            Some((&mut lo[i], &mut hi[0]))
        } else {
            let (lo, hi) = self.items.split_at_mut(i);
            Some((&mut hi[0], &mut lo[j]))
        }
    }

    pub(crate) fn push(&mut self, item: T) {
        self.items.push(item);
    }

    pub(crate) fn clear(&mut self) {
        self.items.clear();
        self.generation = self.generation.wrapping_add(1);
    }

    /// Drop entities matching `remove`; invalidates every outstanding handle.
    pub(crate) fn compact(&mut self, remove: impl FnMut(&mut T) -> bool) -> usize {
        let removed = swap_remove_where(&mut self.items, remove);
        self.generation = self.generation.wrapping_add(1);
        removed
    }
}

impl<T: Collidable> Pool<T> {
    /// Handle for the entity currently at `index`.
    pub fn handle(&self, index: usize) -> Option<EntityRef> {
        self.items.get(index).map(|item| EntityRef {
            kind: item.collider_kind(),
            index: index as u32,
            generation: self.generation,
        })
    }

    fn add_colliders(&self, space: &mut CollisionSpace) {
        for (index, item) in self.items.iter().enumerate() {
            if item.is_terminal() {
                continue;
            }
            let handle = EntityRef {
                kind: item.collider_kind(),
                index: index as u32,
                generation: self.generation,
            };
            space.add(Collider::new(handle, item.body()));
        }
    }

    fn is_live(&self, handle: EntityRef) -> bool {
        self.get(handle).is_some_and(|item| !item.is_terminal())
    }

    fn mark_terminal(&mut self, handle: EntityRef) -> bool {
        match self.get_mut(handle) {
            Some(item) if !item.is_terminal() => {
                item.mark_terminal();
                true
            }
            _ => false,
        }
    }
}

// ── Laser capacity ───────────────────────────────────────────────────────────

/// Lasers plus the two capacity counters that bound them.
///
/// For both owner classes `live + available == max` holds between frames:
/// a spawn takes a slot, compaction of a dead laser gives it back.
#[derive(Clone, Debug)]
pub struct LaserBank {
    lasers: Pool<Laser>,
    max_friendly: u32,
    max_hostile: u32,
    available_friendly: u32,
    available_hostile: u32,
}

impl LaserBank {
    pub fn new(max_friendly: u32, max_hostile: u32) -> Self {
        Self {
            lasers: Pool::default(),
            max_friendly,
            max_hostile,
            available_friendly: max_friendly,
            available_hostile: max_hostile,
        }
    }

    pub fn lasers(&self) -> &Pool<Laser> {
        &self.lasers
    }

    pub fn lasers_mut(&mut self) -> &mut Pool<Laser> {
        &mut self.lasers
    }

    pub fn available_friendly(&self) -> u32 {
        self.available_friendly
    }

    pub fn available_hostile(&self) -> u32 {
        self.available_hostile
    }

    pub fn max_friendly(&self) -> u32 {
        self.max_friendly
    }

    pub fn max_hostile(&self) -> u32 {
        self.max_hostile
    }

    /// Take a slot from the owner's pool. Returns false, and drops the
    /// laser, when the pool is exhausted.
    pub fn spawn(&mut self, laser: Laser) -> bool {
        let available = if laser.is_friendly() {
            &mut self.available_friendly
        } else {
            &mut self.available_hostile
        };
        if *available == 0 {
            trace!(owner = ?laser.owner, "laser spawn refused, pool exhausted");
            return false;
        }
        *available -= 1;
        self.lasers.push(laser);
        true
    }

    fn compact(&mut self) -> usize {
        let (friendly, hostile) = (&mut self.available_friendly, &mut self.available_hostile);
        self.lasers.compact(|laser| {
            if !laser.is_terminal() {
                return false;
            }
            if laser.is_friendly() {
                *friendly += 1;
            } else {
                *hostile += 1;
            }
            true
        })
    }

    fn reset(&mut self) {
        self.lasers.clear();
        self.available_friendly = self.max_friendly;
        self.available_hostile = self.max_hostile;
    }
}

// ── Population ───────────────────────────────────────────────────────────────

/// A player removed from the field and the score it finished with.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RetiredScore {
    pub id: PlayerId,
    pub score: u32,
}

#[derive(Clone, Debug)]
pub struct Population {
    pub players: Pool<Player>,
    pub aliens: Pool<Alien>,
    pub lasers: LaserBank,
    pub power_ups: Pool<PowerUp>,
    pub walls: Pool<Wall>,
    pub explosions: Vec<Explosion>,
    retired: Vec<RetiredScore>,
}

impl Population {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            players: Pool::default(),
            aliens: Pool::default(),
            lasers: LaserBank::new(config.max_player_lasers, config.max_alien_lasers),
            power_ups: Pool::default(),
            walls: Pool::default(),
            explosions: Vec::new(),
            retired: Vec::new(),
        }
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    pub fn add_player(&mut self, player: Player) {
        self.players.push(player);
    }

    pub fn add_alien(&mut self, alien: Alien) {
        self.aliens.push(alien);
    }

    pub fn add_wall(&mut self, wall: Wall) {
        self.walls.push(wall);
    }

    pub fn add_power_up(&mut self, power_up: PowerUp) {
        self.power_ups.push(power_up);
    }

    pub fn add_explosion(&mut self, pos: Vec2, timer: f32, delay: f32) {
        self.explosions.push(Explosion::new(pos, timer, delay));
    }

    /// Capacity-gated; see [`LaserBank::spawn`].
    pub fn spawn_laser(&mut self, laser: Laser) -> bool {
        self.lasers.spawn(laser)
    }

    // ── Handles ──────────────────────────────────────────────────────────────

    /// True while the handle resolves to a non-terminal entity.
    pub fn is_live(&self, handle: EntityRef) -> bool {
        match handle.kind {
            ColliderKind::Player => self.players.is_live(handle),
            ColliderKind::Alien => self.aliens.is_live(handle),
            ColliderKind::PlayerLaser | ColliderKind::AlienLaser => self.lasers.lasers.is_live(handle),
            ColliderKind::PowerUp => self.power_ups.is_live(handle),
            ColliderKind::Wall => self.walls.is_live(handle),
        }
    }

    pub fn body(&self, handle: EntityRef) -> Option<Body> {
        match handle.kind {
            ColliderKind::Player => self.players.get(handle).map(|e| e.body),
            ColliderKind::Alien => self.aliens.get(handle).map(|e| e.body),
            ColliderKind::PlayerLaser | ColliderKind::AlienLaser => {
                self.lasers.lasers.get(handle).map(|e| e.body)
            }
            ColliderKind::PowerUp => self.power_ups.get(handle).map(|e| e.body),
            ColliderKind::Wall => self.walls.get(handle).map(|e| e.body),
        }
    }

    /// Flip an entity to terminal. Removal waits for [`Population::compact`].
    /// Returns false if it was already terminal or the handle is stale.
    pub fn mark_terminal(&mut self, handle: EntityRef) -> bool {
        match handle.kind {
            ColliderKind::Player => self.players.mark_terminal(handle),
            ColliderKind::Alien => self.aliens.mark_terminal(handle),
            ColliderKind::PlayerLaser | ColliderKind::AlienLaser => {
                self.lasers.lasers.mark_terminal(handle)
            }
            ColliderKind::PowerUp => self.power_ups.mark_terminal(handle),
            ColliderKind::Wall => self.walls.mark_terminal(handle),
        }
    }

    /// Credit a player still in the pool, including one that went terminal
    /// earlier this frame. Zero amounts are not increments and are ignored.
    pub fn credit(&mut self, id: PlayerId, amount: u32) -> bool {
        let Some(increment) = NonZeroU32::new(amount) else {
            return false;
        };
        match self
            .players
            .as_mut_slice()
            .iter_mut()
            .find(|p| p.id == id)
        {
            Some(player) => {
                player.add_score(increment);
                true
            }
            None => false,
        }
    }

    // ── Frame boundaries ─────────────────────────────────────────────────────

    /// Feed every live collidable into the collision space.
    pub fn collect_colliders(&self, space: &mut CollisionSpace) {
        self.players.add_colliders(space);
        self.aliens.add_colliders(space);
        self.lasers.lasers.add_colliders(space);
        self.power_ups.add_colliders(space);
        self.walls.add_colliders(space);
    }

    /// End-of-frame removal of every terminal entity. Explosions advance
    /// their countdown here, once per frame, and go when it runs out.
    pub fn compact(&mut self, dt: f32) -> usize {
        let retired = &mut self.retired;
        let mut removed = self.players.compact(|player| {
            if player.is_terminal() {
                debug!(player = player.id.0, score = player.score(), "player retired");
                retired.push(RetiredScore { id: player.id, score: player.score() });
                true
            } else {
                false
            }
        });
        removed += self.aliens.compact(|alien| alien.is_terminal());
        removed += self.lasers.compact();
        removed += self.power_ups.compact(|power_up| power_up.is_terminal());
        removed += self.walls.compact(|wall| wall.is_terminal());
        removed += swap_remove_where(&mut self.explosions, |explosion| explosion.advance(dt));
        removed
    }

    /// Clear every collection and refill both laser pools.
    pub fn reset(&mut self) {
        self.players.clear();
        self.aliens.clear();
        self.lasers.reset();
        self.power_ups.clear();
        self.walls.clear();
        self.explosions.clear();
        self.retired.clear();
        info!("population reset");
    }

    pub fn retired_scores(&self) -> &[RetiredScore] {
        &self.retired
    }

    pub fn live_aliens(&self) -> usize {
        self.aliens.iter().filter(|a| !a.is_terminal()).count()
    }
}
