//! Swept collision detection.
//!
//! Each collider is the box its entity occupied while moving from
//! `prev_pos` to `pos` this step. A fast laser can travel further than its
//! target is tall, so testing end positions alone would let it tunnel
//! through. Instead two colliders touch when their boxes overlap at any
//! instant of the step, assuming both move linearly: in the frame of `b`,
//! `a` sweeps a segment which is tested against `b`'s box inflated by half
//! of each size.
//!
//! Broad phase buckets the swept bounds into a uniform grid; a pair is only
//! examined in the one cell holding the min corner of the overlap of its
//! swept bounds, so it is reported at most once.

use tracing::trace;

use crate::entities::{Body, ColliderKind, EntityRef};
use crate::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Collider {
    pub handle: EntityRef,
    pub prev_pos: Vec2,
    pub pos: Vec2,
    pub size: Vec2,
}

impl Collider {
    pub fn new(handle: EntityRef, body: &Body) -> Self {
        Self { handle, prev_pos: body.prev_pos, pos: body.pos, size: body.size }
    }

    pub fn kind(&self) -> ColliderKind {
        self.handle.kind
    }

    /// Bounds covering the whole sweep.
    fn swept_min(&self) -> Vec2 {
        self.prev_pos.min(self.pos) - self.size * 0.5
    }

    fn swept_max(&self) -> Vec2 {
        self.prev_pos.max(self.pos) + self.size * 0.5
    }
}

/// Two entities in contact this frame. Orientation is arbitrary.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Contact {
    pub a: EntityRef,
    pub b: EntityRef,
}

// ── Narrow phase ─────────────────────────────────────────────────────────────

/// True if the two moving boxes overlap at some instant of the step.
/// Boxes that only touch do not count.
pub fn swept_overlap(a: &Collider, b: &Collider) -> bool {
    let start = a.prev_pos - b.prev_pos;
    let end = a.pos - b.pos;
    let half = (a.size + b.size) * 0.5;
    segment_hits_box(start, end, half)
}

/// Slab test of segment `start..end` against the open box `(-half, half)`.
pub fn segment_hits_box(start: Vec2, end: Vec2, half: Vec2) -> bool {
    let delta = end - start;
    let mut t_enter = 0.0f32;
    let mut t_exit = 1.0f32;

    for (p, d, h) in [(start.x, delta.x, half.x), (start.y, delta.y, half.y)] {
        if d == 0.0 {
            if p.abs() >= h {
                return false;
            }
            continue;
        }
        let inv = 1.0 / d;
        let mut t0 = (-h - p) * inv;
        let mut t1 = (h - p) * inv;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
        }
        t_enter = t_enter.max(t0);
        t_exit = t_exit.min(t1);
        if t_enter >= t_exit {
            return false;
        }
    }
    true
}

// ── Broad phase ──────────────────────────────────────────────────────────────

/// Per-frame collision space. Buffers are kept between frames.
#[derive(Debug)]
pub struct CollisionSpace {
    cell_size: f32,
    cols: usize,
    rows: usize,
    buckets: Vec<Vec<u32>>,
    colliders: Vec<Collider>,
    contacts: Vec<Contact>,
    capacity: usize,
    overflowed: bool,
}

impl CollisionSpace {
    /// `bounds` is the world size; anything outside lands in the edge cells.
    pub fn new(bounds: Vec2, cell_size: f32, capacity: usize) -> Self {
        let cell_size = cell_size.max(1.0);
        let cols = ((bounds.x / cell_size).ceil() as usize).max(1);
        let rows = ((bounds.y / cell_size).ceil() as usize).max(1);
        Self {
            cell_size,
            cols,
            rows,
            buckets: vec![Vec::new(); cols * rows],
            colliders: Vec::new(),
            contacts: Vec::with_capacity(capacity),
            capacity,
            overflowed: false,
        }
    }

    pub fn clear(&mut self) {
        self.colliders.clear();
        self.contacts.clear();
        self.overflowed = false;
    }

    pub fn add(&mut self, collider: Collider) {
        self.colliders.push(collider);
    }

    pub fn len(&self) -> usize {
        self.colliders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colliders.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Whether the last `execute` stopped at the contact cap.
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }

    fn cell_of(&self, p: Vec2) -> (usize, usize) {
        let clamp = |v: f32, n: usize| ((v / self.cell_size).floor().max(0.0) as usize).min(n - 1);
        (clamp(p.x, self.cols), clamp(p.y, self.rows))
    }

    /// Find every contact between pairs of kinds `accept` cares about, up to
    /// the capacity. Contacts past the cap are not reported.
    pub fn execute(&mut self, accept: impl Fn(ColliderKind, ColliderKind) -> bool) -> &[Contact] {
        self.contacts.clear();
        self.overflowed = false;
        for bucket in &mut self.buckets {
            bucket.clear();
        }

        for (i, collider) in self.colliders.iter().enumerate() {
            let (x0, y0) = self.cell_of(collider.swept_min());
            let (x1, y1) = self.cell_of(collider.swept_max());
            for y in y0..=y1 {
                for x in x0..=x1 {
                    self.buckets[y * self.cols + x].push(i as u32);
                }
            }
        }

        'cells: for cell in 0..self.buckets.len() {
            let bucket = &self.buckets[cell];
            for (n, &i) in bucket.iter().enumerate() {
                for &j in &bucket[n + 1..] {
                    let a = &self.colliders[i as usize];
                    let b = &self.colliders[j as usize];
                    if !accept(a.kind(), b.kind()) {
                        continue;
                    }
                    let (cx, cy) = self.cell_of(a.swept_min().max(b.swept_min()));
                    if cy * self.cols + cx != cell {
                        continue;
                    }
                    if !swept_overlap(a, b) {
                        continue;
                    }
                    if self.contacts.len() == self.capacity {
                        self.overflowed = true;
                        trace!(capacity = self.capacity, "contact list full, dropping the rest");
                        break 'cells;
                    }
                    self.contacts.push(Contact { a: a.handle, b: b.handle });
                }
            }
        }

        &self.contacts
    }

    pub fn contacts(&self) -> &[Contact] {
        &self.contacts
    }
}
