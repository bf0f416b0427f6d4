//! Narrow interfaces to the collaborators around the simulation core:
//! input sampling, the scripted alien behavior hook and the message sink.

use rand::{Rng, RngCore};

use crate::entities::Alien;
use crate::math::Vec2;

// ── Input ────────────────────────────────────────────────────────────────────

/// Horizontal polarity requested for one craft this frame.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Steering {
    pub left: bool,
    pub right: bool,
}

impl Steering {
    pub const NEUTRAL: Steering = Steering { left: false, right: false };
    pub const LEFT: Steering = Steering { left: true, right: false };
    pub const RIGHT: Steering = Steering { left: false, right: true };
}

/// A source of steering for one craft: keyboard, replay, or AI.
pub trait InputSource {
    fn sample(&mut self, dt: f32, rng: &mut dyn RngCore) -> Steering;
}

/// CPU pilot that re-rolls left / idle / right every quarter second.
#[derive(Clone, Debug, Default)]
pub struct RandomInput {
    accum_time: f32,
    current: Steering,
}

impl RandomInput {
    const REROLL_INTERVAL: f32 = 0.25;

    pub fn new() -> Self {
        Self::default()
    }
}

impl InputSource for RandomInput {
    fn sample(&mut self, dt: f32, rng: &mut dyn RngCore) -> Steering {
        self.accum_time += dt;
        if self.accum_time > Self::REROLL_INTERVAL {
            self.accum_time = 0.0;
            self.current = match rng.gen_range(0..3) {
                0 => Steering::LEFT,
                1 => Steering::NEUTRAL,
                _ => Steering::RIGHT,
            };
        }
        self.current
    }
}

// ── Scripted behavior ────────────────────────────────────────────────────────

/// Externally supplied alien behavior.
///
/// The hook is passed into every frame and never stored, so it can be
/// swapped (or reloaded) between any two frames.
pub trait AlienScript {
    /// Return a velocity to replace the alien's current one, or `None` to
    /// keep the built-in behavior.
    fn steer(&self, alien: &Alien, world_bounds: Vec2, dt: f32) -> Option<Vec2>;
}

// ── Messages ─────────────────────────────────────────────────────────────────

/// Receives short notifications ("Speed Boost!") for the HUD.
pub trait MessageSink {
    fn push_message(&mut self, text: &str);
}

impl MessageSink for Vec<String> {
    fn push_message(&mut self, text: &str) {
        self.push(text.to_owned());
    }
}
