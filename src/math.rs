//! Geometry helpers on top of `glam`.

pub use glam::Vec2;

/// Axis-aligned normal of the face a body moving along `velocity` runs into.
///
/// The dominant velocity component picks the axis; the normal points against
/// the motion. A body at rest is treated as falling onto a top face.
pub fn closest_normal(velocity: Vec2) -> Vec2 {
    if velocity.x.abs() > velocity.y.abs() {
        Vec2::new(-velocity.x.signum(), 0.0)
    } else if velocity.y != 0.0 {
        Vec2::new(0.0, -velocity.y.signum())
    } else {
        Vec2::NEG_Y
    }
}
