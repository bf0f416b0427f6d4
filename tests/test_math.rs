use space_raiders::math::*;

#[test]
fn closest_normal_opposes_dominant_axis() {
    assert_eq!(closest_normal(Vec2::new(5.0, 1.0)), Vec2::new(-1.0, 0.0));
    assert_eq!(closest_normal(Vec2::new(-5.0, 1.0)), Vec2::new(1.0, 0.0));
    assert_eq!(closest_normal(Vec2::new(1.0, 5.0)), Vec2::new(0.0, -1.0));
    assert_eq!(closest_normal(Vec2::new(1.0, -5.0)), Vec2::new(0.0, 1.0));
}

#[test]
fn closest_normal_at_rest_points_up() {
    assert_eq!(closest_normal(Vec2::ZERO), Vec2::new(0.0, -1.0));
}

#[test]
fn reflecting_about_closest_normal_reverses_travel() {
    let v = Vec2::new(3.0, -2.0);
    let bounced = v.reflect(closest_normal(v));
    assert_eq!(bounced, Vec2::new(-3.0, -2.0));
}
