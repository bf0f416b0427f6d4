//! Visual tags and the two read-only lookups the simulation consumes:
//! image sizes and behavior profiles.
//!
//! The built-in [`DefaultCatalog`] carries the stock sprite sizes and ship
//! profiles. Front-ends with their own art implement the traits instead.

use crate::math::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ImageId {
    /// Nothing is drawn (used by explosions still in their pre-delay).
    Null,
    Player1,
    Player2,
    PlayerLaser,
    PlayerLaserLeft,
    PlayerLaserRight,
    AlienLaser,
    Alien,
    BetterAlien,
    Explosion,
    Wall,
    SpeedPowerUp,
    FirePowerUp,
    DoublePowerUp,
    TriplePowerUp,
    InvulnerabilityPowerUp,
    Bomb,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Color {
    White,
    Red,
    RedIntense,
    Green,
    GreenIntense,
    Blue,
    BlueIntense,
    LightBlueIntense,
    Yellow,
    YellowIntense,
    Purple,
    PurpleIntense,
}

/// Image reference plus color tag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Visual {
    pub image: ImageId,
    pub color: Color,
}

impl Visual {
    pub const fn new(image: ImageId, color: Color) -> Self {
        Self { image, color }
    }
}

/// Baseline stats for one enemy stage.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AlienProfile {
    pub visual: Visual,
    pub health: i32,
    /// Horizontal speed in world units per second.
    pub speed: f32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlayerProfile {
    pub visual: Visual,
    /// Color swapped in while invulnerable.
    pub invulnerable_color: Color,
    /// Horizontal speed in world units per second.
    pub velocity: f32,
    /// Lateral offset of the laser muzzles from the ship center.
    pub laser_offset: f32,
}

// ── Lookups ──────────────────────────────────────────────────────────────────

pub trait ImageSizes {
    /// Bounding size of an image in world units.
    fn image_size(&self, image: ImageId) -> Vec2;
}

pub trait ProfileCatalog {
    fn alien_profile(&self, id: usize) -> AlienProfile;
    fn player_profile(&self, id: usize) -> PlayerProfile;
}

// ── Stock tables ─────────────────────────────────────────────────────────────

const ALIEN_PROFILES: [AlienProfile; 8] = [
    AlienProfile { visual: Visual::new(ImageId::Alien, Color::GreenIntense), health: 1, speed: 4.5 },
    AlienProfile { visual: Visual::new(ImageId::BetterAlien, Color::RedIntense), health: 2, speed: 9.0 },
    AlienProfile { visual: Visual::new(ImageId::Alien, Color::BlueIntense), health: 1, speed: 5.0 },
    AlienProfile { visual: Visual::new(ImageId::BetterAlien, Color::PurpleIntense), health: 2, speed: 10.0 },
    AlienProfile { visual: Visual::new(ImageId::Alien, Color::YellowIntense), health: 2, speed: 5.5 },
    AlienProfile { visual: Visual::new(ImageId::BetterAlien, Color::RedIntense), health: 3, speed: 11.0 },
    AlienProfile { visual: Visual::new(ImageId::Alien, Color::White), health: 2, speed: 6.0 },
    AlienProfile { visual: Visual::new(ImageId::BetterAlien, Color::Purple), health: 4, speed: 12.0 },
];

const PLAYER_PROFILES: [PlayerProfile; 2] = [
    PlayerProfile {
        visual: Visual::new(ImageId::Player1, Color::White),
        invulnerable_color: Color::YellowIntense,
        velocity: 40.0,
        laser_offset: 1.0,
    },
    PlayerProfile {
        visual: Visual::new(ImageId::Player2, Color::LightBlueIntense),
        invulnerable_color: Color::YellowIntense,
        velocity: 40.0,
        laser_offset: 1.0,
    },
];

#[derive(Clone, Copy, Debug, Default)]
pub struct DefaultCatalog;

impl ImageSizes for DefaultCatalog {
    fn image_size(&self, image: ImageId) -> Vec2 {
        match image {
            ImageId::Null => Vec2::ZERO,
            ImageId::Player1 | ImageId::Player2 => Vec2::new(5.0, 2.0),
            ImageId::PlayerLaser
            | ImageId::PlayerLaserLeft
            | ImageId::PlayerLaserRight
            | ImageId::AlienLaser => Vec2::new(1.0, 1.0),
            ImageId::Alien => Vec2::new(5.0, 2.0),
            ImageId::BetterAlien => Vec2::new(5.0, 3.0),
            ImageId::Explosion => Vec2::new(3.0, 3.0),
            ImageId::Wall => Vec2::new(6.0, 2.0),
            ImageId::SpeedPowerUp
            | ImageId::FirePowerUp
            | ImageId::DoublePowerUp
            | ImageId::TriplePowerUp
            | ImageId::InvulnerabilityPowerUp
            | ImageId::Bomb => Vec2::new(5.0, 3.0),
        }
    }
}

impl ProfileCatalog for DefaultCatalog {
    /// Even ids are baseline stages, the following odd id is the evolved one.
    /// Out-of-range ids wrap around the table.
    fn alien_profile(&self, id: usize) -> AlienProfile {
        ALIEN_PROFILES[id % ALIEN_PROFILES.len()]
    }

    fn player_profile(&self, id: usize) -> PlayerProfile {
        PLAYER_PROFILES[id % PLAYER_PROFILES.len()]
    }
}
