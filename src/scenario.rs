//! Table layouts
//!
//! A scenario places the coin, the hole, the striker and the board walls.
//! Random layouts are seeded so a given seed always builds the same table.

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::error::ShotError;
use crate::settings::Settings;
use crate::sim::{BodyKind, Collider, ShotController, World};

/// Coin→hole distance on the standard board (sink threshold ≈ 10.88 at g = 9.81)
pub const STANDARD_HOLE_DISTANCE: f32 = 6.034;

/// Board and body placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Scenario {
    pub coin: Vec2,
    pub coin_radius: f32,
    pub hole: Vec2,
    pub hole_radius: f32,
    pub striker_radius: f32,
    /// Board corners; the four edges are walls
    pub board_min: Vec2,
    pub board_max: Vec2,
    /// Extra obstacles inside the board
    #[serde(default)]
    pub obstacles: Vec<Collider>,
}

impl Scenario {
    /// The regular board: coin at the origin, hole straight above it
    pub fn standard() -> Self {
        Self {
            coin: Vec2::ZERO,
            coin_radius: 0.25,
            hole: Vec2::new(0.0, STANDARD_HOLE_DISTANCE),
            hole_radius: 0.35,
            striker_radius: 0.3,
            board_min: Vec2::new(-4.0, -3.0),
            board_max: Vec2::new(4.0, 7.0),
            obstacles: Vec::new(),
        }
    }

    /// Standard board with the coin and hole moved to seeded random spots
    pub fn random(seed: u64) -> Self {
        let mut rng = Pcg32::seed_from_u64(seed);
        let mut scenario = Self::standard();
        scenario.coin = Vec2::new(rng.random_range(-2.5..2.5), rng.random_range(-0.5..2.0));
        scenario.hole = Vec2::new(rng.random_range(-3.5..3.5), rng.random_range(4.5..6.5));
        log::debug!(
            "Scenario seed {}: coin {}, hole {}",
            seed,
            scenario.coin,
            scenario.hole
        );
        scenario
    }

    /// Parse a layout and check it
    pub fn from_json(json: &str) -> Result<Self, ShotError> {
        let scenario: Self = serde_json::from_str(json)?;
        scenario.validate()?;
        Ok(scenario)
    }

    /// Reject layouts the ray casts and threshold cannot work with
    pub fn validate(&self) -> Result<(), ShotError> {
        fn positive(name: &str, value: f32) -> Result<(), ShotError> {
            if value.is_finite() && value > 0.0 {
                Ok(())
            } else {
                Err(ShotError::Layout(format!(
                    "{} must be positive, got {}",
                    name, value
                )))
            }
        }

        positive("coin_radius", self.coin_radius)?;
        positive("hole_radius", self.hole_radius)?;
        positive("striker_radius", self.striker_radius)?;

        let corners_finite = self.board_min.is_finite() && self.board_max.is_finite();
        if !corners_finite || !self.board_min.cmplt(self.board_max).all() {
            return Err(ShotError::Layout(format!(
                "board_min {} must be below board_max {}",
                self.board_min, self.board_max
            )));
        }
        for (name, p) in [("coin", self.coin), ("hole", self.hole)] {
            let inside = p.cmpgt(self.board_min).all() && p.cmplt(self.board_max).all();
            if !inside {
                return Err(ShotError::Layout(format!("{} {} is off the board", name, p)));
            }
        }
        Ok(())
    }

    /// Four wall segments along the board edges
    pub fn walls(&self) -> [Collider; 4] {
        let (lo, hi) = (self.board_min, self.board_max);
        let corners = [lo, Vec2::new(hi.x, lo.y), hi, Vec2::new(lo.x, hi.y)];
        [0, 1, 2, 3].map(|i| Collider::segment(corners[i], corners[(i + 1) % 4]))
    }

    /// Build the query set; the striker starts at the middle of its baseline
    pub fn world(&self, settings: &Settings) -> World {
        let mut world = World::new();
        world.add(BodyKind::Coin, Collider::circle(self.coin, self.coin_radius));
        world.add(BodyKind::Hole, Collider::circle(self.hole, self.hole_radius));
        world.add(
            BodyKind::Striker,
            Collider::circle(
                Vec2::new(0.0, settings.striker_baseline_y),
                self.striker_radius,
            ),
        );
        for wall in self.walls() {
            world.add(BodyKind::Obstacle, wall);
        }
        for obstacle in &self.obstacles {
            world.add(BodyKind::Obstacle, *obstacle);
        }
        world
    }

    /// Shot controller over this board
    pub fn controller(&self, settings: Settings) -> Result<ShotController, ShotError> {
        self.validate()?;
        ShotController::new(self.world(&settings), settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_threshold() {
        let controller = Scenario::standard().controller(Settings::default()).unwrap();
        assert!((controller.sink_threshold() - 10.88).abs() < 0.01);
    }

    #[test]
    fn test_random_is_deterministic() {
        assert_eq!(Scenario::random(42), Scenario::random(42));
        assert_ne!(Scenario::random(42).coin, Scenario::random(43).coin);
    }

    #[test]
    fn test_random_stays_on_board() {
        for seed in 0..50 {
            let s = Scenario::random(seed);
            for p in [s.coin, s.hole] {
                assert!(p.cmpgt(s.board_min).all() && p.cmplt(s.board_max).all());
            }
        }
    }

    #[test]
    fn test_world_has_every_body_kind() {
        let world = Scenario::standard().world(&Settings::default());
        for kind in [BodyKind::Coin, BodyKind::Hole, BodyKind::Striker, BodyKind::Obstacle] {
            assert!(world.first_of(kind).is_some(), "missing {:?}", kind);
        }
        assert_eq!(
            world
                .bodies()
                .iter()
                .filter(|b| b.kind == BodyKind::Obstacle)
                .count(),
            4
        );
    }

    #[test]
    fn test_json_layout() {
        let json = serde_json::to_string(&Scenario::standard()).unwrap();
        let loaded = Scenario::from_json(&json).unwrap();
        assert_eq!(loaded, Scenario::standard());
    }

    #[test]
    fn test_striker_starts_on_configured_baseline() {
        let mut settings = Settings::default();
        settings.striker_baseline_y = -2.5;
        let world = Scenario::standard().world(&settings);
        let striker = world.first_of(BodyKind::Striker).unwrap();
        assert_eq!(striker.collider.center(), Vec2::new(0.0, -2.5));

        let controller = Scenario::standard().controller(settings).unwrap();
        let striker = controller.world().first_of(BodyKind::Striker).unwrap();
        assert_eq!(striker.collider.center().y, -2.5);
    }

    #[test]
    fn test_invalid_layouts_rejected() {
        let mut zero_coin = Scenario::standard();
        zero_coin.coin_radius = 0.0;
        let mut negative_hole = Scenario::standard();
        negative_hole.hole_radius = -0.35;
        let mut flipped = Scenario::standard();
        std::mem::swap(&mut flipped.board_min, &mut flipped.board_max);
        let mut off_board = Scenario::standard();
        off_board.hole = Vec2::new(0.0, 9.0);

        for scenario in [zero_coin, negative_hole, flipped, off_board] {
            let json = serde_json::to_string(&scenario).unwrap();
            assert!(matches!(
                Scenario::from_json(&json),
                Err(ShotError::Layout(_))
            ));
            assert!(scenario.controller(Settings::default()).is_err());
        }
        assert!(Scenario::standard().validate().is_ok());
    }
}
