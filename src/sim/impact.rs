//! Impact simulation: where the coin goes after the striker hits it
//!
//! The coin is sent straight away from the striker along the normal at the
//! contact point. This ignores the real dependence on impact offset and
//! mass; it is the rebound model the preview line is drawn from.

use glam::Vec2;
use serde::Serialize;

use super::body::{BodyId, BodyKind};
use super::ray::reflect;
use super::world::World;
use crate::settings::Settings;
use crate::{readout_angle_deg, to_meters};

/// Distance and angle for one leg of the shot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Readout {
    /// Straight-line distance in meters
    pub meters: f32,
    /// `180 - atan2(dy, dx)` in degrees
    pub angle_deg: f32,
}

impl Readout {
    pub fn between(from: Vec2, to: Vec2, scale: f32) -> Self {
        Self {
            meters: to_meters(from.distance(to), scale),
            angle_deg: readout_angle_deg(from, to),
        }
    }
}

/// Measurements shown alongside the preview
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ShotMeasurements {
    pub striker_to_coin: Readout,
    /// Absent when the table has no hole
    pub coin_to_hole: Option<Readout>,
}

impl ShotMeasurements {
    /// Readout text; the coin→hole leg only appears once the path reaches the hole
    pub fn describe(&self, reached_hole: bool) -> String {
        let mut text = format!(
            "Striker to Coin: {:.2} meters\nAngle (Striker → Coin): {:.2}°",
            self.striker_to_coin.meters, self.striker_to_coin.angle_deg
        );
        if let (true, Some(leg)) = (reached_hole, self.coin_to_hole) {
            text.push_str(&format!(
                "\nCoin to Hole: {:.2} meters\nAngle (Coin → Hole): {:.2}°",
                leg.meters, leg.angle_deg
            ));
        }
        text
    }
}

/// Where the striker meets the coin
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CoinImpact {
    pub coin: BodyId,
    pub point: Vec2,
    /// Outward coin surface normal at the contact point
    pub normal: Vec2,
    /// Initial coin direction (the negated normal)
    pub coin_direction: Vec2,
}

/// Predicted coin path for one aim direction
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ImpactPrediction {
    /// Polyline from just past the coin to the last cast end
    pub path: Vec<Vec2>,
    pub reached_hole: bool,
    pub impact: Option<CoinImpact>,
    pub measurements: Option<ShotMeasurements>,
}

impl ImpactPrediction {
    /// No coin on the striker's line
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.path.is_empty()
    }

    /// Readout text, empty when there is no prediction
    pub fn describe(&self) -> String {
        self.measurements
            .map(|m| m.describe(self.reached_hole))
            .unwrap_or_default()
    }
}

/// Predict the coin path for a striker shot along `direction`
///
/// Strikers are left out of the first cast and the struck coin is left out
/// of the bounce casts; both are back in the query set when this returns.
pub fn simulate_impact(
    world: &mut World,
    striker_pos: Vec2,
    direction: Vec2,
    settings: &Settings,
) -> ImpactPrediction {
    let direction = direction.normalize_or_zero();
    if direction == Vec2::ZERO {
        return ImpactPrediction::empty();
    }

    let strike = {
        let strikers_hidden = world.exclude_kind(BodyKind::Striker);
        strikers_hidden.raycast(striker_pos, direction, f32::INFINITY)
    };

    let Some(strike) = strike.filter(|h| h.kind == BodyKind::Coin) else {
        log::debug!("No coin along striker direction {}", direction);
        return ImpactPrediction::empty();
    };
    let Some(coin) = world.get(strike.body).map(|b| b.collider) else {
        return ImpactPrediction::empty();
    };

    let coin_center = coin.center();
    let coin_radius = coin.derived_radius();
    let hit_point = strike.hit.point;

    let mut normal = (hit_point - coin_center).normalize_or_zero();
    if normal == Vec2::ZERO {
        // Striker origin at the coin center
        normal = -direction;
    }
    let coin_direction = -normal;

    let start = hit_point + coin_direction * (coin_radius + settings.path_start_margin);
    let mut path = Vec::with_capacity(settings.max_bounces + 1);
    path.push(start);

    let mut reached_hole = false;
    let hole_center;
    {
        let coin_hidden = world.exclude(&[strike.body]);
        hole_center = coin_hidden
            .first_of(BodyKind::Hole)
            .map(|b| b.collider.center());

        let mut point = start;
        let mut dir = coin_direction;
        for _ in 0..settings.max_bounces {
            let Some(hit) = coin_hidden.raycast(point, dir, settings.cast_range) else {
                path.push(point + dir * settings.cast_range);
                break;
            };

            path.push(hit.hit.point);
            if hit.kind == BodyKind::Hole {
                reached_hole = true;
                break;
            }

            dir = reflect(dir, hit.hit.normal).normalize_or_zero();
            point = hit.hit.point + dir * settings.bounce_offset;
        }
    }

    let measurements = ShotMeasurements {
        striker_to_coin: Readout::between(striker_pos, coin_center, settings.distance_scale),
        coin_to_hole: hole_center
            .map(|hole| Readout::between(coin_center, hole, settings.distance_scale)),
    };

    log::debug!(
        "Coin path: {} points, reached hole: {}, coin direction {}",
        path.len(),
        reached_hole,
        coin_direction
    );

    ImpactPrediction {
        path,
        reached_hole,
        impact: Some(CoinImpact {
            coin: strike.body,
            point: hit_point,
            normal,
            coin_direction,
        }),
        measurements: Some(measurements),
    }
}
