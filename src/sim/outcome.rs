//! Hole outcome resolution
//!
//! When a body enters the hole trigger its contact speed is compared against
//! the sink threshold `T = sqrt(2 · d · g)`, where `d` is the coin→hole
//! distance. Faster bodies roll over the hole, slower ones stop at the rim,
//! and only a speed inside the sink band drops in.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::body::RigidBody;
use crate::settings::Settings;

/// Result of a body reaching the hole
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    TooFast,
    TooSlow,
    Sunk,
}

impl Outcome {
    /// Player-facing feedback line
    pub fn message(&self) -> &'static str {
        match self {
            Outcome::TooFast => "Too fast",
            Outcome::TooSlow => "Too slow",
            Outcome::Sunk => "Coin sunk!",
        }
    }
}

/// Speed needed to carry a body from the coin to the hole under `gravity`
pub fn sink_threshold(coin: Vec2, hole: Vec2, gravity: f32) -> f32 {
    (2.0 * coin.distance(hole) * gravity).sqrt()
}

/// Classify a contact speed
///
/// `band` is the half-width around `threshold` that sinks; zero means only
/// an exact match sinks. NaN speeds count as too slow.
pub fn classify(speed: f32, threshold: f32, band: f32) -> Outcome {
    if speed.is_nan() {
        return Outcome::TooSlow;
    }
    if speed > threshold + band {
        Outcome::TooFast
    } else if speed < threshold - band {
        Outcome::TooSlow
    } else {
        Outcome::Sunk
    }
}

/// Apply an outcome to a body at the hole
pub fn apply_outcome(body: &mut RigidBody, outcome: Outcome, hole: Vec2, overshoot_speed: f32) {
    match outcome {
        Outcome::TooFast => {
            body.velocity = body.velocity.normalize_or_zero() * overshoot_speed;
        }
        Outcome::TooSlow => {
            body.velocity = Vec2::ZERO;
        }
        Outcome::Sunk => {
            body.velocity = Vec2::ZERO;
            body.kinematic = true;
            body.position = hole;
        }
    }
}

/// Where a resolver is in its one-shot lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolutionState {
    Approaching,
    Resolved(Outcome),
}

/// One-shot hole trigger handler
///
/// Tracks one body: resolves its first entry into the hole and ignores
/// later triggers until reset.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleResolver {
    pub threshold: f32,
    pub band: f32,
    pub overshoot_speed: f32,
    state: ResolutionState,
}

impl HoleResolver {
    pub fn new(threshold: f32, settings: &Settings) -> Self {
        Self {
            threshold,
            band: settings.sink_band(),
            overshoot_speed: settings.overshoot_speed,
            state: ResolutionState::Approaching,
        }
    }

    /// Resolver for a table layout; uses the settings override when present
    pub fn for_table(coin: Vec2, hole: Vec2, settings: &Settings) -> Self {
        let threshold = settings
            .sink_threshold_override
            .unwrap_or_else(|| sink_threshold(coin, hole, settings.gravity));
        log::debug!("Sink threshold: {:.2}", threshold);
        Self::new(threshold, settings)
    }

    pub fn state(&self) -> ResolutionState {
        self.state
    }

    pub fn outcome(&self) -> Option<Outcome> {
        match self.state {
            ResolutionState::Approaching => None,
            ResolutionState::Resolved(outcome) => Some(outcome),
        }
    }

    /// Classify without touching any body
    pub fn classify(&self, speed: f32) -> Outcome {
        classify(speed, self.threshold, self.band)
    }

    /// Handle a body entering the hole trigger
    pub fn on_hole_triggered(&mut self, body: &mut RigidBody, hole: Vec2) -> Outcome {
        if let ResolutionState::Resolved(outcome) = self.state {
            log::debug!("Hole already resolved as {:?}, ignoring trigger", outcome);
            return outcome;
        }

        let speed = body.speed();
        let outcome = self.classify(speed);
        apply_outcome(body, outcome, hole, self.overshoot_speed);
        self.state = ResolutionState::Resolved(outcome);

        log::info!(
            "{} (contact speed {:.2}, threshold {:.2})",
            outcome.message(),
            speed,
            self.threshold
        );
        outcome
    }

    /// Start over for a new attempt
    pub fn reset(&mut self) {
        self.state = ResolutionState::Approaching;
    }
}
