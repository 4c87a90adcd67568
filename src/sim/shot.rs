//! Shot controller: the host-facing entry points for one attempt
//!
//! A host wires its input callbacks to these calls:
//! - slider change → [`ShotController::place_striker`]
//! - pointer down/move/up → [`ShotController::on_drag_start`],
//!   [`ShotController::on_drag_update`], [`ShotController::on_drag_end`]
//! - speed text submitted → [`ShotController::submit_speed`]
//! - body entered hole trigger → [`ShotController::on_hole_triggered`]
//!
//! Per-attempt state lives in [`ShotAttempt`], owned by the caller and passed
//! through every call.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::aim::{aim_line, compute_aim, launch_velocity};
use super::body::{BodyId, BodyKind, RigidBody};
use super::impact::{ImpactPrediction, simulate_impact};
use super::outcome::{HoleResolver, Outcome};
use super::world::World;
use crate::error::ShotError;
use crate::settings::Settings;

/// Phase tag used in error reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PhaseKind {
    Idle,
    Dragging,
    AwaitingSpeed,
    Launched,
}

/// Where an attempt is between press and launch
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub enum AttemptPhase {
    /// Waiting for a press on the striker
    #[default]
    Idle,
    /// Pointer held down; `start` is the press position
    Dragging { start: Vec2 },
    /// Released with a valid aim; waiting for the speed text
    AwaitingSpeed { start: Vec2, end: Vec2, direction: Vec2 },
    /// Launch velocity handed to the host
    Launched { velocity: Vec2 },
}

impl AttemptPhase {
    pub fn kind(&self) -> PhaseKind {
        match self {
            AttemptPhase::Idle => PhaseKind::Idle,
            AttemptPhase::Dragging { .. } => PhaseKind::Dragging,
            AttemptPhase::AwaitingSpeed { .. } => PhaseKind::AwaitingSpeed,
            AttemptPhase::Launched { .. } => PhaseKind::Launched,
        }
    }
}

/// Per-attempt state
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ShotAttempt {
    /// Striker position; aiming is disabled until the striker is placed
    pub striker: Option<Vec2>,
    pub phase: AttemptPhase,
}

impl ShotAttempt {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_placed(&self) -> bool {
        self.striker.is_some()
    }
}

/// Everything the host draws while the player is aiming
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrajectoryPreview {
    /// Striker aim line, as long as the drag
    pub aim_line: [Vec2; 2],
    pub direction: Vec2,
    /// Predicted coin path (empty when the striker would miss the coin)
    pub coin: ImpactPrediction,
}

impl TrajectoryPreview {
    pub fn describe(&self) -> String {
        self.coin.describe()
    }
}

/// Launch handed to the host physics
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LaunchCommand {
    pub velocity: Vec2,
    pub speed: f32,
    /// What the hole will make of this speed
    pub feedback: Outcome,
}

/// Shot entry points over one table
#[derive(Debug, Clone)]
pub struct ShotController {
    world: World,
    settings: Settings,
    /// Coin and striker resolve independently against the same threshold
    coin_resolver: HoleResolver,
    striker_resolver: HoleResolver,
    hole: Vec2,
    coin_body: BodyId,
    striker_body: Option<BodyId>,
}

impl ShotController {
    /// Build a controller; the table must hold a coin and a hole
    pub fn new(world: World, settings: Settings) -> Result<Self, ShotError> {
        settings.validate()?;
        let (coin_body, coin) = world
            .first_of(BodyKind::Coin)
            .map(|b| (b.id, b.collider.center()))
            .ok_or(ShotError::MissingBody(BodyKind::Coin))?;
        let hole = world
            .first_of(BodyKind::Hole)
            .map(|b| b.collider.center())
            .ok_or(ShotError::MissingBody(BodyKind::Hole))?;
        let striker_body = world.first_of(BodyKind::Striker).map(|b| b.id);
        let coin_resolver = HoleResolver::for_table(coin, hole, &settings);
        let striker_resolver = coin_resolver.clone();

        Ok(Self {
            world,
            settings,
            coin_resolver,
            striker_resolver,
            hole,
            coin_body,
            striker_body,
        })
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn coin_resolver(&self) -> &HoleResolver {
        &self.coin_resolver
    }

    pub fn striker_resolver(&self) -> &HoleResolver {
        &self.striker_resolver
    }

    pub fn sink_threshold(&self) -> f32 {
        self.coin_resolver.threshold
    }

    pub fn hole(&self) -> Vec2 {
        self.hole
    }

    /// Coin center, or `None` once it has been sunk
    pub fn coin(&self) -> Option<Vec2> {
        self.world
            .get(self.coin_body)
            .filter(|b| b.enabled)
            .map(|b| b.collider.center())
    }

    /// Put the coin (back) on the table
    ///
    /// Moves the coin collider, returns it to the query set and recomputes the
    /// sink threshold for the new distance. The coin starts a fresh
    /// resolution; the striker keeps its state.
    pub fn set_coin(&mut self, position: Vec2) -> Result<(), ShotError> {
        if !position.is_finite() {
            return Err(ShotError::Layout(format!(
                "coin position must be finite, got {}",
                position
            )));
        }
        let body = self
            .world
            .get_mut(self.coin_body)
            .ok_or(ShotError::MissingBody(BodyKind::Coin))?;
        body.collider = body.collider.with_center(position);
        body.enabled = true;

        self.coin_resolver = HoleResolver::for_table(position, self.hole, &self.settings);
        self.striker_resolver.threshold = self.coin_resolver.threshold;
        log::info!(
            "Coin placed at {} (sink threshold {:.2})",
            position,
            self.coin_resolver.threshold
        );
        Ok(())
    }

    /// Move the striker along its baseline (slider input)
    ///
    /// `x` is clamped to the slider range. Not allowed mid-drag.
    pub fn place_striker(&mut self, attempt: &mut ShotAttempt, x: f32) -> Result<Vec2, ShotError> {
        if let AttemptPhase::Dragging { .. } = attempt.phase {
            return Err(ShotError::WrongPhase {
                expected: PhaseKind::Idle,
                found: PhaseKind::Dragging,
            });
        }

        let x = x.clamp(self.settings.striker_min_x, self.settings.striker_max_x);
        let pos = Vec2::new(x, self.settings.striker_baseline_y);
        if let Some(body) = self.striker_body.and_then(|id| self.world.get_mut(id)) {
            body.collider = body.collider.with_center(pos);
        }
        attempt.striker = Some(pos);
        Ok(pos)
    }

    /// Pointer pressed; starts a drag when it lands on the striker
    ///
    /// Returns whether the drag started.
    pub fn on_drag_start(&self, attempt: &mut ShotAttempt, pointer: Vec2) -> Result<bool, ShotError> {
        let striker = attempt.striker.ok_or(ShotError::StrikerNotPlaced)?;
        match attempt.phase {
            AttemptPhase::Idle | AttemptPhase::AwaitingSpeed { .. } => {}
            other => {
                return Err(ShotError::WrongPhase {
                    expected: PhaseKind::Idle,
                    found: other.kind(),
                });
            }
        }

        if pointer.distance(striker) >= self.settings.grab_radius {
            return Ok(false);
        }
        attempt.phase = AttemptPhase::Dragging { start: pointer };
        Ok(true)
    }

    /// Pointer moved while held; rebuilds the preview
    ///
    /// `None` when not dragging or while the drag has no length yet.
    pub fn on_drag_update(
        &mut self,
        attempt: &ShotAttempt,
        pointer: Vec2,
    ) -> Option<TrajectoryPreview> {
        let AttemptPhase::Dragging { start } = attempt.phase else {
            return None;
        };
        let striker = attempt.striker?;
        let direction = compute_aim(start, pointer).ok()?;

        let coin = simulate_impact(&mut self.world, striker, direction, &self.settings);
        Some(TrajectoryPreview {
            aim_line: aim_line(striker, direction, start.distance(pointer)),
            direction,
            coin,
        })
    }

    /// Pointer released; fixes the aim and waits for a speed
    pub fn on_drag_end(&self, attempt: &mut ShotAttempt, pointer: Vec2) -> Result<Vec2, ShotError> {
        let AttemptPhase::Dragging { start } = attempt.phase else {
            return Err(ShotError::WrongPhase {
                expected: PhaseKind::Dragging,
                found: attempt.phase.kind(),
            });
        };

        match compute_aim(start, pointer) {
            Ok(direction) => {
                attempt.phase = AttemptPhase::AwaitingSpeed {
                    start,
                    end: pointer,
                    direction,
                };
                Ok(direction)
            }
            Err(e) => {
                log::warn!("Shot rejected: {}", e);
                attempt.phase = AttemptPhase::Idle;
                Err(e)
            }
        }
    }

    /// Speed text submitted; produces the launch
    ///
    /// Bad text leaves the attempt waiting so the player can retype it.
    pub fn submit_speed(
        &self,
        attempt: &mut ShotAttempt,
        text: &str,
    ) -> Result<LaunchCommand, ShotError> {
        let AttemptPhase::AwaitingSpeed { direction, .. } = attempt.phase else {
            return Err(ShotError::WrongPhase {
                expected: PhaseKind::AwaitingSpeed,
                found: attempt.phase.kind(),
            });
        };

        let speed = parse_speed(text).inspect_err(|e| log::warn!("{}", e))?;
        let velocity = launch_velocity(direction, speed);
        let feedback = self.striker_resolver.classify(speed);
        attempt.phase = AttemptPhase::Launched { velocity };

        log::info!(
            "Striker launched with velocity {:.2} ({})",
            speed,
            feedback.message()
        );
        Ok(LaunchCommand {
            velocity,
            speed,
            feedback,
        })
    }

    /// A body entered the hole trigger
    ///
    /// The coin and the striker each resolve once against the shared sink
    /// threshold; other kinds are ignored. A sunk coin leaves the query set.
    pub fn on_hole_triggered(&mut self, kind: BodyKind, body: &mut RigidBody) -> Option<Outcome> {
        match kind {
            BodyKind::Coin => {
                let outcome = self.coin_resolver.on_hole_triggered(body, self.hole);
                if outcome == Outcome::Sunk {
                    if let Some(coin) = self.world.get_mut(self.coin_body) {
                        coin.collider = coin.collider.with_center(self.hole);
                        coin.enabled = false;
                    }
                }
                Some(outcome)
            }
            BodyKind::Striker => Some(self.striker_resolver.on_hole_triggered(body, self.hole)),
            BodyKind::Hole | BodyKind::Obstacle => None,
        }
    }

    /// Start a fresh attempt with the striker where it is
    ///
    /// A sunk coin stays sunk until [`ShotController::set_coin`] puts it back.
    pub fn new_attempt(&mut self, attempt: &mut ShotAttempt) {
        attempt.phase = AttemptPhase::Idle;
        self.striker_resolver.reset();
        if self.coin_resolver.outcome() != Some(Outcome::Sunk) {
            self.coin_resolver.reset();
        }
    }
}

/// Parse a player-entered speed
fn parse_speed(text: &str) -> Result<f32, ShotError> {
    let invalid = || ShotError::InvalidSpeed(text.to_string());
    let speed: f32 = text.trim().parse().map_err(|_| invalid())?;
    if !speed.is_finite() || speed < 0.0 {
        return Err(invalid());
    }
    Ok(speed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scenario::Scenario;
    use crate::settings::SinkRule;
    use crate::sim::sink_threshold;

    fn standard() -> (ShotController, ShotAttempt) {
        let controller = Scenario::standard()
            .controller(Settings::default())
            .unwrap();
        (controller, ShotAttempt::new())
    }

    fn aimed(controller: &mut ShotController, attempt: &mut ShotAttempt) {
        let striker = controller.place_striker(attempt, 0.0).unwrap();
        assert!(controller.on_drag_start(attempt, striker).unwrap());
        controller
            .on_drag_end(attempt, striker - Vec2::new(0.0, 1.0))
            .unwrap();
    }

    #[test]
    fn test_full_shot_flow() {
        let (mut controller, mut attempt) = standard();
        let striker = controller.place_striker(&mut attempt, 0.0).unwrap();
        assert_eq!(striker, Vec2::new(0.0, -1.9));

        assert!(controller.on_drag_start(&mut attempt, striker).unwrap());
        let preview = controller
            .on_drag_update(&attempt, Vec2::new(0.0, -2.9))
            .unwrap();
        assert!((preview.direction - Vec2::Y).length() < 1e-6);
        assert!((preview.aim_line[1] - Vec2::new(0.0, -0.9)).length() < 1e-5);
        assert!(preview.coin.reached_hole);
        assert!(preview.describe().contains("Coin to Hole"));

        let dir = controller
            .on_drag_end(&mut attempt, Vec2::new(0.0, -2.9))
            .unwrap();
        assert!((dir - Vec2::Y).length() < 1e-6);

        let launch = controller.submit_speed(&mut attempt, " 12.5 ").unwrap();
        assert!((launch.velocity - Vec2::new(0.0, 12.5)).length() < 1e-5);
        assert_eq!(launch.feedback, Outcome::TooFast);
        assert_eq!(attempt.phase.kind(), PhaseKind::Launched);
    }

    #[test]
    fn test_press_away_from_striker_is_ignored() {
        let (mut controller, mut attempt) = standard();
        controller.place_striker(&mut attempt, 0.0).unwrap();
        assert!(!controller
            .on_drag_start(&mut attempt, Vec2::new(2.0, 2.0))
            .unwrap());
        assert_eq!(attempt.phase, AttemptPhase::Idle);
    }

    #[test]
    fn test_drag_requires_placement() {
        let (controller, mut attempt) = standard();
        assert!(matches!(
            controller.on_drag_start(&mut attempt, Vec2::new(0.0, -1.9)),
            Err(ShotError::StrikerNotPlaced)
        ));
    }

    #[test]
    fn test_zero_length_drag_rejected() {
        let (mut controller, mut attempt) = standard();
        let striker = controller.place_striker(&mut attempt, 0.5).unwrap();
        controller.on_drag_start(&mut attempt, striker).unwrap();

        assert!(controller.on_drag_update(&attempt, striker).is_none());
        assert!(matches!(
            controller.on_drag_end(&mut attempt, striker),
            Err(ShotError::ZeroLengthDrag)
        ));
        assert_eq!(attempt.phase, AttemptPhase::Idle);
    }

    #[test]
    fn test_invalid_speed_can_be_retried() {
        let (mut controller, mut attempt) = standard();
        aimed(&mut controller, &mut attempt);

        for bad in ["", "fast", "NaN", "inf", "-3"] {
            assert!(matches!(
                controller.submit_speed(&mut attempt, bad),
                Err(ShotError::InvalidSpeed(_))
            ));
            assert_eq!(attempt.phase.kind(), PhaseKind::AwaitingSpeed);
        }

        let launch = controller.submit_speed(&mut attempt, "10").unwrap();
        assert_eq!(launch.feedback, Outcome::TooSlow);
    }

    #[test]
    fn test_submit_in_wrong_phase() {
        let (mut controller, mut attempt) = standard();
        controller.place_striker(&mut attempt, 0.0).unwrap();
        assert!(matches!(
            controller.submit_speed(&mut attempt, "10"),
            Err(ShotError::WrongPhase {
                expected: PhaseKind::AwaitingSpeed,
                found: PhaseKind::Idle,
            })
        ));
    }

    #[test]
    fn test_place_striker_clamps_and_moves_body() {
        let (mut controller, mut attempt) = standard();
        let pos = controller.place_striker(&mut attempt, 99.0).unwrap();
        assert_eq!(pos, Vec2::new(controller.settings().striker_max_x, -1.9));

        let striker = controller.world().first_of(BodyKind::Striker).unwrap();
        assert_eq!(striker.collider.center(), pos);
    }

    #[test]
    fn test_place_striker_mid_drag_rejected() {
        let (mut controller, mut attempt) = standard();
        let striker = controller.place_striker(&mut attempt, 0.0).unwrap();
        controller.on_drag_start(&mut attempt, striker).unwrap();
        assert!(controller.place_striker(&mut attempt, 1.0).is_err());
    }

    #[test]
    fn test_hole_trigger_dispatch() {
        let (mut controller, _) = standard();
        let mut wall = RigidBody::default();
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Obstacle, &mut wall),
            None
        );
        assert_eq!(controller.on_hole_triggered(BodyKind::Hole, &mut wall), None);
        assert_eq!(controller.coin_resolver().outcome(), None);
        assert_eq!(controller.striker_resolver().outcome(), None);
    }

    #[test]
    fn test_striker_resolves_after_coin() {
        let (mut controller, _) = standard();
        let mut coin = RigidBody::new(Vec2::new(0.0, 5.9), Vec2::new(0.0, 3.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Coin, &mut coin),
            Some(Outcome::TooSlow)
        );

        // The striker following in gets its own resolution
        let mut striker = RigidBody::new(Vec2::new(0.0, 5.5), Vec2::new(0.0, 30.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Striker, &mut striker),
            Some(Outcome::TooFast)
        );
        assert!((striker.velocity - Vec2::new(0.0, 5.0)).length() < 1e-5);

        // Each body still resolves only once
        let mut again = RigidBody::new(Vec2::new(0.0, 5.5), Vec2::new(0.0, 30.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Coin, &mut again),
            Some(Outcome::TooSlow)
        );
        assert_eq!(again.velocity, Vec2::new(0.0, 30.0));
    }

    #[test]
    fn test_coin_resolves_after_striker() {
        let mut settings = Settings::default();
        settings.sink_threshold_override = Some(10.0);
        let mut controller = Scenario::standard().controller(settings).unwrap();

        let mut striker = RigidBody::new(Vec2::new(0.0, 5.5), Vec2::new(0.0, 2.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Striker, &mut striker),
            Some(Outcome::TooSlow)
        );

        let mut coin = RigidBody::new(Vec2::new(0.0, 5.9), Vec2::new(0.0, 10.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Coin, &mut coin),
            Some(Outcome::Sunk)
        );
        assert_eq!(coin.position, controller.hole());
        assert!(coin.kinematic);
    }

    #[test]
    fn test_sunk_coin_leaves_the_table() {
        let mut settings = Settings::default();
        settings.sink_threshold_override = Some(10.0);
        let mut controller = Scenario::standard().controller(settings).unwrap();
        let mut attempt = ShotAttempt::new();

        aimed(&mut controller, &mut attempt);
        controller.submit_speed(&mut attempt, "10").unwrap();
        let mut coin = RigidBody::new(Vec2::new(0.0, 5.9), Vec2::new(0.0, 10.0));
        assert_eq!(
            controller.on_hole_triggered(BodyKind::Coin, &mut coin),
            Some(Outcome::Sunk)
        );
        assert_eq!(controller.coin(), None);

        // Next attempt aims at an empty table
        controller.new_attempt(&mut attempt);
        let striker = controller.place_striker(&mut attempt, 0.0).unwrap();
        controller.on_drag_start(&mut attempt, striker).unwrap();
        let preview = controller
            .on_drag_update(&attempt, striker - Vec2::Y)
            .unwrap();
        assert!(preview.coin.is_empty());
        assert_eq!(
            controller.coin_resolver().outcome(),
            Some(Outcome::Sunk)
        );
    }

    #[test]
    fn test_set_coin_recomputes_threshold() {
        let (mut controller, mut attempt) = standard();
        let before = controller.sink_threshold();

        controller.set_coin(Vec2::new(0.0, 2.0)).unwrap();
        let expected = sink_threshold(Vec2::new(0.0, 2.0), controller.hole(), 9.81);
        assert!((controller.sink_threshold() - expected).abs() < 1e-5);
        assert!(controller.sink_threshold() < before);
        assert_eq!(
            controller.striker_resolver().threshold,
            controller.sink_threshold()
        );

        // Preview now hits the coin at its new spot
        let striker = controller.place_striker(&mut attempt, 0.0).unwrap();
        controller.on_drag_start(&mut attempt, striker).unwrap();
        let preview = controller
            .on_drag_update(&attempt, striker - Vec2::Y)
            .unwrap();
        let impact = preview.coin.impact.unwrap();
        assert!((impact.point - Vec2::new(0.0, 1.75)).length() < 1e-4);

        assert!(controller.set_coin(Vec2::new(f32::NAN, 0.0)).is_err());
    }

    #[test]
    fn test_set_coin_after_sink_restores_it() {
        let mut settings = Settings::default();
        settings.sink_threshold_override = Some(10.0);
        let mut controller = Scenario::standard().controller(settings).unwrap();
        let mut coin = RigidBody::new(Vec2::new(0.0, 5.9), Vec2::new(0.0, 10.0));
        controller.on_hole_triggered(BodyKind::Coin, &mut coin);
        assert_eq!(controller.coin(), None);

        controller.set_coin(Vec2::new(1.0, 0.5)).unwrap();
        assert_eq!(controller.coin(), Some(Vec2::new(1.0, 0.5)));
        assert_eq!(controller.coin_resolver().outcome(), None);
        // Override still wins over the derived value
        assert_eq!(controller.sink_threshold(), 10.0);
    }

    #[test]
    fn test_feedback_matches_physical_outcome() {
        let mut settings = Settings::default();
        settings.sink_rule = SinkRule::Tolerance;
        settings.sink_threshold_override = Some(10.88);
        let mut controller = Scenario::standard().controller(settings).unwrap();
        let mut attempt = ShotAttempt::new();

        for text in ["10.5", "15", "4"] {
            controller.new_attempt(&mut attempt);
            aimed(&mut controller, &mut attempt);
            let launch = controller.submit_speed(&mut attempt, text).unwrap();

            let mut striker = RigidBody::new(Vec2::new(0.0, 5.8), launch.velocity);
            let outcome = controller
                .on_hole_triggered(BodyKind::Striker, &mut striker)
                .unwrap();
            assert_eq!(outcome, launch.feedback);
        }
    }

    #[test]
    fn test_controller_needs_coin_and_hole() {
        let mut world = World::new();
        world.add(
            BodyKind::Coin,
            crate::sim::body::Collider::circle(Vec2::ZERO, 0.25),
        );
        assert!(matches!(
            ShotController::new(world, Settings::default()),
            Err(ShotError::MissingBody(BodyKind::Hole))
        ));
    }
}
