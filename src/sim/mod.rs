//! Shot simulation module
//!
//! All gameplay geometry lives here. This module must stay pure:
//! - No rendering, input or platform dependencies
//! - No physics stepping (the host steps bodies from launch velocities)
//! - Stable iteration order (bodies by id)

pub mod aim;
pub mod body;
pub mod impact;
pub mod outcome;
pub mod ray;
pub mod shot;
pub mod world;

pub use aim::{aim_line, compute_aim, launch_velocity};
pub use body::{Body, BodyId, BodyKind, Collider, RigidBody};
pub use impact::{CoinImpact, ImpactPrediction, Readout, ShotMeasurements, simulate_impact};
pub use outcome::{HoleResolver, Outcome, ResolutionState, apply_outcome, classify, sink_threshold};
pub use ray::{RayHit, reflect};
pub use shot::{AttemptPhase, LaunchCommand, PhaseKind, ShotAttempt, ShotController, TrajectoryPreview};
pub use world::{Exclusion, World, WorldHit};
