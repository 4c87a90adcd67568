use carrom_shot::sim::{AttemptPhase, BodyKind, Outcome, RigidBody, ShotAttempt};
use carrom_shot::{Scenario, Settings, ShotError};
use glam::Vec2;

/// Aim the striker straight at the coin from wherever it sits
fn aim_at_coin(scenario: &Scenario) -> (carrom_shot::sim::ShotController, ShotAttempt, Vec2) {
    let mut controller = scenario.controller(Settings::default()).unwrap();
    let mut attempt = ShotAttempt::new();
    let striker = controller
        .place_striker(&mut attempt, scenario.coin.x)
        .unwrap();
    assert!(controller.on_drag_start(&mut attempt, striker).unwrap());
    let release = striker - (scenario.coin - striker).normalize();
    (controller, attempt, release)
}

#[test]
fn test_random_tables_always_predict_a_coin_path() {
    for seed in 0..25 {
        let scenario = Scenario::random(seed);
        let (mut controller, attempt, release) = aim_at_coin(&scenario);

        let preview = controller.on_drag_update(&attempt, release).unwrap();
        let max_points = controller.settings().max_bounces + 1;
        assert!(!preview.coin.is_empty(), "seed {} missed the coin", seed);
        assert!(preview.coin.path.len() <= max_points);

        // Query set is untouched after every preview
        assert!(controller.world().bodies().iter().all(|b| b.enabled));
    }
}

#[test]
fn test_standard_table_sinks_with_tolerance() {
    let settings = Settings::from_json(r#"{ "sink_rule": "Tolerance", "velocity_margin": 0.5 }"#)
        .unwrap();
    let scenario = Scenario::standard();
    let mut controller = scenario.controller(settings).unwrap();
    let mut attempt = ShotAttempt::new();

    let striker = controller.place_striker(&mut attempt, 0.0).unwrap();
    controller.on_drag_start(&mut attempt, striker).unwrap();
    controller
        .on_drag_end(&mut attempt, striker - Vec2::Y)
        .unwrap();
    let launch = controller.submit_speed(&mut attempt, "11").unwrap();
    assert_eq!(launch.feedback, Outcome::Sunk);

    let mut coin = RigidBody::new(scenario.hole - Vec2::new(0.0, 0.3), launch.velocity);
    let outcome = controller.on_hole_triggered(BodyKind::Coin, &mut coin);
    assert_eq!(outcome, Some(Outcome::Sunk));
    assert_eq!(coin.position, scenario.hole);
    assert!(coin.kinematic);
    assert_eq!(coin.velocity, Vec2::ZERO);
}

#[test]
fn test_rejected_release_then_retry() {
    let scenario = Scenario::standard();
    let (mut controller, mut attempt, release) = aim_at_coin(&scenario);
    let striker = attempt.striker.unwrap();

    assert!(matches!(
        controller.on_drag_end(&mut attempt, striker),
        Err(ShotError::ZeroLengthDrag)
    ));
    assert_eq!(attempt.phase, AttemptPhase::Idle);

    assert!(controller.on_drag_start(&mut attempt, striker).unwrap());
    let direction = controller.on_drag_end(&mut attempt, release).unwrap();
    assert!((direction.length() - 1.0).abs() < 1e-5);

    let err = controller.submit_speed(&mut attempt, "ten").unwrap_err();
    assert_eq!(err.to_string(), "Invalid velocity input: \"ten\"");
    assert!(controller.submit_speed(&mut attempt, "3").is_ok());
}
