//! Carrom Shot native demo
//!
//! Usage: `carrom-shot [--settings PATH] [--sink-rule RULE] [--save-settings PATH] [SEED] [SPEED]`
//!
//! - `--settings PATH`: tuning JSON; an unreadable file falls back to defaults
//! - `--sink-rule RULE`: `exact` or `tolerance`, overriding the file
//! - `--save-settings PATH`: write the effective tuning back out as JSON
//!
//! Places the striker, aims straight at the coin, prints the preview and the
//! launch as JSON, then resolves the coin at the hole as if it arrived at the
//! entered speed. Physics stepping is left to a real host.

use std::process::ExitCode;

use carrom_shot::settings::SinkRule;
use carrom_shot::sim::{BodyKind, RigidBody, ShotAttempt};
use carrom_shot::{Scenario, Settings, ShotError};

const DEFAULT_SPEED: &str = "10.88";

/// Parsed command line
#[derive(Debug, Default, PartialEq)]
struct Options {
    settings_path: Option<String>,
    sink_rule: Option<SinkRule>,
    save_path: Option<String>,
    seed: Option<u64>,
    speed: Option<String>,
}

impl Options {
    fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, ShotError> {
        let mut options = Options::default();
        let mut args = args.into_iter();
        let mut positional = Vec::new();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| ShotError::Settings(format!("{} needs a value", flag)))
            };
            match arg.as_str() {
                "--settings" => options.settings_path = Some(value("--settings")?),
                "--save-settings" => options.save_path = Some(value("--save-settings")?),
                "--sink-rule" => {
                    let text = value("--sink-rule")?;
                    let rule = SinkRule::from_str(&text).ok_or_else(|| {
                        ShotError::Settings(format!("unknown sink rule {:?}", text))
                    })?;
                    options.sink_rule = Some(rule);
                }
                _ => positional.push(arg),
            }
        }

        let mut positional = positional.into_iter();
        options.seed = positional.next().and_then(|s| s.parse::<u64>().ok());
        options.speed = positional.next();
        Ok(options)
    }

    /// Tuning for this run: file (or defaults), then command-line overrides
    fn settings(&self) -> Result<Settings, ShotError> {
        let mut settings = match &self.settings_path {
            Some(path) => Settings::load_or_default(path),
            None => Settings::default(),
        };
        if let Some(rule) = self.sink_rule {
            settings.sink_rule = rule;
        }
        settings.validate()?;
        log::info!("Sink rule: {}", settings.sink_rule.as_str());

        if let Some(path) = &self.save_path {
            settings.save(path)?;
        }
        Ok(settings)
    }
}

fn run() -> Result<(), ShotError> {
    let options = Options::parse(std::env::args().skip(1))?;
    let settings = options.settings()?;
    let scenario = match options.seed {
        Some(seed) => {
            log::info!("Using random table with seed: {}", seed);
            Scenario::random(seed)
        }
        None => Scenario::standard(),
    };
    let speed_text = options.speed.as_deref().unwrap_or(DEFAULT_SPEED);

    let mut controller = scenario.controller(settings)?;
    let mut attempt = ShotAttempt::new();
    log::info!("Sink threshold: {:.2}", controller.sink_threshold());

    // Line the striker up under the coin and pull straight back
    let striker = controller.place_striker(&mut attempt, scenario.coin.x)?;
    let release = striker - (scenario.coin - striker).normalize_or_zero();
    controller.on_drag_start(&mut attempt, striker)?;

    if let Some(preview) = controller.on_drag_update(&attempt, release) {
        println!("{}", serde_json::to_string_pretty(&preview)?);
        let text = preview.describe();
        if !text.is_empty() {
            println!("{}", text);
        }
    }

    controller.on_drag_end(&mut attempt, release)?;
    let launch = controller.submit_speed(&mut attempt, speed_text)?;
    println!("{}", serde_json::to_string_pretty(&launch)?);
    println!("{}", launch.feedback.message());

    let mut coin = RigidBody::new(scenario.coin, launch.velocity);
    if let Some(outcome) = controller.on_hole_triggered(BodyKind::Coin, &mut coin) {
        println!("{}", serde_json::to_string(&outcome)?);
        println!("{}", serde_json::to_string_pretty(&coin)?);
    }
    Ok(())
}

fn main() -> ExitCode {
    env_logger::init();
    log::info!("Carrom Shot (native) starting...");

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            log::error!("{}", e);
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}
