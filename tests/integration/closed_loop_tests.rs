//! Closed-loop tests: AppService driving a simulated pneumatic plant.

use softbloom::adapters::rng::ChaChaSource;
use softbloom::app::commands::AppCommand;
use softbloom::app::service::AppService;
use softbloom::config::SystemConfig;
use softbloom::fsm::Mode;

use crate::mock_hw::{MockLed, PlantHardware, RecordingSink};

const TICK_MS: u32 = 20;

#[test]
fn sad_pressure_tracks_target_within_band() {
    let mut app = AppService::new(SystemConfig::default(), ChaChaSource::from_seed(4));
    let mut sink = RecordingSink::default();
    app.start(0, &mut sink);
    app.handle_command(AppCommand::ForceMode(Mode::Sad), &mut sink);
    app.handle_command(AppCommand::SetAutonomous(false), &mut sink);

    let mut plant = PlantHardware::new(20.0, 3.0);
    let mut led = MockLed::default();
    for k in 1..=1_000u32 {
        let report = app.tick(k * TICK_MS, &mut plant, &mut led, &mut sink);
        if k * TICK_MS < 2_000 {
            continue;
        }
        for t in [report.base, report.leaves] {
            let err = f32::from(t.reading) - t.target_pressure;
            assert!(err.abs() <= 14.0, "tick {}: error {} too large", k, err);
        }
    }
}

#[test]
fn angry_swings_between_bands() {
    let mut app = AppService::new(SystemConfig::default(), ChaChaSource::from_seed(4));
    let mut sink = RecordingSink::default();
    app.start(0, &mut sink);
    app.handle_command(AppCommand::ForceMode(Mode::Angry), &mut sink);
    app.handle_command(AppCommand::SetAutonomous(false), &mut sink);

    let mut plant = PlantHardware::new(20.0, 6.0);
    let mut led = MockLed::default();
    let (mut lo, mut hi) = (f32::MAX, f32::MIN);
    for k in 1..=500u32 {
        app.tick(k * TICK_MS, &mut plant, &mut led, &mut sink);
        if k * TICK_MS >= 2_000 {
            lo = lo.min(plant.pressure[0]);
            hi = hi.max(plant.pressure[0]);
        }
    }
    // Base square wave alternates targets 47 and 110.
    assert!(hi > 95.0, "never reached the high band: {}", hi);
    assert!(lo < 62.0, "never vented to the low band: {}", lo);
}
