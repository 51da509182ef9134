//! Integration tests for the AppService → ModeMachine → Orchestrator
//! pipeline against mock adapters.

use softbloom::adapters::console::ConsoleLineBuffer;
use softbloom::adapters::rng::ChaChaSource;
use softbloom::app::commands::AppCommand;
use softbloom::app::events::AppEvent;
use softbloom::app::ports::UniformSource;
use softbloom::app::service::AppService;
use softbloom::config::SystemConfig;
use softbloom::control::regulator::Actuation;
use softbloom::control::waveform;
use softbloom::fsm::Mode;
use softbloom::fsm::behaviors::VisualSignal;
use softbloom::fsm::context::ChannelId;

use crate::mock_hw::{MockHardware, MockLed, RecordingSink, ScriptedRng};

const TICK_MS: u32 = 100;

fn make_app<R: UniformSource>(config: SystemConfig, rng: R) -> (AppService<R>, RecordingSink) {
    let mut app = AppService::new(config, rng);
    let mut sink = RecordingSink::default();
    app.start(0, &mut sink);
    (app, sink)
}

/// Tick from `from_ms` to `until_ms`, recording when each mode entry lands.
fn run<R: UniformSource>(
    app: &mut AppService<R>,
    sink: &mut RecordingSink,
    from_ms: u32,
    until_ms: u32,
) -> Vec<(u32, Mode, Mode, f32)> {
    let (mut hw, mut led) = (MockHardware::new(), MockLed::default());
    let mut entries = Vec::new();
    let mut t = from_ms;
    while t <= until_ms {
        let before = sink.events.len();
        app.tick(t, &mut hw, &mut led, sink);
        for e in &sink.events[before..] {
            if let AppEvent::ModeEntered { from, to, dwell_secs, .. } = e {
                entries.push((t, *from, *to, *dwell_secs));
            }
        }
        t += TICK_MS;
    }
    entries
}

fn check_dwell_bounds(speed: f32) {
    let config = SystemConfig { speed_factor: speed, ..SystemConfig::default() };
    let dwell = config.dwell;
    let (mut app, mut sink) = make_app(config, ChaChaSource::from_seed(11));
    let entries = run(&mut app, &mut sink, TICK_MS, 900_000);
    assert!(entries.len() > 20, "expected many transitions, got {}", entries.len());

    let mut previous: Option<(u32, Mode, f32)> = None;
    for &(at, from, to, secs) in &entries {
        let range = dwell[to as usize];
        assert!(
            secs >= range.lo / speed - 1e-3 && secs <= range.hi / speed + 1e-3,
            "{} dwell {}s outside [{}, {}] / {}",
            to,
            secs,
            range.lo,
            range.hi,
            speed
        );
        if let Some((prev_at, prev_to, prev_secs)) = previous {
            assert_eq!(from, prev_to, "entry chain broken");
            let elapsed = at - prev_at;
            let dwell_ms = (prev_secs * 1000.0).round() as u32;
            assert!(
                elapsed >= dwell_ms && elapsed <= dwell_ms + TICK_MS,
                "left {} after {} ms, dwell {} ms",
                prev_to,
                elapsed,
                dwell_ms
            );
        }
        previous = Some((at, to, secs));
    }
}

// ── Startup ───────────────────────────────────────────────────

#[test]
fn start_enters_neutral_with_sampled_dwell() {
    let (app, sink) = make_app(SystemConfig::default(), ChaChaSource::from_seed(3));
    assert_eq!(app.mode(), Mode::Neutral);
    match sink.events.as_slice() {
        [AppEvent::Started { mode: Mode::Neutral, dwell_secs }] => {
            assert!((8.0..=12.0).contains(dwell_secs));
        }
        other => panic!("unexpected start events: {:?}", other),
    }
}

// ── Dwell and transitions ─────────────────────────────────────

#[test]
fn dwell_durations_respect_bounds() {
    check_dwell_bounds(1.0);
}

#[test]
fn speed_factor_shortens_dwell() {
    check_dwell_bounds(2.0);
}

#[test]
fn same_seed_same_mode_sequence() {
    let (mut a, mut sink_a) = make_app(SystemConfig::default(), ChaChaSource::from_seed(99));
    let (mut b, mut sink_b) = make_app(SystemConfig::default(), ChaChaSource::from_seed(99));
    let seq_a = run(&mut a, &mut sink_a, TICK_MS, 300_000);
    let seq_b = run(&mut b, &mut sink_b, TICK_MS, 300_000);
    assert_eq!(seq_a, seq_b);
}

#[test]
fn raw_clock_wrap_keeps_schedule() {
    let start = u32::MAX - 999;
    let mut app = AppService::new(SystemConfig::default(), ScriptedRng::new(&[0.0]));
    let mut sink = RecordingSink::default();
    app.start(start, &mut sink);

    let (mut hw, mut led) = (MockHardware::new(), MockLed::default());
    for k in 1..=200u32 {
        app.tick(start.wrapping_add(k * TICK_MS), &mut hw, &mut led, &mut sink);
    }
    // NEUTRAL row with r = 0 always selects NEUTRAL; dwell is exactly 8 s.
    assert_eq!(sink.mode_entries().len(), 2);
    assert_eq!(app.engine_state().remaining_ms(u64::from(start) + 20_000), 4_000);
}

#[test]
fn raw_clock_wrap_keeps_waveform_phase() {
    let start = u32::MAX - 999;
    let mut app = AppService::new(SystemConfig::default(), ScriptedRng::new(&[0.0]));
    let mut sink = RecordingSink::default();
    app.start(start, &mut sink);
    app.handle_command(AppCommand::ForceMode(Mode::Calm), &mut sink);
    app.handle_command(AppCommand::SetAutonomous(false), &mut sink);

    let (mut hw, mut led) = (MockHardware::new(), MockLed::default());
    let mut previous: Option<f32> = None;
    for k in 1..=20u32 {
        let report = app.tick(start.wrapping_add(k * TICK_MS), &mut hw, &mut led, &mut sink);
        let widened = u64::from(start) + u64::from(k * TICK_MS);
        let expected = waveform::sine(widened, 4_000, 0.1, 0.85);
        assert!((report.base.level - expected).abs() < 1e-6, "tick {k}");
        // Calm's base sine moves at most ~0.06 per 100 ms tick.
        if let Some(prev) = previous {
            assert!((report.base.level - prev).abs() < 0.07, "jump at tick {k}");
        }
        previous = Some(report.base.level);
    }
    assert_eq!(app.mode(), Mode::Calm);
}

// ── Per-tick output ───────────────────────────────────────────

#[test]
fn every_tick_drives_both_channels_and_led() {
    let (mut app, _) = make_app(SystemConfig::default(), ChaChaSource::from_seed(5));
    let mut sink = RecordingSink::default();
    let (mut hw, mut led) = (MockHardware::new(), MockLed::default());
    for k in 1..=50u32 {
        app.tick(k * 20, &mut hw, &mut led, &mut sink);
    }
    assert_eq!(hw.calls.len(), 100);
    assert_eq!(led.frames.len(), 50);
    for pair in hw.calls.chunks(2) {
        assert_eq!(pair[0].0, ChannelId::Base);
        assert_eq!(pair[1].0, ChannelId::Leaves);
    }
    assert_eq!(app.tick_count(), 50);
}

#[test]
fn over_pressure_vents_and_under_pressure_inflates() {
    let (mut app, mut sink) = make_app(SystemConfig::default(), ChaChaSource::from_seed(5));
    let mut led = MockLed::default();
    let mut hw = MockHardware::new();

    hw.readings.base = 900;
    hw.readings.leaves = 0;
    app.tick(20, &mut hw, &mut led, &mut sink);
    assert!(matches!(hw.last(ChannelId::Base), Some(Actuation::Vent(d)) if d > 0));
    assert!(matches!(hw.last(ChannelId::Leaves), Some(Actuation::Inflate(d)) if d > 0));
    assert!(app.channel_state(ChannelId::Base).valve_open);
}

#[test]
fn status_snapshots_follow_interval() {
    let (mut app, mut sink) = make_app(SystemConfig::default(), ChaChaSource::from_seed(8));
    run(&mut app, &mut sink, TICK_MS, 10_000);
    assert_eq!(sink.status_count(), 10);
}

#[test]
fn debug_log_off_is_silent() {
    let config = SystemConfig { debug_log: false, ..SystemConfig::default() };
    let (mut app, mut sink) = make_app(config, ChaChaSource::from_seed(8));
    let entries = run(&mut app, &mut sink, TICK_MS, 60_000);
    assert!(entries.is_empty());
    assert!(sink.events.is_empty());
    assert_ne!(app.tick_count(), 0);
}

// ── Operator commands ─────────────────────────────────────────

#[test]
fn console_line_forces_mode() {
    let (mut app, mut sink) = make_app(SystemConfig::default(), ChaChaSource::from_seed(1));
    let mut console = ConsoleLineBuffer::new();
    let cmd = b"MODE curious\r\n".iter().find_map(|&b| console.feed(b));
    assert_eq!(cmd, Some(AppCommand::ForceMode(Mode::Curious)));

    app.handle_command(AppCommand::ForceMode(Mode::Curious), &mut sink);
    let (mut hw, mut led) = (MockHardware::new(), MockLed::default());
    app.tick(20, &mut hw, &mut led, &mut sink);
    assert_eq!(app.mode(), Mode::Curious);
    assert!(matches!(led.frames.last(), Some(VisualSignal::Pixels { .. })));
}

#[test]
fn autonomy_off_holds_mode_through_deadline() {
    let (mut app, mut sink) = make_app(SystemConfig::default(), ChaChaSource::from_seed(2));
    app.handle_command(AppCommand::ForceMode(Mode::Sad), &mut sink);
    app.handle_command(AppCommand::SetAutonomous(false), &mut sink);
    let entries = run(&mut app, &mut sink, TICK_MS, 120_000);
    assert!(entries.is_empty());
    assert_eq!(app.mode(), Mode::Sad);

    app.handle_command(AppCommand::SetAutonomous(true), &mut sink);
    assert!(app.engine_state().remaining_ms(120_000) >= 12_000);
    let resumed = run(&mut app, &mut sink, 120_000 + TICK_MS, 400_000);
    assert!(!resumed.is_empty());
}
