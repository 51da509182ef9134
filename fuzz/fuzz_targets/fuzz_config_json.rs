//! Fuzz target: config parsing + mode sampling
//!
//! Parses arbitrary bytes as a JSON config document.  Any document that
//! passes validation is then used to drive the mode machine for a few
//! hundred transitions, verifying:
//! - Parsing never panics
//! - A validated config never yields a dwell outside its bounds
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use softbloom::adapters::config_source;
use softbloom::adapters::rng::ChaChaSource;
use softbloom::fsm::ModeMachine;

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(cfg) = config_source::parse(text) else {
        return;
    };

    // Skip dwell scales where f32 seconds lose millisecond meaning.
    if cfg.dwell.iter().any(|d| d.hi / cfg.speed_factor > 1.0e6) {
        return;
    }

    let machine = ModeMachine::from_config(&cfg);
    let mut rng = ChaChaSource::from_seed(data.len() as u64);
    let (mut state, _) = machine.start(0, cfg.speed_factor, &mut rng);

    for _ in 0..256 {
        let now = state.mode_deadline_ms;
        let Some(entry) = machine.advance(&mut state, now, &mut rng) else {
            panic!("deadline reached without a transition");
        };
        let range = cfg.dwell[entry.to as usize];
        let secs = entry.dwell_secs();
        let tol = 1e-3 + 1e-4 * range.hi / cfg.speed_factor;
        assert!(secs >= range.lo / cfg.speed_factor - tol);
        assert!(secs <= range.hi / cfg.speed_factor + tol);
        assert!(state.mode_deadline_ms >= now);
    }
});
