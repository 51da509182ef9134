//! Application service: the tick driver and single owning scope.
//!
//! [`AppService`] owns the engine state, mode machine, orchestrator and
//! random source.  It exposes a clean, hardware-agnostic API.  All I/O
//! flows through port traits injected at call sites, making the entire
//! service testable with mock adapters.
//!
//! ```text
//!  raw clock ──▶ ┌──────────────────────────────┐ ──▶ EventSink
//!  SensorPort ──▶│          AppService          │
//! ActuatorPort ◀─│  ModeMachine · Orchestrator  │
//!      LedPort ◀─└──────────────────────────────┘
//! ```
//!
//! One tick = one clock reading, one mode check, one orchestration pass.
//! The mode check always runs before orchestration, so a transition
//! takes effect on the tick that detects it.

use log::info;

use crate::config::SystemConfig;
use crate::fsm::context::{ChannelId, EngineState};
use crate::fsm::{Mode, ModeEntry, ModeMachine};

use super::clock::TickClock;
use super::commands::AppCommand;
use super::events::{AppEvent, StatusSnapshot};
use super::orchestrator::{Orchestrator, TickReport};
use super::ports::{ActuatorPort, EventSink, LedPort, SensorPort, UniformSource};

// ───────────────────────────────────────────────────────────────
// AppService
// ───────────────────────────────────────────────────────────────

pub struct AppService<R: UniformSource> {
    config: SystemConfig,
    machine: ModeMachine,
    orchestrator: Orchestrator,
    state: EngineState,
    rng: R,
    clock: TickClock,
    /// When false the mode machine is not advanced.
    autonomous: bool,
    last_report: Option<TickReport>,
    next_status_ms: u64,
    tick_count: u64,
}

impl<R: UniformSource> AppService<R> {
    /// Construct the service from configuration.
    ///
    /// Does **not** sample the first dwell: call [`start`](Self::start) next.
    pub fn new(config: SystemConfig, rng: R) -> Self {
        let machine = ModeMachine::from_config(&config);
        let orchestrator = Orchestrator::new(&config);
        let state = EngineState {
            current_mode: Mode::Neutral,
            mode_deadline_ms: 0,
            speed_factor: config.speed_factor,
        };
        Self {
            config,
            machine,
            orchestrator,
            state,
            rng,
            clock: TickClock::new(),
            autonomous: true,
            last_report: None,
            next_status_ms: 0,
            tick_count: 0,
        }
    }

    // ── Lifecycle ─────────────────────────────────────────────

    /// Enter `Neutral` with a sampled dwell starting at `raw_now_ms`.
    pub fn start(&mut self, raw_now_ms: u32, sink: &mut impl EventSink) {
        let now = self.clock.observe(raw_now_ms);
        let (state, entry) = self.machine.start(now, self.config.speed_factor, &mut self.rng);
        self.state = state;
        self.next_status_ms = now;
        if self.config.debug_log {
            sink.emit(&AppEvent::Started {
                mode: entry.to,
                dwell_secs: entry.dwell_secs(),
            });
        }
        info!("AppService started in {}", self.state.current_mode);
    }

    // ── Per-tick orchestration ────────────────────────────────

    /// Run one control cycle: widen clock → mode check → regulate → LED.
    ///
    /// `raw_now_ms` is read once by the caller at the top of the tick and
    /// is the only time value any component sees during it.
    pub fn tick(
        &mut self,
        raw_now_ms: u32,
        hw: &mut (impl SensorPort + ActuatorPort),
        led: &mut impl LedPort,
        sink: &mut impl EventSink,
    ) -> TickReport {
        self.tick_count += 1;
        let now = self.clock.observe(raw_now_ms);

        // 1. Mode machine
        if self.autonomous {
            if let Some(entry) = self.machine.advance(&mut self.state, now, &mut self.rng) {
                self.announce(&entry, false, sink);
            }
        }

        // 2. Behavior → regulators → actuators, LED
        let report = self.orchestrator.run(&self.state, now, hw, led);
        self.last_report = Some(report);

        // 3. Periodic status
        if self.config.debug_log && now >= self.next_status_ms {
            self.next_status_ms = now + u64::from(self.config.status_interval_ms);
            sink.emit(&AppEvent::Status(self.snapshot(&report)));
        }

        report
    }

    // ── Command handling ──────────────────────────────────────

    /// Process an operator command from the console.
    pub fn handle_command(&mut self, cmd: AppCommand, sink: &mut impl EventSink) {
        let now = self.clock.elapsed_ms();
        match cmd {
            AppCommand::ForceMode(mode) => {
                let entry = self.machine.enter(&mut self.state, mode, now, &mut self.rng);
                self.announce(&entry, true, sink);
            }
            AppCommand::SetAutonomous(enabled) => {
                if enabled == self.autonomous {
                    return;
                }
                self.autonomous = enabled;
                if enabled {
                    // The frozen deadline is stale; restart the current dwell.
                    let mode = self.state.current_mode;
                    let entry = self.machine.enter(&mut self.state, mode, now, &mut self.rng);
                    info!("Autonomy resumed, {} for {:.1}s", mode, entry.dwell_secs());
                } else {
                    info!("Autonomy paused in {}", self.state.current_mode);
                }
                if self.config.debug_log {
                    sink.emit(&AppEvent::AutonomyChanged(enabled));
                }
            }
            AppCommand::Status => {
                if let Some(report) = self.last_report {
                    sink.emit(&AppEvent::Status(self.snapshot(&report)));
                }
            }
        }
    }

    // ── Queries ───────────────────────────────────────────────

    pub fn mode(&self) -> Mode {
        self.state.current_mode
    }

    pub fn engine_state(&self) -> &EngineState {
        &self.state
    }

    pub fn is_autonomous(&self) -> bool {
        self.autonomous
    }

    /// Total control ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    pub fn config(&self) -> &SystemConfig {
        &self.config
    }

    pub fn last_report(&self) -> Option<&TickReport> {
        self.last_report.as_ref()
    }

    pub fn channel_state(&self, channel: ChannelId) -> crate::control::regulator::ChannelState {
        self.orchestrator.channel_state(channel)
    }

    // ── Internal ──────────────────────────────────────────────

    fn announce(&self, entry: &ModeEntry, forced: bool, sink: &mut impl EventSink) {
        info!(
            "Mode {} -> {} for {:.1}s{}",
            entry.from,
            entry.to,
            entry.dwell_secs(),
            if forced { " (forced)" } else { "" }
        );
        if self.config.debug_log {
            sink.emit(&AppEvent::ModeEntered {
                from: entry.from,
                to: entry.to,
                dwell_secs: entry.dwell_secs(),
                forced,
            });
        }
    }

    fn snapshot(&self, report: &TickReport) -> StatusSnapshot {
        let now = self.clock.elapsed_ms();
        StatusSnapshot {
            uptime_ms: now,
            mode: self.state.current_mode,
            remaining_ms: self.state.remaining_ms(now),
            autonomous: self.autonomous,
            base: report.base,
            leaves: report.leaves,
        }
    }
}
