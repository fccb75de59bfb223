//! Drive service — the foreground decision loop.
//!
//! One `tick()` is one loop iteration:
//!
//! ```text
//!   read analog ─▶ duty ─▶ read switches ─▶ mode transition
//!        ─▶ state update ─▶ apply commands ─▶ emit events
//! ```
//!
//! The service owns the mode FSM and the shared-state writes; the state
//! handlers themselves only fill in [`DriveCommands`] and never touch
//! hardware.
//!
//! [`DriveCommands`]: crate::fsm::context::DriveCommands

use log::debug;

use crate::app::events::{AppEvent, DriveTelemetry};
use crate::app::ports::{AnalogPort, EventSink, LedPort, SwitchPort};
use crate::config::SystemConfig;
use crate::fsm::context::DriveContext;
use crate::fsm::{Fsm, StateId, states};
use crate::shared::SharedDriveState;

/// Foreground service tying the ports, the FSM, and the shared drive
/// state together.
pub struct DriveService<SW, AN, LED, EV>
where
    SW: SwitchPort,
    AN: AnalogPort,
    LED: LedPort,
    EV: EventSink,
{
    fsm: Fsm,
    ctx: DriveContext,
    drive: &'static SharedDriveState,

    switches: SW,
    analog: AN,
    leds: LED,
    events: EV,

    tick_count: u64,
    was_stopped: bool,
}

impl<SW, AN, LED, EV> DriveService<SW, AN, LED, EV>
where
    SW: SwitchPort,
    AN: AnalogPort,
    LED: LedPort,
    EV: EventSink,
{
    pub fn new(
        config: SystemConfig,
        drive: &'static SharedDriveState,
        switches: SW,
        analog: AN,
        leds: LED,
        events: EV,
    ) -> Self {
        Self {
            fsm: Fsm::new(states::build_state_table(), StateId::Halted),
            ctx: DriveContext::new(config),
            drive,
            switches,
            analog,
            leds,
            events,
            tick_count: 0,
            was_stopped: false,
        }
    }

    /// Run the initial state's entry action and announce the start.
    pub fn start(&mut self) {
        self.fsm.start(&mut self.ctx);
        self.events.emit(&AppEvent::Started);
    }

    /// One decision-loop iteration.
    pub fn tick(&mut self) {
        self.tick_count += 1;

        // Fresh inputs first.  The speed pot goes straight to the duty
        // register every iteration, regardless of mode.
        self.ctx.analog = self.analog.read_analog();
        self.drive.set_duty(self.ctx.analog.speed);
        self.ctx.switches = self.switches.read_switches();

        // Mode selector decides the state from the outside.
        let desired = StateId::from_switches(self.ctx.switches);
        let current = self.fsm.current_state();
        if desired != current {
            self.events.emit(&AppEvent::ModeChanged {
                from: current,
                to: desired,
            });
            self.fsm.force_transition(desired, &mut self.ctx);
        }

        // Let the mode handler fill in this iteration's commands.
        self.ctx.commands = Default::default();
        self.fsm.tick(&mut self.ctx);
        self.apply_commands();

        // Stop latch edges.
        let stopped = self.ctx.stop.is_stopped();
        if stopped != self.was_stopped {
            self.events.emit(if stopped {
                &AppEvent::StopLatched
            } else {
                &AppEvent::StopReleased
            });
            self.was_stopped = stopped;
        }

        debug!(
            "tick {}: mode={:?} dir={:?} duty={}",
            self.tick_count,
            self.fsm.current_state(),
            self.drive.direction(),
            self.drive.duty()
        );
    }

    /// Apply whatever the state handler requested.  Untouched outputs
    /// keep their previous value (the Halted iteration shape).
    fn apply_commands(&mut self) {
        if let Some(dir) = self.ctx.commands.direction {
            let previous = self.drive.direction();
            if dir != previous {
                self.drive.set_direction(dir);
                self.events.emit(&AppEvent::DirectionChanged {
                    from: previous,
                    to: dir,
                });
            }
        }
        if let Some(green) = self.ctx.commands.green {
            self.leds.set_green(green);
        }
        if let Some(red) = self.ctx.commands.red {
            self.leds.set_red(red);
        }
    }

    /// Snapshot the outputs for periodic reporting.
    pub fn telemetry(&self) -> DriveTelemetry {
        DriveTelemetry {
            mode: self.fsm.current_state(),
            direction: self.drive.direction(),
            duty: self.drive.duty(),
            stopped: self.ctx.stop.is_stopped(),
            tick: self.tick_count,
        }
    }

    /// Emit a telemetry event through the sink.
    pub fn report(&mut self) {
        let snapshot = self.telemetry();
        self.events.emit(&AppEvent::Telemetry(snapshot));
    }

    /// Forward a drained scan trigger through the event sink.
    #[cfg(feature = "adc-scan")]
    pub fn notify_trigger(&mut self, channel: u8, event: crate::adc::scan::TriggerEvent) {
        self.events.emit(&AppEvent::Trigger { channel, event });
    }

    pub fn current_mode(&self) -> StateId {
        self.fsm.current_state()
    }

    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
