//! Counter-accurate tests of the compare-match / overflow pair.

use motorctl::app::ports::MotorLine;
use motorctl::drivers::motor::MotorStage;
use motorctl::shared::{DirectionCode, SharedDriveState};
use motorctl::timing::{CounterSim, TimingCore};

use crate::mock_hw::MockMotorLines;

fn leaked_drive() -> &'static SharedDriveState {
    Box::leak(Box::new(SharedDriveState::new()))
}

fn sim(drive: &'static SharedDriveState) -> CounterSim<MockMotorLines> {
    let stage = MotorStage::new(MockMotorLines::new());
    CounterSim::new(TimingCore::new(stage, drive))
}

#[test]
fn compare_match_applies_commanded_direction() {
    let drive = leaked_drive();
    drive.set_direction(DirectionCode::Forward);
    drive.set_duty(100);

    let mut sim = sim(drive);
    sim.run(99);
    // Not yet at the compare value: nothing applied.
    assert!(sim.core().stage().port().writes.is_empty());

    sim.step(); // counter reaches 100
    assert!(sim.core().stage().port().is_forward());
}

#[test]
fn overflow_brakes_regardless_of_direction() {
    for dir in [
        DirectionCode::Forward,
        DirectionCode::Reverse,
        DirectionCode::Brake,
        DirectionCode::Undefined,
    ] {
        let drive = leaked_drive();
        drive.set_direction(dir);
        drive.set_duty(10);

        let mut sim = sim(drive);
        // One full period: compare at 10, overflow at the wrap to 0.
        sim.run(256);
        assert_eq!(sim.counter(), 0);
        assert!(
            sim.core().stage().port().is_braking(),
            "overflow must brake after commanding {dir:?}"
        );
    }
}

#[test]
fn drive_window_runs_from_compare_to_overflow() {
    let drive = leaked_drive();
    drive.set_direction(DirectionCode::Reverse);
    drive.set_duty(200);

    let mut sim = sim(drive);
    sim.run(256); // through compare and the wrap

    let writes = &sim.core().stage().port().writes;
    // Compare first (reverse pattern), then the overflow brake.
    assert_eq!(
        writes
            .iter()
            .position(|w| *w == (MotorLine::Reverse, true)),
        Some(0)
    );
    assert!(sim.core().stage().port().is_braking());

    // Next period repeats the cycle: reverse reappears at the compare.
    sim.run(200);
    assert!(sim.core().stage().port().is_reverse());
}

#[test]
fn direction_change_takes_effect_next_compare() {
    let drive = leaked_drive();
    drive.set_direction(DirectionCode::Forward);
    drive.set_duty(50);

    let mut sim = sim(drive);
    sim.run(50);
    assert!(sim.core().stage().port().is_forward());

    // Foreground rewrites the shared code mid-period.
    drive.set_direction(DirectionCode::Reverse);
    sim.run(206); // finish the period (overflow brakes)
    assert!(sim.core().stage().port().is_braking());
    sim.run(50); // next compare picks up the new code
    assert!(sim.core().stage().port().is_reverse());
}

#[test]
fn direction_application_asserts_before_releasing() {
    // The driven leg goes high before the other is released, so there is
    // never a moment with both legs floating while a direction lands.
    for (dir, leg, other) in [
        (DirectionCode::Forward, MotorLine::Forward, MotorLine::Reverse),
        (DirectionCode::Reverse, MotorLine::Reverse, MotorLine::Forward),
    ] {
        let drive = leaked_drive();
        drive.set_direction(dir);
        drive.set_duty(1);

        let mut sim = sim(drive);
        sim.step(); // compare fires at count 1
        assert_eq!(
            sim.core().stage().port().writes,
            vec![(leg, true), (other, false)],
            "{dir:?} write order"
        );
    }
}

#[test]
fn stopped_duty_keeps_brake_for_the_whole_period() {
    let drive = leaked_drive();
    drive.set_direction(DirectionCode::Forward);
    drive.set_duty(255);

    let mut sim = sim(drive);
    sim.run(254);
    // No compare yet, no overflow yet: lines untouched.
    assert!(sim.core().stage().port().writes.is_empty());
    sim.run(2); // compare at 255, overflow right after
    assert!(sim.core().stage().port().is_braking());
}
