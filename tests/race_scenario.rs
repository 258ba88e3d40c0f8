use racer_core::behaviors::Situation;
use racer_core::config::RaceConfig;
use racer_core::hardware::sim::{Actuation, SimHardware};
use racer_core::hardware::Clock;
use racer_core::lifecycle::{LifecycleNode, State};
use racer_core::perception::ColorLabel;
use racer_core::race::{RaceController, RacePhase};
use racer_core::RacerCore;

const GREEN: (i32, i32, i32) = (10, 60, 20);
const RED: (i32, i32, i32) = (70, 10, 10);
const WHITE: (i32, i32, i32) = (80, 80, 80);
const MAGENTA: (i32, i32, i32) = (60, 10, 60);

fn started() -> SimHardware {
    SimHardware::new().with_button_press(0..50)
}

fn activated(hw: SimHardware) -> RaceController<SimHardware> {
    let mut controller = RaceController::new(hw, RaceConfig::default());
    controller.on_configure().unwrap();
    controller.on_activate().unwrap();
    controller
}

#[test]
fn three_spaced_markers_complete_the_race() {
    let hw = started()
        .with_color(1000..1010, WHITE)
        .with_color(4000..4010, WHITE)
        .with_color(7000..7010, WHITE);
    let mut controller = activated(hw);

    let mut phases = vec![controller.phase()];
    for _ in 0..2000 {
        let phase = controller.step().unwrap();
        if phases.last() != Some(&phase) {
            phases.push(phase);
        }
        if phase == RacePhase::Parking {
            break;
        }
    }

    assert_eq!(
        phases,
        vec![RacePhase::WaitForStart, RacePhase::Racing, RacePhase::Parking]
    );
    let laps = controller.laps();
    assert_eq!(laps.laps_completed, 3);
    assert_eq!(laps.last_lap_marker_time_ms, Some(7000));

    let summary = controller.summary();
    assert_eq!(summary.situation_count(Situation::NoAction), summary.iterations as u32);
    let steering = controller
        .hardware()
        .actuations()
        .filter(|a| matches!(a, Actuation::SteerAngle(_)))
        .count();
    // only the straighten from the rest posture
    assert_eq!(steering, 1);
    assert_eq!(controller.hardware().drive_speed(), 0);
}

fn course() -> SimHardware {
    let mut hw = started();
    for lap in 0..3u64 {
        let base = 500 + lap * 5000;
        let pillar = if lap % 2 == 0 { GREEN } else { RED };
        hw = hw
            .with_side(base..base + 10, 100)
            .with_front(base + 1000..base + 1010, 220)
            .with_side(base + 1000..base + 1010, 500)
            .with_color(base + 1000..base + 1400, pillar)
            .with_front(base + 2000..base + 2010, 150)
            .with_side(base + 2000..base + 2010, 800)
            .with_color(base + 3500..base + 3510, WHITE);
    }
    hw.with_color(15_500..80_000, MAGENTA)
}

#[test]
fn full_race_through_pillars_corners_and_parking() {
    let mut core = RacerCore::new(course(), RaceConfig::default());
    core.init().unwrap();
    let summary = core.run().unwrap();

    assert_eq!(core.controller().phase(), RacePhase::Finished);
    assert_eq!(summary.laps.laps_completed, 3);
    assert_eq!(summary.laps.last_lap_marker_time_ms, Some(14_000));
    assert_eq!(summary.situation_count(Situation::WallTooNear), 3);
    assert_eq!(summary.situation_count(Situation::PillarCandidate), 3);
    assert_eq!(summary.situation_count(Situation::CornerRightOpen), 3);
    assert_eq!(summary.situation_count(Situation::CornerLeftFailsafe), 0);
    assert_eq!(summary.verdict_count(ColorLabel::Green), 2);
    assert_eq!(summary.verdict_count(ColorLabel::Red), 1);
    assert!(summary.parking_votes >= 1);

    let hw = core.controller().hardware();
    assert!(hw.now_ms() >= 15_500);
    let tail: Vec<_> = hw.actuations().collect();
    assert_eq!(
        &tail[tail.len() - 4..],
        &[
            Actuation::SteerAngle(30),
            Actuation::DriveSpeed(300),
            Actuation::StopDrive,
            Actuation::SteerAngle(0),
        ]
    );

    core.shutdown().unwrap();
    assert_eq!(core.controller().lifecycle_state(), State::Unconfigured);
    assert_eq!(core.controller().hardware().drive_speed(), 0);
}

#[test]
fn dead_distance_sensors_degrade_to_cruising() {
    let mut hw = started()
        .with_default_distances(100, 100)
        .with_color(1000..1010, WHITE);
    hw.fail_distance_reads(true, true);
    let mut controller = activated(hw);

    while controller.hardware().now_ms() < 1500 {
        controller.step().unwrap();
    }

    assert_eq!(controller.phase(), RacePhase::Racing);
    assert_eq!(controller.laps().laps_completed, 1);
    let summary = controller.summary();
    assert_eq!(summary.situation_count(Situation::NoAction), summary.iterations as u32);
    assert_eq!(controller.hardware().drive_speed(), 400);
}

#[test]
fn dead_color_sensor_never_counts_laps() {
    let mut hw = started().with_color(0..100_000, WHITE);
    hw.fail_color_reads(true);
    let mut controller = activated(hw);

    while controller.hardware().now_ms() < 10_000 {
        controller.step().unwrap();
    }
    assert_eq!(controller.laps().laps_completed, 0);
    assert_eq!(controller.phase(), RacePhase::Racing);
}

#[test]
fn run_refuses_an_unconfigured_core() {
    let mut core = RacerCore::new(course(), RaceConfig::default());
    assert!(core.run().is_err());
    assert_eq!(core.controller().hardware().actuations().count(), 0);
}
