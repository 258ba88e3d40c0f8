use anyhow::{Context, Result};
use racer_core::behaviors::Situation;
use racer_core::config::RaceConfig;
use racer_core::hardware::sim::SimHardware;
use racer_core::perception::ColorLabel;
use racer_core::RacerCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

const GREEN: (i32, i32, i32) = (10, 60, 20);
const RED: (i32, i32, i32) = (70, 10, 10);
const WHITE: (i32, i32, i32) = (80, 80, 80);
const MAGENTA: (i32, i32, i32) = (60, 10, 60);

const LAP_MS: u64 = 5000;

/// A course where every lap has a wall graze, a pillar, a right-hand corner
/// and the lap tile, in that order. Pillars alternate green and red.
fn simulated_course(laps: u32) -> SimHardware {
    let mut hw = SimHardware::new().with_button_press(0..50);
    for lap in 0..u64::from(laps) {
        let base = 500 + lap * LAP_MS;
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
    let parking_from = 500 + u64::from(laps) * LAP_MS;
    hw.with_color(parking_from..parking_from + 60_000, MAGENTA)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("racer_core=info,test_core=info")),
        )
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => RaceConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => RaceConfig::default(),
    };
    info!("Initializing racer core for {} laps", config.laps.target_laps);

    let hw = simulated_course(config.laps.target_laps);
    let mut core = RacerCore::new(hw, config);
    core.init().context("failed to initialize core")?;

    let summary = core.run().context("race aborted")?;

    core.shutdown().context("failed to shut down core")?;

    println!("Laps completed: {}", summary.laps.laps_completed);
    println!("Control iterations: {}", summary.iterations);
    println!(
        "Corners: {} right, {} left failsafe; wall nudges: {}",
        summary.situation_count(Situation::CornerRightOpen),
        summary.situation_count(Situation::CornerLeftFailsafe),
        summary.situation_count(Situation::WallTooNear),
    );
    println!(
        "Pillars: {} green, {} red, {} unknown",
        summary.verdict_count(ColorLabel::Green),
        summary.verdict_count(ColorLabel::Red),
        summary.verdict_count(ColorLabel::Unknown),
    );
    println!(
        "Parked after {} votes at t={}ms",
        summary.parking_votes,
        core.controller().hardware().timed_actuations().last().map_or(0, |(t, _)| *t)
    );
    Ok(())
}
