//! Sky Hopper entry point
//!
//! On the web this boots the browser driver. Natively there is no window: the
//! binary plays a few autopilot runs headless and logs the results.

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
#[wasm_bindgen(start)]
pub fn wasm_main() -> Result<(), JsValue> {
    sky_hopper::platform::web::run()
}

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use std::path::PathBuf;

    use sky_hopper::platform::native::{Clock, HeadlessRunner};
    use sky_hopper::sim::PcgRandom;
    use sky_hopper::stats::JsonFileStatsStore;
    use sky_hopper::{Collaborators, Session, SimConfig};

    env_logger::init();
    log::info!("Sky Hopper (native) starting...");

    // Usage: sky-hopper [config.json] [runs] [--realtime]
    let args: Vec<String> = std::env::args().skip(1).collect();
    let realtime = args.iter().any(|a| a == "--realtime");
    let mut positional = args.iter().filter(|a| !a.starts_with("--"));
    let config = positional
        .next()
        .map(|path| SimConfig::load_or_default(&PathBuf::from(path)))
        .unwrap_or_default();
    let runs = positional
        .next()
        .and_then(|n| n.parse().ok())
        .unwrap_or(3);

    let collaborators = Collaborators {
        stats: Box::new(JsonFileStatsStore::new(
            std::env::temp_dir().join("sky_hopper").join("stats.json"),
        )),
        ..Collaborators::offline()
    };
    let session = Session::new(config, collaborators, Box::new(PcgRandom::from_entropy()));

    let clock = if realtime { Clock::Realtime } else { Clock::Simulated };
    let mut runner = HeadlessRunner::new(session, clock);
    let report = runner.run(runs);

    for (i, run) in report.runs.iter().enumerate() {
        log::info!(
            "Run {}: pipes {}, coins {}, diamonds {}, max combo {} (total {})",
            i + 1,
            run.pipe_score,
            run.coin_score,
            run.diamonds,
            run.max_combo,
            run.total()
        );
    }
    if report.unfinished > 0 {
        log::info!("{} run(s) hit the frame limit", report.unfinished);
    }
    log::info!("{} frames, best total {}", report.frames, report.high_score);
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
