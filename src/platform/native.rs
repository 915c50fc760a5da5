//! Native host: headless runs driven by the autopilot
//!
//! No window. Frames come from a sleep loop at ~60 Hz, or from a simulated
//! clock when running as fast as possible.

use std::thread;
use std::time::{Duration, Instant};

use super::{FrameResult, GameLoop};
use crate::consts::REFERENCE_FRAME_MS;
use crate::input::{InputEvent, Key};
use crate::scheduler::FrameToken;
use crate::session::Session;
use crate::sim::{GameEvent, GamePhase, RunSummary, autopilot};

/// Entry-screen frames shown before the first run
const AMBIENT_FRAMES: u32 = 30;

/// How the runner advances time
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clock {
    /// Wall clock, sleeping between frames
    Realtime,
    /// Fixed reference-frame steps, no sleeping
    Simulated,
}

/// What a headless session produced
#[derive(Debug, Clone, Default)]
pub struct RunReport {
    /// Finished runs, in order
    pub runs: Vec<RunSummary>,
    /// Runs cut off by the frame limit
    pub unfinished: u32,
    pub frames: u64,
    pub high_score: u64,
}

impl RunReport {
    pub fn best(&self) -> Option<&RunSummary> {
        self.runs.iter().max_by_key(|r| r.total())
    }
}

/// Plays runs back to back with the autopilot at the controls
pub struct HeadlessRunner {
    game: GameLoop,
    clock: Clock,
    /// Frame cap per run; a perfect autopilot would otherwise never crash
    max_frames_per_run: u64,
    epoch: Instant,
    simulated_ms: f64,
}

impl HeadlessRunner {
    pub fn new(session: Session, clock: Clock) -> Self {
        Self {
            game: GameLoop::new(session),
            clock,
            max_frames_per_run: 10_000,
            epoch: Instant::now(),
            simulated_ms: 0.0,
        }
    }

    pub fn with_frame_limit(mut self, max_frames_per_run: u64) -> Self {
        self.max_frames_per_run = max_frames_per_run;
        self
    }

    pub fn session(&self) -> &Session {
        self.game.session()
    }

    /// Play `runs` games and report the results
    pub fn run(&mut self, runs: u32) -> RunReport {
        let mut report = RunReport::default();
        let mut token = self.game.sync(self.now_ms());

        for _ in 0..AMBIENT_FRAMES {
            let Some(t) = token else { break };
            token = self.step(t, &mut report).next;
        }

        for run in 0..runs {
            token = self
                .game
                .handle_input(InputEvent::KeyDown(Key::Enter), self.now_ms())
                .next
                .or(token);
            let mut frames = 0;

            while self.game.session().phase() == GamePhase::Playing {
                if frames >= self.max_frames_per_run {
                    log::warn!("Run {} hit the frame limit, abandoning", run + 1);
                    report.unfinished += 1;
                    // Next run starts from a fresh field without leaving play
                    self.game.session_mut().reset();
                    break;
                }
                let session = self.game.session();
                if autopilot::should_flap(session.state(), session.config()) {
                    self.game
                        .handle_input(InputEvent::KeyDown(Key::Space), self.now_ms());
                }
                let Some(t) = token else { break };
                let result = self.step(t, &mut report);
                token = result.next;
                frames += 1;

                if let Some(GameEvent::GameOver(summary)) = result
                    .events
                    .iter()
                    .find(|e| matches!(e, GameEvent::GameOver(_)))
                {
                    log::info!("Run {} finished: total {}", run + 1, summary.total());
                    report.runs.push(*summary);
                }
            }
        }

        report.high_score = self.game.session().high_score();
        report
    }

    fn step(&mut self, token: FrameToken, report: &mut RunReport) -> FrameResult {
        self.wait_for_frame();
        report.frames += 1;
        self.game.frame(token, self.now_ms())
    }

    fn wait_for_frame(&mut self) {
        match self.clock {
            Clock::Realtime => thread::sleep(Duration::from_secs_f32(REFERENCE_FRAME_MS / 1000.0)),
            Clock::Simulated => self.simulated_ms += f64::from(REFERENCE_FRAME_MS),
        }
    }

    fn now_ms(&self) -> f64 {
        match self.clock {
            Clock::Realtime => self.epoch.elapsed().as_secs_f64() * 1000.0,
            Clock::Simulated => self.simulated_ms,
        }
    }
}
