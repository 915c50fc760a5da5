//! Session controller
//!
//! Owns the simulation state and drives the START -> PLAYING -> GAME_OVER
//! state machine. Physics lives in `sim`; this module only sequences it,
//! keeps score, and talks to collaborators (statistics, leaderboard, audio).
//!
//! Collaborator failures are caught here and logged. They never reach the
//! simulation.

use crate::audio::{AudioSink, NullAudio, SoundEffect};
use crate::config::SimConfig;
use crate::input::{Command, InputEvent, command_for};
use crate::leaderboard::{Leaderboard, LeaderboardEntry, LocalLeaderboard};
use crate::scheduler::FrameControl;
use crate::sim::{
    CollisionKind, GameEvent, GamePhase, PickupBatch, RandomSource, RunSummary, SimState, flap,
    idle_tick, tick,
};
use crate::stats::{MemoryStatsStore, Statistics, StatsStore};

/// External services the session reports to
pub struct Collaborators {
    pub stats: Box<dyn StatsStore>,
    pub leaderboard: Box<dyn Leaderboard>,
    pub audio: Box<dyn AudioSink>,
}

impl Collaborators {
    /// In-memory statistics and leaderboard, no sound
    pub fn offline() -> Self {
        Self {
            stats: Box::new(MemoryStatsStore::default()),
            leaderboard: Box::new(LocalLeaderboard::new()),
            audio: Box::new(NullAudio),
        }
    }
}

/// Which frame callback the host should have registered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLoop {
    /// Active physics
    Simulation,
    /// Entry-screen animation
    Ambient,
}

/// Per-run score bookkeeping
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScoreState {
    /// Obstacles passed
    pub pipe_score: u32,
    /// Pickup points, combo-multiplied
    pub coin_score: u32,
    /// Pickups collected this run; never decays mid-run
    pub combo: u32,
    pub max_combo: u32,
    /// Rare pickups collected
    pub diamonds: u32,
}

/// Points from one pickup batch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BatchScore {
    pub multiplier: u32,
    pub awarded: u32,
}

impl ScoreState {
    /// Fold a pickup batch into the score. The combo grows by the batch size
    /// first; the multiplier is chosen from the updated combo.
    pub fn apply_batch(&mut self, batch: &PickupBatch, config: &SimConfig) -> BatchScore {
        self.combo = self.combo.saturating_add(batch.count());
        self.max_combo = self.max_combo.max(self.combo);
        self.diamonds = self.diamonds.saturating_add(batch.rare_count());

        // Tuning can push the multiplier anywhere; scores saturate
        let multiplier = config.multiplier_for(self.combo);
        let awarded = batch.value().saturating_mul(multiplier);
        self.coin_score = self.coin_score.saturating_add(awarded);
        BatchScore {
            multiplier,
            awarded,
        }
    }

    pub fn summary(&self) -> RunSummary {
        RunSummary {
            pipe_score: self.pipe_score,
            coin_score: self.coin_score,
            diamonds: self.diamonds,
            max_combo: self.max_combo,
        }
    }
}

/// One game session: state machine, scores and collaborator wiring
pub struct Session {
    phase: GamePhase,
    config: SimConfig,
    /// Replacement config, applied at the start of the next tick
    pending_config: Option<SimConfig>,
    state: SimState,
    score: ScoreState,
    /// Best total, as last reported by the statistics store
    high_score: u64,
    stats: Statistics,
    last_summary: Option<RunSummary>,
    player_name: Option<String>,
    overlay_focused: bool,
    muted: bool,
    rng: Box<dyn RandomSource>,
    collaborators: Collaborators,
}

impl Session {
    pub fn new(
        config: SimConfig,
        mut collaborators: Collaborators,
        mut rng: Box<dyn RandomSource>,
    ) -> Self {
        let stats = collaborators.stats.load().unwrap_or_else(|e| {
            log::warn!("Statistics unavailable, starting fresh: {}", e);
            Statistics::default()
        });
        let state = SimState::new(&config, rng.as_mut());

        Self {
            phase: GamePhase::Start,
            config,
            pending_config: None,
            state,
            score: ScoreState::default(),
            high_score: stats.best_total,
            stats,
            last_summary: None,
            player_name: None,
            overlay_focused: false,
            muted: false,
            rng,
            collaborators,
        }
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn state(&self) -> &SimState {
        &self.state
    }

    pub fn score(&self) -> &ScoreState {
        &self.score
    }

    pub fn high_score(&self) -> u64 {
        self.high_score
    }

    pub fn statistics(&self) -> &Statistics {
        &self.stats
    }

    /// Scores of the most recently finished run
    pub fn last_summary(&self) -> Option<RunSummary> {
        self.last_summary
    }

    /// Name used for leaderboard submissions. `None` skips submission.
    pub fn set_player_name(&mut self, name: Option<String>) {
        self.player_name = name;
    }

    /// While set, all input is ignored (text entry, dialogs)
    pub fn set_overlay_focused(&mut self, focused: bool) {
        self.overlay_focused = focused;
    }

    pub fn is_muted(&self) -> bool {
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
        self.collaborators.audio.set_muted(muted);
        log::debug!("Audio muted: {}", muted);
    }

    pub fn toggle_muted(&mut self) -> bool {
        self.set_muted(!self.muted);
        self.muted
    }

    /// Master volume, 0.0 - 1.0
    pub fn set_volume(&mut self, volume: f32) {
        self.collaborators.audio.set_volume(volume);
    }

    /// Stage a new configuration; it takes effect on the next tick
    pub fn replace_config(&mut self, config: SimConfig) {
        self.pending_config = Some(config);
    }

    /// Frame callback the host should be running, if any
    pub fn frame_loop(&self) -> Option<FrameLoop> {
        match self.phase {
            GamePhase::Start => Some(FrameLoop::Ambient),
            GamePhase::Playing => Some(FrameLoop::Simulation),
            GamePhase::GameOver => None,
        }
    }

    /// Fresh actor, obstacles and pickups; scores and combo back to zero.
    /// Does not change the phase.
    pub fn reset(&mut self) {
        self.apply_pending_config();
        self.state = SimState::new(&self.config, self.rng.as_mut());
        self.score = ScoreState::default();
    }

    /// START/GAME_OVER -> PLAYING. Ignored while already playing.
    pub fn start(&mut self) -> Vec<GameEvent> {
        if self.phase == GamePhase::Playing {
            return Vec::new();
        }
        self.reset();
        self.phase = GamePhase::Playing;
        log::info!("Game started (high score {})", self.high_score);
        self.emit(vec![GameEvent::Started])
    }

    /// Apply the impulse. Only meaningful while playing.
    pub fn flap(&mut self) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        self.state.actor = flap(self.state.actor, &self.config);
        self.emit(vec![GameEvent::Flapped])
    }

    /// Route a host input event
    pub fn handle_input(&mut self, event: InputEvent) -> Vec<GameEvent> {
        let Some(command) = command_for(event, self.overlay_focused) else {
            return Vec::new();
        };
        match (command, self.phase) {
            (Command::Impulse, GamePhase::Playing) => self.flap(),
            (Command::Impulse, _) => {
                let mut events = self.start();
                events.extend(self.flap());
                events
            }
            (Command::Start, GamePhase::Playing) => Vec::new(),
            (Command::Start, _) => self.start(),
        }
    }

    /// One active simulation tick
    pub fn tick(&mut self, elapsed_ms: f32) -> Vec<GameEvent> {
        if self.phase != GamePhase::Playing {
            return Vec::new();
        }
        self.apply_pending_config();

        let state = std::mem::take(&mut self.state);
        let (state, outcome) = tick(state, &self.config, elapsed_ms, self.rng.as_mut());
        self.state = state;

        if let Some(kind) = outcome.collision {
            return self.enter_game_over(kind);
        }

        let mut events = Vec::new();
        for _ in 0..outcome.passed {
            self.score.pipe_score = self.score.pipe_score.saturating_add(1);
            events.push(GameEvent::Scored {
                pipe_score: self.score.pipe_score,
            });
        }

        if !outcome.batch.is_empty() {
            let batch = &outcome.batch;
            let scored = self.score.apply_batch(batch, &self.config);
            log::debug!(
                "Collected {} pickup(s), combo {}, x{} -> +{}",
                batch.count(),
                self.score.combo,
                scored.multiplier,
                scored.awarded
            );
            events.push(GameEvent::PickupsCollected {
                count: batch.count(),
                rare: batch.rare_count(),
                value: batch.value(),
                combo: self.score.combo,
                multiplier: scored.multiplier,
                awarded: scored.awarded,
            });
        }

        self.emit(events)
    }

    /// One ambient tick on the entry screen
    pub fn idle_tick(&mut self, elapsed_ms: f32) {
        if self.phase != GamePhase::Start {
            return;
        }
        self.apply_pending_config();
        let state = std::mem::take(&mut self.state);
        self.state = idle_tick(state, &self.config, elapsed_ms);
    }

    /// Scheduler callback for `kind`. Asks the scheduler to stop once the
    /// session no longer wants this loop, so the host can swap callbacks.
    pub fn run_frame(
        &mut self,
        kind: FrameLoop,
        elapsed_ms: f32,
        events: &mut Vec<GameEvent>,
    ) -> FrameControl {
        if self.frame_loop() != Some(kind) {
            return FrameControl::Stop;
        }
        match kind {
            FrameLoop::Simulation => events.extend(self.tick(elapsed_ms)),
            FrameLoop::Ambient => self.idle_tick(elapsed_ms),
        }
        if self.frame_loop() == Some(kind) {
            FrameControl::Continue
        } else {
            FrameControl::Stop
        }
    }

    /// Wipe lifetime statistics
    pub fn reset_statistics(&mut self) {
        match self.collaborators.stats.reset_totals() {
            Ok(fresh) => {
                self.high_score = fresh.best_total;
                self.stats = fresh;
            }
            Err(e) => log::warn!("Failed to reset statistics: {}", e),
        }
    }

    /// Leaderboard top entries; empty if the leaderboard is unreachable
    pub fn leaderboard_top(&self, n: usize) -> Vec<LeaderboardEntry> {
        self.collaborators
            .leaderboard
            .fetch_top_entries(n)
            .unwrap_or_else(|e| {
                log::warn!("Failed to fetch leaderboard: {}", e);
                Vec::new()
            })
    }

    /// PLAYING -> GAME_OVER entry action. Runs exactly once per run.
    fn enter_game_over(&mut self, kind: CollisionKind) -> Vec<GameEvent> {
        self.phase = GamePhase::GameOver;
        let summary = self.score.summary();
        let total = summary.total();
        self.last_summary = Some(summary);
        log::info!(
            "Game over ({:?}): pipes {}, coins {}, diamonds {}, max combo {}",
            kind,
            summary.pipe_score,
            summary.coin_score,
            summary.diamonds,
            summary.max_combo
        );

        let mut events = vec![GameEvent::Collided(kind), GameEvent::GameOver(summary)];
        let previous_best = self.high_score;

        match self.collaborators.stats.record_game_result(&summary) {
            Ok(stats) => {
                if stats.achievement_unlocked && !self.stats.achievement_unlocked {
                    events.push(GameEvent::AchievementUnlocked {
                        threshold: self.collaborators.stats.achievement_threshold(),
                    });
                }
                self.high_score = stats.best_total;
                self.stats = stats;
            }
            Err(e) => {
                log::warn!("Failed to record game result: {}", e);
                self.high_score = self.high_score.max(total);
            }
        }

        if self.high_score > previous_best {
            events.push(GameEvent::HighScore {
                best_total: self.high_score,
            });
        }

        self.submit_to_leaderboard(total);
        self.emit(events)
    }

    fn submit_to_leaderboard(&mut self, total: u64) {
        if total == 0 || total < self.collaborators.leaderboard.min_score() {
            return;
        }
        let Some(name) = self.player_name.as_deref() else {
            log::debug!("No player name set, skipping leaderboard submission");
            return;
        };
        match self.collaborators.leaderboard.submit_score(name, total) {
            Ok(true) => log::info!("Leaderboard accepted {} for {}", total, name),
            Ok(false) => log::debug!("Leaderboard kept previous best for {}", name),
            Err(e) => log::warn!("Leaderboard submission failed: {}", e),
        }
    }

    /// Swap in a staged configuration, if any. Returns true if one was applied.
    pub fn apply_pending_config(&mut self) -> bool {
        match self.pending_config.take() {
            Some(config) => {
                log::info!("Applying new configuration");
                self.config = config;
                true
            }
            None => false,
        }
    }

    /// Forward events to audio and hand them back to the caller
    fn emit(&mut self, events: Vec<GameEvent>) -> Vec<GameEvent> {
        for effect in events.iter().filter_map(SoundEffect::for_event) {
            self.collaborators.audio.play(effect);
        }
        events
    }
}
