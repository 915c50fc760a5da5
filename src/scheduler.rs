//! Frame pacing
//!
//! The host (browser `requestAnimationFrame`, a native sleep loop, a test)
//! calls [`FrameScheduler::on_frame`] once per display frame with the token it
//! was handed. The scheduler turns wall-clock timestamps into a clamped
//! elapsed time and invokes the tick callback.
//!
//! Cancellation is tied to the token: every start/stop bumps a generation
//! counter, so a frame request issued before a stop can never fire a tick
//! afterwards, even if the host delivers it.

use crate::consts::MAX_FRAME_MS;

/// Registration token for the active frame loop
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FrameToken(u64);

/// Whether the loop should keep going after a callback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameControl {
    Continue,
    Stop,
}

/// Converts display frames into clamped elapsed-time ticks
#[derive(Debug, Clone)]
pub struct FrameScheduler {
    generation: u64,
    running: bool,
    /// Timestamp of the previous callback (or of `start`)
    last_time_ms: f64,
    max_elapsed_ms: f64,
    /// Callbacks invoked since the last start
    frames: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new(MAX_FRAME_MS)
    }
}

impl FrameScheduler {
    pub fn new(max_elapsed_ms: f64) -> Self {
        Self {
            generation: 0,
            running: false,
            last_time_ms: 0.0,
            max_elapsed_ms: sanitize_cap(max_elapsed_ms),
            frames: 0,
        }
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    /// Change the elapsed-time cap. Applies from the next frame.
    pub fn set_max_elapsed_ms(&mut self, max_elapsed_ms: f64) {
        self.max_elapsed_ms = sanitize_cap(max_elapsed_ms);
    }

    /// Begin (or restart) scheduling from `now_ms`.
    ///
    /// Any previously issued token is invalidated and the elapsed-time
    /// baseline is reset, so the first frame never sees a stale timestamp.
    pub fn start(&mut self, now_ms: f64) -> FrameToken {
        self.generation += 1;
        self.running = true;
        self.last_time_ms = now_ms;
        self.frames = 0;
        log::debug!("Frame scheduler started (generation {})", self.generation);
        FrameToken(self.generation)
    }

    /// Stop scheduling. Outstanding tokens become stale immediately.
    pub fn stop(&mut self) {
        if self.running {
            self.generation += 1;
            self.running = false;
            log::debug!("Frame scheduler stopped after {} frames", self.frames);
        }
    }

    /// Apply a "should run" flag. Returns a token only when this call started
    /// the loop; the host must request a frame with it.
    pub fn set_running(&mut self, should_run: bool, now_ms: f64) -> Option<FrameToken> {
        match (should_run, self.running) {
            (true, false) => Some(self.start(now_ms)),
            (false, true) => {
                self.stop();
                None
            }
            _ => None,
        }
    }

    /// Token for the live loop, if running
    pub fn current_token(&self) -> Option<FrameToken> {
        self.running.then_some(FrameToken(self.generation))
    }

    /// Handle one display frame.
    ///
    /// Runs `callback` with the elapsed milliseconds since the previous frame,
    /// clamped to `[0, max_elapsed_ms]`. Returns the token to request the next
    /// frame with, or `None` if the token was stale or the loop stopped.
    pub fn on_frame<F>(&mut self, token: FrameToken, now_ms: f64, callback: F) -> Option<FrameToken>
    where
        F: FnOnce(f32) -> FrameControl,
    {
        if !self.running || token.0 != self.generation {
            log::trace!("Dropping stale frame token {:?}", token);
            return None;
        }

        let elapsed = (now_ms - self.last_time_ms).min(self.max_elapsed_ms).max(0.0);
        self.last_time_ms = now_ms;
        self.frames += 1;

        match callback(elapsed as f32) {
            FrameControl::Continue => Some(token),
            FrameControl::Stop => {
                self.stop();
                None
            }
        }
    }
}

/// Negative or NaN caps become 0: time stands still
fn sanitize_cap(max_elapsed_ms: f64) -> f64 {
    if max_elapsed_ms.is_nan() {
        0.0
    } else {
        max_elapsed_ms.max(0.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_elapsed_is_measured_and_clamped() {
        let mut scheduler = FrameScheduler::default();
        let token = scheduler.start(1000.0);

        let mut seen = Vec::new();
        let token = scheduler
            .on_frame(token, 1016.0, |dt| {
                seen.push(dt);
                FrameControl::Continue
            })
            .unwrap();
        // Long stall (tab in background) is capped
        scheduler.on_frame(token, 6000.0, |dt| {
            seen.push(dt);
            FrameControl::Continue
        });

        assert_eq!(seen, vec![16.0, MAX_FRAME_MS as f32]);
        assert_eq!(scheduler.frames(), 2);
    }

    #[test]
    fn test_clock_going_backwards_is_zero() {
        let mut scheduler = FrameScheduler::default();
        let token = scheduler.start(500.0);
        let mut seen = None;
        scheduler.on_frame(token, 400.0, |dt| {
            seen = Some(dt);
            FrameControl::Continue
        });
        assert_eq!(seen, Some(0.0));
    }

    #[test]
    fn test_stale_token_never_fires() {
        let mut scheduler = FrameScheduler::default();
        let old = scheduler.start(0.0);
        scheduler.stop();

        let mut fired = false;
        assert!(scheduler
            .on_frame(old, 16.0, |_| {
                fired = true;
                FrameControl::Continue
            })
            .is_none());
        assert!(!fired);

        // Restarting issues a new token; the old one stays dead
        let new = scheduler.start(100.0);
        assert_ne!(old, new);
        assert!(scheduler.on_frame(old, 116.0, |_| FrameControl::Continue).is_none());
        assert_eq!(scheduler.on_frame(new, 116.0, |_| FrameControl::Continue), Some(new));
    }

    #[test]
    fn test_resume_resets_baseline() {
        let mut scheduler = FrameScheduler::default();
        let token = scheduler.start(0.0);
        scheduler.on_frame(token, 10.0, |_| FrameControl::Continue);
        scheduler.stop();

        let token = scheduler.start(10_000.0);
        let mut seen = None;
        scheduler.on_frame(token, 10_008.0, |dt| {
            seen = Some(dt);
            FrameControl::Continue
        });
        assert_eq!(seen, Some(8.0));
    }

    #[test]
    fn test_callback_can_stop_loop() {
        let mut scheduler = FrameScheduler::default();
        let token = scheduler.start(0.0);
        assert!(scheduler.on_frame(token, 16.0, |_| FrameControl::Stop).is_none());
        assert!(!scheduler.is_running());
        assert!(scheduler.on_frame(token, 32.0, |_| FrameControl::Continue).is_none());
    }

    #[test]
    fn test_set_running_transitions() {
        let mut scheduler = FrameScheduler::default();
        let token = scheduler.set_running(true, 0.0);
        assert!(token.is_some());
        assert_eq!(scheduler.current_token(), token);
        assert!(scheduler.set_running(true, 5.0).is_none());
        assert!(scheduler.set_running(false, 10.0).is_none());
        assert!(!scheduler.is_running());
        assert!(scheduler.current_token().is_none());
    }

    #[test]
    fn test_nonsense_cap_yields_zero_elapsed() {
        for cap in [-1.0, f64::NAN, f64::NEG_INFINITY] {
            let mut scheduler = FrameScheduler::new(cap);
            let token = scheduler.start(0.0);
            let mut seen = None;
            let next = scheduler.on_frame(token, 50.0, |dt| {
                seen = Some(dt);
                FrameControl::Continue
            });
            assert_eq!(next, Some(token));
            assert_eq!(seen, Some(0.0));
        }

        let mut scheduler = FrameScheduler::default();
        scheduler.set_max_elapsed_ms(-5.0);
        let token = scheduler.start(0.0);
        let mut seen = None;
        scheduler.on_frame(token, 20.0, |dt| {
            seen = Some(dt);
            FrameControl::Continue
        });
        assert_eq!(seen, Some(0.0));
    }
}
