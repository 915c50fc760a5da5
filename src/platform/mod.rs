//! Platform abstraction layer
//!
//! [`GameLoop`] pairs a [`Session`] with a [`FrameScheduler`] and keeps the
//! registered frame callback in line with the session phase. Hosts only feed
//! it timestamps and input:
//! - `native`: headless runner (sleep-paced or simulated clock)
//! - `web`: `requestAnimationFrame` driver, DOM input, LocalStorage

#[cfg(not(target_arch = "wasm32"))]
pub mod native;
#[cfg(target_arch = "wasm32")]
pub mod web;

use crate::input::InputEvent;
use crate::scheduler::{FrameScheduler, FrameToken};
use crate::session::{FrameLoop, Session};
use crate::sim::GameEvent;

/// Result of one host frame
#[derive(Debug, Default)]
pub struct FrameResult {
    /// Token to request the next frame with. `None` means no loop is running.
    pub next: Option<FrameToken>,
    pub events: Vec<GameEvent>,
}

/// Session plus scheduler, with at most one registered frame loop
pub struct GameLoop {
    session: Session,
    scheduler: FrameScheduler,
    registered: Option<FrameLoop>,
    /// Set by `suspend`; nothing is (re)registered until `resume`
    suspended: bool,
}

impl GameLoop {
    pub fn new(session: Session) -> Self {
        let scheduler = FrameScheduler::new(session.config().max_frame_ms);
        Self {
            session,
            scheduler,
            registered: None,
            suspended: false,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn session_mut(&mut self) -> &mut Session {
        &mut self.session
    }

    /// Frame loop currently registered with the scheduler
    pub fn registered(&self) -> Option<FrameLoop> {
        self.registered
    }

    pub fn frames(&self) -> u64 {
        self.scheduler.frames()
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    /// Swap the registered loop if the session wants a different one.
    ///
    /// Returns a fresh token when a loop was started; the host must request a
    /// frame with it. Tokens of the previous loop go stale.
    pub fn sync(&mut self, now_ms: f64) -> Option<FrameToken> {
        if self.suspended {
            return None;
        }
        let wanted = self.session.frame_loop();
        if wanted == self.registered {
            return None;
        }

        self.scheduler.stop();
        self.registered = wanted;
        log::debug!("Frame loop: {:?}", wanted);
        wanted.map(|_| {
            self.scheduler
                .set_max_elapsed_ms(self.session.config().max_frame_ms);
            self.scheduler.start(now_ms)
        })
    }

    /// Handle one display frame delivered with `token`
    pub fn frame(&mut self, token: FrameToken, now_ms: f64) -> FrameResult {
        let mut events = Vec::new();
        let next = match self.registered {
            Some(kind) => {
                // A staged config may change the elapsed cap for this very frame
                if self.session.apply_pending_config() {
                    self.scheduler
                        .set_max_elapsed_ms(self.session.config().max_frame_ms);
                }
                let session = &mut self.session;
                self.scheduler.on_frame(token, now_ms, |elapsed| {
                    session.run_frame(kind, elapsed, &mut events)
                })
            }
            None => None,
        };
        let restarted = self.sync(now_ms);
        FrameResult {
            next: restarted.or(next),
            events,
        }
    }

    /// Route input, then re-sync the loop (input can start a run)
    pub fn handle_input(&mut self, event: InputEvent, now_ms: f64) -> FrameResult {
        let events = self.session.handle_input(event);
        FrameResult {
            next: self.sync(now_ms),
            events,
        }
    }

    /// Stop all callbacks (page hidden, window closed)
    pub fn suspend(&mut self) {
        self.scheduler.stop();
        self.registered = None;
        self.suspended = true;
    }

    /// Undo [`suspend`](Self::suspend); the elapsed baseline restarts at `now_ms`
    pub fn resume(&mut self, now_ms: f64) -> Option<FrameToken> {
        self.suspended = false;
        self.sync(now_ms)
    }
}
