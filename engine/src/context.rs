//! State shared with game hooks during a run

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::trace;

use crate::clock::FrameClock;
use crate::config::WindowConfig;
use crate::input::InputState;

/// `running` / `ended` flags of the loop.
///
/// `ended` only ever goes from `false` to `true`, and while it is set
/// [`RunState::running`] reads `false` whatever was last stored.
#[derive(Debug, Default)]
pub struct RunState {
    running: bool,
    ended: bool,
}

impl RunState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn running(&self) -> bool {
        if self.ended && self.running {
            trace!("Running is true but the game was already marked as ended, forcing false");
            return false;
        }
        self.running
    }

    pub fn set_running(&mut self, running: bool) {
        self.running = running;
    }

    pub fn ended(&self) -> bool {
        self.ended
    }

    /// Mark the game as finished. There is no way back.
    pub fn end(&mut self) {
        self.ended = true;
    }
}

/// Cloneable flag that asks the loop to quit, from any thread
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Everything a hook may look at or change besides the game itself
pub struct Context {
    pub state: RunState,
    pub input: InputState,
    pub clock: FrameClock,
    pub config: WindowConfig,
}

impl Context {
    pub fn new(config: WindowConfig) -> Self {
        Self {
            state: RunState::new(),
            input: InputState::new(),
            clock: FrameClock::new(config.tick_rate),
            config,
        }
    }

    /// Stop the current run and every following one.
    pub fn quit(&mut self) {
        self.state.set_running(false);
        self.state.end();
    }

    /// Stop the current run only; continual mode starts a fresh one.
    pub fn restart(&mut self) {
        self.state.set_running(false);
    }
}
