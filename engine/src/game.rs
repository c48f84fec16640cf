//! Base game loop
//!
//! A concrete game implements [`Game`]; [`GameLoop`] owns the backend and
//! calls the hooks in a fixed order every iteration:
//!
//! 1. poll events: quit events go to [`Game::handle_quit`], everything else
//!    updates the input state and goes to [`Game::handle_user_event`]
//! 2. stop here if the run is no longer running
//! 3. [`Game::redraw_screen`], then the frame is presented
//! 4. [`Game::tick`]
//! 5. wait out the rest of the `1 / tick_rate` budget

use log::{debug, error, trace};

use crate::backend::Backend;
use crate::canvas::Canvas;
use crate::config::WindowConfig;
use crate::context::{Context, StopHandle};
use crate::error::{EngineError, Result};
use crate::event::GameEvent;

/// Lifecycle hooks of a game. Every hook has an empty default.
pub trait Game {
    /// Runs before every run's loop starts, including each continual restart
    fn setup(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs once before the first run of [`GameLoop::run_continually`],
    /// never for a plain [`GameLoop::start`]
    fn continuous_setup(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    /// Any event except quit
    fn handle_user_event(&mut self, _ctx: &mut Context, _event: &GameEvent) -> anyhow::Result<()> {
        Ok(())
    }

    /// Quit events bypass [`Game::handle_user_event`], so a game that ignores
    /// events still terminates. Override only to change what quitting means.
    fn handle_quit(&mut self, ctx: &mut Context) {
        ctx.quit();
    }

    /// Draw the frame. Presenting is done by the loop right after.
    fn redraw_screen(&mut self, ctx: &Context, canvas: &mut Canvas) -> anyhow::Result<()> {
        canvas.fill(ctx.config.background);
        Ok(())
    }

    /// Per-iteration game logic
    fn tick(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }

    /// Runs once when a run's loop ends, also when a hook failed
    fn cleanup(&mut self, _ctx: &mut Context) -> anyhow::Result<()> {
        Ok(())
    }
}

pub struct GameLoop<B: Backend> {
    backend: B,
    ctx: Context,
    canvas: Canvas,
    stop: StopHandle,
    backend_ready: bool,
}

impl<B: Backend> GameLoop<B> {
    pub fn new(backend: B, config: WindowConfig) -> Self {
        let canvas = Canvas::new(config.width as usize, config.height as usize);
        Self {
            backend,
            ctx: Context::new(config),
            canvas,
            stop: StopHandle::new(),
            backend_ready: false,
        }
    }

    pub fn context(&self) -> &Context {
        &self.ctx
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.ctx
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    /// Handle that makes the next poll report a quit event when raised
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Run the game once. Opens and closes the backend unless it is already
    /// open (as it is inside [`GameLoop::run_continually`]).
    pub fn start<G: Game>(&mut self, game: &mut G) -> Result<()> {
        if self.backend_ready {
            return self.run_once(game);
        }
        self.init_backend()?;
        let result = self.run_once(game);
        finish(result, self.shutdown_backend())
    }

    /// Keep starting fresh runs until the game is ended.
    pub fn run_continually<G: Game>(&mut self, game: &mut G) -> Result<()> {
        self.init_backend()?;
        debug!("Starting continuous game");
        let result = self.run_until_ended(game);
        debug!("Stopping continuous game");
        finish(result, self.shutdown_backend())
    }

    fn run_until_ended<G: Game>(&mut self, game: &mut G) -> Result<()> {
        game.continuous_setup(&mut self.ctx)?;
        while !self.ctx.state.ended() {
            self.run_once(game)?;
            if !self.ctx.state.ended() {
                debug!("Restarting game loop (continual run)");
            }
        }
        Ok(())
    }

    fn run_once<G: Game>(&mut self, game: &mut G) -> Result<()> {
        debug!("Starting the game loop");
        self.ctx.state.set_running(true);
        self.ctx.clock.reset();

        let outcome = self.run_frames(game);
        let cleanup = game.cleanup(&mut self.ctx);
        debug!("Stopping the game loop");

        match (outcome, cleanup) {
            (Err(err), Err(cleanup_err)) => {
                error!("Cleanup failed after an aborted run: {cleanup_err:#}");
                Err(err)
            }
            (Err(err), Ok(())) => Err(err),
            (Ok(()), cleanup) => cleanup.map_err(EngineError::from),
        }
    }

    fn run_frames<G: Game>(&mut self, game: &mut G) -> Result<()> {
        game.setup(&mut self.ctx)?;

        while self.ctx.state.running() {
            for event in self.poll_events()? {
                if event.is_quit() {
                    debug!("Quit requested");
                    game.handle_quit(&mut self.ctx);
                } else {
                    self.ctx.input.process_event(&event);
                    game.handle_user_event(&mut self.ctx, &event)?;
                }
            }

            // Quitting may have stopped the run; skip the frame work then
            if !self.ctx.state.running() {
                break;
            }

            game.redraw_screen(&self.ctx, &mut self.canvas)?;
            self.backend.present(&self.canvas)?;

            game.tick(&mut self.ctx)?;
            self.ctx.input.end_frame();
            self.ctx.clock.tick();
        }
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<GameEvent>> {
        let mut events = self.backend.poll_events()?;
        if self.stop.is_raised() && !self.ctx.state.ended() {
            trace!("Stop handle raised, treating as quit");
            events.push(GameEvent::Quit);
        }
        Ok(events)
    }

    fn init_backend(&mut self) -> Result<()> {
        if !self.backend_ready {
            trace!("Starting backend");
            self.backend.init(&self.ctx.config)?;
            self.backend_ready = true;
        }
        Ok(())
    }

    fn shutdown_backend(&mut self) -> Result<()> {
        trace!("Stopping backend");
        self.backend_ready = false;
        self.backend.shutdown()
    }
}

/// The run's error wins over a shutdown error, which is then only logged.
fn finish(result: Result<()>, shutdown: Result<()>) -> Result<()> {
    match (result, shutdown) {
        (Err(err), Err(shutdown_err)) => {
            error!("Backend shutdown failed after an error: {shutdown_err}");
            Err(err)
        }
        (result, shutdown) => result.and(shutdown),
    }
}
