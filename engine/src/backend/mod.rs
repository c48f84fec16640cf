//! Backend seam: windowing, event polling and frame presentation
//!
//! The game loop only talks to a [`Backend`]. [`WindowBackend`] opens a real
//! window, [`HeadlessBackend`] replays scripted events and keeps the frames it
//! is handed, which is what the tests drive.

mod headless;
mod window;

pub use headless::HeadlessBackend;
pub use window::WindowBackend;

use crate::canvas::Canvas;
use crate::config::WindowConfig;
use crate::error::Result;
use crate::event::GameEvent;

pub trait Backend {
    /// Open the window / surface. Called once before the first poll.
    fn init(&mut self, config: &WindowConfig) -> Result<()>;

    /// Events that arrived since the last call
    fn poll_events(&mut self) -> Result<Vec<GameEvent>>;

    /// Show a finished frame
    fn present(&mut self, canvas: &Canvas) -> Result<()>;

    /// Release the window / surface
    fn shutdown(&mut self) -> Result<()>;
}
