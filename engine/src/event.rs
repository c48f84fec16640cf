//! Events produced by a backend each iteration

use winit::keyboard::KeyCode;

#[derive(Debug, Clone, PartialEq)]
pub enum GameEvent {
    /// The user asked to close the program (window closed, interrupt raised)
    Quit,
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseMotion { x: f64, y: f64 },
    MouseButtonDown(u32),
    MouseButtonUp(u32),
    Resized { width: u32, height: u32 },
    Focused(bool),
}

impl GameEvent {
    pub fn is_quit(&self) -> bool {
        matches!(self, GameEvent::Quit)
    }
}
