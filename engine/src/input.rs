//! Input state management

use std::collections::HashSet;

use winit::keyboard::KeyCode;

use crate::event::GameEvent;

/// Tracks keyboard and mouse input state per frame
#[derive(Debug, Default)]
pub struct InputState {
    /// Keys currently held down
    keys_down: HashSet<KeyCode>,
    /// Keys pressed this frame
    keys_just_pressed: HashSet<KeyCode>,
    /// Keys released this frame
    keys_just_released: HashSet<KeyCode>,

    /// Mouse buttons currently held
    mouse_buttons_down: HashSet<u32>,

    /// Current mouse position in window pixels
    pub mouse_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold a backend event into the state. Non-input events are ignored.
    pub fn process_event(&mut self, event: &GameEvent) {
        match event {
            GameEvent::KeyDown(key) => self.process_key_down(*key),
            GameEvent::KeyUp(key) => self.process_key_up(*key),
            GameEvent::MouseMotion { x, y } => self.mouse_position = (*x, *y),
            GameEvent::MouseButtonDown(button) => {
                self.mouse_buttons_down.insert(*button);
            }
            GameEvent::MouseButtonUp(button) => {
                self.mouse_buttons_down.remove(button);
            }
            // Released keys would otherwise stay stuck while unfocused
            GameEvent::Focused(false) => self.keys_down.clear(),
            _ => {}
        }
    }

    /// Process a key press event
    pub fn process_key_down(&mut self, key: KeyCode) {
        if self.keys_down.insert(key) {
            self.keys_just_pressed.insert(key);
        }
    }

    /// Process a key release event
    pub fn process_key_up(&mut self, key: KeyCode) {
        if self.keys_down.remove(&key) {
            self.keys_just_released.insert(key);
        }
    }

    /// Call at end of frame to clear per-frame state
    pub fn end_frame(&mut self) {
        self.keys_just_pressed.clear();
        self.keys_just_released.clear();
    }

    // --- Query methods ---

    /// Is a key currently held down?
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Was a key pressed this frame?
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.keys_just_pressed.contains(&key)
    }

    /// Was a key released this frame?
    pub fn is_key_just_released(&self, key: KeyCode) -> bool {
        self.keys_just_released.contains(&key)
    }

    pub fn keys_down(&self) -> impl Iterator<Item = KeyCode> + '_ {
        self.keys_down.iter().copied()
    }

    /// Is a mouse button currently held?
    pub fn is_mouse_button_down(&self, button: u32) -> bool {
        self.mouse_buttons_down.contains(&button)
    }
}
