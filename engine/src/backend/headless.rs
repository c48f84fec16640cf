//! Backend without a window

use std::collections::VecDeque;

use super::Backend;
use crate::canvas::Canvas;
use crate::config::WindowConfig;
use crate::error::Result;
use crate::event::GameEvent;

/// Replays one scripted batch of events per poll. Once the script runs out it
/// reports [`GameEvent::Quit`] on every poll, unless built with [`Self::keep_alive`].
#[derive(Debug, Default)]
pub struct HeadlessBackend {
    script: VecDeque<Vec<GameEvent>>,
    keep_alive: bool,
    polls: usize,
    presented: usize,
    last_frame: Option<Vec<u8>>,
    inits: usize,
    shutdowns: usize,
}

impl HeadlessBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_script(frames: impl IntoIterator<Item = Vec<GameEvent>>) -> Self {
        Self {
            script: frames.into_iter().collect(),
            ..Self::default()
        }
    }

    /// Never quit on its own; polls past the script return no events.
    pub fn keep_alive(mut self) -> Self {
        self.keep_alive = true;
        self
    }

    /// Append a batch of events for a later poll
    pub fn push_frame(&mut self, events: Vec<GameEvent>) {
        self.script.push_back(events);
    }

    pub fn polls(&self) -> usize {
        self.polls
    }

    pub fn presented(&self) -> usize {
        self.presented
    }

    pub fn last_frame(&self) -> Option<&[u8]> {
        self.last_frame.as_deref()
    }

    pub fn inits(&self) -> usize {
        self.inits
    }

    pub fn shutdowns(&self) -> usize {
        self.shutdowns
    }
}

impl Backend for HeadlessBackend {
    fn init(&mut self, _config: &WindowConfig) -> Result<()> {
        self.inits += 1;
        Ok(())
    }

    fn poll_events(&mut self) -> Result<Vec<GameEvent>> {
        self.polls += 1;
        Ok(match self.script.pop_front() {
            Some(events) => events,
            None if self.keep_alive => Vec::new(),
            None => vec![GameEvent::Quit],
        })
    }

    fn present(&mut self, canvas: &Canvas) -> Result<()> {
        self.presented += 1;
        self.last_frame = Some(canvas.as_bytes().to_vec());
        Ok(())
    }

    fn shutdown(&mut self) -> Result<()> {
        self.shutdowns += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use winit::keyboard::KeyCode;

    #[test]
    fn replays_script_then_quits() {
        let mut backend =
            HeadlessBackend::with_script([vec![GameEvent::KeyDown(KeyCode::KeyA)], vec![]]);
        assert_eq!(
            backend.poll_events().unwrap(),
            vec![GameEvent::KeyDown(KeyCode::KeyA)]
        );
        assert!(backend.poll_events().unwrap().is_empty());
        assert_eq!(backend.poll_events().unwrap(), vec![GameEvent::Quit]);
        assert_eq!(backend.polls(), 3);
    }

    #[test]
    fn pushed_frames_extend_the_script() {
        let mut backend = HeadlessBackend::with_script([vec![]]);
        backend.push_frame(vec![GameEvent::KeyUp(KeyCode::KeyA)]);

        assert!(backend.poll_events().unwrap().is_empty());
        assert_eq!(
            backend.poll_events().unwrap(),
            vec![GameEvent::KeyUp(KeyCode::KeyA)]
        );
        assert_eq!(backend.poll_events().unwrap(), vec![GameEvent::Quit]);
    }

    #[test]
    fn keep_alive_never_quits() {
        let mut backend = HeadlessBackend::new().keep_alive();
        for _ in 0..5 {
            assert!(backend.poll_events().unwrap().is_empty());
        }
    }

    #[test]
    fn keeps_last_frame() {
        let mut backend = HeadlessBackend::new();
        let mut canvas = Canvas::new(1, 1);
        canvas.fill(crate::color::Color::RED);
        backend.present(&canvas).unwrap();
        assert_eq!(backend.presented(), 1);
        assert_eq!(backend.last_frame(), Some(&[240, 20, 30, 255][..]));
    }
}
