//! Engine - skeleton for simple 2D games
//!
//! Building blocks:
//! - `GameLoop` / `Game`: run loop with lifecycle hooks and continual restarts
//! - `Backend`: windowing seam (`WindowBackend`, `HeadlessBackend`)
//! - `Field` / `Constraint`: values validated on every write
//! - `Body` / `ControlledBody`: window-bounded rectangles with AABB collision
//! - `Canvas`, `Color`, `Rect`: drawing
//! - `config`, `logging`: env flags, window settings and logger setup

pub mod backend;
pub mod body;
pub mod canvas;
pub mod clock;
pub mod color;
pub mod config;
pub mod context;
pub mod error;
pub mod event;
pub mod field;
pub mod game;
pub mod input;
pub mod logging;
pub mod math;
pub mod rect;

pub use backend::{Backend, HeadlessBackend, WindowBackend};
pub use body::{Body, ControlledBody, Direction, MoveKeys};
pub use canvas::Canvas;
pub use clock::FrameClock;
pub use color::{Color, PALETTE};
pub use config::{env_bool, EnvFlags, WindowConfig};
pub use context::{Context, RunState, StopHandle};
pub use error::{EngineError, Result};
pub use event::GameEvent;
pub use field::{wrap_angle, Bounds, Constraint, Field, FieldValue, NumericField, ValueKind};
pub use game::{Game, GameLoop};
pub use input::InputState;
pub use math::number_remap;
pub use rect::Rect;

pub use winit::keyboard::KeyCode;
