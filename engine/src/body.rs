//! Rectangular bodies with window-bounded coordinates
//!
//! [`Body`] keeps `x`/`y` in coordinate fields bound to the window size, so a
//! body can never be placed outside `[0, width] x [0, height]`.
//! [`ControlledBody`] adds a velocity and key bindings for the four directions.

use std::collections::BTreeMap;

use glam::DVec2;
use winit::keyboard::KeyCode;

use crate::canvas::Canvas;
use crate::color::Color;
use crate::config::WindowConfig;
use crate::error::{EngineError, Result};
use crate::field::{Constraint, FieldValue, NumericField, ValueKind};
use crate::input::InputState;
use crate::rect::Rect;

#[derive(Debug, Clone)]
pub struct Body {
    x: NumericField,
    y: NumericField,
    pub width: f64,
    pub height: f64,
}

impl Body {
    pub fn new(window: &WindowConfig, x: f64, y: f64, width: f64, height: f64) -> Result<Self> {
        Ok(Self {
            x: NumericField::new(Constraint::coordinate("x", window.width.into()), x)?,
            y: NumericField::new(Constraint::coordinate("y", window.height.into()), y)?,
            width,
            height,
        })
    }

    pub fn x(&self) -> f64 {
        self.x.get()
    }

    pub fn y(&self) -> f64 {
        self.y.get()
    }

    pub fn set_x(&mut self, x: impl Into<FieldValue>) -> Result<()> {
        self.x.set(x)
    }

    pub fn set_y(&mut self, y: impl Into<FieldValue>) -> Result<()> {
        self.y.set(y)
    }

    pub fn position(&self) -> DVec2 {
        DVec2::new(self.x(), self.y())
    }

    /// Set both coordinates; nothing changes unless both are valid.
    pub fn set_position(&mut self, position: DVec2) -> Result<()> {
        self.x.constraint().check(position.x.into())?;
        self.y.constraint().check(position.y.into())?;
        self.x.set(position.x)?;
        self.y.set(position.y)
    }

    pub fn hitbox(&self) -> Rect {
        Rect::new(self.x(), self.y(), self.width, self.height)
    }

    /// Open-interval AABB test: touching edges do not collide.
    pub fn collides(&self, other: &Body) -> bool {
        self.hitbox().overlaps(&other.hitbox())
    }

    pub fn draw(&self, canvas: &mut Canvas, color: Color) {
        canvas.fill_rect(self.hitbox(), color);
    }
}

/// One of the four movement directions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Left,
    Right,
    Up,
    Down,
}

impl Direction {
    pub const ALL: [Direction; 4] = [
        Direction::Left,
        Direction::Right,
        Direction::Up,
        Direction::Down,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Direction::Left => "left",
            Direction::Right => "right",
            Direction::Up => "up",
            Direction::Down => "down",
        }
    }

    /// Screen-space unit vector (y grows downwards)
    pub fn unit(self) -> DVec2 {
        match self {
            Direction::Left => DVec2::NEG_X,
            Direction::Right => DVec2::X,
            Direction::Up => DVec2::NEG_Y,
            Direction::Down => DVec2::Y,
        }
    }
}

/// Key bound to each direction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MoveKeys {
    pub left: KeyCode,
    pub right: KeyCode,
    pub up: KeyCode,
    pub down: KeyCode,
}

impl MoveKeys {
    pub fn arrows() -> Self {
        Self {
            left: KeyCode::ArrowLeft,
            right: KeyCode::ArrowRight,
            up: KeyCode::ArrowUp,
            down: KeyCode::ArrowDown,
        }
    }

    pub fn wasd() -> Self {
        Self {
            left: KeyCode::KeyA,
            right: KeyCode::KeyD,
            up: KeyCode::KeyW,
            down: KeyCode::KeyS,
        }
    }

    pub fn key(&self, direction: Direction) -> KeyCode {
        match direction {
            Direction::Left => self.left,
            Direction::Right => self.right,
            Direction::Up => self.up,
            Direction::Down => self.down,
        }
    }

    /// Validate the mapping form: every direction present and bound to a key.
    /// Extra entries are ignored.
    pub fn from_value(value: &FieldValue) -> Result<Self> {
        let map = value.as_map().ok_or_else(|| EngineError::InvalidFieldType {
            field: "move_keys".to_string(),
            expected: ValueKind::Map.to_string(),
            got: value.kind().to_string(),
        })?;

        let key = |direction: Direction| -> Result<KeyCode> {
            let name = direction.name();
            let entry = map.get(name).ok_or_else(|| {
                EngineError::InvalidMoveKeys(format!(
                    "left, right, up and down must all be defined, but {name} not found"
                ))
            })?;
            entry.as_key().ok_or_else(|| {
                EngineError::InvalidMoveKeys(format!(
                    "move_keys[{name}] must be a key, got {}",
                    entry.kind()
                ))
            })
        };

        Ok(Self {
            left: key(Direction::Left)?,
            right: key(Direction::Right)?,
            up: key(Direction::Up)?,
            down: key(Direction::Down)?,
        })
    }
}

impl From<MoveKeys> for FieldValue {
    fn from(keys: MoveKeys) -> Self {
        let map: BTreeMap<String, FieldValue> = Direction::ALL
            .iter()
            .map(|&direction| (direction.name().to_string(), keys.key(direction).into()))
            .collect();
        FieldValue::Map(map)
    }
}

/// A body moved by held keys
#[derive(Debug, Clone)]
pub struct ControlledBody {
    body: Body,
    velocity: NumericField,
    move_keys: MoveKeys,
}

impl ControlledBody {
    pub fn new(
        body: Body,
        velocity: impl Into<FieldValue>,
        move_keys: impl Into<FieldValue>,
    ) -> Result<Self> {
        Ok(Self {
            body,
            velocity: NumericField::new(Constraint::numeric("velocity"), velocity)?,
            move_keys: MoveKeys::from_value(&move_keys.into())?,
        })
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    pub fn velocity(&self) -> f64 {
        self.velocity.get()
    }

    pub fn set_velocity(&mut self, velocity: impl Into<FieldValue>) -> Result<()> {
        self.velocity.set(velocity)
    }

    pub fn move_keys(&self) -> &MoveKeys {
        &self.move_keys
    }

    /// Replace the bindings; the old ones stay on error.
    pub fn set_move_keys(&mut self, move_keys: impl Into<FieldValue>) -> Result<()> {
        self.move_keys = MoveKeys::from_value(&move_keys.into())?;
        Ok(())
    }

    /// Offset produced by the currently held keys. Opposite keys cancel out.
    pub fn displacement(&self, input: &InputState) -> DVec2 {
        Direction::ALL
            .iter()
            .filter(|&&direction| input.is_key_down(self.move_keys.key(direction)))
            .map(|direction| direction.unit() * self.velocity())
            .sum()
    }

    /// Move by `velocity` along every held direction.
    ///
    /// Leaving the window is a `ValueOutOfRange` error. Axes are applied x then
    /// y, so a failing axis keeps its old value (and a failing x skips y).
    pub fn move_by_input(&mut self, input: &InputState) -> Result<()> {
        let delta = self.displacement(input);
        if delta.x != 0.0 {
            self.body.set_x(self.body.x() + delta.x)?;
        }
        if delta.y != 0.0 {
            self.body.set_y(self.body.y() + delta.y)?;
        }
        Ok(())
    }
}
