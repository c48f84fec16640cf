//! Constrained fields
//!
//! A [`Constraint`] is a validation policy: the value kinds it accepts, optional
//! numeric bounds and an optional correction applied to out-of-range numbers
//! instead of rejecting them. [`Field`] pairs a constraint with optional storage,
//! [`NumericField`] with an always-present `f64`.
//!
//! The field flavours are constructors on [`Constraint`]:
//! - `numeric`: ints and floats, stored as floats
//! - `ranged`: numeric within inclusive `[min, max]`
//! - `angle`: numeric within `[0, 2π)`, out-of-range input corrected by [`wrap_angle`]
//! - `coordinate`: numeric within `[0, window_border]`

use std::collections::{BTreeMap, HashMap};
use std::f64::consts::TAU;
use std::fmt;

use log::trace;
use winit::keyboard::KeyCode;

use crate::error::{EngineError, Result};

/// Kind of a [`FieldValue`], used for type checks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Bool,
    Int,
    Float,
    Text,
    Key,
    Map,
}

impl ValueKind {
    pub const NUMERIC: [ValueKind; 2] = [ValueKind::Int, ValueKind::Float];

    pub fn name(self) -> &'static str {
        match self {
            ValueKind::Bool => "bool",
            ValueKind::Int => "int",
            ValueKind::Float => "float",
            ValueKind::Text => "text",
            ValueKind::Key => "key",
            ValueKind::Map => "map",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A dynamically typed value assigned to a field
#[derive(Debug, Clone, PartialEq)]
pub enum FieldValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Key(KeyCode),
    Map(BTreeMap<String, FieldValue>),
}

impl FieldValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            FieldValue::Bool(_) => ValueKind::Bool,
            FieldValue::Int(_) => ValueKind::Int,
            FieldValue::Float(_) => ValueKind::Float,
            FieldValue::Text(_) => ValueKind::Text,
            FieldValue::Key(_) => ValueKind::Key,
            FieldValue::Map(_) => ValueKind::Map,
        }
    }

    /// Numeric view of the value. `Bool` is not numeric.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Int(v) => Some(*v as f64),
            FieldValue::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_key(&self) -> Option<KeyCode> {
        match self {
            FieldValue::Key(key) => Some(*key),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FieldValue>> {
        match self {
            FieldValue::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<bool> for FieldValue {
    fn from(value: bool) -> Self {
        FieldValue::Bool(value)
    }
}

impl From<i32> for FieldValue {
    fn from(value: i32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<i64> for FieldValue {
    fn from(value: i64) -> Self {
        FieldValue::Int(value)
    }
}

impl From<u32> for FieldValue {
    fn from(value: u32) -> Self {
        FieldValue::Int(value.into())
    }
}

impl From<f32> for FieldValue {
    fn from(value: f32) -> Self {
        FieldValue::Float(value.into())
    }
}

impl From<f64> for FieldValue {
    fn from(value: f64) -> Self {
        FieldValue::Float(value)
    }
}

impl From<&str> for FieldValue {
    fn from(value: &str) -> Self {
        FieldValue::Text(value.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(value: String) -> Self {
        FieldValue::Text(value)
    }
}

impl From<KeyCode> for FieldValue {
    fn from(value: KeyCode) -> Self {
        FieldValue::Key(value)
    }
}

impl From<BTreeMap<String, FieldValue>> for FieldValue {
    fn from(value: BTreeMap<String, FieldValue>) -> Self {
        FieldValue::Map(value)
    }
}

impl From<HashMap<String, FieldValue>> for FieldValue {
    fn from(value: HashMap<String, FieldValue>) -> Self {
        FieldValue::Map(value.into_iter().collect())
    }
}

/// Numeric bounds. `min` is always inclusive, `max` inclusive unless `max_exclusive`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: f64,
    pub max: f64,
    pub max_exclusive: bool,
}

impl Bounds {
    pub const fn inclusive(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            max_exclusive: false,
        }
    }

    pub const fn half_open(min: f64, max: f64) -> Self {
        Self {
            min,
            max,
            max_exclusive: true,
        }
    }

    /// NaN is never contained.
    pub fn contains(&self, value: f64) -> bool {
        let below_max = if self.max_exclusive {
            value < self.max
        } else {
            value <= self.max
        };
        value >= self.min && below_max
    }
}

/// Angle correction for out-of-range input: `(value mod 2) * 2π`.
///
/// The modulo is floored, so negative input maps into `[0, 2)` before scaling.
/// The result is not guaranteed to land inside `[0, 2π)`: any odd integer maps
/// to exactly `2π`.
pub fn wrap_angle(value: f64) -> f64 {
    value.rem_euclid(2.0) * TAU
}

/// Validation policy shared by every field flavour
#[derive(Debug, Clone)]
pub struct Constraint {
    name: String,
    kinds: Vec<ValueKind>,
    bounds: Option<Bounds>,
    correction: Option<fn(f64) -> f64>,
    store_as_float: bool,
}

impl Constraint {
    /// Accepts any value.
    pub fn any(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kinds: Vec::new(),
            bounds: None,
            correction: None,
            store_as_float: false,
        }
    }

    /// Accepts only the listed kinds.
    pub fn typed(name: impl Into<String>, kinds: &[ValueKind]) -> Self {
        Self {
            kinds: kinds.to_vec(),
            ..Self::any(name)
        }
    }

    /// Ints and floats, stored as floats.
    pub fn numeric(name: impl Into<String>) -> Self {
        Self {
            store_as_float: true,
            ..Self::typed(name, &ValueKind::NUMERIC)
        }
    }

    /// Numeric within inclusive `[min, max]`.
    pub fn ranged(name: impl Into<String>, min: f64, max: f64) -> Self {
        Self::numeric(name).with_bounds(Bounds::inclusive(min, max))
    }

    /// Numeric within `[0, 2π)`; out-of-range values go through [`wrap_angle`].
    pub fn angle(name: impl Into<String>) -> Self {
        Self::numeric(name)
            .with_bounds(Bounds::half_open(0.0, TAU))
            .with_correction(wrap_angle)
    }

    /// Numeric within `[0, window_border]`.
    pub fn coordinate(name: impl Into<String>, window_border: f64) -> Self {
        Self::ranged(name, 0.0, window_border)
    }

    pub fn with_bounds(mut self, bounds: Bounds) -> Self {
        self.bounds = Some(bounds);
        self
    }

    /// Replace rejection of out-of-range numbers by a correction.
    pub fn with_correction(mut self, correction: fn(f64) -> f64) -> Self {
        self.correction = Some(correction);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kinds(&self) -> &[ValueKind] {
        &self.kinds
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Validate a value, returning what should be stored.
    pub fn check(&self, value: FieldValue) -> Result<FieldValue> {
        if !self.kinds.is_empty() && !self.kinds.contains(&value.kind()) {
            return Err(self.type_error(value.kind(), &self.kinds));
        }

        let Some(bounds) = self.bounds else {
            return Ok(self.normalize(value));
        };

        let number = value
            .as_f64()
            .ok_or_else(|| self.type_error(value.kind(), &ValueKind::NUMERIC))?;

        if bounds.contains(number) {
            return Ok(self.normalize(value));
        }

        match self.correction {
            Some(correct) => {
                let corrected = correct(number);
                trace!(
                    "{} out of range ({}), corrected to {}",
                    self.name,
                    number,
                    corrected
                );
                Ok(FieldValue::Float(corrected))
            }
            None => Err(EngineError::ValueOutOfRange {
                field: self.name.clone(),
                min: bounds.min,
                max: bounds.max,
                value: number,
            }),
        }
    }

    fn normalize(&self, value: FieldValue) -> FieldValue {
        match (self.store_as_float, value.as_f64()) {
            (true, Some(number)) => FieldValue::Float(number),
            _ => value,
        }
    }

    fn type_error(&self, got: ValueKind, expected: &[ValueKind]) -> EngineError {
        let expected = expected
            .iter()
            .map(|kind| kind.name())
            .collect::<Vec<_>>()
            .join(" or ");
        EngineError::InvalidFieldType {
            field: self.name.clone(),
            expected,
            got: got.to_string(),
        }
    }
}

/// A named value whose every write is validated by its [`Constraint`]
#[derive(Debug, Clone)]
pub struct Field {
    constraint: Constraint,
    value: Option<FieldValue>,
}

impl Field {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            value: None,
        }
    }

    pub fn name(&self) -> &str {
        self.constraint.name()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    /// Last validated value, `None` while unset.
    pub fn get(&self) -> Option<&FieldValue> {
        self.value.as_ref()
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.as_ref().and_then(FieldValue::as_f64)
    }

    pub fn is_set(&self) -> bool {
        self.value.is_some()
    }

    /// Validate and store. On error the stored value is left untouched.
    pub fn set(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        let checked = self.constraint.check(value.into())?;
        self.value = Some(checked);
        Ok(())
    }

    /// Remove the stored value, failing if nothing was ever set.
    pub fn delete(&mut self) -> Result<FieldValue> {
        self.value
            .take()
            .ok_or_else(|| EngineError::FieldNotSet(self.constraint.name().to_string()))
    }
}

/// A numeric field that always holds a value
#[derive(Debug, Clone)]
pub struct NumericField {
    constraint: Constraint,
    value: f64,
}

impl NumericField {
    pub fn new(constraint: Constraint, initial: impl Into<FieldValue>) -> Result<Self> {
        let value = Self::numeric(&constraint, initial.into())?;
        Ok(Self { constraint, value })
    }

    pub fn name(&self) -> &str {
        self.constraint.name()
    }

    pub fn constraint(&self) -> &Constraint {
        &self.constraint
    }

    pub fn get(&self) -> f64 {
        self.value
    }

    pub fn set(&mut self, value: impl Into<FieldValue>) -> Result<()> {
        self.value = Self::numeric(&self.constraint, value.into())?;
        Ok(())
    }

    fn numeric(constraint: &Constraint, value: FieldValue) -> Result<f64> {
        let checked = constraint.check(value)?;
        checked
            .as_f64()
            .ok_or_else(|| constraint.type_error(checked.kind(), &ValueKind::NUMERIC))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_then_get_returns_value_within_bounds() {
        let mut field = Field::new(Constraint::ranged("speed", -5.0, 5.0));
        for v in [-5.0, -2.5, 0.0, 1.25, 5.0] {
            field.set(v).unwrap();
            assert_eq!(field.as_f64(), Some(v));
        }
    }

    #[test]
    fn out_of_range_is_rejected_and_value_kept() {
        let mut field = Field::new(Constraint::ranged("speed", 0.0, 10.0));
        field.set(4.0).unwrap();

        for v in [10.0001, 11.0, -0.0001, -3.0] {
            let err = field.set(v).unwrap_err();
            assert!(err.is_value_error(), "{v} should be a range error");
            assert_eq!(field.as_f64(), Some(4.0));
        }
    }

    #[test]
    fn wrong_kind_is_a_type_error_regardless_of_range() {
        let mut field = Field::new(Constraint::ranged("speed", 0.0, 10.0));
        assert!(field.set("5").unwrap_err().is_type_error());
        assert!(field.set(true).unwrap_err().is_type_error());
        assert!(field.set(KeyCode::KeyA).unwrap_err().is_type_error());
        assert!(!field.is_set());
    }

    #[test]
    fn typed_field_accepts_only_listed_kinds() {
        let mut field = Field::new(Constraint::typed("label", &[ValueKind::Text]));
        field.set("hello").unwrap();
        assert_eq!(field.get(), Some(&FieldValue::Text("hello".into())));

        let err = field.set(3).unwrap_err();
        assert!(matches!(
            err,
            EngineError::InvalidFieldType { ref expected, ref got, .. }
                if expected == "text" && got == "int"
        ));
    }

    #[test]
    fn any_field_accepts_everything() {
        let mut field = Field::new(Constraint::any("anything"));
        field.set(1).unwrap();
        field.set("two").unwrap();
        field.set(KeyCode::Space).unwrap();
        assert_eq!(field.get().and_then(FieldValue::as_key), Some(KeyCode::Space));
    }

    #[test]
    fn numeric_fields_store_floats() {
        let mut field = Field::new(Constraint::numeric("n"));
        field.set(7).unwrap();
        assert_eq!(field.get(), Some(&FieldValue::Float(7.0)));
    }

    #[test]
    fn delete_unset_field_fails() {
        let mut field = Field::new(Constraint::numeric("n"));
        assert!(matches!(field.delete(), Err(EngineError::FieldNotSet(ref name)) if name == "n"));

        field.set(2.0).unwrap();
        assert_eq!(field.delete().unwrap(), FieldValue::Float(2.0));
        assert!(field.get().is_none());
        assert!(field.delete().is_err());
    }

    #[test]
    fn nan_is_out_of_range() {
        let mut field = Field::new(Constraint::ranged("n", 0.0, 1.0));
        assert!(field.set(f64::NAN).unwrap_err().is_value_error());
    }

    #[test]
    fn angle_within_range_is_kept() {
        let mut angle = Field::new(Constraint::angle("heading"));
        angle.set(1.5).unwrap();
        assert_eq!(angle.as_f64(), Some(1.5));
        angle.set(0.0).unwrap();
        assert_eq!(angle.as_f64(), Some(0.0));
    }

    #[test]
    fn angle_out_of_range_is_corrected() {
        let mut angle = Field::new(Constraint::angle("heading"));

        angle.set(10).unwrap();
        assert_eq!(angle.as_f64(), Some(0.0));

        angle.set(7.5).unwrap();
        assert_eq!(angle.as_f64(), Some((7.5 % 2.0) * TAU));

        // Floored modulo: -0.5 mod 2 == 1.5
        angle.set(-0.5).unwrap();
        assert_eq!(angle.as_f64(), Some(1.5 * TAU));
    }

    #[test]
    fn angle_correction_can_leave_range() {
        let mut angle = Field::new(Constraint::angle("heading"));
        angle.set(3.0).unwrap();
        assert_eq!(angle.as_f64(), Some(TAU));
        assert!(!Bounds::half_open(0.0, TAU).contains(TAU));
    }

    #[test]
    fn angle_still_rejects_wrong_kind() {
        let mut angle = Field::new(Constraint::angle("heading"));
        assert!(angle.set("north").unwrap_err().is_type_error());
    }

    #[test]
    fn coordinate_bounds_include_border() {
        let mut x = Field::new(Constraint::coordinate("x", 800.0));
        x.set(0).unwrap();
        x.set(800).unwrap();
        assert_eq!(x.as_f64(), Some(800.0));
        assert!(x.set(800.5).unwrap_err().is_value_error());
        assert!(x.set(-1).unwrap_err().is_value_error());
    }

    #[test]
    fn independent_fields_have_independent_storage() {
        let mut x = Field::new(Constraint::coordinate("x", 800.0));
        let mut y = Field::new(Constraint::coordinate("y", 600.0));
        x.set(700.0).unwrap();
        assert!(y.set(700.0).is_err());
        y.set(10.0).unwrap();
        assert_eq!(x.as_f64(), Some(700.0));
        assert_eq!(y.as_f64(), Some(10.0));
    }

    #[test]
    fn numeric_field_requires_valid_initial_value() {
        assert!(NumericField::new(Constraint::coordinate("x", 100.0), 101.0).is_err());

        let mut x = NumericField::new(Constraint::coordinate("x", 100.0), 50).unwrap();
        assert_eq!(x.get(), 50.0);
        assert!(x.set(150.0).is_err());
        assert_eq!(x.get(), 50.0);
        x.set(99.5).unwrap();
        assert_eq!(x.get(), 99.5);
    }

    #[test]
    fn numeric_field_rejects_non_numeric_constraint_output() {
        let err = NumericField::new(Constraint::any("label"), "abc").unwrap_err();
        assert!(err.is_type_error());
    }
}
