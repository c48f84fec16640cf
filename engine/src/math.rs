//! Small numeric helpers

use crate::error::{EngineError, Result};

/// Linearly remap `number` from `[old_min, old_max]` onto `[new_min, new_max]`.
///
/// `number_remap(2.0, 0.0, 10.0, 0.0, 100.0)` is `20.0`.
pub fn number_remap(
    number: f64,
    old_min: f64,
    old_max: f64,
    new_min: f64,
    new_max: f64,
) -> Result<f64> {
    if number > old_max || number < old_min {
        return Err(EngineError::NumberOutOfRange {
            value: number,
            min: old_min,
            max: old_max,
        });
    }
    if old_max == old_min {
        return Err(EngineError::DegenerateRange {
            min: old_min,
            max: old_max,
        });
    }

    Ok(((number - old_min) / (old_max - old_min)) * (new_max - new_min) + new_min)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remap_scales() {
        assert_eq!(number_remap(1.0, 0.0, 10.0, 0.0, 100.0).unwrap(), 10.0);
        assert_eq!(number_remap(2.0, 0.0, 10.0, 0.0, 100.0).unwrap(), 20.0);
        assert_eq!(number_remap(10.0, 0.0, 10.0, 0.0, 100.0).unwrap(), 100.0);
    }

    #[test]
    fn remap_handles_offsets_and_inversion() {
        assert_eq!(number_remap(5.0, 0.0, 10.0, 100.0, 200.0).unwrap(), 150.0);
        assert_eq!(number_remap(0.0, 0.0, 10.0, 1.0, -1.0).unwrap(), 1.0);
    }

    #[test]
    fn remap_rejects_out_of_range() {
        let err = number_remap(11.0, 0.0, 10.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::NumberOutOfRange { value, .. } if value == 11.0));
        assert!(number_remap(-0.1, 0.0, 10.0, 0.0, 1.0).is_err());
    }

    #[test]
    fn remap_rejects_empty_range() {
        let err = number_remap(3.0, 3.0, 3.0, 0.0, 1.0).unwrap_err();
        assert!(matches!(err, EngineError::DegenerateRange { .. }));
    }
}
