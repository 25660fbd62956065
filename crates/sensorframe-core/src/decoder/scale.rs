use crate::FieldValue;

/// Apply an optional scale to a raw integer reading.
///
/// Scaled readings are rounded to one decimal place, half away from zero.
pub(crate) fn scale_reading(raw: i64, scale: Option<f64>) -> FieldValue {
    match scale {
        Some(scale) => FieldValue::Float(round_tenths(raw as f64 * scale)),
        None => FieldValue::Integer(raw),
    }
}

pub(crate) fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::{round_tenths, scale_reading};
    use crate::FieldValue;

    #[test]
    fn unscaled_stays_integer() {
        assert_eq!(scale_reading(42, None), FieldValue::Integer(42));
    }

    #[test]
    fn scaled_becomes_rounded_float() {
        assert_eq!(scale_reading(-8704, Some(0.1)), FieldValue::Float(-870.4));
        assert_eq!(scale_reading(44801, Some(0.1)), FieldValue::Float(4480.1));
    }

    #[test]
    fn rounds_half_away_from_zero() {
        assert_eq!(round_tenths(0.25), 0.3);
        assert_eq!(round_tenths(-0.25), -0.3);
        assert_eq!(round_tenths(1.04), 1.0);
    }
}
