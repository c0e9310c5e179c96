/// Converts a clockwise-from-north bearing into a counter-clockwise angle
/// from the positive X axis, wrapped into `[0, 360)`.
pub fn to_math_angle(raw_azimuth_deg: i32) -> f64 {
    (90_i64 - i64::from(raw_azimuth_deg)).rem_euclid(360) as f64
}

/// Inverse of [`to_math_angle`] for real-valued angles, used by feed
/// generators that know the true direction to a target.
pub fn to_raw_azimuth(math_angle_deg: f64) -> f64 {
    (90.0 - math_angle_deg).rem_euclid(360.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn north_maps_to_ninety() {
        assert_eq!(to_math_angle(0), 90.0);
        assert_eq!(to_math_angle(90), 0.0);
        assert_eq!(to_math_angle(45), 45.0);
        assert_eq!(to_math_angle(315), 135.0);
    }

    #[test]
    fn negative_and_large_inputs_wrap() {
        assert_eq!(to_math_angle(-90), 180.0);
        assert_eq!(to_math_angle(-270), 0.0);
        assert_eq!(to_math_angle(450), 0.0);
        assert_eq!(to_math_angle(100), 350.0);
        for raw in -720..=720 {
            let angle = to_math_angle(raw);
            assert!((0.0..360.0).contains(&angle), "raw {} -> {}", raw, angle);
            assert_eq!(angle as i64, (90 - raw as i64).rem_euclid(360));
        }
    }

    #[test]
    fn raw_azimuth_inverts_math_angle() {
        assert_eq!(to_raw_azimuth(45.0), 45.0);
        assert_eq!(to_raw_azimuth(135.0), 315.0);
        assert_eq!(to_math_angle(to_raw_azimuth(200.0) as i32), 200.0);
    }
}
