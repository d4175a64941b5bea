/// Rounds `value` half away from zero to `places` decimal places.
pub fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(10.123456789, 4), 10.1235);
        assert_eq!(round_to(59.999, 2), 60.0);
        assert_eq!(round_to(5.0, 6), 5.0);
        assert_eq!(round_to(-1.005_1, 2), -1.01);
    }
}
