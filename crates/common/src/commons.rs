//! Small numeric helpers shared by the scene and renderer.

pub fn minimum(a: f64, b: f64) -> f64 {
    if a < b { a } else { b }
}

pub fn maximum(a: f64, b: f64) -> f64 {
    if a > b { a } else { b }
}

/// Round half-up (towards +∞), so `-2.5` rounds to `-2` and `2.5` to `3`.
///
/// `f64::round` rounds half away from zero, which shifts negative screen
/// coordinates by one pixel compared to canvas hosts.
pub fn round_off(value: f64) -> f64 {
    (value + 0.5).floor()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn min_max() {
        assert_eq!(minimum(3.0, -1.0), -1.0);
        assert_eq!(maximum(3.0, -1.0), 3.0);
        assert_eq!(minimum(2.0, 2.0), 2.0);
    }

    #[test]
    fn round_off_is_half_up() {
        assert_eq!(round_off(2.5), 3.0);
        assert_eq!(round_off(-2.5), -2.0);
        assert_eq!(round_off(-2.6), -3.0);
        assert_eq!(round_off(10.49), 10.0);
    }
}
