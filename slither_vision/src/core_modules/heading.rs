// THEORY:
// Headings are plain `f64` degrees in `[0, 360)`, counter-clockwise from ray 0
// (the bottom of the screen). These helpers are the only place that knows how
// to wrap, compare, and convert them; every stage goes through here so the
// circle is closed the same way everywhere.

use crate::config::CenterPoint;

/// Folds any angle into `[0, 360)`.
pub fn normalize_degrees(degrees: f64) -> f64 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360.0.
    if wrapped >= 360.0 { 0.0 } else { wrapped }
}

/// Signed shortest turn from `from` to `to`. Positive turns increase the heading.
/// The result always lies in `[-180, 180]`.
pub fn angular_difference(from: f64, to: f64) -> f64 {
    let from = normalize_degrees(from);
    let to = normalize_degrees(to);
    let raw = to - from;
    if raw.abs() > 180.0 {
        if from > to {
            360.0 - from + to
        } else {
            -(360.0 - to + from)
        }
    } else {
        raw
    }
}

/// Heading, in degrees, that a ray index points along.
pub fn ray_angle(ray: usize, rays: usize) -> f64 {
    ray as f64 * 360.0 / rays as f64
}

/// Ray index closest to the given heading.
pub fn ray_for_heading(heading: f64, rays: usize) -> usize {
    let exact = normalize_degrees(heading) / 360.0 * rays as f64;
    (exact.round() as usize) % rays
}

/// Screen coordinate `radius` pixels from `center` along `heading`, for a
/// pointer-driven actuator.
pub fn pointer_target(heading: f64, radius: f64, center: CenterPoint) -> (i64, i64) {
    let radians = heading.to_radians();
    (
        (radians.sin() * radius) as i64 + center.x,
        (radians.cos() * radius) as i64 + center.y,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_wraps_both_directions() {
        assert_eq!(normalize_degrees(0.0), 0.0);
        assert_eq!(normalize_degrees(360.0), 0.0);
        assert_eq!(normalize_degrees(370.0), 10.0);
        assert_eq!(normalize_degrees(-10.0), 350.0);
        assert_eq!(normalize_degrees(-1e-20), 0.0);
    }

    #[test]
    fn difference_takes_the_short_way_round() {
        assert_eq!(angular_difference(0.0, 90.0), 90.0);
        assert_eq!(angular_difference(90.0, 0.0), -90.0);
        assert_eq!(angular_difference(350.0, 10.0), 20.0);
        assert_eq!(angular_difference(10.0, 350.0), -20.0);
        assert_eq!(angular_difference(0.0, 180.0), 180.0);
        assert_eq!(angular_difference(45.0, 45.0), 0.0);
    }

    #[test]
    fn ray_and_heading_conversions_agree() {
        assert_eq!(ray_angle(1, 4), 90.0);
        assert_eq!(ray_angle(36, 72), 180.0);
        assert_eq!(ray_for_heading(90.0, 4), 1);
        assert_eq!(ray_for_heading(358.0, 72), 0);
        assert_eq!(ray_for_heading(12.0, 72), 2);
        for ray in 0..72 {
            assert_eq!(ray_for_heading(ray_angle(ray, 72), 72), ray);
        }
    }

    #[test]
    fn pointer_target_follows_screen_axes() {
        let center = CenterPoint { x: 640, y: 436 };
        assert_eq!(pointer_target(0.0, 100.0, center), (640, 536));
        assert_eq!(pointer_target(90.0, 100.0, center), (740, 436));
        assert_eq!(pointer_target(180.0, 100.0, center), (640, 336));
    }
}
