use eframe::egui::Vec2;

use super::PhysicsConfig;

/// Pull towards `center`, linear in displacement.
pub(super) fn centering_force(position: Vec2, center: Vec2, config: &PhysicsConfig) -> Vec2 {
    (center - position) * config.center_strength
}

/// Inverse-square push of `point` away from `other`.
///
/// Zero beyond the cutoff radius and for coincident points.
pub(super) fn repulsion_between(point: Vec2, other: Vec2, config: &PhysicsConfig) -> Vec2 {
    let delta = point - other;
    let distance = delta.length();
    if distance <= 0.0 || distance >= config.repulsion_radius {
        return Vec2::ZERO;
    }

    let magnitude = config.repulsion_strength / (distance * distance);
    (delta / distance) * magnitude
}

/// Velocity correction for the source end of a spring between `source` and
/// `target`; the target receives the negation. `None` when the endpoints
/// coincide.
pub(super) fn spring_correction(
    source: Vec2,
    target: Vec2,
    config: &PhysicsConfig,
) -> Option<Vec2> {
    let delta = target - source;
    let distance = delta.length();
    if distance <= 0.0 {
        return None;
    }

    let magnitude = (distance - config.rest_length) * config.spring_strength;
    Some((delta / distance) * magnitude)
}

#[cfg(test)]
mod tests {
    use eframe::egui::{Vec2, vec2};

    use super::{centering_force, repulsion_between, spring_correction};
    use crate::app::physics::PhysicsConfig;

    #[test]
    fn repulsion_is_zero_beyond_cutoff() {
        let config = PhysicsConfig::default();
        assert_eq!(
            repulsion_between(vec2(0.0, 0.0), vec2(150.5, 0.0), &config),
            Vec2::ZERO
        );
        assert_eq!(
            repulsion_between(vec2(0.0, 0.0), vec2(300.0, 400.0), &config),
            Vec2::ZERO
        );
    }

    #[test]
    fn repulsion_is_inverse_square_and_points_away() {
        let config = PhysicsConfig::default();
        let force = repulsion_between(vec2(0.0, 0.0), vec2(10.0, 0.0), &config);
        assert!((force.x + 1.0).abs() < 1e-6);
        assert_eq!(force.y, 0.0);
    }

    #[test]
    fn coincident_points_produce_no_force() {
        let config = PhysicsConfig::default();
        let point = vec2(42.0, 7.0);
        assert_eq!(repulsion_between(point, point, &config), Vec2::ZERO);
        assert_eq!(spring_correction(point, point, &config), None);
    }

    #[test]
    fn spring_attracts_when_stretched_and_repels_when_compressed() {
        let config = PhysicsConfig::default();
        let stretched = spring_correction(vec2(0.0, 0.0), vec2(200.0, 0.0), &config)
            .expect("distinct endpoints");
        assert!((stretched.x - 10.0).abs() < 1e-5);

        let compressed = spring_correction(vec2(0.0, 0.0), vec2(60.0, 0.0), &config)
            .expect("distinct endpoints");
        assert!((compressed.x + 4.0).abs() < 1e-5);
    }

    #[test]
    fn centering_scales_with_displacement() {
        let config = PhysicsConfig::default();
        let force = centering_force(vec2(0.0, 100.0), vec2(1000.0, 100.0), &config);
        assert!((force.x - 1.0).abs() < 1e-6);
        assert_eq!(force.y, 0.0);
    }
}
