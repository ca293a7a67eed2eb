//! Tests for projectile ballistics.

#[cfg(test)]
mod tests {
    use super::super::ballistics::{
        advance, check_collision, face_impact, ground_crossing, launch, LaunchError,
    };
    use super::super::components::ProjectileState;
    use bevy::prelude::*;
    use std::time::Duration;

    const LIFETIME: Duration = Duration::from_secs(15);

    fn entity(index: u32) -> Entity {
        Entity::from_raw(index)
    }

    fn at(translation: Vec3) -> Transform {
        Transform::from_translation(translation)
    }

    #[test]
    fn test_launch_normalizes_direction() {
        let projectile = launch(Vec3::ZERO, Vec3::new(0.0, 0.0, -4.0), 25.0, Duration::ZERO, LIFETIME)
            .unwrap();

        assert_eq!(projectile.velocity, Vec3::new(0.0, 0.0, -25.0));
        assert_eq!(projectile.state, ProjectileState::InFlight);
        assert_eq!(projectile.previous_position, projectile.position);
    }

    #[test]
    fn test_launch_rejects_degenerate_input() {
        assert_eq!(
            launch(Vec3::ZERO, Vec3::ZERO, 25.0, Duration::ZERO, LIFETIME).unwrap_err(),
            LaunchError::DegenerateDirection(Vec3::ZERO)
        );
        assert!(matches!(
            launch(Vec3::ZERO, Vec3::new(f32::NAN, 0.0, 1.0), 25.0, Duration::ZERO, LIFETIME),
            Err(LaunchError::DegenerateDirection(_))
        ));
        assert!(matches!(
            launch(Vec3::splat(f32::INFINITY), Vec3::NEG_Z, 25.0, Duration::ZERO, LIFETIME),
            Err(LaunchError::NonFiniteOrigin(_))
        ));
        assert_eq!(
            launch(Vec3::ZERO, Vec3::NEG_Z, 0.0, Duration::ZERO, LIFETIME).unwrap_err(),
            LaunchError::InvalidSpeed(0.0)
        );
    }

    #[test]
    fn test_straight_advance_is_linear() {
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();

        advance(&mut projectile, Vec3::ZERO, 0.5);

        assert_eq!(projectile.previous_position, Vec3::ZERO);
        assert_eq!(projectile.position, Vec3::new(0.0, 0.0, -10.0));
        assert_eq!(projectile.velocity, Vec3::new(0.0, 0.0, -20.0));
    }

    #[test]
    fn test_gravity_bends_trajectory() {
        let mut projectile = launch(Vec3::Y, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();

        advance(&mut projectile, Vec3::new(0.0, -10.0, 0.0), 0.1);

        // semi-implicit: velocity updated first, then position
        assert!((projectile.velocity.y + 1.0).abs() < 1e-5);
        assert!((projectile.position.y - 0.9).abs() < 1e-5);
    }

    #[test]
    fn test_embedded_projectile_does_not_move() {
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();
        assert!(projectile.embed(Vec3::new(0.0, 0.0, -3.0), Duration::from_secs(1), Duration::from_secs(5)));

        advance(&mut projectile, Vec3::new(0.0, -10.0, 0.0), 0.5);

        assert_eq!(projectile.position, Vec3::new(0.0, 0.0, -3.0));
        assert_eq!(projectile.velocity, Vec3::ZERO);
        assert_eq!(
            projectile.state,
            ProjectileState::Embedded { remove_at: Duration::from_secs(6) }
        );

        // Embedded → Embedded/InFlight never happens
        assert!(!projectile.embed(Vec3::ZERO, Duration::from_secs(2), Duration::from_secs(5)));
        assert!(!projectile.expire());
        assert!(!projectile.display_elapsed(Duration::from_millis(5_999)));
        assert!(projectile.display_elapsed(Duration::from_secs(6)));
    }

    #[test]
    fn test_expiry_is_strictly_after_lifetime() {
        let projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::from_secs(1), LIFETIME).unwrap();

        assert!(!projectile.is_expired(Duration::from_secs(16)));
        assert!(projectile.is_expired(Duration::from_millis(16_001)));
    }

    #[test]
    fn test_collision_empty_target_set() {
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();
        advance(&mut projectile, Vec3::ZERO, 1.0);

        assert!(check_collision(&projectile, std::iter::empty(), 0.6).is_none());
    }

    #[test]
    fn test_swept_collision_catches_fast_arrow() {
        // one step covers 20m, target sphere sits in the middle of the segment
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();
        advance(&mut projectile, Vec3::ZERO, 1.0);

        let hit = check_collision(&projectile, [(entity(1), at(Vec3::new(0.0, 0.0, -10.0)))], 0.6)
            .unwrap();

        assert_eq!(hit.target, entity(1));
        // sphere entry decides the order, the point sits on the face
        assert!((hit.distance - 9.4).abs() < 1e-4);
        assert!(hit.point.distance(Vec3::new(0.0, 0.0, -10.0)) < 1e-4, "point = {:?}", hit.point);
    }

    #[test]
    fn test_nearest_target_wins() {
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();
        advance(&mut projectile, Vec3::ZERO, 1.0);

        let far = (entity(1), at(Vec3::new(0.0, 0.0, -15.0)));
        let near = (entity(2), at(Vec3::new(0.2, 0.0, -5.0)));
        let hit = check_collision(&projectile, [far, near], 0.6).unwrap();

        assert_eq!(hit.target, entity(2));
    }

    #[test]
    fn test_miss_beside_sphere() {
        let mut projectile = launch(Vec3::ZERO, Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME).unwrap();
        advance(&mut projectile, Vec3::ZERO, 1.0);

        let target = (entity(1), at(Vec3::new(1.0, 0.0, -10.0)));
        assert!(check_collision(&projectile, [target], 0.6).is_none());

        // sphere behind the segment end
        let behind = (entity(2), at(Vec3::new(0.0, 0.0, -25.0)));
        assert!(check_collision(&projectile, [behind], 0.6).is_none());
    }

    #[test]
    fn test_start_inside_sphere_collides_immediately() {
        let projectile = launch(Vec3::new(0.0, 0.0, -5.0), Vec3::NEG_Z, 20.0, Duration::ZERO, LIFETIME)
            .unwrap();

        let hit = check_collision(&projectile, [(entity(1), at(Vec3::new(0.0, 0.1, -5.2)))], 0.6)
            .unwrap();
        assert_eq!(hit.distance, 0.0);
        // not moving yet: the start position is the closest approach
        assert!(hit.point.distance(Vec3::new(0.0, 0.0, -5.0)) < 1e-5);
    }

    #[test]
    fn test_angled_shot_reaches_face_center() {
        // 45° off the target's facing axis, aimed at the center
        let center = Vec3::new(4.0, 1.6, -4.0);
        let origin = Vec3::new(0.0, 1.6, 0.0);
        let mut projectile = launch(origin, center - origin, 25.0, Duration::ZERO, LIFETIME).unwrap();
        let mut hit = None;
        for _ in 0..40 {
            advance(&mut projectile, Vec3::ZERO, 1.0 / 64.0);
            hit = check_collision(&projectile, [(entity(1), at(center))], 0.6);
            if hit.is_some() {
                break;
            }
        }

        let hit = hit.unwrap();
        assert!(hit.point.distance(center) < 1e-3, "point = {:?}", hit.point);
    }

    #[test]
    fn test_face_impact_follows_target_rotation() {
        // face turned to +X; arrow travels along -X, 0.2 above the center
        let target = Transform::from_translation(Vec3::new(0.0, 0.0, -5.0))
            .with_rotation(Quat::from_rotation_y(std::f32::consts::FRAC_PI_2));
        let start = Vec3::new(0.5, 0.2, -5.0);
        let end = Vec3::new(0.3, 0.2, -5.0);

        let point = face_impact(start, end, &target, 0.6);
        assert!(point.distance(Vec3::new(0.0, 0.2, -5.0)) < 1e-4, "point = {:?}", point);
    }

    #[test]
    fn test_face_impact_grazing_shot_uses_closest_approach() {
        // parallel to the face: no plane crossing, nearest point to the center instead
        let target = at(Vec3::new(0.0, 0.0, -5.0));
        let start = Vec3::new(-1.0, 0.3, -5.2);
        let end = Vec3::new(-0.4, 0.3, -5.2);

        let point = face_impact(start, end, &target, 0.6);
        assert!(point.distance(Vec3::new(0.0, 0.3, -5.2)) < 1e-4, "point = {:?}", point);
    }

    #[test]
    fn test_ground_crossing() {
        let mut projectile = launch(Vec3::new(0.0, 1.0, 0.0), Vec3::NEG_Y, 2.0, Duration::ZERO, LIFETIME)
            .unwrap();
        advance(&mut projectile, Vec3::ZERO, 1.0);

        let (point, distance) = ground_crossing(&projectile, 0.0).unwrap();
        assert!(point.y.abs() < 1e-6);
        assert!((distance - 1.0).abs() < 1e-5);

        // already below ground: no crossing reported
        advance(&mut projectile, Vec3::ZERO, 1.0);
        assert!(ground_crossing(&projectile, 0.0).is_none());
    }

    #[test]
    fn test_heading_follows_velocity() {
        let mut projectile = launch(Vec3::ZERO, Vec3::new(0.0, 0.0, -1.0), 10.0, Duration::ZERO, LIFETIME)
            .unwrap();
        assert_eq!(projectile.heading(), Some(Dir3::NEG_Z));

        projectile.embed(Vec3::ZERO, Duration::ZERO, Duration::from_secs(5));
        assert_eq!(projectile.heading(), None);
    }
}
