//! Hit-testing for taps

use glam::Vec2;

use super::state::Disc;

/// Point-in-disc test (boundary counts as a hit)
#[inline]
pub fn disc_contains(disc: &Disc, point: Vec2) -> bool {
    disc.pos.distance_squared(point) <= disc.radius * disc.radius
}

/// Index of the most recently spawned disc containing `point`
pub fn topmost_hit(discs: &[Disc], point: Vec2) -> Option<usize> {
    discs.iter().rposition(|disc| disc_contains(disc, point))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn disc(id: u32, x: f32, y: f32, radius: f32) -> Disc {
        Disc {
            id,
            value: 12,
            sacred: false,
            pos: Vec2::new(x, y),
            radius,
            speed: 100.0,
        }
    }

    #[test]
    fn test_contains_center_and_edge() {
        let d = disc(1, 100.0, 100.0, 20.0);
        assert!(disc_contains(&d, Vec2::new(100.0, 100.0)));
        assert!(disc_contains(&d, Vec2::new(120.0, 100.0)));
        assert!(!disc_contains(&d, Vec2::new(120.1, 100.0)));
        assert!(!disc_contains(&d, Vec2::new(115.0, 115.0)));
    }

    #[test]
    fn test_topmost_prefers_latest_spawn() {
        let discs = vec![
            disc(1, 100.0, 100.0, 30.0),
            disc(2, 110.0, 100.0, 30.0),
            disc(3, 400.0, 100.0, 30.0),
        ];
        assert_eq!(topmost_hit(&discs, Vec2::new(105.0, 100.0)), Some(1));
        assert_eq!(topmost_hit(&discs, Vec2::new(75.0, 100.0)), Some(0));
        assert_eq!(topmost_hit(&discs, Vec2::new(250.0, 100.0)), None);
    }

    #[test]
    fn test_below_field() {
        let d = disc(1, 50.0, 520.0, 20.0);
        assert!(!d.below(500.0));
        let d = disc(1, 50.0, 520.5, 20.0);
        assert!(d.below(500.0));
    }
}
