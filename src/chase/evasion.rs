//! Pursuit/evasion position controller
//!
//! Pure geometry: given the pointer and a target, decide whether the target
//! flees, where it lands, and whether it got cornered hard enough to split.
//! The controller never removes targets and has no say over catches; the
//! arena owns the active set.

use glam::Vec2;

use super::target::{EvasiveTarget, SizeClass};
use crate::consts::*;
use crate::random::RandomSource;
use crate::{clamp_into, max_origin};

/// Outcome of a proximity check for one target
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Evasion {
    /// Pointer outside the evasion radius; the target stays put
    Stay,
    /// Target flees to a new in-bounds top-left position
    Relocate { pos: Vec2, cornered: bool },
    /// Target is cornered and eligible to split at this top-left position
    Split { at: Vec2 },
}

/// Escape distance for a given radius: `radius + 50 + [0, 100)`
pub fn escape_distance<R: RandomSource>(radius: f32, rng: &mut R) -> f32 {
    radius + ESCAPE_MARGIN + rng.unit() * ESCAPE_JITTER
}

/// True when a clamped top-left sits within `CORNER_TOLERANCE` of a bound on
/// both axes
///
/// Either bound counts per axis, so a container barely larger than the
/// footprint reports "cornered" against two parallel edges too.
pub fn is_cornered(pos: Vec2, footprint: Vec2, container: Vec2) -> bool {
    let max = container - footprint;
    let near_x = pos.x <= CORNER_TOLERANCE || pos.x >= max.x - CORNER_TOLERANCE;
    let near_y = pos.y <= CORNER_TOLERANCE || pos.y >= max.y - CORNER_TOLERANCE;
    near_x && near_y
}

/// Whether a cornered target may split (normal size, evaded more than 5 times)
pub fn can_split(target: &EvasiveTarget) -> bool {
    target.size == SizeClass::Normal && target.evasion_count > SPLIT_MIN_EVASIONS
}

/// Compute where a target goes when the pointer moves
///
/// `pointer` and `container` are container-relative; `radius` is the
/// difficulty's evasion radius.
pub fn evade<R: RandomSource>(
    target: &EvasiveTarget,
    pointer: Vec2,
    container: Vec2,
    radius: f32,
    rng: &mut R,
) -> Evasion {
    let center = target.center();
    if center.distance(pointer) >= radius {
        return Evasion::Stay;
    }

    // Direction away from the pointer (atan2 of center - pointer)
    let away = center - pointer;
    let angle = away.y.atan2(away.x);
    let escape = escape_distance(radius, rng);

    let footprint = target.footprint();
    let new_center = center + Vec2::new(angle.cos(), angle.sin()) * escape;
    let pos = clamp_into(new_center - footprint / 2.0, footprint, container);
    let cornered = is_cornered(pos, footprint, container);

    if cornered && can_split(target) {
        log::debug!("Target {} cornered at ({:.0}, {:.0}) - splitting", target.id, pos.x, pos.y);
        return Evasion::Split { at: pos };
    }

    Evasion::Relocate { pos, cornered }
}

/// Top-left positions of the two small targets a split spawns
pub fn split_positions(at: Vec2, container: Vec2) -> [Vec2; 2] {
    let footprint = SizeClass::Small.footprint();
    let offset = Vec2::new(SPLIT_OFFSET, 0.0);
    [
        clamp_into(at - offset, footprint, container),
        clamp_into(at + offset, footprint, container),
    ]
}

/// Random in-bounds top-left for a freshly spawned target
pub fn random_spawn<R: RandomSource>(size: SizeClass, container: Vec2, rng: &mut R) -> Vec2 {
    let max = max_origin(size.footprint(), container);
    Vec2::new(rng.unit() * max.x, rng.unit() * max.y)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::random::{ScriptedRandom, seeded};
    use proptest::prelude::*;

    const CONTAINER: Vec2 = Vec2::new(800.0, 600.0);

    fn normal_at(x: f32, y: f32) -> EvasiveTarget {
        EvasiveTarget::new(1, Vec2::new(x, y), SizeClass::Normal)
    }

    #[test]
    fn test_pointer_outside_radius_stays() {
        let t = normal_at(200.0, 200.0);
        let mut rng = ScriptedRandom::constant(0.5);
        // Center is (275, 228); pointer exactly 100 away
        let pointer = Vec2::new(175.0, 228.0);
        assert_eq!(evade(&t, pointer, CONTAINER, 100.0, &mut rng), Evasion::Stay);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn test_flees_away_from_pointer() {
        let t = normal_at(200.0, 200.0);
        let pointer = Vec2::new(210.0, 210.0);
        let mut rng = seeded(1);
        match evade(&t, pointer, CONTAINER, 100.0, &mut rng) {
            Evasion::Relocate { pos, .. } => {
                let new_center = pos + t.footprint() / 2.0;
                assert!(new_center.distance(pointer) >= 150.0);
                assert!(pos.x >= 0.0 && pos.x <= 650.0);
                assert!(pos.y >= 0.0 && pos.y <= 544.0);
                // Pointer is up-left of the center, so the target moves down-right
                assert!(pos.x > t.pos.x && pos.y > t.pos.y);
            }
            other => panic!("expected relocation, got {:?}", other),
        }
    }

    #[test]
    fn test_escape_distance_lower_bound() {
        let mut rng = seeded(99);
        for _ in 0..1000 {
            let d = escape_distance(100.0, &mut rng);
            assert!(d >= 150.0 && d < 250.0);
        }
    }

    #[test]
    fn test_cornered_predicate() {
        let fp = SizeClass::Normal.footprint();
        assert!(is_cornered(Vec2::new(650.0, 544.0), fp, CONTAINER));
        assert!(is_cornered(Vec2::new(5.0, 540.0), fp, CONTAINER));
        assert!(!is_cornered(Vec2::new(650.0, 300.0), fp, CONTAINER));
        assert!(!is_cornered(Vec2::new(300.0, 0.0), fp, CONTAINER));
    }

    #[test]
    fn test_cornered_without_enough_evasions_relocates() {
        let mut t = normal_at(620.0, 520.0);
        t.evasion_count = 5;
        let pointer = t.center() - Vec2::new(10.0, 10.0);
        let mut rng = ScriptedRandom::constant(0.5);
        match evade(&t, pointer, CONTAINER, 100.0, &mut rng) {
            Evasion::Relocate { pos, cornered } => {
                assert!(cornered);
                assert_eq!(pos, Vec2::new(650.0, 544.0));
            }
            other => panic!("expected relocation, got {:?}", other),
        }
    }

    #[test]
    fn test_cornered_after_six_evasions_splits() {
        let mut t = normal_at(620.0, 520.0);
        t.evasion_count = 6;
        let pointer = t.center() - Vec2::new(10.0, 10.0);
        let mut rng = ScriptedRandom::constant(0.5);
        assert_eq!(
            evade(&t, pointer, CONTAINER, 100.0, &mut rng),
            Evasion::Split { at: Vec2::new(650.0, 544.0) }
        );
    }

    #[test]
    fn test_small_targets_never_split() {
        let mut t = EvasiveTarget::new(1, Vec2::new(690.0, 555.0), SizeClass::Small);
        t.evasion_count = 50;
        let pointer = t.center() - Vec2::new(5.0, 5.0);
        let mut rng = ScriptedRandom::constant(0.5);
        assert!(matches!(
            evade(&t, pointer, CONTAINER, 100.0, &mut rng),
            Evasion::Relocate { cornered: true, .. }
        ));
    }

    #[test]
    fn test_split_positions_offset_and_clamped() {
        let [left, right] = split_positions(Vec2::new(650.0, 544.0), CONTAINER);
        assert_eq!(left, Vec2::new(600.0, 544.0));
        // 700 clamps to 800 - 100
        assert_eq!(right, Vec2::new(700.0, 544.0));

        let [left, right] = split_positions(Vec2::new(0.0, 0.0), CONTAINER);
        assert_eq!(left, Vec2::new(0.0, 0.0));
        assert_eq!(right, Vec2::new(50.0, 0.0));
    }

    #[test]
    fn test_random_spawn_in_bounds() {
        let mut rng = ScriptedRandom::constant(1.0);
        let pos = random_spawn(SizeClass::Normal, CONTAINER, &mut rng);
        assert!(pos.x <= 650.0 && pos.y <= 544.0);
    }

    proptest! {
        #[test]
        fn prop_position_stays_in_bounds(
            x in -50.0f32..900.0,
            y in -50.0f32..700.0,
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
            w in 160.0f32..1600.0,
            h in 60.0f32..1200.0,
            roll in 0.0f32..1.0,
            radius in prop::sample::select(vec![60.0f32, 100.0, 150.0]),
        ) {
            let container = Vec2::new(w, h);
            let t = normal_at(x, y);
            let mut rng = ScriptedRandom::constant(roll);
            match evade(&t, Vec2::new(px, py), container, radius, &mut rng) {
                Evasion::Stay => {}
                Evasion::Relocate { pos, .. } | Evasion::Split { at: pos } => {
                    prop_assert!(pos.x >= 0.0 && pos.x + 150.0 <= w + 1e-3);
                    prop_assert!(pos.y >= 0.0 && pos.y + 56.0 <= h + 1e-3);
                }
            }
        }

        #[test]
        fn prop_outside_radius_is_stationary(
            angle in 0.0f32..std::f32::consts::TAU,
            extra in 0.0f32..300.0,
        ) {
            let t = normal_at(300.0, 300.0);
            let pointer = t.center() + Vec2::new(angle.cos(), angle.sin()) * (100.0 + extra + 0.01);
            let mut rng = seeded(3);
            prop_assert_eq!(evade(&t, pointer, CONTAINER, 100.0, &mut rng), Evasion::Stay);
        }

        #[test]
        fn prop_split_requires_all_conditions(
            count in 0u32..12,
            px in 0.0f32..800.0,
            py in 0.0f32..600.0,
        ) {
            let mut t = normal_at(400.0, 300.0);
            t.evasion_count = count;
            let mut rng = seeded(5);
            if let Evasion::Split { at } = evade(&t, Vec2::new(px, py), CONTAINER, 150.0, &mut rng) {
                prop_assert!(count > 5);
                prop_assert!(is_cornered(at, t.footprint(), CONTAINER));
            }
        }
    }
}
