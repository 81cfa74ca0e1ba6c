use glam::Vec3;
use super::*;

fn unit_cube_at(center: Vec3) -> BoundingVolume {
    BoundingVolume::cube(center, 2.0)
}

// ============================================================================
// Construction
// ============================================================================

#[test]
fn test_from_min_max_round_trips_corners() {
    let v = BoundingVolume::from_min_max(Vec3::new(-1.0, 0.0, 2.0), Vec3::new(3.0, 2.0, 4.0));
    assert_eq!(v.center, Vec3::new(1.0, 1.0, 3.0));
    assert_eq!(v.half_extents, Vec3::new(2.0, 1.0, 1.0));
    assert_eq!(v.min(), Vec3::new(-1.0, 0.0, 2.0));
    assert_eq!(v.max(), Vec3::new(3.0, 2.0, 4.0));
}

#[test]
fn test_cube_edge_length() {
    let v = BoundingVolume::cube(Vec3::ZERO, 8.0);
    assert_eq!(v.edge_length(), 8.0);
    assert_eq!(v.size(), Vec3::splat(8.0));
    assert!(v.is_cubic());
}

#[test]
fn test_is_cubic_rejects_boxes() {
    let v = BoundingVolume::new(Vec3::ZERO, Vec3::new(1.0, 2.0, 1.0));
    assert!(!v.is_cubic());
}

#[test]
fn test_is_finite() {
    assert!(unit_cube_at(Vec3::ZERO).is_finite());
    assert!(!BoundingVolume::new(Vec3::new(f32::NAN, 0.0, 0.0), Vec3::ONE).is_finite());
}

// ============================================================================
// Overlap tests
// ============================================================================

#[test]
fn test_intersects_overlapping_and_disjoint() {
    let a = BoundingVolume::from_min_max(Vec3::splat(-2.0), Vec3::splat(2.0));
    let b = BoundingVolume::from_min_max(Vec3::splat(1.0), Vec3::splat(3.0));
    let c = BoundingVolume::from_min_max(Vec3::splat(5.0), Vec3::splat(7.0));

    assert!(a.intersects(&b));
    assert!(b.intersects(&a));
    assert!(!a.intersects(&c));
}

#[test]
fn test_intersects_is_inclusive_on_faces() {
    let a = unit_cube_at(Vec3::ZERO);
    let b = unit_cube_at(Vec3::new(2.0, 0.0, 0.0));
    assert!(a.intersects(&b));
}

#[test]
fn test_contains_point_boundary() {
    let v = unit_cube_at(Vec3::ZERO);
    assert!(v.contains_point(Vec3::ZERO));
    assert!(v.contains_point(Vec3::new(1.0, 1.0, 1.0)));
    assert!(!v.contains_point(Vec3::new(1.01, 0.0, 0.0)));
}

// ============================================================================
// Ray casting
// ============================================================================

#[test]
fn test_ray_hits_face_neighbor_at_half_edge() {
    let target = unit_cube_at(Vec3::new(2.0, 0.0, 0.0));
    let ray = Ray::new(Vec3::ZERO, Vec3::X);
    let hit = target.intersect_ray(&ray).unwrap();
    assert!((hit - 1.0).abs() < 1e-6);
}

#[test]
fn test_ray_misses_volume_behind_origin() {
    let target = unit_cube_at(Vec3::new(-4.0, 0.0, 0.0));
    let ray = Ray::new(Vec3::ZERO, Vec3::X);
    assert!(target.intersect_ray(&ray).is_none());
}

#[test]
fn test_ray_misses_diagonal_neighbor() {
    // Shares only an edge with the origin cell
    let target = unit_cube_at(Vec3::new(2.0, 2.0, 0.0));
    for direction in [Vec3::X, Vec3::Y, Vec3::NEG_X, Vec3::NEG_Y, Vec3::Z, Vec3::NEG_Z] {
        assert!(target.intersect_ray(&Ray::new(Vec3::ZERO, direction)).is_none());
    }
}

#[test]
fn test_ray_from_inside_reports_zero() {
    let target = unit_cube_at(Vec3::ZERO);
    let hit = target.intersect_ray(&Ray::new(Vec3::new(0.5, 0.0, 0.0), Vec3::NEG_Z));
    assert_eq!(hit, Some(0.0));
}

#[test]
fn test_ray_reports_entry_distance_for_far_volume() {
    let target = unit_cube_at(Vec3::new(0.0, 0.0, -10.0));
    let hit = target.intersect_ray(&Ray::new(Vec3::ZERO, Vec3::NEG_Z)).unwrap();
    assert!((hit - 9.0).abs() < 1e-5);
}

// ============================================================================
// Enclosing / cubic helpers
// ============================================================================

#[test]
fn test_enclosing_empty_is_none() {
    assert!(BoundingVolume::enclosing(Vec::new()).is_none());
}

#[test]
fn test_enclosing_covers_all_inputs() {
    let a = unit_cube_at(Vec3::new(-3.0, 0.0, 0.0));
    let b = unit_cube_at(Vec3::new(5.0, 1.0, 0.0));
    let all = BoundingVolume::enclosing([a, b]).unwrap();
    assert_eq!(all.min(), Vec3::new(-4.0, -1.0, -1.0));
    assert_eq!(all.max(), Vec3::new(6.0, 2.0, 1.0));
}

#[test]
fn test_to_cube_uses_largest_side() {
    let v = BoundingVolume::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(5.0, 1.0, 2.0));
    let cube = v.to_cube();
    assert_eq!(cube.center, v.center);
    assert_eq!(cube.half_extents, Vec3::splat(5.0));
    assert!(cube.is_cubic());
}

// ============================================================================
// Octants
// ============================================================================

#[test]
fn test_octants_tile_parent() {
    let parent = BoundingVolume::cube(Vec3::ZERO, 8.0);
    let children = parent.octants();

    assert_eq!(children[0].center, Vec3::splat(-2.0));
    assert_eq!(children[1].center, Vec3::new(2.0, -2.0, -2.0));
    assert_eq!(children[2].center, Vec3::new(-2.0, 2.0, -2.0));
    assert_eq!(children[4].center, Vec3::new(-2.0, -2.0, 2.0));
    assert_eq!(children[7].center, Vec3::splat(2.0));

    for child in &children {
        assert_eq!(child.edge_length(), 4.0);
        assert!(child.min().cmpge(parent.min()).all());
        assert!(child.max().cmple(parent.max()).all());
    }
}
