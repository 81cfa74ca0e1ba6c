/// BoundingVolume: axis-aligned box stored as center + half extents.
///
/// Used both for tree cells (always cubic) and for the blocking objects
/// inserted into the tree (any box). All overlap tests are inclusive:
/// boxes that merely touch on a face, edge or corner intersect.

use glam::Vec3;

/// Relative tolerance used when checking that a volume is a cube.
const CUBIC_TOLERANCE: f32 = 1e-4;

/// Axis-aligned bounding box (center + half extents)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingVolume {
    /// Center point (x, y, z)
    pub center: Vec3,
    /// Half of the box size along each axis
    pub half_extents: Vec3,
}

impl BoundingVolume {
    /// Create a volume from its center and half extents.
    pub fn new(center: Vec3, half_extents: Vec3) -> Self {
        Self { center, half_extents }
    }

    /// Create a cube from its center and full edge length.
    pub fn cube(center: Vec3, edge_length: f32) -> Self {
        Self {
            center,
            half_extents: Vec3::splat(edge_length * 0.5),
        }
    }

    /// Create a volume from its minimum and maximum corners.
    pub fn from_min_max(min: Vec3, max: Vec3) -> Self {
        Self {
            center: (min + max) * 0.5,
            half_extents: (max - min) * 0.5,
        }
    }

    /// Minimum corner
    pub fn min(&self) -> Vec3 {
        self.center - self.half_extents
    }

    /// Maximum corner
    pub fn max(&self) -> Vec3 {
        self.center + self.half_extents
    }

    /// Full size along each axis
    pub fn size(&self) -> Vec3 {
        self.half_extents * 2.0
    }

    /// Edge length of a cubic volume.
    ///
    /// Only the X axis is read; cells are cubic so every axis agrees.
    pub fn edge_length(&self) -> f32 {
        self.half_extents.x * 2.0
    }

    /// Whether all three half extents are equal (within a small relative tolerance).
    pub fn is_cubic(&self) -> bool {
        let h = self.half_extents;
        let largest = h.max_element().abs().max(1.0);
        (h.x - h.y).abs() <= CUBIC_TOLERANCE * largest
            && (h.x - h.z).abs() <= CUBIC_TOLERANCE * largest
    }

    /// Whether center and extents are all finite numbers.
    pub fn is_finite(&self) -> bool {
        self.center.is_finite() && self.half_extents.is_finite()
    }

    /// Test if this volume intersects (overlaps or touches) another one.
    pub fn intersects(&self, other: &BoundingVolume) -> bool {
        let (a_min, a_max) = (self.min(), self.max());
        let (b_min, b_max) = (other.min(), other.max());
        a_min.x <= b_max.x && a_max.x >= b_min.x
            && a_min.y <= b_max.y && a_max.y >= b_min.y
            && a_min.z <= b_max.z && a_max.z >= b_min.z
    }

    /// Test if a point lies inside or on the boundary of this volume.
    pub fn contains_point(&self, point: Vec3) -> bool {
        let (min, max) = (self.min(), self.max());
        point.cmpge(min).all() && point.cmple(max).all()
    }

    /// Cast a ray against this volume (slab method).
    ///
    /// Returns the distance along the ray to the first boundary hit, `0.0`
    /// when the origin is already inside, or `None` when the ray misses.
    /// Distances are in world units when `ray.direction` is normalized.
    pub fn intersect_ray(&self, ray: &Ray) -> Option<f32> {
        let (min, max) = (self.min(), self.max());
        let mut t_near = f32::NEG_INFINITY;
        let mut t_far = f32::INFINITY;

        for axis in 0..3 {
            let origin = ray.origin[axis];
            let direction = ray.direction[axis];

            if direction == 0.0 {
                // Parallel to this slab: the origin must already be within it
                if origin < min[axis] || origin > max[axis] {
                    return None;
                }
                continue;
            }

            let inv = 1.0 / direction;
            let mut t0 = (min[axis] - origin) * inv;
            let mut t1 = (max[axis] - origin) * inv;
            if t0 > t1 {
                std::mem::swap(&mut t0, &mut t1);
            }

            t_near = t_near.max(t0);
            t_far = t_far.min(t1);
            if t_near > t_far {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(t_near.max(0.0))
    }

    /// Smallest volume enclosing every volume in `volumes`.
    ///
    /// Returns `None` for an empty input.
    pub fn enclosing<I>(volumes: I) -> Option<Self>
    where
        I: IntoIterator<Item = BoundingVolume>,
    {
        let mut iter = volumes.into_iter();
        let first = iter.next()?;
        let (min, max) = iter.fold((first.min(), first.max()), |(min, max), v| {
            (min.min(v.min()), max.max(v.max()))
        });
        Some(Self::from_min_max(min, max))
    }

    /// Cube with the same center whose edge is this volume's largest side.
    pub fn to_cube(&self) -> Self {
        Self {
            center: self.center,
            half_extents: Vec3::splat(self.half_extents.max_element()),
        }
    }

    /// The 8 child cubes of this (cubic) volume.
    ///
    /// Octant bit layout: bit0 = X, bit1 = Y, bit2 = Z (0 = low, 1 = high).
    /// Each child center is offset by ±edge/4 on every axis. Only the X size
    /// is read, so a non-cubic parent produces wrong children.
    pub fn octants(&self) -> [BoundingVolume; 8] {
        let quarter = self.edge_length() * 0.25;
        let child_half = Vec3::splat(quarter);
        std::array::from_fn(|octant| {
            let sign = |bit: usize| if octant & bit == 0 { -1.0 } else { 1.0 };
            let offset = Vec3::new(sign(1) * quarter, sign(2) * quarter, sign(4) * quarter);
            BoundingVolume {
                center: self.center + offset,
                half_extents: child_half,
            }
        })
    }
}

/// Half-line used for directional probing between graph nodes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point
    pub origin: Vec3,
    /// Direction (expected to be normalized)
    pub direction: Vec3,
}

impl Ray {
    /// Create a ray from an origin and a direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Self {
        Self { origin, direction }
    }
}

#[cfg(test)]
#[path = "bounds_tests.rs"]
mod tests;
