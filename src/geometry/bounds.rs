use cgmath::{Matrix4, Vector3};

/// Axis-aligned bounding box
///
/// Used both for mesh bounds in a node's local space and as a cheap
/// broad-phase reject before exact oriented tests.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box
    pub min: Vector3<f32>,
    /// Maximum corner of the bounding box
    pub max: Vector3<f32>,
}

impl Aabb {
    /// Create a new AABB from its corners
    ///
    /// Corners are reordered per axis, so `min`/`max` may be passed swapped.
    pub fn new(a: Vector3<f32>, b: Vector3<f32>) -> Self {
        Self {
            min: Vector3::new(a.x.min(b.x), a.y.min(b.y), a.z.min(b.z)),
            max: Vector3::new(a.x.max(b.x), a.y.max(b.y), a.z.max(b.z)),
        }
    }

    /// Box centered at `center` with full edge lengths `size`
    pub fn from_center_size(center: Vector3<f32>, size: Vector3<f32>) -> Self {
        Self::from_center_half_extents(center, size * 0.5)
    }

    /// Box centered at `center` with half-extents `half`
    pub fn from_center_half_extents(center: Vector3<f32>, half: Vector3<f32>) -> Self {
        Self::new(center - half, center + half)
    }

    /// Smallest box containing every point, or `None` for an empty slice
    pub fn from_points(points: &[Vector3<f32>]) -> Option<Self> {
        let (first, rest) = points.split_first()?;
        let mut bounds = Self {
            min: *first,
            max: *first,
        };
        for point in rest {
            bounds.encapsulate_point(*point);
        }
        Some(bounds)
    }

    /// Center point
    pub fn center(&self) -> Vector3<f32> {
        (self.min + self.max) * 0.5
    }

    /// Full edge lengths
    pub fn size(&self) -> Vector3<f32> {
        self.max - self.min
    }

    /// Half edge lengths
    pub fn half_extents(&self) -> Vector3<f32> {
        self.size() * 0.5
    }

    /// The eight corners, min corner first
    pub fn corners(&self) -> [Vector3<f32>; 8] {
        let (lo, hi) = (self.min, self.max);
        [
            Vector3::new(lo.x, lo.y, lo.z),
            Vector3::new(hi.x, lo.y, lo.z),
            Vector3::new(lo.x, hi.y, lo.z),
            Vector3::new(lo.x, lo.y, hi.z),
            Vector3::new(hi.x, hi.y, lo.z),
            Vector3::new(hi.x, lo.y, hi.z),
            Vector3::new(lo.x, hi.y, hi.z),
            Vector3::new(hi.x, hi.y, hi.z),
        ]
    }

    /// Grow this box so it also contains `point`
    pub fn encapsulate_point(&mut self, point: Vector3<f32>) {
        self.min.x = self.min.x.min(point.x);
        self.min.y = self.min.y.min(point.y);
        self.min.z = self.min.z.min(point.z);
        self.max.x = self.max.x.max(point.x);
        self.max.y = self.max.y.max(point.y);
        self.max.z = self.max.z.max(point.z);
    }

    /// Grow this box so it also contains `other`
    pub fn encapsulate(&mut self, other: &Aabb) {
        self.encapsulate_point(other.min);
        self.encapsulate_point(other.max);
    }

    /// Union of two boxes
    pub fn union(&self, other: &Aabb) -> Aabb {
        let mut merged = *self;
        merged.encapsulate(other);
        merged
    }

    /// Returns `true` if the boxes overlap (inclusive on faces)
    pub fn overlaps(&self, other: &Aabb) -> bool {
        !(self.max.x < other.min.x
            || self.min.x > other.max.x
            || self.max.y < other.min.y
            || self.min.y > other.max.y
            || self.max.z < other.min.z
            || self.min.z > other.max.z)
    }

    /// Returns `true` if `point` lies inside or on the box
    pub fn contains_point(&self, point: Vector3<f32>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
            && point.z >= self.min.z
            && point.z <= self.max.z
    }

    /// Apply an affine matrix and re-bound the eight transformed corners
    pub fn transformed(&self, matrix: &Matrix4<f32>) -> Aabb {
        let corners = self.corners();
        let first = (*matrix * corners[0].extend(1.0)).truncate();
        let mut bounds = Aabb {
            min: first,
            max: first,
        };
        for corner in &corners[1..] {
            bounds.encapsulate_point((*matrix * corner.extend(1.0)).truncate());
        }
        bounds
    }
}
