//! World-space bounding volumes.

use glam::Vec3;

/// Axis-aligned bounding box in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extent {
    pub min: Vec3,
    pub max: Vec3,
}

impl Extent {
    /// Creates the smallest box containing all `points`.
    ///
    /// Returns `None` for an empty iterator.
    pub fn from_points(points: impl IntoIterator<Item = Vec3>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        Some(points.fold(Self::new(first, first), |acc, p| Self {
            min: acc.min.min(p),
            max: acc.max.max(p),
        }))
    }

    /// Creates a box from its corners.
    pub fn new(min: Vec3, max: Vec3) -> Self {
        Self { min, max }
    }

    /// Edge lengths along each axis.
    pub fn size(&self) -> Vec3 {
        self.max - self.min
    }

    /// Midpoint of the box.
    pub fn center(&self) -> Vec3 {
        (self.min + self.max) * 0.5
    }

    /// Length of the space diagonal.
    pub fn diagonal(&self) -> f32 {
        self.size().length()
    }

    /// The 8 corners, ordered bottom face then top face.
    pub fn corners(&self) -> [Vec3; 8] {
        let (min, max) = (self.min, self.max);
        [
            Vec3::new(min.x, min.y, min.z), // 0
            Vec3::new(max.x, min.y, min.z), // 1
            Vec3::new(max.x, max.y, min.z), // 2
            Vec3::new(min.x, max.y, min.z), // 3
            Vec3::new(min.x, min.y, max.z), // 4
            Vec3::new(max.x, min.y, max.z), // 5
            Vec3::new(max.x, max.y, max.z), // 6
            Vec3::new(min.x, max.y, max.z), // 7
        ]
    }

    /// The 12 edges as index pairs into [`Self::corners`].
    pub fn edges() -> [[u32; 2]; 12] {
        [
            // Bottom face
            [0, 1],
            [1, 2],
            [2, 3],
            [3, 0],
            // Top face
            [4, 5],
            [5, 6],
            [6, 7],
            [7, 4],
            // Vertical edges
            [0, 4],
            [1, 5],
            [2, 6],
            [3, 7],
        ]
    }
}

/// Culling sphere around a grid's extent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingSphere {
    pub center: Vec3,
    pub radius: f32,
}

impl BoundingSphere {
    /// Sphere centered on `extent` whose diameter is `max_depth`.
    pub fn from_extent(extent: &Extent, max_depth: f32) -> Self {
        Self {
            center: extent.center(),
            radius: max_depth / 2.0,
        }
    }

    /// Whether `point` lies inside or on the sphere.
    pub fn contains(&self, point: Vec3) -> bool {
        self.center.distance_squared(point) <= self.radius * self.radius
    }
}
