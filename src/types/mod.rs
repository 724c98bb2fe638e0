//! Shared types used throughout the library.

mod home;
mod surface;
mod transform;

pub use home::{Color, Furniture, Home, Room, Surface, SurfaceTexture, Wall};
pub use surface::SurfaceKind;
pub use transform::PlacementTransform;

use glam::Vec3;

/// Map a plan point (centimeters, y pointing "down" the plan) to world space.
///
/// World space is Y-up; plan y becomes world z.
pub fn plan_to_world(point: [f32; 2], elevation: f32) -> Vec3 {
    Vec3::new(point[0], elevation, point[1])
}

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub min: [f32; 3],
    pub max: [f32; 3],
}

impl BoundingBox {
    pub fn new(min: [f32; 3], max: [f32; 3]) -> Self {
        Self { min, max }
    }

    /// Unit box centered on x/z with its bottom at y=0.
    pub fn unit() -> Self {
        Self::new([-0.5, 0.0, -0.5], [0.5, 1.0, 0.5])
    }

    pub fn from_points(points: impl Iterator<Item = [f32; 3]>) -> Option<Self> {
        let mut min = [f32::MAX; 3];
        let mut max = [f32::MIN; 3];
        let mut has_points = false;

        for p in points {
            has_points = true;
            for i in 0..3 {
                min[i] = min[i].min(p[i]);
                max[i] = max[i].max(p[i]);
            }
        }

        if has_points {
            Some(Self { min, max })
        } else {
            None
        }
    }

    pub fn dimensions(&self) -> [f32; 3] {
        [
            self.max[0] - self.min[0],
            self.max[1] - self.min[1],
            self.max[2] - self.min[2],
        ]
    }

    /// The eight corners, bottom ring first, counter-clockwise seen from above.
    pub fn corners(&self) -> [Vec3; 8] {
        let [x0, y0, z0] = self.min;
        let [x1, y1, z1] = self.max;
        [
            Vec3::new(x0, y0, z0),
            Vec3::new(x0, y0, z1),
            Vec3::new(x1, y0, z1),
            Vec3::new(x1, y0, z0),
            Vec3::new(x0, y1, z0),
            Vec3::new(x0, y1, z1),
            Vec3::new(x1, y1, z1),
            Vec3::new(x1, y1, z0),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bounding_box_from_points() {
        let bb = BoundingBox::from_points(
            [[1.0, 2.0, 3.0], [-1.0, 5.0, 0.0]].into_iter(),
        )
        .unwrap();
        assert_eq!(bb.min, [-1.0, 2.0, 0.0]);
        assert_eq!(bb.dimensions(), [2.0, 3.0, 3.0]);
        assert!(BoundingBox::from_points(std::iter::empty()).is_none());
    }

    #[test]
    fn test_plan_to_world() {
        assert_eq!(plan_to_world([10.0, 20.0], 5.0), Vec3::new(10.0, 5.0, 20.0));
    }
}
