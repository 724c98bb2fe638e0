//! Placement transform for furniture geometry.

use super::BoundingBox;
use glam::{Mat3, Mat4, Vec3};

/// Maps model-local geometry onto a furniture placement.
///
/// The model is centered on x/z with its bottom on y=0, scaled per axis to the
/// target size, turned about Y by the plan angle and moved to the placement.
#[derive(Debug, Clone, Copy)]
pub struct PlacementTransform {
    matrix: Mat4,
    rotation: Mat3,
}

impl PlacementTransform {
    /// Build the transform that fits `bounds` into a `size` = (width, height, depth)
    /// box at `position`, turned by `angle` radians clockwise on the plan.
    pub fn fit(bounds: &BoundingBox, size: [f32; 3], angle: f32, position: Vec3) -> Self {
        let dims = bounds.dimensions();
        let center = Vec3::new(
            (bounds.min[0] + bounds.max[0]) * 0.5,
            bounds.min[1],
            (bounds.min[2] + bounds.max[2]) * 0.5,
        );
        let scale = Vec3::new(
            axis_scale(size[0], dims[0]),
            axis_scale(size[1], dims[1]),
            axis_scale(size[2], dims[2]),
        );

        // Plan y maps to world z, so a clockwise plan turn is a negative Y rotation.
        let rotation = Mat3::from_rotation_y(-angle);
        let matrix = Mat4::from_translation(position)
            * Mat4::from_mat3(rotation)
            * Mat4::from_scale(scale)
            * Mat4::from_translation(-center);

        Self { matrix, rotation }
    }

    pub fn transform_point(&self, point: Vec3) -> Vec3 {
        self.matrix.transform_point3(point)
    }

    /// Rotate a normal; translation and scale do not apply.
    pub fn transform_normal(&self, normal: Vec3) -> Vec3 {
        self.rotation * normal
    }
}

fn axis_scale(target: f32, extent: f32) -> f32 {
    if extent.abs() > 1e-6 {
        target / extent
    } else {
        1.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: Vec3, b: Vec3) -> bool {
        (a - b).length() < 1e-3
    }

    #[test]
    fn test_fit_centers_and_scales() {
        let bounds = BoundingBox::new([10.0, 5.0, 10.0], [12.0, 6.0, 14.0]);
        let t = PlacementTransform::fit(&bounds, [100.0, 50.0, 200.0], 0.0, Vec3::new(300.0, 0.0, 400.0));

        assert!(approx(t.transform_point(Vec3::new(10.0, 5.0, 10.0)), Vec3::new(250.0, 0.0, 300.0)));
        assert!(approx(t.transform_point(Vec3::new(12.0, 6.0, 14.0)), Vec3::new(350.0, 50.0, 500.0)));
    }

    #[test]
    fn test_rotation_is_clockwise_on_plan() {
        let bounds = BoundingBox::new([-0.5, 0.0, -0.5], [0.5, 1.0, 0.5]);
        let t = PlacementTransform::fit(&bounds, [1.0, 1.0, 1.0], std::f32::consts::FRAC_PI_2, Vec3::ZERO);

        // Plan +x turns toward plan +y (world +z).
        assert!(approx(t.transform_point(Vec3::new(0.5, 0.0, 0.0)), Vec3::new(0.0, 0.0, 0.5)));
        assert!(approx(t.transform_normal(Vec3::X), Vec3::Z));
    }

    #[test]
    fn test_flat_axis_keeps_unit_scale() {
        let bounds = BoundingBox::new([0.0, 0.0, 0.0], [2.0, 0.0, 2.0]);
        let t = PlacementTransform::fit(&bounds, [4.0, 10.0, 4.0], 0.0, Vec3::ZERO);
        assert!(approx(t.transform_point(Vec3::new(2.0, 0.0, 2.0)), Vec3::new(2.0, 0.0, 2.0)));
    }
}
