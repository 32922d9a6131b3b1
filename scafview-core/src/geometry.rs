//! Cuboid parts and their world-space geometry
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use serde_json::Value;

use crate::document::PartRecord;
use crate::error::PartError;

/// Number of corners of a cuboid
pub const CUBOID_VERTEX_COUNT: usize = 8;

/// Corner index groups: bottom, top, then the four sides
pub const CUBOID_FACES: [[usize; 4]; 6] = [
    [0, 1, 2, 3],
    [4, 5, 6, 7],
    [0, 1, 5, 4],
    [1, 2, 6, 5],
    [2, 3, 7, 6],
    [3, 0, 4, 7],
];

/// Corner signs relative to the half extents. Bottom ring first, then the
/// top ring in the same order.
const CORNER_SIGNS: [[f64; 3]; CUBOID_VERTEX_COUNT] = [
    [-1.0, -1.0, -1.0],
    [1.0, -1.0, -1.0],
    [1.0, 1.0, -1.0],
    [-1.0, 1.0, -1.0],
    [-1.0, -1.0, 1.0],
    [1.0, -1.0, 1.0],
    [1.0, 1.0, 1.0],
    [-1.0, 1.0, 1.0],
];

/// Cuboid size along the part's local X, Y and Z axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Dimensions {
    pub width: f64,
    pub depth: f64,
    pub height: f64,
}

impl Dimensions {
    pub fn new(width: f64, depth: f64, height: f64) -> Self {
        Self {
            width,
            depth,
            height,
        }
    }

    fn half_extents(&self) -> Vector3<f64> {
        Vector3::new(self.width, self.depth, self.height) / 2.0
    }
}

impl Default for Dimensions {
    fn default() -> Self {
        Self::new(1.0, 1.0, 1.0)
    }
}

/// One quadrilateral side of a part
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Face {
    pub corners: [Point3<f64>; 4],
}

impl Face {
    /// Unit normal from the cross product of the diagonals, `None` when the
    /// face has collapsed to a line or a point
    pub fn normal(&self) -> Option<Vector3<f64>> {
        let [a, b, c, d] = self.corners;
        let n = (c - a).cross(&(d - b));
        let len = n.norm();
        (len > 1e-12).then(|| n / len)
    }
}

/// A single cuboid placed in world space
///
/// Vertices are computed once at construction and never change.
#[derive(Debug, Clone)]
pub struct Part {
    name: String,
    dimensions: Dimensions,
    vertices: [Point3<f64>; CUBOID_VERTEX_COUNT],
}

impl Part {
    /// Place a cuboid using its local matrix followed by the scene-wide
    /// extra matrix (`combined = local * extra`)
    pub fn new(
        name: impl Into<String>,
        dimensions: Dimensions,
        local: &Matrix4<f64>,
        extra: &Matrix4<f64>,
    ) -> Self {
        let combined = local * extra;
        Self {
            name: name.into(),
            dimensions,
            vertices: world_vertices(&dimensions, &combined),
        }
    }

    pub fn from_record(record: &PartRecord, extra: &Matrix4<f64>) -> Self {
        Self::new(record.name.clone(), record.dimensions, &record.ecs, extra)
    }

    /// Validate the `index`-th JSON record and build the part from it
    pub fn from_json(index: usize, value: &Value, extra: &Matrix4<f64>) -> Result<Self, PartError> {
        let record = PartRecord::from_value(index, value)?;
        Ok(Self::from_record(&record, extra))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn dimensions(&self) -> Dimensions {
        self.dimensions
    }

    pub fn vertices(&self) -> &[Point3<f64>; CUBOID_VERTEX_COUNT] {
        &self.vertices
    }

    pub fn faces(&self) -> [Face; 6] {
        CUBOID_FACES.map(|[a, b, c, d]| Face {
            corners: [
                self.vertices[a],
                self.vertices[b],
                self.vertices[c],
                self.vertices[d],
            ],
        })
    }
}

fn world_vertices(
    dimensions: &Dimensions,
    combined: &Matrix4<f64>,
) -> [Point3<f64>; CUBOID_VERTEX_COUNT] {
    let half = dimensions.half_extents();
    CORNER_SIGNS.map(|[sx, sy, sz]| {
        let local = Vector4::new(sx * half.x, sy * half.y, sz * half.z, 1.0);
        let world = combined * local;
        Point3::new(world.x, world.y, world.z)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transform::{ExtraTransform, Transform};
    use proptest::prelude::*;
    use serde_json::json;

    fn identity() -> Matrix4<f64> {
        Matrix4::identity()
    }

    #[test]
    fn test_unit_part_corners() {
        let part = Part::new("A", Dimensions::default(), &identity(), &identity());
        assert_eq!(part.dimensions(), Dimensions::default());
        let v = part.vertices();
        assert_eq!(v[0], Point3::new(-0.5, -0.5, -0.5));
        assert_eq!(v[2], Point3::new(0.5, 0.5, -0.5));
        assert_eq!(v[6], Point3::new(0.5, 0.5, 0.5));
        // top ring sits directly above the bottom ring
        for i in 0..4 {
            assert_eq!(v[i].x, v[i + 4].x);
            assert_eq!(v[i].y, v[i + 4].y);
            assert!(v[i + 4].z > v[i].z);
        }
    }

    #[test]
    fn test_extra_acts_inside_local_frame() {
        let local = Transform::translation(10.0, 0.0, 0.0);
        let extra = ExtraTransform::new(Some(90.0), 0.0, 0.0, 0.0).matrix();
        let part = Part::new("A", Dimensions::new(2.0, 2.0, 2.0), &local, &extra);
        // corner (-1,-1,-1) is rotated by the extra matrix, then moved by local
        let v0 = part.vertices()[0];
        assert!((v0 - Point3::new(11.0, -1.0, -1.0)).norm() < 1e-12);
    }

    #[test]
    fn test_zero_extra_matches_local_only() {
        let local = Transform::translation(1.0, 2.0, 3.0) * Transform::rotation_z(30.0);
        let dims = Dimensions::new(3.0, 2.0, 1.0);
        let bare = Part::new("A", dims, &local, &identity());
        let extra = ExtraTransform::new(None, 0.0, 0.0, 0.0).matrix();
        let composed = Part::new("A", dims, &local, &extra);
        assert_eq!(bare.vertices(), composed.vertices());
    }

    #[test]
    fn test_ecs_box_is_column_major() {
        // translation lives in elements 12..15 of the flat array
        let record = json!({
            "name": "Moved",
            "ecsBox": [1, 0, 0, 0, 0, 1, 0, 0, 0, 0, 1, 0, 5, 6, 7, 1]
        });
        let part = Part::from_json(0, &record, &identity()).unwrap();
        let center = part
            .vertices()
            .iter()
            .fold(Vector3::zeros(), |acc, p| acc + p.coords)
            / 8.0;
        assert!((center - Vector3::new(5.0, 6.0, 7.0)).norm() < 1e-12);
    }

    #[test]
    fn test_faces_follow_index_groups() {
        let part = Part::new("A", Dimensions::default(), &identity(), &identity());
        let faces = part.faces();
        let v = part.vertices();
        assert_eq!(faces[0].corners, [v[0], v[1], v[2], v[3]]);
        assert_eq!(faces[1].corners, [v[4], v[5], v[6], v[7]]);
        assert_eq!(faces[5].corners, [v[3], v[0], v[4], v[7]]);
        let bottom = faces[0].normal().unwrap();
        assert!((bottom.z.abs() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_flat_face_has_no_normal() {
        let part = Part::new("Flat", Dimensions::new(1.0, 0.0, 0.0), &identity(), &identity());
        assert!(part.faces()[0].normal().is_none());
    }

    proptest! {
        #[test]
        fn prop_identity_part_is_centered_box(
            w in 0.001f64..1000.0,
            d in 0.001f64..1000.0,
            h in 0.001f64..1000.0,
        ) {
            let part = Part::new("P", Dimensions::new(w, d, h), &identity(), &identity());
            for (vertex, signs) in part.vertices().iter().zip(CORNER_SIGNS.iter()) {
                prop_assert_eq!(vertex.x, signs[0] * w / 2.0);
                prop_assert_eq!(vertex.y, signs[1] * d / 2.0);
                prop_assert_eq!(vertex.z, signs[2] * h / 2.0);
            }
        }
    }
}
