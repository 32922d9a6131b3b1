//! Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3, Vector4};

use crate::scene::BoundingCube;

/// Half-height of the view at the target, relative to the cube's
/// half-extent. Keeps every corner in frame from any direction, including
/// corners pulled outward by perspective.
const FRAME_MARGIN: f64 = 2.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ProjectionMode {
    Orthographic,
    #[default]
    Perspective,
}

impl ProjectionMode {
    pub fn toggled(self) -> Self {
        match self {
            Self::Orthographic => Self::Perspective,
            Self::Perspective => Self::Orthographic,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Orthographic => "ortho",
            Self::Perspective => "persp",
        }
    }
}

/// Camera orientation around the scene centre, in degrees
///
/// Elevation is measured up from the XY plane, azimuth counter-clockwise
/// from +X.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewAngles {
    pub elevation: f64,
    pub azimuth: f64,
}

impl ViewAngles {
    pub const DEFAULT: ViewAngles = ViewAngles::new(30.0, -60.0);
    pub const ALONG_X: ViewAngles = ViewAngles::new(0.0, 0.0);
    pub const ALONG_Y: ViewAngles = ViewAngles::new(0.0, 90.0);
    pub const ALONG_Z: ViewAngles = ViewAngles::new(90.0, 0.0);

    pub const fn new(elevation: f64, azimuth: f64) -> Self {
        Self {
            elevation,
            azimuth,
        }
    }

    /// Orbit by delta amounts. Elevation stops at the poles, azimuth wraps
    /// into (-180, 180].
    pub fn rotate(&mut self, d_elevation: f64, d_azimuth: f64) {
        self.elevation = (self.elevation + d_elevation).clamp(-90.0, 90.0);
        let mut azimuth = (self.azimuth + d_azimuth) % 360.0;
        if azimuth > 180.0 {
            azimuth -= 360.0;
        } else if azimuth <= -180.0 {
            azimuth += 360.0;
        }
        self.azimuth = azimuth;
    }

    /// Unit vector from the target towards the eye
    pub fn eye_direction(&self) -> Vector3<f64> {
        let (se, ce) = self.elevation.to_radians().sin_cos();
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        Vector3::new(ce * ca, ce * sa, se)
    }

    /// Screen-up vector, perpendicular to the eye direction even when
    /// looking straight down an axis
    pub fn up(&self) -> Vector3<f64> {
        let (se, ce) = self.elevation.to_radians().sin_cos();
        let (sa, ca) = self.azimuth.to_radians().sin_cos();
        Vector3::new(-se * ca, -se * sa, ce)
    }
}

impl Default for ViewAngles {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Fixed camera angles requested on the command line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ViewOverrides {
    pub along_x: bool,
    pub along_y: bool,
    pub along_z: bool,
}

impl ViewOverrides {
    /// Apply the overrides in X, Y, Z order; the last one set wins
    pub fn resolve(&self, base: ViewAngles) -> ViewAngles {
        let mut view = base;
        if self.along_x {
            view = ViewAngles::ALONG_X;
        }
        if self.along_y {
            view = ViewAngles::ALONG_Y;
        }
        if self.along_z {
            view = ViewAngles::ALONG_Z;
        }
        view
    }
}

/// Camera configuration for 3D rendering
///
/// The camera orbits `target` at a distance derived from the scene size, so
/// the whole bounding cube stays in frame at zoom 1.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub target: Point3<f64>,
    pub angles: ViewAngles,
    /// Half-extent of the framed region
    pub radius: f64,
    pub zoom: f64,
    pub fov: f64,
    pub aspect: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            target: Point3::origin(),
            angles: ViewAngles::DEFAULT,
            radius: 1.0,
            zoom: 1.0,
            fov: std::f64::consts::PI / 4.0, // 45 degrees
            aspect: aspect_ratio(width, height),
            mode: ProjectionMode::Perspective,
        }
    }

    /// Aim at a bounding cube
    pub fn framing(mut self, cube: &BoundingCube) -> Self {
        self.target = cube.center;
        self.radius = if cube.half_extent > f64::EPSILON {
            cube.half_extent
        } else {
            1.0
        };
        self
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.aspect = aspect_ratio(width, height);
    }

    /// Multiply the zoom, keeping it within sane limits
    pub fn zoom_by(&mut self, factor: f64) {
        self.zoom = (self.zoom * factor).clamp(0.1, 20.0);
    }

    /// Half-height of the visible region at the target
    fn frame_half_height(&self) -> f64 {
        FRAME_MARGIN * self.radius / self.zoom
    }

    fn distance(&self) -> f64 {
        let fit = FRAME_MARGIN * self.radius / (self.fov / 2.0).tan();
        match self.mode {
            // Perspective zoom moves the eye; orthographic zoom narrows the
            // frame and keeps the eye outside the scene.
            ProjectionMode::Perspective => fit / self.zoom,
            ProjectionMode::Orthographic => fit,
        }
    }

    pub fn position(&self) -> Point3<f64> {
        self.target + self.angles.eye_direction() * self.distance()
    }

    /// Unit vector the camera looks along
    pub fn forward(&self) -> Vector3<f64> {
        -self.angles.eye_direction()
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position(), &self.target, &self.angles.up())
    }

    fn clip_planes(&self) -> (f64, f64) {
        (self.radius * 0.01, self.distance() + self.radius * 4.0)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        let (near, far) = self.clip_planes();
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, near, far)
            }
            ProjectionMode::Orthographic => {
                let height = self.frame_half_height();
                let width = height * self.aspect;
                Matrix4::new_orthographic(-width, width, -height, height, near, far)
            }
        }
    }

    /// Project a world point to screen space. Returns `(x, y, depth)` with
    /// smaller depth nearer the eye, or `None` for points behind the eye.
    /// Points outside the screen are still returned; callers clip.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        width: u32,
        height: u32,
    ) -> Option<(f64, f64, f64)> {
        project(&self.view_projection(), point, width, height)
    }

    /// Combined view-projection matrix, for projecting many points at once
    pub fn view_projection(&self) -> Matrix4<f64> {
        self.projection_matrix() * self.view_matrix()
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(800, 600)
    }
}

/// Project through a precomputed view-projection matrix
pub fn project(
    mvp: &Matrix4<f64>,
    point: &Point3<f64>,
    width: u32,
    height: u32,
) -> Option<(f64, f64, f64)> {
    let clip = mvp * Vector4::new(point.x, point.y, point.z, 1.0);

    // Prevent division by near-zero depth values
    if clip.w < 1e-9 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let depth = clip.z / clip.w;

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f64;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f64;

    Some((screen_x, screen_y, depth))
}

fn aspect_ratio(width: u32, height: u32) -> f64 {
    width.max(1) as f64 / height.max(1) as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_cube() -> BoundingCube {
        BoundingCube {
            center: Point3::new(1.0, 2.0, 3.0),
            half_extent: 2.0,
        }
    }

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(800, 600);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_eq!(camera.angles, ViewAngles::DEFAULT);
        assert!((camera.aspect - 800.0 / 600.0).abs() < 1e-12);
    }

    #[test]
    fn test_target_projects_to_center() {
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(80, 40).framing(&unit_cube());
            camera.mode = mode;
            let (x, y, _) = camera.project_to_screen(&camera.target, 80, 40).unwrap();
            assert!((x - 40.0).abs() < 1e-9, "{mode:?}");
            assert!((y - 20.0).abs() < 1e-9, "{mode:?}");
        }
    }

    #[test]
    fn test_cube_stays_in_frame() {
        let cube = unit_cube();
        for mode in [ProjectionMode::Perspective, ProjectionMode::Orthographic] {
            let mut camera = Camera::new(100, 100).framing(&cube);
            camera.mode = mode;
            for corner in cube.corners() {
                let (x, y, _) = camera.project_to_screen(&corner, 100, 100).unwrap();
                assert!((0.0..=100.0).contains(&x), "{mode:?} x={x}");
                assert!((0.0..=100.0).contains(&y), "{mode:?} y={y}");
            }
        }
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let mut camera = Camera::default().framing(&unit_cube());
        camera.angles = ViewAngles::ALONG_X;
        let near = Point3::new(2.0, 2.0, 3.0);
        let far = Point3::new(0.0, 2.0, 3.0);
        let (_, _, dn) = camera.project_to_screen(&near, 800, 600).unwrap();
        let (_, _, df) = camera.project_to_screen(&far, 800, 600).unwrap();
        assert!(dn < df);
    }

    #[test]
    fn test_top_down_view_is_well_defined() {
        let angles = ViewAngles::ALONG_Z;
        assert!(angles.eye_direction().dot(&angles.up()).abs() < 1e-12);
        assert!((angles.up().norm() - 1.0).abs() < 1e-12);
        let mut camera = Camera::default().framing(&unit_cube());
        camera.angles = angles;
        assert!(camera.view_matrix().iter().all(|v| v.is_finite()));
    }

    #[test]
    fn test_overrides_last_wins() {
        let base = ViewAngles::DEFAULT;
        assert_eq!(ViewOverrides::default().resolve(base), base);
        let x_and_y = ViewOverrides {
            along_x: true,
            along_y: true,
            along_z: false,
        };
        assert_eq!(x_and_y.resolve(base), ViewAngles::ALONG_Y);
        let all = ViewOverrides {
            along_x: true,
            along_y: true,
            along_z: true,
        };
        assert_eq!(all.resolve(base), ViewAngles::ALONG_Z);
    }

    #[test]
    fn test_orbit_wraps_and_clamps() {
        let mut angles = ViewAngles::new(85.0, 175.0);
        angles.rotate(10.0, 10.0);
        assert_eq!(angles.elevation, 90.0);
        assert!((angles.azimuth + 175.0).abs() < 1e-12);
        assert_eq!(ProjectionMode::Perspective.toggled(), ProjectionMode::Orthographic);
    }
}
