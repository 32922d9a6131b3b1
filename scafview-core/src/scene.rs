//! Scene assembly: parts, filters, styles and the bounding cube
use log::{debug, warn};
use nalgebra::{Matrix4, Point3, Vector3};
use serde_json::Value;

use crate::error::PartError;
use crate::geometry::Part;

/// Name fragment that marks scaffolding parts
pub const SCAFFOLDING_MARKER: &str = "ScaffoldingBox";

/// 8-bit RGB colour
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const RED: Rgb = Rgb::new(255, 0, 0);
    pub const DARK_RED: Rgb = Rgb::new(139, 0, 0);
    pub const SKY_BLUE: Rgb = Rgb::new(135, 206, 235);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Perceived brightness in 0..=255
    pub fn luma(&self) -> f64 {
        0.299 * self.r as f64 + 0.587 * self.g as f64 + 0.114 * self.b as f64
    }
}

/// How a part's faces are drawn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PartStyle {
    pub face: Rgb,
    pub edge: Rgb,
    pub line_width: f64,
    /// Face opacity in 0..=1
    pub alpha: f64,
}

impl PartStyle {
    pub const HIGHLIGHT: PartStyle = PartStyle {
        face: Rgb::RED,
        edge: Rgb::RED,
        line_width: 2.0,
        alpha: 0.45,
    };

    pub const SCAFFOLDING: PartStyle = PartStyle {
        face: Rgb::SKY_BLUE,
        edge: Rgb::BLACK,
        line_width: 0.5,
        alpha: 0.25,
    };

    pub const GENERIC: PartStyle = PartStyle {
        face: Rgb::DARK_RED,
        edge: Rgb::BLACK,
        line_width: 0.5,
        alpha: 0.25,
    };
}

/// Filtering and highlighting applied while assembling
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneOptions {
    /// Keep only parts whose name contains [`SCAFFOLDING_MARKER`]
    pub scaffolding_only: bool,
    /// Substring that selects the highlight style
    pub highlight: Option<String>,
}

impl SceneOptions {
    pub fn accepts(&self, name: &str) -> bool {
        !self.scaffolding_only || name.contains(SCAFFOLDING_MARKER)
    }

    pub fn style_for(&self, name: &str) -> PartStyle {
        let highlighted = self
            .highlight
            .as_deref()
            .is_some_and(|needle| !needle.is_empty() && name.contains(needle));
        if highlighted {
            PartStyle::HIGHLIGHT
        } else if name.contains(SCAFFOLDING_MARKER) {
            PartStyle::SCAFFOLDING
        } else {
            PartStyle::GENERIC
        }
    }
}

/// A part accepted into the scene together with its style
#[derive(Debug, Clone)]
pub struct RenderedPart {
    pub part: Part,
    pub style: PartStyle,
}

/// Cube sharing one half-extent on all three axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingCube {
    pub center: Point3<f64>,
    pub half_extent: f64,
}

impl BoundingCube {
    /// Centre is the mean of the points; the half-extent is half of the
    /// widest axis span. `None` for an empty slice.
    pub fn from_points(points: &[Point3<f64>]) -> Option<Self> {
        let first = points.first()?;
        let mut min = first.coords;
        let mut max = first.coords;
        let mut sum = Vector3::zeros();
        for p in points {
            min = min.inf(&p.coords);
            max = max.sup(&p.coords);
            sum += p.coords;
        }
        let span = max - min;
        Some(Self {
            center: Point3::from(sum / points.len() as f64),
            half_extent: span.max() / 2.0,
        })
    }

    /// `(lower, upper)` display limits on one axis (0 = X, 1 = Y, 2 = Z)
    pub fn limits(&self, axis: usize) -> (f64, f64) {
        let c = self.center[axis];
        (c - self.half_extent, c + self.half_extent)
    }

    /// Cube corners in the same order as a part's vertices
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let h = self.half_extent;
        [
            [-h, -h, -h],
            [h, -h, -h],
            [h, h, -h],
            [-h, h, -h],
            [-h, -h, h],
            [h, -h, h],
            [h, h, h],
            [-h, h, h],
        ]
        .map(|[x, y, z]| self.center + Vector3::new(x, y, z))
    }
}

/// The parts that made it through validation and filtering
#[derive(Debug, Clone, Default)]
pub struct Scene {
    parts: Vec<RenderedPart>,
    vertex_pool: Vec<Point3<f64>>,
    skipped: Vec<PartError>,
}

impl Scene {
    /// Build parts from raw records in input order. Invalid records are
    /// logged and skipped; they never stop the loop.
    pub fn assemble(records: &[Value], extra: &Matrix4<f64>, options: &SceneOptions) -> Self {
        let mut scene = Self::default();
        for (index, value) in records.iter().enumerate() {
            match Part::from_json(index, value, extra) {
                Ok(part) => scene.push(part, options),
                Err(err) => {
                    warn!("{err} → skipped");
                    scene.skipped.push(err);
                }
            }
        }
        debug!(
            "assembled {} parts, {} skipped",
            scene.rendered_count(),
            scene.skipped.len()
        );
        scene
    }

    fn push(&mut self, part: Part, options: &SceneOptions) {
        if !options.accepts(part.name()) {
            return;
        }
        self.vertex_pool.extend_from_slice(part.vertices());
        let style = options.style_for(part.name());
        self.parts.push(RenderedPart { part, style });
    }

    pub fn parts(&self) -> &[RenderedPart] {
        &self.parts
    }

    pub fn rendered_count(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Records rejected during assembly
    pub fn skipped(&self) -> &[PartError] {
        &self.skipped
    }

    /// Every vertex of every rendered part
    pub fn vertices(&self) -> &[Point3<f64>] {
        &self.vertex_pool
    }

    pub fn bounding_cube(&self) -> Option<BoundingCube> {
        BoundingCube::from_points(&self.vertex_pool)
    }
}
