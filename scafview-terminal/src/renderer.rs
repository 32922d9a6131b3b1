//! ASCII rasterizer for terminal rendering
use crossterm::{
    cursor::MoveTo,
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::{Matrix4, Point3, Vector3};
use scafview_core::projection::project;
use scafview_core::{BoundingCube, Camera, Part, PartStyle, Rgb, Scene};
use std::io::Write;

/// Face fill glyphs, faint to dense
const FILL_RAMP: &[char] = &['.', ':', '-', '=', '*', '%'];

const LIGHT_EDGE: char = '+';
const HEAVY_EDGE: char = '#';
const BOX_EDGE: char = '.';

/// Outline width from which the heavy glyph is used
const HEAVY_LINE_WIDTH: f64 = 2.0;

/// Outlines win depth ties against the faces they bound
const EDGE_DEPTH_BIAS: f64 = 1e-4;

/// Backdrop depth: behind every projected point, but still drawable
const BACKDROP_DEPTH: f64 = f64::MAX;

/// Cube edges as corner index pairs
const BOX_EDGES: [(usize, usize); 12] = [
    (0, 1),
    (1, 2),
    (2, 3),
    (3, 0),
    (4, 5),
    (5, 6),
    (6, 7),
    (7, 4),
    (0, 4),
    (1, 5),
    (2, 6),
    (3, 7),
];

/// Axis labels and the cube edge each one sits on
const AXIS_LABELS: [(&str, (usize, usize)); 3] = [("X", (0, 1)), ("Y", (1, 2)), ("Z", (0, 4))];

type ScreenPoint = (f64, f64, f64);

#[derive(Debug, Clone, Copy, PartialEq)]
struct Cell {
    glyph: char,
    color: Color,
}

const BLANK: Cell = Cell {
    glyph: ' ',
    color: Color::Reset,
};

/// ASCII renderer that converts part faces to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    cells: Vec<Cell>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            cells: vec![BLANK; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.cells.fill(BLANK);
    }

    /// Glyph at a cell, `None` outside the buffer
    pub fn glyph_at(&self, x: usize, y: usize) -> Option<char> {
        (x < self.width && y < self.height).then(|| self.cells[y * self.width + x].glyph)
    }

    pub fn render_scene(&mut self, scene: &Scene, camera: &Camera) {
        let mvp = camera.view_projection();
        let view_dir = camera.forward();
        for rendered in scene.parts() {
            self.render_part(&rendered.part, &rendered.style, &mvp, &view_dir);
        }
    }

    fn render_part(
        &mut self,
        part: &Part,
        style: &PartStyle,
        mvp: &Matrix4<f64>,
        view_dir: &Vector3<f64>,
    ) {
        let face_color = terminal_color(style.face);
        let edge = Cell {
            glyph: if style.line_width >= HEAVY_LINE_WIDTH {
                HEAVY_EDGE
            } else {
                LIGHT_EDGE
            },
            color: terminal_color(style.edge),
        };

        for face in part.faces() {
            let Some(screen) = self.project_all(&face.corners, mvp) else {
                continue; // a corner is behind the eye
            };
            let fill = Cell {
                glyph: fill_glyph(face.normal(), view_dir, style.alpha),
                color: face_color,
            };
            self.rasterize_triangle([screen[0], screen[1], screen[2]], fill);
            self.rasterize_triangle([screen[0], screen[2], screen[3]], fill);
            for i in 0..4 {
                self.draw_line(screen[i], screen[(i + 1) % 4], edge, EDGE_DEPTH_BIAS);
            }
        }
    }

    /// Draw the bounding cube as a wireframe behind all geometry
    pub fn render_bounds(&mut self, cube: &BoundingCube, camera: &Camera) {
        let mvp = camera.view_projection();
        let Some(corners) = self.project_all(&cube.corners(), &mvp) else {
            return;
        };
        let cell = Cell {
            glyph: BOX_EDGE,
            color: Color::DarkGrey,
        };
        for (a, b) in BOX_EDGES {
            let (from, to) = (corners[a], corners[b]);
            self.draw_line(
                (from.0, from.1, BACKDROP_DEPTH),
                (to.0, to.1, BACKDROP_DEPTH),
                cell,
                0.0,
            );
        }
    }

    /// Put the axis letters on top of everything else
    pub fn render_axis_labels(&mut self, cube: &BoundingCube, camera: &Camera) {
        let mvp = camera.view_projection();
        let corners = cube.corners();
        for (label, (a, b)) in AXIS_LABELS {
            let mid = Point3::from((corners[a].coords + corners[b].coords) / 2.0);
            if let Some((x, y, _)) = project(&mvp, &mid, self.width as u32, self.height as u32) {
                self.put_text(x, y, label, Color::Yellow);
            }
        }
    }

    fn project_all<const N: usize>(
        &self,
        points: &[Point3<f64>; N],
        mvp: &Matrix4<f64>,
    ) -> Option<[ScreenPoint; N]> {
        let mut out = [(0.0, 0.0, 0.0); N];
        for (slot, point) in out.iter_mut().zip(points) {
            *slot = project(mvp, point, self.width as u32, self.height as u32)?;
        }
        Some(out)
    }

    fn plot(&mut self, x: i64, y: i64, depth: f64, cell: Cell) {
        if x < 0 || y < 0 || x >= self.width as i64 || y >= self.height as i64 {
            return;
        }
        let idx = y as usize * self.width + x as usize;
        if depth < self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.cells[idx] = cell;
        }
    }

    fn put_text(&mut self, x: f64, y: f64, text: &str, color: Color) {
        let (x, y) = (x.floor() as i64, y.floor() as i64);
        for (i, glyph) in text.chars().enumerate() {
            self.plot(x + i as i64, y, f64::NEG_INFINITY, Cell { glyph, color });
        }
    }

    fn rasterize_triangle(&mut self, coords: [ScreenPoint; 3], cell: Cell) {
        let [v0, v1, v2] = coords;

        // Bounding box, clipped to screen bounds
        let min_x = v0.0.min(v1.0).min(v2.0).floor().max(0.0) as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil().min(self.width as f64 - 1.0) as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor().max(0.0) as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil().min(self.height as f64 - 1.0) as i64;

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                        self.plot(x, y, depth, cell);
                    }
                }
            }
        }
    }

    fn draw_line(&mut self, from: ScreenPoint, to: ScreenPoint, cell: Cell, bias: f64) {
        let Some((t0, t1)) = clip_span(
            (from.0, from.1),
            (to.0, to.1),
            self.width as f64,
            self.height as f64,
        ) else {
            return;
        };
        let at = |t: f64| {
            (
                from.0 + (to.0 - from.0) * t,
                from.1 + (to.1 - from.1) * t,
                from.2 + (to.2 - from.2) * t,
            )
        };
        let (a, b) = (at(t0), at(t1));
        let steps = (b.0 - a.0).abs().max((b.1 - a.1).abs()).ceil().max(1.0) as usize;
        for i in 0..=steps {
            let t = t0 + (t1 - t0) * i as f64 / steps as f64;
            let (x, y, depth) = at(t);
            self.plot(x.floor() as i64, y.floor() as i64, depth - bias, cell);
        }
    }

    /// Write the buffer starting at terminal row `top`
    pub fn draw<W: Write>(&self, writer: &mut W, top: u16) -> std::io::Result<()> {
        let mut current = None;
        for y in 0..self.height {
            writer.queue(MoveTo(0, top + y as u16))?;
            for x in 0..self.width {
                let cell = self.cells[y * self.width + x];
                if current != Some(cell.color) {
                    writer.queue(SetForegroundColor(cell.color))?;
                    current = Some(cell.color);
                }
                writer.queue(Print(cell.glyph))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map a style colour to the terminal. Very dark colours are lifted to grey
/// so black outlines stay visible on dark backgrounds.
fn terminal_color(rgb: Rgb) -> Color {
    if rgb.luma() < 48.0 {
        Color::Grey
    } else {
        Color::Rgb {
            r: rgb.r,
            g: rgb.g,
            b: rgb.b,
        }
    }
}

/// Denser glyphs for faces turned towards the viewer and for more opaque
/// styles. Collapsed faces get the faintest glyph.
fn fill_glyph(normal: Option<Vector3<f64>>, view_dir: &Vector3<f64>, alpha: f64) -> char {
    let facing = normal.map_or(0.0, |n| n.dot(view_dir).abs());
    let density = (0.3 + 0.7 * facing) * (alpha * 2.0).clamp(0.0, 1.0);
    let index = (density * (FILL_RAMP.len() - 1) as f64).round() as usize;
    FILL_RAMP[index.min(FILL_RAMP.len() - 1)]
}

/// Parameter range `[t0, t1]` of the segment `a -> b` inside the
/// `width x height` screen rectangle
fn clip_span(a: (f64, f64), b: (f64, f64), width: f64, height: f64) -> Option<(f64, f64)> {
    let (dx, dy) = (b.0 - a.0, b.1 - a.1);
    let (mut t0, mut t1) = (0.0_f64, 1.0_f64);
    for (p, q) in [(-dx, a.0), (dx, width - a.0), (-dy, a.1), (dy, height - a.1)] {
        if p == 0.0 {
            if q < 0.0 {
                return None;
            }
            continue;
        }
        let r = q / p;
        if p < 0.0 {
            t0 = t0.max(r);
        } else {
            t1 = t1.min(r);
        }
        if t0 > t1 {
            return None;
        }
    }
    Some((t0, t1))
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
