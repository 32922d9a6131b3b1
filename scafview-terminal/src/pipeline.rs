//! One rendering run: load, assemble, display, copy out
use std::io::Write;
use std::path::PathBuf;
use std::time::Instant;

use log::{debug, info};
use scafview_core::{
    BoundingCube, ExtraTransform, ProjectionMode, Scene, SceneDocument, SceneOptions, ViewAngles,
    ViewOverrides,
};

use crate::error::Result;
use crate::TerminalApp;

/// Settings for a run, usually built from [`crate::cli::Args`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RenderOptions {
    pub input: PathBuf,
    /// Where to copy the input document after display
    pub output: Option<PathBuf>,
    pub scene: SceneOptions,
    pub extra: ExtraTransform,
    pub projection: ProjectionMode,
    pub overrides: ViewOverrides,
    /// Report elapsed load and assembly time
    pub performance: bool,
}

/// Everything a viewer needs to show one scene
#[derive(Debug)]
pub struct Display<'a> {
    pub title: String,
    pub scene: &'a Scene,
    pub cube: BoundingCube,
    pub projection: ProjectionMode,
    pub view: ViewAngles,
}

/// Shows an assembled scene, blocking until the user is done with it
pub trait Viewer {
    fn show(&mut self, display: &Display<'_>) -> Result<()>;
}

/// Interactive crossterm viewer
#[derive(Debug, Default)]
pub struct TerminalViewer;

impl Viewer for TerminalViewer {
    fn show(&mut self, display: &Display<'_>) -> Result<()> {
        debug!("opening terminal viewer");
        TerminalApp::new(display)?.run()?;
        debug!("terminal viewer closed");
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// No part survived validation and filtering; nothing was shown
    NothingRendered,
    Displayed { rendered: usize, skipped: usize },
}

/// Run the whole pipeline once, writing the result lines to `out`
///
/// A missing or malformed input document is an error. Malformed part
/// records are logged and skipped inside [`Scene::assemble`].
pub fn run<V, W>(options: &RenderOptions, viewer: &mut V, out: &mut W) -> Result<Outcome>
where
    V: Viewer + ?Sized,
    W: Write + ?Sized,
{
    let start = options.performance.then(Instant::now);

    info!("Loading data from {}...", options.input.display());
    let document = SceneDocument::load(&options.input)?;

    let extra = options.extra.matrix();
    let scene = Scene::assemble(document.parts(), &extra, &options.scene);

    let Some(cube) = scene.bounding_cube() else {
        writeln!(out, "No parts rendered.")?;
        return Ok(Outcome::NothingRendered);
    };
    debug!(
        "bounding cube centre ({:.3}, {:.3}, {:.3}), half-extent {:.3}",
        cube.center.x, cube.center.y, cube.center.z, cube.half_extent
    );

    let display = Display {
        title: format!("Render: {}", options.input.display()),
        scene: &scene,
        cube,
        projection: options.projection,
        view: options.overrides.resolve(ViewAngles::DEFAULT),
    };

    writeln!(out, "Rendered parts: {}", scene.rendered_count())?;
    if let Some(start) = start {
        writeln!(out, "Time: {:.6} sec", start.elapsed().as_secs_f64())?;
    }

    out.flush()?;
    viewer.show(&display)?;

    if let Some(output) = &options.output {
        document.write_pretty(output)?;
        writeln!(out, "Output saved to {}", output.display())?;
    }

    Ok(Outcome::Displayed {
        rendered: scene.rendered_count(),
        skipped: scene.skipped().len(),
    })
}
