//! Terminal viewer and command line pipeline for scafview
use crossterm::{
    cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute, queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
    terminal::{self, ClearType},
};
use log::debug;
use scafview_core::{Camera, ViewAngles};
use std::io::{self, stdout, Write};

pub mod cli;
pub mod error;
pub mod pipeline;
pub mod renderer;

pub use error::{Error, Result};
pub use pipeline::{run, Display, Outcome, RenderOptions, TerminalViewer, Viewer};
pub use renderer::AsciiRenderer;

/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: u32 = 2;

/// Rows above the scene reserved for the status line
const STATUS_ROWS: u16 = 1;

/// Orbit step in degrees
const ORBIT_STEP: f64 = 5.0;

const ZOOM_STEP: f64 = 1.25;

/// Raw mode and the alternate screen, undone on drop so that errors and
/// panics in the viewer still hand back a usable terminal
struct ScreenGuard<W: Write> {
    out: W,
}

impl<W: Write> ScreenGuard<W> {
    fn enter(out: W) -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        let mut guard = Self { out };
        execute!(guard.out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(guard)
    }
}

impl<W: Write> Drop for ScreenGuard<W> {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
        let _ = execute!(self.out, terminal::LeaveAlternateScreen, cursor::Show);
    }
}

/// Interactive viewer for one assembled scene
pub struct TerminalApp<'a> {
    display: &'a Display<'a>,
    camera: Camera,
    renderer: AsciiRenderer,
    running: bool,
}

impl<'a> TerminalApp<'a> {
    pub fn new(display: &'a Display<'a>) -> io::Result<Self> {
        let (width, height) = terminal::size()?;
        Ok(Self::with_size(display, width, height))
    }

    /// Build the viewer for a terminal of `width` x `height` cells
    pub fn with_size(display: &'a Display<'a>, width: u16, height: u16) -> Self {
        let rows = height.saturating_sub(STATUS_ROWS);
        let mut camera = Camera::new(width as u32, rows as u32 * CELL_ASPECT).framing(&display.cube);
        camera.mode = display.projection;
        camera.angles = display.view;

        Self {
            display,
            camera,
            renderer: AsciiRenderer::new(width as usize, rows as usize),
            running: true,
        }
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Take over the terminal until the user quits
    pub fn run(&mut self) -> io::Result<()> {
        let _screen = ScreenGuard::enter(stdout())?;
        self.main_loop()
    }

    fn main_loop(&mut self) -> io::Result<()> {
        self.render()?;

        // Nothing animates, so block on input and redraw after each event
        while self.running {
            match event::read()? {
                Event::Key(key) => self.handle_key(key),
                Event::Resize(width, height) => self.resize(width, height),
                _ => continue,
            }
            if self.running {
                self.render()?;
            }
        }

        Ok(())
    }

    pub fn handle_key(&mut self, key: KeyEvent) {
        if key.kind == KeyEventKind::Release {
            return;
        }
        // Raw mode swallows SIGINT, so Ctrl+C quits like Q
        if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
            self.running = false;
            return;
        }
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.running = false;
            }
            KeyCode::Char('w') | KeyCode::Up => self.camera.angles.rotate(ORBIT_STEP, 0.0),
            KeyCode::Char('s') | KeyCode::Down => self.camera.angles.rotate(-ORBIT_STEP, 0.0),
            KeyCode::Char('a') | KeyCode::Left => self.camera.angles.rotate(0.0, -ORBIT_STEP),
            KeyCode::Char('d') | KeyCode::Right => self.camera.angles.rotate(0.0, ORBIT_STEP),
            KeyCode::Char('+') | KeyCode::Char('=') => self.camera.zoom_by(ZOOM_STEP),
            KeyCode::Char('-') => self.camera.zoom_by(1.0 / ZOOM_STEP),
            KeyCode::Char('o') => self.camera.mode = self.camera.mode.toggled(),
            KeyCode::Char('x') => self.camera.angles = ViewAngles::ALONG_X,
            KeyCode::Char('y') => self.camera.angles = ViewAngles::ALONG_Y,
            KeyCode::Char('z') => self.camera.angles = ViewAngles::ALONG_Z,
            KeyCode::Char('r') => {
                self.camera.angles = self.display.view;
                self.camera.mode = self.display.projection;
                self.camera.zoom = 1.0;
            }
            _ => {}
        }
    }

    pub fn resize(&mut self, width: u16, height: u16) {
        let rows = height.saturating_sub(STATUS_ROWS);
        debug!("viewer resized to {width}x{rows}");
        self.renderer.resize(width as usize, rows as usize);
        self.camera.set_viewport(width as u32, rows as u32 * CELL_ASPECT);
    }

    fn status_line(&self) -> String {
        let angles = self.camera.angles;
        let line = format!(
            "{} | Parts: {} | {} elev {:.0} azim {:.0} | Arrows/WASD=Orbit +/-=Zoom O=Projection X/Y/Z=Axis R=Reset Q=Quit",
            self.display.title,
            self.display.scene.rendered_count(),
            self.camera.mode.label(),
            angles.elevation,
            angles.azimuth,
        );
        line.chars().take(self.renderer.width()).collect()
    }

    fn render(&mut self) -> io::Result<()> {
        let cube = &self.display.cube;

        self.renderer.clear();
        self.renderer.render_bounds(cube, &self.camera);
        self.renderer.render_scene(self.display.scene, &self.camera);
        self.renderer.render_axis_labels(cube, &self.camera);

        // Output to terminal
        let mut stdout = stdout();
        self.renderer.draw(&mut stdout, STATUS_ROWS)?;

        // Draw UI overlay
        queue!(
            stdout,
            cursor::MoveTo(0, 0),
            terminal::Clear(ClearType::CurrentLine),
            SetForegroundColor(Color::Yellow),
            Print(self.status_line()),
            ResetColor
        )?;

        stdout.flush()?;
        Ok(())
    }
}
