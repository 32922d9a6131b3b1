//! scafview - render scaffolding part layouts in the terminal
//!
//! Usage:
//!   scafview -f parts.json [-H NAME] [-b] [-tx X -ty Y -tz Z] [-rz DEG]
//!            [-vo] [-vx | -vy | -vz] [-p] [-o copy.json]
//!
//! Viewer controls:
//!   - Arrow keys / WASD: Orbit
//!   - +/-: Zoom
//!   - O: Toggle orthographic/perspective
//!   - X/Y/Z: Look along an axis, R: Reset view
//!   - Q/ESC: Quit

use env_logger::Env;
use std::io;
use std::process::ExitCode;

use scafview_terminal::cli::Args;
use scafview_terminal::{pipeline, TerminalViewer};

fn main() -> ExitCode {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = Args::parse_dashed(std::env::args());

    match pipeline::run(&args.into_options(), &mut TerminalViewer, &mut io::stdout()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("FATAL: {e}");
            ExitCode::FAILURE
        }
    }
}
