//! End-to-end runs of the render pipeline with a recording viewer
use std::fs;
use std::io;
use std::path::Path;

use scafview_core::{ProjectionMode, ViewAngles};
use scafview_terminal::cli::Args;
use scafview_terminal::{run, Display, Error, Outcome, RenderOptions, Result, Viewer};
use serde_json::{json, Value};
use tempfile::tempdir;

/// What the viewer was shown, one entry per call
#[derive(Debug, Default)]
struct RecordingViewer {
    shown: Vec<Shown>,
    fail: bool,
}

#[derive(Debug)]
struct Shown {
    title: String,
    names: Vec<String>,
    projection: ProjectionMode,
    view: ViewAngles,
}

impl Viewer for RecordingViewer {
    fn show(&mut self, display: &Display<'_>) -> Result<()> {
        self.shown.push(Shown {
            title: display.title.clone(),
            names: display
                .scene
                .parts()
                .iter()
                .map(|p| p.part.name().to_string())
                .collect(),
            projection: display.projection,
            view: display.view,
        });
        if self.fail {
            return Err(Error::Terminal(io::Error::other("viewer crashed")));
        }
        Ok(())
    }
}

fn ecs_at(x: f64, y: f64, z: f64) -> Value {
    json!([1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, x, y, z, 1.0])
}

fn write_document(dir: &Path, document: &Value) -> (std::path::PathBuf, String) {
    let path = dir.join("parts.json");
    let text = serde_json::to_string_pretty(document).unwrap();
    fs::write(&path, &text).unwrap();
    (path, text)
}

fn mixed_document() -> Value {
    json!({
        "project": "site-a",
        "parts": [
            { "name": "ScaffoldingBox1", "width": 2.0, "ecsBox": ecs_at(0.0, 0.0, 0.0) },
            { "name": "Plank", "height": 0.1, "ecsBox": ecs_at(3.0, 0.0, 1.0) },
            { "name": "ScaffoldingBox2", "ecsBox": [1, 0, 0] },
            { "name": "ScaffoldingBox3", "ecsBox": ecs_at(0.0, 0.0, 2.0) }
        ]
    })
}

#[test]
fn test_empty_parts_renders_nothing() {
    let dir = tempdir().unwrap();
    let (input, _) = write_document(dir.path(), &json!({ "parts": [] }));
    let output = dir.path().join("copy.json");
    let options = RenderOptions {
        input,
        output: Some(output.clone()),
        ..Default::default()
    };

    let mut viewer = RecordingViewer::default();
    let mut console = Vec::new();
    let outcome = run(&options, &mut viewer, &mut console).unwrap();

    assert_eq!(outcome, Outcome::NothingRendered);
    assert_eq!(String::from_utf8(console).unwrap(), "No parts rendered.\n");
    assert!(viewer.shown.is_empty());
    assert!(!output.exists());
}

#[test]
fn test_bad_records_are_skipped_and_output_copied() {
    let dir = tempdir().unwrap();
    let (input, text) = write_document(dir.path(), &mixed_document());
    let output = dir.path().join("copy.json");
    let options = RenderOptions {
        input: input.clone(),
        output: Some(output.clone()),
        ..Default::default()
    };

    let mut viewer = RecordingViewer::default();
    let mut console = Vec::new();
    let outcome = run(&options, &mut viewer, &mut console).unwrap();

    assert_eq!(
        outcome,
        Outcome::Displayed {
            rendered: 3,
            skipped: 1
        }
    );
    assert_eq!(
        String::from_utf8(console).unwrap(),
        format!("Rendered parts: 3\nOutput saved to {}\n", output.display())
    );
    assert_eq!(viewer.shown.len(), 1);
    let shown = &viewer.shown[0];
    assert_eq!(shown.title, format!("Render: {}", input.display()));
    assert_eq!(shown.names, ["ScaffoldingBox1", "Plank", "ScaffoldingBox3"]);
    assert_eq!(shown.projection, ProjectionMode::Perspective);
    assert_eq!(shown.view, ViewAngles::DEFAULT);
    assert_eq!(fs::read_to_string(&output).unwrap(), text);
}

#[test]
fn test_command_line_run() {
    let dir = tempdir().unwrap();
    let (input, _) = write_document(dir.path(), &mixed_document());
    let input_arg = input.to_string_lossy().into_owned();
    let args = Args::try_parse_dashed([
        "scafview", "-f", &input_arg, "-b", "-vx", "-vz", "-vo", "-rz", "-45", "-tx", "2",
    ])
    .unwrap();

    let mut viewer = RecordingViewer::default();
    let outcome = run(&args.into_options(), &mut viewer, &mut io::sink()).unwrap();

    assert_eq!(
        outcome,
        Outcome::Displayed {
            rendered: 2,
            skipped: 1
        }
    );
    let shown = &viewer.shown[0];
    assert_eq!(shown.names, ["ScaffoldingBox1", "ScaffoldingBox3"]);
    assert_eq!(shown.view, ViewAngles::ALONG_Z);
    assert_eq!(shown.projection, ProjectionMode::Orthographic);
}

#[test]
fn test_missing_parts_is_fatal() {
    let dir = tempdir().unwrap();
    let (input, _) = write_document(dir.path(), &json!({ "items": [] }));
    let options = RenderOptions {
        input,
        ..Default::default()
    };

    let mut viewer = RecordingViewer::default();
    let err = run(&options, &mut viewer, &mut io::sink()).unwrap_err();

    assert!(matches!(err, Error::Core(scafview_core::Error::MissingParts)));
    assert!(viewer.shown.is_empty());
}

#[test]
fn test_missing_file_is_fatal() {
    let dir = tempdir().unwrap();
    let options = RenderOptions {
        input: dir.path().join("absent.json"),
        ..Default::default()
    };

    let err = run(&options, &mut RecordingViewer::default(), &mut io::sink()).unwrap_err();
    assert!(matches!(err, Error::Core(scafview_core::Error::Io { .. })));
}

#[test]
fn test_viewer_failure_skips_output() {
    let dir = tempdir().unwrap();
    let (input, _) = write_document(dir.path(), &mixed_document());
    let output = dir.path().join("copy.json");
    let options = RenderOptions {
        input,
        output: Some(output.clone()),
        ..Default::default()
    };

    let mut viewer = RecordingViewer {
        fail: true,
        ..Default::default()
    };
    let err = run(&options, &mut viewer, &mut io::sink()).unwrap_err();

    assert!(matches!(err, Error::Terminal(_)));
    assert!(!output.exists());
}
