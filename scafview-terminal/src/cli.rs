//! Command line interface
use std::path::PathBuf;

use clap::Parser;
use scafview_core::{ExtraTransform, ProjectionMode, SceneOptions, ViewOverrides};

use crate::pipeline::RenderOptions;

/// Multi-letter single-dash flags and their long forms
const DASH_ALIASES: &[(&str, &str)] = &[
    ("-tx", "--tx"),
    ("-ty", "--ty"),
    ("-tz", "--tz"),
    ("-rz", "--rz"),
    ("-vo", "--view-ortho"),
    ("-vx", "--view-x"),
    ("-vy", "--view-y"),
    ("-vz", "--view-z"),
];

/// Render scaffolding JSON
#[derive(Parser, Debug, Clone, PartialEq)]
#[command(
    name = "scafview",
    author,
    version,
    about = "Render scaffolding JSON",
    long_about = None,
    after_help = "Multi-letter flags also accept a single dash: -tx -ty -tz -rz -vo -vx -vy -vz"
)]
pub struct Args {
    /// Input JSON file
    #[arg(short = 'f', long = "file", value_name = "FILE")]
    pub file: PathBuf,

    /// Output JSON file (copy of the input, written after the viewer closes)
    #[arg(short = 'o', long = "output", value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Highlight part by name (substring match)
    #[arg(short = 'H', long = "highlight", value_name = "TEXT")]
    pub highlight: Option<String>,

    /// Render only ScaffoldingBox items
    #[arg(short = 'b', long = "scaffolding-only")]
    pub scaffolding_only: bool,

    /// Translate X offset
    #[arg(long = "tx", value_name = "OFFSET", default_value_t = 0.0, allow_negative_numbers = true)]
    pub tx: f64,

    /// Translate Y offset
    #[arg(long = "ty", value_name = "OFFSET", default_value_t = 0.0, allow_negative_numbers = true)]
    pub ty: f64,

    /// Translate Z offset
    #[arg(long = "tz", value_name = "OFFSET", default_value_t = 0.0, allow_negative_numbers = true)]
    pub tz: f64,

    /// Rotate by Z axis (degrees)
    #[arg(long = "rz", value_name = "DEGREES", allow_negative_numbers = true)]
    pub rz: Option<f64>,

    /// Orthographic view (no perspective distortion)
    #[arg(long = "view-ortho")]
    pub view_ortho: bool,

    /// View along X-axis
    #[arg(long = "view-x")]
    pub view_x: bool,

    /// View along Y-axis
    #[arg(long = "view-y")]
    pub view_y: bool,

    /// View along Z-axis
    #[arg(long = "view-z")]
    pub view_z: bool,

    /// Measure performance time
    #[arg(short = 'p', long = "performance")]
    pub performance: bool,
}

impl Args {
    /// Parse an argument list that may use the single-dash spellings,
    /// exiting with usage on error
    pub fn parse_dashed<I, T>(args: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::parse_from(normalize_args(args))
    }

    pub fn try_parse_dashed<I, T>(args: I) -> Result<Self, clap::Error>
    where
        I: IntoIterator<Item = T>,
        T: Into<String>,
    {
        Self::try_parse_from(normalize_args(args))
    }

    pub fn into_options(self) -> RenderOptions {
        RenderOptions {
            input: self.file,
            output: self.output,
            scene: SceneOptions {
                scaffolding_only: self.scaffolding_only,
                highlight: self.highlight,
            },
            extra: ExtraTransform::new(self.rz, self.tx, self.ty, self.tz),
            projection: if self.view_ortho {
                ProjectionMode::Orthographic
            } else {
                ProjectionMode::Perspective
            },
            overrides: ViewOverrides {
                along_x: self.view_x,
                along_y: self.view_y,
                along_z: self.view_z,
            },
            performance: self.performance,
        }
    }
}

/// Rewrite `-tx 5` / `-tx=5` style flags to `--tx 5` / `--tx=5`. Arguments
/// after `--` are left alone.
pub fn normalize_args<I, T>(args: I) -> Vec<String>
where
    I: IntoIterator<Item = T>,
    T: Into<String>,
{
    let mut positional = false;
    args.into_iter()
        .map(Into::into)
        .map(|arg| {
            if positional {
                return arg;
            }
            if arg == "--" {
                positional = true;
                return arg;
            }
            for (dashed, long) in DASH_ALIASES {
                if arg == *dashed {
                    return (*long).to_string();
                }
                if let Some(value) = arg.strip_prefix(dashed).and_then(|rest| rest.strip_prefix('=')) {
                    return format!("{long}={value}");
                }
            }
            arg
        })
        .collect()
}
