//! scafview core library - part geometry and scene logic
//!
//! Turns a JSON list of cuboid parts into world-space geometry: each part's
//! column-major `ecsBox` matrix and a scene-wide extra transform place eight
//! vertices and six faces. Also provides the styling rules, the bounding
//! cube used for display limits, and the camera math shared by viewers.

pub mod ascii_json;
pub mod document;
pub mod error;
pub mod geometry;
pub mod projection;
pub mod scene;
pub mod transform;

// Re-export commonly used types
pub use document::{PartRecord, SceneDocument};
pub use error::{Error, PartError, PartErrorKind, Result};
pub use geometry::{Dimensions, Face, Part};
pub use projection::{Camera, ProjectionMode, ViewAngles, ViewOverrides};
pub use scene::{BoundingCube, PartStyle, RenderedPart, Rgb, Scene, SceneOptions};
pub use transform::{ExtraTransform, Transform};
