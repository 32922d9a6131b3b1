//! Scene input documents
//!
//! The input is a JSON object with a `parts` array. Each element describes
//! one cuboid:
//!
//! ```json
//! { "name": "ScaffoldingBox1", "width": 2.0, "depth": 0.5, "height": 1.0,
//!   "ecsBox": [1,0,0,0, 0,1,0,0, 0,0,1,0, 0,0,0,1] }
//! ```
//!
//! `ecsBox` is the part's local 4x4 matrix flattened column by column.
//! Records are validated one at a time so that a bad record only costs that
//! part.

use std::fs;
use std::path::Path;

use nalgebra::Matrix4;
use serde::Deserialize;
use serde_json::Value;

use crate::ascii_json;
use crate::error::{Error, PartError, PartErrorKind, Result};
use crate::geometry::Dimensions;

const ECS_BOX_LEN: usize = 16;

/// Parsed input document, kept verbatim for the pass-through copy
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    root: Value,
}

impl SceneDocument {
    /// Read and validate a document from disk
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let text = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        Self::parse(&text)
    }

    pub fn parse(text: &str) -> Result<Self> {
        Self::from_value(serde_json::from_str(text)?)
    }

    /// Accept a JSON value whose top level carries a `parts` array
    pub fn from_value(root: Value) -> Result<Self> {
        if !root.get("parts").is_some_and(Value::is_array) {
            return Err(Error::MissingParts);
        }
        Ok(Self { root })
    }

    /// Raw part records in input order
    pub fn parts(&self) -> &[Value] {
        self.root
            .get("parts")
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn root(&self) -> &Value {
        &self.root
    }

    /// The input document with two-space indentation, ASCII-escaped, in
    /// the original key order. Computed geometry is never part of it.
    pub fn to_pretty_string(&self) -> Result<String> {
        Ok(ascii_json::to_string(&self.root)?)
    }

    pub fn write_pretty(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let text = self.to_pretty_string()?;
        fs::write(path, text).map_err(|e| Error::io(path, e))
    }
}

#[derive(Deserialize)]
struct RawPart {
    width: Option<f64>,
    depth: Option<f64>,
    height: Option<f64>,
    #[serde(rename = "ecsBox")]
    ecs_box: Option<Vec<f64>>,
}

/// A validated part record
#[derive(Debug, Clone, PartialEq)]
pub struct PartRecord {
    pub name: String,
    pub dimensions: Dimensions,
    /// Local coordinate-system matrix
    pub ecs: Matrix4<f64>,
}

impl PartRecord {
    /// Validate the `index`-th element of the `parts` array
    pub fn from_value(index: usize, value: &Value) -> std::result::Result<Self, PartError> {
        let name = value
            .get("name")
            .and_then(Value::as_str)
            .map_or_else(|| format!("Part{index}"), str::to_owned);
        let fail = |kind| PartError {
            index,
            name: name.clone(),
            kind,
        };

        let raw = RawPart::deserialize(value)
            .map_err(|e| fail(PartErrorKind::Malformed(e.to_string())))?;
        let flat = raw.ecs_box.ok_or_else(|| fail(PartErrorKind::MissingEcsBox))?;
        if flat.len() != ECS_BOX_LEN {
            return Err(fail(PartErrorKind::EcsBoxLength(flat.len())));
        }

        let defaults = Dimensions::default();
        Ok(Self {
            dimensions: Dimensions::new(
                raw.width.unwrap_or(defaults.width),
                raw.depth.unwrap_or(defaults.depth),
                raw.height.unwrap_or(defaults.height),
            ),
            ecs: Matrix4::from_column_slice(&flat),
            name,
        })
    }
}
