//! The on-disk render job: scene, camera, screen and settings in one JSON file.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use facet_core::SceneDescription;
use facet_renderer::{Camera, PixelCell, RenderConfig, ScreenGrid};
use serde::Deserialize;

/// Either a regular grid to derive cells from, or explicit cells.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScreenInput {
    Grid(ScreenGrid),
    Cells(Vec<PixelCell>),
}

impl ScreenInput {
    pub fn cells(&self) -> Result<Vec<PixelCell>> {
        match self {
            ScreenInput::Grid(grid) => Ok(grid.cells()?),
            ScreenInput::Cells(cells) => Ok(cells.clone()),
        }
    }

    /// Grid dimensions, when the screen is a grid.
    pub fn grid(&self) -> Option<&ScreenGrid> {
        match self {
            ScreenInput::Grid(grid) => Some(grid),
            ScreenInput::Cells(_) => None,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct SceneFile {
    pub camera: Camera,
    pub screen: ScreenInput,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(flatten)]
    pub scene: SceneDescription,
}

impl SceneFile {
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path)
            .with_context(|| format!("Failed to read scene file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse scene file {}", path.display()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_renderer::{PixelId, SamplePattern, Vec3};

    #[test]
    fn test_parse_grid_scene_file() {
        let json = r#"{
            "camera": { "origin": [0, 0, 10] },
            "screen": { "center": [0, 0, 5], "right": [1, 0, 0], "up": [0, 1, 0], "width": 4, "height": 2 },
            "render": { "corner_bias": 1.0, "include_center": false },
            "lights": [ { "position": [0, 0, 3], "color": [1, 1, 1], "power": 5 } ],
            "primitives": []
        }"#;
        let file: SceneFile = serde_json::from_str(json).unwrap();

        assert_eq!(file.camera.origin, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(file.render.sampling, SamplePattern::grid());
        assert_eq!(file.screen.cells().unwrap().len(), 8);
        assert_eq!(file.scene.lights.len(), 1);
    }

    #[test]
    fn test_parse_explicit_cells() {
        let json = r#"{
            "camera": { "origin": [0, 0, 10] },
            "screen": [
                { "id": 9, "center": [0, 0, 5], "corners": [[-1, 1, 5], [1, 1, 5], [1, -1, 5], [-1, -1, 5]] }
            ]
        }"#;
        let file: SceneFile = serde_json::from_str(json).unwrap();

        assert!(file.screen.grid().is_none());
        assert_eq!(file.screen.cells().unwrap()[0].id, PixelId(9));
        assert_eq!(file.render, RenderConfig::default());
        assert!(file.scene.primitives.is_empty());
    }
}
