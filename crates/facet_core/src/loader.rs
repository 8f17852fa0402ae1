//! JSON scene description loading.
//!
//! The authoring pipeline hands us primitives and lights as JSON. All
//! schema validation happens here, once, before anything renders.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::attribute::{RawAttribute, SurfaceAttributes};
use crate::light::PointLight;
use crate::primitive::{PrimitiveId, SurfacePrimitive};
use crate::scene::{Scene, SceneError};
use crate::shape::Shape;

/// Errors that can occur during scene loading.
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid scene: {0}")]
    Scene(#[from] SceneError),
}

/// Result type for loading operations.
pub type LoadResult<T> = Result<T, LoadError>;

/// One primitive as written in a scene file.
#[derive(Debug, Clone, Deserialize)]
pub struct PrimitiveDescription {
    pub id: PrimitiveId,
    pub shape: Shape,
    pub attributes: BTreeMap<String, RawAttribute>,
}

/// Primitives and lights as written in a scene file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SceneDescription {
    #[serde(default)]
    pub lights: Vec<PointLight>,
    #[serde(default)]
    pub primitives: Vec<PrimitiveDescription>,
}

impl SceneDescription {
    /// Validate the description and build the scene.
    pub fn into_scene(self) -> LoadResult<Scene> {
        let primitives = self
            .primitives
            .into_iter()
            .map(|desc| {
                let attributes = SurfaceAttributes::from_named(desc.id, desc.attributes)?;
                SurfacePrimitive::new(desc.id, desc.shape, attributes)
            })
            .collect::<Result<Vec<_>, SceneError>>()?;

        Ok(Scene::new(primitives, self.lights)?)
    }
}

/// Load a scene from a JSON string.
pub fn load_scene_from_str(json: &str) -> LoadResult<Scene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    description.into_scene()
}

/// Load a scene from a JSON file.
pub fn load_scene(path: impl AsRef<Path>) -> LoadResult<Scene> {
    let path = path.as_ref();
    let json = fs::read_to_string(path)?;
    let scene = load_scene_from_str(&json)?;

    log::info!(
        "Loaded {} primitives and {} lights from {}",
        scene.primitive_count(),
        scene.lights().len(),
        path.display()
    );

    Ok(scene)
}
