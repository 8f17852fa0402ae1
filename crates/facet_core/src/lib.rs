//! Facet Core - the surface store for the facet renderer.
//!
//! This crate provides:
//!
//! - **Scene types**: `Scene`, `SurfacePrimitive`, `Shape`, `PointLight`
//! - **Attributes**: typed per-surface shading data looked up by parametric coordinate
//! - **Loading**: JSON scene descriptions with schema validation at load time
//!
//! # Example
//!
//! ```ignore
//! use facet_core::load_scene;
//!
//! let scene = load_scene("scene.json")?;
//! println!("Loaded {} primitives, {} lights",
//!     scene.primitive_count(),
//!     scene.lights().len());
//! ```

pub mod attribute;
pub mod light;
pub mod loader;
pub mod primitive;
pub mod scene;
pub mod shape;

// Re-export commonly used types
pub use attribute::{
    AttributeName, AttributeSource, AttributeValue, Color, RawAttribute, SurfaceAttributes,
    SurfaceSample,
};
pub use light::PointLight;
pub use loader::{load_scene, load_scene_from_str, LoadError, LoadResult, SceneDescription};
pub use primitive::{PrimitiveId, SurfacePrimitive};
pub use scene::{Hit, Scene, SceneError, SceneResult, SurfaceHit};
pub use shape::{ParametricWeights, Shape, ShapeHit};
