//! Per-surface shading attributes.
//!
//! Every primitive carries a fixed, strongly typed attribute set. Attribute
//! values are either constant over the surface or given per vertex and
//! interpolated with the shape's parametric weights.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Add, Mul};
use std::str::FromStr;

use facet_math::Vec3;
use serde::Deserialize;
use thiserror::Error;

use crate::primitive::PrimitiveId;
use crate::scene::{SceneError, SceneResult};
use crate::shape::ParametricWeights;

/// Color type alias (linear RGB, unclamped)
pub type Color = Vec3;

/// Names of the attributes a surface can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AttributeName {
    DiffuseColor,
    SpecularColor,
    Shininess,
    Normal,
    EmitColor,
    AmbientColor,
}

/// The value kind an attribute holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeKind {
    Color,
    Scalar,
    Vector,
}

impl AttributeName {
    pub const ALL: [AttributeName; 6] = [
        AttributeName::DiffuseColor,
        AttributeName::SpecularColor,
        AttributeName::Shininess,
        AttributeName::Normal,
        AttributeName::EmitColor,
        AttributeName::AmbientColor,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AttributeName::DiffuseColor => "diffuse_color",
            AttributeName::SpecularColor => "specular_color",
            AttributeName::Shininess => "shininess",
            AttributeName::Normal => "normal",
            AttributeName::EmitColor => "emit_color",
            AttributeName::AmbientColor => "ambient_color",
        }
    }

    pub fn kind(&self) -> AttributeKind {
        match self {
            AttributeName::Shininess => AttributeKind::Scalar,
            AttributeName::Normal => AttributeKind::Vector,
            _ => AttributeKind::Color,
        }
    }

    /// Emit and ambient colors are optional; everything else must be present.
    pub fn is_required(&self) -> bool {
        !matches!(self, AttributeName::EmitColor | AttributeName::AmbientColor)
    }
}

impl fmt::Display for AttributeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an attribute name that is not part of the schema.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown attribute name: {0}")]
pub struct UnknownAttributeName(pub String);

impl FromStr for AttributeName {
    type Err = UnknownAttributeName;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AttributeName::ALL
            .into_iter()
            .find(|name| name.as_str() == s)
            .ok_or_else(|| UnknownAttributeName(s.to_string()))
    }
}

/// A single evaluated attribute value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AttributeValue {
    Color(Color),
    Scalar(f32),
    Vector(Vec3),
}

/// Where an attribute's value comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum AttributeSource<T> {
    /// Same value over the whole surface
    Constant(T),
    /// One value per shape vertex, interpolated by parametric weights
    Varying(Vec<T>),
}

impl<T> AttributeSource<T>
where
    T: Copy + Add<Output = T> + Mul<f32, Output = T>,
{
    /// Evaluate the attribute at a parametric location.
    ///
    /// Varying sources must have exactly as many values as `weights` has
    /// vertices; `SurfaceAttributes::validate` guarantees this at load time.
    pub fn evaluate(&self, weights: &ParametricWeights) -> T {
        match self {
            AttributeSource::Constant(value) => *value,
            AttributeSource::Varying(values) => {
                let w = weights.as_slice();
                values[1..]
                    .iter()
                    .zip(&w[1..])
                    .fold(values[0] * w[0], |acc, (value, weight)| acc + *value * *weight)
            }
        }
    }
}

impl<T> AttributeSource<T> {
    /// Number of per-vertex values, or `None` for a constant.
    pub fn arity(&self) -> Option<usize> {
        match self {
            AttributeSource::Constant(_) => None,
            AttributeSource::Varying(values) => Some(values.len()),
        }
    }

    fn values(&self) -> &[T] {
        match self {
            AttributeSource::Constant(value) => std::slice::from_ref(value),
            AttributeSource::Varying(values) => values,
        }
    }
}

/// Fully evaluated shading inputs at one point of a surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSample {
    pub diffuse_color: Color,
    pub specular_color: Color,
    pub shininess: f32,
    /// Stored normal, not necessarily unit length
    pub normal: Vec3,
    pub emit_color: Color,
    pub ambient_color: Color,
}

/// The complete attribute set of one primitive.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceAttributes {
    pub diffuse_color: AttributeSource<Color>,
    pub specular_color: AttributeSource<Color>,
    pub shininess: AttributeSource<f32>,
    pub normal: AttributeSource<Vec3>,
    pub emit_color: Option<AttributeSource<Color>>,
    pub ambient_color: Option<AttributeSource<Color>>,
}

impl SurfaceAttributes {
    /// Create an attribute set with constant values and no emit/ambient terms.
    pub fn constant(diffuse_color: Color, specular_color: Color, shininess: f32, normal: Vec3) -> Self {
        Self {
            diffuse_color: AttributeSource::Constant(diffuse_color),
            specular_color: AttributeSource::Constant(specular_color),
            shininess: AttributeSource::Constant(shininess),
            normal: AttributeSource::Constant(normal),
            emit_color: None,
            ambient_color: None,
        }
    }

    /// Set a constant emitted color.
    pub fn with_emit_color(mut self, color: Color) -> Self {
        self.emit_color = Some(AttributeSource::Constant(color));
        self
    }

    /// Set a constant ambient color.
    pub fn with_ambient_color(mut self, color: Color) -> Self {
        self.ambient_color = Some(AttributeSource::Constant(color));
        self
    }

    /// Build an attribute set from name-keyed raw values, validating the
    /// schema: names must be known, required names present, and each value
    /// must have the kind its name demands.
    pub fn from_named(primitive: PrimitiveId, raw: BTreeMap<String, RawAttribute>) -> SceneResult<Self> {
        let mut colors: BTreeMap<AttributeName, AttributeSource<Vec3>> = BTreeMap::new();
        let mut shininess = None;

        for (key, value) in raw {
            let name: AttributeName = key.parse().map_err(|_| SceneError::UnknownAttribute {
                primitive,
                name: key.clone(),
            })?;

            match name.kind() {
                AttributeKind::Scalar => {
                    shininess = Some(value.into_scalar().ok_or(SceneError::AttributeKind {
                        primitive,
                        name,
                        expected: "a number or a list of numbers",
                    })?);
                }
                AttributeKind::Color | AttributeKind::Vector => {
                    let source = value.into_triple().ok_or(SceneError::AttributeKind {
                        primitive,
                        name,
                        expected: "an [x, y, z] triple or a list of triples",
                    })?;
                    colors.insert(name, source);
                }
            }
        }

        let mut take = |name: AttributeName| {
            colors
                .remove(&name)
                .ok_or(SceneError::MissingAttribute { primitive, name })
        };

        Ok(Self {
            diffuse_color: take(AttributeName::DiffuseColor)?,
            specular_color: take(AttributeName::SpecularColor)?,
            normal: take(AttributeName::Normal)?,
            emit_color: take(AttributeName::EmitColor).ok(),
            ambient_color: take(AttributeName::AmbientColor).ok(),
            shininess: shininess.ok_or(SceneError::MissingAttribute {
                primitive,
                name: AttributeName::Shininess,
            })?,
        })
    }

    /// Check every varying attribute against the shape's vertex count and
    /// every shininess value for finiteness.
    pub fn validate(&self, primitive: PrimitiveId, vertex_count: usize) -> SceneResult<()> {
        let arities = [
            (AttributeName::DiffuseColor, self.diffuse_color.arity()),
            (AttributeName::SpecularColor, self.specular_color.arity()),
            (AttributeName::Shininess, self.shininess.arity()),
            (AttributeName::Normal, self.normal.arity()),
            (AttributeName::EmitColor, self.emit_color.as_ref().and_then(|s| s.arity())),
            (AttributeName::AmbientColor, self.ambient_color.as_ref().and_then(|s| s.arity())),
        ];
        for (name, arity) in arities {
            if let Some(found) = arity {
                if found != vertex_count {
                    return Err(SceneError::AttributeArity {
                        primitive,
                        name,
                        expected: vertex_count,
                        found,
                    });
                }
            }
        }

        if let Some(&value) = self
            .shininess
            .values()
            .iter()
            .find(|v| !v.is_finite() || **v < 0.0)
        {
            return Err(SceneError::InvalidShininess { primitive, value });
        }

        Ok(())
    }

    /// Evaluate every attribute at once.
    pub fn evaluate(&self, weights: &ParametricWeights) -> SurfaceSample {
        SurfaceSample {
            diffuse_color: self.diffuse_color.evaluate(weights),
            specular_color: self.specular_color.evaluate(weights),
            shininess: self.shininess.evaluate(weights),
            normal: self.normal.evaluate(weights),
            emit_color: self
                .emit_color
                .as_ref()
                .map_or(Color::ZERO, |s| s.evaluate(weights)),
            ambient_color: self
                .ambient_color
                .as_ref()
                .map_or(Color::ZERO, |s| s.evaluate(weights)),
        }
    }

    /// Evaluate one attribute by name. Absent optional colors evaluate to black.
    pub fn evaluate_named(&self, name: AttributeName, weights: &ParametricWeights) -> AttributeValue {
        let optional = |source: &Option<AttributeSource<Color>>| {
            source.as_ref().map_or(Color::ZERO, |s| s.evaluate(weights))
        };
        match name {
            AttributeName::DiffuseColor => AttributeValue::Color(self.diffuse_color.evaluate(weights)),
            AttributeName::SpecularColor => AttributeValue::Color(self.specular_color.evaluate(weights)),
            AttributeName::Shininess => AttributeValue::Scalar(self.shininess.evaluate(weights)),
            AttributeName::Normal => AttributeValue::Vector(self.normal.evaluate(weights)),
            AttributeName::EmitColor => AttributeValue::Color(optional(&self.emit_color)),
            AttributeName::AmbientColor => AttributeValue::Color(optional(&self.ambient_color)),
        }
    }
}

/// Attribute value as written in a scene description, before its name has
/// told us which kind it should be.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum RawAttribute {
    Scalar(f32),
    Triple([f32; 3]),
    ScalarList(Vec<f32>),
    TripleList(Vec<[f32; 3]>),
}

impl RawAttribute {
    fn into_scalar(self) -> Option<AttributeSource<f32>> {
        match self {
            RawAttribute::Scalar(v) => Some(AttributeSource::Constant(v)),
            // Three numbers are a per-vertex list on a triangle, not a color
            RawAttribute::Triple(v) => Some(AttributeSource::Varying(v.to_vec())),
            RawAttribute::ScalarList(values) if !values.is_empty() => Some(AttributeSource::Varying(values)),
            _ => None,
        }
    }

    fn into_triple(self) -> Option<AttributeSource<Vec3>> {
        match self {
            RawAttribute::Triple(v) => Some(AttributeSource::Constant(Vec3::from_array(v))),
            RawAttribute::TripleList(values) if !values.is_empty() => Some(AttributeSource::Varying(
                values.into_iter().map(Vec3::from_array).collect(),
            )),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facet_math::Vec2;

    use crate::shape::Shape;

    fn raw(entries: &[(&str, RawAttribute)]) -> BTreeMap<String, RawAttribute> {
        entries
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn required() -> Vec<(&'static str, RawAttribute)> {
        vec![
            ("diffuse_color", RawAttribute::Triple([1.0, 0.0, 0.0])),
            ("specular_color", RawAttribute::Triple([1.0, 1.0, 1.0])),
            ("shininess", RawAttribute::Scalar(16.0)),
            ("normal", RawAttribute::Triple([0.0, 0.0, 1.0])),
        ]
    }

    #[test]
    fn test_attribute_name_round_trip() {
        for name in AttributeName::ALL {
            assert_eq!(name.as_str().parse::<AttributeName>(), Ok(name));
        }
        assert!("roughness".parse::<AttributeName>().is_err());
    }

    #[test]
    fn test_from_named_required_set() {
        let attrs = SurfaceAttributes::from_named(PrimitiveId(1), raw(&required())).unwrap();

        assert_eq!(attrs.diffuse_color, AttributeSource::Constant(Vec3::X));
        assert_eq!(attrs.shininess, AttributeSource::Constant(16.0));
        assert!(attrs.emit_color.is_none());
        assert!(attrs.ambient_color.is_none());
    }

    #[test]
    fn test_from_named_unknown_attribute() {
        let mut entries = required();
        entries.push(("roughness", RawAttribute::Scalar(0.5)));

        let err = SurfaceAttributes::from_named(PrimitiveId(7), raw(&entries)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::UnknownAttribute { primitive: PrimitiveId(7), ref name } if name == "roughness"
        ));
    }

    #[test]
    fn test_from_named_missing_attribute() {
        let entries: Vec<_> = required().into_iter().filter(|(k, _)| *k != "normal").collect();

        let err = SurfaceAttributes::from_named(PrimitiveId(2), raw(&entries)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::MissingAttribute { name: AttributeName::Normal, .. }
        ));
    }

    #[test]
    fn test_from_named_wrong_kind() {
        let mut entries = required();
        entries[2] = ("shininess", RawAttribute::TripleList(vec![[1.0, 2.0, 3.0]]));

        let err = SurfaceAttributes::from_named(PrimitiveId(3), raw(&entries)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::AttributeKind { name: AttributeName::Shininess, .. }
        ));

        let mut entries = required();
        entries[3] = ("normal", RawAttribute::Scalar(1.0));

        let err = SurfaceAttributes::from_named(PrimitiveId(3), raw(&entries)).unwrap_err();
        assert!(matches!(
            err,
            SceneError::AttributeKind { name: AttributeName::Normal, .. }
        ));
    }

    #[test]
    fn test_validate_arity_and_shininess() {
        let mut attrs = SurfaceAttributes::constant(Vec3::ONE, Vec3::ONE, 8.0, Vec3::Z);
        attrs.diffuse_color = AttributeSource::Varying(vec![Vec3::ONE; 3]);

        assert!(attrs.validate(PrimitiveId(0), 3).is_ok());
        assert!(matches!(
            attrs.validate(PrimitiveId(0), 4),
            Err(SceneError::AttributeArity { expected: 4, found: 3, .. })
        ));

        let attrs = SurfaceAttributes::constant(Vec3::ONE, Vec3::ONE, f32::NAN, Vec3::Z);
        assert!(matches!(
            attrs.validate(PrimitiveId(0), 3),
            Err(SceneError::InvalidShininess { .. })
        ));
    }

    #[test]
    fn test_varying_interpolation_on_triangle() {
        let shape = Shape::Triangle {
            v0: Vec3::ZERO,
            v1: Vec3::X,
            v2: Vec3::Y,
        };
        let colors = AttributeSource::Varying(vec![Vec3::X, Vec3::Y, Vec3::Z]);

        // Vertex v1 sits at barycentric (u, v) = (1, 0)
        let at_v1 = colors.evaluate(&shape.parametric_weights(Vec2::new(1.0, 0.0)));
        assert!((at_v1 - Vec3::Y).length() < 1e-6);

        let centroid = colors.evaluate(&shape.parametric_weights(Vec2::splat(1.0 / 3.0)));
        assert!((centroid - Vec3::splat(1.0 / 3.0)).length() < 1e-6);
    }

    #[test]
    fn test_evaluate_named_optional_defaults_to_black() {
        let attrs = SurfaceAttributes::constant(Vec3::ONE, Vec3::ONE, 8.0, Vec3::Z)
            .with_ambient_color(Vec3::splat(0.1));
        let weights = ParametricWeights::constant();

        assert_eq!(
            attrs.evaluate_named(AttributeName::EmitColor, &weights),
            AttributeValue::Color(Vec3::ZERO)
        );
        assert_eq!(
            attrs.evaluate_named(AttributeName::AmbientColor, &weights),
            AttributeValue::Color(Vec3::splat(0.1))
        );
        assert_eq!(
            attrs.evaluate_named(AttributeName::Shininess, &weights),
            AttributeValue::Scalar(8.0)
        );
    }
}
