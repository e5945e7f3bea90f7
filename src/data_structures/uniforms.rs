//! Shader-input values and the layered scope they are read from.
//!
//! Uniform state is inherited: a node publishes values for its whole
//! subtree, an inner node may shadow them, and everything is reverted the
//! moment the subtree is done. [`UniformScope`] implements that as a stack
//! of small name→value maps, so a pop is one `Vec::pop` and never touches
//! the layers beneath.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::rc::Rc;

use cgmath::{Matrix3, Matrix4, Vector2, Vector3, Vector4};

use crate::render::TextureBinding;

/// A single named shader input.
///
/// Texture-valued entries are explicit variants rather than a probed
/// capability: scene nodes declare [`UniformValue::Texture`] with the
/// handle to bind, and the scope a shader reads holds
/// [`UniformValue::Sampler`] with the unit that handle was bound to.
#[derive(Clone)]
pub enum UniformValue {
    Float(f32),
    Vec2(Vector2<f32>),
    Vec3(Vector3<f32>),
    Vec4(Vector4<f32>),
    Mat3(Matrix3<f32>),
    Mat4(Matrix4<f32>),
    /// A texture handle waiting to be bound to a unit on scope entry.
    Texture(Rc<dyn TextureBinding>),
    /// A texture already bound to the contained unit.
    Sampler(u32),
}

impl UniformValue {
    /// Whether this value claims a texture unit when it enters scope.
    pub fn is_texture(&self) -> bool {
        matches!(self, UniformValue::Texture(_))
    }
}

impl fmt::Debug for UniformValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UniformValue::Float(v) => f.debug_tuple("Float").field(v).finish(),
            UniformValue::Vec2(v) => f.debug_tuple("Vec2").field(v).finish(),
            UniformValue::Vec3(v) => f.debug_tuple("Vec3").field(v).finish(),
            UniformValue::Vec4(v) => f.debug_tuple("Vec4").field(v).finish(),
            UniformValue::Mat3(v) => f.debug_tuple("Mat3").field(v).finish(),
            UniformValue::Mat4(v) => f.debug_tuple("Mat4").field(v).finish(),
            UniformValue::Texture(_) => f.write_str("Texture(..)"),
            UniformValue::Sampler(unit) => f.debug_tuple("Sampler").field(unit).finish(),
        }
    }
}

/// Layered name→value environment shader inputs are resolved from.
///
/// Reads resolve to the nearest enclosing layer defining the name
/// (shadowing, like lexical scoping). Writes always land in the top layer.
/// Popping discards the top layer and exposes the one beneath unchanged.
pub struct UniformScope {
    layers: Vec<HashMap<String, UniformValue>>,
}

impl UniformScope {
    /// An empty scope with its base layer in place.
    pub fn new() -> Self {
        Self {
            layers: vec![HashMap::new()],
        }
    }

    /// Opens a fresh, empty layer on top of the current one.
    pub fn push(&mut self) {
        self.layers.push(HashMap::new());
    }

    /// Discards the top layer. The base layer is never popped.
    pub fn pop(&mut self) {
        if self.layers.len() == 1 {
            log::warn!("uniform scope pop without a matching push");
            return;
        }
        self.layers.pop();
    }

    /// Writes `name` into the top layer, shadowing any outer value.
    pub fn set(&mut self, name: impl Into<String>, value: UniformValue) {
        if let Some(top) = self.layers.last_mut() {
            top.insert(name.into(), value);
        }
    }

    /// Resolves `name` through the layers, nearest first.
    pub fn get(&self, name: &str) -> Option<&UniformValue> {
        self.layers.iter().rev().find_map(|layer| layer.get(name))
    }

    /// Every visible entry, shadowed values excluded. Backends iterate this
    /// to push the whole scope to the device in one go.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &UniformValue)> {
        let mut seen = HashSet::new();
        self.layers
            .iter()
            .rev()
            .flat_map(|layer| layer.iter())
            .filter(move |(name, _)| seen.insert(name.as_str()))
            .map(|(name, value)| (name.as_str(), value))
    }

    /// Number of layers currently stacked. Used for frame-boundary balance
    /// checks.
    pub fn depth(&self) -> usize {
        self.layers.len()
    }

    /// Drops every layer above the base one.
    pub(crate) fn unwind_to_base(&mut self) {
        self.layers.truncate(1);
    }
}

impl Default for UniformScope {
    fn default() -> Self {
        Self::new()
    }
}
