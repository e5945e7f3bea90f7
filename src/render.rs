//! Capability contracts between the traversal core and the graphics device.
//!
//! The scene tree never talks to a graphics API directly. Everything it
//! needs from the outside world is expressed as one of the traits below,
//! implemented by an already-built backend (program objects, uploaded
//! vertex buffers, texture objects, offscreen surfaces). The traversal
//! drives these handles; compiling shaders, uploading buffers and managing
//! GPU object lifetimes stay on the other side of the seam.
//!
//! # Key types
//!
//! - [`ShaderProgram`] activates a program and receives resolved uniform scopes
//! - [`VertexBuffer`] binds, describes and draws uploaded vertex data
//! - [`TextureBinding`] attaches a texture to a numbered unit
//! - [`TargetSurface`] is an offscreen destination for pixel output
//! - [`Device`] carries the per-surface viewport and clear calls
//!

use bitflags::bitflags;

use crate::data_structures::uniforms::UniformScope;
use crate::error::DrawError;

/// Slot of a vertex attribute, resolved by the active shader program.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AttribLocation(pub u32);

/// Primitive topology a leaf draw is issued with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Primitive {
    #[default]
    Triangles,
    TriangleStrip,
    Lines,
    Points,
}

bitflags! {
    /// Frame-buffer planes wiped by a [`Device::clear`] call.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ClearFlags: u8 {
        const COLOR = 1 << 0;
        const DEPTH = 1 << 1;
    }
}

/// A compiled, linked shader program.
pub trait ShaderProgram {
    /// Activates the program on the device.
    fn activate(&self);

    /// Resolves the slot of a named vertex attribute, `None` when the
    /// program has no such input.
    fn attrib_location(&self, name: &str) -> Option<AttribLocation>;

    /// Pushes an entire resolved uniform scope to the device for the active
    /// program. Fails when the program reads a name the scope cannot
    /// resolve, or when a handle in the scope is invalid.
    fn apply_uniforms(&self, scope: &UniformScope) -> Result<(), DrawError>;
}

/// Uploaded vertex data for one mesh.
pub trait VertexBuffer {
    fn bind(&self);

    /// Enables and describes the position attribute at `location`: three
    /// floating-point components per vertex, tightly packed.
    fn attrib_pointer(&self, location: AttribLocation);

    /// Issues the primitive draw call for the whole buffer.
    fn draw(&self, topology: Primitive);

    fn unbind(&self);

    /// Vertex count, used for frame statistics.
    fn len(&self) -> u32;
}

/// A texture object that can be attached to a numbered texture unit.
///
/// Implementations remember the unit passed to [`bind`](TextureBinding::bind)
/// so the matching [`unbind`](TextureBinding::unbind) releases the same slot.
pub trait TextureBinding {
    fn bind(&self, unit: u32);
    fn unbind(&self);
}

/// An offscreen surface rendering output can be redirected to.
pub trait TargetSurface {
    fn bind(&self);
    fn unbind(&self);
    fn width(&self) -> u32;
    fn height(&self) -> u32;
}

/// Global per-surface device calls.
///
/// Only [`RenderContext`](crate::context::RenderContext) and
/// [`RenderTarget`](crate::data_structures::scene_graph::RenderTarget) issue
/// these; nodes never reach the device any other way.
pub trait Device {
    fn viewport(&mut self, x: u32, y: u32, width: u32, height: u32);
    fn clear(&mut self, flags: ClearFlags);
}
