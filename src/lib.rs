//! trellis
//!
//! A retained-mode scene graph for real-time rendering. A scene is a tree
//! of nodes; drawing a frame is one depth-first visit of that tree, during
//! which ancestor nodes push rendering state (shader program, named shader
//! inputs, model transform, render target, texture-unit bindings) that
//! every descendant sees and that is undone exactly when the subtree
//! finishes. Inherited, overridable state with no globals and no
//! state-diffing.
//!
//! High-level modules
//! - `camera`: camera node computing view/projection state for its subtree
//! - `context`: central render context that owns the per-frame mutable state
//! - `data_structures`: scene tree nodes and the uniform scope overlay
//! - `error`: the draw-time error taxonomy
//! - `render`: capability traits the traversal drives the device through
//! - `resources`: CPU-side mesh data for the built-in helper nodes
//!

pub mod camera;
pub mod context;
pub mod data_structures;
pub mod error;
pub mod render;
pub mod resources;

// Re-exports commonly used types for convenience in downstream code.
pub use cgmath::*;

pub use camera::Camera;
pub use context::{RenderContext, Statistics};
pub use data_structures::scene_graph::{
    Group, Material, Mirror, Node, Postprocess, RenderTarget, SimpleMesh, Skybox, Transform,
    Uniforms,
};
pub use data_structures::uniforms::{UniformScope, UniformValue};
pub use error::DrawError;
pub use render::{
    AttribLocation, ClearFlags, Device, Primitive, ShaderProgram, TargetSurface, TextureBinding,
    VertexBuffer,
};
