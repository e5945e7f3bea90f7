use std::rc::Rc;

use crate::data_structures::scene_graph::Node;
use crate::data_structures::uniforms::UniformScope;
use crate::error::DrawError;
use crate::render::{ClearFlags, Device, ShaderProgram};

/// Per-frame draw counters.
///
/// Reset exactly once at the start of every [`RenderContext::draw`], never
/// elsewhere, so after a frame they describe that frame alone.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Statistics {
    pub draw_calls: u32,
    pub vertices: u32,
}

/// Central mutable state threaded through a traversal: the uniform scope
/// overlay, the shader stack, the texture-unit counter, the viewport and
/// the frame statistics, plus the device the frame is drawn against.
///
/// One instance exists per rendered surface. Nothing here is global, so an
/// offscreen context and a main-view context can coexist; nodes only ever
/// see the context they are being visited with.
pub struct RenderContext {
    device: Box<dyn Device>,
    uniforms: UniformScope,
    shaders: Vec<Rc<dyn ShaderProgram>>,
    texture_unit: u32,
    viewport_width: u32,
    viewport_height: u32,
    statistics: Statistics,
}

impl RenderContext {
    /// A context over `device` with the default 640×480 viewport.
    pub fn new(device: Box<dyn Device>) -> Self {
        Self {
            device,
            uniforms: UniformScope::new(),
            shaders: Vec::new(),
            texture_unit: 0,
            viewport_width: 640,
            viewport_height: 480,
            statistics: Statistics::default(),
        }
    }

    pub fn set_viewport(&mut self, width: u32, height: u32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    /// Draws one frame: resets the statistics and transient stacks, sets the
    /// viewport, clears color and depth, and visits `root`.
    ///
    /// The traversal unwinds its scopes on every exit path, so even an
    /// aborted frame leaves the context balanced; the stack invariants are
    /// additionally asserted here in debug builds.
    pub fn draw(&mut self, root: &dyn Node) -> Result<(), DrawError> {
        self.statistics = Statistics::default();
        self.shaders.clear();
        self.texture_unit = 0;
        self.uniforms.unwind_to_base();

        self.device
            .viewport(0, 0, self.viewport_width, self.viewport_height);
        self.device.clear(ClearFlags::COLOR | ClearFlags::DEPTH);

        let scope_depth = self.uniforms.depth();
        let result = root.visit(self);

        debug_assert!(
            self.shaders.is_empty(),
            "shader stack not empty after traversal"
        );
        debug_assert_eq!(
            self.uniforms.depth(),
            scope_depth,
            "uniform scope unbalanced after traversal"
        );
        debug_assert_eq!(
            self.texture_unit, 0,
            "texture units still claimed after traversal"
        );
        if result.is_ok() {
            log::trace!(
                "frame done: {} draw calls, {} vertices",
                self.statistics.draw_calls,
                self.statistics.vertices
            );
        }
        result
    }

    /// Opens a new uniform scope layer.
    pub fn push_uniforms(&mut self) {
        self.uniforms.push();
    }

    /// Closes the top uniform scope layer.
    pub fn pop_uniforms(&mut self) {
        self.uniforms.pop();
    }

    /// Claims the next free texture unit.
    pub fn push_texture(&mut self) -> u32 {
        let unit = self.texture_unit;
        self.texture_unit += 1;
        unit
    }

    /// Releases the most recently claimed texture unit.
    pub fn pop_texture(&mut self) {
        if self.texture_unit == 0 {
            log::warn!("texture unit released without a matching claim");
            return;
        }
        self.texture_unit -= 1;
    }

    pub fn push_shader(&mut self, shader: Rc<dyn ShaderProgram>) {
        self.shaders.push(shader);
    }

    pub fn pop_shader(&mut self) {
        if self.shaders.pop().is_none() {
            log::warn!("shader popped from an empty stack");
        }
    }

    /// The currently active shader program.
    pub fn shader(&self) -> Result<Rc<dyn ShaderProgram>, DrawError> {
        self.shaders.last().cloned().ok_or(DrawError::NoActiveShader)
    }

    /// The uniform scope as visible at the current point of the traversal.
    pub fn uniforms(&self) -> &UniformScope {
        &self.uniforms
    }

    pub fn uniforms_mut(&mut self) -> &mut UniformScope {
        &mut self.uniforms
    }

    /// Records one draw call of `vertices` vertices in the frame statistics.
    pub fn record_draw(&mut self, vertices: u32) {
        self.statistics.draw_calls += 1;
        self.statistics.vertices += vertices;
    }

    pub fn statistics(&self) -> Statistics {
        self.statistics
    }

    pub fn viewport_width(&self) -> u32 {
        self.viewport_width
    }

    pub fn viewport_height(&self) -> u32 {
        self.viewport_height
    }

    /// Viewport aspect ratio, used for projection matrices.
    pub fn aspect(&self) -> f32 {
        self.viewport_width as f32 / self.viewport_height as f32
    }

    /// The device behind this context. Reserved for the context itself and
    /// render-target nodes; see [`Device`].
    pub fn device_mut(&mut self) -> &mut dyn Device {
        self.device.as_mut()
    }
}
