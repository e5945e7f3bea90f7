//! Scene graph and hierarchical scene organization.
//!
//! Provides the [`Node`] trait and the node types a scene tree is built
//! from. A frame is one depth-first visit of the tree: each node applies
//! its state on `enter`, every descendant sees that state, and `exit`
//! reverts it exactly, no matter how deep or wide the subtree is and also
//! when a descendant aborts the frame with an error.

use std::rc::Rc;

use cgmath::{Matrix3, Matrix4};

use crate::context::RenderContext;
use crate::data_structures::uniforms::UniformValue;
use crate::error::DrawError;
use crate::render::{ClearFlags, Primitive, ShaderProgram, TargetSurface, VertexBuffer};

/// A traversable element of the scene tree.
///
/// The default [`visit`](Node::visit) is the only traversal primitive:
/// `enter`, children in declaration order, `exit`. State nodes override
/// `enter`/`exit` as an exact push/pop pair; leaves with no children
/// semantics override `visit` directly.
pub trait Node {
    /// Applies this node's state to the context. Runs before any child.
    ///
    /// Implementations must either succeed or fail before their first push,
    /// so a failed `enter` never leaves partial state behind.
    fn enter(&self, _ctx: &mut RenderContext) -> Result<(), DrawError> {
        Ok(())
    }

    /// Reverts exactly what [`enter`](Node::enter) applied. Runs after all
    /// children.
    fn exit(&self, _ctx: &mut RenderContext) {}

    /// Children in declaration order.
    fn children(&self) -> &[Box<dyn Node>] {
        &[]
    }

    /// Depth-first visit: pre-order `enter`, children in order, post-order
    /// `exit`.
    ///
    /// `exit` runs even when a child returns an error, so state pushed by
    /// `enter` is unwound before the error continues upward. A sibling can
    /// therefore never observe another sibling's state, only an ancestor's.
    fn visit(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        self.enter(ctx)?;
        let mut result = Ok(());
        for child in self.children() {
            result = child.visit(ctx);
            if result.is_err() {
                break;
            }
        }
        self.exit(ctx);
        result
    }
}

/// Plain container node with no state of its own.
pub struct Group {
    pub children: Vec<Box<dyn Node>>,
}

impl Group {
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self { children }
    }

    pub fn append(&mut self, child: Box<dyn Node>) {
        self.children.push(child);
    }
}

impl Node for Group {
    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// Publishes a set of named shader inputs for its subtree.
///
/// Entries keep their declaration order; texture-valued entries claim
/// texture units in that order on `enter` and release them in reverse on
/// `exit`, so unit claims nest exactly like the scopes themselves.
pub struct Uniforms {
    entries: Vec<(String, UniformValue)>,
    pub children: Vec<Box<dyn Node>>,
}

impl Uniforms {
    pub fn new(entries: Vec<(String, UniformValue)>, children: Vec<Box<dyn Node>>) -> Self {
        Self { entries, children }
    }

    /// Binds textures, then lays the entries into a fresh scope layer.
    ///
    /// Shared with [`Material`], which composes a `Uniforms` value instead
    /// of inheriting from it.
    fn apply(&self, ctx: &mut RenderContext) {
        let mut resolved = Vec::with_capacity(self.entries.len());
        for (name, value) in &self.entries {
            match value {
                UniformValue::Texture(texture) => {
                    let unit = ctx.push_texture();
                    texture.bind(unit);
                    resolved.push((name.as_str(), UniformValue::Sampler(unit)));
                }
                other => resolved.push((name.as_str(), other.clone())),
            }
        }
        ctx.push_uniforms();
        for (name, value) in resolved {
            ctx.uniforms_mut().set(name, value);
        }
    }

    /// Unbinds textures in reverse claim order, then drops the scope layer.
    fn revert(&self, ctx: &mut RenderContext) {
        for (_, value) in self.entries.iter().rev() {
            if let UniformValue::Texture(texture) = value {
                texture.unbind();
                ctx.pop_texture();
            }
        }
        ctx.pop_uniforms();
    }
}

impl Node for Uniforms {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        self.apply(ctx);
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        self.revert(ctx);
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// A shader program plus the inputs it needs, scoped to a subtree.
///
/// Nested materials override outer ones for their subtree only: activate
/// shader, bind inputs, draw, unbind inputs, deactivate. The nesting is
/// symmetric at every depth.
pub struct Material {
    shader: Rc<dyn ShaderProgram>,
    uniforms: Uniforms,
}

impl Material {
    pub fn new(
        shader: Rc<dyn ShaderProgram>,
        entries: Vec<(String, UniformValue)>,
        children: Vec<Box<dyn Node>>,
    ) -> Self {
        Self {
            shader,
            uniforms: Uniforms::new(entries, children),
        }
    }
}

impl Node for Material {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        // Activate first so unit bookkeeping happens against this program.
        ctx.push_shader(Rc::clone(&self.shader));
        self.shader.activate();
        self.uniforms.apply(ctx);
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        self.uniforms.revert(ctx);
        ctx.pop_shader();
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.uniforms.children
    }
}

/// Composes a model matrix with whatever transform encloses it.
///
/// The ancestor matrix applies first: a local matrix is expressed in its
/// parent's space, and the first transform in a chain is relative to world
/// space.
pub struct Transform {
    pub matrix: Matrix4<f32>,
    pub children: Vec<Box<dyn Node>>,
}

impl Transform {
    pub fn new(matrix: Matrix4<f32>, children: Vec<Box<dyn Node>>) -> Self {
        Self { matrix, children }
    }
}

impl Node for Transform {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        let composed = match ctx.uniforms().get("modelTransform") {
            Some(UniformValue::Mat4(parent)) => *parent * self.matrix,
            Some(_) => {
                log::warn!("modelTransform in scope is not a mat4, ignoring it");
                self.matrix
            }
            None => self.matrix,
        };
        ctx.push_uniforms();
        ctx.uniforms_mut()
            .set("modelTransform", UniformValue::Mat4(composed));
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        ctx.pop_uniforms();
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// Transform variant for mirrored geometry.
///
/// Reserved as the place to flip back-face culling for the subtree; until a
/// culling policy lands this behaves exactly like [`Transform`].
pub struct Mirror {
    transform: Transform,
}

impl Mirror {
    pub fn new(matrix: Matrix4<f32>, children: Vec<Box<dyn Node>>) -> Self {
        Self {
            transform: Transform::new(matrix, children),
        }
    }
}

impl Node for Mirror {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        self.transform.enter(ctx)
    }

    fn exit(&self, ctx: &mut RenderContext) {
        self.transform.exit(ctx)
    }

    fn children(&self) -> &[Box<dyn Node>] {
        self.transform.children()
    }
}

/// Redirects its subtree's pixel output to an offscreen surface.
///
/// Only output is redirected: the viewport is restored on `exit`, and the
/// node stays out of the shader/uniform scoping chain entirely.
pub struct RenderTarget {
    surface: Rc<dyn TargetSurface>,
    pub children: Vec<Box<dyn Node>>,
}

impl RenderTarget {
    pub fn new(surface: Rc<dyn TargetSurface>, children: Vec<Box<dyn Node>>) -> Self {
        Self { surface, children }
    }
}

impl Node for RenderTarget {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        self.surface.bind();
        let (width, height) = (self.surface.width(), self.surface.height());
        ctx.device_mut().viewport(0, 0, width, height);
        ctx.device_mut().clear(ClearFlags::COLOR | ClearFlags::DEPTH);
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        self.surface.unbind();
        let (width, height) = (ctx.viewport_width(), ctx.viewport_height());
        ctx.device_mut().viewport(0, 0, width, height);
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// Leaf node issuing one draw call with whatever state is in scope.
///
/// Not a container: it overrides [`visit`](Node::visit) directly. The draw
/// reads the active shader from the shader stack and the inputs from the
/// currently visible uniform scope, so the same mesh can be reused under
/// different materials and transforms.
pub struct SimpleMesh {
    buffer: Rc<dyn VertexBuffer>,
    topology: Primitive,
}

impl SimpleMesh {
    pub fn new(buffer: Rc<dyn VertexBuffer>) -> Self {
        Self {
            buffer,
            topology: Primitive::Triangles,
        }
    }

    pub fn with_topology(buffer: Rc<dyn VertexBuffer>, topology: Primitive) -> Self {
        Self { buffer, topology }
    }
}

impl Node for SimpleMesh {
    fn visit(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        let shader = ctx.shader()?;
        let location = shader
            .attrib_location("position")
            .ok_or_else(|| DrawError::MissingAttribute("position".into()))?;

        self.buffer.bind();
        self.buffer.attrib_pointer(location);

        let result = shader.apply_uniforms(ctx.uniforms());
        if result.is_ok() {
            ctx.record_draw(self.buffer.len());
            self.buffer.draw(self.topology);
        }
        self.buffer.unbind();
        result
    }
}

/// A cube that follows the camera.
///
/// Wraps a material around the cube mesh and re-publishes
/// `worldViewProjection` with the translation stripped from the inherited
/// view matrix, so the box stays centred on the camera wherever it moves.
pub struct Skybox {
    children: Vec<Box<dyn Node>>,
}

impl Skybox {
    /// `cube` is the uploaded buffer for [`crate::resources::mesh::cube`]
    /// data.
    pub fn new(
        cube: Rc<dyn VertexBuffer>,
        shader: Rc<dyn ShaderProgram>,
        entries: Vec<(String, UniformValue)>,
    ) -> Self {
        let mesh = SimpleMesh::new(cube);
        let material = Material::new(shader, entries, vec![Box::new(mesh)]);
        Self {
            children: vec![Box::new(material)],
        }
    }
}

impl Node for Skybox {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        let world_view = match ctx.uniforms().get("worldView") {
            Some(UniformValue::Mat4(matrix)) => *matrix,
            _ => return Err(DrawError::SkyboxOutsideCamera("worldView")),
        };
        let projection = match ctx.uniforms().get("projection") {
            Some(UniformValue::Mat4(matrix)) => *matrix,
            _ => return Err(DrawError::SkyboxOutsideCamera("projection")),
        };
        // Rotation-only view: keep the upper-left 3x3, widen back to mat4.
        let rotation = Matrix4::from(Matrix3::from_cols(
            world_view.x.truncate(),
            world_view.y.truncate(),
            world_view.z.truncate(),
        ));
        ctx.push_uniforms();
        ctx.uniforms_mut().set(
            "worldViewProjection",
            UniformValue::Mat4(projection * rotation),
        );
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        ctx.pop_uniforms();
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}

/// Full-screen pass: a material wrapping a screen-filling quad.
///
/// No state of its own; the interesting inputs (the texture of a previous
/// pass, usually) arrive through the material's entries.
pub struct Postprocess {
    children: Vec<Box<dyn Node>>,
}

impl Postprocess {
    /// `quad` is the uploaded buffer for
    /// [`crate::resources::mesh::screen_quad`] data.
    pub fn new(
        quad: Rc<dyn VertexBuffer>,
        shader: Rc<dyn ShaderProgram>,
        entries: Vec<(String, UniformValue)>,
    ) -> Self {
        let mesh = SimpleMesh::new(quad);
        let material = Material::new(shader, entries, vec![Box::new(mesh)]);
        Self {
            children: vec![Box::new(material)],
        }
    }
}

impl Node for Postprocess {
    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}
