//! Camera node: view and projection state for a subtree.

use cgmath::{perspective, Deg, Matrix4, Rad, Vector3, Vector4};

use crate::context::RenderContext;
use crate::data_structures::scene_graph::Node;
use crate::data_structures::uniforms::UniformValue;
use crate::error::DrawError;

/// Installs `worldViewProjection`, `worldView`, `projection` and `eye` for
/// its subtree.
///
/// A camera nested inside another camera's subtree fully overrides it;
/// view state never composes the way transforms do.
pub struct Camera {
    pub position: Vector3<f32>,
    pub pitch: Rad<f32>,
    pub yaw: Rad<f32>,
    pub near: f32,
    pub far: f32,
    pub fov: Deg<f32>,
    pub children: Vec<Box<dyn Node>>,
}

impl Camera {
    /// A camera at (0, 0, 10) looking down the negative z axis, with a 50°
    /// vertical field of view and a 0.1–5000 clip range.
    pub fn new(children: Vec<Box<dyn Node>>) -> Self {
        Self {
            position: Vector3::new(0.0, 0.0, 10.0),
            pitch: Rad(0.0),
            yaw: Rad(0.0),
            near: 0.1,
            far: 5000.0,
            fov: Deg(50.0),
            children,
        }
    }

    /// World-to-view matrix: pitch about x, yaw about y, then the negated
    /// position.
    pub fn world_view(&self) -> Matrix4<f32> {
        Matrix4::from_angle_x(self.pitch)
            * Matrix4::from_angle_y(self.yaw)
            * Matrix4::from_translation(-self.position)
    }

    /// Perspective projection for the given viewport aspect ratio.
    pub fn projection(&self, aspect: f32) -> Matrix4<f32> {
        perspective(self.fov, aspect, self.near, self.far)
    }

    /// Transforms a homogeneous point into normalized device coordinates,
    /// perspective-dividing by the resulting w.
    ///
    /// Off-traversal helper for callers placing overlays or labels; not
    /// part of the per-frame draw path.
    pub fn project(&self, point: Vector4<f32>, ctx: &RenderContext) -> Vector4<f32> {
        let view_projection = self.projection(ctx.aspect()) * self.world_view();
        let projected = view_projection * point;
        projected / projected.w
    }
}

impl Node for Camera {
    fn enter(&self, ctx: &mut RenderContext) -> Result<(), DrawError> {
        let projection = self.projection(ctx.aspect());
        let world_view = self.world_view();
        ctx.push_uniforms();
        let scope = ctx.uniforms_mut();
        scope.set(
            "worldViewProjection",
            UniformValue::Mat4(projection * world_view),
        );
        scope.set("worldView", UniformValue::Mat4(world_view));
        scope.set("projection", UniformValue::Mat4(projection));
        scope.set("eye", UniformValue::Vec3(self.position));
        Ok(())
    }

    fn exit(&self, ctx: &mut RenderContext) {
        ctx.pop_uniforms();
    }

    fn children(&self) -> &[Box<dyn Node>] {
        &self.children
    }
}
