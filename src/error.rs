use thiserror::Error;

/// Errors surfaced while drawing a frame.
///
/// All of these indicate an incorrectly assembled scene or an invalid
/// collaborator handle, so none of them are retried: the failing `draw`
/// aborts with the error (the traversal still unwinds every scope it
/// opened) and the frame is simply not presented. The caller may draw a
/// corrected tree on a later frame.
#[derive(Error, Debug)]
pub enum DrawError {
    /// A mesh was reached with an empty shader stack. Every subtree that
    /// draws must sit below at least one material.
    #[error("draw call reached with no active shader; every mesh must sit below a material")]
    NoActiveShader,

    /// The active shader does not expose the requested vertex attribute.
    #[error("shader has no `{0}` vertex attribute")]
    MissingAttribute(String),

    /// A uniform name the shader reads was never published into scope.
    #[error("uniform `{0}` is not in scope")]
    MissingUniform(String),

    /// A skybox was entered outside any camera subtree, so the view state
    /// it re-derives is missing.
    #[error("skybox needs `{0}` in scope; place it below a camera")]
    SkyboxOutsideCamera(&'static str),

    /// A collaborator handle (texture, buffer, program, target) was invalid
    /// or unbound.
    #[error("resource error: {0}")]
    Resource(String),
}
