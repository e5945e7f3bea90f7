/// Axis-aligned cube spanning ±`scale`, as 36 raw positions (12 triangles,
/// counter-clockwise seen from outside). Upload the result into a vertex
/// buffer and hand it to a skybox or any other cube-shaped node.
pub fn cube(scale: f32) -> Vec<[f32; 3]> {
    let s = scale;
    vec![
        // +z
        [-s, -s, s],
        [s, -s, s],
        [s, s, s],
        [-s, -s, s],
        [s, s, s],
        [-s, s, s],
        // -z
        [s, -s, -s],
        [-s, -s, -s],
        [-s, s, -s],
        [s, -s, -s],
        [-s, s, -s],
        [s, s, -s],
        // -x
        [-s, -s, -s],
        [-s, -s, s],
        [-s, s, s],
        [-s, -s, -s],
        [-s, s, s],
        [-s, s, -s],
        // +x
        [s, -s, s],
        [s, -s, -s],
        [s, s, -s],
        [s, -s, s],
        [s, s, -s],
        [s, s, s],
        // +y
        [-s, s, s],
        [s, s, s],
        [s, s, -s],
        [-s, s, s],
        [s, s, -s],
        [-s, s, -s],
        // -y
        [-s, -s, -s],
        [s, -s, -s],
        [s, -s, s],
        [-s, -s, -s],
        [s, -s, s],
        [-s, -s, s],
    ]
}

/// Two triangles covering the whole of normalized device space, for
/// full-screen postprocess passes.
pub fn screen_quad() -> Vec<[f32; 3]> {
    vec![
        [-1.0, -1.0, 0.0],
        [1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, -1.0, 0.0],
        [1.0, 1.0, 0.0],
        [-1.0, 1.0, 0.0],
    ]
}
