/**
 * Built-in CPU-side mesh data for the canned scene-graph helpers. Buffer
 * upload stays with the backend; these only produce the positions.
 */
pub mod mesh;
