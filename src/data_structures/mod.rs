//! Engine data structures: shader-input scopes and the scene tree.
//!
//! This module contains the core data types for scene representation:
//!
//! - `uniforms` holds named shader-input values and their layered scope
//! - `scene_graph` enables hierarchical scene organization and traversal

pub mod scene_graph;
pub mod uniforms;
