//! The scene consumed by the G-buffer stage.
//!
//! The pipeline treats a scene as an iterable list of objects plus a
//! background color. Objects carry no material of their own beyond a tint:
//! the encoding applied to each render (shaded color, normals, positions) is
//! chosen by the pass, never written into the objects, so there is no
//! override state to forget to reset.

use std::sync::Arc;

use crate::color::Color;
use crate::mesh::{Mesh, Transform};

/// One renderable object: shared geometry, a transform, and a tint.
pub struct SceneObject {
    pub mesh: Arc<Mesh>,
    pub transform: Transform,
    pub color: Color,
}

impl SceneObject {
    pub fn new(mesh: Arc<Mesh>, transform: Transform, color: Color) -> Self {
        Self {
            mesh,
            transform,
            color,
        }
    }
}

/// A list of objects and a background color.
pub struct Scene {
    pub objects: Vec<SceneObject>,
    pub background: Color,
}

impl Default for Scene {
    fn default() -> Self {
        Self {
            objects: Vec::new(),
            background: Color::rgb(0.8, 0.8, 0.8),
        }
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, object: SceneObject) -> usize {
        self.objects.push(object);
        self.objects.len() - 1
    }
}
