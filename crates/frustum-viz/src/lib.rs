//! Drawing helpers for the frustum viewer.

use std::hash::{Hash, Hasher};

use frustum_clip::{Frustum, FrustumClass};
use macroquad::models::{draw_mesh, Mesh, Vertex};
use macroquad::prelude::*;
use nalgebra::{Point3, Vector3};

/// Generates a deterministic color from a polygon's vertices using hashing.
pub fn polygon_color(vertices: &[Vector3<f32>]) -> Color {
    let mut hasher = std::collections::hash_map::DefaultHasher::new();
    for v in vertices {
        v.x.to_bits().hash(&mut hasher);
        v.y.to_bits().hash(&mut hasher);
        v.z.to_bits().hash(&mut hasher);
    }
    let hash = hasher.finish();

    let r = (((hash >> 16) & 0xFF) as u8).max(40);
    let g = (((hash >> 8) & 0xFF) as u8).max(40);
    let b = ((hash & 0xFF) as u8).max(40);

    Color::from_rgba(r, g, b, 255)
}

/// Color used for a classification result.
pub fn class_color(class: FrustumClass) -> Color {
    match class {
        FrustumClass::Outside => GRAY,
        FrustumClass::Inside => GREEN,
        FrustumClass::Covered => SKYBLUE,
        FrustumClass::Partial => ORANGE,
    }
}

fn to_vec3(origin: &Point3<f32>, v: &Vector3<f32>) -> Vec3 {
    vec3(origin.x + v.x, origin.y + v.y, origin.z + v.z)
}

/// Draws a convex polygon (vertices relative to `origin`) with a fan mesh.
pub fn draw_polygon(origin: &Point3<f32>, vertices: &[Vector3<f32>], color: Color) {
    if vertices.len() < 3 {
        return;
    }

    let mesh_vertices: Vec<Vertex> = vertices
        .iter()
        .map(|v| Vertex::new2(to_vec3(origin, v), vec2(0.0, 0.0), color))
        .collect();

    // Both windings so the polygon shows from either side.
    let mut indices: Vec<u16> = Vec::with_capacity((vertices.len() - 2) * 6);
    for i in 1..vertices.len() - 1 {
        indices.extend_from_slice(&[0, i as u16, (i + 1) as u16]);
        indices.extend_from_slice(&[0, (i + 1) as u16, i as u16]);
    }

    draw_mesh(&Mesh {
        vertices: mesh_vertices,
        indices,
        texture: None,
    });
}

/// Outline of a polygon relative to `origin`.
pub fn draw_outline(origin: &Point3<f32>, vertices: &[Vector3<f32>], color: Color) {
    for (i, v) in vertices.iter().enumerate() {
        let next = &vertices[(i + 1) % vertices.len()];
        draw_line_3d(to_vec3(origin, v), to_vec3(origin, next), color);
    }
}

/// Draws the side rays of `frustum`, extended to `length` times each
/// boundary vertex, and its boundary polygon.
pub fn draw_frustum(frustum: &Frustum, length: f32, color: Color) {
    let origin = frustum.origin();
    let apex = to_vec3(origin, &Vector3::zeros());
    for v in frustum.vertices() {
        draw_line_3d(apex, to_vec3(origin, &(v * length)), color);
    }
    draw_outline(origin, frustum.vertices(), color);

    let far: Vec<Vector3<f32>> = frustum.vertices().iter().map(|v| v * length).collect();
    draw_outline(origin, &far, color);
}

/// Simple orbit camera for 3D scene navigation.
pub struct OrbitCamera {
    pub distance: f32,
    pub yaw: f32,
    pub pitch: f32,
    pub target: Vec3,
    /// Multiplier for scroll wheel zoom
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl OrbitCamera {
    pub fn new(distance: f32, yaw: f32, pitch: f32) -> Self {
        Self {
            distance,
            yaw,
            pitch,
            target: vec3(0.0, 0.0, 0.0),
            zoom_speed: 1.0,
            min_distance: 2.0,
            max_distance: 60.0,
        }
    }

    /// Sets the camera target point.
    pub fn with_target(mut self, target: Vec3) -> Self {
        self.target = target;
        self
    }

    /// Updates camera state from mouse drag and scroll.
    pub fn update(&mut self) {
        if is_mouse_button_down(MouseButton::Left) {
            let delta = mouse_delta_position();
            self.yaw -= delta.x * 2.0;
            self.pitch -= delta.y * 2.0;
        }
        self.pitch = self.pitch.clamp(-1.5, 1.5);

        let scroll = mouse_wheel().1;
        self.distance = (self.distance - scroll * self.zoom_speed)
            .clamp(self.min_distance, self.max_distance);
    }

    pub fn position(&self) -> Vec3 {
        let x = self.distance * self.pitch.cos() * self.yaw.sin();
        let y = self.distance * self.pitch.sin();
        let z = self.distance * self.pitch.cos() * self.yaw.cos();
        self.target + vec3(x, y, z)
    }

    pub fn to_camera3d(&self) -> Camera3D {
        Camera3D {
            position: self.position(),
            up: vec3(0.0, 1.0, 0.0),
            target: self.target,
            ..Default::default()
        }
    }
}
