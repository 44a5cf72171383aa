use frustum_clip::{Frustum, Plane3D};
use frustum_viz::{class_color, draw_frustum, draw_outline, draw_polygon, polygon_color, OrbitCamera};
use macroquad::prelude::*;
use nalgebra::{Point3, Rotation3, Vector3};

const MOVE_SPEED: f32 = 2.0;
const TURN_SPEED: f32 = 1.5;
const FAR_DEPTH: f32 = 8.0;

/// Square view frustum looking down +z from the origin, capped at `FAR_DEPTH`.
fn view_frustum() -> Frustum {
    let boundary = [
        Vector3::new(1.0, 1.0, 2.0),
        Vector3::new(1.0, -1.0, 2.0),
        Vector3::new(-1.0, -1.0, 2.0),
        Vector3::new(-1.0, 1.0, 2.0),
    ];
    let cap = Plane3D::new(Vector3::new(0.0, 0.0, -1.0), -FAR_DEPTH);
    Frustum::from_vertices(Point3::origin(), &boundary, Some(&cap))
}

/// Query quad, relative to the frustum origin.
struct Probe {
    center: Vector3<f32>,
    angle: f32,
    half_size: f32,
}

impl Probe {
    fn update(&mut self, dt: f32) {
        let step = MOVE_SPEED * dt;
        if is_key_down(KeyCode::A) {
            self.center.x -= step;
        }
        if is_key_down(KeyCode::D) {
            self.center.x += step;
        }
        if is_key_down(KeyCode::W) {
            self.center.y += step;
        }
        if is_key_down(KeyCode::S) {
            self.center.y -= step;
        }
        if is_key_down(KeyCode::R) {
            self.center.z += step;
        }
        if is_key_down(KeyCode::F) {
            self.center.z = (self.center.z - step).max(0.5);
        }
        if is_key_down(KeyCode::Q) {
            self.angle += TURN_SPEED * dt;
        }
        if is_key_down(KeyCode::E) {
            self.angle -= TURN_SPEED * dt;
        }
        if is_key_pressed(KeyCode::Equal) {
            self.half_size *= 1.25;
        }
        if is_key_pressed(KeyCode::Minus) {
            self.half_size /= 1.25;
        }
    }

    fn vertices(&self) -> Vec<Vector3<f32>> {
        let rotation = Rotation3::from_axis_angle(&Vector3::y_axis(), self.angle);
        let h = self.half_size;
        [(h, h), (h, -h), (-h, -h), (-h, h)]
            .iter()
            .map(|&(x, y)| self.center + rotation * Vector3::new(x, y, 0.0))
            .collect()
    }
}

#[macroquad::main("Frustum Clipping")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info,frustum_clip=debug".into()))
        .init();

    let frustum = view_frustum();
    let normals = Frustum::edge_normals(frustum.vertices());
    tracing::info!(
        vertices = frustum.vertex_count(),
        far = FAR_DEPTH,
        "view frustum ready"
    );

    let mut probe = Probe {
        center: Vector3::new(0.5, 0.3, 4.0),
        angle: 0.3,
        half_size: 1.0,
    };
    let mut camera = OrbitCamera::new(14.0, 0.9, 0.4).with_target(vec3(0.0, 0.0, 4.0));
    let mut last_class = None;

    loop {
        camera.update();
        probe.update(get_frame_time());

        let polygon = probe.vertices();
        let class = Frustum::batch_classify(frustum.vertices(), &normals, &polygon);
        let clipped = frustum.intersect_polygon(&polygon);

        if let Ok(class) = &class {
            if last_class != Some(*class) {
                tracing::debug!(?class, "probe classification changed");
                last_class = Some(*class);
            }
        }

        clear_background(Color::from_rgba(15, 15, 25, 255));
        set_camera(&camera.to_camera3d());

        draw_frustum(&frustum, FAR_DEPTH / 2.0, YELLOW);
        draw_outline(frustum.origin(), &polygon, WHITE);
        if let Some(clipped) = &clipped {
            draw_polygon(clipped.origin(), clipped.vertices(), polygon_color(clipped.vertices()));
        }

        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(2.0, 0.0, 0.0), RED);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 2.0, 0.0), GREEN);
        draw_line_3d(vec3(0.0, 0.0, 0.0), vec3(0.0, 0.0, 2.0), BLUE);

        set_default_camera();

        match class {
            Ok(class) => draw_text(&format!("Classify: {class:?}"), 10.0, 25.0, 24.0, class_color(class)),
            Err(err) => draw_text(&format!("Classify failed: {err}"), 10.0, 25.0, 24.0, RED),
        };
        let kept = clipped.as_ref().map_or(0, Frustum::vertex_count);
        draw_text(&format!("Clipped polygon: {kept} vertices"), 10.0, 50.0, 18.0, GRAY);
        draw_text(
            "WASD/RF move, QE turn, +/- resize, drag to orbit, scroll to zoom",
            10.0,
            75.0,
            16.0,
            DARKGRAY,
        );
        draw_text(&format!("FPS: {}", get_fps()), 10.0, 95.0, 16.0, DARKGRAY);

        next_frame().await
    }
}
