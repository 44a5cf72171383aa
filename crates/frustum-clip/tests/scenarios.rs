//! End-to-end behaviour through the public API.

use approx::{assert_abs_diff_eq, assert_relative_eq};
use frustum_clip::{
    clip_edge_with_info, clip_plane_with_info, ClipInfo, Frustum, FrustumClass, Plane3D,
    PoolConfig, Segment3, VertexArrayPool,
};
use nalgebra::{Isometry3, Point3, Translation3, UnitQuaternion, Vector2, Vector3};

fn square() -> Vec<Vector3<f32>> {
    vec![
        Vector3::new(1.0, 1.0, 1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-1.0, 1.0, 1.0),
    ]
}

fn big_triangle() -> [Vector3<f32>; 3] {
    [
        Vector3::new(0.0, 2.0, 1.0),
        Vector3::new(2.0, -1.0, 1.0),
        Vector3::new(-2.0, -1.0, 1.0),
    ]
}

fn small_triangle() -> [Vector3<f32>; 3] {
    [
        Vector3::new(0.0, 1.0, 1.0),
        Vector3::new(1.0, -0.5, 1.0),
        Vector3::new(-1.0, -0.5, 1.0),
    ]
}

#[test]
fn square_clipped_to_half_space() {
    let mut f = Frustum::from_vertices(Point3::origin(), &square(), None);
    f.clip_poly_to_plane(&Plane3D::new(Vector3::x(), 0.0));

    assert_eq!(f.vertex_count(), 4);
    let on_plane = f.vertices().iter().filter(|v| v.x.abs() < 1e-6).count();
    assert_eq!(on_plane, 2);
    assert!(f.vertices().iter().all(|v| v.x >= 0.0));
    assert!(f.vertices().contains(&Vector3::new(1.0, 1.0, 1.0)));
    assert!(f.vertices().contains(&Vector3::new(1.0, -1.0, 1.0)));
}

#[test]
fn triangle_inside_and_covered() {
    assert_eq!(
        Frustum::classify(&big_triangle(), &small_triangle()).unwrap(),
        FrustumClass::Inside
    );
    assert_eq!(
        Frustum::classify(&small_triangle(), &big_triangle()).unwrap(),
        FrustumClass::Covered
    );
}

#[test]
fn disjoint_polygon_outside() {
    let frustum = [
        Vector3::new(2.0, 1.0, 1.0),
        Vector3::new(2.0, -1.0, 1.0),
        Vector3::new(1.0, -1.0, 1.0),
        Vector3::new(1.0, 1.0, 1.0),
    ];
    let polygon = [
        Vector3::new(-1.0, 1.0, 1.0),
        Vector3::new(-1.0, -1.0, 1.0),
        Vector3::new(-2.0, -1.0, 1.0),
        Vector3::new(-2.0, 1.0, 1.0),
    ];
    assert_eq!(Frustum::classify(&frustum, &polygon).unwrap(), FrustumClass::Outside);

    let normals = Frustum::edge_normals(&frustum);
    assert_eq!(
        Frustum::batch_classify(&frustum, &normals, &polygon).unwrap(),
        FrustumClass::Outside
    );
}

#[test]
fn infinite_frustum_keeps_segment() {
    let mut f = Frustum::from_vertices(Point3::origin(), &square(), None);
    f.make_infinite();

    let mut segment = Segment3::new(Point3::new(-10.0, 4.0, 2.0), Point3::new(3.0, -8.0, 0.5));
    let before = segment;
    assert!(f.intersect_segment(&mut segment));
    assert_eq!(segment, before);
}

#[test]
fn segment_straddling_back_plane() {
    let mut f = Frustum::infinite(Point3::origin());
    // Visible side is z < 5.
    f.set_back_plane(&Plane3D::new(Vector3::new(0.0, 0.0, -1.0), -5.0));
    assert!(f.is_wide());
    assert!(!f.is_infinite());

    let mut segment = Segment3::new(Point3::origin(), Point3::new(0.0, 0.0, 10.0));
    assert!(f.intersect_segment(&mut segment));
    assert_abs_diff_eq!(segment.start.z, 0.0);
    assert_relative_eq!(segment.end.z, 5.0, epsilon = 1e-5);
    assert_abs_diff_eq!(segment.end.x, 0.0);
}

#[test]
fn empty_clip_then_fresh_polygon() {
    let mut f = Frustum::from_vertices(Point3::origin(), &square(), None);
    f.clip_poly_to_plane(&Plane3D::new(Vector3::z(), 3.0));
    assert!(f.is_empty());

    f.add_vertex(Vector3::new(0.0, 1.0, 1.0));
    assert_eq!(f.vertex_count(), 1);
    assert!(!f.is_empty());
}

#[test]
fn clipping_a_clone_leaves_original() {
    let original = Frustum::from_vertices(Point3::origin(), &square(), None);
    let mut copy = original.clone();
    copy.clip_poly_to_plane(&Plane3D::new(Vector3::x(), 10.0));
    assert!(copy.is_empty());
    assert_eq!(original.vertex_count(), 4);
}

#[test]
fn repeated_clip_is_stable() {
    let plane = Plane3D::new(Vector3::y(), -0.25);
    let mut f = Frustum::from_vertices(Point3::origin(), &square(), None);
    f.clip_poly_to_plane(&plane);
    let once: Vec<_> = f.vertices().to_vec();
    f.clip_poly_to_plane(&plane);
    assert_eq!(f.vertices(), once.as_slice());
}

#[test]
fn inside_implies_contained() {
    let f = Frustum::from_vertices(Point3::origin(), &big_triangle(), None);
    assert_eq!(f.classify_polygon(&small_triangle()).unwrap(), FrustumClass::Inside);
    assert!(small_triangle().iter().all(|v| f.contains(v)));
}

#[test]
fn triangle_outside_every_side_is_rejected() {
    let far = [
        Vector3::new(5.0, 5.0, 1.0),
        Vector3::new(6.0, 4.0, 1.0),
        Vector3::new(4.0, 4.0, 1.0),
    ];
    let result =
        Frustum::intersect_triangle_with(Point3::origin(), &square(), &far[0], &far[1], &far[2]);
    assert!(result.unwrap().is_none());

    let f = Frustum::from_vertices(Point3::origin(), &square(), None);
    assert!(f.intersect_polygon(&far).is_none());
}

#[test]
fn provenance_resolves_texture_coordinates() {
    let uvs = [
        Vector2::new(1.0_f32, 0.0),
        Vector2::new(1.0, 1.0),
        Vector2::new(0.0, 1.0),
        Vector2::new(0.0, 0.0),
    ];
    let mut vertices = square();
    let mut info = ClipInfo::seed(vertices.len());

    // Keep x >= 0, then y <= 0.5.
    clip_edge_with_info(
        &mut vertices,
        &mut info,
        &Vector3::new(0.0, -1.0, 1.0),
        &Vector3::new(0.0, 1.0, 1.0),
    )
    .unwrap();
    clip_plane_with_info(&mut vertices, &mut info, &Plane3D::new(-Vector3::y(), -0.5)).unwrap();

    assert_eq!(vertices.len(), info.len());
    assert!(vertices.iter().all(|v| v.x >= -1e-6 && v.y <= 0.5 + 1e-6));

    // uv is linear in position here: u = (x + 1) / 2, v = (1 - y) / 2.
    for (vertex, record) in vertices.iter().zip(&info) {
        let uv = record.interpolate(&uvs).unwrap();
        assert_relative_eq!(uv.x, (vertex.x + 1.0) / 2.0, epsilon = 1e-5);
        assert_relative_eq!(uv.y, (1.0 - vertex.y) / 2.0, epsilon = 1e-5);
    }
}

#[test]
fn pool_round_trip() {
    let mut pool = VertexArrayPool::new(PoolConfig::default());
    for n in [3, 4, 5, 6, 7, 10, 11, 50] {
        let array = pool.allocate(n);
        pool.free(array, n).unwrap();
        let again = pool.allocate(n);
        assert_eq!(again.len(), n);
        pool.free(again, n).unwrap();
    }
}

#[test]
fn transformed_frustum_still_intersects() {
    let iso = Isometry3::from_parts(
        Translation3::new(0.0, 0.0, 5.0),
        UnitQuaternion::from_axis_angle(&Vector3::y_axis(), std::f32::consts::PI),
    );
    let mut f = Frustum::from_vertices(Point3::origin(), &square(), None);
    f.transform(&iso);

    // The frustum now looks down -z from (0, 0, 5).
    let mut segment = Segment3::new(Point3::new(0.0, 0.0, 4.0), Point3::new(0.0, 0.0, -20.0));
    assert!(f.intersect_segment(&mut segment));
    assert!(f.contains(&Vector3::new(0.0, 0.0, -2.0)));
}
