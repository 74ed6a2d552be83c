use crate::math::vec2::Vec2;
use crate::objects::RigidBody;
use crate::shapes::{Circle, Polygon, Shape};

use super::result::CollisionResult;

/// Contact points closer than this are treated as the same point.
pub const CONTACT_TOLERANCE: f64 = 0.0005;

/// Tests two shapes using their world geometry as of the last refresh.
///
/// Bounding boxes are checked first; the exact test only runs when they overlap.
/// The returned direction points from `a` toward `b`.
pub fn intersects(a: &Shape, b: &Shape) -> CollisionResult {
    if !a.bounding_box().overlaps(&b.bounding_box()) {
        return CollisionResult::miss();
    }

    match (a, b) {
        (Shape::Circle(ca), Shape::Circle(cb)) => check_circle_circle(ca, cb),
        (Shape::Polygon(pa), Shape::Polygon(pb)) => check_polygon_polygon(pa, pb),
        (Shape::Circle(c), Shape::Polygon(p)) => check_circle_polygon(c, p),
        (Shape::Polygon(p), Shape::Circle(c)) => check_polygon_circle(p, c),
    }
}

/// Tests every shape of `a` against every shape of `b` and returns the first
/// intersecting pair, with `body_shape`/`other_shape` filled in.
pub fn intersects_bodies(a: &RigidBody, b: &RigidBody) -> CollisionResult {
    for (i, shape_a) in a.shapes().iter().enumerate() {
        for (j, shape_b) in b.shapes().iter().enumerate() {
            let mut result = intersects(shape_a, shape_b);
            if result.intersects {
                result.body_shape = i;
                result.other_shape = j;
                return result;
            }
        }
    }
    CollisionResult::miss()
}

/// Checks for collision between two circles.
pub fn check_circle_circle(a: &Circle, b: &Circle) -> CollisionResult {
    let dist_vec = b.world_center() - a.world_center();
    let dist_sq = dist_vec.magnitude_squared();
    let radii_sum = a.world_radius() + b.world_radius();

    if dist_sq >= radii_sum * radii_sum {
        return CollisionResult::miss();
    }

    let distance = dist_sq.sqrt();
    let direction = if distance > 1e-10 {
        dist_vec * (1.0 / distance)
    } else {
        // Concentric circles, any axis separates them
        Vec2::new(0.0, 1.0)
    };

    let mut result = CollisionResult::hit(radii_sum - distance, direction);
    // Point on b's surface facing a
    result.push_contact(b.world_center() - direction * b.world_radius());
    result
}

/// Finds the point on a line segment closest to a given point.
/// Returns the closest point and the parameter `t` (0 <= t <= 1) along the segment.
fn closest_point_on_segment(segment_a: Vec2, segment_b: Vec2, point: Vec2) -> (Vec2, f64) {
    let segment_vec = segment_b - segment_a;
    let length_sq = segment_vec.magnitude_squared();
    if length_sq < 1e-12 {
        return (segment_a, 0.0);
    }

    let t = ((point - segment_a).dot(segment_vec) / length_sq).clamp(0.0, 1.0);
    (segment_a + segment_vec * t, t)
}

/// Unit normals of every polygon edge, zero for degenerate edges.
fn edge_axes(vertices: &[Vec2]) -> impl Iterator<Item = Vec2> + '_ {
    let n = vertices.len();
    (0..n).map(move |i| (vertices[(i + 1) % n] - vertices[i]).perpendicular().normalize())
}

fn project_vertices(vertices: &[Vec2], axis: Vec2) -> (f64, f64) {
    let mut min_proj = f64::INFINITY;
    let mut max_proj = f64::NEG_INFINITY;
    for vertex in vertices {
        let projection = vertex.dot(axis);
        min_proj = min_proj.min(projection);
        max_proj = max_proj.max(projection);
    }
    (min_proj, max_proj)
}

fn project_circle(circle: &Circle, axis: Vec2) -> (f64, f64) {
    let center = circle.world_center().dot(axis);
    (center - circle.world_radius(), center + circle.world_radius())
}

/// Overlap of two projection intervals, `None` if the axis separates them.
/// Touching intervals count as separated.
#[inline]
fn interval_overlap((min_a, max_a): (f64, f64), (min_b, max_b): (f64, f64)) -> Option<f64> {
    if min_a >= max_b || min_b >= max_a {
        None
    } else {
        Some((max_b - min_a).min(max_a - min_b))
    }
}

/// Minimum-translation axis over `axes`, or `None` if any of them separates the shapes.
fn min_overlap_axis(
    axes: impl Iterator<Item = Vec2>,
    mut project: impl FnMut(Vec2) -> ((f64, f64), (f64, f64)),
) -> Option<(f64, Vec2)> {
    let mut min_overlap = f64::INFINITY;
    let mut mtv_axis = Vec2::ZERO;

    for axis in axes {
        if axis.magnitude_squared() < 1e-10 {
            continue;
        }
        let (proj_a, proj_b) = project(axis);
        let overlap = interval_overlap(proj_a, proj_b)?;
        if overlap < min_overlap {
            min_overlap = overlap;
            mtv_axis = axis;
        }
    }

    if min_overlap.is_finite() {
        Some((min_overlap, mtv_axis))
    } else {
        None
    }
}

/// Orients `axis` so it points along `from -> to`.
fn orient(axis: Vec2, from: Vec2, to: Vec2) -> Vec2 {
    if (to - from).dot(axis) < 0.0 {
        -axis
    } else {
        axis
    }
}

/// Checks for collision between two convex polygons using SAT.
pub fn check_polygon_polygon(a: &Polygon, b: &Polygon) -> CollisionResult {
    let verts_a = a.world_vertices();
    let verts_b = b.world_vertices();

    let axes = edge_axes(verts_a).chain(edge_axes(verts_b));
    let Some((depth, axis)) = min_overlap_axis(axes, |axis| {
        (project_vertices(verts_a, axis), project_vertices(verts_b, axis))
    }) else {
        return CollisionResult::miss();
    };

    let direction = orient(axis, a.world_center(), b.world_center());
    let mut result = CollisionResult::hit(depth, direction);
    result.set_contacts(&polygon_contact_points(verts_a, verts_b));
    result
}

/// Closest vertex-to-edge points between two polygons, up to two of them.
fn polygon_contact_points(verts_a: &[Vec2], verts_b: &[Vec2]) -> Vec<Vec2> {
    let mut min_dist = f64::INFINITY;
    let mut first = Vec2::ZERO;
    let mut second = None;

    let mut visit = |points: &[Vec2], edges: &[Vec2]| {
        let n = edges.len();
        for &point in points {
            for i in 0..n {
                let (closest, _) = closest_point_on_segment(edges[i], edges[(i + 1) % n], point);
                let dist = point.distance(closest);

                if (dist - min_dist).abs() < CONTACT_TOLERANCE {
                    if closest.distance(first) >= CONTACT_TOLERANCE {
                        second = Some(closest);
                    }
                } else if dist < min_dist {
                    min_dist = dist;
                    first = closest;
                    second = None;
                }
            }
        }
    };
    visit(verts_a, verts_b);
    visit(verts_b, verts_a);

    if !min_dist.is_finite() {
        return Vec::new();
    }
    let mut contacts = vec![first];
    contacts.extend(second);
    contacts
}

/// Checks for collision between a circle and a polygon using SAT.
/// The direction points from the circle toward the polygon.
pub fn check_circle_polygon(circle: &Circle, polygon: &Polygon) -> CollisionResult {
    let center = circle.world_center();
    let vertices = polygon.world_vertices();

    let closest_vertex = vertices
        .iter()
        .copied()
        .min_by(|p, q| p.distance_squared(center).total_cmp(&q.distance_squared(center)))
        .unwrap_or(center);
    let vertex_axis = (closest_vertex - center).normalize();

    let axes = edge_axes(vertices).chain(std::iter::once(vertex_axis));
    let Some((depth, axis)) = min_overlap_axis(axes, |axis| {
        (project_circle(circle, axis), project_vertices(vertices, axis))
    }) else {
        return CollisionResult::miss();
    };

    let direction = orient(axis, center, polygon.world_center());
    let mut result = CollisionResult::hit(depth, direction);
    if let Some(point) = closest_point_on_boundary(vertices, center) {
        result.push_contact(point);
    }
    result
}

/// Same test with the arguments swapped; the direction points from the polygon toward the circle.
pub fn check_polygon_circle(polygon: &Polygon, circle: &Circle) -> CollisionResult {
    let mut result = check_circle_polygon(circle, polygon);
    result.direction = -result.direction;
    result
}

fn closest_point_on_boundary(vertices: &[Vec2], point: Vec2) -> Option<Vec2> {
    let n = vertices.len();
    (0..n)
        .map(|i| closest_point_on_segment(vertices[i], vertices[(i + 1) % n], point).0)
        .min_by(|p, q| p.distance_squared(point).total_cmp(&q.distance_squared(point)))
}
