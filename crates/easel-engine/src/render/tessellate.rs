//! CPU tessellation of vector primitives into colored triangles.
//!
//! Strokes are one logical pixel wide and sit on pixel centers, so a line
//! from (10, 10) to (20, 10) covers exactly the pixel row starting at y = 10.
//! Fills are emitted before their outline so the stroke stays visible.

use std::f32::consts::TAU;

use bytemuck::{Pod, Zeroable};

use crate::coords::Vec2;
use crate::paint::Color;
use crate::scene::{ArcCmd, ArcKind, EllipseCmd, Primitive};

const STROKE_WIDTH: f32 = 1.0;
const PIXEL_CENTER: Vec2 = Vec2::new(0.5, 0.5);

/// Target distance between ellipse rim vertices, in logical pixels.
const RIM_STEP: f32 = 4.0;
const MIN_RIM_SEGMENTS: usize = 12;
const MAX_RIM_SEGMENTS: usize = 256;

#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, Pod, Zeroable)]
pub struct MeshVertex {
    pub pos: [f32; 2],   // logical px
    pub color: [f32; 4], // premultiplied
}

/// Indexed triangle list accumulated for one frame.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub vertices: Vec<MeshVertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.vertices.clear();
        self.indices.clear();
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    #[inline]
    pub fn index_count(&self) -> u32 {
        self.indices.len() as u32
    }

    fn vertex(&mut self, p: Vec2, color: [f32; 4]) -> u32 {
        let i = self.vertices.len() as u32;
        self.vertices.push(MeshVertex { pos: p.to_array(), color });
        i
    }

    fn quad(&mut self, a: Vec2, b: Vec2, c: Vec2, d: Vec2, color: [f32; 4]) {
        let ia = self.vertex(a, color);
        let ib = self.vertex(b, color);
        let ic = self.vertex(c, color);
        let id = self.vertex(d, color);
        self.indices.extend_from_slice(&[ia, ib, ic, ia, ic, id]);
    }

    fn pixel(&mut self, at: Vec2, color: [f32; 4]) {
        let Vec2 { x, y } = at;
        self.quad(
            Vec2::new(x, y),
            Vec2::new(x + 1.0, y),
            Vec2::new(x + 1.0, y + 1.0),
            Vec2::new(x, y + 1.0),
            color,
        );
    }

    /// One stroke segment with square caps.
    fn segment(&mut self, a: Vec2, b: Vec2, color: [f32; 4]) {
        let dir = (b - a).normalized();
        if dir == Vec2::zero() {
            self.pixel(a, color);
            return;
        }
        let half = STROKE_WIDTH * 0.5;
        let a = a + PIXEL_CENTER - dir * half;
        let b = b + PIXEL_CENTER + dir * half;
        let n = dir.perp() * half;
        self.quad(a + n, b + n, b - n, a - n, color);
    }

    fn stroke_path(&mut self, points: &[Vec2], closed: bool, color: [f32; 4]) {
        match points {
            [] => {}
            [p] => self.pixel(*p, color),
            _ => {
                for w in points.windows(2) {
                    self.segment(w[0], w[1], color);
                }
                if closed && points.len() > 2 {
                    self.segment(points[points.len() - 1], points[0], color);
                }
            }
        }
    }

    /// Triangles from `hub` to each consecutive pair of `rim` points.
    fn fan(&mut self, hub: Vec2, rim: &[Vec2], color: [f32; 4]) {
        if rim.len() < 2 {
            return;
        }
        let h = self.vertex(hub, color);
        let first = self.vertices.len() as u32;
        for p in rim {
            self.vertex(*p, color);
        }
        for i in 0..rim.len() as u32 - 1 {
            self.indices.extend_from_slice(&[h, first + i, first + i + 1]);
        }
    }

    fn fill_polygon(&mut self, points: &[Vec2], color: [f32; 4]) {
        let tris = triangulate(points);
        if tris.is_empty() {
            return;
        }
        let base = self.vertices.len() as u32;
        for p in points {
            self.vertex(*p, color);
        }
        for t in tris {
            self.indices.extend(t.iter().map(|i| base + i));
        }
    }
}

/// Appends triangles for a vector primitive.
///
/// Text and images are painted by their own batches and add nothing here.
/// Primitives with non-finite coordinates are skipped.
pub fn tessellate(primitive: &Primitive, mesh: &mut Mesh) {
    match primitive {
        Primitive::Line(cmd) => {
            if cmd.color.is_visible() && cmd.from.is_finite() && cmd.to.is_finite() {
                mesh.segment(cmd.from, cmd.to, cmd.color.to_array());
            }
        }

        Primitive::Ellipse(cmd) => ellipse(cmd, mesh),

        Primitive::Arc(cmd) => arc(cmd, mesh),

        Primitive::Polygon(cmd) => {
            if !cmd.points.iter().all(|p| p.is_finite()) {
                return;
            }
            if cmd.fill.is_visible() {
                mesh.fill_polygon(&cmd.points, cmd.fill.to_array());
            }
            if cmd.stroke.is_visible() {
                mesh.stroke_path(&cmd.points, true, cmd.stroke.to_array());
            }
        }

        Primitive::Polyline(cmd) => {
            if cmd.color.is_visible() && cmd.points.iter().all(|p| p.is_finite()) {
                mesh.stroke_path(&cmd.points, false, cmd.color.to_array());
            }
        }

        Primitive::Point(cmd) => {
            if cmd.color.is_visible() && cmd.at.is_finite() {
                mesh.pixel(cmd.at, cmd.color.to_array());
            }
        }

        Primitive::Points(cmd) => {
            if !cmd.color.is_visible() {
                return;
            }
            let color = cmd.color.to_array();
            for p in cmd.points.iter().filter(|p| p.is_finite()) {
                mesh.pixel(*p, color);
            }
        }

        Primitive::Text(_) | Primitive::Image(_) => {}
    }
}

fn rim_segments(r: Vec2) -> usize {
    let circumference = TAU * r.x.max(r.y);
    ((circumference / RIM_STEP).ceil() as usize).clamp(MIN_RIM_SEGMENTS, MAX_RIM_SEGMENTS)
}

fn ellipse(cmd: &EllipseCmd, mesh: &mut Mesh) {
    if !cmd.origin.is_finite() || !cmd.size.is_finite() {
        return;
    }
    let (center, r) = (cmd.center(), cmd.radii());
    let n = rim_segments(r);
    let rim: Vec<Vec2> = (0..=n)
        .map(|i| Vec2::on_ellipse(center, r, TAU * i as f32 / n as f32))
        .collect();

    if cmd.fill.is_visible() {
        mesh.fan(center, &rim, cmd.fill.to_array());
    }
    if cmd.stroke.is_visible() {
        // Outline runs half a pixel inside the rim so its outer edge lands on
        // the bounding box. Stroke geometry is re-centered on pixel centers.
        let inner = Vec2::new((r.x - 0.5).max(0.0), (r.y - 0.5).max(0.0));
        let outline: Vec<Vec2> = (0..=n)
            .map(|i| Vec2::on_ellipse(center, inner, TAU * i as f32 / n as f32) - PIXEL_CENTER)
            .collect();
        mesh.stroke_path(&outline, false, cmd.stroke.to_array());
    }
}

/// Points along the arc, `start` to `start + sweep`, inclusive.
fn arc_rim(center: Vec2, r: Vec2, start: f32, sweep: f32) -> Vec<Vec2> {
    let sweep = sweep.clamp(-TAU, TAU);
    let full = rim_segments(r) as f32;
    let n = ((full * sweep.abs() / TAU).ceil() as usize).max(2);
    (0..=n)
        .map(|i| Vec2::on_ellipse(center, r, start + sweep * i as f32 / n as f32))
        .collect()
}

fn arc(cmd: &ArcCmd, mesh: &mut Mesh) {
    if !cmd.origin.is_finite() || !cmd.size.is_finite() || !cmd.start.is_finite() || !cmd.sweep.is_finite() {
        return;
    }
    let (center, r) = (cmd.center(), cmd.radii());
    let rim = arc_rim(center, r, cmd.start, cmd.sweep);

    match cmd.kind {
        ArcKind::Arc => {}
        ArcKind::Chord if cmd.fill.is_visible() => mesh.fan(rim[0], &rim[1..], cmd.fill.to_array()),
        ArcKind::Pie if cmd.fill.is_visible() => mesh.fan(center, &rim, cmd.fill.to_array()),
        _ => {}
    }

    if !cmd.stroke.is_visible() {
        return;
    }
    let stroke = cmd.stroke.to_array();
    match cmd.kind {
        ArcKind::Arc => mesh.stroke_path(&rim, false, stroke),
        ArcKind::Chord => mesh.stroke_path(&rim, true, stroke),
        ArcKind::Pie => {
            let mut outline = Vec::with_capacity(rim.len() + 1);
            outline.push(center);
            outline.extend_from_slice(&rim);
            mesh.stroke_path(&outline, true, stroke);
        }
    }
}

// ── polygon triangulation ─────────────────────────────────────────────────

fn signed_area2(points: &[Vec2], ring: &[usize]) -> f32 {
    let n = ring.len();
    (0..n)
        .map(|i| points[ring[i]].cross(points[ring[(i + 1) % n]]))
        .sum()
}

fn in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    let d1 = (b - a).cross(p - a);
    let d2 = (c - b).cross(p - b);
    let d3 = (a - c).cross(p - c);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Ear-clipping triangulation of a simple polygon, either winding.
///
/// Returns triangles as indices into `points`. Consecutive duplicates and
/// collinear vertices are dropped. A self-intersecting remainder that has no
/// ear left is fanned from its first vertex.
pub fn triangulate(points: &[Vec2]) -> Vec<[u32; 3]> {
    let mut ring: Vec<usize> = (0..points.len()).collect();
    ring.dedup_by(|a, b| points[*a] == points[*b]);
    if ring.len() > 1 && points[ring[0]] == points[ring[ring.len() - 1]] {
        ring.pop();
    }

    let mut tris = Vec::new();
    if ring.len() < 3 {
        return tris;
    }

    let area2 = signed_area2(points, &ring);
    if area2.abs() <= f32::EPSILON {
        return tris;
    }
    let orient = area2.signum();

    while ring.len() > 3 {
        let n = ring.len();
        let mut progressed = false;

        for i in 0..n {
            let (ip, ic, inx) = (ring[(i + n - 1) % n], ring[i], ring[(i + 1) % n]);
            let (a, b, c) = (points[ip], points[ic], points[inx]);
            let turn = (b - a).cross(c - b) * orient;

            if turn.abs() <= f32::EPSILON {
                ring.remove(i);
                progressed = true;
                break;
            }
            if turn < 0.0 {
                continue; // reflex
            }

            let blocked = ring.iter().any(|&j| {
                let p = points[j];
                j != ip && j != ic && j != inx && p != a && p != b && p != c && in_triangle(p, a, b, c)
            });
            if blocked {
                continue;
            }

            tris.push([ip as u32, ic as u32, inx as u32]);
            ring.remove(i);
            progressed = true;
            break;
        }

        if !progressed {
            for w in ring[1..].windows(2) {
                tris.push([ring[0] as u32, w[0] as u32, w[1] as u32]);
            }
            return tris;
        }
    }

    if ring.len() == 3 {
        tris.push([ring[0] as u32, ring[1] as u32, ring[2] as u32]);
    }
    tris
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::SceneBuffer;

    fn v(x: f32, y: f32) -> Vec2 {
        Vec2::new(x, y)
    }

    fn tri_area(points: &[Vec2], t: [u32; 3]) -> f32 {
        let (a, b, c) = (points[t[0] as usize], points[t[1] as usize], points[t[2] as usize]);
        ((b - a).cross(c - a) * 0.5).abs()
    }

    fn mesh_for(buf: &SceneBuffer) -> Mesh {
        let mut mesh = Mesh::new();
        for p in buf.iter() {
            tessellate(p, &mut mesh);
        }
        mesh
    }

    #[test]
    fn square_becomes_two_triangles() {
        let pts = [v(0.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)];
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 2);
        let area: f32 = tris.iter().map(|t| tri_area(&pts, *t)).sum();
        assert!((area - 100.0).abs() < 1e-3);
    }

    #[test]
    fn concave_polygon_covers_exact_area() {
        // L shape, clockwise on screen: area 3.
        let pts = [v(0.0, 0.0), v(2.0, 0.0), v(2.0, 1.0), v(1.0, 1.0), v(1.0, 2.0), v(0.0, 2.0)];
        let tris = triangulate(&pts);
        assert_eq!(tris.len(), 4);
        let area: f32 = tris.iter().map(|t| tri_area(&pts, *t)).sum();
        assert!((area - 3.0).abs() < 1e-4);

        let mut reversed = pts;
        reversed.reverse();
        let area: f32 = triangulate(&reversed).iter().map(|t| tri_area(&reversed, *t)).sum();
        assert!((area - 3.0).abs() < 1e-4);
    }

    #[test]
    fn degenerate_polygons_produce_nothing() {
        assert!(triangulate(&[v(0.0, 0.0), v(1.0, 1.0)]).is_empty());
        assert!(triangulate(&[v(0.0, 0.0), v(1.0, 1.0), v(2.0, 2.0)]).is_empty());
        assert!(triangulate(&[v(3.0, 3.0), v(3.0, 3.0), v(3.0, 3.0)]).is_empty());
    }

    #[test]
    fn collinear_vertex_is_dropped() {
        let pts = [v(0.0, 0.0), v(5.0, 0.0), v(10.0, 0.0), v(10.0, 10.0), v(0.0, 10.0)];
        let area: f32 = triangulate(&pts).iter().map(|t| tri_area(&pts, *t)).sum();
        assert!((area - 100.0).abs() < 1e-3);
    }

    #[test]
    fn point_is_one_pixel_quad() {
        let mut buf = SceneBuffer::new();
        buf.push_point(v(4.0, 7.0), Color::WHITE);
        let mesh = mesh_for(&buf);
        assert_eq!(mesh.vertices.len(), 4);
        assert_eq!(mesh.index_count(), 6);
        assert_eq!(mesh.vertices[0].pos, [4.0, 7.0]);
        assert_eq!(mesh.vertices[2].pos, [5.0, 8.0]);
    }

    #[test]
    fn horizontal_line_covers_its_pixel_row() {
        let mut buf = SceneBuffer::new();
        buf.push_line(v(10.0, 10.0), v(20.0, 10.0), Color::WHITE);
        let mesh = mesh_for(&buf);
        let ys: Vec<f32> = mesh.vertices.iter().map(|m| m.pos[1]).collect();
        assert!(ys.iter().all(|y| *y == 10.0 || *y == 11.0));
        let xs: Vec<f32> = mesh.vertices.iter().map(|m| m.pos[0]).collect();
        assert_eq!(xs.iter().cloned().fold(f32::MAX, f32::min), 10.0);
        assert_eq!(xs.iter().cloned().fold(f32::MIN, f32::max), 21.0);
    }

    #[test]
    fn transparent_colors_emit_nothing() {
        let mut buf = SceneBuffer::new();
        buf.push_ellipse(v(0.0, 0.0), v(10.0, 10.0), Color::TRANSPARENT, Color::TRANSPARENT);
        buf.push_line(v(0.0, 0.0), v(5.0, 5.0), Color::TRANSPARENT);
        assert!(mesh_for(&buf).is_empty());
    }

    #[test]
    fn filled_ellipse_stays_inside_bounding_box() {
        let mut buf = SceneBuffer::new();
        buf.push_ellipse(v(100.0, 100.0), v(50.0, 30.0), Color::TRANSPARENT, Color::RED);
        let mesh = mesh_for(&buf);
        assert!(!mesh.is_empty());
        for m in &mesh.vertices {
            assert!(m.pos[0] >= 99.99 && m.pos[0] <= 150.01, "x out of box: {}", m.pos[0]);
            assert!(m.pos[1] >= 99.99 && m.pos[1] <= 130.01, "y out of box: {}", m.pos[1]);
        }
    }

    #[test]
    fn fill_precedes_stroke() {
        let mut buf = SceneBuffer::new();
        buf.push_ellipse(v(0.0, 0.0), v(20.0, 20.0), Color::WHITE, Color::RED);
        let mesh = mesh_for(&buf);
        assert_eq!(mesh.vertices.first().map(|m| m.color), Some(Color::RED.to_array()));
        assert_eq!(mesh.vertices.last().map(|m| m.color), Some(Color::WHITE.to_array()));
    }

    #[test]
    fn pie_fan_starts_at_center() {
        let mut buf = SceneBuffer::new();
        buf.push_arc(
            ArcKind::Pie,
            v(0.0, 0.0),
            v(40.0, 40.0),
            0.0,
            std::f32::consts::FRAC_PI_2,
            Color::TRANSPARENT,
            Color::GREEN,
        );
        let mesh = mesh_for(&buf);
        assert_eq!(mesh.vertices[0].pos, [20.0, 20.0]);
        // First rim point is at angle 0 (right), last at 90 degrees (up on screen).
        assert_eq!(mesh.vertices[1].pos, [40.0, 20.0]);
        let last = mesh.vertices.last().map(|m| m.pos).unwrap_or_default();
        assert!((last[0] - 20.0).abs() < 1e-3 && last[1].abs() < 1e-3);
    }

    #[test]
    fn open_arc_ignores_fill() {
        let mut buf = SceneBuffer::new();
        buf.push_arc(ArcKind::Arc, v(0.0, 0.0), v(40.0, 40.0), 0.0, 1.0, Color::TRANSPARENT, Color::GREEN);
        assert!(mesh_for(&buf).is_empty());
    }

    #[test]
    fn non_finite_points_are_skipped() {
        let mut buf = SceneBuffer::new();
        buf.push_polygon(vec![v(0.0, 0.0), v(f32::NAN, 1.0), v(1.0, 1.0)], Color::WHITE, Color::WHITE);
        buf.push_points(vec![v(1.0, 1.0), v(f32::INFINITY, 0.0)], Color::WHITE);
        let mesh = mesh_for(&buf);
        assert_eq!(mesh.vertices.len(), 4);
    }
}
