// world.rs
use glam::{DVec2, Vec2};
use crate::{camera::MapView, color, config, map_loader::TrailFeature, panels::Overlay, proximity::Position, trail::{Trail, TrailTables}, vertex::Vertex};

/// Indexed triangle soup, rebuilt whenever the view or UI state changes.
#[derive(Debug, Default, Clone)]
pub struct Mesh {
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
}

impl Mesh {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    fn push_quad(&mut self, corners: [Vec2; 4], color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        for c in corners {
            self.vertices.push(Vertex { position: c.to_array(), color });
        }
        self.indices.extend_from_slice(&[base, base + 1, base + 2, base, base + 2, base + 3]);
    }

    pub fn push_rect(&mut self, min: Vec2, max: Vec2, color: [f32; 3]) {
        self.push_quad([min, Vec2::new(max.x, min.y), max, Vec2::new(min.x, max.y)], color);
    }

    /// Thick line as one quad per segment, ends extended by half the width.
    pub fn push_polyline(&mut self, points: &[Vec2], width: f32, color: [f32; 3]) {
        let h = width * 0.5;
        for pair in points.windows(2) {
            let (p1, p2) = (pair[0], pair[1]);
            let edge = p2 - p1;
            if edge.length_squared() < 1e-12 { continue; }
            let dir = edge.normalize() * h;
            let n = dir.perp();
            let a = p1 - dir;
            let b = p2 + dir;
            self.push_quad([a - n, b - n, b + n, a + n], color);
        }
    }

    pub fn push_disk(&mut self, center: Vec2, radius: f32, segments: u32, color: [f32; 3]) {
        let base = self.vertices.len() as u32;
        self.vertices.push(Vertex { position: center.to_array(), color });
        for i in 0..segments {
            let angle = i as f32 / segments as f32 * std::f32::consts::TAU;
            let p = center + Vec2::from_angle(angle) * radius;
            self.vertices.push(Vertex { position: p.to_array(), color });
        }
        for i in 0..segments {
            let next = (i + 1) % segments;
            self.indices.extend_from_slice(&[base, base + 1 + i, base + 1 + next]);
        }
    }
}

/// A trail feature ready to draw: resolved styling plus projected polylines.
#[derive(Debug, Clone)]
pub struct RenderedTrail {
    pub trail: Trail,
    pub color: [f32; 3],
    pub lines: Vec<Vec<DVec2>>,
}

#[derive(Debug, Default, Clone)]
pub struct TrailLayer {
    pub trails: Vec<RenderedTrail>,
}

impl TrailLayer {
    pub fn build(features: &[TrailFeature], tables: &TrailTables, view: &MapView) -> Self {
        let trails = features
            .iter()
            .map(|f| {
                let trail = tables.resolve(&f.name);
                let color = color::css_to_linear(&trail.color);
                let lines = f.lines
                    .iter()
                    .map(|line| line.iter().map(|p| view.projection.to_local(*p)).collect())
                    .collect();
                RenderedTrail { trail, color, lines }
            })
            .collect();
        Self { trails }
    }

    /// Nearest trail whose line passes within `tolerance_m` of `point`.
    pub fn pick(&self, point: DVec2, tolerance_m: f64) -> Option<&RenderedTrail> {
        let mut best = None;
        let mut min_dist_sq = tolerance_m * tolerance_m;

        for rendered in &self.trails {
            for line in &rendered.lines {
                for seg in line.windows(2) {
                    let dist_sq = distance_sq_to_segment(point, seg[0], seg[1]);
                    if dist_sq <= min_dist_sq {
                        min_dist_sq = dist_sq;
                        best = Some(rendered);
                    }
                }
            }
        }
        best
    }
}

fn distance_sq_to_segment(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-12 {
        return p.distance_squared(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance_squared(a + ab * t)
}

/// Trail lines (when the overlay allows) and the live marker, in local metres.
pub fn build_map_mesh(layer: &TrailLayer, overlay: &Overlay, marker: Option<Position>, view: &MapView) -> Mesh {
    let mut mesh = Mesh::new();
    let mpp = view.meters_per_pixel as f32;

    if overlay.trail_lines_visible {
        let width = config::TRAIL_WEIGHT_PX * mpp;
        for rendered in &layer.trails {
            for line in &rendered.lines {
                let pts: Vec<Vec2> = line.iter().map(|p| p.as_vec2()).collect();
                mesh.push_polyline(&pts, width, rendered.color);
            }
        }
    }

    if let Some(pos) = marker {
        let c = view.projection.to_local(pos).as_vec2();
        let r = config::MARKER_RADIUS_PX * mpp;
        mesh.push_disk(c, r, config::MARKER_SEGMENTS, config::MARKER_RIM);
        mesh.push_disk(c, r * 0.7, config::MARKER_SEGMENTS, config::MARKER_COLOR);
    }
    mesh
}
